//! Named events routed to workflow handlers.

use crate::engine::error::WorkflowError;
use crate::engine::workflow::Workflow;
use crate::model::Model;
use serde_json::Value;
use tracing::debug;

type Handler<M> =
    Box<dyn Fn(&mut Workflow<'_, M>, &Value) -> Result<Value, WorkflowError> + Send + Sync>;

/// Handler bound to an event name with
/// [`WorkflowBuilder::event`](crate::builder::WorkflowBuilder::event).
///
/// The handler receives the workflow itself, so it usually translates the
/// event data into one or more transitions.
pub struct EventHandler<M> {
    handler: Handler<M>,
}

impl<M> EventHandler<M> {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&mut Workflow<'_, M>, &Value) -> Result<Value, WorkflowError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            handler: Box::new(handler),
        }
    }

    pub fn handle(
        &self,
        workflow: &mut Workflow<'_, M>,
        data: &Value,
    ) -> Result<Value, WorkflowError> {
        (self.handler)(workflow, data)
    }
}

impl<'m, M: Model> Workflow<'m, M> {
    /// Dispatch an event to the handler registered under `name`.
    ///
    /// Returns `Ok(None)` when no handler is registered, otherwise the
    /// handler's output.
    pub fn process_event(
        &mut self,
        name: &str,
        data: &Value,
    ) -> Result<Option<Value>, WorkflowError> {
        let handler = match self.definition().event(name) {
            Some(handler) => handler.clone(),
            None => {
                debug!(
                    workflow = %self.definition().name(),
                    event = name,
                    "No handler for event"
                );
                return Ok(None);
            }
        };
        handler.handle(self, data).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use crate::builder::WorkflowBuilder;
    use crate::core::{Guard, Hook, PersistenceError};
    use crate::definition::WorkflowDefinition;
    use crate::engine::{EventHandler, Workflow, WorkflowError};
    use crate::model::Model;
    use serde_json::{json, Value};

    #[derive(Debug)]
    struct Ticket {
        state: String,
        assignee: Option<String>,
    }

    impl Model for Ticket {
        fn state(&self, _field: &str) -> Option<&str> {
            Some(&self.state)
        }

        fn set_state(&mut self, _field: &str, state: &str) {
            self.state = state.to_string();
        }

        fn save(&mut self) -> Result<(), PersistenceError> {
            Ok(())
        }
    }

    fn tickets() -> WorkflowDefinition<Ticket> {
        WorkflowBuilder::new("tickets")
            .states(["open", "assigned", "closed"])
            .transition("assign", "open", "assigned")
            .transition("close", "assigned", "closed")
            .check(
                "assign",
                Guard::with_payload(|_: &Ticket, p: &Value| Ok(p["user"].is_string())),
            )
            .body(
                "assign",
                Hook::returning(|t: &mut Ticket, attempt| {
                    t.assignee = attempt.payload["user"].as_str().map(str::to_string);
                    Ok(json!({ "assigned": t.assignee }))
                }),
            )
            .event(
                "ticket_claimed",
                EventHandler::<Ticket>::new(|workflow, data| {
                    let attempt = workflow.run_transition_with("assign", data.clone())?;
                    Ok(attempt.output)
                }),
            )
            .build()
            .unwrap()
    }

    fn ticket() -> Ticket {
        Ticket {
            state: "open".to_string(),
            assignee: None,
        }
    }

    #[test]
    fn event_runs_its_handler() {
        let mut ticket = ticket();
        let output = Workflow::new(tickets(), &mut ticket)
            .process_event("ticket_claimed", &json!({ "user": "ada" }))
            .unwrap();

        assert_eq!(output, Some(json!({ "assigned": "ada" })));
        assert_eq!(ticket.state, "assigned");
        assert_eq!(ticket.assignee.as_deref(), Some("ada"));
    }

    #[test]
    fn unknown_event_is_ignored() {
        let mut ticket = ticket();
        let output = Workflow::new(tickets(), &mut ticket)
            .process_event("ticket_deleted", &Value::Null)
            .unwrap();

        assert_eq!(output, None);
        assert_eq!(ticket.state, "open");
    }

    #[test]
    fn handler_errors_propagate() {
        let mut ticket = ticket();
        let err = Workflow::new(tickets(), &mut ticket)
            .process_event("ticket_claimed", &json!({}))
            .unwrap_err();

        assert!(matches!(err, WorkflowError::TransitionNotAllowed { .. }));
        assert_eq!(ticket.state, "open");
    }
}
