//! Workflow instances: a definition bound to one host model.

use crate::core::TransitionAttempt;
use crate::definition::WorkflowDefinition;
use crate::engine::checks::{evaluate_checks, CheckOutcome};
use crate::engine::error::WorkflowError;
use crate::engine::hooks::{dispatch_enter, dispatch_exit};
use crate::events::TransitionEvent;
use crate::model::Model;
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, info_span, warn};

/// A state reachable from the current one, with the transition leading there.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NextState {
    pub state: String,
    pub transition: String,
    pub transition_label: Option<String>,
}

/// A workflow definition bound to a model for one or more transition attempts.
///
/// The workflow holds nothing but the definition handle and the borrowed
/// model; the current state is always read from the model's state field.
/// Callers must serialize access to a given model: nothing here detects a
/// concurrent writer.
///
/// # Example
///
/// ```rust
/// use pieuvre::builder::WorkflowBuilder;
/// use pieuvre::core::{Guard, PersistenceError};
/// use pieuvre::engine::Workflow;
/// use pieuvre::model::Model;
///
/// struct Job {
///     state: String,
///     retries: u32,
///     saves: u32,
/// }
///
/// impl Model for Job {
///     fn state(&self, _field: &str) -> Option<&str> {
///         Some(&self.state)
///     }
///     fn set_state(&mut self, _field: &str, state: &str) {
///         self.state = state.to_string();
///     }
///     fn save(&mut self) -> Result<(), PersistenceError> {
///         self.saves += 1;
///         Ok(())
///     }
/// }
///
/// let definition = WorkflowBuilder::new("jobs")
///     .states(["queued", "running", "done"])
///     .transition("start", "queued", "running")
///     .transition("finish", "running", "done")
///     .check("start", Guard::new(|j: &Job| j.retries < 3))
///     .build()
///     .unwrap();
///
/// let mut job = Job { state: "queued".into(), retries: 0, saves: 0 };
/// let mut workflow = Workflow::new(definition, &mut job);
///
/// workflow.run_transition("start").unwrap();
/// workflow.advance().unwrap();
///
/// assert_eq!(job.state, "done");
/// assert_eq!(job.saves, 2);
/// ```
pub struct Workflow<'m, M> {
    definition: WorkflowDefinition<M>,
    model: &'m mut M,
}

impl<'m, M: Model> Workflow<'m, M> {
    pub fn new(definition: WorkflowDefinition<M>, model: &'m mut M) -> Self {
        Self { definition, model }
    }

    pub fn definition(&self) -> &WorkflowDefinition<M> {
        &self.definition
    }

    pub fn model(&self) -> &M {
        &*self.model
    }

    pub fn model_mut(&mut self) -> &mut M {
        &mut *self.model
    }

    /// Current state, read from the model's state field.
    pub fn current_state(&self) -> Result<&str, WorkflowError> {
        let field = self.definition.state_field();
        self.model
            .state(field)
            .ok_or_else(|| WorkflowError::MissingStateField {
                field: field.to_string(),
            })
    }

    /// Transitions leaving the current state, in declaration order.
    ///
    /// With `return_all` every structurally eligible transition is listed,
    /// whatever its checks say (useful to show disabled options). Otherwise
    /// only transitions whose checks pass are kept. A guard raising a
    /// validation error aborts the listing.
    pub fn available_transitions(
        &self,
        return_all: bool,
    ) -> Result<Vec<TransitionAttempt>, WorkflowError> {
        let state = self.current_state()?;
        let handlers = self.definition.handlers();

        let mut available = Vec::new();
        for transition in self.definition.transitions_from(state) {
            let allowed = return_all
                || evaluate_checks(handlers, transition, state, &*self.model, &Value::Null)?
                    .is_allowed();
            if allowed {
                available.push(TransitionAttempt::resolve(transition, state));
            }
        }
        Ok(available)
    }

    /// States reachable from the current one. When several transitions lead
    /// to the same state, the first declared wins.
    pub fn next_available_states(
        &self,
        return_all: bool,
    ) -> Result<Vec<NextState>, WorkflowError> {
        let mut next: Vec<NextState> = Vec::new();
        for attempt in self.available_transitions(return_all)? {
            if next.iter().any(|n| n.state == attempt.to) {
                continue;
            }
            next.push(NextState {
                state: attempt.to,
                transition: attempt.transition,
                transition_label: attempt.label,
            });
        }
        Ok(next)
    }

    /// Transitions structurally available from an arbitrary state, checks ignored.
    pub fn available_transitions_from(&self, state: &str) -> Vec<TransitionAttempt> {
        self.definition
            .transitions_from(state)
            .map(|t| TransitionAttempt::resolve(t, state))
            .collect()
    }

    /// The named transition, if it can fire right now.
    pub fn available_transition(
        &self,
        name: &str,
    ) -> Result<Option<TransitionAttempt>, WorkflowError> {
        Ok(self
            .available_transitions(false)?
            .into_iter()
            .find(|attempt| attempt.transition == name))
    }

    /// First transition leaving the current state towards `target`, checks ignored.
    pub fn transition_to(&self, target: &str) -> Result<TransitionAttempt, WorkflowError> {
        let state = self.current_state()?;
        self.definition
            .transitions_from(state)
            .find(|t| t.destination == target)
            .map(|t| TransitionAttempt::resolve(t, state))
            .ok_or_else(|| WorkflowError::TransitionNotFound {
                current_state: state.to_string(),
                to_state: target.to_string(),
            })
    }

    /// Validate, execute and persist the named transition.
    ///
    /// Checks run before anything is mutated. Then, in order: the `before`
    /// callback, the transition body, exit hooks of the current state, enter
    /// hooks of the destination, the `after` callback, the state field
    /// write, the date field stamp and the model's save. Listeners are
    /// notified last.
    ///
    /// A rejection before the state write leaves the state field and storage
    /// untouched (hooks that already ran keep their effects). A failed save
    /// is reported as [`WorkflowError::Persistence`] with the state field
    /// already changed in memory.
    pub fn run_transition(&mut self, name: &str) -> Result<TransitionAttempt, WorkflowError> {
        self.run_transition_with(name, Value::Null)
    }

    /// Run the named transition with a caller-provided payload.
    ///
    /// The transition's own check receives the payload, and every hook sees
    /// it as [`TransitionAttempt::payload`]. The value returned by the body
    /// is stored in [`TransitionAttempt::output`] before the exit, enter and
    /// `after` hooks run, and comes back in the returned attempt.
    pub fn run_transition_with(
        &mut self,
        name: &str,
        payload: Value,
    ) -> Result<TransitionAttempt, WorkflowError> {
        let definition = self.definition.clone();
        let span = info_span!("transition", workflow = %definition.name(), transition = %name);
        let _entered = span.enter();

        let transition =
            definition
                .transition(name)
                .ok_or_else(|| WorkflowError::UnknownTransition {
                    transition: name.to_string(),
                })?;
        let state = self.current_state()?.to_string();

        let handlers = definition.handlers();
        let outcome = evaluate_checks(handlers, transition, &state, &*self.model, &payload)?;
        if !outcome.is_allowed() {
            let (name, to_state) = (transition.name.clone(), transition.destination.clone());
            let err = match outcome {
                CheckOutcome::WrongSource => WorkflowError::InvalidTransition {
                    transition: name,
                    current_state: state,
                    to_state,
                },
                _ => WorkflowError::TransitionNotAllowed {
                    transition: name,
                    current_state: state,
                    to_state,
                },
            };
            debug!(error = %err, "Transition rejected");
            return Err(err);
        }

        let mut attempt = TransitionAttempt::resolve(transition, &state).with_payload(payload);

        if let Some(before) = handlers.before.get(name) {
            before.run(self.model, &attempt)?;
        }
        if let Some(body) = handlers.bodies.get(name) {
            attempt.output = body.output(self.model, &attempt)?;
        }
        dispatch_exit(handlers, self.model, &attempt)?;
        dispatch_enter(handlers, self.model, &attempt)?;
        if let Some(after) = handlers.after.get(name) {
            after.run(self.model, &attempt)?;
        }

        let field = definition.state_field();
        debug!(field = %field, value = %attempt.to, "Updating model state");
        self.model.set_state(field, &attempt.to);

        if let Some(date_field) = &transition.date_field {
            self.model.touch(date_field, Utc::now());
        }

        debug!("Saving model");
        if let Err(err) = self.model.save() {
            warn!(
                error = %err,
                from = %attempt.from,
                to = %attempt.to,
                "Model state changed in memory but could not be saved"
            );
            return Err(err.into());
        }

        info!(from = %attempt.from, to = %attempt.to, "Transition committed");

        let listeners = definition.listeners();
        if !listeners.is_empty() {
            let event = TransitionEvent::committed(definition.name(), &attempt);
            for listener in listeners {
                listener.on_transition(&event);
            }
        }

        Ok(attempt)
    }

    /// The single transition that can fire from the current state.
    ///
    /// Fails when none or several are legal; never guesses.
    pub fn next_transition(&self) -> Result<TransitionAttempt, WorkflowError> {
        let mut available = self.available_transitions(false)?;
        match available.len() {
            0 => Err(WorkflowError::NoAvailableTransition {
                current_state: self.current_state()?.to_string(),
            }),
            1 => Ok(available.remove(0)),
            _ => Err(WorkflowError::AmbiguousTransition {
                current_state: self.current_state()?.to_string(),
                candidates: available.into_iter().map(|a| a.transition).collect(),
            }),
        }
    }

    /// Fire the single legal transition, see [`next_transition`](Self::next_transition).
    pub fn advance(&mut self) -> Result<TransitionAttempt, WorkflowError> {
        let next = self.next_transition()?;
        self.run_transition(&next.transition)
    }
}
