//! Enter/exit hook dispatch.
//!
//! For each state, registered hooks run in registration order, followed by
//! the state's dedicated handler. Both always run; nothing is deduplicated.

use crate::core::{HookResult, TransitionAttempt};
use crate::definition::Handlers;
use tracing::debug;

/// Run the exit hooks of the state being left.
pub(crate) fn dispatch_exit<M>(
    handlers: &Handlers<M>,
    model: &mut M,
    attempt: &TransitionAttempt,
) -> HookResult {
    debug!(state = %attempt.from, transition = %attempt.transition, "Leaving state");
    for hook in handlers.exit_hooks.get(&attempt.from).into_iter().flatten() {
        hook.run(model, attempt)?;
    }
    Ok(())
}

/// Run the enter hooks of the state being entered.
pub(crate) fn dispatch_enter<M>(
    handlers: &Handlers<M>,
    model: &mut M,
    attempt: &TransitionAttempt,
) -> HookResult {
    debug!(state = %attempt.to, transition = %attempt.transition, "Entering state");
    for hook in handlers.enter_hooks.get(&attempt.to).into_iter().flatten() {
        hook.run(model, attempt)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use crate::builder::WorkflowBuilder;
    use crate::core::{Hook, ValidationError};

    #[derive(Default)]
    struct Trace {
        calls: Vec<&'static str>,
    }

    fn record(name: &'static str) -> Hook<Trace> {
        Hook::new(move |t: &mut Trace, _: &TransitionAttempt| t.calls.push(name))
    }

    fn attempt() -> TransitionAttempt {
        TransitionAttempt {
            transition: "submit".to_string(),
            label: None,
            from: "draft".to_string(),
            to: "submitted".to_string(),
            payload: Value::Null,
            output: Value::Null,
        }
    }

    #[test]
    fn registered_hooks_run_before_dedicated_handler() {
        let definition = WorkflowBuilder::new("orders")
            .states(["draft", "submitted"])
            .transition("submit", "draft", "submitted")
            .on_exit("draft", record("on_exit_draft"))
            .on_exit_hook("draft", record("exit_hook_1"))
            .on_exit_hook("draft", record("exit_hook_2"))
            .on_enter("submitted", record("on_enter_submitted"))
            .on_enter_hook("submitted", record("enter_hook"))
            .build()
            .unwrap();

        let mut trace = Trace::default();
        dispatch_exit(definition.handlers(), &mut trace, &attempt()).unwrap();
        dispatch_enter(definition.handlers(), &mut trace, &attempt()).unwrap();

        assert_eq!(
            trace.calls,
            vec![
                "exit_hook_1",
                "exit_hook_2",
                "on_exit_draft",
                "enter_hook",
                "on_enter_submitted"
            ]
        );
    }

    #[test]
    fn states_without_hooks_are_noops() {
        let definition = WorkflowBuilder::<Trace>::new("orders")
            .states(["draft", "submitted"])
            .transition("submit", "draft", "submitted")
            .build()
            .unwrap();

        let mut trace = Trace::default();
        dispatch_exit(definition.handlers(), &mut trace, &attempt()).unwrap();
        dispatch_enter(definition.handlers(), &mut trace, &attempt()).unwrap();

        assert!(trace.calls.is_empty());
    }

    #[test]
    fn failing_hook_stops_dispatch() {
        let definition = WorkflowBuilder::new("orders")
            .states(["draft", "submitted"])
            .transition("submit", "draft", "submitted")
            .on_enter_hook(
                "submitted",
                Hook::fallible(|_: &mut Trace, _: &TransitionAttempt| {
                    Err(ValidationError::new("mailer unavailable"))
                }),
            )
            .on_enter("submitted", record("on_enter_submitted"))
            .build()
            .unwrap();

        let mut trace = Trace::default();
        let err = dispatch_enter(definition.handlers(), &mut trace, &attempt()).unwrap_err();

        assert_eq!(err.message, "mailer unavailable");
        assert!(trace.calls.is_empty());
    }
}
