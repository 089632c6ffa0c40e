//! Check evaluation.
//!
//! A transition is allowed from a state only if, in this order:
//! 1. the state belongs to the transition's source set,
//! 2. every on-enter check of the destination passes,
//! 3. every on-exit check of the source passes,
//! 4. the transition's own check, if any, passes.
//!
//! Evaluation stops at the first failure. A guard raising a
//! [`ValidationError`] aborts the evaluation instead of denying. Only the
//! transition's own check sees the caller's payload.

use crate::core::{Guard, Transition, ValidationError};
use crate::definition::Handlers;
use serde_json::Value;
use std::sync::Arc;
use tracing::trace;

/// Result of evaluating the checks of one transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CheckOutcome {
    Allowed,
    /// The current state is not a source of the transition.
    WrongSource,
    /// A guard returned `false`.
    Denied,
}

impl CheckOutcome {
    pub fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed)
    }
}

fn all_pass<M>(guards: Option<&Vec<Arc<Guard<M>>>>, model: &M) -> Result<bool, ValidationError> {
    for guard in guards.into_iter().flatten() {
        if !guard.check(model)? {
            trace!(guard = guard.description(), "Guard denied transition");
            return Ok(false);
        }
    }
    Ok(true)
}

/// Evaluate the checks of `transition` for a model currently in `state`.
pub(crate) fn evaluate_checks<M>(
    handlers: &Handlers<M>,
    transition: &Transition,
    state: &str,
    model: &M,
    payload: &Value,
) -> Result<CheckOutcome, ValidationError> {
    if !transition.leaves(state) {
        return Ok(CheckOutcome::WrongSource);
    }

    if !all_pass(handlers.enter_checks.get(&transition.destination), model)? {
        return Ok(CheckOutcome::Denied);
    }

    if !all_pass(handlers.exit_checks.get(state), model)? {
        return Ok(CheckOutcome::Denied);
    }

    if let Some(check) = handlers.transition_checks.get(&transition.name) {
        if !check.check_with(model, payload)? {
            return Ok(CheckOutcome::Denied);
        }
    }

    Ok(CheckOutcome::Allowed)
}
