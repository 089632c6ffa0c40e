//! Configuration errors raised while building a workflow definition.

use thiserror::Error;

/// A single inconsistency in a workflow definition.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigurationIssue {
    #[error("No states declared. Add at least one state")]
    NoStates,

    #[error("State identifier '{state}' is not allowed")]
    InvalidState { state: String },

    #[error("State '{state}' is declared more than once")]
    DuplicateState { state: String },

    #[error("Initial state '{state}' is not a declared state")]
    UnknownInitialState { state: String },

    #[error("Transition name '{name}' is not a valid identifier")]
    InvalidTransitionName { name: String },

    #[error("Transition '{name}' is declared more than once")]
    DuplicateTransition { name: String },

    #[error("Transition '{transition}' has no source state")]
    EmptySource { transition: String },

    #[error("Transition '{transition}' leaves undeclared state '{state}'")]
    UnknownSource { transition: String, state: String },

    #[error("Transition '{transition}' has no destination")]
    MissingDestination { transition: String },

    #[error("Transition '{transition}' declares several destinations: {}", .destinations.join(", "))]
    MultipleDestinations {
        transition: String,
        destinations: Vec<String>,
    },

    #[error("Transition '{transition}' enters undeclared state '{state}'")]
    UnknownDestination { transition: String, state: String },

    #[error("{slot} registered for undeclared state '{state}'")]
    UnknownHandlerState { slot: &'static str, state: String },

    #[error("{slot} registered for undeclared transition '{transition}'")]
    UnknownHandlerTransition {
        slot: &'static str,
        transition: String,
    },

    #[error("{slot} for '{target}' is registered more than once")]
    DuplicateHandler { slot: &'static str, target: String },

    #[error("Event '{name}' has more than one handler")]
    DuplicateEvent { name: String },
}

/// Invalid workflow definition. Lists every issue found, not just the first.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid workflow '{workflow}': {}", render_issues(.issues))]
pub struct ConfigurationError {
    pub workflow: String,
    pub issues: Vec<ConfigurationIssue>,
}

fn render_issues(issues: &[ConfigurationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ConfigurationError {
    pub fn contains(&self, issue: &ConfigurationIssue) -> bool {
        self.issues.contains(issue)
    }
}
