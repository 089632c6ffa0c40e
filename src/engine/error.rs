//! Errors surfaced by workflow operations.

use crate::builder::ConfigurationError;
use crate::core::{PersistenceError, ValidationError};
use thiserror::Error;

/// Errors that can occur while resolving or executing transitions.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum WorkflowError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("Transition {transition} does not exist")]
    UnknownTransition { transition: String },

    #[error("Invalid transition {transition}: {current_state} -> {to_state}")]
    InvalidTransition {
        transition: String,
        current_state: String,
        to_state: String,
    },

    #[error("Transition forbidden {transition}: {current_state} -> {to_state}")]
    TransitionNotAllowed {
        transition: String,
        current_state: String,
        to_state: String,
    },

    /// A guard, hook or body rejected the attempt with an explanation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("No transition available out of state {current_state}")]
    NoAvailableTransition { current_state: String },

    #[error(
        "Multiple possible transitions out of state {current_state} (got {} choices, expected 1): {}",
        .candidates.len(),
        .candidates.join(", ")
    )]
    AmbiguousTransition {
        current_state: String,
        candidates: Vec<String>,
    },

    #[error("Transition not found from {current_state} to {to_state}")]
    TransitionNotFound {
        current_state: String,
        to_state: String,
    },

    #[error("Model has no value for state field '{field}'")]
    MissingStateField { field: String },

    /// The state field already holds the destination in memory; the model
    /// was not durably committed.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

impl WorkflowError {
    /// Whether the failure left the in-memory model ahead of storage.
    pub fn is_partial_commit(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }
}
