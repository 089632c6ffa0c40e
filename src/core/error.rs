//! Errors raised by user code plugged into a workflow.

use thiserror::Error;

/// Explained rejection raised by a guard, hook or transition body.
///
/// Unlike a guard returning `false`, a validation error carries a message for
/// the caller and aborts the whole operation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
    pub errors: Vec<String>,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            errors: Vec::new(),
        }
    }

    /// Attach detailed errors, e.g. one per invalid field.
    pub fn with_errors<I, E>(mut self, errors: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<String>,
    {
        self.errors.extend(errors.into_iter().map(Into::into));
        self
    }
}

/// Failure of the host model's persistence call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Failed to save model: {reason}")]
pub struct PersistenceError {
    pub reason: String,
}

impl PersistenceError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_displays_message_only() {
        let err = ValidationError::new("Put some load on that rocket!")
            .with_errors(["payload: must not be empty"]);

        assert_eq!(err.to_string(), "Put some load on that rocket!");
        assert_eq!(err.errors, vec!["payload: must not be empty".to_string()]);
    }

    #[test]
    fn persistence_error_mentions_reason() {
        let err = PersistenceError::new("database is locked");
        assert_eq!(err.to_string(), "Failed to save model: database is locked");
    }
}
