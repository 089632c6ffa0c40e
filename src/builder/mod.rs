//! Builder API for workflow definitions.
//!
//! Definitions are assembled with [`WorkflowBuilder`] (directly, or from a
//! [`WorkflowConfig`](crate::config::WorkflowConfig)) and validated as a
//! whole when built. Every problem found is reported at once in a
//! [`ConfigurationError`].

pub mod error;
mod validate;
mod workflow;

pub use error::{ConfigurationError, ConfigurationIssue};
pub use validate::{is_valid_transition_name, validate_definition};
pub use workflow::WorkflowBuilder;
