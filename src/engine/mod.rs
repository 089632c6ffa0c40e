//! Transition execution.
//!
//! A [`Workflow`] binds a shared [`WorkflowDefinition`](crate::definition::WorkflowDefinition)
//! to one host model. It resolves which transitions are available, runs the
//! checks, dispatches hooks and commits the new state through the model.

mod checks;
mod dispatch;
mod error;
mod hooks;
mod workflow;

pub use checks::CheckOutcome;
pub use dispatch::EventHandler;
pub use error::WorkflowError;
pub use workflow::{NextState, Workflow};
