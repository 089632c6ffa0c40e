//! Pieuvre: a declarative workflow engine
//!
//! A workflow is declared once: named states, named transitions from one or
//! more source states to a single destination, and the guards and hooks
//! attached to them. The resulting definition is validated as a whole and
//! then bound to any host model that exposes a state field and can persist
//! itself.
//!
//! # Core Concepts
//!
//! - **Definition**: validated, immutable states and transitions, shared by
//!   every model that follows the workflow
//! - **Guards**: predicates on the model deciding whether a transition may fire
//! - **Hooks**: side effects run when states are left or entered
//! - **Model**: the host entity owning the state field and its persistence
//!
//! # Example
//!
//! ```rust
//! use pieuvre::builder::WorkflowBuilder;
//! use pieuvre::core::{Guard, Hook, PersistenceError, TransitionAttempt};
//! use pieuvre::engine::Workflow;
//! use pieuvre::model::Model;
//!
//! #[derive(Default)]
//! struct Article {
//!     state: String,
//!     reviewers: u32,
//!     notified: bool,
//! }
//!
//! impl Model for Article {
//!     fn state(&self, _field: &str) -> Option<&str> {
//!         Some(&self.state)
//!     }
//!
//!     fn set_state(&mut self, _field: &str, state: &str) {
//!         self.state = state.to_string();
//!     }
//!
//!     fn save(&mut self) -> Result<(), PersistenceError> {
//!         Ok(())
//!     }
//! }
//!
//! let definition = WorkflowBuilder::new("articles")
//!     .states(["draft", "review", "published"])
//!     .transition("submit", "draft", "review")
//!     .transition("publish", "review", "published")
//!     .check("publish", Guard::new(|a: &Article| a.reviewers >= 2))
//!     .on_enter(
//!         "published",
//!         Hook::new(|a: &mut Article, _: &TransitionAttempt| a.notified = true),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let mut article = Article {
//!     state: "draft".to_string(),
//!     ..Default::default()
//! };
//!
//! let mut workflow = Workflow::new(definition.clone(), &mut article);
//! workflow.run_transition("submit").unwrap();
//! assert!(workflow.run_transition("publish").is_err());
//!
//! article.reviewers = 2;
//! Workflow::new(definition, &mut article)
//!     .run_transition("publish")
//!     .unwrap();
//! assert!(article.notified);
//! ```

pub mod builder;
pub mod config;
pub mod core;
pub mod definition;
pub mod engine;
pub mod events;
pub mod model;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Re-export commonly used types
pub use builder::{ConfigurationError, WorkflowBuilder};
pub use core::{Guard, Hook, State, Transition, TransitionAttempt, ValidationError};
pub use definition::WorkflowDefinition;
pub use engine::{Workflow, WorkflowError};
pub use model::{Model, SelectWorkflow};
