//! Host model contract.
//!
//! The engine never owns the model. It reads and writes one state field,
//! optionally stamps a date field, and asks the model to persist itself.

use crate::core::PersistenceError;
use crate::definition::WorkflowDefinition;
use crate::engine::Workflow;
use chrono::{DateTime, Utc};

/// Stateful entity a workflow is attached to.
///
/// `field` is the definition's state field name, which lets several
/// workflows share one model through different fields.
///
/// # Example
///
/// ```rust
/// use pieuvre::core::PersistenceError;
/// use pieuvre::model::Model;
///
/// struct Order {
///     state: String,
///     saves: usize,
/// }
///
/// impl Model for Order {
///     fn state(&self, _field: &str) -> Option<&str> {
///         Some(&self.state)
///     }
///
///     fn set_state(&mut self, _field: &str, state: &str) {
///         self.state = state.to_string();
///     }
///
///     fn save(&mut self) -> Result<(), PersistenceError> {
///         self.saves += 1;
///         Ok(())
///     }
/// }
/// ```
pub trait Model {
    /// Current value of the state field, `None` if the model has no such field.
    fn state(&self, field: &str) -> Option<&str>;

    /// Overwrite the state field in memory.
    fn set_state(&mut self, field: &str, state: &str);

    /// Record the commit time of a transition declaring a date field.
    ///
    /// Default implementation ignores the timestamp.
    fn touch(&mut self, field: &str, at: DateTime<Utc>) {
        let _ = (field, at);
    }

    /// Durably commit the model's in-memory values.
    fn save(&mut self) -> Result<(), PersistenceError>;
}

/// Strategy a host model provides to pick the workflow that governs it.
///
/// Models with several workflow variants return a different definition
/// depending on their own data.
pub trait SelectWorkflow: Model + Sized {
    fn select_workflow(&self) -> WorkflowDefinition<Self>;

    /// Bind the selected workflow to this model.
    fn workflow(&mut self) -> Workflow<'_, Self> {
        let definition = self.select_workflow();
        Workflow::new(definition, self)
    }
}
