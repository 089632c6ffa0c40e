//! Guard predicates for controlling transitions.
//!
//! Guards decide whether a transition may fire. They only see the model
//! through a shared reference and must not have observable side effects:
//! the engine evaluates them once while listing available transitions and
//! again while executing one.

use super::error::ValidationError;
use serde_json::Value;

/// Outcome of evaluating a guard.
pub type GuardResult = Result<bool, ValidationError>;

type Predicate<M> = Box<dyn Fn(&M, &Value) -> GuardResult + Send + Sync>;

/// Side-effect-free predicate over the host model.
///
/// # Example
///
/// ```rust
/// use pieuvre::core::{Guard, ValidationError};
///
/// struct Rocket {
///     fuel: u32,
///     payload: u32,
/// }
///
/// let has_fuel = Guard::new(|r: &Rocket| r.fuel > 10);
/// let loaded = Guard::fallible(|r: &Rocket| {
///     if r.payload == 0 {
///         return Err(ValidationError::new("Put some load on that rocket!"));
///     }
///     Ok(true)
/// });
///
/// let rocket = Rocket { fuel: 50, payload: 0 };
/// assert_eq!(has_fuel.check(&rocket), Ok(true));
/// assert!(loaded.check(&rocket).is_err());
/// ```
pub struct Guard<M> {
    predicate: Predicate<M>,
    description: Option<String>,
}

impl<M> Guard<M> {
    /// Create a guard from a plain boolean predicate.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&M) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Box::new(move |model, _| Ok(predicate(model))),
            description: None,
        }
    }

    /// Create a guard that may reject with an explanation instead of `false`.
    pub fn fallible<F>(predicate: F) -> Self
    where
        F: Fn(&M) -> GuardResult + Send + Sync + 'static,
    {
        Self {
            predicate: Box::new(move |model, _| predicate(model)),
            description: None,
        }
    }

    /// Create a guard that also inspects the payload the transition was run
    /// with.
    ///
    /// Only a transition's own check receives the payload. State checks and
    /// listings see `Value::Null`.
    pub fn with_payload<F>(predicate: F) -> Self
    where
        F: Fn(&M, &Value) -> GuardResult + Send + Sync + 'static,
    {
        Self {
            predicate: Box::new(predicate),
            description: None,
        }
    }

    /// Attach a description used in logs.
    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Evaluate the guard against the model.
    pub fn check(&self, model: &M) -> GuardResult {
        (self.predicate)(model, &Value::Null)
    }

    /// Evaluate the guard against the model and a transition payload.
    pub fn check_with(&self, model: &M, payload: &Value) -> GuardResult {
        (self.predicate)(model, payload)
    }
}

impl<M> std::fmt::Debug for Guard<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Guard")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}
