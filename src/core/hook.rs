//! Side-effecting callbacks run while a transition executes.

use super::error::ValidationError;
use super::transition::TransitionAttempt;
use serde_json::Value;

/// Outcome of running a hook.
pub type HookResult = Result<(), ValidationError>;

type Callback<M> =
    Box<dyn Fn(&mut M, &TransitionAttempt) -> Result<Value, ValidationError> + Send + Sync>;

/// Callback with mutable access to the model.
///
/// Hooks are used for state enter/exit side effects, transition bodies and
/// before/after callbacks. They run at most once per committed transition.
pub struct Hook<M> {
    callback: Callback<M>,
}

impl<M> Hook<M> {
    /// Create a hook that cannot fail.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&mut M, &TransitionAttempt) + Send + Sync + 'static,
    {
        Self {
            callback: Box::new(move |model, attempt| {
                callback(model, attempt);
                Ok(Value::Null)
            }),
        }
    }

    /// Create a hook that may abort the transition with an explanation.
    pub fn fallible<F>(callback: F) -> Self
    where
        F: Fn(&mut M, &TransitionAttempt) -> HookResult + Send + Sync + 'static,
    {
        Self {
            callback: Box::new(move |model, attempt| {
                callback(model, attempt)?;
                Ok(Value::Null)
            }),
        }
    }

    /// Create a hook producing a value.
    ///
    /// Registered as a transition body, the value becomes the attempt's
    /// `output`: hooks running after the body see it, and the caller gets it
    /// back from the transition.
    pub fn returning<F>(callback: F) -> Self
    where
        F: Fn(&mut M, &TransitionAttempt) -> Result<Value, ValidationError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            callback: Box::new(callback),
        }
    }

    pub fn run(&self, model: &mut M, attempt: &TransitionAttempt) -> HookResult {
        self.output(model, attempt).map(|_| ())
    }

    /// Run the hook and keep the value it produced.
    pub fn output(
        &self,
        model: &mut M,
        attempt: &TransitionAttempt,
    ) -> Result<Value, ValidationError> {
        (self.callback)(model, attempt)
    }
}

impl<M> std::fmt::Debug for Hook<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hook").finish_non_exhaustive()
    }
}
