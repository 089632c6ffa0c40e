//! Notifications emitted after committed transitions.
//!
//! Listeners replace ad-hoc logging tables and event pushers: the engine
//! hands them a [`TransitionEvent`] once the model has been saved and keeps
//! nothing itself.

use crate::core::TransitionAttempt;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Mutex;
use uuid::Uuid;

/// Record of one committed transition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionEvent {
    pub id: Uuid,
    pub workflow: String,
    pub transition: String,
    pub label: Option<String>,
    /// Exact state the model left, even for wildcard or multi-source transitions.
    pub from: String,
    pub to: String,
    /// Input the transition was run with.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub payload: Value,
    pub occurred_at: DateTime<Utc>,
}

impl TransitionEvent {
    pub(crate) fn committed(workflow: &str, attempt: &TransitionAttempt) -> Self {
        Self {
            id: Uuid::new_v4(),
            workflow: workflow.to_string(),
            transition: attempt.transition.clone(),
            label: attempt.label.clone(),
            from: attempt.from.clone(),
            to: attempt.to.clone(),
            payload: attempt.payload.clone(),
            occurred_at: Utc::now(),
        }
    }
}

/// Receiver of committed transitions.
pub trait TransitionListener: Send + Sync {
    fn on_transition(&self, event: &TransitionEvent);
}

/// Listener keeping every event in memory, in commit order.
#[derive(Debug, Default)]
pub struct TransitionLog {
    events: Mutex<Vec<TransitionEvent>>,
}

impl TransitionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events received so far.
    pub fn events(&self) -> Vec<TransitionEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    pub fn len(&self) -> usize {
        self.events().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TransitionListener for TransitionLog {
    fn on_transition(&self, event: &TransitionEvent) {
        let mut events = self
            .events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        events.push(event.clone());
    }
}
