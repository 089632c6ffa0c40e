//! Resolved transition specs and per-call transition attempts.

use super::state::WILDCARD;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// States a transition may fire from.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Source {
    /// Any declared state (`*`).
    Any,
    /// One or more explicit states, in declaration order.
    States(Vec<String>),
}

impl Source {
    /// Whether `state` belongs to this source set.
    ///
    /// ```rust
    /// use pieuvre::core::Source;
    ///
    /// let source = Source::States(vec!["draft".into(), "rejected".into()]);
    /// assert!(source.contains("draft"));
    /// assert!(!source.contains("submitted"));
    /// assert!(Source::Any.contains("submitted"));
    /// ```
    pub fn contains(&self, state: &str) -> bool {
        match self {
            Self::Any => true,
            Self::States(states) => states.iter().any(|s| s == state),
        }
    }

    /// Explicit source states; empty for the wildcard.
    pub fn states(&self) -> &[String] {
        match self {
            Self::Any => &[],
            Self::States(states) => states,
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Self::Any)
    }
}

impl From<&str> for Source {
    fn from(state: &str) -> Self {
        if state == WILDCARD {
            Self::Any
        } else {
            Self::States(vec![state.to_string()])
        }
    }
}

impl From<Vec<&str>> for Source {
    fn from(states: Vec<&str>) -> Self {
        Self::States(states.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Source {
    fn from(states: [&str; N]) -> Self {
        Self::States(states.iter().map(|s| s.to_string()).collect())
    }
}

/// A named directed edge from one or more sources to exactly one destination.
///
/// Transitions are produced by the definition validator and never change
/// afterwards.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Transition {
    pub name: String,
    pub source: Source,
    pub destination: String,
    pub label: Option<String>,
    /// Model field stamped with the commit time when this transition fires.
    pub date_field: Option<String>,
}

impl Transition {
    /// Whether the transition may fire from `state`, ignoring checks.
    pub fn leaves(&self, state: &str) -> bool {
        self.source.contains(state)
    }
}

/// A candidate transition resolved against the model's current state.
///
/// Attempts live for a single call and have no identity beyond it.
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct TransitionAttempt {
    pub transition: String,
    pub label: Option<String>,
    pub from: String,
    pub to: String,
    /// Input the caller ran the transition with, `Null` when there is none.
    #[serde(skip_serializing_if = "Value::is_null")]
    pub payload: Value,
    /// Value produced by the transition body. `Null` until the body has run.
    #[serde(skip_serializing_if = "Value::is_null")]
    pub output: Value,
}

impl TransitionAttempt {
    pub(crate) fn resolve(transition: &Transition, from: &str) -> Self {
        Self {
            transition: transition.name.clone(),
            label: transition.label.clone(),
            from: from.to_string(),
            to: transition.destination.clone(),
            payload: Value::Null,
            output: Value::Null,
        }
    }

    pub(crate) fn with_payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }
}
