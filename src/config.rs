//! Declarative workflow definitions loaded from TOML or JSON.
//!
//! States and transitions can be described as data. Guards and hooks are
//! code, so they are attached afterwards through [`WorkflowBuilder`].
//!
//! ```rust
//! use pieuvre::config::WorkflowConfig;
//!
//! let config = WorkflowConfig::from_toml(r#"
//!     name = "orders"
//!     states = ["draft", { id = "submitted", label = "Submitted" }, "rejected"]
//!
//!     [[transitions]]
//!     name = "submit"
//!     source = "draft"
//!     destination = "submitted"
//!
//!     [[transitions]]
//!     name = "reject"
//!     source = "*"
//!     destination = "rejected"
//! "#).unwrap();
//!
//! assert_eq!(config.state_field, "state");
//! assert_eq!(config.transitions.len(), 2);
//! ```

use crate::builder::WorkflowBuilder;
use crate::core::State;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default name of the model field holding the current state.
pub const DEFAULT_STATE_FIELD: &str = "state";

fn default_state_field() -> String {
    DEFAULT_STATE_FIELD.to_string()
}

/// Errors that can occur while loading a workflow description.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("Failed to parse TOML workflow: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Failed to parse JSON workflow: {0}")]
    Json(#[from] serde_json::Error),
}

/// One state identifier or several of them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StateList {
    One(String),
    Many(Vec<String>),
}

impl StateList {
    pub fn as_slice(&self) -> &[String] {
        match self {
            Self::One(state) => std::slice::from_ref(state),
            Self::Many(states) => states,
        }
    }
}

impl From<&str> for StateList {
    fn from(state: &str) -> Self {
        Self::One(state.to_string())
    }
}

impl From<String> for StateList {
    fn from(state: String) -> Self {
        Self::One(state)
    }
}

impl From<Vec<&str>> for StateList {
    fn from(states: Vec<&str>) -> Self {
        Self::Many(states.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<String>> for StateList {
    fn from(states: Vec<String>) -> Self {
        Self::Many(states)
    }
}

impl<const N: usize> From<[&str; N]> for StateList {
    fn from(states: [&str; N]) -> Self {
        Self::Many(states.iter().map(|s| s.to_string()).collect())
    }
}

/// State descriptor: a bare identifier or an identifier with a label.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StateConfig {
    Id(String),
    Labelled { id: String, label: Option<String> },
}

impl From<StateConfig> for State {
    fn from(config: StateConfig) -> Self {
        match config {
            StateConfig::Id(id) | StateConfig::Labelled { id, label: None } => State::from_id(id),
            StateConfig::Labelled {
                id,
                label: Some(label),
            } => State::new(id, label),
        }
    }
}

/// Transition descriptor as declared, before validation.
///
/// `destination` accepts a list so that a definition declaring several
/// destinations can be reported instead of failing to parse.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionConfig {
    pub name: String,
    pub source: StateList,
    pub destination: StateList,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub date_field: Option<String>,
}

impl TransitionConfig {
    pub fn new(
        name: impl Into<String>,
        source: impl Into<StateList>,
        destination: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            destination: StateList::One(destination.into()),
            label: None,
            date_field: None,
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Model field stamped with the commit time of this transition.
    pub fn date_field(mut self, field: impl Into<String>) -> Self {
        self.date_field = Some(field.into());
        self
    }
}

/// Serializable description of a workflow's states and transitions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowConfig {
    pub name: String,
    #[serde(default = "default_state_field")]
    pub state_field: String,
    #[serde(default)]
    pub initial_state: Option<String>,
    pub states: Vec<StateConfig>,
    #[serde(default)]
    pub transitions: Vec<TransitionConfig>,
}

impl WorkflowConfig {
    pub fn from_toml(source: &str) -> Result<Self, ConfigLoadError> {
        Ok(toml::from_str(source)?)
    }

    pub fn from_json(source: &str) -> Result<Self, ConfigLoadError> {
        Ok(serde_json::from_str(source)?)
    }

    /// Start a builder from this description.
    pub fn into_builder<M: 'static>(self) -> WorkflowBuilder<M> {
        let mut builder = WorkflowBuilder::new(self.name)
            .state_field(self.state_field)
            .states(self.states.into_iter().map(State::from))
            .transitions(self.transitions);
        if let Some(initial) = self.initial_state {
            builder = builder.initial_state(initial);
        }
        builder
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_accepts_mixed_state_descriptors() {
        let config = WorkflowConfig::from_toml(
            r#"
            name = "rockets"
            state_field = "status"
            initial_state = "on_launchpad"
            states = ["on_launchpad", { id = "in_flight", label = "In flight" }]

            [[transitions]]
            name = "launch"
            source = "on_launchpad"
            destination = "in_flight"
            label = "Launch"
            date_field = "launched_at"
            "#,
        )
        .unwrap();

        assert_eq!(config.state_field, "status");
        assert_eq!(config.initial_state.as_deref(), Some("on_launchpad"));
        assert_eq!(
            config.states[1],
            StateConfig::Labelled {
                id: "in_flight".to_string(),
                label: Some("In flight".to_string()),
            }
        );
        assert_eq!(
            config.transitions[0],
            TransitionConfig::new("launch", "on_launchpad", "in_flight")
                .label("Launch")
                .date_field("launched_at")
        );
    }

    #[test]
    fn json_accepts_source_lists() {
        let config = WorkflowConfig::from_json(
            r#"{
                "name": "orders",
                "states": ["draft", "submitted", "rejected"],
                "transitions": [
                    {"name": "reject", "source": ["draft", "submitted"], "destination": "rejected"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(config.state_field, DEFAULT_STATE_FIELD);
        assert_eq!(
            config.transitions[0].source,
            StateList::from(["draft", "submitted"])
        );
    }

    #[test]
    fn list_destination_parses_for_later_rejection() {
        let config = WorkflowConfig::from_json(
            r#"{
                "name": "split",
                "states": ["a", "b", "c"],
                "transitions": [{"name": "fork", "source": "a", "destination": ["b", "c"]}]
            }"#,
        )
        .unwrap();

        assert_eq!(config.transitions[0].destination.as_slice().len(), 2);
    }

    #[test]
    fn malformed_input_is_reported() {
        let err = WorkflowConfig::from_json(r#"{"states": []}"#).unwrap_err();
        assert!(matches!(err, ConfigLoadError::Json(_)));

        let err = WorkflowConfig::from_toml("name = ").unwrap_err();
        assert!(matches!(err, ConfigLoadError::Toml(_)));
    }

    #[test]
    fn labelled_state_without_label_uses_id() {
        let state: State = StateConfig::Labelled {
            id: "draft".to_string(),
            label: None,
        }
        .into();
        assert_eq!(state.label(), "draft");
    }
}
