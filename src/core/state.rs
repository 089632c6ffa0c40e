//! Declared workflow states.
//!
//! A state is a plain identifier plus a human-readable label. Identifiers are
//! what the host model stores in its state field; labels are for display.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Source marker matching every declared state.
pub const WILDCARD: &str = "*";

/// A named, discrete condition of the host model.
///
/// # Example
///
/// ```rust
/// use pieuvre::core::State;
///
/// let draft = State::new("draft", "Draft");
/// assert_eq!(draft.id(), "draft");
/// assert_eq!(draft.label(), "Draft");
///
/// let bare = State::from_id("submitted");
/// assert_eq!(bare.label(), "submitted");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct State {
    id: String,
    label: String,
}

impl State {
    /// Create a state with an explicit label.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }

    /// Create a state whose label is its identifier.
    pub fn from_id(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
        }
    }

    /// Identifier stored in the host model's state field.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Human-readable label.
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

impl From<&str> for State {
    fn from(id: &str) -> Self {
        Self::from_id(id)
    }
}

impl From<(&str, &str)> for State {
    fn from((id, label): (&str, &str)) -> Self {
        Self::new(id, label)
    }
}
