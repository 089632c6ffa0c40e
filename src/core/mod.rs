//! Core workflow types.
//!
//! This module contains the building blocks shared by the definition
//! builder and the execution engine:
//! - Declared states and transition specs
//! - Guard predicates for transition control
//! - Hooks for enter/exit side effects
//! - Errors raised by user-provided guards and hooks

mod error;
mod guard;
mod hook;
mod state;
mod transition;

pub use error::{PersistenceError, ValidationError};
pub use guard::{Guard, GuardResult};
pub use hook::{Hook, HookResult};
pub use state::{State, WILDCARD};
pub use transition::{Source, Transition, TransitionAttempt};
