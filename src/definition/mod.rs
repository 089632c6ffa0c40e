//! Immutable workflow definitions.
//!
//! A definition is produced once by [`WorkflowBuilder`](crate::builder::WorkflowBuilder)
//! and shared by every workflow instance bound to a model. Cloning it only
//! clones a reference-counted handle.

mod graph;

use crate::core::{Guard, Hook, State, Transition};
use crate::engine::EventHandler;
use crate::events::TransitionListener;
use std::collections::HashMap;
use std::sync::Arc;

/// Guards and hooks resolved by target at construction time.
pub(crate) struct Handlers<M> {
    pub enter_checks: HashMap<String, Vec<Arc<Guard<M>>>>,
    pub exit_checks: HashMap<String, Vec<Arc<Guard<M>>>>,
    pub transition_checks: HashMap<String, Arc<Guard<M>>>,
    /// Registered hooks followed by the state's dedicated handler.
    pub enter_hooks: HashMap<String, Vec<Arc<Hook<M>>>>,
    pub exit_hooks: HashMap<String, Vec<Arc<Hook<M>>>>,
    pub before: HashMap<String, Arc<Hook<M>>>,
    pub bodies: HashMap<String, Arc<Hook<M>>>,
    pub after: HashMap<String, Arc<Hook<M>>>,
    pub events: HashMap<String, Arc<EventHandler<M>>>,
}

impl<M> Default for Handlers<M> {
    fn default() -> Self {
        Self {
            enter_checks: HashMap::new(),
            exit_checks: HashMap::new(),
            transition_checks: HashMap::new(),
            enter_hooks: HashMap::new(),
            exit_hooks: HashMap::new(),
            before: HashMap::new(),
            bodies: HashMap::new(),
            after: HashMap::new(),
            events: HashMap::new(),
        }
    }
}

struct Definition<M> {
    name: String,
    state_field: String,
    initial_state: String,
    states: Vec<State>,
    transitions: Vec<Transition>,
    handlers: Handlers<M>,
    listeners: Vec<Arc<dyn TransitionListener>>,
}

/// Validated states, transitions, guards and hooks of a workflow.
pub struct WorkflowDefinition<M> {
    inner: Arc<Definition<M>>,
}

impl<M> Clone for WorkflowDefinition<M> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<M> std::fmt::Debug for WorkflowDefinition<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowDefinition")
            .field("name", &self.inner.name)
            .field("state_field", &self.inner.state_field)
            .field("initial_state", &self.inner.initial_state)
            .field("states", &self.inner.states)
            .field("transitions", &self.inner.transitions)
            .finish_non_exhaustive()
    }
}

impl<M> WorkflowDefinition<M> {
    pub(crate) fn from_parts(
        name: String,
        state_field: String,
        initial_state: String,
        states: Vec<State>,
        transitions: Vec<Transition>,
        handlers: Handlers<M>,
        listeners: Vec<Arc<dyn TransitionListener>>,
    ) -> Self {
        Self {
            inner: Arc::new(Definition {
                name,
                state_field,
                initial_state,
                states,
                transitions,
                handlers,
                listeners,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Model field holding the current state.
    pub fn state_field(&self) -> &str {
        &self.inner.state_field
    }

    pub fn initial_state(&self) -> &str {
        &self.inner.initial_state
    }

    /// Declared states, in declaration order.
    pub fn states(&self) -> &[State] {
        &self.inner.states
    }

    pub fn state(&self, id: &str) -> Option<&State> {
        self.inner.states.iter().find(|s| s.id() == id)
    }

    /// Declared transitions, in declaration order.
    pub fn transitions(&self) -> &[Transition] {
        &self.inner.transitions
    }

    pub fn transition(&self, name: &str) -> Option<&Transition> {
        self.inner.transitions.iter().find(|t| t.name == name)
    }

    pub fn is_transition(&self, name: &str) -> bool {
        self.transition(name).is_some()
    }

    /// Transitions structurally available from `state`, checks ignored.
    pub fn transitions_from<'a>(&'a self, state: &'a str) -> impl Iterator<Item = &'a Transition> {
        self.inner.transitions.iter().filter(move |t| t.leaves(state))
    }

    /// Whether a handler is registered for the named event.
    pub fn is_event(&self, name: &str) -> bool {
        self.inner.handlers.events.contains_key(name)
    }

    pub(crate) fn event(&self, name: &str) -> Option<&Arc<EventHandler<M>>> {
        self.inner.handlers.events.get(name)
    }

    pub(crate) fn handlers(&self) -> &Handlers<M> {
        &self.inner.handlers
    }

    pub(crate) fn listeners(&self) -> &[Arc<dyn TransitionListener>] {
        &self.inner.listeners
    }
}
