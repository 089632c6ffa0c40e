//! Builder for workflow definitions.

use crate::builder::error::ConfigurationError;
use crate::builder::validate::validate_definition;
use crate::config::{StateList, TransitionConfig, DEFAULT_STATE_FIELD};
use crate::core::{Guard, Hook, State};
use crate::definition::WorkflowDefinition;
use crate::engine::EventHandler;
use crate::events::TransitionListener;
use std::sync::Arc;

/// Registration slots. The names double as labels in configuration errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Slot {
    EnterCheck,
    ExitCheck,
    TransitionCheck,
    EnterHook,
    ExitHook,
    OnEnter,
    OnExit,
    Before,
    Body,
    After,
}

impl Slot {
    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::EnterCheck => "on-enter check",
            Self::ExitCheck => "on-exit check",
            Self::TransitionCheck => "transition check",
            Self::EnterHook => "on-enter hook",
            Self::ExitHook => "on-exit hook",
            Self::OnEnter => "on_enter handler",
            Self::OnExit => "on_exit handler",
            Self::Before => "before handler",
            Self::Body => "transition body",
            Self::After => "after handler",
        }
    }

    /// Whether the slot targets transitions rather than states.
    pub(crate) fn targets_transition(self) -> bool {
        matches!(
            self,
            Self::TransitionCheck | Self::Before | Self::Body | Self::After
        )
    }

    /// Whether at most one handler may be registered per target.
    pub(crate) fn is_unique(self) -> bool {
        !matches!(
            self,
            Self::EnterCheck | Self::ExitCheck | Self::EnterHook | Self::ExitHook
        )
    }
}

pub(crate) struct GuardRegistration<M> {
    pub slot: Slot,
    pub targets: Vec<String>,
    pub guard: Arc<Guard<M>>,
}

pub(crate) struct HookRegistration<M> {
    pub slot: Slot,
    pub targets: Vec<String>,
    pub hook: Arc<Hook<M>>,
}

/// Builder for workflow definitions with a fluent API.
///
/// Nothing is checked until [`build`](Self::build), which validates the whole
/// definition at once and reports every inconsistency it finds.
///
/// # Example
///
/// ```rust
/// use pieuvre::builder::WorkflowBuilder;
/// use pieuvre::core::{Guard, Hook, PersistenceError, TransitionAttempt};
/// use pieuvre::model::Model;
///
/// struct Order {
///     state: String,
///     paid: bool,
///     notes: Vec<String>,
/// }
///
/// impl Model for Order {
///     fn state(&self, _field: &str) -> Option<&str> {
///         Some(&self.state)
///     }
///     fn set_state(&mut self, _field: &str, state: &str) {
///         self.state = state.to_string();
///     }
///     fn save(&mut self) -> Result<(), PersistenceError> {
///         Ok(())
///     }
/// }
///
/// let workflow = WorkflowBuilder::<Order>::new("orders")
///     .state(("draft", "Draft"))
///     .state(("submitted", "Submitted"))
///     .state("rejected")
///     .transition("submit", "draft", "submitted")
///     .transition("reject", "*", "rejected")
///     .check("submit", Guard::new(|o: &Order| o.paid))
///     .on_enter("submitted", Hook::new(|o: &mut Order, _: &TransitionAttempt| {
///         o.notes.push("submitted".to_string());
///     }))
///     .build()
///     .unwrap();
///
/// assert_eq!(workflow.initial_state(), "draft");
/// assert!(workflow.is_transition("submit"));
/// ```
pub struct WorkflowBuilder<M> {
    pub(crate) name: String,
    pub(crate) state_field: String,
    pub(crate) initial_state: Option<String>,
    pub(crate) states: Vec<State>,
    pub(crate) transitions: Vec<TransitionConfig>,
    pub(crate) guards: Vec<GuardRegistration<M>>,
    pub(crate) hooks: Vec<HookRegistration<M>>,
    pub(crate) listeners: Vec<Arc<dyn TransitionListener>>,
    pub(crate) events: Vec<(String, Arc<EventHandler<M>>)>,
}

impl<M: 'static> WorkflowBuilder<M> {
    /// Create a new builder for a workflow called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state_field: DEFAULT_STATE_FIELD.to_string(),
            initial_state: None,
            states: Vec::new(),
            transitions: Vec::new(),
            guards: Vec::new(),
            hooks: Vec::new(),
            listeners: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Model field holding the current state (default `"state"`).
    pub fn state_field(mut self, field: impl Into<String>) -> Self {
        self.state_field = field.into();
        self
    }

    /// Initial state. Defaults to the first declared state.
    pub fn initial_state(mut self, state: impl Into<String>) -> Self {
        self.initial_state = Some(state.into());
        self
    }

    /// Declare a state.
    pub fn state(mut self, state: impl Into<State>) -> Self {
        self.states.push(state.into());
        self
    }

    /// Declare several states at once.
    pub fn states<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<State>,
    {
        self.states.extend(states.into_iter().map(Into::into));
        self
    }

    /// Declare a transition. Use `"*"` as source to leave from any state.
    pub fn transition(
        self,
        name: impl Into<String>,
        source: impl Into<StateList>,
        destination: impl Into<String>,
    ) -> Self {
        self.add_transition(TransitionConfig::new(name, source, destination))
    }

    /// Declare a fully described transition.
    pub fn add_transition(mut self, transition: TransitionConfig) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Declare several transitions at once.
    pub fn transitions(mut self, transitions: Vec<TransitionConfig>) -> Self {
        self.transitions.extend(transitions);
        self
    }

    /// Guard evaluated before entering any of `states`.
    pub fn on_enter_check(self, states: impl Into<StateList>, guard: Guard<M>) -> Self {
        self.guard(Slot::EnterCheck, states.into(), guard)
    }

    /// Guard evaluated before leaving any of `states`.
    pub fn on_exit_check(self, states: impl Into<StateList>, guard: Guard<M>) -> Self {
        self.guard(Slot::ExitCheck, states.into(), guard)
    }

    /// The dedicated check of one transition.
    pub fn check(self, transition: impl Into<String>, guard: Guard<M>) -> Self {
        self.guard(Slot::TransitionCheck, StateList::One(transition.into()), guard)
    }

    /// Hook run when entering any of `states`. Several may be registered.
    pub fn on_enter_hook(self, states: impl Into<StateList>, hook: Hook<M>) -> Self {
        self.hook(Slot::EnterHook, states.into(), hook)
    }

    /// Hook run when leaving any of `states`. Several may be registered.
    pub fn on_exit_hook(self, states: impl Into<StateList>, hook: Hook<M>) -> Self {
        self.hook(Slot::ExitHook, states.into(), hook)
    }

    /// The dedicated enter handler of a state, run after its registered hooks.
    pub fn on_enter(self, state: impl Into<String>, hook: Hook<M>) -> Self {
        self.hook(Slot::OnEnter, StateList::One(state.into()), hook)
    }

    /// The dedicated exit handler of a state, run after its registered hooks.
    pub fn on_exit(self, state: impl Into<String>, hook: Hook<M>) -> Self {
        self.hook(Slot::OnExit, StateList::One(state.into()), hook)
    }

    /// Callback run once the checks of a transition passed, before its body.
    pub fn before(self, transition: impl Into<String>, hook: Hook<M>) -> Self {
        self.hook(Slot::Before, StateList::One(transition.into()), hook)
    }

    /// Body of a transition, run before exit and enter hooks.
    pub fn body(self, transition: impl Into<String>, hook: Hook<M>) -> Self {
        self.hook(Slot::Body, StateList::One(transition.into()), hook)
    }

    /// Callback run after the enter hooks, before the state is written.
    pub fn after(self, transition: impl Into<String>, hook: Hook<M>) -> Self {
        self.hook(Slot::After, StateList::One(transition.into()), hook)
    }

    /// Listener notified after every committed transition.
    pub fn listener(mut self, listener: Arc<dyn TransitionListener>) -> Self {
        self.listeners.push(listener);
        self
    }

    /// Handler for events dispatched with
    /// [`Workflow::process_event`](crate::engine::Workflow::process_event).
    pub fn event(mut self, name: impl Into<String>, handler: EventHandler<M>) -> Self {
        self.events.push((name.into(), Arc::new(handler)));
        self
    }

    /// Validate the definition and freeze it.
    pub fn build(self) -> Result<WorkflowDefinition<M>, ConfigurationError> {
        validate_definition(self)
    }

    fn guard(mut self, slot: Slot, targets: StateList, guard: Guard<M>) -> Self {
        self.guards.push(GuardRegistration {
            slot,
            targets: targets.as_slice().to_vec(),
            guard: Arc::new(guard),
        });
        self
    }

    fn hook(mut self, slot: Slot, targets: StateList, hook: Hook<M>) -> Self {
        self.hooks.push(HookRegistration {
            slot,
            targets: targets.as_slice().to_vec(),
            hook: Arc::new(hook),
        });
        self
    }
}
