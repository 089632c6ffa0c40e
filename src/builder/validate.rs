//! Eager validation of workflow definitions.
//!
//! Every rule is evaluated and all failures are accumulated with
//! `Validation`, so a broken definition reports all of its issues at once.

use crate::builder::error::{ConfigurationError, ConfigurationIssue};
use crate::builder::workflow::{Slot, WorkflowBuilder};
use crate::config::{StateList, TransitionConfig};
use crate::core::{Source, Transition, WILDCARD};
use crate::definition::{Handlers, WorkflowDefinition};
use std::collections::HashSet;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use tracing::debug;

type Check = Validation<(), NonEmptyVec<ConfigurationIssue>>;

fn ensure(ok: bool, issue: impl FnOnce() -> ConfigurationIssue) -> Check {
    if ok {
        Validation::success(())
    } else {
        Validation::fail(issue())
    }
}

/// Whether `name` can be used as a transition name (`[A-Za-z_][A-Za-z0-9_]*`).
pub fn is_valid_transition_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

fn check_states<M>(builder: &WorkflowBuilder<M>, checks: &mut Vec<Check>) {
    checks.push(ensure(!builder.states.is_empty(), || {
        ConfigurationIssue::NoStates
    }));

    let mut seen = HashSet::new();
    for state in &builder.states {
        let id = state.id();
        checks.push(ensure(!id.is_empty() && id != WILDCARD, || {
            ConfigurationIssue::InvalidState {
                state: id.to_string(),
            }
        }));
        checks.push(ensure(seen.insert(id), || ConfigurationIssue::DuplicateState {
            state: id.to_string(),
        }));
    }

    if let Some(initial) = &builder.initial_state {
        checks.push(ensure(
            builder.states.iter().any(|s| s.id() == initial),
            || ConfigurationIssue::UnknownInitialState {
                state: initial.clone(),
            },
        ));
    }
}

fn check_transition(
    transition: &TransitionConfig,
    declared: &HashSet<&str>,
    checks: &mut Vec<Check>,
) {
    let name = &transition.name;

    checks.push(ensure(is_valid_transition_name(name), || {
        ConfigurationIssue::InvalidTransitionName { name: name.clone() }
    }));

    match &transition.source {
        StateList::One(state) if state == WILDCARD => {}
        source => {
            checks.push(ensure(!source.as_slice().is_empty(), || {
                ConfigurationIssue::EmptySource {
                    transition: name.clone(),
                }
            }));
            for state in source.as_slice() {
                checks.push(ensure(declared.contains(state.as_str()), || {
                    ConfigurationIssue::UnknownSource {
                        transition: name.clone(),
                        state: state.clone(),
                    }
                }));
            }
        }
    }

    let destinations = transition.destination.as_slice();
    checks.push(ensure(!destinations.is_empty(), || {
        ConfigurationIssue::MissingDestination {
            transition: name.clone(),
        }
    }));
    checks.push(ensure(destinations.len() <= 1, || {
        ConfigurationIssue::MultipleDestinations {
            transition: name.clone(),
            destinations: destinations.to_vec(),
        }
    }));
    for state in destinations {
        checks.push(ensure(declared.contains(state.as_str()), || {
            ConfigurationIssue::UnknownDestination {
                transition: name.clone(),
                state: state.clone(),
            }
        }));
    }
}

fn check_handler_targets(
    registrations: impl Iterator<Item = (Slot, Vec<String>)>,
    states: &HashSet<&str>,
    transitions: &HashSet<&str>,
    checks: &mut Vec<Check>,
) {
    let mut unique = HashSet::new();
    for (slot, targets) in registrations {
        for target in targets {
            if slot.targets_transition() {
                checks.push(ensure(transitions.contains(target.as_str()), || {
                    ConfigurationIssue::UnknownHandlerTransition {
                        slot: slot.label(),
                        transition: target.clone(),
                    }
                }));
            } else {
                checks.push(ensure(states.contains(target.as_str()), || {
                    ConfigurationIssue::UnknownHandlerState {
                        slot: slot.label(),
                        state: target.clone(),
                    }
                }));
            }
            if slot.is_unique() {
                let first = unique.insert((slot.label(), target.clone()));
                checks.push(ensure(first, || ConfigurationIssue::DuplicateHandler {
                    slot: slot.label(),
                    target: target.clone(),
                }));
            }
        }
    }
}

fn resolve_transition(config: TransitionConfig) -> Transition {
    let source = match config.source {
        StateList::One(state) if state == WILDCARD => Source::Any,
        other => Source::States(other.as_slice().to_vec()),
    };
    let destination = config
        .destination
        .as_slice()
        .first()
        .cloned()
        .unwrap_or_default();

    Transition {
        name: config.name,
        source,
        destination,
        label: config.label,
        date_field: config.date_field,
    }
}

fn resolve_handlers<M>(builder: &mut WorkflowBuilder<M>) -> Handlers<M> {
    let mut handlers = Handlers::default();

    for registration in builder.guards.drain(..) {
        for target in registration.targets {
            let guard = registration.guard.clone();
            match registration.slot {
                Slot::EnterCheck => handlers.enter_checks.entry(target).or_default().push(guard),
                Slot::ExitCheck => handlers.exit_checks.entry(target).or_default().push(guard),
                _ => {
                    handlers.transition_checks.insert(target, guard);
                }
            }
        }
    }

    // Registered hooks first, then the dedicated handler of the state.
    let mut hooks = std::mem::take(&mut builder.hooks);
    hooks.sort_by_key(|r| matches!(r.slot, Slot::OnEnter | Slot::OnExit));
    for registration in hooks {
        for target in registration.targets {
            let hook = registration.hook.clone();
            match registration.slot {
                Slot::EnterHook | Slot::OnEnter => {
                    handlers.enter_hooks.entry(target).or_default().push(hook)
                }
                Slot::ExitHook | Slot::OnExit => {
                    handlers.exit_hooks.entry(target).or_default().push(hook)
                }
                Slot::Before => {
                    handlers.before.insert(target, hook);
                }
                Slot::Body => {
                    handlers.bodies.insert(target, hook);
                }
                _ => {
                    handlers.after.insert(target, hook);
                }
            }
        }
    }

    handlers.events = builder.events.drain(..).collect();
    handlers
}

/// Validate a builder and produce the immutable definition.
///
/// Fails with every issue found: duplicated or invalid names, references
/// to undeclared states, transitions with zero or several destinations and
/// handlers attached to unknown or already handled targets.
pub fn validate_definition<M>(
    mut builder: WorkflowBuilder<M>,
) -> Result<WorkflowDefinition<M>, ConfigurationError> {
    let mut checks = Vec::new();
    check_states(&builder, &mut checks);

    let declared: HashSet<&str> = builder.states.iter().map(|s| s.id()).collect();
    let mut names = HashSet::new();
    for transition in &builder.transitions {
        checks.push(ensure(names.insert(transition.name.as_str()), || {
            ConfigurationIssue::DuplicateTransition {
                name: transition.name.clone(),
            }
        }));
        check_transition(transition, &declared, &mut checks);
    }

    let registrations = builder
        .guards
        .iter()
        .map(|r| (r.slot, r.targets.clone()))
        .chain(builder.hooks.iter().map(|r| (r.slot, r.targets.clone())));
    check_handler_targets(registrations, &declared, &names, &mut checks);

    let mut events = HashSet::new();
    for (name, _) in &builder.events {
        checks.push(ensure(events.insert(name.as_str()), || {
            ConfigurationIssue::DuplicateEvent { name: name.clone() }
        }));
    }

    if let Validation::Failure(errors) = Validation::all_vec(checks).map(|_| ()) {
        return Err(ConfigurationError {
            workflow: builder.name,
            issues: errors.iter().cloned().collect(),
        });
    }

    let handlers = resolve_handlers(&mut builder);
    let initial_state = match builder.initial_state.take() {
        Some(state) => state,
        None => builder
            .states
            .first()
            .map(|s| s.id().to_string())
            .unwrap_or_default(),
    };
    let transitions: Vec<Transition> = builder
        .transitions
        .into_iter()
        .map(resolve_transition)
        .collect();

    debug!(
        workflow = %builder.name,
        states = builder.states.len(),
        transitions = transitions.len(),
        "Workflow definition validated"
    );

    Ok(WorkflowDefinition::from_parts(
        builder.name,
        builder.state_field,
        initial_state,
        builder.states,
        transitions,
        handlers,
        builder.listeners,
    ))
}
