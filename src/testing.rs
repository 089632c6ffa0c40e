//! Assertions for exercising workflow definitions in tests.
//!
//! Enabled by the `testing` feature.

use crate::definition::WorkflowDefinition;
use crate::engine::Workflow;
use crate::model::Model;
use std::fmt::Debug;

/// Run every transition from each of its source states and assert that it
/// commits.
///
/// `factory` receives the transition name and the source state, and must
/// return a fresh model sitting in that state with whatever data makes the
/// transition's guards pass. Wildcard transitions are tried from every
/// declared state other than their destination. All failures are collected
/// before panicking.
///
/// # Panics
///
/// If any transition fails to run or leaves the model outside its
/// destination.
pub fn assert_all_transitions<M, F>(definition: &WorkflowDefinition<M>, factory: F)
where
    M: Model,
    F: FnMut(&str, &str) -> M,
{
    assert_all_transitions_except(definition, &[], factory);
}

/// Same as [`assert_all_transitions`], skipping the transitions named in
/// `ignore`.
///
/// # Panics
///
/// If a transition not listed in `ignore` fails, or if `ignore` names a
/// transition the workflow does not declare.
pub fn assert_all_transitions_except<M, F>(
    definition: &WorkflowDefinition<M>,
    ignore: &[&str],
    mut factory: F,
) where
    M: Model,
    F: FnMut(&str, &str) -> M,
{
    let mut failures: Vec<String> = ignore
        .iter()
        .filter(|name| !definition.is_transition(name))
        .map(|name| format!("{name}: ignored transition is not declared"))
        .collect();

    for transition in definition.transitions() {
        if ignore.contains(&transition.name.as_str()) {
            continue;
        }
        let sources: Vec<&str> = if transition.source.is_wildcard() {
            definition
                .states()
                .iter()
                .map(|s| s.id())
                .filter(|id| *id != transition.destination)
                .collect()
        } else {
            transition.source.states().iter().map(String::as_str).collect()
        };

        for source in sources {
            let mut model = factory(&transition.name, source);
            let result =
                Workflow::new(definition.clone(), &mut model).run_transition(&transition.name);
            match result {
                Err(err) => failures.push(format!("{} from {source}: {err}", transition.name)),
                Ok(_) => {
                    let reached = model.state(definition.state_field());
                    if reached != Some(transition.destination.as_str()) {
                        failures.push(format!(
                            "{} from {source}: expected {}, model is in {:?}",
                            transition.name, transition.destination, reached
                        ));
                    }
                }
            }
        }
    }

    assert!(
        failures.is_empty(),
        "workflow '{}' has failing transitions:\n{}",
        definition.name(),
        failures.join("\n")
    );
}

/// Assert that listing available transitions does not change the model.
///
/// Lists twice, comparing both the listings and snapshots of the model taken
/// around them.
///
/// # Panics
///
/// If a guard mutates observable model state, if the two listings differ, or
/// if a guard raises an error.
pub fn assert_guards_side_effect_free<M>(workflow: &Workflow<'_, M>)
where
    M: Model + Clone + PartialEq + Debug,
{
    let before = workflow.model().clone();

    let first = workflow
        .available_transitions(false)
        .unwrap_or_else(|err| panic!("listing available transitions failed: {err}"));
    let second = workflow
        .available_transitions(false)
        .unwrap_or_else(|err| panic!("listing available transitions failed: {err}"));

    assert_eq!(
        &before,
        workflow.model(),
        "guards mutated the model while listing transitions"
    );
    assert_eq!(first, second, "listing available transitions is not stable");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::WorkflowBuilder;
    use crate::core::{Guard, PersistenceError};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[derive(Clone, Debug, PartialEq)]
    struct Shipment {
        state: String,
        weight: u32,
    }

    impl Model for Shipment {
        fn state(&self, _field: &str) -> Option<&str> {
            Some(&self.state)
        }

        fn set_state(&mut self, _field: &str, state: &str) {
            self.state = state.to_string();
        }

        fn save(&mut self) -> Result<(), PersistenceError> {
            Ok(())
        }
    }

    fn shipments() -> WorkflowBuilder<Shipment> {
        WorkflowBuilder::new("shipments")
            .states(["packed", "shipped", "delivered", "lost"])
            .transition("ship", "packed", "shipped")
            .transition("deliver", "shipped", "delivered")
            .transition("lose", "*", "lost")
            .check("ship", Guard::new(|s: &Shipment| s.weight > 0))
    }

    fn shipment(state: &str, weight: u32) -> Shipment {
        Shipment {
            state: state.to_string(),
            weight,
        }
    }

    #[test]
    fn every_transition_commits() {
        let definition = shipments().build().unwrap();
        assert_all_transitions(&definition, |_, source| shipment(source, 5));
    }

    #[test]
    #[should_panic(expected = "ship from packed")]
    fn failing_transition_is_reported() {
        let definition = shipments().build().unwrap();
        assert_all_transitions(&definition, |_, source| shipment(source, 0));
    }

    #[test]
    fn ignored_transitions_are_skipped() {
        let definition = shipments().build().unwrap();
        let mut tried = Vec::new();

        assert_all_transitions_except(&definition, &["ship"], |name, source| {
            tried.push(name.to_string());
            shipment(source, 0)
        });

        assert!(!tried.iter().any(|name| name == "ship"));
        assert!(tried.iter().any(|name| name == "deliver"));
    }

    #[test]
    #[should_panic(expected = "teleport: ignored transition is not declared")]
    fn ignoring_unknown_transition_is_reported() {
        let definition = shipments().build().unwrap();
        assert_all_transitions_except(&definition, &["teleport"], |_, source| shipment(source, 5));
    }

    /// Model that silently ignores writes once shipped.
    #[derive(Clone, Debug, PartialEq)]
    struct Stuck(Shipment);

    impl Model for Stuck {
        fn state(&self, _field: &str) -> Option<&str> {
            Some(&self.0.state)
        }

        fn set_state(&mut self, _field: &str, state: &str) {
            if self.0.state != "shipped" {
                self.0.state = state.to_string();
            }
        }

        fn save(&mut self) -> Result<(), PersistenceError> {
            Ok(())
        }
    }

    #[test]
    #[should_panic(expected = "expected delivered")]
    fn destination_not_reached_is_reported() {
        let definition = WorkflowBuilder::new("shipments")
            .states(["shipped", "delivered"])
            .transition("deliver", "shipped", "delivered")
            .build()
            .unwrap();

        assert_all_transitions(&definition, |_, source| Stuck(shipment(source, 1)));
    }

    #[test]
    fn pure_guards_pass_detection() {
        let definition = shipments().build().unwrap();
        let mut model = shipment("packed", 3);
        let workflow = Workflow::new(definition, &mut model);

        assert_guards_side_effect_free(&workflow);
    }

    #[test]
    #[should_panic(expected = "listing available transitions is not stable")]
    fn flapping_guard_is_detected() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let definition = shipments()
            .check(
                "deliver",
                Guard::new(move |_: &Shipment| counter.fetch_add(1, Ordering::SeqCst) % 2 == 0),
            )
            .build()
            .unwrap();
        let mut model = shipment("shipped", 3);
        let workflow = Workflow::new(definition, &mut model);

        assert_guards_side_effect_free(&workflow);
    }
}
