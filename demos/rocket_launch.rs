//! Rocket Launch
//!
//! This demo walks a rocket through its launch workflow.
//!
//! Key concepts:
//! - State checks on entering and leaving states
//! - Guards explaining a rejection with a validation error
//! - Enter/exit hooks and a transition body
//! - Auto-advance when a single transition is legal
//! - Listening to committed transitions
//!
//! Run with: RUST_LOG=debug cargo run --example rocket_launch

use pieuvre::builder::WorkflowBuilder;
use pieuvre::core::{Guard, Hook, PersistenceError, TransitionAttempt, ValidationError};
use pieuvre::definition::WorkflowDefinition;
use pieuvre::engine::Workflow;
use pieuvre::events::TransitionLog;
use pieuvre::model::Model;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
struct Rocket {
    status: String,
    fuel: u32,
    payload_kg: u32,
    altitude_km: u32,
    revision: u32,
}

impl Model for Rocket {
    fn state(&self, field: &str) -> Option<&str> {
        (field == "status").then_some(self.status.as_str())
    }

    fn set_state(&mut self, _field: &str, state: &str) {
        self.status = state.to_string();
    }

    fn save(&mut self) -> Result<(), PersistenceError> {
        self.revision += 1;
        println!("  [db] saved rocket in '{}' (rev {})", self.status, self.revision);
        Ok(())
    }
}

fn rocket_workflow(log: Arc<TransitionLog>) -> WorkflowDefinition<Rocket> {
    WorkflowBuilder::new("rocket")
        .state_field("status")
        .state(("on_launchpad", "On launchpad"))
        .state(("in_flight", "In flight"))
        .state(("in_orbit", "In orbit"))
        .state(("crashed", "Crashed"))
        .transition("launch", "on_launchpad", "in_flight")
        .transition("reach_orbit", "in_flight", "in_orbit")
        .transition("crash", "in_flight", "crashed")
        .on_exit_check(
            "on_launchpad",
            Guard::new(|r: &Rocket| r.fuel >= 100).described("fuel tank full"),
        )
        .on_enter_check(
            "in_flight",
            Guard::fallible(|r: &Rocket| {
                if r.payload_kg == 0 {
                    return Err(ValidationError::new("Put some load on that rocket!"));
                }
                Ok(true)
            }),
        )
        .check("reach_orbit", Guard::new(|r: &Rocket| r.altitude_km >= 160))
        .check("crash", Guard::new(|r: &Rocket| r.fuel == 0))
        .body(
            "launch",
            Hook::new(|r: &mut Rocket, _: &TransitionAttempt| {
                r.fuel -= 60;
                r.altitude_km = 200;
            }),
        )
        .on_exit(
            "on_launchpad",
            Hook::new(|_: &mut Rocket, attempt: &TransitionAttempt| {
                println!("  Ignition! ({})", attempt.transition);
            }),
        )
        .on_enter(
            "in_orbit",
            Hook::new(|r: &mut Rocket, _: &TransitionAttempt| {
                println!("  Orbit reached at {} km", r.altitude_km);
            }),
        )
        .listener(log)
        .build()
        .expect("rocket workflow is valid")
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Rocket Launch Workflow ===\n");

    let log = Arc::new(TransitionLog::new());
    let definition = rocket_workflow(log.clone());

    if let Some(dot) = definition.to_dot() {
        println!("Graph:\n{dot}\n");
    }

    let mut rocket = Rocket {
        status: "on_launchpad".to_string(),
        fuel: 40,
        payload_kg: 0,
        altitude_km: 0,
        revision: 0,
    };

    println!("1. Launch with a half-empty tank:");
    match Workflow::new(definition.clone(), &mut rocket).run_transition("launch") {
        Ok(_) => println!("  Launched"),
        Err(e) => println!("  Rejected: {e}"),
    }

    println!("\n2. Fill the tank, launch without payload:");
    rocket.fuel = 100;
    match Workflow::new(definition.clone(), &mut rocket).run_transition("launch") {
        Ok(_) => println!("  Launched"),
        Err(e) => println!("  Rejected: {e}"),
    }

    println!("\n3. Load the rocket and launch:");
    rocket.payload_kg = 1_200;
    let mut workflow = Workflow::new(definition.clone(), &mut rocket);
    for next in workflow.next_available_states(true).unwrap_or_default() {
        println!("  Could go to '{}' via '{}'", next.state, next.transition);
    }
    if let Err(e) = workflow.run_transition("launch") {
        println!("  Rejected: {e}");
    }

    println!("\n4. Let the workflow pick the next step:");
    match workflow.advance() {
        Ok(attempt) => println!("  Advanced {} -> {}", attempt.from, attempt.to),
        Err(e) => println!("  Could not advance: {e}"),
    }

    println!("\nFinal state: {:?}", rocket);
    println!("\nCommitted transitions:");
    for event in log.events() {
        println!(
            "  {} {}: {} -> {} at {}",
            event.id, event.transition, event.from, event.to, event.occurred_at
        );
    }
}
