//! Order Processing From Configuration
//!
//! This demo declares an order workflow in TOML and attaches the callables
//! in code.
//!
//! Key concepts:
//! - Loading states and transitions from a config file
//! - Wildcard sources and labelled states
//! - Date fields stamped on commit
//! - Picking a workflow per model with `SelectWorkflow`
//!
//! Run with: RUST_LOG=info cargo run --example order_config

use chrono::{DateTime, Utc};
use pieuvre::config::WorkflowConfig;
use pieuvre::core::{Guard, Hook, PersistenceError, TransitionAttempt};
use pieuvre::definition::WorkflowDefinition;
use pieuvre::model::{Model, SelectWorkflow};
use std::collections::HashMap;
use tracing_subscriber::EnvFilter;

const ORDER_WORKFLOW: &str = r#"
name = "orders"
initial_state = "draft"

states = [
    { id = "draft", label = "Draft" },
    { id = "submitted", label = "Submitted" },
    { id = "completed", label = "Completed" },
    "rejected",
]

[[transitions]]
name = "submit"
source = "draft"
destination = "submitted"
label = "Submit order"
date_field = "submitted_at"

[[transitions]]
name = "complete"
source = "submitted"
destination = "completed"
date_field = "completed_at"

[[transitions]]
name = "reject"
source = "*"
destination = "rejected"
"#;

#[derive(Debug)]
struct Order {
    reference: String,
    state: String,
    lines: Vec<u32>,
    express: bool,
    dates: HashMap<String, DateTime<Utc>>,
}

impl Model for Order {
    fn state(&self, _field: &str) -> Option<&str> {
        Some(&self.state)
    }

    fn set_state(&mut self, _field: &str, state: &str) {
        self.state = state.to_string();
    }

    fn touch(&mut self, field: &str, at: DateTime<Utc>) {
        self.dates.insert(field.to_string(), at);
    }

    fn save(&mut self) -> Result<(), PersistenceError> {
        println!("  [db] {} saved as '{}'", self.reference, self.state);
        Ok(())
    }
}

fn standard_workflow() -> WorkflowDefinition<Order> {
    let config = WorkflowConfig::from_toml(ORDER_WORKFLOW).expect("bundled config parses");
    config
        .into_builder()
        .check("submit", Guard::new(|o: &Order| !o.lines.is_empty()))
        .check("reject", Guard::new(|o: &Order| o.state != "rejected"))
        .on_enter(
            "completed",
            Hook::new(|o: &mut Order, _: &TransitionAttempt| {
                println!("  Invoice sent for {}", o.reference);
            }),
        )
        .build()
        .expect("standard workflow is valid")
}

fn express_workflow() -> WorkflowDefinition<Order> {
    let mut config = WorkflowConfig::from_toml(ORDER_WORKFLOW).expect("bundled config parses");
    config.name = "express_orders".to_string();
    config.transitions.retain(|t| t.name != "reject");
    config.into_builder().build().expect("express workflow is valid")
}

impl SelectWorkflow for Order {
    fn select_workflow(&self) -> WorkflowDefinition<Self> {
        if self.express {
            express_workflow()
        } else {
            standard_workflow()
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Order Workflow From Config ===\n");

    for express in [false, true] {
        let mut order = Order {
            reference: if express { "EXP-7" } else { "STD-42" }.to_string(),
            state: "draft".to_string(),
            lines: vec![3, 1],
            express,
            dates: HashMap::new(),
        };

        let mut workflow = order.workflow();
        println!("Order follows '{}'", workflow.definition().name());

        match workflow.available_transitions(true) {
            Ok(transitions) => {
                for attempt in transitions {
                    println!("  available: {} -> {}", attempt.transition, attempt.to);
                }
            }
            Err(e) => println!("  cannot list transitions: {e}"),
        }

        if let Err(e) = workflow.run_transition("submit") {
            println!("  submit failed: {e}");
        }
        match workflow.advance() {
            Ok(attempt) => println!("  advanced to {}", attempt.to),
            Err(e) => println!("  advance failed: {e}"),
        }

        let mut stamps: Vec<_> = order.dates.keys().cloned().collect();
        stamps.sort();
        println!("  final state '{}', stamped {:?}\n", order.state, stamps);
    }
}
