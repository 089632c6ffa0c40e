//! Graphviz rendering of workflow definitions.

use super::WorkflowDefinition;
use crate::core::{Source, WILDCARD};

fn quote(id: &str) -> String {
    format!("\"{}\"", id.replace('\\', "\\\\").replace('"', "\\\""))
}

impl<M> WorkflowDefinition<M> {
    /// Render the transitions as a Graphviz digraph.
    ///
    /// One edge is drawn per source state, labelled with the transition name.
    /// Wildcard transitions leave from a `*` node. Returns `None` when the
    /// workflow declares no transitions.
    ///
    /// ```rust
    /// use pieuvre::builder::WorkflowBuilder;
    ///
    /// let definition = WorkflowBuilder::<()>::new("doors")
    ///     .states(["open", "closed"])
    ///     .transition("close", "open", "closed")
    ///     .build()
    ///     .unwrap();
    ///
    /// let dot = definition.to_dot().unwrap();
    /// assert!(dot.contains("\"open\" -> \"closed\" [label=\"close\"];"));
    /// ```
    pub fn to_dot(&self) -> Option<String> {
        if self.transitions().is_empty() {
            return None;
        }

        let mut dot = format!("digraph {} {{\n", quote(self.name()));
        for transition in self.transitions() {
            let sources: Vec<&str> = match &transition.source {
                Source::Any => vec![WILDCARD],
                Source::States(states) => states.iter().map(String::as_str).collect(),
            };
            for source in sources {
                dot.push_str(&format!(
                    "    {} -> {} [label={}];\n",
                    quote(source),
                    quote(&transition.destination),
                    quote(&transition.name)
                ));
            }
        }
        dot.push('}');
        Some(dot)
    }
}
