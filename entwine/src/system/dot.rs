//! Graphviz rendering of a system's dependency graph

use super::Components;
use crate::graph::Dependencies;
use petgraph::dot::Dot;
use petgraph::graph::DiGraph;
use std::collections::HashMap;

/// Renders the graph in DOT format
///
/// Edges point from a dependency to its consumer, matching start order.
/// An edge is labelled with the alias when the consumer renamed the
/// dependency, and left blank otherwise.
pub(super) fn render(components: &Components, dependencies: &Dependencies) -> String {
    let mut graph = DiGraph::<String, String>::new();
    let mut indices = HashMap::new();

    for name in components.keys() {
        let index = graph.add_node(name.to_string());
        indices.insert(name.clone(), index);
    }

    for (consumer, injections) in dependencies {
        let Some(&target) = indices.get(consumer) else {
            continue;
        };
        for (dependency, alias) in injections {
            if let Some(&source) = indices.get(dependency) {
                let label = if alias == dependency.as_str() {
                    String::new()
                } else {
                    alias.clone()
                };
                graph.add_edge(source, target, label);
            }
        }
    }

    format!("{}", Dot::new(&graph))
}
