//! Structural validation of a dependency graph
//!
//! Runs once, synchronously, when a system is built. A graph that passes has
//! no dangling references and no cycles, and nothing downstream checks again.

use super::error::{GraphError, GraphResult};
use super::{ComponentName, Dependencies, Injections};
use std::collections::{BTreeMap, HashSet};
use std::iter::Flatten;
use std::option;

/// Validates `dependencies` against the set of known components
///
/// Checks, in order:
/// - every consumer with a declaration is a known component
/// - every referenced dependency is a known component
/// - the graph is acyclic
pub fn validate<V>(
    components: &BTreeMap<ComponentName, V>,
    dependencies: &Dependencies,
) -> GraphResult<()> {
    for (consumer, injections) in dependencies {
        if !components.contains_key(consumer) {
            return Err(GraphError::undeclared(consumer.clone()));
        }
        for dependency in injections.keys() {
            if !components.contains_key(dependency) {
                return Err(GraphError::unknown_component(
                    dependency.clone(),
                    consumer.clone(),
                ));
            }
        }
    }

    let mut search = CycleSearch::new(dependencies);
    for name in components.keys() {
        search.visit(name)?;
    }

    Ok(())
}

/// Depth-first cycle search
///
/// `path` is the ordered set of nodes on the current branch; `on_path`
/// mirrors it for constant-time membership. `done` memoizes nodes whose
/// whole subgraph is already known to be acyclic, so each edge is walked
/// once per validation. Branches are tracked on an explicit frame stack,
/// so chain depth is bounded by the heap rather than the call stack.
struct CycleSearch<'a> {
    dependencies: &'a Dependencies,
    path: Vec<ComponentName>,
    on_path: HashSet<ComponentName>,
    done: HashSet<ComponentName>,
}

/// Remaining dependencies of one node on the current branch
type Frame<'a> = Flatten<option::IntoIter<&'a Injections>>;

impl<'a> CycleSearch<'a> {
    fn new(dependencies: &'a Dependencies) -> Self {
        Self {
            dependencies,
            path: Vec::new(),
            on_path: HashSet::new(),
            done: HashSet::new(),
        }
    }

    fn visit(&mut self, root: &ComponentName) -> GraphResult<()> {
        if self.done.contains(root) {
            return Ok(());
        }

        let mut frames = vec![self.enter(root)];

        while let Some(frame) = frames.last_mut() {
            match frame.next().map(|(dependency, _)| dependency) {
                Some(dependency) if self.on_path.contains(dependency) => {
                    let mut cycle = self.path.clone();
                    cycle.push(dependency.clone());
                    return Err(GraphError::cycle(cycle));
                }
                Some(dependency) if self.done.contains(dependency) => {}
                Some(dependency) => {
                    let next = self.enter(dependency);
                    frames.push(next);
                }
                None => {
                    frames.pop();
                    if let Some(node) = self.path.pop() {
                        self.on_path.remove(&node);
                        self.done.insert(node);
                    }
                }
            }
        }

        Ok(())
    }

    /// Pushes `node` onto the current branch and returns its dependencies
    fn enter(&mut self, node: &ComponentName) -> Frame<'a> {
        let dependencies: &'a Dependencies = self.dependencies;
        self.path.push(node.clone());
        self.on_path.insert(node.clone());
        dependencies.get(node).into_iter().flatten()
    }
}
