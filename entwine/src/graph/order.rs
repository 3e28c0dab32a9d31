//! Deterministic topological ordering
//!
//! The walk engine never needs a precomputed order; it derives one from the
//! graph as futures resolve. This module exists for introspection: it gives
//! the sequential order a single-threaded start would follow.

use super::{invert, ComponentName, Dependencies};
use std::collections::{BTreeMap, BTreeSet};

/// Returns `names` in dependency order (dependencies before consumers)
///
/// Uses Kahn's algorithm. Among nodes that are ready at the same time the
/// smallest name goes first, so the result is stable across runs.
///
/// Nodes that sit on a cycle are never ready and are left out; validated
/// graphs have none.
///
/// # Algorithm
///
/// 1. Compute the number of unresolved dependencies of every node
/// 2. Seed the ready set with every node that has none
/// 3. Repeatedly take the smallest ready node, append it, and decrement
///    each of its consumers; a consumer reaching zero becomes ready
pub fn topological_order<'a, I>(names: I, dependencies: &Dependencies) -> Vec<ComponentName>
where
    I: IntoIterator<Item = &'a ComponentName>,
{
    let mut pending: BTreeMap<ComponentName, usize> = names
        .into_iter()
        .map(|name| {
            let degree = dependencies.get(name).map_or(0, |deps| deps.len());
            (name.clone(), degree)
        })
        .collect();

    let consumers = invert(dependencies);
    let mut ready: BTreeSet<ComponentName> = pending
        .iter()
        .filter(|(_, degree)| **degree == 0)
        .map(|(name, _)| name.clone())
        .collect();
    let mut order = Vec::with_capacity(pending.len());

    while let Some(node) = ready.pop_first() {
        pending.remove(&node);

        if let Some(dependents) = consumers.get(&node) {
            for dependent in dependents.keys() {
                if let Some(degree) = pending.get_mut(dependent) {
                    *degree -= 1;
                    if *degree == 0 {
                        ready.insert(dependent.clone());
                    }
                }
            }
        }

        order.push(node);
    }

    order
}
