//! Memoized, concurrent graph walks
//!
//! This module hides **how nodes get resolved in dependency order**. Callers
//! hand over a map of node values, a dependency graph and a per-node
//! `combine` function; they get back a map of combined values.
//!
//! # How It Works
//!
//! 1. Every node is requested up front
//! 2. Requesting a node lazily creates one shared future for it and stores
//!    it in the memo; later requests for the same node clone that future
//! 3. A node's future first awaits the futures of all its dependencies,
//!    then calls `combine` with the node's value and the resolved
//!    dependencies keyed by alias
//! 4. The first failing node fails the whole walk
//!
//! Nothing is spawned: all futures are polled from the caller's task, so
//! independent branches interleave at their await points without any
//! runtime-specific machinery. The only ordering imposed is the graph's.
//!
//! # Directions
//!
//! - [`walk`]: bottom-up, a node after all of its dependencies
//! - [`rwalk`]: top-down, a node after all of its consumers; the same walk
//!   over the [inverted](crate::graph::invert) graph

use crate::graph::{invert, ComponentName, Dependencies, GraphError, Injections};
use dashmap::DashMap;
use futures::future::{try_join_all, BoxFuture, FutureExt, Shared};
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use tracing::trace;

/// Node values keyed by name
pub type Nodes<T> = BTreeMap<ComponentName, T>;

type NodeFuture<T, E> = Shared<BoxFuture<'static, Result<T, E>>>;

struct Walker<T, E, F> {
    nodes: Nodes<T>,
    graph: Dependencies,
    combine: F,
    memo: DashMap<ComponentName, NodeFuture<T, E>>,
}

impl<T, E, F, Fut> Walker<T, E, F>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + From<GraphError> + 'static,
    F: Fn(T, BTreeMap<String, T>, ComponentName) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
{
    /// Returns the one shared resolution of `name`, creating it on first use
    fn visit(self: &Arc<Self>, name: &ComponentName) -> NodeFuture<T, E> {
        self.memo
            .entry(name.clone())
            .or_insert_with(|| {
                let walker = Arc::clone(self);
                let name = name.clone();
                async move { walker.resolve(name).await }.boxed().shared()
            })
            .value()
            .clone()
    }

    async fn resolve(self: Arc<Self>, name: ComponentName) -> Result<T, E> {
        let injections = self.graph.get(&name).cloned().unwrap_or_default();

        let pending = injections.into_iter().map(|(dependency, alias)| {
            let resolution = self.visit(&dependency);
            async move { resolution.await.map(|value| (alias, value)) }
        });
        let resolved: BTreeMap<String, T> = try_join_all(pending).await?.into_iter().collect();

        let value = self
            .nodes
            .get(&name)
            .cloned()
            .ok_or_else(|| GraphError::undeclared(name.clone()))?;

        trace!(component = %name, dependencies = resolved.len(), "dependencies resolved");
        (self.combine)(value, resolved, name).await
    }
}

/// Bottom-up walk: combines each node after all of its dependencies
///
/// `combine(value, resolved, name)` receives the node's value, its resolved
/// dependencies keyed by the alias recorded in `graph`, and its name. Each
/// node is combined exactly once, however many consumers it has.
///
/// Every node in `nodes` is part of the result. A name in `graph` without a
/// value in `nodes` fails the walk with [`GraphError::UnknownComponent`].
pub async fn walk<T, E, F, Fut>(
    nodes: &Nodes<T>,
    graph: &Dependencies,
    combine: F,
) -> Result<Nodes<T>, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + From<GraphError> + 'static,
    F: Fn(T, BTreeMap<String, T>, ComponentName) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
{
    let walker = Arc::new(Walker {
        nodes: nodes.clone(),
        graph: graph.clone(),
        combine,
        memo: DashMap::new(),
    });

    let _memo = ClearMemo(Arc::clone(&walker));

    let names: Vec<ComponentName> = nodes.keys().cloned().collect();
    let values = try_join_all(names.iter().map(|name| walker.visit(name))).await?;
    Ok(names.into_iter().zip(values).collect())
}

/// Clears the memo when the walk finishes or is dropped mid-flight.
///
/// Unfinished memo entries own the walker, so without this a cancelled walk
/// would keep every node value alive.
struct ClearMemo<T, E, F>(Arc<Walker<T, E, F>>);

impl<T, E, F> Drop for ClearMemo<T, E, F> {
    fn drop(&mut self) {
        self.0.memo.clear();
    }
}

/// Top-down walk: combines each node after all of its consumers
///
/// Ordering comes from the inverted graph, but `combine(value, injections,
/// name)` receives the node's own forward [`Injections`] from `graph`, so
/// it knows which fields were injected into the node.
pub async fn rwalk<T, E, F, Fut>(
    nodes: &Nodes<T>,
    graph: &Dependencies,
    combine: F,
) -> Result<Nodes<T>, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + From<GraphError> + 'static,
    F: Fn(T, Injections, ComponentName) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
{
    let forward = Arc::new(graph.clone());

    walk(nodes, &invert(graph), move |value, _consumers, name| {
        let injections = forward.get(&name).cloned().unwrap_or_default();
        combine(value, injections, name)
    })
    .await
}
