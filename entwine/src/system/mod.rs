//! Systems: validated component graphs with dependency-ordered lifecycle.
//!
//! A [`System`] pairs a set of named components with their normalized
//! dependencies. It is built once through [`system`], which rejects unknown
//! references and cycles before any component runs, and is immutable from
//! then on:
//!
//! - [`System::start`] walks bottom-up. Each component gets its started
//!   dependencies injected under their aliases, then starts.
//! - [`System::stop`] walks top-down. Each component stops once everything
//!   depending on it has stopped, then has its injected fields cleared.
//!
//! Both return a new `System` holding the new component values; the
//! dependency map is carried over unchanged.
//!
//! # Example
//!
//! ```
//! use entwine::prelude::*;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let system = entwine::system(
//!     [
//!         ("config", Record::empty().into_ref()),
//!         ("db", Record::new(["config"]).into_ref()),
//!         ("api", Record::new(["db", "settings"]).into_ref()),
//!     ],
//!     [
//!         ("db", Declaration::from(["config"])),
//!         ("api", Declaration::from([("db", "db"), ("config", "settings")])),
//!     ],
//! )?;
//!
//! let started = system.start().await?;
//! assert!(started.get::<Record>("api").unwrap().is_set("settings"));
//!
//! let stopped = started.stop().await?;
//! assert!(!stopped.get::<Record>("api").unwrap().is_set("settings"));
//! # Ok(())
//! # }
//! ```

mod dot;
mod error;

pub use error::{Result, SystemError};

use crate::component::{self, Component, ComponentError, ComponentRef, ComponentResult, Resolved};
use crate::graph::{
    normalize, topological_order, validate, ComponentName, Declaration, Dependencies, GraphResult,
    Injections,
};
use crate::walk::{rwalk, walk};
use async_trait::async_trait;
use std::any::Any;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Component values of a system, keyed by name
pub type Components = BTreeMap<ComponentName, ComponentRef>;

/// Builds and validates a system
///
/// Normalizes `declarations`, then checks that every referenced component
/// exists and that the graph is acyclic. No component capability is invoked.
///
/// # Errors
///
/// - [`GraphError::UnknownComponent`](crate::GraphError::UnknownComponent)
///   if a declaration names a missing component
/// - [`GraphError::CycleDetected`](crate::GraphError::CycleDetected) if the
///   dependencies form a cycle
pub fn system<C, N, D, K, V>(components: C, declarations: D) -> GraphResult<System>
where
    C: IntoIterator<Item = (N, ComponentRef)>,
    N: Into<ComponentName>,
    D: IntoIterator<Item = (K, V)>,
    K: Into<ComponentName>,
    V: Into<Declaration>,
{
    System::new(components, declarations)
}

/// An immutable, validated graph of components
#[derive(Debug, Clone)]
pub struct System {
    components: Arc<Components>,
    dependencies: Arc<Dependencies>,
}

impl System {
    /// Builds and validates a system; see [`system`]
    pub fn new<C, N, D, K, V>(components: C, declarations: D) -> GraphResult<Self>
    where
        C: IntoIterator<Item = (N, ComponentRef)>,
        N: Into<ComponentName>,
        D: IntoIterator<Item = (K, V)>,
        K: Into<ComponentName>,
        V: Into<Declaration>,
    {
        let components: Components = components
            .into_iter()
            .map(|(name, component)| (name.into(), component))
            .collect();
        let dependencies = normalize(declarations);

        validate(&components, &dependencies)?;

        debug!(
            components = components.len(),
            consumers = dependencies.len(),
            "system validated"
        );
        Ok(Self {
            components: Arc::new(components),
            dependencies: Arc::new(dependencies),
        })
    }

    /// Starts every component in dependency order
    ///
    /// Each component is merged with its started dependencies (keyed by
    /// alias) and then started. Siblings with no path between them may start
    /// concurrently.
    ///
    /// # Errors
    ///
    /// The first injection or start failure fails the whole call. Components
    /// that already started are not stopped again.
    pub async fn start(&self) -> Result<System> {
        info!(components = self.len(), "starting system");

        let components = walk(
            &self.components,
            &self.dependencies,
            |component: ComponentRef, resolved: Resolved, name: ComponentName| async move {
                debug!(component = %name, dependencies = resolved.len(), "starting component");

                let merged = component.merge(&resolved).map_err(|source| {
                    warn!(component = %name, error = %source, "dependency injection failed");
                    SystemError::inject(name.clone(), source)
                })?;
                let started = merged.start().await.map_err(|source| {
                    warn!(component = %name, error = %source, "component failed to start");
                    SystemError::start(name.clone(), source)
                })?;

                debug!(component = %name, "component started");
                Ok::<_, SystemError>(started)
            },
        )
        .await?;

        info!(components = components.len(), "system started");
        Ok(self.with_components(components))
    }

    /// Stops every component in reverse dependency order
    ///
    /// A component stops only after every component depending on it has
    /// stopped; afterwards each field it had injected is cleared.
    ///
    /// # Errors
    ///
    /// The first stop failure fails the whole call. Components that already
    /// stopped are not restarted.
    pub async fn stop(&self) -> Result<System> {
        info!(components = self.len(), "stopping system");

        let components = rwalk(
            &self.components,
            &self.dependencies,
            |component: ComponentRef, injections: Injections, name: ComponentName| async move {
                debug!(component = %name, "stopping component");

                let stopped = component.stop().await.map_err(|source| {
                    warn!(component = %name, error = %source, "component failed to stop");
                    SystemError::stop(name.clone(), source)
                })?;
                let cleared = injections
                    .values()
                    .fold(stopped, |component, alias| component.remove(alias));

                debug!(component = %name, "component stopped");
                Ok::<_, SystemError>(cleared)
            },
        )
        .await?;

        info!(components = components.len(), "system stopped");
        Ok(self.with_components(components))
    }

    fn with_components(&self, components: Components) -> System {
        System {
            components: Arc::new(components),
            dependencies: Arc::clone(&self.dependencies),
        }
    }

    /// Returns all component values
    pub fn components(&self) -> &Components {
        &self.components
    }

    /// Returns the normalized dependencies
    pub fn dependencies(&self) -> &Dependencies {
        &self.dependencies
    }

    /// Returns the component named `name`
    pub fn component(&self, name: &str) -> Option<&ComponentRef> {
        self.components.get(name)
    }

    /// Returns the component named `name` if it is a `T`
    pub fn get<T: Component>(&self, name: &str) -> Option<&T> {
        self.component(name)?.downcast_ref::<T>()
    }

    /// Returns the number of components
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Returns true if the system has no components
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Returns a deterministic start order
    ///
    /// This is the order a sequential start would follow, with ties broken
    /// by name. [`start`](Self::start) itself may interleave siblings.
    pub fn start_order(&self) -> Vec<ComponentName> {
        topological_order(self.components.keys(), &self.dependencies)
    }

    /// Returns a deterministic stop order: the start order reversed
    pub fn stop_order(&self) -> Vec<ComponentName> {
        let mut order = self.start_order();
        order.reverse();
        order
    }

    /// Renders the dependency graph in Graphviz DOT format
    ///
    /// ```text
    /// dot -Tpng system.dot -o system.png
    /// ```
    pub fn to_dot(&self) -> String {
        dot::render(&self.components, &self.dependencies)
    }
}

// A system is itself a component, so systems nest. It declares no
// injectable fields.
impl component::Inject for System {
    fn inject(&mut self, field: &str, _value: ComponentRef) -> ComponentResult<()> {
        Err(ComponentError::unknown_field(field))
    }

    fn eject(&mut self, _field: &str) {}
}

// Not a `Lifecycle` type: a by-value `Lifecycle::start` in scope would
// shadow the inherent `System::start`.
#[async_trait]
impl Component for System {
    async fn start(&self) -> ComponentResult<ComponentRef> {
        let started = System::start(self).await.map_err(ComponentError::other)?;
        Ok(Arc::new(started))
    }

    async fn stop(&self) -> ComponentResult<ComponentRef> {
        let stopped = System::stop(self).await.map_err(ComponentError::other)?;
        Ok(Arc::new(stopped))
    }

    fn merge(&self, dependencies: &Resolved) -> ComponentResult<ComponentRef> {
        let mut merged = self.clone();
        for (field, value) in dependencies {
            component::Inject::inject(&mut merged, field, Arc::clone(value))?;
        }
        Ok(Arc::new(merged))
    }

    fn remove(&self, _field: &str) -> ComponentRef {
        Arc::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
