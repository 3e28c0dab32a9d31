//! Entwine: dependency-ordered lifecycle for graphs of components
//!
//! `entwine` composes named, stateful components into a dependency graph and
//! drives their startup and shutdown in an order that respects it:
//!
//! - every referenced component exists, checked before anything runs
//! - the graph is acyclic, checked before anything runs
//! - a component starts only after all of its dependencies started, and
//!   stops only after everything depending on it stopped
//! - started dependencies are injected into a consumer before it starts and
//!   removed from it after it stops
//!
//! # Quick Start
//!
//! ```
//! use entwine::prelude::*;
//!
//! #[derive(Clone, Debug, Default, Inject)]
//! struct Database {
//!     connected: bool,
//! }
//!
//! #[async_trait]
//! impl Lifecycle for Database {
//!     async fn start(mut self) -> ComponentResult<Self> {
//!         self.connected = true;
//!         Ok(self)
//!     }
//! }
//!
//! #[derive(Clone, Debug, Default, Inject)]
//! struct Server {
//!     #[inject(rename = "db")]
//!     database: Option<Arc<Database>>,
//! }
//!
//! #[async_trait]
//! impl Lifecycle for Server {
//!     async fn start(self) -> ComponentResult<Self> {
//!         let ready = self.database.as_ref().is_some_and(|db| db.connected);
//!         if ready {
//!             Ok(self)
//!         } else {
//!             Err("database not connected".into())
//!         }
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let system = entwine::system(
//!     [
//!         ("database", Database::default().into_ref()),
//!         ("server", Server::default().into_ref()),
//!     ],
//!     [("server", Declaration::from([("database", "db")]))],
//! )?;
//!
//! let running = system.start().await?;
//! assert!(running.get::<Server>("server").unwrap().database.is_some());
//!
//! let stopped = running.stop().await?;
//! assert!(stopped.get::<Server>("server").unwrap().database.is_none());
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! Each module hides one design decision:
//!
//! - [`graph`]: how dependencies are declared, normalized and validated
//! - [`walk`]: how nodes are resolved in order, concurrently and once
//! - [`component`]: what the engine requires of a component
//! - [`system`]: how start and stop are built on top of the walks

// Allow the derive macro to reference ::entwine from within this crate
extern crate self as entwine;

pub mod component;
pub mod graph;
pub mod system;
pub mod walk;

pub use component::{
    Component, ComponentError, ComponentRef, ComponentResult, FromComponent, Inject, Lifecycle,
    Record, Resolved,
};
pub use graph::{
    ComponentName, Declaration, Dependencies, GraphError, GraphResult, Injections,
};
pub use system::{system, Components, Result as SystemResult, System, SystemError};

// Re-export the derive macro
pub use entwine_macros::Inject;

// Re-export dependencies used in the public API
pub use async_trait::async_trait;

/// Prelude module for convenient glob imports
///
/// # Example
///
/// ```ignore
/// use entwine::prelude::*;
/// ```
pub mod prelude {
    pub use crate::component::{
        Component, ComponentError, ComponentRef, ComponentResult, Inject, Lifecycle, Record,
    };
    pub use crate::graph::{ComponentName, Declaration, GraphError};
    pub use crate::system::{system, System, SystemError};

    pub use async_trait::async_trait;
    pub use entwine_macros::Inject;

    pub use std::sync::Arc;
}
