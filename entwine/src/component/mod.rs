//! Components: the nodes of a system.
//!
//! The engine only sees [`Component`], an object-safe capability set:
//! start, stop, merge dependencies in, remove a dependency field. Every
//! operation returns a new value; a component is never changed in place.
//!
//! Authors rarely implement [`Component`] directly. Instead they write a
//! plain `Clone` struct and implement two small traits:
//!
//! - [`Inject`]: which fields receive dependencies (usually derived with
//!   `#[derive(Inject)]`)
//! - [`Lifecycle`]: what happens on start and stop (no-ops by default)
//!
//! and get [`Component`] through a blanket impl.
//!
//! # Example
//!
//! ```
//! use entwine::prelude::*;
//!
//! #[derive(Clone, Debug, Default, Inject)]
//! struct Database {
//!     url: String,
//! }
//!
//! impl Lifecycle for Database {}
//!
//! #[derive(Clone, Debug, Default, Inject)]
//! struct Api {
//!     #[inject]
//!     database: Option<Arc<Database>>,
//!     listening: bool,
//! }
//!
//! #[async_trait]
//! impl Lifecycle for Api {
//!     async fn start(mut self) -> ComponentResult<Self> {
//!         assert!(self.database.is_some());
//!         self.listening = true;
//!         Ok(self)
//!     }
//! }
//! ```
//!
//! # Typed access
//!
//! Injected values are type-erased [`ComponentRef`]s. [`FromComponent`]
//! and `dyn Component::downcast_ref` recover the concrete type.

mod error;
mod record;

pub use error::{ComponentError, ComponentResult};
pub use record::Record;

use async_trait::async_trait;
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Shared, type-erased handle to a component value
pub type ComponentRef = Arc<dyn Component>;

/// Resolved dependencies of one component: local field alias -> value
pub type Resolved = BTreeMap<String, ComponentRef>;

/// The capability set the engine drives.
///
/// Implemented for every [`Lifecycle`] type; implement it by hand only when
/// a component cannot be `Clone` or has inherent `start`/`stop` methods of
/// its own, as [`System`](crate::System) does.
#[async_trait]
pub trait Component: fmt::Debug + Send + Sync + 'static {
    /// Starts the component and returns its started value.
    async fn start(&self) -> ComponentResult<ComponentRef>;

    /// Stops the component and returns its stopped value.
    async fn stop(&self) -> ComponentResult<ComponentRef>;

    /// Returns a new value with every resolved dependency set under its alias.
    fn merge(&self, dependencies: &Resolved) -> ComponentResult<ComponentRef>;

    /// Returns a new value with `field` cleared.
    fn remove(&self, field: &str) -> ComponentRef;

    /// Borrows the value as `Any` for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Converts a shared handle into `Arc<dyn Any>` for owned downcasting.
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;

    /// Name of the concrete type, for diagnostics.
    fn type_name(&self) -> &'static str;

    /// Erases the concrete type.
    fn into_ref(self) -> ComponentRef
    where
        Self: Sized,
    {
        Arc::new(self)
    }
}

impl dyn Component {
    /// Returns true if the concrete type is `T`
    pub fn is<T: Component>(&self) -> bool {
        self.as_any().is::<T>()
    }

    /// Borrows the concrete value if it is a `T`
    pub fn downcast_ref<T: Component>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

/// Field-level dependency injection.
///
/// `inject` sets a declared field and fails for an undeclared one; `eject`
/// clears a field and ignores undeclared ones.
pub trait Inject {
    /// Sets `field` to `value`.
    ///
    /// Fails with [`ComponentError::UnknownField`] if `field` is not
    /// declared, or [`ComponentError::WrongType`] if `value` does not fit it.
    fn inject(&mut self, field: &str, value: ComponentRef) -> ComponentResult<()>;

    /// Clears `field`.
    fn eject(&mut self, field: &str);
}

/// Start/stop behavior of an authored component.
///
/// Both hooks default to returning the value unchanged, so
/// `impl Lifecycle for MyType {}` is a complete no-op component.
#[async_trait]
pub trait Lifecycle: Inject + Clone + fmt::Debug + Send + Sync + Sized + 'static {
    /// Starts the component; its dependencies are already injected.
    async fn start(self) -> ComponentResult<Self> {
        Ok(self)
    }

    /// Stops the component; its dependencies are still injected.
    async fn stop(self) -> ComponentResult<Self> {
        Ok(self)
    }
}

#[async_trait]
impl<T: Lifecycle> Component for T {
    async fn start(&self) -> ComponentResult<ComponentRef> {
        let started = Lifecycle::start(self.clone()).await?;
        Ok(Arc::new(started))
    }

    async fn stop(&self) -> ComponentResult<ComponentRef> {
        let stopped = Lifecycle::stop(self.clone()).await?;
        Ok(Arc::new(stopped))
    }

    fn merge(&self, dependencies: &Resolved) -> ComponentResult<ComponentRef> {
        let mut merged = self.clone();
        for (field, value) in dependencies {
            merged.inject(field, Arc::clone(value))?;
        }
        Ok(Arc::new(merged))
    }

    fn remove(&self, field: &str) -> ComponentRef {
        let mut removed = self.clone();
        removed.eject(field);
        Arc::new(removed)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// Conversion from a type-erased component into a typed handle.
///
/// Used by `#[derive(Inject)]` to fill `Option<Arc<T>>` fields.
pub trait FromComponent: Sized {
    /// Returns `None` if `value` is not of the expected concrete type.
    fn from_component(value: ComponentRef) -> Option<Self>;
}

impl<T: Component> FromComponent for Arc<T> {
    fn from_component(value: ComponentRef) -> Option<Self> {
        value.into_any().downcast::<T>().ok()
    }
}
