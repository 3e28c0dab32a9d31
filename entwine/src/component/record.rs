//! A component made of named dependency slots and nothing else.

use super::{Component, ComponentError, ComponentRef, ComponentResult, Inject, Lifecycle};
use std::collections::BTreeMap;

/// Generic component with a fixed set of named fields.
///
/// Every field starts empty. Injection may only fill declared fields, and
/// `start`/`stop` are no-ops. Useful on its own for grouping dependencies,
/// or embedded in a hand-written component that delegates [`Inject`] to it.
///
/// ```
/// use entwine::{Component, Inject, Record};
///
/// let mut record = Record::new(["a", "cc"]);
/// assert!(!record.is_set("cc"));
/// assert!(record.inject("b", Record::empty().into_ref()).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Record {
    slots: BTreeMap<String, Option<ComponentRef>>,
}

impl Record {
    /// Creates a record declaring the given fields
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            slots: fields.into_iter().map(|f| (f.into(), None)).collect(),
        }
    }

    /// Creates a record with no fields
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the value injected under `field`, if any
    pub fn get(&self, field: &str) -> Option<&ComponentRef> {
        self.slots.get(field)?.as_ref()
    }

    /// Returns the value injected under `field` if it is a `T`
    pub fn get_as<T: Component>(&self, field: &str) -> Option<&T> {
        self.get(field)?.downcast_ref::<T>()
    }

    /// Returns true if `field` currently holds a value
    pub fn is_set(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    /// Returns true if `field` is declared
    pub fn declares(&self, field: &str) -> bool {
        self.slots.contains_key(field)
    }

    /// Iterates over the declared field names
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.slots.keys().map(String::as_str)
    }
}

impl Inject for Record {
    fn inject(&mut self, field: &str, value: ComponentRef) -> ComponentResult<()> {
        match self.slots.get_mut(field) {
            Some(slot) => {
                *slot = Some(value);
                Ok(())
            }
            None => Err(ComponentError::unknown_field(field)),
        }
    }

    fn eject(&mut self, field: &str) {
        if let Some(slot) = self.slots.get_mut(field) {
            *slot = None;
        }
    }
}

impl Lifecycle for Record {}
