//! Component name type
//!
//! A [`ComponentName`] identifies one component within a system. The same
//! name is used as the node identity in every graph walk, regardless of the
//! field alias a consumer injects it under.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Unique identifier for a component within a system
///
/// Names are ordered so that maps keyed by them iterate deterministically.
///
/// # Examples
///
/// ```
/// use entwine::ComponentName;
///
/// let name = ComponentName::new("database");
/// assert_eq!(name.as_str(), "database");
/// ```
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentName(String);

impl ComponentName {
    /// Creates a new component name
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the name as the field alias a plain list declaration uses
    pub(crate) fn to_alias(&self) -> String {
        self.0.clone()
    }
}

impl fmt::Display for ComponentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for ComponentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentName({})", self.0)
    }
}

impl Borrow<str> for ComponentName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ComponentName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ComponentName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ComponentName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&String> for ComponentName {
    fn from(s: &String) -> Self {
        Self(s.clone())
    }
}

impl From<&ComponentName> for ComponentName {
    fn from(name: &ComponentName) -> Self {
        name.clone()
    }
}
