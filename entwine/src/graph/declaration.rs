//! Dependency declarations and their canonical form
//!
//! A component declares its dependencies either as a plain list of names or
//! as an explicit `name -> field` mapping. Both shapes are normalized into
//! [`Injections`], which everything downstream works with.

use super::ComponentName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Canonical dependencies of one consumer: dependency name -> local field alias
pub type Injections = BTreeMap<ComponentName, String>;

/// Canonical dependencies of every consumer in a system
pub type Dependencies = BTreeMap<ComponentName, Injections>;

/// A component's dependency declaration, as written by the user
///
/// Deserializes from either a sequence or a map, so a whole topology can be
/// loaded from configuration:
///
/// ```
/// use entwine::{ComponentName, Declaration};
/// use std::collections::BTreeMap;
///
/// let topology: BTreeMap<ComponentName, Declaration> = serde_json::from_str(
///     r#"{ "api": ["db"], "worker": { "db": "database" } }"#,
/// ).unwrap();
///
/// assert_eq!(topology["api"], Declaration::from(["db"]));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Declaration {
    /// Depend on each name and inject it under a field of the same name
    List(Vec<ComponentName>),
    /// Depend on each key and inject it under the mapped field alias
    Map(Injections),
}

impl Declaration {
    /// A declaration with no dependencies
    pub fn none() -> Self {
        Self::List(Vec::new())
    }

    /// Converts this declaration into its canonical form
    ///
    /// A list `[x, y]` becomes `{x: "x", y: "y"}`; a map is returned as is.
    pub fn normalize(self) -> Injections {
        match self {
            Self::List(names) => names
                .into_iter()
                .map(|name| {
                    let alias = name.to_alias();
                    (name, alias)
                })
                .collect(),
            Self::Map(injections) => injections,
        }
    }
}

impl Default for Declaration {
    fn default() -> Self {
        Self::none()
    }
}

impl From<Vec<ComponentName>> for Declaration {
    fn from(names: Vec<ComponentName>) -> Self {
        Self::List(names)
    }
}

impl From<Vec<&str>> for Declaration {
    fn from(names: Vec<&str>) -> Self {
        Self::List(names.into_iter().map(ComponentName::from).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Declaration {
    fn from(names: [&str; N]) -> Self {
        Self::List(names.into_iter().map(ComponentName::from).collect())
    }
}

impl From<Injections> for Declaration {
    fn from(injections: Injections) -> Self {
        Self::Map(injections)
    }
}

impl<const N: usize> From<[(&str, &str); N]> for Declaration {
    fn from(pairs: [(&str, &str); N]) -> Self {
        Self::Map(
            pairs
                .into_iter()
                .map(|(name, alias)| (ComponentName::from(name), alias.to_string()))
                .collect(),
        )
    }
}

/// Normalizes every declaration of a system
///
/// This is a pure shape transform: unknown names and cycles are left for
/// [`validate`](super::validate) to report.
pub fn normalize<I, K, D>(declarations: I) -> Dependencies
where
    I: IntoIterator<Item = (K, D)>,
    K: Into<ComponentName>,
    D: Into<Declaration>,
{
    declarations
        .into_iter()
        .map(|(consumer, declaration)| (consumer.into(), declaration.into().normalize()))
        .collect()
}

/// Builds the reverse adjacency: dependency -> consumers
///
/// Keys are always canonical component names, never the aliases consumers
/// inject them under, so top-down walks visit nodes by identity.
pub fn invert(dependencies: &Dependencies) -> Dependencies {
    let mut inverted = Dependencies::new();

    for (consumer, injections) in dependencies {
        for dependency in injections.keys() {
            inverted
                .entry(dependency.clone())
                .or_default()
                .insert(consumer.clone(), consumer.to_alias());
        }
    }

    inverted
}
