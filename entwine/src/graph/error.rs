//! Error types for graph operations
//!
//! Structural problems with a dependency graph are reported here. They are
//! raised while a system is being built, before any component runs.

use super::ComponentName;
use thiserror::Error;

/// Result type for graph operations
pub type GraphResult<T> = Result<T, GraphError>;

/// Errors that can occur while validating a dependency graph
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GraphError {
    /// A dependency declaration references a component that does not exist
    #[error("unknown component: {name}{}", render_referrer(.referenced_by))]
    UnknownComponent {
        /// The name that could not be found
        name: ComponentName,
        /// The component whose declaration referenced it, if any
        referenced_by: Option<ComponentName>,
    },

    /// A cycle was detected in the dependency graph
    #[error("cycle detected: {}", render_path(.path))]
    CycleDetected {
        /// Path from the cycle's entry point to the repeated node
        path: Vec<ComponentName>,
    },
}

impl GraphError {
    /// Creates an unknown component error for a dependency of `referenced_by`
    pub fn unknown_component(name: ComponentName, referenced_by: ComponentName) -> Self {
        Self::UnknownComponent {
            name,
            referenced_by: Some(referenced_by),
        }
    }

    /// Creates an unknown component error for a name nothing else refers to
    ///
    /// Raised when a declaration is keyed by a consumer that is not itself
    /// a component.
    pub fn undeclared(name: ComponentName) -> Self {
        Self::UnknownComponent {
            name,
            referenced_by: None,
        }
    }

    /// Creates a cycle detected error with the given path
    pub fn cycle(path: Vec<ComponentName>) -> Self {
        Self::CycleDetected { path }
    }

    /// Returns the cycle path if this is a cycle error
    pub fn cycle_path(&self) -> Option<&[ComponentName]> {
        match self {
            Self::CycleDetected { path } => Some(path),
            _ => None,
        }
    }
}

fn render_referrer(referenced_by: &Option<ComponentName>) -> String {
    match referenced_by {
        Some(consumer) => format!(" (referenced by {})", consumer),
        None => String::new(),
    }
}

fn render_path(path: &[ComponentName]) -> String {
    path.iter()
        .map(ComponentName::as_str)
        .collect::<Vec<_>>()
        .join(" => ")
}
