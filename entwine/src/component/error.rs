//! Error types for component operations
//!
//! A component's own failures and dependency injection mismatches are
//! reported here. The system layer wraps them with the failing component's
//! name.

use std::error::Error as StdError;
use std::sync::Arc;
use thiserror::Error;

/// Error type for component operations.
///
/// Returned by a component's own `start`/`stop`, and by dependency injection
/// when a resolved dependency does not fit the consumer. Sources are held in
/// an `Arc` so the error stays `Clone`: a failing node's result is shared by
/// every consumer awaiting it.
#[derive(Debug, Error, Clone)]
#[non_exhaustive]
pub enum ComponentError {
    /// A dependency was injected under a field the component does not declare.
    #[error("unknown field: {field}")]
    UnknownField { field: String },

    /// A dependency was injected under the right field with the wrong type.
    #[error("field {field} expects {expected}")]
    WrongType {
        field: String,
        expected: &'static str,
    },

    /// The component failed with the given reason.
    #[error("{0}")]
    Failed(String),

    /// The component failed with an underlying error.
    #[error(transparent)]
    Other(Arc<dyn StdError + Send + Sync>),
}

impl ComponentError {
    /// Creates an unknown field error
    pub fn unknown_field(field: impl Into<String>) -> Self {
        Self::UnknownField {
            field: field.into(),
        }
    }

    /// Creates a wrong type error
    pub fn wrong_type(field: impl Into<String>, expected: &'static str) -> Self {
        Self::WrongType {
            field: field.into(),
            expected,
        }
    }

    /// Creates a failure with a plain reason
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed(reason.into())
    }

    /// Wraps an arbitrary error
    pub fn other<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Other(Arc::new(error))
    }
}

impl From<String> for ComponentError {
    fn from(s: String) -> Self {
        ComponentError::Failed(s)
    }
}

impl From<&str> for ComponentError {
    fn from(s: &str) -> Self {
        ComponentError::Failed(s.to_string())
    }
}

impl From<std::io::Error> for ComponentError {
    fn from(e: std::io::Error) -> Self {
        ComponentError::other(e)
    }
}

/// Result type for component operations
pub type ComponentResult<T> = std::result::Result<T, ComponentError>;
