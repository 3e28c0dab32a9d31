use crate::component::ComponentError;
use crate::graph::{ComponentName, GraphError};
use thiserror::Error;

/// Error type for system start and stop.
///
/// Names the component whose operation failed and keeps the component's own
/// error as the source. Nothing is retried or rolled back: components that
/// already started (or stopped) stay that way.
#[derive(Debug, Error, Clone)]
#[non_exhaustive]
pub enum SystemError {
    /// The dependency graph is malformed.
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// Resolved dependencies could not be injected into a component.
    #[error("failed to inject dependencies into {component}")]
    Inject {
        component: ComponentName,
        #[source]
        source: ComponentError,
    },

    /// A component failed to start.
    #[error("failed to start {component}")]
    Start {
        component: ComponentName,
        #[source]
        source: ComponentError,
    },

    /// A component failed to stop.
    #[error("failed to stop {component}")]
    Stop {
        component: ComponentName,
        #[source]
        source: ComponentError,
    },
}

impl SystemError {
    pub(crate) fn inject(component: ComponentName, source: ComponentError) -> Self {
        Self::Inject { component, source }
    }

    pub(crate) fn start(component: ComponentName, source: ComponentError) -> Self {
        Self::Start { component, source }
    }

    pub(crate) fn stop(component: ComponentName, source: ComponentError) -> Self {
        Self::Stop { component, source }
    }

    /// Returns the component whose operation failed, if any
    pub fn component(&self) -> Option<&ComponentName> {
        match self {
            Self::Inject { component, .. }
            | Self::Start { component, .. }
            | Self::Stop { component, .. } => Some(component),
            Self::Graph(_) => None,
        }
    }

    /// Returns the component's own error, if any
    pub fn component_error(&self) -> Option<&ComponentError> {
        match self {
            Self::Inject { source, .. } | Self::Start { source, .. } | Self::Stop { source, .. } => {
                Some(source)
            }
            Self::Graph(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SystemError>;
