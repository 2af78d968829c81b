//! Partial proxy error types

use std::error::Error as StdError;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::oneshot::error::RecvError;

/// A resolver failure, shared by every waiter that observes it.
pub type SharedError = Arc<dyn StdError + Send + Sync + 'static>;

/// Error types for partial proxy operations
///
/// Cloneable: one resolution outcome is handed to every deferred read.
#[derive(Debug, Clone, Error)]
pub enum PartialError {
    /// The resolver's future failed; nothing was merged
    #[error("Resolver failed: {0}")]
    Resolver(#[source] SharedError),

    /// The resolution task ended without reporting (panic or runtime shutdown)
    #[error("Resolution task aborted: {0}")]
    TaskAborted(#[from] RecvError),

    /// No tokio runtime to spawn the resolution task on
    #[error("No tokio runtime available to run the resolver")]
    NoRuntime,

    /// Invalid input parameters
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A property could not be decoded into the requested type
    #[error("Failed to decode `{key}`: {source}")]
    Decode {
        key: String,
        #[source]
        source: Arc<serde_json::Error>,
    },

    /// The complete object could not be decoded into the requested type
    #[error("Failed to decode the complete object: {0}")]
    DecodeObject(#[source] Arc<serde_json::Error>),
}

impl PartialError {
    /// Wrap a resolver error.
    pub fn resolver<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        PartialError::Resolver(Arc::new(err))
    }

    /// The resolver's own error, if this is a resolver failure.
    ///
    /// Downcast it to recover the concrete type.
    #[must_use]
    pub fn resolver_source(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        match self {
            PartialError::Resolver(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

/// Convenience result alias for partial proxy operations
pub type PartialResult<T> = Result<T, PartialError>;
