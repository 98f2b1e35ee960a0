//! Error types for the module loader
//!
//! Two families:
//! - [`LoadError`]: the remote could not be fetched or understood. Recoverable,
//!   stored as the module's `Failed` state and retried on the next load.
//! - [`LoaderError::Configuration`]: the name is not in the registry at all.

use portal_registry::{ModuleName, RegistryError};
use std::sync::Arc;

/// Failures while fetching or interpreting a remote entry
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Transport-level failure (DNS, connection refused, TLS, ...)
    #[error("network failure fetching {location}: {message}")]
    Network { location: String, message: String },

    /// Request did not complete within the fetch timeout
    #[error("timed out fetching {location}")]
    Timeout { location: String },

    /// Server answered with a non-success status
    #[error("{location} answered with HTTP {status}")]
    Status { location: String, status: u16 },

    /// Local entry file could not be read
    #[error("io error reading {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },

    /// Artifact is not a valid remote entry
    #[error("malformed remote entry from {location}: {reason}")]
    Malformed { location: String, reason: String },

    /// Remote entry does not expose the expected symbol
    #[error("remote '{module}' does not expose '{key}' (exposes: {available:?})")]
    MissingExposed {
        module: String,
        key: String,
        available: Vec<String>,
    },

    /// Remote entry belongs to a different remote
    #[error("entry at {location} declares remote '{found}', expected '{expected}'")]
    NameMismatch {
        location: String,
        expected: String,
        found: String,
    },
}

impl LoadError {
    /// Create malformed artifact error
    pub fn malformed(location: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            location: location.into(),
            reason: reason.into(),
        }
    }

    /// Create network error
    pub fn network(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Network {
            location: location.into(),
            message: message.into(),
        }
    }

    /// Check if retrying the same location could succeed
    ///
    /// Artifact problems (malformed, missing symbol, wrong remote) only go away
    /// after a redeploy; transport problems may clear up on their own.
    #[inline]
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network { .. } | Self::Timeout { .. } | Self::Io { .. } => true,
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            Self::Malformed { .. } | Self::MissingExposed { .. } | Self::NameMismatch { .. } => {
                false
            }
        }
    }
}

/// Error returned by [`crate::ModuleLoader::load`]
#[derive(Debug, Clone, thiserror::Error)]
pub enum LoaderError {
    /// Name is not registered; never retried
    #[error("configuration error: {0}")]
    Configuration(Arc<RegistryError>),

    /// Fetch or extraction failed; the module is now in the `Failed` state
    #[error("failed to load remote '{module}': {source}")]
    Load {
        module: ModuleName,
        source: Arc<LoadError>,
    },
}

impl From<RegistryError> for LoaderError {
    fn from(err: RegistryError) -> Self {
        Self::Configuration(Arc::new(err))
    }
}

impl LoaderError {
    /// Check if error is a configuration problem
    #[inline]
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Check if a retry is allowed
    ///
    /// Every load failure may be retried; configuration errors may not.
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Load { .. })
    }

    /// Underlying load failure, if any
    #[inline]
    #[must_use]
    pub fn load_error(&self) -> Option<&Arc<LoadError>> {
        match self {
            Self::Load { source, .. } => Some(source),
            Self::Configuration(_) => None,
        }
    }
}

/// Result type alias for loader operations
pub type LoaderResult<T> = Result<T, LoaderError>;
