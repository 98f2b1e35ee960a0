//! Registry errors
//!
//! Every variant is a configuration problem: a wrong name in the route table,
//! a duplicated remote, or an unreadable manifest. None of them is a network
//! failure, and callers are expected to stop startup on them.

use std::path::PathBuf;

/// Errors raised while building or querying the registry
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// No descriptor registered under this name
    #[error("unknown remote module: '{0}'")]
    NotFound(String),

    /// Two descriptors share a name
    #[error("remote module '{0}' is registered more than once")]
    Duplicate(String),

    /// Name does not satisfy the naming rules
    #[error("invalid module name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// Entry location cannot be used
    #[error("invalid entry location '{location}': {reason}")]
    InvalidLocation { location: String, reason: String },

    /// Manifest is not valid JSON or has the wrong shape
    #[error("malformed federation manifest: {0}")]
    Manifest(#[from] serde_json::Error),

    /// Manifest file could not be read
    #[error("io error reading manifest {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RegistryError {
    /// Create invalid name error
    pub fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Registry errors are always deployment or programmer errors
    #[inline]
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        true
    }
}

/// Result type alias for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display() {
        let err = RegistryError::NotFound("billing-portal".to_string());
        assert_eq!(err.to_string(), "unknown remote module: 'billing-portal'");
        assert!(err.is_configuration());
    }

    #[test]
    fn invalid_name_display() {
        let err = RegistryError::invalid_name("Bad", "unexpected character 'B'");
        assert!(err.to_string().contains("invalid module name 'Bad'"));
    }
}
