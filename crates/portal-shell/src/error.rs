//! Shell startup errors
//!
//! Everything here halts startup; load failures at runtime are not errors
//! of the shell but views.

use portal_registry::RegistryError;

/// Failures while assembling the shell
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    /// Registry could not be built or a route names an unknown module
    #[error("registry configuration error: {0}")]
    Registry(#[from] RegistryError),

    /// Settings could not be read or have the wrong shape
    #[error("invalid shell configuration: {0}")]
    Config(#[from] Box<figment::Error>),

    /// Page template failed to compile or render
    #[error("page template error: {0}")]
    Template(#[from] minijinja::Error),

    /// HTTP client could not be constructed
    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

impl From<figment::Error> for ShellError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl ShellError {
    /// Check if error comes from configuration the operator controls
    #[inline]
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Registry(_) | Self::Config(_))
    }
}

/// Result type alias for shell startup
pub type ShellResult<T> = Result<T, ShellError>;
