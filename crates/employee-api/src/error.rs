//! Data-source configuration errors

/// Startup configuration is unusable; the service must not start
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    /// Required variables are absent or empty
    #[error("missing required environment variables: {}", .0.join(", "))]
    MissingVariables(Vec<&'static str>),

    /// `DB_PORT` is not a port number
    #[error("DB_PORT must be an integer between 1 and 65535, got '{value}'")]
    InvalidPort { value: String },

    /// A boolean flag has an unrecognized value
    #[error("{variable} must be true or false, got '{value}'")]
    InvalidFlag {
        variable: &'static str,
        value: String,
    },

    /// A configuration source could not be read
    #[error("failed to read data-source configuration: {0}")]
    Source(#[from] Box<figment::Error>),
}

impl From<figment::Error> for ConfigurationError {
    fn from(err: figment::Error) -> Self {
        Self::Source(Box::new(err))
    }
}

impl ConfigurationError {
    /// Variables this error is about
    #[must_use]
    pub fn variables(&self) -> Vec<&'static str> {
        match self {
            Self::MissingVariables(names) => names.clone(),
            Self::InvalidPort { .. } => vec!["DB_PORT"],
            Self::InvalidFlag { variable, .. } => vec![*variable],
            Self::Source(_) => Vec::new(),
        }
    }
}
