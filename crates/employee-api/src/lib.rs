//! Employee API
//!
//! Data-source configuration of the employee API service: connection options
//! read once from the environment, failing fast before any connection is
//! attempted.
//!
//! # Example
//!
//! ```rust,ignore
//! use employee_api::{DataSourceLoader, DEFAULT_CONFIG_FILE};
//!
//! let options = DataSourceLoader::new()
//!     .with_config_path(DEFAULT_CONFIG_FILE)
//!     .load()?;
//! println!("connecting to {}", options.redacted_url());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod datasource;
pub mod error;

pub use datasource::{
    DataSourceLoader, DataSourceOptions, DatabaseKind, Password, DEFAULT_CONFIG_FILE, ENV_PREFIX,
    REQUIRED_VARIABLES,
};
pub use error::ConfigurationError;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
