//! Portal Registry
//!
//! Static mapping from a logical remote-module name to the location of its
//! published entry point.
//!
//! # Core Concepts
//!
//! - [`RemoteModuleDescriptor`]: name, entry location and exposed symbol
//! - [`ModuleRegistry`]: immutable, built once at startup, read by everyone
//! - [`RegistryBuilder`]: the only way to populate a registry
//!
//! # Example
//!
//! ```rust,ignore
//! use portal_registry::{ModuleRegistry, RegistryBuilder};
//! use std::sync::Arc;
//!
//! let registry = Arc::new(RegistryBuilder::with_defaults("http://localhost")?.build());
//! let desc = registry.resolve("attendance-portal")?;
//! assert_eq!(desc.exposed_key(), "Module");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod descriptor;
mod error;
mod manifest;
mod registry;

// Re-exports
pub use descriptor::{
    EntryLocation, LocationKind, ModuleName, RemoteModuleDescriptor, DEFAULT_EXPOSED_KEY,
    REMOTE_ENTRY_FILE,
};
pub use error::{RegistryError, RegistryResult};
pub use registry::{ModuleRegistry, RegistryBuilder, DEFAULT_REMOTES};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
