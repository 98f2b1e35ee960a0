//! Portal Loader
//!
//! Fetches remotely deployed portal modules on first use and hands the host
//! something it can mount.
//!
//! # Architecture
//!
//! ```text
//! load(name) → ModuleRegistry::resolve → RemoteFetcher::fetch → RemoteEntry → dyn RemoteModule
//!                                             ↑_____________________________________↓
//!                                       moka cache (one in-flight fetch per name)
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use portal_loader::{EntryFetcher, ModuleLoader, MountTarget, DEFAULT_FETCH_TIMEOUT};
//! use std::sync::Arc;
//!
//! # async fn example(registry: Arc<portal_registry::ModuleRegistry>) -> Result<(), Box<dyn std::error::Error>> {
//! let fetcher = Arc::new(EntryFetcher::new(DEFAULT_FETCH_TIMEOUT)?);
//! let loader = ModuleLoader::new(registry, fetcher);
//!
//! let module = loader.load("attendance-portal").await?;
//! let fragment = module.mount(&MountTarget::new("/attendance-portal"));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
pub mod error;
pub mod fetch;
pub mod loader;
pub mod module;
pub mod state;

// Re-exports for convenience
pub use error::{LoadError, LoaderError, LoaderResult};
pub use fetch::{EntryFetcher, FileFetcher, HttpFetcher, RemoteFetcher, DEFAULT_FETCH_TIMEOUT};
pub use loader::{ModuleLoader, PreloadReport};
pub use module::{
    ExposedComponent, ExposedModule, Fragment, MountTarget, RemoteEntry, RemoteModule,
};
pub use state::{allowed_transitions, validate_transition, LoadPhase, LoadState, TransitionError};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
