//! Lazy module loader
//!
//! Resolves a logical name through the registry, fetches the remote entry,
//! extracts the exposed symbol and memoizes the result for the lifetime of
//! the loader.
//!
//! # Guarantees
//! - At most one fetch in flight per name; concurrent callers share it and
//!   see the same outcome (same `Arc` on success and on failure)
//! - Failures are not cached: the next `load` starts a new attempt
//! - Unknown names fail with a configuration error and never touch the network

use crate::error::{LoadError, LoaderError, LoaderResult};
use crate::fetch::RemoteFetcher;
use crate::module::{RemoteEntry, RemoteModule};
use crate::state::{validate_transition, LoadPhase, LoadState};
use dashmap::DashMap;
use futures::future::join_all;
use moka::future::Cache;
use portal_registry::{ModuleName, ModuleRegistry, RemoteModuleDescriptor};
use std::sync::Arc;

/// Outcome of warming several remotes at once
#[derive(Debug, Default)]
pub struct PreloadReport {
    /// Modules that are now loaded
    pub loaded: Vec<ModuleName>,
    /// Requested names that failed, with the reason
    pub failed: Vec<(String, LoaderError)>,
}

impl PreloadReport {
    /// Check if every requested module loaded
    #[inline]
    #[must_use]
    pub fn all_loaded(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Loads remote modules on demand
///
/// Owns the per-name [`LoadState`]; the router and shell only read it.
#[derive(Debug)]
pub struct ModuleLoader {
    registry: Arc<ModuleRegistry>,
    fetcher: Arc<dyn RemoteFetcher>,
    /// Loaded modules; moka coalesces concurrent initializations per key
    modules: Cache<ModuleName, Arc<dyn RemoteModule>>,
    states: DashMap<ModuleName, LoadState>,
    fetches: DashMap<ModuleName, u64>,
}

impl ModuleLoader {
    /// Create loader over a shared registry
    #[must_use]
    pub fn new(registry: Arc<ModuleRegistry>, fetcher: Arc<dyn RemoteFetcher>) -> Self {
        let capacity = registry.len();
        Self {
            registry,
            fetcher,
            modules: Cache::builder().initial_capacity(capacity).build(),
            states: DashMap::with_capacity(capacity),
            fetches: DashMap::with_capacity(capacity),
        }
    }

    /// Registry this loader resolves against
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &Arc<ModuleRegistry> {
        &self.registry
    }

    /// Load a remote module by logical name
    ///
    /// # Errors
    /// - `LoaderError::Configuration` if `name` is not registered
    /// - `LoaderError::Load` if the fetch or extraction failed
    pub async fn load(&self, name: &str) -> LoaderResult<Arc<dyn RemoteModule>> {
        let descriptor = self.registry.resolve(name)?;
        let key = descriptor.name().clone();

        self.modules
            .try_get_with(key.clone(), self.fetch_module(descriptor))
            .await
            .map_err(|err| LoaderError::Load {
                module: key,
                source: (*err).clone(),
            })
    }

    async fn fetch_module(
        &self,
        descriptor: &RemoteModuleDescriptor,
    ) -> Result<Arc<dyn RemoteModule>, Arc<LoadError>> {
        let name = descriptor.name();
        let location = descriptor.entry_location();

        self.transition(name, LoadState::Loading);
        *self.fetches.entry(name.clone()).or_insert(0) += 1;
        tracing::info!(module = %name, location = %location, "fetching remote entry");

        let result = match self.fetcher.fetch(descriptor).await {
            Ok(bytes) => RemoteEntry::parse(location.as_str(), &bytes)
                .and_then(|entry| entry.into_module(descriptor)),
            Err(err) => Err(err),
        };

        match result {
            Ok(module) => {
                tracing::info!(module = %name, title = module.title(), "remote module loaded");
                self.transition(name, LoadState::Loaded(Arc::clone(&module)));
                Ok(module)
            }
            Err(err) => {
                let err = Arc::new(err);
                tracing::warn!(
                    module = %name,
                    error = %err,
                    transient = err.is_transient(),
                    "remote module failed to load"
                );
                self.transition(name, LoadState::Failed(Arc::clone(&err)));
                Err(err)
            }
        }
    }

    fn transition(&self, name: &ModuleName, next: LoadState) {
        let mut state = self
            .states
            .entry(name.clone())
            .or_insert(LoadState::NotRequested);
        let (from, to) = (state.phase(), next.phase());

        match validate_transition(from, to) {
            Ok(()) => {}
            // A caller dropped mid-fetch leaves Loading behind; the next caller restarts it.
            Err(_) if from == LoadPhase::Loading && to == LoadPhase::Loading => {
                tracing::debug!(module = %name, "restarting abandoned load");
            }
            Err(err) => {
                tracing::warn!(module = %name, error = %err, "ignoring load state transition");
                return;
            }
        }
        *state = next;
    }

    /// Current load state of a module
    ///
    /// # Errors
    /// - `LoaderError::Configuration` if `name` is not registered
    pub fn state(&self, name: &str) -> LoaderResult<LoadState> {
        self.registry.resolve(name)?;
        Ok(self
            .states
            .get(name)
            .map_or(LoadState::NotRequested, |state| state.clone()))
    }

    /// Number of fetches issued for a module so far
    #[must_use]
    pub fn fetch_count(&self, name: &str) -> u64 {
        self.fetches.get(name).map_or(0, |count| *count)
    }

    /// Phase of every registered module, in registry order
    #[must_use]
    pub fn snapshot(&self) -> Vec<(ModuleName, LoadPhase)> {
        self.registry
            .names()
            .into_iter()
            .map(|name| {
                let phase = self
                    .states
                    .get(name.as_str())
                    .map_or(LoadPhase::NotRequested, |state| state.phase());
                (name.clone(), phase)
            })
            .collect()
    }

    /// Load several modules concurrently
    pub async fn preload<'a, I>(&self, names: I) -> PreloadReport
    where
        I: IntoIterator<Item = &'a str>,
    {
        let outcomes = join_all(
            names
                .into_iter()
                .map(|name| async move { (name, self.load(name).await) }),
        )
        .await;

        let mut report = PreloadReport::default();
        for (name, outcome) in outcomes {
            match outcome {
                Ok(module) => report.loaded.push(module.name().clone()),
                Err(err) => report.failed.push((name.to_string(), err)),
            }
        }
        report
    }

    /// Load every registered module concurrently
    pub async fn preload_all(&self) -> PreloadReport {
        self.preload(self.registry.names().into_iter().map(ModuleName::as_str))
            .await
    }
}
