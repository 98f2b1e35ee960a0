//! Remote module registry
//!
//! Provides [`ModuleRegistry`], the immutable name → descriptor table the
//! loader resolves against, and [`RegistryBuilder`] which assembles it once
//! during host startup.

use crate::descriptor::{EntryLocation, ModuleName, RemoteModuleDescriptor};
use crate::error::{RegistryError, RegistryResult};
use indexmap::IndexMap;

/// Built-in portals with the dev-server port each one is served from
///
/// Order matches the host's navigation order.
pub const DEFAULT_REMOTES: [(&str, u16); 7] = [
    ("employee-portal", 4201),
    ("attendance-portal", 4202),
    ("dashboard", 4203),
    ("payroll-portal", 4204),
    ("inventory-portal", 4205),
    ("post-portal", 4206),
    ("sales-portal", 4207),
];

/// Immutable registry of remote modules
///
/// There is no way to mutate a registry once built; share it behind an
/// `Arc` between the loader and whoever lists remotes.
#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    descriptors: IndexMap<ModuleName, RemoteModuleDescriptor>,
}

impl ModuleRegistry {
    /// Start building a registry
    #[inline]
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Look up the descriptor for a logical module name
    ///
    /// # Errors
    /// - `RegistryError::NotFound` if nothing is registered under `name`
    pub fn resolve(&self, name: &str) -> RegistryResult<&RemoteModuleDescriptor> {
        self.descriptors
            .get(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))
    }

    /// Check if a module is registered
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.descriptors.contains_key(name)
    }

    /// Registered names in registration order
    #[inline]
    #[must_use]
    pub fn names(&self) -> Vec<&ModuleName> {
        self.descriptors.keys().collect()
    }

    /// Iterate over all descriptors in registration order
    pub fn iter(&self) -> impl Iterator<Item = &RemoteModuleDescriptor> {
        self.descriptors.values()
    }

    /// Number of registered remotes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

/// Builder for [`ModuleRegistry`]
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    descriptors: IndexMap<ModuleName, RemoteModuleDescriptor>,
}

impl RegistryBuilder {
    /// Create new empty builder
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            descriptors: IndexMap::new(),
        }
    }

    /// Builder pre-populated with the built-in portals served from `host`
    ///
    /// `host` is a scheme and hostname such as `http://localhost`; each portal
    /// is expected at `{host}:{port}/remoteEntry.json`.
    pub fn with_defaults(host: &str) -> RegistryResult<Self> {
        let host = host.trim_end_matches('/');
        DEFAULT_REMOTES
            .iter()
            .try_fold(Self::new(), |builder, (name, port)| {
                builder.remote(name, &format!("{host}:{port}"))
            })
    }

    /// Register a descriptor
    ///
    /// # Errors
    /// - `RegistryError::Duplicate` if the name is already taken
    pub fn register(mut self, descriptor: RemoteModuleDescriptor) -> RegistryResult<Self> {
        if self.descriptors.contains_key(descriptor.name()) {
            return Err(RegistryError::Duplicate(descriptor.name().to_string()));
        }
        self.descriptors
            .insert(descriptor.name().clone(), descriptor);
        Ok(self)
    }

    /// Register a remote by base URL with the conventional exposed symbol
    pub fn remote(self, name: &str, base_url: &str) -> RegistryResult<Self> {
        let descriptor =
            RemoteModuleDescriptor::new(ModuleName::new(name)?, EntryLocation::under_base(base_url)?);
        self.register(descriptor)
    }

    /// Freeze into an immutable registry
    #[must_use]
    pub fn build(self) -> ModuleRegistry {
        ModuleRegistry {
            descriptors: self.descriptors,
        }
    }
}
