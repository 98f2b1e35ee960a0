//! Remote module capability and remote entry format
//!
//! A remote publishes a JSON remote entry listing the symbols it exposes:
//!
//! ```json
//! {
//!   "name": "employee_portal",
//!   "exposes": {
//!     "./Module": { "title": "Employee Portal", "html": "<h1>Employees</h1>" }
//!   }
//! }
//! ```
//!
//! The host only ever talks to the symbol named by the descriptor's exposed
//! key, through [`RemoteModule::mount`].

use crate::error::LoadError;
use portal_registry::{ModuleName, RemoteModuleDescriptor};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::Arc;

/// Where in the host a module is being mounted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountTarget {
    /// Route path the module is mounted under
    pub route_path: String,
}

impl MountTarget {
    /// Target for a route path
    #[inline]
    #[must_use]
    pub fn new(route_path: impl Into<String>) -> Self {
        Self {
            route_path: route_path.into(),
        }
    }
}

/// Markup produced by mounting a module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// Document title contributed by the module
    pub title: String,
    /// Body markup placed in the shell's content region
    pub html: String,
}

/// The single capability a loaded remote offers the host
pub trait RemoteModule: Send + Sync + Debug {
    /// Registry name this module was loaded under
    fn name(&self) -> &ModuleName;

    /// Human-readable title
    fn title(&self) -> &str;

    /// Produce the module's markup for a mount point
    fn mount(&self, target: &MountTarget) -> Fragment;
}

/// One exposed symbol as published in a remote entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExposedComponent {
    /// Title shown by the host
    pub title: String,
    /// Body markup
    pub html: String,
}

/// Parsed remote entry artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEntry {
    /// Name the remote was built under
    pub name: String,
    /// Exposed symbols keyed as published (`./Module` or `Module`)
    #[serde(default)]
    pub exposes: BTreeMap<String, ExposedComponent>,
}

impl RemoteEntry {
    /// Parse artifact bytes fetched from `location`
    ///
    /// # Errors
    /// - `LoadError::Malformed` if the bytes are not a remote entry
    pub fn parse(location: &str, bytes: &[u8]) -> Result<Self, LoadError> {
        serde_json::from_slice(bytes).map_err(|e| LoadError::malformed(location, e.to_string()))
    }

    /// Look up an exposed symbol, accepting both `./Key` and `Key` spellings
    #[must_use]
    pub fn exposed(&self, key: &str) -> Option<&ExposedComponent> {
        let bare = key.strip_prefix("./").unwrap_or(key);
        self.exposes
            .get(bare)
            .or_else(|| self.exposes.get(&format!("./{bare}")))
    }

    /// Turn this entry into the module the descriptor asks for
    ///
    /// # Errors
    /// - `LoadError::NameMismatch` if the entry belongs to another remote
    /// - `LoadError::MissingExposed` if the exposed key is absent
    pub fn into_module(
        self,
        descriptor: &RemoteModuleDescriptor,
    ) -> Result<Arc<dyn RemoteModule>, LoadError> {
        let name = descriptor.name();
        if !name.matches_loosely(&self.name) {
            return Err(LoadError::NameMismatch {
                location: descriptor.entry_location().to_string(),
                expected: name.to_string(),
                found: self.name,
            });
        }

        let key = descriptor.exposed_key();
        let component = self.exposed(key).cloned().ok_or_else(|| LoadError::MissingExposed {
            module: name.to_string(),
            key: key.to_string(),
            available: self.exposes.keys().cloned().collect(),
        })?;

        Ok(Arc::new(ExposedModule::new(name.clone(), component)))
    }
}

/// [`RemoteModule`] backed by a component from a remote entry
#[derive(Debug, Clone)]
pub struct ExposedModule {
    name: ModuleName,
    component: ExposedComponent,
}

impl ExposedModule {
    /// Wrap a component under a module name
    #[inline]
    #[must_use]
    pub fn new(name: ModuleName, component: ExposedComponent) -> Self {
        Self { name, component }
    }
}

impl RemoteModule for ExposedModule {
    fn name(&self) -> &ModuleName {
        &self.name
    }

    fn title(&self) -> &str {
        &self.component.title
    }

    fn mount(&self, target: &MountTarget) -> Fragment {
        Fragment {
            title: self.component.title.clone(),
            html: format!(
                "<section data-remote=\"{}\" data-route=\"{}\">{}</section>",
                self.name, target.route_path, self.component.html
            ),
        }
    }
}
