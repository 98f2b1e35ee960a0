//! Federation manifest loading
//!
//! A manifest maps remote names to where they are deployed, so the same host
//! build can be pointed at different environments:
//!
//! ```json
//! {
//!   "employee-portal": "https://portals.example.com/employee",
//!   "dashboard": { "entry": "https://cdn.example.com/dash/entry.json", "exposedKey": "Module" }
//! }
//! ```
//!
//! A plain string is a base URL and the entry is derived as
//! `{base}/remoteEntry.json`; the object form names the entry directly.

use crate::descriptor::{EntryLocation, ModuleName, RemoteModuleDescriptor};
use crate::error::{RegistryError, RegistryResult};
use crate::registry::{ModuleRegistry, RegistryBuilder};
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ManifestEntry {
    Base(String),
    Explicit {
        entry: String,
        #[serde(rename = "exposedKey")]
        exposed_key: Option<String>,
    },
}

impl ManifestEntry {
    fn into_descriptor(self, name: ModuleName) -> RegistryResult<RemoteModuleDescriptor> {
        match self {
            Self::Base(base) => Ok(RemoteModuleDescriptor::new(
                name,
                EntryLocation::under_base(&base)?,
            )),
            Self::Explicit { entry, exposed_key } => {
                let descriptor = RemoteModuleDescriptor::new(name, EntryLocation::new(entry)?);
                Ok(match exposed_key {
                    Some(key) => descriptor.with_exposed_key(key),
                    None => descriptor,
                })
            }
        }
    }
}

impl ModuleRegistry {
    /// Build a registry from manifest JSON
    ///
    /// # Errors
    /// - `RegistryError::Manifest` if the JSON is malformed
    /// - `RegistryError::InvalidName` / `InvalidLocation` for bad entries
    pub fn from_manifest_str(json: &str) -> RegistryResult<Self> {
        let entries: IndexMap<String, ManifestEntry> = serde_json::from_str(json)?;
        entries
            .into_iter()
            .try_fold(RegistryBuilder::new(), |builder, (name, entry)| {
                let descriptor = entry.into_descriptor(ModuleName::new(name)?)?;
                builder.register(descriptor)
            })
            .map(RegistryBuilder::build)
    }

    /// Build a registry from a manifest file
    ///
    /// # Errors
    /// - `RegistryError::Io` if the file cannot be read
    /// - anything [`ModuleRegistry::from_manifest_str`] returns
    pub fn from_manifest_file(path: impl AsRef<Path>) -> RegistryResult<Self> {
        let path = path.as_ref();
        let json =
            std::fs::read_to_string(path).map_err(|e| RegistryError::io_error(path, e))?;
        Self::from_manifest_str(&json)
    }
}
