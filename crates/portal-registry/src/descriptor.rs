//! Remote module descriptors
//!
//! A [`RemoteModuleDescriptor`] names a remote, says where its published
//! entry point lives and which symbol the host expects it to expose.

use crate::error::RegistryError;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::path::PathBuf;

/// Symbol every portal publishes by convention
pub const DEFAULT_EXPOSED_KEY: &str = "Module";

/// File name of the remote entry below a remote's base URL
pub const REMOTE_ENTRY_FILE: &str = "remoteEntry.json";

/// Logical name of a remote module (e.g. `employee-portal`)
///
/// Names are non-empty and restricted to lowercase ASCII letters, digits,
/// `-` and `_`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModuleName(String);

impl ModuleName {
    /// Validate and wrap a module name
    pub fn new(name: impl Into<String>) -> Result<Self, RegistryError> {
        let name = name.into();
        if name.is_empty() {
            return Err(RegistryError::invalid_name(name, "name is empty"));
        }
        if let Some(bad) = name
            .chars()
            .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-' || *c == '_'))
        {
            return Err(RegistryError::invalid_name(
                name.clone(),
                format!("unexpected character '{bad}'"),
            ));
        }
        Ok(Self(name))
    }

    /// Borrow the name
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compare against another spelling, treating `-` and `_` as equal
    ///
    /// Build tooling tends to publish `employee_portal` for a remote the host
    /// imports as `employee-portal`.
    #[must_use]
    pub fn matches_loosely(&self, other: &str) -> bool {
        self.0.len() == other.len()
            && self
                .0
                .chars()
                .zip(other.chars())
                .all(|(a, b)| a == b || (matches!(a, '-' | '_') && matches!(b, '-' | '_')))
    }
}

impl TryFrom<String> for ModuleName {
    type Error = RegistryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ModuleName> for String {
    fn from(value: ModuleName) -> Self {
        value.0
    }
}

impl Borrow<str> for ModuleName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ModuleName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a remote's entry point is published
///
/// Either an `http(s)://` URL or a filesystem path (optionally `file://`).
/// Resolvability is only checked when the loader fetches it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryLocation(String);

/// Transport needed to reach an [`EntryLocation`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationKind<'a> {
    /// Fetched over HTTP(S)
    Http(&'a str),
    /// Read from the local filesystem
    File(PathBuf),
}

impl EntryLocation {
    /// Wrap a location string
    pub fn new(location: impl Into<String>) -> Result<Self, RegistryError> {
        let location = location.into();
        if location.trim().is_empty() {
            return Err(RegistryError::InvalidLocation {
                location,
                reason: "location is empty".to_string(),
            });
        }
        Ok(Self(location))
    }

    /// Derive the entry location below a remote's base URL
    ///
    /// `http://localhost:4201` becomes `http://localhost:4201/remoteEntry.json`.
    pub fn under_base(base: &str) -> Result<Self, RegistryError> {
        Self::new(format!("{}/{}", base.trim_end_matches('/'), REMOTE_ENTRY_FILE))
    }

    /// Borrow the raw location
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Classify the location by transport
    #[must_use]
    pub fn kind(&self) -> LocationKind<'_> {
        if self.0.starts_with("http://") || self.0.starts_with("https://") {
            LocationKind::Http(&self.0)
        } else if let Some(path) = self.0.strip_prefix("file://") {
            LocationKind::File(PathBuf::from(path))
        } else {
            LocationKind::File(PathBuf::from(&self.0))
        }
    }
}

impl fmt::Display for EntryLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything the host needs to know about one remote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteModuleDescriptor {
    name: ModuleName,
    entry_location: EntryLocation,
    exposed_key: String,
}

impl RemoteModuleDescriptor {
    /// Descriptor exposing the conventional `Module` symbol
    #[inline]
    #[must_use]
    pub fn new(name: ModuleName, entry_location: EntryLocation) -> Self {
        Self {
            name,
            entry_location,
            exposed_key: DEFAULT_EXPOSED_KEY.to_string(),
        }
    }

    /// Override the exposed symbol
    #[inline]
    #[must_use]
    pub fn with_exposed_key(mut self, key: impl Into<String>) -> Self {
        self.exposed_key = key.into();
        self
    }

    /// Logical module name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &ModuleName {
        &self.name
    }

    /// Published entry point
    #[inline]
    #[must_use]
    pub fn entry_location(&self) -> &EntryLocation {
        &self.entry_location
    }

    /// Symbol the remote is expected to expose
    #[inline]
    #[must_use]
    pub fn exposed_key(&self) -> &str {
        &self.exposed_key
    }
}
