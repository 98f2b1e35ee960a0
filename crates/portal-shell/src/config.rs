//! Shell configuration
//!
//! Sources are merged in this order (later sources override earlier):
//! 1. Defaults from [`ShellConfig::default`]
//! 2. TOML file, if one is given and exists
//! 3. Environment variables prefixed with `PORTAL_` (e.g. `PORTAL_REMOTE_HOST`)

use crate::error::ShellResult;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use portal_registry::{ModuleRegistry, RegistryBuilder};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable prefix for shell settings
pub const ENV_PREFIX: &str = "PORTAL_";

/// Host settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Host the built-in remotes are served from; each gets its own port
    pub remote_host: String,
    /// Optional federation manifest replacing the built-in remotes
    pub manifest: Option<PathBuf>,
    /// Per-fetch timeout in seconds
    pub fetch_timeout_secs: u64,
    /// Title shown on the home view
    pub title: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            remote_host: "http://localhost".to_string(),
            manifest: None,
            fetch_timeout_secs: 10,
            title: "shell".to_string(),
        }
    }
}

impl ShellConfig {
    /// Figment with every configuration source layered
    #[must_use]
    pub fn figment(config_path: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        if let Some(path) = config_path {
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading shell config file");
                figment = figment.merge(Toml::file(path));
            } else {
                tracing::warn!(path = %path.display(), "shell config file not found, using defaults");
            }
        }

        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Load configuration from all sources
    ///
    /// # Errors
    /// - `ShellError::Config` if a source has the wrong shape
    pub fn load(config_path: Option<&Path>) -> ShellResult<Self> {
        let config: Self = Self::figment(config_path).extract()?;
        tracing::info!(
            remote_host = %config.remote_host,
            manifest = ?config.manifest,
            fetch_timeout_secs = config.fetch_timeout_secs,
            "shell configuration loaded"
        );
        Ok(config)
    }

    /// Per-fetch timeout
    #[inline]
    #[must_use]
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Build the remote registry these settings describe
    ///
    /// A manifest, when configured, replaces the built-in remotes entirely.
    ///
    /// # Errors
    /// - `ShellError::Registry` if the manifest is unreadable or invalid
    pub fn build_registry(&self) -> ShellResult<ModuleRegistry> {
        let registry = match &self.manifest {
            Some(path) => ModuleRegistry::from_manifest_file(path)?,
            None => RegistryBuilder::with_defaults(&self.remote_host)?.build(),
        };
        tracing::debug!(remotes = registry.len(), "remote registry built");
        Ok(registry)
    }

    /// Settings as TOML
    ///
    /// # Errors
    /// - `toml::ser::Error` if serialization fails
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_without_sources() {
        Jail::expect_with(|_jail| {
            let config: ShellConfig = ShellConfig::figment(None).extract()?;
            assert_eq!(config, ShellConfig::default());
            assert_eq!(config.fetch_timeout(), Duration::from_secs(10));
            Ok(())
        });
    }

    #[test]
    fn environment_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "shell.toml",
                r#"
                    remote_host = "http://from-file"
                    title = "intranet"
                "#,
            )?;
            jail.set_env("PORTAL_REMOTE_HOST", "http://portal.internal");
            jail.set_env("PORTAL_FETCH_TIMEOUT_SECS", "3");

            let config: ShellConfig = ShellConfig::figment(Some(Path::new("shell.toml"))).extract()?;
            assert_eq!(config.remote_host, "http://portal.internal");
            assert_eq!(config.title, "intranet");
            assert_eq!(config.fetch_timeout_secs, 3);
            Ok(())
        });
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        Jail::expect_with(|_jail| {
            let config: ShellConfig =
                ShellConfig::figment(Some(Path::new("absent.toml"))).extract()?;
            assert_eq!(config.title, "shell");
            Ok(())
        });
    }

    #[test]
    fn bad_timeout_is_rejected() {
        Jail::expect_with(|jail| {
            jail.set_env("PORTAL_FETCH_TIMEOUT_SECS", "soon");
            assert!(ShellConfig::load(None).is_err());
            Ok(())
        });
    }

    #[test]
    fn registry_from_host() {
        let config = ShellConfig {
            remote_host: "http://intranet".to_string(),
            ..ShellConfig::default()
        };
        let registry = config.build_registry().unwrap();
        assert_eq!(registry.len(), 7);
        assert_eq!(
            registry.resolve("dashboard").unwrap().entry_location().as_str(),
            "http://intranet:4203/remoteEntry.json"
        );
    }

    #[test]
    fn registry_from_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("federation.json");
        std::fs::write(&path, r#"{ "dashboard": "https://cdn.example.com/dashboard" }"#).unwrap();

        let config = ShellConfig {
            manifest: Some(path),
            ..ShellConfig::default()
        };
        let registry = config.build_registry().unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("dashboard"));
    }

    #[test]
    fn toml_round_trip_keeps_title() {
        let toml = ShellConfig::default().to_toml().unwrap();
        assert!(toml.contains("title = \"shell\""));
    }
}
