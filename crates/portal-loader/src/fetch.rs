//! Remote entry fetchers
//!
//! [`RemoteFetcher`] is the loader's only I/O seam. [`EntryFetcher`] picks
//! HTTP or filesystem transport from the entry location.

use crate::error::LoadError;
use async_trait::async_trait;
use portal_registry::{LocationKind, RemoteModuleDescriptor};
use std::fmt::Debug;
use std::path::Path;
use std::time::Duration;

/// Default timeout for one remote entry request
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Retrieves the raw bytes of a remote entry
#[async_trait]
pub trait RemoteFetcher: Send + Sync + Debug {
    /// Fetch the artifact published at the descriptor's entry location
    async fn fetch(&self, descriptor: &RemoteModuleDescriptor) -> Result<Vec<u8>, LoadError>;
}

/// Fetches remote entries over HTTP(S)
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create fetcher with a per-request timeout
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("portal-shell/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    /// Fetch one URL
    pub async fn get(&self, url: &str) -> Result<Vec<u8>, LoadError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify(url, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status {
                location: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| classify(url, &e))?;
        Ok(body.to_vec())
    }
}

fn classify(url: &str, err: &reqwest::Error) -> LoadError {
    if err.is_timeout() {
        LoadError::Timeout {
            location: url.to_string(),
        }
    } else {
        LoadError::network(url, err.to_string())
    }
}

#[async_trait]
impl RemoteFetcher for HttpFetcher {
    async fn fetch(&self, descriptor: &RemoteModuleDescriptor) -> Result<Vec<u8>, LoadError> {
        self.get(descriptor.entry_location().as_str()).await
    }
}

/// Reads remote entries from the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FileFetcher;

impl FileFetcher {
    /// Read one path
    pub async fn read(&self, path: &Path) -> Result<Vec<u8>, LoadError> {
        tokio::fs::read(path).await.map_err(|source| LoadError::Io {
            location: path.display().to_string(),
            source,
        })
    }
}

#[async_trait]
impl RemoteFetcher for FileFetcher {
    async fn fetch(&self, descriptor: &RemoteModuleDescriptor) -> Result<Vec<u8>, LoadError> {
        match descriptor.entry_location().kind() {
            LocationKind::File(path) => self.read(&path).await,
            LocationKind::Http(url) => Err(LoadError::network(
                url,
                "file fetcher cannot reach http locations",
            )),
        }
    }
}

/// Dispatches on the location scheme: HTTP(S) or filesystem
#[derive(Debug, Clone)]
pub struct EntryFetcher {
    http: HttpFetcher,
    file: FileFetcher,
}

impl EntryFetcher {
    /// Create fetcher with an HTTP timeout
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            http: HttpFetcher::new(timeout)?,
            file: FileFetcher,
        })
    }
}

#[async_trait]
impl RemoteFetcher for EntryFetcher {
    async fn fetch(&self, descriptor: &RemoteModuleDescriptor) -> Result<Vec<u8>, LoadError> {
        match descriptor.entry_location().kind() {
            LocationKind::Http(url) => self.http.get(url).await,
            LocationKind::File(path) => self.file.read(&path).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portal_registry::{EntryLocation, ModuleName};
    use std::io::Write;

    fn descriptor(location: &str) -> RemoteModuleDescriptor {
        RemoteModuleDescriptor::new(
            ModuleName::new("dashboard").unwrap(),
            EntryLocation::new(location).unwrap(),
        )
    }

    #[tokio::test]
    async fn file_fetcher_reads_plain_and_file_urls() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{}}").unwrap();
        let path = file.path().display().to_string();

        let bytes = FileFetcher.fetch(&descriptor(&path)).await.unwrap();
        assert_eq!(bytes, b"{}");

        let bytes = FileFetcher
            .fetch(&descriptor(&format!("file://{path}")))
            .await
            .unwrap();
        assert_eq!(bytes, b"{}");
    }

    #[tokio::test]
    async fn file_fetcher_missing_file_is_io_error() {
        let err = FileFetcher
            .fetch(&descriptor("/nonexistent/remoteEntry.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn entry_fetcher_dispatches_files() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "entry").unwrap();

        let fetcher = EntryFetcher::new(DEFAULT_FETCH_TIMEOUT).unwrap();
        let bytes = fetcher
            .fetch(&descriptor(&file.path().display().to_string()))
            .await
            .unwrap();
        assert_eq!(bytes, b"entry");
    }
}
