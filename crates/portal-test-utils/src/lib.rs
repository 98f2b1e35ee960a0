//! Testing utilities for the portal workspace
//!
//! Shared fakes, fixtures, and remote entry builders.

#![allow(missing_docs)]

use async_trait::async_trait;
use parking_lot::Mutex;
use portal_loader::{LoadError, ModuleLoader, RemoteFetcher};
use portal_registry::{ModuleRegistry, RegistryBuilder, RemoteModuleDescriptor, DEFAULT_REMOTES};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Host the test registry points every remote at
pub const TEST_REMOTE_HOST: &str = "http://remotes.test";

/// What a [`ScriptedFetcher`] answers for one fetch
#[derive(Debug, Clone)]
pub enum Reply {
    Entry(Vec<u8>),
    Network(String),
    Status(u16),
}

/// In-memory [`RemoteFetcher`] with scripted replies and per-module gates
///
/// One-shot replies queued with [`ScriptedFetcher::push`] are consumed first;
/// after that the reply set with [`ScriptedFetcher::serve`] is repeated.
/// A module put on [`ScriptedFetcher::hold`] blocks in `fetch` until
/// [`ScriptedFetcher::release`] is called.
#[derive(Debug, Default)]
pub struct ScriptedFetcher {
    queued: Mutex<HashMap<String, VecDeque<Reply>>>,
    standing: Mutex<HashMap<String, Reply>>,
    gates: Mutex<HashMap<String, Arc<Semaphore>>>,
    calls: Mutex<HashMap<String, u64>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetcher serving a well-formed entry for every built-in portal
    pub fn serving_portals() -> Self {
        let fetcher = Self::new();
        for (name, _) in DEFAULT_REMOTES {
            fetcher.serve(name, Reply::Entry(portal_entry(name)));
        }
        fetcher
    }

    pub fn serve(&self, module: &str, reply: Reply) {
        self.standing.lock().insert(module.to_string(), reply);
    }

    pub fn push(&self, module: &str, reply: Reply) {
        self.queued
            .lock()
            .entry(module.to_string())
            .or_default()
            .push_back(reply);
    }

    pub fn hold(&self, module: &str) {
        self.gates
            .lock()
            .insert(module.to_string(), Arc::new(Semaphore::new(0)));
    }

    pub fn release(&self, module: &str) {
        if let Some(gate) = self.gates.lock().get(module) {
            gate.add_permits(1);
        }
    }

    pub fn calls(&self, module: &str) -> u64 {
        self.calls.lock().get(module).copied().unwrap_or(0)
    }

    fn next_reply(&self, module: &str) -> Option<Reply> {
        let queued = self
            .queued
            .lock()
            .get_mut(module)
            .and_then(VecDeque::pop_front);
        queued.or_else(|| self.standing.lock().get(module).cloned())
    }
}

#[async_trait]
impl RemoteFetcher for ScriptedFetcher {
    async fn fetch(&self, descriptor: &RemoteModuleDescriptor) -> Result<Vec<u8>, LoadError> {
        let module = descriptor.name().as_str();
        let location = descriptor.entry_location().as_str();
        *self.calls.lock().entry(module.to_string()).or_insert(0) += 1;

        let gate = self.gates.lock().get(module).cloned();
        if let Some(gate) = gate {
            let _permit = gate.acquire().await.expect("gate semaphore closed");
        }

        match self.next_reply(module) {
            Some(Reply::Entry(bytes)) => Ok(bytes),
            Some(Reply::Network(message)) => Err(LoadError::network(location, message)),
            Some(Reply::Status(status)) => Err(LoadError::Status {
                location: location.to_string(),
                status,
            }),
            None => Err(LoadError::network(location, "no reply scripted")),
        }
    }
}

/// Remote entry JSON exposing `./Module`
pub fn remote_entry(name: &str, title: &str, html: &str) -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({
        "name": name,
        "exposes": {
            "./Module": { "title": title, "html": html }
        }
    }))
    .expect("serialize remote entry")
}

/// Remote entry the way a portal build publishes it (`employee_portal`)
pub fn portal_entry(module: &str) -> Vec<u8> {
    remote_entry(
        &module.replace('-', "_"),
        &format!("{module} title"),
        &format!("<p>{module} content</p>"),
    )
}

/// Registry with every built-in portal under [`TEST_REMOTE_HOST`]
pub fn test_registry() -> Arc<ModuleRegistry> {
    Arc::new(
        RegistryBuilder::with_defaults(TEST_REMOTE_HOST)
            .expect("default registry")
            .build(),
    )
}

/// Loader over [`test_registry`] backed by the given fetcher
pub fn loader_with(fetcher: Arc<ScriptedFetcher>) -> Arc<ModuleLoader> {
    Arc::new(ModuleLoader::new(test_registry(), fetcher))
}
