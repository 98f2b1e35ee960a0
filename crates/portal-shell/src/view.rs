//! What the content region shows for the active route

use portal_loader::{Fragment, LoadState, LoaderError, MountTarget, RemoteModule};
use portal_registry::ModuleName;
use std::fmt;
use std::sync::Arc;

/// Content of the shell's main region
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    /// Built-in welcome page
    Home {
        /// Application title
        title: String,
    },
    /// Remote module is being fetched
    Loading {
        /// Module being fetched
        module: ModuleName,
    },
    /// Remote module mounted
    Module {
        /// Module that produced the fragment
        module: ModuleName,
        /// Mounted markup
        fragment: Fragment,
    },
    /// Remote module could not be shown
    Error {
        /// Module the route points at
        module: String,
        /// Human-readable cause
        message: String,
        /// Whether retrying may help
        retryable: bool,
    },
    /// No route matched
    NotFound {
        /// Path that was requested
        path: String,
    },
}

impl View {
    /// Mount a loaded module at a route
    #[must_use]
    pub fn mounted(module: &Arc<dyn RemoteModule>, route_path: &str) -> Self {
        Self::Module {
            module: module.name().clone(),
            fragment: module.mount(&MountTarget::new(route_path)),
        }
    }

    /// View for a failed load
    #[must_use]
    pub fn failed(module: &str, err: &LoaderError) -> Self {
        Self::Error {
            module: module.to_string(),
            message: err.to_string(),
            retryable: err.is_retryable(),
        }
    }

    /// View for a module in the given load state
    #[must_use]
    pub fn for_state(module: &ModuleName, state: &LoadState, route_path: &str) -> Self {
        match state {
            LoadState::NotRequested | LoadState::Loading => Self::Loading {
                module: module.clone(),
            },
            LoadState::Loaded(loaded) => Self::mounted(loaded, route_path),
            LoadState::Failed(err) => Self::Error {
                module: module.to_string(),
                message: err.to_string(),
                retryable: true,
            },
        }
    }

    /// Short kind name, used in logs and status output
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Home { .. } => "home",
            Self::Loading { .. } => "loading",
            Self::Module { .. } => "module",
            Self::Error { .. } => "error",
            Self::NotFound { .. } => "not-found",
        }
    }

    /// Check if view reports a failure
    #[inline]
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// Document title for the page
    #[must_use]
    pub fn title(&self) -> String {
        match self {
            Self::Home { title } => title.clone(),
            Self::Loading { module } => format!("Loading {module}"),
            Self::Module { fragment, .. } => fragment.title.clone(),
            Self::Error { module, .. } => format!("{module} unavailable"),
            Self::NotFound { .. } => "Not found".to_string(),
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Home { title } => write!(f, "home ({title})"),
            Self::Loading { module } => write!(f, "loading {module}"),
            Self::Module { module, .. } => write!(f, "module {module}"),
            Self::Error {
                module, message, ..
            } => write!(f, "error in {module}: {message}"),
            Self::NotFound { path } => write!(f, "not found: {path}"),
        }
    }
}
