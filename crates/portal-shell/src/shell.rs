//! Host shell
//!
//! Owns the navigation state and turns routes into views. Every navigation
//! gets a generation number; a load that finishes after the user has moved
//! on is reported as [`Mounted::Stale`] and never replaces the current view.
//! The loader keeps the module cached either way.

use crate::config::ShellConfig;
use crate::error::{ShellError, ShellResult};
use crate::layout::Layout;
use crate::router::{normalize, RouteMatch, RouteTable, RouteTarget, HOME_PATH};
use crate::view::View;
use parking_lot::Mutex;
use portal_loader::{EntryFetcher, ModuleLoader};
use std::sync::Arc;

/// One navigation event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    /// Normalized path navigated to
    pub path: String,
    /// Monotonic navigation counter at the time of the event
    pub generation: u64,
}

/// Outcome of resolving a navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mounted {
    /// Navigation is still current; this is what the content region shows
    Current(View),
    /// User navigated elsewhere before the load finished; nothing was mounted
    Stale {
        /// Path of the abandoned navigation
        path: String,
    },
}

impl Mounted {
    /// View, if it was mounted
    #[inline]
    #[must_use]
    pub fn view(&self) -> Option<&View> {
        match self {
            Self::Current(view) => Some(view),
            Self::Stale { .. } => None,
        }
    }
}

#[derive(Debug)]
struct NavigationState {
    history: Vec<String>,
    cursor: usize,
    generation: u64,
}

impl NavigationState {
    fn new() -> Self {
        Self {
            history: vec![HOME_PATH.to_string()],
            cursor: 0,
            generation: 0,
        }
    }

    fn current(&self) -> Navigation {
        Navigation {
            path: self.history[self.cursor].clone(),
            generation: self.generation,
        }
    }

    fn advance(&mut self) -> Navigation {
        self.generation += 1;
        self.current()
    }
}

/// Composes remote modules under a shared navigation
#[derive(Debug)]
pub struct Shell {
    title: String,
    routes: RouteTable,
    layout: Layout,
    loader: Arc<ModuleLoader>,
    navigation: Mutex<NavigationState>,
}

impl Shell {
    /// Create shell over a route table and loader
    ///
    /// # Errors
    /// - `ShellError::Registry` if a route names a module the loader's
    ///   registry does not know
    /// - `ShellError::Template` if the page template does not compile
    pub fn new(
        title: impl Into<String>,
        routes: RouteTable,
        loader: Arc<ModuleLoader>,
    ) -> ShellResult<Self> {
        routes.validate(loader.registry())?;
        for name in routes.unrouted(loader.registry()) {
            tracing::warn!(module = %name, "registered remote has no route");
        }
        Ok(Self {
            title: title.into(),
            routes,
            layout: Layout::new()?,
            loader,
            navigation: Mutex::new(NavigationState::new()),
        })
    }

    /// Assemble the shell described by a configuration
    ///
    /// # Errors
    /// - `ShellError::Registry` for registry or route problems
    /// - `ShellError::HttpClient` if the HTTP client cannot be built
    pub fn from_config(config: &ShellConfig) -> ShellResult<Self> {
        let registry = Arc::new(config.build_registry()?);
        let fetcher = EntryFetcher::new(config.fetch_timeout())
            .map_err(|e| ShellError::HttpClient(e.to_string()))?;
        let loader = Arc::new(ModuleLoader::new(registry, Arc::new(fetcher)));
        Self::new(config.title.clone(), RouteTable::with_defaults(), loader)
    }

    /// Route table
    #[inline]
    #[must_use]
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Loader backing the remote routes
    #[inline]
    #[must_use]
    pub fn loader(&self) -> &Arc<ModuleLoader> {
        &self.loader
    }

    /// Currently active navigation
    #[must_use]
    pub fn current(&self) -> Navigation {
        self.navigation.lock().current()
    }

    /// Check if a navigation is still the active one
    #[must_use]
    pub fn is_current(&self, navigation: &Navigation) -> bool {
        self.navigation.lock().generation == navigation.generation
    }

    /// Navigate to a path, dropping any forward history
    pub fn navigate(&self, path: &str) -> Navigation {
        let path = normalize(path).to_string();
        let mut state = self.navigation.lock();
        let keep = state.cursor + 1;
        state.history.truncate(keep);
        state.history.push(path);
        state.cursor = keep;
        let navigation = state.advance();
        tracing::debug!(path = %navigation.path, generation = navigation.generation, "navigate");
        navigation
    }

    /// Step back in history; `None` at the oldest entry
    pub fn back(&self) -> Option<Navigation> {
        let mut state = self.navigation.lock();
        if state.cursor == 0 {
            return None;
        }
        state.cursor -= 1;
        Some(state.advance())
    }

    /// Step forward in history; `None` at the newest entry
    pub fn forward(&self) -> Option<Navigation> {
        let mut state = self.navigation.lock();
        if state.cursor + 1 >= state.history.len() {
            return None;
        }
        state.cursor += 1;
        Some(state.advance())
    }

    /// View for the active route as it stands right now, without waiting
    #[must_use]
    pub fn current_view(&self) -> View {
        let path = self.current().path;
        match self.routes.route(&path) {
            RouteMatch::Fallback => View::NotFound { path },
            RouteMatch::Matched(entry) => match &entry.target {
                RouteTarget::Home => self.home(),
                RouteTarget::Remote(module) => match self.loader.state(module.as_str()) {
                    Ok(state) => View::for_state(module, &state, &entry.path),
                    Err(err) => View::failed(module.as_str(), &err),
                },
            },
        }
    }

    /// Load whatever a navigation needs and mount it if still current
    pub async fn resolve(&self, navigation: &Navigation) -> Mounted {
        let view = match self.routes.route(&navigation.path) {
            RouteMatch::Fallback => View::NotFound {
                path: navigation.path.clone(),
            },
            RouteMatch::Matched(entry) => match &entry.target {
                RouteTarget::Home => self.home(),
                RouteTarget::Remote(module) => match self.loader.load(module.as_str()).await {
                    Ok(loaded) => View::mounted(&loaded, &entry.path),
                    Err(err) => View::failed(module.as_str(), &err),
                },
            },
        };

        if self.is_current(navigation) {
            Mounted::Current(view)
        } else {
            tracing::warn!(
                path = %navigation.path,
                generation = navigation.generation,
                view = view.kind(),
                "discarding result of superseded navigation"
            );
            Mounted::Stale {
                path: navigation.path.clone(),
            }
        }
    }

    /// Navigate to a path and resolve it
    pub async fn visit(&self, path: &str) -> Mounted {
        let navigation = self.navigate(path);
        self.resolve(&navigation).await
    }

    /// Re-resolve the active path, re-attempting a failed load
    pub async fn retry(&self) -> Mounted {
        let navigation = self.navigation.lock().advance();
        tracing::info!(path = %navigation.path, "retrying navigation");
        self.resolve(&navigation).await
    }

    /// Page markup for a view, with the active route highlighted
    ///
    /// # Errors
    /// - `ShellError::Template` if the page cannot be rendered
    pub fn render(&self, view: &View) -> ShellResult<String> {
        let page = self
            .layout
            .render_page(&self.routes, &self.current().path, view)
            .inspect_err(|err| {
                tracing::error!(error = %err, view = view.kind(), "page render failed");
            })?;
        Ok(page)
    }

    fn home(&self) -> View {
        View::Home {
            title: self.title.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_state_history() {
        let mut state = NavigationState::new();
        assert_eq!(state.current().path, "/");
        assert_eq!(state.current().generation, 0);

        state.history.push("/dashboard".to_string());
        state.cursor = 1;
        let nav = state.advance();
        assert_eq!(nav.path, "/dashboard");
        assert_eq!(nav.generation, 1);
    }

    #[test]
    fn mounted_view_accessor() {
        let stale = Mounted::Stale {
            path: "/dashboard".to_string(),
        };
        assert!(stale.view().is_none());

        let current = Mounted::Current(View::NotFound {
            path: "/x".to_string(),
        });
        assert!(current.view().is_some());
    }
}
