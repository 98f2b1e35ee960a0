//! Route table
//!
//! Maps URL paths to either the built-in home view or a remote module.
//! Matching is exact on the normalized path; anything else falls back to the
//! not-found view instead of failing.

use portal_registry::{ModuleName, ModuleRegistry, RegistryError, RegistryResult};

/// Path of the built-in home view
pub const HOME_PATH: &str = "/";

/// Navigation labels and paths of the built-in portals, in menu order
const PORTAL_ROUTES: [(&str, &str, &str); 7] = [
    ("/employee-portal", "EmployeePortal", "employee-portal"),
    ("/attendance-portal", "AttendancePortal", "attendance-portal"),
    ("/dashboard", "Dashboard", "dashboard"),
    ("/payroll-portal", "PayrollPortal", "payroll-portal"),
    ("/inventory-portal", "InventoryPortal", "inventory-portal"),
    ("/post-portal", "PostPortal", "post-portal"),
    ("/sales-portal", "SalesPortal", "sales-portal"),
];

/// What a route renders
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteTarget {
    /// Built-in home view
    Home,
    /// Remote module, loaded on first visit
    Remote(ModuleName),
}

/// One route: path, menu label and target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    /// Normalized path (`/dashboard`)
    pub path: String,
    /// Label shown in the navigation list
    pub label: String,
    /// What the route renders
    pub target: RouteTarget,
}

impl RouteEntry {
    /// Route to the home view
    #[must_use]
    pub fn home(label: impl Into<String>) -> Self {
        Self {
            path: HOME_PATH.to_string(),
            label: label.into(),
            target: RouteTarget::Home,
        }
    }

    /// Route to a remote module
    #[must_use]
    pub fn remote(path: &str, label: impl Into<String>, module: ModuleName) -> Self {
        Self {
            path: normalize(path).to_string(),
            label: label.into(),
            target: RouteTarget::Remote(module),
        }
    }

    /// Module this route loads, if any
    #[inline]
    #[must_use]
    pub fn module(&self) -> Option<&ModuleName> {
        match &self.target {
            RouteTarget::Remote(name) => Some(name),
            RouteTarget::Home => None,
        }
    }
}

/// Result of matching a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteMatch<'a> {
    /// Path matched a route
    Matched(&'a RouteEntry),
    /// Nothing matched; render the not-found view
    Fallback,
}

/// Ordered set of routes
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    /// Empty table
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Home plus one route per built-in portal
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut table = Self::new().with_route(RouteEntry::home("Home"));
        for (path, label, module) in PORTAL_ROUTES {
            match ModuleName::new(module) {
                Ok(name) => table = table.with_route(RouteEntry::remote(path, label, name)),
                Err(err) => {
                    tracing::error!(path, module, error = %err, "skipping built-in route");
                }
            }
        }
        table
    }

    /// Add a route; a later route with the same path replaces the earlier one
    #[must_use]
    pub fn with_route(mut self, entry: RouteEntry) -> Self {
        match self.entries.iter_mut().find(|e| e.path == entry.path) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
        self
    }

    /// Match a URL path
    ///
    /// Query string and fragment are ignored, as is a trailing slash.
    #[must_use]
    pub fn route(&self, path: &str) -> RouteMatch<'_> {
        let path = normalize(path);
        let matched = self.entries.iter().find(|entry| entry.path == path);
        tracing::debug!(path, matched = matched.is_some(), "routing");
        matched.map_or(RouteMatch::Fallback, RouteMatch::Matched)
    }

    /// Check that every remote route names a registered module
    ///
    /// # Errors
    /// - `RegistryError::NotFound` for the first unregistered module
    pub fn validate(&self, registry: &ModuleRegistry) -> RegistryResult<()> {
        self.entries
            .iter()
            .filter_map(RouteEntry::module)
            .find(|name| !registry.contains(name.as_str()))
            .map_or(Ok(()), |name| Err(RegistryError::NotFound(name.to_string())))
    }

    /// Registered remotes no route leads to, in registry order
    #[must_use]
    pub fn unrouted<'r>(&self, registry: &'r ModuleRegistry) -> Vec<&'r ModuleName> {
        registry
            .iter()
            .map(|descriptor| descriptor.name())
            .filter(|name| !self.entries.iter().any(|entry| entry.module() == Some(*name)))
            .collect()
    }

    /// Routes in menu order
    #[inline]
    #[must_use]
    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }
}

/// Strip query, fragment and trailing slash; empty becomes `/`
#[must_use]
pub fn normalize(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let path = path[..end].trim_end_matches('/');
    if path.is_empty() {
        HOME_PATH
    } else {
        path
    }
}
