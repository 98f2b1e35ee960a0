//! Page markup: navigation list plus content region
//!
//! One minijinja template registered as `page.html`, so every interpolated
//! value is HTML-escaped unless marked `safe`.

use crate::router::RouteTable;
use crate::view::View;
use minijinja::{context, Environment};
use serde::Serialize;
use std::fmt;

const PAGE_TEMPLATE_NAME: &str = "page.html";

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>{{ title }}</title>
</head>
<body>
  <nav>
    <ul>
{%- for item in nav %}
      <li><a href="{{ item.path|safe }}"{% if item.current %} aria-current="page"{% endif %}>{{ item.label }}</a></li>
{%- endfor %}
    </ul>
  </nav>
  <main data-view="{{ content.kind }}">
{%- if content.kind == "home" %}
    <h1>Welcome {{ content.title }}</h1>
{%- elif content.kind == "loading" %}
    <div role="status" aria-busy="true">Loading {{ content.module }}…</div>
{%- elif content.kind == "module" %}
    {{ content.html|safe }}
{%- elif content.kind == "error" %}
    <div role="alert">
      <h2>{{ content.module }} is unavailable</h2>
      <p>{{ content.message }}</p>
{%- if content.retryable and retry_href %}
      <a href="{{ retry_href|safe }}" data-action="retry">Retry</a>
{%- endif %}
    </div>
{%- else %}
    <h2>No page at {{ content.path }}</h2>
{%- endif %}
  </main>
</body>
</html>
"#;

/// Menu entry as the template sees it
#[derive(Debug, Serialize)]
struct NavItem<'a> {
    path: &'a str,
    label: &'a str,
    current: bool,
}

/// Content region as the template sees it; `kind` matches [`View::kind`]
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
enum Content<'a> {
    Home {
        title: &'a str,
    },
    Loading {
        module: &'a str,
    },
    // Remote markup is trusted and inserted as published
    Module {
        html: &'a str,
    },
    Error {
        module: &'a str,
        message: &'a str,
        retryable: bool,
    },
    NotFound {
        path: &'a str,
    },
}

impl<'a> From<&'a View> for Content<'a> {
    fn from(view: &'a View) -> Self {
        match view {
            View::Home { title } => Self::Home { title },
            View::Loading { module } => Self::Loading {
                module: module.as_str(),
            },
            View::Module { fragment, .. } => Self::Module {
                html: &fragment.html,
            },
            View::Error {
                module,
                message,
                retryable,
            } => Self::Error {
                module,
                message,
                retryable: *retryable,
            },
            View::NotFound { path } => Self::NotFound { path },
        }
    }
}

/// Compiled page template
pub struct Layout {
    env: Environment<'static>,
}

impl Layout {
    /// Compile the page template
    ///
    /// # Errors
    /// Returns the template syntax error, if any.
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template(PAGE_TEMPLATE_NAME, PAGE_TEMPLATE)?;
        Ok(Self { env })
    }

    /// Render a full page for a view
    ///
    /// `active_path` is the normalized path of the current route; its menu
    /// entry is marked with `aria-current="page"` and a retryable error links
    /// back to it. Route paths come from the route table and are emitted
    /// unescaped; everything else is escaped.
    ///
    /// # Errors
    /// Returns the minijinja error if rendering fails.
    pub fn render_page(
        &self,
        routes: &RouteTable,
        active_path: &str,
        view: &View,
    ) -> Result<String, minijinja::Error> {
        let nav: Vec<NavItem<'_>> = routes
            .entries()
            .iter()
            .map(|entry| NavItem {
                path: &entry.path,
                label: &entry.label,
                current: entry.path == active_path,
            })
            .collect();
        let retry_href = routes
            .entries()
            .iter()
            .find(|entry| entry.path == active_path)
            .map(|entry| entry.path.as_str());

        let template = self.env.get_template(PAGE_TEMPLATE_NAME)?;
        template.render(context! {
            title => view.title(),
            nav => nav,
            retry_href => retry_href,
            content => Content::from(view),
        })
    }
}

impl fmt::Debug for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Layout")
            .field("template", &PAGE_TEMPLATE_NAME)
            .finish()
    }
}
