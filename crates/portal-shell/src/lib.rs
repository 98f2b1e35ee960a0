//! Portal Shell
//!
//! Host application of the portal: a route table, a navigation list, and a
//! content region into which remote portal modules are mounted on first
//! visit.
//!
//! # Example
//!
//! ```rust,ignore
//! use portal_shell::{Mounted, Shell, ShellConfig};
//!
//! # async fn example() -> Result<(), portal_shell::ShellError> {
//! let config = ShellConfig::load(None)?;
//! let shell = Shell::from_config(&config)?;
//!
//! if let Mounted::Current(view) = shell.visit("/attendance-portal").await {
//!     println!("{}", shell.render(&view)?);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod error;
pub mod layout;
pub mod router;
pub mod shell;
pub mod view;

pub use config::{ShellConfig, ENV_PREFIX};
pub use error::{ShellError, ShellResult};
pub use layout::Layout;
pub use router::{RouteEntry, RouteMatch, RouteTable, RouteTarget, HOME_PATH};
pub use shell::{Mounted, Navigation, Shell};
pub use view::View;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
