//! Rexec - run commands against local paths or `host:path` remote locations.
//!
//! This library provides the core functionality for rexec, including:
//! - Location parsing (`/srv/pkgs` vs `mirror:/srv/pkgs`)
//! - `::host::` / `::path::` command templating
//! - Local shell or ssh execution with a uniform result contract
//! - Configuration file parsing and cascade discovery
//!
//! # Example
//!
//! ```no_run
//! use rexec_cli::config::load_merged_config;
//! use rexec_cli::exec::{Dispatcher, PassthroughOptions};
//!
//! let cwd = std::env::current_dir().unwrap();
//! let config = load_merged_config(&cwd).unwrap();
//! let dispatcher = Dispatcher::new(config);
//!
//! let options = PassthroughOptions::new().with('o', Some("ConnectTimeout=5")).unwrap();
//! let result = dispatcher
//!     .execute("mirror:/srv/pkgs", "mkdir -p ::path::/incoming", &options)
//!     .unwrap();
//! println!("exit code: {}", result.exit_code);
//! ```

pub mod config;
pub mod error;
pub mod exec;
pub mod location;
pub mod template;

pub use error::{Result, RexecError};
pub use exec::{Dispatcher, ExecutionResult, Outcome, PassthroughOptions};
pub use location::Location;
