//! Command templating for rexec.
//!
//! This module handles:
//! - `::host::` / `::path::` placeholder substitution
//! - Quoting words for a remote shell command line

pub mod quote;
pub mod substitute;

pub use quote::{join_words, shell_quote};
pub use substitute::{CommandTemplate, HOST_PLACEHOLDER, PATH_PLACEHOLDER, substitute};
