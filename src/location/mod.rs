//! Location parsing for rexec.
//!
//! This module handles:
//! - Classifying a location string as local or `host:path` remote
//! - Decomposing it into a tagged [`Location`]

pub mod parser;

pub use parser::{Location, classify, decompose};
