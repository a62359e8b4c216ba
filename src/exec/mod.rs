//! Command execution for rexec.
//!
//! This module handles:
//! - Choosing local shell evaluation or an ssh session per location
//! - Passthrough flags for the ssh client
//! - Exit status normalization, separating connection failures from
//!   command failures

pub mod dispatcher;
pub mod options;
pub mod process;
pub mod ssh;

pub use dispatcher::{Dispatcher, ExecutionResult, Outcome, Plan, ShellLine};
pub use options::{PassthroughFlag, PassthroughOptions};
pub use process::{exit_code_of, spawn_status};
pub use ssh::{CONNECTION_FAILURE_STATUS, SshTransport};
