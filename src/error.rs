use std::path::PathBuf;

/// Library-level structured errors for rexec.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum RexecError {
	#[error("Missing required argument: {name}")]
	MissingArgument { name: &'static str },

	#[error("Invalid location '{raw}': {reason}")]
	InvalidLocation { raw: String, reason: &'static str },

	#[error("Invalid passthrough option -{flag}: {reason}")]
	InvalidOption { flag: char, reason: &'static str },

	#[error("Could not connect to {host} (ssh exit status {status})")]
	SshConnectionError { host: String, status: i32 },

	#[error("Config file not found: {path}")]
	ConfigNotFound { path: PathBuf },

	#[error("Failed to read config file: {path}")]
	ConfigReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse config file: {path}")]
	ConfigParseError {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Invalid config value for {key}: {reason}")]
	InvalidConfig { key: &'static str, reason: &'static str },

	#[error("Command execution failed: {command}")]
	CommandFailed {
		command: String,
		#[source]
		source: std::io::Error,
	},

	#[error("Command not found: {command}")]
	CommandNotFound { command: String },

	#[error("Failed to resolve home directory")]
	HomeDirectoryNotFound,
}

/// Exit codes the CLI reports for each error kind.
pub mod exit_code {
	/// Missing argument or malformed passthrough option (EX_USAGE).
	pub const USAGE: u8 = 64;
	/// Empty or unparseable location string (EX_DATAERR).
	pub const INVALID_LOCATION: u8 = 65;
	/// Spawning the command failed for a reason other than "not found".
	pub const CANNOT_EXECUTE: u8 = 126;
	/// Program, shell or ssh client not found.
	pub const NOT_FOUND: u8 = 127;
	/// Unusable configuration (EX_CONFIG).
	pub const CONFIG: u8 = 78;
	/// The secure-shell transport could not reach the host.
	pub const CONNECTION: u8 = 255;
}

impl RexecError {
	/// The process exit code the CLI uses when this error aborts a run.
	pub fn exit_code(&self) -> u8 {
		match self {
			RexecError::MissingArgument { .. } | RexecError::InvalidOption { .. } => {
				exit_code::USAGE
			}
			RexecError::InvalidLocation { .. } => exit_code::INVALID_LOCATION,
			RexecError::SshConnectionError { .. } => exit_code::CONNECTION,
			RexecError::ConfigNotFound { .. }
			| RexecError::ConfigReadError { .. }
			| RexecError::ConfigParseError { .. }
			| RexecError::InvalidConfig { .. }
			| RexecError::HomeDirectoryNotFound => exit_code::CONFIG,
			RexecError::CommandFailed { .. } => exit_code::CANNOT_EXECUTE,
			RexecError::CommandNotFound { .. } => exit_code::NOT_FOUND,
		}
	}
}

/// Result type alias using RexecError.
pub type Result<T> = std::result::Result<T, RexecError>;
