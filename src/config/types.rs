use crate::error::{Result, RexecError};
use crate::exec::options::{PassthroughFlag, PassthroughOptions};
use crate::exec::ssh::SshTransport;
use serde::Deserialize;
use std::path::PathBuf;

/// Contents of one `.rexec.toml` file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ConfigFile {
	/// If true, stop the directory cascade here and jump to ~/.rexec.toml.
	#[serde(default)]
	pub root: bool,

	/// Environment variable name that, if truthy, skips ~/.rexec.toml lookup.
	#[serde(default)]
	pub root_config_lookup_disable_env_var: Option<String>,

	#[serde(default)]
	pub ssh: SshSection,

	#[serde(default)]
	pub local: LocalSection,
}

/// `[ssh]` table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct SshSection {
	/// ssh client program.
	pub program: Option<String>,

	/// Exit status the client uses for connection failures.
	pub connection_failure_status: Option<i32>,

	/// Flags passed on every remote invocation, after any given per call.
	#[serde(default)]
	pub options: Vec<PassthroughFlag>,
}

/// `[local]` table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct LocalSection {
	/// Shell used to evaluate command lines locally, invoked as `<shell> -c <line>`.
	pub shell: Option<String>,
}

impl ConfigFile {
	pub fn validate(&self) -> Result<()> {
		if matches!(self.ssh.program.as_deref(), Some(p) if p.trim().is_empty()) {
			return Err(RexecError::InvalidConfig {
				key: "ssh.program",
				reason: "must not be empty",
			});
		}

		if let Some(status) = self.ssh.connection_failure_status
			&& !(1..=255).contains(&status)
		{
			return Err(RexecError::InvalidConfig {
				key: "ssh.connection-failure-status",
				reason: "must be between 1 and 255",
			});
		}

		if matches!(self.local.shell.as_deref(), Some(s) if s.trim().is_empty()) {
			return Err(RexecError::InvalidConfig {
				key: "local.shell",
				reason: "must not be empty",
			});
		}

		self.ssh.options.iter().try_for_each(PassthroughFlag::validate)
	}
}

/// A loaded config file with its source path for display.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
	pub config: ConfigFile,
	pub path: PathBuf,
}

/// Effective configuration handed to the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
	pub ssh: SshTransport,

	/// Flags appended to every remote invocation.
	pub default_options: PassthroughOptions,

	/// Local shell for command lines.
	pub shell: String,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			ssh: SshTransport::default(),
			default_options: PassthroughOptions::default(),
			shell: "/bin/sh".to_string(),
		}
	}
}
