use crate::config::parser::parse_config_file;
use crate::config::types::{Config, LoadedConfig};
use crate::error::{Result, RexecError};
use crate::exec::options::PassthroughOptions;
use crate::exec::ssh::SshTransport;
use std::path::{Path, PathBuf};

/// Name of the config file looked up in each directory.
pub const CONFIG_FILE_NAME: &str = ".rexec.toml";

/// Discover and load all config files in the cascade.
///
/// Starting at `start_dir`, every `.rexec.toml` up the directory tree is
/// loaded until one sets `root = true`. ~/.rexec.toml is appended last unless
/// disabled.
///
/// Returns configs in cascade order (most specific first).
pub fn discover_configs(start_dir: &Path) -> Result<Vec<LoadedConfig>> {
	let mut configs = Vec::new();

	for dir in start_dir.ancestors() {
		let config_path = dir.join(CONFIG_FILE_NAME);
		if !config_path.is_file() {
			continue;
		}

		let config = parse_config_file(&config_path)?;
		let is_root = config.root;
		tracing::debug!(path = %config_path.display(), root = is_root, "loaded config");
		configs.push(LoadedConfig {
			config,
			path: config_path,
		});

		if is_root {
			break;
		}
	}

	if let Some(user_config) = load_user_config(&configs)? {
		configs.push(user_config);
	}

	Ok(configs)
}

/// Load the user's ~/.rexec.toml if it exists and isn't disabled.
fn load_user_config(existing_configs: &[LoadedConfig]) -> Result<Option<LoadedConfig>> {
	for loaded in existing_configs {
		if let Some(ref env_var) = loaded.config.root_config_lookup_disable_env_var
			&& is_env_truthy(env_var)
		{
			tracing::debug!(env_var = env_var.as_str(), "user config lookup disabled");
			return Ok(None);
		}
	}

	let user_config_path = user_config_path()?;

	// A project config that is itself ~/.rexec.toml was already loaded
	if existing_configs.iter().any(|c| c.path == user_config_path) {
		return Ok(None);
	}

	if user_config_path.is_file() {
		let config = parse_config_file(&user_config_path)?;
		Ok(Some(LoadedConfig {
			config,
			path: user_config_path,
		}))
	} else {
		Ok(None)
	}
}

/// Check if an environment variable is set to a truthy value.
fn is_env_truthy(var_name: &str) -> bool {
	match std::env::var(var_name) {
		Ok(value) => {
			let lower = value.to_lowercase();
			!value.is_empty() && lower != "0" && lower != "false" && lower != "no"
		}
		Err(_) => false,
	}
}

/// Merge configs (most specific first) into the effective [`Config`].
///
/// Scalar settings come from the most specific file that sets them. Default
/// passthrough options are concatenated, most specific first.
pub fn merge_configs(configs: &[LoadedConfig]) -> Config {
	let defaults = Config::default();

	let program = configs.iter().find_map(|c| c.config.ssh.program.clone());
	let status = configs
		.iter()
		.find_map(|c| c.config.ssh.connection_failure_status);
	let shell = configs.iter().find_map(|c| c.config.local.shell.clone());

	let mut default_options = PassthroughOptions::new();
	for loaded in configs {
		default_options.extend(&PassthroughOptions::from(loaded.config.ssh.options.clone()));
	}

	Config {
		ssh: SshTransport {
			program: program.unwrap_or(defaults.ssh.program),
			connection_failure_status: status
				.unwrap_or(defaults.ssh.connection_failure_status),
		},
		default_options,
		shell: shell.unwrap_or(defaults.shell),
	}
}

/// Discover, load, and merge configs from a directory.
pub fn load_merged_config(start_dir: &Path) -> Result<Config> {
	let configs = discover_configs(start_dir)?;
	Ok(merge_configs(&configs))
}

/// Load exactly one config file, bypassing the cascade.
pub fn load_config_file(path: &Path) -> Result<Config> {
	let config = parse_config_file(path)?;
	Ok(merge_configs(&[LoadedConfig {
		config,
		path: path.to_path_buf(),
	}]))
}

/// Get the path to the user's config file.
pub fn user_config_path() -> Result<PathBuf> {
	let home_dir = dirs::home_dir().ok_or(RexecError::HomeDirectoryNotFound)?;
	Ok(home_dir.join(CONFIG_FILE_NAME))
}
