use crate::config::types::ConfigFile;
use crate::error::{Result, RexecError};
use std::path::Path;

/// Parse a config file from the given path.
pub fn parse_config_file(path: &Path) -> Result<ConfigFile> {
	let content = std::fs::read_to_string(path).map_err(|source| {
		if source.kind() == std::io::ErrorKind::NotFound {
			RexecError::ConfigNotFound {
				path: path.to_path_buf(),
			}
		} else {
			RexecError::ConfigReadError {
				path: path.to_path_buf(),
				source,
			}
		}
	})?;

	parse_config_str(&content, path)
}

/// Parse a config from a string (useful for testing).
pub fn parse_config_str(content: &str, path: &Path) -> Result<ConfigFile> {
	let config: ConfigFile =
		toml::from_str(content).map_err(|source| RexecError::ConfigParseError {
			path: path.to_path_buf(),
			source,
		})?;

	config.validate()?;

	Ok(config)
}
