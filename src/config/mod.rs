//! Configuration loading and parsing for rexec.
//!
//! This module handles:
//! - TOML config file parsing
//! - Directory cascade discovery
//! - Merging files into the [`Config`] value the dispatcher is built with

pub mod cascade;
pub mod init;
pub mod parser;
pub mod types;

pub use cascade::{
	CONFIG_FILE_NAME, discover_configs, load_config_file, load_merged_config, merge_configs,
	user_config_path,
};
pub use init::generate_init_template;
pub use parser::{parse_config_file, parse_config_str};
pub use types::{Config, ConfigFile, LoadedConfig, LocalSection, SshSection};
