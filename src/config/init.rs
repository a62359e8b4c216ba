/// Template written by `rexec --init`.
pub fn generate_init_template() -> &'static str {
	r#"# rexec configuration
#
# Files named .rexec.toml are read from the current directory upward,
# then from ~/.rexec.toml. Nearer files win.

# Stop looking in parent directories after this file.
root = true

# Skip ~/.rexec.toml when this environment variable is truthy.
# root-config-lookup-disable-env-var = "CI"

[ssh]
# ssh client used for host:path locations.
program = "ssh"

# Exit status the client reports when it cannot connect.
connection-failure-status = 255

# Flags passed on every remote invocation, after any given on the command line.
options = [
    { flag = "o", value = "BatchMode=yes" },
    { flag = "o", value = "ConnectTimeout=10" },
]

[local]
# Shell used to evaluate commands for local paths.
shell = "/bin/sh"
"#
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::parser::parse_config_str;
	use std::path::Path;

	#[test]
	fn test_template_parses() {
		let config = parse_config_str(generate_init_template(), Path::new(".rexec.toml")).unwrap();
		assert!(config.root);
		assert_eq!(config.ssh.options.len(), 2);
		assert_eq!(config.local.shell.as_deref(), Some("/bin/sh"));
	}
}
