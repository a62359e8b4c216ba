use crate::exec::options::PassthroughOptions;

/// Exit status conventionally used by ssh when it could not connect.
pub const CONNECTION_FAILURE_STATUS: i32 = 255;

/// The external ssh client used for remote locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshTransport {
	/// Program to run, looked up on `PATH` unless absolute.
	pub program: String,

	/// Exit status that means "could not connect" rather than "command failed".
	pub connection_failure_status: i32,
}

impl Default for SshTransport {
	fn default() -> Self {
		Self {
			program: "ssh".to_string(),
			connection_failure_status: CONNECTION_FAILURE_STATUS,
		}
	}
}

impl SshTransport {
	/// Build the argv that runs `remote_line` on `host`.
	///
	/// Layout: `ssh [options...] -- <host> <remote_line>`. The remote line is
	/// a single argument; the remote login shell evaluates it. `--` keeps a
	/// host starting with `-` from being read as an ssh option.
	pub fn argv(&self, host: &str, options: &PassthroughOptions, remote_line: &str) -> Vec<String> {
		let mut argv = Vec::with_capacity(4 + options.iter().count() * 2);
		argv.push(self.program.clone());
		argv.extend(options.to_args());
		argv.push("--".to_string());
		argv.push(host.to_string());
		argv.push(remote_line.to_string());
		argv
	}

	/// Whether an exit code means the transport never reached the host.
	pub fn is_connection_failure(&self, exit_code: i32) -> bool {
		exit_code == self.connection_failure_status
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_argv_without_options() {
		let ssh = SshTransport::default();
		let argv = ssh.argv("host", &PassthroughOptions::new(), "mkdir -p /tmp/x/sub");
		assert_eq!(argv, vec!["ssh", "--", "host", "mkdir -p /tmp/x/sub"]);
	}

	#[test]
	fn test_argv_with_options_before_host() {
		let ssh = SshTransport {
			program: "/usr/bin/ssh".to_string(),
			..Default::default()
		};
		let options = PassthroughOptions::new()
			.with('T', None)
			.unwrap()
			.with('o', Some("ConnectTimeout=5"))
			.unwrap();

		let argv = ssh.argv("user@box", &options, "uptime");
		assert_eq!(
			argv,
			vec![
				"/usr/bin/ssh",
				"-T",
				"-o",
				"ConnectTimeout=5",
				"--",
				"user@box",
				"uptime"
			]
		);
	}

	#[test]
	fn test_connection_failure_status() {
		let ssh = SshTransport::default();
		assert!(ssh.is_connection_failure(255));
		assert!(!ssh.is_connection_failure(1));
		assert!(!ssh.is_connection_failure(0));

		let custom = SshTransport {
			connection_failure_status: 254,
			..Default::default()
		};
		assert!(custom.is_connection_failure(254));
		assert!(!custom.is_connection_failure(255));
	}
}
