use crate::config::Config;
use crate::error::{Result, RexecError};
use crate::exec::options::PassthroughOptions;
use crate::exec::process::spawn_status;
use crate::location::{Location, decompose};
use crate::template::{CommandTemplate, PATH_PLACEHOLDER, join_words, shell_quote, substitute};

/// A raw command line for a shell to evaluate.
///
/// Nothing in it is escaped: pipes, redirections and `$VAR` expansions
/// behave as if typed at a prompt. Only hand caller-authored text to it;
/// prefer [`Dispatcher::run`] for anything assembled from data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellLine(String);

impl ShellLine {
	pub fn new(line: impl Into<String>) -> Self {
		Self(line.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// argv evaluating this line with `shell -c`.
	pub fn argv(&self, shell: &str) -> Vec<String> {
		vec![shell.to_string(), "-c".to_string(), self.0.clone()]
	}
}

/// How a dispatched command ended, when it ran at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
	Success,
	CommandFailed(i32),
}

/// Result of a command that was started and finished.
///
/// Connection and argument errors never produce one; they are returned as
/// [`RexecError`] instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
	pub location: Location,
	pub exit_code: i32,
}

impl ExecutionResult {
	pub fn success(&self) -> bool {
		self.exit_code == 0
	}

	pub fn outcome(&self) -> Outcome {
		if self.success() {
			Outcome::Success
		} else {
			Outcome::CommandFailed(self.exit_code)
		}
	}
}

/// A fully resolved invocation, ready to spawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
	pub location: Location,

	/// Program followed by its arguments.
	pub argv: Vec<String>,
}

impl Plan {
	/// The argv as a copy-pasteable shell line.
	pub fn display(&self) -> String {
		join_words(&self.argv)
	}
}

/// Runs commands against local paths or `host:path` locations.
///
/// Holds only immutable configuration; every call spawns its own process or
/// ssh session and nothing is kept between calls, so one dispatcher can be
/// shared freely across threads.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
	config: Config,
}

impl Dispatcher {
	pub fn new(config: Config) -> Self {
		Self { config }
	}

	/// Substitute `template` for `raw` and evaluate it as a shell line,
	/// locally or on the remote host.
	pub fn execute(
		&self,
		raw: &str,
		template: &str,
		options: &PassthroughOptions,
	) -> Result<ExecutionResult> {
		let plan = self.plan(raw, template, options)?;
		self.run_plan(&plan)
	}

	/// Resolve what [`execute`](Self::execute) would spawn, without spawning.
	pub fn plan(&self, raw: &str, template: &str, options: &PassthroughOptions) -> Result<Plan> {
		require(raw, "location")?;
		let template = CommandTemplate::new(template)?;
		let location = decompose(raw)?;
		let line = ShellLine::new(template.render(&location));
		self.plan_shell_line(location, &line, options)
	}

	/// Plan a shell line against an already-resolved location.
	pub fn plan_shell_line(
		&self,
		location: Location,
		line: &ShellLine,
		options: &PassthroughOptions,
	) -> Result<Plan> {
		let argv = match &location {
			Location::Local { .. } => line.argv(&self.config.shell),
			Location::Remote { host, .. } => self.remote_argv(host, options, line.as_str())?,
		};
		Ok(Plan { location, argv })
	}

	/// Run `program` with `args` against `raw` without a local shell.
	///
	/// Placeholders in the program and arguments are substituted. Remotely,
	/// each word is quoted so the remote shell sees exactly these words.
	pub fn run(
		&self,
		raw: &str,
		program: &str,
		args: &[String],
		options: &PassthroughOptions,
	) -> Result<ExecutionResult> {
		let plan = self.plan_run(raw, program, args, options)?;
		self.run_plan(&plan)
	}

	/// Resolve what [`run`](Self::run) would spawn.
	pub fn plan_run(
		&self,
		raw: &str,
		program: &str,
		args: &[String],
		options: &PassthroughOptions,
	) -> Result<Plan> {
		require(raw, "location")?;
		require(program, "program")?;
		let location = decompose(raw)?;

		let mut words = Vec::with_capacity(args.len() + 1);
		words.push(substitute(program, &location));
		words.extend(args.iter().map(|a| substitute(a, &location)));

		let argv = match &location {
			Location::Local { .. } => words,
			Location::Remote { host, .. } => self.remote_argv(host, options, &join_words(&words))?,
		};
		Ok(Plan { location, argv })
	}

	/// `mkdir -p` the location's path.
	pub fn ensure_dir(&self, raw: &str, options: &PassthroughOptions) -> Result<ExecutionResult> {
		let plan = self.plan_ensure_dir(raw, options)?;
		self.run_plan(&plan)
	}

	/// Resolve what [`ensure_dir`](Self::ensure_dir) would spawn. The path
	/// follows `--` so one starting with `-` is not read as an option.
	pub fn plan_ensure_dir(&self, raw: &str, options: &PassthroughOptions) -> Result<Plan> {
		let args = ["-p", "--", PATH_PLACEHOLDER].map(String::from);
		self.plan_run(raw, "mkdir", &args, options)
	}

	/// Whether the location's path exists.
	///
	/// A missing path is `Ok(false)`. Failing to reach the remote host is an
	/// error, never `false`.
	pub fn exists(&self, location: &Location, options: &PassthroughOptions) -> Result<bool> {
		match location {
			Location::Local { path } => {
				let found = std::path::Path::new(path).exists();
				tracing::debug!(path = path.as_str(), found, "checked local path");
				Ok(found)
			}
			Location::Remote { host, path } => {
				let line = format!("test -e {}", shell_quote(path));
				let argv = self.remote_argv(host, options, &line)?;
				let code = spawn_status(&argv, false)?;
				self.check_connection(host, code)?;
				tracing::debug!(
					host = host.as_str(),
					path = path.as_str(),
					code,
					"checked remote path"
				);
				Ok(code == 0)
			}
		}
	}

	/// Spawn a plan and normalize its exit status.
	pub fn run_plan(&self, plan: &Plan) -> Result<ExecutionResult> {
		tracing::info!(location = %plan.location, command = %plan.display(), "dispatching");

		let exit_code = spawn_status(&plan.argv, true)?;
		if let Location::Remote { host, .. } = &plan.location {
			self.check_connection(host, exit_code)?;
		}

		tracing::debug!(exit_code, "command finished");
		Ok(ExecutionResult {
			location: plan.location.clone(),
			exit_code,
		})
	}

	fn remote_argv(
		&self,
		host: &str,
		options: &PassthroughOptions,
		line: &str,
	) -> Result<Vec<String>> {
		options.validate()?;
		let mut all = options.clone();
		all.extend(&self.config.default_options);
		Ok(self.config.ssh.argv(host, &all, line))
	}

	fn check_connection(&self, host: &str, exit_code: i32) -> Result<()> {
		if self.config.ssh.is_connection_failure(exit_code) {
			tracing::warn!(host, status = exit_code, "ssh could not connect");
			return Err(RexecError::SshConnectionError {
				host: host.to_string(),
				status: exit_code,
			});
		}
		Ok(())
	}
}

fn require(value: &str, name: &'static str) -> Result<()> {
	if value.is_empty() {
		return Err(RexecError::MissingArgument { name });
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn no_options() -> PassthroughOptions {
		PassthroughOptions::new()
	}

	#[test]
	fn test_plan_local_uses_shell() {
		let plan = Dispatcher::default()
			.plan("/tmp/x", "mkdir -p ::path::/sub", &no_options())
			.unwrap();
		assert_eq!(plan.argv, vec!["/bin/sh", "-c", "mkdir -p /tmp/x/sub"]);
		assert!(!plan.location.is_remote());
	}

	#[test]
	fn test_plan_remote_uses_ssh() {
		let plan = Dispatcher::default()
			.plan("host:/tmp/x", "mkdir -p ::path::/sub", &no_options())
			.unwrap();
		assert_eq!(plan.argv, vec!["ssh", "--", "host", "mkdir -p /tmp/x/sub"]);
	}

	#[test]
	fn test_plan_substitutes_host() {
		let plan = Dispatcher::default()
			.plan("box:/srv", "echo ::host:: ::path:: ::host::", &no_options())
			.unwrap();
		assert_eq!(plan.argv.last().unwrap(), "echo box /srv box");
	}

	#[test]
	fn test_caller_options_precede_config_defaults() {
		let mut config = Config::default();
		config.default_options = PassthroughOptions::new()
			.with('o', Some("ConnectTimeout=30"))
			.unwrap();
		let options = PassthroughOptions::new()
			.with('o', Some("ConnectTimeout=5"))
			.unwrap();

		let plan = Dispatcher::new(config)
			.plan("h:/p", "true", &options)
			.unwrap();
		assert_eq!(
			plan.argv,
			vec![
				"ssh",
				"-o",
				"ConnectTimeout=5",
				"-o",
				"ConnectTimeout=30",
				"--",
				"h",
				"true"
			]
		);
	}

	#[test]
	fn test_options_ignored_locally() {
		let options = PassthroughOptions::new().with('t', None).unwrap();
		let plan = Dispatcher::default()
			.plan("/tmp", "ls", &options)
			.unwrap();
		assert_eq!(plan.argv, vec!["/bin/sh", "-c", "ls"]);
	}

	#[test]
	fn test_missing_arguments() {
		let d = Dispatcher::default();
		assert!(matches!(
			d.plan("", "ls", &no_options()),
			Err(RexecError::MissingArgument { name: "location" })
		));
		assert!(matches!(
			d.plan("/tmp", "", &no_options()),
			Err(RexecError::MissingArgument { name: "command" })
		));
		assert!(matches!(
			d.plan_run("/tmp", "", &[], &no_options()),
			Err(RexecError::MissingArgument { name: "program" })
		));
	}

	#[test]
	fn test_invalid_location_propagates() {
		assert!(matches!(
			Dispatcher::default().plan("host:", "ls", &no_options()),
			Err(RexecError::InvalidLocation { .. })
		));
	}

	#[test]
	fn test_plan_run_local_is_plain_argv() {
		let plan = Dispatcher::default()
			.plan_run(
				"/tmp/a b",
				"ls",
				&["-l".to_string(), "::path::".to_string()],
				&no_options(),
			)
			.unwrap();
		assert_eq!(plan.argv, vec!["ls", "-l", "/tmp/a b"]);
	}

	#[test]
	fn test_plan_run_remote_quotes_words() {
		let plan = Dispatcher::default()
			.plan_run(
				"box:/srv/my pkgs",
				"mkdir",
				&["-p".to_string(), "::path::".to_string()],
				&no_options(),
			)
			.unwrap();
		assert_eq!(
			plan.argv,
			vec!["ssh", "--", "box", "mkdir -p '/srv/my pkgs'"]
		);
	}

	#[test]
	fn test_shell_line_argv() {
		let line = ShellLine::new("echo $HOME | wc -c");
		assert_eq!(line.argv("/bin/bash"), vec!["/bin/bash", "-c", "echo $HOME | wc -c"]);
	}

	#[test]
	fn test_plan_display_quotes() {
		let plan = Dispatcher::default()
			.plan("h:/p", "ls ::path::", &no_options())
			.unwrap();
		assert_eq!(plan.display(), "ssh -- h 'ls /p'");
	}

	#[test]
	fn test_outcome() {
		let loc = Location::Local {
			path: "/".to_string(),
		};
		let ok = ExecutionResult {
			location: loc.clone(),
			exit_code: 0,
		};
		let failed = ExecutionResult {
			location: loc,
			exit_code: 3,
		};
		assert_eq!(ok.outcome(), Outcome::Success);
		assert_eq!(failed.outcome(), Outcome::CommandFailed(3));
	}

	#[test]
	fn test_local_exists() {
		let temp = tempfile::tempdir().unwrap();
		let d = Dispatcher::default();

		let present = Location::Local {
			path: temp.path().to_string_lossy().to_string(),
		};
		let missing = Location::Local {
			path: temp.path().join("nope").to_string_lossy().to_string(),
		};
		assert!(d.exists(&present, &no_options()).unwrap());
		assert!(!d.exists(&missing, &no_options()).unwrap());
	}

	#[cfg(unix)]
	#[test]
	fn test_local_execute_creates_directory() {
		let temp = tempfile::tempdir().unwrap();
		let base = temp.path().join("x");
		let raw = base.to_string_lossy().to_string();

		let result = Dispatcher::default()
			.execute(&raw, "mkdir -p ::path::/sub", &no_options())
			.unwrap();
		assert!(result.success());
		assert!(base.join("sub").is_dir());
	}

	#[cfg(unix)]
	#[test]
	fn test_local_execute_reports_failure_code() {
		let result = Dispatcher::default()
			.execute("/tmp", "exit 255", &no_options())
			.unwrap();
		// 255 is only a connection failure for remote locations
		assert_eq!(result.outcome(), Outcome::CommandFailed(255));
	}

	#[cfg(unix)]
	#[test]
	fn test_local_read_only_execute_is_repeatable() {
		let d = Dispatcher::default();
		let first = d.execute("/", "test -d ::path::", &no_options()).unwrap();
		let second = d.execute("/", "test -d ::path::", &no_options()).unwrap();
		assert_eq!(first, second);
	}

	#[test]
	fn test_plan_ensure_dir_ends_options() {
		let dispatcher = Dispatcher::default();
		let local = dispatcher.plan_ensure_dir("-odd", &no_options()).unwrap();
		assert_eq!(local.argv, vec!["mkdir", "-p", "--", "-odd"]);

		let remote = dispatcher
			.plan_ensure_dir("box:-odd dir", &no_options())
			.unwrap();
		assert_eq!(
			remote.argv,
			vec!["ssh", "--", "box", "mkdir -p -- '-odd dir'"]
		);
	}

	#[cfg(unix)]
	#[test]
	fn test_ensure_dir_local() {
		let temp = tempfile::tempdir().unwrap();
		let target = temp.path().join("a/b/c");
		let result = Dispatcher::default()
			.ensure_dir(&target.to_string_lossy(), &no_options())
			.unwrap();
		assert!(result.success());
		assert!(target.is_dir());
	}

	#[cfg(unix)]
	#[test]
	fn test_unreachable_host_is_connection_error() {
		let mut config = Config::default();
		// `false` stands in for an ssh client; make its status mean "no connection"
		config.ssh.program = "false".to_string();
		config.ssh.connection_failure_status = 1;
		let d = Dispatcher::new(config);

		let loc = decompose("nohost:/tmp").unwrap();
		match d.exists(&loc, &no_options()).unwrap_err() {
			RexecError::SshConnectionError { host, status } => {
				assert_eq!(host, "nohost");
				assert_eq!(status, 1);
			}
			other => panic!("Expected SshConnectionError, got {other:?}"),
		}
		assert!(matches!(
			d.execute("nohost:/tmp", "ls", &no_options()),
			Err(RexecError::SshConnectionError { .. })
		));
	}

	#[test]
	fn test_dispatcher_is_send_and_sync() {
		fn assert_send_sync<T: Send + Sync>() {}
		assert_send_sync::<Dispatcher>();
	}

	#[cfg(unix)]
	#[test]
	fn test_concurrent_calls_are_independent() {
		let temp = tempfile::tempdir().unwrap();
		let d = Dispatcher::default();

		std::thread::scope(|s| {
			for i in 0..4 {
				let d = &d;
				let raw = temp.path().join(format!("t{i}")).to_string_lossy().to_string();
				s.spawn(move || {
					let result = d.execute(&raw, "mkdir ::path:: && exit 9", &no_options());
					assert_eq!(result.unwrap().exit_code, 9);
				});
			}
		});

		for i in 0..4 {
			assert!(temp.path().join(format!("t{i}")).is_dir());
		}
	}
}
