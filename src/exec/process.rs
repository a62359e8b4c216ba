use crate::error::{Result, RexecError};
use std::process::{Command, ExitStatus, Stdio};

/// Spawn `argv` with inherited stdout/stderr and wait for it.
///
/// `interactive` controls whether stdin is inherited or closed. Returns the
/// normalized exit code (see [`exit_code_of`]).
pub fn spawn_status(argv: &[String], interactive: bool) -> Result<i32> {
	let (program, args) = argv
		.split_first()
		.ok_or(RexecError::MissingArgument { name: "program" })?;

	let stdin = if interactive {
		Stdio::inherit()
	} else {
		Stdio::null()
	};

	let mut cmd = Command::new(program);
	cmd.args(args)
		.stdin(stdin)
		.stdout(Stdio::inherit())
		.stderr(Stdio::inherit());

	let status = cmd.status().map_err(|source| {
		if source.kind() == std::io::ErrorKind::NotFound {
			RexecError::CommandNotFound {
				command: program.clone(),
			}
		} else {
			RexecError::CommandFailed {
				command: program.clone(),
				source,
			}
		}
	})?;

	Ok(exit_code_of(status))
}

/// Exit code of a finished child, using the shell's `128 + signal`
/// convention for processes killed by a signal.
pub fn exit_code_of(status: ExitStatus) -> i32 {
	if let Some(code) = status.code() {
		return code;
	}

	#[cfg(unix)]
	{
		use std::os::unix::process::ExitStatusExt;
		if let Some(signal) = status.signal() {
			return 128 + signal;
		}
	}

	1
}

#[cfg(test)]
mod tests {
	use super::*;

	fn words(argv: &[&str]) -> Vec<String> {
		argv.iter().map(|s| s.to_string()).collect()
	}

	#[cfg(unix)]
	#[test]
	fn test_exit_code_propagates() {
		let code = spawn_status(&words(&["sh", "-c", "exit 7"]), false).unwrap();
		assert_eq!(code, 7);
	}

	#[cfg(unix)]
	#[test]
	fn test_signal_maps_to_128_plus() {
		let code = spawn_status(&words(&["sh", "-c", "kill -9 $$"]), false).unwrap();
		assert_eq!(code, 137);
	}

	#[test]
	fn test_missing_program_is_not_found() {
		let err = spawn_status(&words(&["/nonexistent/rexec-test-binary"]), false).unwrap_err();
		assert!(matches!(err, RexecError::CommandNotFound { .. }));
	}

	#[test]
	fn test_empty_argv_is_missing_argument() {
		assert!(matches!(
			spawn_status(&[], false),
			Err(RexecError::MissingArgument { .. })
		));
	}
}
