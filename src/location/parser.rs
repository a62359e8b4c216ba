use crate::error::{Result, RexecError};
use std::fmt;
use std::str::FromStr;

/// A parsed location: either a path on this machine or a path on a host
/// reachable over ssh.
///
/// ```
/// use rexec_cli::location::Location;
///
/// let loc: Location = "backup01:/srv/archive".parse().unwrap();
/// assert_eq!(loc.host(), Some("backup01"));
/// assert_eq!(loc.path(), "/srv/archive");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
	Local { path: String },
	Remote { host: String, path: String },
}

impl Location {
	/// Parse a raw location string. See [`decompose`].
	pub fn parse(raw: &str) -> Result<Self> {
		decompose(raw)
	}

	/// Whether commands against this location run over ssh.
	pub fn is_remote(&self) -> bool {
		matches!(self, Location::Remote { .. })
	}

	/// The host component, `None` for local locations.
	pub fn host(&self) -> Option<&str> {
		match self {
			Location::Local { .. } => None,
			Location::Remote { host, .. } => Some(host),
		}
	}

	/// The path component.
	pub fn path(&self) -> &str {
		match self {
			Location::Local { path } | Location::Remote { path, .. } => path,
		}
	}
}

impl fmt::Display for Location {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Location::Local { path } => write!(f, "{path}"),
			Location::Remote { host, path } => write!(f, "{host}:{path}"),
		}
	}
}

impl FromStr for Location {
	type Err = RexecError;

	fn from_str(s: &str) -> Result<Self> {
		decompose(s)
	}
}

/// Split at the first colon if the prefix could be a host name.
///
/// Returns `None` when there is no colon, the colon is the first character,
/// or the prefix contains a slash (it is part of a filesystem path).
fn split_host(raw: &str) -> Option<(&str, &str)> {
	let colon = raw.find(':')?;
	let (host, rest) = (&raw[..colon], &raw[colon + 1..]);

	if host.is_empty() || host.contains('/') {
		return None;
	}

	Some((host, rest))
}

/// Classify a raw location string. Returns `true` for `host:path` remotes.
///
/// A string is remote when the text before its first colon is non-empty and
/// slash-free, and the text after it is non-empty. A leading `/` therefore
/// always means local.
pub fn classify(raw: &str) -> bool {
	matches!(split_host(raw), Some((_, path)) if !path.is_empty())
}

/// Decompose a raw location string into a [`Location`].
///
/// Remote strings are split at the first colon; anything else is taken
/// verbatim as a local path. Neither the path nor the host is checked for
/// existence or reachability here.
pub fn decompose(raw: &str) -> Result<Location> {
	if raw.is_empty() {
		return Err(RexecError::InvalidLocation {
			raw: raw.to_string(),
			reason: "location is empty",
		});
	}

	match split_host(raw) {
		Some((_, "")) => Err(RexecError::InvalidLocation {
			raw: raw.to_string(),
			reason: "remote location has an empty path",
		}),
		Some((host, path)) => {
			tracing::debug!(host, path, "resolved remote location");
			Ok(Location::Remote {
				host: host.to_string(),
				path: path.to_string(),
			})
		}
		None => {
			tracing::debug!(path = raw, "resolved local location");
			Ok(Location::Local {
				path: raw.to_string(),
			})
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_absolute_path_is_local() {
		assert!(!classify("/tmp/x"));
		assert_eq!(
			decompose("/tmp/x").unwrap(),
			Location::Local {
				path: "/tmp/x".to_string()
			}
		);
	}

	#[test]
	fn test_slash_before_colon_is_local() {
		assert!(!classify("/srv/a:b"));
		assert!(!classify("./dir:name"));
		assert!(!classify("rel/dir:name"));

		let loc = decompose("./dir:name").unwrap();
		assert_eq!(loc.path(), "./dir:name");
		assert!(loc.host().is_none());
	}

	#[test]
	fn test_plain_names_are_local() {
		for raw in ["build", "dist/pkg", "a b c", "."] {
			assert!(!classify(raw), "{raw} should be local");
			assert_eq!(decompose(raw).unwrap().path(), raw);
		}
	}

	#[test]
	fn test_host_path_is_remote() {
		assert!(classify("host:/tmp/x"));
		let loc = decompose("host:/tmp/x").unwrap();
		assert!(loc.is_remote());
		assert_eq!(loc.host(), Some("host"));
		assert_eq!(loc.path(), "/tmp/x");
	}

	#[test]
	fn test_relative_remote_path() {
		let loc = decompose("user@mirror:incoming/pkgs").unwrap();
		assert_eq!(loc.host(), Some("user@mirror"));
		assert_eq!(loc.path(), "incoming/pkgs");
	}

	#[test]
	fn test_split_happens_at_first_colon() {
		let loc = decompose("host:/a:b:c").unwrap();
		assert_eq!(loc.host(), Some("host"));
		assert_eq!(loc.path(), "/a:b:c");
	}

	#[test]
	fn test_leading_colon_is_local() {
		assert!(!classify(":path"));
		let loc = decompose(":path").unwrap();
		assert!(!loc.is_remote());
		assert_eq!(loc.path(), ":path");
	}

	#[test]
	fn test_empty_is_invalid() {
		match decompose("").unwrap_err() {
			RexecError::InvalidLocation { raw, .. } => assert!(raw.is_empty()),
			other => panic!("Expected InvalidLocation, got {other:?}"),
		}
	}

	#[test]
	fn test_host_without_path_is_invalid() {
		assert!(!classify("host:"));
		assert!(matches!(
			decompose("host:"),
			Err(RexecError::InvalidLocation { .. })
		));
	}

	#[test]
	fn test_display_round_trips_raw_string() {
		for raw in ["host:/tmp/x", "/tmp/x", "rel/path"] {
			let loc: Location = raw.parse().unwrap();
			assert_eq!(loc.to_string(), raw);
		}
	}
}
