use crate::error::{Result, RexecError};
use crate::location::Location;
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Replaced with the resolved path component.
pub const PATH_PLACEHOLDER: &str = "::path::";

/// Replaced with the resolved host component, or nothing for local locations.
pub const HOST_PLACEHOLDER: &str = "::host::";

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
	let pattern = format!(
		"{}|{}",
		regex::escape(HOST_PLACEHOLDER),
		regex::escape(PATH_PLACEHOLDER)
	);
	Regex::new(&pattern).expect("placeholder pattern is valid")
});

/// A command line containing zero or more placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate {
	text: String,
}

impl CommandTemplate {
	/// Wrap a template string. Fails with `MissingArgument` when it is empty.
	pub fn new(text: impl Into<String>) -> Result<Self> {
		let text = text.into();
		if text.is_empty() {
			return Err(RexecError::MissingArgument { name: "command" });
		}
		Ok(Self { text })
	}

	/// The unsubstituted template text.
	pub fn as_str(&self) -> &str {
		&self.text
	}

	/// Substitute both placeholders from an already-decomposed location.
	pub fn render(&self, location: &Location) -> String {
		substitute(&self.text, location)
	}
}

/// Replace every `::path::` and `::host::` in `text` in a single pass.
///
/// Inserted values are never rescanned, so a path that itself contains a
/// placeholder token comes through literally.
pub fn substitute(text: &str, location: &Location) -> String {
	PLACEHOLDER
		.replace_all(text, |caps: &Captures| {
			if &caps[0] == HOST_PLACEHOLDER {
				location.host().unwrap_or_default().to_string()
			} else {
				location.path().to_string()
			}
		})
		.into_owned()
}
