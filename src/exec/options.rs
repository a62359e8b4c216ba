use crate::error::{Result, RexecError};
use serde::Deserialize;

/// Flags forwarded to ssh that take no value.
const VALUELESS_FLAGS: &[char] = &['t', 'T', 'q', 'v', 'A', 'C', '4', '6'];

/// Flags forwarded to ssh that require a value.
const VALUED_FLAGS: &[char] = &['i', 'o', 'p', 'l', 'F'];

/// One short ssh flag and its optional value, e.g. `-o BatchMode=yes`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PassthroughFlag {
	pub flag: char,

	#[serde(default)]
	pub value: Option<String>,
}

impl PassthroughFlag {
	/// Build a flag, rejecting unsupported flags and missing/extra values.
	pub fn new(flag: char, value: Option<String>) -> Result<Self> {
		let flag = Self { flag, value };
		flag.validate()?;
		Ok(flag)
	}

	/// Check the flag is supported and has a value iff it needs one.
	pub fn validate(&self) -> Result<()> {
		let needs_value = if VALUED_FLAGS.contains(&self.flag) {
			true
		} else if VALUELESS_FLAGS.contains(&self.flag) {
			false
		} else {
			return Err(RexecError::InvalidOption {
				flag: self.flag,
				reason: "not a supported ssh passthrough flag",
			});
		};

		match (&self.value, needs_value) {
			(None, true) => Err(RexecError::InvalidOption {
				flag: self.flag,
				reason: "requires a value",
			}),
			(Some(v), true) if v.is_empty() => Err(RexecError::InvalidOption {
				flag: self.flag,
				reason: "requires a non-empty value",
			}),
			(Some(_), false) => Err(RexecError::InvalidOption {
				flag: self.flag,
				reason: "does not take a value",
			}),
			_ => Ok(()),
		}
	}

	/// The argv words for this flag: `["-t"]` or `["-o", "BatchMode=yes"]`.
	pub fn to_args(&self) -> Vec<String> {
		let mut args = vec![format!("-{}", self.flag)];
		if let Some(ref value) = self.value {
			args.push(value.clone());
		}
		args
	}
}

/// Ordered set of flags forwarded verbatim to the ssh invocation.
///
/// Ignored for local locations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassthroughOptions {
	flags: Vec<PassthroughFlag>,
}

impl PassthroughOptions {
	pub fn new() -> Self {
		Self::default()
	}

	/// Append a flag, validating it first.
	pub fn push(&mut self, flag: char, value: Option<String>) -> Result<&mut Self> {
		self.flags.push(PassthroughFlag::new(flag, value)?);
		Ok(self)
	}

	/// Builder-style [`push`](Self::push).
	pub fn with(mut self, flag: char, value: Option<&str>) -> Result<Self> {
		self.push(flag, value.map(str::to_string))?;
		Ok(self)
	}

	/// Append all flags of `other` after the existing ones.
	pub fn extend(&mut self, other: &PassthroughOptions) {
		self.flags.extend(other.flags.iter().cloned());
	}

	pub fn is_empty(&self) -> bool {
		self.flags.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &PassthroughFlag> {
		self.flags.iter()
	}

	/// Validate every flag (needed for values built via deserialization).
	pub fn validate(&self) -> Result<()> {
		self.flags.iter().try_for_each(PassthroughFlag::validate)
	}

	/// Flatten into argv words in insertion order.
	pub fn to_args(&self) -> Vec<String> {
		self.flags.iter().flat_map(PassthroughFlag::to_args).collect()
	}
}

impl From<Vec<PassthroughFlag>> for PassthroughOptions {
	fn from(flags: Vec<PassthroughFlag>) -> Self {
		Self { flags }
	}
}
