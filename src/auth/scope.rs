//! Ordered GitHub scope lists.

// std
use std::slice::Iter;
// self
use crate::_prelude::*;

/// Scopes requested when the caller does not configure any: basic profile and email addresses.
pub const DEFAULT_SCOPES: [&str; 2] = ["read:user", "user:email"];

/// Errors emitted when validating scopes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum ScopeValidationError {
	/// Empty scope entries are not allowed.
	#[error("Scope entries cannot be empty")]
	Empty,
	/// Scopes cannot contain embedded whitespace characters.
	#[error("Scope contains whitespace: {scope}")]
	ContainsWhitespace {
		/// The offending scope string.
		scope: String,
	},
}

/// Scope list in caller order.
///
/// Unlike a normalized set, order is preserved: the authorize URL must be byte-for-byte
/// reproducible from the configuration, so the list is joined exactly as supplied.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Scopes(Vec<String>);
impl Scopes {
	/// Validates and wraps the provided scopes, keeping their order.
	pub fn new<I, S>(scopes: I) -> Result<Self, ScopeValidationError>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let mut list = Vec::new();

		for scope in scopes {
			let owned: String = scope.into();

			if owned.is_empty() {
				return Err(ScopeValidationError::Empty);
			}
			if owned.chars().any(char::is_whitespace) {
				return Err(ScopeValidationError::ContainsWhitespace { scope: owned });
			}

			list.push(owned);
		}

		Ok(Self(list))
	}

	/// Parses a space- or comma-separated scope string (the format GitHub itself reports).
	pub fn parse(raw: &str) -> Result<Self, ScopeValidationError> {
		Self::new(raw.split([' ', ',']).map(str::trim).filter(|scope| !scope.is_empty()))
	}

	/// Number of scopes.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns true if no scopes are defined.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Iterator over the scopes in order.
	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.0.iter().map(String::as_str)
	}

	/// Space-joined representation used for the `scope` query parameter.
	pub fn joined(&self) -> String {
		self.0.join(" ")
	}
}
impl Default for Scopes {
	fn default() -> Self {
		Self(DEFAULT_SCOPES.iter().map(|scope| (*scope).to_owned()).collect())
	}
}
impl Debug for Scopes {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("Scopes").field(&self.0).finish()
	}
}
impl Display for Scopes {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.joined())
	}
}
impl TryFrom<Vec<String>> for Scopes {
	type Error = ScopeValidationError;

	fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}
impl From<Scopes> for Vec<String> {
	fn from(value: Scopes) -> Self {
		value.0
	}
}
impl<'a> IntoIterator for &'a Scopes {
	type IntoIter = std::iter::Map<Iter<'a, String>, fn(&'a String) -> &'a str>;
	type Item = &'a str;

	fn into_iter(self) -> Self::IntoIter {
		self.0.iter().map(String::as_str as fn(&'a String) -> &'a str)
	}
}
