//! Provider user identifier derived from an assertion's identity URL.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

/// Error returned when a Steam identifier fails validation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("Steam identifier cannot be empty.")]
	Empty,
}

/// Stable identifier of a Steam account (the trailing segment of the OpenID identity URL).
///
/// Any non-empty text is accepted verbatim, so the id derived from an identity URL always equals
/// the text after its last `/id/`.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SteamId(String);
impl SteamId {
	/// Creates a new identifier after validation.
	pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
		let view = value.as_ref();

		validate_view(view)?;

		Ok(Self(view.to_owned()))
	}

	/// Parses the identifier as the 64-bit account number Steam uses on the wire.
	pub fn as_u64(&self) -> Option<u64> {
		self.0.parse().ok()
	}
}
impl Deref for SteamId {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for SteamId {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl From<SteamId> for String {
	fn from(value: SteamId) -> Self {
		value.0
	}
}
impl TryFrom<String> for SteamId {
	type Error = IdentifierError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		validate_view(&value)?;

		Ok(Self(value))
	}
}
impl Borrow<str> for SteamId {
	fn borrow(&self) -> &str {
		&self.0
	}
}
impl Debug for SteamId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "SteamId({})", self.0)
	}
}
impl Display for SteamId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
impl FromStr for SteamId {
	type Err = IdentifierError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}

fn validate_view(view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty);
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// std
	use std::collections::HashMap;
	// self
	use super::*;

	#[test]
	fn identifiers_validate() {
		let id = SteamId::new("76561198000000000").expect("Steam id fixture should be valid.");

		assert_eq!(id.as_ref(), "76561198000000000");
		assert_eq!(id.as_u64(), Some(76_561_198_000_000_000));
		assert_eq!(SteamId::new(""), Err(IdentifierError::Empty));
	}

	#[test]
	fn any_non_empty_text_is_kept_verbatim() {
		let spaced = SteamId::new("abc def").expect("Ids with spaces should be accepted.");
		let long = "7".repeat(300);

		assert_eq!(spaced.as_ref(), "abc def");
		assert_eq!(SteamId::new(&long).map(String::from), Ok(long));
	}

	#[test]
	fn vanity_ids_are_kept_verbatim() {
		let id = SteamId::new("gabelogannewell").expect("Vanity id should be accepted.");

		assert_eq!(id.as_u64(), None);
		assert_eq!(format!("{id:?}"), "SteamId(gabelogannewell)");
	}

	#[test]
	fn serde_round_trip_enforces_validation() {
		let id: SteamId = serde_json::from_str("\"76561198000000000\"")
			.expect("Steam id should deserialize successfully.");

		assert_eq!(id.as_ref(), "76561198000000000");
		assert!(serde_json::from_str::<SteamId>("\"\"").is_err());
		assert!(serde_json::from_str::<SteamId>("\"with space\"").is_ok());
	}

	#[test]
	fn borrow_supports_fast_lookup() {
		let map: HashMap<SteamId, u8> = HashMap::from_iter([(
			SteamId::new("76561198000000000").expect("Steam id used for lookup should be valid."),
			7_u8,
		)]);

		assert_eq!(map.get("76561198000000000"), Some(&7));
	}
}
