//! OpenID 2.0 positive assertions captured from the provider redirect.
//!
//! [`AssertionToken::from_redirect`] is a pure transformation: it reads the `openid.*` query
//! parameters of the redirect target, requires every field the provider signs, and derives the
//! [`SteamId`] from the identity URL. The signature is carried but never verified here, so a
//! parsed token is well-formed and complete, not authentic.

// self
use crate::{_prelude::*, auth::SteamId, error::MalformedTokenError};

/// Namespace URI every OpenID 2.0 message carries in `openid.ns`.
pub const OPENID_NS: &str = "http://specs.openid.net/auth/2.0";

const NS: &str = "openid.ns";
const MODE: &str = "openid.mode";
const OP_ENDPOINT: &str = "openid.op_endpoint";
const CLAIMED_ID: &str = "openid.claimed_id";
const RETURN_TO: &str = "openid.return_to";
const RESPONSE_NONCE: &str = "openid.response_nonce";
const ASSOC_HANDLE: &str = "openid.assoc_handle";
const IDENTITY: &str = "openid.identity";
const SIG: &str = "openid.sig";
const SIGNED: &str = "openid.signed";
const IDENTITY_ID_SEGMENT: &str = "/id/";

/// One parsed OpenID redirect assertion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AssertionToken {
	/// `openid.ns`.
	pub ns: String,
	/// `openid.mode`, passed through as received.
	pub mode: Option<String>,
	/// `openid.op_endpoint`.
	pub op_endpoint: String,
	/// `openid.claimed_id`.
	pub claimed_id: String,
	/// `openid.return_to`.
	pub return_to: String,
	/// `openid.response_nonce`.
	pub response_nonce: String,
	/// `openid.assoc_handle`.
	pub assoc_handle: String,
	/// `openid.identity`.
	pub identity: String,
	/// `openid.sig` (unverified).
	pub signature: String,
	/// `openid.signed`, the comma-separated list of signed fields.
	pub signed: String,
	/// Provider user id derived from [`identity`](Self::identity).
	pub steam_id: SteamId,
}
impl AssertionToken {
	/// Parses the provider redirect target into a token.
	pub fn from_redirect(redirect_url: &str) -> Result<Self, MalformedTokenError> {
		let url = Url::parse(redirect_url)
			.map_err(|source| MalformedTokenError::InvalidUrl { source })?;
		let mut query = BTreeMap::new();

		for (key, value) in url.query_pairs() {
			query.entry(key.into_owned()).or_insert_with(|| value.into_owned());
		}

		let mut take = |field: &'static str| match query.remove(field) {
			Some(value) if !value.is_empty() => Ok(value),
			_ => Err(MalformedTokenError::MissingField { field }),
		};
		let ns = take(NS)?;
		let op_endpoint = take(OP_ENDPOINT)?;
		let claimed_id = take(CLAIMED_ID)?;
		let return_to = take(RETURN_TO)?;
		let response_nonce = take(RESPONSE_NONCE)?;
		let assoc_handle = take(ASSOC_HANDLE)?;
		let identity = take(IDENTITY)?;
		let signature = take(SIG)?;
		let signed = take(SIGNED)?;
		let mode = query.remove(MODE);
		let steam_id = steam_id_from_identity(&identity)?;

		Ok(Self {
			ns,
			mode,
			op_endpoint,
			claimed_id,
			return_to,
			response_nonce,
			assoc_handle,
			identity,
			signature,
			signed,
			steam_id,
		})
	}

	/// Iterates the field names listed in `openid.signed`.
	pub fn signed_fields(&self) -> impl Iterator<Item = &str> {
		self.signed.split(',').filter(|field| !field.is_empty())
	}
}
impl FromStr for AssertionToken {
	type Err = MalformedTokenError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::from_redirect(s)
	}
}

fn steam_id_from_identity(identity: &str) -> Result<SteamId, MalformedTokenError> {
	let invalid = || MalformedTokenError::InvalidIdentity { identity: identity.to_owned() };
	let (_, tail) = identity.rsplit_once(IDENTITY_ID_SEGMENT).ok_or_else(invalid)?;

	SteamId::new(tail).map_err(|_| invalid())
}
