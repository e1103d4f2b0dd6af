//! OpenID 2.0 relying-party seam.
//!
//! Sessions only need one thing from a relying party: the URL that starts the provider's
//! interactive login. [`RelyingParty`] keeps discovery and association behind that single call so
//! hosts can bring a full implementation. [`StatelessRelyingParty`] is the built-in one: it maps
//! known identifiers straight to their provider endpoint and builds a stateless `checkid_*`
//! request without association.

// self
use crate::{_prelude::*, auth::OPENID_NS, error::RelyingPartyError, provider::ProviderDescriptor};

/// Identifier-select URI that lets the provider pick the identity.
pub const IDENTIFIER_SELECT: &str = "http://specs.openid.net/auth/2.0/identifier_select";

/// Boxed future returned by [`RelyingParty::auth_url`].
pub type RelyingPartyFuture<'a> =
	Pin<Box<dyn Future<Output = Result<Option<Url>, RelyingPartyError>> + 'a + Send>>;

/// Produces the provider URL that begins an authentication attempt.
///
/// `Ok(None)` means the provider is known but yielded no usable URL; errors are opaque and
/// never retried by the session.
pub trait RelyingParty: Send + Sync {
	/// Resolves the authentication URL for `request`.
	fn auth_url<'a>(&'a self, request: &'a AuthRequest) -> RelyingPartyFuture<'a>;
}

/// Parameters of one authentication URL request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthRequest {
	/// OpenID identifier of the provider.
	pub identifier: Url,
	/// Use `checkid_immediate` instead of the interactive `checkid_setup`.
	pub immediate: bool,
}
impl AuthRequest {
	/// Interactive request against `identifier`.
	pub fn interactive(identifier: Url) -> Self {
		Self { identifier, immediate: false }
	}

	/// OpenID mode string for the request.
	pub fn mode(&self) -> &'static str {
		if self.immediate { "checkid_immediate" } else { "checkid_setup" }
	}
}

/// Relying party that skips discovery and association.
#[derive(Clone, Debug)]
pub struct StatelessRelyingParty {
	return_to: Url,
	realm: Option<Url>,
	providers: BTreeMap<String, Url>,
}
impl StatelessRelyingParty {
	/// Creates a relying party with no known providers.
	pub fn new(return_to: Url) -> Self {
		Self { return_to, realm: None, providers: BTreeMap::new() }
	}

	/// Creates a relying party that knows the descriptor's provider.
	pub fn from_descriptor(descriptor: &ProviderDescriptor) -> Self {
		let party = Self::new(descriptor.return_to.clone())
			.with_provider(&descriptor.identifier, descriptor.login_endpoint.clone());

		match descriptor.realm.clone() {
			Some(realm) => party.with_realm(realm),
			None => party,
		}
	}

	/// Registers the provider endpoint serving `identifier`.
	pub fn with_provider(mut self, identifier: &Url, endpoint: Url) -> Self {
		self.providers.insert(identifier_key(identifier), endpoint);

		self
	}

	/// Sets the realm sent as `openid.realm`.
	pub fn with_realm(mut self, realm: Url) -> Self {
		self.realm = Some(realm);

		self
	}

	fn build_url(&self, request: &AuthRequest) -> Option<Url> {
		let mut url = self.providers.get(&identifier_key(&request.identifier))?.clone();
		let mut pairs = url.query_pairs_mut();

		pairs.append_pair("openid.ns", OPENID_NS);
		pairs.append_pair("openid.mode", request.mode());
		pairs.append_pair("openid.return_to", self.return_to.as_str());

		if let Some(realm) = self.realm.as_ref() {
			pairs.append_pair("openid.realm", realm.as_str());
		}

		pairs.append_pair("openid.identity", IDENTIFIER_SELECT);
		pairs.append_pair("openid.claimed_id", IDENTIFIER_SELECT);

		drop(pairs);

		Some(url)
	}
}
impl RelyingParty for StatelessRelyingParty {
	fn auth_url<'a>(&'a self, request: &'a AuthRequest) -> RelyingPartyFuture<'a> {
		Box::pin(async move { Ok(self.build_url(request)) })
	}
}

fn identifier_key(identifier: &Url) -> String {
	identifier.as_str().trim_end_matches('/').to_owned()
}

#[cfg(test)]
mod tests {
	// std
	use std::collections::HashMap;
	// self
	use super::*;

	fn url(value: &str) -> Url {
		Url::parse(value).expect("Relying party fixture URL should parse.")
	}

	#[test]
	fn builds_checkid_setup_request() {
		let party = StatelessRelyingParty::new(url("http://localhost"))
			.with_provider(
				&url("http://steamcommunity.com/openid"),
				url("https://steamcommunity.com/openid/login"),
			)
			.with_realm(url("http://localhost"));
		let auth_url = party
			.build_url(&AuthRequest::interactive(url("http://steamcommunity.com/openid/")))
			.expect("Known identifier should produce a URL.");
		let pairs: HashMap<_, _> = auth_url.query_pairs().into_owned().collect();

		assert_eq!(auth_url.path(), "/openid/login");
		assert_eq!(pairs.get("openid.ns"), Some(&OPENID_NS.into()));
		assert_eq!(pairs.get("openid.mode"), Some(&"checkid_setup".into()));
		assert_eq!(pairs.get("openid.return_to"), Some(&"http://localhost/".into()));
		assert_eq!(pairs.get("openid.realm"), Some(&"http://localhost/".into()));
		assert_eq!(pairs.get("openid.identity"), Some(&IDENTIFIER_SELECT.into()));
		assert_eq!(pairs.get("openid.claimed_id"), Some(&IDENTIFIER_SELECT.into()));
	}

	#[test]
	fn immediate_mode_and_unknown_identifiers() {
		let party = StatelessRelyingParty::new(url("http://localhost")).with_provider(
			&url("https://example.com/openid"),
			url("https://example.com/openid/login"),
		);
		let mut request = AuthRequest::interactive(url("https://example.com/openid"));

		request.immediate = true;

		let auth_url = party.build_url(&request).expect("Known identifier should produce a URL.");

		assert!(auth_url.query().is_some_and(|q| q.contains("checkid_immediate")));
		assert!(auth_url.query().is_some_and(|q| !q.contains("openid.realm")));
		assert!(
			party.build_url(&AuthRequest::interactive(url("https://unknown.example.com/"))).is_none()
		);
	}
}
