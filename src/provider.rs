//! Provider descriptors: the OpenID and Web API endpoints a session talks to.
//!
//! [`ProviderDescriptor::steam`] yields Steam's public endpoints. Tests and self-hosted mirrors
//! use [`ProviderDescriptorBuilder`] to point any endpoint elsewhere.

pub mod builder;

pub use builder::*;

// self
use crate::_prelude::*;

/// OpenID identifier Steam publishes for discovery.
pub const STEAM_OPENID_IDENTIFIER: &str = "http://steamcommunity.com/openid";
/// Steam's OpenID provider endpoint.
pub const STEAM_LOGIN_ENDPOINT: &str = "https://steamcommunity.com/openid/login";
/// Player summaries endpoint of the Steam Web API.
pub const STEAM_PROFILE_ENDPOINT: &str =
	"https://api.steampowered.com/ISteamUser/GetPlayerSummaries/v0002/";
/// Return-to URL used by desktop hosts; the embedded view never actually loads it.
pub const DEFAULT_RETURN_TO: &str = "http://localhost";

/// Immutable provider descriptor consumed by sessions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDescriptor {
	/// OpenID identifier handed to the relying party.
	pub identifier: Url,
	/// OpenID provider endpoint that serves the login page.
	pub login_endpoint: Url,
	/// Player summaries endpoint.
	pub profile_endpoint: Url,
	/// URL the provider redirects to once the user signed in.
	pub return_to: Url,
	/// Optional realm presented to the user; must cover [`return_to`](Self::return_to).
	pub realm: Option<Url>,
}
impl ProviderDescriptor {
	/// Creates an empty builder.
	pub fn builder() -> ProviderDescriptorBuilder {
		ProviderDescriptorBuilder::default()
	}

	/// Descriptor for Steam's public endpoints.
	pub fn steam() -> Result<Self, ProviderDescriptorError> {
		ProviderDescriptorBuilder::steam()?.build()
	}
}
