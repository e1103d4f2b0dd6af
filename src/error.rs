//! Session-level error types shared by the token parser, profile fetcher, and host seams.

// self
use crate::{_prelude::*, auth::SteamId};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by [`AuthenticationSession`](crate::session::AuthenticationSession).
#[derive(Debug, ThisError)]
pub enum Error {
	/// The OpenID association or request-building step failed.
	#[error(transparent)]
	RelyingParty(#[from] RelyingPartyError),
	/// The relying party produced no usable authentication URL.
	#[error("Unable to reach the Steam authentication URL.")]
	UnreachableProvider,
	/// The redirect carried an incomplete or malformed assertion.
	#[error(transparent)]
	MalformedToken(#[from] MalformedTokenError),
	/// The profile API could not be reached or answered with garbage.
	#[error(transparent)]
	ProfileUnavailable(#[from] ProfileUnavailableError),
	/// The browsing host failed to present the authentication view.
	#[error(transparent)]
	Host(#[from] HostError),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),

	/// The profile API returned zero player records for the requested id.
	#[error("No Steam profile exists for {steam_id}.")]
	ProfileNotFound {
		/// Identifier that was looked up.
		steam_id: SteamId,
	},
	/// No validated assertion exists yet, or the API credential is missing or rejected.
	#[error("Invalid Steam API credential: {reason}.")]
	InvalidCredential {
		/// Human-readable reason string.
		reason: String,
	},
	/// Another `authenticate` call is still in flight on the same session.
	#[error("An authentication attempt is already in flight on this session.")]
	SessionBusy,
	/// Every redirect observer handle was dropped before a redirect arrived.
	#[error("The authentication view went away before the provider redirected.")]
	RedirectAbandoned,
}

/// Failures raised while turning a redirect URL into an [`AssertionToken`](crate::auth::AssertionToken).
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum MalformedTokenError {
	/// The redirect target is not an absolute URL.
	#[error("Received a malformed profile token from Steam: the redirect URL is invalid.")]
	InvalidUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// A required `openid.*` query parameter was absent or empty.
	#[error("Received a malformed profile token from Steam: `{field}` is missing.")]
	MissingField {
		/// Query parameter name.
		field: &'static str,
	},
	/// The identity URL does not end in an `/id/<steamid>` segment.
	#[error("Received a malformed profile token from Steam: identity `{identity}` has no user id.")]
	InvalidIdentity {
		/// Identity URL carried by the assertion.
		identity: String,
	},
}

/// Profile API failures that are not a clean "not found".
#[derive(Debug, ThisError)]
pub enum ProfileUnavailableError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the profile endpoint.")]
	Transport {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The endpoint answered with a non-success status.
	#[error("Profile endpoint returned HTTP {status}.")]
	Status {
		/// HTTP status code.
		status: u16,
	},
	/// The endpoint responded with JSON that does not match the player summary shape.
	#[error("Profile endpoint returned malformed JSON.")]
	Decode {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}
impl ProfileUnavailableError {
	/// Wraps a transport-specific network error.
	pub fn transport(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Transport { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ProfileUnavailableError {
	fn from(e: ReqwestError) -> Self {
		Self::transport(e)
	}
}

/// Opaque failure reported by a [`RelyingParty`](crate::openid::RelyingParty).
#[derive(Debug, ThisError)]
#[error("OpenID relying party failed: {message}.")]
pub struct RelyingPartyError {
	message: String,
	#[source]
	source: Option<BoxError>,
}
impl RelyingPartyError {
	/// Creates an error carrying only a message.
	pub fn new(message: impl Into<String>) -> Self {
		Self { message: message.into(), source: None }
	}

	/// Creates an error that wraps an underlying cause.
	pub fn with_source(
		message: impl Into<String>,
		src: impl 'static + Send + Sync + std::error::Error,
	) -> Self {
		Self { message: message.into(), source: Some(Box::new(src)) }
	}

	/// Human-readable failure summary.
	pub fn message(&self) -> &str {
		&self.message
	}
}

/// Failures reported by a [`BrowsingHost`](crate::host::BrowsingHost) or its views.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum HostError {
	/// The host could not create the authentication view.
	#[error("Browsing host could not open the authentication view: {message}.")]
	Open {
		/// Host-supplied reason string.
		message: String,
	},
	/// The view failed to load the authentication URL.
	#[error("Authentication view failed to load {url}: {message}.")]
	Navigation {
		/// URL that failed to load.
		url: String,
		/// Host-supplied reason string.
		message: String,
	},
}

/// Configuration failures raised while wiring a session.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Provider descriptor failed validation.
	#[error(transparent)]
	Descriptor(#[from] crate::provider::ProviderDescriptorError),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}
