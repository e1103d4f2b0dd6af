//! Validated construction of [`ProviderDescriptor`] values.

// self
use crate::{_prelude::*, provider::*};

/// Errors raised while constructing or validating descriptors.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ProviderDescriptorError {
	/// A required endpoint was never set.
	#[error("Missing {endpoint} endpoint.")]
	MissingEndpoint {
		/// Which endpoint is missing.
		endpoint: &'static str,
	},
	/// An endpoint string failed to parse.
	#[error("The {endpoint} endpoint is not a valid URL.")]
	InvalidUrl {
		/// Which endpoint failed to parse.
		endpoint: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Endpoints must use HTTP or HTTPS.
	#[error("The {endpoint} endpoint must use HTTP or HTTPS: {url}.")]
	UnsupportedScheme {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// The realm does not cover the return-to URL.
	#[error("Realm {realm} does not cover return_to {return_to}.")]
	RealmMismatch {
		/// Configured realm.
		realm: String,
		/// Configured return-to URL.
		return_to: String,
	},
}

/// Builder for [`ProviderDescriptor`] values.
#[derive(Debug, Default)]
pub struct ProviderDescriptorBuilder {
	/// OpenID identifier handed to the relying party.
	pub identifier: Option<Url>,
	/// OpenID provider endpoint.
	pub login_endpoint: Option<Url>,
	/// Player summaries endpoint.
	pub profile_endpoint: Option<Url>,
	/// Return-to URL (defaults to [`DEFAULT_RETURN_TO`]).
	pub return_to: Option<Url>,
	/// Optional realm.
	pub realm: Option<Url>,
}
impl ProviderDescriptorBuilder {
	/// Creates a builder seeded with Steam's public endpoints.
	pub fn steam() -> Result<Self, ProviderDescriptorError> {
		Ok(Self {
			identifier: Some(parse("identifier", STEAM_OPENID_IDENTIFIER)?),
			login_endpoint: Some(parse("login", STEAM_LOGIN_ENDPOINT)?),
			profile_endpoint: Some(parse("profile", STEAM_PROFILE_ENDPOINT)?),
			return_to: None,
			realm: None,
		})
	}

	/// Sets the OpenID identifier.
	pub fn identifier(mut self, url: Url) -> Self {
		self.identifier = Some(url);

		self
	}

	/// Sets the OpenID provider endpoint.
	pub fn login_endpoint(mut self, url: Url) -> Self {
		self.login_endpoint = Some(url);

		self
	}

	/// Sets the player summaries endpoint.
	pub fn profile_endpoint(mut self, url: Url) -> Self {
		self.profile_endpoint = Some(url);

		self
	}

	/// Overrides the return-to URL.
	pub fn return_to(mut self, url: Url) -> Self {
		self.return_to = Some(url);

		self
	}

	/// Sets the realm.
	pub fn realm(mut self, url: Url) -> Self {
		self.realm = Some(url);

		self
	}

	/// Consumes the builder and validates the resulting descriptor.
	pub fn build(self) -> Result<ProviderDescriptor, ProviderDescriptorError> {
		let identifier = self
			.identifier
			.ok_or(ProviderDescriptorError::MissingEndpoint { endpoint: "identifier" })?;
		let login_endpoint = self
			.login_endpoint
			.ok_or(ProviderDescriptorError::MissingEndpoint { endpoint: "login" })?;
		let profile_endpoint = self
			.profile_endpoint
			.ok_or(ProviderDescriptorError::MissingEndpoint { endpoint: "profile" })?;
		let return_to = match self.return_to {
			Some(url) => url,
			None => parse("return_to", DEFAULT_RETURN_TO)?,
		};
		let descriptor = ProviderDescriptor {
			identifier,
			login_endpoint,
			profile_endpoint,
			return_to,
			realm: self.realm,
		};

		descriptor.validate()?;

		Ok(descriptor)
	}
}

impl ProviderDescriptor {
	/// Validates invariants for the descriptor.
	fn validate(&self) -> Result<(), ProviderDescriptorError> {
		validate_endpoint("identifier", &self.identifier)?;
		validate_endpoint("login", &self.login_endpoint)?;
		validate_endpoint("profile", &self.profile_endpoint)?;
		validate_endpoint("return_to", &self.return_to)?;

		if let Some(realm) = self.realm.as_ref() {
			validate_endpoint("realm", realm)?;

			if !realm_covers(realm, &self.return_to) {
				return Err(ProviderDescriptorError::RealmMismatch {
					realm: realm.to_string(),
					return_to: self.return_to.to_string(),
				});
			}
		}

		Ok(())
	}
}

fn parse(endpoint: &'static str, raw: &str) -> Result<Url, ProviderDescriptorError> {
	Url::parse(raw).map_err(|source| ProviderDescriptorError::InvalidUrl { endpoint, source })
}

fn validate_endpoint(name: &'static str, url: &Url) -> Result<(), ProviderDescriptorError> {
	if matches!(url.scheme(), "http" | "https") {
		Ok(())
	} else {
		Err(ProviderDescriptorError::UnsupportedScheme { endpoint: name, url: url.to_string() })
	}
}

fn realm_covers(realm: &Url, return_to: &Url) -> bool {
	realm.scheme() == return_to.scheme()
		&& realm.host_str() == return_to.host_str()
		&& realm.port_or_known_default() == return_to.port_or_known_default()
		&& return_to.path().starts_with(realm.path())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn url(value: &str) -> Url {
		Url::parse(value).expect("Descriptor fixture URL should parse.")
	}

	#[test]
	fn steam_defaults_build() {
		let descriptor = ProviderDescriptor::steam().expect("Steam descriptor should build.");

		assert_eq!(descriptor.identifier.as_str(), STEAM_OPENID_IDENTIFIER);
		assert_eq!(descriptor.login_endpoint.as_str(), STEAM_LOGIN_ENDPOINT);
		assert_eq!(descriptor.profile_endpoint.as_str(), STEAM_PROFILE_ENDPOINT);
		assert_eq!(descriptor.return_to.as_str(), "http://localhost/");
		assert!(descriptor.realm.is_none());
	}

	#[test]
	fn missing_endpoints_are_reported() {
		let err = ProviderDescriptor::builder()
			.identifier(url("https://example.com/openid"))
			.build()
			.expect_err("Builder without a login endpoint should fail.");

		assert_eq!(err, ProviderDescriptorError::MissingEndpoint { endpoint: "login" });
	}

	#[test]
	fn non_http_endpoints_are_rejected() {
		let err = ProviderDescriptorBuilder::steam()
			.expect("Steam builder should seed.")
			.profile_endpoint(url("ftp://example.com/players"))
			.build()
			.expect_err("FTP profile endpoint should be rejected.");

		assert!(matches!(
			err,
			ProviderDescriptorError::UnsupportedScheme { endpoint: "profile", .. }
		));
	}

	#[test]
	fn realm_must_cover_return_to() {
		let ok = ProviderDescriptorBuilder::steam()
			.expect("Steam builder should seed.")
			.return_to(url("https://app.example.com/auth/steam"))
			.realm(url("https://app.example.com/"))
			.build();

		assert!(ok.is_ok());

		let err = ProviderDescriptorBuilder::steam()
			.expect("Steam builder should seed.")
			.return_to(url("https://app.example.com/auth/steam"))
			.realm(url("https://other.example.com/"))
			.build()
			.expect_err("Foreign realm should be rejected.");

		assert!(matches!(err, ProviderDescriptorError::RealmMismatch { .. }));
	}
}
