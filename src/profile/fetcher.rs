//! Player summary lookups against the Steam Web API.
//!
//! Every call is one independent GET with no retry and no cache. Repeated lookups for the same
//! id may return different online state or last-logoff values.

// self
use crate::{
	_prelude::*,
	auth::{ApiKey, SteamId},
	error::ProfileUnavailableError,
	http::ProfileHttpClient,
	profile::{PlayerSummaries, UserProfile},
};

/// Largest number of ids the player summaries endpoint accepts in one call.
pub const MAX_IDS_PER_REQUEST: usize = 100;

/// Fetches [`UserProfile`] records through a [`ProfileHttpClient`].
pub struct ProfileFetcher<C>
where
	C: ?Sized + ProfileHttpClient,
{
	http_client: Arc<C>,
	endpoint: Url,
}
impl<C> ProfileFetcher<C>
where
	C: ?Sized + ProfileHttpClient,
{
	/// Creates a fetcher for the player summaries `endpoint`.
	pub fn new(http_client: impl Into<Arc<C>>, endpoint: Url) -> Self {
		Self { http_client: http_client.into(), endpoint }
	}

	/// Looks up one profile; only the first returned record is used.
	pub async fn fetch(&self, credential: &ApiKey, steam_id: &SteamId) -> Result<UserProfile> {
		self.fetch_many(credential, std::slice::from_ref(steam_id))
			.await?
			.into_iter()
			.next()
			.ok_or_else(|| Error::ProfileNotFound { steam_id: steam_id.clone() })
	}

	/// Looks up several profiles; the result may be shorter than `steam_ids`.
	///
	/// Steam answers at most [`MAX_IDS_PER_REQUEST`] ids per call, so longer lists are sent as
	/// consecutive requests and the records are concatenated in order. The first failing request
	/// fails the whole lookup.
	pub async fn fetch_many(
		&self,
		credential: &ApiKey,
		steam_ids: &[SteamId],
	) -> Result<Vec<UserProfile>> {
		if credential.is_blank() {
			return Err(Error::InvalidCredential { reason: "the Steam API key is empty".into() });
		}

		let mut profiles = Vec::with_capacity(steam_ids.len());

		for chunk in steam_ids.chunks(MAX_IDS_PER_REQUEST) {
			profiles.extend(self.fetch_chunk(credential, chunk).await?);
		}

		Ok(profiles)
	}

	async fn fetch_chunk(
		&self,
		credential: &ApiKey,
		steam_ids: &[SteamId],
	) -> Result<Vec<UserProfile>> {
		let url = self.request_url(credential, steam_ids);
		let reply = self.http_client.get(url).await.map_err(ProfileUnavailableError::transport)?;

		match reply.status {
			401 | 403 =>
				return Err(Error::InvalidCredential {
					reason: format!("the profile endpoint answered HTTP {}", reply.status),
				}),
			_ if !reply.is_success() =>
				return Err(ProfileUnavailableError::Status { status: reply.status }.into()),
			_ => {},
		}

		let mut de = serde_json::Deserializer::from_slice(&reply.body);
		let summaries: PlayerSummaries = serde_path_to_error::deserialize(&mut de)
			.map_err(|source| ProfileUnavailableError::Decode { source })?;

		Ok(summaries.response.players)
	}

	fn request_url(&self, credential: &ApiKey, steam_ids: &[SteamId]) -> Url {
		let mut url = self.endpoint.clone();
		let ids = steam_ids.iter().map(|id| id.as_ref()).collect::<Vec<_>>().join(",");

		url.query_pairs_mut().append_pair("key", credential.expose()).append_pair("steamids", &ids);

		url
	}
}
impl<C> Clone for ProfileFetcher<C>
where
	C: ?Sized + ProfileHttpClient,
{
	fn clone(&self) -> Self {
		Self { http_client: self.http_client.clone(), endpoint: self.endpoint.clone() }
	}
}
impl<C> Debug for ProfileFetcher<C>
where
	C: ?Sized + ProfileHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ProfileFetcher").field("endpoint", &self.endpoint).finish()
	}
}
