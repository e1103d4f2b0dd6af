//! Looks up Steam profiles directly with a [`ProfileFetcher`].
//!
//! With `STEAM_API_KEY` set, the ids given on the command line are resolved against the public
//! Steam Web API. Without a key, a mocked endpoint answers instead.

// std
use std::env;
// crates.io
use color_eyre::{Result, eyre::eyre};
use httpmock::prelude::*;
use url::Url;
// self
use steam_openid::{
	auth::{ApiKey, SteamId},
	http::ReqwestHttpClient,
	profile::ProfileFetcher,
	provider::STEAM_PROFILE_ENDPOINT,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let mut ids = env::args().skip(1).map(SteamId::new).collect::<Result<Vec<_>, _>>()?;

	if ids.is_empty() {
		ids.push(SteamId::new("76561197960435530")?);
	}

	let server = MockServer::start_async().await;
	let (api_key, endpoint) = match env::var("STEAM_API_KEY") {
		Ok(key) => (ApiKey::new(key), Url::parse(STEAM_PROFILE_ENDPOINT)?),
		Err(_) => {
			server
				.mock_async(|when, then| {
					when.method(GET).path("/ISteamUser/GetPlayerSummaries/v0002/");
					then.status(200).header("content-type", "application/json").body(
						"{\"response\":{\"players\":[{\"steamid\":\"76561197960435530\",\
						\"communityvisibilitystate\":3,\"personaname\":\"Robin\",\
						\"profileurl\":\"https://steamcommunity.com/id/robinwalker/\",\
						\"avatar\":\"https://avatars.example.com/r.jpg\",\
						\"avatarmedium\":\"https://avatars.example.com/r_medium.jpg\",\
						\"avatarfull\":\"https://avatars.example.com/r_full.jpg\",\
						\"lastlogoff\":1700000000,\"personastate\":0,\"loccountrycode\":\"US\"}]}}",
					);
				})
				.await;

			(
				ApiKey::new("demo-key"),
				Url::parse(&server.url("/ISteamUser/GetPlayerSummaries/v0002/"))?,
			)
		},
	};
	let fetcher = <ProfileFetcher<ReqwestHttpClient>>::new(ReqwestHttpClient::default(), endpoint);
	let profiles = fetcher.fetch_many(&api_key, &ids).await?;

	if profiles.is_empty() {
		return Err(eyre!("No profile matched {} id(s).", ids.len()));
	}

	for profile in profiles {
		println!(
			"{}: {} [{}] {}",
			profile.steam_id,
			profile.persona_name,
			profile.persona_state,
			profile.country_code.as_deref().unwrap_or("--"),
		);
	}

	Ok(())
}
