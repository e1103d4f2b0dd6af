#![cfg(feature = "reqwest")]

// crates.io
use httpmock::prelude::*;
// self
use steam_openid::{
	_preludet::*,
	auth::{ApiKey, SteamId},
	error::ProfileUnavailableError,
	http::ReqwestHttpClient,
	profile::{CommunityVisibility, PersonaState, ProfileFetcher},
};

const PROFILE_PATH: &str = "/ISteamUser/GetPlayerSummaries/v0002/";
const PLAYERS: &str = r#"{"response":{"players":[
	{
		"steamid": "76561198000000000",
		"communityvisibilitystate": 3,
		"profilestate": 1,
		"personaname": "gaben",
		"profileurl": "https://steamcommunity.com/id/gaben/",
		"avatar": "https://avatars.example.com/a.jpg",
		"avatarmedium": "https://avatars.example.com/a_medium.jpg",
		"avatarfull": "https://avatars.example.com/a_full.jpg",
		"lastlogoff": 1700000000,
		"personastate": 1,
		"gameid": "570",
		"gameextrainfo": "Dota 2"
	},
	{
		"steamid": "76561198000000001",
		"communityvisibilitystate": 1,
		"personaname": "hidden",
		"profileurl": "https://steamcommunity.com/profiles/76561198000000001/",
		"avatar": "https://avatars.example.com/b.jpg",
		"avatarmedium": "https://avatars.example.com/b_medium.jpg",
		"avatarfull": "https://avatars.example.com/b_full.jpg",
		"lastlogoff": 1600000000,
		"personastate": 0
	}
]}}"#;

fn build_fetcher(server: &MockServer) -> ProfileFetcher<ReqwestHttpClient> {
	ProfileFetcher::new(
		test_reqwest_http_client(),
		Url::parse(&server.url(PROFILE_PATH)).expect("Mock profile endpoint should parse."),
	)
}

fn steam_id(value: &str) -> SteamId {
	SteamId::new(value).expect("Steam id fixture should be valid.")
}

#[tokio::test]
async fn fetch_uses_the_first_player_record() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path(PROFILE_PATH)
				.query_param("key", "fetch-key")
				.query_param("steamids", "76561198000000000");
			then.status(200).header("content-type", "application/json").body(PLAYERS);
		})
		.await;
	let profile = build_fetcher(&server)
		.fetch(&ApiKey::new("fetch-key"), &steam_id("76561198000000000"))
		.await
		.expect("Profile fetch should succeed.");

	assert_eq!(profile.persona_name, "gaben");
	assert_eq!(profile.persona_state, PersonaState::Online);
	assert_eq!(profile.community_visibility, CommunityVisibility::Public);
	assert_eq!(profile.game_extra_info.as_deref(), Some("Dota 2"));
	assert!(profile.is_in_game());

	mock.assert_async().await;
}

#[tokio::test]
async fn fetch_many_joins_ids_into_one_request() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path(PROFILE_PATH)
				.query_param("steamids", "76561198000000000,76561198000000001");
			then.status(200).header("content-type", "application/json").body(PLAYERS);
		})
		.await;
	let profiles = build_fetcher(&server)
		.fetch_many(
			&ApiKey::new("fetch-key"),
			&[steam_id("76561198000000000"), steam_id("76561198000000001")],
		)
		.await
		.expect("Batch fetch should succeed.");

	assert_eq!(profiles.len(), 2);
	assert_eq!(profiles[1].community_visibility, CommunityVisibility::Private);
	assert!(!profiles[1].profile_configured);

	mock.assert_async().await;
}

#[tokio::test]
async fn empty_player_lists_are_not_found() {
	let server = MockServer::start_async().await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(GET).path(PROFILE_PATH);
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"response\":{\"players\":[]}}");
		})
		.await;
	let err = build_fetcher(&server)
		.fetch(&ApiKey::new("fetch-key"), &steam_id("76561198000000000"))
		.await
		.expect_err("Empty player list should fail.");

	assert!(matches!(err, Error::ProfileNotFound { .. }));
}

#[tokio::test]
async fn forbidden_keys_and_outages_are_distinguished() {
	let server = MockServer::start_async().await;
	let forbidden = server
		.mock_async(|when, then| {
			when.method(GET).path(PROFILE_PATH).query_param("key", "revoked");
			then.status(403).body("<html><body>Forbidden</body></html>");
		})
		.await;
	let outage = server
		.mock_async(|when, then| {
			when.method(GET).path(PROFILE_PATH).query_param("key", "fetch-key");
			then.status(502);
		})
		.await;
	let fetcher = build_fetcher(&server);
	let id = steam_id("76561198000000000");
	let err = fetcher
		.fetch(&ApiKey::new("revoked"), &id)
		.await
		.expect_err("Rejected key should fail.");

	assert!(matches!(err, Error::InvalidCredential { .. }));

	let err =
		fetcher.fetch(&ApiKey::new("fetch-key"), &id).await.expect_err("Outage should fail.");

	assert!(matches!(
		err,
		Error::ProfileUnavailable(ProfileUnavailableError::Status { status: 502 })
	));

	forbidden.assert_async().await;
	outage.assert_async().await;
}

#[tokio::test]
async fn unreachable_endpoints_are_transport_failures() {
	let fetcher: ProfileFetcher<ReqwestHttpClient> = ProfileFetcher::new(
		test_reqwest_http_client(),
		Url::parse("http://127.0.0.1:9/ISteamUser/GetPlayerSummaries/v0002/")
			.expect("Closed-port endpoint should parse."),
	);
	let err = fetcher
		.fetch(&ApiKey::new("fetch-key"), &steam_id("76561198000000000"))
		.await
		.expect_err("Closed port should fail.");

	assert!(matches!(
		err,
		Error::ProfileUnavailable(ProfileUnavailableError::Transport { .. })
	));
}
