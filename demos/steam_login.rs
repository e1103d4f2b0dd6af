//! Runs a complete sign-in against a mocked Steam with a scripted browsing host.
//!
//! A desktop shell would open a real embedded browser in [`BrowsingHost::open`] and forward its
//! "before redirect" event to the observer. Here the view redirects as soon as it is navigated,
//! as if the user had already signed in. Set `STEAM_API_KEY` to see it forwarded to the profile
//! endpoint.

// std
use std::{
	env,
	sync::{Arc, Mutex},
};
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use url::Url;
// self
use steam_openid::{
	auth::ApiKey,
	error::HostError,
	host::{BrowsingHost, BrowsingView, HostFuture, RedirectObserver, ViewOptions},
	http::ReqwestHttpClient,
	openid::{RelyingParty, StatelessRelyingParty},
	provider::ProviderDescriptor,
	session::{AuthenticationOptions, AuthenticationSession},
};

const STEAM_ID: &str = "76561197960435530";

struct ScriptedHost {
	redirect_url: String,
}
impl BrowsingHost for ScriptedHost {
	fn open(
		&self,
		options: &ViewOptions,
		observer: RedirectObserver,
	) -> Result<Box<dyn BrowsingView>, HostError> {
		println!("Opening a {}x{} authentication view.", options.width, options.height);

		Ok(Box::new(ScriptedView {
			observer: Mutex::new(Some(observer)),
			redirect_url: self.redirect_url.clone(),
		}))
	}
}

struct ScriptedView {
	observer: Mutex<Option<RedirectObserver>>,
	redirect_url: String,
}
impl BrowsingView for ScriptedView {
	fn navigate<'a>(&'a self, url: &'a Url) -> HostFuture<'a, ()> {
		Box::pin(async move {
			println!("Loading {url}.");

			let observer = self.observer.lock().ok().and_then(|mut observer| observer.take());

			if let Some(observer) = observer {
				observer.fire(self.redirect_url.clone());
			}

			Ok(())
		})
	}

	fn close(&self) {
		println!("Closing the authentication view.");
	}
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let api_key = env::var("STEAM_API_KEY").unwrap_or_else(|_| "demo-key".into());
	let server = MockServer::start_async().await;
	let profile_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/ISteamUser/GetPlayerSummaries/v0002/")
				.query_param("steamids", STEAM_ID);
			then.status(200).header("content-type", "application/json").body(format!(
				"{{\"response\":{{\"players\":[{{\"steamid\":\"{STEAM_ID}\",\
				\"communityvisibilitystate\":3,\"profilestate\":1,\"personaname\":\"Rabscuttle\",\
				\"profileurl\":\"https://steamcommunity.com/id/rabscuttle/\",\
				\"avatar\":\"https://avatars.example.com/r.jpg\",\
				\"avatarmedium\":\"https://avatars.example.com/r_medium.jpg\",\
				\"avatarfull\":\"https://avatars.example.com/r_full.jpg\",\
				\"lastlogoff\":1700000000,\"personastate\":1}}]}}}}"
			));
		})
		.await;
	let descriptor = ProviderDescriptor::builder()
		.identifier(Url::parse("http://steamcommunity.com/openid")?)
		.login_endpoint(Url::parse(&server.url("/openid/login"))?)
		.profile_endpoint(Url::parse(&server.url("/ISteamUser/GetPlayerSummaries/v0002/"))?)
		.build()?;
	let relying_party: Arc<dyn RelyingParty> =
		Arc::new(StatelessRelyingParty::from_descriptor(&descriptor));
	let host = Arc::new(ScriptedHost {
		redirect_url: format!(
			"http://localhost/?openid.ns=http%3A%2F%2Fspecs.openid.net%2Fauth%2F2.0\
			&openid.mode=id_res&openid.op_endpoint={login}\
			&openid.claimed_id=https%3A%2F%2Fsteamcommunity.com%2Fopenid%2Fid%2F{STEAM_ID}\
			&openid.identity=https%3A%2F%2Fsteamcommunity.com%2Fopenid%2Fid%2F{STEAM_ID}\
			&openid.return_to=http%3A%2F%2Flocalhost&openid.response_nonce=demo-nonce\
			&openid.assoc_handle=1234567890&openid.sig=demo-signature\
			&openid.signed=signed%2Cop_endpoint%2Cclaimed_id%2Cidentity",
			login = server.url("/openid/login"),
		),
	});
	let session = <AuthenticationSession<ReqwestHttpClient>>::with_http_client(
		ApiKey::new(api_key),
		descriptor,
		relying_party,
		host,
		ReqwestHttpClient::default(),
	);

	session
		.authenticate_with(
			|profile, token| {
				println!(
					"Signed in as {} ({}), currently {}.",
					profile.persona_name, token.steam_id, profile.persona_state
				);
			},
			AuthenticationOptions::default(),
		)
		.await?;

	println!("Session finished in state {}.", session.state());

	profile_mock.assert_async().await;

	Ok(())
}
