//! Authentication sessions driving one Steam sign-in at a time.
//!
//! [`AuthenticationSession::authenticate`] walks the attempt through [`SessionState`]: ask the
//! relying party for the provider URL, open and navigate a host view, wait for the provider
//! redirect, parse it into an [`AssertionToken`], and resolve the signed-in user's
//! [`UserProfile`]. The view is closed exactly once on every exit path. A session runs one
//! attempt at a time; a second concurrent call fails fast with [`Error::SessionBusy`].

pub mod state;

pub use state::*;

// self
use crate::{
	_prelude::*,
	auth::{ApiKey, AssertionToken, SteamId},
	host::{BrowsingHost, RedirectObserver, ViewGuard, ViewOptions},
	http::ProfileHttpClient,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	openid::{AuthRequest, RelyingParty},
	profile::{ProfileFetcher, UserProfile},
	provider::ProviderDescriptor,
};
#[cfg(feature = "reqwest")]
use crate::{error::ConfigError, http::ReqwestHttpClient, openid::StatelessRelyingParty};

#[cfg(feature = "reqwest")]
/// Session specialized for the crate's default reqwest transport.
pub type ReqwestSession = AuthenticationSession<ReqwestHttpClient>;

type Continuation<'a> = Box<dyn FnOnce(&UserProfile, &AssertionToken) + 'a + Send>;

/// Per-attempt settings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticationOptions {
	/// View settings; when present they replace [`ViewOptions::default`] entirely.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub view: Option<ViewOptions>,
}
impl AuthenticationOptions {
	/// Uses `view` for the authentication view.
	pub fn with_view(mut self, view: ViewOptions) -> Self {
		self.view = Some(view);

		self
	}
}

/// Result of a completed attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Authenticated {
	/// Profile of the signed-in user.
	pub profile: UserProfile,
	/// Assertion the profile was resolved from.
	pub token: AssertionToken,
}

/// Drives Steam OpenID sign-ins against one provider descriptor.
pub struct AuthenticationSession<C>
where
	C: ?Sized + ProfileHttpClient,
{
	api_key: ApiKey,
	descriptor: ProviderDescriptor,
	relying_party: Arc<dyn RelyingParty>,
	host: Arc<dyn BrowsingHost>,
	fetcher: ProfileFetcher<C>,
	state: Mutex<SessionState>,
	token: RwLock<Option<AssertionToken>>,
	profile: RwLock<Option<UserProfile>>,
	in_flight: AsyncMutex<()>,
}
impl<C> AuthenticationSession<C>
where
	C: ?Sized + ProfileHttpClient,
{
	/// Creates a session that reuses the caller-provided transport.
	pub fn with_http_client(
		api_key: ApiKey,
		descriptor: ProviderDescriptor,
		relying_party: Arc<dyn RelyingParty>,
		host: Arc<dyn BrowsingHost>,
		http_client: impl Into<Arc<C>>,
	) -> Self {
		let fetcher = ProfileFetcher::new(http_client, descriptor.profile_endpoint.clone());

		Self {
			api_key,
			descriptor,
			relying_party,
			host,
			fetcher,
			state: Mutex::new(SessionState::Idle),
			token: Default::default(),
			profile: Default::default(),
			in_flight: AsyncMutex::new(()),
		}
	}

	/// Current state of the most recent attempt.
	pub fn state(&self) -> SessionState {
		*self.state.lock()
	}

	/// Token validated by the most recent attempt, if any.
	pub fn token(&self) -> Option<AssertionToken> {
		self.token.read().clone()
	}

	/// Profile resolved by the most recent attempt, if any.
	pub fn profile(&self) -> Option<UserProfile> {
		self.profile.read().clone()
	}

	/// Descriptor the session was built with.
	pub fn descriptor(&self) -> &ProviderDescriptor {
		&self.descriptor
	}

	/// Fetcher bound to the descriptor's profile endpoint.
	pub fn fetcher(&self) -> &ProfileFetcher<C> {
		&self.fetcher
	}

	/// Runs a full sign-in and returns the user's profile with the validated token.
	///
	/// Waits for the provider redirect without a timeout. Dropping the returned future closes the
	/// view and leaves the state where the attempt stopped.
	pub async fn authenticate(&self, options: AuthenticationOptions) -> Result<Authenticated> {
		self.run(options, None).await
	}

	/// Runs a full sign-in and hands the result to `next` before the view is closed.
	///
	/// `next` is invoked only on success. Failures are returned and never reach it.
	pub async fn authenticate_with<F>(&self, next: F, options: AuthenticationOptions) -> Result<()>
	where
		F: Send + FnOnce(&UserProfile, &AssertionToken),
	{
		self.run(options, Some(Box::new(next))).await.map(|_| ())
	}

	/// Looks up any user's profile with the session's API key.
	///
	/// Requires a token validated by this session; otherwise the call fails with
	/// [`Error::InvalidCredential`] without contacting the API. The session state is not touched.
	pub async fn get_profile_data(&self, steam_id: &SteamId) -> Result<UserProfile> {
		self.ensure_validated()?;
		self.fetch_profile(steam_id).await
	}

	/// Looks up several profiles, 100 ids per request.
	///
	/// Unknown ids are simply absent from the result.
	pub async fn get_profiles_data(&self, steam_ids: &[SteamId]) -> Result<Vec<UserProfile>> {
		const KIND: FlowKind = FlowKind::ProfileFetch;

		self.ensure_validated()?;

		let span = FlowSpan::new(KIND, "get_profiles_data");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span.instrument(self.fetcher.fetch_many(&self.api_key, steam_ids)).await;

		record_result(KIND, &result);

		result
	}

	async fn run(
		&self,
		options: AuthenticationOptions,
		next: Option<Continuation<'_>>,
	) -> Result<Authenticated> {
		const KIND: FlowKind = FlowKind::Authenticate;

		let span = FlowSpan::new(KIND, "authenticate");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = match self.in_flight.try_lock() {
			Some(_in_flight) => span.instrument(self.drive(&span, options, next)).await,
			None => {
				span.warn("authentication attempt rejected while another one is in flight");

				Err(Error::SessionBusy)
			},
		};

		record_result(KIND, &result);

		result
	}

	async fn drive(
		&self,
		span: &FlowSpan,
		options: AuthenticationOptions,
		next: Option<Continuation<'_>>,
	) -> Result<Authenticated> {
		self.token.write().take();
		self.profile.write().take();
		self.transition(span, SessionState::Idle);

		if self.api_key.is_blank() {
			return Err(self.fail(
				span,
				Error::InvalidCredential { reason: "the Steam API key is empty".into() },
			));
		}

		self.transition(span, SessionState::AwaitingProviderUrl);

		let request = AuthRequest::interactive(self.descriptor.identifier.clone());
		let auth_url = match self.relying_party.auth_url(&request).await {
			Ok(Some(url)) => url,
			Ok(None) => return Err(self.fail(span, Error::UnreachableProvider)),
			Err(e) => return Err(self.fail(span, e.into())),
		};
		let (observer, subscription) = RedirectObserver::arm();
		let view_options = options.view.unwrap_or_default();
		let view = self.host.open(&view_options, observer).map_err(|e| self.fail(span, e.into()))?;
		let mut view = ViewGuard::new(view);

		view.navigate(&auth_url).await.map_err(|e| self.fail(span, e.into()))?;
		self.transition(span, SessionState::AwaitingRedirect);

		let redirect_url = match subscription.redirected().await {
			Ok(url) => url,
			Err(e) => {
				span.warn("authentication view went away before the provider redirected");
				view.release();

				return Err(e);
			},
		};

		self.transition(span, SessionState::ValidatingToken);

		let token =
			AssertionToken::from_redirect(&redirect_url).map_err(|e| self.fail(span, e.into()))?;

		*self.token.write() = Some(token.clone());
		self.transition(span, SessionState::FetchingProfile);

		let profile = self.fetch_profile(&token.steam_id).await.map_err(|e| self.fail(span, e))?;

		*self.profile.write() = Some(profile.clone());
		self.transition(span, SessionState::Complete);

		if let Some(next) = next {
			next(&profile, &token);
		}

		view.close();

		Ok(Authenticated { profile, token })
	}

	async fn fetch_profile(&self, steam_id: &SteamId) -> Result<UserProfile> {
		const KIND: FlowKind = FlowKind::ProfileFetch;

		let span = FlowSpan::new(KIND, "fetch_profile");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span.instrument(self.fetcher.fetch(&self.api_key, steam_id)).await;

		record_result(KIND, &result);

		result
	}

	fn ensure_validated(&self) -> Result<()> {
		if self.token.read().is_none() {
			return Err(Error::InvalidCredential {
				reason: "no Steam assertion has been validated by this session".into(),
			});
		}

		Ok(())
	}

	fn transition(&self, span: &FlowSpan, to: SessionState) {
		let from = std::mem::replace(&mut *self.state.lock(), to);

		if from != to {
			span.transition(from, to);
		}
	}

	fn fail(&self, span: &FlowSpan, err: Error) -> Error {
		self.transition(span, SessionState::Failed);

		err
	}
}
#[cfg(feature = "reqwest")]
impl AuthenticationSession<ReqwestHttpClient> {
	/// Creates a session against Steam's public endpoints.
	///
	/// The session provisions its own reqwest transport and the built-in stateless relying party.
	pub fn new(api_key: ApiKey, host: Arc<dyn BrowsingHost>) -> Result<Self> {
		let descriptor = ProviderDescriptor::steam().map_err(ConfigError::from)?;
		let relying_party = Arc::new(StatelessRelyingParty::from_descriptor(&descriptor));

		Ok(Self::with_http_client(
			api_key,
			descriptor,
			relying_party,
			host,
			ReqwestHttpClient::default(),
		))
	}
}
impl<C> Debug for AuthenticationSession<C>
where
	C: ?Sized + ProfileHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthenticationSession")
			.field("descriptor", &self.descriptor)
			.field("api_key", &self.api_key)
			.field("state", &self.state())
			.field("token_validated", &self.token.read().is_some())
			.finish()
	}
}

fn record_result<T>(kind: FlowKind, result: &Result<T>) {
	let outcome = if result.is_ok() { FlowOutcome::Success } else { FlowOutcome::Failure };

	obs::record_flow_outcome(kind, outcome);
}
