//! States an authentication attempt moves through.

// self
use crate::_prelude::*;

/// Lifecycle of one authentication attempt.
///
/// `Idle → AwaitingProviderUrl → AwaitingRedirect → ValidatingToken → FetchingProfile → Complete`,
/// with `Failed` reachable from every non-terminal state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
	/// No attempt has started.
	#[default]
	Idle,
	/// Waiting for the relying party to produce the authentication URL.
	AwaitingProviderUrl,
	/// The view shows the login page; waiting for the provider redirect.
	AwaitingRedirect,
	/// Parsing the redirect into an assertion token.
	ValidatingToken,
	/// Looking up the authenticated user's profile.
	FetchingProfile,
	/// The attempt succeeded.
	Complete,
	/// The attempt failed; start a new one to retry.
	Failed,
}
impl SessionState {
	/// Returns a stable label suitable for span fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			SessionState::Idle => "idle",
			SessionState::AwaitingProviderUrl => "awaiting_provider_url",
			SessionState::AwaitingRedirect => "awaiting_redirect",
			SessionState::ValidatingToken => "validating_token",
			SessionState::FetchingProfile => "fetching_profile",
			SessionState::Complete => "complete",
			SessionState::Failed => "failed",
		}
	}

	/// Whether the attempt reached `Complete` or `Failed`.
	pub const fn is_terminal(self) -> bool {
		matches!(self, SessionState::Complete | SessionState::Failed)
	}
}
impl Display for SessionState {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
