//! Player summaries returned by the Steam Web API.
//!
//! Field names follow `ISteamUser/GetPlayerSummaries/v0002`; integer states and `0/1` flags are
//! decoded into Rust enums and booleans, Unix timestamps into [`OffsetDateTime`].

pub mod fetcher;

pub use fetcher::*;

// self
use crate::{_prelude::*, auth::SteamId};

/// Online state reported in `personastate`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum PersonaState {
	/// Offline, or the profile is private.
	Offline,
	/// Online.
	Online,
	/// Busy.
	Busy,
	/// Away.
	Away,
	/// Snooze.
	Snooze,
	/// Looking to trade.
	LookingToTrade,
	/// Looking to play.
	LookingToPlay,
}
impl PersonaState {
	/// Returns a human-readable label.
	pub const fn as_str(self) -> &'static str {
		match self {
			PersonaState::Offline => "Offline",
			PersonaState::Online => "Online",
			PersonaState::Busy => "Busy",
			PersonaState::Away => "Away",
			PersonaState::Snooze => "Snooze",
			PersonaState::LookingToTrade => "Looking to Trade",
			PersonaState::LookingToPlay => "Looking to Play",
		}
	}
}
impl TryFrom<u8> for PersonaState {
	type Error = UnknownStateError;

	fn try_from(value: u8) -> Result<Self, Self::Error> {
		Ok(match value {
			0 => PersonaState::Offline,
			1 => PersonaState::Online,
			2 => PersonaState::Busy,
			3 => PersonaState::Away,
			4 => PersonaState::Snooze,
			5 => PersonaState::LookingToTrade,
			6 => PersonaState::LookingToPlay,
			_ => return Err(UnknownStateError { field: "personastate", value }),
		})
	}
}
impl From<PersonaState> for u8 {
	fn from(value: PersonaState) -> Self {
		value as u8
	}
}
impl Display for PersonaState {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Profile visibility reported in `communityvisibilitystate`.
///
/// Steam only ever sends `1` (private) and `3` (public); `0` and `2` are kept so every value of
/// the documented range still decodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum CommunityVisibility {
	/// Unused.
	Reserved0,
	/// Not visible to the caller (private, friends only, ...).
	Private,
	/// Unused.
	Reserved2,
	/// Public.
	Public,
}
impl TryFrom<u8> for CommunityVisibility {
	type Error = UnknownStateError;

	fn try_from(value: u8) -> Result<Self, Self::Error> {
		Ok(match value {
			0 => CommunityVisibility::Reserved0,
			1 => CommunityVisibility::Private,
			2 => CommunityVisibility::Reserved2,
			3 => CommunityVisibility::Public,
			_ => return Err(UnknownStateError { field: "communityvisibilitystate", value }),
		})
	}
}
impl From<CommunityVisibility> for u8 {
	fn from(value: CommunityVisibility) -> Self {
		value as u8
	}
}

/// Integer state outside the documented range.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Unknown {field} value {value}.")]
pub struct UnknownStateError {
	field: &'static str,
	value: u8,
}

/// Public profile of the authenticated Steam user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
	/// 64-bit Steam id.
	#[serde(rename = "steamid")]
	pub steam_id: SteamId,
	/// Display name.
	#[serde(rename = "personaname")]
	pub persona_name: String,
	/// Community profile URL.
	#[serde(rename = "profileurl")]
	pub profile_url: String,
	/// 32x32 avatar.
	pub avatar: String,
	/// 64x64 avatar.
	#[serde(rename = "avatarmedium")]
	pub avatar_medium: String,
	/// 184x184 avatar.
	#[serde(rename = "avatarfull")]
	pub avatar_full: String,
	/// Online state.
	#[serde(rename = "personastate")]
	pub persona_state: PersonaState,
	/// Visibility of the profile to the API key's owner.
	#[serde(rename = "communityvisibilitystate")]
	pub community_visibility: CommunityVisibility,
	/// Whether the user has set up a community profile.
	#[serde(rename = "profilestate", default, with = "flag")]
	pub profile_configured: bool,
	/// Last time the user was online.
	#[serde(rename = "lastlogoff", with = "time::serde::timestamp")]
	pub last_logoff: OffsetDateTime,
	/// Whether the profile allows public comments.
	#[serde(rename = "commentpermission", default, with = "flag")]
	pub comment_permission: bool,
	/// Real name, if public.
	#[serde(rename = "realname", default, skip_serializing_if = "Option::is_none")]
	pub real_name: Option<String>,
	/// Primary group id, if public.
	#[serde(rename = "primaryclanid", default, skip_serializing_if = "Option::is_none")]
	pub primary_clan_id: Option<String>,
	/// Account creation time, if public.
	#[serde(
		rename = "timecreated",
		default,
		with = "time::serde::timestamp::option",
		skip_serializing_if = "Option::is_none"
	)]
	pub time_created: Option<OffsetDateTime>,
	/// App id of the game being played.
	#[serde(rename = "gameid", default, skip_serializing_if = "Option::is_none")]
	pub game_id: Option<String>,
	/// Server address of the game being played.
	#[serde(rename = "gameserverip", default, skip_serializing_if = "Option::is_none")]
	pub game_server_ip: Option<String>,
	/// Name of the game being played.
	#[serde(rename = "gameextrainfo", default, skip_serializing_if = "Option::is_none")]
	pub game_extra_info: Option<String>,
	/// Legacy city id.
	#[serde(rename = "cityid", default, skip_serializing_if = "Option::is_none")]
	pub city_id: Option<u64>,
	/// ISO 3166 country code.
	#[serde(rename = "loccountrycode", default, skip_serializing_if = "Option::is_none")]
	pub country_code: Option<String>,
	/// Region code within the country.
	#[serde(rename = "locstatecode", default, skip_serializing_if = "Option::is_none")]
	pub state_code: Option<String>,
	/// Internal city id.
	#[serde(rename = "loccityid", default, skip_serializing_if = "Option::is_none")]
	pub city: Option<u64>,
}
impl UserProfile {
	/// Whether the user is currently in a game.
	pub fn is_in_game(&self) -> bool {
		self.game_id.is_some()
	}
}

/// Envelope of a `GetPlayerSummaries` response.
#[derive(Debug, Deserialize)]
pub(crate) struct PlayerSummaries {
	pub(crate) response: PlayerList,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PlayerList {
	#[serde(default)]
	pub(crate) players: Vec<UserProfile>,
}

/// Steam encodes booleans as `0`/`1`; older payloads sometimes use JSON booleans.
mod flag {
	// crates.io
	use serde::{Deserializer, Serializer, de::Error as _};
	// self
	use crate::_prelude::*;

	#[derive(Deserialize)]
	#[serde(untagged)]
	enum Wire {
		Int(u8),
		Bool(bool),
	}

	pub(super) fn serialize<S>(value: &bool, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_u8(u8::from(*value))
	}

	pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<bool, D::Error>
	where
		D: Deserializer<'de>,
	{
		match Wire::deserialize(deserializer)? {
			Wire::Int(0) => Ok(false),
			Wire::Int(1) => Ok(true),
			Wire::Int(other) => Err(D::Error::custom(format!("expected 0 or 1, got {other}"))),
			Wire::Bool(value) => Ok(value),
		}
	}
}
