//! Core type definitions for the player state

/// Identifier of a Spotify playback device, as reported by the Web API.
pub type DeviceId = String;

/// The streaming service a set of credentials belongs to.
///
/// Only Spotify exists today; the enum keeps the reducer exhaustive if
/// another service is ever wired in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MusicService {
    #[default]
    Spotify,
}

impl std::fmt::Display for MusicService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MusicService::Spotify => write!(f, "spotify"),
        }
    }
}

/// Metadata about the currently playing track
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Track {
    pub title: String,
    pub artist: String,
    pub album: String,
}

/// Information about a Spotify playback device.
///
/// The list is replaced wholesale on every refresh; entries are never
/// partially updated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Device {
    pub id: DeviceId,
    pub name: String,
    pub kind: String,
    pub is_active: bool,
    pub volume_percent: Option<u8>,
}

/// OAuth tokens for the Web API. Replaced wholesale on refresh, never merged.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Credentials {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Known user preference names
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Preference {
    AlwaysOnTop,
}

/// Current values for all preferences
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Preferences {
    pub always_on_top: bool,
}

impl Preferences {
    pub fn get(&self, preference: Preference) -> bool {
        match preference {
            Preference::AlwaysOnTop => self.always_on_top,
        }
    }

    pub fn set(&mut self, preference: Preference, value: bool) {
        match preference {
            Preference::AlwaysOnTop => self.always_on_top = value,
        }
    }
}

/// Complete player state owned by the store.
///
/// Mutated only through dispatched [`Action`](super::Action) values; the
/// reducer is the single writer.
#[derive(Clone, Debug, Default)]
pub struct PlayerState {
    pub credentials: Credentials,
    pub music_service: MusicService,
    pub last_message: String,
    pub current_track: Track,
    pub devices: Vec<Device>,
    pub last_active_device: Option<DeviceId>,
    pub preferences: Preferences,
    pub playing: bool,
}
