//! Collaborator surface for the streaming service
//!
//! Coordinators only ever talk to the Web API through the [`PlayerApi`]
//! trait; the concrete `reqwest`-backed adapter lives in [`spotify`]. Errors
//! carry an enumerated kind attached where the failure is raised, so recovery
//! code matches on the kind instead of scraping message strings.

mod spotify;

pub use spotify::SpotifyWebApi;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{Credentials, Device, DeviceId, PlayerState, Track};

/// Failure kinds surfaced by the Web API wrapper.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No playback device is currently selected; the user has to pick one.
    #[error("No active device found")]
    DeviceUnavailable,

    /// A playback command was rejected; playback may resume on another device.
    #[error("Playback failed: {reason}")]
    PlaybackFailed { reason: String },

    /// The access token was rejected as expired or invalid.
    #[error("access token rejected: {reason}")]
    CredentialExpired { reason: String },

    /// Anything the wrapper could not recognize.
    #[error("{0}")]
    Unknown(String),
}

impl ApiError {
    /// Map a Spotify error message onto a kind.
    ///
    /// This is the one place the service's message strings are inspected;
    /// matching is case-insensitive and first-match-wins, in the same
    /// priority order the messages are distinguished by the service.
    pub fn classify(message: &str) -> Self {
        let lowered = message.to_lowercase();
        if lowered.contains("no active device found") {
            ApiError::DeviceUnavailable
        } else if lowered.contains("playback failed") {
            ApiError::PlaybackFailed {
                reason: message.to_string(),
            }
        } else if lowered.contains("token") {
            ApiError::CredentialExpired {
                reason: message.to_string(),
            }
        } else {
            ApiError::Unknown(message.to_string())
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Unknown(err.to_string())
    }
}

/// A playback command addressed at the active device.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackCommand {
    Next,
    Previous,
    Play,
    Pause,
}

impl std::fmt::Display for PlaybackCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PlaybackCommand::Next => "next",
            PlaybackCommand::Previous => "previous",
            PlaybackCommand::Play => "play",
            PlaybackCommand::Pause => "pause",
        };
        write!(f, "{name}")
    }
}

/// Raw outcome of a playback command.
///
/// The service answers 204 No Content when the command reached an active
/// device; any other status comes with an error body worth classifying.
#[derive(Clone, Debug)]
pub struct CommandResponse {
    pub status: u16,
    body: String,
}

impl CommandResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn text(&self) -> &str {
        &self.body
    }
}

/// The Web API wrapper consumed by the coordinators.
#[async_trait]
pub trait PlayerApi: Send + Sync {
    /// List the user's playback devices.
    async fn obtain_devices(&self, state: &PlayerState) -> Result<Vec<Device>, ApiError>;

    /// Fetch the currently playing track.
    async fn get_current_track(&self, state: &PlayerState) -> Result<Track, ApiError>;

    /// Exchange the refresh token for fresh credentials.
    async fn refresh_token(&self, state: &PlayerState) -> Result<Credentials, ApiError>;

    /// Desktop notification side effect for the current track.
    fn trigger_notification(&self, state: &PlayerState);

    /// Move playback to the given device.
    async fn transfer_playback(
        &self,
        state: &PlayerState,
        device_id: &DeviceId,
    ) -> Result<(), ApiError>;

    /// Issue a playback command and return the raw response.
    async fn command(
        &self,
        state: &PlayerState,
        command: PlaybackCommand,
    ) -> Result<CommandResponse, ApiError>;
}
