//! Spotify Web API adapter
//!
//! Raw-HTTP implementation of [`PlayerApi`](super::PlayerApi). The playback
//! command contract needs the untouched status code (204 means the command
//! reached an active device), so this talks to the player endpoints directly
//! with `reqwest` instead of going through a higher-level client.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::model::{Credentials, Device, DeviceId, PlayerState, Track};

use super::{ApiError, CommandResponse, PlaybackCommand, PlayerApi};

const API_BASE: &str = "https://api.spotify.com/v1";
const ACCOUNTS_BASE: &str = "https://accounts.spotify.com";

pub struct SpotifyWebApi {
    http: reqwest::Client,
    client_id: String,
    client_secret: String,
    api_base: String,
    accounts_base: String,
}

impl SpotifyWebApi {
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            client_id,
            client_secret,
            api_base: API_BASE.to_string(),
            accounts_base: ACCOUNTS_BASE.to_string(),
        }
    }

    /// Turn a non-success response into a classified [`ApiError`].
    ///
    /// Spotify wraps failures as `{"error": {"status": ..., "message": ...}}`;
    /// the message is what distinguishes "no active device" from the rest, so
    /// classification happens here, at the point the failure is raised.
    async fn error_from_response(&self, response: reqwest::Response) -> ApiError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);

        if status == StatusCode::UNAUTHORIZED {
            return ApiError::CredentialExpired {
                reason: if message.is_empty() {
                    status.to_string()
                } else {
                    message
                },
            };
        }

        tracing::debug!(%status, %message, "API error response");
        ApiError::classify(&message)
    }
}

#[async_trait]
impl PlayerApi for SpotifyWebApi {
    async fn obtain_devices(&self, state: &PlayerState) -> Result<Vec<Device>, ApiError> {
        tracing::debug!("API: obtain devices");
        let response = self
            .http
            .get(format!("{}/me/player/devices", self.api_base))
            .bearer_auth(&state.credentials.access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(self.error_from_response(response).await);
        }

        let payload: DevicesPayload = response.json().await?;
        let devices = payload
            .devices
            .into_iter()
            // Restricted devices report no id and cannot receive commands
            .filter_map(|d| {
                Some(Device {
                    id: d.id?,
                    name: d.name,
                    kind: d.kind,
                    is_active: d.is_active,
                    volume_percent: d.volume_percent,
                })
            })
            .collect();
        Ok(devices)
    }

    async fn get_current_track(&self, state: &PlayerState) -> Result<Track, ApiError> {
        tracing::debug!("API: currently playing");
        let response = self
            .http
            .get(format!("{}/me/player/currently-playing", self.api_base))
            .bearer_auth(&state.credentials.access_token)
            .send()
            .await?;

        if response.status() == StatusCode::NO_CONTENT {
            return Err(ApiError::Unknown("Nothing is currently playing".to_string()));
        }
        if !response.status().is_success() {
            return Err(self.error_from_response(response).await);
        }

        let payload: CurrentlyPlayingPayload = response.json().await?;
        let item = payload
            .item
            .ok_or_else(|| ApiError::Unknown("Nothing is currently playing".to_string()))?;

        Ok(Track {
            title: item.name,
            artist: item
                .artists
                .first()
                .map(|a| a.name.clone())
                .unwrap_or_default(),
            album: item.album.name,
        })
    }

    async fn refresh_token(&self, state: &PlayerState) -> Result<Credentials, ApiError> {
        let refresh_token = state
            .credentials
            .refresh_token
            .clone()
            .ok_or_else(|| ApiError::CredentialExpired {
                reason: "no refresh token available".to_string(),
            })?;

        tracing::info!("API: refreshing access token");
        let response = self
            .http
            .post(format!("{}/api/token", self.accounts_base))
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(self.error_from_response(response).await);
        }

        let payload: TokenPayload = response.json().await?;
        let expires_at = payload
            .expires_in
            .map(|secs| chrono::Utc::now() + chrono::Duration::seconds(secs));

        tracing::info!("Access token refreshed");
        Ok(Credentials {
            access_token: payload.access_token,
            // Spotify only sometimes rotates the refresh token
            refresh_token: payload.refresh_token.or(Some(refresh_token)),
            expires_at,
        })
    }

    fn trigger_notification(&self, state: &PlayerState) {
        // The desktop shell owns the actual toast; from here the message is
        // only surfaced to the log.
        tracing::info!(message = %state.last_message, "Track notification");
    }

    async fn transfer_playback(
        &self,
        state: &PlayerState,
        device_id: &DeviceId,
    ) -> Result<(), ApiError> {
        tracing::debug!(%device_id, "API: transfer playback");
        let response = self
            .http
            .put(format!("{}/me/player", self.api_base))
            .bearer_auth(&state.credentials.access_token)
            .json(&serde_json::json!({ "device_ids": [device_id], "play": true }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(self.error_from_response(response).await);
        }
        Ok(())
    }

    async fn command(
        &self,
        state: &PlayerState,
        command: PlaybackCommand,
    ) -> Result<CommandResponse, ApiError> {
        tracing::debug!(%command, "API: playback command");
        let url = format!("{}/me/player/{}", self.api_base, command);
        let request = match command {
            // Skips are POSTs, play/pause are PUTs
            PlaybackCommand::Next | PlaybackCommand::Previous => self.http.post(url),
            PlaybackCommand::Play | PlaybackCommand::Pause => self.http.put(url),
        };

        let response = request
            .bearer_auth(&state.credentials.access_token)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(self.error_from_response(response).await);
        }

        // Non-204 statuses are not errors at this level; the coordinator
        // inspects the status and decides whether a transfer is needed.
        let body = response.text().await.unwrap_or_default();
        Ok(CommandResponse::new(status.as_u16(), body))
    }
}

// ============================================================================
// Wire formats
// ============================================================================

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

#[derive(Deserialize)]
struct TokenPayload {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
}

#[derive(Deserialize)]
struct DevicesPayload {
    devices: Vec<DevicePayload>,
}

#[derive(Deserialize)]
struct DevicePayload {
    id: Option<String>,
    name: String,
    #[serde(rename = "type")]
    kind: String,
    is_active: bool,
    volume_percent: Option<u8>,
}

#[derive(Deserialize)]
struct CurrentlyPlayingPayload {
    item: Option<ItemPayload>,
}

#[derive(Deserialize)]
struct ItemPayload {
    name: String,
    #[serde(default)]
    artists: Vec<ArtistPayload>,
    album: AlbumPayload,
}

#[derive(Deserialize)]
struct ArtistPayload {
    name: String,
}

#[derive(Deserialize)]
struct AlbumPayload {
    name: String,
}
