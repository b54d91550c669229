//! Action vocabulary consumed by the store's reducer
//!
//! Every state change goes through one of these variants. Builders are pure:
//! no I/O, no failure modes, arguments copied into the variant verbatim.

use super::types::{Credentials, Device, DeviceId, MusicService, Preference, Track};

/// A state-change request dispatched to the store.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    SetCredentials {
        credentials: Credentials,
        music_service: MusicService,
    },
    UpdateAccessToken {
        access_token: String,
        music_service: MusicService,
    },
    UpdateCurrentTrack {
        track: Track,
    },
    UpdateLastMessage {
        message: String,
    },
    UpdatePreference {
        preference: Preference,
        value: bool,
    },
    UpdateDevicesList {
        devices: Vec<Device>,
    },
    UpdateLastActiveDevice {
        device_id: DeviceId,
    },
    SetPlayingStatus {
        playing: bool,
    },
    Logout,
}

impl Action {
    /// Store a full set of credentials. The service defaults to Spotify when
    /// none is given.
    pub fn set_credentials(credentials: Credentials, music_service: Option<MusicService>) -> Self {
        Action::SetCredentials {
            credentials,
            music_service: music_service.unwrap_or_default(),
        }
    }

    /// Replace only the access token after a refresh. Takes the refreshed
    /// credentials and keeps just the token, matching what the reducer needs.
    pub fn update_access_token(
        credentials: &Credentials,
        music_service: Option<MusicService>,
    ) -> Self {
        Action::UpdateAccessToken {
            access_token: credentials.access_token.clone(),
            music_service: music_service.unwrap_or_default(),
        }
    }

    pub fn update_last_message(message: impl Into<String>) -> Self {
        Action::UpdateLastMessage {
            message: message.into(),
        }
    }

    pub fn update_last_active_device(device_id: DeviceId) -> Self {
        Action::UpdateLastActiveDevice { device_id }
    }

    pub fn update_current_track(track: Track) -> Self {
        Action::UpdateCurrentTrack { track }
    }

    pub fn update_devices_list(devices: Vec<Device>) -> Self {
        Action::UpdateDevicesList { devices }
    }

    pub fn update_preference(preference: Preference, value: bool) -> Self {
        Action::UpdatePreference { preference, value }
    }

    pub fn set_playing_status(playing: bool) -> Self {
        Action::SetPlayingStatus { playing }
    }

    pub fn logout() -> Self {
        Action::Logout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_credentials_defaults_to_spotify() {
        let creds = Credentials {
            access_token: "abc".to_string(),
            ..Default::default()
        };

        let action = Action::set_credentials(creds.clone(), None);
        match action {
            Action::SetCredentials {
                credentials,
                music_service,
            } => {
                assert_eq!(credentials, creds);
                assert_eq!(music_service, MusicService::Spotify);
            }
            other => panic!("unexpected action: {other:?}"),
        }
    }

    #[test]
    fn update_access_token_keeps_only_the_token() {
        let creds = Credentials {
            access_token: "fresh-token".to_string(),
            refresh_token: Some("refresh".to_string()),
            expires_at: None,
        };

        let action = Action::update_access_token(&creds, None);
        assert_eq!(
            action,
            Action::UpdateAccessToken {
                access_token: "fresh-token".to_string(),
                music_service: MusicService::Spotify,
            }
        );
    }
}
