//! Store holding the player state and applying dispatched actions
//!
//! The reducer is the single writer; every dispatch runs under the write lock,
//! so individual dispatches are atomic. Coordinators receive the store as an
//! explicit capability, never through a global.

use std::sync::RwLock;

use super::actions::Action;
use super::types::PlayerState;

pub struct Store {
    state: RwLock<PlayerState>,
}

impl Store {
    pub fn new(initial: PlayerState) -> Self {
        Self {
            state: RwLock::new(initial),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> PlayerState {
        self.state.read().expect("state lock poisoned").clone()
    }

    /// Apply one action to the state.
    pub fn dispatch(&self, action: Action) {
        tracing::trace!(?action, "Dispatching action");
        let mut state = self.state.write().expect("state lock poisoned");
        reduce(&mut state, action);
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(PlayerState::default())
    }
}

fn reduce(state: &mut PlayerState, action: Action) {
    match action {
        Action::SetCredentials {
            credentials,
            music_service,
        } => {
            state.credentials = credentials;
            state.music_service = music_service;
        }
        Action::UpdateAccessToken {
            access_token,
            music_service,
        } => {
            state.credentials.access_token = access_token;
            state.music_service = music_service;
        }
        Action::UpdateCurrentTrack { track } => {
            state.current_track = track;
        }
        Action::UpdateLastMessage { message } => {
            state.last_message = message;
        }
        Action::UpdatePreference { preference, value } => {
            state.preferences.set(preference, value);
        }
        Action::UpdateDevicesList { devices } => {
            // Replace, never merge
            state.devices = devices;
        }
        Action::UpdateLastActiveDevice { device_id } => {
            state.last_active_device = Some(device_id);
        }
        Action::SetPlayingStatus { playing } => {
            state.playing = playing;
        }
        Action::Logout => {
            // Preferences are host-level settings and survive a logout
            let preferences = state.preferences;
            *state = PlayerState {
                preferences,
                ..Default::default()
            };
        }
    }
}
