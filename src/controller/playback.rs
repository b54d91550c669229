//! Track, device, and playback-command coordinators

use crate::api::{ApiError, PlaybackCommand};
use crate::model::{Action, DeviceId, Track};

use super::{DEBOUNCE_TIME, PlayerController};

fn track_message(track: &Track) -> String {
    format!(
        "You're listening to {}, by {}, from the album {}",
        track.title, track.artist, track.album
    )
}

impl PlayerController {
    /// Store a freshly fetched track.
    ///
    /// The track update itself is unconditional. The notification and the
    /// device-list refresh fire only when the rendered message differs from
    /// the last one, so repeats of the same track are quiet.
    pub async fn update_current_track(&self, track: Track) {
        let last_message = self.store.state().last_message;
        let new_message = track_message(&track);

        self.store.dispatch(Action::update_current_track(track));

        if new_message != last_message {
            tracing::debug!(message = %new_message, "Track changed");
            self.store.dispatch(Action::update_last_message(new_message));
            self.api.trigger_notification(&self.store.state());
            self.obtain_devices().await;
        }
    }

    /// Refresh the device list, replacing the stored one wholesale.
    ///
    /// When some device is flagged active, it becomes the last active device;
    /// when none is, the previous value is deliberately left in place.
    pub async fn obtain_devices(&self) {
        let state = self.store.state();
        match self.api.obtain_devices(&state).await {
            Ok(devices) => {
                let active_id = devices.iter().find(|d| d.is_active).map(|d| d.id.clone());
                tracing::debug!(count = devices.len(), active = ?active_id, "Device list refreshed");

                self.store.dispatch(Action::update_devices_list(devices));
                if let Some(device_id) = active_id {
                    self.store
                        .dispatch(Action::update_last_active_device(device_id));
                }
            }
            Err(e) => self.handle_error(e).await,
        }
    }

    /// Fetch the currently playing track and store it.
    pub async fn get_current_track(&self) {
        let state = self.store.state();
        match self.api.get_current_track(&state).await {
            Ok(track) => self.update_current_track(track).await,
            Err(e) => self.handle_error(e).await,
        }
    }

    /// Issue a playback command against the active device.
    ///
    /// Play and pause flip the playing flag optimistically before the network
    /// call goes out; the flag is never rolled back here, even when the call
    /// fails. A response other than 204 means no device accepted the command,
    /// so playback is moved to the last active device and the body is handed
    /// to the error classifier.
    pub async fn player_action(&self, command: PlaybackCommand) {
        match command {
            PlaybackCommand::Play => self.store.dispatch(Action::set_playing_status(true)),
            PlaybackCommand::Pause => self.store.dispatch(Action::set_playing_status(false)),
            PlaybackCommand::Next | PlaybackCommand::Previous => {}
        }

        let state = self.store.state();
        match self.api.command(&state, command).await {
            Ok(response) if response.status == 204 => {
                // The service's state lags the HTTP response; querying right
                // away would read stale data. The timer is fire-and-forget
                // and is not cancelled by later commands.
                let controller = self.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(DEBOUNCE_TIME).await;
                    controller.get_current_track().await;
                });
            }
            Ok(response) => {
                tracing::debug!(status = response.status, %command, "Command not accepted");
                if let Some(device_id) = state.last_active_device {
                    if let Err(e) = self.transfer_playback(&device_id).await {
                        tracing::warn!(error = %e, "Playback transfer failed");
                    }
                } else {
                    tracing::warn!("No last active device to transfer playback to");
                }
                self.handle_error(ApiError::classify(response.text())).await;
            }
            Err(e) => self.handle_error(e).await,
        }
    }

    pub async fn next(&self) {
        self.player_action(PlaybackCommand::Next).await;
    }

    pub async fn previous(&self) {
        self.player_action(PlaybackCommand::Previous).await;
    }

    pub async fn play(&self) {
        self.player_action(PlaybackCommand::Play).await;
    }

    pub async fn pause(&self) {
        self.player_action(PlaybackCommand::Pause).await;
    }

    /// Move playback to the given device. The result is returned so callers
    /// can chain on it.
    pub async fn transfer_playback(&self, device_id: &DeviceId) -> Result<(), ApiError> {
        let state = self.store.state();
        self.api.transfer_playback(&state, device_id).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::Ordering;

    use crate::api::{ApiError, CommandResponse, PlaybackCommand};
    use crate::model::Track;

    use super::super::testing::{RecordingApi, RecordingShell, controller_with, device};

    fn track(title: &str) -> Track {
        Track {
            title: title.to_string(),
            artist: "Boards of Canada".to_string(),
            album: "Geogaddi".to_string(),
        }
    }

    #[tokio::test]
    async fn repeated_track_updates_notify_only_once() {
        let api = Arc::new(RecordingApi::default());
        let (controller, store) = controller_with(api.clone(), Arc::new(RecordingShell::default()));

        controller.update_current_track(track("Music Is Math")).await;
        controller.update_current_track(track("Music Is Math")).await;

        assert_eq!(api.notifications.load(Ordering::SeqCst), 1);
        assert_eq!(api.device_fetches.load(Ordering::SeqCst), 1);
        assert_eq!(store.state().current_track.title, "Music Is Math");
    }

    #[tokio::test]
    async fn track_update_always_stores_the_track() {
        let api = Arc::new(RecordingApi::default());
        let (controller, store) = controller_with(api.clone(), Arc::new(RecordingShell::default()));

        controller
            .update_current_track(track("The Beach at Redpoint"))
            .await;

        let state = store.state();
        assert_eq!(state.current_track.title, "The Beach at Redpoint");
        assert_eq!(
            state.last_message,
            "You're listening to The Beach at Redpoint, by Boards of Canada, \
             from the album Geogaddi"
        );
    }

    #[tokio::test]
    async fn active_device_becomes_last_active() {
        let api = Arc::new(RecordingApi::with_devices(vec![
            device("a", false),
            device("b", true),
            device("c", false),
        ]));
        let (controller, store) = controller_with(api, Arc::new(RecordingShell::default()));

        controller.obtain_devices().await;

        let state = store.state();
        assert_eq!(state.devices.len(), 3);
        assert_eq!(state.last_active_device.as_deref(), Some("b"));
    }

    #[tokio::test]
    async fn no_active_device_leaves_last_active_untouched() {
        let api = Arc::new(RecordingApi::with_devices(vec![device("a", false)]));
        let (controller, store) = controller_with(api, Arc::new(RecordingShell::default()));
        store.dispatch(crate::model::Action::update_last_active_device(
            "earlier".to_string(),
        ));

        controller.obtain_devices().await;

        assert_eq!(store.state().last_active_device.as_deref(), Some("earlier"));
    }

    #[tokio::test]
    async fn play_flips_the_flag_before_the_call_resolves() {
        let api = Arc::new(RecordingApi::default());
        let (controller, store) = controller_with(api.clone(), Arc::new(RecordingShell::default()));

        controller.player_action(PlaybackCommand::Play).await;

        let commands = api.commands.lock().unwrap().clone();
        assert_eq!(commands, vec![(PlaybackCommand::Play, true)]);
        assert!(store.state().playing);
    }

    #[tokio::test]
    async fn next_does_not_touch_the_playing_flag() {
        let api = Arc::new(RecordingApi::default());
        let (controller, store) = controller_with(api.clone(), Arc::new(RecordingShell::default()));

        controller.next().await;

        let commands = api.commands.lock().unwrap().clone();
        assert_eq!(commands, vec![(PlaybackCommand::Next, false)]);
        assert!(!store.state().playing);
    }

    #[tokio::test(start_paused = true)]
    async fn accepted_command_schedules_a_debounced_refresh() {
        let api = Arc::new(RecordingApi::default());
        let (controller, _store) = controller_with(api.clone(), Arc::new(RecordingShell::default()));

        controller.player_action(PlaybackCommand::Pause).await;

        // Nothing before the debounce window has elapsed
        tokio::task::yield_now().await;
        assert_eq!(api.track_fetches.load(Ordering::SeqCst), 0);

        tokio::time::sleep(std::time::Duration::from_millis(150)).await;
        assert_eq!(api.track_fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_commands_each_keep_their_refresh_timer() {
        let api = Arc::new(RecordingApi::default());
        let (controller, _store) = controller_with(api.clone(), Arc::new(RecordingShell::default()));

        // Timers are fire-and-forget: a second command does not cancel the
        // first one's refresh, so both land after the window.
        controller.player_action(PlaybackCommand::Play).await;
        controller.player_action(PlaybackCommand::Pause).await;

        tokio::task::yield_now().await;
        assert_eq!(api.track_fetches.load(Ordering::SeqCst), 0);

        tokio::time::sleep(std::time::Duration::from_millis(150)).await;
        assert_eq!(api.track_fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn rejected_command_transfers_to_last_active_device() {
        let api = Arc::new(RecordingApi::default());
        *api.command_result.lock().unwrap() =
            Some(Ok(CommandResponse::new(404, "No active device found")));
        let (controller, store) = controller_with(api.clone(), Arc::new(RecordingShell::default()));
        store.dispatch(crate::model::Action::update_last_active_device(
            "dev42".to_string(),
        ));

        controller.player_action(PlaybackCommand::Play).await;

        assert_eq!(api.transfers(), vec!["dev42".to_string()]);
        // Optimistic update stays even though the command was rejected
        assert!(store.state().playing);
    }

    #[tokio::test]
    async fn wrapper_errors_are_classified_not_propagated() {
        let api = Arc::new(RecordingApi::default());
        *api.command_result.lock().unwrap() = Some(Err(ApiError::Unknown("boom".to_string())));
        let (controller, _store) = controller_with(api.clone(), Arc::new(RecordingShell::default()));

        // Must not panic and must not retry anything
        controller.player_action(PlaybackCommand::Next).await;
        assert!(api.transfers().is_empty());
        assert_eq!(api.refresh_calls.load(Ordering::SeqCst), 0);
    }
}
