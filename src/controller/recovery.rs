//! Classified error handling and token refresh
//!
//! Every wrapper failure funnels in here; none propagate further up. The
//! match is exhaustive over the error kinds, so a new kind cannot fall into a
//! silent default.

use crate::api::ApiError;
use crate::model::Action;

use super::PlayerController;

impl PlayerController {
    /// React to a classified wrapper error.
    ///
    /// Recovery is one level deep: a rejected token gets exactly one refresh
    /// plus retry, and a failure of the refresh itself is only logged, never
    /// re-classified.
    pub async fn handle_error(&self, error: ApiError) {
        match error {
            ApiError::DeviceUnavailable => {
                tracing::warn!("A device must be selected for playback to continue");
            }
            ApiError::PlaybackFailed { reason } => {
                // Attempt to resume on the last active device
                let last_active = self.store.state().last_active_device;
                if let Some(device_id) = last_active {
                    tracing::info!(%reason, %device_id, "Playback failed, transferring");
                    if let Err(e) = self.transfer_playback(&device_id).await {
                        tracing::warn!(error = %e, "Playback transfer failed");
                    }
                } else {
                    tracing::warn!(%reason, "Playback failed and no device to fall back to");
                }
            }
            ApiError::CredentialExpired { reason } => {
                tracing::info!(%reason, "Access token rejected, refreshing");
                let state = self.store.state();
                match self.api.refresh_token(&state).await {
                    Ok(credentials) => {
                        self.store
                            .dispatch(Action::update_access_token(&credentials, None));
                        // Boxed to break the async cycle with get_current_track
                        Box::pin(self.get_current_track()).await;
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Token refresh failed");
                    }
                }
            }
            ApiError::Unknown(message) => {
                tracing::warn!(%message, "Unhandled API error");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::Ordering;

    use crate::api::ApiError;
    use crate::model::{Action, Credentials};

    use super::super::testing::{RecordingApi, RecordingShell, controller_with};

    #[tokio::test]
    async fn device_unavailable_dispatches_nothing() {
        let api = Arc::new(RecordingApi::default());
        let (controller, store) = controller_with(api.clone(), Arc::new(RecordingShell::default()));
        let before = store.state();

        controller
            .handle_error(ApiError::classify("No active device found, try again"))
            .await;

        let after = store.state();
        assert_eq!(before.last_message, after.last_message);
        assert_eq!(before.playing, after.playing);
        assert!(api.transfers().is_empty());
        assert_eq!(api.refresh_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn playback_failed_transfers_to_last_active_device() {
        let api = Arc::new(RecordingApi::default());
        let (controller, store) = controller_with(api.clone(), Arc::new(RecordingShell::default()));
        store.dispatch(Action::update_last_active_device("dev123".to_string()));

        controller
            .handle_error(ApiError::classify("Playback failed"))
            .await;

        assert_eq!(api.transfers(), vec!["dev123".to_string()]);
    }

    #[tokio::test]
    async fn playback_failed_without_known_device_is_a_noop() {
        let api = Arc::new(RecordingApi::default());
        let (controller, _store) = controller_with(api.clone(), Arc::new(RecordingShell::default()));

        controller
            .handle_error(ApiError::classify("Playback failed"))
            .await;

        assert!(api.transfers().is_empty());
    }

    #[tokio::test]
    async fn rejected_token_refreshes_then_requeries_the_track() {
        let api = Arc::new(RecordingApi::default());
        *api.refresh_result.lock().unwrap() = Some(Ok(Credentials {
            access_token: "fresh".to_string(),
            refresh_token: Some("rt".to_string()),
            expires_at: None,
        }));
        let (controller, store) = controller_with(api.clone(), Arc::new(RecordingShell::default()));

        controller
            .handle_error(ApiError::classify("invalid token"))
            .await;

        assert_eq!(api.refresh_calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.state().credentials.access_token, "fresh");
        assert_eq!(api.track_fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_refresh_is_terminal() {
        let api = Arc::new(RecordingApi::default());
        *api.refresh_result.lock().unwrap() = Some(Err(ApiError::CredentialExpired {
            reason: "refresh token revoked".to_string(),
        }));
        let (controller, store) = controller_with(api.clone(), Arc::new(RecordingShell::default()));

        controller
            .handle_error(ApiError::classify("expired token"))
            .await;

        // No retry loop: one refresh attempt, no track query, token unchanged
        assert_eq!(api.refresh_calls.load(Ordering::SeqCst), 1);
        assert_eq!(api.track_fetches.load(Ordering::SeqCst), 0);
        assert!(store.state().credentials.access_token.is_empty());
    }

    #[tokio::test]
    async fn unknown_errors_are_only_logged() {
        let api = Arc::new(RecordingApi::default());
        let (controller, _store) = controller_with(api.clone(), Arc::new(RecordingShell::default()));

        controller
            .handle_error(ApiError::Unknown("mystery".to_string()))
            .await;

        assert!(api.transfers().is_empty());
        assert_eq!(api.refresh_calls.load(Ordering::SeqCst), 0);
        assert_eq!(api.track_fetches.load(Ordering::SeqCst), 0);
    }
}
