mod api;
mod config;
mod controller;
mod logging;
mod model;
mod shell;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use api::{PlayerApi, SpotifyWebApi};
use config::AppConfig;
use controller::PlayerController;
use model::{Action, Credentials, PlayerState, Store};
use shell::StdoutShellBridge;

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = logging::init_logging() {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    tracing::info!("=== Spotify Companion starting ===");

    let config = AppConfig::load()?;

    let api = Arc::new(SpotifyWebApi::new(
        config.client_id.clone(),
        config.client_secret.clone(),
    ));

    let store = Arc::new(Store::new(PlayerState {
        credentials: Credentials {
            refresh_token: Some(config.refresh_token.clone()),
            ..Default::default()
        },
        ..Default::default()
    }));

    // Exchange the saved refresh token for a live session up front
    match api.refresh_token(&store.state()).await {
        Ok(credentials) => {
            tracing::info!("Initial token exchange succeeded");
            store.dispatch(Action::set_credentials(credentials, None));
        }
        Err(e) => {
            tracing::error!(error = %e, "Initial token exchange failed");
            return Err(anyhow::anyhow!("could not authorize with Spotify"));
        }
    }

    let shell = Arc::new(StdoutShellBridge::new());
    let controller = PlayerController::new(store, api, shell);

    if config.always_on_top {
        controller.swap_always_on_top(Some(true));
    }

    run_poll_loop(controller, Duration::from_secs(config.poll_secs)).await;

    tracing::info!("Spotify Companion shutting down");
    Ok(())
}

/// Keep the stored track fresh until the process is told to stop.
async fn run_poll_loop(controller: PlayerController, poll_interval: Duration) {
    let mut ticker = tokio::time::interval(poll_interval);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                controller.get_current_track().await;
            }
            result = tokio::signal::ctrl_c() => {
                if let Err(e) = result {
                    tracing::error!(error = %e, "Signal handler failed");
                }
                break;
            }
        }
    }
}
