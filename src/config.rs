//! User configuration loaded from `config.toml`
//!
//! Holds the OAuth application credentials and the saved refresh token, plus
//! startup preferences. Environment variables override the file so the app
//! can run without one in development.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

const CONFIG_DIR: &str = "spotify-companion";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default)]
    pub refresh_token: String,
    #[serde(default)]
    pub always_on_top: bool,
    #[serde(default = "default_poll_secs")]
    pub poll_secs: u64,
}

fn default_poll_secs() -> u64 {
    5
}

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
}

impl AppConfig {
    /// Load the config file, then apply environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = match config_path() {
            Some(path) if path.exists() => {
                let raw = std::fs::read_to_string(&path)
                    .with_context(|| format!("reading {}", path.display()))?;
                toml::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?
            }
            _ => {
                tracing::debug!("No config file found, relying on environment");
                Self {
                    poll_secs: default_poll_secs(),
                    ..Default::default()
                }
            }
        };

        if let Ok(value) = std::env::var("SPOTIFY_CLIENT_ID") {
            config.client_id = value;
        }
        if let Ok(value) = std::env::var("SPOTIFY_CLIENT_SECRET") {
            config.client_secret = value;
        }
        if let Ok(value) = std::env::var("SPOTIFY_REFRESH_TOKEN") {
            config.refresh_token = value;
        }

        if config.client_id.is_empty() || config.refresh_token.is_empty() {
            anyhow::bail!(
                "client_id and refresh_token must be set in {} or the environment",
                config_path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| CONFIG_FILE.to_string())
            );
        }

        Ok(config)
    }
}
