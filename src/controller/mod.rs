//! Controller module - Async action coordinators
//!
//! Each coordinator performs one call against the Web API wrapper and
//! dispatches follow-up actions into the store. The store, the API wrapper,
//! and the shell bridge are explicit capabilities held by the controller;
//! nothing is reached through globals. It is organized into submodules by
//! responsibility:
//!
//! - `playback`: Track, device, and playback-command coordinators
//! - `recovery`: Classified error handling and token refresh
//! - `preferences`: Preference toggles forwarded to the hosting shell

mod playback;
mod preferences;
mod recovery;

use std::sync::Arc;
use std::time::Duration;

use crate::api::PlayerApi;
use crate::model::Store;
use crate::shell::ShellBridge;

// After a playback command, the service needs a short moment before a
// follow-up query reflects the latest information.
pub(crate) const DEBOUNCE_TIME: Duration = Duration::from_millis(100);

#[derive(Clone)]
pub struct PlayerController {
    pub(crate) store: Arc<Store>,
    pub(crate) api: Arc<dyn PlayerApi>,
    pub(crate) shell: Arc<dyn ShellBridge>,
}

impl PlayerController {
    pub fn new(store: Arc<Store>, api: Arc<dyn PlayerApi>, shell: Arc<dyn ShellBridge>) -> Self {
        Self { store, api, shell }
    }
}
