//! Preference toggles forwarded to the hosting shell

use crate::model::{Action, Preference};

use super::PlayerController;

impl PlayerController {
    /// Toggle (or explicitly set) the always-on-top window preference.
    ///
    /// The shell is told first, one-way with no acknowledgment; the local
    /// preference update follows regardless.
    pub fn swap_always_on_top(&self, value: Option<bool>) {
        let value =
            value.unwrap_or_else(|| !self.store.state().preferences.get(Preference::AlwaysOnTop));

        self.shell.send_always_on_top(value);
        self.store
            .dispatch(Action::update_preference(Preference::AlwaysOnTop, value));
    }

    /// Re-issue the desktop notification for whatever is stored right now.
    pub fn trigger_notification(&self) {
        let state = self.store.state();
        self.api.trigger_notification(&state);
    }
}
