//! Model module - Player state, actions, and the store
//!
//! This module contains the data structures shared by the coordinators and
//! the reducer. It is organized into submodules by responsibility:
//!
//! - `types`: Core type definitions (state, devices, credentials, preferences)
//! - `actions`: The action vocabulary and its pure builders
//! - `store`: The store applying dispatched actions through the reducer

mod actions;
mod store;
mod types;

pub use actions::Action;
pub use store::Store;
pub use types::{
    Credentials, Device, DeviceId, MusicService, PlayerState, Preference, Preferences, Track,
};
