//! Bevy integration for globe editing.
//!
//! This module provides the ECS side of the crate: dragger and session
//! components, input and notification messages, shared resources, and
//! the systems that drive editing and drawing sessions.

pub mod components;
pub mod events;
pub mod plugin;
pub mod resources;
pub mod state_store;
pub mod systems;

#[cfg(test)]
pub(crate) mod test_utils;

pub use components::*;
pub use events::*;
pub use plugin::{GlobeDrawHeadlessPlugin, GlobeDrawPlugin};
pub use resources::*;
pub use state_store::{EditorStateStore, EditorStateSummary};
pub use systems::drawing::{is_drawing, start_drawing, stop_drawing};
pub use systems::editor::{
    DraggerOptions, GeometryEditor, Picked, create_dragger, is_editing, pick, start_editing,
    stop_editing,
};
