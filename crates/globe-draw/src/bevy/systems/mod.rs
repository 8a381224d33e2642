//! Systems for globe editing.
//!
//! Organized by functionality:
//! - command: Command queue processing for hosts outside the ECS
//! - editor: Editing sessions, dragger bindings and pointer input
//! - drawing: Click-to-draw sessions
//! - rendering: Gizmo outlines and dragger markers
//! - state_sync: Sync ECS state to the shared store for UI
//! - view_sync: Viewer sync from the primary camera

pub mod command;
pub mod drawing;
pub mod editor;
pub mod rendering;
pub mod state_sync;
pub mod view_sync;

pub use command::*;
pub use drawing::*;
pub use editor::*;
pub use rendering::*;
pub use state_sync::*;
pub use view_sync::*;
