//! Command processing system.
//!
//! Processes commands queued by a host outside the ECS.

use bevy::prelude::*;

use crate::bevy::resources::{EditCommand, EditCommandQueue};
use crate::bevy::systems::drawing::{start_drawing, stop_drawing};
use crate::bevy::systems::editor::{start_editing, stop_editing};

/// Exclusive system draining the `EditCommandQueue`.
///
/// Refused commands are logged and dropped.
pub fn process_edit_commands(world: &mut World) {
    let Some(queue) = world.get_resource::<EditCommandQueue>().cloned() else {
        return;
    };

    for command in queue.drain() {
        let result = match command {
            EditCommand::StartEditing(entity) => start_editing(world, entity),
            EditCommand::StopEditing(entity) => stop_editing(world, entity).map(|_| ()),
            EditCommand::StartDrawing(entity) => start_drawing(world, entity),
            EditCommand::StopDrawing(entity) => stop_drawing(world, entity).map(|_| ()),
        };
        if let Err(err) = result {
            tracing::debug!("[command] {:?} refused: {}", command, err);
        }
    }
}
