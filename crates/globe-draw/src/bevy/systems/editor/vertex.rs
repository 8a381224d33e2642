//! Per-vertex draggers for polylines, polygons and corridors.

use bevy::math::DVec3;
use bevy::prelude::*;

use super::{DraggerOptions, GeometryEditor, create_dragger};
use crate::bevy::components::DragAction;
use crate::config::DragAxisMode;

pub(super) fn spawn_vertex_draggers(
    world: &mut World,
    owner: Entity,
    positions: &[DVec3],
) -> GeometryEditor {
    let draggers = spawn_indexed(world, owner, positions, DragAction::SetVertex);
    GeometryEditor::Vertices { draggers }
}

/// One horizontal dragger per vertex, `linked_index` set to the vertex index.
pub(super) fn spawn_indexed(
    world: &mut World,
    owner: Entity,
    positions: &[DVec3],
    action: DragAction,
) -> Vec<Entity> {
    positions
        .iter()
        .enumerate()
        .map(|(index, position)| {
            create_dragger(
                world,
                DraggerOptions::at(*position)
                    .axis_mode(DragAxisMode::Horizontal)
                    .on_drag(action)
                    .linked_index(index)
                    .owner(owner),
            )
        })
        .collect()
}
