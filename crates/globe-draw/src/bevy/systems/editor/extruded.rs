//! Extruded polygon: base vertex draggers plus height draggers above them.
//!
//! Height dragger positions are derived from the base vertex and the
//! shared extrusion height; they are recomputed after every base or
//! height drag rather than stored.

use bevy::math::DVec3;
use bevy::prelude::*;

use super::vertex::spawn_indexed;
use super::{DraggerOptions, GeometryEditor, create_dragger};
use crate::bevy::components::DragAction;
use crate::config::DragAxisMode;
use crate::ellipsoid::Ellipsoid;

pub(super) fn spawn_extruded_draggers(
    world: &mut World,
    owner: Entity,
    ellipsoid: &Ellipsoid,
    positions: &[DVec3],
    extruded_height: f64,
) -> GeometryEditor {
    let base = spawn_indexed(world, owner, positions, DragAction::ExtrudedBaseVertex);
    let height = positions
        .iter()
        .enumerate()
        .map(|(index, position)| {
            create_dragger(
                world,
                DraggerOptions::at(height_anchor(ellipsoid, *position, extruded_height))
                    .axis_mode(DragAxisMode::Vertical)
                    .on_drag(DragAction::ExtrudedHeight)
                    .linked_index(index)
                    .owner(owner),
            )
        })
        .collect();

    GeometryEditor::ExtrudedPolygon { base, height }
}

/// `base` raised by `extruded_height` along its geodetic normal.
pub fn height_anchor(ellipsoid: &Ellipsoid, base: DVec3, extruded_height: f64) -> DVec3 {
    ellipsoid.raise(base, extruded_height).unwrap_or(base)
}
