//! Ellipse: a center dragger and a radius dragger linked to each other.

use bevy::math::DVec3;
use bevy::prelude::*;

use super::{DraggerOptions, GeometryEditor, create_dragger};
use crate::bevy::components::{DragAction, Dragger};
use crate::config::DragAxisMode;
use crate::ellipsoid::compute_ellipse_boundary;

#[allow(clippy::too_many_arguments)]
pub(super) fn spawn_ellipse_draggers(
    world: &mut World,
    owner: Entity,
    center: DVec3,
    semi_major_axis: f64,
    semi_minor_axis: f64,
    rotation: f64,
    granularity: f64,
) -> GeometryEditor {
    let center_dragger = create_dragger(
        world,
        DraggerOptions::at(center)
            .axis_mode(DragAxisMode::Horizontal)
            .on_drag(DragAction::EllipseCenter)
            .owner(owner),
    );

    let boundary = compute_ellipse_boundary(
        center,
        semi_major_axis,
        semi_minor_axis,
        rotation,
        granularity,
    );
    let radius_position = boundary.first().copied().unwrap_or(center);

    let radius_dragger = create_dragger(
        world,
        DraggerOptions::at(radius_position)
            .axis_mode(DragAxisMode::Horizontal)
            .on_drag(DragAction::EllipseRadius)
            .linked_dragger(center_dragger)
            .owner(owner),
    );

    if let Some(mut dragger) = world.get_mut::<Dragger>(center_dragger) {
        dragger.linked_dragger = Some(radius_dragger);
    }

    GeometryEditor::Ellipse {
        center: center_dragger,
        radius: radius_dragger,
    }
}
