//! Writes dragger movement back into the edited geometry.

use bevy::math::DVec3;
use bevy::prelude::*;

use super::GeometryEditor;
use super::extruded::height_anchor;
use crate::bevy::components::{DragAction, Dragger};
use crate::bevy::events::DraggerMoved;
use crate::bevy::resources::Globe;
use crate::ellipsoid::Ellipsoid;
use crate::shape::{GlobePosition, GlobeShape};

/// System applying each `DraggerMoved` to the dragger's owner.
pub fn apply_drag_bindings(
    mut moved: MessageReader<DraggerMoved>,
    globe: Res<Globe>,
    mut draggers: Query<(&Dragger, &mut GlobePosition)>,
    mut owners: Query<
        (&mut GlobeShape, Option<&mut GlobePosition>, Option<&GeometryEditor>),
        Without<Dragger>,
    >,
) {
    for event in moved.read() {
        let Ok((dragger, _)) = draggers.get(event.dragger) else {
            continue;
        };
        let (Some(action), Some(owner)) = (dragger.on_drag, dragger.owner) else {
            continue;
        };
        let linked_index = dragger.linked_index;
        let linked_dragger = dragger.linked_dragger;

        let Ok((mut shape, center, editor)) = owners.get_mut(owner) else {
            tracing::warn!(
                "[editor] dragger {} moved but its owner {} has no geometry",
                event.dragger,
                owner
            );
            continue;
        };

        match action {
            DragAction::SetVertex => {
                set_vertex(&mut shape, linked_index, event.position);
            }
            DragAction::ExtrudedBaseVertex => {
                set_vertex(&mut shape, linked_index, event.position);
                if let Some(editor) = editor {
                    reanchor_height_draggers(&globe.0, &shape, editor, &mut draggers);
                }
            }
            DragAction::ExtrudedHeight => {
                if let Some(cartographic) = globe.0.cartesian_to_cartographic(event.position) {
                    if let GlobeShape::Polygon {
                        extruded_height, ..
                    } = &mut *shape
                    {
                        *extruded_height = Some(cartographic.height);
                    }
                }
                if let Some(editor) = editor {
                    reanchor_height_draggers(&globe.0, &shape, editor, &mut draggers);
                }
            }
            DragAction::EllipseCenter => {
                let Some(mut center) = center else {
                    tracing::warn!("[editor] ellipse {} has no center", owner);
                    continue;
                };
                let delta = event.position - center.0;
                center.0 = event.position;
                if let Some(Ok((_, mut radius))) = linked_dragger.map(|e| draggers.get_mut(e)) {
                    radius.0 += delta;
                }
            }
            DragAction::EllipseRadius => {
                let Some(center) = center else {
                    tracing::warn!("[editor] ellipse {} has no center", owner);
                    continue;
                };
                let radius = center.0.distance(event.position);
                if let GlobeShape::Ellipse {
                    semi_major_axis,
                    semi_minor_axis,
                    ..
                } = &mut *shape
                {
                    *semi_major_axis = radius;
                    *semi_minor_axis = radius;
                }
            }
        }
    }
}

/// Overwrites one vertex in place. Out-of-range indices are ignored.
fn set_vertex(shape: &mut GlobeShape, index: Option<usize>, position: DVec3) {
    let slot = index.and_then(|index| {
        shape
            .positions_mut()
            .and_then(|positions| positions.values.get_mut(index))
    });
    if let Some(slot) = slot {
        *slot = position;
    }
}

fn reanchor_height_draggers(
    ellipsoid: &Ellipsoid,
    shape: &GlobeShape,
    editor: &GeometryEditor,
    draggers: &mut Query<(&Dragger, &mut GlobePosition)>,
) {
    let (Some(base), Some(extruded_height)) = (shape.positions(), shape.extruded_height()) else {
        return;
    };
    for (vertex, handle) in base.values.iter().zip(editor.height_draggers()) {
        if let Ok((_, mut position)) = draggers.get_mut(*handle) {
            position.0 = height_anchor(ellipsoid, *vertex, extruded_height);
        }
    }
}
