//! Rendering systems for edited geometry and draggers.
//!
//! Uses Bevy's Gizmos API. Marker spheres are sized from the viewer's
//! pixel size so they keep a constant on-screen diameter.

use bevy::math::{DVec3, Isometry3d};
use bevy::prelude::*;

use crate::bevy::components::Dragger;
use crate::bevy::resources::{Globe, GlobeViewer, InputController};
use crate::config::{DragAxisMode, EditorConfig};
use crate::ellipsoid::{BoundingSphere, compute_ellipse_boundary};
use crate::shape::{GlobePosition, GlobeShape};

/// Boundary step for drawn ellipse outlines, in radians.
const OUTLINE_GRANULARITY: f64 = 0.05;

/// Gizmo configuration resource for shape and marker rendering.
#[derive(Resource)]
pub struct ShapeGizmoConfig {
    pub outline_color: Color,
    pub extrusion_color: Color,
    pub marker_color: Color,
    pub height_marker_color: Color,
    pub grabbed_color: Color,
}

impl Default for ShapeGizmoConfig {
    fn default() -> Self {
        Self {
            outline_color: Color::srgb(0.9, 0.9, 0.9),
            extrusion_color: Color::srgba(0.2, 0.6, 0.9, 0.6),
            marker_color: Color::srgb(0.9, 0.9, 0.9),
            height_marker_color: Color::srgb(0.3, 0.5, 0.9),
            grabbed_color: Color::srgba(1.0, 1.0, 0.2, 0.9),
        }
    }
}

fn to_render(point: DVec3) -> Vec3 {
    point.as_vec3()
}

/// Draws outlines of every shape, including the top ring of extruded polygons.
pub fn render_shapes(
    mut gizmos: Gizmos,
    gizmo_config: Res<ShapeGizmoConfig>,
    globe: Res<Globe>,
    shapes: Query<(&GlobeShape, Option<&GlobePosition>)>,
) {
    for (shape, position) in &shapes {
        match shape {
            GlobeShape::Polyline { positions } | GlobeShape::Corridor { positions, .. } => {
                gizmos.linestrip(
                    positions.values.iter().copied().map(to_render),
                    gizmo_config.outline_color,
                );
            }
            GlobeShape::Polygon {
                hierarchy,
                extruded_height,
            } => {
                let ring = closed_ring(&hierarchy.values);
                gizmos.linestrip(ring.iter().copied().map(to_render), gizmo_config.outline_color);

                if let Some(height) = extruded_height {
                    let top: Vec<DVec3> = ring
                        .iter()
                        .map(|base| globe.0.raise(*base, *height).unwrap_or(*base))
                        .collect();
                    gizmos.linestrip(
                        top.iter().copied().map(to_render),
                        gizmo_config.extrusion_color,
                    );
                    for (base, raised) in hierarchy.values.iter().zip(&top) {
                        gizmos.line(
                            to_render(*base),
                            to_render(*raised),
                            gizmo_config.extrusion_color,
                        );
                    }
                }
            }
            GlobeShape::Ellipse {
                semi_major_axis,
                semi_minor_axis,
                rotation,
            } => {
                let Some(center) = position else {
                    continue;
                };
                let boundary = compute_ellipse_boundary(
                    center.0,
                    *semi_major_axis,
                    *semi_minor_axis,
                    *rotation,
                    OUTLINE_GRANULARITY,
                );
                gizmos.linestrip(
                    closed_ring(&boundary).into_iter().map(to_render),
                    gizmo_config.outline_color,
                );
            }
        }
    }
}

fn closed_ring(points: &[DVec3]) -> Vec<DVec3> {
    let mut ring = points.to_vec();
    if let Some(first) = points.first() {
        ring.push(*first);
    }
    ring
}

/// Draws a marker sphere for every visible dragger.
#[allow(clippy::cast_possible_truncation)]
pub fn render_draggers(
    mut gizmos: Gizmos,
    gizmo_config: Res<ShapeGizmoConfig>,
    config: Res<EditorConfig>,
    globe: Res<Globe>,
    viewer: Res<GlobeViewer>,
    controller: Res<InputController>,
    draggers: Query<(Entity, &Dragger, &GlobePosition)>,
) {
    let Some(view) = viewer.view() else {
        return;
    };
    let buffer = view.drawing_buffer_size();

    for (entity, dragger, position) in &draggers {
        if !view.is_point_visible(position.0, &globe.0) {
            continue;
        }

        let meters_per_pixel = view.pixel_size(BoundingSphere::new(position.0, 1.0), buffer);
        let radius = meters_per_pixel * f64::from(config.marker_size_px * 0.5 * dragger.scale);

        let color = if controller.grabbed() == Some(entity) {
            gizmo_config.grabbed_color
        } else if dragger.axis_mode == DragAxisMode::Horizontal {
            gizmo_config.marker_color
        } else {
            gizmo_config.height_marker_color
        };

        gizmos.sphere(
            Isometry3d::from_translation(to_render(position.0)),
            radius as f32,
            color,
        );
    }
}
