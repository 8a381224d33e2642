//! Keeps the `GlobeViewer` in step with the primary 3D camera.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::bevy::resources::GlobeViewer;
use crate::view::PerspectiveView;

/// Minimum near plane, in metres, for the f64 view.
const MIN_NEAR: f64 = 0.1;

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn sync_perspective_view(
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&GlobalTransform, &Projection), With<Camera3d>>,
    mut viewer: ResMut<GlobeViewer>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let Ok((transform, projection)) = cameras.single() else {
        return;
    };
    let Projection::Perspective(perspective) = projection else {
        return;
    };

    // Logical pixels, matching `Window::cursor_position`.
    let viewport = UVec2::new(window.width() as u32, window.height() as u32);

    viewer.set(PerspectiveView {
        position: transform.translation().as_dvec3(),
        direction: transform.forward().as_dvec3(),
        up: transform.up().as_dvec3(),
        fovy: f64::from(perspective.fov),
        near: f64::from(perspective.near).max(MIN_NEAR),
        viewport,
    });
}
