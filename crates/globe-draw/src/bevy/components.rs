//! ECS Components for draggers and drawing sessions.

use bevy::prelude::*;

use crate::config::DragAxisMode;

/// What a dragger's movement writes back to its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragAction {
    /// Overwrite the owner's vertex at `linked_index`.
    SetVertex,
    /// Overwrite the base vertex, then re-anchor the height draggers.
    ExtrudedBaseVertex,
    /// Take the dragger's height as the owner's extrusion height.
    ExtrudedHeight,
    /// Move the ellipse center, carrying the linked radius dragger along.
    EllipseCenter,
    /// Set both semi-axes to the distance from the center.
    EllipseRadius,
}

/// A draggable handle. Its position is the entity's `GlobePosition`.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Dragger {
    pub axis_mode: DragAxisMode,
    pub on_drag: Option<DragAction>,
    /// Index into the owner's vertex sequence.
    pub linked_index: Option<usize>,
    /// Non-owning link to a dependent dragger.
    pub linked_dragger: Option<Entity>,
    /// Entity whose geometry this dragger edits.
    pub owner: Option<Entity>,
    pub icon: String,
    /// Marker scale, raised while grabbed.
    pub scale: f32,
}

/// Marks an entity whose vertex sequence is being drawn by clicking.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrawingSession {
    /// The last vertex is a rubber-band preview under the cursor.
    pub last_point_temporary: bool,
}
