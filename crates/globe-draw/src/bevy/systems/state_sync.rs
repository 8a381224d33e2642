//! Mirrors editing state into the `EditorStateStore`.

use bevy::prelude::*;

use crate::bevy::components::{DrawingSession, Dragger};
use crate::bevy::resources::InputController;
use crate::bevy::state_store::{EditorStateStore, EditorStateSummary};
use crate::bevy::systems::editor::GeometryEditor;

pub fn sync_editor_store(
    store: Res<EditorStateStore>,
    controller: Res<InputController>,
    editors: Query<Entity, With<GeometryEditor>>,
    sessions: Query<Entity, With<DrawingSession>>,
    draggers: Query<(), With<Dragger>>,
) {
    let mut editing: Vec<Entity> = editors.iter().collect();
    editing.sort();
    let mut drawing: Vec<Entity> = sessions.iter().collect();
    drawing.sort();

    store.sync_from_bevy(EditorStateSummary {
        editing,
        drawing,
        grabbed: controller.grabbed(),
        dragger_count: draggers.iter().count(),
    });
}
