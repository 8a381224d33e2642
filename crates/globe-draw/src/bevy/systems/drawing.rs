//! Click-to-draw sessions that append vertices to a shape.
//!
//! While drawing, pointer motion keeps a temporary vertex under the cursor,
//! a click commits a vertex and a double click finishes the session.

use bevy::prelude::*;

use crate::bevy::components::DrawingSession;
use crate::bevy::events::{DrawingFinished, PointerInput, PointerKind};
use crate::bevy::resources::{Globe, GlobeViewer};
use crate::bevy::systems::editor::{GeometryEditor, write_message};
use crate::error::EditError;
use crate::shape::GlobeShape;

/// Starts a drawing session on an entity with a vertex sequence.
///
/// Starting on an entity that is already drawing is a no-op.
pub fn start_drawing(world: &mut World, entity: Entity) -> Result<(), EditError> {
    let mut entity_mut = world
        .get_entity_mut(entity)
        .map_err(|_| EditError::EntityNotFound(entity))?;

    if entity_mut.contains::<GeometryEditor>() {
        return Err(EditError::AlreadyEditing(entity));
    }
    if entity_mut.contains::<DrawingSession>() {
        return Ok(());
    }

    let mut shape = entity_mut
        .get_mut::<GlobeShape>()
        .ok_or(EditError::UnsupportedGeometry(entity))?;
    let positions = shape
        .positions_mut()
        .ok_or(EditError::NoBackingSequence(entity))?;
    positions.is_constant = false;

    entity_mut.insert(DrawingSession::default());
    tracing::info!("[drawing] started drawing {}", entity);
    Ok(())
}

/// Ends a drawing session, dropping a trailing temporary vertex.
///
/// Returns `Ok(false)` when there was no session.
pub fn stop_drawing(world: &mut World, entity: Entity) -> Result<bool, EditError> {
    let mut entity_mut = world
        .get_entity_mut(entity)
        .map_err(|_| EditError::EntityNotFound(entity))?;

    let Some(session) = entity_mut.take::<DrawingSession>() else {
        return Ok(false);
    };
    if let Some(mut shape) = entity_mut.get_mut::<GlobeShape>() {
        finish(&session, &mut shape);
    }

    write_message(world, DrawingFinished { entity });
    tracing::info!("[drawing] stopped drawing {}", entity);
    Ok(true)
}

pub fn is_drawing(world: &World, entity: Entity) -> bool {
    world
        .get_entity(entity)
        .is_ok_and(|entity_ref| entity_ref.contains::<DrawingSession>())
}

fn finish(session: &DrawingSession, shape: &mut GlobeShape) {
    if let Some(positions) = shape.positions_mut() {
        if session.last_point_temporary {
            positions.values.pop();
        }
        positions.is_constant = true;
    }
}

/// System feeding pointer input into every drawing session.
pub fn process_drawing_input(
    mut commands: Commands,
    mut pointer: MessageReader<PointerInput>,
    mut finished: MessageWriter<DrawingFinished>,
    globe: Res<Globe>,
    viewer: Res<GlobeViewer>,
    mut sessions: Query<(Entity, &mut DrawingSession, &mut GlobeShape)>,
) {
    // Removal is deferred, so sessions finished this frame are skipped here.
    let mut done: Vec<Entity> = Vec::new();

    for input in pointer.read() {
        if input.modifier.is_some() {
            continue;
        }

        match input.kind {
            PointerKind::Click | PointerKind::Move => {
                let Some(view) = viewer.view() else {
                    continue;
                };
                let Some(hit) = view.pick_ellipsoid(input.position, &globe.0) else {
                    continue;
                };
                let temporary = input.kind == PointerKind::Move;

                for (entity, mut session, mut shape) in &mut sessions {
                    if done.contains(&entity) {
                        continue;
                    }
                    let Some(positions) = shape.positions_mut() else {
                        continue;
                    };
                    if session.last_point_temporary {
                        positions.values.pop();
                    }
                    positions.values.push(hit);
                    session.last_point_temporary = temporary;
                }
            }
            PointerKind::DoubleClick => {
                for (entity, mut session, mut shape) in &mut sessions {
                    if done.contains(&entity) {
                        continue;
                    }
                    finish(&session, &mut shape);
                    session.last_point_temporary = false;
                    done.push(entity);
                    commands.entity(entity).remove::<DrawingSession>();
                    finished.write(DrawingFinished { entity });
                    tracing::info!("[drawing] finished drawing {}", entity);
                }
            }
            PointerKind::Down | PointerKind::Up => {}
        }
    }
}
