//! Editing sessions.
//!
//! `start_editing` inspects an entity's `GlobeShape`, spawns the matching
//! set of draggers and records them in a `GeometryEditor` component on the
//! entity. `stop_editing` removes that component and despawns every dragger
//! it lists. Dragger movement flows back into the shape through
//! `apply_drag_bindings`.

mod bindings;
mod dragger;
mod ellipse;
mod extruded;
mod input;
mod vertex;

pub use bindings::*;
pub use dragger::*;
pub use input::*;

use bevy::ecs::message::{Message, Messages};
use bevy::prelude::*;

use crate::bevy::components::{Dragger, DrawingSession};
use crate::bevy::events::{EditStarted, EditStopped};
use crate::bevy::resources::{CameraNavigation, Globe, InputController};
use crate::config::EditorConfig;
use crate::error::EditError;
use crate::shape::{GlobePosition, GlobeShape};

/// The draggers of one entity's editing session.
#[derive(Component, Debug, Clone, PartialEq)]
pub enum GeometryEditor {
    /// One horizontal dragger per vertex (polyline, polygon, corridor).
    Vertices { draggers: Vec<Entity> },
    /// Base vertex draggers plus a parallel set of height draggers.
    ExtrudedPolygon { base: Vec<Entity>, height: Vec<Entity> },
    Ellipse { center: Entity, radius: Entity },
}

impl GeometryEditor {
    pub fn draggers(&self) -> Vec<Entity> {
        match self {
            Self::Vertices { draggers } => draggers.clone(),
            Self::ExtrudedPolygon { base, height } => base.iter().chain(height).copied().collect(),
            Self::Ellipse { center, radius } => vec![*center, *radius],
        }
    }

    pub fn dragger_count(&self) -> usize {
        match self {
            Self::Vertices { draggers } => draggers.len(),
            Self::ExtrudedPolygon { base, height } => base.len() + height.len(),
            Self::Ellipse { .. } => 2,
        }
    }

    pub fn contains(&self, dragger: Entity) -> bool {
        match self {
            Self::Vertices { draggers } => draggers.contains(&dragger),
            Self::ExtrudedPolygon { base, height } => {
                base.contains(&dragger) || height.contains(&dragger)
            }
            Self::Ellipse { center, radius } => *center == dragger || *radius == dragger,
        }
    }

    /// Height draggers, empty for non-extruded editors.
    pub fn height_draggers(&self) -> &[Entity] {
        match self {
            Self::ExtrudedPolygon { height, .. } => height,
            _ => &[],
        }
    }
}

/// Starts an editing session on `entity`.
///
/// Marks the shape's vertex sequence mutable, spawns its draggers and
/// writes `EditStarted`. Nothing is written when the call is refused.
pub fn start_editing(world: &mut World, entity: Entity) -> Result<(), EditError> {
    let entity_ref = world
        .get_entity(entity)
        .map_err(|_| EditError::EntityNotFound(entity))?;

    if entity_ref.contains::<DrawingSession>() {
        return Err(EditError::DrawingInProgress(entity));
    }
    if entity_ref.contains::<GeometryEditor>() {
        return Err(EditError::AlreadyEditing(entity));
    }
    let shape = entity_ref
        .get::<GlobeShape>()
        .cloned()
        .ok_or(EditError::UnsupportedGeometry(entity))?;
    let center = entity_ref.get::<GlobePosition>().map(|position| position.0);

    let ellipsoid = world.get_resource::<Globe>().map(|globe| globe.0).unwrap_or_default();
    let granularity = world
        .get_resource::<EditorConfig>()
        .map_or_else(|| EditorConfig::default().ellipse_granularity, |c| c.ellipse_granularity);

    let editor = match &shape {
        GlobeShape::Polyline { positions }
        | GlobeShape::Corridor { positions, .. }
        | GlobeShape::Polygon {
            hierarchy: positions,
            extruded_height: None,
        } => vertex::spawn_vertex_draggers(world, entity, &positions.values),
        GlobeShape::Polygon {
            hierarchy,
            extruded_height: Some(height),
        } => {
            extruded::spawn_extruded_draggers(world, entity, &ellipsoid, &hierarchy.values, *height)
        }
        GlobeShape::Ellipse {
            semi_major_axis,
            semi_minor_axis,
            rotation,
        } => {
            let center = center.ok_or(EditError::MissingPosition(entity))?;
            ellipse::spawn_ellipse_draggers(
                world,
                entity,
                center,
                *semi_major_axis,
                *semi_minor_axis,
                *rotation,
                granularity,
            )
        }
    };

    let dragger_count = editor.dragger_count();
    let mut entity_mut = world.entity_mut(entity);
    if let Some(mut shape) = entity_mut.get_mut::<GlobeShape>() {
        if let Some(positions) = shape.positions_mut() {
            positions.is_constant = false;
        }
    }
    entity_mut.insert(editor);

    write_message(world, EditStarted { entity });
    tracing::info!(
        "[editor] started editing {} {} with {} draggers",
        shape.kind_name(),
        entity,
        dragger_count
    );
    Ok(())
}

/// Ends the editing session on `entity`.
///
/// Returns `Ok(false)` when there was no session, so repeated calls are
/// harmless. A grab held on one of the session's draggers is released.
pub fn stop_editing(world: &mut World, entity: Entity) -> Result<bool, EditError> {
    let mut entity_mut = world
        .get_entity_mut(entity)
        .map_err(|_| EditError::EntityNotFound(entity))?;

    let Some(editor) = entity_mut.take::<GeometryEditor>() else {
        tracing::debug!("[editor] stop requested for {} with no session", entity);
        return Ok(false);
    };

    if let Some(mut shape) = entity_mut.get_mut::<GlobeShape>() {
        if let Some(positions) = shape.positions_mut() {
            positions.is_constant = true;
        }
    }

    write_message(world, EditStopped { entity });

    let grabbed = world
        .get_resource::<InputController>()
        .and_then(InputController::grabbed);
    if let Some(grabbed) = grabbed.filter(|dragger| editor.contains(*dragger)) {
        if let Some(mut controller) = world.get_resource_mut::<InputController>() {
            controller.release();
        }
        if let Some(mut navigation) = world.get_resource_mut::<CameraNavigation>() {
            navigation.set_enabled(true);
        }
        tracing::debug!("[editor] released dragger {} held by stopped session", grabbed);
    }

    for dragger in editor.draggers() {
        if let Ok(dragger_mut) = world.get_entity_mut(dragger) {
            dragger_mut.despawn();
        }
    }

    tracing::info!("[editor] stopped editing {}", entity);
    Ok(true)
}

pub fn is_editing(world: &World, entity: Entity) -> bool {
    world
        .get_entity(entity)
        .is_ok_and(|entity_ref| entity_ref.contains::<GeometryEditor>())
}

/// System despawning draggers whose owner lost its session without
/// `stop_editing`, e.g. because the host despawned the edited entity.
pub fn despawn_orphaned_draggers(
    mut commands: Commands,
    mut removed: RemovedComponents<GeometryEditor>,
    editors: Query<(), With<GeometryEditor>>,
    draggers: Query<(Entity, &Dragger)>,
    mut controller: ResMut<InputController>,
    mut navigation: ResMut<CameraNavigation>,
) {
    let owners: Vec<Entity> = removed
        .read()
        .filter(|owner| !editors.contains(*owner))
        .collect();
    if owners.is_empty() {
        return;
    }

    let mut orphaned = 0;
    for (entity, dragger) in &draggers {
        if !dragger.owner.is_some_and(|owner| owners.contains(&owner)) {
            continue;
        }
        orphaned += 1;
        if controller.grabbed() == Some(entity) {
            controller.release();
            navigation.set_enabled(true);
            tracing::debug!("[editor] released orphaned dragger {}", entity);
        }
        commands.entity(entity).despawn();
    }
    if orphaned > 0 {
        tracing::info!("[editor] despawned {} draggers left by a vanished session", orphaned);
    }
}

/// Writes a message if its type is registered.
pub(crate) fn write_message<M: Message>(world: &mut World, message: M) {
    if let Some(mut messages) = world.get_resource_mut::<Messages<M>>() {
        messages.write(message);
    }
}
