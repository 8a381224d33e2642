//! Dragger factory.

use bevy::math::DVec3;
use bevy::prelude::*;

use crate::bevy::components::{DragAction, Dragger};
use crate::config::{DragAxisMode, EditorConfig};
use crate::shape::GlobePosition;

/// Settings for a new dragger. Unset fields fall back to `EditorConfig`.
#[derive(Debug, Clone, Default)]
pub struct DraggerOptions {
    pub position: DVec3,
    pub axis_mode: Option<DragAxisMode>,
    pub icon: Option<String>,
    pub on_drag: Option<DragAction>,
    pub linked_index: Option<usize>,
    pub linked_dragger: Option<Entity>,
    pub owner: Option<Entity>,
}

impl DraggerOptions {
    pub fn at(position: DVec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn axis_mode(mut self, axis_mode: DragAxisMode) -> Self {
        self.axis_mode = Some(axis_mode);
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn on_drag(mut self, action: DragAction) -> Self {
        self.on_drag = Some(action);
        self
    }

    pub fn linked_index(mut self, index: usize) -> Self {
        self.linked_index = Some(index);
        self
    }

    pub fn linked_dragger(mut self, dragger: Entity) -> Self {
        self.linked_dragger = Some(dragger);
        self
    }

    pub fn owner(mut self, owner: Entity) -> Self {
        self.owner = Some(owner);
        self
    }
}

/// Spawns a dragger entity at `options.position`.
pub fn create_dragger(world: &mut World, options: DraggerOptions) -> Entity {
    let (default_axis_mode, default_icon, idle_scale) = match world.get_resource::<EditorConfig>() {
        Some(config) => (
            config.default_axis_mode,
            config.marker_icon.clone(),
            config.idle_scale,
        ),
        None => {
            let config = EditorConfig::default();
            (config.default_axis_mode, config.marker_icon, config.idle_scale)
        }
    };

    world
        .spawn((
            Dragger {
                axis_mode: options.axis_mode.unwrap_or(default_axis_mode),
                on_drag: options.on_drag,
                linked_index: options.linked_index,
                linked_dragger: options.linked_dragger,
                owner: options.owner,
                icon: options.icon.unwrap_or(default_icon),
                scale: idle_scale,
            },
            GlobePosition(options.position),
        ))
        .id()
}
