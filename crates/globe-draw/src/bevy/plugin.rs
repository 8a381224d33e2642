//! Bevy plugins for globe editing.
//!
//! Provides:
//! - `GlobeDrawHeadlessPlugin`: Logic-only plugin (no rendering/window dependencies)
//!   for headless testing
//! - `GlobeDrawPlugin`: Full plugin including `GlobeDrawHeadlessPlugin` + window input,
//!   view sync and rendering

use bevy::prelude::*;

use crate::bevy::events::*;
use crate::bevy::resources::*;
use crate::bevy::state_store::EditorStateStore;
use crate::bevy::systems;
use crate::config::EditorConfig;
use crate::ellipsoid::Ellipsoid;

// ============================================================================
// Headless Plugin (logic only, no rendering/window dependencies)
// ============================================================================

/// Headless plugin containing all editing logic without rendering or window dependencies.
///
/// Use this plugin in tests with `MinimalPlugins` and a `GlobeViewer`
/// inserted by hand.
///
/// Excluded systems (window/render dependent):
/// - Pointer collection from the primary window (collect_pointer_input)
/// - Viewer sync from `Camera3d` (sync_perspective_view)
/// - Gizmo rendering (render_shapes, render_draggers)
pub struct GlobeDrawHeadlessPlugin {
    pub config: EditorConfig,
    pub ellipsoid: Ellipsoid,
    pub command_queue: Option<EditCommandQueue>,
    pub state_store: Option<EditorStateStore>,
}

impl Default for GlobeDrawHeadlessPlugin {
    fn default() -> Self {
        Self {
            config: EditorConfig::default(),
            ellipsoid: Ellipsoid::wgs84(),
            command_queue: None,
            state_store: None,
        }
    }
}

impl Plugin for GlobeDrawHeadlessPlugin {
    fn build(&self, app: &mut App) {
        // ====================================================================
        // Resources
        // ====================================================================
        let config = match self.config.validate() {
            Ok(()) => self.config.clone(),
            Err(err) => {
                tracing::warn!("[editor] {}; using default config", err);
                EditorConfig::default()
            }
        };

        app.insert_resource(config)
            .insert_resource(Globe(self.ellipsoid))
            .insert_resource(self.command_queue.clone().unwrap_or_default())
            .insert_resource(self.state_store.clone().unwrap_or_default());

        // Host-provided values win over defaults.
        app.init_resource::<GlobeViewer>()
            .init_resource::<CameraNavigation>()
            .init_resource::<InputController>();

        // ====================================================================
        // Messages
        // ====================================================================
        app.add_message::<PointerInput>()
            .add_message::<MoveDragger>()
            .add_message::<DraggerMoved>()
            .add_message::<EditStarted>()
            .add_message::<EditStopped>()
            .add_message::<DrawingFinished>();

        // ====================================================================
        // Systems
        // ====================================================================
        app.add_systems(
            Update,
            (
                systems::process_edit_commands,
                systems::despawn_orphaned_draggers,
                systems::process_pointer_input,
                systems::apply_drag_bindings,
                systems::process_drawing_input,
                systems::sync_editor_store,
            )
                .chain(),
        );
    }
}

// ============================================================================
// Full Plugin (headless + window input + rendering)
// ============================================================================

/// Full plugin for a windowed host with a primary `Camera3d`.
#[derive(Default)]
pub struct GlobeDrawPlugin {
    pub headless: GlobeDrawHeadlessPlugin,
}

impl Plugin for GlobeDrawPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(GlobeDrawHeadlessPlugin {
            config: self.headless.config.clone(),
            ellipsoid: self.headless.ellipsoid,
            command_queue: self.headless.command_queue.clone(),
            state_store: self.headless.state_store.clone(),
        });

        app.init_resource::<systems::ShapeGizmoConfig>();

        app.add_systems(
            Update,
            (systems::sync_perspective_view, systems::collect_pointer_input)
                .chain()
                .before(systems::process_edit_commands),
        );
        app.add_systems(
            Update,
            (systems::render_shapes, systems::render_draggers).after(systems::sync_editor_store),
        );
    }
}
