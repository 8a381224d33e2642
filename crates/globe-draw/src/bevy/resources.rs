//! ECS Resources for globe editing.

use std::collections::VecDeque;
use std::sync::Arc;

use bevy::prelude::*;
use parking_lot::Mutex;

use crate::ellipsoid::Ellipsoid;
use crate::view::GlobeView;

/// Reference ellipsoid of the globe being edited.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct Globe(pub Ellipsoid);

/// The active viewer. Picks miss while it is empty.
#[derive(Resource, Default)]
pub struct GlobeViewer(pub Option<Box<dyn GlobeView>>);

impl GlobeViewer {
    pub fn new(view: impl GlobeView + 'static) -> Self {
        Self(Some(Box::new(view)))
    }

    pub fn view(&self) -> Option<&dyn GlobeView> {
        self.0.as_deref()
    }

    pub fn set(&mut self, view: impl GlobeView + 'static) {
        self.0 = Some(Box::new(view));
    }
}

/// Camera navigation toggles read by the host camera controller.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraNavigation {
    pub enable_rotate: bool,
    pub enable_tilt: bool,
    pub enable_translate: bool,
}

impl Default for CameraNavigation {
    fn default() -> Self {
        Self {
            enable_rotate: true,
            enable_tilt: true,
            enable_translate: true,
        }
    }
}

impl CameraNavigation {
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enable_rotate = enabled;
        self.enable_tilt = enabled;
        self.enable_translate = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enable_rotate && self.enable_tilt && self.enable_translate
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(Entity),
}

/// Pointer state machine: at most one grabbed dragger at a time.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct InputController {
    state: DragState,
}

impl InputController {
    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn grabbed(&self) -> Option<Entity> {
        match self.state {
            DragState::Idle => None,
            DragState::Dragging(dragger) => Some(dragger),
        }
    }

    pub fn is_idle(&self) -> bool {
        self.state == DragState::Idle
    }

    pub fn grab(&mut self, dragger: Entity) {
        self.state = DragState::Dragging(dragger);
    }

    /// Returns to idle, yielding the dragger that was grabbed.
    pub fn release(&mut self) -> Option<Entity> {
        let grabbed = self.grabbed();
        self.state = DragState::Idle;
        grabbed
    }
}

/// Commands issued from outside the ECS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditCommand {
    StartEditing(Entity),
    StopEditing(Entity),
    StartDrawing(Entity),
    StopDrawing(Entity),
}

/// Shared command queue, drained once per frame.
#[derive(Resource, Clone, Default)]
pub struct EditCommandQueue {
    inner: Arc<Mutex<VecDeque<EditCommand>>>,
}

impl EditCommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, command: EditCommand) {
        self.inner.lock().push_back(command);
    }

    pub fn drain(&self) -> Vec<EditCommand> {
        self.inner.lock().drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}
