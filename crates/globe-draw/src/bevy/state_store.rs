//! Shared editor state for a host UI.
//!
//! The store is cloned out of the ECS and polled by the host; the version
//! counter only moves when the summary changes.

use std::sync::Arc;

use bevy::prelude::{Entity, Resource};
use parking_lot::RwLock;

/// Snapshot of the editing state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditorStateSummary {
    /// Entities with an editing session, sorted.
    pub editing: Vec<Entity>,
    /// Entities with a drawing session, sorted.
    pub drawing: Vec<Entity>,
    pub grabbed: Option<Entity>,
    pub dragger_count: usize,
}

#[derive(Resource, Clone, Default)]
pub struct EditorStateStore {
    inner: Arc<RwLock<EditorStateStoreInner>>,
}

#[derive(Default)]
struct EditorStateStoreInner {
    summary: EditorStateSummary,
    version: u64,
}

impl EditorStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_summary(&self) -> EditorStateSummary {
        self.inner.read().summary.clone()
    }

    /// Get version for change detection.
    pub fn get_version(&self) -> u64 {
        self.inner.read().version
    }

    pub fn is_editing(&self, entity: Entity) -> bool {
        self.inner.read().summary.editing.contains(&entity)
    }

    pub fn grabbed(&self) -> Option<Entity> {
        self.inner.read().summary.grabbed
    }

    /// Replaces the summary. Returns whether anything changed.
    pub fn sync_from_bevy(&self, summary: EditorStateSummary) -> bool {
        let mut inner = self.inner.write();
        if inner.summary == summary {
            return false;
        }
        inner.summary = summary;
        inner.version += 1;
        true
    }
}
