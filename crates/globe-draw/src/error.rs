//! Errors returned by editing and drawing operations.

use bevy::prelude::Entity;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditError {
    #[error("entity {0} does not exist")]
    EntityNotFound(Entity),

    #[error("entity {0} has no editable geometry")]
    UnsupportedGeometry(Entity),

    #[error("entity {0} has no position")]
    MissingPosition(Entity),

    #[error("entity {0} is already being edited")]
    AlreadyEditing(Entity),

    #[error("entity {0} is being drawn")]
    DrawingInProgress(Entity),

    #[error("entity {0} has no position sequence")]
    NoBackingSequence(Entity),

    #[error("invalid editor config: {0}")]
    InvalidConfig(String),

    #[error("failed to parse editor config: {0}")]
    ConfigParse(#[from] serde_json::Error),
}
