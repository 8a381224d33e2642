//! ECS Messages for globe editing.
//!
//! Pointer input flows in, dragger moves and session notifications flow out.
//! In Bevy 0.18+, buffered events use the Message trait.

use bevy::math::DVec3;
use bevy::prelude::*;

use crate::config::KeyModifier;

/// Kind of primary-button pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    Up,
    Move,
    Click,
    DoubleClick,
}

/// Pointer event in screen pixels, top-left origin.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct PointerInput {
    pub kind: PointerKind,
    pub position: Vec2,
    /// Cursor position of the previous event; equals `position` for
    /// non-move events.
    pub previous: Vec2,
    pub modifier: Option<KeyModifier>,
}

impl PointerInput {
    pub fn new(kind: PointerKind, position: Vec2) -> Self {
        Self {
            kind,
            position,
            previous: position,
            modifier: None,
        }
    }

    pub fn moved(previous: Vec2, position: Vec2) -> Self {
        Self {
            kind: PointerKind::Move,
            position,
            previous,
            modifier: None,
        }
    }

    pub fn with_modifier(mut self, modifier: KeyModifier) -> Self {
        self.modifier = Some(modifier);
        self
    }
}

/// Request to move a dragger to a world position without a pointer gesture.
#[derive(Message, Debug, Clone, Copy)]
pub struct MoveDragger {
    pub dragger: Entity,
    pub position: DVec3,
}

/// Written after every accepted dragger position change.
#[derive(Message, Debug, Clone, Copy)]
pub struct DraggerMoved {
    pub dragger: Entity,
    pub position: DVec3,
}

/// An editing session started on `entity`.
#[derive(Message, Debug, Clone, Copy)]
pub struct EditStarted {
    pub entity: Entity,
}

/// An editing session ended on `entity`.
#[derive(Message, Debug, Clone, Copy)]
pub struct EditStopped {
    pub entity: Entity,
}

/// A drawing session on `entity` was finished by a double click.
#[derive(Message, Debug, Clone, Copy)]
pub struct DrawingFinished {
    pub entity: Entity,
}
