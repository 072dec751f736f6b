use bevy::prelude::*;

use crate::store::{Body, BodyError};

/// Drag-to-launch state. At most one pending body exists at a time and it is
/// not part of the simulated set until released.
#[derive(Resource, Default, Debug, Clone, PartialEq)]
pub enum Gesture {
    #[default]
    Idle,
    Dragging(Body),
}

impl Gesture {
    pub fn pending(&self) -> Option<&Body> {
        match self {
            Gesture::Idle => None,
            Gesture::Dragging(body) => Some(body),
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, Gesture::Dragging(_))
    }

    /// Pointer held at `pointer`.
    ///
    /// From `Idle` this places a fresh body built by `spawn` under the pointer.
    /// While dragging, the pending velocity becomes the current drag vector;
    /// a second body is never started.
    pub fn hold<F>(&mut self, pointer: Vec2, spawn: F) -> Result<(), BodyError>
    where
        F: FnOnce(Vec2) -> Result<Body, BodyError>,
    {
        match self {
            Gesture::Idle => {
                let mut body = spawn(pointer)?;
                body.vel = Vec2::ZERO;
                *self = Gesture::Dragging(body);
            }
            Gesture::Dragging(body) => {
                body.vel = pointer - body.pos;
            }
        }
        Ok(())
    }

    /// Pointer released. Hands back the pending body, if any, and goes idle.
    pub fn release(&mut self) -> Option<Body> {
        match std::mem::take(self) {
            Gesture::Idle => None,
            Gesture::Dragging(body) => Some(body),
        }
    }

    pub fn cancel(&mut self) {
        *self = Gesture::Idle;
    }
}
