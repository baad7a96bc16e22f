//! Input events accepted by the controller.
//!
//! Pointer input arrives already projected onto the ground plane. The set
//! is closed: the controller understands exactly these events.

use serde::{Deserialize, Serialize};

use crate::core::{GroundPoint, ObjectId, ObjectTypeId};

/// Mouse button on a confirm click.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerButton {
    /// Commits the current placement or drop.
    #[default]
    Primary,
    /// Cancels the current session.
    Secondary,
}

/// Keyboard signals the host maps onto the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeySignal {
    /// Delete the current selection.
    Delete,
    /// Cancel the current session.
    Escape,
}

/// A single input to the placement state machine.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Toolbar: start placing a new object of this type.
    BeginPlace(ObjectTypeId),
    /// Pointer moved over the ground.
    Hover(GroundPoint),
    /// Pointer clicked on the ground.
    Confirm(GroundPoint, PointerButton),
    /// Abandon the current session.
    Cancel,
    /// Object clicked: lift it.
    Pickup(ObjectId),
    /// Remove an object.
    Delete(ObjectId),
    /// Keyboard shortcut.
    Key(KeySignal),
}

impl InputEvent {
    /// Primary-button click at `(x, z)`.
    #[must_use]
    pub fn click(x: f32, z: f32) -> Self {
        InputEvent::Confirm(GroundPoint::new(x, z), PointerButton::Primary)
    }

    /// Pointer move to `(x, z)`.
    #[must_use]
    pub fn hover(x: f32, z: f32) -> Self {
        InputEvent::Hover(GroundPoint::new(x, z))
    }
}

impl From<KeySignal> for InputEvent {
    fn from(key: KeySignal) -> Self {
        InputEvent::Key(key)
    }
}
