//! Session state and transition outcomes.
//!
//! ## Session
//!
//! - `Idle`: nothing in hand
//! - `Placing`: choosing a spot for a new object of some type
//! - `Lifted`: an existing object is out of the placed list, in flight
//!
//! Every controller operation answers with an `Outcome`. A refused action
//! is an ordinary `Outcome::Rejected`, never an error.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::object::PlacedObject;
use crate::core::{Footprint, ObjectId, ObjectTypeId, Position};
use crate::grid::{CellList, InsertError, OwnerList};

/// Ghost-preview data for a candidate location.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Preview {
    /// Snapped center, at ground height.
    pub center: Position,

    /// Footprint the preview was computed with.
    pub footprint: Footprint,

    /// Cells the candidate would cover. Empty when the candidate does not
    /// fit the integer grid.
    pub cells: CellList,

    /// True when the candidate is free and in bounds.
    pub valid: bool,

    /// True when `footprint` is a stand-in for an asset still loading.
    pub provisional: bool,

    /// Whether every cell fits the integer grid and lies inside the
    /// configured bounds.
    pub in_bounds: bool,

    /// Objects the candidate overlaps.
    pub blocked_by: OwnerList,
}

/// Current interaction mode.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum Session {
    #[default]
    Idle,

    /// Choosing a location for a new object.
    Placing {
        type_id: ObjectTypeId,
        preview: Option<Preview>,
    },

    /// Relocating an existing object. `object` is absent from the placed
    /// list for the whole lift.
    Lifted {
        object: PlacedObject,
        preview: Option<Preview>,
        /// Index in the placed list the object came from.
        slot: usize,
    },
}

impl Session {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Session::Idle)
    }

    /// Type being placed, if placing.
    #[must_use]
    pub fn placing_type(&self) -> Option<ObjectTypeId> {
        match self {
            Session::Placing { type_id, .. } => Some(*type_id),
            _ => None,
        }
    }

    /// The object in flight, if lifted.
    #[must_use]
    pub fn lifted(&self) -> Option<&PlacedObject> {
        match self {
            Session::Lifted { object, .. } => Some(object),
            _ => None,
        }
    }

    /// Id of the object in flight, if lifted.
    #[must_use]
    pub fn lifted_id(&self) -> Option<ObjectId> {
        self.lifted().map(|o| o.id)
    }

    /// Latest preview, if any pointer position is known.
    #[must_use]
    pub fn preview(&self) -> Option<&Preview> {
        match self {
            Session::Idle => None,
            Session::Placing { preview, .. } | Session::Lifted { preview, .. } => preview.as_ref(),
        }
    }

    pub(crate) fn set_preview(&mut self, next: Preview) {
        match self {
            Session::Idle => {}
            Session::Placing { preview, .. } | Session::Lifted { preview, .. } => {
                *preview = Some(next);
            }
        }
    }
}

/// Why an action was refused.
#[derive(Clone, Debug, PartialEq, Error, Serialize, Deserialize)]
pub enum Rejection {
    #[error("placement blocked by {by:?}")]
    Blocked { by: OwnerList },

    #[error("placement outside the buildable area")]
    OutOfBounds,

    #[error("footprint of {0} is still loading")]
    FootprintPending(ObjectTypeId),

    #[error("unknown object type {0}")]
    UnknownType(ObjectTypeId),

    #[error("no object ids left")]
    IdsExhausted,
}

impl From<InsertError> for Rejection {
    fn from(err: InsertError) -> Self {
        match err {
            InsertError::Occupied(by) => Rejection::Blocked { by },
            InsertError::AlreadyIndexed(id) => Rejection::Blocked {
                by: OwnerList::from_slice(&[id]),
            },
            InsertError::OffGrid => Rejection::OutOfBounds,
        }
    }
}

/// Result of a controller operation.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    /// Entered `Placing` from `Idle` (or from `Lifted`, after a rollback).
    Started(ObjectTypeId),
    /// Changed the type being placed.
    Switched(ObjectTypeId),
    /// Preview recomputed.
    Previewed(Preview),
    /// New object committed.
    Placed(ObjectId),
    /// Object taken off the grid.
    Lifted(ObjectId),
    /// Lifted object committed at a new position.
    Dropped(ObjectId),
    /// Placement abandoned.
    Cancelled,
    /// Lifted object returned to where it was.
    RolledBack(ObjectId),
    /// Placed object removed.
    Deleted(ObjectId),
    /// Lifted object removed without being put back.
    Discarded(ObjectId),
    /// Action refused; nothing changed.
    Rejected(Rejection),
    /// Event has no meaning in the current state.
    Ignored,
}

impl Outcome {
    #[must_use]
    pub fn is_rejected(&self) -> bool {
        matches!(self, Outcome::Rejected(_))
    }

    #[must_use]
    pub fn is_ignored(&self) -> bool {
        matches!(self, Outcome::Ignored)
    }

    /// The rejection, if refused.
    #[must_use]
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Outcome::Rejected(r) => Some(r),
            _ => None,
        }
    }
}
