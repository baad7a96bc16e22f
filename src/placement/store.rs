//! Authoritative placement state.
//!
//! The store holds the placed objects, the occupancy index derived from
//! them, the session, and the selection/hover ids used for highlighting.
//! Collaborators read it freely; only the controller writes to it.
//!
//! The placed list is an `im::Vector`, so [`PlacementStore::snapshot`] is
//! O(1) and can be handed to a render thread.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::object::PlacedObject;
use super::session::Session;
use crate::core::{Footprint, ObjectId};
use crate::grid::{InsertError, OccupancyIndex};

/// Cheap structural copy of the store, minus the derived index.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub objects: Vector<PlacedObject>,
    pub session: Session,
    pub selected: Option<ObjectId>,
    pub hovered: Option<ObjectId>,
}

/// Placed objects, session and highlight state.
#[derive(Clone, Debug)]
pub struct PlacementStore {
    objects: Vector<PlacedObject>,
    occupancy: OccupancyIndex,
    pub(crate) session: Session,
    pub(crate) selected: Option<ObjectId>,
    pub(crate) hovered: Option<ObjectId>,
    /// `None` once `u32::MAX` has been handed out.
    next_id: Option<ObjectId>,
}

impl Default for PlacementStore {
    fn default() -> Self {
        Self {
            objects: Vector::new(),
            occupancy: OccupancyIndex::new(),
            session: Session::Idle,
            selected: None,
            hovered: None,
            next_id: Some(ObjectId::FIRST),
        }
    }
}

impl PlacementStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // === Queries ===

    /// Placed objects, in placement order.
    #[must_use]
    pub fn objects(&self) -> &Vector<PlacedObject> {
        &self.objects
    }

    /// Look up a placed object.
    #[must_use]
    pub fn get(&self, id: ObjectId) -> Option<&PlacedObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    /// Check if `id` is in the placed list.
    #[must_use]
    pub fn contains(&self, id: ObjectId) -> bool {
        self.position_of(id).is_some()
    }

    /// Number of placed objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if nothing is placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Occupancy of the placed objects. Never includes a lifted object.
    #[must_use]
    pub fn occupancy(&self) -> &OccupancyIndex {
        &self.occupancy
    }

    /// Current session.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Selected object (the lifted one while lifted).
    #[must_use]
    pub fn selected(&self) -> Option<ObjectId> {
        self.selected
    }

    /// Object under the pointer, for highlighting.
    #[must_use]
    pub fn hovered(&self) -> Option<ObjectId> {
        self.hovered
    }

    /// O(1) copy of everything but the index.
    #[must_use]
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            objects: self.objects.clone(),
            session: self.session.clone(),
            selected: self.selected,
            hovered: self.hovered,
        }
    }

    /// The id the next placement will get, or `None` when ids ran out.
    #[must_use]
    pub fn peek_next_id(&self) -> Option<ObjectId> {
        self.next_id
    }

    // === Mutation (controller only) ===

    pub(crate) fn alloc_id(&mut self) -> Option<ObjectId> {
        let id = self.next_id?;
        self.next_id = id.checked_next();
        Some(id)
    }

    /// Insert `object` at `slot` (clamped), claiming its cells.
    ///
    /// Fails without touching anything if a cell is taken, the id is
    /// already placed, or the footprint is off the grid.
    pub(crate) fn insert_at(
        &mut self,
        slot: usize,
        object: PlacedObject,
        footprint: Footprint,
    ) -> Result<(), InsertError> {
        self.occupancy
            .try_insert(object.id, object.position.ground(), footprint)?;

        if self.next_id.is_some_and(|next| object.id >= next) {
            self.next_id = object.id.checked_next();
        }
        let slot = slot.min(self.objects.len());
        self.objects.insert(slot, object);
        Ok(())
    }

    /// Append `object`, claiming its cells.
    pub(crate) fn push(&mut self, object: PlacedObject, footprint: Footprint) -> Result<(), InsertError> {
        let end = self.objects.len();
        self.insert_at(end, object, footprint)
    }

    /// Remove `id` from the placed list and the index.
    ///
    /// Returns the object and the slot it occupied.
    pub(crate) fn take(&mut self, id: ObjectId) -> Option<(PlacedObject, usize)> {
        let slot = self.position_of(id)?;
        let object = self.objects.remove(slot);
        self.occupancy.remove(id);
        Some((object, slot))
    }

    fn position_of(&self, id: ObjectId) -> Option<usize> {
        self.objects.iter().position(|o| o.id == id)
    }
}
