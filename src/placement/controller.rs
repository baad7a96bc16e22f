//! The placement state machine.
//!
//! `PlacementController` is the only writer of the placed-object list.
//! Every transition runs synchronously on `&mut self`, which makes the
//! controller the single serialized entry point for all mutation.
//!
//! ## Transitions
//!
//! | From | Event | To |
//! |---|---|---|
//! | Idle | `begin_place` | Placing |
//! | Placing | `hover` | Placing (preview) |
//! | Placing | `confirm`, free | Idle (object appended) |
//! | Placing | `confirm`, blocked | Placing (rejected) |
//! | Placing | `cancel` | Idle |
//! | Idle | `pickup` | Lifted (object removed from list) |
//! | Lifted | `hover` | Lifted (preview, own cells free) |
//! | Lifted | `confirm`, free | Idle (object re-inserted, moved) |
//! | Lifted | `confirm`, blocked | Lifted (rejected) |
//! | Lifted | `cancel` | Idle (object re-inserted, unmoved) |
//! | Idle / Lifted | `delete` | lifted id: Idle, discarded; other: removed |
//!
//! A lift ends with exactly one re-insertion unless the lifted object is
//! deleted.
//!
//! ## Example
//!
//! ```
//! use grid_placement::{
//!     Catalog, GroundPoint, ObjectDef, ObjectTypeId, Outcome, PlacementConfig,
//!     PlacementController, PointerButton, StaticAssetBounds,
//! };
//!
//! let shop = ObjectTypeId::new(1);
//! let catalog = Catalog::from_defs([ObjectDef::new(shop, "Shop", 2, 2)]).unwrap();
//! let mut controller =
//!     PlacementController::new(catalog, PlacementConfig::default(), StaticAssetBounds::new());
//!
//! controller.begin_place(shop);
//! let outcome = controller.confirm(GroundPoint::new(5.3, 3.7), PointerButton::Primary);
//!
//! let Outcome::Placed(id) = outcome else { panic!("expected a placement") };
//! assert_eq!(controller.store().get(id).unwrap().position.x, 5.0);
//! assert_eq!(controller.occupancy().len(), 4);
//! ```

use rustc_hash::FxHashSet;
use thiserror::Error;
use tracing::{debug, error, trace};

use super::events::{InputEvent, KeySignal, PointerButton};
use super::object::PlacedObject;
use super::session::{Outcome, Preview, Rejection, Session};
use super::store::{PlacementStore, StoreSnapshot};
use crate::catalog::Catalog;
use crate::core::{Footprint, GroundPoint, ObjectId, ObjectTypeId, PlacementConfig, Position};
use crate::footprint::{AssetBounds, FootprintResolver, StaticAssetBounds};
use crate::grid::{footprint_cells, snap, InsertError, OccupancyIndex, OwnerList};

/// Reasons an initial object set cannot be loaded.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Duplicate object id: {0}")]
    DuplicateId(ObjectId),

    #[error("Object {id} overlaps {with:?}")]
    Overlap { id: ObjectId, with: OwnerList },

    #[error("Object {id} has unknown type {type_id}")]
    UnknownType { id: ObjectId, type_id: ObjectTypeId },

    #[error("Object {0} lies outside the buildable area")]
    OutOfBounds(ObjectId),
}

/// A broken store invariant. Always a bug in the engine.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("occupancy index differs from a full rebuild")]
    IndexMismatch,

    #[error("occupancy has {actual} cells, placed footprints cover {expected}")]
    AreaMismatch { expected: usize, actual: usize },

    #[error("lifted object {0} is also in the placed list")]
    LiftedStillPlaced(ObjectId),

    #[error("object {0} appears more than once")]
    DuplicateId(ObjectId),
}

/// Grid placement state machine.
///
/// Generic over the asset-bounds collaborator so hosts can plug in their
/// own loader.
#[derive(Debug)]
pub struct PlacementController<B = StaticAssetBounds> {
    config: PlacementConfig,
    catalog: Catalog,
    resolver: FootprintResolver<B>,
    store: PlacementStore,
    /// Last ground point seen from `hover` or `confirm`.
    last_point: Option<GroundPoint>,
}

impl<B: AssetBounds> PlacementController<B> {
    /// Create a controller with an empty grid.
    #[must_use]
    pub fn new(catalog: Catalog, config: PlacementConfig, loader: B) -> Self {
        let resolver = FootprintResolver::new(loader, config.default_footprint);
        Self {
            config,
            catalog,
            resolver,
            store: PlacementStore::new(),
            last_point: None,
        }
    }

    /// Seed the grid with existing objects.
    ///
    /// Objects keep their ids and positions; the id allocator skips past
    /// them. Fails on duplicate ids, unknown types, overlaps and objects
    /// outside the bounds.
    pub fn with_objects(
        mut self,
        objects: impl IntoIterator<Item = PlacedObject>,
    ) -> Result<Self, SeedError> {
        for object in objects {
            if self.store.contains(object.id) {
                return Err(SeedError::DuplicateId(object.id));
            }
            if !self.catalog.contains(object.type_id) {
                return Err(SeedError::UnknownType {
                    id: object.id,
                    type_id: object.type_id,
                });
            }
            let footprint = object.effective_footprint(&self.catalog);
            if !self.in_bounds(object.position.ground(), footprint) {
                return Err(SeedError::OutOfBounds(object.id));
            }
            let id = object.id;
            self.store.push(object, footprint).map_err(|err| match err {
                InsertError::Occupied(with) => SeedError::Overlap { id, with },
                InsertError::AlreadyIndexed(_) => SeedError::DuplicateId(id),
                InsertError::OffGrid => SeedError::OutOfBounds(id),
            })?;
        }
        self.verify();
        Ok(self)
    }

    // === Queries ===

    /// Read access to the store.
    #[must_use]
    pub fn store(&self) -> &PlacementStore {
        &self.store
    }

    /// Placed objects, in placement order.
    pub fn placed(&self) -> impl Iterator<Item = &PlacedObject> {
        self.store.objects().iter()
    }

    /// Current session.
    #[must_use]
    pub fn session(&self) -> &Session {
        self.store.session()
    }

    /// Occupancy of the placed objects.
    #[must_use]
    pub fn occupancy(&self) -> &OccupancyIndex {
        self.store.occupancy()
    }

    /// Selected object.
    #[must_use]
    pub fn selected(&self) -> Option<ObjectId> {
        self.store.selected()
    }

    /// Highlighted object.
    #[must_use]
    pub fn hovered(&self) -> Option<ObjectId> {
        self.store.hovered()
    }

    /// O(1) copy of the store for rendering or comparison.
    #[must_use]
    pub fn snapshot(&self) -> StoreSnapshot {
        self.store.snapshot()
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn config(&self) -> &PlacementConfig {
        &self.config
    }

    /// Last pointer position on the ground.
    #[must_use]
    pub fn last_point(&self) -> Option<GroundPoint> {
        self.last_point
    }

    /// The footprint resolver (and through it, the asset loader).
    #[must_use]
    pub fn resolver(&self) -> &FootprintResolver<B> {
        &self.resolver
    }

    /// Mutable resolver access, e.g. to report a finished asset load.
    /// Call [`refresh`](Self::refresh) afterwards to update the preview.
    pub fn resolver_mut(&mut self) -> &mut FootprintResolver<B> {
        &mut self.resolver
    }

    /// Pure collision query against the current index.
    #[must_use]
    pub fn would_collide(&self, center: GroundPoint, footprint: Footprint) -> bool {
        self.store.occupancy().would_collide(center, footprint)
    }

    // === Event entry point ===

    /// Route one input event to its transition.
    pub fn dispatch(&mut self, event: InputEvent) -> Outcome {
        match event {
            InputEvent::BeginPlace(type_id) => self.begin_place(type_id),
            InputEvent::Hover(point) => self.hover(point),
            InputEvent::Confirm(point, button) => self.confirm(point, button),
            InputEvent::Cancel => self.cancel(),
            InputEvent::Pickup(id) => self.pickup(id),
            InputEvent::Delete(id) => self.delete(id),
            InputEvent::Key(key) => self.handle_key(key),
        }
    }

    /// Keyboard shortcuts: Delete removes the selection, Escape cancels.
    pub fn handle_key(&mut self, key: KeySignal) -> Outcome {
        match key {
            KeySignal::Delete => self.delete_selected(),
            KeySignal::Escape => self.cancel(),
        }
    }

    // === Transitions ===

    /// Start placing a new object of `type_id`.
    ///
    /// While placing, switches type. While lifted, rolls the lifted object
    /// back first.
    pub fn begin_place(&mut self, type_id: ObjectTypeId) -> Outcome {
        if !self.catalog.contains(type_id) {
            return Outcome::Rejected(Rejection::UnknownType(type_id));
        }

        let outcome = match self.store.session.placing_type() {
            Some(current) if current == type_id => return Outcome::Ignored,
            Some(_) => Outcome::Switched(type_id),
            None => Outcome::Started(type_id),
        };
        if self.store.session.lifted_id().is_some() {
            if let Outcome::Rejected(r) = self.rollback() {
                return Outcome::Rejected(r);
            }
        }

        self.store.session = Session::Placing {
            type_id,
            preview: None,
        };
        self.store.selected = None;
        self.store.hovered = None;
        self.refresh_preview();

        debug!(%type_id, "placing");
        outcome
    }

    /// Pointer moved: recompute the ghost preview.
    pub fn hover(&mut self, point: GroundPoint) -> Outcome {
        self.last_point = Some(point);
        match self.refresh_preview() {
            Some(preview) => Outcome::Previewed(preview),
            None => Outcome::Ignored,
        }
    }

    /// Pointer clicked: commit the placement or drop, if the spot is free.
    ///
    /// A secondary-button click cancels instead. A refused confirm changes
    /// nothing.
    pub fn confirm(&mut self, point: GroundPoint, button: PointerButton) -> Outcome {
        if button == PointerButton::Secondary {
            return self.cancel();
        }

        match self.store.session.clone() {
            Session::Idle => Outcome::Ignored,
            Session::Placing { type_id, .. } => self.confirm_place(type_id, point),
            Session::Lifted { object, slot, .. } => self.confirm_drop(object, slot, point),
        }
    }

    /// Abandon the session. A lifted object goes back where it was.
    pub fn cancel(&mut self) -> Outcome {
        if self.store.session.lifted_id().is_some() {
            return self.rollback();
        }
        if self.store.session.is_idle() {
            return Outcome::Ignored;
        }
        self.store.session = Session::Idle;
        debug!("placement cancelled");
        Outcome::Cancelled
    }

    /// Lift a placed object for relocation. Only valid while idle.
    pub fn pickup(&mut self, id: ObjectId) -> Outcome {
        if !self.store.session.is_idle() {
            return Outcome::Ignored;
        }
        let Some((object, slot)) = self.store.take(id) else {
            return Outcome::Ignored;
        };

        // Start the ghost under the pointer, or on the object itself.
        if self.last_point.is_none() {
            self.last_point = Some(object.position.ground());
        }

        self.store.session = Session::Lifted {
            object,
            preview: None,
            slot,
        };
        self.store.selected = Some(id);
        self.store.hovered = None;
        self.refresh_preview();
        self.verify();

        debug!(%id, slot, "lifted");
        Outcome::Lifted(id)
    }

    /// Remove an object.
    ///
    /// Deleting the lifted object discards it. Deleting any other object
    /// leaves the session as it was.
    pub fn delete(&mut self, id: ObjectId) -> Outcome {
        if self.store.session.lifted_id() == Some(id) {
            self.store.session = Session::Idle;
            self.store.selected = None;
            self.verify();
            debug!(%id, "lifted object discarded");
            return Outcome::Discarded(id);
        }

        let Some((_, removed_slot)) = self.store.take(id) else {
            return Outcome::Ignored;
        };

        if let Session::Lifted { slot, .. } = &mut self.store.session {
            if removed_slot < *slot {
                *slot -= 1;
            }
        }
        if self.store.selected == Some(id) {
            self.store.selected = None;
        }
        if self.store.hovered == Some(id) {
            self.store.hovered = None;
        }
        // Freed cells may turn a blocked preview valid.
        self.refresh_preview();
        self.verify();

        debug!(%id, "deleted");
        Outcome::Deleted(id)
    }

    /// Delete whatever is selected.
    pub fn delete_selected(&mut self) -> Outcome {
        match self.store.selected {
            Some(id) => self.delete(id),
            None => Outcome::Ignored,
        }
    }

    /// Recompute the preview at the last pointer position, e.g. after an
    /// asset finished loading.
    pub fn refresh(&mut self) -> Outcome {
        match self.refresh_preview() {
            Some(preview) => Outcome::Previewed(preview),
            None => Outcome::Ignored,
        }
    }

    /// Set the highlighted object. Only placed objects can be highlighted,
    /// and only while idle. Returns whether the highlight was accepted.
    pub fn set_hovered(&mut self, id: Option<ObjectId>) -> bool {
        let accepted = match id {
            Some(id) => self.store.session.is_idle() && self.store.contains(id),
            None => true,
        };
        self.store.hovered = if accepted { id } else { None };
        accepted
    }

    /// Set the selection. Only placed objects can be selected, and only
    /// while idle. Returns whether the selection was accepted.
    pub fn select(&mut self, id: Option<ObjectId>) -> bool {
        if !self.store.session.is_idle() {
            return false;
        }
        match id {
            Some(id) if !self.store.contains(id) => false,
            _ => {
                self.store.selected = id;
                true
            }
        }
    }

    // === Invariants ===

    /// Verify the store against a full rebuild.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let objects = self.store.objects();

        let mut seen = FxHashSet::default();
        for object in objects {
            if !seen.insert(object.id) {
                return Err(InvariantViolation::DuplicateId(object.id));
            }
        }

        if let Some(id) = self.store.session.lifted_id() {
            if seen.contains(&id) {
                return Err(InvariantViolation::LiftedStillPlaced(id));
            }
        }

        let expected: usize = objects
            .iter()
            .map(|o| o.effective_footprint(&self.catalog).area())
            .sum();
        let actual = self.store.occupancy().len();
        if expected != actual {
            return Err(InvariantViolation::AreaMismatch { expected, actual });
        }

        let rebuilt =
            OccupancyIndex::build(objects, &self.catalog, self.store.session.lifted_id());
        if &rebuilt != self.store.occupancy() {
            return Err(InvariantViolation::IndexMismatch);
        }
        Ok(())
    }

    // === Internals ===

    fn confirm_place(&mut self, type_id: ObjectTypeId, point: GroundPoint) -> Outcome {
        let Some(def) = self.catalog.get(type_id) else {
            return Outcome::Rejected(Rejection::UnknownType(type_id));
        };
        let resolved = self.resolver.footprint_for(def);
        if resolved.pending {
            debug!(%type_id, "placement refused: footprint pending");
            return Outcome::Rejected(Rejection::FootprintPending(type_id));
        }

        let preview = self.preview_at(point, resolved.footprint, false);
        if let Some(rejection) = Self::refusal(&preview) {
            debug!(%type_id, %rejection, "placement refused");
            return Outcome::Rejected(rejection);
        }

        let Some(id) = self.store.alloc_id() else {
            debug!(%type_id, "placement refused: ids exhausted");
            return Outcome::Rejected(Rejection::IdsExhausted);
        };
        let object = PlacedObject::new(id, type_id, preview.center).with_footprint(resolved.footprint);
        if let Err(err) = self.store.push(object, resolved.footprint) {
            return Outcome::Rejected(err.into());
        }

        self.last_point = Some(point);
        self.store.session = Session::Idle;
        self.verify();

        debug!(%id, %type_id, x = preview.center.x, z = preview.center.z, "placed");
        Outcome::Placed(id)
    }

    fn confirm_drop(&mut self, object: PlacedObject, slot: usize, point: GroundPoint) -> Outcome {
        let footprint = object.effective_footprint(&self.catalog);
        let preview = self.preview_at(point, footprint, false);
        if let Some(rejection) = Self::refusal(&preview) {
            debug!(id = %object.id, %rejection, "drop refused");
            return Outcome::Rejected(rejection);
        }

        let id = object.id;
        let moved = PlacedObject {
            position: preview.center,
            ..object
        };
        if let Err(err) = self.store.insert_at(slot, moved, footprint) {
            return Outcome::Rejected(err.into());
        }

        self.last_point = Some(point);
        self.store.session = Session::Idle;
        self.store.selected = None;
        self.verify();

        debug!(%id, x = preview.center.x, z = preview.center.z, "dropped");
        Outcome::Dropped(id)
    }

    /// Put the lifted object back, unmodified, where it came from.
    fn rollback(&mut self) -> Outcome {
        let Session::Lifted { object, slot, .. } = self.store.session.clone() else {
            return Outcome::Ignored;
        };

        let id = object.id;
        let footprint = object.effective_footprint(&self.catalog);
        // Nothing can claim a lifted object's old cells, so this only
        // fails if the store is already corrupt. Keep the object in hand.
        if let Err(err) = self.store.insert_at(slot, object, footprint) {
            error!(%id, %err, "rollback blocked; object stays lifted");
            return Outcome::Rejected(err.into());
        }

        self.store.session = Session::Idle;
        self.store.selected = None;
        self.verify();

        debug!(%id, "lift cancelled");
        Outcome::RolledBack(id)
    }

    /// Recompute and store the session preview at the last pointer position.
    fn refresh_preview(&mut self) -> Option<Preview> {
        let point = self.last_point?;
        let (footprint, provisional) = match &self.store.session {
            Session::Idle => return None,
            Session::Placing { type_id, .. } => {
                let def = self.catalog.get(*type_id)?;
                let resolved = self.resolver.footprint_for(def);
                (resolved.footprint, resolved.pending)
            }
            Session::Lifted { object, .. } => (object.effective_footprint(&self.catalog), false),
        };

        let preview = self.preview_at(point, footprint, provisional);
        trace!(
            x = preview.center.x,
            z = preview.center.z,
            valid = preview.valid,
            provisional,
            "preview"
        );
        self.store.session.set_preview(preview.clone());
        Some(preview)
    }

    fn preview_at(&self, point: GroundPoint, footprint: Footprint, provisional: bool) -> Preview {
        let center = snap(point, footprint);
        let cells = footprint_cells(center, footprint);
        let in_bounds = cells.as_ref().is_some_and(|cells| {
            self.config
                .bounds
                .map_or(true, |b| cells.iter().all(|&c| b.contains(c)))
        });
        let blocked_by = self.store.occupancy().colliders(center, footprint);

        Preview {
            center: Position::on_ground(center, self.config.ground_height),
            footprint,
            cells: cells.unwrap_or_default(),
            valid: in_bounds && blocked_by.is_empty(),
            provisional,
            in_bounds,
            blocked_by,
        }
    }

    fn refusal(preview: &Preview) -> Option<Rejection> {
        if !preview.in_bounds {
            Some(Rejection::OutOfBounds)
        } else if !preview.blocked_by.is_empty() {
            Some(Rejection::Blocked {
                by: preview.blocked_by.clone(),
            })
        } else {
            None
        }
    }

    fn in_bounds(&self, center: GroundPoint, footprint: Footprint) -> bool {
        footprint_cells(center, footprint).is_some_and(|cells| {
            self.config
                .bounds
                .map_or(true, |b| cells.iter().all(|&c| b.contains(c)))
        })
    }

    /// Run the invariant check when configured.
    ///
    /// Panics on a violation: the store is corrupt and continuing would
    /// hide the bug.
    fn verify(&self) {
        if !self.config.check_invariants {
            return;
        }
        if let Err(violation) = self.check_invariants() {
            panic!("placement invariant violated: {violation}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ObjectDef;
    use crate::core::{AssetRef, Cell, GridBounds};
    use crate::footprint::BoundingBox;

    const HOUSE: ObjectTypeId = ObjectTypeId(0);
    const SHOP: ObjectTypeId = ObjectTypeId(1);
    const BUGGY: ObjectTypeId = ObjectTypeId(2);

    fn catalog() -> Catalog {
        Catalog::from_defs([
            ObjectDef::new(HOUSE, "House", 1, 1),
            ObjectDef::new(SHOP, "Shop", 2, 2),
            ObjectDef::new(BUGGY, "Buggy", 1, 1)
                .with_asset("buggy.glb")
                .with_scale(0.05),
        ])
        .unwrap()
    }

    fn controller() -> PlacementController {
        PlacementController::new(
            catalog(),
            PlacementConfig::default().with_invariant_checks(true),
            StaticAssetBounds::new(),
        )
    }

    fn place(c: &mut PlacementController, type_id: ObjectTypeId, x: f32, z: f32) -> ObjectId {
        c.begin_place(type_id);
        match c.confirm(GroundPoint::new(x, z), PointerButton::Primary) {
            Outcome::Placed(id) => id,
            other => panic!("expected placement, got {other:?}"),
        }
    }

    #[test]
    fn test_begin_place_unknown_type() {
        let mut c = controller();
        let outcome = c.begin_place(ObjectTypeId::new(99));

        assert_eq!(outcome, Outcome::Rejected(Rejection::UnknownType(ObjectTypeId::new(99))));
        assert!(c.session().is_idle());
    }

    #[test]
    fn test_place_captures_footprint() {
        let mut c = controller();
        let id = place(&mut c, SHOP, 5.3, 3.7);

        let shop = c.store().get(id).unwrap();
        assert_eq!(shop.position, Position::new(5.0, 0.0, 3.0));
        assert_eq!(shop.footprint, Some(Footprint::new(2, 2)));
        assert!(c.session().is_idle());
    }

    #[test]
    fn test_hover_updates_preview() {
        let mut c = controller();
        c.begin_place(HOUSE);

        let Outcome::Previewed(preview) = c.hover(GroundPoint::new(2.2, 7.9)) else {
            panic!("expected preview");
        };
        assert_eq!(preview.center, Position::new(2.5, 0.0, 7.5));
        assert!(preview.valid);
        assert_eq!(c.session().preview(), Some(&preview));
        assert!(c.placed().next().is_none());
    }

    #[test]
    fn test_hover_when_idle_is_ignored() {
        let mut c = controller();
        assert!(c.hover(GroundPoint::new(1.0, 1.0)).is_ignored());
        assert_eq!(c.last_point(), Some(GroundPoint::new(1.0, 1.0)));
    }

    #[test]
    fn test_begin_place_uses_last_pointer_position() {
        let mut c = controller();
        c.hover(GroundPoint::new(3.3, 3.3));
        c.begin_place(HOUSE);

        let preview = c.session().preview().unwrap();
        assert_eq!(preview.center, Position::new(3.5, 0.0, 3.5));
    }

    #[test]
    fn test_blocked_confirm_changes_nothing() {
        let mut c = controller();
        place(&mut c, SHOP, 5.0, 3.0);
        c.begin_place(HOUSE);
        c.hover(GroundPoint::new(9.0, 9.0));
        let before = c.snapshot();

        let outcome = c.confirm(GroundPoint::new(5.5, 3.5), PointerButton::Primary);

        assert!(matches!(outcome, Outcome::Rejected(Rejection::Blocked { .. })));
        assert_eq!(c.snapshot(), before);
    }

    #[test]
    fn test_secondary_click_cancels() {
        let mut c = controller();
        c.begin_place(HOUSE);

        let outcome = c.confirm(GroundPoint::new(0.5, 0.5), PointerButton::Secondary);
        assert_eq!(outcome, Outcome::Cancelled);
        assert!(c.session().is_idle());
        assert_eq!(c.store().len(), 0);
    }

    #[test]
    fn test_switch_type_while_placing() {
        let mut c = controller();
        c.begin_place(HOUSE);

        assert_eq!(c.begin_place(SHOP), Outcome::Switched(SHOP));
        assert_eq!(c.begin_place(SHOP), Outcome::Ignored);
        assert_eq!(c.session().placing_type(), Some(SHOP));
    }

    #[test]
    fn test_pickup_only_when_idle() {
        let mut c = controller();
        let id = place(&mut c, HOUSE, 0.5, 0.5);
        c.begin_place(HOUSE);

        assert!(c.pickup(id).is_ignored());
        assert!(c.store().contains(id));
    }

    #[test]
    fn test_pickup_unknown_is_ignored() {
        let mut c = controller();
        assert!(c.pickup(ObjectId(77)).is_ignored());
        assert!(c.session().is_idle());
    }

    #[test]
    fn test_pickup_selects_and_previews_in_place() {
        let mut c = PlacementController::new(
            catalog(),
            PlacementConfig::default(),
            StaticAssetBounds::new(),
        )
        .with_objects([PlacedObject::new(ObjectId(4), SHOP, Position::new(2.0, 0.0, 2.0))])
        .unwrap();

        assert_eq!(c.pickup(ObjectId(4)), Outcome::Lifted(ObjectId(4)));
        assert_eq!(c.selected(), Some(ObjectId(4)));

        // No pointer seen yet: the ghost sits on the object itself.
        let preview = c.session().preview().unwrap();
        assert_eq!(preview.center, Position::new(2.0, 0.0, 2.0));
        assert!(preview.valid);
    }

    #[test]
    fn test_drop_keeps_rotation_and_id() {
        let mut c = controller()
            .with_objects([PlacedObject::new(ObjectId(1), HOUSE, Position::new(0.5, 0.0, 0.5))
                .with_rotation(1.25)])
            .unwrap();

        c.pickup(ObjectId(1));
        assert_eq!(
            c.confirm(GroundPoint::new(4.1, 4.1), PointerButton::Primary),
            Outcome::Dropped(ObjectId(1))
        );

        let moved = c.store().get(ObjectId(1)).unwrap();
        assert_eq!(moved.position, Position::new(4.5, 0.0, 4.5));
        assert_eq!(moved.rotation, 1.25);
        assert_eq!(c.selected(), None);
    }

    #[test]
    fn test_begin_place_while_lifted_rolls_back() {
        let mut c = controller();
        let id = place(&mut c, SHOP, 5.0, 3.0);
        let before = c.snapshot();

        c.pickup(id);
        c.hover(GroundPoint::new(20.0, 20.0));
        assert_eq!(c.begin_place(HOUSE), Outcome::Started(HOUSE));

        assert_eq!(c.store().objects(), &before.objects);
        assert_eq!(c.session().placing_type(), Some(HOUSE));
    }

    #[test]
    fn test_delete_other_object_while_lifted() {
        let mut c = controller();
        let a = place(&mut c, HOUSE, 0.5, 0.5);
        let b = place(&mut c, HOUSE, 1.5, 0.5);
        let d = place(&mut c, HOUSE, 2.5, 0.5);

        c.pickup(d);
        assert_eq!(c.delete(a), Outcome::Deleted(a));
        assert_eq!(c.session().lifted_id(), Some(d));

        // Rollback lands after b, where d was relative to the survivors.
        assert_eq!(c.cancel(), Outcome::RolledBack(d));
        let ids: Vec<_> = c.placed().map(|o| o.id).collect();
        assert_eq!(ids, vec![b, d]);
    }

    #[test]
    fn test_delete_frees_cells_for_preview() {
        let mut c = controller();
        let blocker = place(&mut c, HOUSE, 0.5, 0.5);
        c.begin_place(HOUSE);
        c.hover(GroundPoint::new(0.5, 0.5));
        assert!(!c.session().preview().unwrap().valid);

        c.delete(blocker);
        assert!(c.session().preview().unwrap().valid);
        assert_eq!(c.session().placing_type(), Some(HOUSE));
    }

    #[test]
    fn test_delete_selected_via_key() {
        let mut c = controller();
        let id = place(&mut c, HOUSE, 0.5, 0.5);

        assert!(c.handle_key(KeySignal::Delete).is_ignored());
        assert!(c.select(Some(id)));
        assert_eq!(c.handle_key(KeySignal::Delete), Outcome::Deleted(id));
        assert_eq!(c.selected(), None);
        assert!(c.occupancy().is_empty());
    }

    #[test]
    fn test_escape_cancels() {
        let mut c = controller();
        c.begin_place(SHOP);
        assert_eq!(c.dispatch(InputEvent::Key(KeySignal::Escape)), Outcome::Cancelled);
        assert!(c.cancel().is_ignored());
    }

    #[test]
    fn test_hover_highlight_rules() {
        let mut c = controller();
        let id = place(&mut c, HOUSE, 0.5, 0.5);

        assert!(c.set_hovered(Some(id)));
        assert_eq!(c.hovered(), Some(id));
        assert!(!c.set_hovered(Some(ObjectId(99))));
        assert_eq!(c.hovered(), None);

        c.begin_place(HOUSE);
        assert!(!c.set_hovered(Some(id)));
        assert!(!c.select(Some(id)));
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        let mut c = PlacementController::new(
            catalog(),
            PlacementConfig::default().with_bounds(GridBounds::new(Cell::new(0, 0), Cell::new(4, 4))),
            StaticAssetBounds::new(),
        );
        c.begin_place(SHOP);

        // 2×2 centered on (0, 0) pokes into negative cells.
        assert_eq!(
            c.confirm(GroundPoint::new(0.2, 0.2), PointerButton::Primary),
            Outcome::Rejected(Rejection::OutOfBounds)
        );
        assert!(matches!(
            c.confirm(GroundPoint::new(1.2, 1.2), PointerButton::Primary),
            Outcome::Placed(_)
        ));
    }

    #[test]
    fn test_pending_asset_blocks_commit_until_loaded() {
        let mut c = controller();
        c.begin_place(BUGGY);

        let Outcome::Previewed(preview) = c.hover(GroundPoint::new(3.7, 0.2)) else {
            panic!("expected preview");
        };
        assert!(preview.provisional);
        assert_eq!(preview.footprint, Footprint::UNIT);

        assert_eq!(
            c.confirm(GroundPoint::new(3.7, 0.2), PointerButton::Primary),
            Outcome::Rejected(Rejection::FootprintPending(BUGGY))
        );
        assert!(c.store().is_empty());

        // 30 * 0.05 = 1.5 → 2 wide, 25 * 0.05 = 1.25 → 2 deep.
        c.resolver_mut()
            .loader_mut()
            .insert(AssetRef::new("buggy.glb"), BoundingBox::with_size(30.0, 10.0, 25.0));
        let Outcome::Previewed(settled) = c.refresh() else {
            panic!("expected preview");
        };
        assert!(!settled.provisional);
        assert_eq!(settled.footprint, Footprint::new(2, 2));

        let Outcome::Placed(id) = c.confirm(GroundPoint::new(3.7, 0.2), PointerButton::Primary) else {
            panic!("expected placement");
        };
        assert_eq!(c.store().get(id).unwrap().footprint, Some(Footprint::new(2, 2)));
        assert_eq!(c.occupancy().len(), 4);
    }

    #[test]
    fn test_seed_errors() {
        let dup = controller().with_objects([
            PlacedObject::new(ObjectId(1), HOUSE, Position::new(0.5, 0.0, 0.5)),
            PlacedObject::new(ObjectId(1), HOUSE, Position::new(5.5, 0.0, 5.5)),
        ]);
        assert!(matches!(dup, Err(SeedError::DuplicateId(ObjectId(1)))));

        let overlap = controller().with_objects([
            PlacedObject::new(ObjectId(1), SHOP, Position::new(1.0, 0.0, 1.0)),
            PlacedObject::new(ObjectId(2), HOUSE, Position::new(0.5, 0.0, 0.5)),
        ]);
        assert!(matches!(overlap, Err(SeedError::Overlap { id: ObjectId(2), .. })));

        let unknown = controller()
            .with_objects([PlacedObject::new(ObjectId(1), ObjectTypeId(50), Position::default())]);
        assert!(matches!(unknown, Err(SeedError::UnknownType { .. })));
    }

    #[test]
    fn test_seeded_ids_are_not_reused() {
        let mut c = controller()
            .with_objects([PlacedObject::new(ObjectId(9), HOUSE, Position::new(0.5, 0.0, 0.5))])
            .unwrap();

        assert_eq!(place(&mut c, HOUSE, 3.5, 3.5), ObjectId(10));
    }

    #[test]
    fn test_far_off_pointer_is_out_of_bounds() {
        let mut c = controller();
        c.begin_place(SHOP);

        let Outcome::Previewed(preview) = c.hover(GroundPoint::new(3.0e9, 0.0)) else {
            panic!("expected preview");
        };
        assert!(!preview.valid);
        assert!(!preview.in_bounds);
        assert!(preview.cells.is_empty());
        assert_eq!(
            c.confirm(GroundPoint::new(3.0e9, 0.0), PointerButton::Primary),
            Outcome::Rejected(Rejection::OutOfBounds)
        );
        assert_eq!(
            c.confirm(GroundPoint::new(f32::NAN, 0.0), PointerButton::Primary),
            Outcome::Rejected(Rejection::OutOfBounds)
        );
        assert!(c.store().is_empty());
    }

    #[test]
    fn test_distant_points_do_not_share_a_cell() {
        let mut c = controller();
        c.begin_place(HOUSE);
        assert_eq!(
            c.confirm(GroundPoint::new(3.0e9, 0.5), PointerButton::Primary),
            Outcome::Rejected(Rejection::OutOfBounds)
        );
        assert_eq!(
            c.confirm(GroundPoint::new(5.0e9, 0.5), PointerButton::Primary),
            Outcome::Rejected(Rejection::OutOfBounds)
        );
        assert!(c.occupancy().is_empty());
    }

    #[test]
    fn test_max_seeded_id_exhausts_allocator() {
        let top = ObjectId(u32::MAX);
        let mut c = controller()
            .with_objects([PlacedObject::new(top, HOUSE, Position::new(0.5, 0.0, 0.5))])
            .unwrap();

        c.begin_place(HOUSE);
        assert_eq!(
            c.confirm(GroundPoint::new(3.5, 3.5), PointerButton::Primary),
            Outcome::Rejected(Rejection::IdsExhausted)
        );
        assert_eq!(c.store().len(), 1);
        c.cancel();

        // Existing objects still move.
        assert_eq!(c.pickup(top), Outcome::Lifted(top));
        assert_eq!(
            c.confirm(GroundPoint::new(6.5, 6.5), PointerButton::Primary),
            Outcome::Dropped(top)
        );
        assert_eq!(c.check_invariants(), Ok(()));
    }

    #[test]
    fn test_zero_footprint_seed_is_refused() {
        let json = r#"{"id":1,"type_id":1,"position":{"x":5.0,"y":0.0,"z":3.0},"rotation":0.0,"footprint":{"width":0,"depth":0}}"#;
        assert!(serde_json::from_str::<PlacedObject>(json).is_err());

        // With the footprint gone the shop falls back to its catalog size
        // and still blocks the house.
        let json = r#"{"id":1,"type_id":1,"position":{"x":5.0,"y":0.0,"z":3.0},"rotation":0.0}"#;
        let shop: PlacedObject = serde_json::from_str(json).unwrap();
        let mut c = controller().with_objects([shop]).unwrap();
        c.begin_place(HOUSE);
        assert_eq!(
            c.confirm(GroundPoint::new(5.5, 3.5), PointerButton::Primary),
            Outcome::Rejected(Rejection::Blocked {
                by: [ObjectId(1)].into_iter().collect()
            })
        );
    }

    #[test]
    fn test_seed_off_grid_is_out_of_bounds() {
        let lost = controller().with_objects([PlacedObject::new(
            ObjectId(1),
            HOUSE,
            Position::new(f32::NAN, 0.0, 0.5),
        )]);
        assert!(matches!(lost, Err(SeedError::OutOfBounds(ObjectId(1)))));
    }

    #[test]
    fn test_invariants_hold_after_mixed_session() {
        let mut c = controller();
        let a = place(&mut c, SHOP, 0.0, 0.0);
        let b = place(&mut c, HOUSE, 4.5, 4.5);
        c.pickup(a);
        c.confirm(GroundPoint::new(10.0, 10.0), PointerButton::Primary);
        c.pickup(b);
        c.delete(b);

        assert_eq!(c.check_invariants(), Ok(()));
        assert_eq!(c.occupancy().len(), 4);
    }
}
