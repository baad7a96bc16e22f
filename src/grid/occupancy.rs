//! Occupancy index: which object owns which cell.
//!
//! The index is derived data. It can always be rebuilt from the placed
//! objects with [`OccupancyIndex::build`]; the controller instead keeps it
//! up to date incrementally with [`try_insert`](OccupancyIndex::try_insert)
//! and [`remove`](OccupancyIndex::remove), which yields the same mapping.
//!
//! Invariant: every indexed object owns exactly `width × depth` cells and
//! no cell has two owners.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use thiserror::Error;
use tracing::warn;

use super::snap::{footprint_cells, CellList};
use crate::catalog::Catalog;
use crate::core::{Cell, Footprint, GroundPoint, ObjectId};
use crate::placement::PlacedObject;

/// Distinct owners of a set of cells, in first-hit order.
pub type OwnerList = SmallVec<[ObjectId; 2]>;

/// Why [`OccupancyIndex::try_insert`] refused an object.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InsertError {
    #[error("cells already taken by {0:?}")]
    Occupied(OwnerList),

    #[error("{0} is already indexed")]
    AlreadyIndexed(ObjectId),

    #[error("footprint does not fit the integer grid")]
    OffGrid,
}

/// Cell → owner mapping with a reverse per-object cell list.
///
/// ## Usage
///
/// ```
/// use grid_placement::core::{Footprint, GroundPoint, ObjectId};
/// use grid_placement::grid::OccupancyIndex;
///
/// let mut index = OccupancyIndex::new();
/// index
///     .try_insert(ObjectId::new(1), GroundPoint::new(5.0, 3.0), Footprint::new(2, 2))
///     .unwrap();
///
/// assert_eq!(index.len(), 4);
/// assert!(index.would_collide(GroundPoint::new(5.5, 3.5), Footprint::UNIT));
/// assert!(!index.would_collide(GroundPoint::new(6.5, 3.5), Footprint::UNIT));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OccupancyIndex {
    /// Occupied cell -> owner.
    cells: FxHashMap<Cell, ObjectId>,

    /// Owner -> the cells it occupies.
    by_object: FxHashMap<ObjectId, CellList>,
}

impl OccupancyIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from scratch, skipping `exclude`.
    ///
    /// `exclude` is the lifted object's id while a lift is in flight: its
    /// old cells must read as free so it cannot collide with itself.
    /// Objects without a captured footprint fall back to the catalog's
    /// static size.
    pub fn build<'a>(
        objects: impl IntoIterator<Item = &'a PlacedObject>,
        catalog: &Catalog,
        exclude: Option<ObjectId>,
    ) -> Self {
        let mut index = Self::new();
        for object in objects {
            if Some(object.id) == exclude {
                continue;
            }
            let footprint = object.effective_footprint(catalog);
            if let Err(err) = index.try_insert(object.id, object.position.ground(), footprint) {
                warn!(id = %object.id, %err, "object left out of occupancy index");
            }
        }
        index
    }

    /// Check whether any cell of the candidate is taken.
    ///
    /// A candidate that does not fit the integer grid always collides.
    #[must_use]
    pub fn would_collide(&self, center: GroundPoint, footprint: Footprint) -> bool {
        footprint_cells(center, footprint)
            .map_or(true, |cells| cells.iter().any(|cell| self.cells.contains_key(cell)))
    }

    /// Every object the candidate would overlap. Empty for a candidate
    /// that does not fit the integer grid.
    #[must_use]
    pub fn colliders(&self, center: GroundPoint, footprint: Footprint) -> OwnerList {
        footprint_cells(center, footprint)
            .map(|cells| self.owners_of(&cells))
            .unwrap_or_default()
    }

    /// Claim the cells of `id` at `center`.
    ///
    /// All-or-nothing: on any error nothing changes.
    pub fn try_insert(
        &mut self,
        id: ObjectId,
        center: GroundPoint,
        footprint: Footprint,
    ) -> Result<(), InsertError> {
        if self.by_object.contains_key(&id) {
            return Err(InsertError::AlreadyIndexed(id));
        }

        let cells = footprint_cells(center, footprint).ok_or(InsertError::OffGrid)?;
        let by = self.owners_of(&cells);
        if !by.is_empty() {
            return Err(InsertError::Occupied(by));
        }

        for &cell in &cells {
            self.cells.insert(cell, id);
        }
        self.by_object.insert(id, cells);
        Ok(())
    }

    /// Release every cell owned by `id`. Returns whether it was indexed.
    pub fn remove(&mut self, id: ObjectId) -> bool {
        let Some(cells) = self.by_object.remove(&id) else {
            return false;
        };
        for cell in cells {
            self.cells.remove(&cell);
        }
        true
    }

    /// Owner of `cell`, if occupied.
    #[must_use]
    pub fn owner_at(&self, cell: Cell) -> Option<ObjectId> {
        self.cells.get(&cell).copied()
    }

    /// Cells owned by `id`.
    #[must_use]
    pub fn cells_of(&self, id: ObjectId) -> &[Cell] {
        self.by_object.get(&id).map_or(&[], |cells| cells.as_slice())
    }

    /// Check if `id` owns any cells.
    #[must_use]
    pub fn contains_object(&self, id: ObjectId) -> bool {
        self.by_object.contains_key(&id)
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if no cell is occupied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of indexed objects.
    #[must_use]
    pub fn object_count(&self) -> usize {
        self.by_object.len()
    }

    /// Iterate over `(cell, owner)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (Cell, ObjectId)> + '_ {
        self.cells.iter().map(|(&cell, &id)| (cell, id))
    }

    /// Remove everything.
    pub fn clear(&mut self) {
        self.cells.clear();
        self.by_object.clear();
    }

    fn owners_of(&self, cells: &[Cell]) -> OwnerList {
        let mut owners = OwnerList::new();
        for cell in cells {
            if let Some(&owner) = self.cells.get(cell) {
                if !owners.contains(&owner) {
                    owners.push(owner);
                }
            }
        }
        owners
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ObjectDef;
    use crate::core::{ObjectTypeId, Position};

    fn block(id: u32, x: f32, z: f32, fp: Footprint) -> PlacedObject {
        PlacedObject::new(ObjectId(id), ObjectTypeId::new(0), Position::new(x, 0.0, z))
            .with_footprint(fp)
    }

    #[test]
    fn test_two_by_two_cells() {
        let mut index = OccupancyIndex::new();
        index
            .try_insert(ObjectId(1), GroundPoint::new(5.0, 3.0), Footprint::new(2, 2))
            .unwrap();

        let mut cells = index.cells_of(ObjectId(1)).to_vec();
        cells.sort();
        assert_eq!(
            cells,
            vec![Cell::new(4, 2), Cell::new(4, 3), Cell::new(5, 2), Cell::new(5, 3)]
        );
        assert_eq!(index.owner_at(Cell::new(5, 3)), Some(ObjectId(1)));
        assert_eq!(index.owner_at(Cell::new(6, 3)), None);
    }

    #[test]
    fn test_try_insert_is_all_or_nothing() {
        let mut index = OccupancyIndex::new();
        index
            .try_insert(ObjectId(1), GroundPoint::new(0.5, 0.5), Footprint::UNIT)
            .unwrap();

        // 2×2 at (1, 1) covers (0,0)..(1,1) and hits object 1 at (0,0).
        let err = index
            .try_insert(ObjectId(2), GroundPoint::new(1.0, 1.0), Footprint::new(2, 2))
            .unwrap_err();
        assert_eq!(err, InsertError::Occupied(OwnerList::from_slice(&[ObjectId(1)])));
        assert_eq!(index.len(), 1);
        assert!(!index.contains_object(ObjectId(2)));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut index = OccupancyIndex::new();
        index
            .try_insert(ObjectId(1), GroundPoint::new(0.5, 0.5), Footprint::UNIT)
            .unwrap();

        assert_eq!(
            index.try_insert(ObjectId(1), GroundPoint::new(10.5, 10.5), Footprint::UNIT),
            Err(InsertError::AlreadyIndexed(ObjectId(1)))
        );
        assert_eq!(index.object_count(), 1);
    }

    #[test]
    fn test_far_away_cells_do_not_collide() {
        let mut index = OccupancyIndex::new();
        index
            .try_insert(ObjectId(1), GroundPoint::new(2.0e9, 0.5), Footprint::UNIT)
            .unwrap();

        // Past i32: refused outright instead of folding onto the edge cell.
        assert_eq!(
            index.try_insert(ObjectId(2), GroundPoint::new(3.0e9, 0.5), Footprint::UNIT),
            Err(InsertError::OffGrid)
        );
        assert_eq!(
            index.try_insert(ObjectId(3), GroundPoint::new(5.0e9, 0.5), Footprint::UNIT),
            Err(InsertError::OffGrid)
        );
        assert!(index.would_collide(GroundPoint::new(f32::NAN, 0.5), Footprint::UNIT));
        assert!(index.colliders(GroundPoint::new(3.0e9, 0.5), Footprint::UNIT).is_empty());
        assert_eq!(index.object_count(), 1);
    }

    #[test]
    fn test_remove_frees_cells() {
        let mut index = OccupancyIndex::new();
        index
            .try_insert(ObjectId(1), GroundPoint::new(2.0, 2.0), Footprint::new(2, 2))
            .unwrap();

        assert!(index.remove(ObjectId(1)));
        assert!(index.is_empty());
        assert!(!index.remove(ObjectId(1)));
        assert!(!index.would_collide(GroundPoint::new(2.0, 2.0), Footprint::new(2, 2)));
    }

    #[test]
    fn test_colliders_are_distinct() {
        let mut index = OccupancyIndex::new();
        index
            .try_insert(ObjectId(1), GroundPoint::new(0.0, 0.0), Footprint::new(2, 2))
            .unwrap();
        index
            .try_insert(ObjectId(2), GroundPoint::new(2.0, 0.0), Footprint::new(2, 2))
            .unwrap();

        let hits = index.colliders(GroundPoint::new(1.0, 0.0), Footprint::new(2, 2));
        assert_eq!(hits.as_slice(), &[ObjectId(1), ObjectId(2)]);

        let none = index.colliders(GroundPoint::new(10.0, 0.0), Footprint::new(2, 2));
        assert!(none.is_empty());
    }

    #[test]
    fn test_build_excludes_lifted() {
        let catalog = Catalog::new();
        let objects = vec![
            block(1, 5.0, 3.0, Footprint::new(2, 2)),
            block(2, 0.5, 0.5, Footprint::UNIT),
        ];

        let full = OccupancyIndex::build(&objects, &catalog, None);
        assert_eq!(full.len(), 5);

        let without = OccupancyIndex::build(&objects, &catalog, Some(ObjectId(1)));
        assert_eq!(without.len(), 1);
        assert!(!without.would_collide(GroundPoint::new(5.0, 3.0), Footprint::new(2, 2)));
    }

    #[test]
    fn test_build_matches_incremental() {
        let catalog = Catalog::new();
        let objects = vec![
            block(1, 5.0, 3.0, Footprint::new(2, 2)),
            block(2, 0.5, 0.5, Footprint::UNIT),
            block(3, -3.5, 2.0, Footprint::new(3, 4)),
        ];

        let mut incremental = OccupancyIndex::new();
        for o in &objects {
            incremental
                .try_insert(o.id, o.position.ground(), o.effective_footprint(&catalog))
                .unwrap();
        }
        incremental.remove(ObjectId(2));
        incremental
            .try_insert(ObjectId(2), GroundPoint::new(0.5, 0.5), Footprint::UNIT)
            .unwrap();

        assert_eq!(OccupancyIndex::build(&objects, &catalog, None), incremental);
    }

    #[test]
    fn test_build_uses_catalog_when_footprint_missing() {
        let mut catalog = Catalog::new();
        catalog
            .register(ObjectDef::new(ObjectTypeId::new(0), "Shop", 2, 2))
            .unwrap();

        let bare = PlacedObject::new(ObjectId(1), ObjectTypeId::new(0), Position::new(5.0, 0.0, 3.0));
        let index = OccupancyIndex::build([&bare], &catalog, None);

        assert_eq!(index.len(), 4);
    }

    #[test]
    fn test_build_skips_overlapping_input() {
        let catalog = Catalog::new();
        let objects = vec![
            block(1, 0.5, 0.5, Footprint::UNIT),
            block(2, 0.5, 0.5, Footprint::UNIT),
        ];

        let index = OccupancyIndex::build(&objects, &catalog, None);
        assert_eq!(index.len(), 1);
        assert_eq!(index.owner_at(Cell::new(0, 0)), Some(ObjectId(1)));
    }
}
