//! Placed objects - runtime instances on the grid.
//!
//! A `PlacedObject` is an instance of an `ObjectDef`. The definition holds
//! static properties; the instance holds where it stands and the footprint
//! it was created with.

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::core::{Footprint, ObjectId, ObjectTypeId, Position};

/// An object standing on the grid.
///
/// ## Example
///
/// ```
/// use grid_placement::catalog::{Catalog, ObjectDef};
/// use grid_placement::core::{Footprint, ObjectId, ObjectTypeId, Position};
/// use grid_placement::placement::PlacedObject;
///
/// let mut catalog = Catalog::new();
/// catalog.register(ObjectDef::new(ObjectTypeId::new(0), "Shop", 2, 2)).unwrap();
///
/// let shop = PlacedObject::new(ObjectId::new(1), ObjectTypeId::new(0), Position::new(5.0, 0.0, 3.0));
/// assert_eq!(shop.effective_footprint(&catalog), Footprint::new(2, 2));
///
/// // A captured footprint wins over the catalog.
/// let resized = shop.with_footprint(Footprint::new(3, 1));
/// assert_eq!(resized.effective_footprint(&catalog), Footprint::new(3, 1));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacedObject {
    /// Stable identity.
    pub id: ObjectId,

    /// Catalog entry this is an instance of.
    pub type_id: ObjectTypeId,

    /// Center of the footprint on the ground, at ground height.
    pub position: Position,

    /// Yaw in radians. Carried for rendering; footprints are axis-aligned.
    pub rotation: f32,

    /// Footprint captured at creation. Overrides the catalog.
    #[serde(default)]
    pub footprint: Option<Footprint>,
}

impl PlacedObject {
    /// Create an unrotated object with no captured footprint.
    #[must_use]
    pub fn new(id: ObjectId, type_id: ObjectTypeId, position: Position) -> Self {
        Self {
            id,
            type_id,
            position,
            rotation: 0.0,
            footprint: None,
        }
    }

    /// Capture a footprint (builder pattern).
    #[must_use]
    pub fn with_footprint(mut self, footprint: Footprint) -> Self {
        self.footprint = Some(footprint);
        self
    }

    /// Set the rotation (builder pattern).
    #[must_use]
    pub fn with_rotation(mut self, radians: f32) -> Self {
        self.rotation = radians;
        self
    }

    /// Footprint used for occupancy: the captured one, else the catalog's
    /// static size, else a single cell.
    #[must_use]
    pub fn effective_footprint(&self, catalog: &Catalog) -> Footprint {
        self.footprint
            .or_else(|| catalog.get(self.type_id).map(|def| def.static_footprint()))
            .unwrap_or(Footprint::UNIT)
    }
}
