//! Asset bounding-box queries.
//!
//! The asset loader is an external collaborator. The engine only asks it
//! one question: how big is this model? Loads are asynchronous, so the
//! answer may be "not yet".

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::AssetRef;

/// Axis-aligned bounding box of an unscaled model, Y up.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl BoundingBox {
    #[must_use]
    pub const fn new(min: [f32; 3], max: [f32; 3]) -> Self {
        Self { min, max }
    }

    /// A box of the given size centered on the origin in X/Z, resting on Y=0.
    #[must_use]
    pub fn with_size(x: f32, y: f32, z: f32) -> Self {
        Self {
            min: [-x / 2.0, 0.0, -z / 2.0],
            max: [x / 2.0, y, z / 2.0],
        }
    }

    /// Edge lengths.
    #[must_use]
    pub fn size(&self) -> [f32; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }

    /// Box center.
    #[must_use]
    pub fn center(&self) -> [f32; 3] {
        [
            (self.min[0] + self.max[0]) / 2.0,
            (self.min[1] + self.max[1]) / 2.0,
            (self.min[2] + self.max[2]) / 2.0,
        ]
    }

    /// The box scaled uniformly about the model origin.
    #[must_use]
    pub fn scaled(&self, scale: f32) -> Self {
        Self {
            min: self.min.map(|v| v * scale),
            max: self.max.map(|v| v * scale),
        }
    }
}

/// Answer to a bounding-box query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BoundsQuery {
    /// The asset is loaded.
    Ready(BoundingBox),
    /// Still loading; ask again later.
    Pending,
    /// The load failed and will not be retried.
    Failed,
}

/// Source of asset bounding boxes (implemented by the asset loader).
pub trait AssetBounds {
    /// Report the unscaled bounding box of `asset`.
    fn bounds(&self, asset: &AssetRef) -> BoundsQuery;
}

impl<T: AssetBounds + ?Sized> AssetBounds for &T {
    fn bounds(&self, asset: &AssetRef) -> BoundsQuery {
        (**self).bounds(asset)
    }
}

/// In-memory bounds table.
///
/// Assets that were never inserted report `Pending`, which is how a load
/// still in flight looks to the engine.
///
/// ```
/// use grid_placement::core::AssetRef;
/// use grid_placement::footprint::{AssetBounds, BoundingBox, BoundsQuery, StaticAssetBounds};
///
/// let mut loader = StaticAssetBounds::new();
/// let house = AssetRef::new("/models/house.glb");
///
/// assert_eq!(loader.bounds(&house), BoundsQuery::Pending);
///
/// loader.insert(house.clone(), BoundingBox::with_size(2.0, 1.0, 2.0));
/// assert!(matches!(loader.bounds(&house), BoundsQuery::Ready(_)));
/// ```
#[derive(Clone, Debug, Default)]
pub struct StaticAssetBounds {
    entries: FxHashMap<AssetRef, Option<BoundingBox>>,
}

impl StaticAssetBounds {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a loaded asset.
    pub fn insert(&mut self, asset: AssetRef, bounds: BoundingBox) {
        self.entries.insert(asset, Some(bounds));
    }

    /// Record a failed load.
    pub fn mark_failed(&mut self, asset: AssetRef) {
        self.entries.insert(asset, None);
    }

    /// Forget an asset, making it pending again.
    pub fn remove(&mut self, asset: &AssetRef) {
        self.entries.remove(asset);
    }
}

impl AssetBounds for StaticAssetBounds {
    fn bounds(&self, asset: &AssetRef) -> BoundsQuery {
        match self.entries.get(asset) {
            Some(Some(bounds)) => BoundsQuery::Ready(*bounds),
            Some(None) => BoundsQuery::Failed,
            None => BoundsQuery::Pending,
        }
    }
}
