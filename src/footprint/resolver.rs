//! Footprint resolution with per-asset memoization.
//!
//! Primitive objects use the catalog's width/depth. Model-backed objects
//! take theirs from the model's bounding box:
//! `width = ceil(size.x * scale)`, `depth = ceil(size.z * scale)`.
//!
//! Bounding boxes arrive asynchronously. Until one does, the resolver hands
//! out the default footprint flagged `pending`; pending answers are never
//! cached, so the next query asks the loader again.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::bounds::{AssetBounds, BoundsQuery};
use crate::catalog::ObjectDef;
use crate::core::{AssetRef, Footprint};

/// Result of a footprint query.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResolvedFootprint {
    /// Cell extent to use for collision.
    pub footprint: Footprint,

    /// True while the asset is still loading. A pending footprint may
    /// drive a preview but never a committed placement.
    pub pending: bool,

    /// Scaled model size, when known. Rendering only.
    pub size: Option<[f32; 3]>,

    /// Translation that centers the scaled model on its origin in X/Z and
    /// rests its base on Y=0. Rendering only.
    pub offset: Option<[f32; 3]>,
}

impl ResolvedFootprint {
    /// A settled footprint with no model geometry attached.
    #[must_use]
    pub const fn fixed(footprint: Footprint) -> Self {
        Self {
            footprint,
            pending: false,
            size: None,
            offset: None,
        }
    }

    /// A provisional footprint for an asset still in flight.
    #[must_use]
    pub const fn provisional(footprint: Footprint) -> Self {
        Self {
            footprint,
            pending: true,
            size: None,
            offset: None,
        }
    }
}

/// Memoizing footprint resolver.
///
/// Owns the asset-bounds collaborator so the cache and its source can
/// never drift apart.
///
/// ```
/// use grid_placement::core::{AssetRef, Footprint};
/// use grid_placement::footprint::{BoundingBox, FootprintResolver, StaticAssetBounds};
///
/// let mut resolver = FootprintResolver::new(StaticAssetBounds::new(), Footprint::UNIT);
/// let shop = AssetRef::new("/models/shop.glb");
///
/// // Not loaded yet: provisional 1×1.
/// let first = resolver.resolve(&shop, 0.5);
/// assert!(first.pending);
/// assert_eq!(first.footprint, Footprint::UNIT);
///
/// // Loaded: 5 × 0.5 = 2.5 → 3 cells wide, 3 × 0.5 = 1.5 → 2 deep.
/// resolver.loader_mut().insert(shop.clone(), BoundingBox::with_size(5.0, 2.0, 3.0));
/// let settled = resolver.resolve(&shop, 0.5);
/// assert!(!settled.pending);
/// assert_eq!(settled.footprint, Footprint::new(3, 2));
/// ```
#[derive(Debug)]
pub struct FootprintResolver<B> {
    loader: B,
    default_footprint: Footprint,
    cache: FxHashMap<(AssetRef, u32), ResolvedFootprint>,
}

impl<B: AssetBounds> FootprintResolver<B> {
    /// Create a resolver over `loader`. `default_footprint` stands in for
    /// pending and failed assets.
    #[must_use]
    pub fn new(loader: B, default_footprint: Footprint) -> Self {
        Self {
            loader,
            default_footprint,
            cache: FxHashMap::default(),
        }
    }

    /// Resolve the footprint of a catalog entry.
    pub fn footprint_for(&mut self, def: &ObjectDef) -> ResolvedFootprint {
        match &def.asset {
            Some(asset) => self.resolve(asset, def.scale),
            None => ResolvedFootprint::fixed(def.static_footprint()),
        }
    }

    /// Resolve the footprint of a model at `scale`.
    ///
    /// Each distinct `(asset, scale)` pair is computed at most once.
    pub fn resolve(&mut self, asset: &AssetRef, scale: f32) -> ResolvedFootprint {
        let key = (asset.clone(), scale.to_bits());
        if let Some(hit) = self.cache.get(&key) {
            return *hit;
        }

        let resolved = match self.loader.bounds(asset) {
            BoundsQuery::Pending => return ResolvedFootprint::provisional(self.default_footprint),
            BoundsQuery::Failed => {
                warn!(%asset, "asset failed to load, using default footprint {}", self.default_footprint);
                ResolvedFootprint::fixed(self.default_footprint)
            }
            BoundsQuery::Ready(bounds) => {
                let size = bounds.size().map(|v| v * scale);
                let center = bounds.center().map(|v| v * scale);
                let min_y = bounds.min[1] * scale;

                let footprint = Footprint::new(cells_for(size[0]), cells_for(size[2]));
                debug!(%asset, scale, %footprint, "resolved asset footprint");

                ResolvedFootprint {
                    footprint,
                    pending: false,
                    size: Some(size),
                    offset: Some([-center[0], -min_y, -center[2]]),
                }
            }
        };

        self.cache.insert(key, resolved);
        resolved
    }

    /// Check whether `(asset, scale)` has a settled, cached answer.
    #[must_use]
    pub fn is_cached(&self, asset: &AssetRef, scale: f32) -> bool {
        self.cache.contains_key(&(asset.clone(), scale.to_bits()))
    }

    /// Number of settled entries.
    #[must_use]
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    /// Drop every cached answer.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// The footprint used for pending and failed assets.
    #[must_use]
    pub fn default_footprint(&self) -> Footprint {
        self.default_footprint
    }

    /// The bounds collaborator.
    #[must_use]
    pub fn loader(&self) -> &B {
        &self.loader
    }

    /// Mutable access to the bounds collaborator, e.g. to report a
    /// finished load.
    pub fn loader_mut(&mut self) -> &mut B {
        &mut self.loader
    }
}

/// Whole cells needed to cover `extent` world units (at least one).
fn cells_for(extent: f32) -> u32 {
    if extent.is_finite() && extent > 0.0 {
        extent.ceil() as u32
    } else {
        1
    }
}
