//! Engine configuration.
//!
//! Games configure the engine at startup via `PlacementConfig`. Nothing
//! here changes during a session.

use serde::{Deserialize, Serialize};

use super::geometry::{Footprint, GridBounds};

/// Placement engine configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacementConfig {
    /// Footprint used while an asset's bounding box is still loading,
    /// and after an asset load has failed.
    pub default_footprint: Footprint,

    /// Height (Y) at which placed objects stand.
    pub ground_height: f32,

    /// Buildable area. `None` means the plane is unbounded.
    pub bounds: Option<GridBounds>,

    /// Re-verify the occupancy index against a full rebuild after every
    /// mutation. Expensive; on by default in debug builds only.
    pub check_invariants: bool,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            default_footprint: Footprint::UNIT,
            ground_height: 0.0,
            bounds: None,
            check_invariants: cfg!(debug_assertions),
        }
    }
}

impl PlacementConfig {
    /// Set the provisional footprint for unresolved assets.
    #[must_use]
    pub fn with_default_footprint(mut self, footprint: Footprint) -> Self {
        self.default_footprint = footprint;
        self
    }

    /// Set the ground height for placed objects.
    #[must_use]
    pub fn with_ground_height(mut self, y: f32) -> Self {
        self.ground_height = y;
        self
    }

    /// Restrict placement to a cell rectangle.
    #[must_use]
    pub fn with_bounds(mut self, bounds: GridBounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Enable or disable the post-mutation invariant check.
    #[must_use]
    pub fn with_invariant_checks(mut self, enabled: bool) -> Self {
        self.check_invariants = enabled;
        self
    }
}
