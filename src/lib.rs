//! # grid-placement
//!
//! A grid-based object placement engine for city-builder style editors.
//!
//! ## Design Principles
//!
//! 1. **Single Writer**: `PlacementController` is the only component that
//!    mutates placement state. Everything else reads.
//!
//! 2. **Derived Occupancy**: The cell index is always reproducible from the
//!    placed list. It is updated incrementally and checked against a full
//!    rebuild in debug builds.
//!
//! 3. **Refusals Are Values**: A blocked placement is an `Outcome`, not an
//!    error. Nothing changes when an action is refused.
//!
//! ## Architecture
//!
//! - **Integer Footprints**: Every object covers a `width × depth` block of
//!   unit cells. Model-backed footprints come from the model's scaled
//!   bounding box, resolved once and cached.
//!
//! - **Persistent Placed List**: The placed list is an `im::Vector`, so
//!   snapshots for rendering are O(1).
//!
//! ## Modules
//!
//! - `core`: ids, geometry and configuration
//! - `catalog`: placeable object types
//! - `footprint`: asset bounds → cell footprint
//! - `grid`: snapping and the occupancy index
//! - `placement`: store, session and the placement state machine

pub mod core;
pub mod catalog;
pub mod footprint;
pub mod grid;
pub mod placement;

// Re-export commonly used types
pub use crate::core::{
    AssetRef, ObjectId, ObjectTypeId,
    Cell, Footprint, GridBounds, GroundPoint, Position,
    PlacementConfig, ZeroFootprint,
};

pub use crate::catalog::{Catalog, CatalogError, ObjectDef};

pub use crate::footprint::{
    AssetBounds, BoundingBox, BoundsQuery, StaticAssetBounds,
    FootprintResolver, ResolvedFootprint,
};

pub use crate::grid::{footprint_cells, snap, CellList, InsertError, OccupancyIndex, OwnerList};

pub use crate::placement::{
    PlacedObject, PlacementStore, StoreSnapshot,
    Session, Preview, Outcome, Rejection,
    InputEvent, KeySignal, PointerButton,
    PlacementController, SeedError, InvariantViolation,
};
