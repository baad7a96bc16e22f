//! Grid math: snapping and cell occupancy.
//!
//! ## Key Types
//!
//! - `snap`: continuous point + footprint → cell-center coordinate
//! - `footprint_cells`: the cells an object covers
//! - `OccupancyIndex`: occupied cell → owning object

pub mod snap;
pub mod occupancy;

pub use snap::{footprint_cells, origin_cell, snap, CellList};
pub use occupancy::{InsertError, OccupancyIndex, OwnerList};
