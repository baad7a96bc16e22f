//! Core engine types: identifiers, ground geometry, configuration.
//!
//! This module contains the fundamental building blocks shared by every
//! other component. Games configure the engine via `PlacementConfig`
//! rather than modifying the core.

pub mod ids;
pub mod geometry;
pub mod config;

pub use ids::{AssetRef, ObjectId, ObjectTypeId};
pub use geometry::{Cell, Footprint, GridBounds, GroundPoint, Position, ZeroFootprint};
pub use config::PlacementConfig;
