//! Footprint resolution: object type (+ visual scale) → integer cell extent.
//!
//! ## Key Types
//!
//! - `AssetBounds`: trait implemented by the asset loader
//! - `BoundsQuery`: ready / pending / failed answer from the loader
//! - `StaticAssetBounds`: in-memory loader for preloaded sizes and tests
//! - `FootprintResolver`: memoizing resolver
//! - `ResolvedFootprint`: footprint plus provisional flag and render hints

mod bounds;
mod resolver;

pub use bounds::{AssetBounds, BoundingBox, BoundsQuery, StaticAssetBounds};
pub use resolver::{FootprintResolver, ResolvedFootprint};
