//! Object catalog: the static set of things a player can place.
//!
//! Catalogs are **game-configured**. Build one in code, load it from JSON,
//! or start from [`Catalog::starter`].
//!
//! ## Key Types
//!
//! - `ObjectDef`: immutable definition (label, size, asset, scale, color)
//! - `Catalog`: validated registry keyed by `ObjectTypeId`

pub mod definition;
pub mod registry;

pub use definition::ObjectDef;
pub use registry::Catalog;

use thiserror::Error;

use crate::core::ObjectTypeId;

/// Reasons a catalog cannot be built.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Duplicate object type: {0}")]
    DuplicateType(ObjectTypeId),

    #[error("Object type {0} has a zero-sized footprint")]
    ZeroFootprint(ObjectTypeId),

    #[error("Object type {0} has invalid scale {1}")]
    InvalidScale(ObjectTypeId, f32),
}
