//! Object definitions - static catalog data.
//!
//! `ObjectDef` holds the immutable properties of an object type. For
//! example, "Forest House" is 1×1, backed by a model and drawn blue -
//! these are part of the definition.
//!
//! Instance-specific data (position, rotation, captured footprint) lives
//! in `PlacedObject`.

use serde::{Deserialize, Serialize};

use crate::core::{AssetRef, Footprint, ObjectTypeId};

fn default_scale() -> f32 {
    1.0
}

fn default_color() -> String {
    "#888888".to_string()
}

/// Static object definition.
///
/// ## Example
///
/// ```
/// use grid_placement::catalog::ObjectDef;
/// use grid_placement::core::{Footprint, ObjectTypeId};
///
/// let shop = ObjectDef::new(ObjectTypeId::new(1), "Factory", 2, 2)
///     .with_asset("/models/factory.glb")
///     .with_scale(0.5)
///     .with_color("#e06c75");
///
/// assert_eq!(shop.static_footprint(), Footprint::new(2, 2));
/// assert!(shop.asset.is_some());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjectDef {
    /// Unique identifier for this definition.
    pub type_id: ObjectTypeId,

    /// Display name.
    pub label: String,

    /// Width in grid cells (X). Overridden by the asset size when an
    /// asset is present and resolves.
    pub width: u32,

    /// Depth in grid cells (Z).
    pub depth: u32,

    /// External model backing this object, if any.
    #[serde(default)]
    pub asset: Option<AssetRef>,

    /// Visual scale applied to the asset.
    #[serde(default = "default_scale")]
    pub scale: f32,

    /// Fallback color for primitive rendering.
    #[serde(default = "default_color")]
    pub color: String,
}

impl ObjectDef {
    /// Create a primitive (asset-less) definition.
    #[must_use]
    pub fn new(type_id: ObjectTypeId, label: impl Into<String>, width: u32, depth: u32) -> Self {
        Self {
            type_id,
            label: label.into(),
            width,
            depth,
            asset: None,
            scale: default_scale(),
            color: default_color(),
        }
    }

    /// Attach an external model.
    #[must_use]
    pub fn with_asset(mut self, asset: impl Into<AssetRef>) -> Self {
        self.asset = Some(asset.into());
        self
    }

    /// Set the visual scale.
    #[must_use]
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Set the fallback color.
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// The catalog's own footprint, ignoring any asset.
    #[must_use]
    pub fn static_footprint(&self) -> Footprint {
        Footprint::new(self.width, self.depth)
    }
}
