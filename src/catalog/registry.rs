//! Catalog of object definitions.
//!
//! The `Catalog` stores every `ObjectDef` a game offers. It is read-only
//! once handed to the controller.

use rustc_hash::FxHashMap;

use super::definition::ObjectDef;
use super::CatalogError;
use crate::core::ObjectTypeId;

/// Registry of object definitions.
///
/// ## Example
///
/// ```
/// use grid_placement::catalog::{Catalog, ObjectDef};
/// use grid_placement::core::ObjectTypeId;
///
/// let mut catalog = Catalog::new();
/// catalog.register(ObjectDef::new(ObjectTypeId::new(0), "House", 1, 1)).unwrap();
///
/// let found = catalog.get(ObjectTypeId::new(0)).unwrap();
/// assert_eq!(found.label, "House");
/// ```
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    defs: FxHashMap<ObjectTypeId, ObjectDef>,
}

impl Catalog {
    /// Create a new empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from a JSON array of definitions.
    ///
    /// ```
    /// use grid_placement::catalog::Catalog;
    ///
    /// let catalog = Catalog::from_json(r#"[
    ///     { "type_id": 0, "label": "House", "width": 1, "depth": 1 },
    ///     { "type_id": 1, "label": "Shop", "width": 2, "depth": 2,
    ///       "asset": "/models/shop.glb", "scale": 0.5 }
    /// ]"#).unwrap();
    ///
    /// assert_eq!(catalog.len(), 2);
    /// ```
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let defs: Vec<ObjectDef> = serde_json::from_str(json)?;
        Self::from_defs(defs)
    }

    /// Build a catalog from definitions, validating each.
    pub fn from_defs(defs: impl IntoIterator<Item = ObjectDef>) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();
        for def in defs {
            catalog.register(def)?;
        }
        Ok(catalog)
    }

    /// The three entries of the stock city-builder toolbar.
    ///
    /// The road (a buggy model) declares 1×1 but expects its real size to
    /// come from the asset.
    #[must_use]
    pub fn starter() -> Self {
        let mut defs = FxHashMap::default();
        for def in [
            ObjectDef::new(ObjectTypeId::new(0), "Forest House", 1, 1)
                .with_asset("/models/forest_house.glb")
                .with_scale(0.5)
                .with_color("#4287f5"),
            ObjectDef::new(ObjectTypeId::new(1), "Factory (Avocado)", 2, 2)
                .with_asset("/models/futuristic_building-transformed.glb")
                .with_scale(0.5)
                .with_color("#e06c75"),
            ObjectDef::new(ObjectTypeId::new(2), "Vehicle (Buggy)", 1, 1)
                .with_asset("/models/buggy.glb")
                .with_scale(0.05)
                .with_color("#333333"),
        ] {
            defs.insert(def.type_id, def);
        }
        Self { defs }
    }

    /// Register a definition.
    ///
    /// Rejects duplicate ids, zero-sized footprints and non-positive or
    /// non-finite scales.
    pub fn register(&mut self, def: ObjectDef) -> Result<(), CatalogError> {
        if self.defs.contains_key(&def.type_id) {
            return Err(CatalogError::DuplicateType(def.type_id));
        }
        if def.width == 0 || def.depth == 0 {
            return Err(CatalogError::ZeroFootprint(def.type_id));
        }
        if !def.scale.is_finite() || def.scale <= 0.0 {
            return Err(CatalogError::InvalidScale(def.type_id, def.scale));
        }
        self.defs.insert(def.type_id, def);
        Ok(())
    }

    /// Get a definition by ID.
    #[must_use]
    pub fn get(&self, id: ObjectTypeId) -> Option<&ObjectDef> {
        self.defs.get(&id)
    }

    /// Check if a type ID is registered.
    #[must_use]
    pub fn contains(&self, id: ObjectTypeId) -> bool {
        self.defs.contains_key(&id)
    }

    /// Get the number of registered definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Iterate over all definitions in type-id order.
    pub fn iter(&self) -> impl Iterator<Item = &ObjectDef> {
        let mut defs: Vec<_> = self.defs.values().collect();
        defs.sort_by_key(|d| d.type_id);
        defs.into_iter()
    }
}
