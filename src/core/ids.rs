//! Identifiers for catalog entries, placed objects and assets.
//!
//! Every placed object has a unique `ObjectId`, allocated by the store and
//! never reused. Every catalog entry has an `ObjectTypeId`. Both are opaque
//! to the engine; games assign meaning via the catalog.
//!
//! ## Usage
//!
//! ```
//! use grid_placement::core::{ObjectId, ObjectTypeId};
//!
//! let house = ObjectTypeId::new(0);
//! let first = ObjectId::FIRST;
//!
//! assert_eq!(first.checked_next(), Some(ObjectId::new(2)));
//! assert_eq!(format!("{house}"), "Type(0)");
//! ```

use serde::{Deserialize, Serialize};

/// Unique identifier for a placed object.
///
/// Ids are stable for the lifetime of a store: lifting and dropping an
/// object keeps its id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

impl ObjectId {
    /// The first id a fresh store hands out.
    pub const FIRST: Self = Self(1);

    /// Create a new object ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// The id allocated after this one, or `None` past `u32::MAX`.
    #[must_use]
    pub const fn checked_next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(next) => Some(Self(next)),
            None => None,
        }
    }
}

impl From<u32> for ObjectId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Object({})", self.0)
    }
}

/// Catalog entry identifier ("house", "shop", ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectTypeId(pub u32);

impl ObjectTypeId {
    /// Create a new type ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for ObjectTypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Type({})", self.0)
    }
}

/// Reference to an external 3D asset, usually a model path.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetRef(pub String);

impl AssetRef {
    /// Create a new asset reference.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// The referenced path.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AssetRef {
    fn from(path: &str) -> Self {
        Self(path.to_string())
    }
}

impl std::fmt::Display for AssetRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
