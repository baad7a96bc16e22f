//! Ground-plane geometry: points, positions, cells and footprints.
//!
//! The world is a continuous XZ plane with Y up. The plane is divided into
//! unit cells; cell `(x, z)` covers `[x, x+1) × [z, z+1)`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A continuous point on the ground plane, as delivered by a pointer ray.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GroundPoint {
    pub x: f32,
    pub z: f32,
}

impl GroundPoint {
    #[must_use]
    pub const fn new(x: f32, z: f32) -> Self {
        Self { x, z }
    }

    /// The cell containing this point, or `None` if the point is not
    /// finite or lies outside the `i32` cell range.
    #[must_use]
    pub fn cell(self) -> Option<Cell> {
        Some(Cell::new(floor_to_cell(self.x)?, floor_to_cell(self.z)?))
    }
}

impl From<(f32, f32)> for GroundPoint {
    fn from((x, z): (f32, f32)) -> Self {
        Self { x, z }
    }
}

/// A world-space position. Objects stand on the ground at `y`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Drop the height component.
    #[must_use]
    pub const fn ground(self) -> GroundPoint {
        GroundPoint { x: self.x, z: self.z }
    }

    /// Lift a ground point to `y`.
    #[must_use]
    pub const fn on_ground(point: GroundPoint, y: f32) -> Self {
        Self { x: point.x, y, z: point.z }
    }
}

impl From<Position> for [f32; 3] {
    fn from(p: Position) -> Self {
        [p.x, p.y, p.z]
    }
}

/// A unit grid cell, addressed by integer coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub z: i32,
}

impl Cell {
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }
}

impl From<(i32, i32)> for Cell {
    fn from((x, z): (i32, i32)) -> Self {
        Self { x, z }
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// Integer cell extent of an object: `width` along X, `depth` along Z.
///
/// Both dimensions are at least 1. Deserializing a zero dimension fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawFootprint")]
pub struct Footprint {
    width: u32,
    depth: u32,
}

/// Unvalidated wire form of a [`Footprint`].
#[derive(Deserialize)]
struct RawFootprint {
    width: u32,
    depth: u32,
}

/// A footprint with a zero dimension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("footprint must be at least 1x1, got {width}x{depth}")]
pub struct ZeroFootprint {
    pub width: u32,
    pub depth: u32,
}

impl TryFrom<RawFootprint> for Footprint {
    type Error = ZeroFootprint;

    fn try_from(raw: RawFootprint) -> Result<Self, Self::Error> {
        Self::try_new(raw.width, raw.depth)
    }
}

impl Footprint {
    /// The single-cell footprint.
    pub const UNIT: Self = Self { width: 1, depth: 1 };

    /// Create a footprint, clamping each dimension to at least 1.
    #[must_use]
    pub fn new(width: u32, depth: u32) -> Self {
        Self {
            width: width.max(1),
            depth: depth.max(1),
        }
    }

    /// Create a footprint, refusing zero dimensions.
    pub fn try_new(width: u32, depth: u32) -> Result<Self, ZeroFootprint> {
        if width == 0 || depth == 0 {
            return Err(ZeroFootprint { width, depth });
        }
        Ok(Self { width, depth })
    }

    /// Cells along X.
    #[must_use]
    pub const fn width(self) -> u32 {
        self.width
    }

    /// Cells along Z.
    #[must_use]
    pub const fn depth(self) -> u32 {
        self.depth
    }

    /// Number of cells covered.
    #[must_use]
    pub const fn area(self) -> usize {
        self.width as usize * self.depth as usize
    }
}

impl Default for Footprint {
    fn default() -> Self {
        Self::UNIT
    }
}

impl std::fmt::Display for Footprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.depth)
    }
}

/// Axis-aligned cell rectangle, `min` inclusive and `max` exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridBounds {
    pub min: Cell,
    pub max: Cell,
}

impl GridBounds {
    #[must_use]
    pub const fn new(min: Cell, max: Cell) -> Self {
        Self { min, max }
    }

    /// A square of `half_extent` cells on each side of the origin.
    ///
    /// ```
    /// use grid_placement::core::{Cell, GridBounds};
    ///
    /// let bounds = GridBounds::centered(50);
    /// assert!(bounds.contains(Cell::new(-50, 49)));
    /// assert!(!bounds.contains(Cell::new(50, 0)));
    /// ```
    #[must_use]
    pub const fn centered(half_extent: i32) -> Self {
        Self {
            min: Cell::new(-half_extent, -half_extent),
            max: Cell::new(half_extent, half_extent),
        }
    }

    #[must_use]
    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= self.min.x && cell.x < self.max.x && cell.z >= self.min.z && cell.z < self.max.z
    }
}

/// Round to nearest, ties toward positive infinity.
///
/// Snapped centers never produce ties; this only matters for positions
/// seeded from outside the snapper. `None` when the result is not a valid
/// cell coordinate.
#[must_use]
pub(crate) fn round_half_up(v: f32) -> Option<i32> {
    floor_to_cell(v + 0.5)
}

/// `floor(v)` as a cell coordinate. `None` for NaN, infinities and values
/// outside `i32`.
#[must_use]
pub(crate) fn floor_to_cell(v: f32) -> Option<i32> {
    // 2^31 is the first f32 past i32::MAX.
    const LIMIT: f32 = 2_147_483_648.0;

    let floored = v.floor();
    if floored.is_finite() && (-LIMIT..LIMIT).contains(&floored) {
        Some(floored as i32)
    } else {
        None
    }
}
