//! Snapping continuous points to footprint-aware cell centers.
//!
//! Per axis: `snapped = floor(p) + (0.5 if the dimension is odd else 0)`.
//! Odd extents sit centered in a cell, even extents straddle a grid line,
//! so a 1×1 object's center is always a half-integer and a 2×2 object's
//! center is always an integer.
//!
//! ```
//! use grid_placement::core::{Footprint, GroundPoint};
//! use grid_placement::grid::snap;
//!
//! let p = GroundPoint::new(5.3, 3.7);
//! assert_eq!(snap(p, Footprint::new(1, 1)), GroundPoint::new(5.5, 3.5));
//! assert_eq!(snap(p, Footprint::new(2, 2)), GroundPoint::new(5.0, 3.0));
//! ```

use smallvec::SmallVec;

use crate::core::geometry::round_half_up;
use crate::core::{Cell, Footprint, GroundPoint};

/// Cells covered by one object. Inline for footprints up to 2×2.
pub type CellList = SmallVec<[Cell; 4]>;

/// Snap `point` to the center an object of `footprint` would take.
#[must_use]
pub fn snap(point: GroundPoint, footprint: Footprint) -> GroundPoint {
    GroundPoint {
        x: snap_axis(point.x, footprint.width()),
        z: snap_axis(point.z, footprint.depth()),
    }
}

fn snap_axis(v: f32, extent: u32) -> f32 {
    let offset = if extent % 2 == 1 { 0.5 } else { 0.0 };
    v.floor() + offset
}

/// First (lowest-coordinate) cell of an object centered at `center`.
///
/// `None` when `center` is not finite or the cell is outside `i32`.
#[must_use]
pub fn origin_cell(center: GroundPoint, footprint: Footprint) -> Option<Cell> {
    Some(Cell::new(
        round_half_up(center.x - footprint.width() as f32 / 2.0)?,
        round_half_up(center.z - footprint.depth() as f32 / 2.0)?,
    ))
}

/// Every cell an object centered at `center` covers, X-major.
///
/// `None` when any of those cells does not fit the integer grid: the
/// center is NaN or infinite, or the footprint runs past `i32`.
///
/// ```
/// use grid_placement::core::{Cell, Footprint, GroundPoint};
/// use grid_placement::grid::footprint_cells;
///
/// let cells = footprint_cells(GroundPoint::new(5.0, 3.0), Footprint::new(2, 2)).unwrap();
/// assert_eq!(
///     cells.as_slice(),
///     &[Cell::new(4, 2), Cell::new(4, 3), Cell::new(5, 2), Cell::new(5, 3)]
/// );
///
/// assert!(footprint_cells(GroundPoint::new(f32::NAN, 0.0), Footprint::UNIT).is_none());
/// ```
#[must_use]
pub fn footprint_cells(center: GroundPoint, footprint: Footprint) -> Option<CellList> {
    let start = origin_cell(center, footprint)?;
    let last_x = last_coord(start.x, footprint.width())?;
    let last_z = last_coord(start.z, footprint.depth())?;

    let mut cells = CellList::with_capacity(footprint.area());
    for x in start.x..=last_x {
        for z in start.z..=last_z {
            cells.push(Cell::new(x, z));
        }
    }
    Some(cells)
}

/// Last coordinate of a run of `extent` cells starting at `start`.
fn last_coord(start: i32, extent: u32) -> Option<i32> {
    start.checked_add(i32::try_from(extent).ok()? - 1)
}
