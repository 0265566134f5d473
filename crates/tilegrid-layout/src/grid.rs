#![forbid(unsafe_code)]

//! Cell-space geometry and grid dimensions.
//!
//! Cell coordinates are signed so that out-of-range requests (negative
//! origins, zero or negative spans) can be represented and clamped instead
//! of rejected.

use serde::{Deserialize, Serialize};
use tilegrid_core::geometry::{PxRect, Size};

/// A resolved rectangle in cell units: top-left cell plus span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CellRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl CellRect {
    /// Create a new cell rectangle.
    #[inline]
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> i32 {
        self.x.saturating_add(self.w)
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> i32 {
        self.y.saturating_add(self.h)
    }

    /// Check if the rectangle covers no cells.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Check whether two rectangles share at least one cell.
    #[inline]
    pub const fn intersects(&self, other: &CellRect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Same rectangle moved to a new origin.
    #[inline]
    #[must_use]
    pub const fn with_origin(self, x: i32, y: i32) -> Self {
        Self::new(x, y, self.w, self.h)
    }

    /// Same rectangle with a new span.
    #[inline]
    #[must_use]
    pub const fn with_span(self, w: i32, h: i32) -> Self {
        Self::new(self.x, self.y, w, h)
    }
}

/// Clamp `value` into `[lo, hi]`, preferring `hi` when the range is empty.
///
/// Unlike [`Ord::clamp`] this never panics on an inverted range, which
/// happens when a footprint is larger than the grid.
#[inline]
pub(crate) fn clamp_cell(value: i32, lo: i32, hi: i32) -> i32 {
    value.max(lo).min(hi)
}

/// Column/row counts of a panel grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridDims {
    pub columns: u16,
    pub rows: u16,
}

impl GridDims {
    /// Create grid dimensions.
    #[inline]
    pub const fn new(columns: u16, rows: u16) -> Self {
        Self { columns, rows }
    }

    /// Column count as a signed cell coordinate.
    #[inline]
    pub fn cols_i32(self) -> i32 {
        i32::from(self.columns)
    }

    /// Row count as a signed cell coordinate.
    #[inline]
    pub fn rows_i32(self) -> i32 {
        i32::from(self.rows)
    }

    /// Whether either dimension is zero (no tile can be placed).
    #[inline]
    pub const fn is_degenerate(self) -> bool {
        self.columns == 0 || self.rows == 0
    }

    /// Whether the whole rectangle lies inside the grid.
    #[inline]
    pub fn contains(self, rect: &CellRect) -> bool {
        !rect.is_empty()
            && rect.x >= 0
            && rect.y >= 0
            && rect.right() <= self.cols_i32()
            && rect.bottom() <= self.rows_i32()
    }

    /// Pixel size of one cell for a panel of `panel` pixels.
    ///
    /// A zero column or row count degrades that axis to the full panel
    /// dimension instead of dividing by zero.
    pub fn cell_size(self, panel: Size) -> Size {
        let width = if self.columns > 0 {
            panel.width / f64::from(self.columns)
        } else {
            panel.width
        };
        let height = if self.rows > 0 {
            panel.height / f64::from(self.rows)
        } else {
            panel.height
        };
        Size::new(width, height)
    }

    /// Clamp live attributes into a placeable rectangle.
    ///
    /// The origin is clamped to an existing cell first, then each span to
    /// `[1, remaining]` on its axis, so the result satisfies
    /// `x + w <= columns` and `y + h <= rows` for any non-degenerate grid.
    pub fn clamp_geometry(self, x: i32, y: i32, w: i32, h: i32) -> CellRect {
        let cols = self.cols_i32();
        let rows = self.rows_i32();
        let x = clamp_cell(x, 0, cols - 1);
        let y = clamp_cell(y, 0, rows - 1);
        let w = clamp_cell(w.max(1), 1, cols - x);
        let h = clamp_cell(h.max(1), 1, rows - y);
        CellRect::new(x, y, w, h)
    }

    /// Pixel rectangle covered by `rect` for the given cell size.
    pub fn to_pixels(rect: &CellRect, cell: Size) -> PxRect {
        PxRect::new(
            f64::from(rect.x) * cell.width,
            f64::from(rect.y) * cell.height,
            f64::from(rect.w) * cell.width,
            f64::from(rect.h) * cell.height,
        )
    }
}

impl Default for GridDims {
    fn default() -> Self {
        Self::new(4, 4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersects_requires_shared_cell() {
        let a = CellRect::new(0, 0, 2, 2);
        assert!(a.intersects(&CellRect::new(1, 1, 2, 2)));
        // Edge-adjacent rectangles do not overlap.
        assert!(!a.intersects(&CellRect::new(2, 0, 1, 1)));
        assert!(!a.intersects(&CellRect::new(0, 2, 2, 1)));
        assert!(!a.intersects(&CellRect::new(0, 0, 0, 3)));
    }

    #[test]
    fn clamp_cell_tolerates_inverted_range() {
        assert_eq!(clamp_cell(5, 0, 3), 3);
        assert_eq!(clamp_cell(-2, 0, 3), 0);
        assert_eq!(clamp_cell(1, 0, -1), -1);
    }

    #[test]
    fn cell_size_divides_panel() {
        let dims = GridDims::new(4, 2);
        assert_eq!(dims.cell_size(Size::new(400.0, 300.0)), Size::new(100.0, 150.0));
    }

    #[test]
    fn cell_size_zero_dims_uses_full_panel() {
        let dims = GridDims::new(0, 0);
        assert_eq!(dims.cell_size(Size::new(400.0, 300.0)), Size::new(400.0, 300.0));
        assert!(dims.is_degenerate());
    }

    #[test]
    fn clamp_geometry_respects_bounds() {
        let dims = GridDims::new(4, 4);
        assert_eq!(dims.clamp_geometry(5, -3, 9, 0), CellRect::new(3, 0, 1, 1));
        assert_eq!(dims.clamp_geometry(1, 1, 10, 10), CellRect::new(1, 1, 3, 3));
        assert!(dims.contains(&dims.clamp_geometry(-8, 70, -2, 3)));
    }

    #[test]
    fn to_pixels_scales_by_cell() {
        let px = GridDims::to_pixels(&CellRect::new(1, 2, 2, 1), Size::new(50.0, 20.0));
        assert_eq!(px, PxRect::new(50.0, 40.0, 100.0, 20.0));
    }

    #[test]
    fn contains_rejects_overflow() {
        let dims = GridDims::new(3, 3);
        assert!(dims.contains(&CellRect::new(0, 0, 3, 3)));
        assert!(!dims.contains(&CellRect::new(1, 0, 3, 1)));
        assert!(!dims.contains(&CellRect::new(-1, 0, 1, 1)));
    }
}
