#![forbid(unsafe_code)]

//! Per-resolution snapshot of which tile owns which cell.
//!
//! An [`OccupancyGrid`] is cheap to rebuild and is rebuilt before every
//! placement decision; it is never kept across interactions. At most one
//! tile owns a cell. Marking is last-write-wins: committed placements never
//! overlap, so the grid is a rebuild, not a conflict resolver.

use crate::grid::{CellRect, GridDims};
use crate::tile::TileId;

/// Row-major cell ownership map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancyGrid {
    dims: GridDims,
    cells: Vec<Option<TileId>>,
}

impl OccupancyGrid {
    /// Empty grid with the given dimensions.
    #[must_use]
    pub fn new(dims: GridDims) -> Self {
        let len = usize::from(dims.columns) * usize::from(dims.rows);
        Self {
            dims,
            cells: vec![None; len],
        }
    }

    /// Grid dimensions.
    #[must_use]
    pub const fn dims(&self) -> GridDims {
        self.dims
    }

    fn index(&self, col: i32, row: i32) -> Option<usize> {
        if col < 0 || row < 0 || col >= self.dims.cols_i32() || row >= self.dims.rows_i32() {
            return None;
        }
        // Both coordinates are non-negative and in range here.
        let col = usize::try_from(col).ok()?;
        let row = usize::try_from(row).ok()?;
        Some(row * usize::from(self.dims.columns) + col)
    }

    /// Owner of a cell, or `None` for free or out-of-range cells.
    #[must_use]
    pub fn owner(&self, col: i32, row: i32) -> Option<TileId> {
        self.index(col, row).and_then(|idx| self.cells[idx])
    }

    /// Mark every in-range cell of `rect` as owned by `tile`.
    ///
    /// Out-of-range cells are skipped silently (stale records after a grid
    /// shrink).
    pub fn mark(&mut self, rect: &CellRect, tile: TileId) {
        for row in rect.y..rect.bottom() {
            for col in rect.x..rect.right() {
                if let Some(idx) = self.index(col, row) {
                    self.cells[idx] = Some(tile);
                }
            }
        }
    }

    /// Clear the cells of `rect` that are currently owned by `tile`.
    pub fn unmark(&mut self, rect: &CellRect, tile: TileId) {
        for row in rect.y..rect.bottom() {
            for col in rect.x..rect.right() {
                if let Some(idx) = self.index(col, row)
                    && self.cells[idx] == Some(tile)
                {
                    self.cells[idx] = None;
                }
            }
        }
    }

    /// Free-region test.
    ///
    /// False if the rectangle is empty, if any of its cells lies outside
    /// `[0, columns) x [0, rows)`, or if any cell is owned by a tile other
    /// than `ignore`.
    #[must_use]
    pub fn is_free(&self, rect: &CellRect, ignore: Option<TileId>) -> bool {
        if rect.is_empty() {
            return false;
        }
        for row in rect.y..rect.bottom() {
            for col in rect.x..rect.right() {
                let Some(idx) = self.index(col, row) else {
                    return false;
                };
                if let Some(owner) = self.cells[idx]
                    && Some(owner) != ignore
                {
                    return false;
                }
            }
        }
        true
    }

    /// Number of owned cells.
    #[must_use]
    pub fn occupied_cells(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile(raw: u64) -> TileId {
        TileId::new(raw).expect("test ID must be non-zero")
    }

    #[test]
    fn empty_grid_is_free_in_bounds() {
        let grid = OccupancyGrid::new(GridDims::new(4, 4));
        assert!(grid.is_free(&CellRect::new(0, 0, 4, 4), None));
        assert!(!grid.is_free(&CellRect::new(1, 0, 4, 1), None));
        assert!(!grid.is_free(&CellRect::new(0, -1, 1, 1), None));
    }

    #[test]
    fn empty_rect_is_never_free() {
        let grid = OccupancyGrid::new(GridDims::new(4, 4));
        assert!(!grid.is_free(&CellRect::new(0, 0, 0, 1), None));
        assert!(!grid.is_free(&CellRect::new(0, 0, 2, -1), None));
    }

    #[test]
    fn marked_cells_block_other_tiles_only() {
        let mut grid = OccupancyGrid::new(GridDims::new(4, 4));
        let a = tile(1);
        grid.mark(&CellRect::new(0, 0, 2, 2), a);
        assert_eq!(grid.owner(1, 1), Some(a));
        assert_eq!(grid.occupied_cells(), 4);
        assert!(!grid.is_free(&CellRect::new(1, 1, 1, 1), None));
        assert!(!grid.is_free(&CellRect::new(1, 1, 1, 1), Some(tile(2))));
        assert!(grid.is_free(&CellRect::new(1, 1, 2, 2), Some(a)));
    }

    #[test]
    fn mark_skips_out_of_range_cells() {
        let mut grid = OccupancyGrid::new(GridDims::new(2, 2));
        grid.mark(&CellRect::new(1, 1, 5, 5), tile(1));
        assert_eq!(grid.occupied_cells(), 1);
        assert_eq!(grid.owner(5, 5), None);
    }

    #[test]
    fn unmark_leaves_other_owners() {
        let mut grid = OccupancyGrid::new(GridDims::new(3, 1));
        grid.mark(&CellRect::new(0, 0, 2, 1), tile(1));
        grid.mark(&CellRect::new(1, 0, 2, 1), tile(2));
        grid.unmark(&CellRect::new(0, 0, 3, 1), tile(1));
        assert_eq!(grid.owner(0, 0), None);
        assert_eq!(grid.owner(1, 0), Some(tile(2)));
        assert_eq!(grid.owner(2, 0), Some(tile(2)));
    }

    #[test]
    fn degenerate_grid_has_no_free_cells() {
        let grid = OccupancyGrid::new(GridDims::new(0, 3));
        assert!(!grid.is_free(&CellRect::new(0, 0, 1, 1), None));
        assert_eq!(grid.occupied_cells(), 0);
    }
}
