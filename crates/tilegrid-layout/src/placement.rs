#![forbid(unsafe_code)]

//! Placement resolver: pure functions over an [`OccupancyGrid`].
//!
//! # Invariants
//!
//! 1. Every function is total: an unsatisfiable request degrades to a
//!    defined fallback and is reported through `exact == false`.
//! 2. [`find_nearest_free`] is deterministic: nearer rings first; within a
//!    ring the top band, then the bottom band, then the left column, then
//!    the right column; each band scanned in ascending coordinate order.
//! 3. [`resolve_resize`] never moves the origin.
//!
//! The grid passed in must already exclude the tile being resolved (a tile
//! cannot collide with itself).

use serde::{Deserialize, Serialize};

use crate::grid::{CellRect, clamp_cell};
use crate::occupancy::OccupancyGrid;

/// Result of a move request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResolution {
    pub x: i32,
    pub y: i32,
    /// The (clamped) requested origin was honored without fallback.
    pub exact: bool,
}

/// Result of a resize request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizeResolution {
    pub w: i32,
    pub h: i32,
    /// The (clamped) requested span was honored without shrinking.
    pub exact: bool,
}

/// Nearest free top-left position for a `w x h` footprint.
///
/// Searches square rings of radius `r = 0..=max(columns, rows)` around
/// `(around_x, around_y)`. Returns `None` when the grid has no free region
/// of that footprint.
#[must_use]
pub fn find_nearest_free(
    grid: &OccupancyGrid,
    around_x: i32,
    around_y: i32,
    w: i32,
    h: i32,
) -> Option<(i32, i32)> {
    let cols = grid.dims().cols_i32();
    let rows = grid.dims().rows_i32();
    let max_x = cols - w;
    let max_y = rows - h;
    let fits = |x: i32, y: i32| grid.is_free(&CellRect::new(x, y, w, h), None);

    for r in 0..=cols.max(rows) {
        let x_lo = (around_x - r).max(0);
        let x_hi = (around_x + r).min(max_x);
        let top = (around_y - r).max(0);
        let bottom = (around_y + r).min(max_y);

        for y in [top, bottom] {
            if let Some(x) = (x_lo..=x_hi).find(|&x| fits(x, y)) {
                return Some((x, y));
            }
        }

        let y_lo = (around_y - r + 1).max(0);
        let y_hi = (around_y + r - 1).min(max_y);
        for x in [x_lo, x_hi] {
            if let Some(y) = (y_lo..=y_hi).find(|&y| fits(x, y)) {
                return Some((x, y));
            }
        }
    }
    None
}

/// Resolve a move of a `span` footprint to `(target_x, target_y)`.
///
/// The target is clamped to `[0, columns - w] x [0, rows - h]`. If that
/// spot is free it is returned as exact; otherwise the nearest free spot,
/// then the last committed origin, then the clamped target, all inexact.
#[must_use]
pub fn resolve_move(
    grid: &OccupancyGrid,
    span: (i32, i32),
    target_x: i32,
    target_y: i32,
    last_committed: Option<CellRect>,
) -> MoveResolution {
    let (w, h) = span;
    let x = clamp_cell(target_x, 0, grid.dims().cols_i32() - w);
    let y = clamp_cell(target_y, 0, grid.dims().rows_i32() - h);

    if grid.is_free(&CellRect::new(x, y, w, h), None) {
        return MoveResolution { x, y, exact: true };
    }
    if let Some((x, y)) = find_nearest_free(grid, x, y, w, h) {
        return MoveResolution { x, y, exact: false };
    }
    match last_committed {
        Some(last) => MoveResolution {
            x: last.x,
            y: last.y,
            exact: false,
        },
        None => MoveResolution { x, y, exact: false },
    }
}

/// Resolve a resize anchored at `anchor` to `(target_w, target_h)`.
///
/// Spans are clamped to `[1, columns - x]` and `[1, rows - y]`. When the
/// clamped footprint is blocked, a greedy shrink search runs with height as
/// the outer loop and width as the inner loop, both descending, so height
/// is preserved in preference to width. Falls back to the last committed
/// span, then `1 x 1`.
#[must_use]
pub fn resolve_resize(
    grid: &OccupancyGrid,
    anchor: (i32, i32),
    target_w: i32,
    target_h: i32,
    last_committed: Option<CellRect>,
) -> ResizeResolution {
    let (x, y) = anchor;
    let target_w = clamp_cell(target_w, 1, grid.dims().cols_i32() - x);
    let target_h = clamp_cell(target_h, 1, grid.dims().rows_i32() - y);
    let fits = |w: i32, h: i32| grid.is_free(&CellRect::new(x, y, w, h), None);

    if fits(target_w, target_h) {
        return ResizeResolution {
            w: target_w,
            h: target_h,
            exact: true,
        };
    }

    for h in (1..=target_h).rev() {
        if let Some(w) = (1..=target_w).rev().find(|&w| fits(w, h)) {
            return ResizeResolution { w, h, exact: false };
        }
    }

    match last_committed {
        Some(last) => ResizeResolution {
            w: last.w,
            h: last.h,
            exact: false,
        },
        None => ResizeResolution {
            w: 1,
            h: 1,
            exact: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridDims;
    use crate::tile::TileId;

    fn tile(raw: u64) -> TileId {
        TileId::new(raw).expect("test ID must be non-zero")
    }

    fn grid_with(dims: GridDims, rects: &[CellRect]) -> OccupancyGrid {
        let mut grid = OccupancyGrid::new(dims);
        for (idx, rect) in rects.iter().enumerate() {
            grid.mark(rect, tile(idx as u64 + 1));
        }
        grid
    }

    #[test]
    fn nearest_free_radius_zero_is_origin() {
        let grid = OccupancyGrid::new(GridDims::new(4, 4));
        assert_eq!(find_nearest_free(&grid, 2, 1, 1, 1), Some((2, 1)));
    }

    #[test]
    fn nearest_free_prefers_top_band_over_bottom_band() {
        // 2x2 block in the top-left corner; 1x1 request at the origin.
        let grid = grid_with(GridDims::new(4, 4), &[CellRect::new(0, 0, 2, 2)]);
        assert_eq!(find_nearest_free(&grid, 0, 0, 1, 1), Some((2, 0)));
    }

    #[test]
    fn nearest_free_left_column_before_right_column() {
        // Row 1 of a 3x3 grid is the only free row besides the side cells.
        let grid = grid_with(
            GridDims::new(3, 3),
            &[
                CellRect::new(0, 0, 3, 1),
                CellRect::new(0, 2, 3, 1),
                CellRect::new(1, 1, 1, 1),
            ],
        );
        assert_eq!(find_nearest_free(&grid, 1, 1, 1, 1), Some((0, 1)));
    }

    #[test]
    fn nearest_free_none_when_packed() {
        let grid = grid_with(
            GridDims::new(2, 2),
            &[CellRect::new(0, 0, 2, 1), CellRect::new(0, 1, 1, 1)],
        );
        assert_eq!(find_nearest_free(&grid, 0, 0, 2, 1), None);
        assert_eq!(find_nearest_free(&grid, 0, 0, 1, 1), Some((1, 1)));
    }

    #[test]
    fn nearest_free_footprint_larger_than_grid() {
        let grid = OccupancyGrid::new(GridDims::new(2, 2));
        assert_eq!(find_nearest_free(&grid, 0, 0, 3, 1), None);
    }

    #[test]
    fn move_clamps_and_is_exact_when_free() {
        let grid = OccupancyGrid::new(GridDims::new(4, 4));
        let resolved = resolve_move(&grid, (1, 1), 5, 5, None);
        assert_eq!(resolved, MoveResolution { x: 3, y: 3, exact: true });
    }

    #[test]
    fn move_blocked_uses_nearest_inexact() {
        let grid = grid_with(GridDims::new(4, 4), &[CellRect::new(0, 0, 2, 2)]);
        let resolved = resolve_move(&grid, (1, 1), 0, 0, None);
        assert_eq!(resolved, MoveResolution { x: 2, y: 0, exact: false });
    }

    #[test]
    fn move_packed_falls_back_to_commit_then_target() {
        let grid = grid_with(GridDims::new(2, 1), &[CellRect::new(0, 0, 2, 1)]);
        let committed = Some(CellRect::new(1, 0, 1, 1));
        assert_eq!(
            resolve_move(&grid, (1, 1), 0, 0, committed),
            MoveResolution { x: 1, y: 0, exact: false }
        );
        assert_eq!(
            resolve_move(&grid, (1, 1), -4, 0, None),
            MoveResolution { x: 0, y: 0, exact: false }
        );
    }

    #[test]
    fn resize_exact_when_free() {
        let grid = OccupancyGrid::new(GridDims::new(3, 3));
        let resolved = resolve_resize(&grid, (0, 0), 3, 3, None);
        assert_eq!(resolved, ResizeResolution { w: 3, h: 3, exact: true });
    }

    #[test]
    fn resize_clamps_to_grid_edge() {
        let grid = OccupancyGrid::new(GridDims::new(3, 3));
        let resolved = resolve_resize(&grid, (0, 0), 4, 4, None);
        assert_eq!(resolved, ResizeResolution { w: 3, h: 3, exact: true });
        let resolved = resolve_resize(&grid, (1, 2), 0, -3, None);
        assert_eq!(resolved, ResizeResolution { w: 1, h: 1, exact: true });
    }

    #[test]
    fn resize_shrink_preserves_height_first() {
        // Blocker at (2,2): a 3x3 request from the origin cannot fit.
        // h=3 admits w=2 before any h=2 candidate is tried.
        let grid = grid_with(GridDims::new(3, 3), &[CellRect::new(2, 2, 1, 1)]);
        let resolved = resolve_resize(&grid, (0, 0), 3, 3, None);
        assert_eq!(resolved, ResizeResolution { w: 2, h: 3, exact: false });
    }

    #[test]
    fn resize_shrink_drops_height_when_row_blocked() {
        // Blocker under the anchor column: height must shrink.
        let grid = grid_with(GridDims::new(3, 3), &[CellRect::new(0, 2, 1, 1)]);
        let resolved = resolve_resize(&grid, (0, 0), 3, 3, None);
        assert_eq!(resolved, ResizeResolution { w: 3, h: 2, exact: false });
    }

    #[test]
    fn resize_anchor_occupied_falls_back() {
        let grid = grid_with(GridDims::new(3, 3), &[CellRect::new(1, 1, 1, 1)]);
        let last = Some(CellRect::new(1, 1, 2, 1));
        assert_eq!(
            resolve_resize(&grid, (1, 1), 2, 2, last),
            ResizeResolution { w: 2, h: 1, exact: false }
        );
        assert_eq!(
            resolve_resize(&grid, (1, 1), 2, 2, None),
            ResizeResolution { w: 1, h: 1, exact: false }
        );
    }
}
