//! Property tests for the arrangement pass and the placement resolver.
//!
//! Random tile sets (including out-of-range and overlapping requests) are
//! arranged on random grids; the suite asserts no-overlap, bounds,
//! idempotence, and deterministic nearest-free search.

use proptest::prelude::*;
use tilegrid_core::geometry::Size;
use tilegrid_layout::{
    CellRect, DashboardPanel, GridConfig, GridDims, OccupancyGrid, TileConstraints, TileGeometry,
    TileId, find_nearest_free,
};

const PANEL: Size = Size::new(640.0, 480.0);

fn id(raw: u64) -> TileId {
    TileId::new(raw).expect("test ID must be non-zero")
}

fn arb_geometry() -> impl Strategy<Value = TileGeometry> {
    (-3i32..12, -3i32..12, -1i32..6, -1i32..6)
        .prop_map(|(x, y, w, h)| TileGeometry::new(x, y, w, h))
}

fn build_panel(columns: u16, rows: u16, geometries: &[TileGeometry]) -> DashboardPanel {
    let mut panel = DashboardPanel::new(GridConfig {
        columns,
        rows,
        tile_margin: 2.0,
    });
    for (idx, g) in geometries.iter().enumerate() {
        panel
            .add_tile(id(idx as u64 + 1), *g, TileConstraints::default())
            .expect("unique tile");
    }
    panel
}

fn chebyshev(a: (i32, i32), b: (i32, i32)) -> i32 {
    (a.0 - b.0).abs().max((a.1 - b.1).abs())
}

proptest! {
    #[test]
    fn arranged_tiles_never_overlap_and_stay_in_bounds(
        columns in 1u16..8,
        rows in 1u16..8,
        geometries in prop::collection::vec(arb_geometry(), 0..20),
    ) {
        let mut panel = build_panel(columns, rows, &geometries);
        let outcome = panel.arrange(PANEL);
        let dims = GridDims::new(columns, rows);

        let placed: Vec<(TileId, CellRect)> = outcome
            .tiles
            .iter()
            .filter_map(|t| t.cell.map(|cell| (t.tile, cell)))
            .collect();
        for (tile, rect) in &placed {
            prop_assert!(dims.contains(rect), "{tile} out of bounds: {rect:?}");
            prop_assert_eq!(panel.committed(*tile), Some(*rect));
            prop_assert_eq!(panel.geometry(*tile), Some(TileGeometry::from(*rect)));
        }
        for (i, (a_tile, a)) in placed.iter().enumerate() {
            for (b_tile, b) in &placed[i + 1..] {
                prop_assert!(!a.intersects(b), "{a_tile} {a:?} overlaps {b_tile} {b:?}");
            }
        }
        for unplaced in outcome.tiles.iter().filter(|t| !t.is_placed()) {
            prop_assert_eq!(panel.committed(unplaced.tile), None);
            prop_assert_eq!(panel.placement_valid(unplaced.tile), Some(false));
        }
    }

    #[test]
    fn second_pass_is_identical(
        columns in 1u16..8,
        rows in 1u16..8,
        geometries in prop::collection::vec(arb_geometry(), 0..20),
    ) {
        let mut panel = build_panel(columns, rows, &geometries);
        let first = panel.arrange(PANEL);
        let second = panel.arrange(PANEL);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn arrangement_survives_grid_changes(
        geometries in prop::collection::vec(arb_geometry(), 1..12),
        grids in prop::collection::vec((0u16..7, 0u16..7), 1..5),
    ) {
        let mut panel = build_panel(6, 6, &geometries);
        panel.arrange(PANEL);
        for (columns, rows) in grids {
            panel.set_grid(columns, rows);
            let outcome = panel.arrange(PANEL);
            let dims = GridDims::new(columns, rows);
            let placed: Vec<CellRect> = outcome.tiles.iter().filter_map(|t| t.cell).collect();
            for (i, a) in placed.iter().enumerate() {
                prop_assert!(dims.contains(a));
                for b in &placed[i + 1..] {
                    prop_assert!(!a.intersects(b));
                }
            }
        }
    }

    #[test]
    fn nearest_free_is_deterministic_and_closest(
        columns in 1u16..9,
        rows in 1u16..9,
        blockers in prop::collection::vec((0i32..9, 0i32..9, 1i32..4, 1i32..4), 0..10),
        w in 1i32..4,
        h in 1i32..4,
        around_x in 0i32..9,
        around_y in 0i32..9,
    ) {
        let dims = GridDims::new(columns, rows);
        let mut grid = OccupancyGrid::new(dims);
        for (idx, (x, y, bw, bh)) in blockers.into_iter().enumerate() {
            grid.mark(&CellRect::new(x, y, bw, bh), id(idx as u64 + 1));
        }
        // Resolver callers always search around an origin the footprint fits at.
        let around_x = around_x.min((i32::from(columns) - w).max(0));
        let around_y = around_y.min((i32::from(rows) - h).max(0));

        let first = find_nearest_free(&grid, around_x, around_y, w, h);
        let second = find_nearest_free(&grid, around_x, around_y, w, h);
        prop_assert_eq!(first, second);

        let candidates: Vec<(i32, i32)> = (0..=i32::from(rows) - h)
            .flat_map(|y| (0..=i32::from(columns) - w).map(move |x| (x, y)))
            .filter(|&(x, y)| grid.is_free(&CellRect::new(x, y, w, h), None))
            .collect();
        match first {
            Some(found) => {
                prop_assert!(grid.is_free(&CellRect::new(found.0, found.1, w, h), None));
                let best = candidates
                    .iter()
                    .map(|&c| chebyshev(c, (around_x, around_y)))
                    .min()
                    .expect("a free candidate exists");
                prop_assert_eq!(chebyshev(found, (around_x, around_y)), best);
            }
            None => prop_assert!(candidates.is_empty()),
        }
    }

    #[test]
    fn resolved_moves_stay_in_bounds(
        geometries in prop::collection::vec(arb_geometry(), 1..10),
        target_x in -10i32..20,
        target_y in -10i32..20,
    ) {
        let mut panel = build_panel(5, 5, &geometries);
        panel.arrange(PANEL);
        let mover = id(1);
        let resolved = panel.try_resolve_move(mover, target_x, target_y).expect("known tile");
        let (w, h) = panel.geometry(mover).expect("known tile").span();
        let rect = CellRect::new(resolved.x, resolved.y, w, h);
        prop_assert!(GridDims::new(5, 5).contains(&rect));
        if resolved.exact {
            prop_assert!(panel.build_occupancy(Some(mover)).is_free(&rect, None));
        }
    }

    #[test]
    fn resolved_resizes_keep_origin_and_min_span(
        geometries in prop::collection::vec(arb_geometry(), 1..10),
        target_w in -4i32..10,
        target_h in -4i32..10,
    ) {
        let mut panel = build_panel(5, 5, &geometries);
        panel.arrange(PANEL);
        let tile = id(1);
        let before = panel.geometry(tile).expect("known tile");
        let resolved = panel.try_resolve_resize(tile, target_w, target_h).expect("known tile");
        prop_assert!(resolved.w >= 1 && resolved.h >= 1);
        prop_assert!(before.x + resolved.w <= 5);
        prop_assert!(before.y + resolved.h <= 5);
        prop_assert_eq!(panel.geometry(tile), Some(before));
    }
}
