#![forbid(unsafe_code)]

//! Constrained 2-D tile layout engine.
//!
//! Tiles occupy rectangular, non-overlapping regions of a fixed
//! `columns x rows` cell grid. The engine resolves requested placements
//! against current occupancy (clamping, nearest-free fallback, greedy
//! shrink), keeps a store of last known-valid placements, runs an
//! arrangement pass that turns cell placements into pixel rectangles, and
//! drives pointer-based move/resize sessions with a snap preview.
//!
//! # Module map
//!
//! - [`grid`]: cell rectangles, grid dimensions, pixel conversion.
//! - [`occupancy`]: per-resolution cell ownership snapshot.
//! - [`placement`]: pure nearest-free search and move/resize resolution.
//! - [`commit`]: last committed placement per tile.
//! - [`panel`]: [`DashboardPanel`], the arrangement pass and resolver entry points.
//! - [`preview`]: the panel-wide snap preview.
//! - [`interaction`]: [`InteractionController`], the move/resize state machine.
//! - [`config`]: [`GridConfig`] and its loaders.
//!
//! # Example
//!
//! ```
//! use tilegrid_core::geometry::Size;
//! use tilegrid_layout::{DashboardPanel, GridConfig, TileConstraints, TileGeometry, TileId};
//!
//! let mut panel = DashboardPanel::new(GridConfig::default());
//! let a = TileId::new(1).unwrap();
//! let b = TileId::new(2).unwrap();
//! panel.add_tile(a, TileGeometry::new(0, 0, 2, 2), TileConstraints::default()).unwrap();
//! panel.add_tile(b, TileGeometry::new(1, 1, 1, 1), TileConstraints::default()).unwrap();
//!
//! let outcome = panel.arrange(Size::new(400.0, 400.0));
//! assert!(outcome.tiles.iter().all(|t| t.is_placed()));
//! assert_eq!(panel.geometry(b), Some(TileGeometry::new(2, 0, 1, 1)));
//! ```

pub mod commit;
pub mod config;
pub mod grid;
pub mod interaction;
pub mod occupancy;
pub mod panel;
pub mod placement;
pub mod preview;
pub mod tile;

pub use commit::CommitStore;
pub use config::{DEFAULT_TILE_MARGIN, GridConfig, GridConfigError};
pub use grid::{CellRect, GridDims};
pub use interaction::{
    CancelReason, CaptureError, CaptureTarget, InteractionController, InteractionEffect,
    InteractionTransition, NoopReason, NullCapture, PointerCapture, PressPart, SessionKind,
    SessionPhase, TileHit, TileInputEvent, TileSession,
};
pub use occupancy::OccupancyGrid;
pub use panel::{ArrangeOutcome, ArrangedTile, DashboardPanel};
pub use placement::{MoveResolution, ResizeResolution, find_nearest_free};
pub use preview::SnapPreview;
pub use tile::{TileConstraints, TileGeometry, TileId, TileModelError};
