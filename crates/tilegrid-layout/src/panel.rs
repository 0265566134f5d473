#![forbid(unsafe_code)]

//! The dashboard panel: tile registry, resolver entry points, and the
//! arrangement pass.
//!
//! # Invariants
//!
//! 1. After [`DashboardPanel::arrange`], the cell rectangles of placed tiles
//!    are pairwise disjoint and lie inside `[0, columns) x [0, rows)`.
//! 2. `arrange` writes each placed tile's resolved geometry back to its live
//!    attributes, so a placed tile resolves to the same cells on the next
//!    pass unless new input intervenes.
//! 3. The commit store only ever receives a rectangle that was free at the
//!    moment it was written. An arrangement pass reserves every commit
//!    before resolving, so a request never displaces an unmoved tile.
//!
//! # Failure Modes
//!
//! Nothing on the resolution or arrangement path returns an error. A tile
//! for which no free region exists is reported as unplaced (empty pixel
//! rectangle, placement-validity false) and its commit record is dropped.
//! A grid with a zero dimension places nothing and leaves commit records
//! and live attributes untouched.

use tilegrid_core::geometry::{PxRect, Sides, Size};

use crate::commit::CommitStore;
use crate::config::GridConfig;
use crate::grid::{CellRect, GridDims};
use crate::occupancy::OccupancyGrid;
use crate::placement::{self, MoveResolution, ResizeResolution};
use crate::preview::{PreviewSignal, SnapPreview};
use crate::tile::{TileConstraints, TileGeometry, TileId, TileModelError};

#[derive(Debug, Clone)]
struct ManagedTile {
    id: TileId,
    geometry: TileGeometry,
    constraints: TileConstraints,
    placement_valid: bool,
}

/// One tile's result from an arrangement pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrangedTile {
    pub tile: TileId,
    /// Resolved cells, or `None` if the tile could not be placed.
    pub cell: Option<CellRect>,
    /// Deflated pixel rectangle; empty when unplaced.
    pub rect: PxRect,
}

impl ArrangedTile {
    #[must_use]
    pub const fn is_placed(&self) -> bool {
        self.cell.is_some()
    }
}

/// Output of [`DashboardPanel::arrange`].
#[derive(Debug, Clone, PartialEq)]
pub struct ArrangeOutcome {
    /// Tiles in enumeration order.
    pub tiles: Vec<ArrangedTile>,
    /// Bounds of the preview overlay (the whole panel).
    pub overlay: PxRect,
}

/// Grid-based tile container.
///
/// Tiles are resolved in insertion order; earlier tiles win contested
/// cells during an arrangement pass.
#[derive(Debug, Clone)]
pub struct DashboardPanel {
    dims: GridDims,
    margin: f64,
    tiles: Vec<ManagedTile>,
    commits: CommitStore,
    preview: PreviewSignal,
    panel_size: Option<Size>,
    needs_arrange: bool,
}

impl Default for DashboardPanel {
    fn default() -> Self {
        Self::new(GridConfig::default())
    }
}

impl DashboardPanel {
    /// Create an empty panel.
    ///
    /// The config is used as-is; run [`GridConfig::validated`] first if a
    /// zero-sized grid should be rejected rather than tolerated.
    #[must_use]
    pub fn new(config: GridConfig) -> Self {
        Self {
            dims: config.dims(),
            margin: config.effective_margin(),
            tiles: Vec::new(),
            commits: CommitStore::new(),
            preview: PreviewSignal::default(),
            panel_size: None,
            needs_arrange: true,
        }
    }

    fn find(&self, tile: TileId) -> Option<&ManagedTile> {
        self.tiles.iter().find(|managed| managed.id == tile)
    }

    fn find_mut(&mut self, tile: TileId) -> Option<&mut ManagedTile> {
        self.tiles.iter_mut().find(|managed| managed.id == tile)
    }

    // --- Tile registry -----------------------------------------------------

    /// Add a tile at the end of the enumeration order.
    pub fn add_tile(
        &mut self,
        tile: TileId,
        geometry: TileGeometry,
        constraints: TileConstraints,
    ) -> Result<(), TileModelError> {
        if self.contains(tile) {
            return Err(TileModelError::DuplicateTile { tile });
        }
        self.tiles.push(ManagedTile {
            id: tile,
            geometry,
            constraints,
            placement_valid: true,
        });
        self.needs_arrange = true;
        Ok(())
    }

    /// Remove a tile, dropping its commit record and any preview it raised.
    ///
    /// Returns the tile's last live geometry. An interaction session still
    /// bound to the tile is cancelled by the controller on its next event;
    /// [`InteractionController::remove_tile`](crate::InteractionController::remove_tile)
    /// does both at once.
    pub fn remove_tile(&mut self, tile: TileId) -> Result<TileGeometry, TileModelError> {
        let index = self
            .tiles
            .iter()
            .position(|managed| managed.id == tile)
            .ok_or(TileModelError::UnknownTile { tile })?;
        let removed = self.tiles.remove(index);
        self.commits.remove(tile);
        self.preview.hide_if_owned_by(tile);
        self.needs_arrange = true;
        Ok(removed.geometry)
    }

    #[must_use]
    pub fn contains(&self, tile: TileId) -> bool {
        self.find(tile).is_some()
    }

    /// Tile identities in enumeration order.
    pub fn tile_ids(&self) -> impl Iterator<Item = TileId> + '_ {
        self.tiles.iter().map(|managed| managed.id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Live (requested) grid attributes of a tile.
    #[must_use]
    pub fn geometry(&self, tile: TileId) -> Option<TileGeometry> {
        self.find(tile).map(|managed| managed.geometry)
    }

    /// Replace a tile's live grid attributes and mark the layout dirty.
    pub fn set_geometry(
        &mut self,
        tile: TileId,
        geometry: TileGeometry,
    ) -> Result<(), TileModelError> {
        let managed = self
            .find_mut(tile)
            .ok_or(TileModelError::UnknownTile { tile })?;
        managed.geometry = geometry;
        self.needs_arrange = true;
        Ok(())
    }

    /// Last committed placement of a tile.
    #[must_use]
    pub fn committed(&self, tile: TileId) -> Option<CellRect> {
        self.commits.get(tile)
    }

    #[must_use]
    pub fn constraints(&self, tile: TileId) -> Option<TileConstraints> {
        self.find(tile).map(|managed| managed.constraints)
    }

    pub fn set_constraints(
        &mut self,
        tile: TileId,
        constraints: TileConstraints,
    ) -> Result<(), TileModelError> {
        let managed = self
            .find_mut(tile)
            .ok_or(TileModelError::UnknownTile { tile })?;
        managed.constraints = constraints;
        Ok(())
    }

    /// Placement-validity flag read by the rendering collaborator.
    #[must_use]
    pub fn placement_valid(&self, tile: TileId) -> Option<bool> {
        self.find(tile).map(|managed| managed.placement_valid)
    }

    pub(crate) fn set_placement_valid(&mut self, tile: TileId, valid: bool) {
        if let Some(managed) = self.find_mut(tile) {
            managed.placement_valid = valid;
        }
    }

    /// Overwrite live attributes during an interaction. Unknown tiles are
    /// ignored.
    pub(crate) fn set_live_geometry(&mut self, tile: TileId, geometry: TileGeometry) {
        if let Some(managed) = self.find_mut(tile) {
            managed.geometry = geometry;
            self.needs_arrange = true;
        }
    }

    /// Apply the result of a finished interaction.
    ///
    /// Live attributes always take `rect`. The commit store is updated only
    /// if `rect` is in bounds and free of every other tile. Returns whether
    /// the commit store was written.
    pub(crate) fn commit_interactive(&mut self, tile: TileId, rect: CellRect) -> bool {
        if !self.contains(tile) {
            return false;
        }
        self.set_live_geometry(tile, rect.into());
        let occupancy = self.build_occupancy(Some(tile));
        if occupancy.is_free(&rect, None) {
            self.commits.insert(tile, rect);
            true
        } else {
            tracing::debug!(%tile, ?rect, "interactive commit skipped: region not free");
            false
        }
    }

    // --- Grid --------------------------------------------------------------

    /// Change the grid dimensions. Marks the layout dirty when they differ.
    pub fn set_grid(&mut self, columns: u16, rows: u16) {
        let dims = GridDims::new(columns, rows);
        if dims != self.dims {
            self.dims = dims;
            self.needs_arrange = true;
        }
    }

    #[must_use]
    pub const fn columns(&self) -> u16 {
        self.dims.columns
    }

    #[must_use]
    pub const fn rows(&self) -> u16 {
        self.dims.rows
    }

    #[must_use]
    pub const fn dims(&self) -> GridDims {
        self.dims
    }

    #[must_use]
    pub const fn tile_margin(&self) -> f64 {
        self.margin
    }

    /// Set the uniform tile margin; negative or non-finite values become 0.
    pub fn set_tile_margin(&mut self, margin: f64) {
        let margin = if margin.is_finite() { margin.max(0.0) } else { 0.0 };
        if margin != self.margin {
            self.margin = margin;
            self.needs_arrange = true;
        }
    }

    /// Pixel size of one cell for a panel of `panel` pixels.
    #[must_use]
    pub fn cell_size(&self, panel: Size) -> Size {
        self.dims.cell_size(panel)
    }

    /// Panel size from the last arrangement pass or [`set_panel_size`](Self::set_panel_size).
    #[must_use]
    pub const fn panel_size(&self) -> Option<Size> {
        self.panel_size
    }

    pub fn set_panel_size(&mut self, size: Size) {
        self.panel_size = Some(size);
    }

    #[must_use]
    pub const fn needs_arrange(&self) -> bool {
        self.needs_arrange
    }

    pub fn invalidate_arrange(&mut self) {
        self.needs_arrange = true;
    }

    // --- Resolution --------------------------------------------------------

    /// Snapshot occupancy of every tile except `except`.
    ///
    /// Each tile contributes its committed rectangle, or its clamped live
    /// geometry when it has no commit record.
    #[must_use]
    pub fn build_occupancy(&self, except: Option<TileId>) -> OccupancyGrid {
        let mut occupancy = OccupancyGrid::new(self.dims);
        for managed in &self.tiles {
            if Some(managed.id) == except {
                continue;
            }
            let rect = self.commits.get(managed.id).unwrap_or_else(|| {
                let g = managed.geometry;
                self.dims.clamp_geometry(g.x, g.y, g.w, g.h)
            });
            occupancy.mark(&rect, managed.id);
        }
        occupancy
    }

    /// Occupancy reserved by commit records alone. Tiles without a record
    /// claim nothing until the arrangement pass reaches them.
    fn committed_occupancy(&self) -> OccupancyGrid {
        let mut occupancy = OccupancyGrid::new(self.dims);
        for managed in &self.tiles {
            if let Some(rect) = self.commits.get(managed.id) {
                occupancy.mark(&rect, managed.id);
            }
        }
        occupancy
    }

    /// Resolve a move of `tile` to `(target_x, target_y)` using its current
    /// span. `None` if the tile is not managed by this panel.
    #[must_use]
    pub fn try_resolve_move(
        &self,
        tile: TileId,
        target_x: i32,
        target_y: i32,
    ) -> Option<MoveResolution> {
        let managed = self.find(tile)?;
        let occupancy = self.build_occupancy(Some(tile));
        let resolved = placement::resolve_move(
            &occupancy,
            managed.geometry.span(),
            target_x,
            target_y,
            self.commits.get(tile),
        );
        tracing::trace!(
            %tile,
            target_x,
            target_y,
            x = resolved.x,
            y = resolved.y,
            exact = resolved.exact,
            "resolved move"
        );
        Some(resolved)
    }

    /// Resolve a resize of `tile` to `(target_w, target_h)` anchored at its
    /// current origin. `None` if the tile is not managed by this panel.
    #[must_use]
    pub fn try_resolve_resize(
        &self,
        tile: TileId,
        target_w: i32,
        target_h: i32,
    ) -> Option<ResizeResolution> {
        let managed = self.find(tile)?;
        let g = managed.geometry;
        let anchor = self.dims.clamp_geometry(g.x, g.y, 1, 1);
        let occupancy = self.build_occupancy(Some(tile));
        let resolved = placement::resolve_resize(
            &occupancy,
            (anchor.x, anchor.y),
            target_w,
            target_h,
            self.commits.get(tile),
        );
        tracing::trace!(
            %tile,
            target_w,
            target_h,
            w = resolved.w,
            h = resolved.h,
            exact = resolved.exact,
            "resolved resize"
        );
        Some(resolved)
    }

    // --- Preview -----------------------------------------------------------

    /// Show the panel-wide snap preview, replacing any visible one.
    pub fn show_snap_preview(&mut self, rect: CellRect, valid: bool) {
        self.preview.show(SnapPreview { rect, valid }, None);
    }

    pub fn hide_snap_preview(&mut self) {
        self.preview.hide();
    }

    #[must_use]
    pub fn preview(&self) -> Option<SnapPreview> {
        self.preview.current()
    }

    /// Tile whose interaction raised the visible preview, if any.
    #[must_use]
    pub fn preview_owner(&self) -> Option<TileId> {
        self.preview.owner()
    }

    /// Pixel rectangle of the visible preview for a panel of `panel` pixels.
    #[must_use]
    pub fn preview_pixel_rect(&self, panel: Size) -> Option<PxRect> {
        self.preview
            .current()
            .map(|preview| preview.pixel_rect(self.dims, panel))
    }

    pub(crate) fn show_owned_preview(&mut self, tile: TileId, rect: CellRect, valid: bool) {
        self.preview.show(SnapPreview { rect, valid }, Some(tile));
    }

    pub(crate) fn hide_owned_preview(&mut self, tile: TileId) -> bool {
        self.preview.hide_if_owned_by(tile)
    }

    // --- Layout cycle ------------------------------------------------------

    /// Content size available to each tile inside its cell span.
    ///
    /// Uses live spans floored at one cell; the result is floored at zero.
    #[must_use]
    pub fn measure(&self, panel: Size) -> Vec<(TileId, Size)> {
        let cell = self.dims.cell_size(panel);
        let inset = 2.0 * self.margin;
        self.tiles
            .iter()
            .map(|managed| {
                let (w, h) = managed.geometry.span();
                let size = Size::new(
                    (cell.width * f64::from(w) - inset).max(0.0),
                    (cell.height * f64::from(h) - inset).max(0.0),
                );
                (managed.id, size)
            })
            .collect()
    }

    /// Run one arrangement pass for a panel of `panel` pixels.
    ///
    /// The occupancy grid starts with every commit record reserved, so a
    /// tile that keeps its request also keeps its cells. Tiles are then
    /// resolved in enumeration order: each releases its own reservation and
    /// takes the clamped live request if free, else its last commit if free,
    /// else the nearest free region around the clamped request. Among tiles
    /// without a commit record, earlier tiles win contested cells.
    pub fn arrange(&mut self, panel: Size) -> ArrangeOutcome {
        let span = tracing::debug_span!(
            "arrange_pass",
            columns = self.dims.columns,
            rows = self.dims.rows,
            tiles = self.tiles.len()
        );
        let _guard = span.enter();

        self.panel_size = Some(panel);
        self.needs_arrange = false;
        let overlay = PxRect::from_size(panel);

        if self.dims.is_degenerate() {
            tracing::debug!("grid has a zero dimension; no tile can be placed");
            let tiles = self
                .tiles
                .iter_mut()
                .map(|managed| {
                    managed.placement_valid = false;
                    ArrangedTile {
                        tile: managed.id,
                        cell: None,
                        rect: PxRect::default(),
                    }
                })
                .collect();
            return ArrangeOutcome { tiles, overlay };
        }

        let cell = self.dims.cell_size(panel);
        let inset = Sides::all(self.margin);
        let mut occupancy = self.committed_occupancy();
        let mut arranged = Vec::with_capacity(self.tiles.len());

        for managed in &mut self.tiles {
            let id = managed.id;
            let g = managed.geometry;
            let clamped = self.dims.clamp_geometry(g.x, g.y, g.w, g.h);
            if let Some(own) = self.commits.get(id) {
                occupancy.unmark(&own, id);
            }

            let resolved = if occupancy.is_free(&clamped, None) {
                Some(clamped)
            } else {
                let last = self
                    .commits
                    .get(id)
                    .filter(|last| self.dims.contains(last) && occupancy.is_free(last, None));
                let fallback = last.or_else(|| {
                    placement::find_nearest_free(
                        &occupancy, clamped.x, clamped.y, clamped.w, clamped.h,
                    )
                    .map(|(x, y)| clamped.with_origin(x, y))
                });
                tracing::debug!(
                    tile = %id,
                    requested = ?clamped,
                    resolved = ?fallback,
                    used_commit = last.is_some(),
                    "requested placement collides; using fallback"
                );
                fallback
            };

            match resolved {
                Some(rect) => {
                    occupancy.mark(&rect, id);
                    self.commits.insert(id, rect);
                    managed.geometry = rect.into();
                    arranged.push(ArrangedTile {
                        tile: id,
                        cell: Some(rect),
                        rect: GridDims::to_pixels(&rect, cell).deflate(inset),
                    });
                }
                None => {
                    self.commits.remove(id);
                    managed.placement_valid = false;
                    arranged.push(ArrangedTile {
                        tile: id,
                        cell: None,
                        rect: PxRect::default(),
                    });
                }
            }
        }

        ArrangeOutcome {
            tiles: arranged,
            overlay,
        }
    }
}
