#![forbid(unsafe_code)]

//! Snap preview signal.
//!
//! One panel-wide preview region at a time. The rendering collaborator reads
//! the rectangle and its validity to draw the overlay; the interaction
//! controller drives it. The signal remembers which tile's session raised
//! it so cancelling one session cannot hide another session's preview.

use serde::{Deserialize, Serialize};
use tilegrid_core::geometry::{PxRect, Size};

use crate::grid::{CellRect, GridDims};
use crate::tile::TileId;

/// The currently displayed preview region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapPreview {
    pub rect: CellRect,
    /// Drives the valid/invalid preview style.
    pub valid: bool,
}

impl SnapPreview {
    /// Pixel rectangle of the preview for a panel of `panel` pixels.
    ///
    /// Unlike tile placement, the column/row divisors are floored at one so
    /// the overlay stays well-defined on a degenerate grid.
    #[must_use]
    pub fn pixel_rect(&self, dims: GridDims, panel: Size) -> PxRect {
        let floored = GridDims::new(dims.columns.max(1), dims.rows.max(1));
        GridDims::to_pixels(&self.rect, floored.cell_size(panel))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct PreviewSignal {
    current: Option<SnapPreview>,
    owner: Option<TileId>,
}

impl PreviewSignal {
    pub(crate) fn current(&self) -> Option<SnapPreview> {
        self.current
    }

    pub(crate) fn owner(&self) -> Option<TileId> {
        self.owner
    }

    pub(crate) fn show(&mut self, preview: SnapPreview, owner: Option<TileId>) {
        self.current = Some(preview);
        self.owner = owner;
    }

    pub(crate) fn hide(&mut self) {
        self.current = None;
        self.owner = None;
    }

    /// Hide only if `tile` raised the visible preview. Returns whether it did.
    pub(crate) fn hide_if_owned_by(&mut self, tile: TileId) -> bool {
        if self.current.is_some() && self.owner == Some(tile) {
            self.hide();
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile(raw: u64) -> TileId {
        TileId::new(raw).expect("non-zero")
    }

    #[test]
    fn show_replaces_and_hide_clears() {
        let mut signal = PreviewSignal::default();
        let first = SnapPreview {
            rect: CellRect::new(0, 0, 1, 1),
            valid: true,
        };
        let second = SnapPreview {
            rect: CellRect::new(1, 1, 2, 1),
            valid: false,
        };
        signal.show(first, Some(tile(1)));
        signal.show(second, Some(tile(2)));
        assert_eq!(signal.current(), Some(second));
        assert_eq!(signal.owner(), Some(tile(2)));
        signal.hide();
        assert_eq!(signal.current(), None);
        assert_eq!(signal.owner(), None);
    }

    #[test]
    fn hide_if_owned_ignores_other_tiles() {
        let mut signal = PreviewSignal::default();
        let preview = SnapPreview {
            rect: CellRect::new(0, 0, 1, 1),
            valid: true,
        };
        signal.show(preview, Some(tile(1)));
        assert!(!signal.hide_if_owned_by(tile(2)));
        assert_eq!(signal.current(), Some(preview));
        assert!(signal.hide_if_owned_by(tile(1)));
        assert_eq!(signal.current(), None);
    }

    #[test]
    fn pixel_rect_floors_degenerate_grid() {
        let preview = SnapPreview {
            rect: CellRect::new(0, 0, 1, 1),
            valid: true,
        };
        let px = preview.pixel_rect(GridDims::new(0, 2), Size::new(300.0, 200.0));
        assert_eq!(px, PxRect::new(0.0, 0.0, 300.0, 100.0));
    }
}
