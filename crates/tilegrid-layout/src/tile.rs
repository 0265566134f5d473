#![forbid(unsafe_code)]

//! Tile identity, live geometry, and per-tile constraints.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::grid::CellRect;

/// Stable identifier for managed tiles.
///
/// `0` is reserved/invalid so IDs are always non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileId(u64);

impl TileId {
    /// Create a new tile ID, rejecting 0.
    pub fn new(raw: u64) -> Result<Self, TileModelError> {
        if raw == 0 {
            return Err(TileModelError::ZeroTileId);
        }
        Ok(Self(raw))
    }

    /// Get the raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tile#{}", self.0)
    }
}

/// Live (requested) grid attributes of a tile.
///
/// These are what the host or an interaction session last asked for. They
/// may be out of range; the panel clamps them before any collision check.
/// After an arrangement pass they hold the resolved placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileGeometry {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl TileGeometry {
    #[inline]
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Span with each axis floored at one cell.
    #[inline]
    pub fn span(&self) -> (i32, i32) {
        (self.w.max(1), self.h.max(1))
    }
}

impl Default for TileGeometry {
    fn default() -> Self {
        Self::new(0, 0, 1, 1)
    }
}

impl From<CellRect> for TileGeometry {
    fn from(rect: CellRect) -> Self {
        Self::new(rect.x, rect.y, rect.w, rect.h)
    }
}

/// Per-tile interaction bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileConstraints {
    /// Minimum span in columns while resizing (floored at 1).
    pub min_w: i32,
    /// Minimum span in rows while resizing (floored at 1).
    pub min_h: i32,
    /// Whether the resize handle starts a session.
    pub resizable: bool,
    /// Whether a body press starts a move session.
    pub draggable: bool,
}

impl TileConstraints {
    /// Minimum span with each axis floored at one cell.
    #[must_use]
    pub fn min_span(&self) -> (i32, i32) {
        (self.min_w.max(1), self.min_h.max(1))
    }
}

impl Default for TileConstraints {
    fn default() -> Self {
        Self {
            min_w: 1,
            min_h: 1,
            resizable: true,
            draggable: true,
        }
    }
}

/// Tile registry errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileModelError {
    ZeroTileId,
    DuplicateTile { tile: TileId },
    UnknownTile { tile: TileId },
}

impl fmt::Display for TileModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroTileId => write!(f, "tile id 0 is reserved"),
            Self::DuplicateTile { tile } => write!(f, "{tile} is already managed by this panel"),
            Self::UnknownTile { tile } => write!(f, "{tile} is not managed by this panel"),
        }
    }
}

impl std::error::Error for TileModelError {}
