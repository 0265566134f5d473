#![forbid(unsafe_code)]

//! Layout commit store: last known-valid placement per tile.
//!
//! Records are written only by the arrangement pass or by an interactive
//! commit that passed a free-region check; nothing writes here mid-drag.

use rustc_hash::FxHashMap;

use crate::grid::CellRect;
use crate::tile::TileId;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitStore {
    records: FxHashMap<TileId, CellRect>,
}

impl CommitStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Last committed rectangle of `tile`, if any.
    #[must_use]
    pub fn get(&self, tile: TileId) -> Option<CellRect> {
        self.records.get(&tile).copied()
    }

    /// Record `rect` for `tile`, returning the previous record.
    pub fn insert(&mut self, tile: TileId, rect: CellRect) -> Option<CellRect> {
        self.records.insert(tile, rect)
    }

    pub fn remove(&mut self, tile: TileId) -> Option<CellRect> {
        self.records.remove(&tile)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
