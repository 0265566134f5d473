#![forbid(unsafe_code)]

//! Capability flags for the control a pointer press originated on.
//!
//! The host describes the element under the pointer and its ancestors up to
//! (and excluding) the tile as an [`OriginChain`]. Each entry is a set of
//! [`ControlFlags`]. Whether a chain suppresses drag start is a question of
//! flags against a configurable mask, not of concrete control types, so a
//! host can mark its own widgets as interactive without touching the engine.

use bitflags::bitflags;

bitflags! {
    /// Capabilities of one element on a press's origin chain.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ControlFlags: u16 {
        /// Plain content; never suppresses anything.
        const NONE        = 0;
        /// Clickable control (buttons, toggles, repeat buttons).
        const INTERACTIVE = 1 << 0;
        /// Accepts text input.
        const TEXT_INPUT  = 1 << 1;
        /// Value-dragging control (sliders).
        const RANGE       = 1 << 2;
        /// Scrollbar or scroll thumb.
        const SCROLLBAR   = 1 << 3;
        /// Drop-down or selector.
        const SELECTOR    = 1 << 4;
    }
}

impl Default for ControlFlags {
    fn default() -> Self {
        Self::NONE
    }
}

impl ControlFlags {
    /// Default mask of capabilities that prevent a press from starting a
    /// tile drag.
    pub const DRAG_SUPPRESSING: Self = Self::INTERACTIVE
        .union(Self::TEXT_INPUT)
        .union(Self::RANGE)
        .union(Self::SCROLLBAR)
        .union(Self::SELECTOR);
}

/// Capability flags from the originating element outward.
///
/// Index 0 is the element the press hit; later entries are its ancestors.
/// An empty chain means the press landed directly on the tile surface.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OriginChain {
    entries: Vec<ControlFlags>,
}

impl OriginChain {
    /// A press directly on the tile surface.
    #[must_use]
    pub const fn surface() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build a chain from the originating element outward.
    #[must_use]
    pub fn new(entries: impl IntoIterator<Item = ControlFlags>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Append an ancestor (builder pattern).
    #[must_use]
    pub fn with_ancestor(mut self, flags: ControlFlags) -> Self {
        self.entries.push(flags);
        self
    }

    /// Entries from the origin outward.
    pub fn iter(&self) -> impl Iterator<Item = ControlFlags> + '_ {
        self.entries.iter().copied()
    }

    /// Whether any element on the chain carries a capability in `mask`.
    #[must_use]
    pub fn any_in(&self, mask: ControlFlags) -> bool {
        self.entries.iter().any(|flags| flags.intersects(mask))
    }
}
