#![forbid(unsafe_code)]

//! Canonical pointer event types.
//!
//! The host UI runtime delivers pointer input already hit-tested and
//! translated into panel-relative pixels. These types carry exactly that:
//! what happened, where, with which button, and which pointer produced it.
//!
//! # Design Notes
//!
//! - Positions are panel-relative and may lie outside the panel while a
//!   pointer is captured (the interaction layer relies on that to cancel
//!   out-of-bounds drags).
//! - `pointer_id` distinguishes concurrent pointers (multi-touch, pen +
//!   mouse). Hosts with a single mouse can always pass `0`.

use crate::geometry::Point;

/// Pointer button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PointerButton {
    /// Primary button (left mouse button, pen tip, touch contact).
    #[default]
    Primary,

    /// Secondary button (right mouse button, pen barrel).
    Secondary,

    /// Middle button (scroll wheel click).
    Middle,
}

impl PointerButton {
    /// Whether this is the primary button.
    #[must_use]
    pub const fn is_primary(self) -> bool {
        matches!(self, Self::Primary)
    }
}

/// The type of pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    /// Button pressed down.
    Pressed(PointerButton),

    /// Pointer moved (with or without a button held).
    Moved,

    /// Button released.
    Released(PointerButton),

    /// Pointer capture was taken away by the host (focus theft, window
    /// deactivation, another element grabbing the pointer).
    CaptureLost,
}

/// A panel-relative pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// The type of pointer event.
    pub kind: PointerEventKind,

    /// Identifier of the pointer that produced the event.
    pub pointer_id: u32,

    /// Position relative to the panel's top-left corner, in pixels.
    pub position: Point,
}

impl PointerEvent {
    #[must_use]
    pub const fn new(kind: PointerEventKind, pointer_id: u32, position: Point) -> Self {
        Self {
            kind,
            pointer_id,
            position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_event_carries_pointer_and_position() {
        let event = PointerEvent::new(PointerEventKind::Moved, 3, Point::new(1.0, 2.0));
        assert_eq!(event.pointer_id, 3);
        assert_eq!(event.position, Point::new(1.0, 2.0));
        assert_eq!(event.kind, PointerEventKind::Moved);
    }

    #[test]
    fn defaults() {
        assert_eq!(PointerButton::default(), PointerButton::Primary);
        assert!(PointerButton::Primary.is_primary());
        assert!(!PointerButton::Middle.is_primary());
    }
}
