#![forbid(unsafe_code)]

//! Core: pixel geometry, pointer input vocabulary, and logging bootstrap.
//!
//! # Role in tilegrid
//! `tilegrid-core` is the host-facing layer. It owns the types a UI runtime
//! hands to the layout engine (panel-relative pointer events, the capability
//! flags of the control a press originated on) and the pixel rectangles the
//! engine hands back for rendering.
//!
//! # How it fits in the system
//! `tilegrid-layout` consumes [`event::PointerEvent`] values through its
//! interaction controller and produces [`geometry::PxRect`] values from its
//! arrangement pass. Nothing here knows about cells or occupancy.

pub mod control;
pub mod event;
pub mod geometry;
pub mod logging;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
