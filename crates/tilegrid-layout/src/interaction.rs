#![forbid(unsafe_code)]

//! Interaction controller: per-tile move/resize sessions driven by pointer
//! events.
//!
//! ```text
//! Idle -> Dragging -> Idle   (release commits, capture loss / leaving the panel cancels)
//! Idle -> Resizing -> Idle   (release commits, capture loss cancels)
//! ```
//!
//! # Invariants
//!
//! 1. A tile has at most one session; a pointer drives at most one session.
//!    Distinct tiles may be driven concurrently by distinct pointers.
//! 2. Every event yields exactly one [`InteractionTransition`] with a
//!    strictly increasing `transition_id`. Ignored input yields
//!    [`InteractionEffect::Noop`] with a reason.
//! 3. The commit store is written only on release, never mid-session.
//! 4. Cancellation releases capture, hides the preview the session raised,
//!    clears the tile's placement-validity flag, and never rolls back a
//!    commit made by an earlier session.
//!
//! # Failure Modes
//!
//! Pointer-capture refusal is not an error for the caller: capture falls
//! back from the tile to the panel, then to uncaptured tracking, logging a
//! warning at each step. A session whose tile disappeared from the panel is
//! cancelled on its next event.

use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tilegrid_core::control::{ControlFlags, OriginChain};
use tilegrid_core::event::{PointerButton, PointerEvent, PointerEventKind};
use tilegrid_core::geometry::{Point, PxRect};

use crate::grid::{CellRect, clamp_cell};
use crate::panel::DashboardPanel;
use crate::tile::{TileGeometry, TileId, TileModelError};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Which part of a tile a press landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PressPart {
    /// Tile body or header: starts a move.
    Body,
    /// Resize grip: starts a resize.
    ResizeHandle,
}

/// Host hit-test result for a press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileHit {
    pub tile: TileId,
    pub part: PressPart,
    /// Capability flags from the element under the pointer outward.
    pub origin: OriginChain,
}

/// A pointer event plus, for presses, what it hit.
#[derive(Debug, Clone, PartialEq)]
pub struct TileInputEvent {
    pub pointer: PointerEvent,
    /// Required for presses; ignored otherwise.
    pub hit: Option<TileHit>,
}

impl TileInputEvent {
    /// Primary-button press on `part` of `tile`, originating on the tile
    /// surface.
    #[must_use]
    pub fn press(tile: TileId, part: PressPart, pointer_id: u32, position: Point) -> Self {
        Self {
            pointer: PointerEvent::new(
                PointerEventKind::Pressed(PointerButton::Primary),
                pointer_id,
                position,
            ),
            hit: Some(TileHit {
                tile,
                part,
                origin: OriginChain::surface(),
            }),
        }
    }

    #[must_use]
    pub fn moved(pointer_id: u32, position: Point) -> Self {
        Self {
            pointer: PointerEvent::new(PointerEventKind::Moved, pointer_id, position),
            hit: None,
        }
    }

    #[must_use]
    pub fn released(pointer_id: u32, position: Point) -> Self {
        Self {
            pointer: PointerEvent::new(
                PointerEventKind::Released(PointerButton::Primary),
                pointer_id,
                position,
            ),
            hit: None,
        }
    }

    #[must_use]
    pub fn capture_lost(pointer_id: u32) -> Self {
        Self {
            pointer: PointerEvent::new(PointerEventKind::CaptureLost, pointer_id, Point::default()),
            hit: None,
        }
    }

    /// Replace the origin chain of a press (builder pattern).
    #[must_use]
    pub fn with_origin(mut self, origin: OriginChain) -> Self {
        if let Some(hit) = self.hit.as_mut() {
            hit.origin = origin;
        }
        self
    }

    /// Replace the pressed/released button (builder pattern).
    #[must_use]
    pub fn with_button(mut self, button: PointerButton) -> Self {
        self.pointer.kind = match self.pointer.kind {
            PointerEventKind::Pressed(_) => PointerEventKind::Pressed(button),
            PointerEventKind::Released(_) => PointerEventKind::Released(button),
            other => other,
        };
        self
    }
}

// ---------------------------------------------------------------------------
// Pointer capture seam
// ---------------------------------------------------------------------------

/// Element that may hold pointer capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "target", content = "tile", rename_all = "snake_case")]
pub enum CaptureTarget {
    Tile(TileId),
    Panel,
}

/// Capture acquisition was refused by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureError {
    pub target: CaptureTarget,
    pub reason: String,
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.target {
            CaptureTarget::Tile(tile) => {
                write!(f, "{tile} refused pointer capture: {}", self.reason)
            }
            CaptureTarget::Panel => write!(f, "panel refused pointer capture: {}", self.reason),
        }
    }
}

impl std::error::Error for CaptureError {}

/// Host hook for acquiring and releasing pointer capture.
pub trait PointerCapture {
    fn capture(&mut self, pointer_id: u32, target: CaptureTarget) -> Result<(), CaptureError>;
    fn release(&mut self, pointer_id: u32, target: CaptureTarget);
}

/// Capture backend that grants every request (headless hosts, tests).
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCapture;

impl PointerCapture for NullCapture {
    fn capture(&mut self, _pointer_id: u32, _target: CaptureTarget) -> Result<(), CaptureError> {
        Ok(())
    }

    fn release(&mut self, _pointer_id: u32, _target: CaptureTarget) {}
}

// ---------------------------------------------------------------------------
// Sessions and transitions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    Move,
    Resize,
}

/// Per-tile lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Idle,
    Dragging,
    Resizing,
}

impl SessionKind {
    #[must_use]
    pub const fn phase(self) -> SessionPhase {
        match self {
            Self::Move => SessionPhase::Dragging,
            Self::Resize => SessionPhase::Resizing,
        }
    }
}

/// Ephemeral state of one tile's active interaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileSession {
    pub kind: SessionKind,
    pub pointer_id: u32,
    /// Pointer position at press time.
    pub start_pointer: Point,
    /// Placement at press time. For a resize, `x`/`y` are the anchor.
    pub start: CellRect,
    /// Element holding capture, `None` when tracking uncaptured.
    pub captured: Option<CaptureTarget>,
    /// Last evaluated wanted span (resize only).
    pub last_wanted: Option<(i32, i32)>,
    /// Validity of the last resolution shown in the preview.
    pub last_exact: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelReason {
    /// The host took pointer capture away.
    CaptureLost,
    /// The pointer left the panel during a move.
    LeftPanel,
    /// [`InteractionController::force_cancel`].
    Programmatic,
    /// The tile was removed from the panel mid-session.
    TileRemoved,
}

/// Why an event was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoopReason {
    /// No session is bound to the event's pointer.
    NoActiveSession,
    NonPrimaryButton,
    /// A press without hit-test information.
    MissingHit,
    /// The press originated on a control that suppresses drag start.
    SuppressedByOrigin,
    DragDisabled,
    NotResizable,
    SessionAlreadyActive,
    PointerAlreadyBound,
    UnknownTile,
    /// Resize pointer motion that did not change the wanted span.
    BelowCellBoundary,
}

/// Effect of one transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum InteractionEffect {
    DragStarted {
        tile: TileId,
        pointer_id: u32,
        start: CellRect,
        captured: Option<CaptureTarget>,
    },
    ResizeStarted {
        tile: TileId,
        pointer_id: u32,
        start: CellRect,
        captured: Option<CaptureTarget>,
    },
    PreviewUpdated {
        tile: TileId,
        rect: CellRect,
        exact: bool,
    },
    Committed {
        tile: TileId,
        rect: CellRect,
        exact: bool,
        /// Whether the commit store accepted the rectangle.
        stored: bool,
    },
    Canceled {
        tile: TileId,
        reason: CancelReason,
    },
    Noop {
        reason: NoopReason,
    },
}

/// One state-machine step with deterministic telemetry fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionTransition {
    pub transition_id: u64,
    pub tile: Option<TileId>,
    pub from: SessionPhase,
    pub to: SessionPhase,
    pub effect: InteractionEffect,
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Drives move/resize sessions for the tiles of one [`DashboardPanel`].
#[derive(Debug, Clone)]
pub struct InteractionController {
    sessions: FxHashMap<TileId, TileSession>,
    pointers: FxHashMap<u32, TileId>,
    suppress_mask: ControlFlags,
    transition_counter: u64,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self {
            sessions: FxHashMap::default(),
            pointers: FxHashMap::default(),
            suppress_mask: ControlFlags::DRAG_SUPPRESSING,
            transition_counter: 0,
        }
    }
}

impl InteractionController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the set of origin capabilities that suppress drag start.
    #[must_use]
    pub fn with_suppress_mask(mut self, mask: ControlFlags) -> Self {
        self.suppress_mask = mask;
        self
    }

    #[must_use]
    pub const fn suppress_mask(&self) -> ControlFlags {
        self.suppress_mask
    }

    /// Active session of `tile`.
    #[must_use]
    pub fn session(&self, tile: TileId) -> Option<&TileSession> {
        self.sessions.get(&tile)
    }

    /// Number of active sessions.
    #[must_use]
    pub fn active_sessions(&self) -> usize {
        self.sessions.len()
    }

    /// Lifecycle phase of `tile`.
    #[must_use]
    pub fn phase(&self, tile: TileId) -> SessionPhase {
        self.sessions
            .get(&tile)
            .map_or(SessionPhase::Idle, |session| session.kind.phase())
    }

    /// Apply one pointer event.
    pub fn apply_event(
        &mut self,
        panel: &mut DashboardPanel,
        capture: &mut dyn PointerCapture,
        event: &TileInputEvent,
    ) -> InteractionTransition {
        let pointer = &event.pointer;
        match pointer.kind {
            PointerEventKind::Pressed(button) => {
                self.press(panel, capture, pointer, button, event.hit.as_ref())
            }
            PointerEventKind::Moved => self.pointer_moved(panel, capture, pointer),
            PointerEventKind::Released(button) => self.release(panel, capture, pointer, button),
            PointerEventKind::CaptureLost => match self.pointers.get(&pointer.pointer_id) {
                Some(&tile) => self.cancel(panel, capture, tile, CancelReason::CaptureLost),
                None => self.noop(None, NoopReason::NoActiveSession),
            },
        }
    }

    /// Cancel `tile`'s session, if any, with [`CancelReason::Programmatic`].
    pub fn force_cancel(
        &mut self,
        panel: &mut DashboardPanel,
        capture: &mut dyn PointerCapture,
        tile: TileId,
    ) -> Option<InteractionTransition> {
        self.sessions
            .contains_key(&tile)
            .then(|| self.cancel(panel, capture, tile, CancelReason::Programmatic))
    }

    /// Cancel any session of `tile`, then remove it from `panel`.
    pub fn remove_tile(
        &mut self,
        panel: &mut DashboardPanel,
        capture: &mut dyn PointerCapture,
        tile: TileId,
    ) -> Result<(TileGeometry, Option<InteractionTransition>), TileModelError> {
        if !panel.contains(tile) {
            return Err(TileModelError::UnknownTile { tile });
        }
        let canceled = self
            .sessions
            .contains_key(&tile)
            .then(|| self.cancel(panel, capture, tile, CancelReason::TileRemoved));
        let geometry = panel.remove_tile(tile)?;
        Ok((geometry, canceled))
    }

    fn press(
        &mut self,
        panel: &mut DashboardPanel,
        capture: &mut dyn PointerCapture,
        pointer: &PointerEvent,
        button: PointerButton,
        hit: Option<&TileHit>,
    ) -> InteractionTransition {
        let Some(hit) = hit else {
            return self.noop(None, NoopReason::MissingHit);
        };
        let tile = hit.tile;
        if !button.is_primary() {
            return self.noop(Some(tile), NoopReason::NonPrimaryButton);
        }
        let (Some(geometry), Some(constraints)) = (panel.geometry(tile), panel.constraints(tile))
        else {
            return self.noop(Some(tile), NoopReason::UnknownTile);
        };
        if self.sessions.contains_key(&tile) {
            return self.noop(Some(tile), NoopReason::SessionAlreadyActive);
        }
        if self.pointers.contains_key(&pointer.pointer_id) {
            return self.noop(Some(tile), NoopReason::PointerAlreadyBound);
        }
        let kind = match hit.part {
            PressPart::Body => {
                if hit.origin.any_in(self.suppress_mask) {
                    return self.noop(Some(tile), NoopReason::SuppressedByOrigin);
                }
                if !constraints.draggable {
                    return self.noop(Some(tile), NoopReason::DragDisabled);
                }
                SessionKind::Move
            }
            PressPart::ResizeHandle => {
                if !constraints.resizable {
                    return self.noop(Some(tile), NoopReason::NotResizable);
                }
                SessionKind::Resize
            }
        };

        let captured = acquire_capture(capture, pointer.pointer_id, tile);
        let start = panel
            .dims()
            .clamp_geometry(geometry.x, geometry.y, geometry.w, geometry.h);
        panel.show_owned_preview(tile, start, true);
        panel.set_placement_valid(tile, true);

        let session = TileSession {
            kind,
            pointer_id: pointer.pointer_id,
            start_pointer: pointer.position,
            start,
            captured,
            last_wanted: (kind == SessionKind::Resize).then_some((start.w, start.h)),
            last_exact: true,
        };
        self.sessions.insert(tile, session);
        self.pointers.insert(pointer.pointer_id, tile);

        let effect = match kind {
            SessionKind::Move => InteractionEffect::DragStarted {
                tile,
                pointer_id: pointer.pointer_id,
                start,
                captured,
            },
            SessionKind::Resize => InteractionEffect::ResizeStarted {
                tile,
                pointer_id: pointer.pointer_id,
                start,
                captured,
            },
        };
        self.finish(Some(tile), SessionPhase::Idle, kind.phase(), effect)
    }

    fn pointer_moved(
        &mut self,
        panel: &mut DashboardPanel,
        capture: &mut dyn PointerCapture,
        pointer: &PointerEvent,
    ) -> InteractionTransition {
        let Some((tile, mut session)) = self.bound_session(pointer.pointer_id) else {
            return self.noop(None, NoopReason::NoActiveSession);
        };
        if !panel.contains(tile) {
            return self.cancel(panel, capture, tile, CancelReason::TileRemoved);
        }

        match session.kind {
            SessionKind::Move => {
                if let Some(size) = panel.panel_size()
                    && !PxRect::from_size(size).contains_inclusive(pointer.position)
                {
                    return self.cancel(panel, capture, tile, CancelReason::LeftPanel);
                }
                let Some((rect, exact)) =
                    resolve_drag_target(panel, tile, &session, pointer.position)
                else {
                    return self.cancel(panel, capture, tile, CancelReason::TileRemoved);
                };
                panel.show_owned_preview(tile, rect, exact);
                panel.set_placement_valid(tile, exact);
                session.last_exact = exact;
                self.sessions.insert(tile, session);
                self.finish(
                    Some(tile),
                    SessionPhase::Dragging,
                    SessionPhase::Dragging,
                    InteractionEffect::PreviewUpdated { tile, rect, exact },
                )
            }
            SessionKind::Resize => {
                let min_span = panel
                    .constraints(tile)
                    .map_or((1, 1), |constraints| constraints.min_span());
                let wanted = wanted_span(panel, &session, pointer.position, min_span);
                if session.last_wanted == Some(wanted) {
                    return self.noop(Some(tile), NoopReason::BelowCellBoundary);
                }
                session.last_wanted = Some(wanted);

                let anchor = session.start;
                let Some(resolved) = panel.try_resolve_resize(tile, wanted.0, wanted.1) else {
                    return self.cancel(panel, capture, tile, CancelReason::TileRemoved);
                };
                let valid = resolved.exact && (resolved.w, resolved.h) == wanted;
                let rect = anchor.with_span(resolved.w, resolved.h);
                panel.set_live_geometry(tile, rect.into());
                panel.show_owned_preview(tile, rect, valid);
                panel.set_placement_valid(tile, valid);
                session.last_exact = valid;
                self.sessions.insert(tile, session);
                self.finish(
                    Some(tile),
                    SessionPhase::Resizing,
                    SessionPhase::Resizing,
                    InteractionEffect::PreviewUpdated {
                        tile,
                        rect,
                        exact: valid,
                    },
                )
            }
        }
    }

    fn release(
        &mut self,
        panel: &mut DashboardPanel,
        capture: &mut dyn PointerCapture,
        pointer: &PointerEvent,
        button: PointerButton,
    ) -> InteractionTransition {
        let Some((tile, session)) = self.bound_session(pointer.pointer_id) else {
            return self.noop(None, NoopReason::NoActiveSession);
        };
        if !button.is_primary() {
            return self.noop(Some(tile), NoopReason::NonPrimaryButton);
        }
        if !panel.contains(tile) {
            return self.cancel(panel, capture, tile, CancelReason::TileRemoved);
        }

        let (rect, exact) = match session.kind {
            SessionKind::Move => {
                let Some(target) = resolve_drag_target(panel, tile, &session, pointer.position)
                else {
                    return self.cancel(panel, capture, tile, CancelReason::TileRemoved);
                };
                target
            }
            SessionKind::Resize => {
                // Live attributes may have been rewritten by the host since
                // the last motion; re-pin to the anchor and clamp.
                let (w, h) = panel
                    .geometry(tile)
                    .map_or((session.start.w, session.start.h), |live| live.span());
                let anchor = session.start;
                let rect = panel.dims().clamp_geometry(anchor.x, anchor.y, w, h);
                (rect, session.last_exact)
            }
        };

        self.end_session(panel, capture, tile, &session);
        let stored = panel.commit_interactive(tile, rect);
        let valid = match session.kind {
            SessionKind::Move => exact,
            SessionKind::Resize => true,
        };
        panel.set_placement_valid(tile, valid);

        self.finish(
            Some(tile),
            session.kind.phase(),
            SessionPhase::Idle,
            InteractionEffect::Committed {
                tile,
                rect,
                exact,
                stored,
            },
        )
    }

    fn cancel(
        &mut self,
        panel: &mut DashboardPanel,
        capture: &mut dyn PointerCapture,
        tile: TileId,
        reason: CancelReason,
    ) -> InteractionTransition {
        let Some(session) = self.sessions.get(&tile).copied() else {
            return self.noop(Some(tile), NoopReason::NoActiveSession);
        };
        self.end_session(panel, capture, tile, &session);
        if session.kind == SessionKind::Resize {
            panel.set_live_geometry(tile, session.start.into());
        }
        panel.set_placement_valid(tile, false);
        self.finish(
            Some(tile),
            session.kind.phase(),
            SessionPhase::Idle,
            InteractionEffect::Canceled { tile, reason },
        )
    }

    /// Release capture, hide this session's preview and forget the session.
    fn end_session(
        &mut self,
        panel: &mut DashboardPanel,
        capture: &mut dyn PointerCapture,
        tile: TileId,
        session: &TileSession,
    ) {
        if let Some(target) = session.captured {
            capture.release(session.pointer_id, target);
        }
        panel.hide_owned_preview(tile);
        self.sessions.remove(&tile);
        self.pointers.remove(&session.pointer_id);
    }

    fn bound_session(&self, pointer_id: u32) -> Option<(TileId, TileSession)> {
        let tile = *self.pointers.get(&pointer_id)?;
        let session = *self.sessions.get(&tile)?;
        Some((tile, session))
    }

    fn noop(&mut self, tile: Option<TileId>, reason: NoopReason) -> InteractionTransition {
        let phase = tile.map_or(SessionPhase::Idle, |tile| self.phase(tile));
        self.finish(tile, phase, phase, InteractionEffect::Noop { reason })
    }

    fn finish(
        &mut self,
        tile: Option<TileId>,
        from: SessionPhase,
        to: SessionPhase,
        effect: InteractionEffect,
    ) -> InteractionTransition {
        self.transition_counter = self.transition_counter.saturating_add(1);
        let transition = InteractionTransition {
            transition_id: self.transition_counter,
            tile,
            from,
            to,
            effect,
        };
        tracing::debug!(
            transition_id = transition.transition_id,
            tile = ?tile,
            ?from,
            ?to,
            ?effect,
            "interaction transition"
        );
        transition
    }
}

/// Try tile capture, then panel capture, then give up on capture.
fn acquire_capture(
    capture: &mut dyn PointerCapture,
    pointer_id: u32,
    tile: TileId,
) -> Option<CaptureTarget> {
    match capture.capture(pointer_id, CaptureTarget::Tile(tile)) {
        Ok(()) => return Some(CaptureTarget::Tile(tile)),
        Err(error) => {
            tracing::warn!(%tile, pointer_id, %error, "falling back to panel pointer capture");
        }
    }
    match capture.capture(pointer_id, CaptureTarget::Panel) {
        Ok(()) => Some(CaptureTarget::Panel),
        Err(error) => {
            tracing::warn!(%tile, pointer_id, %error, "tracking pointer without capture");
            None
        }
    }
}

/// Whole cells covered by a pixel delta; zero for a collapsed cell.
fn cell_delta(pixels: f64, cell: f64) -> i32 {
    let cells = (pixels / cell).round();
    if cell > 0.0 && cells.is_finite() {
        cells as i32
    } else {
        0
    }
}

/// Grid index under a pixel coordinate, with the cell floored at 1px.
fn covering_index(pixels: f64, cell: f64, count: u16) -> i32 {
    let index = (pixels / cell.max(1.0)).floor();
    let index = if index.is_finite() { index as i32 } else { 0 };
    clamp_cell(index, 0, i32::from(count) - 1)
}

/// Resolved placement for a move session's pointer at `position`.
fn resolve_drag_target(
    panel: &DashboardPanel,
    tile: TileId,
    session: &TileSession,
    position: Point,
) -> Option<(CellRect, bool)> {
    let cell = panel.cell_size(panel.panel_size().unwrap_or_default());
    let (dx, dy) = position.delta_from(session.start_pointer);
    let target_x = session.start.x.saturating_add(cell_delta(dx, cell.width));
    let target_y = session.start.y.saturating_add(cell_delta(dy, cell.height));
    let resolved = panel.try_resolve_move(tile, target_x, target_y)?;
    let (w, h) = panel.geometry(tile)?.span();
    Some((CellRect::new(resolved.x, resolved.y, w, h), resolved.exact))
}

/// Span from the resize anchor to the covering cell, floored at `min_span`.
fn wanted_span(
    panel: &DashboardPanel,
    session: &TileSession,
    position: Point,
    min_span: (i32, i32),
) -> (i32, i32) {
    let cell = panel.cell_size(panel.panel_size().unwrap_or_default());
    let col = covering_index(position.x, cell.width, panel.columns());
    let row = covering_index(position.y, cell.height, panel.rows());
    let w = (col - session.start.x + 1).max(1).max(min_span.0);
    let h = (row - session.start.y + 1).max(1).max(min_span.1);
    (w, h)
}
