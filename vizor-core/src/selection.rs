//! Rectangle-selection state machine over a static capture.
//!
//! Tracks an in-progress or completed rectangular region in the
//! captured image's native coordinate space:
//!
//! ```text
//!  Idle ──pointer down──► Choosing ──pointer up──► Selected
//!                            ▲  │                      │
//!                            │  └──pointer move──┐     │
//!                            │         (end only)│     │
//!                            └───────────────────┴─────┘
//!                                 pointer down re-arms
//! ```
//!
//! Export affordances are recomputed on every transition: a rectangle
//! is exportable iff its corners differ in at least one axis.

use crate::coords::Point;

// ── SelectionState ───────────────────────────────────────────────

/// Where the selector is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionState {
    /// No selection. Initial state.
    #[default]
    Idle,
    /// Pointer is down and dragging; only the end corner moves.
    Choosing,
    /// Pointer released; the rectangle is frozen.
    Selected,
}

impl std::fmt::Display for SelectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Choosing => write!(f, "Choosing"),
            Self::Selected => write!(f, "Selected"),
        }
    }
}

// ── Rect ─────────────────────────────────────────────────────────

/// A normalized rectangle in capture-native pixels: origin at the
/// top-left corner, extents non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Normalize two corner points into a rectangle. Order-independent:
    /// the result always has left ≤ right and top ≤ bottom. A collapsed
    /// axis is widened to one pixel so downstream cropping stays valid;
    /// only fully coincident corners yield a zero-extent (degenerate)
    /// rectangle.
    pub fn from_corners(a: Point, b: Point) -> Self {
        let x = a.x.min(b.x) as u32;
        let y = a.y.min(b.y) as u32;
        if a == b {
            return Self::new(x, y, 0, 0);
        }
        let width = ((a.x - b.x).abs().round() as u32).max(1);
        let height = ((a.y - b.y).abs().round() as u32).max(1);
        Self::new(x, y, width, height)
    }

    /// Both extents are zero: the corners coincided.
    pub fn is_degenerate(&self) -> bool {
        self.width == 0 && self.height == 0
    }

    /// Whether this rectangle covers an entire `width` × `height` image.
    pub fn covers(&self, width: u32, height: u32) -> bool {
        self.x == 0 && self.y == 0 && self.width >= width && self.height >= height
    }
}

// ── SelectionSnapshot ────────────────────────────────────────────

/// Pure summary of the selector, published to the presentation layer
/// after every transition.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SelectionSnapshot {
    pub state: SelectionState,
    /// Normalized rectangle, absent while the selection is degenerate.
    pub rect: Option<Rect>,
    /// Drives the enable/disable of export affordances.
    pub export_enabled: bool,
}

// ── RegionSelector ───────────────────────────────────────────────

/// The selection state machine. Corner points live in the captured
/// image's native coordinate space.
#[derive(Debug, Default)]
pub struct RegionSelector {
    state: SelectionState,
    start: Point,
    end: Point,
}

impl RegionSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    /// Begin a new rectangle. From `Selected` this discards the prior
    /// rectangle and behaves exactly like the `Idle` case; a press while
    /// already `Choosing` is ignored.
    pub fn pointer_down(&mut self, at: Point) {
        match self.state {
            SelectionState::Idle | SelectionState::Selected => {
                self.start = at;
                self.end = at;
                self.state = SelectionState::Choosing;
            }
            SelectionState::Choosing => {}
        }
    }

    /// Drag: moves the end corner only. The start corner is fixed at
    /// the press position.
    pub fn pointer_move(&mut self, at: Point) {
        if self.state == SelectionState::Choosing {
            self.end = at;
        }
    }

    /// Release: freezes the rectangle.
    pub fn pointer_up(&mut self, at: Point) {
        if self.state == SelectionState::Choosing {
            self.end = at;
            self.state = SelectionState::Selected;
        }
    }

    /// Discard any selection and return to `Idle`.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// A rectangle is exportable iff its corners differ in at least
    /// one axis.
    pub fn export_enabled(&self) -> bool {
        self.start != self.end
    }

    /// The normalized rectangle, or `None` while degenerate.
    pub fn rect(&self) -> Option<Rect> {
        self.export_enabled()
            .then(|| Rect::from_corners(self.start, self.end))
    }

    pub fn snapshot(&self) -> SelectionSnapshot {
        SelectionSnapshot {
            state: self.state,
            rect: self.rect(),
            export_enabled: self.export_enabled(),
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────
