//! UI-space ↔ device-space coordinate mapping and the display scale.
//!
//! The mapping layer is pure arithmetic: no clamping, no validation,
//! no branches. A zero scale is a caller contract violation — the
//! [`Scale`] type makes one impossible to construct. Coordinates stay
//! floating-point through every conversion; truncation to integer
//! device pixels happens once, at the boundary where a control command
//! is emitted, so rounding error never compounds across repeated calls.

use std::sync::Arc;
use std::sync::atomic::{AtomicU16, Ordering};

// ── Point ────────────────────────────────────────────────────────

/// A point in either UI or device pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Convert a UI-space point to device space under the given scale ratio.
pub fn to_device_space(ui: Point, scale: f64) -> Point {
    Point::new(ui.x / scale, ui.y / scale)
}

/// Convert a device-space point back to UI space under the given scale ratio.
pub fn to_ui_space(device: Point, scale: f64) -> Point {
    Point::new(device.x * scale, device.y * scale)
}

// ── Scale ────────────────────────────────────────────────────────

/// Smallest allowed display scale, in percent.
pub const MIN_SCALE_PERCENT: u16 = 20;
/// Largest allowed display scale, in percent.
pub const MAX_SCALE_PERCENT: u16 = 200;
/// Scale applied after a fresh connect.
pub const DEFAULT_SCALE_PERCENT: u16 = 100;
/// Increment used by the operator zoom affordance.
pub const SCALE_STEP_PERCENT: u16 = 10;

/// The user-adjustable display scale factor, held in percent.
///
/// Always in `MIN_SCALE_PERCENT..=MAX_SCALE_PERCENT`, so the ratio is
/// always positive. Cloning yields a handle onto the same value — the
/// frame sink reads it from the mirroring service's thread while the
/// control flow mutates it, so the backing store is atomic.
#[derive(Debug, Clone)]
pub struct Scale {
    percent: Arc<AtomicU16>,
}

impl Scale {
    /// A scale at the default 100%.
    pub fn new() -> Self {
        Self {
            percent: Arc::new(AtomicU16::new(DEFAULT_SCALE_PERCENT)),
        }
    }

    /// Current scale in percent.
    pub fn percent(&self) -> u16 {
        self.percent.load(Ordering::SeqCst)
    }

    /// Current scale as a ratio (1.0 == 100%).
    pub fn ratio(&self) -> f64 {
        f64::from(self.percent()) / 100.0
    }

    /// Set the scale, clamped to the allowed range.
    pub fn set_percent(&self, percent: u16) {
        let clamped = percent.clamp(MIN_SCALE_PERCENT, MAX_SCALE_PERCENT);
        self.percent.store(clamped, Ordering::SeqCst);
    }

    /// Reset to the default 100%.
    pub fn reset(&self) {
        self.percent.store(DEFAULT_SCALE_PERCENT, Ordering::SeqCst);
    }

    /// Step the scale up by one increment.
    pub fn step_in(&self) {
        self.set_percent(self.percent().saturating_add(SCALE_STEP_PERCENT));
    }

    /// Step the scale down by one increment.
    pub fn step_out(&self) {
        self.set_percent(self.percent().saturating_sub(SCALE_STEP_PERCENT));
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ────────────────────────────────────────────────────────
