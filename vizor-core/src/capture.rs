//! Static captures and the print-screen capture session.
//!
//! A [`StaticCapture`] is a single point-in-time full-resolution
//! screenshot, independent of the live frame stream and never mutated
//! after creation. A [`CaptureSession`] owns one capture plus a
//! [`RegionSelector`] over it; selection changes are published through
//! a `watch` channel so the presentation layer can redraw the marquee
//! and flip its export affordances.

use std::fmt;

use image::RgbaImage;
use tokio::sync::watch;

use crate::coords::Point;
use crate::error::VizorError;
use crate::export::{CaptureExporter, ExportDestination};
use crate::selection::{RegionSelector, SelectionSnapshot};
use crate::transport::DeviceHandle;

// ── StaticCapture ────────────────────────────────────────────────

/// An immutable full-resolution screenshot bitmap.
#[derive(Clone)]
pub struct StaticCapture {
    image: RgbaImage,
}

impl StaticCapture {
    pub fn new(image: RgbaImage) -> Self {
        Self { image }
    }

    /// Decode an encoded screenshot (e.g. the PNG bytes a transport
    /// hands back).
    pub fn from_encoded(bytes: &[u8]) -> Result<Self, VizorError> {
        let image = image::load_from_memory(bytes)?;
        Ok(Self::new(image.to_rgba8()))
    }

    /// Native device-pixel width.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Native device-pixel height.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }
}

impl fmt::Debug for StaticCapture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticCapture")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish_non_exhaustive()
    }
}

// ── CaptureSession ───────────────────────────────────────────────

/// One print-screen session: a frozen capture, a region selector over
/// it, and export entry points.
///
/// The selection opens empty; pointer events arrive in the capture's
/// native coordinate space. The last pointer position is tracked for
/// the status line only — it never drives control logic.
pub struct CaptureSession {
    capture: StaticCapture,
    device: DeviceHandle,
    selector: RegionSelector,
    pointer: Point,
    selection_tx: watch::Sender<SelectionSnapshot>,
    selection_rx: watch::Receiver<SelectionSnapshot>,
}

impl fmt::Debug for CaptureSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptureSession")
            .field("capture", &self.capture)
            .finish_non_exhaustive()
    }
}

impl CaptureSession {
    pub fn new(capture: StaticCapture, device: DeviceHandle) -> Self {
        let (selection_tx, selection_rx) = watch::channel(SelectionSnapshot::default());
        Self {
            capture,
            device,
            selector: RegionSelector::new(),
            pointer: Point::default(),
            selection_tx,
            selection_rx,
        }
    }

    pub fn capture(&self) -> &StaticCapture {
        &self.capture
    }

    pub fn device(&self) -> &DeviceHandle {
        &self.device
    }

    /// Receiver for selection-changed events.
    pub fn selection_receiver(&self) -> watch::Receiver<SelectionSnapshot> {
        self.selection_rx.clone()
    }

    /// Current selection summary.
    pub fn selection(&self) -> SelectionSnapshot {
        self.selector.snapshot()
    }

    /// Last pointer position over the capture (informational).
    pub fn pointer(&self) -> Point {
        self.pointer
    }

    pub fn pointer_down(&mut self, at: Point) {
        self.selector.pointer_down(at);
        self.track(at);
    }

    pub fn pointer_move(&mut self, at: Point) {
        self.selector.pointer_move(at);
        self.track(at);
    }

    pub fn pointer_up(&mut self, at: Point) {
        self.selector.pointer_up(at);
        self.track(at);
    }

    fn track(&mut self, at: Point) {
        self.pointer = at;
        let _ = self.selection_tx.send(self.selector.snapshot());
    }

    /// Export the whole capture.
    pub async fn export_screen(&self, dest: &ExportDestination) -> Result<(), VizorError> {
        CaptureExporter::new(self.device.clone())
            .export(&self.capture, None, dest)
            .await
    }

    /// Export the selected region. Fails with
    /// [`VizorError::InvalidSelection`] when no exportable rectangle
    /// exists.
    pub async fn export_region(&self, dest: &ExportDestination) -> Result<(), VizorError> {
        let rect = self.selector.rect().ok_or(VizorError::InvalidSelection)?;
        CaptureExporter::new(self.device.clone())
            .export(&self.capture, Some(rect), dest)
            .await
    }
}

// ── Tests ────────────────────────────────────────────────────────
