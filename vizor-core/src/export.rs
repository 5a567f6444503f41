//! Whole-or-region capture export to local storage or the device.
//!
//! Device export stages the PNG in a named temp file, pushes it via
//! the device transport, and relies on the temp file's drop to remove
//! it — every exit path, success or failure, leaves no file behind.
//! A degenerate rectangle is rejected before any I/O is attempted.

use std::path::PathBuf;

use image::RgbaImage;
use image::imageops;
use tracing::debug;

use crate::capture::StaticCapture;
use crate::error::VizorError;
use crate::selection::Rect;
use crate::transport::DeviceHandle;

// ── ExportDestination ────────────────────────────────────────────

/// Where an export lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportDestination {
    /// A path on the operator's machine. The extension picks the
    /// encoding; `.png` is the usual choice.
    Local(PathBuf),
    /// A path on the device's filesystem.
    Device(String),
}

// ── CaptureExporter ──────────────────────────────────────────────

/// Exports a static capture, whole or cropped to a selection.
pub struct CaptureExporter {
    device: DeviceHandle,
}

impl CaptureExporter {
    pub fn new(device: DeviceHandle) -> Self {
        Self { device }
    }

    /// Export `capture` to `dest`, cropped to `region` when one is
    /// given. A region covering the full capture short-circuits the
    /// crop.
    pub async fn export(
        &self,
        capture: &StaticCapture,
        region: Option<Rect>,
        dest: &ExportDestination,
    ) -> Result<(), VizorError> {
        let image = resolve_region(capture, region)?;
        match dest {
            ExportDestination::Local(path) => {
                debug!(path = %path.display(), "exporting capture locally");
                image
                    .save(path)
                    .map_err(|e| VizorError::Export(format!("write {}: {e}", path.display())))
            }
            ExportDestination::Device(remote) => self.push_via_temp(&image, remote).await,
        }
    }

    async fn push_via_temp(&self, image: &RgbaImage, remote: &str) -> Result<(), VizorError> {
        // The temp file unlinks on drop, covering every exit path below.
        let staged = tempfile::Builder::new()
            .prefix("vizor-export-")
            .suffix(".png")
            .tempfile()?;

        let mut file = staged.as_file();
        image
            .write_to(&mut file, image::ImageFormat::Png)
            .map_err(|e| VizorError::Export(format!("stage png: {e}")))?;

        debug!(
            serial = self.device.serial(),
            remote, "pushing capture to device"
        );
        self.device
            .push(staged.path(), remote)
            .await
            .map_err(|e| VizorError::Export(format!("push to {remote}: {e}")))
    }
}

/// Crop to the normalized region, or borrow the whole capture.
fn resolve_region(
    capture: &StaticCapture,
    region: Option<Rect>,
) -> Result<std::borrow::Cow<'_, RgbaImage>, VizorError> {
    use std::borrow::Cow;

    let Some(rect) = region else {
        return Ok(Cow::Borrowed(capture.image()));
    };
    if rect.is_degenerate() {
        return Err(VizorError::InvalidSelection);
    }
    if rect.covers(capture.width(), capture.height()) {
        return Ok(Cow::Borrowed(capture.image()));
    }
    let cropped =
        imageops::crop_imm(capture.image(), rect.x, rect.y, rect.width, rect.height).to_image();
    Ok(Cow::Owned(cropped))
}

// ── Tests ────────────────────────────────────────────────────────
