//! Domain-specific error types for the Vizor core.
//!
//! All fallible operations return `Result<T, VizorError>`.
//! Failures are scoped to a single operation or session — nothing in
//! this crate is fatal to the process. A keycode with no device
//! equivalent is *not* an error: the translator returns `Option`.

use thiserror::Error;

/// The canonical error type for the Vizor core.
#[derive(Debug, Error)]
pub enum VizorError {
    // ── Device / transport ───────────────────────────────────────
    /// Device enumeration returned no usable devices.
    #[error("no devices attached")]
    DeviceUnavailable,

    /// An explicitly named serial was not present in the enumeration.
    #[error("device not found: {0}")]
    DeviceNotFound(String),

    /// The device transport reported a failure (spawn, exit status,
    /// malformed output).
    #[error("transport failure: {0}")]
    Transport(String),

    // ── Session ──────────────────────────────────────────────────
    /// A connect attempt was made while another was still in flight.
    #[error("connect already in progress")]
    ConnectBusy,

    /// The mirroring session's control channel is broken.
    #[error("control channel closed")]
    ChannelClosed,

    // ── Capture / export ─────────────────────────────────────────
    /// Export was attempted on a degenerate selection rectangle.
    #[error("selection rectangle is degenerate")]
    InvalidSelection,

    /// Local write or device push failed.
    #[error("export failed: {0}")]
    Export(String),

    /// Bitmap decode, encode, or transform failed.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// The filesystem layer reported an error.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

// ── Convenient From implementations ──────────────────────────────

impl<T> From<tokio::sync::mpsc::error::SendError<T>> for VizorError {
    fn from(_: tokio::sync::mpsc::error::SendError<T>) -> Self {
        VizorError::ChannelClosed
    }
}
