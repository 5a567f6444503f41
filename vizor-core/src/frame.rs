//! Live mirrored-frame pipeline.
//!
//! The mirroring service produces raw frames on its own thread at its
//! own cadence. [`FrameSink::on_frame`] is the single entry point it
//! calls; the sink wraps the raw buffer, applies the current display
//! scale, and publishes the result through a `tokio::sync::watch`
//! channel. The channel is a thread-safe single slot: a new frame
//! simply supersedes the pending one, so there is no queueing and the
//! renderer always sees the latest bitmap.
//!
//! An absent frame is dropped — no emission, and the previously
//! published bitmap stays untouched.

use std::sync::Arc;

use image::RgbaImage;
use image::imageops::{self, FilterType};
use tokio::sync::watch;
use tracing::warn;

use crate::coords::Scale;

// ── PixelFormat ──────────────────────────────────────────────────

/// Pixel layout for raw mirrored frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// 3 bytes per pixel: Blue, Green, Red (mirroring service default).
    Bgr8,
    /// 3 bytes per pixel: Red, Green, Blue.
    Rgb8,
    /// 4 bytes per pixel: Blue, Green, Red, Alpha.
    Bgra8,
    /// 4 bytes per pixel: Red, Green, Blue, Alpha.
    Rgba8,
}

impl PixelFormat {
    /// Bytes consumed by a single pixel in this format.
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Bgr8 | PixelFormat::Rgb8 => 3,
            PixelFormat::Bgra8 | PixelFormat::Rgba8 => 4,
        }
    }
}

// ── RawFrame ─────────────────────────────────────────────────────

/// A raw mirrored frame as delivered by the mirroring service.
///
/// The `data` buffer holds `height` rows of `stride` bytes each;
/// `stride` may exceed `width * bytes_per_pixel` when rows are padded.
/// Frames are immutable once produced.
#[derive(Debug, Clone)]
pub struct RawFrame {
    /// Frame width in device pixels.
    pub width: u32,
    /// Frame height in device pixels.
    pub height: u32,
    /// Row pitch in **bytes**.
    pub stride: u32,
    /// Pixel layout.
    pub format: PixelFormat,
    /// Raw pixel data — `stride * height` bytes.
    pub data: Vec<u8>,
}

impl RawFrame {
    /// A tightly packed frame (stride == width × bpp).
    pub fn packed(width: u32, height: u32, format: PixelFormat, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            stride: width * format.bytes_per_pixel() as u32,
            format,
            data,
        }
    }

    /// Wrap the raw buffer as an RGBA image, honoring the row stride.
    ///
    /// Returns `None` when the buffer is shorter than the declared
    /// geometry — such a frame is malformed and gets dropped upstream.
    pub fn to_rgba(&self) -> Option<RgbaImage> {
        let bpp = self.format.bytes_per_pixel();
        let stride = self.stride as usize;
        let row_bytes = self.width as usize * bpp;
        if stride < row_bytes || self.data.len() < stride * self.height as usize {
            return None;
        }

        let mut out = Vec::with_capacity(self.width as usize * self.height as usize * 4);
        for y in 0..self.height as usize {
            let row = &self.data[y * stride..y * stride + row_bytes];
            for px in row.chunks_exact(bpp) {
                let (r, g, b, a) = match self.format {
                    PixelFormat::Bgr8 => (px[2], px[1], px[0], 0xFF),
                    PixelFormat::Rgb8 => (px[0], px[1], px[2], 0xFF),
                    PixelFormat::Bgra8 => (px[2], px[1], px[0], px[3]),
                    PixelFormat::Rgba8 => (px[0], px[1], px[2], px[3]),
                };
                out.extend_from_slice(&[r, g, b, a]);
            }
        }
        RgbaImage::from_raw(self.width, self.height, out)
    }
}

// ── ScaledBitmap ─────────────────────────────────────────────────

/// A render-ready bitmap: RGBA8 at the scaled display size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaledBitmap {
    pub width: u32,
    pub height: u32,
    /// RGBA8 pixels, `width * height * 4` bytes.
    pub data: Vec<u8>,
}

// ── FramePipeline ────────────────────────────────────────────────

/// Owns the latest-bitmap slot and hands out sinks and receivers.
///
/// The sink side goes to the mirroring service; the receiver side goes
/// to whatever renders.
pub struct FramePipeline {
    sink: FrameSink,
    rx: watch::Receiver<Option<ScaledBitmap>>,
}

impl FramePipeline {
    pub fn new(scale: Scale) -> Self {
        let (tx, rx) = watch::channel(None);
        Self {
            sink: FrameSink {
                scale,
                tx: Arc::new(tx),
            },
            rx,
        }
    }

    /// A cloneable sink handle for the mirroring service's frame
    /// callback.
    pub fn sink(&self) -> FrameSink {
        self.sink.clone()
    }

    /// Receiver that yields the latest scaled bitmap whenever a new
    /// frame lands.
    pub fn frame_receiver(&self) -> watch::Receiver<Option<ScaledBitmap>> {
        self.rx.clone()
    }
}

// ── FrameSink ────────────────────────────────────────────────────

/// The foreign-thread entry point of the pipeline.
#[derive(Clone)]
pub struct FrameSink {
    scale: Scale,
    tx: Arc<watch::Sender<Option<ScaledBitmap>>>,
}

impl FrameSink {
    /// Handle one frame callback from the mirroring service.
    ///
    /// `None` means the service produced nothing this cycle; the frame
    /// is dropped without an emission.
    pub fn on_frame(&self, raw: Option<RawFrame>) {
        let Some(raw) = raw else { return };
        if raw.width == 0 || raw.height == 0 {
            return;
        }
        let Some(image) = raw.to_rgba() else {
            warn!(
                width = raw.width,
                height = raw.height,
                stride = raw.stride,
                "malformed frame dropped"
            );
            return;
        };

        let ratio = self.scale.ratio();
        let bitmap = if (ratio - 1.0).abs() < f64::EPSILON {
            ScaledBitmap {
                width: raw.width,
                height: raw.height,
                data: image.into_raw(),
            }
        } else {
            let width = ((f64::from(raw.width) * ratio).round() as u32).max(1);
            let height = ((f64::from(raw.height) * ratio).round() as u32).max(1);
            let resized = imageops::resize(&image, width, height, FilterType::Triangle);
            ScaledBitmap {
                width,
                height,
                data: resized.into_raw(),
            }
        };

        // Receivers may all be gone (e.g. presentation shut down first);
        // that is not an error for the producer.
        let _ = self.tx.send(Some(bitmap));
    }
}

// ── Tests ────────────────────────────────────────────────────────
