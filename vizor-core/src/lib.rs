//! # vizor-core
//!
//! Session, input-translation, and capture core for the Vizor device
//! mirror: view a live mirrored frame of a remote handheld device,
//! inject synthetic touch/key input back into it, and export static
//! screenshots whole or cropped to a selected region.
//!
//! ## Architecture
//!
//! ```text
//! Presentation ──raw events──► SessionController ──commands──► MirrorSession
//!      ▲                          │        │
//!      │                    Coordinate   Keycode
//!  watch channels            mapping    translation
//!      │                                              MirrorService
//! FramePipeline ◄───raw frames (foreign thread)───────────┘
//!
//! Presentation ──capture request──► CaptureSession ──► CaptureExporter
//!                                        │                  │
//!                                  RegionSelector      DeviceTransport
//! ```
//!
//! | Module      | Purpose                                             |
//! |-------------|-----------------------------------------------------|
//! | `coords`    | UI↔device point mapping and the clamped display scale |
//! | `keymap`    | Ordered-rule UI keycode → device keycode translation |
//! | `selection` | Rectangle-selection state machine over a capture    |
//! | `frame`     | Raw frame → scaled render-ready bitmap pipeline     |
//! | `session`   | Device lifecycle, input routing, status publication |
//! | `capture`   | Static captures and print-screen sessions           |
//! | `export`    | Whole-or-region export to local disk or the device  |
//! | `transport` | Device transport collaborator contract              |
//! | `mirror`    | Mirroring service collaborator contract             |
//! | `error`     | `VizorError` — typed, `thiserror`-based errors      |

pub mod capture;
pub mod coords;
pub mod error;
pub mod export;
pub mod frame;
pub mod keymap;
pub mod mirror;
pub mod selection;
pub mod session;
pub mod transport;

// ── Re-exports for ergonomic usage ───────────────────────────────

pub use capture::{CaptureSession, StaticCapture};
pub use coords::{Point, Scale, to_device_space, to_ui_space};
pub use error::VizorError;
pub use export::{CaptureExporter, ExportDestination};
pub use frame::{FramePipeline, FrameSink, PixelFormat, RawFrame, ScaledBitmap};
pub use keymap::map_keycode;
pub use mirror::{KeyCommand, MirrorService, MirrorSession, Phase, TouchCommand};
pub use selection::{Rect, RegionSelector, SelectionSnapshot, SelectionState};
pub use session::{
    ConnectTarget, ControllerStatus, DevicePhase, NamedAction, SessionController,
};
pub use transport::{DeviceHandle, DeviceTransport};
