//! Mirroring service collaborator contract.
//!
//! The mirroring service owns the device link: it produces raw frames
//! on its own thread(s) and accepts injected control commands. The
//! core treats it as a session object with start/stop and a frame
//! callback, and never reaches below this seam.
//!
//! ```text
//! SessionController ──start(serial, FrameSink)──► MirrorService
//!                                                     │
//!             ┌── touch / keycode (fire-and-forget) ──┤
//!             ▼                                       ▼
//!        MirrorSession                         FrameSink::on_frame
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::VizorError;
use crate::frame::FrameSink;

// ── Phase ────────────────────────────────────────────────────────

/// A touch or key transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Down,
    Move,
    Up,
}

// ── Control commands ─────────────────────────────────────────────

/// Touch command in integer device coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TouchCommand {
    pub x: i32,
    pub y: i32,
    pub phase: Phase,
}

/// Key command carrying a device keycode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyCommand {
    pub keycode: u16,
    pub phase: Phase,
}

// ── MirrorService / MirrorSession ────────────────────────────────

/// Factory for mirroring sessions.
#[async_trait]
pub trait MirrorService: Send + Sync {
    /// Start mirroring the given device. Frames flow into `frames`
    /// from the service's own thread(s) until the session stops.
    async fn start(
        &self,
        serial: &str,
        frames: FrameSink,
    ) -> Result<Box<dyn MirrorSession>, VizorError>;
}

/// One live mirroring session, bound to exactly one device.
///
/// Control sends are fire-and-forget: they enqueue without blocking
/// the caller. A send against a broken link reports
/// [`VizorError::ChannelClosed`] so the owner can retire the session.
pub trait MirrorSession: Send + Sync {
    /// Inject a touch event.
    fn touch(&self, cmd: TouchCommand) -> Result<(), VizorError>;

    /// Inject a key event.
    fn keycode(&self, cmd: KeyCommand) -> Result<(), VizorError>;

    /// Stop the session and release the control channel. Idempotent.
    fn stop(&mut self);
}
