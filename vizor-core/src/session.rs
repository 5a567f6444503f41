//! Session controller: device lifecycle, input routing, status.
//!
//! One controller instance owns at most one device handle and one
//! mirroring session. All mutation happens on a single logical control
//! flow; the only foreign-thread entry is the frame sink handed to the
//! mirroring service. Connects serialize through an in-progress guard
//! and a new connect unconditionally supersedes the prior session —
//! the old session is always stopped before the new one starts, so two
//! control channels are never live at once.
//!
//! ```text
//!  Disconnected ──connect──► Connecting ──► Connected
//!       ▲                        │               │
//!       └──── failure / drop ────┴── disconnect ─┘
//! ```

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::capture::CaptureSession;
use crate::coords::{self, Point, Scale};
use crate::error::VizorError;
use crate::frame::{FramePipeline, ScaledBitmap};
use crate::keymap::{self, device_keys};
use crate::mirror::{KeyCommand, MirrorService, MirrorSession, Phase, TouchCommand};
use crate::transport::{DeviceHandle, DeviceTransport};

// ── DevicePhase ──────────────────────────────────────────────────

/// The controller's position in the device-connection lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DevicePhase {
    /// No device bound. Initial and terminal state.
    #[default]
    Disconnected,
    /// A connect attempt is resolving a device and starting mirroring.
    Connecting,
    /// A mirroring session is live.
    Connected {
        /// When the session came up.
        since: Instant,
    },
}

impl DevicePhase {
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected { .. })
    }
}

impl std::fmt::Display for DevicePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disconnected => write!(f, "Disconnected"),
            Self::Connecting => write!(f, "Connecting"),
            Self::Connected { .. } => write!(f, "Connected"),
        }
    }
}

// ── ConnectTarget ────────────────────────────────────────────────

/// Which device a connect should bind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectTarget {
    /// The first device the transport enumerates.
    FirstAvailable,
    /// An explicitly named serial. Unknown serials fail the connect
    /// without disturbing a running session.
    Serial(String),
}

// ── NamedAction ──────────────────────────────────────────────────

/// Fixed hardware buttons injected as full Down+Up taps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedAction {
    Home,
    Back,
    VolumeUp,
    VolumeDown,
}

impl NamedAction {
    /// The device keycode this action presses.
    pub const fn keycode(self) -> u16 {
        match self {
            Self::Home => device_keys::HOME,
            Self::Back => device_keys::BACK,
            Self::VolumeUp => device_keys::VOLUME_UP,
            Self::VolumeDown => device_keys::VOLUME_DOWN,
        }
    }
}

// ── ControllerStatus ─────────────────────────────────────────────

/// Status surface published to the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerStatus {
    pub phase: DevicePhase,
    /// Serial of the bound device, if any.
    pub serial: Option<String>,
    /// Last pointer position in integer device coordinates.
    /// Informational only — it never drives control logic.
    pub pointer: Option<(i32, i32)>,
    /// Current display scale in percent.
    pub scale_percent: u16,
    /// Set when the live session was lost to a transport failure.
    /// Cleared by the next successful connect; reconnection is always
    /// user-initiated.
    pub session_dropped: bool,
}

impl Default for ControllerStatus {
    fn default() -> Self {
        Self {
            phase: DevicePhase::Disconnected,
            serial: None,
            pointer: None,
            scale_percent: coords::DEFAULT_SCALE_PERCENT,
            session_dropped: false,
        }
    }
}

// ── SessionController ────────────────────────────────────────────

/// Owns the active device handle and mirroring session; routes
/// translated input to the session's control channel.
pub struct SessionController {
    transport: Arc<dyn DeviceTransport>,
    mirror: Arc<dyn MirrorService>,
    phase: DevicePhase,
    device: Option<DeviceHandle>,
    session: Option<Box<dyn MirrorSession>>,
    pipeline: FramePipeline,
    scale: Scale,
    pointer: Option<(i32, i32)>,
    connecting: bool,
    dropped: bool,
    status_tx: watch::Sender<ControllerStatus>,
    status_rx: watch::Receiver<ControllerStatus>,
}

impl SessionController {
    pub fn new(transport: Arc<dyn DeviceTransport>, mirror: Arc<dyn MirrorService>) -> Self {
        let scale = Scale::new();
        let pipeline = FramePipeline::new(scale.clone());
        let (status_tx, status_rx) = watch::channel(ControllerStatus::default());
        Self {
            transport,
            mirror,
            phase: DevicePhase::Disconnected,
            device: None,
            session: None,
            pipeline,
            scale,
            pointer: None,
            connecting: false,
            dropped: false,
            status_tx,
            status_rx,
        }
    }

    // ── Observation ──────────────────────────────────────────────

    pub fn phase(&self) -> DevicePhase {
        self.phase
    }

    /// The bound device, if any.
    pub fn device(&self) -> Option<&DeviceHandle> {
        self.device.as_ref()
    }

    /// Receiver for scaled render-ready bitmaps.
    pub fn frame_receiver(&self) -> watch::Receiver<Option<ScaledBitmap>> {
        self.pipeline.frame_receiver()
    }

    /// Receiver for status updates (phase, pointer, scale).
    pub fn status_receiver(&self) -> watch::Receiver<ControllerStatus> {
        self.status_rx.clone()
    }

    pub fn scale_percent(&self) -> u16 {
        self.scale.percent()
    }

    // ── Device lifecycle ─────────────────────────────────────────

    /// Enumerate attached devices. An empty list is a valid result.
    pub async fn list_devices(&self) -> Result<Vec<String>, VizorError> {
        self.transport.list_devices().await
    }

    /// Connect to a device, superseding any running session.
    ///
    /// Idempotent with respect to teardown: a running session is
    /// stopped before the new one starts; a first connect skips the
    /// teardown. Overlapping connects are rejected with
    /// [`VizorError::ConnectBusy`].
    pub async fn connect(&mut self, target: ConnectTarget) -> Result<(), VizorError> {
        if self.connecting {
            return Err(VizorError::ConnectBusy);
        }
        self.connecting = true;
        let result = self.connect_inner(target).await;
        self.connecting = false;
        result
    }

    async fn connect_inner(&mut self, target: ConnectTarget) -> Result<(), VizorError> {
        let devices = self.transport.list_devices().await?;
        let serial = match target {
            ConnectTarget::Serial(s) => {
                if !devices.iter().any(|d| d == &s) {
                    return Err(VizorError::DeviceNotFound(s));
                }
                s
            }
            ConnectTarget::FirstAvailable => devices
                .first()
                .cloned()
                .ok_or(VizorError::DeviceUnavailable)?,
        };

        // Teardown before create: at most one control channel is ever
        // live for this controller.
        if let Some(mut old) = self.session.take() {
            debug!("stopping previous session");
            old.stop();
        }

        self.dropped = false;
        self.phase = DevicePhase::Connecting;
        self.publish_status();

        match self.mirror.start(&serial, self.pipeline.sink()).await {
            Ok(session) => {
                info!(serial = %serial, "mirroring session started");
                self.session = Some(session);
                self.device = Some(DeviceHandle::new(
                    serial,
                    Arc::clone(&self.transport),
                ));
                // Switching device invalidates prior framing assumptions.
                self.scale.reset();
                self.pointer = None;
                self.phase = DevicePhase::Connected {
                    since: Instant::now(),
                };
                self.publish_status();
                Ok(())
            }
            Err(e) => {
                warn!("connect failed: {e}");
                self.device = None;
                self.phase = DevicePhase::Disconnected;
                self.publish_status();
                Err(e)
            }
        }
    }

    /// Stop the session and drop the device handle.
    pub fn disconnect(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.stop();
        }
        self.device = None;
        self.phase = DevicePhase::Disconnected;
        self.publish_status();
    }

    // ── Input routing ────────────────────────────────────────────

    /// Forward a pointer event at a UI-space position.
    ///
    /// The point is mapped to device space under the current scale;
    /// truncation to integer device pixels happens here, at the emit
    /// boundary. A no-op when no session is live.
    pub fn send_touch(&mut self, at: Point, phase: Phase) {
        let device_pt = coords::to_device_space(at, self.scale.ratio());
        let (x, y) = (device_pt.x as i32, device_pt.y as i32);
        self.pointer = Some((x, y));

        let result = match &self.session {
            Some(session) => session.touch(TouchCommand { x, y, phase }),
            None => Ok(()),
        };
        match result {
            Ok(()) => self.publish_status(),
            Err(e) => self.handle_session_drop(e),
        }
    }

    /// Forward a key event by UI keycode. Keys with no device
    /// equivalent send nothing; a no-op when no session is live.
    pub fn send_key(&mut self, ui_code: u32, phase: Phase) {
        let Some(keycode) = keymap::map_keycode(ui_code) else {
            return;
        };
        let result = match &self.session {
            Some(session) => session.keycode(KeyCommand { keycode, phase }),
            None => Ok(()),
        };
        if let Err(e) = result {
            self.handle_session_drop(e);
        }
    }

    /// Press a fixed hardware button as a full Down+Up tap.
    pub fn send_named_action(&mut self, action: NamedAction) {
        let keycode = action.keycode();
        let result = match &self.session {
            Some(session) => session
                .keycode(KeyCommand {
                    keycode,
                    phase: Phase::Down,
                })
                .and_then(|_| {
                    session.keycode(KeyCommand {
                        keycode,
                        phase: Phase::Up,
                    })
                }),
            None => Ok(()),
        };
        if let Err(e) = result {
            self.handle_session_drop(e);
        }
    }

    // ── Scale ────────────────────────────────────────────────────

    /// Set the display scale in percent (clamped to 20..=200).
    pub fn set_scale_percent(&mut self, percent: u16) {
        self.scale.set_percent(percent);
        self.publish_status();
    }

    /// Step the scale up by one increment.
    pub fn zoom_in(&mut self) {
        self.scale.step_in();
        self.publish_status();
    }

    /// Step the scale down by one increment.
    pub fn zoom_out(&mut self) {
        self.scale.step_out();
        self.publish_status();
    }

    // ── Capture ──────────────────────────────────────────────────

    /// Take a full-resolution screenshot of the bound device and open
    /// a capture session over it. Independent of the live frame
    /// stream.
    pub async fn print_screen(&self) -> Result<CaptureSession, VizorError> {
        let device = self.device.clone().ok_or(VizorError::DeviceUnavailable)?;
        let capture = device.screenshot().await?;
        Ok(CaptureSession::new(capture, device))
    }

    // ── Internals ────────────────────────────────────────────────

    /// The control channel broke mid-session. Retire the session and
    /// signal the drop; reconnection is up to the user.
    fn handle_session_drop(&mut self, err: VizorError) {
        warn!("mirror session dropped: {err}");
        if let Some(mut session) = self.session.take() {
            session.stop();
        }
        self.phase = DevicePhase::Disconnected;
        self.dropped = true;
        self.publish_status();
    }

    fn publish_status(&self) {
        let status = ControllerStatus {
            phase: self.phase,
            serial: self.device.as_ref().map(|d| d.serial().to_string()),
            pointer: self.pointer,
            scale_percent: self.scale.percent(),
            session_dropped: self.dropped,
        };
        let _ = self.status_tx.send(status);
    }
}
