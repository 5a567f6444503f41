//! Integration tests — controller lifecycle, device switching, input
//! routing, and capture export against fake collaborators.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use image::{Rgba, RgbaImage};

use vizor_core::{
    ConnectTarget, DevicePhase, DeviceTransport, ExportDestination, FrameSink, KeyCommand,
    MirrorService, MirrorSession, NamedAction, Phase, Point, SessionController, StaticCapture,
    TouchCommand, VizorError,
};

// ── Fake device transport ────────────────────────────────────────

struct FakeTransport {
    devices: Vec<String>,
    fail_push: bool,
    pushed: Mutex<Vec<(PathBuf, String, bool)>>,
}

impl FakeTransport {
    fn with_devices(devices: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            devices: devices.iter().map(|s| s.to_string()).collect(),
            fail_push: false,
            pushed: Mutex::new(Vec::new()),
        })
    }

    fn failing_push(devices: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            devices: devices.iter().map(|s| s.to_string()).collect(),
            fail_push: true,
            pushed: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl DeviceTransport for FakeTransport {
    async fn list_devices(&self) -> Result<Vec<String>, VizorError> {
        Ok(self.devices.clone())
    }

    async fn screenshot(&self, _serial: &str) -> Result<StaticCapture, VizorError> {
        let image = RgbaImage::from_fn(12, 12, |x, y| Rgba([x as u8, y as u8, 7, 255]));
        Ok(StaticCapture::new(image))
    }

    async fn push(&self, _serial: &str, local: &Path, remote: &str) -> Result<(), VizorError> {
        self.pushed.lock().unwrap().push((
            local.to_path_buf(),
            remote.to_string(),
            local.exists(),
        ));
        if self.fail_push {
            Err(VizorError::Transport("push refused".into()))
        } else {
            Ok(())
        }
    }
}

// ── Fake mirroring service ───────────────────────────────────────

/// Records start/stop ordering and every control command it receives.
struct FakeMirror {
    log: Arc<Mutex<Vec<String>>>,
    fail_sends: Arc<AtomicBool>,
}

impl FakeMirror {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            log: Arc::new(Mutex::new(Vec::new())),
            fail_sends: Arc::new(AtomicBool::new(false)),
        })
    }

    fn log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

#[async_trait]
impl MirrorService for FakeMirror {
    async fn start(
        &self,
        serial: &str,
        _frames: FrameSink,
    ) -> Result<Box<dyn MirrorSession>, VizorError> {
        self.log.lock().unwrap().push(format!("start:{serial}"));
        Ok(Box::new(FakeSession {
            serial: serial.to_string(),
            log: Arc::clone(&self.log),
            fail_sends: Arc::clone(&self.fail_sends),
        }))
    }
}

struct FakeSession {
    serial: String,
    log: Arc<Mutex<Vec<String>>>,
    fail_sends: Arc<AtomicBool>,
}

impl MirrorSession for FakeSession {
    fn touch(&self, cmd: TouchCommand) -> Result<(), VizorError> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(VizorError::ChannelClosed);
        }
        self.log
            .lock()
            .unwrap()
            .push(format!("touch:{}:{},{},{:?}", self.serial, cmd.x, cmd.y, cmd.phase));
        Ok(())
    }

    fn keycode(&self, cmd: KeyCommand) -> Result<(), VizorError> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(VizorError::ChannelClosed);
        }
        self.log
            .lock()
            .unwrap()
            .push(format!("key:{}:{},{:?}", self.serial, cmd.keycode, cmd.phase));
        Ok(())
    }

    fn stop(&mut self) {
        self.log.lock().unwrap().push(format!("stop:{}", self.serial));
    }
}

fn controller(
    transport: &Arc<FakeTransport>,
    mirror: &Arc<FakeMirror>,
) -> SessionController {
    SessionController::new(
        Arc::clone(transport) as Arc<dyn DeviceTransport>,
        Arc::clone(mirror) as Arc<dyn MirrorService>,
    )
}

// ── Connect lifecycle ────────────────────────────────────────────

#[tokio::test]
async fn connect_first_available_binds_first_serial() {
    let transport = FakeTransport::with_devices(&["alpha", "beta"]);
    let mirror = FakeMirror::new();
    let mut ctl = controller(&transport, &mirror);

    ctl.connect(ConnectTarget::FirstAvailable).await.unwrap();

    assert!(ctl.phase().is_connected());
    assert_eq!(ctl.device().unwrap().serial(), "alpha");
    assert_eq!(mirror.log(), vec!["start:alpha"]);
}

#[tokio::test]
async fn connect_with_no_devices_reports_unavailable() {
    let transport = FakeTransport::with_devices(&[]);
    let mirror = FakeMirror::new();
    let mut ctl = controller(&transport, &mirror);

    let err = ctl.connect(ConnectTarget::FirstAvailable).await.unwrap_err();
    assert!(matches!(err, VizorError::DeviceUnavailable));
    assert_eq!(ctl.phase(), DevicePhase::Disconnected);
    assert!(mirror.log().is_empty());
}

#[tokio::test]
async fn device_switch_stops_old_session_before_starting_new() {
    let transport = FakeTransport::with_devices(&["alpha", "beta"]);
    let mirror = FakeMirror::new();
    let mut ctl = controller(&transport, &mirror);

    ctl.connect(ConnectTarget::FirstAvailable).await.unwrap();
    ctl.connect(ConnectTarget::Serial("beta".into())).await.unwrap();

    assert_eq!(mirror.log(), vec!["start:alpha", "stop:alpha", "start:beta"]);
    assert_eq!(ctl.device().unwrap().serial(), "beta");
}

#[tokio::test]
async fn unknown_serial_fails_without_touching_running_session() {
    let transport = FakeTransport::with_devices(&["alpha"]);
    let mirror = FakeMirror::new();
    let mut ctl = controller(&transport, &mirror);

    ctl.connect(ConnectTarget::FirstAvailable).await.unwrap();
    let err = ctl
        .connect(ConnectTarget::Serial("ghost".into()))
        .await
        .unwrap_err();

    assert!(matches!(err, VizorError::DeviceNotFound(s) if s == "ghost"));
    assert!(ctl.phase().is_connected());
    assert_eq!(mirror.log(), vec!["start:alpha"]);
}

#[tokio::test]
async fn connect_resets_scale_to_default() {
    let transport = FakeTransport::with_devices(&["alpha"]);
    let mirror = FakeMirror::new();
    let mut ctl = controller(&transport, &mirror);

    ctl.set_scale_percent(150);
    assert_eq!(ctl.scale_percent(), 150);

    ctl.connect(ConnectTarget::FirstAvailable).await.unwrap();
    assert_eq!(ctl.scale_percent(), 100);
}

#[tokio::test]
async fn disconnect_stops_the_session() {
    let transport = FakeTransport::with_devices(&["alpha"]);
    let mirror = FakeMirror::new();
    let mut ctl = controller(&transport, &mirror);

    ctl.connect(ConnectTarget::FirstAvailable).await.unwrap();
    ctl.disconnect();

    assert_eq!(ctl.phase(), DevicePhase::Disconnected);
    assert!(ctl.device().is_none());
    assert_eq!(mirror.log(), vec!["start:alpha", "stop:alpha"]);
}

// ── Input routing ────────────────────────────────────────────────

#[tokio::test]
async fn touch_maps_through_scale_and_truncates_at_emit() {
    let transport = FakeTransport::with_devices(&["alpha"]);
    let mirror = FakeMirror::new();
    let mut ctl = controller(&transport, &mirror);
    ctl.connect(ConnectTarget::FirstAvailable).await.unwrap();

    ctl.set_scale_percent(50);
    ctl.send_touch(Point::new(100.5, 60.0), Phase::Down);

    // 100.5 / 0.5 = 201.0, 60 / 0.5 = 120 — truncated at the boundary.
    assert_eq!(
        mirror.log().last().unwrap(),
        "touch:alpha:201,120,Down"
    );

    let status = ctl.status_receiver().borrow().clone();
    assert_eq!(status.pointer, Some((201, 120)));
    assert_eq!(status.scale_percent, 50);
}

#[tokio::test]
async fn touch_without_session_is_a_silent_noop() {
    let transport = FakeTransport::with_devices(&["alpha"]);
    let mirror = FakeMirror::new();
    let mut ctl = controller(&transport, &mirror);

    ctl.send_touch(Point::new(10.0, 10.0), Phase::Move);

    assert!(mirror.log().is_empty());
    // The informational pointer still tracks.
    let status = ctl.status_receiver().borrow().clone();
    assert_eq!(status.pointer, Some((10, 10)));
}

#[tokio::test]
async fn unmapped_key_sends_nothing() {
    let transport = FakeTransport::with_devices(&["alpha"]);
    let mirror = FakeMirror::new();
    let mut ctl = controller(&transport, &mirror);
    ctl.connect(ConnectTarget::FirstAvailable).await.unwrap();

    ctl.send_key(0x0100_0035, Phase::Down); // F6: no device equivalent
    assert_eq!(mirror.log(), vec!["start:alpha"]);

    ctl.send_key('a' as u32, Phase::Down);
    assert_eq!(mirror.log().last().unwrap(), "key:alpha:29,Down");
}

#[tokio::test]
async fn named_action_taps_down_then_up() {
    let transport = FakeTransport::with_devices(&["alpha"]);
    let mirror = FakeMirror::new();
    let mut ctl = controller(&transport, &mirror);
    ctl.connect(ConnectTarget::FirstAvailable).await.unwrap();

    ctl.send_named_action(NamedAction::Home);
    ctl.send_named_action(NamedAction::VolumeUp);

    assert_eq!(
        mirror.log()[1..],
        [
            "key:alpha:3,Down",
            "key:alpha:3,Up",
            "key:alpha:24,Down",
            "key:alpha:24,Up",
        ]
    );
}

#[tokio::test]
async fn broken_control_channel_signals_session_dropped() {
    let transport = FakeTransport::with_devices(&["alpha"]);
    let mirror = FakeMirror::new();
    let mut ctl = controller(&transport, &mirror);
    ctl.connect(ConnectTarget::FirstAvailable).await.unwrap();

    mirror.fail_sends.store(true, Ordering::SeqCst);
    ctl.send_touch(Point::new(5.0, 5.0), Phase::Down);

    let status = ctl.status_receiver().borrow().clone();
    assert!(status.session_dropped);
    assert_eq!(ctl.phase(), DevicePhase::Disconnected);

    // No auto-reconnect: further sends stay silent no-ops.
    ctl.send_touch(Point::new(6.0, 6.0), Phase::Up);
    assert_eq!(mirror.log().last().unwrap(), "stop:alpha");

    // A user-initiated connect clears the dropped flag.
    mirror.fail_sends.store(false, Ordering::SeqCst);
    ctl.connect(ConnectTarget::FirstAvailable).await.unwrap();
    assert!(!ctl.status_receiver().borrow().session_dropped);
}

// ── Capture and export ───────────────────────────────────────────

#[tokio::test]
async fn print_screen_opens_a_capture_session() {
    let transport = FakeTransport::with_devices(&["alpha"]);
    let mirror = FakeMirror::new();
    let mut ctl = controller(&transport, &mirror);
    ctl.connect(ConnectTarget::FirstAvailable).await.unwrap();

    let session = ctl.print_screen().await.unwrap();
    assert_eq!((session.capture().width(), session.capture().height()), (12, 12));
    assert!(!session.selection().export_enabled);
}

#[tokio::test]
async fn print_screen_without_device_is_rejected() {
    let transport = FakeTransport::with_devices(&["alpha"]);
    let mirror = FakeMirror::new();
    let ctl = controller(&transport, &mirror);

    let err = ctl.print_screen().await.unwrap_err();
    assert!(matches!(err, VizorError::DeviceUnavailable));
}

#[tokio::test]
async fn region_export_to_local_file() {
    let transport = FakeTransport::with_devices(&["alpha"]);
    let mirror = FakeMirror::new();
    let mut ctl = controller(&transport, &mirror);
    ctl.connect(ConnectTarget::FirstAvailable).await.unwrap();

    let mut session = ctl.print_screen().await.unwrap();
    session.pointer_down(Point::new(2.0, 2.0));
    session.pointer_move(Point::new(8.0, 6.0));
    session.pointer_up(Point::new(8.0, 6.0));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("box.png");
    session
        .export_region(&ExportDestination::Local(path.clone()))
        .await
        .unwrap();

    let written = image::open(&path).unwrap().to_rgba8();
    assert_eq!(written.dimensions(), (6, 4));
    assert_eq!(written.get_pixel(0, 0).0, [2, 2, 7, 255]);
}

#[tokio::test]
async fn device_export_cleans_temp_file_even_when_push_fails() {
    let transport = FakeTransport::failing_push(&["alpha"]);
    let mirror = FakeMirror::new();
    let mut ctl = controller(&transport, &mirror);
    ctl.connect(ConnectTarget::FirstAvailable).await.unwrap();

    let session = ctl.print_screen().await.unwrap();
    let err = session
        .export_screen(&ExportDestination::Device("/sdcard/screen.png".into()))
        .await
        .unwrap_err();
    assert!(matches!(err, VizorError::Export(_)));
    assert!(err.to_string().contains("push refused"));

    let pushed = transport.pushed.lock().unwrap();
    let (local, remote, existed_during_push) = pushed[0].clone();
    assert_eq!(remote, "/sdcard/screen.png");
    assert!(existed_during_push, "staged file must exist while pushing");
    assert!(!local.exists(), "staged file must be gone afterwards");
}
