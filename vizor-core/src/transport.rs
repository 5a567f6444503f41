//! Device transport collaborator contract.
//!
//! The transport owns device enumeration, synchronous screenshot
//! capture, and file push. The core calls it and never manages its
//! retry or transport policy. Implementations keep any blocking work
//! (subprocesses, USB round-trips) inside their async methods so the
//! control flow never stalls.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::capture::StaticCapture;
use crate::error::VizorError;

// ── DeviceTransport ──────────────────────────────────────────────

/// Capabilities the core consumes from the device side.
#[async_trait]
pub trait DeviceTransport: Send + Sync {
    /// Enumerate attached devices, in transport order. An empty list
    /// is a valid result (no devices attached), not an error.
    async fn list_devices(&self) -> Result<Vec<String>, VizorError>;

    /// Capture a full-resolution screenshot of the given device.
    async fn screenshot(&self, serial: &str) -> Result<StaticCapture, VizorError>;

    /// Push a local file to a path on the device.
    async fn push(&self, serial: &str, local: &Path, remote: &str) -> Result<(), VizorError>;
}

// ── DeviceHandle ─────────────────────────────────────────────────

/// One attached device: its serial plus the transport capabilities
/// scoped to it.
///
/// The session controller owns exactly one of these at a time and
/// replaces it wholesale on device switch.
#[derive(Clone)]
pub struct DeviceHandle {
    serial: String,
    transport: Arc<dyn DeviceTransport>,
}

impl DeviceHandle {
    pub fn new(serial: impl Into<String>, transport: Arc<dyn DeviceTransport>) -> Self {
        Self {
            serial: serial.into(),
            transport,
        }
    }

    pub fn serial(&self) -> &str {
        &self.serial
    }

    /// Capture a full-resolution screenshot of this device.
    pub async fn screenshot(&self) -> Result<StaticCapture, VizorError> {
        self.transport.screenshot(&self.serial).await
    }

    /// Push a local file onto this device.
    pub async fn push(&self, local: &Path, remote: &str) -> Result<(), VizorError> {
        self.transport.push(&self.serial, local, remote).await
    }
}

impl fmt::Debug for DeviceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceHandle")
            .field("serial", &self.serial)
            .finish_non_exhaustive()
    }
}
