//! Operator tool configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Top-level configuration for the operator tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// adb invocation settings.
    pub adb: AdbConfig,
    /// Capture export defaults.
    pub capture: CaptureConfig,
    /// Logging.
    pub logging: LoggingConfig,
}

/// adb invocation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdbConfig {
    /// Path to the adb binary (name alone resolves via PATH).
    pub path: String,
}

/// Capture export defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Default local export path.
    pub local_path: String,
    /// Default on-device export path.
    pub remote_path: String,
}

/// Logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level.
    pub level: String,
}

// ── Defaults ─────────────────────────────────────────────────────

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            adb: AdbConfig::default(),
            capture: CaptureConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for AdbConfig {
    fn default() -> Self {
        Self { path: "adb".into() }
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            local_path: "screen.png".into(),
            remote_path: "/sdcard/screen.png".into(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

// ── Loading ──────────────────────────────────────────────────────

impl CliConfig {
    /// Load from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!("invalid config {}: {e}; using defaults", path.display());
                Self::default()
            }),
            Err(_) => {
                tracing::info!("no config at {}; using defaults", path.display());
                Self::default()
            }
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────
