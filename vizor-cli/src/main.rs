//! Vizor operator tool — entry point.
//!
//! ```text
//! vizor devices                                List attached devices
//! vizor screenshot                             Capture to the default local path
//! vizor screenshot --out shot.png              Capture to a file
//! vizor screenshot --push /sdcard/shot.png     Capture and push to the device
//! vizor screenshot --push                      Push to the configured remote path
//! vizor screenshot --region 10,20,300,200 …    Export a sub-region
//! vizor --gen-config                           Dump default config and exit
//! ```

mod config;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use vizor_adb::AdbTransport;
use vizor_core::{
    CaptureExporter, DeviceHandle, DeviceTransport, ExportDestination, Rect, VizorError,
};

use crate::config::CliConfig;

// ── CLI ──────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "vizor", about = "Vizor device mirror operator tool")]
struct Cli {
    /// Path to configuration TOML file.
    #[arg(short, long, default_value = "vizor.toml")]
    config: PathBuf,

    /// Device serial (defaults to the first attached device).
    #[arg(short, long)]
    serial: Option<String>,

    /// Print the default configuration to stdout and exit.
    #[arg(long)]
    gen_config: bool,

    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// List attached devices.
    Devices,
    /// Capture a screenshot and export it.
    Screenshot {
        /// Local file to write.
        #[arg(long)]
        out: Option<PathBuf>,

        /// On-device path to push to. With no value, uses the
        /// configured `capture.remote_path`.
        #[arg(long)]
        push: Option<Option<String>>,

        /// Sub-region to export, as `x,y,width,height` in device pixels.
        #[arg(long, value_parser = parse_rect)]
        region: Option<Rect>,
    },
}

/// Parse `x,y,width,height` into a rectangle.
fn parse_rect(raw: &str) -> Result<Rect, String> {
    let parts: Vec<&str> = raw.split(',').collect();
    if parts.len() != 4 {
        return Err("expected x,y,width,height".into());
    }
    let mut nums = [0u32; 4];
    for (slot, part) in nums.iter_mut().zip(&parts) {
        *slot = part
            .trim()
            .parse()
            .map_err(|e| format!("bad component {part:?}: {e}"))?;
    }
    let rect = Rect::new(nums[0], nums[1], nums[2], nums[3]);
    if rect.width == 0 || rect.height == 0 {
        return Err("region must have non-zero extent".into());
    }
    Ok(rect)
}

// ── Main ─────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.gen_config {
        let text = toml::to_string_pretty(&CliConfig::default())?;
        println!("{text}");
        return Ok(());
    }

    let config = CliConfig::load(&cli.config);

    // Init tracing.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let transport: Arc<dyn DeviceTransport> =
        Arc::new(AdbTransport::with_path(&config.adb.path));

    match cli.command {
        None | Some(CliCommand::Devices) => {
            let devices = transport.list_devices().await?;
            if devices.is_empty() {
                println!("(no devices attached)");
            } else {
                for serial in devices {
                    println!("{serial}");
                }
            }
        }
        Some(CliCommand::Screenshot { out, push, region }) => {
            let serial = match cli.serial {
                Some(s) => s,
                None => transport
                    .list_devices()
                    .await?
                    .into_iter()
                    .next()
                    .ok_or(VizorError::DeviceUnavailable)?,
            };
            let device = DeviceHandle::new(serial, Arc::clone(&transport));

            info!(serial = device.serial(), "capturing screenshot");
            let capture = device.screenshot().await?;
            info!(
                width = capture.width(),
                height = capture.height(),
                "capture complete"
            );

            let exporter = CaptureExporter::new(device);
            let mut destinations = Vec::new();
            if let Some(path) = out {
                destinations.push(ExportDestination::Local(path));
            }
            if let Some(remote) = push {
                let remote = remote.unwrap_or_else(|| config.capture.remote_path.clone());
                destinations.push(ExportDestination::Device(remote));
            }
            if destinations.is_empty() {
                destinations.push(ExportDestination::Local(
                    config.capture.local_path.clone().into(),
                ));
            }

            for dest in &destinations {
                exporter.export(&capture, region, dest).await?;
                match dest {
                    ExportDestination::Local(path) => {
                        println!("wrote {}", path.display());
                    }
                    ExportDestination::Device(remote) => {
                        println!("pushed {remote}");
                    }
                }
            }
        }
    }

    Ok(())
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rect_accepts_well_formed_input() {
        assert_eq!(
            parse_rect("10,20,300,200").unwrap(),
            Rect::new(10, 20, 300, 200)
        );
        assert_eq!(parse_rect(" 0 , 0 , 1 , 1 ").unwrap(), Rect::new(0, 0, 1, 1));
    }

    #[test]
    fn parse_rect_rejects_malformed_input() {
        assert!(parse_rect("10,20,300").is_err());
        assert!(parse_rect("a,b,c,d").is_err());
        assert!(parse_rect("10,20,0,200").is_err());
    }
}
