//! # Sim Gimbal
//!
//! Fly with a dance pad, drum kit, steering wheel, guitar or gamepad.
//!
//! This application opens every connected joystick, recognises each one by
//! name and turns its input into throttle, aileron and elevator channels.
//! Devices can be plugged in and pulled out while it runs.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};
use tracing_subscriber::fmt::writer::MakeWriterExt;

use sim_gimbal::config::Config;
use sim_gimbal::controller::joystick::{list_event_nodes, unattached_nodes, JoystickDevice};
use sim_gimbal::gimbal::factory::GimbalFactory;
use sim_gimbal::gimbal::{ChannelReading, Gimbal};

/// Configuration file used when no path is given on the command line
const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// A connected device and the gimbal reading it.
struct Attached {
    device: JoystickDevice,
    gimbal: Gimbal,
    last: Option<ChannelReading>,
}

/// Main entry point for Sim Gimbal
///
/// # Control Flow
///
/// 1. **Initialization**
///    - Load configuration (first argument, else `config/default.toml`, else defaults)
///    - Set up logging with tracing subscriber, optionally teeing to a file
///    - Open connected joystick devices and build one gimbal per device
///
/// 2. **Main Loop**
///    - Every frame, snapshot each device and read its three channels
///    - Drop devices that can no longer be read
///    - Every `rescan_interval_frames`, attach newly plugged devices
///    - Log every gimbal's channels every `status_interval_frames`
///    - Handle Ctrl+C for graceful shutdown
///
/// # Errors
///
/// Returns error if:
/// - The configuration file cannot be loaded or is invalid
/// - A device layout carries a malformed calibration profile
///
/// # Examples
///
/// ```bash
/// cargo run --release -- config/default.toml
/// ```
///
/// Expected output:
/// ```text
/// INFO sim_gimbal::gimbal::factory: Device 'Harmonix Drum Kit' (#0) recognised as drum kit
/// INFO sim_gimbal: Attached 'Harmonix Drum Kit' at /dev/input/event5 (#0)
/// INFO sim_gimbal: #0 Harmonix Drum Kit: throttle -1.00 aileron 0.00 elevator 0.00
/// ```
#[tokio::main]
async fn main() -> Result<()> {
    let config = load_config(std::env::args().nth(1))?;

    // Keeps the file writer flushing until exit
    let _log_guard = init_logging(&config.logging.file)?;

    info!("Sim Gimbal v{} starting...", env!("CARGO_PKG_VERSION"));

    let factory = GimbalFactory::from_config(&config);
    let mut attached: Vec<Attached> = Vec::new();
    let mut next_id: u32 = 0;
    attach_new(&mut attached, &mut next_id, &factory, &config.input.device_paths)?;
    if attached.is_empty() {
        info!("No devices connected yet, waiting for one to be plugged in");
    }

    let mut frame_interval = interval(config.frame.period());
    frame_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(
        "Reading {} device(s) at {}Hz",
        attached.len(),
        config.frame.rate_hz
    );
    info!("Press Ctrl+C to exit");

    let mut frame_count: u64 = 0;

    loop {
        tokio::select! {
            _ = frame_interval.tick() => {
                let now = Instant::now();
                attached.retain_mut(|entry| match entry.device.snapshot() {
                    Ok(snapshot) => {
                        entry.last = Some(entry.gimbal.read(&snapshot, now));
                        true
                    }
                    Err(e) => {
                        warn!("{}", e);
                        info!(
                            "Device '{}' (#{}) disconnected",
                            entry.gimbal.name(),
                            entry.gimbal.instance_id()
                        );
                        false
                    }
                });

                frame_count += 1;
                if frame_count % config.frame.rescan_interval_frames == 0 {
                    attach_new(&mut attached, &mut next_id, &factory, &config.input.device_paths)?;
                }

                if frame_count % config.frame.status_interval_frames == 0 {
                    for entry in &attached {
                        if let Some(reading) = entry.last {
                            info!("{}", status_line(&entry.gimbal, &reading));
                        }
                    }
                }
            }

            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down...");
                break;
            }
        }
    }

    info!("Total frames: {}", frame_count);
    Ok(())
}

/// Open every candidate node that is not attached yet and build its gimbal.
///
/// Nodes that fail to open (not a joystick, permissions, gone) are skipped
/// and retried on the next rescan. Instance ids are never reused.
///
/// # Errors
///
/// Returns error if a gimbal cannot be built for a recognised device
fn attach_new(
    attached: &mut Vec<Attached>,
    next_id: &mut u32,
    factory: &GimbalFactory,
    device_paths: &[PathBuf],
) -> Result<()> {
    let candidates = match candidate_nodes(device_paths) {
        Ok(candidates) => candidates,
        Err(e) => {
            warn!("{}", e);
            return Ok(());
        }
    };
    let new_nodes = unattached_nodes(candidates, attached.iter().map(|entry| entry.device.path()));

    for path in new_nodes {
        let device = match JoystickDevice::open(&path, *next_id) {
            Ok(device) => device,
            Err(e) => {
                debug!("Skipping {}: {}", path.display(), e);
                continue;
            }
        };
        *next_id += 1;

        let gimbal = factory
            .build(device.name(), device.instance_id())
            .with_context(|| format!("Failed to set up '{}'", device.name()))?;
        info!(
            "Attached '{}' at {} (#{})",
            device.name(),
            path.display(),
            device.instance_id()
        );
        attached.push(Attached {
            device,
            gimbal,
            last: None,
        });
    }

    Ok(())
}

/// Nodes to watch: the configured paths, or every `/dev/input/event*` node.
fn candidate_nodes(device_paths: &[PathBuf]) -> sim_gimbal::error::Result<Vec<PathBuf>> {
    if device_paths.is_empty() {
        list_event_nodes()
    } else {
        Ok(device_paths.to_vec())
    }
}

/// Load configuration from `arg`, the default path, or built-in defaults.
///
/// An explicitly given path must exist; the default path is optional.
fn load_config(arg: Option<String>) -> Result<Config> {
    match arg {
        Some(path) => Config::load(&path).with_context(|| format!("Failed to load {}", path)),
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => Config::load(DEFAULT_CONFIG_PATH)
            .with_context(|| format!("Failed to load {}", DEFAULT_CONFIG_PATH)),
        None => Ok(Config::default()),
    }
}

/// Install the tracing subscriber, teeing to `file` when it is non-empty.
fn init_logging(file: &str) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    if file.is_empty() {
        tracing_subscriber::fmt().with_env_filter(filter).init();
        return Ok(None);
    }

    let path = PathBuf::from(file);
    let directory = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file_name = path
        .file_name()
        .with_context(|| format!("Log file '{}' has no file name", file))?;

    let appender = tracing_appender::rolling::never(directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(std::io::stdout.and(writer))
        .init();

    Ok(Some(guard))
}

fn status_line(gimbal: &Gimbal, reading: &ChannelReading) -> String {
    format!(
        "#{} {}: throttle {:.2} aileron {:.2} elevator {:.2}",
        gimbal.instance_id(),
        gimbal.name(),
        reading.throttle,
        reading.aileron,
        reading.elevator
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use sim_gimbal::gimbal::Pipeline;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config_path() {
        assert_eq!(DEFAULT_CONFIG_PATH, "config/default.toml");
    }

    #[test]
    fn test_load_explicit_config() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"[frame]\nrate_hz = 120\n").unwrap();

        let path = temp_file.path().to_string_lossy().to_string();
        let config = load_config(Some(path)).unwrap();
        assert_eq!(config.frame.rate_hz, 120);
    }

    #[test]
    fn test_missing_explicit_config_fails() {
        assert!(load_config(Some("/nonexistent/sim-gimbal.toml".to_string())).is_err());
    }

    #[test]
    fn test_configured_paths_are_candidates() {
        let paths = vec![PathBuf::from("/dev/input/event7"), PathBuf::from("/dev/input/event3")];
        assert_eq!(candidate_nodes(&paths).unwrap(), paths);
    }

    #[test]
    fn test_attach_skips_unopenable_nodes() {
        let factory = GimbalFactory::for_platform(sim_gimbal::gimbal::layout::Platform::Linux);
        let mut attached = Vec::new();
        let mut next_id = 4;
        let paths = vec![PathBuf::from("/nonexistent/event0")];

        attach_new(&mut attached, &mut next_id, &factory, &paths).unwrap();
        assert!(attached.is_empty());
        assert_eq!(next_id, 4);
    }

    #[test]
    fn test_status_line_format() {
        let gimbal = Gimbal::new("Flight Stick", 2, Pipeline::Unclassified);
        let reading = ChannelReading {
            throttle: -1.0,
            aileron: 0.25,
            elevator: -0.5,
        };
        assert_eq!(
            status_line(&gimbal, &reading),
            "#2 Flight Stick: throttle -1.00 aileron 0.25 elevator -0.50"
        );
    }
}
