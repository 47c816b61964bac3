//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.
//!
//! Every section and field is optional; an empty file yields
//! [`Config::default()`].

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{GimbalError, Result};
use crate::gimbal::layout::{LayoutOverrides, Platform};

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub frame: FrameConfig,
    #[serde(default)]
    pub hit: HitConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Per-device replacements for the built-in layout tables
    #[serde(default)]
    pub layouts: LayoutOverrides,
}

/// Input device configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct InputConfig {
    /// evdev nodes to open; empty scans `/dev/input`
    #[serde(default)]
    pub device_paths: Vec<PathBuf>,

    /// Layout table to use; defaults to the build target
    #[serde(default)]
    pub platform: Option<Platform>,
}

/// Frame loop configuration
#[derive(Debug, Deserialize, Clone)]
pub struct FrameConfig {
    #[serde(default = "default_rate_hz")]
    pub rate_hz: u32,

    #[serde(default = "default_status_interval_frames")]
    pub status_interval_frames: u64,

    /// Look for newly plugged devices once per this many frames
    #[serde(default = "default_rescan_interval_frames")]
    pub rescan_interval_frames: u64,
}

/// Drum hit window configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HitConfig {
    #[serde(default = "default_window_ms")]
    pub window_ms: u64,

    #[serde(default = "default_max_hits")]
    pub max_hits: usize,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct LoggingConfig {
    /// Also write logs to this file; empty logs to stdout only
    #[serde(default)]
    pub file: String,
}

// Default value functions
fn default_rate_hz() -> u32 { 30 }
fn default_status_interval_frames() -> u64 { 30 }
fn default_rescan_interval_frames() -> u64 { 60 }

fn default_window_ms() -> u64 { 1000 }
fn default_max_hits() -> usize { 10 }

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            rate_hz: default_rate_hz(),
            status_interval_frames: default_status_interval_frames(),
            rescan_interval_frames: default_rescan_interval_frames(),
        }
    }
}

impl Default for HitConfig {
    fn default() -> Self {
        Self {
            window_ms: default_window_ms(),
            max_hits: default_max_hits(),
        }
    }
}

impl FrameConfig {
    /// Time between frames.
    #[must_use]
    pub fn period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.rate_hz.max(1)))
    }
}

impl HitConfig {
    #[must_use]
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }
}

impl InputConfig {
    /// Configured platform, or the one this binary was built for.
    #[must_use]
    pub fn platform(&self) -> Platform {
        self.platform.unwrap_or_else(Platform::current)
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// * `Result<Config>` - Loaded and validated configuration
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use sim_gimbal::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate configuration from a TOML string
    ///
    /// # Errors
    ///
    /// Returns error if TOML parsing or validation fails
    pub fn parse(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range or a
    /// layout override carries a malformed calibration profile
    pub fn validate(&self) -> Result<()> {
        if self.frame.rate_hz == 0 || self.frame.rate_hz > 1000 {
            return Err(GimbalError::Config(
                toml::de::Error::custom("rate_hz must be between 1 and 1000")
            ));
        }

        if self.frame.status_interval_frames == 0 {
            return Err(GimbalError::Config(
                toml::de::Error::custom("status_interval_frames must be greater than 0")
            ));
        }

        if self.frame.rescan_interval_frames == 0 {
            return Err(GimbalError::Config(
                toml::de::Error::custom("rescan_interval_frames must be greater than 0")
            ));
        }

        if self.hit.window_ms == 0 || self.hit.window_ms > 10000 {
            return Err(GimbalError::Config(
                toml::de::Error::custom("window_ms must be between 1 and 10000")
            ));
        }

        if self.hit.max_hits == 0 {
            return Err(GimbalError::Config(
                toml::de::Error::custom("max_hits must be greater than 0")
            ));
        }

        self.layouts.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    // ==================== Default Tests ====================

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.frame.rate_hz, 30);
        assert_eq!(config.hit.max_hits, 10);
        assert!(config.input.device_paths.is_empty());
        assert!(config.logging.file.is_empty());
    }

    #[test]
    fn test_empty_file_matches_default() {
        let config = Config::parse("").unwrap();
        let default = Config::default();
        assert_eq!(config.frame.rate_hz, default.frame.rate_hz);
        assert_eq!(config.frame.status_interval_frames, default.frame.status_interval_frames);
        assert_eq!(config.hit.window_ms, default.hit.window_ms);
        assert_eq!(config.layouts, default.layouts);
    }

    #[test]
    fn test_default_functions() {
        assert_eq!(default_rate_hz(), 30);
        assert_eq!(default_status_interval_frames(), 30);
        assert_eq!(default_rescan_interval_frames(), 60);
        assert_eq!(default_window_ms(), 1000);
        assert_eq!(default_max_hits(), 10);
    }

    #[test]
    fn test_durations() {
        let config = Config::default();
        assert_eq!(config.hit.window(), Duration::from_secs(1));

        let frame = FrameConfig {
            rate_hz: 50,
            status_interval_frames: 1,
            rescan_interval_frames: 1,
        };
        assert_eq!(frame.period(), Duration::from_millis(20));
    }

    #[test]
    fn test_platform_override() {
        let config = Config::parse("[input]\nplatform = \"windows\"\n").unwrap();
        assert_eq!(config.input.platform(), Platform::Windows);
        assert_eq!(Config::default().input.platform(), Platform::current());
    }

    // ==================== Validation Tests ====================

    #[test]
    fn test_rate_out_of_range() {
        let mut config = Config::default();
        config.frame.rate_hz = 0;
        assert!(config.validate().is_err());
        config.frame.rate_hz = 1001;
        assert!(config.validate().is_err());
        config.frame.rate_hz = 1000;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_status_interval() {
        let mut config = Config::default();
        config.frame.status_interval_frames = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_rescan_interval() {
        let mut config = Config::default();
        config.frame.rescan_interval_frames = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_hit_window_out_of_range() {
        let mut config = Config::default();
        config.hit.window_ms = 0;
        assert!(config.validate().is_err());
        config.hit.window_ms = 10001;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_max_hits() {
        let mut config = Config::default();
        config.hit.max_hits = 0;
        assert!(matches!(config.validate(), Err(GimbalError::Config(_))));
    }

    #[test]
    fn test_bad_layout_override_rejected() {
        let toml_content = r#"
[layouts.xbox.left_trigger]
axis = 2
raw_min = 0.0
raw_mid = 0.0
raw_max = 1.0
out_min = 0.0
out_mid = 0.5
out_max = 1.0

[layouts.xbox.right_x]
axis = 3
raw_min = -1.0
raw_mid = 0.0
raw_max = 1.0
out_min = -1.0
out_mid = 0.0
out_max = 1.0

[layouts.xbox.right_y]
axis = 4
raw_min = -1.0
raw_mid = 0.0
raw_max = 1.0
out_min = -1.0
out_mid = 0.0
out_max = 1.0
"#;
        assert!(matches!(
            Config::parse(toml_content),
            Err(GimbalError::Calibration(_))
        ));
    }

    // ==================== File Loading Tests ====================

    #[test]
    fn test_load_config_from_file() {
        let toml_content = r#"
[input]
device_paths = ["/dev/input/event7"]

[frame]
rate_hz = 60

[hit]
window_ms = 750
max_hits = 8

[logging]
file = "sim-gimbal.log"

[layouts.drum]
red = 0
yellow = 1
blue = 2
green = 3
kick = 4
select = 8
home = 12
start = 9
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = Config::load(temp_file.path()).unwrap();
        assert_eq!(config.input.device_paths, vec![PathBuf::from("/dev/input/event7")]);
        assert_eq!(config.frame.rate_hz, 60);
        assert_eq!(config.frame.status_interval_frames, 30);
        assert_eq!(config.frame.rescan_interval_frames, 60);
        assert_eq!(config.hit.window(), Duration::from_millis(750));
        assert_eq!(config.hit.max_hits, 8);
        assert_eq!(config.logging.file, "sim-gimbal.log");
        assert_eq!(config.layouts.drum.map(|d| d.green), Some(3));
        assert!(config.layouts.guitar.is_none());
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load("/nonexistent/sim-gimbal.toml");
        assert!(matches!(result, Err(GimbalError::Io(_))));
    }

    #[test]
    fn test_load_invalid_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"[frame\nrate_hz = ").unwrap();
        assert!(matches!(
            Config::load(temp_file.path()),
            Err(GimbalError::Config(_))
        ));
    }

    #[test]
    fn test_load_bundled_default() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config/default.toml");
        let config = Config::load(path).unwrap();
        assert_eq!(config.frame.rate_hz, default_rate_hz());
        assert_eq!(config.hit.max_hits, default_max_hits());
    }
}
