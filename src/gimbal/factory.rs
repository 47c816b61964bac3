//! # Gimbal Factory
//!
//! Recognises a device from its reported name and builds its [`Gimbal`].
//!
//! Classification is a case-insensitive substring match, checked in order:
//!
//! | Name contains | Variant |
//! |---------------|---------|
//! | `gamepad` | [`DeviceVariant::DdrPad`] |
//! | `drum` | [`DeviceVariant::Drum`] |
//! | `windows` | [`DeviceVariant::GuitarController`] |
//! | `driving`, `steering` | [`DeviceVariant::SteeringWheel`] |
//! | `xbox` | [`DeviceVariant::Xbox360Style`] |
//!
//! Anything else is [`DeviceVariant::Unclassified`].

use std::time::Duration;

use tracing::{info, warn};

use crate::config::Config;
use crate::controller::input::InputSource;
use crate::controller::pressure::{DEFAULT_HIT_WINDOW, DEFAULT_MAX_HITS};
use crate::error::Result;

use super::ddr_pad::DdrPadGimbal;
use super::drum::DrumGimbal;
use super::guitar::GuitarGimbal;
use super::layout::{DeviceLayouts, Platform};
use super::steering_wheel::SteeringWheelGimbal;
use super::xbox::XboxGimbal;
use super::{DeviceVariant, Gimbal, Pipeline};

/// Name fragments in match order.
const NAME_PATTERNS: &[(&str, DeviceVariant)] = &[
    ("gamepad", DeviceVariant::DdrPad),
    ("drum", DeviceVariant::Drum),
    ("windows", DeviceVariant::GuitarController),
    ("driving", DeviceVariant::SteeringWheel),
    ("steering", DeviceVariant::SteeringWheel),
    ("xbox", DeviceVariant::Xbox360Style),
];

/// Classifies a device by name. Never fails.
///
/// # Examples
///
/// ```
/// use sim_gimbal::gimbal::factory::classify;
/// use sim_gimbal::gimbal::DeviceVariant;
///
/// assert_eq!(classify("Xbox 360 Controller"), DeviceVariant::Xbox360Style);
/// assert_eq!(classify("Unknown Device"), DeviceVariant::Unclassified);
/// ```
#[must_use]
pub fn classify(name: &str) -> DeviceVariant {
    let name = name.to_lowercase();
    NAME_PATTERNS
        .iter()
        .find(|(pattern, _)| name.contains(pattern))
        .map_or(DeviceVariant::Unclassified, |&(_, variant)| variant)
}

/// Builds gimbals from one set of layouts and hit window settings.
#[derive(Debug, Clone)]
pub struct GimbalFactory {
    layouts: DeviceLayouts,
    hit_window: Duration,
    max_hits: usize,
}

impl GimbalFactory {
    /// Creates a factory for explicit layouts with the default hit window.
    #[must_use]
    pub fn new(layouts: DeviceLayouts) -> Self {
        Self {
            layouts,
            hit_window: DEFAULT_HIT_WINDOW,
            max_hits: DEFAULT_MAX_HITS,
        }
    }

    /// Creates a factory with a platform's built-in layouts.
    #[must_use]
    pub fn for_platform(platform: Platform) -> Self {
        Self::new(DeviceLayouts::for_platform(platform))
    }

    /// Replaces the drum hit window.
    #[must_use]
    pub fn with_hit_window(mut self, window: Duration, max_hits: usize) -> Self {
        self.hit_window = window;
        self.max_hits = max_hits;
        self
    }

    /// Creates a factory from configuration: platform tables, layout
    /// overrides and hit window.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let base = DeviceLayouts::for_platform(config.input.platform());
        Self::new(config.layouts.apply(base))
            .with_hit_window(config.hit.window(), config.hit.max_hits)
    }

    #[must_use]
    pub fn layouts(&self) -> &DeviceLayouts {
        &self.layouts
    }

    /// Classifies `name` and builds the matching gimbal.
    ///
    /// Unrecognised names yield an inert gimbal and a warning.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::GimbalError::Calibration`] when the device's
    /// layout carries a malformed calibration profile.
    pub fn build(&self, name: &str, instance_id: u32) -> Result<Gimbal> {
        let variant = classify(name);
        let layouts = &self.layouts;

        let pipeline = match variant {
            DeviceVariant::DdrPad => Pipeline::DdrPad(DdrPadGimbal::new(layouts.ddr_pad)),
            DeviceVariant::Drum => Pipeline::Drum(DrumGimbal::new(
                layouts.drum,
                self.hit_window,
                self.max_hits,
            )),
            DeviceVariant::SteeringWheel => {
                Pipeline::SteeringWheel(SteeringWheelGimbal::new(layouts.steering_wheel)?)
            }
            DeviceVariant::Xbox360Style => Pipeline::Xbox360Style(XboxGimbal::new(layouts.xbox)?),
            DeviceVariant::GuitarController => {
                Pipeline::GuitarController(GuitarGimbal::new(layouts.guitar))
            }
            DeviceVariant::Unclassified => {
                warn!("Unrecognised device '{}' (#{}), channels held neutral", name, instance_id);
                Pipeline::Unclassified
            }
        };

        if variant != DeviceVariant::Unclassified {
            info!("Device '{}' (#{}) recognised as {}", name, instance_id, variant);
        }
        Ok(Gimbal::new(name, instance_id, pipeline))
    }

    /// Builds a gimbal for an input source's name and instance id.
    ///
    /// # Errors
    ///
    /// Same as [`GimbalFactory::build`].
    pub fn build_for(&self, input: &dyn InputSource) -> Result<Gimbal> {
        self.build(&input.name(), input.instance_id())
    }
}
