//! # Device Layouts
//!
//! Which button, axis or hat index each named control lives at, and the
//! calibration profile of every analog axis, per platform.
//!
//! Drivers enumerate the same hardware differently: the guitar's red fret is
//! button 0 on Windows and button 4 on Linux, the steering wheel reports
//! combined pedals on Windows and separate gas and brake axes elsewhere.
//! Tables for each [`Platform`] are built in; any device's table can be
//! replaced from the configuration file (see [`LayoutOverrides`]).

use serde::Deserialize;

use crate::controller::calibration::CalibrationProfile;
use crate::error::{GimbalError, Result};

/// Operating system family a layout table was measured on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Windows (DirectInput/XInput through SDL).
    Windows,
    /// Linux (joydev/evdev).
    Linux,
    /// macOS (IOKit HID).
    Macos,
}

impl Platform {
    /// Platform of the running build.
    #[must_use]
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::Macos
        } else {
            Platform::Linux
        }
    }
}

/// An analog axis index with its calibration.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct AxisBinding {
    /// Axis index on the input source.
    pub axis: usize,
    /// Calibration applied to the raw reading.
    #[serde(flatten)]
    pub profile: CalibrationProfile,
}

impl AxisBinding {
    /// Binds an axis index to a profile.
    #[must_use]
    pub const fn new(axis: usize, profile: CalibrationProfile) -> Self {
        Self { axis, profile }
    }
}

/// Dance pad buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DdrPadLayout {
    pub up: usize,
    pub down: usize,
    pub left: usize,
    pub right: usize,
    /// Half throttle.
    pub x: usize,
    /// Full throttle.
    pub o: usize,
    pub back: usize,
    pub select: usize,
}

/// Drum kit pads and buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DrumLayout {
    pub red: usize,
    pub yellow: usize,
    pub blue: usize,
    pub green: usize,
    pub kick: usize,
    pub select: usize,
    pub home: usize,
    pub start: usize,
}

/// Steering wheel axes and buttons.
///
/// Pedals are either one combined axis (`gas_brake`) or two separate axes
/// (`gas` and `brake`). When `gas_brake` is present it is used and the split
/// axes are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct SteeringWheelLayout {
    pub steering: AxisBinding,
    #[serde(default)]
    pub gas_brake: Option<AxisBinding>,
    #[serde(default)]
    pub gas: Option<AxisBinding>,
    #[serde(default)]
    pub brake: Option<AxisBinding>,
    pub right_paddle: usize,
    pub left_paddle: usize,
    pub select: usize,
    pub start: usize,
}

/// Xbox 360 style gamepad axes.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct XboxLayout {
    pub left_trigger: AxisBinding,
    pub right_x: AxisBinding,
    pub right_y: AxisBinding,
}

/// Guitar controller frets, buttons and strum bar hat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct GuitarLayout {
    pub green: usize,
    pub red: usize,
    pub yellow: usize,
    pub blue: usize,
    pub orange: usize,
    pub plus: usize,
    pub minus: usize,
    pub strum_hat: usize,
}

/// Layout of every supported device on one platform.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceLayouts {
    pub ddr_pad: DdrPadLayout,
    pub drum: DrumLayout,
    pub steering_wheel: SteeringWheelLayout,
    pub xbox: XboxLayout,
    pub guitar: GuitarLayout,
}

/// Steering profile measured on the Driving Force wheel.
const STEERING: CalibrationProfile = CalibrationProfile {
    raw_min: -0.898,
    raw_mid: -0.031,
    raw_max: 0.884,
    out_min: -1.0,
    out_mid: 0.0,
    out_max: 1.0,
};

/// Combined pedals: brake floored reads positive, gas floored negative.
const GAS_BRAKE_COMBINED: CalibrationProfile = CalibrationProfile {
    raw_min: 0.996,
    raw_mid: -0.004,
    raw_max: -0.992,
    out_min: -1.0,
    out_mid: 0.0,
    out_max: 1.0,
};

/// Split pedal axes rest at 1.0 and read -1.0 floored.
const GAS_SPLIT: CalibrationProfile = CalibrationProfile {
    raw_min: 1.0,
    raw_mid: 0.0,
    raw_max: -1.0,
    out_min: 0.0,
    out_mid: 0.5,
    out_max: 1.0,
};

const BRAKE_SPLIT: CalibrationProfile = CalibrationProfile {
    raw_min: 1.0,
    raw_mid: 0.0,
    raw_max: -1.0,
    out_min: 0.0,
    out_mid: -0.5,
    out_max: -1.0,
};

impl DeviceLayouts {
    /// Built-in tables for a platform.
    ///
    /// # Examples
    ///
    /// ```
    /// use sim_gimbal::gimbal::layout::{DeviceLayouts, Platform};
    ///
    /// let windows = DeviceLayouts::for_platform(Platform::Windows);
    /// assert!(windows.steering_wheel.gas_brake.is_some());
    ///
    /// let linux = DeviceLayouts::for_platform(Platform::Linux);
    /// assert!(linux.steering_wheel.gas_brake.is_none());
    /// ```
    #[must_use]
    pub fn for_platform(platform: Platform) -> Self {
        match platform {
            Platform::Windows => Self::windows(),
            Platform::Linux | Platform::Macos => Self::unix(),
        }
    }

    fn windows() -> Self {
        Self {
            ddr_pad: DdrPadLayout {
                up: 0,
                down: 1,
                left: 2,
                right: 3,
                x: 6,
                o: 7,
                back: 8,
                select: 9,
            },
            drum: DrumLayout {
                red: 2,
                yellow: 3,
                blue: 0,
                green: 1,
                kick: 4,
                select: 8,
                home: 12,
                start: 9,
            },
            steering_wheel: SteeringWheelLayout {
                steering: AxisBinding::new(0, STEERING),
                gas_brake: Some(AxisBinding::new(1, GAS_BRAKE_COMBINED)),
                gas: None,
                brake: None,
                right_paddle: 10,
                left_paddle: 11,
                select: 8,
                start: 9,
            },
            xbox: XboxLayout {
                left_trigger: AxisBinding::new(4, CalibrationProfile::identity()),
                right_x: AxisBinding::new(2, CalibrationProfile::identity()),
                right_y: AxisBinding::new(3, CalibrationProfile::identity()),
            },
            guitar: GuitarLayout {
                green: 1,
                red: 0,
                yellow: 3,
                blue: 2,
                orange: 6,
                plus: 9,
                minus: 8,
                strum_hat: 0,
            },
        }
    }

    fn unix() -> Self {
        let windows = Self::windows();
        Self {
            drum: DrumLayout {
                red: 0,
                blue: 2,
                ..windows.drum
            },
            steering_wheel: SteeringWheelLayout {
                gas_brake: None,
                gas: Some(AxisBinding::new(2, GAS_SPLIT)),
                brake: Some(AxisBinding::new(3, BRAKE_SPLIT)),
                ..windows.steering_wheel
            },
            xbox: XboxLayout {
                left_trigger: AxisBinding::new(2, CalibrationProfile::identity()),
                right_x: AxisBinding::new(3, CalibrationProfile::identity()),
                right_y: AxisBinding::new(4, CalibrationProfile::identity()),
            },
            guitar: GuitarLayout {
                red: 4,
                ..windows.guitar
            },
            ..windows
        }
    }
}

/// Per-device replacements for the built-in tables, read from `[layouts]`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LayoutOverrides {
    #[serde(default)]
    pub ddr_pad: Option<DdrPadLayout>,
    #[serde(default)]
    pub drum: Option<DrumLayout>,
    #[serde(default)]
    pub steering_wheel: Option<SteeringWheelLayout>,
    #[serde(default)]
    pub xbox: Option<XboxLayout>,
    #[serde(default)]
    pub guitar: Option<GuitarLayout>,
}

impl LayoutOverrides {
    /// Replaces each device table in `base` that has an override.
    #[must_use]
    pub fn apply(&self, base: DeviceLayouts) -> DeviceLayouts {
        DeviceLayouts {
            ddr_pad: self.ddr_pad.unwrap_or(base.ddr_pad),
            drum: self.drum.unwrap_or(base.drum),
            steering_wheel: self.steering_wheel.unwrap_or(base.steering_wheel),
            xbox: self.xbox.unwrap_or(base.xbox),
            guitar: self.guitar.unwrap_or(base.guitar),
        }
    }

    /// Validates the calibration profiles of every override.
    ///
    /// # Errors
    ///
    /// Returns [`GimbalError::Calibration`] naming the first bad axis.
    pub fn validate(&self) -> Result<()> {
        if let Some(wheel) = &self.steering_wheel {
            validate_binding("steering_wheel.steering", &wheel.steering)?;
            for (name, binding) in [
                ("steering_wheel.gas_brake", &wheel.gas_brake),
                ("steering_wheel.gas", &wheel.gas),
                ("steering_wheel.brake", &wheel.brake),
            ] {
                if let Some(binding) = binding {
                    validate_binding(name, binding)?;
                }
            }
            if wheel.gas_brake.is_none() && (wheel.gas.is_none() || wheel.brake.is_none()) {
                return Err(GimbalError::Calibration(
                    "steering_wheel needs gas_brake or both gas and brake".to_string(),
                ));
            }
        }
        if let Some(xbox) = &self.xbox {
            validate_binding("xbox.left_trigger", &xbox.left_trigger)?;
            validate_binding("xbox.right_x", &xbox.right_x)?;
            validate_binding("xbox.right_y", &xbox.right_y)?;
        }
        Ok(())
    }
}

fn validate_binding(name: &str, binding: &AxisBinding) -> Result<()> {
    binding
        .profile
        .validate()
        .map_err(|e| GimbalError::Calibration(format!("{}: {}", name, e)))
}
