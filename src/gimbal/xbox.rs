//! Xbox 360 style gamepad gimbal.
//!
//! Analog passthrough: left trigger is throttle, the right stick is roll and
//! pitch. Stick Y reads positive when pulled down, so pitch is inverted.

use crate::controller::calibration::calibrate;
use crate::controller::input::InputSource;
use crate::error::Result;

use super::layout::XboxLayout;

/// Gamepad pipelines. Stateless apart from the layout.
#[derive(Debug, Clone)]
pub struct XboxGimbal {
    layout: XboxLayout,
}

impl XboxGimbal {
    /// Validates the three axis profiles.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::GimbalError::Calibration`] for a degenerate profile.
    pub fn new(layout: XboxLayout) -> Result<Self> {
        layout.left_trigger.profile.validate()?;
        layout.right_x.profile.validate()?;
        layout.right_y.profile.validate()?;
        Ok(Self { layout })
    }

    pub fn throttle(&mut self, input: &dyn InputSource) -> f32 {
        let trigger = &self.layout.left_trigger;
        calibrate(input.axis(trigger.axis), &trigger.profile)
    }

    pub fn aileron(&mut self, input: &dyn InputSource) -> f32 {
        let stick = &self.layout.right_x;
        calibrate(input.axis(stick.axis), &stick.profile)
    }

    pub fn elevator(&mut self, input: &dyn InputSource) -> f32 {
        let stick = &self.layout.right_y;
        -calibrate(input.axis(stick.axis), &stick.profile)
    }
}
