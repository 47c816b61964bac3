//! Steering wheel gimbal.
//!
//! The wheel axis is roll. Pitch comes from the pedals, which drivers expose
//! in one of two shapes:
//!
//! - **Combined**: one axis, gas one way and brake the other, calibrated
//!   straight onto `-1..1`.
//! - **Split**: separate gas and brake axes, calibrated onto `0..1` and
//!   `0..-1` and summed, so pressing both cancels out.
//!
//! The shape is picked once at construction from the layout. Throttle is
//! gated: start arms, select disarms, the left paddle selects half and the
//! right paddle full.

use crate::controller::calibration::calibrate;
use crate::controller::input::InputSource;
use crate::controller::throttle::{ThrottleInput, ThrottleLevel, ThrottleStateMachine};
use crate::error::{GimbalError, Result};

use super::layout::{AxisBinding, SteeringWheelLayout};

/// Pedal wiring resolved from the layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pedals {
    /// One axis for gas and brake.
    Combined(AxisBinding),
    /// Independent gas and brake axes.
    Split { gas: AxisBinding, brake: AxisBinding },
}

impl Pedals {
    /// Picks the pedal wiring for a layout. The combined axis wins when present.
    ///
    /// # Errors
    ///
    /// Returns [`GimbalError::Calibration`] when the layout has neither a
    /// combined axis nor both split axes.
    pub fn from_layout(layout: &SteeringWheelLayout) -> Result<Self> {
        match (layout.gas_brake, layout.gas, layout.brake) {
            (Some(combined), _, _) => Ok(Pedals::Combined(combined)),
            (None, Some(gas), Some(brake)) => Ok(Pedals::Split { gas, brake }),
            _ => Err(GimbalError::Calibration(
                "steering wheel layout needs gas_brake or both gas and brake".to_string(),
            )),
        }
    }

    /// Reads the pedals as a single pitch value.
    #[must_use]
    pub fn read(&self, input: &dyn InputSource) -> f32 {
        match self {
            Pedals::Combined(axis) => calibrate(input.axis(axis.axis), &axis.profile),
            Pedals::Split { gas, brake } => {
                calibrate(input.axis(gas.axis), &gas.profile)
                    + calibrate(input.axis(brake.axis), &brake.profile)
            }
        }
    }
}

/// Steering wheel pipelines.
#[derive(Debug, Clone)]
pub struct SteeringWheelGimbal {
    layout: SteeringWheelLayout,
    pedals: Pedals,
    throttle: ThrottleStateMachine,
}

impl SteeringWheelGimbal {
    /// Validates every axis profile and resolves the pedal wiring.
    ///
    /// # Errors
    ///
    /// Returns [`GimbalError::Calibration`] for a degenerate profile or a
    /// layout without usable pedals.
    pub fn new(layout: SteeringWheelLayout) -> Result<Self> {
        layout.steering.profile.validate()?;
        let pedals = Pedals::from_layout(&layout)?;
        match &pedals {
            Pedals::Combined(axis) => axis.profile.validate()?,
            Pedals::Split { gas, brake } => {
                gas.profile.validate()?;
                brake.profile.validate()?;
            }
        }

        Ok(Self {
            layout,
            pedals,
            throttle: ThrottleStateMachine::gated(),
        })
    }

    /// Resolved pedal wiring.
    #[must_use]
    pub fn pedals(&self) -> &Pedals {
        &self.pedals
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.throttle.is_armed()
    }

    pub fn throttle(&mut self, input: &dyn InputSource) -> f32 {
        let layout = &self.layout;
        let level = if input.button(layout.left_paddle) {
            Some(ThrottleLevel::Half)
        } else if input.button(layout.right_paddle) {
            Some(ThrottleLevel::Full)
        } else {
            None
        };
        self.throttle.step(ThrottleInput {
            arm: input.button(layout.start),
            disarm: input.button(layout.select),
            level,
        });
        self.throttle.value()
    }

    pub fn aileron(&mut self, input: &dyn InputSource) -> f32 {
        let steering = &self.layout.steering;
        calibrate(input.axis(steering.axis), &steering.profile)
    }

    pub fn elevator(&mut self, input: &dyn InputSource) -> f32 {
        self.pedals.read(input)
    }
}
