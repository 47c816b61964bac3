//! Dance pad gimbal.
//!
//! Arrows drive roll and pitch through [`HoldMultiAccumulator`]s, so a player
//! standing on both opposing arrows keeps moving instead of stalling. The X
//! and O buttons pick half and full throttle; back and select cut it.

use crate::controller::input::InputSource;
use crate::controller::pressure::{HoldMultiAccumulator, PressureTuning};
use crate::controller::throttle::{ThrottleInput, ThrottleLevel, ThrottleStateMachine};

use super::layout::DdrPadLayout;

/// Arrow tuning: full deflection after ten frames held.
const ARROW_TUNING: PressureTuning = PressureTuning {
    max_force: 1.0,
    growth_rate: 0.1,
    decay_rate: 0.05,
};

/// Dance pad pipelines.
#[derive(Debug, Clone)]
pub struct DdrPadGimbal {
    layout: DdrPadLayout,
    throttle: ThrottleStateMachine,
    aileron: HoldMultiAccumulator,
    elevator: HoldMultiAccumulator,
}

impl DdrPadGimbal {
    /// Creates the pipelines for a layout.
    #[must_use]
    pub fn new(layout: DdrPadLayout) -> Self {
        Self {
            layout,
            throttle: ThrottleStateMachine::ungated(),
            aileron: HoldMultiAccumulator::new(ARROW_TUNING),
            elevator: HoldMultiAccumulator::new(ARROW_TUNING),
        }
    }

    /// Back/select → Off, X → Half, O → Full.
    pub fn throttle(&mut self, input: &dyn InputSource) -> f32 {
        let layout = &self.layout;
        let level = if input.button(layout.back) || input.button(layout.select) {
            Some(ThrottleLevel::Off)
        } else if input.button(layout.x) {
            Some(ThrottleLevel::Half)
        } else if input.button(layout.o) {
            Some(ThrottleLevel::Full)
        } else {
            None
        };
        self.throttle.step(ThrottleInput {
            level,
            ..ThrottleInput::idle()
        });
        self.throttle.value()
    }

    /// Right arrow positive, left arrow negative.
    pub fn aileron(&mut self, input: &dyn InputSource) -> f32 {
        self.aileron
            .update(input.button(self.layout.right), input.button(self.layout.left))
    }

    /// Up arrow positive, down arrow negative.
    pub fn elevator(&mut self, input: &dyn InputSource) -> f32 {
        self.elevator
            .update(input.button(self.layout.up), input.button(self.layout.down))
    }
}
