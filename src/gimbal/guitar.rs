//! Guitar controller gimbal.
//!
//! ## Roll From Frets
//!
//! Four frets select one of seven roll targets. Green and blue are the outer
//! frets and give full deflection on their own; adding the inner fret on the
//! same side softens it; the inner fret alone gives the gentlest tier.
//!
//! | Frets | Target | Rate per frame |
//! |-------|--------|----------------|
//! | green | -1.0 | 0.05 |
//! | green + red | -0.75 | 0.07 |
//! | red | -0.5 | 0.1 |
//! | none | 0.0 | 0.03 |
//! | yellow | 0.5 | 0.1 |
//! | yellow + blue | 0.75 | 0.07 |
//! | blue | 1.0 | 0.05 |
//!
//! Rows are checked top-down on the left side first. Red and yellow held
//! together resolve to whichever of them was most recently held alone.
//! Roll then moves towards the target at the tier's rate.
//!
//! ## Pitch From Strum
//!
//! The strum bar is a hat: strum down grows positive pitch, strum up grows
//! negative, through a [`HoldAccumulator`].
//!
//! ## Throttle
//!
//! Orange cuts, minus selects half, plus selects full.

use crate::controller::input::InputSource;
use crate::controller::pressure::{Direction, HoldAccumulator, PressureTuning};
use crate::controller::throttle::{ThrottleInput, ThrottleLevel, ThrottleStateMachine};

use super::layout::GuitarLayout;

/// Roll magnitude per tier: inner fret, combo, outer fret.
pub const FRET_TARGETS: [f32; 3] = [0.5, 0.75, 1.0];

/// Approach rate per tier, matching [`FRET_TARGETS`].
pub const FRET_RATES: [f32; 3] = [0.1, 0.07, 0.05];

/// Rate of return to centre with no fret held.
pub const FRET_RELEASE_RATE: f32 = 0.03;

const STRUM_TUNING: PressureTuning = PressureTuning {
    max_force: 1.0,
    growth_rate: 0.1,
    decay_rate: 0.05,
};

/// Fret states for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Frets {
    pub green: bool,
    pub red: bool,
    pub yellow: bool,
    pub blue: bool,
}

/// Tiered roll accumulator driven by fret combinations.
#[derive(Debug, Clone, Default)]
pub struct FretRoll {
    pressure: f32,
    /// Red is `Negative`, yellow `Positive`.
    last_inner: Option<Direction>,
}

impl FretRoll {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn pressure(&self) -> f32 {
        self.pressure
    }

    /// Target roll and approach rate for a fret combination, updating the
    /// red/yellow tie breaker.
    pub fn target(&mut self, frets: Frets) -> (f32, f32) {
        let Frets {
            green,
            mut red,
            mut yellow,
            blue,
        } = frets;

        if red && !yellow {
            self.last_inner = Some(Direction::Negative);
        } else if yellow && !red {
            self.last_inner = Some(Direction::Positive);
        }

        if red && yellow {
            if self.last_inner == Some(Direction::Negative) {
                yellow = false;
            } else {
                red = false;
            }
        }

        if green && red {
            (-FRET_TARGETS[1], FRET_RATES[1])
        } else if green {
            (-FRET_TARGETS[2], FRET_RATES[2])
        } else if red {
            (-FRET_TARGETS[0], FRET_RATES[0])
        } else if yellow && blue {
            (FRET_TARGETS[1], FRET_RATES[1])
        } else if blue {
            (FRET_TARGETS[2], FRET_RATES[2])
        } else if yellow {
            (FRET_TARGETS[0], FRET_RATES[0])
        } else {
            (0.0, FRET_RELEASE_RATE)
        }
    }

    /// Advances one frame and returns the new roll.
    pub fn update(&mut self, frets: Frets) -> f32 {
        let (target, rate) = self.target(frets);
        if self.pressure < target {
            self.pressure = (self.pressure + rate).min(target);
        } else if self.pressure > target {
            self.pressure = (self.pressure - rate).max(target);
        }
        self.pressure
    }
}

/// Guitar controller pipelines.
#[derive(Debug, Clone)]
pub struct GuitarGimbal {
    layout: GuitarLayout,
    throttle: ThrottleStateMachine,
    aileron: FretRoll,
    elevator: HoldAccumulator,
}

impl GuitarGimbal {
    #[must_use]
    pub fn new(layout: GuitarLayout) -> Self {
        Self {
            layout,
            throttle: ThrottleStateMachine::ungated(),
            aileron: FretRoll::new(),
            elevator: HoldAccumulator::new(STRUM_TUNING),
        }
    }

    pub fn throttle(&mut self, input: &dyn InputSource) -> f32 {
        let layout = &self.layout;
        let level = if input.button(layout.orange) {
            Some(ThrottleLevel::Off)
        } else if input.button(layout.minus) {
            Some(ThrottleLevel::Half)
        } else if input.button(layout.plus) {
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

    pub fn aileron(&mut self, input: &dyn InputSource) -> f32 {
        let layout = &self.layout;
        self.aileron.update(Frets {
            green: input.button(layout.green),
            red: input.button(layout.red),
            yellow: input.button(layout.yellow),
            blue: input.button(layout.blue),
        })
    }

    pub fn elevator(&mut self, input: &dyn InputSource) -> f32 {
        let strum = input.hat(self.layout.strum_hat);
        self.elevator.update(strum.y == -1, strum.y == 1)
    }
}
