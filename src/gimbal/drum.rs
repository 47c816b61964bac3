//! Drum kit gimbal.
//!
//! Pads drive roll and pitch through [`HitAccumulator`]s: green and blue must
//! be struck repeatedly to hold positive roll and pitch, red and yellow pull
//! negative for as long as they register. Throttle sits behind an arming
//! gate: home arms, select or start disarm, and once armed the kick pedal
//! toggles between half (released) and full (pressed).

use std::time::{Duration, Instant};

use crate::controller::input::InputSource;
use crate::controller::pressure::{HitAccumulator, PressureTuning};
use crate::controller::throttle::{ThrottleInput, ThrottleLevel, ThrottleStateMachine};

use super::layout::DrumLayout;

const PAD_TUNING: PressureTuning = PressureTuning {
    max_force: 1.0,
    growth_rate: 0.1,
    decay_rate: 0.05,
};

/// Drum kit pipelines.
#[derive(Debug, Clone)]
pub struct DrumGimbal {
    layout: DrumLayout,
    throttle: ThrottleStateMachine,
    aileron: HitAccumulator,
    elevator: HitAccumulator,
}

impl DrumGimbal {
    /// Creates the pipelines for a layout and hit window.
    #[must_use]
    pub fn new(layout: DrumLayout, hit_window: Duration, max_hits: usize) -> Self {
        Self {
            layout,
            throttle: ThrottleStateMachine::gated(),
            aileron: HitAccumulator::with_window(PAD_TUNING, hit_window, max_hits),
            elevator: HitAccumulator::with_window(PAD_TUNING, hit_window, max_hits),
        }
    }

    /// Whether the throttle gate is open.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.throttle.is_armed()
    }

    pub fn throttle(&mut self, input: &dyn InputSource) -> f32 {
        let layout = &self.layout;
        let level = if input.button(layout.kick) {
            ThrottleLevel::Full
        } else {
            ThrottleLevel::Half
        };
        self.throttle.step(ThrottleInput {
            arm: input.button(layout.home),
            disarm: input.button(layout.select) || input.button(layout.start),
            level: Some(level),
        });
        self.throttle.value()
    }

    /// Green pad positive, red pad negative.
    pub fn aileron(&mut self, input: &dyn InputSource, now: Instant) -> f32 {
        self.aileron.update(
            input.button(self.layout.green),
            input.button(self.layout.red),
            now,
        )
    }

    /// Blue pad positive, yellow pad negative.
    pub fn elevator(&mut self, input: &dyn InputSource, now: Instant) -> f32 {
        self.elevator.update(
            input.button(self.layout.blue),
            input.button(self.layout.yellow),
            now,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::input::InputSnapshot;
    use crate::gimbal::layout::{DeviceLayouts, Platform};

    fn kit() -> (DrumGimbal, DrumLayout) {
        let layout = DeviceLayouts::for_platform(Platform::Windows).drum;
        (DrumGimbal::new(layout, Duration::from_secs(1), 10), layout)
    }

    fn frame() -> InputSnapshot {
        InputSnapshot::new("Harmonix Drum Kit", 0)
    }

    #[test]
    fn test_arm_half_full_disarm() {
        let (mut gimbal, layout) = kit();

        // Kick ignored while disarmed
        assert_eq!(gimbal.throttle(&frame().with_button(layout.kick, true)), -1.0);
        assert!(!gimbal.is_armed());

        // Home arms with throttle forced off
        assert_eq!(gimbal.throttle(&frame().with_button(layout.home, true)), -1.0);
        assert!(gimbal.is_armed());

        // Kick released → half, pressed → full
        assert_eq!(gimbal.throttle(&frame()), 0.0);
        assert_eq!(gimbal.throttle(&frame().with_button(layout.kick, true)), 1.0);

        // Select disarms regardless of kick
        let select = frame()
            .with_button(layout.select, true)
            .with_button(layout.kick, true)
            .with_button(layout.home, true);
        assert_eq!(gimbal.throttle(&select), -1.0);
        assert!(!gimbal.is_armed());
        assert_eq!(gimbal.throttle(&frame()), -1.0);
    }

    #[test]
    fn test_start_also_disarms() {
        let (mut gimbal, layout) = kit();
        gimbal.throttle(&frame().with_button(layout.home, true));
        gimbal.throttle(&frame());
        assert_eq!(gimbal.throttle(&frame().with_button(layout.start, true)), -1.0);
        assert!(!gimbal.is_armed());
    }

    #[test]
    fn test_single_strike_is_capped() {
        let (mut gimbal, layout) = kit();
        let start = Instant::now();
        let green = frame().with_button(layout.green, true);

        let roll = gimbal.aileron(&green, start);
        assert!((roll - 0.1).abs() < 1e-5);

        let roll = gimbal.aileron(&frame(), start + Duration::from_millis(50));
        assert!((roll - 0.05).abs() < 1e-5);
    }

    #[test]
    fn test_yellow_pulls_negative_uncapped() {
        let (mut gimbal, layout) = kit();
        let start = Instant::now();
        let yellow = frame().with_button(layout.yellow, true);
        let mut pitch = 0.0;
        for i in 0..12 {
            pitch = gimbal.elevator(&yellow, start + Duration::from_millis(i * 33));
        }
        assert_eq!(pitch, -1.0);
    }

    #[test]
    fn test_channels_independent() {
        let (mut gimbal, layout) = kit();
        let start = Instant::now();
        let blue = frame().with_button(layout.blue, true);
        gimbal.elevator(&blue, start);
        assert_eq!(gimbal.aileron(&blue, start), 0.0);
    }
}
