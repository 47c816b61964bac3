//! # Pressure Accumulators
//!
//! Turns digital button signals into a bounded, continuously varying value.
//!
//! A pressure accumulator integrates a pair of opposing inputs (`positive`,
//! `negative`) once per frame. While an input is held the pressure grows by
//! `growth_rate` per call towards `±max_force`; when released it decays
//! towards zero by `decay_rate` per call without overshooting.
//!
//! Three variants cover the supported devices:
//!
//! - [`HoldAccumulator`]: plain hold-to-grow. Both inputs held counts as positive.
//! - [`HoldMultiAccumulator`]: resolves both inputs held by continuing in the
//!   direction remembered from the last single press (dance pads).
//! - [`HitAccumulator`]: positive pressure is capped by how often the
//!   positive input was struck within a trailing time window (drum pads).
//!
//! Rates are applied per call, so output speed follows the caller's frame
//! rate.
//!
//! ## Usage
//!
//! ```
//! use sim_gimbal::controller::pressure::{HoldAccumulator, PressureTuning};
//!
//! let mut roll = HoldAccumulator::new(PressureTuning::new(1.0, 0.1, 0.05));
//!
//! for _ in 0..5 {
//!     roll.update(true, false);
//! }
//! assert!((roll.pressure() - 0.5).abs() < 1e-5);
//!
//! roll.update(false, false);
//! assert!((roll.pressure() - 0.45).abs() < 1e-5);
//! ```

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Default trailing window for counting hits.
pub const DEFAULT_HIT_WINDOW: Duration = Duration::from_secs(1);

/// Default number of hits within the window needed for full pressure.
pub const DEFAULT_MAX_HITS: usize = 10;

/// Growth, decay and bound for a pressure channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PressureTuning {
    /// Absolute bound on pressure.
    pub max_force: f32,
    /// Change per call while an input is held.
    pub growth_rate: f32,
    /// Change per call towards zero while nothing is held.
    pub decay_rate: f32,
}

impl PressureTuning {
    /// Creates a tuning. Negative values are taken by magnitude.
    #[must_use]
    pub fn new(max_force: f32, growth_rate: f32, decay_rate: f32) -> Self {
        Self {
            max_force: max_force.abs(),
            growth_rate: growth_rate.abs(),
            decay_rate: decay_rate.abs(),
        }
    }

    #[inline]
    fn grow(&self, pressure: f32) -> f32 {
        (pressure + self.growth_rate).min(self.max_force)
    }

    #[inline]
    fn shrink(&self, pressure: f32) -> f32 {
        (pressure - self.growth_rate).max(-self.max_force)
    }

    #[inline]
    fn decay(&self, pressure: f32) -> f32 {
        if pressure > 0.0 {
            (pressure - self.decay_rate).max(0.0)
        } else if pressure < 0.0 {
            (pressure + self.decay_rate).min(0.0)
        } else {
            pressure
        }
    }
}

impl Default for PressureTuning {
    fn default() -> Self {
        Self::new(1.0, 0.1, 0.05)
    }
}

/// Direction of a pressure input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards `+max_force`.
    Positive,
    /// Towards `-max_force`.
    Negative,
}

impl Direction {
    /// Returns the opposite direction.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Direction::Positive => Direction::Negative,
            Direction::Negative => Direction::Positive,
        }
    }
}

/// Hold-to-grow accumulator.
#[derive(Debug, Clone)]
pub struct HoldAccumulator {
    tuning: PressureTuning,
    pressure: f32,
}

impl HoldAccumulator {
    /// Creates an accumulator at zero pressure.
    #[must_use]
    pub fn new(tuning: PressureTuning) -> Self {
        Self {
            tuning,
            pressure: 0.0,
        }
    }

    /// Current pressure.
    #[must_use]
    pub fn pressure(&self) -> f32 {
        self.pressure
    }

    /// Advances one frame and returns the new pressure.
    ///
    /// `positive` wins when both inputs are held.
    pub fn update(&mut self, positive: bool, negative: bool) -> f32 {
        self.pressure = if positive {
            self.tuning.grow(self.pressure)
        } else if negative {
            self.tuning.shrink(self.pressure)
        } else {
            self.tuning.decay(self.pressure)
        };
        self.pressure
    }
}

/// Hold accumulator that keeps moving when both opposing inputs are held.
///
/// A single held input grows pressure in its direction and arms the
/// *opposite* direction; if the other input then joins, growth continues in
/// that armed direction instead of stalling. Releasing both clears it.
#[derive(Debug, Clone)]
pub struct HoldMultiAccumulator {
    tuning: PressureTuning,
    pressure: f32,
    last_direction: Option<Direction>,
}

impl HoldMultiAccumulator {
    /// Creates an accumulator at zero pressure with no remembered direction.
    #[must_use]
    pub fn new(tuning: PressureTuning) -> Self {
        Self {
            tuning,
            pressure: 0.0,
            last_direction: None,
        }
    }

    /// Current pressure.
    #[must_use]
    pub fn pressure(&self) -> f32 {
        self.pressure
    }

    /// Direction growth resumes in when both inputs are held.
    #[must_use]
    pub fn last_direction(&self) -> Option<Direction> {
        self.last_direction
    }

    /// Advances one frame and returns the new pressure.
    ///
    /// # Examples
    ///
    /// ```
    /// use sim_gimbal::controller::pressure::{Direction, HoldMultiAccumulator, PressureTuning};
    ///
    /// let mut pitch = HoldMultiAccumulator::new(PressureTuning::default());
    ///
    /// pitch.update(false, true);
    /// assert_eq!(pitch.last_direction(), Some(Direction::Positive));
    ///
    /// // Both held: resume towards positive
    /// let before = pitch.pressure();
    /// assert!(pitch.update(true, true) > before);
    /// ```
    pub fn update(&mut self, positive: bool, negative: bool) -> f32 {
        match (positive, negative) {
            (true, true) => match self.last_direction {
                Some(Direction::Positive) => self.pressure = self.tuning.grow(self.pressure),
                Some(Direction::Negative) => self.pressure = self.tuning.shrink(self.pressure),
                None => {}
            },
            (true, false) => {
                self.pressure = self.tuning.grow(self.pressure);
                self.last_direction = Some(Direction::Positive.opposite());
            }
            (false, true) => {
                self.pressure = self.tuning.shrink(self.pressure);
                self.last_direction = Some(Direction::Negative.opposite());
            }
            (false, false) => {
                self.pressure = self.tuning.decay(self.pressure);
                self.last_direction = None;
            }
        }
        self.pressure
    }
}

/// Strike-rate accumulator.
///
/// Positive pressure can never exceed `hits_in_window / max_hits` of
/// `max_force`, so holding a positive level requires striking repeatedly.
/// Negative input neither records hits nor is capped.
#[derive(Debug, Clone)]
pub struct HitAccumulator {
    tuning: PressureTuning,
    pressure: f32,
    hits: VecDeque<Instant>,
    window: Duration,
    max_hits: usize,
}

impl HitAccumulator {
    /// Creates an accumulator with the default one second, ten hit window.
    #[must_use]
    pub fn new(tuning: PressureTuning) -> Self {
        Self::with_window(tuning, DEFAULT_HIT_WINDOW, DEFAULT_MAX_HITS)
    }

    /// Creates an accumulator with a custom window. `max_hits` of zero is
    /// treated as one.
    #[must_use]
    pub fn with_window(tuning: PressureTuning, window: Duration, max_hits: usize) -> Self {
        Self {
            tuning,
            pressure: 0.0,
            hits: VecDeque::with_capacity(max_hits.max(1)),
            window,
            max_hits: max_hits.max(1),
        }
    }

    /// Current pressure.
    #[must_use]
    pub fn pressure(&self) -> f32 {
        self.pressure
    }

    /// Number of hits currently inside the window.
    #[must_use]
    pub fn hit_count(&self) -> usize {
        self.hits.len()
    }

    /// Fraction of the hit rate needed for full positive pressure, in `0..=1`.
    #[must_use]
    pub fn hit_density(&self) -> f32 {
        (self.hits.len() as f32 / self.max_hits as f32).min(1.0)
    }

    /// Advances one frame at time `now` and returns the new pressure.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::{Duration, Instant};
    /// use sim_gimbal::controller::pressure::{HitAccumulator, PressureTuning};
    ///
    /// let mut drum = HitAccumulator::new(PressureTuning::new(1.0, 0.5, 0.05));
    /// let start = Instant::now();
    ///
    /// // Two strikes: growth would reach 1.0, density caps it at 0.2
    /// drum.update(true, false, start);
    /// let pressure = drum.update(true, false, start + Duration::from_millis(100));
    /// assert!((pressure - 0.2).abs() < 1e-6);
    /// ```
    pub fn update(&mut self, positive: bool, negative: bool, now: Instant) -> f32 {
        self.prune(now);

        if positive {
            self.hits.push_back(now);
            self.pressure = self.tuning.grow(self.pressure);
        } else if negative {
            self.pressure = self.tuning.shrink(self.pressure);
        } else {
            self.pressure = self.tuning.decay(self.pressure);
        }

        if self.pressure > 0.0 {
            self.pressure = self.pressure.min(self.hit_density() * self.tuning.max_force);
        }
        self.pressure
    }

    fn prune(&mut self, now: Instant) {
        while let Some(&oldest) = self.hits.front() {
            if now.saturating_duration_since(oldest) > self.window {
                self.hits.pop_front();
            } else {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn tuning() -> PressureTuning {
        PressureTuning::new(1.0, 0.1, 0.05)
    }

    // ==================== Tuning Tests ====================

    #[test]
    fn test_tuning_takes_magnitudes() {
        let tuning = PressureTuning::new(-1.0, -0.1, -0.05);
        assert_eq!(tuning.max_force, 1.0);
        assert_eq!(tuning.growth_rate, 0.1);
        assert_eq!(tuning.decay_rate, 0.05);
    }

    #[test]
    fn test_decay_never_crosses_zero() {
        let tuning = PressureTuning::new(1.0, 0.1, 0.3);
        assert_eq!(tuning.decay(0.2), 0.0);
        assert_eq!(tuning.decay(-0.2), 0.0);
        assert_eq!(tuning.decay(0.0), 0.0);
    }

    #[test]
    fn test_direction_opposite() {
        assert_eq!(Direction::Positive.opposite(), Direction::Negative);
        assert_eq!(Direction::Negative.opposite(), Direction::Positive);
    }

    // ==================== Hold Tests ====================

    #[test]
    fn test_hold_grows_then_decays() {
        let mut acc = HoldAccumulator::new(tuning());
        for _ in 0..5 {
            acc.update(true, false);
        }
        assert!((acc.pressure() - 0.5).abs() < EPSILON);

        acc.update(false, false);
        assert!((acc.pressure() - 0.45).abs() < EPSILON);
    }

    #[test]
    fn test_hold_bounded() {
        let mut acc = HoldAccumulator::new(tuning());
        for _ in 0..50 {
            acc.update(true, false);
        }
        assert_eq!(acc.pressure(), 1.0);

        for _ in 0..100 {
            acc.update(false, true);
        }
        assert_eq!(acc.pressure(), -1.0);
    }

    #[test]
    fn test_hold_both_pressed_is_positive() {
        let mut acc = HoldAccumulator::new(tuning());
        acc.update(true, true);
        acc.update(true, true);
        assert!((acc.pressure() - 0.2).abs() < EPSILON);
    }

    #[test]
    fn test_hold_negative_decays_up_to_zero() {
        let mut acc = HoldAccumulator::new(tuning());
        acc.update(false, true);
        acc.update(false, false);
        assert!((acc.pressure() - (-0.05)).abs() < EPSILON);
        acc.update(false, false);
        assert_eq!(acc.pressure(), 0.0);
        acc.update(false, false);
        assert_eq!(acc.pressure(), 0.0);
    }

    // ==================== Hold-Multi Tests ====================

    #[test]
    fn test_multi_single_press_arms_opposite() {
        let mut acc = HoldMultiAccumulator::new(tuning());
        acc.update(true, false);
        assert_eq!(acc.last_direction(), Some(Direction::Negative));

        acc.update(false, true);
        assert_eq!(acc.last_direction(), Some(Direction::Positive));
    }

    #[test]
    fn test_multi_both_pressed_continues_last_direction() {
        let mut acc = HoldMultiAccumulator::new(tuning());
        acc.update(false, true); // pressure -0.1, armed Positive
        assert_eq!(acc.last_direction(), Some(Direction::Positive));

        acc.update(true, true);
        acc.update(true, true);
        assert!((acc.pressure() - 0.1).abs() < EPSILON);
        assert_eq!(acc.last_direction(), Some(Direction::Positive));

        for _ in 0..20 {
            acc.update(true, true);
        }
        assert_eq!(acc.pressure(), 1.0);
    }

    #[test]
    fn test_multi_both_pressed_without_history_holds() {
        let mut acc = HoldMultiAccumulator::new(tuning());
        acc.update(true, true);
        acc.update(true, true);
        assert_eq!(acc.pressure(), 0.0);
        assert_eq!(acc.last_direction(), None);
    }

    #[test]
    fn test_multi_release_resets_direction() {
        let mut acc = HoldMultiAccumulator::new(tuning());
        acc.update(true, false);
        acc.update(false, false);
        assert_eq!(acc.last_direction(), None);
        assert!((acc.pressure() - 0.05).abs() < EPSILON);
    }

    // ==================== Hit Tests ====================

    #[test]
    fn test_hit_full_density_reaches_max() {
        let mut acc = HitAccumulator::with_window(tuning(), Duration::from_secs(1), 10);
        let start = Instant::now();

        for i in 0..10 {
            acc.update(true, false, start + Duration::from_millis(i * 90));
        }
        assert_eq!(acc.hit_count(), 10);
        assert_eq!(acc.hit_density(), 1.0);
        assert!((acc.pressure() - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_hit_two_hits_cap_at_fifth() {
        let mut acc = HitAccumulator::with_window(PressureTuning::new(1.0, 0.5, 0.05), Duration::from_secs(1), 10);
        let start = Instant::now();

        acc.update(true, false, start);
        acc.update(true, false, start + Duration::from_millis(200));
        assert!((acc.pressure() - 0.2).abs() < EPSILON);

        // Idle frames decay but density still caps
        acc.update(false, false, start + Duration::from_millis(300));
        assert!((acc.pressure() - 0.15).abs() < EPSILON);
    }

    #[test]
    fn test_hit_window_expires() {
        let mut acc = HitAccumulator::with_window(tuning(), Duration::from_secs(1), 10);
        let start = Instant::now();

        acc.update(true, false, start);
        acc.update(true, false, start + Duration::from_millis(500));
        assert_eq!(acc.hit_count(), 2);

        // Exactly one window after the first hit, it is still counted
        acc.update(false, false, start + Duration::from_millis(1000));
        assert_eq!(acc.hit_count(), 2);

        acc.update(false, false, start + Duration::from_millis(1200));
        assert_eq!(acc.hit_count(), 1);

        acc.update(false, false, start + Duration::from_millis(2000));
        assert_eq!(acc.hit_count(), 0);
        assert_eq!(acc.pressure(), 0.0);
    }

    #[test]
    fn test_hit_single_hit_drains_after_window() {
        let mut acc = HitAccumulator::with_window(tuning(), Duration::from_secs(1), 10);
        let start = Instant::now();

        acc.update(true, false, start);
        assert!((acc.pressure() - 0.1).abs() < EPSILON);

        // Once the hit leaves the window, density 0 caps positive pressure to 0
        acc.update(false, false, start + Duration::from_millis(1500));
        assert_eq!(acc.pressure(), 0.0);
    }

    #[test]
    fn test_hit_negative_not_capped() {
        let mut acc = HitAccumulator::with_window(tuning(), Duration::from_secs(1), 10);
        let start = Instant::now();

        for i in 0..15 {
            acc.update(false, true, start + Duration::from_millis(i * 10));
        }
        assert_eq!(acc.hit_count(), 0);
        assert_eq!(acc.pressure(), -1.0);
    }

    #[test]
    fn test_hit_both_pressed_counts_as_hit() {
        let mut acc = HitAccumulator::with_window(tuning(), Duration::from_secs(1), 10);
        let now = Instant::now();
        acc.update(true, true, now);
        assert_eq!(acc.hit_count(), 1);
        assert!((acc.pressure() - 0.1).abs() < EPSILON);
    }

    #[test]
    fn test_hit_zero_max_hits_treated_as_one() {
        let mut acc = HitAccumulator::with_window(tuning(), Duration::from_secs(1), 0);
        acc.update(true, false, Instant::now());
        assert_eq!(acc.hit_density(), 1.0);
    }

    #[test]
    fn test_default_window_constants() {
        assert_eq!(DEFAULT_HIT_WINDOW, Duration::from_secs(1));
        assert_eq!(DEFAULT_MAX_HITS, 10);
    }
}
