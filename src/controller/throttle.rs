//! # Throttle State Machine
//!
//! Discrete throttle levels selected by buttons, optionally behind an arming
//! gate.
//!
//! Each frame the owning gimbal decodes its device buttons into a
//! [`ThrottleInput`] and feeds it to [`ThrottleStateMachine::step`]. Levels
//! are sticky: a frame with no recognised input keeps the previous level.
//!
//! ## Gated Devices
//!
//! Devices with a dedicated arm button start disarmed. While disarmed only
//! the arm request is honoured, and arming forces the level to `Off`. While
//! armed a disarm request wins over everything else and forces `Off`.
//!
//! | State | Input | Result |
//! |-------|-------|--------|
//! | Disarmed | arm | Armed, Off |
//! | Disarmed | anything else | unchanged |
//! | Armed | disarm | Disarmed, Off |
//! | Armed | level | Armed, level |
//! | Ungated | level | level |

use tracing::{debug, info};

/// Throttle output tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThrottleLevel {
    /// Motor off.
    #[default]
    Off,
    /// Half throttle.
    Half,
    /// Full throttle.
    Full,
}

impl ThrottleLevel {
    /// Sentinel channel value for this level: `-1.0`, `0.0` or `1.0`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sim_gimbal::controller::throttle::ThrottleLevel;
    ///
    /// assert_eq!(ThrottleLevel::Off.value(), -1.0);
    /// assert_eq!(ThrottleLevel::Half.value(), 0.0);
    /// assert_eq!(ThrottleLevel::Full.value(), 1.0);
    /// ```
    #[must_use]
    pub fn value(self) -> f32 {
        match self {
            ThrottleLevel::Off => -1.0,
            ThrottleLevel::Half => 0.0,
            ThrottleLevel::Full => 1.0,
        }
    }
}

/// Buttons decoded for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ThrottleInput {
    /// Arm button held.
    pub arm: bool,
    /// Disarm button held.
    pub disarm: bool,
    /// Level selected by the device's level buttons, if any.
    pub level: Option<ThrottleLevel>,
}

impl ThrottleInput {
    /// No recognised input.
    #[must_use]
    pub fn idle() -> Self {
        Self::default()
    }

    /// A level request only.
    #[must_use]
    pub fn level(level: ThrottleLevel) -> Self {
        Self {
            level: Some(level),
            ..Self::default()
        }
    }
}

/// Sticky throttle level with an optional arm/disarm gate.
#[derive(Debug, Clone)]
pub struct ThrottleStateMachine {
    level: ThrottleLevel,
    /// `None` for ungated devices, otherwise the armed flag.
    armed: Option<bool>,
}

impl ThrottleStateMachine {
    /// Creates an ungated machine at `Off`.
    #[must_use]
    pub fn ungated() -> Self {
        Self {
            level: ThrottleLevel::Off,
            armed: None,
        }
    }

    /// Creates a gated machine, disarmed at `Off`.
    #[must_use]
    pub fn gated() -> Self {
        Self {
            level: ThrottleLevel::Off,
            armed: Some(false),
        }
    }

    /// Current level.
    #[must_use]
    pub fn level(&self) -> ThrottleLevel {
        self.level
    }

    /// Current sentinel value, see [`ThrottleLevel::value`].
    #[must_use]
    pub fn value(&self) -> f32 {
        self.level.value()
    }

    /// Whether the machine has an arming gate.
    #[must_use]
    pub fn is_gated(&self) -> bool {
        self.armed.is_some()
    }

    /// Whether the machine accepts level changes. Always true when ungated.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.armed.unwrap_or(true)
    }

    /// Applies one frame of decoded input and returns the resulting level.
    ///
    /// # Examples
    ///
    /// ```
    /// use sim_gimbal::controller::throttle::{ThrottleInput, ThrottleLevel, ThrottleStateMachine};
    ///
    /// let mut throttle = ThrottleStateMachine::gated();
    ///
    /// // Ignored while disarmed
    /// throttle.step(ThrottleInput::level(ThrottleLevel::Full));
    /// assert_eq!(throttle.level(), ThrottleLevel::Off);
    ///
    /// throttle.step(ThrottleInput { arm: true, ..ThrottleInput::idle() });
    /// throttle.step(ThrottleInput::level(ThrottleLevel::Full));
    /// assert_eq!(throttle.level(), ThrottleLevel::Full);
    /// ```
    pub fn step(&mut self, input: ThrottleInput) -> ThrottleLevel {
        match self.armed {
            Some(false) => {
                if input.arm {
                    info!("Throttle armed");
                    self.armed = Some(true);
                    self.set_level(ThrottleLevel::Off);
                }
            }
            Some(true) => {
                if input.disarm {
                    info!("Throttle disarmed");
                    self.armed = Some(false);
                    self.set_level(ThrottleLevel::Off);
                } else if let Some(level) = input.level {
                    self.set_level(level);
                }
            }
            None => {
                if let Some(level) = input.level {
                    self.set_level(level);
                }
            }
        }
        self.level
    }

    fn set_level(&mut self, level: ThrottleLevel) {
        if self.level != level {
            debug!(from = ?self.level, to = ?level, "Throttle level changed");
            self.level = level;
        }
    }
}
