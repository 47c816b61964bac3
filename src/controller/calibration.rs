//! # Calibration Module
//!
//! Remaps raw axis samples onto a canonical output range.
//!
//! ## Asymmetric Remap
//!
//! Real hardware rarely rests at the geometric midpoint of its extrema: a
//! steering wheel that reports `-0.898..0.884` may settle at `-0.031`. Each
//! axis therefore carries a [`CalibrationProfile`] with independently
//! measured `min`, `mid` and `max` raw points, and the remap is linear on each
//! side of the rest point:
//!
//! - min side: `out_mid - (raw_mid - raw) / (raw_mid - raw_min) * (out_mid - out_min)`
//! - max side: `out_mid + (raw - raw_mid) / (raw_max - raw_mid) * (out_max - out_mid)`
//!
//! The result is clamped to the output range, so samples that overshoot the
//! measured extrema are accepted.
//!
//! ## Polarity
//!
//! Raw points may run backwards (`raw_min > raw_mid > raw_max`) for axes the
//! driver reports inverted, and output points may run backwards for channels
//! that should grow towards the negative end (a brake pedal feeding `0..-1`).
//!
//! ## Usage
//!
//! ```
//! use sim_gimbal::controller::calibration::{calibrate, CalibrationProfile};
//!
//! let wheel = CalibrationProfile::new(-0.898, -0.031, 0.884, -1.0, 0.0, 1.0)?;
//!
//! // Resting wheel reads as centred
//! assert_eq!(calibrate(-0.031, &wheel), 0.0);
//!
//! // Overshoot is clamped
//! assert_eq!(calibrate(1.0, &wheel), 1.0);
//! # Ok::<(), sim_gimbal::error::GimbalError>(())
//! ```

use serde::Deserialize;

use crate::error::{GimbalError, Result};

/// Seven-point calibration for a single axis.
///
/// Three raw points measured on the device and three output points the axis
/// should land on. Constructed once when a gimbal is built and never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct CalibrationProfile {
    /// Raw reading at the low end of travel.
    pub raw_min: f32,
    /// Raw reading at rest.
    pub raw_mid: f32,
    /// Raw reading at the high end of travel.
    pub raw_max: f32,
    /// Output at `raw_min`.
    pub out_min: f32,
    /// Output at `raw_mid`.
    pub out_mid: f32,
    /// Output at `raw_max`.
    pub out_max: f32,
}

impl CalibrationProfile {
    /// Creates and validates a profile.
    ///
    /// # Errors
    ///
    /// Returns [`GimbalError::Calibration`] if a point is not finite, if the
    /// rest point coincides with an extremum (zero-width half range), if the
    /// raw points are not strictly monotonic, or if the output points are not
    /// monotonic.
    ///
    /// # Examples
    ///
    /// ```
    /// use sim_gimbal::controller::calibration::CalibrationProfile;
    ///
    /// assert!(CalibrationProfile::new(-1.0, 0.0, 1.0, -1.0, 0.0, 1.0).is_ok());
    /// assert!(CalibrationProfile::new(-1.0, -1.0, 1.0, -1.0, 0.0, 1.0).is_err());
    /// ```
    pub fn new(
        raw_min: f32,
        raw_mid: f32,
        raw_max: f32,
        out_min: f32,
        out_mid: f32,
        out_max: f32,
    ) -> Result<Self> {
        let profile = Self {
            raw_min,
            raw_mid,
            raw_max,
            out_min,
            out_mid,
            out_max,
        };
        profile.validate()?;
        Ok(profile)
    }

    /// Creates a profile whose rest points sit halfway between the extrema.
    ///
    /// Used for axes such as split pedals where only the travel limits were
    /// measured.
    ///
    /// # Examples
    ///
    /// ```
    /// use sim_gimbal::controller::calibration::CalibrationProfile;
    ///
    /// let gas = CalibrationProfile::linear(-1.0, 1.0, 0.0, 1.0)?;
    /// assert_eq!(gas.raw_mid, 0.0);
    /// assert_eq!(gas.out_mid, 0.5);
    /// # Ok::<(), sim_gimbal::error::GimbalError>(())
    /// ```
    pub fn linear(raw_min: f32, raw_max: f32, out_min: f32, out_max: f32) -> Result<Self> {
        let raw_mid = raw_min + (raw_max - raw_min) / 2.0;
        let out_mid = out_min + (out_max - out_min) / 2.0;
        Self::new(raw_min, raw_mid, raw_max, out_min, out_mid, out_max)
    }

    /// Identity profile for axes that already report `-1.0..1.0`.
    #[must_use]
    pub const fn identity() -> Self {
        Self {
            raw_min: -1.0,
            raw_mid: 0.0,
            raw_max: 1.0,
            out_min: -1.0,
            out_mid: 0.0,
            out_max: 1.0,
        }
    }

    /// Checks the profile can be applied without dividing by zero.
    ///
    /// # Errors
    ///
    /// See [`CalibrationProfile::new`].
    pub fn validate(&self) -> Result<()> {
        let points = [
            self.raw_min,
            self.raw_mid,
            self.raw_max,
            self.out_min,
            self.out_mid,
            self.out_max,
        ];
        if points.iter().any(|p| !p.is_finite()) {
            return Err(GimbalError::Calibration(format!(
                "calibration points must be finite: {:?}",
                self
            )));
        }

        let lower_span = self.raw_mid - self.raw_min;
        let upper_span = self.raw_max - self.raw_mid;
        if lower_span == 0.0 || upper_span == 0.0 {
            return Err(GimbalError::Calibration(format!(
                "raw rest point {} coincides with an extremum ({}..{})",
                self.raw_mid, self.raw_min, self.raw_max
            )));
        }
        if lower_span.signum() != upper_span.signum() {
            return Err(GimbalError::Calibration(format!(
                "raw points must be monotonic: {} / {} / {}",
                self.raw_min, self.raw_mid, self.raw_max
            )));
        }

        if (self.out_mid - self.out_min) * (self.out_max - self.out_mid) < 0.0 {
            return Err(GimbalError::Calibration(format!(
                "output points must be monotonic: {} / {} / {}",
                self.out_min, self.out_mid, self.out_max
            )));
        }

        Ok(())
    }

    /// Applies the two-segment remap to a raw sample.
    ///
    /// Total over all inputs: the result always lies between `out_min` and
    /// `out_max` inclusive. `NaN` reads as the rest point.
    ///
    /// # Examples
    ///
    /// ```
    /// use sim_gimbal::controller::calibration::CalibrationProfile;
    ///
    /// // Trigger resting at -1.0 mapped onto 0..1
    /// let trigger = CalibrationProfile::new(-1.0, -0.5, 1.0, 0.0, 0.25, 1.0)?;
    ///
    /// assert_eq!(trigger.apply(-1.0), 0.0);
    /// assert_eq!(trigger.apply(-0.5), 0.25);
    /// assert!((trigger.apply(0.25) - 0.625).abs() < 1e-6);
    /// assert_eq!(trigger.apply(5.0), 1.0);
    /// # Ok::<(), sim_gimbal::error::GimbalError>(())
    /// ```
    #[must_use]
    pub fn apply(&self, raw: f32) -> f32 {
        if raw.is_nan() {
            return self.out_mid;
        }

        let offset = raw - self.raw_mid;
        let on_min_side = offset * (self.raw_min - self.raw_mid) >= 0.0;

        let remapped = if on_min_side {
            let fraction = ((self.raw_mid - raw) / (self.raw_mid - self.raw_min)).clamp(0.0, 1.0);
            self.out_mid - fraction * (self.out_mid - self.out_min)
        } else {
            let fraction = (offset / (self.raw_max - self.raw_mid)).clamp(0.0, 1.0);
            self.out_mid + fraction * (self.out_max - self.out_mid)
        };

        let (low, high) = if self.out_min <= self.out_max {
            (self.out_min, self.out_max)
        } else {
            (self.out_max, self.out_min)
        };
        remapped.clamp(low, high)
    }
}

impl Default for CalibrationProfile {
    fn default() -> Self {
        Self::identity()
    }
}

/// Maps a raw axis sample through a calibration profile.
///
/// Free-function form of [`CalibrationProfile::apply`].
#[inline]
#[must_use]
pub fn calibrate(raw: f32, profile: &CalibrationProfile) -> f32 {
    profile.apply(raw)
}
