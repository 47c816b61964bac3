//! # Controller Input
//!
//! The raw-reading capability gimbals pull their samples from.
//!
//! A gimbal never talks to hardware. Each frame the surrounding application
//! hands it something implementing [`InputSource`], usually an
//! [`InputSnapshot`] captured from the device at the start of the frame.
//!
//! ## Value Conventions
//!
//! | Reading | Type | Range |
//! |---------|------|-------|
//! | Button | `bool` | pressed / released |
//! | Axis | `f32` | `-1.0..=1.0` |
//! | Hat | [`HatPosition`] | `x`, `y` in `-1/0/1`, `y = 1` is up |
//!
//! Indices past the end of what the device reports read as released, `0.0`
//! and centred, so a layout that names a missing control degrades to an
//! inert channel instead of failing.
//!
//! ## Usage
//!
//! ```
//! use sim_gimbal::controller::input::{HatPosition, InputSnapshot, InputSource};
//!
//! let mut frame = InputSnapshot::new("Xbox 360 Controller", 3);
//! frame.set_button(0, true);
//! frame.set_axis(2, 0.5);
//! frame.set_hat(0, HatPosition::new(0, -1));
//!
//! assert!(frame.button(0));
//! assert!(!frame.button(7));
//! assert_eq!(frame.axis(2), 0.5);
//! assert_eq!(frame.hat(0).y, -1);
//! ```

#[cfg(test)]
use mockall::automock;

/// Hat switch (directional pad) position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HatPosition {
    /// -1 = left, 0 = centre, 1 = right.
    pub x: i32,
    /// -1 = down, 0 = centre, 1 = up.
    pub y: i32,
}

impl HatPosition {
    /// Creates a hat position, clamping each component to `-1..=1`.
    #[must_use]
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            x: x.clamp(-1, 1),
            y: y.clamp(-1, 1),
        }
    }

    /// Centred hat.
    #[must_use]
    pub fn centered() -> Self {
        Self::default()
    }
}

/// Per-frame raw readings from one input device.
#[cfg_attr(test, automock)]
pub trait InputSource {
    /// Whether button `index` is pressed.
    fn button(&self, index: usize) -> bool;

    /// Position of axis `index` in `-1.0..=1.0`.
    fn axis(&self, index: usize) -> f32;

    /// Position of hat `index`.
    fn hat(&self, index: usize) -> HatPosition;

    /// Human-readable device name.
    fn name(&self) -> String;

    /// Identifier of the device for as long as it stays connected.
    fn instance_id(&self) -> u32;
}

/// Owned copy of a device's readings for one frame.
///
/// All buttons start released, axes at `0.0` and hats centred. Setters grow
/// the underlying storage as needed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InputSnapshot {
    name: String,
    instance_id: u32,
    buttons: Vec<bool>,
    axes: Vec<f32>,
    hats: Vec<HatPosition>,
}

impl InputSnapshot {
    /// Creates an empty snapshot for a named device.
    #[must_use]
    pub fn new(name: impl Into<String>, instance_id: u32) -> Self {
        Self {
            name: name.into(),
            instance_id,
            ..Self::default()
        }
    }

    /// Creates a snapshot from full reading vectors.
    #[must_use]
    pub fn from_parts(
        name: impl Into<String>,
        instance_id: u32,
        buttons: Vec<bool>,
        axes: Vec<f32>,
        hats: Vec<HatPosition>,
    ) -> Self {
        Self {
            name: name.into(),
            instance_id,
            buttons,
            axes,
            hats,
        }
    }

    /// Sets button `index`.
    pub fn set_button(&mut self, index: usize, pressed: bool) {
        if index >= self.buttons.len() {
            self.buttons.resize(index + 1, false);
        }
        self.buttons[index] = pressed;
    }

    /// Sets axis `index`, clamped to `-1.0..=1.0`.
    pub fn set_axis(&mut self, index: usize, value: f32) {
        if index >= self.axes.len() {
            self.axes.resize(index + 1, 0.0);
        }
        self.axes[index] = value.clamp(-1.0, 1.0);
    }

    /// Sets hat `index`.
    pub fn set_hat(&mut self, index: usize, position: HatPosition) {
        if index >= self.hats.len() {
            self.hats.resize(index + 1, HatPosition::centered());
        }
        self.hats[index] = position;
    }

    /// Builder form of [`InputSnapshot::set_button`].
    #[must_use]
    pub fn with_button(mut self, index: usize, pressed: bool) -> Self {
        self.set_button(index, pressed);
        self
    }

    /// Builder form of [`InputSnapshot::set_axis`].
    #[must_use]
    pub fn with_axis(mut self, index: usize, value: f32) -> Self {
        self.set_axis(index, value);
        self
    }

    /// Builder form of [`InputSnapshot::set_hat`].
    #[must_use]
    pub fn with_hat(mut self, index: usize, position: HatPosition) -> Self {
        self.set_hat(index, position);
        self
    }

    /// Number of buttons reported.
    #[must_use]
    pub fn button_count(&self) -> usize {
        self.buttons.len()
    }

    /// Number of axes reported.
    #[must_use]
    pub fn axis_count(&self) -> usize {
        self.axes.len()
    }

    /// Number of hats reported.
    #[must_use]
    pub fn hat_count(&self) -> usize {
        self.hats.len()
    }
}

impl InputSource for InputSnapshot {
    fn button(&self, index: usize) -> bool {
        self.buttons.get(index).copied().unwrap_or(false)
    }

    fn axis(&self, index: usize) -> f32 {
        self.axes.get(index).copied().unwrap_or(0.0)
    }

    fn hat(&self, index: usize) -> HatPosition {
        self.hats.get(index).copied().unwrap_or_default()
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn instance_id(&self) -> u32 {
        self.instance_id
    }
}
