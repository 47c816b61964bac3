//! # Controller Module
//!
//! Raw controller input and the signal processing shared by every gimbal.
//!
//! This module handles:
//! - Per-frame input readings behind the [`input::InputSource`] trait
//! - Opening and sampling joystick devices via evdev
//! - Asymmetric axis calibration
//! - Pressure accumulators turning button presses into continuous values
//! - The Off/Half/Full throttle state machine with optional arming

pub mod calibration;
pub mod input;
pub mod joystick;
pub mod pressure;
pub mod throttle;
