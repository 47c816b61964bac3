//! # Sim Gimbal Library
//!
//! Fly with a dance pad, drum kit, steering wheel, guitar or gamepad.
//!
//! This library turns heterogeneous game controller input into three
//! normalised flight channels: throttle, aileron (roll) and elevator (pitch).
//! Each supported device family gets a gimbal that calibrates its axes or
//! accumulates its button presses into smooth values.

pub mod config;
pub mod controller;
pub mod error;
pub mod gimbal;
