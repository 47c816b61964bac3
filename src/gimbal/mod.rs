//! # Gimbal Module
//!
//! Turns one input device into three flight channels: throttle, aileron and
//! elevator.
//!
//! Every supported device family gets its own pipeline (see the submodules),
//! wrapped by [`Gimbal`], which carries the device name and instance id and
//! dispatches the three accessors. Devices that match no family become an
//! inert [`Gimbal`] that reports throttle off and centred sticks.
//!
//! ## Usage
//!
//! ```
//! use std::time::Instant;
//! use sim_gimbal::controller::input::InputSnapshot;
//! use sim_gimbal::gimbal::factory::GimbalFactory;
//! use sim_gimbal::gimbal::layout::Platform;
//! use sim_gimbal::gimbal::DeviceVariant;
//!
//! let factory = GimbalFactory::for_platform(Platform::Windows);
//! let mut gimbal = factory.build("Xbox 360 Controller", 0).unwrap();
//! assert_eq!(gimbal.variant(), DeviceVariant::Xbox360Style);
//!
//! let frame = InputSnapshot::new("Xbox 360 Controller", 0).with_axis(2, 0.5);
//! let reading = gimbal.read(&frame, Instant::now());
//! assert_eq!(reading.aileron, 0.5);
//! ```

pub mod ddr_pad;
pub mod drum;
pub mod factory;
pub mod guitar;
pub mod layout;
pub mod steering_wheel;
pub mod xbox;

use std::fmt;
use std::time::Instant;

use crate::controller::input::InputSource;
use crate::controller::throttle::ThrottleLevel;

use ddr_pad::DdrPadGimbal;
use drum::DrumGimbal;
use guitar::GuitarGimbal;
use steering_wheel::SteeringWheelGimbal;
use xbox::XboxGimbal;

/// Device family recognised from a device name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceVariant {
    /// Dance pad: arrows drive roll and pitch.
    DdrPad,
    /// Drum kit: strike rate drives roll and pitch.
    Drum,
    /// Wheel with pedals and shift paddles.
    SteeringWheel,
    /// Dual-analog gamepad, passed through.
    Xbox360Style,
    /// Guitar controller: frets drive roll, strum bar pitch.
    GuitarController,
    /// Anything else; reports neutral channels.
    Unclassified,
}

impl fmt::Display for DeviceVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeviceVariant::DdrPad => "DDR pad",
            DeviceVariant::Drum => "drum kit",
            DeviceVariant::SteeringWheel => "steering wheel",
            DeviceVariant::Xbox360Style => "Xbox 360 style gamepad",
            DeviceVariant::GuitarController => "guitar controller",
            DeviceVariant::Unclassified => "unclassified device",
        };
        f.write_str(name)
    }
}

/// All three channels for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelReading {
    /// `-1.0`, `0.0` or `1.0` for button driven devices; continuous for analog triggers.
    pub throttle: f32,
    pub aileron: f32,
    pub elevator: f32,
}

/// Per-device channel pipelines.
#[derive(Debug, Clone)]
pub enum Pipeline {
    DdrPad(DdrPadGimbal),
    Drum(DrumGimbal),
    SteeringWheel(SteeringWheelGimbal),
    Xbox360Style(XboxGimbal),
    GuitarController(GuitarGimbal),
    Unclassified,
}

impl Pipeline {
    #[must_use]
    pub fn variant(&self) -> DeviceVariant {
        match self {
            Pipeline::DdrPad(_) => DeviceVariant::DdrPad,
            Pipeline::Drum(_) => DeviceVariant::Drum,
            Pipeline::SteeringWheel(_) => DeviceVariant::SteeringWheel,
            Pipeline::Xbox360Style(_) => DeviceVariant::Xbox360Style,
            Pipeline::GuitarController(_) => DeviceVariant::GuitarController,
            Pipeline::Unclassified => DeviceVariant::Unclassified,
        }
    }
}

/// A device's flight channels.
///
/// Each accessor advances the channel's state by one frame, so call each at
/// most once per frame (or use [`Gimbal::read`]).
#[derive(Debug, Clone)]
pub struct Gimbal {
    instance_id: u32,
    name: String,
    pipeline: Pipeline,
}

impl Gimbal {
    /// Wraps a pipeline for a named device.
    #[must_use]
    pub fn new(name: impl Into<String>, instance_id: u32, pipeline: Pipeline) -> Self {
        Self {
            instance_id,
            name: name.into(),
            pipeline,
        }
    }

    #[must_use]
    pub fn variant(&self) -> DeviceVariant {
        self.pipeline.variant()
    }

    #[must_use]
    pub fn instance_id(&self) -> u32 {
        self.instance_id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Throttle for this frame.
    pub fn throttle(&mut self, input: &dyn InputSource) -> f32 {
        match &mut self.pipeline {
            Pipeline::DdrPad(p) => p.throttle(input),
            Pipeline::Drum(p) => p.throttle(input),
            Pipeline::SteeringWheel(p) => p.throttle(input),
            Pipeline::Xbox360Style(p) => p.throttle(input),
            Pipeline::GuitarController(p) => p.throttle(input),
            Pipeline::Unclassified => ThrottleLevel::Off.value(),
        }
    }

    /// Roll for this frame. `now` is only used by the drum kit's hit window.
    pub fn aileron(&mut self, input: &dyn InputSource, now: Instant) -> f32 {
        match &mut self.pipeline {
            Pipeline::DdrPad(p) => p.aileron(input),
            Pipeline::Drum(p) => p.aileron(input, now),
            Pipeline::SteeringWheel(p) => p.aileron(input),
            Pipeline::Xbox360Style(p) => p.aileron(input),
            Pipeline::GuitarController(p) => p.aileron(input),
            Pipeline::Unclassified => 0.0,
        }
    }

    /// Pitch for this frame. `now` is only used by the drum kit's hit window.
    pub fn elevator(&mut self, input: &dyn InputSource, now: Instant) -> f32 {
        match &mut self.pipeline {
            Pipeline::DdrPad(p) => p.elevator(input),
            Pipeline::Drum(p) => p.elevator(input, now),
            Pipeline::SteeringWheel(p) => p.elevator(input),
            Pipeline::Xbox360Style(p) => p.elevator(input),
            Pipeline::GuitarController(p) => p.elevator(input),
            Pipeline::Unclassified => 0.0,
        }
    }

    /// Advances all three channels by one frame.
    pub fn read(&mut self, input: &dyn InputSource, now: Instant) -> ChannelReading {
        ChannelReading {
            throttle: self.throttle(input),
            aileron: self.aileron(input, now),
            elevator: self.elevator(input, now),
        }
    }
}
