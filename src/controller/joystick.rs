//! # Joystick Devices
//!
//! Opens joystick-like evdev devices and samples their state once per frame
//! into an [`InputSnapshot`].
//!
//! ## Detection
//!
//! A node counts as a joystick when it reports a joystick or gamepad button
//! (`BTN_TRIGGER..BTN_DIGI`, `BTN_TRIGGER_HAPPY*`) or an `ABS_X`, `ABS_WHEEL`
//! or `ABS_GAS` axis, and reports neither `BTN_LEFT` (mice) nor `BTN_TOUCH`
//! (touchpads, tablets).
//!
//! ## Index Assignment
//!
//! Indices follow the joystick API ordering so they line up with the
//! built-in layout tables:
//!
//! - **Buttons**: joystick buttons from `BTN_TRIGGER` upward in code order,
//!   then `BTN_0..BTN_9`.
//! - **Axes**: supported absolute axes in code order, hats excluded, scaled
//!   from the axis' reported `minimum..maximum` onto `-1..1`.
//! - **Hats**: `ABS_HAT0X/Y` through `ABS_HAT3X/Y` pairs. evdev reports
//!   hat Y positive when pushed down; it is flipped so `y = 1` is up.

use evdev::{AbsoluteAxisType, Device, Key};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::controller::input::{HatPosition, InputSnapshot};
use crate::error::{GimbalError, Result};

const INPUT_DIR: &str = "/dev/input";

/// `BTN_DIGI`: first code past the joystick and gamepad buttons.
const BTN_DIGI: u16 = 0x140;
/// `BTN_GEAR_DOWN` and `BTN_GEAR_UP` on wheels.
const BTN_GEAR: [u16; 2] = [0x150, 0x151];
/// `BTN_DPAD_UP..=BTN_DPAD_RIGHT`.
const BTN_DPAD_FIRST: u16 = 0x220;
const BTN_DPAD_LAST: u16 = 0x223;
/// `BTN_TRIGGER_HAPPY1..=BTN_TRIGGER_HAPPY40`.
const BTN_TRIGGER_HAPPY_FIRST: u16 = 0x2c0;
const BTN_TRIGGER_HAPPY_LAST: u16 = 0x2e7;

/// Hat axis pairs in hat index order.
const HAT_AXES: [(AbsoluteAxisType, AbsoluteAxisType); 4] = [
    (AbsoluteAxisType::ABS_HAT0X, AbsoluteAxisType::ABS_HAT0Y),
    (AbsoluteAxisType::ABS_HAT1X, AbsoluteAxisType::ABS_HAT1Y),
    (AbsoluteAxisType::ABS_HAT2X, AbsoluteAxisType::ABS_HAT2Y),
    (AbsoluteAxisType::ABS_HAT3X, AbsoluteAxisType::ABS_HAT3Y),
];

/// An open joystick-like input device.
pub struct JoystickDevice {
    device: Device,
    path: PathBuf,
    name: String,
    instance_id: u32,
    buttons: Vec<Key>,
    axes: Vec<AbsoluteAxisType>,
    hats: Vec<(AbsoluteAxisType, AbsoluteAxisType)>,
}

impl JoystickDevice {
    /// Open one evdev node as a joystick
    ///
    /// # Arguments
    ///
    /// * `path` - `/dev/input/eventX` node
    /// * `instance_id` - Id reported through every snapshot of this device
    ///
    /// # Errors
    ///
    /// - `Io`: the node cannot be opened
    /// - `Controller`: the device is not a joystick (keyboard, mouse, touchpad, ...)
    pub fn open<P: AsRef<Path>>(path: P, instance_id: u32) -> Result<Self> {
        let path = path.as_ref();
        let device = Device::open(path)?;

        let key_codes: Vec<u16> = device
            .supported_keys()
            .map(|keys| keys.iter().map(Key::code).collect())
            .unwrap_or_default();
        let supported_axes: Vec<AbsoluteAxisType> = device
            .supported_absolute_axes()
            .map(|axes| axes.iter().collect())
            .unwrap_or_default();
        let axis_codes: Vec<u16> = supported_axes.iter().map(|axis| axis.0).collect();

        if !looks_like_joystick(&key_codes, &axis_codes) {
            return Err(GimbalError::Controller(format!(
                "{} is not a joystick",
                path.display()
            )));
        }

        let mut codes: Vec<u16> = key_codes
            .into_iter()
            .filter(|&code| is_joystick_button(code))
            .collect();
        codes.sort_by_key(|&code| button_order(code));
        let buttons: Vec<Key> = codes.into_iter().map(Key::new).collect();

        let axes: Vec<AbsoluteAxisType> = supported_axes
            .iter()
            .copied()
            .filter(|axis| !is_hat_axis(axis.0))
            .collect();
        let hats: Vec<(AbsoluteAxisType, AbsoluteAxisType)> = HAT_AXES
            .iter()
            .copied()
            .filter(|(x, y)| supported_axes.contains(x) && supported_axes.contains(y))
            .collect();

        let name = device.name().unwrap_or("Unknown Device").to_string();
        debug!(
            "Opened {} '{}': {} buttons, {} axes, {} hats",
            path.display(),
            name,
            buttons.len(),
            axes.len(),
            hats.len()
        );

        Ok(Self {
            device,
            path: path.to_path_buf(),
            name,
            instance_id,
            buttons,
            axes,
            hats,
        })
    }

    /// Device node this joystick was opened from
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn instance_id(&self) -> u32 {
        self.instance_id
    }

    /// Sample the current state of every button, axis and hat
    ///
    /// # Errors
    ///
    /// Returns `Controller` if the device can no longer be read, typically
    /// because it was unplugged.
    pub fn snapshot(&self) -> Result<InputSnapshot> {
        let keys = self.device.get_key_state().map_err(|e| {
            GimbalError::Controller(format!("{}: failed to read buttons: {}", self.path.display(), e))
        })?;
        let abs = self.device.get_abs_state().map_err(|e| {
            GimbalError::Controller(format!("{}: failed to read axes: {}", self.path.display(), e))
        })?;

        let buttons = self.buttons.iter().map(|&key| keys.contains(key)).collect();
        let axes = self
            .axes
            .iter()
            .map(|axis| {
                let info = &abs[axis.0 as usize];
                normalize_axis(info.value, info.minimum, info.maximum)
            })
            .collect();
        let hats = self
            .hats
            .iter()
            .map(|(x, y)| hat_position(abs[x.0 as usize].value, abs[y.0 as usize].value))
            .collect();

        Ok(InputSnapshot::from_parts(
            self.name.clone(),
            self.instance_id,
            buttons,
            axes,
            hats,
        ))
    }
}

/// List `/dev/input/event*` nodes, ordered by event number
///
/// # Errors
///
/// Returns `Controller` if `/dev/input` cannot be read
///
/// # Examples
///
/// ```no_run
/// use sim_gimbal::controller::joystick::{list_event_nodes, JoystickDevice};
///
/// for (id, path) in list_event_nodes()?.iter().enumerate() {
///     if let Ok(joystick) = JoystickDevice::open(path, id as u32) {
///         println!("{} at {}", joystick.name(), joystick.path().display());
///     }
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn list_event_nodes() -> Result<Vec<PathBuf>> {
    let input_dir = Path::new(INPUT_DIR);

    if !input_dir.exists() {
        return Err(GimbalError::Controller(format!("{} directory not found", INPUT_DIR)));
    }

    let mut paths: Vec<PathBuf> = std::fs::read_dir(input_dir)
        .map_err(|e| GimbalError::Controller(format!("Failed to read {}: {}", INPUT_DIR, e)))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| GimbalError::Controller(format!("Failed to read directory entry: {}", e)))?
        .into_iter()
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .map_or(false, |name| name.to_string_lossy().starts_with("event"))
        })
        .collect();

    // Deterministic instance ids across runs
    paths.sort_by_key(|path| event_number(path));
    Ok(paths)
}

/// Nodes from `candidates` that are not already open, in candidate order.
#[must_use]
pub fn unattached_nodes<'a, I>(candidates: Vec<PathBuf>, attached: I) -> Vec<PathBuf>
where
    I: IntoIterator<Item = &'a Path>,
{
    let attached: Vec<&Path> = attached.into_iter().collect();
    candidates
        .into_iter()
        .filter(|candidate| !attached.contains(&candidate.as_path()))
        .collect()
}

/// Whether a device's key and absolute axis codes describe a joystick.
#[must_use]
pub fn looks_like_joystick(keys: &[u16], axes: &[u16]) -> bool {
    if keys.contains(&Key::BTN_LEFT.code()) || keys.contains(&Key::BTN_TOUCH.code()) {
        return false;
    }

    let has_stick_button = keys.iter().any(|&code| {
        (Key::BTN_TRIGGER.code()..BTN_DIGI).contains(&code)
            || (BTN_TRIGGER_HAPPY_FIRST..=BTN_TRIGGER_HAPPY_LAST).contains(&code)
    });
    let has_stick_axis = [
        AbsoluteAxisType::ABS_X,
        AbsoluteAxisType::ABS_WHEEL,
        AbsoluteAxisType::ABS_GAS,
    ]
    .iter()
    .any(|axis| axes.contains(&axis.0));

    has_stick_button || has_stick_axis
}

/// Scale a raw absolute value from `minimum..=maximum` onto `-1..=1`.
///
/// A degenerate range reads as centred.
#[must_use]
pub fn normalize_axis(value: i32, minimum: i32, maximum: i32) -> f32 {
    if maximum <= minimum {
        return 0.0;
    }
    let span = f64::from(maximum) - f64::from(minimum);
    let fraction = (f64::from(value) - f64::from(minimum)) / span;
    ((fraction * 2.0 - 1.0) as f32).clamp(-1.0, 1.0)
}

/// Hat position from raw evdev hat values, with Y flipped to up-positive.
#[must_use]
pub fn hat_position(x: i32, y: i32) -> HatPosition {
    HatPosition::new(x.signum(), -y.signum())
}

/// Buttons exposed by index: `BTN_0..BTN_9`, joystick and gamepad buttons,
/// wheel gear buttons, d-pad buttons and `BTN_TRIGGER_HAPPY*`.
fn is_joystick_button(code: u16) -> bool {
    (Key::BTN_0.code()..=Key::BTN_9.code()).contains(&code)
        || (Key::BTN_TRIGGER.code()..BTN_DIGI).contains(&code)
        || BTN_GEAR.contains(&code)
        || (BTN_DPAD_FIRST..=BTN_DPAD_LAST).contains(&code)
        || (BTN_TRIGGER_HAPPY_FIRST..=BTN_TRIGGER_HAPPY_LAST).contains(&code)
}

/// Sort key placing `BTN_TRIGGER` and above before `BTN_0..BTN_9`.
fn button_order(code: u16) -> (bool, u16) {
    (code < Key::BTN_TRIGGER.code(), code)
}

fn is_hat_axis(code: u16) -> bool {
    (AbsoluteAxisType::ABS_HAT0X.0..=AbsoluteAxisType::ABS_HAT3Y.0).contains(&code)
}

/// Numeric suffix of an `eventN` node, so `event10` sorts after `event9`.
fn event_number(path: &Path) -> (u32, PathBuf) {
    let number = path
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.strip_prefix("event"))
        .and_then(|n| n.parse().ok())
        .unwrap_or(u32::MAX);
    (number, path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Normalisation Tests ====================

    #[test]
    fn test_normalize_full_range() {
        assert_eq!(normalize_axis(0, 0, 255), -1.0);
        assert_eq!(normalize_axis(255, 0, 255), 1.0);
        assert_eq!(normalize_axis(-32768, -32768, 32767), -1.0);
        assert_eq!(normalize_axis(32767, -32768, 32767), 1.0);
    }

    #[test]
    fn test_normalize_midpoint() {
        assert!(normalize_axis(128, 0, 256).abs() < 1e-6);
        assert!(normalize_axis(0, -100, 100).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_clamps_and_degenerate() {
        assert_eq!(normalize_axis(300, 0, 255), 1.0);
        assert_eq!(normalize_axis(-5, 0, 255), -1.0);
        assert_eq!(normalize_axis(7, 10, 10), 0.0);
    }

    #[test]
    fn test_hat_y_flipped() {
        assert_eq!(hat_position(0, -1), HatPosition::new(0, 1));
        assert_eq!(hat_position(0, 1), HatPosition::new(0, -1));
        assert_eq!(hat_position(1, 0), HatPosition::new(1, 0));
        assert_eq!(hat_position(0, 0), HatPosition::centered());
    }

    // ==================== Detection Tests ====================

    #[test]
    fn test_gamepad_detected() {
        let keys = [Key::BTN_SOUTH.code(), Key::BTN_EAST.code(), Key::BTN_START.code()];
        let axes = [AbsoluteAxisType::ABS_X.0, AbsoluteAxisType::ABS_Y.0];
        assert!(looks_like_joystick(&keys, &axes));
    }

    #[test]
    fn test_wheel_without_buttons_detected() {
        assert!(looks_like_joystick(&[], &[AbsoluteAxisType::ABS_WHEEL.0]));
        assert!(looks_like_joystick(&[], &[AbsoluteAxisType::ABS_GAS.0]));
    }

    #[test]
    fn test_extra_buttons_only_detected() {
        assert!(looks_like_joystick(&[Key::BTN_TRIGGER_HAPPY1.code()], &[]));
    }

    #[test]
    fn test_mouse_rejected() {
        let keys = [Key::BTN_LEFT.code(), Key::BTN_RIGHT.code(), Key::BTN_MIDDLE.code()];
        assert!(!looks_like_joystick(&keys, &[]));
    }

    #[test]
    fn test_touchpad_rejected() {
        let keys = [Key::BTN_LEFT.code(), Key::BTN_TOUCH.code()];
        let axes = [AbsoluteAxisType::ABS_X.0, AbsoluteAxisType::ABS_Y.0];
        assert!(!looks_like_joystick(&keys, &axes));

        // Touchscreens report BTN_TOUCH without BTN_LEFT
        assert!(!looks_like_joystick(&[Key::BTN_TOUCH.code()], &axes));
    }

    #[test]
    fn test_keyboard_rejected() {
        let keys = [Key::KEY_A.code(), Key::KEY_ENTER.code(), Key::KEY_OK.code()];
        assert!(!looks_like_joystick(&keys, &[]));
    }

    // ==================== Index Ordering Tests ====================

    #[test]
    fn test_button_ordering() {
        let mut codes = vec![
            Key::BTN_0.code(),
            Key::BTN_SOUTH.code(),
            Key::BTN_TRIGGER.code(),
            Key::BTN_TRIGGER_HAPPY1.code(),
        ];
        codes.sort_by_key(|&c| button_order(c));
        assert_eq!(
            codes,
            vec![
                Key::BTN_TRIGGER.code(),
                Key::BTN_SOUTH.code(),
                Key::BTN_TRIGGER_HAPPY1.code(),
                Key::BTN_0.code(),
            ]
        );
    }

    #[test]
    fn test_keyboard_keys_are_not_buttons() {
        assert!(!is_joystick_button(Key::KEY_A.code()));
        assert!(!is_joystick_button(Key::KEY_OK.code()));
        assert!(is_joystick_button(Key::BTN_SOUTH.code()));
        assert!(is_joystick_button(Key::BTN_0.code()));
        assert!(is_joystick_button(Key::BTN_TRIGGER_HAPPY1.code()));
    }

    #[test]
    fn test_pointer_buttons_are_not_buttons() {
        assert!(!is_joystick_button(Key::BTN_LEFT.code()));
        assert!(!is_joystick_button(Key::BTN_TOUCH.code()));
    }

    #[test]
    fn test_hat_axes_excluded() {
        assert!(is_hat_axis(AbsoluteAxisType::ABS_HAT0X.0));
        assert!(is_hat_axis(AbsoluteAxisType::ABS_HAT3Y.0));
        assert!(!is_hat_axis(AbsoluteAxisType::ABS_X.0));
        assert!(!is_hat_axis(AbsoluteAxisType::ABS_BRAKE.0));
    }

    // ==================== Node Tests ====================

    #[test]
    fn test_event_number_sorting() {
        let mut paths = vec![
            PathBuf::from("/dev/input/event10"),
            PathBuf::from("/dev/input/event2"),
            PathBuf::from("/dev/input/event9"),
        ];
        paths.sort_by_key(|p| event_number(p));
        assert_eq!(paths[0], PathBuf::from("/dev/input/event2"));
        assert_eq!(paths[2], PathBuf::from("/dev/input/event10"));
    }

    #[test]
    fn test_unattached_nodes() {
        let candidates = vec![
            PathBuf::from("/dev/input/event3"),
            PathBuf::from("/dev/input/event5"),
            PathBuf::from("/dev/input/event7"),
        ];
        let attached = [PathBuf::from("/dev/input/event5")];

        let new = unattached_nodes(candidates, attached.iter().map(PathBuf::as_path));
        assert_eq!(
            new,
            vec![
                PathBuf::from("/dev/input/event3"),
                PathBuf::from("/dev/input/event7"),
            ]
        );
    }

    #[test]
    fn test_unattached_nodes_all_known_or_none() {
        let candidates = vec![PathBuf::from("/dev/input/event1")];
        let attached = [PathBuf::from("/dev/input/event1"), PathBuf::from("/dev/input/event9")];
        assert!(unattached_nodes(candidates.clone(), attached.iter().map(PathBuf::as_path)).is_empty());
        assert_eq!(unattached_nodes(candidates.clone(), std::iter::empty()), candidates);
    }

    #[test]
    fn test_open_missing_node() {
        assert!(matches!(
            JoystickDevice::open("/nonexistent/event0", 0),
            Err(GimbalError::Io(_))
        ));
    }

    // Integration test - only runs with real hardware
    #[test]
    #[ignore]
    fn test_open_with_real_hardware() {
        let devices: Vec<JoystickDevice> = list_event_nodes()
            .unwrap()
            .iter()
            .enumerate()
            .filter_map(|(id, path)| JoystickDevice::open(path, id as u32).ok())
            .collect();
        assert!(!devices.is_empty(), "Should detect a connected joystick");
        for device in &devices {
            let snapshot = device.snapshot().unwrap();
            assert_eq!(snapshot.button_count(), device.buttons.len());
            assert_eq!(snapshot.axis_count(), device.axes.len());
        }
    }
}
