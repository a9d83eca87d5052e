//! # DualSense Protocol Constants and Types
//!
//! Wire-level definitions for the DualSense USB HID reports, as consumed by
//! the Linux `hid-playstation` driver.

/// Sony vendor ID
pub const DS_VENDOR_ID: u16 = 0x054C;

/// DualSense product ID (wired and Bluetooth)
pub const DS_PRODUCT_ID: u16 = 0x0CE6;

/// Device version reported by a retail DualSense
pub const DS_VERSION: u16 = 0x8111;

/// Product name reported by a retail DualSense
pub const DS_NAME: &str = "Sony Interactive Entertainment DualSense Wireless Controller";

/// USB input report id
pub const DS_INPUT_REPORT_USB: u8 = 0x01;

/// USB input report size (report id included)
pub const DS_INPUT_REPORT_USB_SIZE: usize = 64;

/// USB output report id
pub const DS_OUTPUT_REPORT_USB: u8 = 0x02;

/// USB output report size (report id included)
pub const DS_OUTPUT_REPORT_USB_SIZE: usize = 48;

/// Feature report: IMU calibration
pub const DS_FEATURE_REPORT_CALIBRATION: u8 = 0x05;

/// Feature report: pairing info (hardware address)
pub const DS_FEATURE_REPORT_PAIRING_INFO: u8 = 0x09;

/// Feature report: firmware info
pub const DS_FEATURE_REPORT_FIRMWARE_INFO: u8 = 0x20;

/// Native axis range for sticks and triggers
pub const DS_AXIS_MIN: u8 = 0x00;
pub const DS_AXIS_MAX: u8 = 0xFF;
pub const DS_AXIS_CENTER: u8 = 0x80;

/// Application stick range
pub const STICK_INPUT_MIN: i32 = i16::MIN as i32;
pub const STICK_INPUT_MAX: i32 = i16::MAX as i32;

/// Application trigger range
pub const TRIGGER_INPUT_MIN: i32 = 0;
pub const TRIGGER_INPUT_MAX: i32 = 255;

/// Application rumble range
pub const RUMBLE_OUTPUT_MAX: i32 = 0xFFFF;

// buttons[0]: low nibble holds the hat, high nibble the face buttons
pub const DS_BUTTONS0_HAT_SWITCH: u8 = 0x0F;
pub const DS_BUTTONS0_SQUARE: u8 = 1 << 4;
pub const DS_BUTTONS0_CROSS: u8 = 1 << 5;
pub const DS_BUTTONS0_CIRCLE: u8 = 1 << 6;
pub const DS_BUTTONS0_TRIANGLE: u8 = 1 << 7;

pub const DS_BUTTONS1_L1: u8 = 1 << 0;
pub const DS_BUTTONS1_R1: u8 = 1 << 1;
pub const DS_BUTTONS1_CREATE: u8 = 1 << 4;
pub const DS_BUTTONS1_OPTIONS: u8 = 1 << 5;
pub const DS_BUTTONS1_L3: u8 = 1 << 6;
pub const DS_BUTTONS1_R3: u8 = 1 << 7;

pub const DS_BUTTONS2_PS_HOME: u8 = 1 << 0;
pub const DS_BUTTONS2_TOUCHPAD: u8 = 1 << 1;
pub const DS_BUTTONS2_MIC_MUTE: u8 = 1 << 2;

/// Touch point `contact` bit 7: set while the finger is lifted
pub const DS_TOUCH_POINT_INACTIVE: u8 = 1 << 7;

/// Touch ids occupy the low 7 bits; allocation wraps after this value
pub const DS_TOUCH_ID_MAX: u8 = 0x7E;

/// Battery status byte: low nibble charge, high nibble state
pub const DS_STATUS_BATTERY_CAPACITY: u8 = 0x0F;
pub const DS_STATUS_CHARGING: u8 = 0xF0;
pub const DS_STATUS_CHARGING_SHIFT: u8 = 4;

// Output report validity flags
pub const DS_OUTPUT_VALID_FLAG0_COMPATIBLE_VIBRATION: u8 = 1 << 0;
pub const DS_OUTPUT_VALID_FLAG0_HAPTICS_SELECT: u8 = 1 << 1;
pub const DS_OUTPUT_VALID_FLAG0_MOTOR: u8 =
    DS_OUTPUT_VALID_FLAG0_COMPATIBLE_VIBRATION | DS_OUTPUT_VALID_FLAG0_HAPTICS_SELECT;
pub const DS_OUTPUT_VALID_FLAG1_LIGHTBAR_CONTROL_ENABLE: u8 = 1 << 2;
pub const DS_OUTPUT_VALID_FLAG2_COMPATIBLE_VIBRATION2: u8 = 1 << 2;

/// Standard gravity in m/s²
pub const STANDARD_GRAVITY: f32 = 9.806_65;

/// Raw gyroscope units per degree per second
pub const GYRO_RESOLUTION: f32 = 1024.0 / 64.0;

/// Hat switch value for the D-pad nibble of `buttons[0]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Hat {
    North = 0,
    NorthEast = 1,
    East = 2,
    SouthEast = 3,
    South = 4,
    SouthWest = 5,
    West = 6,
    NorthWest = 7,
    Neutral = 8,
}

impl Hat {
    /// Resolve the four D-pad directions into one hat value.
    ///
    /// A vertical and a horizontal direction together yield the diagonal.
    /// Opposing directions on the same axis cancel, matching a physical pad
    /// that cannot report both.
    pub fn from_directions(up: bool, down: bool, left: bool, right: bool) -> Self {
        let vertical = match (up, down) {
            (true, false) => Some(true),
            (false, true) => Some(false),
            _ => None,
        };
        let horizontal = match (left, right) {
            (true, false) => Some(true),
            (false, true) => Some(false),
            _ => None,
        };

        match (vertical, horizontal) {
            (Some(true), Some(true)) => Hat::NorthWest,
            (Some(true), Some(false)) => Hat::NorthEast,
            (Some(true), None) => Hat::North,
            (Some(false), Some(true)) => Hat::SouthWest,
            (Some(false), Some(false)) => Hat::SouthEast,
            (Some(false), None) => Hat::South,
            (None, Some(true)) => Hat::West,
            (None, Some(false)) => Hat::East,
            (None, None) => Hat::Neutral,
        }
    }
}

/// Battery state nibble of the status byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BatteryState {
    Discharging = 0x0,
    Charging = 0x1,
    Full = 0x2,
    VoltageOrTemperatureOutOfRange = 0xA,
    TemperatureError = 0xB,
    ChargingError = 0xF,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_constants() {
        assert_eq!(DS_VENDOR_ID, 0x054C);
        assert_eq!(DS_PRODUCT_ID, 0x0CE6);
    }

    #[test]
    fn test_hat_cardinal_directions() {
        assert_eq!(Hat::from_directions(true, false, false, false), Hat::North);
        assert_eq!(Hat::from_directions(false, true, false, false), Hat::South);
        assert_eq!(Hat::from_directions(false, false, true, false), Hat::West);
        assert_eq!(Hat::from_directions(false, false, false, true), Hat::East);
    }

    #[test]
    fn test_hat_diagonals_win() {
        assert_eq!(Hat::from_directions(true, false, true, false), Hat::NorthWest);
        assert_eq!(Hat::from_directions(true, false, false, true), Hat::NorthEast);
        assert_eq!(Hat::from_directions(false, true, true, false), Hat::SouthWest);
        assert_eq!(Hat::from_directions(false, true, false, true), Hat::SouthEast);
    }

    #[test]
    fn test_hat_neutral() {
        assert_eq!(Hat::from_directions(false, false, false, false), Hat::Neutral);
        assert_eq!(Hat::Neutral as u8, 8);
    }

    #[test]
    fn test_hat_values_fit_nibble() {
        assert_eq!(Hat::NorthWest as u8 & !DS_BUTTONS0_HAT_SWITCH, 0);
        assert_eq!(Hat::Neutral as u8 & !DS_BUTTONS0_HAT_SWITCH, 0);
    }

    #[test]
    fn test_battery_state_fits_nibble() {
        assert!((BatteryState::ChargingError as u8) <= 0x0F);
    }
}
