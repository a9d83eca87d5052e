//! # DualSense Input Report
//!
//! In-memory mirror of the 64-byte USB input report (report id 0x01).
//!
//! ## Layout
//!
//! | Offset | Size | Field |
//! |--------|------|-------|
//! | 0 | 1 | Report id (0x01) |
//! | 1..=6 | 6 | Left X, Left Y, Right X, Right Y, L2, R2 |
//! | 7 | 1 | Sequence number |
//! | 8..=11 | 4 | Buttons (hat + face, shoulders, system, reserved) |
//! | 12..=15 | 4 | Reserved |
//! | 16..=21 | 6 | Gyroscope X/Y/Z (LE16) |
//! | 22..=27 | 6 | Accelerometer X/Y/Z (LE16) |
//! | 28..=31 | 4 | Sensor timestamp (LE32, 0.33 µs) |
//! | 32 | 1 | Reserved |
//! | 33..=40 | 8 | Two touch points, 4 bytes each |
//! | 41..=52 | 12 | Reserved |
//! | 53 | 1 | Battery status (charge \| state << 4) |
//! | 54..=63 | 10 | Reserved |
//!
//! ## Touch point
//!
//! ```text
//! Byte 0: contact (bit 7 = inactive, bits 0-6 = touch id)
//! Byte 1: X[0:7]
//! Byte 2: X[8:11] | Y[0:3] << 4
//! Byte 3: Y[4:11]
//! ```

use super::protocol::*;

const OFFSET_LEFT_X: usize = 1;
const OFFSET_LEFT_Y: usize = 2;
const OFFSET_RIGHT_X: usize = 3;
const OFFSET_RIGHT_Y: usize = 4;
const OFFSET_L2: usize = 5;
const OFFSET_R2: usize = 6;
const OFFSET_SEQ_NUMBER: usize = 7;
const OFFSET_BUTTONS: usize = 8;
const OFFSET_GYRO: usize = 16;
const OFFSET_ACCEL: usize = 22;
const OFFSET_SENSOR_TIMESTAMP: usize = 28;
const OFFSET_TOUCH_POINTS: usize = 33;
const OFFSET_STATUS: usize = 53;

/// Bytes per touch point
pub const TOUCH_POINT_SIZE: usize = 4;

/// Number of touch points carried in the report
pub const TOUCH_POINT_COUNT: usize = 2;

/// Sequence numbers cycle through `0..SEQ_NUMBER_LIMIT`
pub const SEQ_NUMBER_LIMIT: u8 = 255;

/// Which analog stick an axis pair belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stick {
    Left,
    Right,
}

/// Which motion sensor a sample belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionKind {
    Acceleration,
    Gyroscope,
}

/// The USB input report as sent to the kernel
#[derive(Clone, PartialEq, Eq)]
pub struct InputReport {
    bytes: [u8; DS_INPUT_REPORT_USB_SIZE],
}

impl std::fmt::Debug for InputReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputReport")
            .field("seq_number", &self.seq_number())
            .field("buttons", &self.buttons())
            .finish_non_exhaustive()
    }
}

impl Default for InputReport {
    /// Sticks centred, triggers released, hat neutral, both fingers lifted.
    fn default() -> Self {
        let mut bytes = [0u8; DS_INPUT_REPORT_USB_SIZE];
        bytes[0] = DS_INPUT_REPORT_USB;
        bytes[OFFSET_LEFT_X] = DS_AXIS_CENTER;
        bytes[OFFSET_LEFT_Y] = DS_AXIS_CENTER;
        bytes[OFFSET_RIGHT_X] = DS_AXIS_CENTER;
        bytes[OFFSET_RIGHT_Y] = DS_AXIS_CENTER;
        bytes[OFFSET_BUTTONS] = Hat::Neutral as u8;
        for finger in 0..TOUCH_POINT_COUNT {
            bytes[OFFSET_TOUCH_POINTS + finger * TOUCH_POINT_SIZE] = DS_TOUCH_POINT_INACTIVE;
        }
        Self { bytes }
    }
}

impl InputReport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw wire bytes
    pub fn as_bytes(&self) -> &[u8; DS_INPUT_REPORT_USB_SIZE] {
        &self.bytes
    }

    pub fn seq_number(&self) -> u8 {
        self.bytes[OFFSET_SEQ_NUMBER]
    }

    /// Advance the sequence counter, skipping 255.
    pub fn advance_seq_number(&mut self) -> u8 {
        let next = self.bytes[OFFSET_SEQ_NUMBER].wrapping_add(1);
        self.bytes[OFFSET_SEQ_NUMBER] = if next >= SEQ_NUMBER_LIMIT { 0 } else { next };
        self.bytes[OFFSET_SEQ_NUMBER]
    }

    pub fn sensor_timestamp(&self) -> u32 {
        let mut word = [0u8; 4];
        word.copy_from_slice(&self.bytes[OFFSET_SENSOR_TIMESTAMP..OFFSET_SENSOR_TIMESTAMP + 4]);
        u32::from_le_bytes(word)
    }

    pub fn set_sensor_timestamp(&mut self, timestamp: u32) {
        self.bytes[OFFSET_SENSOR_TIMESTAMP..OFFSET_SENSOR_TIMESTAMP + 4]
            .copy_from_slice(&timestamp.to_le_bytes());
    }

    /// The three button bytes plus the reserved fourth
    pub fn buttons(&self) -> [u8; 4] {
        let mut buttons = [0u8; 4];
        buttons.copy_from_slice(&self.bytes[OFFSET_BUTTONS..OFFSET_BUTTONS + 4]);
        buttons
    }

    pub fn set_buttons(&mut self, buttons: [u8; 4]) {
        self.bytes[OFFSET_BUTTONS..OFFSET_BUTTONS + 4].copy_from_slice(&buttons);
    }

    pub fn hat(&self) -> u8 {
        self.bytes[OFFSET_BUTTONS] & DS_BUTTONS0_HAT_SWITCH
    }

    /// Stick axes as `(x, y)` in native units
    pub fn stick(&self, stick: Stick) -> (u8, u8) {
        match stick {
            Stick::Left => (self.bytes[OFFSET_LEFT_X], self.bytes[OFFSET_LEFT_Y]),
            Stick::Right => (self.bytes[OFFSET_RIGHT_X], self.bytes[OFFSET_RIGHT_Y]),
        }
    }

    pub fn set_stick(&mut self, stick: Stick, x: u8, y: u8) {
        let (x_offset, y_offset) = match stick {
            Stick::Left => (OFFSET_LEFT_X, OFFSET_LEFT_Y),
            Stick::Right => (OFFSET_RIGHT_X, OFFSET_RIGHT_Y),
        };
        self.bytes[x_offset] = x;
        self.bytes[y_offset] = y;
    }

    /// Trigger axes as `(left, right)` in native units
    pub fn triggers(&self) -> (u8, u8) {
        (self.bytes[OFFSET_L2], self.bytes[OFFSET_R2])
    }

    pub fn set_triggers(&mut self, left: u8, right: u8) {
        self.bytes[OFFSET_L2] = left;
        self.bytes[OFFSET_R2] = right;
    }

    /// Encoded little-endian words for one motion sensor
    pub fn motion(&self, kind: MotionKind) -> [[u8; 2]; 3] {
        let offset = Self::motion_offset(kind);
        let mut words = [[0u8; 2]; 3];
        for (axis, word) in words.iter_mut().enumerate() {
            let start = offset + axis * 2;
            word.copy_from_slice(&self.bytes[start..start + 2]);
        }
        words
    }

    pub fn set_motion(&mut self, kind: MotionKind, words: [[u8; 2]; 3]) {
        let offset = Self::motion_offset(kind);
        for (axis, word) in words.iter().enumerate() {
            let start = offset + axis * 2;
            self.bytes[start..start + 2].copy_from_slice(word);
        }
    }

    fn motion_offset(kind: MotionKind) -> usize {
        match kind {
            MotionKind::Gyroscope => OFFSET_GYRO,
            MotionKind::Acceleration => OFFSET_ACCEL,
        }
    }

    pub fn status(&self) -> u8 {
        self.bytes[OFFSET_STATUS]
    }

    /// Battery charge step (0-10) and state nibble
    pub fn set_battery(&mut self, charge: u8, state: BatteryState) {
        self.bytes[OFFSET_STATUS] = (charge & DS_STATUS_BATTERY_CAPACITY)
            | ((state as u8) << DS_STATUS_CHARGING_SHIFT) & DS_STATUS_CHARGING;
    }

    /// Raw 4 bytes of one touch point
    ///
    /// # Panics
    ///
    /// Panics if `finger` is not 0 or 1.
    pub fn touch_point(&self, finger: usize) -> [u8; TOUCH_POINT_SIZE] {
        let start = OFFSET_TOUCH_POINTS + finger * TOUCH_POINT_SIZE;
        let mut point = [0u8; TOUCH_POINT_SIZE];
        point.copy_from_slice(&self.bytes[start..start + TOUCH_POINT_SIZE]);
        point
    }

    /// Write an active contact with the given id and 12-bit coordinates.
    ///
    /// # Panics
    ///
    /// Panics if `finger` is not 0 or 1.
    pub fn press_touch_point(&mut self, finger: usize, id: u8, x: u16, y: u16) {
        let start = OFFSET_TOUCH_POINTS + finger * TOUCH_POINT_SIZE;
        self.bytes[start..start + TOUCH_POINT_SIZE].copy_from_slice(&encode_touch_point(id, x, y));
    }

    /// Mark a contact as lifted, keeping its id and coordinates.
    ///
    /// # Panics
    ///
    /// Panics if `finger` is not 0 or 1.
    pub fn release_touch_point(&mut self, finger: usize) {
        self.bytes[OFFSET_TOUCH_POINTS + finger * TOUCH_POINT_SIZE] |= DS_TOUCH_POINT_INACTIVE;
    }
}

/// Pack an active touch contact into its 4-byte wire form
pub fn encode_touch_point(id: u8, x: u16, y: u16) -> [u8; TOUCH_POINT_SIZE] {
    [
        id & !DS_TOUCH_POINT_INACTIVE,
        (x & 0x00FF) as u8,
        ((x >> 8) & 0x0F) as u8 | ((y & 0x000F) << 4) as u8,
        ((y >> 4) & 0xFF) as u8,
    ]
}

/// Unpack `(active, id, x, y)` from a touch point
pub fn decode_touch_point(point: [u8; TOUCH_POINT_SIZE]) -> (bool, u8, u16, u16) {
    let active = point[0] & DS_TOUCH_POINT_INACTIVE == 0;
    let id = point[0] & !DS_TOUCH_POINT_INACTIVE;
    let x = u16::from(point[1]) | (u16::from(point[2] & 0x0F) << 8);
    let y = u16::from(point[2] >> 4) | (u16::from(point[3]) << 4);
    (active, id, x, y)
}
