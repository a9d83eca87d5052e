//! # DualSense Output Report Decoder
//!
//! Decodes the USB output report (report id 0x02) the host driver sends to
//! the controller into rumble and lightbar commands.
//!
//! ## Layout (offsets include the report id)
//!
//! | Offset | Field |
//! |--------|-------|
//! | 1 | valid_flag0 (bit 0 compatible vibration, bit 1 haptics select) |
//! | 2 | valid_flag1 (bit 2 lightbar control enable) |
//! | 3 | right motor |
//! | 4 | left motor |
//! | 39 | valid_flag2 (bit 2 compatible vibration 2) |
//! | 45..=47 | lightbar red, green, blue |

use super::protocol::*;
use crate::codec::scale;
use crate::error::{DualSenseError, Result};

const OFFSET_VALID_FLAG0: usize = 1;
const OFFSET_VALID_FLAG1: usize = 2;
const OFFSET_MOTOR_RIGHT: usize = 3;
const OFFSET_MOTOR_LEFT: usize = 4;
const OFFSET_VALID_FLAG2: usize = 39;
const OFFSET_LIGHTBAR_RED: usize = 45;
const OFFSET_LIGHTBAR_GREEN: usize = 46;
const OFFSET_LIGHTBAR_BLUE: usize = 47;

/// Motor intensities rescaled to 0-65535
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rumble {
    pub left: u16,
    pub right: u16,
}

/// Lightbar colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lightbar {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

/// Sub-commands present in one output report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputCommands {
    pub rumble: Option<Rumble>,
    pub lightbar: Option<Lightbar>,
}

/// Decode a USB output report
///
/// # Arguments
///
/// * `data` - Raw report bytes, starting with the report id
///
/// # Returns
///
/// * `Result<Option<OutputCommands>>` - Decoded commands, or `None` for a
///   report id this decoder does not handle
///
/// # Errors
///
/// Returns `ReportTooShort` if a USB output report is shorter than 48 bytes.
pub fn decode_output_report(data: &[u8]) -> Result<Option<OutputCommands>> {
    match data.first() {
        Some(&DS_OUTPUT_REPORT_USB) => {}
        Some(_) => return Ok(None),
        None => {
            return Err(DualSenseError::ReportTooShort {
                expected: DS_OUTPUT_REPORT_USB_SIZE,
                actual: 0,
            })
        }
    }

    if data.len() < DS_OUTPUT_REPORT_USB_SIZE {
        return Err(DualSenseError::ReportTooShort {
            expected: DS_OUTPUT_REPORT_USB_SIZE,
            actual: data.len(),
        });
    }

    let mut commands = OutputCommands::default();

    if data[OFFSET_VALID_FLAG0] & DS_OUTPUT_VALID_FLAG0_MOTOR != 0
        || data[OFFSET_VALID_FLAG2] & DS_OUTPUT_VALID_FLAG2_COMPATIBLE_VIBRATION2 != 0
    {
        commands.rumble = Some(Rumble {
            left: motor_to_rumble(data[OFFSET_MOTOR_LEFT]),
            right: motor_to_rumble(data[OFFSET_MOTOR_RIGHT]),
        });
    }

    if data[OFFSET_VALID_FLAG1] & DS_OUTPUT_VALID_FLAG1_LIGHTBAR_CONTROL_ENABLE != 0 {
        commands.lightbar = Some(Lightbar {
            red: data[OFFSET_LIGHTBAR_RED],
            green: data[OFFSET_LIGHTBAR_GREEN],
            blue: data[OFFSET_LIGHTBAR_BLUE],
        });
    }

    Ok(Some(commands))
}

/// Rescale a 0-255 motor value into 0-65535
pub fn motor_to_rumble(motor: u8) -> u16 {
    scale(i32::from(motor), 0, 255, 0, RUMBLE_OUTPUT_MAX) as u16
}
