//! # DualSense Protocol Module
//!
//! Byte-exact definitions of the DualSense USB wire format.
//!
//! This module handles:
//! - Input report layout and field encoding (sticks, buttons, motion, touch, battery)
//! - Output report decoding (rumble and lightbar)
//! - Fixed feature report payloads (calibration, pairing, firmware)
//! - The HID report descriptor

pub mod protocol;
pub mod report;
pub mod output;
pub mod feature;
pub mod descriptor;
