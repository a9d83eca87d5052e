//! # DualSense UHID Library
//!
//! Emulate a PS5 DualSense controller as a virtual Linux HID device.
//!
//! The kernel's `hid-playstation` driver binds to the virtual device as if
//! it were real hardware. Applications feed button, stick, trigger, motion,
//! touch and battery events into a [`joypad::DualSenseJoypad`] and receive
//! rumble and lightbar commands back through callbacks.

pub mod codec;
pub mod config;
pub mod dualsense;
pub mod error;
pub mod joypad;
pub mod transport;
