//! # Transport Module
//!
//! Boundary between the emulated controller and the kernel's virtual HID
//! device.
//!
//! This module handles:
//! - The [`Transport`] write primitive used to send input reports and
//!   `GET_REPORT`/`SET_REPORT` replies
//! - The [`KernelEvent`] kinds delivered from the kernel
//! - A Linux `/dev/uhid` implementation in [`uhid`]

use std::io;

pub mod uhid;

/// Device-originated event delivered by the virtual HID device
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KernelEvent {
    /// Device started; first event after creation
    Start,
    /// Device stopped; answer to destruction
    Stop,
    /// A reader opened the device
    Open,
    /// The last reader closed the device
    Close,
    /// Raw output report (rumble, LEDs) sent by the driver
    Output { data: Vec<u8> },
    /// Feature report query; must be answered with the same `id`
    GetReport { id: u32, report_number: u8 },
    /// Feature report write
    SetReport {
        id: u32,
        report_number: u8,
        data: Vec<u8>,
    },
}

/// Write primitive towards the kernel
///
/// Writes are fire-and-forget: callers log failures and carry on.
#[cfg_attr(test, mockall::automock)]
pub trait Transport: Send + Sync {
    /// Send one complete input report
    fn send_input(&self, report: &[u8]) -> io::Result<()>;

    /// Answer a [`KernelEvent::GetReport`]; `err` is 0 on success
    fn send_get_report_reply(&self, id: u32, err: u16, data: &[u8]) -> io::Result<()>;

    /// Answer a [`KernelEvent::SetReport`]; `err` is 0 on success
    fn send_set_report_reply(&self, id: u32, err: u16) -> io::Result<()>;
}
