//! # Report State
//!
//! Everything one emulated controller shares between the application
//! threads calling mutators and the uhid worker handling kernel events.
//! A single mutex guards the whole struct, report and callback slots alike.

use std::sync::Arc;
use std::time::Instant;

use crate::codec::sensor_timestamp;
use crate::dualsense::protocol::DS_TOUCH_ID_MAX;
use crate::dualsense::report::{InputReport, TOUCH_POINT_COUNT};

/// Rumble observer: `(left, right)` motor intensity in 0-65535
pub type RumbleCallback = Arc<dyn Fn(u16, u16) + Send + Sync>;

/// Lightbar observer: `(red, green, blue)`
pub type LedCallback = Arc<dyn Fn(u8, u8, u8) + Send + Sync>;

/// Per-finger contact state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TouchContact {
    pub pressed: bool,
    pub id: u8,
}

pub struct ReportState {
    pub hardware_address: [u8; 6],
    pub vendor_id: u16,
    pub product_id: u16,
    pub version: u16,
    pub report: InputReport,
    pub touch_contacts: [TouchContact; TOUCH_POINT_COUNT],
    pub last_touch_id: u8,
    pub on_rumble: Option<RumbleCallback>,
    pub on_led: Option<LedCallback>,
    epoch: Instant,
}

impl std::fmt::Debug for ReportState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportState")
            .field("hardware_address", &self.hardware_address)
            .field("vendor_id", &format_args!("{:#06x}", self.vendor_id))
            .field("product_id", &format_args!("{:#06x}", self.product_id))
            .field("report", &self.report)
            .field("touch_contacts", &self.touch_contacts)
            .field("last_touch_id", &self.last_touch_id)
            .field("on_rumble", &self.on_rumble.is_some())
            .field("on_led", &self.on_led.is_some())
            .finish()
    }
}

impl ReportState {
    pub fn new(hardware_address: [u8; 6], vendor_id: u16, product_id: u16, version: u16) -> Self {
        Self {
            hardware_address,
            vendor_id,
            product_id,
            version,
            report: InputReport::new(),
            touch_contacts: [TouchContact::default(); TOUCH_POINT_COUNT],
            last_touch_id: 0,
            on_rumble: None,
            on_led: None,
            epoch: Instant::now(),
        }
    }

    /// Hand out the next touch id, wrapping to 0 past `DS_TOUCH_ID_MAX`.
    ///
    /// Ids still held by a pressed contact are skipped.
    pub fn allocate_touch_id(&mut self) -> u8 {
        loop {
            self.last_touch_id = if self.last_touch_id >= DS_TOUCH_ID_MAX {
                0
            } else {
                self.last_touch_id + 1
            };

            let held = self
                .touch_contacts
                .iter()
                .any(|contact| contact.pressed && contact.id == self.last_touch_id);
            if !held {
                return self.last_touch_id;
            }
        }
    }

    /// Advance the sequence counter and stamp the sensor timestamp.
    ///
    /// Called once per transmitted report, after the field updates.
    pub fn stamp_and_advance(&mut self) {
        self.report.advance_seq_number();
        let elapsed = self.epoch.elapsed().as_nanos();
        self.report.set_sensor_timestamp(sensor_timestamp(elapsed));
    }
}
