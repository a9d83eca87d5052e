//! # DualSense Feature Reports
//!
//! Fixed payloads returned for the feature reports `hid-playstation` reads
//! while probing the device. Each payload starts with its report id.

use super::protocol::{
    DS_FEATURE_REPORT_CALIBRATION, DS_FEATURE_REPORT_FIRMWARE_INFO, DS_FEATURE_REPORT_PAIRING_INFO,
};

/// IMU calibration (report 0x05)
pub const DS_CALIBRATION_INFO: [u8; 41] = [
    DS_FEATURE_REPORT_CALIBRATION,
    0xff, 0xfc, 0xff, 0xfe, 0xff, 0x83, 0x22, 0x78,
    0xdd, 0x92, 0x22, 0x5f, 0xdd, 0x95, 0x22, 0x6d,
    0xdd, 0x1c, 0x02, 0x1c, 0x02, 0xf2, 0x1f, 0xed,
    0xdf, 0xe3, 0x20, 0xda, 0xe0, 0xee, 0x1f, 0xdf,
    0xdf, 0x0b, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

/// Pairing info (report 0x09); bytes 1..=6 are replaced by the hardware
/// address in reverse byte order
pub const DS_PAIRING_INFO: [u8; 20] = [
    DS_FEATURE_REPORT_PAIRING_INFO,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x08, 0x25, 0x00, 0x1e, 0x00, 0xee, 0x74, 0xd0,
    0xbc, 0x00, 0x00, 0x00, 0x00,
];

/// Offset of the hardware address inside [`DS_PAIRING_INFO`]
pub const PAIRING_INFO_ADDRESS_OFFSET: usize = 1;

/// Firmware info (report 0x20): build date "Jun 19 2023", time "14:47:34",
/// then hardware and firmware versions
pub const DS_FIRMWARE_INFO: [u8; 64] = [
    DS_FEATURE_REPORT_FIRMWARE_INFO,
    0x4a, 0x75, 0x6e, 0x20, 0x31, 0x39, 0x20, 0x32,
    0x30, 0x32, 0x33, 0x31, 0x34, 0x3a, 0x34, 0x37,
    0x3a, 0x33, 0x34, 0x03, 0x00, 0x44, 0x00, 0x08,
    0x02, 0x00, 0x01, 0x36, 0x00, 0x00, 0x01, 0xc1,
    0xc8, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x54, 0x01, 0x00, 0x00, 0x14,
    0x00, 0x00, 0x00, 0x0b, 0x00, 0x01, 0x00, 0x06,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

/// Feature report payloads supplied to the kernel event handler
///
/// Defaults to the retail DualSense payloads above.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureBlobs {
    pub calibration: Vec<u8>,
    pub pairing_info: Vec<u8>,
    pub firmware_info: Vec<u8>,
}

impl Default for FeatureBlobs {
    fn default() -> Self {
        Self {
            calibration: DS_CALIBRATION_INFO.to_vec(),
            pairing_info: DS_PAIRING_INFO.to_vec(),
            firmware_info: DS_FIRMWARE_INFO.to_vec(),
        }
    }
}

impl FeatureBlobs {
    /// Pairing payload with `address` copied in reverse byte order
    pub fn pairing_info_for(&self, address: &[u8; 6]) -> Vec<u8> {
        let mut data = self.pairing_info.clone();
        let end = PAIRING_INFO_ADDRESS_OFFSET + address.len();
        if data.len() < end {
            data.resize(end, 0);
        }
        for (slot, byte) in data[PAIRING_INFO_ADDRESS_OFFSET..end]
            .iter_mut()
            .zip(address.iter().rev())
        {
            *slot = *byte;
        }
        data
    }
}
