//! # Codec
//!
//! Pure numeric conversions between application ranges and the DualSense
//! wire encoding. No state lives here.

/// Linearly rescale `input` from `[in_lo, in_hi]` to `[out_lo, out_hi]`.
///
/// The result is rounded to the nearest integer, so both endpoints map
/// exactly and the mapping is monotonic. Inputs outside the input range
/// are extrapolated; callers clamp where the target field is narrower.
///
/// # Examples
///
/// ```
/// use dualsense_uhid::codec::scale;
///
/// assert_eq!(scale(0, 0, 255, 0, 255), 0);
/// assert_eq!(scale(255, 0, 255, 0, 0xFFFF), 0xFFFF);
/// assert_eq!(scale(0, -32768, 32767, 0, 255), 128);
/// ```
pub fn scale(input: i32, in_lo: i32, in_hi: i32, out_lo: i32, out_hi: i32) -> i32 {
    let slope = f64::from(out_hi - out_lo) / f64::from(in_hi - in_lo);
    out_lo + (slope * f64::from(input - in_lo)).round() as i32
}

/// Encode a magnitude as a little-endian 16-bit word, tagging the sign of
/// `original` in bit 15.
///
/// This is a sign flag, not two's complement: a negative `original` forces
/// bit 15 high and leaves the remaining bits of `magnitude` untouched.
/// `magnitude` is expected to be non-negative; negative values saturate to 0
/// and values above `u16::MAX` saturate to `u16::MAX`.
///
/// # Examples
///
/// ```
/// use dualsense_uhid::codec::sign_tagged_16;
///
/// assert_eq!(sign_tagged_16(1.0, 0x0102 as f32), [0x02, 0x01]);
/// assert_eq!(sign_tagged_16(-1.0, 0x0102 as f32), [0x02, 0x81]);
/// ```
pub fn sign_tagged_16(original: f32, magnitude: f32) -> [u8; 2] {
    let mut word = magnitude as u16;
    if original < 0.0 {
        word |= 1 << 15;
    }
    word.to_le_bytes()
}

/// Render bytes as lowercase, zero-padded, colon separated hex.
///
/// This matches the kernel's `%pM` formatting used for the `uniq`
/// attribute of input devices.
///
/// # Examples
///
/// ```
/// use dualsense_uhid::codec::hex_string;
///
/// assert_eq!(hex_string(&[0x0A, 0xBB, 0x00]), "0a:bb:00");
/// ```
pub fn hex_string(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|byte| format!("{:02x}", byte))
        .collect::<Vec<_>>()
        .join(":")
}

/// Parse a colon separated hardware address into its six bytes.
///
/// Returns `None` unless there are exactly six one- or two-digit hex groups.
pub fn parse_hex_address(text: &str) -> Option<[u8; 6]> {
    let mut address = [0u8; 6];
    let mut groups = text.trim().split(':');

    for slot in address.iter_mut() {
        let group = groups.next()?;
        if group.is_empty() || group.len() > 2 {
            return None;
        }
        *slot = u8::from_str_radix(group, 16).ok()?;
    }

    if groups.next().is_some() {
        return None;
    }

    Some(address)
}

/// Convert nanoseconds into the sensor timestamp unit (~0.33 µs).
///
/// The field is 32 bits wide on the wire and wraps.
pub fn sensor_timestamp(elapsed_nanos: u128) -> u32 {
    (elapsed_nanos / 333) as u32
}
