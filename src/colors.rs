//! Conversion between normalized float color channels and 8-bit channels.

use crate::math::utils::clamp;
use crate::math::vec4::Vec4;

/// Converts a `[0, 1]` channel to `[0, 255]`, clamping out-of-range input.
#[inline]
pub fn to_byte(channel: f32) -> u8 {
    (clamp(channel, 0.0, 1.0) * 255.0).round() as u8
}

#[inline]
pub fn to_float(channel: u8) -> f32 {
    channel as f32 / 255.0
}

/// Quantizes the RGB channels of a color, ignoring alpha.
#[inline]
pub fn to_rgb8(color: Vec4) -> [u8; 3] {
    [to_byte(color.x), to_byte(color.y), to_byte(color.z)]
}
