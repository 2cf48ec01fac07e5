//! BC4 (ATI1) decoding, plus the 8 byte interpolated channel block it shares with the
//! alpha half of BC3 and both halves of BC5.
//!
//! Uses the 'ideal' rounding method described in the DX9 docs (truncating division).

use texture_preview_common::{color_8888::Color8888, decoded_4x4_block::Decoded4x4Block};

/// Decodes an 8 byte interpolated single channel block into 16 values in row-major order.
///
/// If `e0 > e1` there are 8 interpolated values, otherwise 6 interpolated values plus
/// 0 and 255.
#[inline(always)]
#[allow(clippy::identity_op)]
pub fn decode_channel_block(src: &[u8; 8]) -> [u8; 16] {
    let e0 = src[0] as u16;
    let e1 = src[1] as u16;

    let mut values = [0u8; 8];
    values[0] = e0 as u8;
    values[1] = e1 as u8;
    if e0 > e1 {
        values[2] = ((6 * e0 + 1 * e1) / 7) as u8;
        values[3] = ((5 * e0 + 2 * e1) / 7) as u8;
        values[4] = ((4 * e0 + 3 * e1) / 7) as u8;
        values[5] = ((3 * e0 + 4 * e1) / 7) as u8;
        values[6] = ((2 * e0 + 5 * e1) / 7) as u8;
        values[7] = ((1 * e0 + 6 * e1) / 7) as u8;
    } else {
        values[2] = ((4 * e0 + 1 * e1) / 5) as u8;
        values[3] = ((3 * e0 + 2 * e1) / 5) as u8;
        values[4] = ((2 * e0 + 3 * e1) / 5) as u8;
        values[5] = ((1 * e0 + 4 * e1) / 5) as u8;
        values[6] = 0;
        values[7] = 255;
    }

    // 16 indices of 3 bits each, packed little endian into the remaining 6 bytes.
    let indices = u64::from_le_bytes([src[2], src[3], src[4], src[5], src[6], src[7], 0, 0]);
    let mut out = [0u8; 16];
    for (pixel, value) in out.iter_mut().enumerate() {
        *value = values[((indices >> (pixel * 3)) & 0b111) as usize];
    }
    out
}

/// Decodes a BC4 block. The channel is broadcast to grey with full alpha.
///
/// ```
/// use texture_preview_bc::util::decode_bc4_block;
///
/// let decoded = decode_bc4_block(&[200, 0, 0, 0, 0, 0, 0, 0]);
/// assert_eq!(decoded.pixels[0].g, 200);
/// ```
#[inline]
pub fn decode_bc4_block(src: &[u8; 8]) -> Decoded4x4Block {
    let channel = decode_channel_block(src);
    let mut result = Decoded4x4Block::default();
    for (pixel, value) in result.pixels.iter_mut().zip(channel) {
        *pixel = Color8888::grey(value);
    }
    result
}

/// Safely wraps [`decode_bc4_block`] for use with slices
///
/// # Returns
///
/// A decoded block, else [`None`] if the slice is too short.
#[inline]
pub fn decode_bc4_block_from_slice(src: &[u8]) -> Option<Decoded4x4Block> {
    let block: &[u8; 8] = src.get(..8)?.try_into().ok()?;
    Some(decode_bc4_block(block))
}
