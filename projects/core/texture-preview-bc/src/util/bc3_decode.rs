//! BC3 (DXT4/DXT5) decoding implementation; based on etcpak
//! <https://github.com/wolfpld/etcpak> and MSDN
//! <https://learn.microsoft.com/en-us/windows/win32/direct3d10/d3d10-graphics-programming-guide-resources-block-compression#bc3>
//!
//! Uses the 'ideal' rounding/computing method described in the DX9 docs, as opposed to DX10, AMD or Nvidia
//! method.

use super::bc1_decode::decode_colour_block;
use super::bc4_decode::decode_channel_block;
use texture_preview_common::decoded_4x4_block::Decoded4x4Block;

/// Decodes a BC3 block into a structured representation of pixels
///
/// # Parameters
///
/// - `src`: The 16 byte BC3 block; interpolated alpha first, then colour
///
/// # Example
///
/// ```
/// use texture_preview_bc::util::decode_bc3_block;
///
/// let bc3_block = [0u8; 16];
/// let decoded = decode_bc3_block(&bc3_block);
/// assert_eq!(decoded.pixels[0].a, 0);
/// ```
#[inline]
pub fn decode_bc3_block(src: &[u8; 16]) -> Decoded4x4Block {
    let mut alpha_src = [0u8; 8];
    alpha_src.copy_from_slice(&src[..8]);
    let mut colour_src = [0u8; 8];
    colour_src.copy_from_slice(&src[8..]);

    // BC3 always uses the 4-color mode (no transparency from color section)
    let mut result = decode_colour_block(&colour_src, false);
    let alpha = decode_channel_block(&alpha_src);
    for (pixel, a) in result.pixels.iter_mut().zip(alpha) {
        pixel.a = a;
    }
    result
}

/// Safely wraps [`decode_bc3_block`] for use with slices
///
/// # Returns
///
/// A decoded block, else [`None`] if the slice is too short.
#[inline]
pub fn decode_bc3_block_from_slice(src: &[u8]) -> Option<Decoded4x4Block> {
    let block: &[u8; 16] = src.get(..16)?.try_into().ok()?;
    Some(decode_bc3_block(block))
}
