//! BC2 (DXT2/DXT3) decoding implementation; based on etcpak
//! <https://github.com/wolfpld/etcpak> and MSDN
//! <https://learn.microsoft.com/en-us/windows/win32/direct3d10/d3d10-graphics-programming-guide-resources-block-compression#bc2>

use super::bc1_decode::decode_colour_block;
use texture_preview_common::decoded_4x4_block::Decoded4x4Block;

/// Decodes a BC2 block: 8 bytes of explicit 4-bit alpha followed by a 4 colour BC1 block.
///
/// ```
/// use texture_preview_bc::util::decode_bc2_block;
///
/// let mut block = [0u8; 16];
/// block[0] = 0x0F; // pixel 0 alpha = 0xF
/// let decoded = decode_bc2_block(&block);
/// assert_eq!(decoded.pixels[0].a, 255);
/// assert_eq!(decoded.pixels[1].a, 0);
/// ```
#[inline]
pub fn decode_bc2_block(src: &[u8; 16]) -> Decoded4x4Block {
    let mut colour = [0u8; 8];
    colour.copy_from_slice(&src[8..16]);
    let mut result = decode_colour_block(&colour, false);

    let alpha = u64::from_le_bytes([
        src[0], src[1], src[2], src[3], src[4], src[5], src[6], src[7],
    ]);
    for (index, pixel) in result.pixels.iter_mut().enumerate() {
        let a4 = ((alpha >> (index * 4)) & 0xF) as u8;
        // 4-bit to 8-bit by replication (x * 17)
        pixel.a = (a4 << 4) | a4;
    }
    result
}

/// Safely wraps [`decode_bc2_block`] for use with slices
///
/// # Returns
///
/// A decoded block, else [`None`] if the slice is too short.
#[inline]
pub fn decode_bc2_block_from_slice(src: &[u8]) -> Option<Decoded4x4Block> {
    let block: &[u8; 16] = src.get(..16)?.try_into().ok()?;
    Some(decode_bc2_block(block))
}
