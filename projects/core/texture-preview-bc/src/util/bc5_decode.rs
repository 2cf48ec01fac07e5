//! BC5 (ATI2) decoding: two independent interpolated channels, typically a normal map's
//! X and Y.

use super::bc4_decode::decode_channel_block;
use texture_preview_common::{color_8888::Color8888, decoded_4x4_block::Decoded4x4Block};

/// Decodes a BC5 block into red = X, green = Y, blue = 0, alpha = 255.
///
/// ```
/// use texture_preview_bc::util::decode_bc5_block;
///
/// let mut block = [0u8; 16];
/// block[0] = 128; // red endpoint 0
/// block[8] = 64; // green endpoint 0
/// let decoded = decode_bc5_block(&block);
/// assert_eq!((decoded.pixels[0].r, decoded.pixels[0].g, decoded.pixels[0].b), (128, 64, 0));
/// ```
#[inline]
pub fn decode_bc5_block(src: &[u8; 16]) -> Decoded4x4Block {
    let mut red_src = [0u8; 8];
    red_src.copy_from_slice(&src[..8]);
    let mut green_src = [0u8; 8];
    green_src.copy_from_slice(&src[8..]);

    let red = decode_channel_block(&red_src);
    let green = decode_channel_block(&green_src);

    let mut result = Decoded4x4Block::default();
    for (index, pixel) in result.pixels.iter_mut().enumerate() {
        *pixel = Color8888::new(red[index], green[index], 0, 255);
    }
    result
}

/// Safely wraps [`decode_bc5_block`] for use with slices
///
/// # Returns
///
/// A decoded block, else [`None`] if the slice is too short.
#[inline]
pub fn decode_bc5_block_from_slice(src: &[u8]) -> Option<Decoded4x4Block> {
    let block: &[u8; 16] = src.get(..16)?.try_into().ok()?;
    Some(decode_bc5_block(block))
}
