//! BC1 (DXT1) decoding implementation; based on etcpak
//! <https://github.com/wolfpld/etcpak> and MSDN
//! <https://learn.microsoft.com/en-us/windows/win32/direct3d9/opaque-and-1-bit-alpha-textures>

use texture_preview_common::{
    color_565::Color565, color_8888::Color8888, decoded_4x4_block::Decoded4x4Block,
};

/// Builds the four entry colour dictionary of a BC1-style colour block.
///
/// When `allow_punch_through` is set and `c0 <= c1`, the block is in 3 colour mode and
/// entry 3 is transparent black. BC2 and BC3 always use 4 colour mode.
#[inline(always)]
pub(crate) fn bc1_colour_dictionary(
    c0: Color565,
    c1: Color565,
    allow_punch_through: bool,
) -> [Color8888; 4] {
    let (r0, g0, b0) = (c0.red() as u32, c0.green() as u32, c0.blue() as u32);
    let (r1, g1, b1) = (c1.red() as u32, c1.green() as u32, c1.blue() as u32);

    let mut dict = [Color8888::TRANSPARENT; 4];
    dict[0] = c0.to_color_8888();
    dict[1] = c1.to_color_8888();

    if c0.greater_than(&c1) || !allow_punch_through {
        // Four-color block
        dict[2] = Color8888::new(
            ((2 * r0 + r1) / 3) as u8,
            ((2 * g0 + g1) / 3) as u8,
            ((2 * b0 + b1) / 3) as u8,
            255,
        );
        dict[3] = Color8888::new(
            ((r0 + 2 * r1) / 3) as u8,
            ((g0 + 2 * g1) / 3) as u8,
            ((b0 + 2 * b1) / 3) as u8,
            255,
        );
    } else {
        // Three-color block, index 3 is transparent black
        dict[2] = Color8888::new(
            ((r0 + r1) / 2) as u8,
            ((g0 + g1) / 2) as u8,
            ((b0 + b1) / 2) as u8,
            255,
        );
    }

    dict
}

/// Decodes the 8 byte colour half shared by BC1, BC2 and BC3.
#[inline(always)]
pub(crate) fn decode_colour_block(src: &[u8; 8], allow_punch_through: bool) -> Decoded4x4Block {
    let c0 = Color565::from_raw(u16::from_le_bytes([src[0], src[1]]));
    let c1 = Color565::from_raw(u16::from_le_bytes([src[2], src[3]]));
    let idx = u32::from_le_bytes([src[4], src[5], src[6], src[7]]);
    let dict = bc1_colour_dictionary(c0, c1, allow_punch_through);

    let mut result = Decoded4x4Block::default();
    let mut index_pos = 0;
    for y in 0..4 {
        for x in 0..4 {
            let pixel_idx = (idx >> index_pos) & 0x3;
            // SAFETY: x and y are below 4 and pixel_idx is masked to 2 bits.
            unsafe { result.set_pixel_unchecked(x, y, dict[pixel_idx as usize]) };
            index_pos += 2;
        }
    }
    result
}

/// Decodes a BC1 block into a structured representation of pixels
///
/// # Parameters
///
/// - `src`: The 8 byte BC1 block
///
/// # Returns
///
/// A [`Decoded4x4Block`] containing all 16 decoded pixels
///
/// # Example
///
/// ```
/// use texture_preview_bc::util::decode_bc1_block;
///
/// let bc1_block = [0u8; 8];
/// let decoded = decode_bc1_block(&bc1_block);
/// assert_eq!(decoded.pixels[0].a, 255);
/// ```
#[inline]
pub fn decode_bc1_block(src: &[u8; 8]) -> Decoded4x4Block {
    decode_colour_block(src, true)
}

/// Safely wraps [`decode_bc1_block`] for use with slices
///
/// # Returns
///
/// A decoded block, else [`None`] if the slice is too short.
#[inline]
pub fn decode_bc1_block_from_slice(src: &[u8]) -> Option<Decoded4x4Block> {
    let block: &[u8; 8] = src.get(..8)?.try_into().ok()?;
    Some(decode_bc1_block(block))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    #[test]
    fn solid_red_block() {
        let bc1_block = [
            0x00, 0xF8, // c0 = R:31 G:0 B:0
            0x00, 0xF8, // c1 = R:31 G:0 B:0 (identical to create solid color)
            0x00, 0x00, 0x00, 0x00, // All pixels use index 0
        ];
        let decoded = decode_bc1_block(&bc1_block);
        assert!(decoded.has_identical_pixels());
        assert_eq!(decoded.pixels[0], Color8888::new(255, 0, 0, 255));
    }

    #[test]
    fn white_endpoint_with_zero_indices() {
        // c0 = 0xFFFF, c1 = 0x0000, all indices 0.
        let block = [0xFF, 0xFF, 0x00, 0x00, 0, 0, 0, 0];
        let decoded = decode_bc1_block(&block);
        assert!(decoded
            .pixels
            .iter()
            .all(|p| *p == Color8888::new(255, 255, 255, 255)));
    }

    #[rstest]
    #[case(0b00, Color8888::new(255, 255, 255, 255))]
    #[case(0b01, Color8888::new(0, 0, 0, 255))]
    #[case(0b10, Color8888::new(170, 170, 170, 255))]
    #[case(0b11, Color8888::new(85, 85, 85, 255))]
    fn four_colour_mode_interpolates_thirds(#[case] index: u8, #[case] expected: Color8888) {
        let indices = index * 0b01010101;
        let block = [0xFF, 0xFF, 0x00, 0x00, indices, indices, indices, indices];
        let decoded = decode_bc1_block(&block);
        assert_eq!(decoded.pixels[5], expected);
    }

    #[rstest]
    #[case(0b10, Color8888::new(127, 127, 127, 255))]
    #[case(0b11, Color8888::TRANSPARENT)]
    fn three_colour_mode_has_punch_through(#[case] index: u8, #[case] expected: Color8888) {
        // c0 = 0x0000 <= c1 = 0xFFFF
        let indices = index * 0b01010101;
        let block = [0x00, 0x00, 0xFF, 0xFF, indices, indices, indices, indices];
        assert_eq!(decode_bc1_block(&block).pixels[15], expected);
    }

    #[test]
    fn short_slice_is_rejected() {
        assert!(decode_bc1_block_from_slice(&[0u8; 7]).is_none());
        assert!(decode_bc1_block_from_slice(&[0u8; 9]).is_some());
    }
}
