//! Whole-surface decoding: walks 4x4 tiles in row-major tile order and writes each
//! decoded block into a [`RasterImage`], clipping partial tiles at the right and bottom
//! edges.

use crate::util::*;
use derive_enum_all_values::AllValues;
use multiversion::multiversion;
use texture_preview_common::{
    color_8888::Color8888,
    cursor::StreamCursor,
    decoded_4x4_block::Decoded4x4Block,
    raster::RasterImage,
    validate::{checked_size, DecodeLimits},
    DecodeError, DecodeResult,
};

/// A block-compressed pixel format.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, AllValues)]
pub enum BlockFormat {
    /// DXT1, 8 bytes per block, optional 1-bit alpha
    Bc1,
    /// DXT2/DXT3, 16 bytes per block, explicit 4-bit alpha
    Bc2,
    /// DXT4/DXT5, 16 bytes per block, interpolated alpha
    Bc3,
    /// ATI1, 8 bytes per block, single channel
    Bc4,
    /// ATI2, 16 bytes per block, two channels
    Bc5,
    /// 16 bytes per block, eight modes
    Bc7,
}

impl BlockFormat {
    /// Size of one compressed 4x4 block in bytes.
    #[inline]
    pub const fn bytes_per_block(self) -> usize {
        match self {
            BlockFormat::Bc1 | BlockFormat::Bc4 => 8,
            BlockFormat::Bc2 | BlockFormat::Bc3 | BlockFormat::Bc5 | BlockFormat::Bc7 => 16,
        }
    }

    /// Short human readable name.
    pub const fn name(self) -> &'static str {
        match self {
            BlockFormat::Bc1 => "BC1",
            BlockFormat::Bc2 => "BC2",
            BlockFormat::Bc3 => "BC3",
            BlockFormat::Bc4 => "BC4",
            BlockFormat::Bc5 => "BC5",
            BlockFormat::Bc7 => "BC7",
        }
    }

    /// Number of bytes a `width` x `height` surface occupies, rounding each dimension up to
    /// a whole block. Returns [`None`] on overflow.
    pub fn required_bytes(self, width: u32, height: u32) -> Option<u64> {
        let blocks_x = (width as u64).div_ceil(4);
        let blocks_y = (height as u64).div_ceil(4);
        checked_size(&[blocks_x, blocks_y, self.bytes_per_block() as u64]).ok()
    }

    /// Decodes a single block. `src` must hold at least [`Self::bytes_per_block`] bytes.
    #[inline]
    pub fn decode_block(self, src: &[u8]) -> Option<Decoded4x4Block> {
        match self {
            BlockFormat::Bc1 => decode_bc1_block_from_slice(src),
            BlockFormat::Bc2 => decode_bc2_block_from_slice(src),
            BlockFormat::Bc3 => decode_bc3_block_from_slice(src),
            BlockFormat::Bc4 => decode_bc4_block_from_slice(src),
            BlockFormat::Bc5 => decode_bc5_block_from_slice(src),
            BlockFormat::Bc7 => decode_bc7_block_from_slice(src),
        }
    }
}

/// Decodes a `width` x `height` block-compressed surface starting at the cursor position.
///
/// The dimensions are checked against `limits` and the stream length is checked before
/// the output raster is allocated. On success the cursor is advanced past exactly the
/// bytes the surface occupies.
pub fn decode_block_surface(
    cursor: &mut StreamCursor<'_>,
    format: BlockFormat,
    width: u32,
    height: u32,
    limits: &DecodeLimits,
) -> DecodeResult<RasterImage> {
    limits.ensure_dimensions(format.name(), width, height)?;
    let required = format
        .required_bytes(width, height)
        .ok_or(DecodeError::AllocationTooLarge {
            requested: u64::MAX,
            limit: limits.max_pixels,
        })?;

    // Validates the length before the raster is sized.
    let required = usize::try_from(required).map_err(|_| DecodeError::AllocationTooLarge {
        requested: required,
        limit: limits.max_pixels,
    })?;
    let src = cursor.peek_bytes(required)?;

    let mut image = RasterImage::new(format.name(), width, height, limits)?;
    decode_blocks(
        format,
        src,
        image.pixels_mut(),
        width as usize,
        height as usize,
    );
    cursor.skip(required)?;
    Ok(image)
}

#[multiversion(targets(
    // x86-64-v3 without lahfsahf
    "x86_64+avx+avx2+bmi1+bmi2+cmpxchg16b+f16c+fma+fxsr+lzcnt+movbe+popcnt+sse+sse2+sse3+sse4.1+sse4.2+ssse3+xsave",
    // x86-64-v2 without lahfsahf
    "x86_64+cmpxchg16b+fxsr+popcnt+sse+sse2+sse3+sse4.1+sse4.2+ssse3",
))]
fn decode_blocks(
    format: BlockFormat,
    src: &[u8],
    dest: &mut [Color8888],
    width: usize,
    height: usize,
) {
    let blocks_x = width.div_ceil(4);
    let block_size = format.bytes_per_block();
    for (index, block) in src.chunks_exact(block_size).enumerate() {
        let Some(decoded) = format.decode_block(block) else {
            break;
        };
        decoded.write_clipped(dest, width, height, index % blocks_x, index / blocks_x);
    }
}
