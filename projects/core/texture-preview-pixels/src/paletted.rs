//! Decoding of palette indices.

use crate::descriptor::{IndexLayout, NibbleOrder};
use crate::palette::Palette;
use texture_preview_common::{
    cursor::StreamCursor,
    raster::RasterImage,
    validate::{checked_size, is_one_of, DecodeLimits},
    DecodeError, DecodeResult,
};

const FORMAT: &str = "paletted";

/// Decodes `width` x `height` palette indices starting at the cursor position.
///
/// Each row starts on a byte boundary. Indices past the end of `palette` resolve to its
/// last entry. On success the cursor is advanced past exactly the index bytes.
pub fn decode_paletted(
    cursor: &mut StreamCursor<'_>,
    layout: IndexLayout,
    palette: &Palette,
    width: u32,
    height: u32,
    limits: &DecodeLimits,
) -> DecodeResult<RasterImage> {
    if !is_one_of(layout.bits, &[1, 2, 4, 8]) {
        return Err(DecodeError::InvalidField {
            format: FORMAT,
            field: "index bits",
            value: layout.bits as u64,
        });
    }
    limits.ensure_dimensions(FORMAT, width, height)?;

    let row_bytes = layout.row_bytes(width);
    let required = checked_size(&[row_bytes, height as u64])?;
    let src = cursor.peek_bytes(required as usize)?;

    let mut image = RasterImage::new(FORMAT, width, height, limits)?;
    let bits = layout.bits as usize;
    let mask = ((1u16 << bits) - 1) as u8;
    for (row, dest) in src
        .chunks_exact(row_bytes as usize)
        .zip(image.pixels_mut().chunks_exact_mut(width as usize))
    {
        for (x, pixel) in dest.iter_mut().enumerate() {
            let bit = x * bits;
            let byte = row[bit / 8];
            let shift = match layout.nibble_order {
                NibbleOrder::LowFirst => bit % 8,
                NibbleOrder::HighFirst => 8 - bits - bit % 8,
            };
            *pixel = palette.lookup(((byte >> shift) & mask) as usize);
        }
    }

    cursor.skip(required as usize)?;
    Ok(image)
}
