//! The single decode entry point shared by every format handler.

use crate::context::DecodeContext;
use crate::descriptor::{PixelFamily, PixelFormatDescriptor};
use crate::mipmap::MipLevel;
use crate::packed::decode_packed;
use crate::paletted::decode_paletted;
use texture_preview_bc::decode_block_surface;
use texture_preview_common::{
    cursor::StreamCursor,
    raster::{FrameChain, RasterImage},
    DecodeResult,
};
use tracing::trace;

/// Geometry and palette selection for one image.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct DecodeParams {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Palette to use for paletted data; the store's current palette when [`None`]
    pub palette_id: Option<usize>,
}

impl DecodeParams {
    /// Parameters for a `width` x `height` image using the current palette.
    pub const fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            palette_id: None,
        }
    }

    /// Selects a palette by index.
    pub const fn with_palette_id(mut self, palette_id: usize) -> Self {
        self.palette_id = Some(palette_id);
        self
    }
}

/// Decodes one image described by `descriptor` starting at the cursor position.
///
/// On success the cursor is advanced past exactly the bytes the image occupies.
/// Crunched images are variable length and consume the rest of the stream.
pub fn decode_pixels(
    descriptor: &PixelFormatDescriptor,
    cursor: &mut StreamCursor<'_>,
    params: DecodeParams,
    ctx: &mut DecodeContext,
) -> DecodeResult<RasterImage> {
    trace!(
        format = descriptor.name,
        width = params.width,
        height = params.height,
        offset = cursor.offset(),
        "Decoding pixels"
    );
    let limits = *ctx.limits();
    let DecodeParams { width, height, .. } = params;

    match descriptor.family {
        PixelFamily::Packed(layout) => decode_packed(cursor, layout, width, height, &limits),
        PixelFamily::Paletted(layout) => {
            let palette = ctx.resolve_palette(descriptor.name, params.palette_id)?;
            decode_paletted(cursor, layout, palette, width, height, &limits)
        }
        PixelFamily::Block(format) => decode_block_surface(cursor, format, width, height, &limits),
        PixelFamily::Crunched(variant) => decode_crunched(cursor, variant, width, height, &limits),
    }
}

/// Decodes every level in `levels`, each located relative to `base` in the cursor's
/// stream, into a [`FrameChain`]. The cursor is left after the last level.
pub fn decode_mip_chain(
    descriptor: &PixelFormatDescriptor,
    cursor: &mut StreamCursor<'_>,
    base: usize,
    levels: &[MipLevel],
    palette_id: Option<usize>,
    ctx: &mut DecodeContext,
) -> DecodeResult<FrameChain> {
    let mut chain = FrameChain::new();
    for (index, level) in levels.iter().enumerate() {
        let start = (base as u64).saturating_add(level.offset);
        trace!(
            format = descriptor.name,
            level = index,
            width = level.width,
            height = level.height,
            offset = start,
            "Decoding mip level"
        );
        cursor.seek(usize::try_from(start).unwrap_or(usize::MAX))?;
        let params = DecodeParams {
            width: level.width,
            height: level.height,
            palette_id,
        };
        chain.push(decode_pixels(descriptor, cursor, params, ctx)?);
    }
    Ok(chain)
}

#[cfg(feature = "crunch")]
fn decode_crunched(
    cursor: &mut StreamCursor<'_>,
    variant: texture_preview_bc::CrunchVariant,
    width: u32,
    height: u32,
    limits: &texture_preview_common::validate::DecodeLimits,
) -> DecodeResult<RasterImage> {
    let data = cursor.rest();
    let image = texture_preview_bc::crunch::decode_crunched(data, variant, width, height, limits)?;
    cursor.skip(data.len())?;
    Ok(image)
}

#[cfg(not(feature = "crunch"))]
fn decode_crunched(
    _cursor: &mut StreamCursor<'_>,
    variant: texture_preview_bc::CrunchVariant,
    _width: u32,
    _height: u32,
    _limits: &texture_preview_common::validate::DecodeLimits,
) -> DecodeResult<RasterImage> {
    Err(texture_preview_common::DecodeError::Codec {
        format: variant.name(),
        detail: "built without the crunch feature".into(),
    })
}
