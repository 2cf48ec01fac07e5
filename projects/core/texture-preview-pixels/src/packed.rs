//! Decoding of fixed-size packed pixels.

use crate::descriptor::PackedLayout;
use multiversion::multiversion;
use texture_preview_common::{
    color_8888::Color8888,
    cursor::StreamCursor,
    raster::RasterImage,
    validate::{checked_size, DecodeLimits},
    DecodeResult,
};

/// Decodes a `width` x `height` image of `layout` pixels starting at the cursor position.
///
/// The layout and the stream length are checked before the raster is allocated. On
/// success the cursor is advanced past exactly `width * height * bytes_per_pixel` bytes.
pub fn decode_packed(
    cursor: &mut StreamCursor<'_>,
    layout: PackedLayout,
    width: u32,
    height: u32,
    limits: &DecodeLimits,
) -> DecodeResult<RasterImage> {
    layout.ensure_valid()?;
    limits.ensure_dimensions(layout.name, width, height)?;
    let required = checked_size(&[
        width as u64,
        height as u64,
        layout.bytes_per_pixel as u64,
    ])?;
    // Dimensions are bounded by `limits`, so this fits in memory.
    let src = cursor.peek_bytes(required as usize)?;

    let mut image = RasterImage::new(layout.name, width, height, limits)?;
    unpack_pixels(&layout, src, image.pixels_mut());
    cursor.skip(required as usize)?;
    Ok(image)
}

/// Encodes pixels with `layout`, quantizing narrow channels. The inverse of
/// [`decode_packed`] up to channel precision. Invalid layouts produce no bytes.
pub fn encode_packed(layout: PackedLayout, pixels: &[Color8888]) -> alloc::vec::Vec<u8> {
    if layout.ensure_valid().is_err() {
        return alloc::vec::Vec::new();
    }
    let bpp = layout.bytes_per_pixel as usize;
    let mut out = alloc::vec![0u8; pixels.len() * bpp];
    for (pixel, dest) in pixels.iter().zip(out.chunks_exact_mut(bpp)) {
        layout.write_raw(layout.encode_pixel(*pixel), dest);
    }
    out
}

#[multiversion(targets(
    // x86-64-v3 without lahfsahf
    "x86_64+avx+avx2+bmi1+bmi2+cmpxchg16b+f16c+fma+fxsr+lzcnt+movbe+popcnt+sse+sse2+sse3+sse4.1+sse4.2+ssse3+xsave",
    // x86-64-v2 without lahfsahf
    "x86_64+cmpxchg16b+fxsr+popcnt+sse+sse2+sse3+sse4.1+sse4.2+ssse3",
))]
fn unpack_pixels(layout: &PackedLayout, src: &[u8], dest: &mut [Color8888]) {
    let bpp = layout.bytes_per_pixel as usize;
    for (raw, pixel) in src.chunks_exact(bpp).zip(dest.iter_mut()) {
        *pixel = layout.decode_pixel(layout.read_raw(raw));
    }
}
