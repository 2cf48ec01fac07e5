//! In-place fixups applied after decoding: orientation, channel order and alpha.

use texture_preview_common::{color_8888::Color8888, raster::RasterImage};

/// What to do with the alpha channel of a decoded image.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum AlphaMode {
    /// Leave alpha untouched.
    #[default]
    Keep,
    /// Multiply every colour channel by alpha.
    Premultiply,
    /// Force every pixel opaque.
    Strip,
}

/// Mirrors the image top to bottom.
pub fn flip_vertical(image: &mut RasterImage) {
    let width = image.width() as usize;
    let height = image.height() as usize;
    let pixels = image.pixels_mut();
    for y in 0..height / 2 {
        let (top, bottom) = pixels.split_at_mut((height - 1 - y) * width);
        top[y * width..(y + 1) * width].swap_with_slice(&mut bottom[..width]);
    }
}

/// Mirrors the image left to right.
pub fn flip_horizontal(image: &mut RasterImage) {
    let width = image.width() as usize;
    for row in image.pixels_mut().chunks_exact_mut(width) {
        row.reverse();
    }
}

/// Exchanges the red and blue channels of every pixel.
pub fn swap_red_blue(image: &mut RasterImage) {
    for pixel in image.pixels_mut() {
        core::mem::swap(&mut pixel.r, &mut pixel.b);
    }
}

/// Replaces alpha with `255 - alpha`.
pub fn invert_alpha(image: &mut RasterImage) {
    for pixel in image.pixels_mut() {
        pixel.a = 255 - pixel.a;
    }
}

/// Forces alpha to 255 when it carries no information.
///
/// Many formats store a constant alpha (often zero) for opaque images. If every pixel has
/// the same alpha the image is made opaque and `true` is returned; otherwise the image is
/// left untouched and `false` is returned.
pub fn strip_alpha_if_fully_opaque(image: &mut RasterImage) -> bool {
    let pixels = image.pixels_mut();
    let Some(first) = pixels.first().map(|p| p.a) else {
        return false;
    };
    if pixels.iter().any(|p| p.a != first) {
        return false;
    }
    for pixel in pixels {
        pixel.a = 255;
    }
    true
}

/// Applies `mode` to every pixel.
pub fn premultiply_or_strip_alpha(image: &mut RasterImage, mode: AlphaMode) {
    match mode {
        AlphaMode::Keep => {}
        AlphaMode::Strip => {
            for pixel in image.pixels_mut() {
                pixel.a = 255;
            }
        }
        AlphaMode::Premultiply => {
            for pixel in image.pixels_mut() {
                *pixel = premultiply(*pixel);
            }
        }
    }
}

/// Rescales alpha stored in the PS2 `0..=128` range to `0..=255`.
pub fn expand_half_range_alpha(image: &mut RasterImage) {
    for pixel in image.pixels_mut() {
        pixel.a = pixel.a.saturating_mul(2);
    }
}

#[inline(always)]
fn premultiply(pixel: Color8888) -> Color8888 {
    let scale = |c: u8| ((c as u32 * pixel.a as u32 + 127) / 255) as u8;
    Color8888::new(scale(pixel.r), scale(pixel.g), scale(pixel.b), pixel.a)
}
