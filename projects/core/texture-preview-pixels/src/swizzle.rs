//! Console tiling layouts and their conversion to and from linear row-major order.

use alloc::vec;
use alloc::vec::Vec;
use texture_preview_common::raster::RasterImage;

/// How pixels are arranged in memory.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum TileScheme {
    /// Plain row-major order.
    #[default]
    Linear,
    /// Z-order curve: x and y bits interleaved starting with x, the leftover high bits of
    /// the larger dimension appended. Non power of two images use padded dimensions.
    Morton,
    /// Within every odd band of `granularity` rows, column `x` is exchanged with column
    /// `x ^ granularity` when that column exists.
    RowStripe {
        /// Band height and column exchange distance; 0 means no exchange.
        granularity: u32,
    },
}

/// Converts `src` stored in `scheme` order into row-major order.
///
/// Positions that a padded layout maps outside of `src` become `T::default()`.
pub fn deswizzle<T: Copy + Default>(
    src: &[T],
    width: u32,
    height: u32,
    scheme: TileScheme,
) -> Vec<T> {
    let (width, height) = (width as usize, height as usize);
    let mut out = vec![T::default(); width * height];
    for y in 0..height {
        for x in 0..width {
            let from = stored_index(x, y, width, height, scheme);
            if let Some(value) = src.get(from) {
                out[y * width + x] = *value;
            }
        }
    }
    out
}

/// Converts row-major `src` into `scheme` order. The inverse of [`deswizzle`] for every
/// geometry where the scheme is a bijection (all `Linear` and `RowStripe` images, and
/// power of two `Morton` images).
pub fn swizzle<T: Copy + Default>(
    src: &[T],
    width: u32,
    height: u32,
    scheme: TileScheme,
) -> Vec<T> {
    let (width, height) = (width as usize, height as usize);
    let mut out = vec![T::default(); width * height];
    for y in 0..height {
        for x in 0..width {
            let to = stored_index(x, y, width, height, scheme);
            if let (Some(slot), Some(value)) = (out.get_mut(to), src.get(y * width + x)) {
                *slot = *value;
            }
        }
    }
    out
}

/// Deswizzles a decoded image into a new image of the same size.
pub fn deswizzle_image(image: &RasterImage, scheme: TileScheme) -> RasterImage {
    if scheme == TileScheme::Linear {
        return image.clone();
    }
    let pixels = deswizzle(image.pixels(), image.width(), image.height(), scheme);
    // Same dimensions and pixel count as the input.
    RasterImage::from_pixels(image.width(), image.height(), pixels)
        .unwrap_or_else(|| image.clone())
}

/// Index in stored order of the pixel at (`x`, `y`) in row-major order.
#[inline]
fn stored_index(x: usize, y: usize, width: usize, height: usize, scheme: TileScheme) -> usize {
    match scheme {
        TileScheme::Linear => y * width + x,
        TileScheme::Morton => morton_index(x, y, width, height),
        TileScheme::RowStripe { granularity } => {
            let g = granularity as usize;
            if g == 0 || (y / g) % 2 == 0 {
                return y * width + x;
            }
            let swapped = x ^ g;
            if swapped < width {
                y * width + swapped
            } else {
                y * width + x
            }
        }
    }
}

fn morton_index(x: usize, y: usize, width: usize, height: usize) -> usize {
    let x_bits = width.next_power_of_two().trailing_zeros();
    let y_bits = height.next_power_of_two().trailing_zeros();
    let shared = x_bits.min(y_bits);

    let mut index = 0usize;
    for bit in 0..shared {
        index |= ((x >> bit) & 1) << (2 * bit);
        index |= ((y >> bit) & 1) << (2 * bit + 1);
    }
    let high = if x_bits > y_bits { x } else { y };
    index | ((high >> shared) << (2 * shared))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    fn linear(len: usize) -> Vec<u32> {
        (0..len as u32).collect()
    }

    #[test]
    fn morton_4x4_order() {
        let stored = linear(16);
        let out = deswizzle(&stored, 4, 4, TileScheme::Morton);
        assert_eq!(
            out,
            vec![0, 1, 4, 5, 2, 3, 6, 7, 8, 9, 12, 13, 10, 11, 14, 15]
        );
    }

    #[test]
    fn morton_rectangular_appends_high_bits() {
        // 4x2: one shared bit, then the remaining x bit.
        let out = deswizzle(&linear(8), 4, 2, TileScheme::Morton);
        assert_eq!(out, vec![0, 1, 4, 5, 2, 3, 6, 7]);
        // 2x4: the remaining y bit selects the lower or upper 2x2 square.
        let out = deswizzle(&linear(8), 2, 4, TileScheme::Morton);
        assert_eq!(out, vec![0, 1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn morton_padding_leaves_gaps_transparent() {
        // 3x3 is laid out as 4x4, so some positions fall outside the 9 stored pixels.
        let pixels: Vec<Color8888> = (0..9).map(|i| Color8888::grey(i as u8 + 1)).collect();
        let out = deswizzle(&pixels, 3, 3, TileScheme::Morton);
        assert_eq!(out[0], Color8888::grey(1));
        assert_eq!(out[4], Color8888::grey(4));
        // (2, 2) is stored at 12, outside the 9 stored pixels.
        assert_eq!(out[8], Color8888::TRANSPARENT);
    }

    #[rstest]
    #[case(2, 2)]
    #[case(4, 4)]
    fn morton_is_self_inverse_for_small_squares(#[case] width: u32, #[case] height: u32) {
        let data = linear((width * height) as usize);
        let once = deswizzle(&data, width, height, TileScheme::Morton);
        assert_eq!(deswizzle(&once, width, height, TileScheme::Morton), data);
    }

    #[rstest]
    #[case(8, 8, TileScheme::Morton)]
    #[case(16, 4, TileScheme::Morton)]
    #[case(2, 32, TileScheme::Morton)]
    #[case(7, 5, TileScheme::RowStripe { granularity: 2 })]
    #[case(16, 16, TileScheme::RowStripe { granularity: 8 })]
    #[case(5, 3, TileScheme::Linear)]
    fn swizzle_inverts_deswizzle(
        #[case] width: u32,
        #[case] height: u32,
        #[case] scheme: TileScheme,
    ) {
        let data = linear((width * height) as usize);
        let unswizzled = deswizzle(&data, width, height, scheme);
        assert_eq!(swizzle(&unswizzled, width, height, scheme), data);
        let swizzled = swizzle(&data, width, height, scheme);
        assert_eq!(deswizzle(&swizzled, width, height, scheme), data);
    }

    #[rstest]
    #[case(8, 8, 4)]
    #[case(7, 9, 2)]
    #[case(6, 6, 4)]
    #[case(3, 3, 1)]
    #[case(4, 4, 0)]
    fn row_stripe_is_an_involution(#[case] width: u32, #[case] height: u32, #[case] g: u32) {
        let scheme = TileScheme::RowStripe { granularity: g };
        let data = linear((width * height) as usize);
        let once = deswizzle(&data, width, height, scheme);
        assert_eq!(deswizzle(&once, width, height, scheme), data);
    }

    #[test]
    fn row_stripe_swaps_odd_bands_only() {
        let out = deswizzle(&linear(16), 4, 4, TileScheme::RowStripe { granularity: 2 });
        assert_eq!(&out[0..8], &[0, 1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(&out[8..12], &[10, 11, 8, 9]);
    }

    #[test]
    fn image_wrapper_keeps_dimensions() {
        let image = numbered_raster(4, 2);
        let out = deswizzle_image(&image, TileScheme::Morton);
        assert_eq!((out.width(), out.height()), (4, 2));
        assert_eq!(out.pixel(2, 0), image.pixel(0, 1));
        assert_eq!(deswizzle_image(&image, TileScheme::Linear), image);
    }
}
