//! # Decoded 4x4 Block
//!
//! [`Decoded4x4Block`] holds one decompressed tile of a block-compressed texture.
//!
//! Pixels are stored in row-major order:
//! ```text
//! [ 0] [ 1] [ 2] [ 3]
//! [ 4] [ 5] [ 6] [ 7]
//! [ 8] [ 9] [10] [11]
//! [12] [13] [14] [15]
//! ```
//!
//! Block decoders produce one of these per tile, then [`Decoded4x4Block::write_clipped`]
//! places it into the destination raster, dropping the pixels that fall outside of an image
//! whose dimensions are not a multiple of 4.

use crate::color_8888::Color8888;

/// Represents a decoded 4x4 block of BC pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoded4x4Block {
    /// The 16 pixels in the block (row-major order)
    /// (i.e. `pixels[0]` is top-left, `pixels[3]` is top-right, etc.)
    pub pixels: [Color8888; 16],
}

impl Default for Decoded4x4Block {
    fn default() -> Self {
        Self::new(Color8888::TRANSPARENT)
    }
}

impl Decoded4x4Block {
    /// Constructs a new decoded block initialised with 16 copies of the provided pixel.
    ///
    /// # Examples
    ///
    /// ```
    /// use texture_preview_common::color_8888::Color8888;
    /// use texture_preview_common::decoded_4x4_block::Decoded4x4Block;
    ///
    /// let pixel = Color8888::new(255, 0, 0, 255);
    /// let block = Decoded4x4Block::new(pixel);
    /// assert!(block.pixels.iter().all(|&p| p == pixel));
    /// ```
    pub fn new(pixel: Color8888) -> Self {
        Self {
            pixels: [pixel; 16],
        }
    }

    /// Gets a pixel at the specified coordinates (0-3, 0-3) without bounds checking
    ///
    /// # Safety
    ///
    /// The caller must ensure that `x < 4` and `y < 4`.
    #[inline]
    pub unsafe fn get_pixel_unchecked(&self, x: usize, y: usize) -> Color8888 {
        *self.pixels.get_unchecked(y * 4 + x)
    }

    /// Sets a pixel at the specified coordinates (0-3, 0-3) without bounds checking
    ///
    /// # Safety
    ///
    /// The caller must ensure that `x < 4` and `y < 4`.
    #[inline]
    pub unsafe fn set_pixel_unchecked(&mut self, x: usize, y: usize, pixel: Color8888) {
        *self.pixels.get_unchecked_mut(y * 4 + x) = pixel;
    }

    /// Checks if all pixels in the block have the same color values
    #[inline]
    pub fn has_identical_pixels(&self) -> bool {
        let first = self.pixels[0].to_u32();
        self.pixels.iter().all(|pixel| pixel.to_u32() == first)
    }

    /// Checks if all pixels in the block have the same alpha values
    #[inline]
    pub fn has_identical_alpha(&self) -> bool {
        let first_pixel_alpha = self.pixels[0].a;
        self.pixels.iter().all(|pixel| pixel.a == first_pixel_alpha)
    }

    /// Copies this block into a row-major `dest` of `width * height` pixels with its top-left
    /// corner at (`block_x * 4`, `block_y * 4`).
    ///
    /// Rows and columns beyond the image edge are skipped. Blocks lying entirely outside of
    /// the image write nothing.
    pub fn write_clipped(
        &self,
        dest: &mut [Color8888],
        width: usize,
        height: usize,
        block_x: usize,
        block_y: usize,
    ) {
        let origin_x = block_x * 4;
        let origin_y = block_y * 4;
        if origin_x >= width || origin_y >= height {
            return;
        }

        let cols = (width - origin_x).min(4);
        let rows = (height - origin_y).min(4);
        for row in 0..rows {
            let start = (origin_y + row) * width + origin_x;
            let Some(dest_row) = dest.get_mut(start..start + cols) else {
                return;
            };
            dest_row.copy_from_slice(&self.pixels[row * 4..row * 4 + cols]);
        }
    }
}
