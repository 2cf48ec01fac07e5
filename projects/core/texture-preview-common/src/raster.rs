//! Canonical decode output: an RGBA raster and a chain of sibling frames.

use crate::color_8888::Color8888;
use crate::error::DecodeResult;
use crate::validate::DecodeLimits;
use alloc::vec;
use alloc::vec::Vec;

/// A decoded image in canonical 32-bit RGBA.
///
/// Always holds exactly `width * height` pixels in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    pixels: Vec<Color8888>,
}

impl RasterImage {
    /// Allocates a transparent image after checking the dimensions against `limits`.
    pub fn new(
        format: &'static str,
        width: u32,
        height: u32,
        limits: &DecodeLimits,
    ) -> DecodeResult<Self> {
        let count = limits.ensure_dimensions(format, width, height)?;
        Ok(Self {
            width,
            height,
            pixels: vec![Color8888::TRANSPARENT; count],
        })
    }

    /// Wraps existing pixels. Returns [`None`] if the pixel count does not match the
    /// dimensions or either dimension is zero.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Color8888>) -> Option<Self> {
        if width == 0 || height == 0 || pixels.len() as u64 != width as u64 * height as u64 {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixels in row-major order.
    #[inline]
    pub fn pixels(&self) -> &[Color8888] {
        &self.pixels
    }

    /// Mutable pixels in row-major order. The length cannot be changed through this.
    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [Color8888] {
        &mut self.pixels
    }

    /// Pixel at (`x`, `y`), if inside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color8888> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Flattens into `[r, g, b, a]` bytes, e.g. for handing to an image encoder.
    pub fn into_rgba_bytes(self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * 4);
        for pixel in self.pixels {
            out.extend_from_slice(&[pixel.r, pixel.g, pixel.b, pixel.a]);
        }
        out
    }
}

/// Ordered sibling frames, e.g. the levels of a mipmap chain or animation frames.
///
/// Frames are linked by index only; moving between them goes through [`Self::next`] and
/// [`Self::previous`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameChain {
    frames: Vec<RasterImage>,
}

impl FrameChain {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a chain holding a single frame.
    pub fn single(frame: RasterImage) -> Self {
        Self {
            frames: vec![frame],
        }
    }

    /// Appends a frame at the end of the chain.
    pub fn push(&mut self, frame: RasterImage) {
        self.frames.push(frame);
    }

    /// Number of frames.
    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the chain holds no frames.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frame at `index`.
    pub fn get(&self, index: usize) -> Option<&RasterImage> {
        self.frames.get(index)
    }

    /// The first frame, typically the full resolution image.
    pub fn first(&self) -> Option<&RasterImage> {
        self.frames.first()
    }

    /// Index of the frame after `index`, if any.
    pub fn next(&self, index: usize) -> Option<usize> {
        let next = index.checked_add(1)?;
        (next < self.frames.len()).then_some(next)
    }

    /// Index of the frame before `index`, if any.
    pub fn previous(&self, index: usize) -> Option<usize> {
        if index >= self.frames.len() {
            return None;
        }
        index.checked_sub(1)
    }

    /// Iterates frames in order.
    pub fn iter(&self) -> core::slice::Iter<'_, RasterImage> {
        self.frames.iter()
    }

    /// Consumes the chain, returning its frames.
    pub fn into_frames(self) -> Vec<RasterImage> {
        self.frames
    }
}

impl<'a> IntoIterator for &'a FrameChain {
    type Item = &'a RasterImage;
    type IntoIter = core::slice::Iter<'a, RasterImage>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}
