//! Common test imports and utilities for pixel engine tests
#![allow(unused_imports)]

pub use alloc::{boxed::Box, format, string::String, vec, vec::Vec};

pub use rstest::rstest;
pub use texture_preview_common::{
    color_8888::Color8888, cursor::StreamCursor, raster::RasterImage, validate::DecodeLimits,
    DecodeError,
};

/// Builds a raster from a row-major list of pixels.
pub(crate) fn raster(width: u32, height: u32, pixels: &[Color8888]) -> RasterImage {
    RasterImage::from_pixels(width, height, pixels.to_vec()).unwrap()
}

/// A raster whose pixel `i` encodes `i` in its red and green channels, for tracking moves.
pub(crate) fn numbered_raster(width: u32, height: u32) -> RasterImage {
    let pixels: Vec<Color8888> = (0..width * height)
        .map(|i| Color8888::new(i as u8, (i >> 8) as u8, 0, 255))
        .collect();
    raster(width, height, &pixels)
}
