#![doc = include_str!(concat!("../", core::env!("CARGO_PKG_README")))]
#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

pub mod context;
pub mod decode;
pub mod descriptor;
pub mod mipmap;
pub mod packed;
pub mod palette;
pub mod paletted;
pub mod swizzle;
pub mod transform;

pub use context::{DecodeContext, PaletteSource};
pub use decode::{decode_mip_chain, decode_pixels, DecodeParams};
pub use descriptor::{PixelFamily, PixelFormatDescriptor};

#[cfg(test)]
mod test_prelude;
