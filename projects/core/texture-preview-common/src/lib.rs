#![doc = include_str!(concat!("../", core::env!("CARGO_PKG_README")))]
#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

pub mod color_565;
pub mod color_8888;
pub mod cursor;
pub mod decoded_4x4_block;
pub mod error;
pub mod raster;
pub mod validate;

pub use error::{DecodeError, DecodeResult};

#[cfg(test)]
mod test_prelude;
