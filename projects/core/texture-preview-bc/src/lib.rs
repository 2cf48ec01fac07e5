#![doc = include_str!(concat!("../", core::env!("CARGO_PKG_README")))]
#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

pub mod crunch;
pub mod surface;
pub mod util;

pub use crunch::CrunchVariant;
pub use surface::{decode_block_surface, BlockFormat};

#[cfg(test)]
mod test_prelude;
