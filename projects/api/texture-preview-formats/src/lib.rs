#![doc = include_str!(concat!("../", core::env!("CARGO_PKG_README")))]
#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

pub mod container;
pub mod formats;
pub mod preview;
pub mod registry;
pub mod traits;

pub use container::{ContainerContext, PropertyValue, ResourceProperties};
pub use preview::{preview, Preview};
pub use registry::{FormatCandidate, FormatRegistry};
pub use traits::{FormatDecoder, FormatDetection};

#[cfg(test)]
mod test_prelude;
