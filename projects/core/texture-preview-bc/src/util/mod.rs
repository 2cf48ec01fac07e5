//! Per-block decoders. Each turns one compressed block into a [`Decoded4x4Block`].
//!
//! [`Decoded4x4Block`]: texture_preview_common::decoded_4x4_block::Decoded4x4Block

mod bc1_decode;
mod bc2_decode;
mod bc3_decode;
mod bc4_decode;
mod bc5_decode;
mod bc7_decode;
mod bc7_tables;

pub use bc1_decode::*;
pub use bc2_decode::*;
pub use bc3_decode::*;
pub use bc4_decode::*;
pub use bc5_decode::*;
pub use bc7_decode::*;
