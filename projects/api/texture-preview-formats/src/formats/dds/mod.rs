//! DirectDraw Surface (`.dds`) textures: legacy FOURCC and bit mask headers plus the DX10
//! extension header.

pub(crate) mod constants;
mod decoder;
mod parse_dds;

pub use decoder::*;
pub use parse_dds::*;
