//! Trait for decoding an identified input.

use crate::container::ContainerContext;
use crate::traits::FormatDetection;
use texture_preview_common::{cursor::StreamCursor, raster::FrameChain, DecodeResult};
use texture_preview_pixels::DecodeContext;

/// Decoding for a format that [`FormatDetection`] can recognise.
pub trait FormatDecoder: FormatDetection {
    /// Decodes every frame of the entry under `cursor`.
    ///
    /// Header values are validated before any buffer is sized. Palettes and allocation
    /// limits come from `ctx`; out of band geometry comes from `container`.
    fn decode(
        &self,
        cursor: &mut StreamCursor<'_>,
        container: &ContainerContext,
        ctx: &mut DecodeContext,
    ) -> DecodeResult<FrameChain>;
}
