//! Standalone Crunch (`.crn`) files.

use crate::container::ContainerContext;
use crate::traits::{FormatDecoder, FormatDetection};
use texture_preview_bc::{crunch::crunch_dimensions, CrunchVariant};
use texture_preview_common::{cursor::StreamCursor, raster::FrameChain, DecodeError, DecodeResult};
use texture_preview_pixels::{decode_pixels, DecodeContext, DecodeParams, PixelFormatDescriptor};

/// Handler for CRN files, whose header carries the dimensions.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrnDecoder;

impl FormatDetection for CrnDecoder {
    fn id(&self) -> &'static str {
        "crn"
    }

    fn description(&self) -> &'static str {
        "Crunch compressed texture"
    }

    fn supported_extensions(&self) -> &[&str] {
        &["crn"]
    }

    fn score(&self, cursor: &mut StreamCursor<'_>, _: &ContainerContext) -> DecodeResult<u32> {
        Ok(match crunch_dimensions(cursor.rest()) {
            Some(_) => 100,
            None => 0,
        })
    }
}

impl FormatDecoder for CrnDecoder {
    fn decode(
        &self,
        cursor: &mut StreamCursor<'_>,
        _: &ContainerContext,
        ctx: &mut DecodeContext,
    ) -> DecodeResult<FrameChain> {
        let variant = CrunchVariant::Crn;
        let (width, height) =
            crunch_dimensions(cursor.rest()).ok_or_else(|| DecodeError::Codec {
                format: variant.name(),
                detail: "failed to read CRN header".into(),
            })?;
        let descriptor = PixelFormatDescriptor::crunched(variant);
        decode_pixels(&descriptor, cursor, DecodeParams::new(width, height), ctx)
            .map(FrameChain::single)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    #[test]
    fn garbage_is_not_crn() {
        let data = [0u8, 1, 2, 3, 4, 5, 6, 7];
        let ctx = ContainerContext::from_name("a.crn");
        assert_eq!(CrnDecoder.score(&mut StreamCursor::new(&data), &ctx), Ok(0));
        let err = CrnDecoder
            .decode(&mut StreamCursor::new(&data), &ctx, &mut DecodeContext::new())
            .unwrap_err();
        assert!(matches!(err, DecodeError::Codec { .. }));
    }
}
