//! Raw pixel data whose geometry and format come from the container's property bag.
//!
//! Archives that keep texture headers in their own index (rather than in the entry) set
//! [`WIDTH`], [`HEIGHT`] and [`IMAGE_FORMAT`] on the entry; this handler decodes the bytes
//! as-is with that information.

use crate::container::{ContainerContext, ResourceProperties, HEIGHT, IMAGE_FORMAT, PALETTE_ID, WIDTH};
use crate::traits::{FormatDecoder, FormatDetection};
use texture_preview_bc::{BlockFormat, CrunchVariant};
use texture_preview_common::{cursor::StreamCursor, raster::FrameChain, DecodeError, DecodeResult};
use texture_preview_pixels::{
    descriptor::{IndexLayout, PackedLayout},
    decode_pixels, DecodeContext, DecodeParams, PixelFormatDescriptor,
};

const FORMAT: &str = "raw";

/// Base score when the properties describe a decodable image.
const PROPERTY_SCORE: u32 = 10;

/// Resolves an [`IMAGE_FORMAT`] value to a pixel format.
///
/// Accepts block format names (`BC1`..`BC7`, plus `DXT1`, `DXT3` and `DXT5`), packed
/// layout names, `I1`, `I2`, `I4` and `I8` for palette indices and `CRN` or `UNITY CRN`
/// for crunched data. Matching is case insensitive.
pub fn descriptor_by_name(name: &str) -> Option<PixelFormatDescriptor> {
    let name = name.trim();
    if let Some(format) = BlockFormat::all_values()
        .iter()
        .find(|format| format.name().eq_ignore_ascii_case(name))
    {
        return Some(PixelFormatDescriptor::block(*format));
    }

    let alias = |alias: &str| alias.eq_ignore_ascii_case(name);
    if alias("DXT1") {
        return Some(PixelFormatDescriptor::block(BlockFormat::Bc1));
    }
    if alias("DXT3") {
        return Some(PixelFormatDescriptor::block(BlockFormat::Bc2));
    }
    if alias("DXT5") {
        return Some(PixelFormatDescriptor::block(BlockFormat::Bc3));
    }
    if alias("CRN") {
        return Some(PixelFormatDescriptor::crunched(CrunchVariant::Crn));
    }
    if alias("UNITY CRN") {
        return Some(PixelFormatDescriptor::crunched(CrunchVariant::UnityCrn));
    }

    if let Some(layout) = PackedLayout::by_name(name) {
        return Some(PixelFormatDescriptor::packed(layout));
    }

    let indices = [
        ("I1", IndexLayout::INDEX1),
        ("I2", IndexLayout::INDEX2),
        ("I4", IndexLayout::INDEX4),
        ("I8", IndexLayout::INDEX8),
    ];
    indices
        .into_iter()
        .find(|(index_name, _)| alias(index_name))
        .map(|(index_name, layout)| PixelFormatDescriptor::paletted(index_name, layout))
}

/// Geometry and format read from a property bag.
struct RawImage {
    width: u32,
    height: u32,
    descriptor: PixelFormatDescriptor,
}

impl RawImage {
    fn from_properties(properties: &ResourceProperties) -> DecodeResult<Self> {
        let width = required_u32(properties, WIDTH)?;
        let height = required_u32(properties, HEIGHT)?;
        let descriptor = properties
            .get_text(IMAGE_FORMAT)
            .and_then(descriptor_by_name)
            .ok_or(DecodeError::InvalidField {
                format: FORMAT,
                field: IMAGE_FORMAT,
                value: 0,
            })?;
        Ok(Self {
            width,
            height,
            descriptor,
        })
    }
}

fn required_u32(properties: &ResourceProperties, key: &'static str) -> DecodeResult<u32> {
    match properties.get_int(key) {
        Some(value) => u32::try_from(value).map_err(|_| DecodeError::InvalidField {
            format: FORMAT,
            field: key,
            value: value as u64,
        }),
        None => Err(DecodeError::InvalidField {
            format: FORMAT,
            field: key,
            value: 0,
        }),
    }
}

/// Fallback handler for headerless pixel data described by the container.
///
/// Registered last so any handler that recognises the bytes themselves wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct PropertyBagDecoder;

impl FormatDetection for PropertyBagDecoder {
    fn id(&self) -> &'static str {
        "raw"
    }

    fn description(&self) -> &'static str {
        "Raw pixels described by container properties"
    }

    fn score(&self, cursor: &mut StreamCursor<'_>, container: &ContainerContext) -> DecodeResult<u32> {
        let Ok(image) = RawImage::from_properties(container.properties()) else {
            return Ok(0);
        };
        if image.width == 0 || image.height == 0 {
            return Ok(0);
        }
        match image.descriptor.data_size(image.width, image.height) {
            Some(size) if size > cursor.remaining() as u64 => Ok(0),
            Some(_) => Ok(PROPERTY_SCORE + 5),
            None => Ok(PROPERTY_SCORE),
        }
    }
}

impl FormatDecoder for PropertyBagDecoder {
    fn decode(
        &self,
        cursor: &mut StreamCursor<'_>,
        container: &ContainerContext,
        ctx: &mut DecodeContext,
    ) -> DecodeResult<FrameChain> {
        let properties = container.properties();
        let image = RawImage::from_properties(properties)?;
        let mut params = DecodeParams::new(image.width, image.height);
        if let Some(palette_id) = properties
            .get_int(PALETTE_ID)
            .and_then(|id| usize::try_from(id).ok())
        {
            params = params.with_palette_id(palette_id);
        }
        decode_pixels(&image.descriptor, cursor, params, ctx).map(FrameChain::single)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;
    use texture_preview_pixels::palette::Palette;
    use texture_preview_pixels::PixelFamily;

    fn container(width: i64, height: i64, format: &str) -> ContainerContext {
        let mut properties = ResourceProperties::new();
        properties
            .set_int(WIDTH, width)
            .set_int(HEIGHT, height)
            .set_text(IMAGE_FORMAT, format);
        ContainerContext::from_name("entry.bin").with_properties(properties)
    }

    #[rstest]
    #[case("BC1", Some(PixelFamily::Block(BlockFormat::Bc1)))]
    #[case("dxt5", Some(PixelFamily::Block(BlockFormat::Bc3)))]
    #[case("bgra8888", Some(PixelFamily::Packed(PackedLayout::BGRA8888)))]
    #[case("I4", Some(PixelFamily::Paletted(IndexLayout::INDEX4)))]
    #[case("Unity CRN", Some(PixelFamily::Crunched(CrunchVariant::UnityCrn)))]
    #[case("PNG", None)]
    fn resolves_format_names(#[case] name: &str, #[case] expected: Option<PixelFamily>) {
        assert_eq!(descriptor_by_name(name).map(|d| d.family), expected);
    }

    #[rstest]
    #[case(container(2, 2, "L8"), 4, PROPERTY_SCORE + 5)]
    #[case(container(2, 2, "L8"), 3, 0)]
    #[case(container(2, 2, "CRN"), 3, PROPERTY_SCORE)]
    #[case(container(0, 2, "L8"), 4, 0)]
    #[case(container(-1, 2, "L8"), 4, 0)]
    #[case(container(2, 2, "nope"), 4, 0)]
    #[case(ContainerContext::from_name("entry.bin"), 4, 0)]
    fn scoring(#[case] ctx: ContainerContext, #[case] len: usize, #[case] expected: u32) {
        let data = vec![0u8; len];
        let score = PropertyBagDecoder.score(&mut StreamCursor::new(&data), &ctx);
        assert_eq!(score, Ok(expected));
    }

    #[test]
    fn decodes_with_selected_palette() {
        let mut ctx = DecodeContext::new();
        ctx.palettes_mut()
            .add_palette(Palette::new(vec![Color8888::grey(1); 2]).unwrap());
        ctx.palettes_mut()
            .add_palette(Palette::new(vec![Color8888::grey(5), Color8888::grey(6)]).unwrap());

        let mut container = container(2, 1, "I8");
        container.properties_mut().set_int(PALETTE_ID, 1);
        let frames = PropertyBagDecoder
            .decode(&mut StreamCursor::new(&[1, 0]), &container, &mut ctx)
            .unwrap();
        assert_eq!(
            frames.first().unwrap().pixels(),
            &[Color8888::grey(6), Color8888::grey(5)]
        );
    }

    #[test]
    fn missing_properties_fail_decode() {
        let err = PropertyBagDecoder
            .decode(
                &mut StreamCursor::new(&[0; 4]),
                &ContainerContext::new(),
                &mut DecodeContext::new(),
            )
            .unwrap_err();
        assert!(matches!(err, DecodeError::InvalidField { field: WIDTH, .. }));
    }
}
