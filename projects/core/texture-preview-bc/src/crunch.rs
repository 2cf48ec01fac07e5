//! Crunch (CRN) pre-stage. Entropy decoding is delegated to `texture2ddecoder`, which
//! hands back decoded pixels directly. Without the `crunch` feature only
//! [`CrunchVariant`] is available.

#[cfg(feature = "crunch")]
use alloc::{format, vec};
#[cfg(feature = "crunch")]
use texture2ddecoder::CrnTextureInfo;
#[cfg(feature = "crunch")]
use texture_preview_common::{
    color_8888::Color8888, raster::RasterImage, validate::DecodeLimits, DecodeError,
    DecodeResult,
};

/// Flavour of Crunch container.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CrunchVariant {
    /// Original Crunch library format
    Crn,
    /// Unity's fork of Crunch, as stored in Unity asset bundles
    UnityCrn,
}

impl CrunchVariant {
    /// Short human readable name.
    pub const fn name(self) -> &'static str {
        match self {
            CrunchVariant::Crn => "CRN",
            CrunchVariant::UnityCrn => "Unity CRN",
        }
    }
}

/// Reads the dimensions stored in a CRN header, if `data` has one.
#[cfg(feature = "crunch")]
pub fn crunch_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    let mut info = CrnTextureInfo::default();
    let len = u32::try_from(data.len()).ok()?;
    info.crnd_get_texture_info(data, len)
        .then_some((info.width, info.height))
}

/// Decodes crunched `data` to a `width` x `height` raster.
#[cfg(feature = "crunch")]
pub fn decode_crunched(
    data: &[u8],
    variant: CrunchVariant,
    width: u32,
    height: u32,
    limits: &DecodeLimits,
) -> DecodeResult<RasterImage> {
    let count = limits.ensure_dimensions(variant.name(), width, height)?;
    if variant == CrunchVariant::Crn && crunch_dimensions(data).is_none() {
        return Err(DecodeError::Codec {
            format: variant.name(),
            detail: "failed to read CRN header".into(),
        });
    }
    let mut bgra = vec![0u32; count];

    let result = match variant {
        CrunchVariant::Crn => {
            texture2ddecoder::decode_crunch(data, width as usize, height as usize, &mut bgra)
        }
        CrunchVariant::UnityCrn => {
            texture2ddecoder::decode_unity_crunch(data, width as usize, height as usize, &mut bgra)
        }
    };
    result.map_err(|detail| DecodeError::Codec {
        format: variant.name(),
        detail: format!("{detail}"),
    })?;

    let pixels = bgra.into_iter().map(bgra_to_color).collect();
    RasterImage::from_pixels(width, height, pixels).ok_or(DecodeError::InvalidDimensions {
        format: variant.name(),
        width,
        height,
    })
}

/// texture2ddecoder outputs `0xAARRGGBB`, i.e. `[b, g, r, a]` in little endian memory order.
#[cfg(feature = "crunch")]
#[inline]
fn bgra_to_color(pixel: u32) -> Color8888 {
    let [b, g, r, a] = pixel.to_le_bytes();
    Color8888::new(r, g, b, a)
}
