use super::constants::*;
use super::parse_dds::{parse_dds, DdsHeader};
use crate::container::ContainerContext;
use crate::traits::{FormatDecoder, FormatDetection};
use alloc::vec::Vec;
use texture_preview_bc::BlockFormat;
use texture_preview_common::{
    cursor::StreamCursor,
    raster::FrameChain,
    validate::{ensure_within_stream, is_valid_dimension, is_within_stream, DEFAULT_MAX_DIMENSION},
    DecodeError, DecodeResult,
};
use texture_preview_pixels::{
    decode_mip_chain,
    descriptor::{ChannelField, PackedLayout},
    mipmap::{mip_levels, MipLevel},
    DecodeContext, PixelFormatDescriptor,
};

const FORMAT: &str = "DDS";

/// B8G8R8X8: BGRA8888 with the alpha byte ignored.
const BGRX8888: PackedLayout = PackedLayout {
    name: "BGRX8888",
    alpha: ChannelField::ABSENT,
    ..PackedLayout::BGRA8888
};

/// Handler for DirectDraw Surface files.
#[derive(Debug, Clone, Copy, Default)]
pub struct DdsDecoder;

impl FormatDetection for DdsDecoder {
    fn id(&self) -> &'static str {
        "dds"
    }

    fn description(&self) -> &'static str {
        "DirectDraw Surface"
    }

    fn supported_extensions(&self) -> &[&str] {
        &["dds"]
    }

    fn score(&self, cursor: &mut StreamCursor<'_>, _: &ContainerContext) -> DecodeResult<u32> {
        let Some(header) = parse_dds(cursor.data()) else {
            return Ok(0);
        };

        let mut score = 100;
        if header.header_size == DDS_HEADER_STRUCT_SIZE {
            score += 10;
        }
        if is_valid_dimension(header.width, DEFAULT_MAX_DIMENSION)
            && is_valid_dimension(header.height, DEFAULT_MAX_DIMENSION)
        {
            score += 10;
        }
        let fits = resolve_format(&header)
            .ok()
            .and_then(|descriptor| descriptor.data_size(header.width, header.height))
            .is_some_and(|size| {
                is_within_stream(header.data_offset() as u64, size, cursor.len() as u64)
            });
        if fits {
            score += 5;
        }
        Ok(score)
    }
}

impl FormatDecoder for DdsDecoder {
    fn decode(
        &self,
        cursor: &mut StreamCursor<'_>,
        _: &ContainerContext,
        ctx: &mut DecodeContext,
    ) -> DecodeResult<FrameChain> {
        let data = cursor.rest();
        let header = parse_dds(data).ok_or(DecodeError::TruncatedStream {
            offset: cursor.offset(),
            needed: DDS_HEADER_SIZE,
            available: data.len(),
        })?;
        let descriptor = resolve_format(&header)?;
        ctx.limits()
            .ensure_dimensions(FORMAT, header.width, header.height)?;

        let base = cursor.offset() + header.data_offset();
        let levels = stored_levels(&header, &descriptor, base, cursor.len())?;
        decode_mip_chain(&descriptor, cursor, base, &levels, None, ctx)
    }
}

/// Mip levels that are fully present in the stream. The top level is always included so
/// a truncated file reports the truncation.
fn stored_levels(
    header: &DdsHeader,
    descriptor: &PixelFormatDescriptor,
    base: usize,
    stream_len: usize,
) -> DecodeResult<Vec<MipLevel>> {
    let size = |width, height| descriptor.data_size(width, height).unwrap_or(u64::MAX);
    let mut levels = mip_levels(header.width, header.height, header.mipmap_count(), size)?;

    let top = levels.first().copied();
    levels.retain(|level| {
        is_within_stream(base as u64 + level.offset, level.len, stream_len as u64)
    });
    if levels.is_empty() {
        if let Some(top) = top {
            ensure_within_stream(base as u64, top.len, stream_len as u64)?;
        }
    }
    Ok(levels)
}

/// Maps the header's pixel format to a descriptor.
pub fn resolve_format(header: &DdsHeader) -> DecodeResult<PixelFormatDescriptor> {
    if let Some(dxgi_format) = header.dxgi_format {
        return resolve_dxgi_format(dxgi_format);
    }

    if (header.pixel_flags & DDPF_FOURCC) != 0 {
        let format = match header.fourcc {
            FOURCC_DXT1 => BlockFormat::Bc1,
            FOURCC_DXT2 | FOURCC_DXT3 => BlockFormat::Bc2,
            FOURCC_DXT4 | FOURCC_DXT5 => BlockFormat::Bc3,
            FOURCC_ATI1 | FOURCC_BC4U => BlockFormat::Bc4,
            FOURCC_ATI2 | FOURCC_BC5U => BlockFormat::Bc5,
            code => {
                return Err(DecodeError::UnsupportedVariant {
                    format: FORMAT,
                    code,
                })
            }
        };
        return Ok(PixelFormatDescriptor::block(format));
    }

    if (header.pixel_flags & (DDPF_RGB | DDPF_LUMINANCE | DDPF_ALPHA)) != 0 {
        return resolve_masked_format(header).map(PixelFormatDescriptor::packed);
    }

    Err(DecodeError::InvalidField {
        format: FORMAT,
        field: "pixel format flags",
        value: header.pixel_flags as u64,
    })
}

fn resolve_dxgi_format(dxgi_format: u32) -> DecodeResult<PixelFormatDescriptor> {
    let descriptor = match dxgi_format {
        DXGI_FORMAT_BC1_TYPELESS | DXGI_FORMAT_BC1_UNORM | DXGI_FORMAT_BC1_UNORM_SRGB => {
            PixelFormatDescriptor::block(BlockFormat::Bc1)
        }
        DXGI_FORMAT_BC2_TYPELESS | DXGI_FORMAT_BC2_UNORM | DXGI_FORMAT_BC2_UNORM_SRGB => {
            PixelFormatDescriptor::block(BlockFormat::Bc2)
        }
        DXGI_FORMAT_BC3_TYPELESS | DXGI_FORMAT_BC3_UNORM | DXGI_FORMAT_BC3_UNORM_SRGB => {
            PixelFormatDescriptor::block(BlockFormat::Bc3)
        }
        DXGI_FORMAT_BC4_TYPELESS | DXGI_FORMAT_BC4_UNORM => {
            PixelFormatDescriptor::block(BlockFormat::Bc4)
        }
        DXGI_FORMAT_BC5_TYPELESS | DXGI_FORMAT_BC5_UNORM => {
            PixelFormatDescriptor::block(BlockFormat::Bc5)
        }
        DXGI_FORMAT_BC7_TYPELESS | DXGI_FORMAT_BC7_UNORM | DXGI_FORMAT_BC7_UNORM_SRGB => {
            PixelFormatDescriptor::block(BlockFormat::Bc7)
        }
        DXGI_FORMAT_R8G8B8A8_TYPELESS
        | DXGI_FORMAT_R8G8B8A8_UNORM
        | DXGI_FORMAT_R8G8B8A8_UNORM_SRGB => PixelFormatDescriptor::packed(PackedLayout::RGBA8888),
        DXGI_FORMAT_B8G8R8A8_UNORM
        | DXGI_FORMAT_B8G8R8A8_TYPELESS
        | DXGI_FORMAT_B8G8R8A8_UNORM_SRGB => PixelFormatDescriptor::packed(PackedLayout::BGRA8888),
        DXGI_FORMAT_B8G8R8X8_UNORM => PixelFormatDescriptor::packed(BGRX8888),
        DXGI_FORMAT_B5G6R5_UNORM => PixelFormatDescriptor::packed(PackedLayout::RGB565),
        DXGI_FORMAT_B5G5R5A1_UNORM => PixelFormatDescriptor::packed(PackedLayout::ARGB1555),
        DXGI_FORMAT_B4G4R4A4_UNORM => PixelFormatDescriptor::packed(PackedLayout::ARGB4444),
        DXGI_FORMAT_A8_UNORM => PixelFormatDescriptor::packed(PackedLayout::A8),
        // BC6H (HDR) and everything else is recognised but not decoded.
        code => {
            return Err(DecodeError::UnsupportedVariant {
                format: FORMAT,
                code,
            })
        }
    };
    Ok(descriptor)
}

/// Builds a packed layout from the bit masks of an uncompressed legacy header, reusing
/// the name of a built-in layout when the fields match one.
fn resolve_masked_format(header: &DdsHeader) -> DecodeResult<PackedLayout> {
    let bytes_per_pixel = match header.rgb_bit_count {
        8 => 1,
        16 => 2,
        24 => 3,
        32 => 4,
        bits => {
            return Err(DecodeError::InvalidField {
                format: FORMAT,
                field: "rgb bit count",
                value: bits as u64,
            })
        }
    };

    let [r_mask, g_mask, b_mask, a_mask] = header.masks;
    let alpha = if (header.pixel_flags & (DDPF_ALPHAPIXELS | DDPF_ALPHA)) != 0 {
        field_from_mask(a_mask)
    } else {
        ChannelField::ABSENT
    };
    let (red, green, blue) = if (header.pixel_flags & DDPF_LUMINANCE) != 0 {
        let luminance = field_from_mask(r_mask);
        (luminance, luminance, luminance)
    } else if (header.pixel_flags & DDPF_RGB) != 0 {
        (
            field_from_mask(r_mask),
            field_from_mask(g_mask),
            field_from_mask(b_mask),
        )
    } else {
        (ChannelField::ABSENT, ChannelField::ABSENT, ChannelField::ABSENT)
    };

    let layout = PackedLayout {
        name: "DDS masked",
        bytes_per_pixel,
        red,
        green,
        blue,
        alpha,
        ..PackedLayout::RGBA8888
    };
    let known = PackedLayout::ALL.into_iter().find(|candidate| {
        candidate.bytes_per_pixel == layout.bytes_per_pixel
            && candidate.red == layout.red
            && candidate.green == layout.green
            && candidate.blue == layout.blue
            && candidate.alpha == layout.alpha
    });
    Ok(known.unwrap_or(layout))
}

/// A contiguous bit mask as a channel field.
fn field_from_mask(mask: u32) -> ChannelField {
    if mask == 0 {
        return ChannelField::ABSENT;
    }
    ChannelField::new(mask.trailing_zeros() as u8, mask.count_ones() as u8)
}
