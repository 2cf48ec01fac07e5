//! Common test imports and utilities for format handler tests
//!
//! Builders here produce minimal but well formed files so tests can focus on the one
//! header field they exercise.
#![allow(unused_imports)]

pub use alloc::{
    boxed::Box,
    format,
    string::{String, ToString},
    vec,
    vec::Vec,
};

pub use rstest::rstest;
pub use texture_preview_common::{
    color_8888::Color8888, cursor::StreamCursor, raster::FrameChain, raster::RasterImage,
    validate::DecodeLimits, DecodeError, DecodeResult,
};
pub use texture_preview_pixels::DecodeContext;

pub use crate::container::{ContainerContext, ResourceProperties};
pub(crate) use crate::formats::dds::constants::*;
pub use crate::traits::{FormatDecoder, FormatDetection};

use crate::formats::dds::{parse_dds, resolve_format};
use endian_writer::{EndianWriter, LittleEndianWriter};
use texture_preview_pixels::mipmap::mip_levels;

pub(crate) const DXGI_FORMAT_BC6H_UF16: u32 = 95;
pub(crate) const DXGI_FORMAT_BC6H_SF16: u32 = 96;

// DDS header flags that decoding ignores
pub(crate) const DDSD_CAPS: u32 = 0x1;
pub(crate) const DDSD_HEIGHT: u32 = 0x2;
pub(crate) const DDSD_WIDTH: u32 = 0x4;
pub(crate) const DDSD_PIXELFORMAT: u32 = 0x1000;
pub(crate) const DDSD_LINEARSIZE: u32 = 0x80000;

// R8G8B8A8_UNORM: R=byte0, G=byte1, B=byte2, A=byte3 (0xAABBGGRR)
pub(crate) const RGBA8888_RED_MASK: u32 = 0x000000FF;
pub(crate) const RGBA8888_GREEN_MASK: u32 = 0x0000FF00;
pub(crate) const RGBA8888_BLUE_MASK: u32 = 0x00FF0000;
pub(crate) const RGBA8888_ALPHA_MASK: u32 = 0xFF000000;

// B8G8R8A8_UNORM: R=byte2, G=byte1, B=byte0, A=byte3 (0xAARRGGBB)
pub(crate) const BGRA8888_RED_MASK: u32 = 0x00FF0000;
pub(crate) const BGRA8888_GREEN_MASK: u32 = 0x0000FF00;
pub(crate) const BGRA8888_BLUE_MASK: u32 = 0x000000FF;
pub(crate) const BGRA8888_ALPHA_MASK: u32 = 0xFF000000;

/// Total size of DDS header + DX10 header (used in tests)
pub const DDS_DX10_TOTAL_HEADER_SIZE: usize = DDS_HEADER_SIZE + DX10_HEADER_SIZE;

/// Writes a little endian `value` at `offset`.
pub fn write_u32(data: &mut [u8], offset: usize, value: u32) {
    assert!(offset + 4 <= data.len());
    // SAFETY: Bounds checked above.
    unsafe {
        let mut writer = LittleEndianWriter::new(data.as_mut_ptr());
        writer.write_u32_at(value, offset as isize);
    }
}

/// Writes a little endian `value` at `offset`.
pub fn write_u16(data: &mut [u8], offset: usize, value: u16) {
    assert!(offset + 2 <= data.len());
    // SAFETY: Bounds checked above.
    unsafe {
        let mut writer = LittleEndianWriter::new(data.as_mut_ptr());
        writer.write_u16_at(value, offset as isize);
    }
}

enum DdsPixelFormat {
    FourCc([u8; 4]),
    Dxgi(u32),
    Masked {
        bit_count: u32,
        flags: u32,
        masks: [u32; 4],
    },
}

/// Builds DDS files whose payload is sized from the header.
pub struct DdsBuilder {
    format: DdsPixelFormat,
    width: u32,
    height: u32,
    mipmaps: u32,
    fill: Vec<u8>,
}

impl DdsBuilder {
    fn new(format: DdsPixelFormat, width: u32, height: u32) -> Self {
        Self {
            format,
            width,
            height,
            mipmaps: 1,
            fill: vec![0],
        }
    }

    /// A legacy header with a FOURCC pixel format.
    pub fn fourcc(fourcc: [u8; 4], width: u32, height: u32) -> Self {
        Self::new(DdsPixelFormat::FourCc(fourcc), width, height)
    }

    /// A DX10 extension header with a DXGI format.
    pub fn dxgi(dxgi_format: u32, width: u32, height: u32) -> Self {
        Self::new(DdsPixelFormat::Dxgi(dxgi_format), width, height)
    }

    /// A legacy header describing uncompressed pixels by bit masks.
    pub fn masked(bit_count: u32, flags: u32, masks: [u32; 4], width: u32, height: u32) -> Self {
        Self::new(
            DdsPixelFormat::Masked {
                bit_count,
                flags,
                masks,
            },
            width,
            height,
        )
    }

    /// Number of mip levels stored.
    pub fn mipmaps(mut self, count: u32) -> Self {
        self.mipmaps = count;
        self
    }

    /// Fills the payload by repeating `pattern`.
    pub fn fill_blocks(mut self, pattern: &[u8]) -> Self {
        self.fill = pattern.to_vec();
        self
    }

    /// Header plus a payload large enough for every level, when the format is known.
    pub fn build(self) -> Vec<u8> {
        let is_dx10 = matches!(self.format, DdsPixelFormat::Dxgi(_));
        let header_size = if is_dx10 {
            DDS_DX10_TOTAL_HEADER_SIZE
        } else {
            DDS_HEADER_SIZE
        };
        let mut data = vec![0u8; header_size];

        let mut flags = DDSD_CAPS | DDSD_HEIGHT | DDSD_WIDTH | DDSD_PIXELFORMAT | DDSD_LINEARSIZE;
        if self.mipmaps > 1 {
            flags |= DDSD_MIPMAPCOUNT;
            write_u32(&mut data, DDS_MIPMAP_COUNT_OFFSET, self.mipmaps);
        }
        write_u32(&mut data, 0, DDS_MAGIC);
        write_u32(&mut data, DDS_SIZE_OFFSET, DDS_HEADER_STRUCT_SIZE);
        write_u32(&mut data, DDS_FLAGS_OFFSET, flags);
        write_u32(&mut data, DDS_HEIGHT_OFFSET, self.height);
        write_u32(&mut data, DDS_WIDTH_OFFSET, self.width);

        match self.format {
            DdsPixelFormat::FourCc(fourcc) => {
                write_u32(&mut data, DDS_PIXELFORMAT_FLAGS_OFFSET, DDPF_FOURCC);
                data[FOURCC_OFFSET..FOURCC_OFFSET + 4].copy_from_slice(&fourcc);
            }
            DdsPixelFormat::Dxgi(dxgi_format) => {
                write_u32(&mut data, DDS_PIXELFORMAT_FLAGS_OFFSET, DDPF_FOURCC);
                write_u32(&mut data, FOURCC_OFFSET, FOURCC_DX10);
                write_u32(&mut data, DX10_FORMAT_OFFSET, dxgi_format);
            }
            DdsPixelFormat::Masked {
                bit_count,
                flags,
                masks,
            } => {
                write_u32(&mut data, DDS_PIXELFORMAT_FLAGS_OFFSET, flags);
                write_u32(&mut data, DDS_PIXELFORMAT_RGBBITCOUNT_OFFSET, bit_count);
                write_u32(&mut data, DDS_PIXELFORMAT_RBITMASK_OFFSET, masks[0]);
                write_u32(&mut data, DDS_PIXELFORMAT_GBITMASK_OFFSET, masks[1]);
                write_u32(&mut data, DDS_PIXELFORMAT_BBITMASK_OFFSET, masks[2]);
                write_u32(&mut data, DDS_PIXELFORMAT_ABITMASK_OFFSET, masks[3]);
            }
        }

        let payload_len = parse_dds(&data)
            .and_then(|header| resolve_format(&header).ok())
            .and_then(|descriptor| {
                let size = |w, h| descriptor.data_size(w, h).unwrap_or(0);
                mip_levels(self.width, self.height, self.mipmaps.max(1), size).ok()
            })
            .and_then(|levels| levels.last().map(|last| last.offset + last.len))
            .unwrap_or(0);
        data.extend(self.fill.iter().copied().cycle().take(payload_len as usize));
        data
    }
}

/// One TIM2 picture.
pub struct Tim2Picture {
    pub image_type: u8,
    pub clut_type: u8,
    pub clut_colors: u16,
    pub width: u16,
    pub height: u16,
    pub image: Vec<u8>,
    pub clut: Vec<u8>,
}

impl Tim2Picture {
    /// A picture without a CLUT.
    pub fn direct(image_type: u8, width: u16, height: u16, image: Vec<u8>) -> Self {
        Self {
            image_type,
            clut_type: 0,
            clut_colors: 0,
            width,
            height,
            image,
            clut: Vec::new(),
        }
    }

    /// A paletted picture with a CLUT of `clut_type`.
    pub fn indexed(
        image_type: u8,
        width: u16,
        height: u16,
        image: Vec<u8>,
        clut_type: u8,
        clut_colors: u16,
        clut: Vec<u8>,
    ) -> Self {
        Self {
            image_type,
            clut_type,
            clut_colors,
            width,
            height,
            image,
            clut,
        }
    }
}

/// Serializes a TIM2 file holding `pictures`, the first one right after the file header.
pub fn build_tim2(pictures: &[Tim2Picture]) -> Vec<u8> {
    let mut data = Vec::new();
    data.extend_from_slice(b"TIM2");
    data.extend_from_slice(&[4, 0]);
    data.extend_from_slice(&(pictures.len() as u16).to_le_bytes());
    data.extend_from_slice(&[0; 8]);

    for picture in pictures {
        let total = 48 + picture.image.len() + picture.clut.len();
        data.extend_from_slice(&(total as u32).to_le_bytes());
        data.extend_from_slice(&(picture.clut.len() as u32).to_le_bytes());
        data.extend_from_slice(&(picture.image.len() as u32).to_le_bytes());
        data.extend_from_slice(&48u16.to_le_bytes());
        data.extend_from_slice(&picture.clut_colors.to_le_bytes());
        data.extend_from_slice(&[0, 1, picture.clut_type, picture.image_type]);
        data.extend_from_slice(&picture.width.to_le_bytes());
        data.extend_from_slice(&picture.height.to_le_bytes());
        // GS registers
        data.extend_from_slice(&[0; 24]);
        data.extend_from_slice(&picture.image);
        data.extend_from_slice(&picture.clut);
    }
    data
}

/// A format handler reporting a fixed score, for exercising dispatch.
pub struct FixedScore {
    id: &'static str,
    score: Option<u32>,
    extensions: &'static [&'static str],
    container: Option<&'static str>,
}

impl FixedScore {
    /// Always scores `score`.
    pub fn new(id: &'static str, score: u32) -> Self {
        Self {
            id,
            score: Some(score),
            extensions: &[],
            container: None,
        }
    }

    /// Always fails to score.
    pub fn failing(id: &'static str) -> Self {
        Self {
            score: None,
            ..Self::new(id, 0)
        }
    }

    pub fn with_extensions(mut self, extensions: &'static [&'static str]) -> Self {
        self.extensions = extensions;
        self
    }

    pub fn with_container(mut self, container: &'static str) -> Self {
        self.container = Some(container);
        self
    }
}

impl FormatDetection for FixedScore {
    fn id(&self) -> &'static str {
        self.id
    }

    fn description(&self) -> &'static str {
        "fixed score"
    }

    fn supported_extensions(&self) -> &[&str] {
        self.extensions
    }

    fn expected_container(&self) -> Option<&str> {
        self.container
    }

    fn score(&self, _: &mut StreamCursor<'_>, _: &ContainerContext) -> DecodeResult<u32> {
        self.score.ok_or(DecodeError::TruncatedStream {
            offset: 0,
            needed: 1,
            available: 0,
        })
    }
}

impl FormatDecoder for FixedScore {
    fn decode(
        &self,
        _: &mut StreamCursor<'_>,
        _: &ContainerContext,
        _: &mut DecodeContext,
    ) -> DecodeResult<FrameChain> {
        Ok(FrameChain::new())
    }
}
