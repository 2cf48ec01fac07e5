//! TIM2 (`.tm2`), the PlayStation 2 texture container.
//!
//! A 16 byte file header is followed by pictures, each a 48 byte header, the image data
//! and an optional CLUT (palette). Every picture becomes one frame.

use crate::container::{ContainerContext, PALETTE_ID};
use crate::traits::{FormatDecoder, FormatDetection};
use texture_preview_common::{
    cursor::StreamCursor,
    raster::{FrameChain, RasterImage},
    validate::{ensure_within_stream, is_valid_dimension, DecodeLimits, DEFAULT_MAX_DIMENSION},
    DecodeError, DecodeResult,
};
use texture_preview_pixels::{
    descriptor::{IndexLayout, PackedLayout},
    packed::decode_packed,
    palette::Palette,
    paletted::decode_paletted,
    transform::expand_half_range_alpha,
    DecodeContext,
};
use tracing::warn;

const FORMAT: &str = "TIM2";
const TIM2_MAGIC: [u8; 4] = *b"TIM2";
const FILE_HEADER_SIZE: usize = 16;
const PICTURE_HEADER_SIZE: u16 = 48;
/// Alignment format 1 places the first picture at 128 bytes.
const ALIGNED_FIRST_PICTURE: usize = 128;

/// Set when CLUT entries are stored linearly; clear for the CSM1 swizzled order.
const CLUT_LINEAR_FLAG: u8 = 0x80;
const CLUT_FORMAT_MASK: u8 = 0x3F;

/// Pixel storage of a TIM2 picture's image or CLUT.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Tim2PixelType {
    Abgr1555,
    Rgb888,
    Rgba8888,
    Index4,
    Index8,
}

impl Tim2PixelType {
    fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Abgr1555),
            2 => Some(Self::Rgb888),
            3 => Some(Self::Rgba8888),
            4 => Some(Self::Index4),
            5 => Some(Self::Index8),
            _ => None,
        }
    }

    fn packed_layout(self) -> Option<PackedLayout> {
        match self {
            Self::Abgr1555 => Some(PackedLayout::ABGR1555),
            Self::Rgb888 => Some(PackedLayout::RGB888),
            Self::Rgba8888 => Some(PackedLayout::RGBA8888),
            Self::Index4 | Self::Index8 => None,
        }
    }
}

/// The fields of a TIM2 picture header that decoding needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tim2PictureHeader {
    /// Size of the header, image and CLUT together
    pub total_size: u32,
    /// Size of the CLUT in bytes
    pub clut_size: u32,
    /// Size of the image data in bytes, including any mip levels
    pub image_size: u32,
    /// Size of this header including extended data
    pub header_size: u16,
    /// Number of CLUT entries
    pub clut_colors: u16,
    /// Number of mip levels
    pub mipmaps: u8,
    /// CLUT pixel type and storage flags
    pub clut_type: u8,
    /// Image pixel type
    pub image_type: u8,
    /// Width in pixels
    pub width: u16,
    /// Height in pixels
    pub height: u16,
}

impl Tim2PictureHeader {
    fn read(cursor: &mut StreamCursor<'_>) -> DecodeResult<Self> {
        let total_size = cursor.read_u32_le()?;
        let clut_size = cursor.read_u32_le()?;
        let image_size = cursor.read_u32_le()?;
        let header_size = cursor.read_u16_le()?;
        let clut_colors = cursor.read_u16_le()?;
        let _pict_format = cursor.read_u8()?;
        let mipmaps = cursor.read_u8()?;
        let clut_type = cursor.read_u8()?;
        let image_type = cursor.read_u8()?;
        let width = cursor.read_u16_le()?;
        let height = cursor.read_u16_le()?;
        // GS TEX0, TEX1, REGS and TEXCLUT
        cursor.skip(24)?;

        Ok(Self {
            total_size,
            clut_size,
            image_size,
            header_size,
            clut_colors,
            mipmaps,
            clut_type,
            image_type,
            width,
            height,
        })
    }
}

/// Handler for TIM2 files.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tim2Decoder;

impl FormatDetection for Tim2Decoder {
    fn id(&self) -> &'static str {
        "tim2"
    }

    fn description(&self) -> &'static str {
        "PlayStation 2 TIM2 texture"
    }

    fn supported_extensions(&self) -> &[&str] {
        &["tm2", "tim2"]
    }

    fn score(&self, cursor: &mut StreamCursor<'_>, _: &ContainerContext) -> DecodeResult<u32> {
        if cursor.read_array::<4>()? != TIM2_MAGIC {
            return Ok(0);
        }
        let mut score = 100;

        let (first_picture, count) = read_file_header(cursor)?;
        if count == 0 {
            return Ok(score);
        }
        score += 10;

        cursor.seek(first_picture)?;
        let picture = Tim2PictureHeader::read(cursor)?;
        if Tim2PixelType::from_code(picture.image_type).is_some() {
            score += 10;
        }
        if is_valid_dimension(picture.width as u32, DEFAULT_MAX_DIMENSION)
            && is_valid_dimension(picture.height as u32, DEFAULT_MAX_DIMENSION)
        {
            score += 5;
        }
        Ok(score)
    }
}

impl FormatDecoder for Tim2Decoder {
    fn decode(
        &self,
        cursor: &mut StreamCursor<'_>,
        container: &ContainerContext,
        ctx: &mut DecodeContext,
    ) -> DecodeResult<FrameChain> {
        let file_start = cursor.offset();
        let magic = cursor.read_array::<4>()?;
        if magic != TIM2_MAGIC {
            return Err(DecodeError::InvalidField {
                format: FORMAT,
                field: "magic",
                value: u32::from_le_bytes(magic) as u64,
            });
        }
        let (first_picture, count) = read_file_header(cursor)?;
        let palette_id = container
            .properties()
            .get_int(PALETTE_ID)
            .and_then(|id| usize::try_from(id).ok());

        let mut frames = FrameChain::new();
        let mut picture_start = file_start + first_picture;
        for index in 0..count {
            let decoded = cursor
                .seek(picture_start)
                .and_then(|_| decode_picture(cursor, palette_id, ctx));
            match decoded {
                Ok((frame, total_size)) => {
                    frames.push(frame);
                    picture_start = picture_start.saturating_add(total_size);
                }
                Err(err) if index == 0 => return Err(err),
                Err(err) => {
                    warn!(format = FORMAT, picture = index, %err, "Skipping remaining pictures");
                    break;
                }
            }
        }

        if frames.is_empty() {
            return Err(DecodeError::InvalidField {
                format: FORMAT,
                field: "picture count",
                value: 0,
            });
        }
        Ok(frames)
    }
}

/// Reads the rest of the file header after the magic. Returns the offset of the first
/// picture relative to the file start and the picture count.
fn read_file_header(cursor: &mut StreamCursor<'_>) -> DecodeResult<(usize, u16)> {
    let _version = cursor.read_u8()?;
    let alignment = cursor.read_u8()?;
    let count = cursor.read_u16_le()?;
    let first_picture = match alignment {
        1 => ALIGNED_FIRST_PICTURE,
        _ => FILE_HEADER_SIZE,
    };
    Ok((first_picture, count))
}

/// Decodes the top level of the picture at the cursor. Returns the frame and the
/// picture's total size.
fn decode_picture(
    cursor: &mut StreamCursor<'_>,
    palette_id: Option<usize>,
    ctx: &mut DecodeContext,
) -> DecodeResult<(RasterImage, usize)> {
    let start = cursor.offset();
    let header = Tim2PictureHeader::read(cursor)?;
    validate_picture(&header, start, cursor.len())?;

    let image_type = Tim2PixelType::from_code(header.image_type).ok_or(
        DecodeError::UnsupportedVariant {
            format: FORMAT,
            code: header.image_type as u32,
        },
    )?;
    let (width, height) = (header.width as u32, header.height as u32);
    let limits = *ctx.limits();

    cursor.seek(start + header.header_size as usize)?;
    let image_bytes = cursor.read_bytes(header.image_size as usize)?;
    let clut_bytes = cursor.read_bytes(header.clut_size as usize)?;
    let mut image_cursor = StreamCursor::new(image_bytes);

    let frame = match image_type.packed_layout() {
        Some(layout) => {
            let mut frame = decode_packed(&mut image_cursor, layout, width, height, &limits)?;
            if image_type == Tim2PixelType::Rgba8888 {
                expand_half_range_alpha(&mut frame);
            }
            frame
        }
        None => {
            let layout = match image_type {
                Tim2PixelType::Index4 => IndexLayout::INDEX4,
                _ => IndexLayout::INDEX8,
            };
            decode_indexed(
                &mut image_cursor,
                layout,
                &header,
                clut_bytes,
                palette_id,
                ctx,
                &limits,
            )?
        }
    };
    Ok((frame, header.total_size as usize))
}

fn validate_picture(header: &Tim2PictureHeader, start: usize, stream_len: usize) -> DecodeResult<()> {
    if header.header_size < PICTURE_HEADER_SIZE {
        return Err(DecodeError::InvalidField {
            format: FORMAT,
            field: "header size",
            value: header.header_size as u64,
        });
    }
    let contents =
        header.header_size as u64 + header.image_size as u64 + header.clut_size as u64;
    if contents > header.total_size as u64 {
        return Err(DecodeError::InvalidField {
            format: FORMAT,
            field: "total size",
            value: header.total_size as u64,
        });
    }
    ensure_within_stream(start as u64, contents, stream_len as u64)
}

/// Decodes palette indices against the picture's own CLUT, or against the context's
/// palette store when the picture has none.
fn decode_indexed(
    cursor: &mut StreamCursor<'_>,
    layout: IndexLayout,
    header: &Tim2PictureHeader,
    clut_bytes: &[u8],
    palette_id: Option<usize>,
    ctx: &mut DecodeContext,
    limits: &DecodeLimits,
) -> DecodeResult<RasterImage> {
    let (width, height) = (header.width as u32, header.height as u32);
    if header.clut_colors == 0 || clut_bytes.is_empty() {
        let palette = ctx.resolve_palette(FORMAT, palette_id)?;
        return decode_paletted(cursor, layout, palette, width, height, limits);
    }

    let palette = read_clut(header, clut_bytes, layout.bits)?;
    decode_paletted(cursor, layout, &palette, width, height, limits)
}

fn read_clut(header: &Tim2PictureHeader, clut_bytes: &[u8], index_bits: u8) -> DecodeResult<Palette> {
    let clut_format = header.clut_type & CLUT_FORMAT_MASK;
    let clut_type = Tim2PixelType::from_code(clut_format)
        .and_then(Tim2PixelType::packed_layout)
        .ok_or(DecodeError::UnsupportedVariant {
            format: FORMAT,
            code: clut_format as u32,
        })?;

    let count = (header.clut_colors as usize).min(1 << index_bits);
    let mut palette = Palette::from_packed(clut_bytes, clut_type, count)?;
    if clut_type == PackedLayout::RGBA8888 {
        for entry in palette.entries_mut() {
            entry.a = entry.a.saturating_mul(2);
        }
    }
    if (header.clut_type & CLUT_LINEAR_FLAG) == 0 {
        palette.unswizzle_ps2_clut();
    }
    Ok(palette)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;
    use texture_preview_pixels::palette::PaletteStore;

    fn decode(data: &[u8]) -> DecodeResult<FrameChain> {
        Tim2Decoder.decode(
            &mut StreamCursor::new(data),
            &ContainerContext::from_name("a.tm2"),
            &mut DecodeContext::new(),
        )
    }

    fn rgba_clut(colors: &[Color8888]) -> Vec<u8> {
        colors.iter().flat_map(|c| [c.r, c.g, c.b, c.a]).collect()
    }

    #[test]
    fn scores_valid_file() {
        let data = build_tim2(&[Tim2Picture::direct(3, 2, 2, vec![0; 16])]);
        let score = Tim2Decoder.score(&mut StreamCursor::new(&data), &ContainerContext::new());
        assert_eq!(score, Ok(125));
    }

    #[rstest]
    #[case(b"TIM3".as_slice(), Ok(0))]
    #[case(b"TI".as_slice(), Err(()))]
    fn rejects_other_data(#[case] data: &[u8], #[case] expected: Result<u32, ()>) {
        let score = Tim2Decoder.score(&mut StreamCursor::new(data), &ContainerContext::new());
        assert_eq!(score.map_err(|_| ()), expected);
    }

    #[test]
    fn direct_colour_alpha_is_doubled() {
        let image = vec![10, 20, 30, 0x80, 1, 2, 3, 0x40];
        let data = build_tim2(&[Tim2Picture::direct(3, 2, 1, image)]);
        let frames = decode(&data).unwrap();
        assert_eq!(
            frames.first().unwrap().pixels(),
            &[Color8888::new(10, 20, 30, 255), Color8888::new(1, 2, 3, 128)]
        );
    }

    #[test]
    fn abgr1555_pixels() {
        // Red with the alpha bit set, then blue without it.
        let image = vec![0x1F, 0x80, 0x00, 0x7C];
        let data = build_tim2(&[Tim2Picture::direct(1, 2, 1, image)]);
        let frame = decode(&data).unwrap().into_frames().remove(0);
        assert_eq!(frame.pixels()[0], Color8888::new(255, 0, 0, 255));
        assert_eq!(frame.pixels()[1], Color8888::new(0, 0, 255, 0));
    }

    #[test]
    fn index4_uses_inline_clut() {
        let clut = rgba_clut(&[
            Color8888::new(255, 0, 0, 128),
            Color8888::new(0, 255, 0, 128),
        ]);
        // Low nibble first: pixel 0 uses entry 1, pixel 1 entry 0.
        let picture = Tim2Picture::indexed(4, 2, 1, vec![0x01], 3 | 0x80, 2, clut);
        let frame = decode(&build_tim2(&[picture])).unwrap().into_frames().remove(0);
        assert_eq!(
            frame.pixels(),
            &[Color8888::new(0, 255, 0, 255), Color8888::new(255, 0, 0, 255)]
        );
    }

    #[test]
    fn index8_clut_is_unswizzled() {
        let colors: Vec<Color8888> = (0..=255).map(|i| Color8888::grey(i as u8)).collect();
        let clut: Vec<u8> = colors
            .iter()
            .flat_map(|c| PackedLayout::ABGR1555.encode_pixel(*c).to_le_bytes()[..2].to_vec())
            .collect();
        let swizzled = Tim2Picture::indexed(5, 2, 1, vec![8, 16], 1, 256, clut.clone());
        let linear = Tim2Picture::indexed(5, 2, 1, vec![8, 16], 1 | 0x80, 256, clut);

        let swizzled = decode(&build_tim2(&[swizzled])).unwrap().into_frames().remove(0);
        let linear = decode(&build_tim2(&[linear])).unwrap().into_frames().remove(0);
        // Entries 8 and 16 trade places in CSM1 order.
        assert_eq!(swizzled.pixels()[0], linear.pixels()[1]);
        assert_eq!(swizzled.pixels()[1], linear.pixels()[0]);
    }

    #[test]
    fn indexed_without_clut_uses_palette_store() {
        let source = |store: &mut PaletteStore| -> DecodeResult<()> {
            store.add_palette(Palette::new(vec![Color8888::grey(1), Color8888::grey(2)]).unwrap());
            Ok(())
        };
        let mut ctx = DecodeContext::new().with_palette_source(source);
        let data = build_tim2(&[Tim2Picture::direct(5, 2, 1, vec![1, 0])]);
        let frames = Tim2Decoder
            .decode(&mut StreamCursor::new(&data), &ContainerContext::new(), &mut ctx)
            .unwrap();
        assert_eq!(
            frames.first().unwrap().pixels(),
            &[Color8888::grey(2), Color8888::grey(1)]
        );
    }

    #[test]
    fn pictures_become_frames() {
        let data = build_tim2(&[
            Tim2Picture::direct(2, 1, 1, vec![1, 2, 3]),
            Tim2Picture::direct(2, 2, 1, vec![4, 5, 6, 7, 8, 9]),
        ]);
        let frames = decode(&data).unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames.get(1).and_then(|f| f.pixel(1, 0)), Some(Color8888::new(7, 8, 9, 255)));
    }

    #[test]
    fn broken_later_picture_keeps_earlier_frames() {
        let mut data = build_tim2(&[
            Tim2Picture::direct(2, 1, 1, vec![1, 2, 3]),
            Tim2Picture::direct(2, 1, 1, vec![4, 5, 6]),
        ]);
        // Second picture's image type.
        let second = 16 + 48 + 3;
        data[second + 19] = 9;
        assert_eq!(decode(&data).unwrap().len(), 1);
    }

    #[test]
    fn picture_past_the_end_keeps_earlier_frames() {
        let mut data = build_tim2(&[
            Tim2Picture::direct(2, 1, 1, vec![1, 2, 3]),
            Tim2Picture::direct(2, 1, 1, vec![4, 5, 6]),
        ]);
        // First picture's total size points past the end of the file.
        data[16..20].copy_from_slice(&0x7FFF_FFFFu32.to_le_bytes());
        assert_eq!(decode(&data).unwrap().len(), 1);
    }

    #[rstest]
    #[case(u16::MAX)]
    #[case(257)]
    fn huge_clut_colour_count_needs_the_whole_clut(#[case] clut_colors: u16) {
        // Two stored entries, but the count asks for a full 256 entry table.
        let clut = rgba_clut(&[Color8888::grey(1), Color8888::grey(2)]);
        let picture = Tim2Picture::indexed(5, 2, 1, vec![0, 1], 3 | 0x80, clut_colors, clut);
        assert!(decode(&build_tim2(&[picture])).unwrap_err().is_truncation());
    }

    #[test]
    fn unknown_image_type_is_unsupported() {
        let data = build_tim2(&[Tim2Picture::direct(7, 1, 1, vec![0; 4])]);
        assert_eq!(
            decode(&data).unwrap_err(),
            DecodeError::UnsupportedVariant {
                format: FORMAT,
                code: 7
            }
        );
    }

    #[test]
    fn oversized_image_is_truncation() {
        let mut data = build_tim2(&[Tim2Picture::direct(3, 4, 4, vec![0; 64])]);
        data.truncate(data.len() - 10);
        assert!(decode(&data).unwrap_err().is_truncation());
    }

    #[test]
    fn undersized_image_data_is_truncation() {
        // Header says 4x4 RGBA but only 8 bytes of image are stored.
        let data = build_tim2(&[Tim2Picture::direct(3, 4, 4, vec![0; 8])]);
        assert!(decode(&data).unwrap_err().is_truncation());
    }
}
