//! Data driven handlers for simple per-title formats.
//!
//! Many game formats are a small fixed header holding dimensions and a format code,
//! followed by raw pixels. A [`TableLayout`] describes where those fields live so a
//! [`TableDrivenDecoder`] can score and decode the format without bespoke code.

use crate::container::ContainerContext;
use crate::traits::{FormatDecoder, FormatDetection};
use texture_preview_common::{
    cursor::StreamCursor,
    raster::FrameChain,
    validate::{is_valid_dimension, is_within_stream, DEFAULT_MAX_DIMENSION},
    DecodeError, DecodeResult,
};
use texture_preview_pixels::{
    descriptor::ByteOrder,
    swizzle::{deswizzle_image, TileScheme},
    transform::flip_vertical,
    DecodeContext, DecodeParams, PixelFormatDescriptor,
};
use tracing::debug;

/// Width of an integer header field.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FieldWidth {
    /// One byte
    U8,
    /// Two bytes
    U16,
    /// Four bytes
    U32,
}

/// An integer header field.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct FieldSpec {
    /// Offset from the start of the entry
    pub offset: usize,
    /// Field width
    pub width: FieldWidth,
    /// Field byte order
    pub byte_order: ByteOrder,
}

impl FieldSpec {
    /// A little endian field.
    pub const fn le(offset: usize, width: FieldWidth) -> Self {
        Self {
            offset,
            width,
            byte_order: ByteOrder::Little,
        }
    }

    /// A big endian field.
    pub const fn be(offset: usize, width: FieldWidth) -> Self {
        Self {
            offset,
            width,
            byte_order: ByteOrder::Big,
        }
    }

    /// Reads the field from the entry under `cursor`, leaving the cursor after it.
    pub fn read(&self, cursor: &mut StreamCursor<'_>) -> DecodeResult<u32> {
        cursor.seek(self.offset)?;
        Ok(match (self.width, self.byte_order) {
            (FieldWidth::U8, _) => cursor.read_u8()? as u32,
            (FieldWidth::U16, ByteOrder::Little) => cursor.read_u16_le()? as u32,
            (FieldWidth::U16, ByteOrder::Big) => cursor.read_u16_be()? as u32,
            (FieldWidth::U32, ByteOrder::Little) => cursor.read_u32_le()?,
            (FieldWidth::U32, ByteOrder::Big) => cursor.read_u32_be()?,
        })
    }
}

/// Where the pixel data of a table driven format starts.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DataOffset {
    /// A fixed offset from the start of the entry
    Fixed(usize),
    /// An offset stored in a header field
    Field(FieldSpec),
}

/// Static description of a simple header-plus-pixels format.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TableLayout {
    /// Unique identifier
    pub id: &'static str,
    /// Human readable description
    pub description: &'static str,
    /// Magic bytes and the offset they are found at
    pub magic: Option<(usize, &'static [u8])>,
    /// Extensions the format is stored under; empty accepts any
    pub extensions: &'static [&'static str],
    /// Archive type the format only appears in
    pub container: Option<&'static str>,
    /// Width field
    pub width: FieldSpec,
    /// Height field
    pub height: FieldSpec,
    /// Format code field; without one the first entry of `formats` is used
    pub format_code: Option<FieldSpec>,
    /// Pixel format for each known format code
    pub formats: &'static [(u32, PixelFormatDescriptor)],
    /// Start of the pixel data
    pub data_offset: DataOffset,
    /// Tiling of the stored pixels
    pub tile_scheme: TileScheme,
    /// Whether rows are stored bottom up
    pub flip_vertical: bool,
}

/// Everything the header says about the image.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct TableHeader {
    width: u32,
    height: u32,
    format_code: Option<u32>,
    data_offset: usize,
}

/// Handler driven by a [`TableLayout`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TableDrivenDecoder {
    layout: TableLayout,
}

impl TableDrivenDecoder {
    /// Creates a handler for `layout`.
    pub const fn new(layout: TableLayout) -> Self {
        Self { layout }
    }

    /// The layout driving this handler.
    pub fn layout(&self) -> &TableLayout {
        &self.layout
    }

    fn magic_matches(&self, data: &[u8]) -> bool {
        match self.layout.magic {
            Some((offset, magic)) => data
                .get(offset..offset.saturating_add(magic.len()))
                .is_some_and(|bytes| bytes == magic),
            None => true,
        }
    }

    fn read_header(&self, cursor: &mut StreamCursor<'_>) -> DecodeResult<TableHeader> {
        let width = self.layout.width.read(cursor)?;
        let height = self.layout.height.read(cursor)?;
        let format_code = self
            .layout
            .format_code
            .map(|field| field.read(cursor))
            .transpose()?;
        let data_offset = match self.layout.data_offset {
            DataOffset::Fixed(offset) => offset,
            DataOffset::Field(field) => field.read(cursor)? as usize,
        };
        Ok(TableHeader {
            width,
            height,
            format_code,
            data_offset,
        })
    }

    fn descriptor(&self, format_code: Option<u32>) -> Option<PixelFormatDescriptor> {
        match format_code {
            Some(code) => self
                .layout
                .formats
                .iter()
                .find(|(known, _)| *known == code)
                .map(|(_, descriptor)| *descriptor),
            None => self.layout.formats.first().map(|(_, descriptor)| *descriptor),
        }
    }
}

impl FormatDetection for TableDrivenDecoder {
    fn id(&self) -> &'static str {
        self.layout.id
    }

    fn description(&self) -> &'static str {
        self.layout.description
    }

    fn supported_extensions(&self) -> &[&str] {
        self.layout.extensions
    }

    fn expected_container(&self) -> Option<&str> {
        self.layout.container
    }

    fn score(&self, cursor: &mut StreamCursor<'_>, _: &ContainerContext) -> DecodeResult<u32> {
        let mut score = 0;
        if self.layout.magic.is_some() {
            if !self.magic_matches(cursor.data()) {
                return Ok(0);
            }
            score += 100;
        }

        let header = self.read_header(cursor)?;
        if !is_valid_dimension(header.width, DEFAULT_MAX_DIMENSION)
            || !is_valid_dimension(header.height, DEFAULT_MAX_DIMENSION)
        {
            return Ok(0);
        }
        score += 10;

        let Some(descriptor) = self.descriptor(header.format_code) else {
            return Ok(score);
        };
        score += 10;

        let fits = descriptor
            .data_size(header.width, header.height)
            .is_some_and(|size| {
                is_within_stream(header.data_offset as u64, size, cursor.len() as u64)
            });
        if fits {
            score += 5;
        }
        Ok(score)
    }
}

impl FormatDecoder for TableDrivenDecoder {
    fn decode(
        &self,
        cursor: &mut StreamCursor<'_>,
        _: &ContainerContext,
        ctx: &mut DecodeContext,
    ) -> DecodeResult<FrameChain> {
        let header = self.read_header(cursor)?;
        let code = header.format_code.unwrap_or(0);
        let descriptor =
            self.descriptor(header.format_code)
                .ok_or(DecodeError::UnsupportedVariant {
                    format: self.layout.id,
                    code,
                })?;
        debug!(
            format = self.layout.id,
            pixel_format = descriptor.name,
            width = header.width,
            height = header.height,
            "Decoding table driven image"
        );

        cursor.seek(header.data_offset)?;
        let params = DecodeParams::new(header.width, header.height);
        let mut image = texture_preview_pixels::decode_pixels(&descriptor, cursor, params, ctx)?;
        if self.layout.tile_scheme != TileScheme::Linear {
            image = deswizzle_image(&image, self.layout.tile_scheme);
        }
        if self.layout.flip_vertical {
            flip_vertical(&mut image);
        }
        Ok(FrameChain::single(image))
    }
}
