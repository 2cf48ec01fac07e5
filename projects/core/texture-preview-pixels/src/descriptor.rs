//! Declarative description of how a format stores its pixels.
//!
//! A [`PixelFormatDescriptor`] is plain configuration data. The single generic
//! [`decode_pixels`](crate::decode::decode_pixels) entry point interprets it.

use texture_preview_bc::{BlockFormat, CrunchVariant};
use texture_preview_common::{
    color_8888::{expand_channel, Color8888},
    validate::ensure_in_range,
    DecodeResult,
};

/// Byte order of a multi-byte packed pixel.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    /// Least significant byte first
    Little,
    /// Most significant byte first
    Big,
}

/// Location of one channel within a packed pixel value.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ChannelField {
    /// Position of the channel's least significant bit
    pub shift: u8,
    /// Width of the channel in bits; 0 when the channel is absent
    pub bits: u8,
}

impl ChannelField {
    /// A channel not present in the format.
    pub const ABSENT: Self = Self::new(0, 0);

    /// Creates a field of `bits` bits starting at bit `shift`.
    pub const fn new(shift: u8, bits: u8) -> Self {
        Self { shift, bits }
    }

    #[inline(always)]
    const fn mask(self) -> u32 {
        if self.bits >= 32 {
            u32::MAX
        } else {
            (1u32 << self.bits) - 1
        }
    }

    /// Extracts this channel from `raw` and expands it to 8 bits. Absent channels yield
    /// `absent`.
    #[inline(always)]
    pub fn extract(self, raw: u32, absent: u8) -> u8 {
        if self.bits == 0 {
            return absent;
        }
        expand_channel((raw >> self.shift) & self.mask(), self.bits as u32)
    }

    /// Quantizes an 8-bit value to this channel's width and places it at its shift.
    #[inline(always)]
    pub fn insert(self, value: u8) -> u32 {
        if self.bits == 0 {
            return 0;
        }
        let quantized = if self.bits >= 8 {
            value as u32
        } else {
            (value as u32) >> (8 - self.bits)
        };
        (quantized & self.mask()).wrapping_shl(self.shift as u32)
    }
}

/// A packed pixel layout: fixed-size pixels with one bit field per channel.
///
/// 8888 and 888 layouts are named after their byte order in memory; 16-bit layouts are
/// named after their channel order from the most significant bit down.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct PackedLayout {
    /// Short human readable name
    pub name: &'static str,
    /// Size of one pixel, 1 to 4 bytes
    pub bytes_per_pixel: u8,
    /// Byte order used to assemble the pixel value
    pub byte_order: ByteOrder,
    /// Red channel
    pub red: ChannelField,
    /// Green channel
    pub green: ChannelField,
    /// Blue channel
    pub blue: ChannelField,
    /// Alpha channel; absent means opaque
    pub alpha: ChannelField,
}

macro_rules! packed {
    ($name:ident, $bpp:expr, ($rs:expr, $rb:expr), ($gs:expr, $gb:expr), ($bs:expr, $bb:expr), ($as:expr, $ab:expr)) => {
        #[doc = concat!("The `", stringify!($name), "` layout.")]
        pub const $name: Self = Self {
            name: stringify!($name),
            bytes_per_pixel: $bpp,
            byte_order: ByteOrder::Little,
            red: ChannelField::new($rs, $rb),
            green: ChannelField::new($gs, $gb),
            blue: ChannelField::new($bs, $bb),
            alpha: ChannelField::new($as, $ab),
        };
    };
}

impl PackedLayout {
    packed!(RGBA8888, 4, (0, 8), (8, 8), (16, 8), (24, 8));
    packed!(BGRA8888, 4, (16, 8), (8, 8), (0, 8), (24, 8));
    packed!(ARGB8888, 4, (8, 8), (16, 8), (24, 8), (0, 8));
    packed!(ABGR8888, 4, (24, 8), (16, 8), (8, 8), (0, 8));
    packed!(RGB888, 3, (0, 8), (8, 8), (16, 8), (0, 0));
    packed!(BGR888, 3, (16, 8), (8, 8), (0, 8), (0, 0));
    packed!(RGB565, 2, (11, 5), (5, 6), (0, 5), (0, 0));
    packed!(BGR565, 2, (0, 5), (5, 6), (11, 5), (0, 0));
    packed!(RGBA5551, 2, (11, 5), (6, 5), (1, 5), (0, 1));
    packed!(ARGB1555, 2, (10, 5), (5, 5), (0, 5), (15, 1));
    packed!(ABGR1555, 2, (0, 5), (5, 5), (10, 5), (15, 1));
    packed!(RGBA4444, 2, (12, 4), (8, 4), (4, 4), (0, 4));
    packed!(ARGB4444, 2, (8, 4), (4, 4), (0, 4), (12, 4));
    packed!(L8, 1, (0, 8), (0, 8), (0, 8), (0, 0));
    packed!(A8, 1, (0, 0), (0, 0), (0, 0), (0, 8));
    packed!(LA88, 2, (0, 8), (0, 8), (0, 8), (8, 8));

    /// Every built-in layout.
    pub const ALL: [PackedLayout; 16] = [
        Self::RGBA8888,
        Self::BGRA8888,
        Self::ARGB8888,
        Self::ABGR8888,
        Self::RGB888,
        Self::BGR888,
        Self::RGB565,
        Self::BGR565,
        Self::RGBA5551,
        Self::ARGB1555,
        Self::ABGR1555,
        Self::RGBA4444,
        Self::ARGB4444,
        Self::L8,
        Self::A8,
        Self::LA88,
    ];

    /// Looks up a built-in layout by name, ignoring ASCII case.
    pub fn by_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|layout| layout.name.eq_ignore_ascii_case(name))
    }

    /// Fails with [`DecodeError::InvalidField`] unless [`Self::bytes_per_pixel`] is 1 to 4.
    ///
    /// [`DecodeError::InvalidField`]: texture_preview_common::DecodeError::InvalidField
    #[inline]
    pub fn ensure_valid(&self) -> DecodeResult<()> {
        ensure_in_range(self.name, "bytes per pixel", self.bytes_per_pixel as u64, 1, 4)?;
        Ok(())
    }

    /// Returns a copy of this layout with a different byte order.
    pub const fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }

    /// Assembles the raw pixel value from the first [`Self::bytes_per_pixel`] bytes.
    #[inline(always)]
    pub fn read_raw(&self, bytes: &[u8]) -> u32 {
        let bytes = &bytes[..self.bytes_per_pixel as usize];
        match self.byte_order {
            ByteOrder::Little => bytes
                .iter()
                .rev()
                .fold(0u32, |acc, &byte| (acc << 8) | byte as u32),
            ByteOrder::Big => bytes
                .iter()
                .fold(0u32, |acc, &byte| (acc << 8) | byte as u32),
        }
    }

    /// Writes a raw pixel value as [`Self::bytes_per_pixel`] bytes.
    pub fn write_raw(&self, raw: u32, out: &mut [u8]) {
        let size = self.bytes_per_pixel as usize;
        let le = raw.to_le_bytes();
        for (index, byte) in out[..size].iter_mut().enumerate() {
            *byte = match self.byte_order {
                ByteOrder::Little => le[index],
                ByteOrder::Big => le[size - 1 - index],
            };
        }
    }

    /// Converts a raw pixel value to canonical RGBA.
    #[inline(always)]
    pub fn decode_pixel(&self, raw: u32) -> Color8888 {
        Color8888::new(
            self.red.extract(raw, 0),
            self.green.extract(raw, 0),
            self.blue.extract(raw, 0),
            self.alpha.extract(raw, 255),
        )
    }

    /// Converts canonical RGBA to a raw pixel value, dropping low bits of narrow channels.
    ///
    /// Layouts that share one field between channels (e.g. luminance) take the value of
    /// the last channel written, in red, green, blue, alpha order.
    pub fn encode_pixel(&self, pixel: Color8888) -> u32 {
        let mut raw = 0u32;
        for (field, value) in [
            (self.red, pixel.r),
            (self.green, pixel.g),
            (self.blue, pixel.b),
            (self.alpha, pixel.a),
        ] {
            if field.bits == 0 {
                continue;
            }
            let occupied = field.mask().wrapping_shl(field.shift as u32);
            raw = (raw & !occupied) | field.insert(value);
        }
        raw
    }
}

/// Order of sub-byte indices within a byte.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum NibbleOrder {
    /// First pixel in the least significant bits (PS2, most console formats)
    #[default]
    LowFirst,
    /// First pixel in the most significant bits (BMP style)
    HighFirst,
}

/// Layout of palette indices.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct IndexLayout {
    /// Bits per index: 1, 2, 4 or 8
    pub bits: u8,
    /// Order of indices within a byte when `bits < 8`
    pub nibble_order: NibbleOrder,
}

impl IndexLayout {
    /// 1-bit indices, 8 per byte
    pub const INDEX1: Self = Self::new(1, NibbleOrder::LowFirst);
    /// 2-bit indices, 4 per byte
    pub const INDEX2: Self = Self::new(2, NibbleOrder::LowFirst);
    /// 4-bit indices, 2 per byte
    pub const INDEX4: Self = Self::new(4, NibbleOrder::LowFirst);
    /// 8-bit indices
    pub const INDEX8: Self = Self::new(8, NibbleOrder::LowFirst);

    /// Creates a layout; `bits` should be 1, 2, 4 or 8.
    pub const fn new(bits: u8, nibble_order: NibbleOrder) -> Self {
        Self { bits, nibble_order }
    }

    /// Returns a copy of this layout with a different nibble order.
    pub const fn with_nibble_order(mut self, nibble_order: NibbleOrder) -> Self {
        self.nibble_order = nibble_order;
        self
    }

    /// Bytes occupied by one row of `width` indices. Rows start on a byte boundary.
    #[inline]
    pub fn row_bytes(&self, width: u32) -> u64 {
        (width as u64 * self.bits as u64).div_ceil(8)
    }
}

/// The closed set of pixel encodings the engine decodes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PixelFamily {
    /// Fixed-size pixels with per-channel bit fields
    Packed(PackedLayout),
    /// Palette indices resolved through the decode context's palette store
    Paletted(IndexLayout),
    /// 4x4 block compression
    Block(BlockFormat),
    /// Crunch entropy coded block compression
    Crunched(CrunchVariant),
}

/// Immutable decode parameters for one pixel format.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct PixelFormatDescriptor {
    /// Name used in logs and errors
    pub name: &'static str,
    /// How the pixels are encoded
    pub family: PixelFamily,
}

impl PixelFormatDescriptor {
    /// Creates a descriptor.
    pub const fn new(name: &'static str, family: PixelFamily) -> Self {
        Self { name, family }
    }

    /// A descriptor for a packed layout, named after it.
    pub const fn packed(layout: PackedLayout) -> Self {
        Self::new(layout.name, PixelFamily::Packed(layout))
    }

    /// A descriptor for a block format, named after it.
    pub const fn block(format: BlockFormat) -> Self {
        Self::new(format.name(), PixelFamily::Block(format))
    }

    /// A descriptor for paletted data.
    pub const fn paletted(name: &'static str, layout: IndexLayout) -> Self {
        Self::new(name, PixelFamily::Paletted(layout))
    }

    /// A descriptor for crunched data.
    pub const fn crunched(variant: CrunchVariant) -> Self {
        Self::new(variant.name(), PixelFamily::Crunched(variant))
    }

    /// Bytes a `width` x `height` image occupies, when that can be known up front.
    ///
    /// Crunched data is variable length and returns [`None`], as does arithmetic overflow.
    pub fn data_size(&self, width: u32, height: u32) -> Option<u64> {
        match self.family {
            PixelFamily::Packed(layout) => (width as u64)
                .checked_mul(height as u64)?
                .checked_mul(layout.bytes_per_pixel as u64),
            PixelFamily::Paletted(layout) => layout.row_bytes(width).checked_mul(height as u64),
            PixelFamily::Block(format) => format.required_bytes(width, height),
            PixelFamily::Crunched(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    #[rstest]
    #[case(PackedLayout::RGBA8888, [0x11, 0x22, 0x33, 0x44], Color8888::new(0x11, 0x22, 0x33, 0x44))]
    #[case(PackedLayout::BGRA8888, [0x11, 0x22, 0x33, 0x44], Color8888::new(0x33, 0x22, 0x11, 0x44))]
    #[case(PackedLayout::ARGB8888, [0x11, 0x22, 0x33, 0x44], Color8888::new(0x22, 0x33, 0x44, 0x11))]
    #[case(PackedLayout::ABGR8888, [0x11, 0x22, 0x33, 0x44], Color8888::new(0x44, 0x33, 0x22, 0x11))]
    #[case(PackedLayout::RGB888, [0x11, 0x22, 0x33, 0x00], Color8888::new(0x11, 0x22, 0x33, 0xFF))]
    #[case(PackedLayout::RGB565, [0x00, 0xF8, 0x00, 0x00], Color8888::new(255, 0, 0, 255))]
    #[case(PackedLayout::ABGR1555, [0x1F, 0x80, 0x00, 0x00], Color8888::new(255, 0, 0, 255))]
    #[case(PackedLayout::ARGB1555, [0x1F, 0x00, 0x00, 0x00], Color8888::new(0, 0, 255, 0))]
    #[case(PackedLayout::RGBA4444, [0x0F, 0xF0, 0x00, 0x00], Color8888::new(255, 0, 0, 255))]
    #[case(PackedLayout::L8, [0x80, 0x00, 0x00, 0x00], Color8888::new(0x80, 0x80, 0x80, 255))]
    #[case(PackedLayout::A8, [0x80, 0x00, 0x00, 0x00], Color8888::new(0, 0, 0, 0x80))]
    #[case(PackedLayout::LA88, [0x10, 0x20, 0x00, 0x00], Color8888::new(0x10, 0x10, 0x10, 0x20))]
    fn decodes_memory_bytes(
        #[case] layout: PackedLayout,
        #[case] bytes: [u8; 4],
        #[case] expected: Color8888,
    ) {
        let raw = layout.read_raw(&bytes);
        assert_eq!(layout.decode_pixel(raw), expected);
    }

    #[test]
    fn big_endian_reverses_bytes() {
        let layout = PackedLayout::RGB565.with_byte_order(ByteOrder::Big);
        assert_eq!(layout.read_raw(&[0xF8, 0x00]), 0xF800);
        let mut out = [0u8; 2];
        layout.write_raw(0xF800, &mut out);
        assert_eq!(out, [0xF8, 0x00]);
    }

    #[test]
    fn lookup_by_name() {
        assert_eq!(PackedLayout::by_name("abgr1555"), Some(PackedLayout::ABGR1555));
        assert_eq!(PackedLayout::by_name("nope"), None);
    }

    #[rstest]
    #[case(PixelFormatDescriptor::packed(PackedLayout::RGB888), 3, 3, Some(27))]
    #[case(PixelFormatDescriptor::paletted("i4", IndexLayout::INDEX4), 3, 2, Some(4))]
    #[case(PixelFormatDescriptor::block(BlockFormat::Bc1), 8, 8, Some(32))]
    #[case(PixelFormatDescriptor::crunched(CrunchVariant::Crn), 8, 8, None)]
    fn data_sizes(
        #[case] descriptor: PixelFormatDescriptor,
        #[case] width: u32,
        #[case] height: u32,
        #[case] expected: Option<u64>,
    ) {
        assert_eq!(descriptor.data_size(width, height), expected);
    }
}
