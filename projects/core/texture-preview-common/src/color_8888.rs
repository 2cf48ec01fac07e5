//! The canonical 32-bit RGBA pixel every decoder converges to.

/// Represents a single RGBA8888 pixel color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[repr(C)]
pub struct Color8888 {
    /// Red component (0-255)
    pub r: u8,
    /// Green component (0-255)
    pub g: u8,
    /// Blue component (0-255)
    pub b: u8,
    /// Alpha component (0-255)
    pub a: u8,
}

impl Color8888 {
    /// Fully transparent black, used for invalid blocks and punch-through pixels.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    /// Constructs a new [`Color8888`] from the specified red, green, blue, and alpha components.
    ///
    /// Each parameter represents the intensity of its corresponding colour channel (0–255).
    ///
    /// # Examples
    ///
    /// ```
    /// use texture_preview_common::color_8888::Color8888;
    ///
    /// let pixel = Color8888::new(255, 0, 0, 255);
    /// assert_eq!(pixel.r, 255);
    /// assert_eq!(pixel.a, 255);
    /// ```
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque grey pixel with all colour channels set to `value`.
    #[inline]
    pub const fn grey(value: u8) -> Self {
        Self::new(value, value, value, 255)
    }

    /// Returns a copy of this pixel with alpha forced to zero.
    /// Useful for comparing colours while ignoring transparency.
    #[inline]
    pub const fn without_alpha(&self) -> Self {
        Self::new(self.r, self.g, self.b, 0)
    }

    /// Returns a copy of this pixel with the alpha component replaced.
    #[inline]
    pub const fn with_alpha(&self, a: u8) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    /// Packs the pixel as `0xAABBGGRR`, i.e. `[r, g, b, a]` in little endian memory order.
    #[inline]
    pub const fn to_u32(&self) -> u32 {
        u32::from_le_bytes([self.r, self.g, self.b, self.a])
    }

    /// Inverse of [`Self::to_u32`].
    #[inline]
    pub const fn from_u32(value: u32) -> Self {
        let [r, g, b, a] = value.to_le_bytes();
        Self::new(r, g, b, a)
    }
}

/// Expands an unsigned `bits`-wide channel value to 8 bits by replicating its top bits
/// into the vacated low bits, so that the maximum input maps to 255.
///
/// A zero-width channel expands to 0; values wider than 8 bits are truncated to their
/// top 8 bits.
///
/// ```
/// use texture_preview_common::color_8888::expand_channel;
///
/// assert_eq!(expand_channel(0b11111, 5), 255);
/// assert_eq!(expand_channel(0b1, 1), 255);
/// assert_eq!(expand_channel(0x8, 4), 0x88);
/// ```
#[inline]
pub const fn expand_channel(value: u32, bits: u32) -> u8 {
    match bits {
        0 => 0,
        8 => value as u8,
        9..=31 => (value >> (bits - 8)) as u8,
        32.. => (value >> 24) as u8,
        _ => {
            let value = value & ((1 << bits) - 1);
            let mut result = 0u32;
            let mut filled = 0u32;
            // Repeat the source pattern from the MSB downwards until all 8 bits are set.
            while filled < 8 {
                let shift = 8 - filled as i32 - bits as i32;
                if shift >= 0 {
                    result |= value << (shift as u32);
                } else {
                    result |= value >> ((-shift) as u32);
                }
                filled += bits;
            }
            (result & 0xFF) as u8
        }
    }
}
