//! Colour lookup tables and the per-session store that holds them.

use crate::descriptor::PackedLayout;
use alloc::vec::Vec;
use texture_preview_common::{
    color_8888::Color8888,
    validate::{checked_size, ensure_in_range, ensure_within_stream},
    DecodeResult,
};

/// Largest number of entries a palette can hold.
pub const MAX_PALETTE_ENTRIES: usize = 256;

/// An ordered table of up to 256 colours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    entries: Vec<Color8888>,
}

impl Palette {
    /// Wraps `entries`. Returns [`None`] if there are none or more than
    /// [`MAX_PALETTE_ENTRIES`].
    pub fn new(entries: Vec<Color8888>) -> Option<Self> {
        if entries.is_empty() || entries.len() > MAX_PALETTE_ENTRIES {
            return None;
        }
        Some(Self { entries })
    }

    /// Parses `count` consecutive packed colours from the start of `bytes`.
    pub fn from_packed(bytes: &[u8], layout: PackedLayout, count: usize) -> DecodeResult<Self> {
        ensure_in_range(
            "palette",
            "entry count",
            count as u64,
            1,
            MAX_PALETTE_ENTRIES as u64,
        )?;
        layout.ensure_valid()?;
        let bpp = layout.bytes_per_pixel as usize;
        let needed = checked_size(&[count as u64, bpp as u64])?;
        ensure_within_stream(0, needed, bytes.len() as u64)?;

        let entries = bytes[..needed as usize]
            .chunks_exact(bpp)
            .map(|raw| layout.decode_pixel(layout.read_raw(raw)))
            .collect();
        Ok(Self { entries })
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`; a palette holds at least one entry.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entries in index order.
    #[inline]
    pub fn entries(&self) -> &[Color8888] {
        &self.entries
    }

    /// Mutable entries, e.g. for alpha fixups after parsing.
    #[inline]
    pub fn entries_mut(&mut self) -> &mut [Color8888] {
        &mut self.entries
    }

    /// Colour for `index`. Out of range indices resolve to the last entry.
    #[inline(always)]
    pub fn lookup(&self, index: usize) -> Color8888 {
        let last = self.entries.len() - 1;
        self.entries[index.min(last)]
    }

    /// Reorders a 256 entry PS2 CLUT stored in CSM1 order into linear order.
    ///
    /// CSM1 stores entries in 8 entry strips where strips 1 and 2 of every 32 are
    /// exchanged, which amounts to swapping bits 3 and 4 of the index. Palettes of any
    /// other size are left untouched.
    pub fn unswizzle_ps2_clut(&mut self) {
        if self.entries.len() != MAX_PALETTE_ENTRIES {
            return;
        }
        for index in 0..MAX_PALETTE_ENTRIES {
            if index & 0x18 == 0x08 {
                self.entries.swap(index, index ^ 0x18);
            }
        }
    }
}

/// Ordered palettes plus a cursor selecting the current one.
///
/// One store lives in each [`DecodeContext`](crate::context::DecodeContext), so
/// palettes loaded while browsing one archive never leak into another.
#[derive(Debug, Clone, Default)]
pub struct PaletteStore {
    palettes: Vec<Palette>,
    current: usize,
}

impl PaletteStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes every palette and resets the cursor.
    pub fn clear(&mut self) {
        self.palettes.clear();
        self.current = 0;
    }

    /// Appends a palette and returns its index.
    pub fn add_palette(&mut self, palette: Palette) -> usize {
        self.palettes.push(palette);
        self.palettes.len() - 1
    }

    /// Selects the palette at `index`. Returns `false` and keeps the previous selection
    /// when no such palette exists.
    pub fn set_current(&mut self, index: usize) -> bool {
        if index >= self.palettes.len() {
            return false;
        }
        self.current = index;
        true
    }

    /// Index of the selected palette.
    #[inline]
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The selected palette, if the store holds any.
    pub fn current(&self) -> Option<&Palette> {
        self.palettes.get(self.current)
    }

    /// The palette at `index`.
    pub fn get(&self, index: usize) -> Option<&Palette> {
        self.palettes.get(index)
    }

    /// Whether at least one palette is loaded.
    #[inline]
    pub fn has_palettes(&self) -> bool {
        !self.palettes.is_empty()
    }

    /// Number of loaded palettes.
    #[inline]
    pub fn count(&self) -> usize {
        self.palettes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    fn greys(count: usize) -> Palette {
        Palette::new((0..count).map(|i| Color8888::grey(i as u8)).collect()).unwrap()
    }

    #[rstest]
    #[case(0, false)]
    #[case(1, true)]
    #[case(256, true)]
    #[case(257, false)]
    fn entry_count_bounds(#[case] count: usize, #[case] ok: bool) {
        let entries = vec![Color8888::TRANSPARENT; count];
        assert_eq!(Palette::new(entries).is_some(), ok);
    }

    #[test]
    fn lookup_clamps_to_last_entry() {
        let palette = greys(4);
        assert_eq!(palette.lookup(2), Color8888::grey(2));
        assert_eq!(palette.lookup(200), Color8888::grey(3));
    }

    #[test]
    fn parses_packed_entries() {
        let bytes = [0x1F, 0x80, 0x00, 0x7C];
        let palette = Palette::from_packed(&bytes, PackedLayout::ABGR1555, 2).unwrap();
        assert_eq!(palette.entries()[0], Color8888::new(255, 0, 0, 255));
        assert_eq!(palette.entries()[1], Color8888::new(0, 0, 255, 0));
    }

    #[test]
    fn short_palette_data_is_truncation() {
        let err = Palette::from_packed(&[0u8; 7], PackedLayout::RGBA8888, 2).unwrap_err();
        assert!(err.is_truncation());
        let err = Palette::from_packed(&[0u8; 4], PackedLayout::RGBA8888, 0).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidField { .. }));
    }

    #[rstest]
    #[case(0)]
    #[case(8)]
    fn bad_entry_size_is_an_error(#[case] bytes_per_pixel: u8) {
        let layout = PackedLayout {
            bytes_per_pixel,
            ..PackedLayout::ABGR1555
        };
        let err = Palette::from_packed(&[0u8; 64], layout, 4).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::InvalidField {
                field: "bytes per pixel",
                ..
            }
        ));
    }

    #[test]
    fn ps2_clut_swaps_middle_strips() {
        let mut palette = greys(256);
        palette.unswizzle_ps2_clut();
        assert_eq!(palette.lookup(7), Color8888::grey(7));
        assert_eq!(palette.lookup(8), Color8888::grey(16));
        assert_eq!(palette.lookup(16), Color8888::grey(8));
        assert_eq!(palette.lookup(31), Color8888::grey(31));
        assert_eq!(palette.lookup(0x28), Color8888::grey(0x30));

        // Applying it twice restores the original order.
        palette.unswizzle_ps2_clut();
        assert_eq!(palette, greys(256));
    }

    #[test]
    fn small_clut_is_not_reordered() {
        let mut palette = greys(16);
        palette.unswizzle_ps2_clut();
        assert_eq!(palette, greys(16));
    }

    #[test]
    fn store_tracks_current_palette() {
        let mut store = PaletteStore::new();
        assert!(!store.has_palettes());
        assert!(store.current().is_none());

        assert_eq!(store.add_palette(greys(2)), 0);
        assert_eq!(store.add_palette(greys(3)), 1);
        assert_eq!(store.count(), 2);
        assert_eq!(store.current().map(Palette::len), Some(2));

        assert!(store.set_current(1));
        assert_eq!(store.current().map(Palette::len), Some(3));
        assert!(!store.set_current(5));
        assert_eq!(store.current_index(), 1);
        assert_eq!(store.get(0).map(Palette::len), Some(2));

        store.clear();
        assert_eq!(store.count(), 0);
        assert_eq!(store.current_index(), 0);
    }
}
