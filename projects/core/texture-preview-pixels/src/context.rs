//! Per-session decode state: the palette store, allocation limits and the hook used to
//! lazily load palettes from a sibling resource.

use crate::palette::{Palette, PaletteStore};
use alloc::boxed::Box;
use core::fmt;
use texture_preview_common::{validate::DecodeLimits, DecodeError, DecodeResult};
use tracing::{debug, warn};

/// Supplies palettes that live outside the image being decoded, e.g. a per-title palette
/// table next to the texture inside an archive.
///
/// Implemented for any `FnMut(&mut PaletteStore) -> DecodeResult<()>`.
pub trait PaletteSource {
    /// Adds every palette this source knows about to `store`.
    fn load_palettes(&mut self, store: &mut PaletteStore) -> DecodeResult<()>;
}

impl<F> PaletteSource for F
where
    F: FnMut(&mut PaletteStore) -> DecodeResult<()>,
{
    fn load_palettes(&mut self, store: &mut PaletteStore) -> DecodeResult<()> {
        self(store)
    }
}

/// State shared by every decode within one archive browsing session.
///
/// Distinct archives use distinct contexts; nothing here is global.
#[derive(Default)]
pub struct DecodeContext {
    palettes: PaletteStore,
    limits: DecodeLimits,
    palette_source: Option<Box<dyn PaletteSource>>,
    palette_load_attempted: bool,
}

impl fmt::Debug for DecodeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodeContext")
            .field("palettes", &self.palettes)
            .field("limits", &self.limits)
            .field("has_palette_source", &self.palette_source.is_some())
            .field("palette_load_attempted", &self.palette_load_attempted)
            .finish()
    }
}

impl DecodeContext {
    /// Creates a context with default limits, no palettes and no palette source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the allocation limits.
    pub fn with_limits(mut self, limits: DecodeLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Sets the source consulted the first time a paletted decode finds the store empty.
    pub fn with_palette_source(mut self, source: impl PaletteSource + 'static) -> Self {
        self.palette_source = Some(Box::new(source));
        self
    }

    /// Allocation limits applied to every decode.
    #[inline]
    pub fn limits(&self) -> &DecodeLimits {
        &self.limits
    }

    /// The palette store.
    #[inline]
    pub fn palettes(&self) -> &PaletteStore {
        &self.palettes
    }

    /// Mutable access to the palette store, e.g. for formats with inline palettes.
    #[inline]
    pub fn palettes_mut(&mut self) -> &mut PaletteStore {
        &mut self.palettes
    }

    /// Clears the palette store and allows the palette source to be consulted again.
    pub fn reset_palettes(&mut self) {
        self.palettes.clear();
        self.palette_load_attempted = false;
    }

    /// Finds the palette for a paletted decode of `format`.
    ///
    /// When the store is empty the palette source is asked once to fill it. `palette_id`
    /// selects a palette explicitly; otherwise the store's current palette is used.
    pub fn resolve_palette(
        &mut self,
        format: &'static str,
        palette_id: Option<usize>,
    ) -> DecodeResult<&Palette> {
        if !self.palettes.has_palettes() && !self.palette_load_attempted {
            self.load_palettes(format);
        }

        let palette = match palette_id {
            Some(id) => self.palettes.get(id),
            None => self.palettes.current(),
        };
        match palette {
            Some(palette) => Ok(palette),
            None => {
                warn!(
                    format,
                    palette_id = ?palette_id,
                    loaded = self.palettes.count(),
                    "No palette available for paletted image"
                );
                Err(DecodeError::MissingPalette { format })
            }
        }
    }

    fn load_palettes(&mut self, format: &'static str) {
        self.palette_load_attempted = true;
        let Some(source) = self.palette_source.as_mut() else {
            debug!(format, "Palette store is empty and no palette source is set");
            return;
        };

        match source.load_palettes(&mut self.palettes) {
            Ok(()) => debug!(
                format,
                count = self.palettes.count(),
                "Lazily loaded palettes"
            ),
            Err(err) => warn!(format, %err, "Failed to load palettes"),
        }
    }
}
