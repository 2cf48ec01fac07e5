//! The panic-free entry point used by the browsing layer.

use crate::container::ContainerContext;
use crate::registry::FormatRegistry;
use texture_preview_common::{cursor::StreamCursor, raster::FrameChain};
use texture_preview_pixels::DecodeContext;
use tracing::{debug, warn};

/// A decoded entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    /// Identifier of the handler that decoded the entry
    pub format: &'static str,
    /// Decoded frames, the first being the one to show
    pub frames: FrameChain,
}

/// Identifies and decodes `data`.
///
/// Returns [`None`] when no handler recognises the data or the chosen handler fails; the
/// failure is logged with the handler and entry name. Never panics on malformed input.
pub fn preview(
    registry: &FormatRegistry,
    data: &[u8],
    container: &ContainerContext,
    ctx: &mut DecodeContext,
) -> Option<Preview> {
    let candidate = registry.identify(data, container)?;
    let decoder = registry.get(candidate.index)?;

    let mut cursor = StreamCursor::new(data);
    match decoder.decode(&mut cursor, container, ctx) {
        Ok(frames) => {
            debug!(
                format = candidate.id,
                frames = frames.len(),
                name = container.name(),
                "Decoded preview"
            );
            Some(Preview {
                format: candidate.id,
                frames,
            })
        }
        Err(err) => {
            warn!(
                format = candidate.id,
                name = container.name(),
                %err,
                "Failed to decode preview"
            );
            None
        }
    }
}
