//! Trait for scoring how likely an input is a given format.

use crate::container::ContainerContext;
use texture_preview_common::{cursor::StreamCursor, DecodeResult};

/// Confidence scoring for one format.
///
/// ***Important***: Scoring runs on every input the registry sees, most of which belong to
/// other formats. Read through the cursor only, treat every header value as untrusted and
/// never allocate based on one.
pub trait FormatDetection {
    /// Unique identifier, e.g. `"dds"`.
    fn id(&self) -> &'static str;

    /// Human readable description.
    fn description(&self) -> &'static str;

    /// Extensions (lowercase, without leading dot) this format is stored under.
    ///
    /// When non-empty, entries with any other extension are never offered to this format.
    fn supported_extensions(&self) -> &[&str] {
        &[]
    }

    /// Archive type this format only appears in.
    ///
    /// When set, entries from any other container are never offered to this format.
    fn expected_container(&self) -> Option<&str> {
        None
    }

    /// Additive confidence that the bytes under `cursor` are this format.
    ///
    /// Returns 0 when a hard precondition such as the magic fails. The cursor is a fresh
    /// copy positioned at the start of the entry; moving it has no effect on other
    /// formats. Errors are treated as a score of 0.
    fn score(
        &self,
        cursor: &mut StreamCursor<'_>,
        container: &ContainerContext,
    ) -> DecodeResult<u32>;
}
