//! The ordered set of format handlers and the uniform scoring applied to them.

use crate::container::ContainerContext;
use crate::traits::FormatDecoder;
use alloc::boxed::Box;
use alloc::vec::Vec;
use texture_preview_common::cursor::StreamCursor;
use tracing::debug;

/// Added to a format's own score when the entry's extension is one it lists.
pub const EXTENSION_MATCH_BONUS: u32 = 25;

/// Added to a format's own score when the entry comes from the container it expects.
pub const CONTAINER_MATCH_BONUS: u32 = 50;

/// A format that scored above zero for an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FormatCandidate {
    /// Registration index of the format
    pub index: usize,
    /// Identifier of the format
    pub id: &'static str,
    /// Total score including extension and container bonuses
    pub score: u32,
}

/// Format handlers in registration order.
///
/// Every handler is scored against its own fresh cursor; the highest score wins and ties
/// go to the handler registered first, so dispatch is deterministic for a given
/// registration order.
#[derive(Default)]
pub struct FormatRegistry {
    decoders: Vec<Box<dyn FormatDecoder + Send + Sync>>,
}

impl core::fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list()
            .entries(self.decoders.iter().map(|decoder| decoder.id()))
            .finish()
    }
}

impl FormatRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in format.
    pub fn with_builtin_formats() -> Self {
        let mut registry = Self::new();
        crate::formats::register_builtin_formats(&mut registry);
        registry
    }

    /// Appends a handler. Handlers registered earlier win ties.
    ///
    /// Handlers are shared between threads when a batch is decoded in parallel.
    pub fn register(&mut self, decoder: impl FormatDecoder + Send + Sync + 'static) -> &mut Self {
        self.decoders.push(Box::new(decoder));
        self
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    /// Whether no handlers are registered.
    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }

    /// The handler registered at `index`.
    pub fn get(&self, index: usize) -> Option<&dyn FormatDecoder> {
        self.decoders
            .get(index)
            .map(|decoder| decoder.as_ref() as &dyn FormatDecoder)
    }

    /// The handler with identifier `id`.
    pub fn find(&self, id: &str) -> Option<&dyn FormatDecoder> {
        self.decoders
            .iter()
            .find(|decoder| decoder.id() == id)
            .map(|decoder| decoder.as_ref() as &dyn FormatDecoder)
    }

    /// Identifiers of every handler in registration order.
    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.decoders.iter().map(|decoder| decoder.id())
    }

    /// Picks the best scoring handler for `data`, or [`None`] when nothing scores above
    /// zero.
    pub fn identify(&self, data: &[u8], container: &ContainerContext) -> Option<FormatCandidate> {
        let mut best: Option<FormatCandidate> = None;
        for (index, decoder) in self.decoders.iter().enumerate() {
            let score = score(decoder.as_ref(), data, container);
            // Strictly greater, so the first registered handler keeps a tie.
            if score > best.map_or(0, |candidate| candidate.score) {
                best = Some(FormatCandidate {
                    index,
                    id: decoder.id(),
                    score,
                });
            }
        }

        match best {
            Some(candidate) => debug!(
                format = candidate.id,
                score = candidate.score,
                name = container.name(),
                "Selected format"
            ),
            None => debug!(name = container.name(), "No format matched"),
        }
        best
    }

    /// Every handler scoring above zero for `data`, best first. Ties keep registration
    /// order.
    pub fn identify_all(&self, data: &[u8], container: &ContainerContext) -> Vec<FormatCandidate> {
        let mut candidates: Vec<FormatCandidate> = self
            .decoders
            .iter()
            .enumerate()
            .filter_map(|(index, decoder)| {
                let score = score(decoder.as_ref(), data, container);
                (score > 0).then_some(FormatCandidate {
                    index,
                    id: decoder.id(),
                    score,
                })
            })
            .collect();
        candidates.sort_by(|a, b| b.score.cmp(&a.score));
        candidates
    }
}

/// Scores one handler against `data` with the registry's uniform rules applied.
///
/// A handler listing extensions is disqualified when the entry's extension is not among
/// them, and one expecting a container is disqualified when the entry comes from
/// elsewhere. Matches add [`EXTENSION_MATCH_BONUS`] and [`CONTAINER_MATCH_BONUS`] to a
/// non-zero handler score. Errors count as zero.
pub fn score(decoder: &dyn FormatDecoder, data: &[u8], container: &ContainerContext) -> u32 {
    let mut bonus = 0u32;

    let extensions = decoder.supported_extensions();
    if !extensions.is_empty() {
        let listed = container
            .extension()
            .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)));
        if !listed {
            return 0;
        }
        bonus += EXTENSION_MATCH_BONUS;
    }

    if let Some(expected) = decoder.expected_container() {
        if container.container() != Some(expected) {
            return 0;
        }
        bonus += CONTAINER_MATCH_BONUS;
    }

    let mut cursor = StreamCursor::new(data);
    let score = match decoder.score(&mut cursor, container) {
        Ok(0) => 0,
        Ok(score) => score.saturating_add(bonus),
        Err(err) => {
            debug!(format = decoder.id(), %err, "Scoring failed");
            0
        }
    };
    debug!(format = decoder.id(), score, "Scored format");
    score
}
