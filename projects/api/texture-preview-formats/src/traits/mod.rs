//! The two halves of a format handler.
//!
//! [`FormatDetection`] answers "how confident are you that these bytes are yours" without
//! side effects, and [`FormatDecoder`] turns the bytes into frames once the
//! [`FormatRegistry`](crate::registry::FormatRegistry) has picked a winner.

pub(crate) mod format_decoder;
pub(crate) mod format_detection;

pub use format_decoder::*;
pub use format_detection::*;
