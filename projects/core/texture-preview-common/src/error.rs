//! Error types shared by every decoder.

use alloc::string::String;
use thiserror::Error;

/// Result type for decode operations
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Errors that can occur while parsing headers or decoding pixel data.
///
/// None of these are expected to escape the public preview entry points; they are
/// logged there and turned into an absent result.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// A read went past the end of the stream.
    #[error("Truncated stream: needed {needed} bytes at offset {offset}, only {available} available")]
    TruncatedStream {
        /// Offset the read started at
        offset: usize,
        /// Number of bytes the read required
        needed: usize,
        /// Number of bytes left from `offset`
        available: usize,
    },

    /// An absolute or relative seek landed outside the stream.
    #[error("Seek to {target} is outside of stream of length {len}")]
    SeekOutOfBounds {
        /// Absolute position the seek asked for
        target: i64,
        /// Length of the stream
        len: usize,
    },

    /// Width or height is zero or exceeds the configured bound.
    #[error("{format}: invalid dimensions {width}x{height}")]
    InvalidDimensions {
        /// Format being decoded
        format: &'static str,
        /// Width from the header
        width: u32,
        /// Height from the header
        height: u32,
    },

    /// A header field failed a range check.
    #[error("{format}: invalid {field} ({value})")]
    InvalidField {
        /// Format being decoded
        format: &'static str,
        /// Name of the offending field
        field: &'static str,
        /// Value that was read
        value: u64,
    },

    /// A buffer of the requested size would exceed the configured bound.
    #[error("Refusing to allocate {requested} pixels, limit is {limit}")]
    AllocationTooLarge {
        /// Size that was asked for
        requested: u64,
        /// Largest size the limits allow
        limit: u64,
    },

    /// A recognised container with a sub-format code that is not decoded.
    #[error("{format}: unknown format: {code}")]
    UnsupportedVariant {
        /// Format being decoded
        format: &'static str,
        /// Sub-format code from the header
        code: u32,
    },

    /// A paletted image could not find or load its palette.
    #[error("{format}: no palette available")]
    MissingPalette {
        /// Format being decoded
        format: &'static str,
    },

    /// An external codec rejected the data.
    #[error("{format}: codec error: {detail}")]
    Codec {
        /// Format being decoded
        format: &'static str,
        /// Message from the codec
        detail: String,
    },
}

impl DecodeError {
    /// Returns `true` for the errors that mean "the data ends early or points outside itself".
    pub fn is_truncation(&self) -> bool {
        matches!(
            self,
            DecodeError::TruncatedStream { .. } | DecodeError::SeekOutOfBounds { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn unsupported_variant_mentions_code() {
        let err = DecodeError::UnsupportedVariant {
            format: "tim2",
            code: 9,
        };
        assert_eq!(err.to_string(), "tim2: unknown format: 9");
    }

    #[test]
    fn truncation_classification() {
        let truncated = DecodeError::TruncatedStream {
            offset: 4,
            needed: 8,
            available: 2,
        };
        assert!(truncated.is_truncation());
        assert!(!DecodeError::MissingPalette { format: "raw" }.is_truncation());
    }
}
