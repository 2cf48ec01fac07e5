//! Field validation performed before any pixel buffer is sized.
//!
//! The plain predicates (`is_*`) are used by format detection, where a failed check
//! simply lowers the confidence score. The `ensure_*` wrappers are used during decode and
//! produce a [`DecodeError`] naming the offending format and value.

use crate::error::{DecodeError, DecodeResult};
use likely_stable::unlikely;

/// Default upper bound for either image dimension.
pub const DEFAULT_MAX_DIMENSION: u32 = 16384;

/// Default upper bound for the number of pixels in a single image.
pub const DEFAULT_MAX_PIXELS: u64 = 64 * 1024 * 1024;

/// Bounds applied to untrusted header values before allocating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeLimits {
    /// Largest accepted width or height.
    pub max_dimension: u32,
    /// Largest accepted `width * height`.
    pub max_pixels: u64,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_dimension: DEFAULT_MAX_DIMENSION,
            max_pixels: DEFAULT_MAX_PIXELS,
        }
    }
}

impl DecodeLimits {
    /// Sets the largest accepted width or height.
    pub fn with_max_dimension(mut self, max_dimension: u32) -> Self {
        self.max_dimension = max_dimension;
        self
    }

    /// Sets the largest accepted pixel count.
    pub fn with_max_pixels(mut self, max_pixels: u64) -> Self {
        self.max_pixels = max_pixels;
        self
    }

    /// Checks `width` and `height` against these limits and returns the pixel count.
    pub fn ensure_dimensions(
        &self,
        format: &'static str,
        width: u32,
        height: u32,
    ) -> DecodeResult<usize> {
        if unlikely(!is_valid_dimension(width, self.max_dimension))
            || unlikely(!is_valid_dimension(height, self.max_dimension))
        {
            return Err(DecodeError::InvalidDimensions {
                format,
                width,
                height,
            });
        }

        let pixels = width as u64 * height as u64;
        if unlikely(pixels > self.max_pixels) {
            return Err(DecodeError::AllocationTooLarge {
                requested: pixels,
                limit: self.max_pixels,
            });
        }
        Ok(pixels as usize)
    }
}

/// `value` lies within `[min, max]`.
#[inline]
pub fn is_in_range(value: u64, min: u64, max: u64) -> bool {
    value >= min && value <= max
}

/// A dimension is valid when it is non-zero and does not exceed `max`.
#[inline]
pub fn is_valid_dimension(value: u32, max: u32) -> bool {
    value > 0 && value <= max
}

/// `[offset, offset + length)` lies inside a stream of `stream_len` bytes.
#[inline]
pub fn is_within_stream(offset: u64, length: u64, stream_len: u64) -> bool {
    offset
        .checked_add(length)
        .is_some_and(|end| end <= stream_len)
}

/// `value` is contained in `allowed`.
#[inline]
pub fn is_one_of<T: PartialEq>(value: T, allowed: &[T]) -> bool {
    allowed.contains(&value)
}

/// Fails with [`DecodeError::InvalidField`] unless `value` lies in `[min, max]`.
pub fn ensure_in_range(
    format: &'static str,
    field: &'static str,
    value: u64,
    min: u64,
    max: u64,
) -> DecodeResult<u64> {
    if unlikely(!is_in_range(value, min, max)) {
        return Err(DecodeError::InvalidField {
            format,
            field,
            value,
        });
    }
    Ok(value)
}

/// Fails with [`DecodeError::TruncatedStream`] unless `[offset, offset + length)` fits in
/// the stream.
pub fn ensure_within_stream(offset: u64, length: u64, stream_len: u64) -> DecodeResult<()> {
    if unlikely(!is_within_stream(offset, length, stream_len)) {
        return Err(DecodeError::TruncatedStream {
            offset: saturate(offset),
            needed: saturate(length),
            available: saturate(stream_len.saturating_sub(offset)),
        });
    }
    Ok(())
}

/// Multiplies the factors, failing with [`DecodeError::AllocationTooLarge`] on overflow.
///
/// Used for every `width * height * bytes_per_pixel` style size computation.
pub fn checked_size(factors: &[u64]) -> DecodeResult<u64> {
    factors.iter().try_fold(1u64, |acc, &factor| {
        acc.checked_mul(factor)
            .ok_or(DecodeError::AllocationTooLarge {
                requested: u64::MAX,
                limit: u64::MAX,
            })
    })
}

#[inline]
fn saturate(value: u64) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}
