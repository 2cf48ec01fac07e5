//! Mipmap chain geometry.
//!
//! Some formats store a chain without saying how large its first level is, only how many
//! bytes are available. [`largest_fitting_level`] recovers the level to show; when a
//! header states the chain, [`mip_levels`] lays out every level.

use alloc::vec::Vec;
use texture_preview_common::{DecodeError, DecodeResult};

/// One level of a mipmap chain.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct MipLevel {
    /// Byte offset of the level from the start of the chain
    pub offset: u64,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Size of the level in bytes
    pub len: u64,
}

/// Finds the largest level, doubling both dimensions from `base_width` x `base_height`,
/// whose size per `size_fn` still fits in `budget` bytes.
///
/// Returns [`None`] when not even the base level fits.
pub fn largest_fitting_level(
    base_width: u32,
    base_height: u32,
    budget: u64,
    size_fn: impl Fn(u32, u32) -> u64,
) -> Option<(u32, u32)> {
    if base_width == 0 || base_height == 0 || size_fn(base_width, base_height) > budget {
        return None;
    }

    let (mut width, mut height) = (base_width, base_height);
    while let (Some(next_width), Some(next_height)) =
        (width.checked_mul(2), height.checked_mul(2))
    {
        if size_fn(next_width, next_height) > budget {
            break;
        }
        width = next_width;
        height = next_height;
    }
    Some((width, height))
}

/// Number of levels in a complete chain from `width` x `height` down to 1x1.
///
/// This is `floor(log2(max(width, height))) + 1`, so never more than 32. Zero sized images
/// have no levels.
#[inline]
pub fn full_chain_len(width: u32, height: u32) -> u32 {
    32 - width.max(height).leading_zeros()
}

/// Lays out `count` levels starting at `width` x `height`, halving each dimension per
/// level down to a minimum of 1. Levels are stored back to back.
///
/// `count` usually comes from a header, so it is clamped to [`full_chain_len`].
pub fn mip_levels(
    width: u32,
    height: u32,
    count: u32,
    size_fn: impl Fn(u32, u32) -> u64,
) -> DecodeResult<Vec<MipLevel>> {
    let count = count.min(full_chain_len(width, height));
    let mut levels = Vec::with_capacity(count as usize);
    let (mut width, mut height) = (width, height);
    let mut offset = 0u64;
    for _ in 0..count {
        let len = size_fn(width, height);
        levels.push(MipLevel {
            offset,
            width,
            height,
            len,
        });
        offset = offset
            .checked_add(len)
            .ok_or(DecodeError::AllocationTooLarge {
                requested: u64::MAX,
                limit: u64::MAX,
            })?;
        width = (width / 2).max(1);
        height = (height / 2).max(1);
    }
    Ok(levels)
}
