//! BC7 decoding, modes 0 through 7.
//!
//! A block is read as a 128-bit little endian integer, LSB first. The mode is given by
//! the number of trailing zero bits in the first byte; a first byte of zero is a reserved
//! mode and decodes to transparent black.

use super::bc7_tables::*;
use texture_preview_common::{color_8888::Color8888, decoded_4x4_block::Decoded4x4Block};

struct BitReader {
    bits: u128,
    pos: u32,
}

impl BitReader {
    #[inline(always)]
    fn read(&mut self, count: u32) -> u32 {
        if count == 0 {
            return 0;
        }
        let value = (self.bits >> self.pos) & ((1u128 << count) - 1);
        self.pos += count;
        value as u32
    }
}

/// Expands a `bits` wide endpoint to 8 bits by replicating its top bits.
#[inline(always)]
fn unquantize(value: u32, bits: u32) -> u8 {
    let shifted = value << (8 - bits);
    (shifted | (shifted >> bits)) as u8
}

#[inline(always)]
fn interpolate(e0: u8, e1: u8, weight: u32) -> u8 {
    (((64 - weight) * e0 as u32 + weight * e1 as u32 + 32) >> 6) as u8
}

#[inline(always)]
fn weight(index_bits: u32, index: u32) -> u32 {
    match index_bits {
        2 => WEIGHTS_2[index as usize & 3],
        3 => WEIGHTS_3[index as usize & 7],
        _ => WEIGHTS_4[index as usize & 15],
    }
}

#[inline(always)]
fn subset_of(mode: &Bc7Mode, partition: usize, pixel: usize) -> usize {
    match mode.subsets {
        2 => ((PARTITIONS_2[partition] >> pixel) & 1) as usize,
        3 => PARTITIONS_3[partition][pixel] as usize,
        _ => 0,
    }
}

#[inline(always)]
fn is_anchor(mode: &Bc7Mode, partition: usize, pixel: usize) -> bool {
    pixel == 0
        || match mode.subsets {
            2 => pixel == ANCHORS_2[partition] as usize,
            3 => pixel == ANCHORS_3A[partition] as usize || pixel == ANCHORS_3B[partition] as usize,
            _ => false,
        }
}

/// Decodes a BC7 block into a structured representation of pixels
///
/// # Example
///
/// ```
/// use texture_preview_bc::util::decode_bc7_block;
///
/// // Mode 6, all endpoints and indices zero.
/// let mut block = [0u8; 16];
/// block[0] = 0x40;
/// let decoded = decode_bc7_block(&block);
/// assert!(decoded.has_identical_pixels());
/// ```
pub fn decode_bc7_block(src: &[u8; 16]) -> Decoded4x4Block {
    let mode_index = src[0].trailing_zeros() as usize;
    let Some(mode) = MODES.get(mode_index) else {
        return Decoded4x4Block::new(Color8888::TRANSPARENT);
    };

    let mut reader = BitReader {
        bits: u128::from_le_bytes(*src),
        pos: mode_index as u32 + 1,
    };
    let partition = reader.read(mode.partition_bits) as usize;
    let rotation = reader.read(mode.rotation_bits);
    let index_selection = reader.read(mode.index_selection_bits);

    // endpoints[subset][endpoint][channel], raw quantized values
    let mut endpoints = [[[0u32; 4]; 2]; 3];
    for channel in 0..3 {
        for subset in endpoints.iter_mut().take(mode.subsets) {
            for endpoint in subset.iter_mut() {
                endpoint[channel] = reader.read(mode.colour_bits);
            }
        }
    }
    if mode.alpha_bits > 0 {
        for subset in endpoints.iter_mut().take(mode.subsets) {
            for endpoint in subset.iter_mut() {
                endpoint[3] = reader.read(mode.alpha_bits);
            }
        }
    }

    let mut pbits = [[0u32; 2]; 3];
    if mode.endpoint_pbits {
        for subset in pbits.iter_mut().take(mode.subsets) {
            subset[0] = reader.read(1);
            subset[1] = reader.read(1);
        }
    } else if mode.shared_pbits {
        for subset in pbits.iter_mut().take(mode.subsets) {
            let shared = reader.read(1);
            *subset = [shared, shared];
        }
    }

    let has_pbits = mode.endpoint_pbits || mode.shared_pbits;
    let colour_precision = mode.colour_bits + has_pbits as u32;
    let alpha_precision = mode.alpha_bits + has_pbits as u32;

    let mut colours = [[Color8888::TRANSPARENT; 2]; 3];
    for subset in 0..mode.subsets {
        for endpoint in 0..2 {
            let raw = endpoints[subset][endpoint];
            let pbit = pbits[subset][endpoint];
            let channel = |value: u32| {
                if has_pbits {
                    unquantize((value << 1) | pbit, colour_precision)
                } else {
                    unquantize(value, colour_precision)
                }
            };
            let alpha = if mode.alpha_bits == 0 {
                255
            } else if has_pbits {
                unquantize((raw[3] << 1) | pbit, alpha_precision)
            } else {
                unquantize(raw[3], alpha_precision)
            };
            colours[subset][endpoint] =
                Color8888::new(channel(raw[0]), channel(raw[1]), channel(raw[2]), alpha);
        }
    }

    let mut primary = [0u32; 16];
    for (pixel, index) in primary.iter_mut().enumerate() {
        let bits = mode.index_bits - is_anchor(mode, partition, pixel) as u32;
        *index = reader.read(bits);
    }
    let mut secondary = [0u32; 16];
    if mode.secondary_index_bits > 0 {
        for (pixel, index) in secondary.iter_mut().enumerate() {
            let bits = mode.secondary_index_bits - (pixel == 0) as u32;
            *index = reader.read(bits);
        }
    }

    let mut result = Decoded4x4Block::default();
    for (pixel, out) in result.pixels.iter_mut().enumerate() {
        let subset = subset_of(mode, partition, pixel);
        let [e0, e1] = colours[subset];

        let (colour_weight, alpha_weight) = if mode.secondary_index_bits == 0 {
            let w = weight(mode.index_bits, primary[pixel]);
            (w, w)
        } else if index_selection == 0 {
            (
                weight(mode.index_bits, primary[pixel]),
                weight(mode.secondary_index_bits, secondary[pixel]),
            )
        } else {
            (
                weight(mode.secondary_index_bits, secondary[pixel]),
                weight(mode.index_bits, primary[pixel]),
            )
        };

        let mut colour = Color8888::new(
            interpolate(e0.r, e1.r, colour_weight),
            interpolate(e0.g, e1.g, colour_weight),
            interpolate(e0.b, e1.b, colour_weight),
            interpolate(e0.a, e1.a, alpha_weight),
        );
        match rotation {
            1 => core::mem::swap(&mut colour.a, &mut colour.r),
            2 => core::mem::swap(&mut colour.a, &mut colour.g),
            3 => core::mem::swap(&mut colour.a, &mut colour.b),
            _ => {}
        }
        *out = colour;
    }
    result
}

/// Safely wraps [`decode_bc7_block`] for use with slices
///
/// # Returns
///
/// A decoded block, else [`None`] if the slice is too short.
#[inline]
pub fn decode_bc7_block_from_slice(src: &[u8]) -> Option<Decoded4x4Block> {
    let block: &[u8; 16] = src.get(..16)?.try_into().ok()?;
    Some(decode_bc7_block(block))
}
