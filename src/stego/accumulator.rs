// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Packing bits into bytes and back.
//!
//! [`BitAccumulator`] groups a bit stream into 8-bit bytes in the configured
//! [`BitOrder`]. When the stream ends with fewer than eight bits left, those
//! trailing bits are discarded: no padded or partial byte is produced. The
//! number of discarded bits is available from
//! [`BitAccumulator::trailing_bits`] once the iterator is exhausted.

use crate::stego::config::BitOrder;
use crate::stego::error::StegoError;

/// Iterator adapter from bits to bytes.
pub struct BitAccumulator<I> {
    bits: I,
    order: BitOrder,
    consumed: usize,
    trailing: u8,
    done: bool,
}

impl<I> BitAccumulator<I>
where
    I: Iterator<Item = Result<u8, StegoError>>,
{
    pub fn new(bits: I, order: BitOrder) -> Self {
        Self { bits, order, consumed: 0, trailing: 0, done: false }
    }

    /// Bits pulled from the underlying stream so far, including discarded ones.
    pub fn bits_consumed(&self) -> usize {
        self.consumed
    }

    /// Bits dropped at the end of the stream (0..8). Zero until the stream
    /// has run out.
    pub fn trailing_bits(&self) -> u8 {
        self.trailing
    }
}

impl<I> Iterator for BitAccumulator<I>
where
    I: Iterator<Item = Result<u8, StegoError>>,
{
    type Item = Result<u8, StegoError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let mut byte = 0u8;
        for i in 0..8u8 {
            match self.bits.next() {
                Some(Ok(bit)) => {
                    self.consumed += 1;
                    let shift = match self.order {
                        BitOrder::MsbFirst => 7 - i,
                        BitOrder::LsbFirst => i,
                    };
                    byte |= (bit & 1) << shift;
                }
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e));
                }
                None => {
                    self.done = true;
                    self.trailing = i;
                    return None;
                }
            }
        }
        Some(Ok(byte))
    }
}

/// Split bytes into bits in the given order (one bit per output byte).
pub fn bytes_to_bits(bytes: &[u8], order: BitOrder) -> Vec<u8> {
    let mut bits = Vec::with_capacity(bytes.len() * 8);
    for &byte in bytes {
        for i in 0..8u8 {
            let shift = match order {
                BitOrder::MsbFirst => 7 - i,
                BitOrder::LsbFirst => i,
            };
            bits.push((byte >> shift) & 1);
        }
    }
    bits
}

/// Pack a complete bit slice into bytes, dropping any trailing partial byte.
pub fn bits_to_bytes(bits: &[u8], order: BitOrder) -> Vec<u8> {
    bits.chunks_exact(8)
        .map(|chunk| {
            chunk.iter().enumerate().fold(0u8, |byte, (i, &bit)| {
                let shift = match order {
                    BitOrder::MsbFirst => 7 - i,
                    BitOrder::LsbFirst => i,
                };
                byte | ((bit & 1) << shift)
            })
        })
        .collect()
}
