// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Byte-to-text decoding with a termination policy.
//!
//! Each byte maps to the Unicode code point of the same value (Latin-1),
//! one character per byte. The decoder pulls bytes lazily, so a fixed-length
//! or sentinel policy stops the underlying grid scan as soon as it is
//! satisfied.

use crate::stego::accumulator::BitAccumulator;
use crate::stego::config::{ExtractionConfig, Termination};
use crate::stego::error::StegoError;

/// Why decoding stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The fixed character count was reached.
    LengthReached,
    /// A sentinel byte was read; it is not part of the text.
    SentinelFound,
    /// The stream ran out first. `trailing_bits` (0..8) were left over and
    /// dropped.
    Exhausted { trailing_bits: u8 },
}

impl Completion {
    /// Stopped because the termination policy was satisfied.
    pub fn by_policy(&self) -> bool {
        !self.by_exhaustion()
    }

    /// Stopped because the stream ran out.
    pub fn by_exhaustion(&self) -> bool {
        matches!(self, Self::Exhausted { .. })
    }
}

/// Result of a decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedMessage {
    pub text: String,
    /// Bits pulled from the stream, including a sentinel byte and any
    /// dropped trailing bits.
    pub bits_consumed: usize,
    pub completion: Completion,
}

/// Applies a [`Termination`] policy to a byte stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageDecoder {
    termination: Termination,
    printable_only: bool,
}

impl MessageDecoder {
    pub fn new(termination: Termination, printable_only: bool) -> Self {
        Self { termination, printable_only }
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new(config.termination, config.printable_only)
    }

    /// Decode from a bit accumulator, stopping as soon as the policy allows.
    pub fn decode<I>(&self, bytes: &mut BitAccumulator<I>) -> Result<DecodedMessage, StegoError>
    where
        I: Iterator<Item = Result<u8, StegoError>>,
    {
        let (text, stop) = self.run(&mut *bytes)?;
        let completion = stop.unwrap_or(Completion::Exhausted { trailing_bits: bytes.trailing_bits() });
        Ok(DecodedMessage { text, bits_consumed: bytes.bits_consumed(), completion })
    }

    /// Decode an already assembled byte sequence.
    pub fn decode_bytes(&self, bytes: &[u8]) -> Result<DecodedMessage, StegoError> {
        let mut iter = bytes.iter().map(|&b| Ok(b));
        let (text, stop) = self.run(&mut iter)?;
        let read = bytes.len() - iter.len();
        Ok(DecodedMessage {
            text,
            bits_consumed: read * 8,
            completion: stop.unwrap_or(Completion::Exhausted { trailing_bits: 0 }),
        })
    }

    /// Returns the text and the policy stop, or `None` if the bytes ran out.
    fn run<I>(&self, bytes: &mut I) -> Result<(String, Option<Completion>), StegoError>
    where
        I: Iterator<Item = Result<u8, StegoError>>,
    {
        let limit = match self.termination {
            Termination::FixedLength(n) => Some(n),
            _ => None,
        };
        let mut text = String::new();
        if limit == Some(0) {
            return Ok((text, Some(Completion::LengthReached)));
        }

        let mut chars = 0usize;
        for (index, byte) in bytes.enumerate() {
            let byte = byte?;
            if self.termination == Termination::Sentinel(byte) {
                return Ok((text, Some(Completion::SentinelFound)));
            }
            if self.printable_only && !is_printable(byte) {
                return Err(StegoError::NonPrintableByte { index, byte });
            }
            text.push(char::from(byte));
            chars += 1;
            if limit == Some(chars) {
                return Ok((text, Some(Completion::LengthReached)));
            }
        }
        Ok((text, None))
    }
}

/// Printable Latin-1: graphic ASCII, tab, newline, carriage return and
/// 0xA0..=0xFF.
pub fn is_printable(byte: u8) -> bool {
    matches!(byte, b'\t' | b'\n' | b'\r' | 0x20..=0x7E | 0xA0..=0xFF)
}
