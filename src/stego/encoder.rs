// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Payload embedding.
//!
//! The encoder is the inverse of reader → accumulator → decoder: the payload
//! is converted to one byte per character, split into bits in the configured
//! [`BitOrder`](crate::stego::config::BitOrder), and written into the chosen
//! bit of each scanned channel in the same scan order the reader uses.
//!
//! Everything is validated before the first write (characters, capacity, and
//! the range of every sample about to be modified), so a failed
//! [`StegoEncoder::encode_in_place`] leaves the grid untouched.

use crate::grid::PixelGrid;
use crate::stego::accumulator::bytes_to_bits;
use crate::stego::config::{ExtractionConfig, Termination};
use crate::stego::error::StegoError;
use crate::stego::reader::{checked_sample, PixelStreamReader, Position};

/// How the embedded message is delimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminator {
    /// Nothing after the payload.
    None,
    /// Append this byte. Payloads containing it are rejected.
    Sentinel(u8),
    /// Write exactly this many bytes: the payload is truncated to that many
    /// characters and padded with NUL bytes.
    FixedLength(usize),
}

impl From<Termination> for Terminator {
    fn from(t: Termination) -> Self {
        match t {
            Termination::FixedLength(n) => Self::FixedLength(n),
            Termination::Sentinel(b) => Self::Sentinel(b),
            Termination::Exhaust => Self::None,
        }
    }
}

impl Terminator {
    /// Bytes written for a payload of `chars` characters.
    pub fn encoded_len(&self, chars: usize) -> usize {
        match self {
            Self::None => chars,
            Self::Sentinel(_) => chars + 1,
            Self::FixedLength(n) => *n,
        }
    }
}

/// Writes payloads into a grid's bit-plane.
#[derive(Debug, Clone)]
pub struct StegoEncoder {
    config: ExtractionConfig,
    terminator: Option<Terminator>,
    zero_remainder: bool,
}

impl StegoEncoder {
    pub fn new(config: ExtractionConfig) -> Self {
        Self { config, terminator: None, zero_remainder: false }
    }

    /// Override the terminator derived from the config's termination policy.
    pub fn terminator(mut self, terminator: Terminator) -> Self {
        self.terminator = Some(terminator);
        self
    }

    /// Clear the chosen bit of every scanned channel after the payload.
    pub fn zero_remainder(mut self, zero: bool) -> Self {
        self.zero_remainder = zero;
        self
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// The terminator actually used: the explicit one, or the one matching
    /// the config's termination policy.
    pub fn effective_terminator(&self) -> Terminator {
        self.terminator.unwrap_or_else(|| self.config.termination.into())
    }

    /// Convert the payload to the exact byte sequence that will be embedded.
    ///
    /// # Errors
    /// [`StegoError::UnencodableCharacter`] if a character's code point is
    /// above 255, or equals the sentinel byte.
    pub fn payload_bytes(&self, payload: &str) -> Result<Vec<u8>, StegoError> {
        let terminator = self.effective_terminator();
        let take = match terminator {
            Terminator::FixedLength(n) => n,
            _ => usize::MAX,
        };

        let mut bytes = Vec::with_capacity(payload.len() + 1);
        for (index, ch) in payload.chars().take(take).enumerate() {
            let byte = u8::try_from(u32::from(ch))
                .map_err(|_| StegoError::UnencodableCharacter { index, ch })?;
            if terminator == Terminator::Sentinel(byte) {
                return Err(StegoError::UnencodableCharacter { index, ch });
            }
            bytes.push(byte);
        }

        match terminator {
            Terminator::None => {}
            Terminator::Sentinel(b) => bytes.push(b),
            Terminator::FixedLength(n) => bytes.resize(n, 0),
        }
        Ok(bytes)
    }

    /// Encode into a copy of `grid`.
    pub fn encode(&self, grid: &PixelGrid, payload: &str) -> Result<PixelGrid, StegoError> {
        let mut out = grid.clone();
        self.encode_in_place(&mut out, payload)?;
        Ok(out)
    }

    /// Encode into a caller-owned grid. Returns the number of payload bits
    /// written.
    ///
    /// # Errors
    /// - [`StegoError::InvalidConfig`] if the config does not fit the grid.
    /// - [`StegoError::UnencodableCharacter`] for characters above U+00FF.
    /// - [`StegoError::InsufficientCapacity`] if payload plus terminator
    ///   needs more bits than the grid scans.
    /// - [`StegoError::InvalidPixelValue`] if a sample to be written is out
    ///   of range for the grid's bit depth.
    pub fn encode_in_place(&self, grid: &mut PixelGrid, payload: &str) -> Result<usize, StegoError> {
        let bytes = self.payload_bytes(payload)?;
        let bits = bytes_to_bits(&bytes, self.config.bit_order);

        let reader = PixelStreamReader::new(grid, &self.config)?;
        let available = reader.len();
        if bits.len() > available {
            return Err(StegoError::InsufficientCapacity { required_bits: bits.len(), available_bits: available });
        }

        let touched = if self.zero_remainder { available } else { bits.len() };
        let positions: Vec<Position> = reader.positions().take(touched).collect();
        for &pos in &positions {
            checked_sample(grid, pos)?;
        }

        let shift = reader.bit_position();
        let mask = 1i64 << shift;
        let samples = grid.samples_mut();
        for (i, pos) in positions.iter().enumerate() {
            let bit = i64::from(bits.get(i).copied().unwrap_or(0));
            let s = &mut samples[pos.index];
            *s = (*s & !mask) | (bit << shift);
        }
        Ok(bits.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::BitDepth;
    use crate::stego::config::{BitOrder, Channels};

    fn exhaust() -> ExtractionConfig {
        ExtractionConfig { termination: Termination::Exhaust, ..Default::default() }
    }

    #[test]
    fn terminator_follows_termination() {
        assert_eq!(StegoEncoder::new(exhaust()).effective_terminator(), Terminator::None);
        assert_eq!(
            StegoEncoder::new(ExtractionConfig::default()).effective_terminator(),
            Terminator::FixedLength(16)
        );
        let explicit = StegoEncoder::new(exhaust()).terminator(Terminator::Sentinel(0));
        assert_eq!(explicit.effective_terminator(), Terminator::Sentinel(0));
    }

    #[test]
    fn payload_bytes_per_terminator() {
        let enc = StegoEncoder::new(exhaust());
        assert_eq!(enc.payload_bytes("Hi").unwrap(), b"Hi".to_vec());
        let enc = enc.terminator(Terminator::Sentinel(0));
        assert_eq!(enc.payload_bytes("Hi").unwrap(), b"Hi\0".to_vec());
        let enc = StegoEncoder::new(exhaust()).terminator(Terminator::FixedLength(4));
        assert_eq!(enc.payload_bytes("Hi").unwrap(), b"Hi\0\0".to_vec());
        assert_eq!(enc.payload_bytes("Hello").unwrap(), b"Hell".to_vec());
    }

    #[test]
    fn latin1_payload_encodes() {
        let enc = StegoEncoder::new(exhaust());
        assert_eq!(enc.payload_bytes("caf\u{e9}").unwrap(), vec![b'c', b'a', b'f', 0xE9]);
    }

    #[test]
    fn wide_character_rejected() {
        let enc = StegoEncoder::new(exhaust());
        match enc.payload_bytes("ok\u{20ac}") {
            Err(StegoError::UnencodableCharacter { index: 2, ch: '\u{20ac}' }) => {}
            other => panic!("expected UnencodableCharacter, got {other:?}"),
        }
    }

    #[test]
    fn truncated_wide_character_is_ignored() {
        let enc = StegoEncoder::new(exhaust()).terminator(Terminator::FixedLength(2));
        assert_eq!(enc.payload_bytes("ok\u{20ac}").unwrap(), b"ok".to_vec());
    }

    #[test]
    fn sentinel_inside_payload_rejected() {
        let enc = StegoEncoder::new(exhaust()).terminator(Terminator::Sentinel(b'#'));
        assert!(matches!(
            enc.payload_bytes("a#b"),
            Err(StegoError::UnencodableCharacter { index: 1, ch: '#' })
        ));
    }

    #[test]
    fn writes_bits_in_scan_order() {
        let mut grid = PixelGrid::new(1, 3, 3, BitDepth::EIGHT);
        let enc = StegoEncoder::new(exhaust());
        let written = enc.encode_in_place(&mut grid, "H").unwrap();
        assert_eq!(written, 8);
        // 'H' = 0100_1000, ninth sample untouched.
        assert_eq!(grid.samples(), &[0, 1, 0, 0, 1, 0, 0, 0, 0]);
    }

    #[test]
    fn preserves_higher_bits() {
        let rows = vec![vec![vec![0xF0, 0xF1, 0xF2, 0xF3, 0xF4, 0xF5, 0xF6, 0xF7]]];
        let grid = PixelGrid::from_rows(&rows, BitDepth::EIGHT).unwrap();
        let out = StegoEncoder::new(exhaust()).encode(&grid, "\u{ff}").unwrap();
        assert_eq!(out.samples(), &[0xF1, 0xF1, 0xF3, 0xF3, 0xF5, 0xF5, 0xF7, 0xF7]);
        // Source grid is not modified.
        assert_eq!(grid.get(0, 0, 0), 0xF0);
    }

    #[test]
    fn writes_chosen_bit_plane() {
        let grid = PixelGrid::new(1, 8, 1, BitDepth::EIGHT);
        let cfg = ExtractionConfig { bit_position: 3, ..exhaust() };
        let out = StegoEncoder::new(cfg).encode(&grid, "\u{81}").unwrap();
        assert_eq!(out.samples(), &[8, 0, 0, 0, 0, 0, 0, 8]);
    }

    #[test]
    fn lsb_first_order() {
        let grid = PixelGrid::new(1, 8, 1, BitDepth::EIGHT);
        let cfg = ExtractionConfig { bit_order: BitOrder::LsbFirst, ..exhaust() };
        let out = StegoEncoder::new(cfg).encode(&grid, "\u{1}").unwrap();
        assert_eq!(out.samples(), &[1, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn skips_unselected_channels() {
        let grid = PixelGrid::new(1, 3, 4, BitDepth::EIGHT);
        let cfg = ExtractionConfig { channels: Channels::First(3), ..exhaust() };
        let out = StegoEncoder::new(cfg).encode(&grid, "\u{ff}").unwrap();
        let alpha: Vec<i64> = (0..3).map(|p| out.get(0, p, 3)).collect();
        assert_eq!(alpha, vec![0, 0, 0]);
        assert_eq!(out.get(0, 2, 1), 1);
        assert_eq!(out.get(0, 2, 2), 0, "ninth scanned channel is beyond the payload");
    }

    #[test]
    fn insufficient_capacity() {
        let mut grid = PixelGrid::new(1, 2, 3, BitDepth::EIGHT);
        let enc = StegoEncoder::new(exhaust()).terminator(Terminator::Sentinel(0));
        match enc.encode_in_place(&mut grid, "A") {
            Err(StegoError::InsufficientCapacity { required_bits: 16, available_bits: 6 }) => {}
            other => panic!("expected InsufficientCapacity, got {other:?}"),
        }
    }

    #[test]
    fn exact_capacity_fits() {
        let mut grid = PixelGrid::new(2, 4, 2, BitDepth::EIGHT);
        let enc = StegoEncoder::new(exhaust());
        assert_eq!(enc.encode_in_place(&mut grid, "AB").unwrap(), 16);
    }

    #[test]
    fn zero_remainder_clears_rest() {
        let rows = vec![vec![vec![255; 4]; 4]];
        let grid = PixelGrid::from_rows(&rows, BitDepth::EIGHT).unwrap();

        let kept = StegoEncoder::new(exhaust()).encode(&grid, "\0").unwrap();
        assert!(kept.samples()[8..].iter().all(|&v| v == 255));

        let zeroed = StegoEncoder::new(exhaust()).zero_remainder(true).encode(&grid, "\0").unwrap();
        assert!(zeroed.samples().iter().all(|&v| v == 254));
    }

    #[test]
    fn invalid_sample_leaves_grid_untouched() {
        let rows = vec![vec![vec![10, 20, 30, 40], vec![50, 60, 70, 300]]];
        let mut grid = PixelGrid::from_rows(&rows, BitDepth::EIGHT).unwrap();
        let before = grid.clone();
        let err = StegoEncoder::new(exhaust()).encode_in_place(&mut grid, "\u{ff}").unwrap_err();
        assert!(matches!(err, StegoError::InvalidPixelValue { row: 0, pixel: 1, channel: 3, .. }));
        assert_eq!(grid, before);
    }

    #[test]
    fn sixteen_bit_depth() {
        let rows = vec![vec![vec![65_535]; 8]];
        let grid = PixelGrid::from_rows(&rows, BitDepth::SIXTEEN).unwrap();
        let cfg = ExtractionConfig { bit_position: 12, ..exhaust() };
        let out = StegoEncoder::new(cfg).encode(&grid, "\0").unwrap();
        assert!(out.samples().iter().all(|&v| v == 65_535 - 4096));
    }
}
