// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! LSB decode/encode pipeline.
//!
//! Decode composes the three lazy stages:
//! 1. [`PixelStreamReader`] walks the grid and yields one bit per scanned channel
//! 2. [`BitAccumulator`] packs bits into bytes, dropping a trailing partial byte
//! 3. [`MessageDecoder`] maps bytes to characters until the termination policy stops it
//!
//! Encode runs the same scan order in reverse through [`StegoEncoder`].

use log::debug;

use crate::grid::PixelGrid;
use crate::stego::accumulator::BitAccumulator;
use crate::stego::capacity::{self, Capacity};
use crate::stego::config::ExtractionConfig;
use crate::stego::decoder::{DecodedMessage, MessageDecoder};
use crate::stego::encoder::StegoEncoder;
use crate::stego::error::StegoError;
use crate::stego::reader::PixelStreamReader;

/// Decode the message hidden in `grid`.
///
/// The grid is only borrowed; decoding the same grid twice with the same
/// config gives the same result.
///
/// With the `parallel` feature and [`Termination::Exhaust`](crate::stego::config::Termination::Exhaust)
/// the bit-plane is extracted row-parallel first, since the whole stream is
/// needed anyway. Every other policy streams so it can stop early.
///
/// # Errors
/// - [`StegoError::InvalidConfig`] if the config does not fit the grid.
/// - [`StegoError::InvalidPixelValue`] if a scanned sample is out of range.
/// - [`StegoError::NonPrintableByte`] in printable-only mode.
pub fn lsb_decode(grid: &PixelGrid, config: &ExtractionConfig) -> Result<DecodedMessage, StegoError> {
    let reader = PixelStreamReader::new(grid, config)?;
    let decoder = MessageDecoder::from_config(config);
    debug!(
        "decode: {} bits over {}x{}x{} grid, channels {:?}, bit {}",
        reader.len(),
        grid.rows(),
        grid.width(),
        grid.channels(),
        reader.channels(),
        reader.bit_position()
    );

    #[cfg(feature = "parallel")]
    {
        use crate::stego::config::Termination;
        if config.termination == Termination::Exhaust {
            let bits = reader.collect_bits()?;
            let mut bytes = BitAccumulator::new(bits.into_iter().map(Ok), config.bit_order);
            let msg = decoder.decode(&mut bytes)?;
            debug!("decode: {:?} after {} bits", msg.completion, msg.bits_consumed);
            return Ok(msg);
        }
    }

    let mut bytes = BitAccumulator::new(reader.bits(), config.bit_order);
    let msg = decoder.decode(&mut bytes)?;
    debug!("decode: {:?} after {} bits", msg.completion, msg.bits_consumed);
    Ok(msg)
}

/// Encode `payload` into a copy of `grid`, terminated as the config's
/// termination policy implies.
///
/// Use [`StegoEncoder`] directly for an explicit terminator, in-place
/// mutation, or clearing the bits after the payload.
pub fn lsb_encode(grid: &PixelGrid, payload: &str, config: &ExtractionConfig) -> Result<PixelGrid, StegoError> {
    let encoder = StegoEncoder::new(config.clone());
    let out = encoder.encode(grid, payload)?;
    debug!(
        "encode: {} chars with {:?} into {}x{}x{} grid",
        payload.chars().count(),
        encoder.effective_terminator(),
        grid.rows(),
        grid.width(),
        grid.channels()
    );
    Ok(out)
}

/// Capacity of `grid` under `config`.
pub fn lsb_capacity(grid: &PixelGrid, config: &ExtractionConfig) -> Result<Capacity, StegoError> {
    capacity::estimate_capacity(grid, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::BitDepth;
    use crate::stego::config::Termination;
    use crate::stego::decoder::Completion;

    #[test]
    fn default_config_reads_sixteen_chars() {
        let grid = PixelGrid::new(4, 16, 3, BitDepth::EIGHT);
        let cover = lsb_encode(&grid, "0123456789abcdefXYZ", &ExtractionConfig::default()).unwrap();
        let msg = lsb_decode(&cover, &ExtractionConfig::default()).unwrap();
        assert_eq!(msg.text, "0123456789abcdef");
        assert_eq!(msg.completion, Completion::LengthReached);
    }

    #[test]
    fn sentinel_round_trip() {
        let cfg = ExtractionConfig { termination: Termination::Sentinel(0), ..Default::default() };
        let grid = PixelGrid::new(8, 8, 3, BitDepth::EIGHT);
        let cover = lsb_encode(&grid, "hidden", &cfg).unwrap();
        let msg = lsb_decode(&cover, &cfg).unwrap();
        assert_eq!(msg.text, "hidden");
        assert_eq!(msg.completion, Completion::SentinelFound);
        assert_eq!(msg.bits_consumed, 56);
    }

    #[test]
    fn exhaust_reads_whole_plane() {
        let cfg = ExtractionConfig { termination: Termination::Exhaust, ..Default::default() };
        // 3 x 3 x 2 = 18 bits -> 2 bytes + 2 dropped bits.
        let grid = PixelGrid::new(3, 3, 2, BitDepth::EIGHT);
        let cover = lsb_encode(&grid, "ab", &cfg).unwrap();
        let msg = lsb_decode(&cover, &cfg).unwrap();
        assert_eq!(msg.text, "ab");
        assert_eq!(msg.completion, Completion::Exhausted { trailing_bits: 2 });
        assert_eq!(msg.bits_consumed, 18);
    }

    #[test]
    fn capacity_matches_stream_length() {
        let grid = PixelGrid::new(5, 7, 3, BitDepth::EIGHT);
        assert_eq!(lsb_capacity(&grid, &ExtractionConfig::default()).unwrap().bits, 105);
    }
}
