// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Embedding capacity.
//!
//! Every scanned channel carries one bit, so the raw capacity is the bit
//! stream length. Whole characters are what remains after the terminator's
//! overhead; partial bytes never count.

use crate::grid::PixelGrid;
use crate::stego::config::ExtractionConfig;
use crate::stego::encoder::Terminator;
use crate::stego::error::StegoError;
use crate::stego::reader::PixelStreamReader;

/// Capacity of one grid under one config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capacity {
    /// Scannable bits.
    pub bits: usize,
}

impl Capacity {
    /// Whole bytes that fit.
    pub fn bytes(&self) -> usize {
        self.bits / 8
    }

    /// Payload characters that fit with the given terminator, or `None`
    /// when not even an empty payload fits.
    ///
    /// A fixed-length terminator always writes its full length, so the
    /// answer is either that length or `None`.
    pub fn chars(&self, terminator: Terminator) -> Option<usize> {
        let bytes = self.bytes();
        match terminator {
            Terminator::None => Some(bytes),
            Terminator::Sentinel(_) => bytes.checked_sub(1),
            Terminator::FixedLength(n) => (n <= bytes).then_some(n),
        }
    }
}

/// Number of bits the grid exposes under `config`.
///
/// # Errors
/// [`StegoError::InvalidConfig`] if the config does not fit the grid.
pub fn scannable_bits(grid: &PixelGrid, config: &ExtractionConfig) -> Result<usize, StegoError> {
    Ok(PixelStreamReader::new(grid, config)?.len())
}

/// Estimate the capacity of `grid` under `config`.
pub fn estimate_capacity(grid: &PixelGrid, config: &ExtractionConfig) -> Result<Capacity, StegoError> {
    Ok(Capacity { bits: scannable_bits(grid, config)? })
}
