// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Bit-plane extraction in scan order.
//!
//! The scan order is row-major, then pixel-major within a row, then
//! channel-major within a pixel, restricted to the configured channel subset.
//! Every scanned channel contributes exactly one bit, so the stream length is
//! `rows * width * channels_scanned`.
//!
//! [`PixelStreamReader::bits`] is lazy: a decoder that stops early never
//! touches the rest of the grid. Each call returns a fresh iterator, so the
//! stream can be replayed without mutating the reader.

use crate::grid::PixelGrid;
use crate::stego::config::{ExtractionConfig, ScanPlan};
use crate::stego::error::StegoError;

/// Location of one scanned sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub row: usize,
    pub pixel: usize,
    pub channel: usize,
    /// Flat index into [`PixelGrid::samples`].
    pub index: usize,
}

/// Reads the configured bit-plane of a borrowed grid.
pub struct PixelStreamReader<'a> {
    grid: &'a PixelGrid,
    plan: ScanPlan,
}

impl<'a> PixelStreamReader<'a> {
    /// Validate `config` against `grid` and prepare a reader.
    ///
    /// # Errors
    /// [`StegoError::InvalidConfig`] if the channel subset or bit position
    /// does not fit the grid.
    pub fn new(grid: &'a PixelGrid, config: &ExtractionConfig) -> Result<Self, StegoError> {
        let plan = config.plan(grid)?;
        Ok(Self { grid, plan })
    }

    /// Number of bits in the stream.
    pub fn len(&self) -> usize {
        self.grid.rows() * self.grid.width() * self.plan.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Channel indices scanned within each pixel.
    pub fn channels(&self) -> &[usize] {
        &self.plan.channels
    }

    /// Bit index read from each channel.
    pub fn bit_position(&self) -> u8 {
        self.plan.bit
    }

    /// Sample positions in scan order.
    pub fn positions(&self) -> ScanPositions<'_> {
        ScanPositions {
            channels: &self.plan.channels,
            width: self.grid.width(),
            stride: self.grid.channels(),
            row: 0,
            pixel: 0,
            slot: 0,
            remaining: self.len(),
        }
    }

    /// A fresh lazy bit stream from the start of the grid.
    pub fn bits(&self) -> Bits<'_> {
        Bits {
            grid: self.grid,
            bit: self.plan.bit,
            positions: self.positions(),
            failed: false,
        }
    }

    /// Materialise the whole stream.
    ///
    /// With the `parallel` feature rows are extracted concurrently and joined
    /// back in row order. The error reported is always the first one in scan
    /// order.
    pub fn collect_bits(&self) -> Result<Vec<u8>, StegoError> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            let rows: Vec<Result<Vec<u8>, StegoError>> =
                (0..self.grid.rows()).into_par_iter().map(|r| self.row_bits(r)).collect();
            let mut out = Vec::with_capacity(self.len());
            for row in rows {
                out.extend_from_slice(&row?);
            }
            Ok(out)
        }

        #[cfg(not(feature = "parallel"))]
        {
            self.bits().collect()
        }
    }

    /// Bits contributed by a single row.
    pub fn row_bits(&self, row: usize) -> Result<Vec<u8>, StegoError> {
        let mut out = Vec::with_capacity(self.grid.width() * self.plan.channels.len());
        for pixel in 0..self.grid.width() {
            for &channel in &self.plan.channels {
                let index = self.grid.index(row, pixel, channel);
                let pos = Position { row, pixel, channel, index };
                out.push(read_bit(self.grid, pos, self.plan.bit)?);
            }
        }
        Ok(out)
    }
}

/// Check a sample against the grid's bit depth.
pub(crate) fn checked_sample(grid: &PixelGrid, pos: Position) -> Result<i64, StegoError> {
    let value = grid.samples()[pos.index];
    match grid.depth().check(value) {
        None => Ok(value),
        Some(fault) => Err(StegoError::InvalidPixelValue {
            row: pos.row,
            pixel: pos.pixel,
            channel: pos.channel,
            fault,
        }),
    }
}

#[inline]
fn read_bit(grid: &PixelGrid, pos: Position, bit: u8) -> Result<u8, StegoError> {
    let value = checked_sample(grid, pos)?;
    Ok(((value >> bit) & 1) as u8)
}

/// Iterator over scanned sample positions.
pub struct ScanPositions<'a> {
    channels: &'a [usize],
    width: usize,
    stride: usize,
    row: usize,
    pixel: usize,
    slot: usize,
    remaining: usize,
}

impl Iterator for ScanPositions<'_> {
    type Item = Position;

    fn next(&mut self) -> Option<Position> {
        if self.remaining == 0 {
            return None;
        }
        let channel = self.channels[self.slot];
        let index = (self.row * self.width + self.pixel) * self.stride + channel;
        let pos = Position { row: self.row, pixel: self.pixel, channel, index };

        self.slot += 1;
        if self.slot == self.channels.len() {
            self.slot = 0;
            self.pixel += 1;
            if self.pixel == self.width {
                self.pixel = 0;
                self.row += 1;
            }
        }
        self.remaining -= 1;
        Some(pos)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for ScanPositions<'_> {}

/// Lazy bit stream. Yields `0` or `1` per scanned channel and stops after
/// the first invalid sample.
pub struct Bits<'a> {
    grid: &'a PixelGrid,
    bit: u8,
    positions: ScanPositions<'a>,
    failed: bool,
}

impl Iterator for Bits<'_> {
    type Item = Result<u8, StegoError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let pos = self.positions.next()?;
        let bit = read_bit(self.grid, pos, self.bit);
        self.failed = bit.is_err();
        Some(bit)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failed {
            (0, Some(0))
        } else {
            (0, Some(self.positions.remaining))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::error::ValueFault;
    use crate::grid::BitDepth;
    use crate::stego::config::Channels;

    fn grid(rows: &[Vec<Vec<i64>>]) -> PixelGrid {
        PixelGrid::from_rows(rows, BitDepth::EIGHT).unwrap()
    }

    #[test]
    fn scan_order_row_pixel_channel() {
        let g = grid(&[
            vec![vec![1, 0, 1], vec![0, 0, 1]],
            vec![vec![1, 1, 0], vec![0, 1, 0]],
        ]);
        let r = PixelStreamReader::new(&g, &ExtractionConfig::default()).unwrap();
        let bits: Vec<u8> = r.bits().collect::<Result<_, _>>().unwrap();
        assert_eq!(bits, vec![1, 0, 1, 0, 0, 1, 1, 1, 0, 0, 1, 0]);
    }

    #[test]
    fn length_is_rows_times_width_times_channels() {
        let g = PixelGrid::new(3, 5, 4, BitDepth::EIGHT);
        let cfg = ExtractionConfig { channels: Channels::First(3), ..Default::default() };
        let r = PixelStreamReader::new(&g, &cfg).unwrap();
        assert_eq!(r.len(), 3 * 5 * 3);
        assert_eq!(r.bits().count(), 45);
        assert_eq!(r.positions().len(), 45);
    }

    #[test]
    fn channel_subset_skips_alpha() {
        // Alpha LSB set everywhere, RGB LSB clear.
        let g = grid(&[vec![vec![2, 4, 6, 255], vec![8, 10, 12, 255]]]);
        let cfg = ExtractionConfig { channels: Channels::First(3), ..Default::default() };
        let r = PixelStreamReader::new(&g, &cfg).unwrap();
        assert_eq!(r.collect_bits().unwrap(), vec![0; 6]);

        let list = ExtractionConfig { channels: Channels::List(vec![1, 3]), ..Default::default() };
        let r = PixelStreamReader::new(&g, &list).unwrap();
        assert_eq!(r.collect_bits().unwrap(), vec![0, 1, 0, 1]);
    }

    #[test]
    fn higher_bit_plane() {
        let g = grid(&[vec![vec![0b0000_0100, 0b0000_0011]]]);
        let cfg = ExtractionConfig { bit_position: 2, ..Default::default() };
        let r = PixelStreamReader::new(&g, &cfg).unwrap();
        assert_eq!(r.collect_bits().unwrap(), vec![1, 0]);
    }

    #[test]
    fn restartable() {
        let g = grid(&[vec![vec![1, 2, 3], vec![4, 5, 6]]]);
        let r = PixelStreamReader::new(&g, &ExtractionConfig::default()).unwrap();
        let first: Vec<_> = r.bits().take(3).collect::<Result<_, _>>().unwrap();
        let again: Vec<_> = r.bits().take(3).collect::<Result<_, _>>().unwrap();
        assert_eq!(first, again);
    }

    #[test]
    fn out_of_range_value_reported_with_position() {
        let g = grid(&[vec![vec![1, 2, 3]], vec![vec![4, 256, 6]]]);
        let r = PixelStreamReader::new(&g, &ExtractionConfig::default()).unwrap();
        let mut bits = r.bits();
        for _ in 0..4 {
            assert!(bits.next().unwrap().is_ok());
        }
        match bits.next() {
            Some(Err(StegoError::InvalidPixelValue {
                row: 1,
                pixel: 0,
                channel: 1,
                fault: ValueFault::OutOfRange { value: 256, max: 255 },
            })) => {}
            other => panic!("expected InvalidPixelValue, got {other:?}"),
        }
        assert!(bits.next().is_none(), "stream must stop after an error");
    }

    #[test]
    fn negative_value_rejected() {
        let g = grid(&[vec![vec![-2]]]);
        let r = PixelStreamReader::new(&g, &ExtractionConfig::default()).unwrap();
        assert!(matches!(r.collect_bits(), Err(StegoError::InvalidPixelValue { .. })));
    }

    #[test]
    fn lazy_stream_does_not_reach_bad_values() {
        let g = grid(&[vec![vec![1, 1, 1], vec![1, 1, 1], vec![1, 1, 1], vec![-5, 999, 0]]]);
        let r = PixelStreamReader::new(&g, &ExtractionConfig::default()).unwrap();
        let head: Vec<u8> = r.bits().take(9).collect::<Result<_, _>>().unwrap();
        assert_eq!(head, vec![1; 9]);
    }

    #[test]
    fn row_bits_concatenate_to_stream() {
        let g = grid(&[
            vec![vec![1, 2], vec![3, 4]],
            vec![vec![5, 6], vec![7, 8]],
            vec![vec![9, 10], vec![11, 12]],
        ]);
        let r = PixelStreamReader::new(&g, &ExtractionConfig::default()).unwrap();
        let joined: Vec<u8> = (0..3).flat_map(|row| r.row_bits(row).unwrap()).collect();
        assert_eq!(joined, r.collect_bits().unwrap());
    }

    #[test]
    fn empty_grid_has_empty_stream() {
        let g = grid(&[]);
        let r = PixelStreamReader::new(&g, &ExtractionConfig::default()).unwrap();
        assert!(r.is_empty());
        assert_eq!(r.bits().count(), 0);
    }
}
