// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Rectangular pixel grids.
//!
//! A [`PixelGrid`] is an ordered sequence of rows, each an ordered sequence of
//! pixels, each an ordered sequence of integer channel values. Samples are
//! stored flattened in row-major order. Values are kept as `i64` so that
//! negative or oversized inputs survive loading and can be rejected with a
//! precise position when the codec reaches them.

pub mod document;
pub mod error;

use error::{GridError, Result, ValueFault};

/// Declared bit depth of every channel value in a grid (1..=16 bits).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitDepth(u8);

impl BitDepth {
    /// 8-bit channels, values in `[0, 255]`.
    pub const EIGHT: BitDepth = BitDepth(8);
    /// 16-bit channels, values in `[0, 65535]`.
    pub const SIXTEEN: BitDepth = BitDepth(16);

    pub fn new(bits: u8) -> Result<Self> {
        if (1..=16).contains(&bits) {
            Ok(Self(bits))
        } else {
            Err(GridError::UnsupportedBitDepth(bits))
        }
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    /// Largest representable sample value.
    pub fn max_value(self) -> i64 {
        (1i64 << self.0) - 1
    }

    /// Returns the fault if `value` is not representable at this depth.
    pub fn check(self, value: i64) -> Option<ValueFault> {
        let max = self.max_value();
        if (0..=max).contains(&value) {
            None
        } else {
            Some(ValueFault::OutOfRange { value, max })
        }
    }
}

impl Default for BitDepth {
    fn default() -> Self {
        Self::EIGHT
    }
}

/// A uniform-depth grid of rows × pixels × channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    rows: usize,
    width: usize,
    channels: usize,
    depth: BitDepth,
    samples: Vec<i64>,
}

impl PixelGrid {
    /// Create a zero-filled grid.
    pub fn new(rows: usize, width: usize, channels: usize, depth: BitDepth) -> Self {
        Self {
            rows,
            width,
            channels,
            depth,
            samples: vec![0; rows * width * channels],
        }
    }

    /// Build a grid from nested rows, enforcing rectangularity.
    ///
    /// The first row fixes the pixel count and the first pixel fixes the
    /// channel count; every other row and pixel must match.
    ///
    /// # Errors
    /// - [`GridError::RaggedRow`] if a row's pixel count differs.
    /// - [`GridError::ChannelCountMismatch`] if a pixel's channel count differs.
    pub fn from_rows(rows: &[Vec<Vec<i64>>], depth: BitDepth) -> Result<Self> {
        let width = rows.first().map_or(0, |r| r.len());
        let channels = rows
            .first()
            .and_then(|r| r.first())
            .map_or(0, |p| p.len());

        let mut samples = Vec::with_capacity(rows.len() * width * channels);
        for (r, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(GridError::RaggedRow { row: r, expected: width, found: row.len() });
            }
            for (p, pixel) in row.iter().enumerate() {
                if pixel.len() != channels {
                    return Err(GridError::ChannelCountMismatch {
                        row: r,
                        pixel: p,
                        expected: channels,
                        found: pixel.len(),
                    });
                }
                samples.extend_from_slice(pixel);
            }
        }

        Ok(Self { rows: rows.len(), width, channels, depth, samples })
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Pixels per row.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Channels per pixel (0 for a grid without pixels).
    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn depth(&self) -> BitDepth {
        self.depth
    }

    /// True when the grid holds no samples at all.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// True when the grid has at least one pixel (possibly with zero channels).
    pub fn has_pixels(&self) -> bool {
        self.rows > 0 && self.width > 0
    }

    /// Flat index of a sample.
    #[inline]
    pub fn index(&self, row: usize, pixel: usize, channel: usize) -> usize {
        (row * self.width + pixel) * self.channels + channel
    }

    pub fn get(&self, row: usize, pixel: usize, channel: usize) -> i64 {
        self.samples[self.index(row, pixel, channel)]
    }

    pub fn set(&mut self, row: usize, pixel: usize, channel: usize, value: i64) {
        let idx = self.index(row, pixel, channel);
        self.samples[idx] = value;
    }

    /// All samples of one row (`width * channels` values).
    pub fn row(&self, row: usize) -> &[i64] {
        let stride = self.width * self.channels;
        &self.samples[row * stride..(row + 1) * stride]
    }

    /// All samples in row-major order.
    pub fn samples(&self) -> &[i64] {
        &self.samples
    }

    pub(crate) fn samples_mut(&mut self) -> &mut [i64] {
        &mut self.samples
    }

    /// Nested `rows × pixels × channels` view, the inverse of [`Self::from_rows`].
    pub fn to_rows(&self) -> Vec<Vec<Vec<i64>>> {
        let c = self.channels;
        (0..self.rows)
            .map(|r| {
                let row = self.row(r);
                (0..self.width).map(|p| row[p * c..(p + 1) * c].to_vec()).collect()
            })
            .collect()
    }
}
