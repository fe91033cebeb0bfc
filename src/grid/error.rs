// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Error types for pixel grid construction and loading.

use std::fmt;

/// Why a single channel value was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueFault {
    /// The value is fractional, or too large to be held as an integer sample.
    NotInteger,
    /// The value is negative or above the largest value of the declared bit depth.
    OutOfRange { value: i64, max: i64 },
}

impl fmt::Display for ValueFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInteger => write!(f, "not a non-negative integer"),
            Self::OutOfRange { value, max } => write!(f, "{value} outside [0, {max}]"),
        }
    }
}

/// Errors that can occur while building or loading a [`PixelGrid`](super::PixelGrid).
#[derive(Debug)]
pub enum GridError {
    /// A row has a different pixel count than the first row.
    RaggedRow { row: usize, expected: usize, found: usize },
    /// A pixel has a different channel count than the first pixel.
    ChannelCountMismatch { row: usize, pixel: usize, expected: usize, found: usize },
    /// A channel value could not be taken as a sample.
    InvalidPixelValue { row: usize, pixel: usize, channel: usize, fault: ValueFault },
    /// Bit depth outside 1..=16.
    UnsupportedBitDepth(u8),
    /// The grid document is not valid JSON or lacks the `pixels` array.
    Document(serde_json::Error),
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RaggedRow { row, expected, found } => {
                write!(f, "row {row} has {found} pixels, expected {expected}")
            }
            Self::ChannelCountMismatch { row, pixel, expected, found } => {
                write!(f, "pixel ({row}, {pixel}) has {found} channels, expected {expected}")
            }
            Self::InvalidPixelValue { row, pixel, channel, fault } => {
                write!(f, "channel {channel} of pixel ({row}, {pixel}): {fault}")
            }
            Self::UnsupportedBitDepth(bits) => write!(f, "unsupported bit depth: {bits} (expected 1-16)"),
            Self::Document(e) => write!(f, "malformed grid document: {e}"),
        }
    }
}

impl std::error::Error for GridError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Document(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for GridError {
    fn from(e: serde_json::Error) -> Self {
        Self::Document(e)
    }
}

pub type Result<T> = std::result::Result<T, GridError>;
