// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Error types for the LSB codec.
//!
//! [`StegoError`] covers every failure mode from grid validation through
//! bit extraction, message decoding and embedding. All of them are raised at
//! the point of detection; none is recovered internally. Dropping trailing
//! bits that do not fill a byte is not an error.

use core::fmt;

use crate::grid::error::{GridError, ValueFault};

/// Errors that can occur during LSB encoding or decoding.
#[derive(Debug)]
pub enum StegoError {
    /// The grid is not rectangular or its document is malformed.
    InvalidGrid(GridError),
    /// A channel value is not an integer or lies outside the grid's bit depth.
    InvalidPixelValue { row: usize, pixel: usize, channel: usize, fault: ValueFault },
    /// The extraction config does not fit the grid (channel index, bit position).
    InvalidConfig(&'static str),
    /// The payload plus terminator needs more bits than the grid can carry.
    InsufficientCapacity { required_bits: usize, available_bits: usize },
    /// A payload character cannot be written as a single byte.
    UnencodableCharacter { index: usize, ch: char },
    /// Printable-only decoding met a control byte.
    NonPrintableByte { index: usize, byte: u8 },
}

impl fmt::Display for StegoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidGrid(e) => write!(f, "invalid grid: {e}"),
            Self::InvalidPixelValue { row, pixel, channel, fault } => {
                write!(f, "invalid pixel value at ({row}, {pixel}) channel {channel}: {fault}")
            }
            Self::InvalidConfig(msg) => write!(f, "invalid extraction config: {msg}"),
            Self::InsufficientCapacity { required_bits, available_bits } => write!(
                f,
                "payload needs {required_bits} bits but the grid only carries {available_bits}"
            ),
            Self::UnencodableCharacter { index, ch } => {
                write!(f, "character {ch:?} (U+{:04X}) at index {index} cannot be encoded", *ch as u32)
            }
            Self::NonPrintableByte { index, byte } => {
                write!(f, "non-printable byte 0x{byte:02X} at index {index}")
            }
        }
    }
}

impl std::error::Error for StegoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidGrid(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GridError> for StegoError {
    fn from(e: GridError) -> Self {
        match e {
            GridError::InvalidPixelValue { row, pixel, channel, fault } => {
                Self::InvalidPixelValue { row, pixel, channel, fault }
            }
            other => Self::InvalidGrid(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_fault_keeps_its_category() {
        let e: StegoError = GridError::InvalidPixelValue {
            row: 1,
            pixel: 2,
            channel: 0,
            fault: ValueFault::NotInteger,
        }
        .into();
        assert!(matches!(e, StegoError::InvalidPixelValue { row: 1, pixel: 2, .. }));
    }

    #[test]
    fn shape_fault_is_invalid_grid() {
        let e: StegoError = GridError::RaggedRow { row: 3, expected: 2, found: 1 }.into();
        assert!(matches!(e, StegoError::InvalidGrid(GridError::RaggedRow { .. })));
        assert_eq!(e.to_string(), "invalid grid: row 3 has 1 pixels, expected 2");
    }

    #[test]
    fn display_unencodable() {
        let e = StegoError::UnencodableCharacter { index: 4, ch: 'Ā' };
        assert_eq!(e.to_string(), "character 'Ā' (U+0100) at index 4 cannot be encoded");
    }
}
