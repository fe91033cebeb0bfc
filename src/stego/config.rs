// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Extraction configuration shared by the decoder and the encoder.
//!
//! Both directions must agree on the channel subset, the bit-plane, the
//! order in which bits are packed into bytes, and how a message ends. The
//! config is a plain value; operations borrow it, so it cannot change while
//! a decode or encode is running.
//!
//! Configs can be loaded from TOML:
//!
//! ```toml
//! channels = { first = 3 }
//! bit_position = 0
//! bit_order = "msb-first"
//! termination = { sentinel = 0 }
//! printable_only = false
//! ```

use serde::{Deserialize, Serialize};

use crate::grid::PixelGrid;
use crate::stego::error::StegoError;

/// Default character count for [`Termination::FixedLength`].
pub const DEFAULT_MESSAGE_CHARS: usize = 16;

/// Which channels of each pixel are scanned, in ascending index order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Channels {
    /// Every channel of the pixel.
    #[default]
    All,
    /// Channels `0..n` (e.g. RGB out of RGBA).
    First(usize),
    /// Explicit, strictly ascending channel indices.
    List(Vec<usize>),
}

/// How eight consecutive bits form one byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BitOrder {
    /// First bit of the group is bit 7 of the byte.
    #[default]
    MsbFirst,
    /// First bit of the group is bit 0 of the byte.
    LsbFirst,
}

/// When decoding stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Termination {
    /// Stop right after this many characters.
    FixedLength(usize),
    /// Stop before the first byte equal to this value.
    Sentinel(u8),
    /// Consume every whole byte in the stream.
    Exhaust,
}

impl Default for Termination {
    fn default() -> Self {
        Self::FixedLength(DEFAULT_MESSAGE_CHARS)
    }
}

/// Parameters of one decode or encode operation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractionConfig {
    pub channels: Channels,
    /// Bit index read from / written to each selected channel (0 = LSB).
    pub bit_position: u8,
    pub bit_order: BitOrder,
    pub termination: Termination,
    /// Reject control bytes while decoding instead of passing them through.
    pub printable_only: bool,
}

/// A config resolved against a concrete grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ScanPlan {
    pub channels: Vec<usize>,
    pub bit: u8,
}

impl ExtractionConfig {
    /// Parse a config from TOML; missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Resolve the channel subset and bit-plane for `grid`.
    ///
    /// Channel indices are only checked against the grid when it has at
    /// least one pixel, so an empty grid decodes under any channel subset.
    ///
    /// # Errors
    /// [`StegoError::InvalidConfig`] if the bit position is not below the
    /// grid's bit depth, a channel index is out of range, or a channel list
    /// is not strictly ascending.
    pub(crate) fn plan(&self, grid: &PixelGrid) -> Result<ScanPlan, StegoError> {
        if self.bit_position >= grid.depth().bits() {
            return Err(StegoError::InvalidConfig("bit position must be below the grid bit depth"));
        }

        let n = grid.channels();
        let strict = grid.has_pixels();
        let channels = match &self.channels {
            Channels::All => (0..n).collect(),
            Channels::First(k) => {
                if strict && *k > n {
                    return Err(StegoError::InvalidConfig("more channels selected than each pixel has"));
                }
                (0..(*k).min(n)).collect()
            }
            Channels::List(list) => {
                if list.windows(2).any(|w| w[0] >= w[1]) {
                    return Err(StegoError::InvalidConfig("channel list must be strictly ascending"));
                }
                if strict && list.iter().any(|&c| c >= n) {
                    return Err(StegoError::InvalidConfig("channel index out of range"));
                }
                list.iter().copied().filter(|&c| c < n).collect()
            }
        };

        Ok(ScanPlan { channels, bit: self.bit_position })
    }
}
