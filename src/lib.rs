// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! # pixelsteg-core
//!
//! Least-significant-bit steganography over rectangular pixel grids.
//!
//! A grid is `rows × pixels × channels` of integer samples, already decoded
//! from whatever image format it came from. The codec reads or writes one
//! bit-plane of a chosen channel subset in a fixed scan order, packs the bits
//! into bytes, and maps bytes to Latin-1 characters under a termination
//! policy (fixed length, sentinel byte, or whole stream).
//!
//! The codec itself is std plus `serde` for the JSON grid document and TOML
//! configs. Row-parallel extraction is available behind the `parallel`
//! feature (rayon).
//!
//! # Quick start
//!
//! ```rust
//! use pixelsteg_core::{lsb_decode, lsb_encode, BitDepth, ExtractionConfig, PixelGrid, Termination};
//!
//! let cover = PixelGrid::new(8, 8, 3, BitDepth::EIGHT);
//! let config = ExtractionConfig { termination: Termination::Sentinel(0), ..Default::default() };
//! let stego = lsb_encode(&cover, "secret message", &config).unwrap();
//! let decoded = lsb_decode(&stego, &config).unwrap();
//! assert_eq!(decoded.text, "secret message");
//! ```

pub mod grid;
pub mod stego;

pub use grid::error::{GridError, ValueFault};
pub use grid::{BitDepth, PixelGrid};
pub use stego::{lsb_capacity, lsb_decode, lsb_encode, StegoError};
pub use stego::{BitOrder, Channels, Completion, DecodedMessage, ExtractionConfig, Termination};
pub use stego::{Capacity, StegoEncoder, Terminator};
