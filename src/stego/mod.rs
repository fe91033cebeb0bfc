// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! LSB steganographic codec.
//!
//! A payload is hidden in one bit-plane of a [`PixelGrid`](crate::grid::PixelGrid):
//! the chosen bit of every selected channel, visited row by row, pixel by
//! pixel, channel by channel. Decoding is a composition of three lazy stages
//! ([`reader`] → [`accumulator`] → [`decoder`]); [`encoder`] writes the same
//! stream back.
//!
//! Every call is a pure function of its inputs. There is no process-wide
//! state, so independent grids can be decoded concurrently and one grid can
//! be decoded from several threads at once.

pub mod accumulator;
pub mod capacity;
pub mod config;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod reader;
mod pipeline;

pub use capacity::Capacity;
pub use config::{BitOrder, Channels, ExtractionConfig, Termination, DEFAULT_MESSAGE_CHARS};
pub use decoder::{Completion, DecodedMessage, MessageDecoder};
pub use encoder::{StegoEncoder, Terminator};
pub use error::StegoError;
pub use pipeline::{lsb_capacity, lsb_decode, lsb_encode};
