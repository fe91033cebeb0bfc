// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! JSON grid documents.
//!
//! The codec's input and output format is a JSON object with a single
//! `pixels` member holding `rows × pixels × channels` numbers:
//!
//! ```text
//! { "pixels": [ [ [c0, c1, c2], [c0, c1, c2], ... ], ... ] }
//! ```
//!
//! Integral floats such as `12.0` are accepted. Fractional numbers and
//! integers that do not fit an `i64` are rejected at load time; range checks
//! against the bit depth happen later, when the codec reaches the value.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};
use serde_json::Number;

use super::error::{GridError, Result, ValueFault};
use super::{BitDepth, PixelGrid};

#[derive(Deserialize)]
struct RawDocument {
    pixels: Vec<Vec<Vec<Number>>>,
}

/// Serialized form of a [`PixelGrid`].
#[derive(Debug, Serialize)]
pub struct GridDocument {
    pub pixels: Vec<Vec<Vec<i64>>>,
}

fn to_sample(n: &Number) -> Option<i64> {
    if let Some(v) = n.as_i64() {
        return Some(v);
    }
    if n.is_u64() {
        // Positive but above i64::MAX.
        return None;
    }
    let f = n.as_f64()?;
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

fn parse(raw: RawDocument, depth: BitDepth) -> Result<PixelGrid> {
    let mut rows = Vec::with_capacity(raw.pixels.len());
    for (r, row) in raw.pixels.iter().enumerate() {
        let mut out_row = Vec::with_capacity(row.len());
        for (p, pixel) in row.iter().enumerate() {
            let mut out_px = Vec::with_capacity(pixel.len());
            for (c, n) in pixel.iter().enumerate() {
                let v = to_sample(n).ok_or(GridError::InvalidPixelValue {
                    row: r,
                    pixel: p,
                    channel: c,
                    fault: ValueFault::NotInteger,
                })?;
                out_px.push(v);
            }
            out_row.push(out_px);
        }
        rows.push(out_row);
    }
    PixelGrid::from_rows(&rows, depth)
}

/// Read a grid document from any reader.
pub fn read_grid<R: Read>(reader: R, depth: BitDepth) -> Result<PixelGrid> {
    let raw: RawDocument = serde_json::from_reader(reader)?;
    parse(raw, depth)
}

/// Write a grid as a compact JSON document.
pub fn write_grid<W: Write>(writer: W, grid: &PixelGrid) -> Result<()> {
    let doc = GridDocument { pixels: grid.to_rows() };
    serde_json::to_writer(writer, &doc)?;
    Ok(())
}

impl PixelGrid {
    /// Parse a grid from a JSON document string.
    pub fn from_json_str(json: &str, depth: BitDepth) -> Result<Self> {
        let raw: RawDocument = serde_json::from_str(json)?;
        parse(raw, depth)
    }

    /// Serialize the grid as a JSON document string.
    pub fn to_json_string(&self) -> Result<String> {
        let doc = GridDocument { pixels: self.to_rows() };
        Ok(serde_json::to_string(&doc)?)
    }
}
