// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! # pixelsteg
//!
//! Command-line front end over the LSB codec. Reads a JSON grid document
//! (`{"pixels": [[[r, g, b], ...], ...]}`) from a file or stdin.
//!
//! ```bash
//! pixelsteg decode stego_image.json
//! pixelsteg decode --channels 3 --sentinel 0 stego_image.json
//! pixelsteg encode cover.json "meet at noon" --sentinel 0 -o stego.json
//! pixelsteg capacity --channels 3 cover.json
//! ```
//!
//! The decoded message goes to stdout. Diagnostics go to stderr and are
//! controlled by `RUST_LOG` (default `warn`). Any codec error exits with
//! status 1.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::{debug, info, warn};

use pixelsteg_core::grid::document;
use pixelsteg_core::stego::DEFAULT_MESSAGE_CHARS;
use pixelsteg_core::{
    lsb_capacity, lsb_decode, BitDepth, BitOrder, Channels, ExtractionConfig, PixelGrid, StegoEncoder,
    Termination, Terminator,
};

/// LSB steganography over JSON pixel grids.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the message hidden in a grid.
    Decode {
        /// Grid document path, or `-` for stdin.
        input: String,
        #[command(flatten)]
        codec: CodecArgs,
    },
    /// Hide a message in a grid and write the result.
    Encode {
        /// Cover grid document path, or `-` for stdin.
        input: String,
        /// Message to embed (Latin-1 characters only).
        message: String,
        /// Output path (stdout if omitted).
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Terminator kind; defaults to the one implied by the termination options.
        #[arg(long, value_enum)]
        terminator: Option<TerminatorKind>,
        /// Clear the chosen bit of every scanned channel after the message.
        #[arg(long)]
        zero_remainder: bool,
        #[command(flatten)]
        codec: CodecArgs,
    },
    /// Report how much a grid can carry.
    Capacity {
        /// Grid document path, or `-` for stdin.
        input: String,
        #[command(flatten)]
        codec: CodecArgs,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum TerminatorKind {
    None,
    Sentinel,
    Fixed,
}

/// Options shared by every subcommand. Flags override `--config`.
#[derive(Args, Debug)]
struct CodecArgs {
    /// TOML file with an extraction config.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Scan only the first N channels of each pixel.
    #[arg(long, conflicts_with = "channel_list")]
    channels: Option<usize>,
    /// Scan these channel indices (comma separated, ascending).
    #[arg(long, value_delimiter = ',')]
    channel_list: Option<Vec<usize>>,
    /// Bit position to read/write (0 = LSB).
    #[arg(long)]
    bit: Option<u8>,
    /// Pack bits least-significant first.
    #[arg(long)]
    lsb_first: bool,
    /// Stop after N characters.
    #[arg(long)]
    length: Option<usize>,
    /// Stop at this byte value (decimal or 0x-prefixed hex).
    #[arg(long, value_parser = parse_byte)]
    sentinel: Option<u8>,
    /// Read every whole byte of the bit-plane.
    #[arg(long)]
    exhaust: bool,
    /// Fail on control characters instead of passing them through.
    #[arg(long)]
    printable_only: bool,
    /// Channel bit depth of the grid.
    #[arg(long, default_value_t = 8)]
    depth: u8,
}

fn parse_byte(s: &str) -> std::result::Result<u8, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => s.parse::<u8>(),
    };
    parsed.map_err(|e| format!("invalid byte value '{s}': {e}"))
}

impl CodecArgs {
    fn extraction_config(&self) -> Result<ExtractionConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                ExtractionConfig::from_toml_str(&text)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => ExtractionConfig::default(),
        };

        if let Some(n) = self.channels {
            config.channels = Channels::First(n);
        }
        if let Some(list) = &self.channel_list {
            config.channels = Channels::List(list.clone());
        }
        if let Some(bit) = self.bit {
            config.bit_position = bit;
        }
        if self.lsb_first {
            config.bit_order = BitOrder::LsbFirst;
        }
        if self.printable_only {
            config.printable_only = true;
        }

        let requested = [self.length.is_some(), self.sentinel.is_some(), self.exhaust];
        if requested.iter().filter(|&&r| r).count() > 1 {
            warn!("several termination options given; --length wins over --sentinel wins over --exhaust");
        }
        if let Some(n) = self.length {
            config.termination = Termination::FixedLength(n);
        } else if let Some(b) = self.sentinel {
            config.termination = Termination::Sentinel(b);
        } else if self.exhaust {
            config.termination = Termination::Exhaust;
        }

        debug!("extraction config: {config:?}");
        Ok(config)
    }

    fn depth(&self) -> Result<BitDepth> {
        Ok(BitDepth::new(self.depth)?)
    }
}

fn read_input(input: &str, depth: BitDepth) -> Result<PixelGrid> {
    let grid = if input == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).context("reading grid from stdin")?;
        PixelGrid::from_json_str(&buf, depth)?
    } else {
        let file = File::open(input).with_context(|| format!("opening {input}"))?;
        document::read_grid(BufReader::new(file), depth).with_context(|| format!("loading grid {input}"))?
    };
    info!("loaded {}x{}x{} grid", grid.rows(), grid.width(), grid.channels());
    Ok(grid)
}

fn explicit_terminator(kind: TerminatorKind, termination: Termination) -> Terminator {
    match (kind, termination) {
        (TerminatorKind::None, _) => Terminator::None,
        (TerminatorKind::Sentinel, Termination::Sentinel(b)) => Terminator::Sentinel(b),
        (TerminatorKind::Sentinel, _) => Terminator::Sentinel(0),
        (TerminatorKind::Fixed, Termination::FixedLength(n)) => Terminator::FixedLength(n),
        (TerminatorKind::Fixed, _) => Terminator::FixedLength(DEFAULT_MESSAGE_CHARS),
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Decode { input, codec } => {
            let config = codec.extraction_config()?;
            let grid = read_input(&input, codec.depth()?)?;
            let msg = lsb_decode(&grid, &config)?;
            info!("stopped: {:?} after {} bits", msg.completion, msg.bits_consumed);
            println!("{}", msg.text);
        }
        Command::Encode { input, message, output, terminator, zero_remainder, codec } => {
            let config = codec.extraction_config()?;
            let grid = read_input(&input, codec.depth()?)?;

            let mut encoder = StegoEncoder::new(config.clone()).zero_remainder(zero_remainder);
            if let Some(kind) = terminator {
                encoder = encoder.terminator(explicit_terminator(kind, config.termination));
            }
            let stego = encoder.encode(&grid, &message)?;
            info!("embedded {} chars with {:?}", message.chars().count(), encoder.effective_terminator());

            match output {
                Some(path) => {
                    let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
                    let mut w = BufWriter::new(file);
                    document::write_grid(&mut w, &stego)?;
                    w.flush()?;
                }
                None => {
                    let stdout = io::stdout();
                    let mut w = stdout.lock();
                    document::write_grid(&mut w, &stego)?;
                    writeln!(w)?;
                }
            }
        }
        Command::Capacity { input, codec } => {
            let config = codec.extraction_config()?;
            let grid = read_input(&input, codec.depth()?)?;
            let cap = lsb_capacity(&grid, &config)?;
            let terminator = Terminator::from(config.termination);
            println!("bits: {}", cap.bits);
            println!("bytes: {}", cap.bytes());
            match cap.chars(terminator) {
                Some(chars) => println!("chars: {chars}"),
                None => {
                    warn!("{terminator:?} does not fit in {} bits", cap.bits);
                    println!("chars: none");
                }
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    run(Cli::parse())
}
