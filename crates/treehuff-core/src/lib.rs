//! # Treehuff Core
//!
//! Core traits, types and bit-level I/O for the treehuff compressor.
//!
//! ## Contents
//!
//! - [`Error`] / [`Result`] - the error type shared by every crate
//! - [`FormatConfig`] - stream tag and alphabet constants
//! - [`BitRead`] / [`BitWrite`] - MSB-first bit streams, with
//!   [`BitReader`] and [`BitWriter`] over `std::io`
//! - [`Compressor`], [`Decompressor`], [`Codec`] - one-shot buffer APIs
//! - [`CompressionStats`] - per-call statistics
//!
//! ## Example
//!
//! ```
//! use std::io::Cursor;
//! use treehuff_core::{BitRead, BitReader, BitWrite, BitWriter};
//!
//! let mut out = BitWriter::new(Vec::new());
//! out.write_bits(9, 256).unwrap();
//! out.close().unwrap();
//!
//! let bytes = out.into_inner();
//! let mut bits = BitReader::new(Cursor::new(bytes));
//! assert_eq!(bits.read_bits(9).unwrap(), Some(256));
//! ```

pub mod bitio;
pub mod error;
pub mod stats;
pub mod traits;
pub mod types;

pub use bitio::{BitRead, BitReader, BitWrite, BitWriter};
pub use error::{Error, Result};
pub use stats::CompressionStats;
pub use traits::{Codec, Compressor, Decompressor};
pub use types::{
    CompressionRatio, FormatConfig, Symbol, ALPHABET_SIZE, BITS_PER_INT, BITS_PER_WORD,
    HUFF_NUMBER, HUFF_TREE, LEAF_VALUE_BITS, LITERAL_COUNT, PSEUDO_EOF,
};
