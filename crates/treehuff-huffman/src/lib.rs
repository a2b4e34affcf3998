//! # Treehuff Huffman
//!
//! Lossless Huffman compression with the code tree stored in the stream.
//!
//! Compression counts symbol frequencies, builds a weight-optimal prefix
//! tree, writes the tree as a pre-order header, then re-reads the input and
//! writes one code per byte followed by the code of a reserved end-of-stream
//! symbol. Decompression parses the header and walks the tree bit by bit.
//!
//! ## Example
//!
//! ```
//! use treehuff_core::{Compressor, Decompressor};
//! use treehuff_huffman::HuffCodec;
//!
//! let codec = HuffCodec::new();
//! let compressed = codec.compress(b"abracadabra").unwrap();
//! let original = codec.decompress(&compressed).unwrap();
//! assert_eq!(original, b"abracadabra");
//! ```
//!
//! ## Pipeline
//!
//! ```text
//! compress:    input -> FrequencyTable -> PrefixTree -> CodeTable
//!                    -> magic + header -> (rewind) -> codes + end marker
//!
//! decompress:  magic -> header -> PrefixTree -> tree walk -> bytes
//! ```

pub mod code;
pub mod codec;
pub mod frequency;
pub mod header;
pub mod stream;
pub mod tree;

pub use code::{Code, CodeTable};
pub use codec::HuffCodec;
pub use frequency::FrequencyTable;
pub use header::{read_header, write_header};
pub use stream::{decode_symbols, encode_symbols};
pub use tree::{Node, PrefixTree, MAX_TREE_DEPTH};
