//! Huffman codec (combined compressor + decompressor).
//!
//! ## Stream layout
//!
//! ```text
//! +------------------+
//! | Magic            | 32 bits (0xFACE8201)
//! +------------------+
//! | Tree header      | pre-order, see `header`
//! +------------------+
//! | Codes            | one per input byte, MSB-first
//! +------------------+
//! | End marker code  |
//! +------------------+
//! | Zero padding     | to a byte boundary
//! +------------------+
//! ```

use std::io::Cursor;
use std::time::Instant;

use tracing::debug;
use treehuff_core::{
    BitRead, BitReader, BitWrite, BitWriter, Codec, CompressionStats, Compressor, Decompressor,
    Error, FormatConfig, Result,
};

use crate::code::CodeTable;
use crate::frequency::FrequencyTable;
use crate::header::{read_header, write_header};
use crate::stream::{decode_symbols, encode_symbols};
use crate::tree::{PrefixTree, MAX_TREE_DEPTH};

/// Huffman codec with a tree-encoded header.
///
/// Holds no per-call state: every call builds its own counts, tree and
/// code table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HuffCodec {
    config: FormatConfig,
}

impl HuffCodec {
    /// Create a codec for the standard format.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a codec with a custom format configuration.
    pub fn with_config(config: FormatConfig) -> Self {
        Self { config }
    }

    /// The format configuration in use.
    pub fn config(&self) -> &FormatConfig {
        &self.config
    }

    /// Compress everything `input` yields into `output`, then close `output`.
    ///
    /// The input is read twice: once to count symbols and, after a reset,
    /// once to encode them.
    pub fn compress_stream<R, W>(&self, input: &mut R, output: &mut W) -> Result<CompressionStats>
    where
        R: BitRead + ?Sized,
        W: BitWrite + ?Sized,
    {
        let start = Instant::now();
        let config = &self.config;

        let counts = FrequencyTable::count(input)?;
        let tree = PrefixTree::build(&counts)?;
        let codes = CodeTable::from_tree(&tree);
        debug!(
            "Built prefix tree: {} leaves, depth {}, {} input bytes",
            codes.len(),
            tree.depth(),
            counts.total()
        );

        output.write_bits(config.magic_bits(), config.magic())?;
        let header_bits = write_header(&tree, output, config)?;

        input.reset()?;
        let encoded = encode_symbols(input, &codes, output, config)?;
        output.close()?;

        let bits_written = output.bits_written();
        let stats = CompressionStats {
            original_size: encoded as usize,
            compressed_size: bits_written.div_ceil(8) as usize,
            bits_read: input.bits_read(),
            bits_written,
            header_bits,
            distinct_symbols: codes.len(),
            time_us: start.elapsed().as_micros() as u64,
        };
        debug!("Compressed {}", stats.summary());
        Ok(stats)
    }

    /// Decompress a stream produced by [`compress_stream`](Self::compress_stream),
    /// then close `output`.
    ///
    /// Nothing is written to `output` unless the magic matches.
    pub fn decompress_stream<R, W>(&self, input: &mut R, output: &mut W) -> Result<CompressionStats>
    where
        R: BitRead + ?Sized,
        W: BitWrite + ?Sized,
    {
        let start = Instant::now();
        let config = &self.config;

        match input.read_bits(config.magic_bits())? {
            Some(magic) if magic == config.magic() => {}
            Some(magic) => {
                return Err(Error::malformed(format!(
                    "illegal header starts with 0x{:08x}",
                    magic
                )))
            }
            None => return Err(Error::malformed("input shorter than the stream tag")),
        }

        let tree = read_header(input, config)?;
        let header_bits = input.bits_read() - u64::from(config.magic_bits());
        let leaves = tree.leaf_count();
        debug!("Read tree header: {} leaves, {} bits", leaves, header_bits);

        let decoded = decode_symbols(&tree, input, output, config)?;
        output.close()?;

        let bits_read = input.bits_read();
        let stats = CompressionStats {
            original_size: decoded as usize,
            compressed_size: bits_read.div_ceil(8) as usize,
            bits_read,
            bits_written: output.bits_written(),
            header_bits,
            distinct_symbols: leaves,
            time_us: start.elapsed().as_micros() as u64,
        };
        debug!("Decompressed {}", stats.summary());
        Ok(stats)
    }

    /// Compress a buffer, also returning the call's statistics.
    pub fn compress_with_stats(&self, input: &[u8]) -> Result<(Vec<u8>, CompressionStats)> {
        let mut reader = BitReader::new(Cursor::new(input));
        let mut writer = BitWriter::new(Vec::with_capacity(input.len() / 2 + 64));
        let stats = self.compress_stream(&mut reader, &mut writer)?;
        Ok((writer.into_inner(), stats))
    }

    /// Decompress a buffer, also returning the call's statistics.
    pub fn decompress_with_stats(&self, input: &[u8]) -> Result<(Vec<u8>, CompressionStats)> {
        let mut reader = BitReader::new(Cursor::new(input));
        let mut writer = BitWriter::new(Vec::with_capacity(input.len() * 2));
        let stats = self.decompress_stream(&mut reader, &mut writer)?;
        Ok((writer.into_inner(), stats))
    }
}

/// Upper bound on the code length of a tree whose leaf weights sum to
/// `total`. A leaf at depth `d` needs a total weight of at least `F(d + 2)`.
fn max_code_length(total: u64) -> u64 {
    let (mut prev, mut cur, mut k) = (1u64, 1u64, 2u64);
    while cur <= total.saturating_add(1) && k < MAX_TREE_DEPTH as u64 {
        let next = prev.saturating_add(cur);
        prev = cur;
        cur = next;
        k += 1;
    }
    k.max(1)
}

impl Compressor for HuffCodec {
    fn compress(&self, input: &[u8]) -> Result<Vec<u8>> {
        self.compress_with_stats(input).map(|(out, _)| out)
    }

    fn max_compressed_size(&self, input_len: usize) -> usize {
        let config = &self.config;
        let leaves = config.alphabet_size() as u64;
        let header = (leaves - 1) + leaves * (1 + u64::from(config.leaf_value_bits()));
        let total = (input_len as u64).saturating_add(1);
        let payload = total.saturating_mul(max_code_length(total));
        let bits = u64::from(config.magic_bits())
            .saturating_add(header)
            .saturating_add(payload);
        usize::try_from(bits.div_ceil(8)).unwrap_or(usize::MAX)
    }
}

impl Decompressor for HuffCodec {
    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>> {
        self.decompress_with_stats(input).map(|(out, _)| out)
    }
}

impl Codec for HuffCodec {}

#[cfg(test)]
mod tests {
    use super::*;
    use treehuff_core::HUFF_TREE;

    #[test]
    fn test_roundtrip_empty() {
        let codec = HuffCodec::new();
        let (compressed, stats) = codec.compress_with_stats(b"").unwrap();

        // magic (32) + header (21) + end marker code (1)
        assert_eq!(stats.bits_written, 54);
        assert_eq!(compressed.len(), 7);
        assert_eq!(stats.distinct_symbols, 2);
        assert_eq!(codec.decompress(&compressed).unwrap(), b"");
    }

    #[test]
    fn test_repeated_byte_scenario() {
        let codec = HuffCodec::new();
        let input = [0x41u8; 3];
        let (compressed, stats) = codec.compress_with_stats(&input).unwrap();

        assert_eq!(stats.header_bits, 21);
        assert_eq!(stats.bits_written, 32 + 21 + 4);
        assert_eq!(compressed.len(), 8);
        assert_eq!(&compressed[..4], &HUFF_TREE.to_be_bytes());

        assert_eq!(codec.decompress(&compressed).unwrap(), input.to_vec());
    }

    #[test]
    fn test_roundtrip_text() {
        let codec = HuffCodec::new();
        let pattern = b"The quick brown fox jumps over the lazy dog. ";
        let input: Vec<u8> = pattern.iter().cycle().take(20_000).copied().collect();

        let compressed = codec.compress(&input).unwrap();
        assert!(compressed.len() < input.len());
        assert_eq!(codec.decompress(&compressed).unwrap(), input);
    }

    #[test]
    fn test_roundtrip_all_bytes() {
        let codec = HuffCodec::new();
        let input: Vec<u8> = (0..=255u8).cycle().take(4096).collect();

        assert!(codec.verify_roundtrip(&input).unwrap());
    }

    #[test]
    fn test_wrong_magic_rejected() {
        let codec = HuffCodec::new();
        let mut compressed = codec.compress(b"hello").unwrap();
        compressed[0] ^= 0xFF;

        let mut reader = BitReader::new(Cursor::new(&compressed[..]));
        let mut writer = BitWriter::new(Vec::new());
        let err = codec.decompress_stream(&mut reader, &mut writer).unwrap_err();

        assert!(matches!(err, Error::MalformedHeader { .. }));
        assert_eq!(writer.bits_written(), 0);
        assert!(writer.into_inner().is_empty());
    }

    #[test]
    fn test_short_input_rejected() {
        let codec = HuffCodec::new();
        let err = codec.decompress(&[0xFA, 0xCE]).unwrap_err();
        assert!(matches!(err, Error::MalformedHeader { .. }));
    }

    #[test]
    fn test_truncated_payload() {
        let codec = HuffCodec::new();
        let input: Vec<u8> = b"truncate me please".repeat(10);
        let compressed = codec.compress(&input).unwrap();

        let err = codec
            .decompress(&compressed[..compressed.len() - 3])
            .unwrap_err();
        assert!(matches!(err, Error::TruncatedStream { .. }));
    }

    #[test]
    fn test_custom_magic() {
        let custom = HuffCodec::with_config(FormatConfig::with_magic(0x1234_5678));
        let compressed = custom.compress(b"tagged").unwrap();

        assert_eq!(&compressed[..4], &[0x12, 0x34, 0x56, 0x78]);
        assert_eq!(custom.decompress(&compressed).unwrap(), b"tagged");
        assert!(HuffCodec::new().decompress(&compressed).is_err());
    }

    #[test]
    fn test_decompress_stats() {
        let codec = HuffCodec::new();
        let input = b"statistics".to_vec();
        let (compressed, cstats) = codec.compress_with_stats(&input).unwrap();
        let (output, dstats) = codec.decompress_with_stats(&compressed).unwrap();

        assert_eq!(output, input);
        assert_eq!(dstats.original_size, input.len());
        assert_eq!(dstats.header_bits, cstats.header_bits);
        assert_eq!(dstats.distinct_symbols, cstats.distinct_symbols);
        assert_eq!(dstats.bits_read, cstats.bits_written);
        assert_eq!(dstats.bits_written, input.len() as u64 * 8);
    }

    #[test]
    fn test_max_compressed_size_is_an_upper_bound() {
        let codec = HuffCodec::new();
        let mut input = Vec::new();
        // Fibonacci-like counts produce the deepest trees.
        let (mut a, mut b) = (1usize, 1usize);
        for symbol in 0..12u8 {
            input.extend(std::iter::repeat(symbol).take(a));
            (a, b) = (b, a + b);
        }

        let compressed = codec.compress(&input).unwrap();
        assert!(compressed.len() <= codec.max_compressed_size(input.len()));
        assert!(codec.compress(b"").unwrap().len() <= codec.max_compressed_size(0));
    }

    #[test]
    fn test_compress_to_buffer() {
        let codec = HuffCodec::new();
        let input = b"into a caller buffer";
        let mut buffer = vec![0u8; codec.max_compressed_size(input.len())];

        let n = codec.compress_to(input, &mut buffer).unwrap();
        assert_eq!(codec.decompress(&buffer[..n]).unwrap(), input);

        let mut tiny = [0u8; 4];
        assert!(matches!(
            codec.compress_to(input, &mut tiny),
            Err(Error::BufferTooSmall { .. })
        ));
    }

    #[test]
    fn test_max_compressed_size_saturates() {
        let codec = HuffCodec::new();
        assert!(codec.max_compressed_size(usize::MAX) > 0);
        assert!(codec.max_compressed_size(usize::MAX / 2) >= codec.max_compressed_size(1 << 20));
    }

    #[test]
    fn test_compress_stream_from_offset() {
        use std::io::{Seek, SeekFrom};

        let codec = HuffCodec::new();
        let mut source = Cursor::new(&b"XYZhello"[..]);
        source.seek(SeekFrom::Start(3)).unwrap();

        let mut reader = BitReader::new(source);
        let mut writer = BitWriter::new(Vec::new());
        let stats = codec.compress_stream(&mut reader, &mut writer).unwrap();
        assert_eq!(stats.original_size, 5);

        let compressed = writer.into_inner();
        assert_eq!(codec.decompress(&compressed).unwrap(), b"hello");
    }
}
