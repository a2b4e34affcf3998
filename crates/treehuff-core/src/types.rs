//! Core type definitions and format constants.

/// A coded symbol: a literal byte (`0..=255`) or [`PSEUDO_EOF`].
pub type Symbol = u16;

/// Bits per literal input symbol.
pub const BITS_PER_WORD: u32 = 8;

/// Bits in the stream tag that opens every compressed stream.
pub const BITS_PER_INT: u32 = 32;

/// Number of literal symbols (one per byte value).
pub const LITERAL_COUNT: usize = 1 << BITS_PER_WORD;

/// The end-of-stream pseudo-symbol.
pub const PSEUDO_EOF: Symbol = LITERAL_COUNT as Symbol;

/// Alphabet size: every byte value plus [`PSEUDO_EOF`].
pub const ALPHABET_SIZE: usize = LITERAL_COUNT + 1;

/// Width of the symbol field stored in each header leaf.
pub const LEAF_VALUE_BITS: u32 = BITS_PER_WORD + 1;

/// Base tag of the format family.
pub const HUFF_NUMBER: u32 = 0xface_8200;

/// Tag of the tree-encoded header variant.
pub const HUFF_TREE: u32 = HUFF_NUMBER | 1;

/// Format parameters shared by the encoder and the decoder.
///
/// Only the stream tag is configurable; symbol widths are fixed by the
/// 257-symbol alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FormatConfig {
    magic: u32,
}

impl FormatConfig {
    /// The standard tree-header format.
    pub const STANDARD: FormatConfig = FormatConfig { magic: HUFF_TREE };

    /// Use a different 32-bit stream tag.
    pub const fn with_magic(magic: u32) -> Self {
        FormatConfig { magic }
    }

    /// The 32-bit tag written before the header.
    #[inline]
    pub const fn magic(&self) -> u32 {
        self.magic
    }

    /// Bits per literal symbol.
    #[inline]
    pub const fn word_bits(&self) -> u32 {
        BITS_PER_WORD
    }

    /// Width of the stream tag.
    #[inline]
    pub const fn magic_bits(&self) -> u32 {
        BITS_PER_INT
    }

    /// Width of a header leaf's symbol field.
    #[inline]
    pub const fn leaf_value_bits(&self) -> u32 {
        LEAF_VALUE_BITS
    }

    /// Number of symbols including the end marker.
    #[inline]
    pub const fn alphabet_size(&self) -> usize {
        ALPHABET_SIZE
    }

    /// The end-of-stream pseudo-symbol.
    #[inline]
    pub const fn end_marker(&self) -> Symbol {
        PSEUDO_EOF
    }
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Compression ratio metrics.
#[derive(Debug, Clone, Copy)]
pub struct CompressionRatio {
    /// Original uncompressed size in bytes.
    pub original_size: usize,
    /// Compressed size in bytes.
    pub compressed_size: usize,
}

impl CompressionRatio {
    /// Create new ratio from sizes.
    pub fn new(original: usize, compressed: usize) -> Self {
        CompressionRatio {
            original_size: original,
            compressed_size: compressed,
        }
    }

    /// Calculate ratio (original / compressed).
    /// Higher is better (more compression).
    pub fn ratio(&self) -> f64 {
        if self.compressed_size == 0 {
            return 0.0;
        }
        self.original_size as f64 / self.compressed_size as f64
    }

    /// Calculate space savings as percentage (0-100).
    pub fn savings_percent(&self) -> f64 {
        if self.original_size == 0 {
            return 0.0;
        }
        (1.0 - (self.compressed_size as f64 / self.original_size as f64)) * 100.0
    }

    /// Check if compression was effective (saved space).
    pub fn is_effective(&self) -> bool {
        self.compressed_size < self.original_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_constants() {
        assert_eq!(LITERAL_COUNT, 256);
        assert_eq!(ALPHABET_SIZE, 257);
        assert_eq!(PSEUDO_EOF, 256);
        assert_eq!(LEAF_VALUE_BITS, 9);
        assert_eq!(HUFF_TREE, 0xface_8201);
        // The leaf field must be wide enough for the end marker.
        assert!((PSEUDO_EOF as u32) < (1 << LEAF_VALUE_BITS));
    }

    #[test]
    fn test_format_config() {
        let config = FormatConfig::default();
        assert_eq!(config, FormatConfig::STANDARD);
        assert_eq!(config.magic(), HUFF_TREE);
        assert_eq!(config.end_marker(), PSEUDO_EOF);
        assert_eq!(config.alphabet_size(), 257);

        let custom = FormatConfig::with_magic(0x1234_5678);
        assert_eq!(custom.magic(), 0x1234_5678);
        assert_eq!(custom.word_bits(), 8);
    }

    #[test]
    fn test_compression_ratio() {
        let ratio = CompressionRatio::new(1000, 250);
        assert!((ratio.ratio() - 4.0).abs() < f64::EPSILON);
        assert!((ratio.savings_percent() - 75.0).abs() < 1e-9);
        assert!(ratio.is_effective());

        let empty = CompressionRatio::new(0, 8);
        assert_eq!(empty.savings_percent(), 0.0);
        assert!(!empty.is_effective());
    }
}
