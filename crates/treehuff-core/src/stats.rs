//! Statistics for compression operations.

use crate::types::CompressionRatio;

/// Statistics from one compression or decompression call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompressionStats {
    /// Original (uncompressed) size in bytes.
    pub original_size: usize,

    /// Compressed size in bytes, final padding included.
    pub compressed_size: usize,

    /// Bits consumed from the input during the last pass.
    pub bits_read: u64,

    /// Bits produced, padding excluded.
    pub bits_written: u64,

    /// Size of the serialized tree in bits.
    pub header_bits: u64,

    /// Number of leaves in the prefix-code tree.
    pub distinct_symbols: usize,

    /// Time taken in microseconds.
    pub time_us: u64,
}

impl CompressionStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get compression ratio.
    pub fn ratio(&self) -> CompressionRatio {
        CompressionRatio::new(self.original_size, self.compressed_size)
    }

    /// Get space savings as percentage.
    pub fn savings_percent(&self) -> f64 {
        self.ratio().savings_percent()
    }

    /// Average payload bits per original byte, header excluded.
    pub fn bits_per_symbol(&self) -> f64 {
        if self.original_size == 0 {
            return 0.0;
        }
        let payload = self
            .bits_written
            .saturating_sub(self.header_bits + u64::from(crate::types::BITS_PER_INT));
        payload as f64 / self.original_size as f64
    }

    /// Get throughput in MB/s.
    pub fn throughput_mbs(&self) -> f64 {
        if self.time_us == 0 {
            return 0.0;
        }
        self.original_size as f64 / self.time_us as f64
    }

    /// One-line summary for logs.
    pub fn summary(&self) -> String {
        format!(
            "{} -> {} bytes (ratio: {:.2}x, {:.2} bits/symbol, {} symbols), {} us",
            self.original_size,
            self.compressed_size,
            self.ratio().ratio(),
            self.bits_per_symbol(),
            self.distinct_symbols,
            self.time_us,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stats() {
        let stats = CompressionStats::new();
        assert_eq!(stats.bits_per_symbol(), 0.0);
        assert_eq!(stats.throughput_mbs(), 0.0);
        assert_eq!(stats.savings_percent(), 0.0);
    }

    #[test]
    fn test_bits_per_symbol_excludes_header() {
        let stats = CompressionStats {
            original_size: 3,
            compressed_size: 8,
            bits_written: 32 + 21 + 4,
            header_bits: 21,
            distinct_symbols: 2,
            ..Default::default()
        };
        assert!((stats.bits_per_symbol() - 4.0 / 3.0).abs() < 1e-9);
        assert!(stats.summary().starts_with("3 -> 8 bytes"));
    }
}
