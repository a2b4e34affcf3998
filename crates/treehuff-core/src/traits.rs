//! Core traits for compression and decompression.
//!
//! ```text
//! Compressor / Decompressor  (one-shot, byte slices)
//!       ↓
//! Codec  (combined compress + decompress)
//! ```
//!
//! Bit-stream level entry points live on the concrete codecs; these traits
//! cover whole buffers held in memory.

use crate::error::{Error, Result};
use crate::types::CompressionRatio;

/// One-shot compression operations.
pub trait Compressor {
    /// Compress data in one shot.
    ///
    /// # Arguments
    /// * `input` - Data to compress
    ///
    /// # Returns
    /// Compressed data as a vector.
    fn compress(&self, input: &[u8]) -> Result<Vec<u8>>;

    /// Compress data into existing buffer.
    ///
    /// # Returns
    /// Number of bytes written to output.
    fn compress_to(&self, input: &[u8], output: &mut [u8]) -> Result<usize> {
        let compressed = self.compress(input)?;
        copy_into(&compressed, output)
    }

    /// Upper bound of the compressed size for an input length.
    /// Useful for pre-allocating output buffers.
    fn max_compressed_size(&self, input_len: usize) -> usize;
}

/// One-shot decompression operations.
pub trait Decompressor {
    /// Decompress data in one shot.
    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>>;

    /// Decompress data into existing buffer.
    ///
    /// # Returns
    /// Number of bytes written to output.
    fn decompress_to(&self, input: &[u8], output: &mut [u8]) -> Result<usize> {
        let decompressed = self.decompress(input)?;
        copy_into(&decompressed, output)
    }
}

/// Combined codec for both compression and decompression.
pub trait Codec: Compressor + Decompressor {
    /// Round-trip test: compress then decompress.
    /// Returns true if data matches.
    fn verify_roundtrip(&self, data: &[u8]) -> Result<bool> {
        let compressed = self.compress(data)?;
        let decompressed = self.decompress(&compressed)?;
        Ok(data == decompressed.as_slice())
    }

    /// Get compression ratio for given data.
    fn measure_ratio(&self, data: &[u8]) -> Result<CompressionRatio> {
        let compressed = self.compress(data)?;
        Ok(CompressionRatio::new(data.len(), compressed.len()))
    }
}

fn copy_into(data: &[u8], output: &mut [u8]) -> Result<usize> {
    if output.len() < data.len() {
        return Err(Error::buffer_too_small(data.len(), output.len()));
    }
    output[..data.len()].copy_from_slice(data);
    Ok(data.len())
}
