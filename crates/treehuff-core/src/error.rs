//! Error types for compression operations.

use thiserror::Error;

/// Result type alias for compression operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Compression error types.
#[derive(Debug, Error)]
pub enum Error {
    /// The stream header is not a valid tree-encoded header.
    #[error("malformed header: {message}")]
    MalformedHeader { message: String },

    /// Input ended while the header or the payload was still being read.
    #[error("truncated stream: input ended after {bits_read} bits")]
    TruncatedStream { bits_read: u64 },

    /// A prefix-code tree needs at least two leaves.
    #[error("degenerate alphabet: {symbols} symbol(s), at least 2 required")]
    DegenerateAlphabet { symbols: usize },

    /// The encoder was asked for a symbol that has no code.
    #[error("no code for symbol {symbol}")]
    MissingCode { symbol: u16 },

    /// Bit I/O width outside the supported range.
    #[error("invalid bit width {width}: must be in range [1, 32]")]
    InvalidWidth { width: u32 },

    /// Buffer too small for output.
    #[error("buffer too small: need {required} bytes, got {provided}")]
    BufferTooSmall { required: usize, provided: usize },

    /// I/O error from underlying stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a malformed header error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Error::MalformedHeader {
            message: message.into(),
        }
    }

    /// Create a truncated stream error.
    pub fn truncated(bits_read: u64) -> Self {
        Error::TruncatedStream { bits_read }
    }

    /// Create a degenerate alphabet error.
    pub fn degenerate(symbols: usize) -> Self {
        Error::DegenerateAlphabet { symbols }
    }

    /// Create a buffer too small error.
    pub fn buffer_too_small(required: usize, provided: usize) -> Self {
        Error::BufferTooSmall { required, provided }
    }

    /// Check if the error was caused by the compressed input itself
    /// rather than by the caller or the environment.
    pub fn is_corrupt_input(&self) -> bool {
        matches!(
            self,
            Error::MalformedHeader { .. }
                | Error::TruncatedStream { .. }
                | Error::DegenerateAlphabet { .. }
        )
    }

    /// Get error category for logging.
    pub fn category(&self) -> &'static str {
        match self {
            Error::MalformedHeader { .. } => "malformed_header",
            Error::TruncatedStream { .. } => "truncated_stream",
            Error::DegenerateAlphabet { .. } => "degenerate_alphabet",
            Error::MissingCode { .. } => "missing_code",
            Error::InvalidWidth { .. } => "invalid_width",
            Error::BufferTooSmall { .. } => "buffer_too_small",
            Error::Io(_) => "io_error",
        }
    }
}
