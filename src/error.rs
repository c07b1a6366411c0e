use thiserror::Error;

/// Result type for codec operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by compression and decompression operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The source path could not be opened for reading.
    #[error("source not found: {0}")]
    NotFound(String),

    /// The source contained zero bytes. Compressing nothing is rejected
    /// rather than producing a degenerate one-symbol stream.
    #[error("source is empty: {0}")]
    EmptyInput(String),

    /// A read or write failed mid-operation.
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),

    /// Decode-time failure: the bit stream never matched a code, or ran out
    /// of input before the end-of-stream marker. Signals a truncated stream
    /// or a mismatched code table.
    #[error("corrupt stream: {0}")]
    CorruptStream(String),

    /// A code table violated the prefix-free invariant.
    #[error("ambiguous code table: {0}")]
    AmbiguousCode(String),
}
