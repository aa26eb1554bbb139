//! Error types for the huffpack codec.
//!
//! All operations return structured errors rather than panicking. A failed
//! compress or decompress aborts the whole operation; bytes already written
//! to the sink are left for the caller to discard.

use thiserror::Error;

/// Top-level error type for all operations in the codec.
///
/// Each variant corresponds to a specific failure domain:
/// - Format: the compressed stream is not a well-formed huffpack file
/// - I/O: reading the source or writing the sink failed
/// - Bit I/O: the bit packer was driven past its limits
/// - Huffman: a tree or code table could not be used for this input
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed compressed stream (bad header, terminator, truncation)
    #[error("format error: {0}")]
    Format(#[from] FormatError),

    /// Source or sink I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Bit I/O operation failed (e.g., reading past end of buffer)
    #[error("bit I/O error: {0}")]
    BitIo(#[from] BitIoError),

    /// Huffman codec error (e.g., weight too large for its record field)
    #[error("huffman codec error: {0}")]
    Huffman(#[from] HuffmanError),

    /// Invalid codec options
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// True when the error describes bad compressed input rather than an
    /// environment failure.
    pub fn is_format(&self) -> bool {
        matches!(self, Error::Format(_))
    }
}

/// Compressed stream format errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    /// Stream ended before the 8-byte header was complete
    #[error("truncated header: got {actual} of 8 bytes")]
    TruncatedHeader { actual: usize },

    /// Header bytes do not match the huffpack magic
    #[error("invalid magic number: got {actual:02x?}")]
    InvalidMagic { actual: [u8; 8] },

    /// The record following the tree is not the all-zero terminator
    #[error("missing tree terminator: got {actual:02x?}")]
    MissingTerminator { actual: [u8; 8] },

    /// Stream ended inside the tree section
    #[error("truncated tree section")]
    TruncatedTree,

    /// Stream ended before every symbol was decoded
    #[error("truncated data section: {remaining} symbols still expected")]
    TruncatedData { remaining: u64 },

    /// A terminator appeared where a subtree record was required
    #[error("terminator record inside tree")]
    UnexpectedTerminator,

    /// Tree nesting exceeds what a 256-symbol alphabet can produce
    #[error("tree deeper than {max} levels")]
    TreeTooDeep { max: usize },

    /// More nodes than a 256-symbol tree can have
    #[error("tree has more than {max} nodes")]
    TooManyNodes { max: usize },

    /// Inner node weight differs from the sum of its children
    #[error("inner node weight {actual} does not match children total {expected}")]
    WeightMismatch { expected: u64, actual: u64 },

    /// Leaf record with a zero count
    #[error("leaf for symbol {symbol:#04x} has zero weight")]
    ZeroLeafWeight { symbol: u8 },

    /// Single-symbol streams only use the codeword `0`
    #[error("invalid bit in single-symbol data stream")]
    InvalidSingleSymbolBit,
}

/// Bit-level I/O errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BitIoError {
    /// Attempted to read past the end of the buffer
    #[error("unexpected end of bit stream")]
    UnexpectedEof,

    /// Invalid bit count (more than 64 bits in one call)
    #[error("invalid bit count: {0}")]
    InvalidBitCount(usize),
}

/// Huffman codec errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HuffmanError {
    /// Weight does not fit its fixed-width record field
    #[error("weight {weight} exceeds record field maximum {max}")]
    WeightOverflow { weight: u64, max: u64 },

    /// Source produced a byte that was absent during frequency counting
    #[error("symbol {symbol:#04x} has no codeword (source changed between passes?)")]
    SymbolAbsent { symbol: u8 },

    /// Second pass over the source saw a different number of bytes
    #[error("source length changed between passes: counted {expected}, encoded {actual}")]
    SourceChanged { expected: u64, actual: u64 },
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
