//! huffpack-core: byte-oriented static Huffman codec
//!
//! This library compresses a byte stream with a Huffman code built from the
//! stream's own byte frequencies, and stores the code's tree alongside the
//! data so the stream can be restored exactly.
//!
//! # Architecture
//!
//! The system is designed around clear module boundaries:
//! - `bitio`: LSB-first bit packing shared by every layer
//! - `frequency`: one-pass byte counting
//! - `tree`: deterministic Huffman tree construction
//! - `codebook`: codeword table from tree paths
//! - `record`: fixed-width 64-bit tree records
//! - `codec`: file header, data encoder/decoder, whole-stream operations
//! - `metrics`: per-run statistics
//!
//! # Design Principles
//!
//! - **No panics**: All errors are structured and recoverable
//! - **Bounded memory**: Frequency table, tree and one I/O buffer; never the whole stream
//! - **Deterministic**: Identical input always produces identical output
//!
//! # Example
//! ```
//! let packed = huffpack_core::compress_bytes(b"aaab").unwrap();
//! assert_eq!(huffpack_core::decompress_bytes(&packed).unwrap(), b"aaab");
//! ```

pub mod bitio;
pub mod codebook;
pub mod codec;
pub mod error;
pub mod frequency;
pub mod metrics;
pub mod record;
pub mod tree;

// Re-export commonly used types
pub use codebook::{CodeTable, Codeword};
pub use codec::{
    compress, compress_bytes, decompress, decompress_bytes, CodecOptions, DataDecoder,
    DataEncoder, DEFAULT_CHUNK_SIZE, MAGIC,
};
pub use error::{Error, FormatError, Result};
pub use frequency::FrequencyTable;
pub use metrics::CodecStats;
pub use tree::HuffmanTree;
