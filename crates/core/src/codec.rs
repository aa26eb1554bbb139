//! Whole-stream compression and decompression.
//!
//! # File Format
//!
//! ```text
//! +----------------------+
//! | Magic (8 bytes)      |  7B 68 75 7C 6D 7D 66 66
//! +----------------------+
//! | Tree records         |  8 bytes per node, pre-order (see `record`)
//! | (0..=511 records)    |  absent for an empty source
//! +----------------------+
//! | Terminator (8 bytes) |  all zero
//! +----------------------+
//! | Data                 |  codewords, bit-packed LSB-first, last byte
//! | (variable)           |  zero-padded; absent for an empty source
//! +----------------------+
//! ```
//!
//! The data section carries no length. The decoder stops after emitting
//! root-weight symbols, so pad bits (and anything after them) are never
//! interpreted.
//!
//! Compression makes two passes over the source (count, then encode) and
//! therefore needs `Read + Seek`. Decompression is a single forward pass.

use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};

use crate::bitio::{unpack_byte, BitWriter};
use crate::codebook::CodeTable;
use crate::error::{Error, FormatError, HuffmanError, Result};
use crate::frequency::FrequencyTable;
use crate::metrics::CodecStats;
use crate::record::{read_tree, write_tree, RECORD_LEN};
use crate::tree::{HuffmanTree, Node, NodeId};

/// File header identifying a huffpack stream.
pub const MAGIC: [u8; 8] = [0x7B, 0x68, 0x75, 0x7C, 0x6D, 0x7D, 0x66, 0x66];

/// Default I/O buffer size in bytes.
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Tunables for a codec run. Only affects I/O granularity, never the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecOptions {
    chunk_size: usize,
}

impl CodecOptions {
    /// # Errors
    /// `Error::Config` if `chunk_size` is zero.
    pub fn new(chunk_size: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(Error::Config("chunk size must be at least 1 byte".to_string()));
        }
        Ok(Self { chunk_size })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

/// Turns source bytes into packed codeword bytes, chunk by chunk.
///
/// Bits that do not yet fill a byte are carried into the next chunk;
/// [`DataEncoder::finish`] flushes them as one zero-padded byte.
#[derive(Debug)]
pub struct DataEncoder<'a> {
    table: &'a CodeTable,
    writer: BitWriter,
    symbols: u64,
}

impl<'a> DataEncoder<'a> {
    pub fn new(table: &'a CodeTable) -> Self {
        Self {
            table,
            writer: BitWriter::new(),
            symbols: 0,
        }
    }

    /// Append the codewords for `chunk` and return every byte completed.
    ///
    /// # Errors
    /// `HuffmanError::SymbolAbsent` for a byte the table has no codeword for.
    pub fn encode_chunk(&mut self, chunk: &[u8]) -> Result<Vec<u8>> {
        for &symbol in chunk {
            let word = self
                .table
                .get(symbol)
                .ok_or(HuffmanError::SymbolAbsent { symbol })?;
            self.writer.write_all_bits(word.bits());
        }
        self.symbols += chunk.len() as u64;
        Ok(self.writer.take_complete())
    }

    /// Symbols encoded so far.
    pub fn symbols(&self) -> u64 {
        self.symbols
    }

    /// Flush pending bits. Returns an empty vec when the stream ended on a
    /// byte boundary.
    pub fn finish(self) -> Vec<u8> {
        self.writer.finish()
    }
}

/// Replays tree traversal against a packed bit stream.
///
/// State is the current tree position and the count of symbols still owed.
/// Each `0` bit steps left and each `1` bit steps right; reaching a leaf emits
/// its symbol and returns to the root. Decoding ends when the count reaches
/// zero, never at the end of input.
#[derive(Debug)]
pub struct DataDecoder<'a> {
    tree: &'a HuffmanTree,
    position: NodeId,
    remaining: u64,
}

impl<'a> DataDecoder<'a> {
    pub fn new(tree: &'a HuffmanTree) -> Self {
        Self {
            tree,
            position: tree.root(),
            remaining: tree.weight(),
        }
    }

    /// Symbols still to be decoded.
    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    pub fn is_complete(&self) -> bool {
        self.remaining == 0
    }

    /// Decode the bits of `chunk`, appending symbols to `out`.
    ///
    /// Returns how many bytes of `chunk` were used. Once the last symbol is
    /// emitted the rest of the byte is padding and later bytes are not read.
    pub fn decode_chunk(&mut self, chunk: &[u8], out: &mut Vec<u8>) -> Result<usize> {
        for (i, &byte) in chunk.iter().enumerate() {
            if self.is_complete() {
                return Ok(i);
            }
            for bit in unpack_byte(byte) {
                self.step(bit, out)?;
                if self.is_complete() {
                    return Ok(i + 1);
                }
            }
        }
        Ok(chunk.len())
    }

    fn step(&mut self, bit: bool, out: &mut Vec<u8>) -> Result<()> {
        let next = match self.tree.child(self.position, bit) {
            Some(next) => next,
            // Leaf root: one `0` bit per occurrence
            None if bit => return Err(FormatError::InvalidSingleSymbolBit.into()),
            None => self.position,
        };

        match *self.tree.node(next) {
            Node::Leaf { symbol, .. } => {
                out.push(symbol);
                self.remaining -= 1;
                self.position = self.tree.root();
            }
            Node::Inner { .. } => self.position = next,
        }
        Ok(())
    }

    /// Check that every symbol was decoded.
    ///
    /// # Errors
    /// `FormatError::TruncatedData` if input ran out first.
    pub fn finish(&self) -> Result<()> {
        if self.remaining > 0 {
            return Err(FormatError::TruncatedData {
                remaining: self.remaining,
            }
            .into());
        }
        Ok(())
    }
}

/// Compress `source` into `sink`.
///
/// The source is rewound before each of its two passes. Output is written
/// in order: header, tree records, terminator, data. On error, whatever was
/// already written stays in the sink.
pub fn compress<R, W>(source: &mut R, sink: &mut W, options: &CodecOptions) -> Result<CodecStats>
where
    R: Read + Seek,
    W: Write,
{
    let mut stats = CodecStats::new();

    source.seek(SeekFrom::Start(0))?;
    let frequencies = FrequencyTable::from_reader(source, options.chunk_size)?;
    let tree = HuffmanTree::build(&frequencies);

    sink.write_all(&MAGIC)?;
    stats.tree_records = write_tree(tree.as_ref(), sink)?;
    stats.raw_bytes = frequencies.total();
    stats.distinct_symbols = frequencies.distinct();

    if let Some(tree) = &tree {
        let table = CodeTable::from_tree(tree);
        source.seek(SeekFrom::Start(0))?;
        stats.data_bytes = encode_data(source, sink, &table, options, frequencies.total())?;
    }
    sink.flush()?;

    stats.compressed_bytes =
        (MAGIC.len() + (stats.tree_records + 1) * RECORD_LEN) as u64 + stats.data_bytes;
    stats.complete();

    tracing::info!(
        raw_bytes = stats.raw_bytes,
        compressed_bytes = stats.compressed_bytes,
        distinct = stats.distinct_symbols,
        "compressed"
    );
    Ok(stats)
}

fn encode_data<R: Read, W: Write>(
    source: &mut R,
    sink: &mut W,
    table: &CodeTable,
    options: &CodecOptions,
    expected: u64,
) -> Result<u64> {
    let mut encoder = DataEncoder::new(table);
    let mut buffer = vec![0u8; options.chunk_size];
    let mut written = 0u64;

    loop {
        let n = read_some(source, &mut buffer)?;
        if n == 0 {
            break;
        }
        let bytes = encoder.encode_chunk(&buffer[..n])?;
        sink.write_all(&bytes)?;
        written += bytes.len() as u64;
        tracing::trace!(read = n, emitted = bytes.len(), "encoded chunk");
    }

    if encoder.symbols() != expected {
        return Err(HuffmanError::SourceChanged {
            expected,
            actual: encoder.symbols(),
        }
        .into());
    }

    let tail = encoder.finish();
    sink.write_all(&tail)?;
    Ok(written + tail.len() as u64)
}

/// Decompress `source` into `sink`.
///
/// # Errors
/// - `FormatError::TruncatedHeader` / `InvalidMagic` before any tree bytes are read
/// - tree section errors from [`read_tree`]
/// - `FormatError::TruncatedData` if the data ends before every symbol is decoded
pub fn decompress<R, W>(source: &mut R, sink: &mut W, options: &CodecOptions) -> Result<CodecStats>
where
    R: Read,
    W: Write,
{
    let mut stats = CodecStats::new();

    read_header(source)?;
    let tree = read_tree(source)?;

    if let Some(tree) = &tree {
        stats.tree_records = tree.len();
        stats.distinct_symbols = tree.leaf_count();
        stats.raw_bytes = tree.weight();
        stats.data_bytes = decode_data(source, sink, tree, options)?;
    }
    sink.flush()?;

    stats.compressed_bytes =
        (MAGIC.len() + (stats.tree_records + 1) * RECORD_LEN) as u64 + stats.data_bytes;
    stats.complete();

    tracing::info!(
        raw_bytes = stats.raw_bytes,
        compressed_bytes = stats.compressed_bytes,
        "decompressed"
    );
    Ok(stats)
}

fn read_header<R: Read>(source: &mut R) -> Result<()> {
    let mut header = [0u8; 8];
    let mut filled = 0;

    while filled < header.len() {
        match source.read(&mut header[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }

    if filled < header.len() {
        return Err(FormatError::TruncatedHeader { actual: filled }.into());
    }
    if header != MAGIC {
        return Err(FormatError::InvalidMagic { actual: header }.into());
    }
    Ok(())
}

fn decode_data<R: Read, W: Write>(
    source: &mut R,
    sink: &mut W,
    tree: &HuffmanTree,
    options: &CodecOptions,
) -> Result<u64> {
    let mut decoder = DataDecoder::new(tree);
    let mut buffer = vec![0u8; options.chunk_size];
    let mut out = Vec::with_capacity(options.chunk_size);
    let mut used = 0u64;

    while !decoder.is_complete() {
        let n = read_some(source, &mut buffer)?;
        if n == 0 {
            break;
        }
        out.clear();
        let consumed = decoder.decode_chunk(&buffer[..n], &mut out)?;
        sink.write_all(&out)?;
        used += consumed as u64;
        tracing::trace!(read = n, emitted = out.len(), "decoded chunk");
    }

    decoder.finish()?;
    Ok(used)
}

fn read_some<R: Read>(source: &mut R, buffer: &mut [u8]) -> Result<usize> {
    loop {
        match source.read(buffer) {
            Ok(n) => return Ok(n),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
}

/// Compress an in-memory buffer with default options.
pub fn compress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    compress(&mut std::io::Cursor::new(data), &mut out, &CodecOptions::default())?;
    Ok(out)
}

/// Decompress an in-memory buffer with default options.
pub fn decompress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    decompress(&mut std::io::Cursor::new(data), &mut out, &CodecOptions::default())?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::TERMINATOR;
    use std::io::Cursor;

    #[test]
    fn test_round_trip() {
        let data = b"hello world! this is a test of the codec: aaaaaaaaaa bbbbbbbbbb";
        let compressed = compress_bytes(data).unwrap();
        assert_eq!(decompress_bytes(&compressed).unwrap(), data);
    }

    #[test]
    fn test_empty_source_is_header_and_terminator() {
        let compressed = compress_bytes(b"").unwrap();
        assert_eq!(compressed.len(), 16);
        assert_eq!(&compressed[..8], &MAGIC);
        assert_eq!(&compressed[8..], &TERMINATOR);
        assert!(decompress_bytes(&compressed).unwrap().is_empty());
    }

    #[test]
    fn test_single_symbol_uses_one_bit_each() {
        let data = vec![b'X'; 20];
        let compressed = compress_bytes(&data).unwrap();
        // header + leaf + terminator + ceil(20 / 8) zero bytes
        assert_eq!(compressed.len(), 8 + 8 + 8 + 3);
        assert_eq!(&compressed[24..], &[0, 0, 0]);
        assert_eq!(decompress_bytes(&compressed).unwrap(), data);
    }

    #[test]
    fn test_single_symbol_rejects_one_bit() {
        let mut compressed = compress_bytes(b"XXX").unwrap();
        let last = compressed.len() - 1;
        compressed[last] = 0b0000_0010;
        assert!(matches!(
            decompress_bytes(&compressed),
            Err(Error::Format(FormatError::InvalidSingleSymbolBit))
        ));
    }

    #[test]
    fn test_chunk_size_does_not_change_output() {
        let data: Vec<u8> = b"abracadabra, the quick brown fox".repeat(37);
        let reference = compress_bytes(&data).unwrap();

        for chunk_size in [1, 2, 5, 13, 4096] {
            let options = CodecOptions::new(chunk_size).unwrap();
            let mut out = Vec::new();
            compress(&mut Cursor::new(&data), &mut out, &options).unwrap();
            assert_eq!(out, reference, "chunk_size {}", chunk_size);

            let mut decoded = Vec::new();
            decompress(&mut Cursor::new(&out), &mut decoded, &options).unwrap();
            assert_eq!(decoded, data, "chunk_size {}", chunk_size);
        }
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        assert!(matches!(CodecOptions::new(0), Err(Error::Config(_))));
    }

    #[test]
    fn test_compress_rewinds_source() {
        let mut source = Cursor::new(b"rewind me".to_vec());
        source.set_position(4);
        let mut out = Vec::new();
        compress(&mut source, &mut out, &CodecOptions::default()).unwrap();
        assert_eq!(decompress_bytes(&out).unwrap(), b"rewind me");
    }

    #[test]
    fn test_stats() {
        let data = b"aaab";
        let mut out = Vec::new();
        let stats = compress(&mut Cursor::new(data), &mut out, &CodecOptions::default()).unwrap();
        assert_eq!(stats.raw_bytes, 4);
        assert_eq!(stats.distinct_symbols, 2);
        assert_eq!(stats.tree_records, 3);
        assert_eq!(stats.data_bytes, 1);
        assert_eq!(stats.compressed_bytes, out.len() as u64);
        assert!(stats.end_time.is_some());

        let mut decoded = Vec::new();
        let stats = decompress(&mut Cursor::new(&out), &mut decoded, &CodecOptions::default()).unwrap();
        assert_eq!(stats.raw_bytes, 4);
        assert_eq!(stats.compressed_bytes, out.len() as u64);
    }

    #[test]
    fn test_trailing_bytes_after_data_ignored() {
        let mut compressed = compress_bytes(b"aaab").unwrap();
        compressed.extend_from_slice(&[0xFF, 0xFF]);
        assert_eq!(decompress_bytes(&compressed).unwrap(), b"aaab");
    }

    #[test]
    fn test_truncated_data() {
        let data = b"some text that needs more than one byte of codewords";
        let compressed = compress_bytes(data).unwrap();
        let cut = &compressed[..compressed.len() - 2];
        assert!(matches!(
            decompress_bytes(cut),
            Err(Error::Format(FormatError::TruncatedData { .. }))
        ));
    }

    #[test]
    fn test_truncated_header() {
        assert!(matches!(
            decompress_bytes(&MAGIC[..5]),
            Err(Error::Format(FormatError::TruncatedHeader { actual: 5 }))
        ));
    }

    #[test]
    fn test_encoder_rejects_unknown_symbol() {
        let tree = HuffmanTree::build(&FrequencyTable::from_bytes(b"ab")).unwrap();
        let table = CodeTable::from_tree(&tree);
        let mut encoder = DataEncoder::new(&table);
        assert!(matches!(
            encoder.encode_chunk(b"abc"),
            Err(Error::Huffman(HuffmanError::SymbolAbsent { symbol: b'c' }))
        ));
    }

    #[test]
    fn test_decoder_stops_at_symbol_count() {
        let tree = HuffmanTree::build(&FrequencyTable::from_bytes(b"aaab")).unwrap();
        let mut decoder = DataDecoder::new(&tree);
        let mut out = Vec::new();

        // 1,1,1,0 then pad bits that would decode as more `b`s
        let used = decoder.decode_chunk(&[0b0000_0111, 0x00], &mut out).unwrap();
        assert_eq!(used, 1);
        assert_eq!(out, b"aaab");
        assert!(decoder.is_complete());
        decoder.finish().unwrap();
    }

    #[test]
    fn test_decoder_carries_position_across_chunks() {
        let data = b"abcdefgh";
        let tree = HuffmanTree::build(&FrequencyTable::from_bytes(data)).unwrap();
        let table = CodeTable::from_tree(&tree);
        let mut encoder = DataEncoder::new(&table);
        let mut packed = encoder.encode_chunk(data).unwrap();
        packed.extend(encoder.finish());

        let mut decoder = DataDecoder::new(&tree);
        let mut out = Vec::new();
        for byte in &packed {
            decoder.decode_chunk(std::slice::from_ref(byte), &mut out).unwrap();
        }
        assert_eq!(out, data);
        assert_eq!(decoder.remaining(), 0);
    }

    /// Serves `passes[n]` after the n-th rewind, like a file edited between
    /// the counting and encoding passes.
    struct ShiftingSource {
        passes: Vec<Vec<u8>>,
        rewinds: usize,
        current: Cursor<Vec<u8>>,
    }

    impl ShiftingSource {
        fn new(first: &[u8], second: &[u8]) -> Self {
            Self {
                passes: vec![first.to_vec(), second.to_vec()],
                rewinds: 0,
                current: Cursor::new(Vec::new()),
            }
        }
    }

    impl Read for ShiftingSource {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            self.current.read(buf)
        }
    }

    impl Seek for ShiftingSource {
        fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
            assert_eq!(pos, SeekFrom::Start(0));
            let pass = self.rewinds.min(self.passes.len() - 1);
            self.current = Cursor::new(self.passes[pass].clone());
            self.rewinds += 1;
            Ok(0)
        }
    }

    #[test]
    fn test_source_growing_between_passes() {
        let mut source = ShiftingSource::new(b"aaab", b"aaabab");
        let mut sink = Vec::new();
        let err = compress(&mut source, &mut sink, &CodecOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            Error::Huffman(HuffmanError::SourceChanged { expected: 4, actual: 6 })
        ));
        assert_eq!(source.rewinds, 2);
    }

    #[test]
    fn test_source_shrinking_between_passes() {
        let mut source = ShiftingSource::new(b"aaab", b"ab");
        let mut sink = Vec::new();
        let err = compress(&mut source, &mut sink, &CodecOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            Error::Huffman(HuffmanError::SourceChanged { expected: 4, actual: 2 })
        ));
    }

    #[test]
    fn test_new_symbol_between_passes() {
        let mut source = ShiftingSource::new(b"aaab", b"aazb");
        let mut sink = Vec::new();
        let err = compress(&mut source, &mut sink, &CodecOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            Error::Huffman(HuffmanError::SymbolAbsent { symbol: b'z' })
        ));
    }
}
