//! Byte frequency counting.
//!
//! One pass over a source produces a 256-entry count table. Only the counts
//! are kept, so memory stays bounded no matter how large the source is.

use std::io::{ErrorKind, Read};

use crate::error::Result;

/// Number of distinct symbols (one per byte value).
pub const ALPHABET_SIZE: usize = 256;

/// Occurrence count for every byte value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; ALPHABET_SIZE],
}

impl FrequencyTable {
    /// Create a table with every count at zero.
    pub fn new() -> Self {
        Self {
            counts: [0; ALPHABET_SIZE],
        }
    }

    /// Count the bytes of an in-memory slice.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut table = Self::new();
        table.add(bytes);
        table
    }

    /// Count a readable source to exhaustion, `chunk_size` bytes at a time.
    ///
    /// The reader is left at end of stream; callers that need a second pass
    /// must rewind it themselves.
    pub fn from_reader<R: Read>(reader: &mut R, chunk_size: usize) -> Result<Self> {
        let mut table = Self::new();
        let mut buffer = vec![0u8; chunk_size.max(1)];

        loop {
            let n = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            table.add(&buffer[..n]);
        }

        tracing::debug!(
            total = table.total(),
            distinct = table.distinct(),
            "counted source frequencies"
        );
        Ok(table)
    }

    /// Add every byte of `bytes` to the counts.
    pub fn add(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.counts[b as usize] += 1;
        }
    }

    /// Occurrences of `symbol`.
    pub fn get(&self, symbol: u8) -> u64 {
        self.counts[symbol as usize]
    }

    /// Total number of bytes counted.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Number of byte values seen at least once.
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// True if no bytes were counted.
    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    /// Present symbols with their counts, in ascending symbol order.
    pub fn present(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c > 0)
            .map(|(s, &c)| (s as u8, c))
    }

    /// Raw count array, indexed by byte value.
    pub fn as_array(&self) -> &[u64; ALPHABET_SIZE] {
        &self.counts
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

impl From<[u64; ALPHABET_SIZE]> for FrequencyTable {
    fn from(counts: [u64; ALPHABET_SIZE]) -> Self {
        Self { counts }
    }
}
