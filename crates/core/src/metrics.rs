//! Statistics for one compress or decompress run.
//!
//! # Design
//!
//! Stats are collected in a plain struct updated at each stage of a single
//! operation and returned to the caller when it finishes. Nothing is shared
//! between operations.

use std::time::{Duration, Instant};

/// Counts and timing for a single codec operation.
#[derive(Debug, Clone)]
pub struct CodecStats {
    // === Timing ===
    /// When the operation started
    pub start_time: Instant,

    /// When the operation ended (set on completion)
    pub end_time: Option<Instant>,

    // === Uncompressed side ===
    /// Original bytes (read when compressing, written when decompressing)
    pub raw_bytes: u64,

    /// Number of distinct byte values in the original data
    pub distinct_symbols: usize,

    // === Compressed side ===
    /// Tree node records, terminator excluded
    pub tree_records: usize,

    /// Bytes in the bit-packed data section
    pub data_bytes: u64,

    /// Total compressed file size: header, tree section and data
    pub compressed_bytes: u64,
}

impl CodecStats {
    /// Create new stats with start time set to now.
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            end_time: None,
            raw_bytes: 0,
            distinct_symbols: 0,
            tree_records: 0,
            data_bytes: 0,
            compressed_bytes: 0,
        }
    }

    /// Mark the operation as complete.
    pub fn complete(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Get total duration (or current elapsed if not complete).
    pub fn duration(&self) -> Duration {
        match self.end_time {
            Some(end) => end.duration_since(self.start_time),
            None => self.start_time.elapsed(),
        }
    }

    /// Compute compression ratio (compressed / raw).
    ///
    /// Returns 0.0 if there was no data.
    pub fn compression_ratio(&self) -> f64 {
        if self.raw_bytes == 0 {
            0.0
        } else {
            self.compressed_bytes as f64 / self.raw_bytes as f64
        }
    }

    /// Average codeword length in bits per original byte.
    pub fn bits_per_symbol(&self) -> f64 {
        if self.raw_bytes == 0 {
            0.0
        } else {
            (self.data_bytes * 8) as f64 / self.raw_bytes as f64
        }
    }

    /// Compute throughput over the uncompressed side in bytes/second.
    pub fn throughput_bps(&self) -> f64 {
        let duration_secs = self.duration().as_secs_f64();
        if duration_secs == 0.0 {
            0.0
        } else {
            self.raw_bytes as f64 / duration_secs
        }
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("\n=== Summary ===");
        println!("Duration: {} ms", self.duration().as_millis());
        println!();
        println!("Raw:        {} bytes ({:.2} MiB)", self.raw_bytes, self.raw_bytes as f64 / 1024.0 / 1024.0);
        println!("Compressed: {} bytes ({:.2} MiB)", self.compressed_bytes, self.compressed_bytes as f64 / 1024.0 / 1024.0);
        println!("Ratio: {:.1}%", self.compression_ratio() * 100.0);
        println!();
        println!("=== Code ===");
        println!("Distinct symbols: {}", self.distinct_symbols);
        println!("Tree records: {}", self.tree_records);
        println!("Data section: {} bytes ({:.3} bits/symbol)", self.data_bytes, self.bits_per_symbol());
        println!();
        println!("Throughput: {:.2} MB/s", self.throughput_bps() / 1_000_000.0);
    }

    /// Export stats as a simple text format (for parsing/testing).
    pub fn export_text(&self) -> String {
        format!(
            "duration_ms={}\n\
             raw_bytes={}\n\
             compressed_bytes={}\n\
             compression_ratio={:.4}\n\
             distinct_symbols={}\n\
             tree_records={}\n\
             data_bytes={}\n",
            self.duration().as_millis(),
            self.raw_bytes,
            self.compressed_bytes,
            self.compression_ratio(),
            self.distinct_symbols,
            self.tree_records,
            self.data_bytes,
        )
    }
}

impl Default for CodecStats {
    fn default() -> Self {
        Self::new()
    }
}
