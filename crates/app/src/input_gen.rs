//! Sample input generation.
//!
//! Produces deterministic test data whose byte distribution varies section by
//! section, so compression results are interesting to look at.
//!
//! # Design
//!
//! Generated data is a sequence of sections, each drawn from one
//! [`SectionKind`]: single-byte runs, small-alphabet text, short repeating
//! patterns, or uniform random bytes.

use std::io::Write;
use std::path::Path;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Upper bound on one section's length.
const SECTION_BYTES: usize = 8192;

const TEXT_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz .!,\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SectionKind {
    /// One repeated byte value
    Run,
    /// Lowercase text-like bytes
    Text,
    /// A short random pattern repeated
    Pattern,
    /// Uniform random bytes
    Noise,
}

impl SectionKind {
    /// 30% runs, 30% text, 20% patterns, 20% noise.
    fn pick(rng: &mut ChaCha8Rng) -> Self {
        match rng.gen_range(0..10u8) {
            0..=2 => SectionKind::Run,
            3..=5 => SectionKind::Text,
            6..=7 => SectionKind::Pattern,
            _ => SectionKind::Noise,
        }
    }

    fn fill(self, rng: &mut ChaCha8Rng, len: usize, out: &mut Vec<u8>) {
        match self {
            SectionKind::Run => {
                let byte: u8 = rng.gen();
                out.extend(std::iter::repeat(byte).take(len));
            }
            SectionKind::Text => {
                out.extend((0..len).map(|_| TEXT_ALPHABET[rng.gen_range(0..TEXT_ALPHABET.len())]));
            }
            SectionKind::Pattern => {
                let pattern_len = rng.gen_range(4..=32);
                let pattern: Vec<u8> = (0..pattern_len).map(|_| rng.gen()).collect();
                out.extend(pattern.iter().cycle().take(len));
            }
            SectionKind::Noise => {
                out.extend((0..len).map(|_| rng.gen::<u8>()));
            }
        }
    }
}

/// Generate `size_bytes` of sample data from `seed`.
pub fn generate_sample_data(seed: u64, size_bytes: usize) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut data = Vec::with_capacity(size_bytes);

    while data.len() < size_bytes {
        let len = (size_bytes - data.len()).min(SECTION_BYTES);
        SectionKind::pick(&mut rng).fill(&mut rng, len, &mut data);
    }

    data
}

/// Write generated data to a file.
pub fn write_sample_file(path: &Path, seed: u64, size_bytes: usize) -> std::io::Result<()> {
    let data = generate_sample_data(seed, size_bytes);
    let mut file = std::fs::File::create(path)?;
    file.write_all(&data)?;
    file.flush()
}
