//! Configuration for the huffpack application.
//!
//! Turns parsed command-line arguments into a fully resolved [`Config`]:
//! default output names are filled in and codec options are validated, so
//! the command layer never sees an incomplete job.

use std::path::{Path, PathBuf};

use huffpack_core::CodecOptions;

use crate::args::{Cli, Commands};
use crate::error::{CliError, CliResult};

/// Suffix added on compress and stripped on decompress.
pub const SUFFIX: &str = "huff";

/// What a run does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Job {
    Compress { input: PathBuf, output: PathBuf },
    Decompress { input: PathBuf, output: PathBuf },
    Sample { seed: u64, size: usize, output: PathBuf },
}

impl Job {
    pub fn output(&self) -> &Path {
        match self {
            Job::Compress { output, .. }
            | Job::Decompress { output, .. }
            | Job::Sample { output, .. } => output,
        }
    }
}

/// Complete configuration for a run.
#[derive(Debug, Clone)]
pub struct Config {
    pub job: Job,

    /// Codec I/O options
    pub options: CodecOptions,

    /// Whether to print a stats summary
    pub print_stats: bool,

    /// Whether an existing output may be replaced
    pub force: bool,
}

impl Config {
    /// Resolve configuration from parsed arguments.
    pub fn from_cli(cli: &Cli) -> CliResult<Self> {
        let job = match &cli.command {
            Commands::Compress { input, output } => Job::Compress {
                output: output.clone().unwrap_or_else(|| compressed_name(input)),
                input: input.clone(),
            },
            Commands::Decompress { input, output } => {
                let output = match output {
                    Some(output) => output.clone(),
                    None => decompressed_name(input).ok_or_else(|| {
                        CliError::Usage(format!(
                            "{} has no .{} suffix; pass --output",
                            input.display(),
                            SUFFIX
                        ))
                    })?,
                };
                Job::Decompress {
                    input: input.clone(),
                    output,
                }
            }
            Commands::Sample { seed, size, output } => Job::Sample {
                seed: *seed,
                size: *size,
                output: output.clone(),
            },
        };

        if let Job::Compress { input, output } | Job::Decompress { input, output } = &job {
            if input == output {
                return Err(CliError::Usage(format!(
                    "input and output are the same file: {}",
                    input.display()
                )));
            }
        }

        Ok(Config {
            job,
            options: CodecOptions::new(cli.chunk_size)?,
            print_stats: cli.stats,
            force: cli.force,
        })
    }

    /// Log the resolved configuration.
    pub fn print(&self) {
        match &self.job {
            Job::Compress { input, output } => {
                tracing::info!(input = %input.display(), output = %output.display(), "compress")
            }
            Job::Decompress { input, output } => {
                tracing::info!(input = %input.display(), output = %output.display(), "decompress")
            }
            Job::Sample { seed, size, output } => {
                tracing::info!(seed, size, output = %output.display(), "sample")
            }
        }
        tracing::info!(
            chunk_size = self.options.chunk_size(),
            stats = self.print_stats,
            force = self.force,
            "options"
        );
    }
}

/// `<input>.huff`
pub fn compressed_name(input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_owned();
    name.push(".");
    name.push(SUFFIX);
    PathBuf::from(name)
}

/// `input` without its `.huff` suffix, if it has one and something remains.
pub fn decompressed_name(input: &Path) -> Option<PathBuf> {
    if input.extension()? != SUFFIX {
        return None;
    }
    let stem = input.file_stem()?;
    Some(input.with_file_name(stem))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use rstest::rstest;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("huffpack").chain(args.iter().copied())).unwrap()
    }

    #[rstest]
    #[case("file.txt", "file.txt.huff")]
    #[case("archive", "archive.huff")]
    #[case("dir/data.bin", "dir/data.bin.huff")]
    fn test_compressed_name(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(compressed_name(Path::new(input)), PathBuf::from(expected));
    }

    #[rstest]
    #[case("file.txt.huff", Some("file.txt"))]
    #[case("dir/archive.huff", Some("dir/archive"))]
    #[case("file.txt", None)]
    #[case("huff", None)]
    #[case(".huff", None)]
    fn test_decompressed_name(#[case] input: &str, #[case] expected: Option<&str>) {
        assert_eq!(decompressed_name(Path::new(input)), expected.map(PathBuf::from));
    }

    #[test]
    fn test_compress_defaults() {
        let config = Config::from_cli(&parse(&["compress", "notes.txt"])).unwrap();
        assert_eq!(
            config.job,
            Job::Compress {
                input: PathBuf::from("notes.txt"),
                output: PathBuf::from("notes.txt.huff"),
            }
        );
        assert_eq!(config.options, CodecOptions::default());
        assert!(!config.print_stats);
        assert!(!config.force);
    }

    #[test]
    fn test_decompress_needs_suffix_or_output() {
        let err = Config::from_cli(&parse(&["decompress", "notes.txt"])).unwrap_err();
        assert!(matches!(err, CliError::Usage(_)));

        let config =
            Config::from_cli(&parse(&["decompress", "notes.txt", "-o", "out.txt"])).unwrap();
        assert_eq!(config.job.output(), Path::new("out.txt"));
    }

    #[test]
    fn test_global_flags() {
        let config = Config::from_cli(&parse(&[
            "compress",
            "a.bin",
            "--chunk-size",
            "512",
            "--stats",
            "-f",
        ]))
        .unwrap();
        assert_eq!(config.options.chunk_size(), 512);
        assert!(config.print_stats);
        assert!(config.force);
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let err = Config::from_cli(&parse(&["compress", "a.bin", "--chunk-size", "0"])).unwrap_err();
        assert!(matches!(err, CliError::Codec(huffpack_core::Error::Config(_))));
    }

    #[test]
    fn test_same_input_and_output_rejected() {
        let err = Config::from_cli(&parse(&["compress", "a.bin", "-o", "a.bin"])).unwrap_err();
        assert!(matches!(err, CliError::Usage(_)));
    }
}
