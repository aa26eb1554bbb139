//! Command execution: file plumbing around the codec.
//!
//! The codec only sees a seekable reader and a writer. This layer opens the
//! files, refuses to clobber existing outputs unless forced, and removes the
//! output of a failed run so no partial file is left behind.

use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use huffpack_core::CodecStats;

use crate::config::{Config, Job};
use crate::error::{CliError, CliResult};
use crate::input_gen;

/// Run the configured job. Returns stats for codec jobs.
pub fn execute(config: &Config) -> CliResult<Option<CodecStats>> {
    match &config.job {
        Job::Compress { input, output } => {
            ensure_distinct(input, output)?;
            let stats = with_output(output, config.force, |sink| {
                let mut source = open_input(input)?;
                Ok(huffpack_core::compress(&mut source, sink, &config.options)?)
            })?;
            Ok(Some(stats))
        }
        Job::Decompress { input, output } => {
            ensure_distinct(input, output)?;
            let stats = with_output(output, config.force, |sink| {
                let mut source = open_input(input)?;
                Ok(huffpack_core::decompress(&mut source, sink, &config.options)?)
            })?;
            Ok(Some(stats))
        }
        Job::Sample { seed, size, output } => {
            if output.exists() && !config.force {
                return Err(CliError::OutputExists(output.clone()));
            }
            input_gen::write_sample_file(output, *seed, *size).map_err(|source| {
                CliError::Create {
                    path: output.clone(),
                    source,
                }
            })?;
            tracing::info!(path = %output.display(), size, "wrote sample");
            Ok(None)
        }
    }
}

fn open_input(path: &Path) -> CliResult<BufReader<File>> {
    let file = File::open(path).map_err(|source| CliError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}

/// Reject an output that names the input file under another spelling.
///
/// Only an existing output can alias the input, so a missing output (or a
/// missing input, reported later by [`open_input`]) passes.
fn ensure_distinct(input: &Path, output: &Path) -> CliResult<()> {
    let (Ok(input), Ok(output)) = (std::fs::canonicalize(input), std::fs::canonicalize(output))
    else {
        return Ok(());
    };
    if input == output {
        return Err(CliError::Usage(format!(
            "input and output are the same file: {}",
            input.display()
        )));
    }
    Ok(())
}

/// Create `path`, run `f` against it, and delete it again if `f` fails.
fn with_output<T>(
    path: &Path,
    force: bool,
    f: impl FnOnce(&mut BufWriter<File>) -> CliResult<T>,
) -> CliResult<T> {
    let mut options = OpenOptions::new();
    options.write(true);
    if force {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }

    let file = options.open(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::AlreadyExists {
            CliError::OutputExists(path.to_path_buf())
        } else {
            CliError::Create {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    let mut sink = BufWriter::new(file);

    let result = f(&mut sink).and_then(|value| {
        sink.flush().map_err(huffpack_core::Error::from)?;
        Ok(value)
    });

    if result.is_err() {
        drop(sink);
        if let Err(e) = std::fs::remove_file(path) {
            tracing::warn!(path = %path.display(), error = %e, "could not remove partial output");
        } else {
            tracing::debug!(path = %path.display(), "removed partial output");
        }
    }

    result
}
