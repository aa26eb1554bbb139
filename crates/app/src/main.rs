//! huffpack: compress and decompress files with a static Huffman code.

mod args;
mod commands;
mod config;
mod error;
mod exitcode;
mod input_gen;

use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use crate::args::Cli;
use crate::config::Config;
use crate::error::CliResult;

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.debug);

    let code = match run(&cli) {
        Ok(()) => exitcode::OK,
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    };
    std::process::exit(code);
}

fn run(cli: &Cli) -> CliResult<()> {
    let config = Config::from_cli(cli)?;
    config.print();

    let stats = commands::execute(&config)?;
    tracing::info!(output = %config.job.output().display(), "done");

    if let (Some(stats), true) = (stats, config.print_stats) {
        stats.print_summary();
    }
    Ok(())
}

fn setup_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    // RUST_LOG wins when set
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level.into()));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false);

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(filter))
        .init();

    tracing::debug!(?level, "logging initialised");
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    // https://docs.rs/clap/latest/clap/_derive/_tutorial/index.html#testing
    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_debug_flag_counts() {
        let cli = Cli::try_parse_from(["huffpack", "-ddd", "compress", "x"]).unwrap();
        assert_eq!(cli.debug, 3);
    }

    #[test]
    fn test_run_reports_usage_error() {
        let cli = Cli::try_parse_from(["huffpack", "decompress", "plain.txt"]).unwrap();
        let err = run(&cli).unwrap_err();
        assert_eq!(err.exit_code(), exitcode::USAGE);
    }
}
