use std::io::IsTerminal;

use clap::Parser;
use miette::{IntoDiagnostic, Result};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: flat::commands::Commands,
}

/// Log to stderr, filtered by `RUST_LOG` and defaulting to INFO.
fn init_logging() -> Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    let stderr = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_file(true)
        .with_line_number(true)
        .with_target(false)
        .without_time()
        .compact();

    tracing_subscriber::registry()
        .with(stderr)
        .with(filter)
        .try_init()
        .into_diagnostic()
}

fn main() -> Result<()> {
    better_panic::install();

    let cli = Cli::parse();
    init_logging()?;

    cli.command.handle()
}
