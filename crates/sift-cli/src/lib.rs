//! Command-line front end for [`sift`].
//!
//! Loads a JSON collection, resolves a filter strategy from flags and an
//! optional config file, and prints the matching items. With
//! `--interactive`, queries and commands are read from stdin and the results
//! are reprinted after each change.

pub mod args;
pub mod config;
pub mod input;
pub mod output;
pub mod session;

use std::io::{self, Write};

use anyhow::{Context, Result};
use tracing::debug;
use tracing_subscriber::EnvFilter;

pub use args::Args;
pub use config::Settings;
pub use output::OutputFormat;

/// Environment variable holding a `tracing` filter directive.
pub const LOG_ENV: &str = "SIFT_LOG";

/// Installs the stderr log subscriber.
///
/// `SIFT_LOG` takes precedence; otherwise `-v` selects debug and `-vv`
/// trace, with warnings shown by default.
pub fn init_logging(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));

    // A subscriber may already be installed (e.g. by a test harness).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

/// Runs the command described by `args`, writing results to stdout.
pub fn run(args: Args) -> Result<()> {
    let settings = Settings::resolve(&args)?;
    let items = input::load(args.file.as_deref()).context("failed to load items")?;

    let stdout = io::stdout();
    if args.interactive {
        let stdin = io::stdin();
        return session::run(
            items,
            settings,
            &args.query,
            args.output,
            stdin.lock(),
            stdout.lock(),
        );
    }

    let text = filter_and_render(&items, &args.query, &settings, args.output)?;
    let mut out = stdout.lock();
    out.write_all(text.as_bytes())?;
    out.flush()?;
    Ok(())
}

/// One-shot filter pass over `items`, rendered in `format`.
pub fn filter_and_render(
    items: &[serde_json::Value],
    query: &str,
    settings: &Settings,
    format: OutputFormat,
) -> Result<String> {
    let filter_by = settings.filter_by();
    let results = sift::filter(query, items, &filter_by, settings.strict);
    debug!(kept = results.len(), total = items.len(), "rendering results");
    Ok(output::render(&results, format)?)
}
