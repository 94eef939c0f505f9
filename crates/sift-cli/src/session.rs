//! Interactive mode: a live [`FilteredView`] fed from stdin.
//!
//! Each input line either replaces the query or, when it starts with `:`,
//! runs a command that changes the strategy or strictness. Every change
//! goes through a [`Signal`], so the view recomputes on its own; the
//! session only prints when the view reports a new result.

use std::cell::Cell;
use std::io::{BufRead, Write};
use std::rc::Rc;

use anyhow::{bail, Context, Result};
use serde_json::Value as Json;
use sift::{FilterBy, FilteredView, Signal};
use tracing::debug;

use crate::config::Settings;
use crate::output::{render, OutputFormat};

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Replace the query.
    Query(String),
    /// Turn strict mode on or off.
    Strict(bool),
    /// Replace the property list (comma-separated, may be empty).
    By(String),
    /// Leave the session.
    Quit,
}

impl Command {
    /// Parses one input line (without its line terminator).
    pub fn parse(line: &str) -> Result<Self> {
        let Some(command) = line.strip_prefix(':') else {
            return Ok(Command::Query(line.to_string()));
        };

        let (name, argument) = match command.split_once(char::is_whitespace) {
            Some((name, argument)) => (name, argument.trim()),
            None => (command, ""),
        };

        match name {
            "q" | "quit" => Ok(Command::Quit),
            "by" => Ok(Command::By(argument.to_string())),
            "strict" => match argument {
                "on" | "true" | "" => Ok(Command::Strict(true)),
                "off" | "false" => Ok(Command::Strict(false)),
                other => bail!("expected ':strict on' or ':strict off', got '{other}'"),
            },
            other => bail!("unknown command ':{other}'"),
        }
    }
}

/// Runs the session until `:quit` or end of input.
///
/// Results are rendered once up front and again after every recomputation.
/// Invalid commands print an `error:` line and the session continues.
pub fn run<R: BufRead, W: Write>(
    items: Vec<Json>,
    mut settings: Settings,
    initial_query: &str,
    format: OutputFormat,
    input: R,
    mut out: W,
) -> Result<()> {
    let query = Signal::new(initial_query.to_string());
    let filter_by: Signal<FilterBy<Json>> = Signal::new(settings.filter_by());
    let strict = Signal::new(settings.strict);
    let view = FilteredView::new(items, &query, &filter_by, &strict);

    let changed = Rc::new(Cell::new(false));
    let flag = Rc::clone(&changed);
    let _subscription = view.subscribe(move || flag.set(true));

    print_results(&view, format, &mut out)?;

    for line in input.lines() {
        let line = line.context("failed to read input")?;
        let command = match Command::parse(line.trim_end_matches('\r')) {
            Ok(command) => command,
            Err(err) => {
                writeln!(out, "error: {err:#}")?;
                continue;
            }
        };
        debug!(?command, "session command");

        match command {
            Command::Quit => break,
            Command::Query(text) => query.set(text),
            Command::Strict(on) => strict.set(on),
            Command::By(spec) => match settings.set_by(&spec) {
                Ok(()) => filter_by.set(settings.filter_by()),
                Err(err) => writeln!(out, "error: {err:#}")?,
            },
        }

        if changed.replace(false) {
            print_results(&view, format, &mut out)?;
        }
    }

    out.flush()?;
    Ok(())
}

fn print_results<W: Write>(
    view: &FilteredView<Json>,
    format: OutputFormat,
    out: &mut W,
) -> Result<()> {
    let text = view.with_results(|results| render(results, format))?;
    out.write_all(text.as_bytes())?;
    out.flush()?;
    Ok(())
}
