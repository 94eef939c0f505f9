//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

use crate::output::OutputFormat;

/// Filter a JSON collection by a case-insensitive search query.
///
/// Items are read from a JSON array or JSON Lines. Primitive items are
/// matched directly; objects are matched on every property unless `--by`
/// or `--tag` narrows the search.
#[derive(Debug, Clone, Parser)]
#[command(name = "sift", version, about)]
pub struct Args {
    /// Search query. Empty keeps every item.
    #[arg(default_value = "")]
    pub query: String,

    /// JSON array or JSON Lines file. Reads stdin when omitted.
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Property to match. Repeat, or separate with commas, for several.
    #[arg(short, long = "by", value_name = "PROP")]
    pub by: Vec<String>,

    /// Array property whose string elements are searched.
    #[arg(long = "tag", value_name = "PROP")]
    pub tags: Vec<String>,

    /// Only compare string values.
    #[arg(short, long)]
    pub strict: bool,

    /// JSON or YAML file with `by`, `tags` and `strict` defaults.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub output: OutputFormat,

    /// Read queries from stdin, one per line, printing results after each.
    ///
    /// Lines starting with `:` are commands: `:strict on|off`, `:by a,b`,
    /// `:quit`.
    #[arg(short, long, requires = "file")]
    pub interactive: bool,

    /// Increase log verbosity (-v debug, -vv trace). `SIFT_LOG` wins.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
