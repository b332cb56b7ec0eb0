//! # CLI Argument Definitions
//!
//! Command-line interface of the `dreg` binary, declared with `clap`'s derive API.

use clap::{Args, Parser, Subcommand, ValueEnum};
use dreg::domain::config::{GroupBy, OutputFormat};
use std::path::PathBuf;

/// The main CLI structure parsing command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "dreg")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Builds the rustdoc implementors registry of a deserialization trait")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Also write rolling log files into this directory
    #[arg(long, global = true, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Scan a source tree and write the implementors artifacts
    Build(BuildArgs),
    /// Scan a source tree and print the registry as a table
    Inspect(InspectArgs),
}

/// Options shared by every command that runs a build.
#[derive(Debug, Clone, Default, Args)]
pub struct SourceArgs {
    /// Directory scanned for crates [default: from config, else "."]
    #[arg(short, long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// TOML config file (`DREG__SECTION__KEY` variables override it)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Index non-public types too
    #[arg(long)]
    pub include_private: bool,

    /// Namespace grouping
    #[arg(long, value_enum)]
    pub group_by: Option<GroupByArg>,
}

#[derive(Debug, Clone, Args)]
pub struct BuildArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Documentation output directory [default: from config, else "target/doc"]
    #[arg(short, long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Artifacts to write
    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,
}

#[derive(Debug, Clone, Args)]
pub struct InspectArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Only show this namespace
    #[arg(short, long, value_name = "NAMESPACE")]
    pub namespace: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Js,
    Json,
    Both,
}

impl From<FormatArg> for OutputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Js => Self::Js,
            FormatArg::Json => Self::Json,
            FormatArg::Both => Self::Both,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GroupByArg {
    Crate,
    Module,
}

impl From<GroupByArg> for GroupBy {
    fn from(value: GroupByArg) -> Self {
        match value {
            GroupByArg::Crate => Self::Crate,
            GroupByArg::Module => Self::Module,
        }
    }
}
