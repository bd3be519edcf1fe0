//! CLI argument parsing.
//!
//! The CLI only wires arguments to the workflow; patch policy lives in the
//! library modules so it can be reused by other drivers.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::fields::Field;

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "appmeta",
    version,
    about = "Patch keywords, summaries and descriptions into desktop and metainfo files",
    after_help = "Examples:\n  appmeta discover --repo ./checkout\n  appmeta patch --repo ./checkout --fields fields.json\n  appmeta patch --repo ./checkout --lm 'my-generator --model small' --only keywords\n  appmeta patch --repo ./checkout --fields fields.json --dry-run --json",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Discover(DiscoverArgs),
    Patch(PatchArgs),
}

impl Command {
    pub fn verbose(&self) -> bool {
        match self {
            Command::Discover(args) => args.verbose,
            Command::Patch(args) => args.verbose,
        }
    }
}

/// List metadata documents found in a repository.
#[derive(Parser, Debug)]
#[command(about = "List desktop and metainfo files in a repository")]
pub struct DiscoverArgs {
    /// Repository checkout to scan
    #[arg(long, value_name = "DIR")]
    pub repo: PathBuf,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,

    /// Log progress to stderr
    #[arg(long)]
    pub verbose: bool,
}

/// Patch every metadata document in a repository.
#[derive(Parser, Debug)]
#[command(about = "Apply generated fields to every metadata document")]
pub struct PatchArgs {
    /// Repository checkout to patch in place
    #[arg(long, value_name = "DIR")]
    pub repo: PathBuf,

    /// JSON file with keywords, summary and/or description
    #[arg(long, value_name = "PATH", conflicts_with = "lm")]
    pub fields: Option<PathBuf>,

    /// Generator command; receives a JSON request on stdin
    #[arg(long, value_name = "CMD")]
    pub lm: Option<String>,

    /// Restrict patching to these fields (repeatable or comma-separated)
    #[arg(long, value_enum, value_delimiter = ',')]
    pub only: Vec<Field>,

    /// Leave `.in` template files untouched
    #[arg(long)]
    pub skip_templates: bool,

    /// Report what would change without writing files
    #[arg(long)]
    pub dry_run: bool,

    /// Emit the run report as JSON
    #[arg(long)]
    pub json: bool,

    /// Config file (defaults to the user config dir, then built-ins)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log progress to stderr
    #[arg(long)]
    pub verbose: bool,
}
