//! appmeta: patch store metadata fields into desktop entries and metainfo
//! files of an application repository.
mod cli;
mod config;
mod document;
mod fields;
mod generate;
mod orchestrate;
mod patch;
mod persist;
mod report;
mod util;
mod workflow;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, RootArgs};

fn main() -> Result<()> {
    let args = RootArgs::parse();

    // RUST_LOG overrides; --verbose => info; else warnings only.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if args.command.verbose() {
            "appmeta=info"
        } else {
            "appmeta=warn"
        })
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();

    match &args.command {
        Command::Discover(discover_args) => workflow::run_discover(discover_args),
        Command::Patch(patch_args) => workflow::run_patch(patch_args),
    }
}
