// src/cli/mod.rs
use std::path::PathBuf;

use clap::Parser;

pub mod commands;
pub mod handlers;
pub mod menu;

pub use commands::CliCommand;

#[derive(Parser, Debug)]
#[command(author, version, about = "Password generator and local credential store", long_about = None)]
pub struct Args {
    /// Directory holding the data/ and reports/ folders
    #[arg(long, env = "PASSGEN_HOME")]
    pub home: Option<PathBuf>,

    /// Command to execute (interactive menu when omitted)
    #[command(subcommand)]
    pub command: Option<CliCommand>,
}
