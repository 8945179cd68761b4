use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use console::style;

mod backups;
mod cli;
mod core;
mod crypto;
mod db;
mod generators;
mod logging;
mod models;
mod utils;

use crate::cli::Args;
use crate::core::config::Config;
use crate::core::vault::Vault;

fn main() -> ExitCode {
    // Load environment variables
    if Path::new(".env").exists() {
        dotenvy::dotenv().ok();
    }

    let args = Args::parse();

    // Logger first so configuration warnings are shown
    env_logger::Builder::new()
        .filter_level(crate::core::config::log_level_from_env())
        .format_timestamp_secs()
        .format_module_path(true)
        .init();

    let mut config = Config::load();
    if let Some(home) = &args.home {
        config.rebase(home);
    }
    log::set_max_level(config.log_level);

    log::debug!("Loaded config: {:?}", config);

    match run(args, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{:#}", e);
            eprintln!("{} {}", style("❌").red(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args, config: Config) -> anyhow::Result<()> {
    let vault = Vault::open(config)?;

    match args.command {
        Some(command) => cli::handlers::run_command(&vault, command),
        None => cli::menu::run_cli_menu(&vault),
    }
}
