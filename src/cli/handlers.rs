// src/cli/handlers.rs
use anyhow::{bail, Context};
use console::style;
use inquire::validator::Validation;
use inquire::{Confirm, Password, PasswordDisplayMode, Select, Text};

use crate::cli::CliCommand;
use crate::core::config::Config;
use crate::core::vault::Vault;
use crate::logging::EventSink;
use crate::models::{CredentialRecord, Tier};
use crate::utils::truncate_string;

// Handlers for CLI commands and menu actions

pub fn run_command<S: EventSink>(vault: &Vault<S>, command: CliCommand) -> anyhow::Result<()> {
    match command {
        CliCommand::Generate { length, tier, save, service, username, masked } => {
            let tier: Tier = tier.parse()?;
            let length = length.unwrap_or(vault.config().default_length as i64);
            let password = vault.generate(length, tier)?;
            print_password(vault, &password, masked);

            if save {
                let (Some(service), Some(username)) = (service, username) else {
                    bail!("--save needs both --service and --username");
                };
                handle_save(vault, &service, &username, &password)?;
            }
        }
        CliCommand::List => handle_list(vault),
        CliCommand::Verify { service, username } => {
            let secret = prompt_secret("Password to check:")?;
            handle_verify(vault, &service, &username, &secret)?;
        }
        CliCommand::Backup { log } => {
            handle_backup_records(vault)?;
            if log {
                handle_backup_log(vault)?;
            }
        }
        CliCommand::Backups => handle_list_backups(vault)?,
        CliCommand::Reset { yes } => {
            if yes || confirm_reset()? {
                handle_reset(vault)?;
            } else {
                println!("Reset cancelled.");
            }
        }
        CliCommand::Log { limit } => handle_show_log(vault, limit)?,
    }

    Ok(())
}

/// Interactive generation: tier, length, then optionally save.
pub fn handle_generate_interactive<S: EventSink>(vault: &Vault<S>) -> anyhow::Result<()> {
    let tier = prompt_tier()?;
    let length = prompt_length(vault.config())?;

    let password = vault.generate(length, tier)?;
    print_password(vault, &password, false);

    let save = Confirm::new("Save this password?")
        .with_default(false)
        .prompt()?;

    if save {
        let service = prompt_non_empty("Website or service:")?;
        let username = prompt_non_empty("Username or email:")?;
        handle_save(vault, &service, &username, &password)?;
    }

    Ok(())
}

pub fn handle_verify_interactive<S: EventSink>(vault: &Vault<S>) -> anyhow::Result<()> {
    let records = vault.records();
    if records.is_empty() {
        println!("No saved passwords yet.");
        return Ok(());
    }

    let options: Vec<String> = records.iter().map(describe_record).collect();
    let choice = Select::new("Select a saved password:", options.clone())
        .with_page_size(15)
        .prompt()?;
    let index = options
        .iter()
        .position(|o| *o == choice)
        .context("selected record disappeared")?;
    let record = &records[index];

    let secret = prompt_secret("Password to check:")?;
    print_verify_result(vault.verify_record(record, &secret)?);
    Ok(())
}

pub fn handle_save<S: EventSink>(
    vault: &Vault<S>,
    service: &str,
    username: &str,
    password: &str,
) -> anyhow::Result<()> {
    let record = vault.save(service, username, password)?;
    println!(
        "{} Saved {} for {} ({})",
        style("✅").green(),
        style(vault.mask(password)).dim(),
        style(&record.service).bold(),
        record.username
    );
    Ok(())
}

pub fn handle_list<S: EventSink>(vault: &Vault<S>) {
    let records = vault.records();
    if records.is_empty() {
        println!("No saved passwords yet.");
        return;
    }

    println!("\n{}", style(format!("Saved passwords ({})", records.len())).bold().underlined());
    for (i, record) in records.iter().enumerate() {
        println!(
            "{:>3}. {:<20} {:<28} {}  {}",
            i + 1,
            truncate_string(&record.service, 20),
            truncate_string(&record.username, 28),
            record.created_at,
            style(truncate_string(&record.secret_hash, 24)).dim()
        );
    }
    println!();
}

pub fn handle_verify<S: EventSink>(
    vault: &Vault<S>,
    service: &str,
    username: &str,
    secret: &str,
) -> anyhow::Result<()> {
    match vault.verify(service, username, secret)? {
        Some(matched) => print_verify_result(matched),
        None => println!("No saved password for {} / {}.", service, username),
    }
    Ok(())
}

fn print_verify_result(matched: bool) {
    if matched {
        println!("{} Password matches the saved record.", style("✅").green());
    } else {
        println!("{} Password does not match.", style("❌").red());
    }
}

pub fn handle_backup_records<S: EventSink>(vault: &Vault<S>) -> anyhow::Result<()> {
    let path = vault.backup_records()?;
    println!("{} Password backup created at {}", style("💾").cyan(), path.display());
    Ok(())
}

pub fn handle_backup_log<S: EventSink>(vault: &Vault<S>) -> anyhow::Result<()> {
    match vault.backup_log()? {
        Some(path) => println!("{} Log backup created at {}", style("💾").cyan(), path.display()),
        None => println!("No event log to back up yet."),
    }
    Ok(())
}

pub fn handle_list_backups<S: EventSink>(vault: &Vault<S>) -> anyhow::Result<()> {
    let backups = vault.list_backups()?;
    if backups.is_empty() {
        println!("No backups yet.");
        return Ok(());
    }

    for path in backups {
        println!("  {}", path.display());
    }
    Ok(())
}

pub fn handle_reset_interactive<S: EventSink>(vault: &Vault<S>) -> anyhow::Result<()> {
    if confirm_reset()? {
        handle_reset(vault)
    } else {
        println!("Reset cancelled.");
        Ok(())
    }
}

pub fn handle_reset<S: EventSink>(vault: &Vault<S>) -> anyhow::Result<()> {
    vault.reset_records()?;
    println!("{} Saved passwords were reset.", style("⚠️").yellow());
    Ok(())
}

pub fn handle_show_log<S: EventSink>(vault: &Vault<S>, limit: usize) -> anyhow::Result<()> {
    let entries = vault.recent_events(limit)?;
    if entries.is_empty() {
        println!("The event log is empty.");
        return Ok(());
    }

    for entry in entries {
        println!(
            "{} {} {}",
            style(entry.timestamp.format("%Y-%m-%d %H:%M:%S")).dim(),
            style(format!("[{}]", entry.level)).bold(),
            entry.message
        );
    }
    Ok(())
}

fn print_password<S: EventSink>(vault: &Vault<S>, password: &str, masked: bool) {
    let shown = if masked { vault.mask(password) } else { password.to_string() };
    println!("\n🔐 Your password: {}\n", style(shown).green().bold());
}

fn describe_record(record: &CredentialRecord) -> String {
    format!("{} / {} ({})", record.service, record.username, record.created_at)
}

fn confirm_reset() -> anyhow::Result<bool> {
    Ok(Confirm::new("This deletes every saved password. Continue?")
        .with_default(false)
        .with_help_message("Consider making a backup first")
        .prompt()?)
}

fn prompt_tier() -> anyhow::Result<Tier> {
    let labels: Vec<&str> = Tier::ALL.iter().map(|t| t.label()).collect();
    let choice = Select::new("Choose difficulty level:", labels).prompt()?;
    Tier::ALL
        .into_iter()
        .find(|t| t.label() == choice)
        .context("unknown difficulty selected")
}

fn prompt_length(config: &Config) -> anyhow::Result<i64> {
    let default = config.default_length.to_string();
    let help = format!("Between {} and {}", config.min_length, config.max_length);
    let bounds = config.clone();

    let raw = Text::new("Password length:")
        .with_default(&default)
        .with_help_message(&help)
        .with_validator(move |input: &str| match input.trim().parse::<i64>() {
            Ok(n) => match bounds.check_length(n) {
                Ok(_) => Ok(Validation::Valid),
                Err(e) => Ok(Validation::Invalid(e.to_string().into())),
            },
            Err(_) => Ok(Validation::Invalid("Invalid number, please enter an integer.".into())),
        })
        .prompt()?;

    Ok(raw.trim().parse()?)
}

fn prompt_non_empty(message: &str) -> anyhow::Result<String> {
    let value = Text::new(message)
        .with_validator(|input: &str| {
            if input.trim().is_empty() {
                Ok(Validation::Invalid("This field cannot be empty.".into()))
            } else {
                Ok(Validation::Valid)
            }
        })
        .prompt()?;
    Ok(value.trim().to_string())
}

fn prompt_secret(message: &str) -> anyhow::Result<String> {
    Ok(Password::new(message)
        .with_display_mode(PasswordDisplayMode::Hidden)
        .without_confirmation()
        .prompt()?)
}
