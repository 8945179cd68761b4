// src/cli/menu.rs
use console::style;
use inquire::{InquireError, Select};

use crate::cli::commands::{dispatch, Effect, MenuCommand, MenuState};
use crate::cli::handlers;
use crate::core::vault::{Vault, VaultError};
use crate::generators::GeneratorError;
use crate::logging::EventSink;

pub fn run_cli_menu<S: EventSink>(vault: &Vault<S>) -> anyhow::Result<()> {
    println!("{}", "=".repeat(40));
    println!("{}", style("   🔐 PASSWORD GENERATOR (CLI)   ").bold());
    println!("{}", "=".repeat(40));

    let options: Vec<&str> = MenuCommand::ALL.iter().map(|c| c.label()).collect();
    let mut state = MenuState::Running;

    while state == MenuState::Running {
        let selection = Select::new("Choose an option:", options.clone())
            .with_help_message("Use arrow keys to navigate, Enter to select. Ctrl+C to exit.")
            .with_page_size(10)
            .prompt_skippable();

        let choice = match selection {
            Ok(Some(choice)) => choice,
            Ok(None) => continue,
            Err(InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e.into()),
        };

        let (next, effect) = dispatch(state, choice);
        state = next;

        if let Err(e) = execute(vault, &effect) {
            match classify(&e) {
                Failure::Cancelled => println!("Cancelled."),
                Failure::Interrupted => break,
                Failure::Expected(message) => println!("{} {}", style("❌").red(), message),
                Failure::Unexpected => {
                    log::error!("Menu action {:?} failed: {:#}", effect, e);
                    vault.report_error(&format!("Unexpected error during {:?}: {}", effect, e));
                    println!(
                        "{} Sorry, something went wrong. The error was logged; please try again.",
                        style("❌").red()
                    );
                }
            }
        }
    }

    println!("\nGoodbye! 👋");
    Ok(())
}

fn execute<S: EventSink>(vault: &Vault<S>, effect: &Effect) -> anyhow::Result<()> {
    match effect {
        Effect::Generate => handlers::handle_generate_interactive(vault)?,
        Effect::ListRecords => handlers::handle_list(vault),
        Effect::VerifyRecord => handlers::handle_verify_interactive(vault)?,
        Effect::BackupRecords => handlers::handle_backup_records(vault)?,
        Effect::BackupLog => handlers::handle_backup_log(vault)?,
        Effect::ResetRecords => handlers::handle_reset_interactive(vault)?,
        Effect::ShowLog => handlers::handle_show_log(vault, 20)?,
        Effect::Invalid(choice) => {
            println!("{} Invalid menu choice {:?}, please try again.", style("❌").red(), choice)
        }
        Effect::Exit | Effect::None => {}
    }
    Ok(())
}

enum Failure {
    Cancelled,
    Interrupted,
    Expected(String),
    Unexpected,
}

// Generation and verification problems are shown to the user as-is; anything
// else is treated as an internal fault.
fn classify(error: &anyhow::Error) -> Failure {
    if let Some(inquire_error) = error.downcast_ref::<InquireError>() {
        return match inquire_error {
            InquireError::OperationCanceled => Failure::Cancelled,
            InquireError::OperationInterrupted => Failure::Interrupted,
            _ => Failure::Unexpected,
        };
    }

    if let Some(e) = error.downcast_ref::<GeneratorError>() {
        return Failure::Expected(e.to_string());
    }

    match error.downcast_ref::<VaultError>() {
        Some(VaultError::Generator(e)) => Failure::Expected(e.to_string()),
        Some(VaultError::Crypto(e)) => Failure::Expected(format!("Saved record cannot be checked: {}", e)),
        _ => Failure::Unexpected,
    }
}
