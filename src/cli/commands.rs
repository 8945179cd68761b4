// src/cli/commands.rs
use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Generate a password
    Generate {
        /// Password length (configured default when omitted)
        #[arg(long, short, allow_negative_numbers = true)]
        length: Option<i64>,

        /// Difficulty: 1/easy, 2/medium or 3/hard
        #[arg(long, short, default_value = "medium")]
        tier: String,

        /// Save the generated password (hash only)
        #[arg(long, requires_all = ["service", "username"])]
        save: bool,

        /// Service name for --save
        #[arg(long)]
        service: Option<String>,

        /// Username for --save
        #[arg(long)]
        username: Option<String>,

        /// Print the password masked
        #[arg(long)]
        masked: bool,
    },

    /// List saved passwords
    List,

    /// Check a password against a saved record
    Verify {
        #[arg(long)]
        service: String,

        #[arg(long)]
        username: String,
    },

    /// Back up the saved passwords
    Backup {
        /// Also back up the event log
        #[arg(long)]
        log: bool,
    },

    /// List record store backups, newest first
    Backups,

    /// Reset the saved passwords to an empty list
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Show recent event log entries
    Log {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    Running,
    Exiting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    Generate,
    ShowRecords,
    VerifyRecord,
    BackupRecords,
    BackupLog,
    ResetRecords,
    ShowLog,
    Exit,
}

impl MenuCommand {
    pub const ALL: [MenuCommand; 8] = [
        MenuCommand::Generate,
        MenuCommand::ShowRecords,
        MenuCommand::VerifyRecord,
        MenuCommand::BackupRecords,
        MenuCommand::BackupLog,
        MenuCommand::ResetRecords,
        MenuCommand::ShowLog,
        MenuCommand::Exit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MenuCommand::Generate => "1) Generate new password",
            MenuCommand::ShowRecords => "2) Show saved passwords",
            MenuCommand::VerifyRecord => "3) Verify a saved password",
            MenuCommand::BackupRecords => "4) Back up saved passwords",
            MenuCommand::BackupLog => "5) Back up event log",
            MenuCommand::ResetRecords => "6) Reset saved passwords",
            MenuCommand::ShowLog => "7) Show recent events",
            MenuCommand::Exit => "8) Exit",
        }
    }

    /// Accepts the menu number ("1".."8") or the full label.
    pub fn from_choice(choice: &str) -> Option<Self> {
        let choice = choice.trim();
        Self::ALL.into_iter().enumerate().find_map(|(i, command)| {
            let number = (i + 1).to_string();
            (choice == number || choice == command.label()).then_some(command)
        })
    }
}

/// Side effect the shell has to carry out for a menu choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    Generate,
    ListRecords,
    VerifyRecord,
    BackupRecords,
    BackupLog,
    ResetRecords,
    ShowLog,
    Exit,
    Invalid(String),
}

/// Map the current state and a raw menu choice to the next state and the
/// effect to perform. Pure: no I/O happens here.
pub fn dispatch(state: MenuState, choice: &str) -> (MenuState, Effect) {
    if state == MenuState::Exiting {
        return (MenuState::Exiting, Effect::None);
    }

    let effect = match MenuCommand::from_choice(choice) {
        Some(MenuCommand::Generate) => Effect::Generate,
        Some(MenuCommand::ShowRecords) => Effect::ListRecords,
        Some(MenuCommand::VerifyRecord) => Effect::VerifyRecord,
        Some(MenuCommand::BackupRecords) => Effect::BackupRecords,
        Some(MenuCommand::BackupLog) => Effect::BackupLog,
        Some(MenuCommand::ResetRecords) => Effect::ResetRecords,
        Some(MenuCommand::ShowLog) => Effect::ShowLog,
        Some(MenuCommand::Exit) => return (MenuState::Exiting, Effect::Exit),
        None => Effect::Invalid(choice.trim().to_string()),
    };

    (MenuState::Running, effect)
}
