use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

use smscode_rules::cli::{handle_backup_command, handle_rule_command};
use smscode_rules::config::{paths::SmsCodePaths, settings::Settings};
use smscode_rules::logging::{init_file_logging, init_logging};
use smscode_rules::storage::Storage;

#[derive(Parser)]
#[command(
    name = "smscode",
    author = "Kaylee Beyene",
    version,
    about = "Manage SMS verification-code extraction rules",
    long_about = "smscode keeps the rules that pull one-time verification codes out \
                  of SMS messages, and exports or imports them as versioned backup \
                  files so a rule list can move between installations."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the interactive rule list
    #[command(alias = "ui")]
    Tui {
        /// Open the screen on an import of this backup file
        #[arg(long)]
        import: Option<PathBuf>,
    },

    /// Rule management commands
    #[command(subcommand)]
    Rule(smscode_rules::cli::RuleCommands),

    /// Backup export and import commands
    #[command(subcommand)]
    Backup(smscode_rules::cli::BackupCommands),

    /// Initialize the data directory and settings
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = SmsCodePaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    // The TUI owns the terminal, so its logs go to a file
    if matches!(cli.command, Some(Commands::Tui { .. })) {
        init_file_logging(&paths.log_dir(), &settings.log_level)?;
    } else {
        init_logging(&settings.log_level);
    }

    // Initialize storage
    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Tui { import }) => {
            smscode_rules::tui::run_tui(Arc::new(storage), settings, import)?;
        }
        Some(Commands::Rule(cmd)) => {
            handle_rule_command(&storage, cmd)?;
        }
        Some(Commands::Backup(cmd)) => {
            handle_backup_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Init) => {
            println!("Initializing smscode at: {}", paths.base_dir().display());
            settings.setup_completed = true;
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Add a rule with: smscode rule add <COMPANY> <KEYWORD> <REGEX>");
            println!(
                "Backups will be written to: {}",
                settings.resolve_backup_dir(&paths).display()
            );
        }
        Some(Commands::Config) => {
            println!("smscode Configuration");
            println!("=====================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Rules file:       {}", paths.rules_file().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!("Log directory:    {}", paths.log_dir().display());
            println!(
                "Backup directory: {}",
                settings.resolve_backup_dir(&paths).display()
            );
            println!();
            println!("Settings:");
            println!("  Undo window: {}s", settings.undo_window_secs);
            println!("  Log level:   {}", settings.log_level);
            println!("  Initialized: {}", settings.setup_completed);
        }
        None => {
            println!("smscode - SMS verification-code rules");
            println!();
            println!("Run 'smscode --help' for usage information.");
            println!("Run 'smscode tui' to launch the interactive interface.");
        }
    }

    Ok(())
}
