//! Personal loot replay CLI
//!
//! Replays battle scripts through the personal loot engine and inspects the
//! persisted settings:
//! - `kwyd replay <script.toml>`: print collected items and loot rosters
//! - `kwyd config show|path|reset`: settings file management

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use kwyd_cli::{BattleScript, ReplayOptions, logging, output, replay};
use kwyd_core::LootSettingsExt;
use kwyd_types::LootSettings;

// ═══════════════════════════════════════════════════════════════════════════════
// CLI Arguments
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Parser, Debug)]
#[command(name = "kwyd")]
#[command(about = "Replay battles through the personal loot engine")]
#[command(version)]
struct Cli {
    /// Debug logging for kwyd crates (same as DEBUG_LOGGING=1)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a battle script
    Replay {
        /// Path to the battle script (TOML)
        script: PathBuf,

        /// Seed for drop chance rolls
        #[arg(long)]
        seed: Option<u64>,

        /// Settings file to use instead of the persisted settings
        #[arg(long)]
        settings: Option<PathBuf>,

        /// Also print debug-level in-game messages
        #[arg(long)]
        show_debug: bool,
    },
    /// Inspect or reset the persisted settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the effective settings
    Show,
    /// Print the settings file location
    Path,
    /// Overwrite the settings file with defaults
    Reset,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Main
// ═══════════════════════════════════════════════════════════════════════════════

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Command::Replay {
            script,
            seed,
            settings,
            show_debug,
        } => {
            let base_settings = match settings {
                Some(path) => LootSettings::load_from(&path)?,
                None => LootSettings::load(),
            };
            let battle = BattleScript::load(&script)?;
            let options = ReplayOptions {
                base_settings,
                seed,
                show_debug,
            };
            let outcome = replay(&battle, &options)?;
            print!("{}", output::render(&outcome));
        }
        Command::Config { action } => match action {
            ConfigAction::Show => {
                let settings = LootSettings::try_load()?;
                print!("{}", toml::to_string_pretty(&settings)?);
            }
            ConfigAction::Path => {
                println!("{}", LootSettings::config_path()?.display());
            }
            ConfigAction::Reset => {
                LootSettings::default().save()?;
                println!("Settings reset to defaults");
            }
        },
    }

    Ok(())
}
