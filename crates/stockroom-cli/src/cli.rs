//! `stockroom` command line
//!
//! Browses product files through the table engine, generates variants from
//! a form payload and records stock movements. Settings come from
//! `<config_dir>/stockroom/settings.json` and flags override them.

mod browse;
mod catalog_commands;
mod logging;

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::{ArgAction, Parser, Subcommand};
use stockroom_settings::StockroomSettings;

use crate::browse::BrowseArgs;
use crate::catalog_commands::{StockArgs, VariantsArgs};
use crate::logging::LoggingConfig;

#[derive(Parser)]
#[command(name = "stockroom")]
#[command(version)]
#[command(about = "Inventory table browser and variant generator")]
struct Cli {
    /// Settings file [default: <config_dir>/stockroom/settings.json]
    #[arg(long, global = true, env = "STOCKROOM_SETTINGS", value_name = "PATH")]
    settings: Option<PathBuf>,

    /// More log output; repeat for trace
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Filter, sort and page through a product file
    Browse(BrowseArgs),
    /// Generate variants from attributes, keeping existing ones that still match
    Variants(VariantsArgs),
    /// Record a stock entry, exit or adjustment
    Stock(StockArgs),
    /// Inspect or create the settings file
    #[command(subcommand)]
    Settings(SettingsCommand),
}

#[derive(Subcommand)]
enum SettingsCommand {
    /// Print the effective settings
    Show,
    /// Write default settings
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings_path = match cli.settings {
        Some(path) => path,
        None => StockroomSettings::settings_path()?,
    };
    let settings = StockroomSettings::load_from(&settings_path)?;
    let _log_guard = logging::init(LoggingConfig::from_settings(&settings.logging, cli.verbose))?;
    tracing::debug!(path = ?settings_path, "settings loaded");

    match cli.command {
        Command::Browse(args) => browse::run(args, &settings),
        Command::Variants(args) => catalog_commands::run_variants(args, &settings),
        Command::Stock(args) => catalog_commands::run_stock(args).await,
        Command::Settings(SettingsCommand::Show) => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
            Ok(())
        }
        Command::Settings(SettingsCommand::Init { force }) => {
            if settings_path.exists() && !force {
                bail!("{} already exists, use --force to overwrite", settings_path.display());
            }
            StockroomSettings::default().save_to(&settings_path)?;
            println!("Wrote {}", settings_path.display());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_browse_flags_parse() {
        let cli = Cli::try_parse_from([
            "stockroom",
            "-v",
            "browse",
            "products.json",
            "--sort",
            "price:desc",
            "--filter",
            "category=roupas",
            "--created-from",
            "2024-01-01",
            "--expand",
            "CAM",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 1);
        let Command::Browse(args) = cli.command else {
            panic!("expected browse");
        };
        assert_eq!(args.sort.len(), 1);
        assert_eq!(args.filters, vec![("category".to_string(), "roupas".to_string())]);
        assert_eq!(args.created_from.map(|d| d.to_string()).as_deref(), Some("2024-01-01"));
        assert_eq!(args.page, 1);
    }

    #[test]
    fn test_stock_requires_a_movement() {
        assert!(Cli::try_parse_from(["stockroom", "stock", "p.json", "--sku", "CAN"]).is_err());
        assert!(
            Cli::try_parse_from([
                "stockroom", "stock", "p.json", "--sku", "CAN", "--entry", "1", "--exit", "1"
            ])
            .is_err()
        );
    }
}
