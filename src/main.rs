use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use vegsplit::cli::{handle_items_command, handle_quick_command, handle_scan_command, GroupArgs};
use vegsplit::config::{paths::VegsplitPaths, settings::Settings};
use vegsplit::models::Money;

#[derive(Parser)]
#[command(
    name = "vegsplit",
    version,
    about = "Split a shared bill fairly between vegetarians and non-vegetarians",
    long_about = "vegsplit splits a restaurant bill so vegetarians don't pay for meat. \
                  Shared items are divided by everyone, vegetarian items by vegetarians \
                  and meat by non-vegetarians. Items can be entered from a JSON file or \
                  imported from receipt text."
)]
struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Split a bill given only its total and the meat portion
    Quick {
        /// Bill total, e.g. 60 or $60.00
        #[arg(value_parser = Money::parse)]
        total: Money,
        /// Amount spent on meat
        #[arg(value_parser = Money::parse)]
        meat: Money,
        #[command(flatten)]
        group: GroupArgs,
    },

    /// Split an itemized bill read from a JSON file
    Items {
        /// JSON array of {"name", "amount", "category"} objects
        file: PathBuf,
        #[command(flatten)]
        group: GroupArgs,
    },

    /// Import items from receipt OCR text and split the bill
    Scan {
        /// Text file produced by an OCR tool
        file: PathBuf,
        #[command(flatten)]
        group: GroupArgs,
        /// API key for automatic item categorization
        #[arg(long, env = "VEGSPLIT_OPENAI_KEY", hide_env_values = true)]
        api_key: Option<String>,
    },

    /// Show current configuration and paths
    Config {
        /// Write the effective settings to the config file
        #[arg(long)]
        save: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr, results to stdout
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = VegsplitPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    match cli.command {
        Some(Commands::Quick { total, meat, group }) => {
            handle_quick_command(&settings, total, meat, group, cli.json)?;
        }
        Some(Commands::Items { file, group }) => {
            handle_items_command(&settings, &file, group, cli.json).await?;
        }
        Some(Commands::Scan {
            file,
            group,
            api_key,
        }) => {
            handle_scan_command(&settings, &file, group, api_key.as_deref(), cli.json).await?;
        }
        Some(Commands::Config { save }) => {
            if save {
                settings.save(&paths)?;
                eprintln!("Settings written to {}", paths.settings_file().display());
            }
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&settings)?);
                return Ok(());
            }
            println!("vegsplit Configuration");
            println!("======================");
            println!("Config directory: {}", paths.base_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:  {}", settings.currency_symbol);
            println!(
                "  Max item amount:  {}",
                settings.extraction.max_amount.format_with_symbol(&settings.currency_symbol)
            );
            println!("  Min name length:  {}", settings.extraction.min_name_chars);
            println!("  Classifier:       {}", settings.classifier.endpoint);
            println!("  Model:            {}", settings.classifier.model);
        }
        None => {
            println!("vegsplit - Fair bill splitting for mixed-diet groups");
            println!();
            println!("Run 'vegsplit --help' for usage information.");
            println!("Run 'vegsplit quick 60 30 --people 3 --veggies 1' for a quick split.");
        }
    }

    Ok(())
}
