mod commands;
mod terminal_output;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};

use cardcheck_client::HttpCardService;
use cardcheck_config::{config_dir, config_file_path, load_and_prepare};
use cardcheck_core::ExtractedFields;

#[derive(Parser)]
#[command(name = "cardcheck")]
#[command(about = "Aadhar card verifier: extract, review and submit card details")]
#[command(version)]
struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive terminal UI (default)
    Ui,
    /// Extract card fields from an image file
    Extract {
        /// Image to upload
        image: PathBuf,
    },
    /// Submit card fields
    Submit {
        #[arg(long, default_value = "")]
        aadhar_number: String,
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        gender: String,
        #[arg(long, default_value = "")]
        dob: String,
    },
    /// Check that the extraction service is reachable
    Ping,
    /// Manage the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the effective config
    Show,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run(Cli::parse()).await {
        error!(error = %e, "Command failed");
        terminal_output::note_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let command = cli.command.unwrap_or(Commands::Ui);
    let config_path = cli
        .config
        .unwrap_or_else(|| config_file_path(&config_dir()));

    if let Commands::Config { action: ConfigAction::Init { force } } = command {
        return commands::config_init(&config_path, force).await;
    }

    let config = load_and_prepare(&config_path)
        .await
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    let log_dir = config
        .logging
        .dir
        .clone()
        .unwrap_or_else(|| config_dir().join("logs"));
    let is_ui = matches!(command, Commands::Ui);
    let _log_guard = logging::init_logger(&log_dir, &config.logging.level, !is_ui)?;
    info!(config = %config_path.display(), "Loaded config");

    let service = HttpCardService::new(&config.service).context("Failed to build HTTP client")?;

    match command {
        Commands::Ui => {
            media::ensure_source_available(&config.camera).context("Live capture is unavailable")?;
            tui::run_ui(&config, Arc::new(service)).await?
        }
        Commands::Extract { image } => commands::extract(&service, &image).await?,
        Commands::Submit {
            aadhar_number,
            name,
            gender,
            dob,
        } => {
            let fields = ExtractedFields {
                aadhar_number,
                name,
                gender,
                dob,
            };
            commands::submit(&service, fields).await?;
        }
        Commands::Ping => commands::ping(&service).await?,
        Commands::Config { action: ConfigAction::Show } => commands::config_show(&config)?,
        Commands::Config { action: ConfigAction::Init { force } } => {
            commands::config_init(&config_path, force).await?
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_to_ui() {
        let cli = Cli::try_parse_from(["cardcheck"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_submit_fields() {
        let cli = Cli::try_parse_from([
            "cardcheck",
            "submit",
            "--aadhar-number",
            "1234 5678 9012",
            "--name",
            "Asha Rao",
            "--config",
            "/tmp/c.yaml",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.yaml")));
        match cli.command {
            Some(Commands::Submit { aadhar_number, name, gender, .. }) => {
                assert_eq!(aadhar_number, "1234 5678 9012");
                assert_eq!(name, "Asha Rao");
                assert!(gender.is_empty());
            }
            _ => panic!("expected submit"),
        }
    }
}
