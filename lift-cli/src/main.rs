#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lift_cli::calculate::{run_calculate, run_scenarios, CalculateArgs, ScenarioArgs};
use lift_cli::settings::{self, ConfigCommands};
use lift_common::config::config_path;
use lift_common::logging::init_logging_with_exclusions;
use lift_common::{Config, Validate};

/// `lift` - size an incrementality test budget from the terminal.
#[derive(Parser, Debug)]
#[command(name = "lift")]
#[command(version)]
#[command(about = "Estimate the budget a lift test needs to reach significance.", long_about = None)]
struct Cli {
    /// Config file to use instead of ~/.liftcalc/config.json
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level regardless of config
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Calculate the required and recommended test budget for one channel
    Calculate(CalculateArgs),

    /// Compare the high, medium and low confidence presets
    Scenarios(ScenarioArgs),

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        config_command: ConfigCommands,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    match path {
        Some(path) => {
            let mut config = Config::load_from(path)?;
            config.apply_env_overrides();
            Ok(config)
        }
        None => Config::load_with_env(),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let path = cli.config.clone().unwrap_or_else(config_path);

    // `config init` and `config validate` must work on a broken or missing file.
    let config = match &cli.command {
        Commands::Config {
            config_command:
                ConfigCommands::Init { .. } | ConfigCommands::Validate | ConfigCommands::Path,
        } => Config::default(),
        _ => load_config(cli.config.as_ref())?,
    };

    let level = if cli.verbose {
        "debug"
    } else {
        config.observability.log_level.as_str()
    };
    init_logging_with_exclusions(
        level,
        &config.observability.log_format,
        &config.observability.excluded_targets,
    );

    let output = match cli.command {
        Commands::Calculate(args) => {
            config
                .calculator
                .validate()
                .context("Invalid calculator defaults in config")?;
            run_calculate(&args, &config.calculator)?
        }
        Commands::Scenarios(args) => {
            config
                .calculator
                .validate()
                .context("Invalid calculator defaults in config")?;
            run_scenarios(&args, &config.calculator)?
        }
        Commands::Config { config_command } => match config_command {
            ConfigCommands::Show => settings::show(&config)?,
            ConfigCommands::Init { force } => settings::init(&path, force)?,
            ConfigCommands::Path => path.display().to_string(),
            ConfigCommands::Validate => settings::validate(&path)?,
        },
    };

    println!("{output}");
    Ok(())
}
