use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use std::io;
use std::path::PathBuf;
use tracing::{error, info, warn};

use tdeers::export::{self, ExportFormat};
use tdeers::logging::{init_logging, LogLevel};
use tdeers::validation::{accept_numeric_entry, InputValidator};
use tdeers::{
    ActivityLevel, AppConfig, ErrorSeverity, FormSession, FormState, Gender, Goal, TdeeError,
    TdeeEstimator, WeightUnit,
};

/// tdeers - TDEE and macro calculator
///
/// Estimates Total Daily Energy Expenditure from body measurements with the
/// Mifflin-St Jeor or Katch-McArdle equation, and splits it into daily
/// protein, carbohydrate and fat targets.
#[derive(Parser)]
#[command(name = "tdeers")]
#[command(version)]
#[command(about = "TDEE and macro calculator", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate TDEE and macros from the given measurements
    Calculate {
        /// Body weight in the selected unit
        #[arg(short, long, value_parser = numeric_entry)]
        weight: Option<String>,

        /// Weight unit (kg, lb)
        #[arg(short, long)]
        unit: Option<WeightUnit>,

        /// Height in centimeters
        #[arg(long, value_parser = numeric_entry)]
        height: Option<String>,

        /// Age in years
        #[arg(short, long, value_parser = numeric_entry)]
        age: Option<String>,

        /// Gender (male, female)
        #[arg(short, long)]
        gender: Option<Gender>,

        /// Body fat percentage; switches to the lean-mass formula
        #[arg(short, long, value_parser = numeric_entry)]
        body_fat: Option<String>,

        /// Activity level (sedentary, light, moderate, heavy, athlete)
        #[arg(short = 'l', long)]
        activity: Option<ActivityLevel>,

        /// Goal (maintenance, fat_loss, muscle_gain)
        #[arg(short = 'G', long)]
        goal: Option<Goal>,

        /// Output format (text, json)
        #[arg(short, long)]
        format: Option<ExportFormat>,

        /// Write the result to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Open the interactive form
    Form,

    /// Configure application settings
    Config {
        /// List all configuration options
        #[arg(short, long)]
        list: bool,

        /// Set a configuration value (KEY=VALUE)
        #[arg(short, long)]
        set: Option<String>,

        /// Get a configuration value
        #[arg(short, long)]
        get: Option<String>,

        /// Write a default configuration file
        #[arg(long)]
        init: bool,
    },
}

/// Entry-time filter for numeric arguments
fn numeric_entry(value: &str) -> std::result::Result<String, String> {
    if accept_numeric_entry(value) {
        Ok(value.trim().to_string())
    } else {
        Err(format!("expected a non-negative number, got '{}'", value))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(AppConfig::default_config_path);
    let loaded = AppConfig::load_if_exists(&config_path);

    let mut log_config = loaded
        .as_ref()
        .map(|config| config.logging.clone())
        .unwrap_or_default();
    if cli.verbose > 0 {
        log_config.level = LogLevel::from_verbosity(cli.verbose);
    }
    init_logging(&log_config)?;

    // An explicit config file must parse unless it is about to be replaced
    let config = match loaded {
        Ok(config) => config,
        Err(err)
            if cli.config.is_none() || matches!(cli.command, Commands::Config { init: true, .. }) =>
        {
            warn!(
                path = %config_path.display(),
                error = %format!("{:#}", err),
                "Unreadable config file, using defaults"
            );
            AppConfig::default()
        }
        Err(err) => return Err(err),
    };

    if !config.output.color {
        colored::control::set_override(false);
    }

    if let Err(err) = run(cli.command, config, config_path) {
        log_failure(&err);
        return Err(err);
    }

    Ok(())
}

/// Log a failed command at the level its error calls for
fn log_failure(err: &anyhow::Error) {
    match err.downcast_ref::<TdeeError>().map(TdeeError::severity) {
        Some(ErrorSeverity::Warning) => warn!(error = %format!("{:#}", err), "Command rejected"),
        _ => error!(error = %format!("{:#}", err), "Command failed"),
    }
}

fn run(command: Commands, config: AppConfig, config_path: PathBuf) -> Result<()> {
    match command {
        Commands::Calculate {
            weight,
            unit,
            height,
            age,
            gender,
            body_fat,
            activity,
            goal,
            format,
            output,
        } => {
            let mut fields = config.defaults.to_fields();
            if let Some(weight) = weight {
                fields.weight = weight;
            }
            if let Some(unit) = unit {
                fields.weight_unit = unit;
            }
            if let Some(height) = height {
                fields.height = height;
            }
            if let Some(age) = age {
                fields.age = age;
            }
            if let Some(body_fat) = body_fat {
                fields.body_fat = body_fat;
            }
            fields.gender = gender.or(fields.gender);
            fields.activity_level = activity.or(fields.activity_level);
            fields.goal = goal.or(fields.goal);

            let validated = InputValidator::validate(&fields).map_err(|err| {
                let prompt = err.prompt();
                anyhow::Error::new(TdeeError::from(err)).context(prompt)
            })?;
            let result =
                TdeeEstimator::estimate(&validated.input, validated.activity_level, validated.goal);
            info!(total_energy = result.total_energy, formula = %result.formula, "Calculated TDEE");

            let format = format.unwrap_or(config.output.format);
            match output {
                Some(path) => {
                    export::export_result(&result, format, &path)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    println!("{} {}", "✓ Result written to".green(), path.display());
                }
                None => {
                    let rendered = export::render(&result, format)?;
                    match format {
                        ExportFormat::Text => println!("{}", rendered.bold()),
                        ExportFormat::Json => println!("{}", rendered),
                    }
                }
            }
        }

        Commands::Form => {
            let stdin = io::stdin();
            let stdout = io::stdout();
            let mut session = FormSession::new(
                FormState::new(&config.defaults),
                stdin.lock(),
                stdout.lock(),
            );
            session.run()?;
        }

        Commands::Config {
            list,
            set,
            get,
            init,
        } => {
            let mut config = config;
            if init {
                let mut fresh = AppConfig::default();
                fresh.save_to_file(&config_path)?;
                println!("{} {}", "✓ Wrote default configuration to".green(), config_path.display());
            } else if let Some(assignment) = set {
                config.set_assignment(&assignment)?;
                config.save_to_file(&config_path)?;
                println!("{} {}", "✓ Configuration updated:".green(), assignment);
            } else if let Some(key) = get {
                println!("{}", config.get(&key)?);
            } else if list {
                println!("{}", format!("Configuration ({})", config_path.display()).bold());
                for key in tdeers::config::CONFIG_KEYS {
                    println!("  {} = {}", key.cyan(), config.get(key)?);
                }
            } else {
                println!("{}", config_path.display());
            }
        }
    }

    Ok(())
}
