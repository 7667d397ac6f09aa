use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use tokio::io::BufReader;
use tracing::{error, info, warn};

use fitplan::config::AppConfig;
use fitplan::controller::{FormController, Phase};
use fitplan::error::{ErrorSeverity, FitPlanError};
use fitplan::export::{export_plan, ExportFormat};
use fitplan::injury::{zone_options, InjuryType};
use fitplan::logging::{init_logging, LogFormat};
use fitplan::profile::{Choice, ProfileField};
use fitplan::{bmi, render, session, HttpRecommendationClient};

/// fitplan - personalized training and nutrition plans
///
/// Collects a fitness profile, asks the recommendation service for a plan
/// and shows it in the terminal.
#[derive(Parser)]
#[command(name = "fitplan")]
#[command(author = "fitplan contributors")]
#[command(version)]
#[command(about = "Training and nutrition plan CLI", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Recommendation service URL for this run
    #[arg(long, value_name = "URL", global = true)]
    api_url: Option<String>,

    /// Log output format (pretty, json, compact)
    #[arg(long, value_name = "FORMAT", global = true)]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Profile fields; anything left out keeps its default
#[derive(Args, Debug)]
struct ProfileArgs {
    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    age: Option<String>,

    /// male or female
    #[arg(long)]
    sex: Option<String>,

    /// Weight in kg
    #[arg(long)]
    weight: Option<String>,

    /// Height in cm
    #[arg(long)]
    height: Option<String>,

    /// novice, intermediate or advanced
    #[arg(long)]
    level: Option<String>,

    /// gain_muscle, lose_fat or maintain
    #[arg(long)]
    goal: Option<String>,

    /// Training days per week (1-7)
    #[arg(long)]
    frequency: Option<String>,

    /// full_gym, bodyweight or home_training
    #[arg(long)]
    equipment: Option<String>,

    /// none, injury, fracture, fissure, tear, discomfort or pain
    #[arg(long)]
    injury_type: Option<String>,

    /// Affected zone; see `fitplan zones`
    #[arg(long)]
    injury_zone: Option<String>,
}

impl ProfileArgs {
    fn edits(&self) -> Vec<(ProfileField, &str)> {
        [
            (ProfileField::Name, &self.name),
            (ProfileField::Age, &self.age),
            (ProfileField::Sex, &self.sex),
            (ProfileField::WeightKg, &self.weight),
            (ProfileField::HeightCm, &self.height),
            (ProfileField::FitnessLevel, &self.level),
            (ProfileField::Goal, &self.goal),
            (ProfileField::WeeklyFrequency, &self.frequency),
            (ProfileField::EquipmentAccess, &self.equipment),
            // type before zone so the zone is checked against the new type
            (ProfileField::InjuryType, &self.injury_type),
            (ProfileField::InjuryZone, &self.injury_zone),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.as_deref().map(|v| (field, v)))
        .collect()
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Request a plan for the given profile
    Recommend {
        #[command(flatten)]
        profile: ProfileArgs,

        /// Save the plan to this file
        #[arg(short, long, value_name = "FILE")]
        export: Option<PathBuf>,

        /// Export format (json, text, csv); inferred from the file extension if omitted
        #[arg(short = 'f', long)]
        format: Option<String>,
    },

    /// Fill in the profile interactively
    Interactive,

    /// Classify a BMI and draw the bar
    Bmi {
        /// Weight in kg
        #[arg(long)]
        weight: f64,

        /// Height in cm
        #[arg(long)]
        height: f64,
    },

    /// Show which zones each injury type allows
    Zones {
        #[arg(long)]
        injury_type: Option<String>,
    },

    /// Check that the recommendation service is up
    Health,

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
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = AppConfig::load_or_default(cli.config.as_deref())?;

    let mut log_config = config.logging.clone().with_verbosity(cli.verbose);
    if let Some(format) = &cli.log_format {
        log_config.format = format
            .parse::<LogFormat>()
            .map_err(|e| anyhow!("{}", e))?;
    }
    init_logging(&log_config)?;

    match cli.command {
        Commands::Recommend {
            profile,
            export,
            format,
        } => {
            let client = build_client(&config, cli.api_url.as_deref())?;
            recommend(&client, &profile, export, format.as_deref()).await?;
        }

        Commands::Interactive => {
            let client = build_client(&config, cli.api_url.as_deref())?;
            let mut controller = FormController::new();
            let stdin = BufReader::new(tokio::io::stdin());
            let mut stdout = std::io::stdout();
            session::run(&mut controller, &client, stdin, &mut stdout).await?;
        }

        Commands::Bmi { weight, height } => {
            let reading = bmi::classify(weight, height)?;
            println!("{}", render::render_bmi(&reading));
        }

        Commands::Zones { injury_type } => match injury_type {
            Some(raw) => {
                let injury_type = InjuryType::parse(&raw)?;
                println!("{}", session::describe_zones(injury_type));
            }
            None => {
                for injury_type in InjuryType::ALL {
                    println!(
                        "{:<12} {}",
                        injury_type.as_str().bold(),
                        zone_options(*injury_type)
                            .iter()
                            .map(|zone| zone.as_str())
                            .collect::<Vec<_>>()
                            .join(", ")
                    );
                }
            }
        },

        Commands::Health => {
            let client = build_client(&config, cli.api_url.as_deref())?;
            match client.health().await {
                Ok(health) => println!(
                    "{} {} ({})",
                    "✓".green(),
                    client.base_url(),
                    health.status
                ),
                Err(e) => {
                    let err = FitPlanError::from(e);
                    bail!(err.user_message());
                }
            }
        }

        Commands::Config { list, set, get } => {
            manage_config(config, cli.config, list, set, get)?;
        }
    }

    Ok(())
}

fn build_client(config: &AppConfig, api_url: Option<&str>) -> Result<HttpRecommendationClient> {
    let settings = config.api.resolved(api_url)?;
    info!(base_url = %settings.base_url, "Using recommendation service");
    Ok(HttpRecommendationClient::new(&settings)?)
}

async fn recommend(
    client: &HttpRecommendationClient,
    profile: &ProfileArgs,
    export: Option<PathBuf>,
    format: Option<&str>,
) -> Result<()> {
    let mut controller = FormController::new();
    for (field, raw) in profile.edits() {
        controller.apply_text(field, raw).map_err(report)?;
    }

    let spinner = session::submit_spinner();
    let outcome = controller.submit(client).await;
    spinner.finish_and_clear();
    outcome.map_err(report)?;

    match controller.phase() {
        Phase::Showing(shown) => {
            println!("{}", render::render_results(shown));
            if let Some(path) = export {
                let format = ExportFormat::resolve(format, &path)?;
                export_plan(shown, format, &path)
                    .with_context(|| format!("Failed to export plan to {}", path.display()))?;
                println!("{} Saved {} plan to {}", "✓".green(), format, path.display());
            }
            Ok(())
        }
        Phase::Failed(message) => {
            eprintln!("{} {}", "Error:".red().bold(), message);
            bail!("recommendation failed")
        }
        other => bail!("unexpected state after submit: {}", other),
    }
}

/// Log a library error at its severity and turn it into the user-facing message
fn report(err: FitPlanError) -> anyhow::Error {
    match err.severity() {
        ErrorSeverity::Critical | ErrorSeverity::Error => error!(error = %err, "Request failed"),
        ErrorSeverity::Warning => warn!(error = %err, "Request rejected"),
    }
    anyhow!(err.user_message())
}

fn manage_config(
    mut config: AppConfig,
    path: Option<PathBuf>,
    list: bool,
    set: Option<String>,
    get: Option<String>,
) -> Result<()> {
    let path = path.unwrap_or_else(AppConfig::default_config_path);

    if let Some(key_value) = set {
        let (key, value) = key_value
            .split_once('=')
            .ok_or_else(|| anyhow!("Expected KEY=VALUE, got '{}'", key_value))?;
        config.set_value(key.trim(), value)?;
        config.save_to_file(&path)?;
        println!("{} {} = {}", "✓".green(), key.trim(), value.trim());
    } else if let Some(key) = get {
        let value = config
            .get_value(&key)
            .ok_or_else(|| anyhow!("Unknown configuration key: {}", key))?;
        println!("{}", value);
    } else if list {
        println!("{}", format!("Configuration ({})", path.display()).bold());
        for (key, value) in config.list() {
            println!("  {:<20} {}", key, value);
        }
    } else {
        println!("Nothing to do; use --list, --get KEY or --set KEY=VALUE");
    }

    Ok(())
}
