use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode};
use tracing::debug;
use wxlab_core::{
    Config, CurrentReport, WeatherQuery, get_weather, get_weather_forecast, source_from_config,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "wxlab",
    version,
    about = "Current weather and daily forecast summaries"
)]
pub struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure,

    /// Show current weather for a location.
    Current(LocationArgs),

    /// Show a per-day summary of the 5-day forecast.
    Forecast(LocationArgs),
}

#[derive(Debug, Args)]
pub struct LocationArgs {
    /// City or place name.
    pub location: String,

    /// Optional country code, e.g. "GB".
    #[arg(long, short)]
    pub country: Option<String>,

    /// Print the raw JSON payload instead of plain lines.
    #[arg(long)]
    pub json: bool,
}

impl LocationArgs {
    fn query(&self) -> WeatherQuery {
        let query = WeatherQuery::new(self.location.as_str());
        match &self.country {
            Some(country) => query.with_country(country.as_str()),
            None => query,
        }
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Current(args) => {
                let config = Config::load()?;
                let source = source_from_config(&config)?;
                let report = get_weather(&*source, &args.query())
                    .await
                    .context("Failed to fetch current weather")?;

                if args.json {
                    println!("{}", report.to_json()?);
                } else {
                    println!("{}", current_text(&report));
                }
                Ok(())
            }
            Command::Forecast(args) => {
                let config = Config::load()?;
                let source = source_from_config(&config)?;
                let report = get_weather_forecast(&*source, &args.query())
                    .await
                    .context("Failed to fetch weather forecast")?;

                if args.json {
                    println!("{}", report.to_json()?);
                } else {
                    for line in report.lines() {
                        println!("{line}");
                    }
                }
                Ok(())
            }
        }
    }
}

/// The report message, plus the provider's observation time when known.
fn current_text(report: &CurrentReport) -> String {
    match report.observed_at {
        Some(at) => {
            let at = at.format("%Y-%m-%d %H:%M UTC");
            format!("{}\nObserved at {at}", report.message)
        }
        None => report.message.clone(),
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load_file()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    config.set_api_key(api_key.trim().to_string());
    if !config.is_configured() {
        anyhow::bail!("API key must not be empty");
    }

    config.save()?;
    let path = Config::config_file_path()?;
    debug!(path = %path.display(), "saved configuration");
    println!("Saved API key to {}", path.display());

    Ok(())
}

pub fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
