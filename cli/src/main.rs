mod commands;
mod config;
mod remote;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

use crate::commands::{
    ConsoleNotifier, cmd_biodata_set, cmd_biodata_show, cmd_dashboard, cmd_export_csv,
    cmd_export_pdf, cmd_prayer_history, cmd_prayer_log, cmd_pressure_history, cmd_pressure_log,
    cmd_weight_history, cmd_weight_log,
};
use crate::config::Config;
use crate::remote::AppsScriptClient;
use pantau_core::cache::CacheStore;

#[derive(Parser)]
#[command(
    name = "pantau",
    version,
    about = "A personal health monitoring CLI",
    long_about = "Track daily weight, blood pressure, and prayers against a \
                  shared backend. Every entry is mirrored to a local cache, \
                  so logging and history keep working without a connection."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show summary cards and the last days across all trackers
    Dashboard {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Track daily body weight
    Weight {
        #[command(subcommand)]
        command: WeightCommands,
    },
    /// Track morning/evening blood pressure
    Pressure {
        #[command(subcommand)]
        command: PressureCommands,
    },
    /// Track the daily prayer checklist
    Prayer {
        #[command(subcommand)]
        command: PrayerCommands,
    },
    /// Export history (CSV locally, PDF via the backend)
    Export {
        #[command(subcommand)]
        command: ExportCommands,
    },
}

#[derive(Subcommand)]
enum WeightCommands {
    /// Log morning and evening weight for a date
    Log {
        /// Morning weight in kg
        morning: f64,
        /// Evening weight in kg
        evening: f64,
        /// Date to log for (YYYY-MM-DD or today/yesterday, default: today)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show weight history
    History {
        /// Maximum entries to show
        #[arg(short, long, default_value = "30")]
        limit: usize,
        /// Only entries from a relative range: day, week, month, or year
        #[arg(long)]
        period: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Manage the biodata profile behind the weight tracker
    Biodata {
        #[command(subcommand)]
        command: BiodataCommands,
    },
}

#[derive(Subcommand)]
enum BiodataCommands {
    /// Create the profile, or overwrite it to edit
    Set {
        /// Full name
        #[arg(long)]
        name: String,
        /// Age in years
        #[arg(long)]
        age: u32,
        /// Place of birth
        #[arg(long)]
        birthplace: String,
        /// Date of birth (YYYY-MM-DD)
        #[arg(long, value_name = "YYYY-MM-DD")]
        birth_date: String,
        /// Hobby (optional)
        #[arg(long, default_value = "")]
        hobby: String,
        /// Occupation
        #[arg(long)]
        occupation: String,
        /// Height in cm
        #[arg(long)]
        height: f64,
        /// Starting weight in kg
        #[arg(long)]
        initial_weight: f64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the profile and its ideal-weight band
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum PressureCommands {
    /// Log morning and evening readings for a date
    Log {
        /// Morning reading as systolic/diastolic, e.g. 120/80
        #[arg(short, long)]
        morning: String,
        /// Evening reading as systolic/diastolic, e.g. 118/78
        #[arg(short, long)]
        evening: String,
        /// Blood-pressure medication was taken
        #[arg(long)]
        medication: bool,
        /// What was eaten in the morning
        #[arg(long, default_value = "")]
        breakfast: String,
        /// What was eaten at midday
        #[arg(long, default_value = "")]
        lunch: String,
        /// What was eaten in the evening
        #[arg(long, default_value = "")]
        dinner: String,
        /// Date to log for (YYYY-MM-DD or today/yesterday, default: today)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show blood-pressure history
    History {
        /// Maximum entries to show
        #[arg(short, long, default_value = "30")]
        limit: usize,
        /// Only entries from a relative range: day, week, month, or year
        #[arg(long)]
        period: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum PrayerCommands {
    /// Log the checklist for a date
    Log {
        /// Comma-separated completed prayers
        /// (subuh, dzuhur, ashar, maghrib, isya, dhuha, tahajud)
        #[arg(short, long, default_value = "")]
        done: String,
        /// Date to log for (YYYY-MM-DD or today/yesterday, default: today)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show prayer history
    History {
        /// Maximum entries to show
        #[arg(short, long, default_value = "30")]
        limit: usize,
        /// Only entries from a relative range: day, week, month, or year
        #[arg(long)]
        period: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum ExportCommands {
    /// Write a history collection to a CSV file
    Csv {
        /// Collection to export: weight, pressure, or prayer
        kind: String,
        /// Output file (default: <kind>_<today>.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Ask the backend to render a PDF report
    Pdf {
        /// Report range start (YYYY-MM-DD)
        #[arg(long, value_name = "YYYY-MM-DD")]
        start: String,
        /// Report range end (YYYY-MM-DD)
        #[arg(long, value_name = "YYYY-MM-DD")]
        end: String,
        /// Leave weight out of the report
        #[arg(long)]
        skip_weight: bool,
        /// Leave blood pressure out of the report
        #[arg(long)]
        skip_pressure: bool,
        /// Leave prayers out of the report
        #[arg(long)]
        skip_prayer: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let cache = CacheStore::open(&config.cache_path)?;
    let remote = AppsScriptClient::new(config.endpoint_url, config.timeout, runtime.handle().clone());
    let notifier = ConsoleNotifier;

    match cli.command {
        Commands::Dashboard { json } => cmd_dashboard(&remote, &cache, json),
        Commands::Weight { command } => match command {
            WeightCommands::Log {
                morning,
                evening,
                date,
                json,
            } => cmd_weight_log(&remote, &cache, &notifier, morning, evening, date, json),
            WeightCommands::History {
                limit,
                period,
                json,
            } => cmd_weight_history(&remote, &cache, &notifier, limit, period, json),
            WeightCommands::Biodata { command } => match command {
                BiodataCommands::Set {
                    name,
                    age,
                    birthplace,
                    birth_date,
                    hobby,
                    occupation,
                    height,
                    initial_weight,
                    json,
                } => cmd_biodata_set(
                    &remote,
                    &cache,
                    &notifier,
                    name,
                    age,
                    birthplace,
                    birth_date,
                    hobby,
                    occupation,
                    height,
                    initial_weight,
                    json,
                ),
                BiodataCommands::Show { json } => cmd_biodata_show(&remote, &cache, &notifier, json),
            },
        },
        Commands::Pressure { command } => match command {
            PressureCommands::Log {
                morning,
                evening,
                medication,
                breakfast,
                lunch,
                dinner,
                date,
                json,
            } => cmd_pressure_log(
                &remote, &cache, &notifier, &morning, &evening, medication, breakfast, lunch,
                dinner, date, json,
            ),
            PressureCommands::History {
                limit,
                period,
                json,
            } => cmd_pressure_history(&remote, &cache, &notifier, limit, period, json),
        },
        Commands::Prayer { command } => match command {
            PrayerCommands::Log { done, date, json } => {
                cmd_prayer_log(&remote, &cache, &notifier, &done, date, json)
            }
            PrayerCommands::History {
                limit,
                period,
                json,
            } => cmd_prayer_history(&remote, &cache, &notifier, limit, period, json),
        },
        Commands::Export { command } => match command {
            ExportCommands::Csv { kind, output } => {
                cmd_export_csv(&remote, &cache, &notifier, &kind, output)
            }
            ExportCommands::Pdf {
                start,
                end,
                skip_weight,
                skip_pressure,
                skip_prayer,
            } => cmd_export_pdf(
                &remote,
                &notifier,
                start,
                end,
                skip_weight,
                skip_pressure,
                skip_prayer,
            ),
        },
    }
}
