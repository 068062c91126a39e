//! Vitalytics CLI - Command-line interface for the analytics engine
//!
//! Commands:
//! - analyze: Run all analyzers over a health log and emit a report
//! - validate: Check a health log against the window invariants
//! - config: Print the default engine configuration

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use vitalytics::types::{ActivityLevel, UserProfile};
use vitalytics::{AnalysisWindow, AnalyticsEngine, EngineConfig, ENGINE_VERSION};

/// Vitalytics - Behavioral analytics engine for longitudinal health logs
#[derive(Parser)]
#[command(name = "vitalytics")]
#[command(version = ENGINE_VERSION)]
#[command(about = "Analyze health logs for stability, correlations, and habits", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all analyzers over a health log and emit a report
    Analyze {
        /// Input file path (use - for stdin), a JSON array of log entries
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// User identifier for the report key
        #[arg(long, default_value = "local")]
        user_id: String,

        /// User age (years)
        #[arg(long)]
        age: u32,

        /// User activity level
        #[arg(long, value_enum, default_value = "moderate")]
        activity_level: ActivityLevelArg,

        /// Restrict analysis to the last N calendar days
        #[arg(long)]
        lookback_days: Option<u32>,

        /// Load engine configuration from a JSON file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Check a health log against the window invariants
    Validate {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Print the default engine configuration as JSON
    Config,
}

#[derive(Clone, Copy, ValueEnum)]
enum ActivityLevelArg {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

impl From<ActivityLevelArg> for ActivityLevel {
    fn from(arg: ActivityLevelArg) -> Self {
        match arg {
            ActivityLevelArg::Sedentary => ActivityLevel::Sedentary,
            ActivityLevelArg::Light => ActivityLevel::Light,
            ActivityLevelArg::Moderate => ActivityLevel::Moderate,
            ActivityLevelArg::Active => ActivityLevel::Active,
            ActivityLevelArg::VeryActive => ActivityLevel::VeryActive,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Analyze {
            input,
            output,
            user_id,
            age,
            activity_level,
            lookback_days,
            config,
        } => cmd_analyze(
            &input,
            &output,
            &user_id,
            age,
            activity_level,
            lookback_days,
            config.as_deref(),
        ),
        Commands::Validate { input } => cmd_validate(&input),
        Commands::Config => {
            println!("{}", EngineConfig::default().to_json()?);
            Ok(())
        }
    }
}

fn cmd_analyze(
    input: &Path,
    output: &Path,
    user_id: &str,
    age: u32,
    activity_level: ActivityLevelArg,
    lookback_days: Option<u32>,
    config_path: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut window = AnalysisWindow::from_json(&read_input(input)?)?;
    if let Some(days) = lookback_days {
        window = window.last_n_days(days);
    }

    let engine = match config_path {
        Some(path) => {
            let config = EngineConfig::from_json(&fs::read_to_string(path)?)?;
            AnalyticsEngine::with_config(config)
        }
        None => AnalyticsEngine::new(),
    };

    let profile = UserProfile {
        age,
        activity_level: activity_level.into(),
    };
    let report = engine.analyze(user_id, &window, &profile)?;

    if output.to_string_lossy() == "-" {
        // Pretty JSON on a terminal, compact when piped
        if atty::is(atty::Stream::Stdout) {
            println!("{}", report.to_json()?);
        } else {
            println!("{}", serde_json::to_string(&report)?);
        }
    } else {
        fs::write(output, report.to_json()?)?;
    }

    Ok(())
}

fn cmd_validate(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let window = AnalysisWindow::from_json(&read_input(input)?)?;
    println!(
        "ok: {} entries spanning {} days",
        window.len(),
        window.span_days()
    );
    Ok(())
}

fn read_input(input: &Path) -> Result<String, io::Error> {
    if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        fs::read_to_string(input)
    }
}
