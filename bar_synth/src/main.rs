use std::{path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use bar_synth::{
    check::{FixtureReport, inspect},
    clock::{Clock, FixedClock, SystemClock},
    config::{GeneratorConfig, load_config_path},
    io::reader::{read_bars, read_bars_auto},
    models::{format::OutputFormat, request::SeriesRequest},
    random::RngSource,
    write_series,
};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "BAR_SYNTH_LOG";

#[derive(Parser)]
#[command(version, about = "Synthetic minute-bar OHLCV fixtures")]
struct Cli {
    /// Defaults to `generate` with its default arguments
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a synthetic bar series to disk
    Generate {
        #[arg(long, default_value = "AMZN")]
        ticker: String,

        /// Lookback window in calendar days
        #[arg(long, default_value_t = 10, allow_negative_numbers = true)]
        days: i64,

        #[arg(long, value_enum, default_value_t = OutputFormat::Delimited)]
        format: OutputFormat,

        /// Output path (default: <TICKER>.<ext> in the working directory)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Seed the random walk for a reproducible series
        #[arg(long)]
        seed: Option<u64>,

        /// Pin the end of the window (RFC 3339, e.g. "2024-01-08T16:00:00Z")
        #[arg(long)]
        now: Option<DateTime<Utc>>,

        /// Generator settings (TOML)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Read a fixture back and report invariant violations
    Check {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Inferred from the extension when omitted
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,

        /// Settings the fixture was generated with (TOML)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Default for Commands {
    fn default() -> Self {
        let request = SeriesRequest::default();
        Commands::Generate {
            ticker: request.ticker,
            days: request.days,
            format: request.format,
            output: None,
            seed: None,
            now: None,
            config: None,
        }
    }
}

fn init_tracing() -> Result<()> {
    let filter = shared_utils::env::get_env_var_or(LOG_ENV, "info");
    let env_filter = EnvFilter::try_new(&filter)
        .with_context(|| format!("invalid {LOG_ENV} filter {filter:?}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> Result<GeneratorConfig> {
    match path {
        Some(path) => load_config_path(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(GeneratorConfig::default()),
    }
}

fn print_report(file: &std::path::Path, format: OutputFormat, report: &FixtureReport) {
    println!("{}: {} bars ({format})", file.display(), report.bars);
    if let (Some(first), Some(last)) = (report.first_timestamp, report.last_timestamp) {
        println!("  span            {first} .. {last}");
    }
    println!("  trading days    {}", report.trading_days);

    let rows = [
        ("out of order", report.out_of_order, report.first_out_of_order),
        ("intraday gaps", report.intraday_gaps, report.first_intraday_gap),
        ("continuity", report.continuity_breaks, report.first_continuity_break),
        ("unbracketed", report.unbracketed, report.first_unbracketed),
        ("outside session", report.outside_session, report.first_outside_session),
        ("volume range", report.volume_out_of_range, report.first_volume_out_of_range),
    ];
    for (label, count, first) in rows {
        match first {
            Some(ts) => println!("  {label:<15} {count} (first at {ts})"),
            None => println!("  {label:<15} {count}"),
        }
    }
    println!("{}", if report.is_clean() { "clean" } else { "VIOLATIONS FOUND" });
}

fn main() -> Result<ExitCode> {
    init_tracing()?;
    let cli = Cli::parse();

    match cli.command.unwrap_or_default() {
        Commands::Generate {
            ticker,
            days,
            format,
            output,
            seed,
            now,
            config,
        } => {
            let config = load_config(config.as_ref())?;
            let clock: Box<dyn Clock> = match now {
                Some(now) => Box::new(FixedClock(now)),
                None => Box::new(SystemClock),
            };
            let rng = match seed {
                Some(seed) => RngSource::seeded(seed),
                None => RngSource::from_entropy(),
            };
            debug!(?seed, ?now, "generator inputs");

            let mut request = SeriesRequest::new(ticker, days).with_format(format);
            if let Some(output) = output {
                request = request.with_output(output);
            }

            let (path, _summary) = write_series(&request, config, clock, rng)
                .with_context(|| format!("generating {} fixture", request.ticker))?;
            println!("Generated {}", path.display());
            Ok(ExitCode::SUCCESS)
        }

        Commands::Check {
            file,
            format,
            config,
            json,
        } => {
            let config = load_config(config.as_ref())?;
            let (format, bars) = match format {
                Some(format) => (format, read_bars(&file, format)?),
                None => read_bars_auto(&file)?,
            };
            let report = inspect(&bars, &config);

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&file, format, &report);
            }

            Ok(if report.is_clean() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}
