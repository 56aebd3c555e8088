use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::debug;

use buyout_cli::analytics::{InMemoryEventLog, format_timestamp};
use buyout_cli::app::{self, CalculateRequest};
use buyout_cli::config::CalculatorConfig;
use buyout_cli::logging::{self, LogSettings};
use buyout_cli::report::OutputFormat;
use buyout_cli::state::CalculatorSession;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Lease buyout tax savings calculator.
///
/// Estimates how much sales tax is avoided by selling a leased vehicle
/// straight to a dealer instead of buying it out first.
#[derive(Debug, Parser)]
#[command(name = "lease-buyout")]
#[command(version, about, long_about = None)]
struct Cli {
    /// TOML config file with default settings.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `info,buyout_core=trace`.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Append log output to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Suppress log output on stderr.
    #[arg(short, long, global = true, default_value_t = false)]
    quiet: bool,

    /// CSV of province rates replacing the built-in table.
    #[arg(long, global = true)]
    rates: Option<PathBuf>,

    /// Print the recorded analytics events to stderr on exit.
    #[arg(long, global = true, default_value_t = false)]
    events: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Calculate tax savings for a buyout amount.
    Calculate(CalculateArgs),
    /// List the known provinces and their tax rates.
    Provinces,
}

#[derive(Debug, Args)]
struct CalculateArgs {
    /// Lease buyout amount, e.g. `20000` or `$20,000`.
    #[arg(allow_hyphen_values = true)]
    buyout: String,

    /// Province or territory code.
    #[arg(short, long)]
    province: Option<String>,

    /// Purchase option fee charged by the lessor.
    #[arg(long)]
    fee: Option<String>,

    /// Other fees (admin, registration).
    #[arg(long)]
    other_fees: Option<String>,

    /// Estimated market value of the vehicle.
    #[arg(long)]
    vehicle_value: Option<String>,

    /// Lease payments left if you keep the vehicle.
    #[arg(long)]
    remaining_payments: Option<String>,

    /// Monthly lease payment.
    #[arg(long)]
    monthly_payment: Option<String>,

    /// Show cents in results.
    #[arg(long, default_value_t = false)]
    cents: bool,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Append a plain-text summary suitable for sharing.
    #[arg(long, default_value_t = false)]
    summary: bool,
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => CalculatorConfig::load(path)?,
        None => CalculatorConfig::default(),
    };

    logging::init_logging(&LogSettings {
        level: cli.log_level.clone().or_else(|| config.log_level.clone()),
        file: cli.log_file.clone().or_else(|| config.log_file.clone()),
        quiet: cli.quiet,
    })?;

    let rates_file = cli.rates.as_deref().or(config.rates_file.as_deref());
    let table = app::load_province_table(rates_file).with_context(|| match rates_file {
        Some(path) => format!("Failed to load province rates: {}", path.display()),
        None => "Failed to load province rates".to_string(),
    })?;

    match cli.command {
        Command::Provinces => {
            print!("{}", app::render_province_list(&table));
        }
        Command::Calculate(args) => {
            let mut session = CalculatorSession::new(table, InMemoryEventLog::new());
            let request = CalculateRequest {
                buyout: args.buyout,
                province: args.province.or(config.province),
                purchase_option_fee: args.fee,
                other_fees: args.other_fees,
                vehicle_value: args.vehicle_value,
                remaining_payments: args.remaining_payments,
                monthly_payment: args.monthly_payment,
                show_cents: args.cents || config.show_cents,
                format: args.format,
                summary: args.summary,
            };

            debug!(?request, "calculating");
            let result = app::run_calculate(&mut session, &request);

            if cli.events {
                for event in session.sink().events() {
                    let metadata = event
                        .metadata
                        .as_ref()
                        .map(|m| format!(" {m}"))
                        .unwrap_or_default();
                    eprintln!(
                        "{} #{} {}{metadata}",
                        format_timestamp(&event.timestamp),
                        event.id,
                        event.event_type.as_str()
                    );
                }
            }

            println!("{}", result?.trim_end());
        }
    }

    Ok(())
}
