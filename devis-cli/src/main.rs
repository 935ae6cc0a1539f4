//! `devis` — terminal quote estimator for custom metalwork.
//!
//! `devis estimate` (the default) walks the four-step wizard and sends the
//! simulated quote request; `devis colors` browses the RAL classic chart
//! offered for lacquered finishes.

mod config;
mod logging;
mod prompt;

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result, bail};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use devis_core::{QuoteWizard, SimulatedIntake};
use devis_data::{RalCategory, RalChart, RalFilter};

#[derive(Parser)]
#[command(name = "devis", about = "Estimateur de devis métallerie", version)]
struct Cli {
    /// Append log records to this file as well as stdout.
    #[arg(long, global = true, value_name = "FILE")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the interactive quote wizard (the default).
    Estimate(EstimateArgs),
    /// Browse the RAL classic color chart.
    Colors(ColorsArgs),
}

#[derive(Args)]
struct EstimateArgs {
    /// TOML file overriding the built-in pricing table.
    #[arg(long, value_name = "FILE")]
    pricing: Option<PathBuf>,

    /// Simulated processing delay for the submission, in milliseconds.
    #[arg(long, default_value_t = 2000)]
    delay_ms: u64,
}

impl Default for EstimateArgs {
    fn default() -> Self {
        Self {
            pricing: None,
            delay_ms: 2000,
        }
    }
}

#[derive(Args)]
struct ColorsArgs {
    /// Restrict to one category (Blancs, Gris, Noirs, ...).
    #[arg(long)]
    category: Option<String>,

    /// Case-insensitive match on code or name.
    #[arg(long, default_value = "")]
    search: String,

    /// Only show the most requested references.
    #[arg(long)]
    popular: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_file.as_deref())?;

    match cli
        .command
        .unwrap_or(Command::Estimate(EstimateArgs::default()))
    {
        Command::Estimate(args) => estimate(args).await,
        Command::Colors(args) => colors(args),
    }
}

async fn estimate(args: EstimateArgs) -> Result<()> {
    let pricing = config::load_pricing(args.pricing.as_deref())?;
    let wizard = QuoteWizard::new(pricing);
    let intake = SimulatedIntake::new(Duration::from_millis(args.delay_ms));
    info!(delay_ms = args.delay_ms, "starting quote session");

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut input = stdin.lock();
    let mut output = stdout.lock();
    prompt::run(wizard, &intake, &mut input, &mut output).await
}

fn colors(args: ColorsArgs) -> Result<()> {
    let category = match args.category.as_deref() {
        None => None,
        Some(name) => match RalCategory::parse(name) {
            Some(category) => Some(category),
            None => bail!(
                "unknown category '{name}' (expected one of: {})",
                RalCategory::ALL
                    .iter()
                    .map(|c| c.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        },
    };
    let filter = RalFilter {
        category,
        search: args.search,
        popular_only: args.popular,
    };

    let chart = RalChart::builtin();
    let hits = chart.filter(&filter);

    let stdout = io::stdout();
    let mut output = stdout.lock();
    for color in &hits {
        let star = if color.is_popular() { "*" } else { " " };
        writeln!(
            output,
            "{star} {:<9} {:<7} {:<10} {}",
            color.code,
            color.hex,
            color.category.as_str(),
            color.name
        )?;
    }
    writeln!(output, "{} teinte(s)", hits.len())?;
    Ok(())
}
