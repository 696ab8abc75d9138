//! Facturachain CLI
//!
//! Thin command-line surface over the ledger core: record an invoice
//! image with its extracted amount, run reports, verify the chain.

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

use facturachain::{Config, Error, Ledger, Period};

#[derive(Parser, Debug)]
#[clap(name = "facturachain", version, about = "Tamper-evident invoice ledger", long_about = None)]
struct Options {
    /// path to a TOML configuration file
    #[clap(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// record an invoice image and its extracted amount
    Append(AppendOptions),
    /// aggregate recorded invoices over a period
    Report(ReportOptions),
    /// recompute digests and check chain linkage
    Verify,
    /// show chain height and tip
    Info,
}

#[derive(Args, Debug)]
struct AppendOptions {
    /// invoice image to record
    #[clap(short, long)]
    file: PathBuf,

    /// extracted total amount, e.g. 199.55
    #[clap(short, long)]
    amount: String,
}

#[derive(Args, Debug)]
struct ReportOptions {
    /// weekly, monthly, yearly or all (case-insensitive)
    period: String,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let options = Options::parse();

    match run(options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(options: Options) -> facturachain::Result<()> {
    let config = match &options.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env(),
    };

    let ledger = Ledger::open(&config)?;

    match options.command {
        Commands::Append(opts) => {
            let amount = parse_amount(&opts.amount)?;
            let block = ledger.append(&opts.file, amount)?;
            println!(
                "recorded {} ({}) as block #{}",
                block.invoice.file_name, block.invoice.amount, block.index
            );
            println!("hash: {}", block.hash);
        }
        Commands::Report(opts) => {
            let period = Period::from_str(&opts.period)?;
            let report = ledger.report(period);
            for entry in &report.entries {
                println!("{:<40} {:>12}", entry.file_name, entry.amount);
            }
            println!("{} entries, total {}", report.entries.len(), report.total);
        }
        Commands::Verify => {
            ledger.verify()?;
            println!("chain OK ({} blocks)", ledger.height() + 1);
        }
        Commands::Info => {
            println!("height: {}", ledger.height());
            println!("tip:    {}", ledger.tip_hash());
            println!("evidence dir: {}", config.evidence_dir.display());
        }
    }

    Ok(())
}

/// Caller-side amount validation: reject unparsable or non-positive input
/// before the ledger is touched
fn parse_amount(raw: &str) -> facturachain::Result<Decimal> {
    let normalized = raw.trim().replace(',', ".");
    let amount = Decimal::from_str(&normalized)
        .map_err(|e| Error::MalformedAmount(format!("'{raw}': {e}")))?;
    if amount <= Decimal::ZERO {
        return Err(Error::MalformedAmount(format!(
            "amount must be positive, got {amount}"
        )));
    }
    Ok(amount)
}
