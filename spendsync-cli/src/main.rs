use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::{Args, Parser, Subcommand, ValueEnum};
use spendsync_core::{Category, Direction, Period, Provider, TransactionRecord};
use spendsync_finance::{
    CsvSink, Extraction, JsonLinesSink, MemoryLedger, Pipeline, StatementSource, TransactionSink,
    replay_all, summarize,
};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing::info;

mod config;
mod logging;
mod state;

const LONG_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("SPENDSYNC_BUILD_SHA"), ")");

#[derive(Parser, Debug)]
#[command(
    name = "spendsync",
    version,
    long_version = LONG_VERSION,
    about = "Turn UPI statement text into categorized expense records"
)]
struct Cli {
    /// Debug logging (RUST_LOG takes precedence)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse statement text for one month and write the records
    Extract(ExtractArgs),

    /// Show how a single description would be categorized
    Categorize {
        text: String,

        /// Treat the description as money received
        #[arg(long)]
        credit: bool,

        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List expense and income categories
    Categories,

    /// Manage ~/.spendsync/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Args, Debug)]
struct ExtractArgs {
    /// Target month, 1-12 (default: previous month)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    month: Option<u32>,

    /// Target year (default: year of the previous month)
    #[arg(long)]
    year: Option<i32>,

    /// Text extracted from a GPay statement
    #[arg(long)]
    gpay: Option<PathBuf>,

    /// Text extracted from a PhonePe statement
    #[arg(long)]
    phonepe: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Output file (default: stdout)
    #[arg(long)]
    out: Option<PathBuf>,

    /// Load records into an in-memory ledger and print the summary only
    #[arg(long)]
    dry_run: bool,

    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config if none exists
    Init,
    /// Print the effective config
    Show {
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Pretty JSON array
    Json,
    /// One JSON object per line
    Jsonl,
    Csv,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Command::Extract(args) => extract(args)?,

        Command::Categorize {
            text,
            credit,
            config,
        } => {
            let cfg = config::load_config(config.as_deref())?;
            let direction = if credit {
                Direction::Credit
            } else {
                Direction::Debit
            };
            let cat = cfg.category_rules().categorize(&text, direction);
            println!("category: {}", cat.category);
            println!("label: {}", cat.label.as_deref().unwrap_or("-"));
            if cat.category.is_skip() {
                println!("(excluded from output)");
            }
        }

        Command::Categories => {
            println!("Expenses:");
            for c in Category::EXPENSE {
                println!("  {c}");
            }
            println!("Income:");
            for c in Category::INCOME {
                println!("  {c}");
            }
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show { config } => {
                let cfg = config::load_config(config.as_deref())?;
                let p = match config {
                    Some(p) => p,
                    None => config::config_path()?,
                };
                println!("# {}", p.display());
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

fn extract(args: ExtractArgs) -> Result<()> {
    let cfg = config::load_config(args.config.as_deref())?;
    let period = target_period(args.month, args.year, &cfg.run.timezone)?;

    let mut sources = Vec::new();
    if let Some(p) = &args.gpay {
        sources.push(StatementSource::new(Provider::GPay, state::read_statement(p)));
    }
    if let Some(p) = &args.phonepe {
        sources.push(StatementSource::new(Provider::PhonePe, state::read_statement(p)));
    }
    if sources.is_empty() {
        bail!("nothing to extract (pass --gpay and/or --phonepe)");
    }

    let pipeline = Pipeline::new(period, cfg.category_rules(), cfg.scan_options())?
        .with_currency(cfg.run.currency.clone());
    let extraction = pipeline.run(&sources);

    if extraction.is_empty() {
        info!(%period, "no transactions for period");
    }

    if args.dry_run {
        let mut ledger = MemoryLedger::new();
        let run = replay_all(&mut ledger, &extraction.records)?;
        eprintln!("Dry run: {} of {} records loaded", run.succeeded, run.attempted);
        report(&extraction);
        return Ok(());
    }

    let mut out: Box<dyn Write> = match &args.out {
        Some(p) => Box::new(BufWriter::new(
            File::create(p).with_context(|| format!("create {}", p.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    write_records(&mut out, args.format, &extraction.records)?;
    drop(out);

    if let Some(p) = &args.out {
        eprintln!("Wrote {} records to {}", extraction.records.len(), p.display());
    }
    report(&extraction);
    Ok(())
}

/// Explicit month/year, falling back to the previous month in `timezone`
fn target_period(month: Option<u32>, year: Option<i32>, timezone: &str) -> Result<Period> {
    if let (Some(m), Some(y)) = (month, year) {
        return Ok(Period::new(m, y)?);
    }
    let fallback = Period::previous_month_in(timezone, Utc::now())?;
    Ok(Period::new(
        month.unwrap_or(fallback.month()),
        year.unwrap_or(fallback.year()),
    )?)
}

fn write_records(out: &mut dyn Write, format: OutputFormat, records: &[TransactionRecord]) -> Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, records).context("write json")?;
            writeln!(out)?;
        }
        OutputFormat::Jsonl => replay_into(&mut JsonLinesSink::new(&mut *out), records)?,
        OutputFormat::Csv => replay_into(&mut CsvSink::new(&mut *out), records)?,
    }
    out.flush()?;
    Ok(())
}

fn replay_into(sink: &mut dyn TransactionSink, records: &[TransactionRecord]) -> Result<()> {
    let run = replay_all(sink, records)?;
    if !run.is_clean() {
        bail!(
            "{} of {} records failed to write (first: {})",
            run.failures.len(),
            run.attempted,
            run.failures[0].reason
        );
    }
    Ok(())
}

fn report(extraction: &Extraction) {
    let s = &extraction.stats;
    eprintln!(
        "{}: {} fragments, {} accepted, {} skipped, {} bad amounts",
        extraction.period, s.fragments, s.accepted, s.skipped, s.bad_amount
    );
    if extraction.is_empty() {
        eprintln!("No transactions found for {}", extraction.period);
        return;
    }
    eprintln!("{}", summarize(&extraction.records));
}
