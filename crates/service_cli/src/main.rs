//! finsolve CLI - Rate Solvers from the Command Line
//!
//! # Commands
//!
//! - `finsolve rate --nper 48 --pmt -200 --pv 8000` - Periodic annuity rate
//! - `finsolve irr --flows=-100,60,60,60` - Internal rate of return
//! - `finsolve xirr --file flows.json` - IRR of dated cashflows
//! - `finsolve yield --settlement ... --maturity ... --rate ... --price ...`
//! - `finsolve odd-yield ... --issue ... --first-coupon ...`
//!
//! # Configuration
//!
//! Solver precision and the log level are read from `finsolve.toml` (or the
//! file passed with `--config`) and `FINSOLVE_*` environment variables.
//! `RUST_LOG` overrides the configured log level.

use std::path::Path;

use clap::{Parser, Subcommand};
use finsolve_core::financial::RateSolver;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;

pub use error::{CliError, Result};

use commands::bond::BondArgs;
use commands::rate::AnnuityTerms;

/// finsolve: spreadsheet-compatible rate solvers
#[derive(Parser)]
#[command(name = "finsolve")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "finsolve.toml")]
    config: String,

    /// Output format (json, csv, table)
    #[arg(short, long, global = true, default_value = "table")]
    format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Periodic rate of an annuity (RATE)
    Rate {
        /// Number of periods
        #[arg(long)]
        nper: f64,

        /// Payment per period
        #[arg(long, allow_hyphen_values = true)]
        pmt: f64,

        /// Present value
        #[arg(long, allow_hyphen_values = true)]
        pv: f64,

        /// Future value
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        fv: f64,

        /// Payments fall at the start of each period
        #[arg(long)]
        advance: bool,

        /// Initial guess
        #[arg(long, default_value = "0.1", allow_hyphen_values = true)]
        guess: f64,
    },

    /// Internal rate of return of periodic cashflows (IRR)
    Irr {
        /// Comma-separated cashflows, first one at period zero
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true, conflicts_with = "file")]
        flows: Vec<f64>,

        /// CSV file of amounts separated by commas or newlines
        #[arg(long)]
        file: Option<String>,
    },

    /// Internal rate of return of dated cashflows (XIRR)
    Xirr {
        /// JSON array of `{ "date", "amount" }` records or `date,amount` CSV rows
        #[arg(long)]
        file: String,
    },

    /// Yield of a regular coupon bond (YIELD)
    Yield {
        #[command(flatten)]
        bond: BondArgs,
    },

    /// Yield of a bond with an odd first period (ODDFYIELD)
    OddYield {
        #[command(flatten)]
        bond: BondArgs,

        /// Issue date (YYYY-MM-DD)
        #[arg(long)]
        issue: String,

        /// First coupon date (YYYY-MM-DD)
        #[arg(long)]
        first_coupon: String,
    },
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config::build_config(Path::new(&cli.config))?;

    let level = if cli.verbose {
        "debug"
    } else {
        config.log_level.as_filter_str()
    };
    init_tracing(level);

    debug!(
        config = %cli.config,
        digits = config.digits,
        max_iterations = config.max_iterations,
        "Configuration loaded"
    );

    let solver = RateSolver::new(config.solver_config());

    let outcome = match cli.command {
        Commands::Rate {
            nper,
            pmt,
            pv,
            fv,
            advance,
            guess,
        } => {
            let terms = AnnuityTerms {
                nper,
                pmt,
                pv,
                fv,
                pay_in_advance: advance,
                guess,
            };
            commands::rate::run(&solver, &terms, &cli.format)
        }
        Commands::Irr { flows, file } => match file {
            Some(path) => commands::irr::load(&path)
                .and_then(|flows| commands::irr::run(&solver, &flows, &cli.format)),
            None => commands::irr::run(&solver, &flows, &cli.format),
        },
        Commands::Xirr { file } => commands::xirr::run(&solver, &file, &cli.format),
        Commands::Yield { bond } => commands::bond::run_yield(&solver, &bond, &cli.format),
        Commands::OddYield {
            bond,
            issue,
            first_coupon,
        } => commands::bond::run_odd_yield(&solver, &bond, &issue, &first_coupon, &cli.format),
    };

    if outcome.is_ok() {
        info!("Done");
    }
    outcome
}
