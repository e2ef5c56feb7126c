//! CLI argument definitions for stockpick.
//!
//! Every command reads already-fetched JSON documents from disk and prints a
//! JSON result on stdout. Diagnostics go to stderr through `tracing`; set
//! `RUST_LOG=stockpick_core=debug` to see which source supplied each
//! fundamentals field.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `normalize` | Normalize provider payloads into fundamentals records |
//! | `size` | Share count for a target allocation |
//! | `order` | Size a pick and run the guardrails |
//! | `picks` | Validate a recommendation generator response |
//! | `evaluate` | Assemble and validate a stock evaluation |
//! | `review` | Daily review of broker positions |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--strict` | `false` | Treat data-quality warnings as errors |
//! | `--config` | none | JSON configuration file |

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand};

/// Equity research records, fundamentals normalization and order sizing.
#[derive(Debug, Parser)]
#[command(
    name = "stockpick",
    author,
    version,
    about = "Validate stock picks, normalize fundamentals and size orders",
    long_about = "stockpick works on JSON documents already fetched from data providers, \
the broker and the recommendation generator. It never talks to the network.\n\
\n\
Use 'stockpick <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Treat data-quality warnings as failures (exit code 5).
    #[arg(long, global = true, default_value_t = false)]
    pub strict: bool,

    /// JSON configuration file (guardrails, order defaults, sizing).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Normalize provider payloads into fundamentals records.
    ///
    /// Each argument is TICKER=PATH. Results are printed in argument order.
    ///
    /// # Examples
    ///
    ///   stockpick normalize CRNX=crnx.json AAPL=aapl.json --pretty
    Normalize(NormalizeArgs),

    /// Whole shares for a target allocation.
    ///
    /// # Examples
    ///
    ///   stockpick size --portfolio-value 10000 --price 100 --target-pct 5
    Size(SizeArgs),

    /// Size a pick against the broker portfolio and run the guardrails.
    ///
    /// Exits with code 6 when a guardrail rejects the order.
    ///
    /// # Examples
    ///
    ///   stockpick order --picks picks.json --positions positions.json --cash 2500 --price 31.2
    Order(OrderArgs),

    /// Validate a recommendation generator response (JSON array of picks).
    Picks(PicksArgs),

    /// Assemble and validate a stock evaluation draft.
    Evaluate(EvaluateArgs),

    /// Daily review of broker positions against market snapshots.
    Review(ReviewArgs),
}

/// `TICKER=PATH` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadSpec {
    pub ticker: String,
    pub path: PathBuf,
}

impl FromStr for PayloadSpec {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.split_once('=') {
            Some((ticker, path)) if !ticker.trim().is_empty() && !path.is_empty() => Ok(Self {
                ticker: ticker.trim().to_owned(),
                path: PathBuf::from(path),
            }),
            _ => Err(format!("expected TICKER=PATH, got '{value}'")),
        }
    }
}

/// Arguments for the `normalize` command.
#[derive(Debug, Args)]
pub struct NormalizeArgs {
    /// One or more TICKER=PATH provider payloads.
    #[arg(required = true, num_args = 1.., value_name = "TICKER=PATH")]
    pub payloads: Vec<PayloadSpec>,
}

/// Arguments for the `size` command.
#[derive(Debug, Args)]
pub struct SizeArgs {
    /// Total portfolio value in USD.
    #[arg(long)]
    pub portfolio_value: f64,

    /// Current share price in USD.
    #[arg(long)]
    pub price: f64,

    /// Target allocation in percent (defaults to the configured value).
    #[arg(long)]
    pub target_pct: Option<f64>,
}

/// Arguments for the `order` command.
#[derive(Debug, Args)]
pub struct OrderArgs {
    /// Recommendation generator response (JSON array of picks).
    #[arg(long, value_name = "PATH")]
    pub picks: PathBuf,

    /// Pick to size; defaults to the first one.
    #[arg(long)]
    pub ticker: Option<String>,

    /// Broker positions listing.
    #[arg(long, value_name = "PATH")]
    pub positions: Option<PathBuf>,

    /// Cash balance in USD.
    #[arg(long, default_value_t = 0.0)]
    pub cash: f64,

    /// Current share price in USD.
    #[arg(long)]
    pub price: f64,

    /// Target allocation in percent (defaults to the configured value).
    #[arg(long)]
    pub target_pct: Option<f64>,

    /// Average daily dollar volume in millions of USD, for the liquidity limit.
    #[arg(long)]
    pub adv_musd: Option<f64>,
}

/// Arguments for the `picks` command.
#[derive(Debug, Args)]
pub struct PicksArgs {
    /// Recommendation generator response (JSON array of picks).
    pub path: PathBuf,
}

/// Arguments for the `evaluate` command.
#[derive(Debug, Args)]
pub struct EvaluateArgs {
    /// Evaluation draft (any unset section takes its empty form).
    pub path: PathBuf,

    /// Provider payload whose normalized fundamentals replace the draft's.
    #[arg(long, value_name = "PATH")]
    pub payload: Option<PathBuf>,
}

/// Arguments for the `review` command.
#[derive(Debug, Args)]
pub struct ReviewArgs {
    /// Broker positions listing.
    #[arg(long, value_name = "PATH")]
    pub positions: PathBuf,

    /// Market snapshots keyed by symbol.
    #[arg(long, value_name = "PATH")]
    pub snapshots: Option<PathBuf>,
}
