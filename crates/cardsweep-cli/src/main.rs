//! CLI for scanning document corpora for payment-card numbers.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{rules, scan};

/// Scan documents for payment-card numbers and validate them
#[derive(Parser)]
#[command(name = "cardsweep")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan document files for card numbers
    Scan(scan::ScanArgs),

    /// Compile, inspect and cache the rule table
    Rules(rules::RulesArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Scan(args) => scan::run(args, cli.config.as_deref()),
        Commands::Rules(args) => rules::run(args, cli.config.as_deref()),
    }
}
