//! CLI application for payment receipt OCR processing.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{batch, config, confirm, extract, scan};

/// Payment receipt OCR - Extract reference, date, amount and type from receipts
#[derive(Parser)]
#[command(name = "resit")]
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
    /// Extract fields from recognized receipt text
    Extract(extract::ExtractArgs),

    /// Recognize a receipt image with OCR.space and extract its fields
    Scan(scan::ScanArgs),

    /// Extract fields from many text files
    Batch(batch::BatchArgs),

    /// Validate a reviewed transaction and update campaign counters
    Confirm(confirm::ConfirmArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
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
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Extract(args) => extract::run(args, cli.config.as_deref()).await,
        Commands::Scan(args) => scan::run(args, cli.config.as_deref()).await,
        Commands::Batch(args) => batch::run(args, cli.config.as_deref()).await,
        Commands::Confirm(args) => confirm::run(args, cli.config.as_deref()).await,
        Commands::Config(args) => config::run(args).await,
    }
}
