//! CLI application for classifying and routing Portuguese invoices.

mod commands;
mod upload;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{classify, config, process, status, templates};

/// Portuguese invoice classifier - identify suppliers, dates and route scanned invoices
#[derive(Parser)]
#[command(name = "fatura")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify every PDF in a folder and print a report
    Classify(classify::ClassifyArgs),

    /// Classify, rename and move PDFs into INTEGRATED/, MATCHED/ and REVIEW/
    Process(process::ProcessArgs),

    /// Generate reference letterhead templates from sample invoices
    Templates(templates::TemplatesArgs),

    /// Query the status of a Docupipe job
    JobStatus(status::JobStatusArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

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

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Classify(args) => classify::run(args, config_path).await,
        Commands::Process(args) => process::run(args, config_path).await,
        Commands::Templates(args) => templates::run(args, config_path).await,
        Commands::JobStatus(args) => status::run(args, config_path).await,
        Commands::Config(args) => config::run(args, config_path).await,
    }
}
