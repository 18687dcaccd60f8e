//! Templates command - build reference letterheads from sample invoices.

use std::path::PathBuf;

use clap::Args;
use console::style;

use fatura_core::pdf::create_rasterizer;
use fatura_core::templates::generate_templates;

use super::config::load_config;
use super::pipeline::{ensure_dir, load_registry};

/// Arguments for the templates command.
#[derive(Args)]
pub struct TemplatesArgs {
    /// Folder of sample PDFs, named after their supplier key
    #[arg(default_value = "invoices_example")]
    samples: PathBuf,

    /// Output directory (default: classifier.template_dir)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub async fn run(args: TemplatesArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    ensure_dir(&args.samples)?;

    let output = args
        .output
        .unwrap_or_else(|| config.classifier.template_dir.clone());
    let registry = load_registry(&config)?;
    let rasterizer = create_rasterizer(&config.pdf);

    println!(
        "{} Generating templates from {} into {}",
        style("ℹ").blue(),
        args.samples.display(),
        output.display()
    );

    let report = generate_templates(
        &args.samples,
        &output,
        &registry,
        &rasterizer,
        config.classifier.render_dpi,
    )?;

    for (supplier, sample) in &report.generated {
        println!("  {} {} ({})", style("✓").green(), supplier, sample);
    }
    for (supplier, reason) in &report.failed {
        println!("  {} {}: {}", style("✗").red(), supplier, reason);
    }

    println!();
    println!(
        "{} {} generated, {} failed, {} without samples",
        style("✓").green(),
        report.generated.len(),
        report.failed.len(),
        report.missing.len()
    );

    Ok(())
}
