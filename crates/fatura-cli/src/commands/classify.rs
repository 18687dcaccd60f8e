//! Classify command - report suppliers and dates without touching files.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;

use fatura_core::ClassificationResult;
use fatura_core::invoice::list_pdfs;

use super::config::load_config;
use super::pipeline::{build_classifier, ensure_dir, progress_bar};

/// Files listed per supplier in the report.
const SHOWN_PER_SUPPLIER: usize = 5;

/// Arguments for the classify command.
#[derive(Args)]
pub struct ClassifyArgs {
    /// Folder containing the PDF invoices
    #[arg(default_value = "invoices_example")]
    folder: PathBuf,

    /// Print the full results as JSON instead of the report
    #[arg(long)]
    json: bool,
}

pub async fn run(args: ClassifyArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;
    ensure_dir(&args.folder)?;

    let files = list_pdfs(&args.folder)?;
    if files.is_empty() {
        anyhow::bail!("No PDF files found in {}", args.folder.display());
    }

    let classifier = build_classifier(&config)?;

    let pb = progress_bar(files.len())?;
    let mut results = BTreeMap::new();
    for path in &files {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        pb.set_message(name.clone());
        results.insert(name, classifier.classify_file(path));
        pb.inc(1);
    }
    pb.finish_and_clear();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    print_report(&results);
    println!();
    println!(
        "{} Classified {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "{} Run 'fatura process {}' to rename and move files.",
        style("ℹ").blue(),
        args.folder.display()
    );

    Ok(())
}

/// Group results by supplier, sorted by supplier then file name.
fn group_by_supplier(
    results: &BTreeMap<String, ClassificationResult>,
) -> BTreeMap<&str, Vec<(&str, &ClassificationResult)>> {
    let mut groups: BTreeMap<&str, Vec<(&str, &ClassificationResult)>> = BTreeMap::new();
    for (name, result) in results {
        groups
            .entry(result.supplier.as_str())
            .or_default()
            .push((name.as_str(), result));
    }
    groups
}

/// Counts shown under "SUMMARY".
#[derive(Debug, Default, PartialEq, Eq)]
struct Summary {
    total: usize,
    classified: usize,
    with_date: usize,
}

impl Summary {
    fn of(results: &BTreeMap<String, ClassificationResult>) -> Self {
        Self {
            total: results.len(),
            classified: results.values().filter(|r| r.is_known()).count(),
            with_date: results.values().filter(|r| r.invoice_date.is_some()).count(),
        }
    }

    fn unknown(&self) -> usize {
        self.total - self.classified
    }
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

fn print_report(results: &BTreeMap<String, ClassificationResult>) {
    println!("{}", style("INVOICE CLASSIFICATION RESULTS").bold());

    for (supplier, items) in group_by_supplier(results) {
        println!();
        println!(
            "{} ({} invoices)",
            style(supplier.to_uppercase()).cyan().bold(),
            items.len()
        );
        for (name, result) in items.iter().take(SHOWN_PER_SUPPLIER) {
            println!(
                "  {}: {:.2} ({}) [{}]",
                name,
                result.confidence,
                result.method,
                result.invoice_date.as_deref().unwrap_or("no date")
            );
        }
        if items.len() > SHOWN_PER_SUPPLIER {
            println!("  ... and {} more", items.len() - SHOWN_PER_SUPPLIER);
        }
    }

    let summary = Summary::of(results);
    println!();
    println!("{}", style("SUMMARY").bold());
    println!("Total invoices: {}", summary.total);
    println!(
        "Classified: {} ({:.1}%)",
        summary.classified,
        percent(summary.classified, summary.total)
    );
    println!(
        "With date extracted: {} ({:.1}%)",
        summary.with_date,
        percent(summary.with_date, summary.total)
    );
    println!("Unknown: {}", summary.unknown());
}
