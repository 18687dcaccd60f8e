//! Process command - classify, rename, move and optionally upload invoices.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Datelike;
use clap::Args;
use console::style;
use tracing::{debug, error, info, warn};

use fatura_core::invoice::list_pdfs;
use fatura_core::routing::{Bucket, OutputLayout, plan_route};
use fatura_core::{ClassificationResult, Method};

use super::config::load_config;
use super::pipeline::{build_classifier, ensure_dir, progress_bar, route_table};
use crate::upload::{UploadOutcome, Uploader};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Folder containing the PDF invoices
    #[arg(default_value = "invoices_example")]
    folder: PathBuf,

    /// Show what would happen without moving files
    #[arg(long)]
    dry_run: bool,

    /// Upload INTEGRATED invoices to their OCR provider
    #[arg(long)]
    upload: bool,

    /// Directory for INTEGRATED/, MATCHED/ and REVIEW/ (default: the input folder)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Write summary.csv next to the output folders
    #[arg(long)]
    summary: bool,
}

/// What happened to one file.
#[derive(Debug)]
struct FileRecord {
    original: String,
    result: ClassificationResult,
    bucket: Bucket,
    new_name: String,
    destination: PathBuf,
    upload: Option<UploadOutcome>,
    error: Option<String>,
}

/// Aggregate counts of a run.
#[derive(Debug, Default, PartialEq, Eq)]
struct ProcessStats {
    processed: usize,
    integrated: usize,
    matched: usize,
    review: usize,
    errors: usize,
    uploaded: usize,
    upload_failed: usize,
}

impl ProcessStats {
    /// A failed move counts as an error only. Documents that could not be
    /// classified were moved to REVIEW and count there.
    fn record(&mut self, record: &FileRecord) {
        self.processed += 1;

        if record.error.is_some() {
            self.errors += 1;
        } else {
            match record.bucket {
                Bucket::Integrated => self.integrated += 1,
                Bucket::Matched => self.matched += 1,
                Bucket::Review => self.review += 1,
            }
        }

        if let Some(upload) = &record.upload {
            if upload.success {
                self.uploaded += 1;
            } else {
                self.upload_failed += 1;
            }
        }
    }
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;
    ensure_dir(&args.folder)?;

    let files = list_pdfs(&args.folder)?;
    if files.is_empty() {
        anyhow::bail!("No PDF files found in {}", args.folder.display());
    }

    let output_root = args.output_dir.clone().unwrap_or_else(|| args.folder.clone());
    let layout = OutputLayout::under(&output_root);
    if !args.dry_run {
        layout.create_all()?;
    }

    let routes = route_table(&config);
    let uploader = if args.upload && !args.dry_run {
        let uploader = Uploader::from_config(&config, routes.clone())?;
        let missing = uploader.missing_keys();
        if !missing.is_empty() {
            let names: Vec<String> = missing
                .iter()
                .map(|p| format!("{} ({})", p, p.api_key_env()))
                .collect();
            println!(
                "{} API keys not configured: {}. Uploads to these providers will fail.",
                style("⚠").yellow(),
                names.join(", ")
            );
        }
        Some(uploader)
    } else {
        None
    };

    let classifier = build_classifier(&config)?;

    let mut mode = String::new();
    if args.dry_run {
        mode.push_str(" (DRY RUN)");
    }
    if args.upload {
        mode.push_str(" + UPLOAD");
    }
    println!(
        "{} Processing {} files from {}{}",
        style("ℹ").blue(),
        files.len(),
        args.folder.display(),
        mode
    );

    let current_year = chrono::Local::now().year();
    let mut planned: HashSet<PathBuf> = HashSet::new();
    let mut records = Vec::with_capacity(files.len());
    let mut stats = ProcessStats::default();

    let pb = progress_bar(files.len())?;
    for path in &files {
        let original = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        pb.set_message(original.clone());

        let result = classifier.classify_file(path);
        let plan = plan_route(&original, &result, &routes, &layout, current_year, |p| {
            p.exists() || planned.contains(p)
        });
        planned.insert(plan.destination.clone());

        let mut record = FileRecord {
            original: original.clone(),
            result,
            bucket: plan.bucket,
            new_name: plan.file_name.clone(),
            destination: plan.destination.clone(),
            upload: None,
            error: None,
        };

        if args.dry_run {
            info!("[DRY RUN] {} -> {}/{}", original, plan.bucket, plan.file_name);
            if args.upload && plan.bucket == Bucket::Integrated {
                info!("[DRY RUN] Would upload for supplier {}", record.result.supplier);
            }
        } else if let Err(e) = move_file(path, &plan.destination) {
            error!("Error processing {}: {}", original, e);
            record.error = Some(e.to_string());
        } else {
            info!("{} -> {}/{}", original, plan.bucket, plan.file_name);
            if let (Some(uploader), Bucket::Integrated) = (&uploader, plan.bucket) {
                let outcome = uploader.upload(&plan.destination, &record.result.supplier).await;
                record.upload = Some(outcome);
            }
        }

        stats.record(&record);
        records.push(record);
        pb.inc(1);
    }
    pb.finish_and_clear();

    print_records(&records, args.dry_run);

    if args.summary {
        let summary_path = output_root.join("summary.csv");
        if args.dry_run {
            info!("[DRY RUN] Not writing {}", summary_path.display());
        } else {
            write_summary(&summary_path, &records)?;
            println!(
                "{} Summary written to {}",
                style("✓").green(),
                summary_path.display()
            );
        }
    }

    print_stats(&stats, args.upload);
    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        stats.processed,
        start.elapsed()
    );
    if args.dry_run {
        println!(
            "{} [DRY RUN] No files were moved. Run without --dry-run to process.",
            style("ℹ").blue()
        );
    }

    Ok(())
}

/// Rename, falling back to copy and delete across filesystems.
fn move_file(from: &Path, to: &Path) -> std::io::Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) => {
            debug!("rename failed ({}), copying instead", e);
            fs::copy(from, to)?;
            fs::remove_file(from)
        }
    }
}

fn print_records(records: &[FileRecord], dry_run: bool) {
    for record in records {
        if let Some(e) = &record.error {
            println!("  {} {}: {}", style("✗").red(), record.original, e);
            continue;
        }

        let marker = match record.result.method {
            Method::Error => style("✗").red(),
            _ if dry_run => style("→").blue(),
            _ => style("✓").green(),
        };
        println!(
            "  {} {} -> {}/{} ({}, {:.2}, {})",
            marker,
            record.original,
            record.bucket,
            record.new_name,
            record.result.supplier,
            record.result.confidence,
            record.result.method
        );

        if let Some(upload) = &record.upload {
            if upload.success {
                println!(
                    "      {} uploaded to {} ({})",
                    style("✓").green(),
                    upload.provider.map(|p| p.as_str()).unwrap_or("?"),
                    upload.remote_id.as_deref().unwrap_or("?")
                );
            } else {
                warn!("Upload failed for {}: {}", record.original, upload.message);
                println!("      {} upload failed: {}", style("✗").red(), upload.message);
            }
        }
    }
}

fn print_stats(stats: &ProcessStats, upload: bool) {
    println!();
    println!("{}", style("PROCESSING SUMMARY").bold());
    println!("Total processed: {}", stats.processed);
    println!("Integrated (-> INTEGRATED/): {}", stats.integrated);
    println!("Matched (-> MATCHED/): {}", stats.matched);
    println!("For review (-> REVIEW/): {}", stats.review);
    println!("Errors: {}", stats.errors);
    if upload {
        println!("Uploaded to API: {}", stats.uploaded);
        if stats.upload_failed > 0 {
            println!("Upload failed: {}", style(stats.upload_failed).red());
        }
    }
}

fn write_summary(path: &Path, records: &[FileRecord]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "new_name",
        "action",
        "supplier",
        "method",
        "confidence",
        "invoice_date",
        "destination",
        "upload",
        "error",
    ])?;

    for record in records {
        let action = match &record.error {
            Some(_) => "ERROR",
            None => record.bucket.as_str(),
        };
        let upload = match &record.upload {
            Some(outcome) if outcome.success => "uploaded".to_string(),
            Some(outcome) => format!("failed: {}", outcome.message),
            None => String::new(),
        };
        let error = record
            .error
            .clone()
            .or_else(|| record.result.error_message().map(str::to_string))
            .unwrap_or_default();

        wtr.write_record([
            record.original.as_str(),
            record.new_name.as_str(),
            action,
            record.result.supplier.as_str(),
            record.result.method.as_str(),
            &format!("{:.2}", record.result.confidence),
            record.result.invoice_date.as_deref().unwrap_or(""),
            &record.destination.display().to_string(),
            &upload,
            &error,
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
