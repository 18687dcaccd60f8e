//! Building the classifier and its collaborators from configuration.

use std::path::Path;
use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use fatura_core::Classifier;
use fatura_core::models::config::FaturaConfig;
use fatura_core::ocr::create_engine;
use fatura_core::pdf::create_rasterizer;
use fatura_core::registry::SupplierRegistry;
use fatura_core::routes::RouteTable;
use fatura_core::templates::TemplateSet;

/// The configured registry file, or the built-in catalog.
pub fn load_registry(config: &FaturaConfig) -> anyhow::Result<Arc<SupplierRegistry>> {
    let registry = match &config.classifier.registry_file {
        Some(path) => {
            info!("Loading supplier registry from {}", path.display());
            SupplierRegistry::from_file(path)?
        }
        None => SupplierRegistry::builtin()?,
    };
    debug!("Registry holds {} suppliers", registry.len());
    Ok(Arc::new(registry))
}

/// Built-in routes with the config overrides applied.
pub fn route_table(config: &FaturaConfig) -> RouteTable {
    RouteTable::builtin().with_overrides(&config.routes)
}

/// A classifier wired to the configured rasterizer, OCR engine and templates.
pub fn build_classifier(config: &FaturaConfig) -> anyhow::Result<Classifier> {
    let registry = load_registry(config)?;
    let ocr = create_engine(&config.ocr)
        .map_err(|e| anyhow::anyhow!("Failed to initialize OCR engine: {}", e))?;
    let rasterizer = create_rasterizer(&config.pdf);

    let templates = TemplateSet::load(&config.classifier.template_dir, &registry);

    let classifier = Classifier::new(registry, rasterizer, ocr)
        .with_templates(templates)
        .with_dpi(config.classifier.render_dpi)
        .with_language(config.ocr.language.clone());
    info!(
        "Classifier ready: {} suppliers, {} templates from {}",
        classifier.registry().len(),
        classifier.templates().len(),
        config.classifier.template_dir.display()
    );

    Ok(classifier)
}

/// Fail early with a readable message when the input folder is missing.
pub fn ensure_dir(dir: &Path) -> anyhow::Result<()> {
    if !dir.is_dir() {
        anyhow::bail!("Folder not found: {}", dir.display());
    }
    Ok(())
}

/// Per-file progress for batch commands.
pub fn progress_bar(len: usize) -> anyhow::Result<ProgressBar> {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files {msg}")?
            .progress_chars("=>-"),
    );
    Ok(pb)
}
