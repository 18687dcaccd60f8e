//! Supplier classification of scanned invoices.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use image::DynamicImage;
use tracing::{debug, error, info, warn};

use super::fusion::{Decision, fuse};
use super::rules::{extract_date, match_by_keywords, match_by_tax_id, match_by_template};
use crate::error::Result;
use crate::models::classification::ClassificationResult;
use crate::ocr::preprocessing::date_header_region;
use crate::ocr::{OcrEngine, PageLayout};
use crate::pdf::Rasterizer;
use crate::registry::SupplierRegistry;
use crate::templates::TemplateSet;

/// Default rendering resolution.
pub const DEFAULT_DPI: u32 = 200;

/// Default OCR language hint.
pub const DEFAULT_LANGUAGE: &str = "por";

/// A tax ID match at or above this confidence ends the protocol.
pub const TAX_ID_SHORT_CIRCUIT: f32 = 0.9;

/// Identifies the supplier and issue date of scanned invoices.
///
/// The classifier holds no per-document state; one instance can classify
/// any number of documents.
pub struct Classifier<R = Box<dyn Rasterizer>, O = Box<dyn OcrEngine>> {
    registry: Arc<SupplierRegistry>,
    templates: TemplateSet,
    rasterizer: R,
    ocr: O,
    dpi: u32,
    language: String,
}

impl<R: Rasterizer, O: OcrEngine> Classifier<R, O> {
    /// Create a classifier without reference templates.
    pub fn new(registry: Arc<SupplierRegistry>, rasterizer: R, ocr: O) -> Self {
        Self {
            registry,
            templates: TemplateSet::new(),
            rasterizer,
            ocr,
            dpi: DEFAULT_DPI,
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }

    pub fn with_templates(mut self, templates: TemplateSet) -> Self {
        self.templates = templates;
        self
    }

    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn registry(&self) -> &SupplierRegistry {
        &self.registry
    }

    pub fn templates(&self) -> &TemplateSet {
        &self.templates
    }

    /// Classify a PDF given as bytes.
    ///
    /// Only a rasterization failure produces a `method=error` result. OCR
    /// failures degrade to empty text.
    pub fn classify(&self, document: &[u8]) -> ClassificationResult {
        let start = Instant::now();

        let page = match self.rasterizer.rasterize(document, 1, self.dpi) {
            Ok(page) => page,
            Err(e) => {
                error!("Failed to rasterize document: {}", e);
                return Decision::Error(e.to_string()).into_result(None, "");
            }
        };
        let gray = page.to_luma8();

        let text = self.recognize(&page, PageLayout::Auto).to_lowercase();
        debug!("OCR produced {} characters", text.chars().count());

        let invoice_date = extract_date(&text).or_else(|| {
            debug!("No date in full page text, trying header region");
            let header = DynamicImage::ImageLuma8(date_header_region(&gray));
            extract_date(&self.recognize(&header, PageLayout::SparseBlock))
        });
        debug!("Invoice date: {:?}", invoice_date);

        let decision = match match_by_tax_id(&text, &self.registry) {
            Some(found) if found.confidence() >= TAX_ID_SHORT_CIRCUIT => Decision::TaxId(found),
            _ => {
                let template = match_by_template(&gray, &self.templates);
                let keywords = match_by_keywords(&text, &self.registry);
                debug!("Template evidence: {:?}", template);
                debug!("Keyword evidence: {:?}", keywords);
                fuse(template, keywords, &text)
            }
        };

        info!(
            "Classified as {} via {} ({:.2}) in {:?}",
            decision.supplier(),
            decision.method(),
            decision.confidence(),
            start.elapsed()
        );

        decision.into_result(invoice_date, text)
    }

    /// Classify a PDF on disk. An unreadable file yields an error result.
    pub fn classify_file(&self, path: &Path) -> ClassificationResult {
        match std::fs::read(path) {
            Ok(document) => self.classify(&document),
            Err(e) => {
                error!("Failed to read {}: {}", path.display(), e);
                ClassificationResult::error(format!("failed to read {}: {}", path.display(), e))
            }
        }
    }

    /// Classify every PDF in `dir`, keyed by file name.
    pub fn classify_batch(&self, dir: &Path) -> Result<BTreeMap<String, ClassificationResult>> {
        let mut results = BTreeMap::new();
        for path in list_pdfs(dir)? {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            info!("Classifying {}", name);
            results.insert(name, self.classify_file(&path));
        }
        Ok(results)
    }

    fn recognize(&self, image: &DynamicImage, layout: PageLayout) -> String {
        match self.ocr.recognize(image, &self.language, layout) {
            Ok(text) => text,
            Err(e) => {
                warn!("OCR failed ({:?} layout): {}", layout, e);
                String::new()
            }
        }
    }
}

/// The `*.pdf` and `*.PDF` files directly inside `dir`, sorted by name.
pub fn list_pdfs(dir: &Path) -> Result<Vec<PathBuf>> {
    let base = glob::Pattern::escape(&dir.to_string_lossy());
    let mut files = Vec::new();
    for pattern in ["*.pdf", "*.PDF"] {
        for path in glob::glob(&format!("{base}/{pattern}"))?.filter_map(|r| r.ok()) {
            if path.is_file() && !files.contains(&path) {
                files.push(path);
            }
        }
    }
    files.sort();
    Ok(files)
}
