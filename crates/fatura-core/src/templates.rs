//! Reference letterhead templates.
//!
//! Templates live in a directory as `<supplier>_template.png`, one per
//! registry entry. They are produced from sample invoices with
//! [`generate_templates`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use image::GrayImage;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::error::{FaturaError, Result};
use crate::models::supplier::HeaderRegion;
use crate::ocr::preprocessing::crop_region;
use crate::pdf::Rasterizer;
use crate::registry::SupplierRegistry;

/// A supplier's reference letterhead.
#[derive(Debug, Clone)]
pub struct ReferenceTemplate {
    pub supplier: String,
    /// Region of the page compared against `image`.
    pub region: HeaderRegion,
    pub image: GrayImage,
}

/// Loaded templates, in registry order.
#[derive(Debug, Clone, Default)]
pub struct TemplateSet {
    templates: Vec<ReferenceTemplate>,
}

impl TemplateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every `<supplier>_template.png` found in `dir`.
    ///
    /// A missing directory yields an empty set. Unreadable images are skipped.
    pub fn load(dir: &Path, registry: &SupplierRegistry) -> Self {
        let mut set = Self::new();
        if !dir.is_dir() {
            debug!("Template directory {} not found", dir.display());
            return set;
        }

        for entry in registry.iter() {
            let path = template_path(dir, &entry.profile.name);
            if !path.exists() {
                continue;
            }
            match image::open(&path) {
                Ok(image) => {
                    set.insert(&entry.profile.name, entry.profile.header_region, image.to_luma8());
                    info!("Loaded template for {}", entry.profile.name);
                }
                Err(e) => warn!("Skipping unreadable template {}: {}", path.display(), e),
            }
        }

        set
    }

    pub fn insert(&mut self, supplier: &str, region: HeaderRegion, image: GrayImage) {
        self.templates.push(ReferenceTemplate {
            supplier: supplier.to_string(),
            region,
            image,
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReferenceTemplate> {
        self.templates.iter()
    }

    pub fn contains(&self, supplier: &str) -> bool {
        self.templates.iter().any(|t| t.supplier == supplier)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// Path of a supplier's template inside `dir`.
pub fn template_path(dir: &Path, supplier: &str) -> PathBuf {
    dir.join(format!("{supplier}_template.png"))
}

/// Outcome of a template generation run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TemplateReport {
    /// Suppliers whose template was written, with the sample used.
    pub generated: BTreeMap<String, String>,
    /// Suppliers without any sample.
    pub missing: Vec<String>,
    /// Suppliers whose sample could not be processed, with the reason.
    pub failed: BTreeMap<String, String>,
}

/// Build templates from sample PDFs.
///
/// A sample belongs to the first supplier (registry order) whose key appears
/// in its lowercased file name. The first sample by name is rendered; its
/// header crop is saved as `<supplier>_template.png` and the full page as
/// `<supplier>_full.png`.
pub fn generate_templates<R: Rasterizer + ?Sized>(
    samples_dir: &Path,
    output_dir: &Path,
    registry: &SupplierRegistry,
    rasterizer: &R,
    dpi: u32,
) -> Result<TemplateReport> {
    std::fs::create_dir_all(output_dir)?;

    let mut samples: Vec<PathBuf> = std::fs::read_dir(samples_dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
        })
        .collect();
    samples.sort();

    let mut by_supplier: BTreeMap<&str, &Path> = BTreeMap::new();
    for sample in &samples {
        let file_name = sample
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if let Some(entry) = registry.iter().find(|e| file_name.contains(&e.profile.name)) {
            by_supplier.entry(&entry.profile.name).or_insert(sample);
        }
    }

    let mut report = TemplateReport::default();
    for entry in registry.iter() {
        let name = entry.profile.name.as_str();
        let Some(sample) = by_supplier.get(name) else {
            warn!("No samples found for {}", name);
            report.missing.push(name.to_string());
            continue;
        };

        info!("Generating template for {} from {}", name, sample.display());
        let region = &entry.profile.header_region;
        match write_template(sample, output_dir, name, region, rasterizer, dpi) {
            Ok(()) => {
                report
                    .generated
                    .insert(name.to_string(), sample.display().to_string());
            }
            Err(e) => {
                error!("Failed to generate template for {}: {}", name, e);
                report.failed.insert(name.to_string(), e.to_string());
            }
        }
    }

    Ok(report)
}

fn write_template<R: Rasterizer + ?Sized>(
    sample: &Path,
    output_dir: &Path,
    supplier: &str,
    region: &HeaderRegion,
    rasterizer: &R,
    dpi: u32,
) -> Result<()> {
    let document = std::fs::read(sample)?;
    let page = rasterizer.rasterize(&document, 1, dpi)?;
    let gray = page.to_luma8();

    let header = crop_region(&gray, region).ok_or_else(|| {
        FaturaError::Config(format!(
            "header region {region:?} lies outside the {}x{} page",
            gray.width(),
            gray.height()
        ))
    })?;

    let template = template_path(output_dir, supplier);
    header.save(&template)?;
    info!("Saved template: {}", template.display());

    page.save(output_dir.join(format!("{supplier}_full.png")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AcquisitionError;
    use crate::models::supplier::SupplierProfile;
    use image::{DynamicImage, Luma};

    struct BlankPages;

    impl Rasterizer for BlankPages {
        fn rasterize(
            &self,
            document: &[u8],
            _page: u32,
            _dpi: u32,
        ) -> std::result::Result<DynamicImage, AcquisitionError> {
            if document.starts_with(b"broken") {
                return Err(AcquisitionError::Parse("broken sample".to_string()));
            }
            Ok(DynamicImage::ImageLuma8(GrayImage::from_pixel(500, 400, Luma([200]))))
        }
    }

    fn registry() -> SupplierRegistry {
        SupplierRegistry::new(
            vec![
                SupplierProfile::new("acme", "ACME", "", &["acme"])
                    .with_header_region(HeaderRegion::new(0, 0, 100, 50)),
                SupplierProfile::new("globex", "Globex", "", &["globex"]),
                SupplierProfile::new("initech", "Initech", "", &["initech"]),
            ],
            vec![],
        )
        .unwrap()
    }

    #[test]
    fn test_generate_and_load_templates() {
        let samples = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        std::fs::write(samples.path().join("ACME_2025_01.pdf"), b"%PDF").unwrap();
        std::fs::write(samples.path().join("acme_2025_02.pdf"), b"%PDF").unwrap();
        std::fs::write(samples.path().join("initech.PDF"), b"broken").unwrap();
        std::fs::write(samples.path().join("notes.txt"), b"acme").unwrap();

        let registry = registry();
        let report =
            generate_templates(samples.path(), output.path(), &registry, &BlankPages, 200).unwrap();

        assert_eq!(report.generated.len(), 1);
        assert!(report.generated["acme"].ends_with("ACME_2025_01.pdf"));
        assert_eq!(report.missing, vec!["globex".to_string()]);
        assert!(report.failed.contains_key("initech"));

        let template = image::open(template_path(output.path(), "acme")).unwrap();
        assert_eq!((template.width(), template.height()), (100, 50));
        assert!(output.path().join("acme_full.png").exists());

        let loaded = TemplateSet::load(output.path(), &registry);
        assert_eq!(loaded.len(), 1);
        assert!(loaded.contains("acme"));
        let acme = loaded.iter().next().unwrap();
        assert_eq!(acme.region, HeaderRegion::new(0, 0, 100, 50));
    }

    #[test]
    fn test_load_missing_dir() {
        let set = TemplateSet::load(Path::new("/nonexistent/fatura/templates"), &registry());
        assert!(set.is_empty());
    }
}
