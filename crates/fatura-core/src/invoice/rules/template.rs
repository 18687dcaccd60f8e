//! Supplier identification by letterhead similarity.

use image::GrayImage;
use serde_json::{Map, Value, json};
use tracing::{trace, warn};

use crate::ocr::preprocessing::{crop_region, fit_to};
use crate::similarity::ssim;
use crate::templates::TemplateSet;

/// Minimum SSIM for a template to count as a match.
pub const MIN_TEMPLATE_SIMILARITY: f32 = 0.4;

/// A supplier identified by its reference letterhead.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateMatch {
    pub supplier: String,
    pub similarity: f32,
}

impl TemplateMatch {
    pub fn confidence(&self) -> f32 {
        self.similarity
    }

    pub fn details(&self) -> Map<String, Value> {
        let mut details = Map::new();
        details.insert("similarity_score".to_string(), json!(self.similarity));
        details
    }
}

/// Compare each supplier's header region of `page` with its template.
///
/// The template is resized to the crop when sizes differ. Ties keep the
/// earlier template; a supplier whose comparison fails is skipped.
pub fn match_by_template(page: &GrayImage, templates: &TemplateSet) -> Option<TemplateMatch> {
    let mut best: Option<TemplateMatch> = None;

    for template in templates.iter() {
        let Some(header) = crop_region(page, &template.region) else {
            warn!(
                "Template matching failed for {}: header region outside the page",
                template.supplier
            );
            continue;
        };

        let reference = fit_to(&template.image, header.width(), header.height());
        let similarity = match ssim(&header, &reference) {
            Ok(score) => score as f32,
            Err(e) => {
                warn!("Template matching failed for {}: {}", template.supplier, e);
                continue;
            }
        };
        trace!("Template {} similarity {:.3}", template.supplier, similarity);

        if similarity > best.as_ref().map_or(0.0, |b| b.similarity) {
            best = Some(TemplateMatch {
                supplier: template.supplier.clone(),
                similarity,
            });
        }
    }

    best.filter(|b| b.similarity >= MIN_TEMPLATE_SIMILARITY)
}
