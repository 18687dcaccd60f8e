//! Combining supplier evidence into a single decision.

use serde_json::{Map, Value, json};

use super::rules::{KeywordMatch, TaxIdMatch, TemplateMatch};
use crate::models::classification::{ClassificationResult, Method, UNKNOWN_SUPPLIER};

/// Added to the stronger confidence when template and keywords agree.
pub const AGREEMENT_BONUS: f32 = 0.1;

/// Characters of OCR text kept when nothing matched.
pub const TEXT_SAMPLE_CHARS: usize = 500;

/// Outcome of the decision protocol for one document.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    TaxId(TaxIdMatch),
    Template(TemplateMatch),
    Keywords(KeywordMatch),
    /// Template and keywords named the same supplier.
    Hybrid {
        template: TemplateMatch,
        keywords: KeywordMatch,
    },
    Unknown {
        text_sample: String,
    },
    /// The document could not be acquired.
    Error(String),
}

impl Decision {
    pub fn supplier(&self) -> &str {
        match self {
            Decision::TaxId(m) => &m.supplier,
            Decision::Template(m) => &m.supplier,
            Decision::Keywords(m) => &m.supplier,
            Decision::Hybrid { template, .. } => &template.supplier,
            Decision::Unknown { .. } | Decision::Error(_) => UNKNOWN_SUPPLIER,
        }
    }

    /// Hybrid confidence is not clamped and may exceed 1.0.
    pub fn confidence(&self) -> f32 {
        match self {
            Decision::TaxId(m) => m.confidence(),
            Decision::Template(m) => m.confidence(),
            Decision::Keywords(m) => m.confidence(),
            Decision::Hybrid { template, keywords } => {
                template.confidence().max(keywords.confidence()) + AGREEMENT_BONUS
            }
            Decision::Unknown { .. } | Decision::Error(_) => 0.0,
        }
    }

    pub fn method(&self) -> Method {
        match self {
            Decision::TaxId(_) => Method::Nif,
            Decision::Template(_) => Method::Template,
            Decision::Keywords(_) => Method::Keywords,
            Decision::Hybrid { .. } => Method::Hybrid,
            Decision::Unknown { .. } => Method::None,
            Decision::Error(_) => Method::Error,
        }
    }

    pub fn details(&self) -> Map<String, Value> {
        match self {
            Decision::TaxId(m) => m.details(),
            Decision::Template(m) => m.details(),
            Decision::Keywords(m) => m.details(),
            Decision::Hybrid { template, keywords } => {
                let mut details = Map::new();
                details.insert("template".to_string(), Value::Object(template.details()));
                details.insert("keywords".to_string(), Value::Object(keywords.details()));
                details
            }
            Decision::Unknown { text_sample } => {
                let mut details = Map::new();
                details.insert("text_sample".to_string(), json!(text_sample));
                details
            }
            Decision::Error(message) => {
                let mut details = Map::new();
                details.insert("error".to_string(), json!(message));
                details
            }
        }
    }

    /// Convert into the public result, attaching the date and OCR text.
    pub fn into_result(
        self,
        invoice_date: Option<String>,
        ocr_text: impl Into<String>,
    ) -> ClassificationResult {
        ClassificationResult::new(self.supplier(), self.confidence(), self.method(), self.details())
            .with_text(invoice_date, ocr_text)
    }
}

/// Fuse template and keyword evidence.
///
/// Agreement yields [`Decision::Hybrid`]. On disagreement the template wins
/// only with a strictly greater confidence.
pub fn fuse(
    template: Option<TemplateMatch>,
    keywords: Option<KeywordMatch>,
    text: &str,
) -> Decision {
    match (template, keywords) {
        (Some(template), Some(keywords)) if template.supplier == keywords.supplier => {
            Decision::Hybrid { template, keywords }
        }
        (Some(template), Some(keywords)) => {
            if template.confidence() > keywords.confidence() {
                Decision::Template(template)
            } else {
                Decision::Keywords(keywords)
            }
        }
        (Some(template), None) => Decision::Template(template),
        (None, Some(keywords)) => Decision::Keywords(keywords),
        (None, None) => Decision::Unknown {
            text_sample: text.chars().take(TEXT_SAMPLE_CHARS).collect(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn template(supplier: &str, similarity: f32) -> TemplateMatch {
        TemplateMatch {
            supplier: supplier.to_string(),
            similarity,
        }
    }

    fn keywords(supplier: &str, score: f32) -> KeywordMatch {
        KeywordMatch {
            supplier: supplier.to_string(),
            matched_keywords: vec![supplier.to_string()],
            score,
        }
    }

    #[test]
    fn test_agreement_is_hybrid() {
        let decision = fuse(Some(template("lidl", 0.85)), Some(keywords("lidl", 0.5)), "");
        assert_eq!(decision.method(), Method::Hybrid);
        assert_eq!(decision.supplier(), "lidl");
        // keywords confidence 0.7, template 0.85
        assert!((decision.confidence() - 0.95).abs() < 1e-6);

        let details = decision.details();
        assert_eq!(details["template"]["similarity_score"], json!(0.85f32));
        assert_eq!(details["keywords"]["matched_keywords"], json!(["lidl"]));
    }

    #[test]
    fn test_hybrid_not_clamped() {
        let decision = fuse(Some(template("lidl", 0.98)), Some(keywords("lidl", 1.0)), "");
        assert!(decision.confidence() > 1.0);
        assert!(decision.confidence() > 0.98);
        assert!(decision.confidence() > 0.9);
    }

    #[test]
    fn test_disagreement_strictly_greater_template_wins() {
        let decision = fuse(Some(template("auchan", 0.8)), Some(keywords("lidl", 0.5)), "");
        assert_eq!(decision, Decision::Template(template("auchan", 0.8)));
    }

    #[test]
    fn test_disagreement_tie_goes_to_keywords() {
        // a full keyword match is capped at 0.9
        let decision = fuse(Some(template("auchan", 0.9)), Some(keywords("lidl", 1.0)), "");
        assert_eq!(decision.method(), Method::Keywords);
        assert_eq!(decision.supplier(), "lidl");
    }

    #[test]
    fn test_single_evidence() {
        assert_eq!(
            fuse(Some(template("auchan", 0.5)), None, "").method(),
            Method::Template
        );
        assert_eq!(fuse(None, Some(keywords("lidl", 0.3)), "").method(), Method::Keywords);
    }

    #[test]
    fn test_unknown_keeps_text_sample() {
        let text = "é".repeat(600);
        let decision = fuse(None, None, &text);
        assert_eq!(decision.supplier(), UNKNOWN_SUPPLIER);
        assert_eq!(decision.confidence(), 0.0);

        let result = decision.into_result(None, text.clone());
        assert_eq!(result.method, Method::None);
        let sample = result.details["text_sample"].as_str().unwrap();
        assert_eq!(sample.chars().count(), TEXT_SAMPLE_CHARS);
        assert_eq!(result.ocr_text, text);
    }

    #[test]
    fn test_into_result_attaches_date() {
        let result = Decision::Keywords(keywords("novadis", 1.0))
            .into_result(Some("20250210".to_string()), "novadis");
        assert_eq!(result.supplier, "novadis");
        assert_eq!(result.invoice_date.as_deref(), Some("20250210"));
        assert_eq!(result.confidence, 0.9);
    }

    #[test]
    fn test_error_decision() {
        let result = Decision::Error("bad pdf".to_string()).into_result(None, "");
        assert_eq!(result, ClassificationResult::error("bad pdf"));
    }
}
