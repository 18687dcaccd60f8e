//! Classification result returned for every document.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Supplier key used when no supplier could be identified.
pub const UNKNOWN_SUPPLIER: &str = "unknown";

/// How a classification decision was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// Tax ID (NIF) found in the OCR text.
    Nif,
    /// Letterhead image similarity.
    Template,
    /// Keyword patterns in the OCR text.
    Keywords,
    /// Template and keywords agreed.
    Hybrid,
    /// Nothing matched.
    None,
    /// The document could not be rasterized.
    Error,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Nif => "nif",
            Method::Template => "template",
            Method::Keywords => "keywords",
            Method::Hybrid => "hybrid",
            Method::None => "none",
            Method::Error => "error",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of classifying one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Registry key, or [`UNKNOWN_SUPPLIER`].
    pub supplier: String,

    /// Confidence score. Hybrid results may exceed 1.0.
    pub confidence: f32,

    /// Method that produced the decision.
    pub method: Method,

    /// Method-specific diagnostics.
    #[serde(default)]
    pub details: Map<String, Value>,

    /// Issue date as `YYYYMMDD`.
    #[serde(default)]
    pub invoice_date: Option<String>,

    /// Full-page OCR text.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ocr_text: String,
}

impl ClassificationResult {
    pub fn new(
        supplier: impl Into<String>,
        confidence: f32,
        method: Method,
        details: Map<String, Value>,
    ) -> Self {
        Self {
            supplier: supplier.into(),
            confidence,
            method,
            details,
            invoice_date: None,
            ocr_text: String::new(),
        }
    }

    /// Result for a document that could not be acquired.
    pub fn error(message: impl Into<String>) -> Self {
        let mut details = Map::new();
        details.insert("error".to_string(), Value::String(message.into()));
        Self::new(UNKNOWN_SUPPLIER, 0.0, Method::Error, details)
    }

    /// Attach the extracted date and OCR text.
    pub fn with_text(mut self, invoice_date: Option<String>, ocr_text: impl Into<String>) -> Self {
        self.invoice_date = invoice_date;
        self.ocr_text = ocr_text.into();
        self
    }

    /// Whether a supplier was identified.
    pub fn is_known(&self) -> bool {
        self.supplier != UNKNOWN_SUPPLIER
    }

    /// The error message of a failed acquisition, if any.
    pub fn error_message(&self) -> Option<&str> {
        if self.method != Method::Error {
            return None;
        }
        self.details.get("error").and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_result() {
        let result = ClassificationResult::error("corrupt file");
        assert_eq!(result.supplier, UNKNOWN_SUPPLIER);
        assert_eq!(result.method, Method::Error);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.error_message(), Some("corrupt file"));
        assert!(!result.is_known());
    }

    #[test]
    fn test_method_serializes_lowercase() {
        let json = serde_json::to_string(&Method::Hybrid).unwrap();
        assert_eq!(json, "\"hybrid\"");
    }

    #[test]
    fn test_ocr_text_skipped_when_empty() {
        let result = ClassificationResult::new("lidl", 0.7, Method::Keywords, Map::new());
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("ocr_text").is_none());
        assert_eq!(json["method"], "keywords");
    }
}
