//! Rule-based evidence extractors for Portuguese invoices.

pub mod dates;
pub mod keywords;
pub mod patterns;
pub mod tax_id;
pub mod template;

pub use dates::{extract_date, DateExtractor, DateGrammar};
pub use keywords::{match_by_keywords, KeywordMatch, KeywordMatcher};
pub use tax_id::{match_by_tax_id, TaxIdMatch, TaxIdMatcher};
pub use template::{match_by_template, TemplateMatch};

/// Trait for text field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the best candidate from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract every candidate.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// An extracted value with its confidence and origin.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Confidence score (0.0 - 1.0).
    pub confidence: f32,
    /// Byte span in the source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, confidence: f32, source: impl Into<String>) -> Self {
        Self {
            value,
            confidence,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}
