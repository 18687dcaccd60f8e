//! Supplier identification by keyword patterns.

use serde_json::{Map, Value, json};

use super::FieldExtractor;
use crate::registry::SupplierRegistry;

/// Share of a supplier's patterns that must match.
pub const MIN_KEYWORD_SCORE: f32 = 0.3;

/// A supplier identified by its keyword patterns.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordMatch {
    pub supplier: String,
    /// Patterns that matched, in registry order.
    pub matched_keywords: Vec<String>,
    /// Matched patterns over total patterns.
    pub score: f32,
}

impl KeywordMatch {
    /// 0.5 plus 0.4 per unit of score, capped at 0.9.
    pub fn confidence(&self) -> f32 {
        (0.5 + 0.4 * self.score).min(0.9)
    }

    pub fn details(&self) -> Map<String, Value> {
        let mut details = Map::new();
        details.insert("matched_keywords".to_string(), json!(self.matched_keywords));
        details.insert("score".to_string(), json!(self.score));
        details
    }
}

/// Scores every registered supplier against the text.
pub struct KeywordMatcher<'a> {
    registry: &'a SupplierRegistry,
}

impl<'a> KeywordMatcher<'a> {
    pub fn new(registry: &'a SupplierRegistry) -> Self {
        Self { registry }
    }
}

impl FieldExtractor for KeywordMatcher<'_> {
    type Output = KeywordMatch;

    /// The strictly best scoring supplier, if it reaches [`MIN_KEYWORD_SCORE`].
    ///
    /// Ties keep the earlier supplier.
    fn extract(&self, text: &str) -> Option<Self::Output> {
        let mut best: Option<KeywordMatch> = None;
        for candidate in self.extract_all(text) {
            if best.as_ref().is_none_or(|b| candidate.score > b.score) {
                best = Some(candidate);
            }
        }
        best.filter(|b| b.score >= MIN_KEYWORD_SCORE)
    }

    /// Every supplier with at least one matching pattern, in registry order.
    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        self.registry
            .iter()
            .filter(|entry| !entry.keywords.is_empty())
            .filter_map(|entry| {
                let matched_keywords: Vec<String> = entry
                    .keywords
                    .iter()
                    .filter(|re| re.is_match(text))
                    .map(|re| re.as_str().to_string())
                    .collect();

                if matched_keywords.is_empty() {
                    return None;
                }

                let score = matched_keywords.len() as f32 / entry.keywords.len() as f32;
                Some(KeywordMatch {
                    supplier: entry.profile.name.clone(),
                    matched_keywords,
                    score,
                })
            })
            .collect()
    }
}

/// Identify the supplier whose keyword patterns best cover the text.
pub fn match_by_keywords(text: &str, registry: &SupplierRegistry) -> Option<KeywordMatch> {
    KeywordMatcher::new(registry).extract(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::supplier::SupplierProfile;
    use pretty_assertions::assert_eq;

    fn supplier(name: &str, patterns: &[&str]) -> SupplierProfile {
        SupplierProfile::new(name, name, "", patterns)
    }

    fn registry(profiles: Vec<SupplierProfile>) -> SupplierRegistry {
        SupplierRegistry::new(profiles, vec![]).unwrap()
    }

    #[test]
    fn test_three_of_ten_accepted() {
        let patterns = ["k0", "k1", "k2", "k3", "k4", "k5", "k6", "k7", "k8", "k9"];
        let registry = registry(vec![supplier("acme", &patterns)]);

        let found = match_by_keywords("k0 k1 k2", &registry).unwrap();
        assert_eq!(found.supplier, "acme");
        assert!((found.score - 0.3).abs() < 1e-6);
        assert!((found.confidence() - 0.62).abs() < 1e-6);
    }

    #[test]
    fn test_two_of_seven_rejected() {
        let patterns = ["k0", "k1", "k2", "k3", "k4", "k5", "k6"];
        let registry = registry(vec![supplier("acme", &patterns)]);
        assert_eq!(match_by_keywords("k0 k1", &registry), None);
    }

    #[test]
    fn test_full_match_capped() {
        let registry = registry(vec![supplier("acme", &["acme", "lda"])]);
        let found = match_by_keywords("acme lda", &registry).unwrap();
        assert_eq!(found.score, 1.0);
        assert_eq!(found.confidence(), 0.9);
    }

    #[test]
    fn test_tie_keeps_first_supplier() {
        let registry = registry(vec![
            supplier("first", &["shared", "a"]),
            supplier("second", &["shared", "b"]),
        ]);
        let found = match_by_keywords("shared", &registry).unwrap();
        assert_eq!(found.supplier, "first");
    }

    #[test]
    fn test_higher_score_wins() {
        let registry = registry(vec![
            supplier("first", &["shared", "a", "b"]),
            supplier("second", &["shared", "c"]),
        ]);
        assert_eq!(match_by_keywords("shared", &registry).unwrap().supplier, "second");
    }

    #[test]
    fn test_details() {
        let registry = registry(vec![supplier("lidl", &["lidl", r"www\.lidl\.pt"])]);
        let found = match_by_keywords("LIDL loja", &registry).unwrap();
        let details = found.details();
        assert_eq!(details["matched_keywords"], json!(["lidl"]));
        assert_eq!(details["score"], json!(0.5));
    }

    #[test]
    fn test_builtin_novadis() {
        let registry = SupplierRegistry::builtin().unwrap();
        let text = "novadis alfarrobeira data de emissão: 10/02/2025";
        let found = match_by_keywords(text, &registry).unwrap();
        assert_eq!(found.supplier, "novadis");
        assert_eq!(found.matched_keywords, vec!["novadis", "alfarrobeira"]);
        assert!((found.confidence() - 0.7).abs() < 1e-6);
    }
}
