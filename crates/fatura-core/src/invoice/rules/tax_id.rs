//! Supplier identification by Portuguese tax number (NIF).

use serde_json::{Map, Value, json};

use super::FieldExtractor;
use crate::registry::SupplierRegistry;

/// A supplier identified by its tax ID.
#[derive(Debug, Clone, PartialEq)]
pub struct TaxIdMatch {
    pub supplier: String,
    /// The registry tax ID found in the text.
    pub tax_id: String,
    /// Variant chosen by keyword for a shared tax ID.
    pub special_type: Option<String>,
}

impl TaxIdMatch {
    /// A printed tax ID is close to conclusive.
    pub const CONFIDENCE: f32 = 0.95;

    pub fn confidence(&self) -> f32 {
        Self::CONFIDENCE
    }

    pub fn details(&self) -> Map<String, Value> {
        let mut details = Map::new();
        details.insert("matched_nif".to_string(), json!(self.tax_id));
        if let Some(special_type) = &self.special_type {
            details.insert("special_type".to_string(), json!(special_type));
        }
        details
    }
}

/// Scans text for the tax ID of every registered supplier.
pub struct TaxIdMatcher<'a> {
    registry: &'a SupplierRegistry,
}

impl<'a> TaxIdMatcher<'a> {
    pub fn new(registry: &'a SupplierRegistry) -> Self {
        Self { registry }
    }

    /// Resolve a hit on `tax_id` for `supplier`, honouring shared tax IDs.
    fn resolve(&self, supplier: &str, tax_id: &str, text: &str) -> TaxIdMatch {
        let variant = self
            .registry
            .shared_variants(tax_id)
            .and_then(|variants| variants.iter().find(|v| v.matches(text)));

        match variant {
            Some(variant) => TaxIdMatch {
                supplier: variant.supplier.clone(),
                tax_id: tax_id.to_string(),
                special_type: (!variant.is_default()).then(|| variant.supplier.clone()),
            },
            None => TaxIdMatch {
                supplier: supplier.to_string(),
                tax_id: tax_id.to_string(),
                special_type: None,
            },
        }
    }
}

impl FieldExtractor for TaxIdMatcher<'_> {
    type Output = TaxIdMatch;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    /// One match per supplier whose tax ID appears, in registry order.
    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let text = text.to_lowercase();

        self.registry
            .iter()
            .map(|entry| &entry.profile)
            .filter(|profile| !self.registry.is_variant_only(&profile.name))
            .filter(|profile| profile.has_reliable_tax_id())
            .filter(|profile| {
                profile
                    .tax_id_forms()
                    .iter()
                    .any(|form| text.contains(form.as_str()))
            })
            .map(|profile| self.resolve(&profile.name, &profile.tax_id, &text))
            .collect()
    }
}

/// Identify the supplier whose tax ID appears first in registry order.
pub fn match_by_tax_id(text: &str, registry: &SupplierRegistry) -> Option<TaxIdMatch> {
    TaxIdMatcher::new(registry).extract(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn registry() -> SupplierRegistry {
        SupplierRegistry::builtin().unwrap()
    }

    #[test]
    fn test_plain_tax_id() {
        let found = match_by_tax_id("contribuinte 501496912", &registry()).unwrap();
        assert_eq!(found.supplier, "soares");
        assert_eq!(found.confidence(), 0.95);
        assert_eq!(found.details()["matched_nif"], "501496912");
    }

    #[test]
    fn test_tax_id_surface_forms() {
        let registry = registry();
        for text in ["nif: 501 496 912", "pt501496912", "NIF PT 501496912"] {
            let found = match_by_tax_id(text, &registry).unwrap();
            assert_eq!(found.supplier, "soares", "text: {text}");
        }
    }

    #[test]
    fn test_tax_id_beats_keyword_content() {
        // Text full of Lidl keywords but carrying the Soares tax ID
        let text = "lidl www.lidl.pt nif 501496912";
        assert_eq!(match_by_tax_id(text, &registry()).unwrap().supplier, "soares");
    }

    #[test]
    fn test_shared_tax_id_variants() {
        let registry = registry();

        let found = match_by_tax_id("nif 500099871 guia de devolução", &registry).unwrap();
        assert_eq!(found.supplier, "teofilo_gd");
        assert_eq!(found.special_type.as_deref(), Some("teofilo_gd"));
        assert_eq!(found.details()["special_type"], "teofilo_gd");

        let found = match_by_tax_id("nif 500099871 nota de crédito", &registry).unwrap();
        assert_eq!(found.supplier, "teofilo_nc");

        let found = match_by_tax_id("nif 500099871 fatura", &registry).unwrap();
        assert_eq!(found.supplier, "teofilo");
        assert_eq!(found.special_type, None);
        assert!(!found.details().contains_key("special_type"));
    }

    #[test]
    fn test_placeholder_tax_id_never_matches() {
        assert_eq!(match_by_tax_id("000000000 kiabi", &registry()), None);
    }

    #[test]
    fn test_no_tax_id() {
        assert_eq!(match_by_tax_id("fatura simplificada", &registry()), None);
    }
}
