//! Supplier registry: the immutable catalog of known suppliers.
//!
//! The registry is built once and handed to the classifier. It owns the
//! compiled keyword patterns and the shared tax ID table used when one legal
//! entity issues several document types under the same NIF.

mod builtin;

use std::collections::{HashMap, HashSet};
use std::path::Path;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{FaturaError, RegistryError};
use crate::models::supplier::SupplierProfile;

/// One document type issued under a shared tax ID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxIdVariant {
    /// Supplier key the document is classified as.
    pub supplier: String,

    /// Disambiguating patterns. Empty for the default variant.
    #[serde(default)]
    pub keyword_patterns: Vec<String>,
}

impl TaxIdVariant {
    pub fn new(supplier: impl Into<String>, keyword_patterns: &[&str]) -> Self {
        Self {
            supplier: supplier.into(),
            keyword_patterns: keyword_patterns.iter().map(|p| p.to_string()).collect(),
        }
    }

    pub fn is_default(&self) -> bool {
        self.keyword_patterns.is_empty()
    }
}

/// A tax ID used by several logical document types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedTaxId {
    pub tax_id: String,

    /// Checked in order; the last entry is the keyword-less default.
    pub variants: Vec<TaxIdVariant>,
}

/// Serialized form of a registry (`classifier.registry_file`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryFile {
    pub suppliers: Vec<SupplierProfile>,

    #[serde(default)]
    pub shared_tax_ids: Vec<SharedTaxId>,
}

/// A registry entry with its patterns compiled.
#[derive(Debug)]
pub struct RegisteredSupplier {
    pub profile: SupplierProfile,
    pub keywords: Vec<Regex>,
}

/// A shared tax ID variant with its patterns compiled.
#[derive(Debug)]
pub struct CompiledVariant {
    pub supplier: String,
    pub keywords: Vec<Regex>,
}

impl CompiledVariant {
    pub fn is_default(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Whether the variant applies to `text`. The default always applies.
    pub fn matches(&self, text: &str) -> bool {
        self.is_default() || self.keywords.iter().any(|re| re.is_match(text))
    }
}

/// Immutable supplier catalog.
#[derive(Debug)]
pub struct SupplierRegistry {
    suppliers: Vec<RegisteredSupplier>,
    index: HashMap<String, usize>,
    shared: HashMap<String, Vec<CompiledVariant>>,
    variant_only: HashSet<String>,
}

impl SupplierRegistry {
    /// Build a registry, compiling every pattern.
    ///
    /// Fails on duplicate keys, invalid regexes, or shared tax ID lists that
    /// do not end with exactly one keyword-less default.
    pub fn new(
        profiles: Vec<SupplierProfile>,
        shared_tax_ids: Vec<SharedTaxId>,
    ) -> Result<Self, RegistryError> {
        let mut suppliers = Vec::with_capacity(profiles.len());
        let mut index = HashMap::with_capacity(profiles.len());

        for profile in profiles {
            if index.contains_key(&profile.name) {
                return Err(RegistryError::DuplicateSupplier(profile.name));
            }
            let keywords = compile_patterns(&profile.name, &profile.keyword_patterns)?;
            index.insert(profile.name.clone(), suppliers.len());
            suppliers.push(RegisteredSupplier { profile, keywords });
        }

        let mut shared = HashMap::with_capacity(shared_tax_ids.len());
        let mut variant_only = HashSet::new();

        for entry in shared_tax_ids {
            let defaults = entry.variants.iter().filter(|v| v.is_default()).count();
            if defaults != 1 {
                return Err(RegistryError::SharedTaxId {
                    tax_id: entry.tax_id,
                    reason: format!("expected exactly one default variant, found {defaults}"),
                });
            }
            if !entry.variants.last().is_some_and(TaxIdVariant::is_default) {
                return Err(RegistryError::SharedTaxId {
                    tax_id: entry.tax_id,
                    reason: "the default variant must be checked last".to_string(),
                });
            }

            let mut compiled = Vec::with_capacity(entry.variants.len());
            for variant in entry.variants {
                if !variant.is_default() {
                    variant_only.insert(variant.supplier.clone());
                }
                compiled.push(CompiledVariant {
                    keywords: compile_patterns(&variant.supplier, &variant.keyword_patterns)?,
                    supplier: variant.supplier,
                });
            }
            shared.insert(entry.tax_id, compiled);
        }

        Ok(Self {
            suppliers,
            index,
            shared,
            variant_only,
        })
    }

    /// The built-in Portuguese supplier catalog.
    pub fn builtin() -> Result<Self, RegistryError> {
        Self::new(builtin::suppliers(), builtin::shared_tax_ids())
    }

    /// Load a registry from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, FaturaError> {
        let content = std::fs::read_to_string(path)?;
        let file: RegistryFile = serde_json::from_str(&content)?;
        Ok(Self::new(file.suppliers, file.shared_tax_ids)?)
    }

    /// Suppliers in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &RegisteredSupplier> {
        self.suppliers.iter()
    }

    pub fn get(&self, name: &str) -> Option<&SupplierProfile> {
        self.index.get(name).map(|&i| &self.suppliers[i].profile)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.suppliers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.suppliers.is_empty()
    }

    /// Variants registered for a shared tax ID.
    pub fn shared_variants(&self, tax_id: &str) -> Option<&[CompiledVariant]> {
        self.shared.get(tax_id).map(Vec::as_slice)
    }

    /// Whether `name` is only reachable through a shared tax ID variant.
    ///
    /// Such entries are skipped by the primary tax ID scan.
    pub fn is_variant_only(&self, name: &str) -> bool {
        self.variant_only.contains(name)
    }
}

fn compile_patterns(supplier: &str, patterns: &[String]) -> Result<Vec<Regex>, RegistryError> {
    patterns
        .iter()
        .map(|pattern| {
            RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .map_err(|e| RegistryError::InvalidPattern {
                    supplier: supplier.to_string(),
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry_is_valid() {
        let registry = SupplierRegistry::builtin().unwrap();
        assert!(registry.len() > 60);
        assert!(registry.contains("teofilo"));
        assert!(registry.contains("teofilo_gd"));
        assert!(registry.is_variant_only("teofilo_gd"));
        assert!(registry.is_variant_only("teofilo_nc"));
        assert!(!registry.is_variant_only("teofilo"));

        let variants = registry.shared_variants("500099871").unwrap();
        assert_eq!(variants.len(), 3);
        assert!(variants.last().unwrap().is_default());
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let profiles = vec![
            SupplierProfile::new("lidl", "Lidl", "503340855", &["lidl"]),
            SupplierProfile::new("lidl", "Lidl again", "", &["lidl"]),
        ];
        let err = SupplierRegistry::new(profiles, vec![]).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateSupplier(name) if name == "lidl"));
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let profiles = vec![SupplierProfile::new("bad", "Bad", "", &["(unclosed"])];
        let err = SupplierRegistry::new(profiles, vec![]).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidPattern { .. }));
    }

    #[test]
    fn test_shared_tax_id_needs_single_trailing_default() {
        let no_default = SharedTaxId {
            tax_id: "123456789".to_string(),
            variants: vec![TaxIdVariant::new("a", &["x"])],
        };
        assert!(SupplierRegistry::new(vec![], vec![no_default]).is_err());

        let default_first = SharedTaxId {
            tax_id: "123456789".to_string(),
            variants: vec![TaxIdVariant::new("a", &[]), TaxIdVariant::new("b", &["x"])],
        };
        assert!(SupplierRegistry::new(vec![], vec![default_first]).is_err());

        let two_defaults = SharedTaxId {
            tax_id: "123456789".to_string(),
            variants: vec![TaxIdVariant::new("a", &[]), TaxIdVariant::new("b", &[])],
        };
        assert!(SupplierRegistry::new(vec![], vec![two_defaults]).is_err());
    }

    #[test]
    fn test_patterns_are_case_insensitive() {
        let registry = SupplierRegistry::new(
            vec![SupplierProfile::new("lidl", "Lidl", "", &["www\\.lidl\\.pt"])],
            vec![],
        )
        .unwrap();
        let entry = registry.iter().next().unwrap();
        assert!(entry.keywords[0].is_match("Visite WWW.LIDL.PT"));
    }

    #[test]
    fn test_registry_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registry.json");
        std::fs::write(
            &path,
            r#"{
                "suppliers": [
                    {"name": "acme", "display_name": "ACME Lda", "tax_id": "123456789",
                     "keyword_patterns": ["acme"],
                     "header_region": {"x": 0, "y": 0, "width": 300, "height": 120}}
                ]
            }"#,
        )
        .unwrap();

        let registry = SupplierRegistry::from_file(&path).unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("acme").unwrap().header_region.width, 300);
    }
}
