//! Supplier profiles as stored in the registry.

use serde::{Deserialize, Serialize};

/// Pixel rectangle on a rendered page that holds a supplier's letterhead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl HeaderRegion {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

impl Default for HeaderRegion {
    /// Top-left area of a page rendered at 200 DPI.
    fn default() -> Self {
        Self::new(0, 0, 800, 300)
    }
}

/// A known supplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierProfile {
    /// Unique registry key (also used for template and route lookup).
    pub name: String,

    /// Human-readable company name.
    pub display_name: String,

    /// Portuguese tax number (NIF). Empty or all zeros when unreliable.
    #[serde(default)]
    pub tax_id: String,

    /// Case-insensitive regex patterns identifying the supplier in OCR text.
    #[serde(default)]
    pub keyword_patterns: Vec<String>,

    /// Letterhead area used for template matching.
    #[serde(default)]
    pub header_region: HeaderRegion,
}

impl SupplierProfile {
    pub fn new(
        name: impl Into<String>,
        display_name: impl Into<String>,
        tax_id: impl Into<String>,
        keyword_patterns: &[&str],
    ) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            tax_id: tax_id.into(),
            keyword_patterns: keyword_patterns.iter().map(|p| p.to_string()).collect(),
            header_region: HeaderRegion::default(),
        }
    }

    pub fn with_header_region(mut self, region: HeaderRegion) -> Self {
        self.header_region = region;
        self
    }

    /// Whether the tax ID can be used as a fingerprint.
    ///
    /// Placeholders made only of zeros are treated like a missing ID.
    pub fn has_reliable_tax_id(&self) -> bool {
        self.tax_id.chars().count() >= 9 && !self.tax_id.chars().all(|c| c == '0')
    }

    /// Textual forms a tax ID takes on printed invoices:
    /// `501496912`, `501 496 912`, `pt501496912`, `pt 501496912`.
    pub fn tax_id_forms(&self) -> [String; 4] {
        let id = self.tax_id.to_lowercase();
        let chars: Vec<char> = id.chars().collect();
        let spaced = chars
            .chunks(3)
            .map(|group| group.iter().collect::<String>())
            .collect::<Vec<_>>()
            .join(" ");

        [id.clone(), spaced, format!("pt{id}"), format!("pt {id}")]
    }
}
