//! Configuration structures for the classification pipeline.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::routes::ProviderRoute;

/// Main configuration for fatura.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FaturaConfig {
    /// Classifier configuration.
    pub classifier: ClassifierConfig,

    /// OCR configuration.
    pub ocr: OcrConfig,

    /// PDF rasterization configuration.
    pub pdf: PdfConfig,

    /// OCR provider credentials.
    pub providers: ProvidersConfig,

    /// Supplier route overrides, merged over the built-in table.
    pub routes: BTreeMap<String, ProviderRoute>,
}

/// Classifier configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Directory holding `<supplier>_template.png` reference images.
    pub template_dir: PathBuf,

    /// Optional JSON file replacing the built-in supplier registry.
    pub registry_file: Option<PathBuf>,

    /// DPI for rendering the first page.
    pub render_dpi: u32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            template_dir: PathBuf::from("templates"),
            registry_file: None,
            render_dpi: 200,
        }
    }
}

/// Which OCR engine to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OcrBackend {
    /// The `tesseract` command line tool.
    #[default]
    Tesseract,
    /// PaddleOCR models through pure-onnx-ocr (requires the `onnx` feature).
    Onnx,
}

/// OCR engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Engine to use.
    pub backend: OcrBackend,

    /// Language hint passed to the engine.
    pub language: String,

    /// Tesseract executable.
    pub tesseract_cmd: String,

    /// Directory containing ONNX models (det.onnx, latin_rec.onnx, latin_dict.txt).
    pub model_dir: PathBuf,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            backend: OcrBackend::Tesseract,
            language: "por".to_string(),
            tesseract_cmd: "tesseract".to_string(),
            model_dir: PathBuf::from("models"),
        }
    }
}

/// How PDF pages become images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RasterizerKind {
    /// Render with poppler's `pdftoppm`.
    #[default]
    Pdftoppm,
    /// Decode the scan image embedded in the page.
    Embedded,
}

/// PDF processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Rasterizer to use.
    pub rasterizer: RasterizerKind,

    /// `pdftoppm` executable.
    pub pdftoppm_cmd: String,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            rasterizer: RasterizerKind::Pdftoppm,
            pdftoppm_cmd: "pdftoppm".to_string(),
        }
    }
}

/// Credentials and endpoints of the OCR providers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub parseur: ProviderConfig,
    pub docupipe: ProviderConfig,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            parseur: ProviderConfig {
                api_key: String::new(),
                base_url: "https://api.parseur.com".to_string(),
                timeout_secs: 60,
            },
            docupipe: ProviderConfig {
                api_key: String::new(),
                base_url: "https://app.docupipe.ai".to_string(),
                timeout_secs: 120,
            },
        }
    }
}

/// A single provider endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// API key. Falls back to an environment variable when empty.
    pub api_key: String,

    /// Base URL of the API.
    pub base_url: String,

    /// Upload timeout in seconds.
    pub timeout_secs: u64,
}

impl ProviderConfig {
    /// The configured key, or the value of `env_var` when the key is empty.
    pub fn resolve_api_key(&self, env_var: &str) -> Option<String> {
        if !self.api_key.is_empty() {
            return Some(self.api_key.clone());
        }
        std::env::var(env_var).ok().filter(|v| !v.is_empty())
    }
}

impl FaturaConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}
