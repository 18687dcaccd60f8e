//! Error types for the fatura-core library.

use thiserror::Error;

/// Main error type for the fatura library.
#[derive(Error, Debug)]
pub enum FaturaError {
    /// Document acquisition error (unreadable or unsupported PDF).
    #[error("acquisition error: {0}")]
    Acquisition(#[from] AcquisitionError),

    /// OCR processing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Supplier registry error.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Image similarity error.
    #[error("similarity error: {0}")]
    Similarity(#[from] SimilarityError),

    /// Image processing error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid glob pattern while scanning a folder.
    #[error("invalid pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while turning a document into a raster image.
///
/// These are the only failures that end classification of a document.
#[derive(Error, Debug)]
pub enum AcquisitionError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),

    /// The page carries no decodable image.
    #[error("no decodable image on page {0}")]
    NoImage(u32),

    /// An external rendering tool failed or is missing.
    #[error("renderer failed: {0}")]
    Renderer(String),

    /// Reading the rendered output failed.
    #[error("failed to decode rendered page: {0}")]
    Decode(#[from] image::ImageError),

    /// I/O error while staging the document.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to OCR processing.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The OCR engine binary or models are not available.
    #[error("OCR engine not available: {0}")]
    NotAvailable(String),

    /// The OCR engine ran but reported a failure.
    #[error("OCR engine failed: {0}")]
    Engine(String),

    /// Invalid image format or dimensions.
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),
}

/// Errors raised while building the supplier registry.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// A keyword pattern is not a valid regex.
    #[error("invalid pattern {pattern:?} for {supplier}: {reason}")]
    InvalidPattern {
        supplier: String,
        pattern: String,
        reason: String,
    },

    /// Two suppliers share the same key.
    #[error("duplicate supplier key: {0}")]
    DuplicateSupplier(String),

    /// A shared tax ID list does not end with exactly one default variant.
    #[error("shared tax ID {tax_id}: {reason}")]
    SharedTaxId { tax_id: String, reason: String },
}

/// Errors raised by the structural similarity scorer.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SimilarityError {
    /// The two images do not have the same dimensions.
    #[error("dimension mismatch: {left:?} vs {right:?}")]
    DimensionMismatch { left: (u32, u32), right: (u32, u32) },

    /// The images are smaller than the comparison window.
    #[error("image {0:?} smaller than the {1}x{1} window")]
    TooSmall((u32, u32), u32),
}

/// Result type for the fatura library.
pub type Result<T> = std::result::Result<T, FaturaError>;
