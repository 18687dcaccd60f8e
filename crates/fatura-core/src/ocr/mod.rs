//! OCR engines.
//!
//! The classifier only needs "image in, text out". Engines are selected at
//! runtime from [`OcrConfig`], so the trait is object safe.

pub mod preprocessing;
#[cfg(feature = "onnx")]
mod pure_engine;
mod tesseract;

#[cfg(feature = "onnx")]
pub use pure_engine::OnnxOcr;
pub use tesseract::TesseractOcr;

use image::DynamicImage;

use crate::error::OcrError;
use crate::models::config::{OcrBackend, OcrConfig};

/// How the engine should segment the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageLayout {
    /// Automatic page segmentation.
    #[default]
    Auto,
    /// Treat the image as a single uniform block of text.
    SparseBlock,
}

/// Text recognition backend.
pub trait OcrEngine: Send + Sync {
    /// Recognize the text in `image`. `language` is a hint the engine may ignore.
    fn recognize(
        &self,
        image: &DynamicImage,
        language: &str,
        layout: PageLayout,
    ) -> Result<String, OcrError>;
}

impl<T: OcrEngine + ?Sized> OcrEngine for Box<T> {
    fn recognize(
        &self,
        image: &DynamicImage,
        language: &str,
        layout: PageLayout,
    ) -> Result<String, OcrError> {
        (**self).recognize(image, language, layout)
    }
}

/// Build the engine selected in the configuration.
pub fn create_engine(config: &OcrConfig) -> Result<Box<dyn OcrEngine>, OcrError> {
    match config.backend {
        OcrBackend::Tesseract => Ok(Box::new(TesseractOcr::new(&config.tesseract_cmd))),
        #[cfg(feature = "onnx")]
        OcrBackend::Onnx => Ok(Box::new(OnnxOcr::from_dir(&config.model_dir)?)),
        #[cfg(not(feature = "onnx"))]
        OcrBackend::Onnx => Err(OcrError::NotAvailable(
            "fatura was built without the `onnx` feature".to_string(),
        )),
    }
}
