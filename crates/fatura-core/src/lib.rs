//! Core library for Portuguese invoice classification.
//!
//! This crate provides:
//! - PDF rasterization (poppler or embedded scan images)
//! - OCR through tesseract or, with the `onnx` feature, PaddleOCR models
//! - Supplier identification by tax ID (NIF), letterhead similarity and keywords
//! - Issue date extraction from Portuguese invoice text
//! - Routing of classified documents into review/matched/integrated folders

pub mod error;
pub mod invoice;
pub mod models;
pub mod ocr;
pub mod pdf;
pub mod registry;
pub mod routes;
pub mod routing;
pub mod similarity;
pub mod templates;

pub use error::{FaturaError, Result};
pub use invoice::rules::extract_date;
pub use invoice::{Classifier, Decision};
pub use models::classification::{ClassificationResult, Method, UNKNOWN_SUPPLIER};
pub use models::config::FaturaConfig;
pub use models::supplier::{HeaderRegion, SupplierProfile};
pub use ocr::{OcrEngine, PageLayout, create_engine};
pub use pdf::{Rasterizer, create_rasterizer};
pub use registry::SupplierRegistry;
pub use routes::{Provider, ProviderRoute, RouteTable};
pub use routing::{Bucket, OutputLayout, RoutePlan, plan_route};
pub use templates::{TemplateSet, generate_templates};
