//! Supplier and date classification of invoices.

mod classifier;
pub mod fusion;
pub mod rules;

pub use classifier::{Classifier, DEFAULT_DPI, DEFAULT_LANGUAGE, TAX_ID_SHORT_CIRCUIT, list_pdfs};
pub use fusion::{Decision, fuse};
