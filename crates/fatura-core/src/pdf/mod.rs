//! PDF rasterization.

mod extractor;
mod pdftoppm;

pub use extractor::EmbeddedImageRasterizer;
pub use pdftoppm::PdftoppmRasterizer;

use crate::error::AcquisitionError;
use crate::models::config::{PdfConfig, RasterizerKind};
use image::DynamicImage;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, AcquisitionError>;

/// Turns one page of a PDF into a raster image.
pub trait Rasterizer: Send + Sync {
    /// Render `page` (1-indexed) of `document` at roughly `dpi`.
    fn rasterize(&self, document: &[u8], page: u32, dpi: u32) -> Result<DynamicImage>;
}

impl<T: Rasterizer + ?Sized> Rasterizer for Box<T> {
    fn rasterize(&self, document: &[u8], page: u32, dpi: u32) -> Result<DynamicImage> {
        (**self).rasterize(document, page, dpi)
    }
}

/// Build the rasterizer selected in the configuration.
pub fn create_rasterizer(config: &PdfConfig) -> Box<dyn Rasterizer> {
    match config.rasterizer {
        RasterizerKind::Pdftoppm => Box::new(PdftoppmRasterizer::new(&config.pdftoppm_cmd)),
        RasterizerKind::Embedded => Box::new(EmbeddedImageRasterizer::new()),
    }
}
