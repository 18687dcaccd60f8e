//! Page rendering through poppler's `pdftoppm`.

use image::DynamicImage;
use std::process::Command;
use tracing::debug;

use super::{Rasterizer, Result};
use crate::error::AcquisitionError;

/// Rasterizer that shells out to `pdftoppm`.
#[derive(Debug, Clone)]
pub struct PdftoppmRasterizer {
    command: String,
}

impl PdftoppmRasterizer {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl Default for PdftoppmRasterizer {
    fn default() -> Self {
        Self::new("pdftoppm")
    }
}

impl Rasterizer for PdftoppmRasterizer {
    fn rasterize(&self, document: &[u8], page: u32, dpi: u32) -> Result<DynamicImage> {
        if page == 0 {
            return Err(AcquisitionError::InvalidPage(page));
        }

        let work_dir = tempfile::tempdir()?;
        let input = work_dir.path().join("input.pdf");
        std::fs::write(&input, document)?;
        let prefix = work_dir.path().join("page");

        let output = Command::new(&self.command)
            .arg("-png")
            .arg("-r")
            .arg(dpi.to_string())
            .arg("-f")
            .arg(page.to_string())
            .arg("-l")
            .arg(page.to_string())
            .arg("-singlefile")
            .arg(&input)
            .arg(&prefix)
            .output()
            .map_err(|e| {
                AcquisitionError::Renderer(format!(
                    "failed to invoke {}: {e}; is poppler-utils installed?",
                    self.command
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AcquisitionError::Renderer(format!(
                "{} failed with {}: {}",
                self.command,
                output.status,
                stderr.trim()
            )));
        }

        // -singlefile writes `<prefix>.png`
        let rendered = prefix.with_extension("png");
        if !rendered.exists() {
            return Err(AcquisitionError::InvalidPage(page));
        }

        let image = image::open(&rendered)?;
        debug!(
            "Rendered page {} at {} DPI: {}x{}",
            page,
            dpi,
            image.width(),
            image.height()
        );
        Ok(image)
    }
}
