//! OCR through the `tesseract` command line tool.

use image::DynamicImage;
use std::process::Command;
use tracing::{debug, warn};

use super::{OcrEngine, PageLayout};
use crate::error::OcrError;

/// Engine that shells out to `tesseract <image> stdout`.
#[derive(Debug, Clone)]
pub struct TesseractOcr {
    command: String,
}

impl TesseractOcr {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    fn run(
        &self,
        input: &std::path::Path,
        language: Option<&str>,
        layout: PageLayout,
    ) -> Result<String, OcrError> {
        let mut command = Command::new(&self.command);
        command.arg(input).arg("stdout");
        if let Some(language) = language {
            command.arg("-l").arg(language);
        }
        command.arg("--psm").arg(psm(layout));

        let output = command.output().map_err(|e| {
            OcrError::NotAvailable(format!("failed to invoke {}: {e}", self.command))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::Engine(stderr.trim().to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for TesseractOcr {
    fn default() -> Self {
        Self::new("tesseract")
    }
}

impl OcrEngine for TesseractOcr {
    fn recognize(
        &self,
        image: &DynamicImage,
        language: &str,
        layout: PageLayout,
    ) -> Result<String, OcrError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(OcrError::InvalidImage("empty image".to_string()));
        }

        let work_dir = tempfile::tempdir()
            .map_err(|e| OcrError::Engine(format!("failed to create temp dir: {e}")))?;
        let input = work_dir.path().join("page.png");
        image
            .save(&input)
            .map_err(|e| OcrError::InvalidImage(e.to_string()))?;

        let language = (!language.is_empty()).then_some(language);
        let text = match self.run(&input, language, layout) {
            Ok(text) => text,
            // Missing language data: retry with the default model
            Err(OcrError::Engine(reason)) if language.is_some() => {
                warn!("tesseract failed with -l {:?} ({}), retrying without", language, reason);
                self.run(&input, None, layout)?
            }
            Err(e) => return Err(e),
        };

        debug!("tesseract returned {} chars", text.len());
        Ok(text)
    }
}

fn psm(layout: PageLayout) -> &'static str {
    match layout {
        PageLayout::Auto => "3",
        PageLayout::SparseBlock => "6",
    }
}
