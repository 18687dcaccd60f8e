//! Pure Rust OCR engine using `pure-onnx-ocr` and PaddleOCR latin models.

use std::path::Path;
use std::time::Instant;

use image::DynamicImage;
use tracing::{debug, info};

use super::{OcrEngine, PageLayout};
use crate::error::OcrError;

/// OCR engine backed by `pure-onnx-ocr` (no external ONNX Runtime).
///
/// The models are multilingual, so the language hint is ignored. Layout
/// hints are ignored too: detection always runs on the whole image.
pub struct OnnxOcr {
    engine: pure_onnx_ocr::engine::OcrEngine,
}

impl OnnxOcr {
    /// Load `det.onnx`, `latin_rec.onnx` and `latin_dict.txt` from a directory.
    pub fn from_dir(model_dir: &Path) -> Result<Self, OcrError> {
        let det_path = model_dir.join("det.onnx");
        let rec_path = model_dir.join("latin_rec.onnx");
        let dict_path = model_dir.join("latin_dict.txt");

        for path in [&det_path, &rec_path, &dict_path] {
            if !path.exists() {
                return Err(OcrError::NotAvailable(format!(
                    "missing model file {}",
                    path.display()
                )));
            }
        }

        let engine = pure_onnx_ocr::engine::OcrEngineBuilder::new()
            .det_model_path(&det_path)
            .rec_model_path(&rec_path)
            .dictionary_path(&dict_path)
            .build()
            .map_err(|e| OcrError::ModelLoad(format!("pure-onnx-ocr: {}", e)))?;

        info!("Loaded pure-onnx-ocr engine from {}", model_dir.display());
        Ok(Self { engine })
    }
}

impl OcrEngine for OnnxOcr {
    fn recognize(
        &self,
        image: &DynamicImage,
        _language: &str,
        _layout: PageLayout,
    ) -> Result<String, OcrError> {
        let start = Instant::now();

        let results = self
            .engine
            .run_from_image(image)
            .map_err(|e| OcrError::Engine(format!("pure-onnx-ocr: {}", e)))?;

        let mut lines: Vec<((f64, f64), String)> = results
            .iter()
            .map(|r| (top_left(&r.bounding_box), r.text.replace("[UNK]", " ")))
            .collect();

        // Reading order: 20px rows, then left to right
        lines.sort_by(|((ax, ay), _), ((bx, by), _)| {
            let row_a = (ay / 20.0) as i64;
            let row_b = (by / 20.0) as i64;
            row_a
                .cmp(&row_b)
                .then(ax.partial_cmp(bx).unwrap_or(std::cmp::Ordering::Equal))
        });

        debug!(
            "pure-onnx-ocr returned {} text regions in {}ms",
            lines.len(),
            start.elapsed().as_millis()
        );

        Ok(lines
            .into_iter()
            .map(|(_, text)| text)
            .collect::<Vec<_>>()
            .join("\n"))
    }
}

fn top_left(polygon: &pure_onnx_ocr::Polygon<f64>) -> (f64, f64) {
    polygon
        .exterior()
        .coords()
        .take(4)
        .fold((f64::INFINITY, f64::INFINITY), |(x, y), c| (x.min(c.x), y.min(c.y)))
}
