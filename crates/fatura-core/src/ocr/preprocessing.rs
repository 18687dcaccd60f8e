//! Page image helpers shared by OCR and template matching.

use image::imageops::{self, FilterType};
use image::GrayImage;

use crate::models::supplier::HeaderRegion;

/// Share of the page height scanned for a header date.
const DATE_HEADER_HEIGHT: f32 = 0.4;

/// Share of the page width, from the left, skipped when scanning for a header date.
const DATE_HEADER_LEFT: f32 = 0.5;

/// Crop `region` out of `page`, clipped to the page bounds.
///
/// Returns `None` when nothing of the region lies on the page.
pub fn crop_region(page: &GrayImage, region: &HeaderRegion) -> Option<GrayImage> {
    let (width, height) = page.dimensions();
    if region.x >= width || region.y >= height {
        return None;
    }

    let crop_width = region.width.min(width - region.x);
    let crop_height = region.height.min(height - region.y);
    if crop_width == 0 || crop_height == 0 {
        return None;
    }

    Some(imageops::crop_imm(page, region.x, region.y, crop_width, crop_height).to_image())
}

/// Top-right area of an invoice where the issue date usually sits.
pub fn date_header_region(page: &GrayImage) -> GrayImage {
    let (width, height) = page.dimensions();
    let x = (width as f32 * DATE_HEADER_LEFT) as u32;
    let crop_height = (height as f32 * DATE_HEADER_HEIGHT) as u32;
    imageops::crop_imm(page, x, 0, width - x, crop_height).to_image()
}

/// Resize `image` to exactly `width` x `height` unless it already matches.
pub fn fit_to(image: &GrayImage, width: u32, height: u32) -> GrayImage {
    if image.dimensions() == (width, height) {
        return image.clone();
    }
    imageops::resize(image, width, height, FilterType::Triangle)
}
