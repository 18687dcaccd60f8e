//! Page rasterization from the scan image embedded in a PDF, using lopdf.
//!
//! Scanner output is usually one full-page image per page, so decoding that
//! image gives the page without a rendering engine. The requested DPI is
//! ignored: the image is returned at its native resolution.

use std::collections::HashSet;

use image::{DynamicImage, GrayImage, RgbImage};
use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, trace};

use super::{Rasterizer, Result};
use crate::error::AcquisitionError;

/// Rasterizer that decodes the largest image drawn on a page.
#[derive(Debug, Clone, Default)]
pub struct EmbeddedImageRasterizer;

impl EmbeddedImageRasterizer {
    pub fn new() -> Self {
        Self
    }

    fn load(&self, data: &[u8]) -> Result<Document> {
        let mut doc = Document::load_mem(data).map_err(|e| AcquisitionError::Parse(e.to_string()))?;

        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(AcquisitionError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");
        }

        if doc.get_pages().is_empty() {
            return Err(AcquisitionError::NoPages);
        }
        Ok(doc)
    }

    /// Decode every image XObject referenced by a page.
    fn page_images(&self, doc: &Document, page_id: ObjectId) -> Vec<DynamicImage> {
        let Some(resources) = page_resources(doc, page_id) else {
            return Vec::new();
        };
        let Ok(xobjects) = resources.get(b"XObject") else {
            return Vec::new();
        };
        let Ok((_, Object::Dictionary(xobjects))) = doc.dereference(xobjects) else {
            return Vec::new();
        };

        xobjects
            .iter()
            .filter_map(|(_, reference)| doc.dereference(reference).ok())
            .filter_map(|(_, object)| decode_image(doc, object))
            .collect()
    }
}

impl Rasterizer for EmbeddedImageRasterizer {
    fn rasterize(&self, document: &[u8], page: u32, _dpi: u32) -> Result<DynamicImage> {
        let doc = self.load(document)?;
        let pages = doc.get_pages();
        let page_id = *pages.get(&page).ok_or(AcquisitionError::InvalidPage(page))?;

        let images = self.page_images(&doc, page_id);
        debug!("Found {} images on page {}", images.len(), page);

        images
            .into_iter()
            .max_by_key(|img| u64::from(img.width()) * u64::from(img.height()))
            .ok_or(AcquisitionError::NoImage(page))
    }
}

fn decode_image(doc: &Document, object: &Object) -> Option<DynamicImage> {
    let Object::Stream(stream) = object else {
        return None;
    };
    let dict = &stream.dict;

    if dict.get(b"Subtype").ok()?.as_name().ok()? != b"Image" {
        return None;
    }

    let width = u32::try_from(dict.get(b"Width").ok()?.as_i64().ok()?).ok()?;
    let height = u32::try_from(dict.get(b"Height").ok()?.as_i64().ok()?).ok()?;
    trace!("Found image object: {}x{}", width, height);

    if let Ok(filter) = dict.get(b"Filter") {
        let filter_name = match filter {
            Object::Name(name) => Some(name.as_slice()),
            Object::Array(arr) => arr.first().and_then(|o| o.as_name().ok()),
            _ => None,
        };

        match filter_name {
            Some(b"DCTDecode") => {
                let jpeg = image::ImageFormat::Jpeg;
                return image::load_from_memory_with_format(&stream.content, jpeg).ok();
            }
            Some(b"JPXDecode") | Some(b"CCITTFaxDecode") | Some(b"JBIG2Decode") => {
                trace!("Unsupported image filter");
                return None;
            }
            _ => {}
        }
    }

    let data = stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone());

    let color_space = dict
        .get(b"ColorSpace")
        .ok()
        .and_then(|o| match o {
            Object::Name(name) => Some(name.as_slice()),
            Object::Array(arr) => arr.first().and_then(|o| o.as_name().ok()),
            Object::Reference(r) => doc.get_object(*r).ok().and_then(|o| o.as_name().ok()),
            _ => None,
        })
        .unwrap_or(b"DeviceRGB");

    let bits = dict
        .get(b"BitsPerComponent")
        .ok()
        .and_then(|o| o.as_i64().ok())
        .unwrap_or(8);

    if bits != 8 {
        trace!("Unsupported bits per component: {}", bits);
        return None;
    }

    raw_to_image(data, width, height, color_space)
}

fn raw_to_image(
    mut data: Vec<u8>,
    width: u32,
    height: u32,
    color_space: &[u8],
) -> Option<DynamicImage> {
    let pixels = (width as usize).checked_mul(height as usize)?;

    match color_space {
        b"DeviceRGB" | b"RGB" => {
            data.truncate(pixels.checked_mul(3)?);
            RgbImage::from_raw(width, height, data).map(DynamicImage::ImageRgb8)
        }
        b"DeviceGray" | b"G" => {
            data.truncate(pixels);
            GrayImage::from_raw(width, height, data).map(DynamicImage::ImageLuma8)
        }
        _ => {
            trace!("Unsupported color space {:?}", String::from_utf8_lossy(color_space));
            None
        }
    }
}

/// Resources of a page, following `Parent` links for inherited entries.
///
/// Each node is visited at most once, so a `Parent` cycle ends the walk.
fn page_resources(doc: &Document, page_id: ObjectId) -> Option<Dictionary> {
    let mut visited = HashSet::new();
    let mut node_id = page_id;

    while visited.insert(node_id) {
        let Ok(Object::Dictionary(dict)) = doc.get_object(node_id) else {
            return None;
        };

        if let Ok(resources) = dict.get(b"Resources") {
            if let Ok((_, Object::Dictionary(res_dict))) = doc.dereference(resources) {
                return Some(res_dict.clone());
            }
        }

        match dict.get(b"Parent") {
            Ok(Object::Reference(parent_id)) => node_id = *parent_id,
            _ => return None,
        }
    }

    debug!("Parent cycle at object {:?}", node_id);
    None
}
