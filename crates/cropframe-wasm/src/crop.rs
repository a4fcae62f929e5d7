//! WASM bindings for crop extraction.
//!
//! The surface reports the crop in source-bitmap pixels; this module cuts that
//! region out of a `JsBitmap` for export.

use crate::types::JsBitmap;
use cropframe_core::extract::{apply_crop as core_crop, CropRegion};
use cropframe_core::CropError;
use wasm_bindgen::prelude::*;

/// Crop a region from an image using pixel coordinates.
///
/// # Arguments
///
/// * `image` - Source image to crop
/// * `left`, `top` - Top-left corner of the region
/// * `width`, `height` - Region size in pixels
///
/// # Errors
///
/// Returns an error if the region is empty or extends past the image.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const region = surface.crop_region();
/// const cropped = apply_crop(sourceImage, region.left, region.top, region.width, region.height);
/// ```
#[wasm_bindgen]
pub fn apply_crop(
    image: &JsBitmap,
    left: u32,
    top: u32,
    width: u32,
    height: u32,
) -> Result<JsBitmap, JsValue> {
    crop_bitmap(image, &CropRegion::new(left, top, width, height))
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

pub(crate) fn crop_bitmap(image: &JsBitmap, region: &CropRegion) -> Result<JsBitmap, CropError> {
    core_crop(image.bitmap(), region).map(JsBitmap::from)
}
