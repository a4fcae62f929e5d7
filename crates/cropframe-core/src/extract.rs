//! Crop region extraction.
//!
//! The surface reports the crop as a [`CropRegion`] in source-bitmap pixels.
//! [`apply_crop`] cuts that region out of an in-memory RGB buffer. Decoding
//! and encoding the buffer is left to the caller.
//!
//! # Coordinate System
//!
//! - (0, 0) = top-left pixel of the source bitmap
//! - `left + width <= bitmap width`, `top + height <= bitmap height`

use crate::error::CropError;
use serde::{Deserialize, Serialize};

/// Crop rectangle in source-bitmap pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRegion {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRegion {
    pub fn new(left: u32, top: u32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Region as `(left, top, width, height)` fractions of the bitmap size.
    pub fn normalized(&self, bitmap_width: u32, bitmap_height: u32) -> (f64, f64, f64, f64) {
        let bw = f64::from(bitmap_width.max(1));
        let bh = f64::from(bitmap_height.max(1));
        (
            f64::from(self.left) / bw,
            f64::from(self.top) / bh,
            f64::from(self.width) / bw,
            f64::from(self.height) / bh,
        )
    }

    /// True when the region has area and lies fully inside the bitmap.
    pub fn fits(&self, bitmap_width: u32, bitmap_height: u32) -> bool {
        self.width > 0
            && self.height > 0
            && self
                .left
                .checked_add(self.width)
                .is_some_and(|r| r <= bitmap_width)
            && self
                .top
                .checked_add(self.height)
                .is_some_and(|b| b <= bitmap_height)
    }
}

/// An RGB8 bitmap in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    /// 3 bytes per pixel, length `width * height * 3`.
    pub pixels: Vec<u8>,
}

impl Bitmap {
    /// Wrap a pixel buffer, checking that its length matches the dimensions.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, CropError> {
        if width == 0 || height == 0 {
            return Err(CropError::InvalidDimensions { width, height });
        }
        let expected = width as usize * height as usize * 3;
        if pixels.len() != expected {
            return Err(CropError::InvalidPixelData {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Create a Bitmap from an image::RgbImage.
    pub fn from_rgb_image(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
        }
    }

    /// Convert to an image::RgbImage for further processing.
    pub fn to_rgb_image(&self) -> Result<image::RgbImage, CropError> {
        image::RgbImage::from_raw(self.width, self.height, self.pixels.clone()).ok_or(
            CropError::InvalidPixelData {
                expected: self.width as usize * self.height as usize * 3,
                actual: self.pixels.len(),
            },
        )
    }
}

/// Cut `region` out of `bitmap`.
///
/// # Errors
///
/// - [`CropError::EmptyRegion`] if the region has no area or extends past the
///   bitmap edges
/// - [`CropError::InvalidPixelData`] if the bitmap buffer is inconsistent
pub fn apply_crop(bitmap: &Bitmap, region: &CropRegion) -> Result<Bitmap, CropError> {
    if !region.fits(bitmap.width, bitmap.height) {
        return Err(CropError::EmptyRegion);
    }

    // Fast path: full crop returns a clone
    if region.left == 0
        && region.top == 0
        && region.width == bitmap.width
        && region.height == bitmap.height
    {
        return Ok(bitmap.clone());
    }

    let source = bitmap.to_rgb_image()?;
    let cropped = image::imageops::crop_imm(
        &source,
        region.left,
        region.top,
        region.width,
        region.height,
    )
    .to_image();

    log::debug!(
        "extracted {}x{} crop at ({}, {})",
        region.width,
        region.height,
        region.left,
        region.top
    );
    Ok(Bitmap::from_rgb_image(cropped))
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn bitmap_and_region() -> impl Strategy<Value = (u32, u32, CropRegion)> {
        (4u32..=60, 4u32..=60).prop_flat_map(|(w, h)| {
            (0..w, 0..h).prop_flat_map(move |(left, top)| {
                (1..=w - left, 1..=h - top).prop_map(move |(cw, ch)| {
                    (w, h, CropRegion::new(left, top, cw, ch))
                })
            })
        })
    }

    fn create_test_bitmap(width: u32, height: u32) -> Bitmap {
        let pixels = (0..width * height)
            .flat_map(|i| {
                let v = (i % 256) as u8;
                [v, v, v]
            })
            .collect();
        Bitmap {
            width,
            height,
            pixels,
        }
    }

    proptest! {
        /// Property: Output has exactly the region's dimensions.
        #[test]
        fn prop_output_matches_region((w, h, region) in bitmap_and_region()) {
            let img = create_test_bitmap(w, h);
            let result = apply_crop(&img, &region).unwrap();

            prop_assert_eq!(result.width, region.width);
            prop_assert_eq!(result.height, region.height);
            prop_assert_eq!(
                result.pixels.len(),
                (region.width * region.height * 3) as usize
            );
        }

        /// Property: The first output pixel is the region's top-left source pixel.
        #[test]
        fn prop_first_pixel_from_region_origin((w, h, region) in bitmap_and_region()) {
            let img = create_test_bitmap(w, h);
            let result = apply_crop(&img, &region).unwrap();

            let expected = ((region.top * w + region.left) % 256) as u8;
            prop_assert_eq!(result.pixels[0], expected);
        }
    }
}
