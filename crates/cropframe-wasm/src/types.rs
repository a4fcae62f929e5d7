//! WASM-compatible wrapper types for bitmap data.
//!
//! This module provides JavaScript-friendly types that wrap the core cropframe
//! types, handling the conversion between Rust and JavaScript data
//! representations.

use cropframe_core::{Bitmap, CropError, PointerAction, PointerOutcome};
use wasm_bindgen::prelude::*;

/// Validated RGB8 bitmap owned by WASM memory.
///
/// Built once from the host's pixel buffer and handed to `apply_crop` or
/// `JsCropSurface::crop` without further copies.
#[wasm_bindgen]
pub struct JsBitmap {
    inner: Bitmap,
}

#[wasm_bindgen]
impl JsBitmap {
    /// Wrap `pixels` (3 bytes per pixel, row-major).
    ///
    /// # Errors
    /// Returns error if either dimension is zero or the buffer length is not
    /// `width * height * 3`
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<JsBitmap, JsValue> {
        Self::try_new(width, height, pixels).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Copy of the pixel buffer for `ImageData`.
    pub fn pixels(&self) -> Vec<u8> {
        self.inner.pixels.clone()
    }
}

impl JsBitmap {
    pub(crate) fn try_new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, CropError> {
        Bitmap::new(width, height, pixels).map(Self::from)
    }

    pub(crate) fn bitmap(&self) -> &Bitmap {
        &self.inner
    }
}

impl From<Bitmap> for JsBitmap {
    fn from(inner: Bitmap) -> Self {
        Self { inner }
    }
}

/// Result of a pointer event, as seen from JavaScript.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy)]
pub struct JsPointerOutcome {
    redraw: bool,
    frame_width: Option<f64>,
    frame_height: Option<f64>,
}

#[wasm_bindgen]
impl JsPointerOutcome {
    /// Whether the host should redraw.
    #[wasm_bindgen(getter)]
    pub fn redraw(&self) -> bool {
        self.redraw
    }

    /// Whether a handle drag changed the crop frame size.
    #[wasm_bindgen(getter)]
    pub fn frame_resized(&self) -> bool {
        self.frame_width.is_some()
    }

    /// New frame width, if resized.
    #[wasm_bindgen(getter)]
    pub fn frame_width(&self) -> Option<f64> {
        self.frame_width
    }

    /// New frame height, if resized.
    #[wasm_bindgen(getter)]
    pub fn frame_height(&self) -> Option<f64> {
        self.frame_height
    }
}

impl From<PointerOutcome> for JsPointerOutcome {
    fn from(outcome: PointerOutcome) -> Self {
        Self {
            redraw: outcome.redraw,
            frame_width: outcome.frame_resized.map(|s| s.width),
            frame_height: outcome.frame_resized.map(|s| s.height),
        }
    }
}

/// Convert a u8 action code to the core PointerAction enum.
///
/// Values:
/// - 0 = Down (first pointer)
/// - 1 = Move
/// - 2 = Up (last pointer)
/// - 3 = PointerUp (secondary pointer)
/// - 4 = Cancel
/// - 5 = PointerDown (secondary pointer)
///
/// Any other value is rejected.
pub(crate) fn action_from_u8(value: u8) -> Option<PointerAction> {
    match value {
        0 => Some(PointerAction::Down),
        1 => Some(PointerAction::Move),
        2 => Some(PointerAction::Up),
        3 => Some(PointerAction::PointerUp),
        4 => Some(PointerAction::Cancel),
        5 => Some(PointerAction::PointerDown),
        _ => None,
    }
}
