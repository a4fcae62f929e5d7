//! Crop surface WASM bindings.
//!
//! `JsCropSurface` wraps the core touch state machine. The host forwards
//! pointer events, gesture detector output and `requestAnimationFrame`
//! timestamps, then reads back the transform to draw with.
//!
//! # Example (TypeScript)
//!
//! ```typescript
//! const surface = new JsCropSurface({ viewportRatio: 1.0 });
//! surface.reset_for(image.width, image.height, canvas.width, canvas.height);
//!
//! // 0 for the first pointer, 5 for any further pointer
//! canvas.onpointerdown = (e) =>
//!   surface.on_pointer(e.isPrimary ? 0 : 5, e.offsetX, e.offsetY);
//!
//! function frame(now: number) {
//!   if (surface.tick(now)) draw();
//!   requestAnimationFrame(frame);
//! }
//!
//! function draw() {
//!   const [a, b, c, d, e, f] = surface.matrix();
//!   ctx.setTransform(a, b, c, d, e, f);
//!   ctx.drawImage(bitmap, 0, 0);
//! }
//! ```

use crate::crop::crop_bitmap;
use crate::types::{action_from_u8, JsBitmap, JsPointerOutcome};
use cropframe_core::{
    next_aspect_ratio_preset, CropConfig, CropError, CropSurface, GestureEvent, PointerEvent,
    Rect, ASPECT_RATIO_LABELS, ASPECT_RATIO_PRESETS,
};
use wasm_bindgen::prelude::*;

/// JavaScript-accessible crop surface.
#[wasm_bindgen]
pub struct JsCropSurface {
    inner: CropSurface,
    preset_index: usize,
}

fn rect_values(rect: Rect) -> [f64; 4] {
    [rect.left, rect.top, rect.right, rect.bottom]
}

/// Index of the preset matching `ratio`, or the native preset.
fn preset_index_for(ratio: f64) -> usize {
    ASPECT_RATIO_PRESETS
        .iter()
        .position(|&r| r == ratio)
        .unwrap_or(0)
}

fn to_js_error(e: CropError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen]
impl JsCropSurface {
    /// Create a surface from an optional config object.
    ///
    /// # Arguments
    /// * `config` - `{ viewportRatio?, maxScale, minFrameWidth, ... }`; missing
    ///   fields take their defaults, `undefined` uses all defaults
    ///
    /// # Errors
    /// Returns error if the config cannot be deserialized or is out of range
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<JsCropSurface, JsValue> {
        let config: CropConfig = if config.is_undefined() || config.is_null() {
            CropConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Invalid crop config: {}", e)))?
        };
        Self::from_config(config).map_err(to_js_error)
    }

    /// Load a new bitmap (or lay out for the first time).
    pub fn reset_for(&mut self, bitmap_width: f64, bitmap_height: f64, width: f64, height: f64) {
        self.inner.reset_for(bitmap_width, bitmap_height, width, height);
    }

    /// React to a canvas resize.
    pub fn change_for(&mut self, bitmap_width: f64, bitmap_height: f64, width: f64, height: f64) {
        self.inner.change_for(bitmap_width, bitmap_height, width, height);
    }

    /// Forward a raw pointer event.
    ///
    /// # Arguments
    /// * `action` - 0 = down, 1 = move, 2 = up, 3 = secondary pointer up,
    ///   4 = cancel, 5 = secondary pointer down
    ///
    /// # Errors
    /// Returns error for an unknown action code
    pub fn on_pointer(&mut self, action: u8, x: f64, y: f64) -> Result<JsPointerOutcome, JsValue> {
        let action = action_from_u8(action)
            .ok_or_else(|| JsValue::from_str(&format!("Unknown pointer action: {}", action)))?;
        Ok(self.inner.on_pointer(PointerEvent::new(action, x, y)).into())
    }

    /// Scroll detector output: distance travelled since the last event.
    pub fn scroll(&mut self, distance_x: f64, distance_y: f64, pointer_count: u32) -> bool {
        self.inner.on_gesture(GestureEvent::Scroll {
            distance_x,
            distance_y,
            pointer_count,
        })
    }

    /// Pinch detector output: scale factor since the previous step.
    pub fn scale_by(&mut self, factor: f64) -> bool {
        self.inner.on_gesture(GestureEvent::Scale { factor })
    }

    /// Fling detector output: release velocity in pixels per second.
    pub fn fling(&mut self, velocity_x: f64, velocity_y: f64) -> bool {
        self.inner.on_gesture(GestureEvent::Fling {
            velocity_x,
            velocity_y,
        })
    }

    /// Double-tap detector output.
    pub fn double_tap(&mut self, x: f64, y: f64) -> bool {
        self.inner.on_gesture(GestureEvent::DoubleTap { x, y })
    }

    /// Advance animations; returns true if the host should redraw.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        self.inner.tick(now_ms)
    }

    pub fn cancel_animation(&mut self) {
        self.inner.cancel_animation();
    }

    #[wasm_bindgen(getter)]
    pub fn is_animating(&self) -> bool {
        self.inner.is_animating()
    }

    #[wasm_bindgen(getter)]
    pub fn is_loaded(&self) -> bool {
        self.inner.is_loaded()
    }

    /// Bitmap-to-canvas transform in `setTransform(a, b, c, d, e, f)` order.
    pub fn matrix(&self) -> js_sys::Float64Array {
        js_sys::Float64Array::from(&self.matrix_values()[..])
    }

    /// Crop frame as `[left, top, right, bottom]` in canvas coordinates.
    pub fn frame_rect(&self) -> Vec<f64> {
        rect_values(self.inner.frame_rect()).to_vec()
    }

    /// Viewport as `[left, top, right, bottom]` in canvas coordinates.
    pub fn viewport_rect(&self) -> Vec<f64> {
        rect_values(self.inner.viewport_rect()).to_vec()
    }

    #[wasm_bindgen(getter)]
    pub fn scale(&self) -> f64 {
        self.inner.scale()
    }

    #[wasm_bindgen(getter)]
    pub fn minimum_scale(&self) -> f64 {
        self.inner.minimum_scale()
    }

    #[wasm_bindgen(getter)]
    pub fn position_x(&self) -> f64 {
        self.inner.position().x
    }

    #[wasm_bindgen(getter)]
    pub fn position_y(&self) -> f64 {
        self.inner.position().y
    }

    pub fn set_min_frame_rect(&mut self) {
        self.inner.set_min_frame_rect();
    }

    pub fn set_max_frame_rect(&mut self) {
        self.inner.set_max_frame_rect();
    }

    #[wasm_bindgen(getter)]
    pub fn aspect_ratio(&self) -> f64 {
        self.inner.aspect_ratio()
    }

    /// Set the viewport ratio directly (0 = native bitmap ratio).
    pub fn set_aspect_ratio(&mut self, ratio: f64) {
        self.inner.set_aspect_ratio(ratio);
        self.preset_index = preset_index_for(self.inner.aspect_ratio());
    }

    /// Switch to the next aspect ratio preset and return its label.
    pub fn next_aspect_ratio(&mut self) -> String {
        self.preset_index = next_aspect_ratio_preset(self.preset_index);
        self.inner.set_aspect_ratio(ASPECT_RATIO_PRESETS[self.preset_index]);
        ASPECT_RATIO_LABELS[self.preset_index].to_string()
    }

    /// Label of the current aspect ratio preset.
    #[wasm_bindgen(getter)]
    pub fn aspect_ratio_label(&self) -> String {
        ASPECT_RATIO_LABELS[self.preset_index].to_string()
    }

    /// Crop region in source pixels as `{ left, top, width, height }`.
    ///
    /// # Errors
    /// Returns error if no bitmap is loaded
    pub fn crop_region(&self) -> Result<JsValue, JsValue> {
        let region = self
            .inner
            .crop_region()
            .ok_or_else(|| to_js_error(CropError::NotLoaded))?;
        serde_wasm_bindgen::to_value(&region).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Cut the current crop region out of `image`.
    ///
    /// # Errors
    /// Returns error if no bitmap is loaded or the region falls outside `image`
    pub fn crop(&self, image: &JsBitmap) -> Result<JsBitmap, JsValue> {
        self.crop_image(image).map_err(to_js_error)
    }
}

impl JsCropSurface {
    pub(crate) fn from_config(config: CropConfig) -> Result<Self, CropError> {
        let preset_index = preset_index_for(config.viewport_ratio);
        Ok(Self {
            inner: CropSurface::new(config)?,
            preset_index,
        })
    }

    pub(crate) fn matrix_values(&self) -> [f64; 6] {
        self.inner.transform().to_array()
    }

    pub(crate) fn crop_image(&self, image: &JsBitmap) -> Result<JsBitmap, CropError> {
        let region = self.inner.crop_region().ok_or(CropError::NotLoaded)?;
        crop_bitmap(image, &region)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_surface() -> JsCropSurface {
        let mut surface = JsCropSurface::from_config(CropConfig {
            viewport_ratio: 1.0,
            ..CropConfig::default()
        })
        .unwrap();
        surface.reset_for(2000.0, 1000.0, 500.0, 500.0);
        surface
    }

    #[test]
    fn test_from_config_picks_preset() {
        let surface = square_surface();
        assert_eq!(surface.aspect_ratio_label(), "1:1");
        assert!(surface.is_loaded());
        assert_eq!(surface.minimum_scale(), 0.5);
    }

    #[test]
    fn test_invalid_config() {
        let result = JsCropSurface::from_config(CropConfig {
            min_frame_width: 0.0,
            ..CropConfig::default()
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_matrix_values() {
        let surface = square_surface();
        assert_eq!(surface.matrix_values(), [0.5, 0.0, 0.0, 0.5, -250.0, 0.0]);
    }

    #[test]
    fn test_scroll_and_rects() {
        let mut surface = square_surface();
        assert!(surface.scroll(-100.0, 0.0, 1));
        assert_eq!(surface.position_x(), 100.0);
        assert_eq!(surface.frame_rect(), vec![0.0, 0.0, 500.0, 500.0]);
        assert_eq!(surface.viewport_rect(), vec![0.0, 0.0, 500.0, 500.0]);
    }

    #[test]
    fn test_double_tap_animates() {
        let mut surface = square_surface();
        assert!(surface.double_tap(250.0, 250.0));
        assert!(surface.is_animating());
        surface.tick(0.0);
        surface.tick(1000.0);
        assert!(!surface.is_animating());
        assert_eq!(surface.scale(), 5.0);
    }

    #[test]
    fn test_next_aspect_ratio_cycles() {
        let mut surface = square_surface();
        assert_eq!(surface.next_aspect_ratio(), "6:4");
        assert_eq!(surface.aspect_ratio(), 1.5);
        assert_eq!(surface.next_aspect_ratio(), "16:9");
        assert_eq!(surface.next_aspect_ratio(), "\u{00D8}");
        assert_eq!(surface.aspect_ratio(), 0.0);
    }

    #[test]
    fn test_crop_image() {
        let surface = square_surface();
        let image = JsBitmap::try_new(2000, 1000, vec![0u8; 2000 * 1000 * 3]).unwrap();
        let cropped = surface.crop_image(&image).unwrap();
        assert_eq!(cropped.width(), 1000);
        assert_eq!(cropped.height(), 1000);
    }

    #[test]
    fn test_crop_image_not_loaded() {
        let surface = JsCropSurface::from_config(CropConfig::default()).unwrap();
        let image = JsBitmap::try_new(10, 10, vec![0u8; 300]).unwrap();
        assert!(matches!(
            surface.crop_image(&image),
            Err(CropError::NotLoaded)
        ));
    }
}
