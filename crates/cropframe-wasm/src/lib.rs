//! Cropframe WASM - WebAssembly bindings for the crop surface
//!
//! This crate exposes the cropframe-core touch state machine and crop
//! extraction to JavaScript/TypeScript hosts. The host owns the canvas and the
//! gesture detectors; the surface owns the transform.
//!
//! # Module Structure
//!
//! - `surface` - `JsCropSurface`, the interactive crop state machine
//! - `types` - WASM-compatible wrapper types for bitmaps and pointer results
//! - `crop` - Crop extraction bindings
//! - `logger` - Console backend for the `log` facade
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsCropSurface, set_log_level } from '@cropframe/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//! set_log_level('debug');
//!
//! const surface = new JsCropSurface({ viewportRatio: 16 / 9 });
//! surface.reset_for(image.width, image.height, canvas.width, canvas.height);
//! ```

use wasm_bindgen::prelude::*;

mod crop;
mod logger;
mod surface;
mod types;

// Re-export public types
pub use crop::apply_crop;
pub use logger::set_log_level;
pub use surface::JsCropSurface;
pub use types::{JsBitmap, JsPointerOutcome};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    logger::install();
    log::debug!("cropframe-wasm {} ready", version());
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
