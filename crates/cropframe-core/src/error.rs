//! Error types for the crop surface.

use thiserror::Error;

/// Errors raised by configuration validation and crop extraction.
///
/// Gesture handling and geometry never fail; out-of-range values are clamped
/// instead.
#[derive(Debug, Error, PartialEq)]
pub enum CropError {
    /// A configuration value is out of its legal range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// No bitmap has been loaded into the surface yet.
    #[error("No bitmap loaded")]
    NotLoaded,

    /// The requested crop region has zero area or lies outside the bitmap.
    #[error("Crop region is empty or out of bounds")]
    EmptyRegion,

    /// The pixel buffer does not match the declared dimensions.
    #[error("Invalid pixel data: expected {expected} bytes, got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Bitmap dimensions must both be positive.
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}
