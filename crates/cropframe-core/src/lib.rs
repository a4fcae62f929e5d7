//! Cropframe Core - Touch-driven image crop surface
//!
//! This crate provides the gesture and transform engine behind an interactive
//! crop view: the user pans, pinches, flings and double-taps an image behind a
//! resizable crop frame, and the surface keeps the image covering the frame.
//!
//! Rendering, input capture and gesture detection belong to the host. The
//! host feeds pointer events, detector output and frame timestamps into a
//! [`CropSurface`] and reads back a transform matrix and the crop region.
//!
//! # Module Structure
//!
//! - `geometry` - Point, size, rectangle and matrix primitives
//! - `animator` - Polled position/scale transitions
//! - `classifier` - Handle hit testing for pointer-down events
//! - `policy` - Viewport sizing, zoom limits and position clamping
//! - `fling` - Deceleration physics for fling gestures
//! - `gesture` - Pure recognizers turning detector events into proposals
//! - `surface` - The touch state machine owning all transform state
//! - `extract` - Cutting the selected region out of a bitmap

pub mod animator;
pub mod classifier;
pub mod config;
pub mod error;
pub mod extract;
pub mod fling;
pub mod geometry;
pub mod gesture;
pub mod policy;
pub mod surface;

pub use animator::{AnimationFrame, AnimationKind, Interpolator, Sample, TransformAnimator};
pub use classifier::{classify, TouchArea};
pub use config::{
    next_aspect_ratio_preset, CropConfig, ASPECT_RATIO_LABELS, ASPECT_RATIO_PRESETS,
};
pub use error::CropError;
pub use extract::{apply_crop, Bitmap, CropRegion};
pub use geometry::{Matrix, Point, Rect, Size};
pub use gesture::{GestureEvent, Proposal};
pub use policy::Limits;
pub use surface::{CropSurface, PointerAction, PointerEvent, PointerOutcome, TouchState};
