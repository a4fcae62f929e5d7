//! Touch state machine for the crop surface.
//!
//! [`CropSurface`] owns the complete positional state (position, scale, crop
//! frame, limits) and is the only writer of it. Input arrives on three
//! channels, all expected on the same sequential dispatch context:
//!
//! - [`CropSurface::on_pointer`]: raw pointer down/move/up events
//! - [`CropSurface::on_gesture`]: parsed output of the host's gesture detectors
//! - [`CropSurface::tick`]: frame clock for animated transitions
//!
//! # States
//!
//! ```text
//! Idle --down--> (classify) --Other--> PanningOrScaling --up--> Idle
//!                           \--handle-> ResizingHandle  --up--> Idle
//! ```
//!
//! The touch area is chosen once per pointer-down and held until the next
//! one, so a fling or double tap reported just after pointer-up is still
//! routed by it. Every up event snaps the position back inside the limits.
//!
//! # Position
//!
//! The position is the offset of the bitmap center from the display center.
//! [`CropSurface::apply_positioning_and_scale`] adds the display center back
//! to produce absolute display coordinates.

use crate::animator::{Sample, TransformAnimator};
use crate::classifier::{classify, TouchArea};
use crate::config::CropConfig;
use crate::error::CropError;
use crate::extract::CropRegion;
use crate::fling::FlingPhysics;
use crate::geometry::{Matrix, Point, Rect, Size};
use crate::gesture::{propose, GestureContext, GestureEvent, Proposal};
use crate::policy::{
    clamp_position, clamp_scale, compute_limits, compute_minimum_scale, compute_viewport, Limits,
};

/// Kind of raw pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerAction {
    /// First pointer touches down.
    Down,
    /// A secondary pointer touched down while another is already down.
    PointerDown,
    /// Any pointer moved.
    Move,
    /// Last pointer lifted.
    Up,
    /// A secondary pointer lifted while others remain down.
    PointerUp,
    /// The platform aborted the gesture.
    Cancel,
}

/// Raw pointer event in display coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub action: PointerAction,
    pub x: f64,
    pub y: f64,
}

impl PointerEvent {
    pub fn new(action: PointerAction, x: f64, y: f64) -> Self {
        Self { action, x, y }
    }

    pub fn down(x: f64, y: f64) -> Self {
        Self::new(PointerAction::Down, x, y)
    }

    pub fn moved(x: f64, y: f64) -> Self {
        Self::new(PointerAction::Move, x, y)
    }

    pub fn up(x: f64, y: f64) -> Self {
        Self::new(PointerAction::Up, x, y)
    }
}

/// Current phase of the touch state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TouchState {
    #[default]
    Idle,
    /// Body touch: moves are handled by the host's pan/pinch/fling detectors.
    PanningOrScaling,
    /// Handle touch: moves resize the crop frame directly.
    ResizingHandle(TouchArea),
}

/// Result of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerOutcome {
    /// The host should redraw.
    pub redraw: bool,
    /// New frame size if a handle drag changed it.
    pub frame_resized: Option<Size>,
}

/// Loaded bitmap and display geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Layout {
    bitmap: Size,
    display: Size,
}

impl Layout {
    fn display_center(&self) -> Point {
        Point::new(self.display.width / 2.0, self.display.height / 2.0)
    }
}

/// Interactive crop surface: gesture handling plus transform state.
#[derive(Debug, Clone)]
pub struct CropSurface {
    config: CropConfig,
    physics: FlingPhysics,
    animator: TransformAnimator,
    state: TouchState,
    touch_area: TouchArea,
    last_touch: Point,
    layout: Option<Layout>,
    viewport: Rect,
    frame: Rect,
    minimum_scale: f64,
    maximum_scale: f64,
    scale: f64,
    limits: Limits,
    position: Point,
}

impl Default for CropSurface {
    fn default() -> Self {
        Self::with_valid_config(CropConfig::default())
    }
}

/// Clamp a frame extent to `[min, max]`; the viewport size wins on conflict.
#[inline]
fn clamp_extent(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

impl CropSurface {
    /// Create an empty surface.
    ///
    /// # Errors
    ///
    /// [`CropError::InvalidConfig`] if `config` fails validation.
    pub fn new(config: CropConfig) -> Result<Self, CropError> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: CropConfig) -> Self {
        Self {
            physics: FlingPhysics::new(config.screen_density),
            animator: TransformAnimator::new(
                config.translation_duration_ms,
                config.zoom_duration_ms,
            ),
            state: TouchState::Idle,
            touch_area: TouchArea::Other,
            last_touch: Point::ZERO,
            layout: None,
            viewport: Rect::default(),
            frame: Rect::default(),
            minimum_scale: 0.0,
            maximum_scale: config.max_scale,
            scale: 1.0,
            limits: Limits::default(),
            position: Point::ZERO,
            config,
        }
    }

    // ------------------------------------------------------------------
    // Host lifecycle
    // ------------------------------------------------------------------

    /// Load a new bitmap or lay out for the first time.
    ///
    /// Recomputes the viewport, resets the frame to its maximum extent, the
    /// scale to the cover-fit minimum and the position to the center. Skipped
    /// (prior state intact) if any dimension is not positive.
    pub fn reset_for(&mut self, bitmap_w: f64, bitmap_h: f64, avail_w: f64, avail_h: f64) {
        let Some(layout) = Self::checked_layout(bitmap_w, bitmap_h, avail_w, avail_h) else {
            log::warn!(
                "skipping reset: bitmap {bitmap_w}x{bitmap_h}, display {avail_w}x{avail_h}"
            );
            return;
        };

        self.animator.cancel();
        self.layout = Some(layout);
        self.update_viewport(layout);
        self.frame = self.viewport;
        self.maximum_scale = self.config.max_scale;
        self.minimum_scale = compute_minimum_scale(
            self.viewport.width(),
            self.viewport.height(),
            bitmap_w,
            bitmap_h,
        );
        self.scale = self.minimum_scale;
        self.position = Point::ZERO;
        self.set_limits();
        self.ensure_inside_viewport();

        log::debug!(
            "reset: bitmap {bitmap_w}x{bitmap_h}, viewport {:.1}x{:.1}, min scale {:.4}",
            self.viewport.width(),
            self.viewport.height(),
            self.minimum_scale
        );
    }

    /// React to a display resize, keeping scale and position where possible.
    ///
    /// The configured aspect ratio is preserved. The frame keeps its size,
    /// shrunk to fit the new viewport if needed. Skipped if any dimension is
    /// not positive. Falls back to [`reset_for`](Self::reset_for) when nothing
    /// was loaded yet.
    pub fn change_for(&mut self, bitmap_w: f64, bitmap_h: f64, avail_w: f64, avail_h: f64) {
        let Some(layout) = Self::checked_layout(bitmap_w, bitmap_h, avail_w, avail_h) else {
            log::warn!(
                "skipping change: bitmap {bitmap_w}x{bitmap_h}, display {avail_w}x{avail_h}"
            );
            return;
        };
        if self.layout.is_none() {
            self.reset_for(bitmap_w, bitmap_h, avail_w, avail_h);
            return;
        }

        let frame_size = self.frame.size();
        self.layout = Some(layout);
        self.update_viewport(layout);
        self.frame = Rect::from_origin_size(
            Point::new(self.viewport.left, self.viewport.top),
            Size::new(
                clamp_extent(
                    frame_size.width,
                    self.config.min_frame_width,
                    self.viewport.width(),
                ),
                clamp_extent(
                    frame_size.height,
                    self.config.min_frame_height,
                    self.viewport.height(),
                ),
            ),
        );
        self.minimum_scale = compute_minimum_scale(
            self.viewport.width(),
            self.viewport.height(),
            bitmap_w,
            bitmap_h,
        );
        self.scale = clamp_scale(self.scale, self.minimum_scale, self.maximum_scale);
        self.set_limits();
        self.ensure_inside_viewport();

        log::debug!("change: display {avail_w}x{avail_h}, scale {:.4}", self.scale);
    }

    fn checked_layout(bitmap_w: f64, bitmap_h: f64, avail_w: f64, avail_h: f64) -> Option<Layout> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if positive(bitmap_w) && positive(bitmap_h) && positive(avail_w) && positive(avail_h) {
            Some(Layout {
                bitmap: Size::new(bitmap_w, bitmap_h),
                display: Size::new(avail_w, avail_h),
            })
        } else {
            None
        }
    }

    /// Recompute the viewport rectangle, centered in the display.
    fn update_viewport(&mut self, layout: Layout) {
        let size = compute_viewport(
            layout.bitmap.width,
            layout.bitmap.height,
            layout.display.width,
            layout.display.height,
            self.config.viewport_ratio,
            self.config.viewport_padding,
        );
        let origin = Point::new(
            (layout.display.width - size.width) / 2.0,
            (layout.display.height - size.height) / 2.0,
        );
        self.viewport = Rect::from_origin_size(origin, size);
    }

    /// Change the target viewport ratio (`0.0` = native).
    ///
    /// When a bitmap is loaded the surface is reset for the new ratio.
    /// Negative or non-finite ratios are treated as native.
    pub fn set_aspect_ratio(&mut self, ratio: f64) {
        let ratio = if ratio.is_finite() && ratio > 0.0 {
            ratio
        } else {
            0.0
        };
        self.config.viewport_ratio = ratio;
        log::debug!("aspect ratio set to {ratio}");

        if let Some(layout) = self.layout {
            self.reset_for(
                layout.bitmap.width,
                layout.bitmap.height,
                layout.display.width,
                layout.display.height,
            );
        }
    }

    /// Configured viewport ratio; `0.0` means native.
    pub fn aspect_ratio(&self) -> f64 {
        self.config.viewport_ratio
    }

    /// Width / height of the loaded bitmap.
    pub fn image_ratio(&self) -> Option<f64> {
        self.layout.map(|l| l.bitmap.width / l.bitmap.height)
    }

    /// Shrink the frame to its minimum size.
    pub fn set_min_frame_rect(&mut self) {
        let size = Size::new(
            self.config.min_frame_width.min(self.viewport.width()),
            self.config.min_frame_height.min(self.viewport.height()),
        );
        self.frame = Rect::from_origin_size(Point::new(self.viewport.left, self.viewport.top), size);
        self.set_limits();
        self.ensure_inside_viewport();
    }

    /// Grow the frame to fill the viewport.
    pub fn set_max_frame_rect(&mut self) {
        self.frame = self.viewport;
        self.set_limits();
        self.ensure_inside_viewport();
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    /// Handle a raw pointer event.
    pub fn on_pointer(&mut self, event: PointerEvent) -> PointerOutcome {
        let mut outcome = PointerOutcome::default();
        let touch = Point::new(event.x, event.y);

        match event.action {
            PointerAction::Down if self.state != TouchState::Idle => {
                // Gesture already classified; extra fingers never reclassify
                log::trace!("ignoring pointer down at ({:.1}, {:.1}) mid-gesture", event.x, event.y);
            }
            PointerAction::Down => {
                self.last_touch = touch;
                self.touch_area = classify(event.x, event.y, &self.frame, self.config.touch_radius());
                self.state = if self.touch_area.is_handle() {
                    TouchState::ResizingHandle(self.touch_area)
                } else {
                    TouchState::PanningOrScaling
                };
            }
            PointerAction::Move => {
                let diff = touch - self.last_touch;
                if let TouchState::ResizingHandle(area) = self.state {
                    let before = self.frame.size();
                    self.move_handle(area, diff);
                    self.set_limits();
                    let after = self.frame.size();
                    if after != before {
                        log::trace!("frame resized to {:.1}x{:.1}", after.width, after.height);
                        outcome.frame_resized = Some(after);
                    }
                }
                self.last_touch = touch;
                outcome.redraw = true;
            }
            PointerAction::Up | PointerAction::Cancel => {
                self.state = TouchState::Idle;
            }
            PointerAction::PointerDown | PointerAction::PointerUp => {}
        }

        if matches!(
            event.action,
            PointerAction::Up | PointerAction::PointerUp | PointerAction::Cancel
        ) {
            self.ensure_inside_viewport();
            outcome.redraw = true;
        }
        outcome
    }

    /// Resize the frame by dragging one of its handles.
    ///
    /// Only the right, bottom and bottom-right handles move; the frame stays
    /// anchored at its top-left corner.
    fn move_handle(&mut self, area: TouchArea, diff: Point) {
        match area {
            TouchArea::RightBottom => {
                self.move_right_edge(diff.x);
                self.move_bottom_edge(diff.y);
            }
            TouchArea::Right => self.move_right_edge(diff.x),
            TouchArea::Bottom => self.move_bottom_edge(diff.y),
            TouchArea::LeftTop
            | TouchArea::RightTop
            | TouchArea::LeftBottom
            | TouchArea::Left
            | TouchArea::Top
            | TouchArea::Other => {}
        }
    }

    fn move_right_edge(&mut self, dx: f64) {
        let width = clamp_extent(
            self.frame.width() + dx,
            self.config.min_frame_width,
            self.viewport.width(),
        );
        self.frame.right = self.frame.left + width;
    }

    fn move_bottom_edge(&mut self, dy: f64) {
        let height = clamp_extent(
            self.frame.height() + dy,
            self.config.min_frame_height,
            self.viewport.height(),
        );
        self.frame.bottom = self.frame.top + height;
    }

    /// Handle a gesture reported by the host's detectors.
    ///
    /// Ignored unless the current gesture started on the frame body and a
    /// bitmap is loaded. Returns `true` if state changed or an animation
    /// started.
    pub fn on_gesture(&mut self, event: GestureEvent) -> bool {
        if self.touch_area != TouchArea::Other {
            return false;
        }
        let Some(ctx) = self.gesture_context() else {
            return false;
        };
        log::trace!("gesture {event:?}");
        self.apply(propose(event, &ctx))
    }

    fn gesture_context(&self) -> Option<GestureContext> {
        let layout = self.layout?;
        Some(GestureContext {
            position: self.position,
            scale: self.scale,
            minimum_scale: self.minimum_scale,
            maximum_scale: self.maximum_scale,
            display_center: layout.display_center(),
            bitmap: layout.bitmap,
            min_fling_velocity: self.config.min_fling_velocity,
            fling_velocity_scale: self.config.fling_velocity_scale,
            physics: self.physics,
        })
    }

    /// Single mutation point for recognizer proposals.
    fn apply(&mut self, proposal: Proposal) -> bool {
        match proposal {
            Proposal::None => false,
            Proposal::Pan(delta) => {
                self.position += delta;
                self.ensure_inside_viewport();
                true
            }
            Proposal::Scale(scale) => {
                self.scale = scale;
                self.set_limits();
                true
            }
            Proposal::Translate { from, to } => {
                self.animator.animate_translation(from.x, to.x, from.y, to.y);
                true
            }
            Proposal::Zoom(target) => {
                self.animator.animate_double_tap_zoom(
                    target.from.x,
                    target.to.x,
                    target.from.y,
                    target.to.y,
                    target.from_scale,
                    target.to_scale,
                );
                true
            }
        }
    }

    /// Advance any running animation to `now_ms`.
    ///
    /// Returns `true` if the host should redraw.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        let Some(frame) = self.animator.tick(now_ms) else {
            return false;
        };
        for sample in frame.samples() {
            match sample {
                Sample::Scale(scale) => {
                    self.scale = scale;
                    self.set_limits();
                }
                Sample::X(x) => {
                    self.position.x = x;
                    self.ensure_inside_viewport();
                }
                Sample::Y(y) => {
                    self.position.y = y;
                    self.ensure_inside_viewport();
                }
            }
        }
        if frame.finished {
            self.ensure_inside_viewport();
        }
        true
    }

    /// Stop any running animation where it is.
    pub fn cancel_animation(&mut self) {
        if self.animator.cancel() {
            self.ensure_inside_viewport();
        }
    }

    // ------------------------------------------------------------------
    // Derived state
    // ------------------------------------------------------------------

    fn set_limits(&mut self) {
        if let Some(layout) = self.layout {
            self.limits = compute_limits(
                self.scale,
                layout.bitmap.width,
                layout.bitmap.height,
                self.frame.width(),
                self.frame.height(),
            );
        }
    }

    /// Snap the position back so the image covers the crop frame.
    ///
    /// Idempotent; a no-op before the first successful reset.
    pub fn ensure_inside_viewport(&mut self) {
        let Some(layout) = self.layout else {
            return;
        };
        let frame_offset = self.frame.center() - layout.display_center();
        self.position = clamp_position(self.position, self.limits, frame_offset);
    }

    // ------------------------------------------------------------------
    // Rendering boundary
    // ------------------------------------------------------------------

    /// Append this surface's bitmap-to-display transform to `matrix`:
    /// translate(-bw/2, -bh/2), scale(scale), translate(center + position).
    pub fn apply_positioning_and_scale(&self, matrix: &mut Matrix) {
        let Some(layout) = self.layout else {
            return;
        };
        let center = layout.display_center();
        matrix
            .post_translate(-layout.bitmap.width / 2.0, -layout.bitmap.height / 2.0)
            .post_scale(self.scale)
            .post_translate(center.x + self.position.x, center.y + self.position.y);
    }

    /// Bitmap-to-display transform starting from identity.
    pub fn transform(&self) -> Matrix {
        let mut matrix = Matrix::IDENTITY;
        self.apply_positioning_and_scale(&mut matrix);
        matrix
    }

    /// Set the scale directly (clamped) and append it to `matrix`.
    pub fn apply_scale(&mut self, matrix: &mut Matrix, scale: f64) {
        self.scale = clamp_scale(scale, self.minimum_scale, self.maximum_scale);
        self.set_limits();
        matrix.post_scale(self.scale);
    }

    /// Map the crop frame back to source-bitmap pixels.
    ///
    /// Returns `None` before a bitmap is loaded.
    pub fn crop_region(&self) -> Option<CropRegion> {
        let layout = self.layout?;
        let inverse = self.transform().invert()?;
        let bw = layout.bitmap.width;
        let bh = layout.bitmap.height;

        let top_left = inverse.map_point(Point::new(self.frame.left, self.frame.top));
        let bottom_right = inverse.map_point(Point::new(self.frame.right, self.frame.bottom));

        let left = top_left.x.clamp(0.0, bw).round();
        let top = top_left.y.clamp(0.0, bh).round();
        let right = bottom_right.x.clamp(0.0, bw).round();
        let bottom = bottom_right.y.clamp(0.0, bh).round();

        let max_w = bw.round().max(1.0);
        let max_h = bh.round().max(1.0);
        let left = left.min(max_w - 1.0);
        let top = top.min(max_h - 1.0);
        let width = (right - left).clamp(1.0, max_w - left);
        let height = (bottom - top).clamp(1.0, max_h - top);

        Some(CropRegion::new(
            left as u32,
            top as u32,
            width as u32,
            height as u32,
        ))
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn config(&self) -> &CropConfig {
        &self.config
    }

    pub fn is_loaded(&self) -> bool {
        self.layout.is_some()
    }

    pub fn is_animating(&self) -> bool {
        self.animator.is_running()
    }

    pub fn state(&self) -> TouchState {
        self.state
    }

    /// Area chosen by the last pointer-down.
    pub fn touch_area(&self) -> TouchArea {
        self.touch_area
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn minimum_scale(&self) -> f64 {
        self.minimum_scale
    }

    pub fn maximum_scale(&self) -> f64 {
        self.maximum_scale
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    pub fn viewport_rect(&self) -> Rect {
        self.viewport
    }

    pub fn frame_rect(&self) -> Rect {
        self.frame
    }

    /// Width of the crop frame (the area that will be extracted).
    pub fn viewport_width(&self) -> f64 {
        self.frame.width()
    }

    /// Height of the crop frame (the area that will be extracted).
    pub fn viewport_height(&self) -> f64 {
        self.frame.height()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn loaded_surface(bw: f64, bh: f64, ratio: f64) -> CropSurface {
        let mut surface = CropSurface::new(CropConfig {
            viewport_ratio: ratio,
            ..CropConfig::default()
        })
        .unwrap();
        surface.reset_for(bw, bh, 600.0, 800.0);
        surface
    }

    proptest! {
        /// Property: after any pan and pointer-up, the image covers the frame.
        #[test]
        fn prop_pan_then_release_stays_inside(
            bw in 200.0f64..4000.0,
            bh in 200.0f64..4000.0,
            ratio in prop_oneof![Just(0.0), 0.5f64..2.0],
            factor in 1.0f64..8.0,
            dx in -5000.0f64..5000.0,
            dy in -5000.0f64..5000.0,
        ) {
            let mut surface = loaded_surface(bw, bh, ratio);
            surface.on_pointer(PointerEvent::down(300.0, 400.0));
            surface.on_gesture(GestureEvent::Scale { factor });
            surface.on_gesture(GestureEvent::Scroll {
                distance_x: dx,
                distance_y: dy,
                pointer_count: 1,
            });
            surface.on_pointer(PointerEvent::up(300.0, 400.0));

            let scale = surface.scale();
            prop_assert!(scale >= surface.minimum_scale() && scale <= surface.maximum_scale());

            let limits = surface.limits();
            let position = surface.position();
            let offset = surface.frame_rect().center() - Point::new(300.0, 400.0);
            prop_assert!((position.x - offset.x).abs() <= limits.horizontal.max(0.0) + 1e-6);
            prop_assert!((position.y - offset.y).abs() <= limits.vertical.max(0.0) + 1e-6);
        }

        /// Property: snapping inside the viewport is idempotent.
        #[test]
        fn prop_ensure_inside_idempotent(
            bw in 200.0f64..4000.0,
            bh in 200.0f64..4000.0,
            dx in -5000.0f64..5000.0,
            dy in -5000.0f64..5000.0,
        ) {
            let mut surface = loaded_surface(bw, bh, 1.0);
            surface.set_min_frame_rect();
            surface.on_gesture(GestureEvent::Scroll {
                distance_x: dx,
                distance_y: dy,
                pointer_count: 1,
            });
            surface.ensure_inside_viewport();
            let once = surface.position();
            surface.ensure_inside_viewport();
            prop_assert_eq!(surface.position(), once);
        }

        /// Property: the crop region always lies inside the bitmap.
        #[test]
        fn prop_crop_region_fits_bitmap(
            bw in 200u32..4000,
            bh in 200u32..4000,
            dx in -5000.0f64..5000.0,
            dy in -5000.0f64..5000.0,
        ) {
            let mut surface = loaded_surface(f64::from(bw), f64::from(bh), 0.0);
            surface.on_gesture(GestureEvent::Scroll {
                distance_x: dx,
                distance_y: dy,
                pointer_count: 1,
            });
            let region = surface.crop_region().unwrap();
            prop_assert!(region.fits(bw, bh));
        }
    }
}
