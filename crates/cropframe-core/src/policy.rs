//! Viewport sizing, zoom limits and position clamping.
//!
//! All functions here are total: invalid or conflicting inputs are resolved by
//! saturating rather than by returning errors.
//!
//! # Cover-fit
//!
//! The minimum scale is the smallest zoom at which the bitmap covers the
//! viewport on both axes. Panning is then limited so that the scaled bitmap
//! never uncovers the crop frame:
//!
//! ```text
//! minimum_scale = max(viewport_w / bitmap_w, viewport_h / bitmap_h)
//! limit         = (bitmap_size * scale - frame_size) / 2
//! ```

use crate::geometry::{Point, Size};

/// Maximum distance the image center may move from the frame center.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Limits {
    pub horizontal: f64,
    pub vertical: f64,
}

/// Compute the viewport size for a target ratio within the available area.
///
/// A `target_ratio` of `0.0` selects the bitmap's own ratio. The axis on which
/// the ratio is "wider" than the display is fitted first (minus `padding` on
/// both sides) and the other axis is derived from it.
pub fn compute_viewport(
    bitmap_w: f64,
    bitmap_h: f64,
    avail_w: f64,
    avail_h: f64,
    target_ratio: f64,
    padding: f64,
) -> Size {
    let view_ratio = avail_w / avail_h;
    let mut ratio = if target_ratio == 0.0 {
        bitmap_w / bitmap_h
    } else {
        target_ratio
    };
    if !ratio.is_finite() || ratio <= 0.0 {
        ratio = view_ratio;
    }

    if ratio > view_ratio {
        // Viewport is wider than the display
        let width = (avail_w - padding * 2.0).max(0.0);
        Size::new(width, width / ratio)
    } else {
        // Viewport is taller than the display
        let height = (avail_h - padding * 2.0).max(0.0);
        Size::new(height * ratio, height)
    }
}

/// Smallest scale at which the bitmap covers the viewport on both axes.
pub fn compute_minimum_scale(viewport_w: f64, viewport_h: f64, bitmap_w: f64, bitmap_h: f64) -> f64 {
    let fw = viewport_w / bitmap_w;
    let fh = viewport_h / bitmap_h;
    fw.max(fh)
}

/// Clamp `requested` into `[min, max]`. If `min > max`, `min` wins.
#[inline]
pub fn clamp_scale(requested: f64, min: f64, max: f64) -> f64 {
    requested.min(max).max(min)
}

/// Clamp `value` into `[min, max]` without panicking on inverted bounds.
#[inline]
pub(crate) fn clamp_saturating(value: f64, min: f64, max: f64) -> f64 {
    value.min(max).max(min)
}

/// Pan limits for the given scale and frame size.
pub fn compute_limits(scale: f64, bitmap_w: f64, bitmap_h: f64, frame_w: f64, frame_h: f64) -> Limits {
    Limits {
        horizontal: (bitmap_w * scale - frame_w) / 2.0,
        vertical: (bitmap_h * scale - frame_h) / 2.0,
    }
}

/// Snap `position` back inside the pan limits.
///
/// `position` and `frame_offset` are both measured from the display center;
/// `frame_offset` is where the frame's center sits. The image center may
/// stray at most `limits` from the frame center on each axis. A negative limit
/// (frame larger than the image) pins that axis to the frame center.
pub fn clamp_position(position: Point, limits: Limits, frame_offset: Point) -> Point {
    Point::new(
        clamp_axis(position.x, frame_offset.x, limits.horizontal),
        clamp_axis(position.y, frame_offset.y, limits.vertical),
    )
}

fn clamp_axis(value: f64, center: f64, limit: f64) -> f64 {
    if limit < 0.0 {
        return center;
    }
    clamp_saturating(value, center - limit, center + limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_square_in_portrait_display() {
        // 1:1 is wider than a 9:16 display, so width is fitted first
        let vp = compute_viewport(2000.0, 1000.0, 1080.0, 1920.0, 1.0, 0.0);
        assert_eq!(vp, Size::new(1080.0, 1080.0));
    }

    #[test]
    fn test_viewport_fits_height_for_tall_ratio() {
        let vp = compute_viewport(1000.0, 2000.0, 1000.0, 800.0, 0.5, 0.0);
        assert_eq!(vp, Size::new(400.0, 800.0));
    }

    #[test]
    fn test_viewport_native_ratio() {
        let vp = compute_viewport(2000.0, 1000.0, 1000.0, 1000.0, 0.0, 0.0);
        assert_eq!(vp, Size::new(1000.0, 500.0));
    }

    #[test]
    fn test_viewport_padding() {
        let vp = compute_viewport(100.0, 100.0, 600.0, 1000.0, 1.0, 50.0);
        assert_eq!(vp, Size::new(500.0, 500.0));
    }

    #[test]
    fn test_viewport_oversized_padding_saturates() {
        let vp = compute_viewport(100.0, 100.0, 60.0, 100.0, 1.0, 50.0);
        assert_eq!(vp, Size::new(0.0, 0.0));
    }

    #[test]
    fn test_minimum_scale_scenario() {
        // 2000x1000 bitmap in a 500x500 viewport
        assert_eq!(compute_minimum_scale(500.0, 500.0, 2000.0, 1000.0), 0.5);
    }

    #[test]
    fn test_limits_scenario() {
        let limits = compute_limits(0.5, 2000.0, 1000.0, 500.0, 500.0);
        assert_eq!(limits.horizontal, 250.0);
        assert_eq!(limits.vertical, 0.0);
    }

    #[test]
    fn test_clamp_scale() {
        assert_eq!(clamp_scale(5.0, 1.0, 10.0), 5.0);
        assert_eq!(clamp_scale(0.5, 1.0, 10.0), 1.0);
        assert_eq!(clamp_scale(20.0, 1.0, 10.0), 10.0);
        // Inverted bounds: minimum wins
        assert_eq!(clamp_scale(5.0, 12.0, 10.0), 12.0);
    }

    #[test]
    fn test_clamp_position_inside_untouched() {
        let limits = Limits {
            horizontal: 100.0,
            vertical: 50.0,
        };
        let p = Point::new(-40.0, 20.0);
        assert_eq!(clamp_position(p, limits, Point::ZERO), p);
    }

    #[test]
    fn test_clamp_position_snaps_to_edges() {
        let limits = Limits {
            horizontal: 100.0,
            vertical: 50.0,
        };
        let clamped = clamp_position(Point::new(500.0, -500.0), limits, Point::ZERO);
        assert_eq!(clamped, Point::new(100.0, -50.0));
    }

    #[test]
    fn test_clamp_position_follows_frame_offset() {
        let limits = Limits {
            horizontal: 10.0,
            vertical: 10.0,
        };
        let clamped = clamp_position(Point::ZERO, limits, Point::new(-100.0, 40.0));
        assert_eq!(clamped, Point::new(-90.0, 30.0));
    }

    #[test]
    fn test_clamp_position_negative_limit_centers() {
        let limits = Limits {
            horizontal: -5.0,
            vertical: 0.0,
        };
        let clamped = clamp_position(Point::new(30.0, 30.0), limits, Point::new(2.0, 3.0));
        assert_eq!(clamped, Point::new(2.0, 3.0));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn dimension() -> impl Strategy<Value = f64> {
        50.0f64..5000.0
    }

    proptest! {
        /// Property: viewport aspect matches the requested ratio.
        #[test]
        fn prop_viewport_matches_ratio(
            bw in dimension(),
            bh in dimension(),
            aw in 200.0f64..3000.0,
            ah in 200.0f64..3000.0,
            ratio in prop_oneof![Just(0.0), 0.2f64..5.0],
            padding in 0.0f64..50.0,
        ) {
            let vp = compute_viewport(bw, bh, aw, ah, ratio, padding);
            let expected = if ratio == 0.0 { bw / bh } else { ratio };
            let actual = vp.width / vp.height;
            prop_assert!((actual - expected).abs() <= expected * 1e-9);
            prop_assert!(vp.width <= aw + 1e-9 && vp.height <= ah + 1e-9);
        }

        /// Property: clamping twice equals clamping once.
        #[test]
        fn prop_clamp_scale_idempotent(
            s in -10.0f64..100.0,
            lo in 0.01f64..10.0,
            hi in 0.01f64..20.0,
        ) {
            let once = clamp_scale(s, lo, hi);
            prop_assert_eq!(clamp_scale(once, lo, hi), once);
        }

        /// Property: the minimum scale covers the viewport on both axes.
        #[test]
        fn prop_minimum_scale_covers(
            vw in 1.0f64..4000.0,
            vh in 1.0f64..4000.0,
            bw in 1.0f64..8000.0,
            bh in 1.0f64..8000.0,
        ) {
            let s = compute_minimum_scale(vw, vh, bw, bh);
            prop_assert!(s * bw >= vw - 1e-6);
            prop_assert!(s * bh >= vh - 1e-6);
        }

        /// Property: snapping a position is idempotent.
        #[test]
        fn prop_clamp_position_idempotent(
            x in -5000.0f64..5000.0,
            y in -5000.0f64..5000.0,
            h in -100.0f64..1000.0,
            v in -100.0f64..1000.0,
            ox in -200.0f64..200.0,
            oy in -200.0f64..200.0,
        ) {
            let limits = Limits { horizontal: h, vertical: v };
            let offset = Point::new(ox, oy);
            let once = clamp_position(Point::new(x, y), limits, offset);
            prop_assert_eq!(clamp_position(once, limits, offset), once);
        }
    }
}
