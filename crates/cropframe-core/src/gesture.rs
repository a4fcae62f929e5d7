//! Pure gesture recognizers.
//!
//! Each recognized gesture is turned into a [`Proposal`] by looking at a
//! read-only [`GestureContext`] snapshot. Nothing here mutates surface state;
//! [`CropSurface`](crate::CropSurface) applies proposals through a single
//! entry point.

use crate::fling::{filter_velocity, FlingPhysics};
use crate::geometry::{Point, Size};
use crate::policy::{clamp_saturating, clamp_scale};

/// Already-parsed output of the host's gesture detectors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    /// Scroll by the distance the finger travelled since the last scroll
    /// event (positive = content moves toward negative coordinates).
    Scroll {
        distance_x: f64,
        distance_y: f64,
        pointer_count: u32,
    },
    /// Pinch step with the scale factor since the previous step.
    Scale { factor: f64 },
    /// Release velocity in units per second.
    Fling { velocity_x: f64, velocity_y: f64 },
    /// Second tap of a double tap, in display coordinates.
    DoubleTap { x: f64, y: f64 },
}

/// Read-only snapshot of the state a recognizer needs.
#[derive(Debug, Clone, Copy)]
pub struct GestureContext {
    pub position: Point,
    pub scale: f64,
    pub minimum_scale: f64,
    pub maximum_scale: f64,
    pub display_center: Point,
    pub bitmap: Size,
    pub min_fling_velocity: f64,
    pub fling_velocity_scale: f64,
    pub physics: FlingPhysics,
}

/// Start and end of a combined pan + zoom transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomTarget {
    pub from: Point,
    pub to: Point,
    pub from_scale: f64,
    pub to_scale: f64,
}

/// A state change suggested by a recognizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Proposal {
    /// Nothing to do.
    None,
    /// Move the position by a delta, then clamp.
    Pan(Point),
    /// Replace the scale (already clamped) and recompute limits.
    Scale(f64),
    /// Animate the position between two points.
    Translate { from: Point, to: Point },
    /// Animate position and scale together.
    Zoom(ZoomTarget),
}

const SCALE_EPSILON: f64 = 1e-9;

/// Turn a detector event into a proposal.
pub fn propose(event: GestureEvent, ctx: &GestureContext) -> Proposal {
    match event {
        GestureEvent::Scroll {
            distance_x,
            distance_y,
            pointer_count,
        } => {
            if pointer_count != 1 {
                return Proposal::None;
            }
            Proposal::Pan(pan_delta(distance_x, distance_y))
        }
        GestureEvent::Scale { factor } => {
            if !factor.is_finite() || factor <= 0.0 {
                return Proposal::None;
            }
            Proposal::Scale(pinch_scale(ctx.scale, factor, ctx.minimum_scale, ctx.maximum_scale))
        }
        GestureEvent::Fling {
            velocity_x,
            velocity_y,
        } => match fling_target(ctx, velocity_x, velocity_y) {
            Some(to) => Proposal::Translate {
                from: ctx.position,
                to,
            },
            None => Proposal::None,
        },
        GestureEvent::DoubleTap { x, y } => Proposal::Zoom(double_tap_target(ctx, Point::new(x, y))),
    }
}

/// Scroll distances move the content the opposite way.
#[inline]
pub fn pan_delta(distance_x: f64, distance_y: f64) -> Point {
    Point::new(-distance_x, -distance_y)
}

/// Apply a pinch factor to the current scale, clamped to the legal range.
#[inline]
pub fn pinch_scale(scale: f64, factor: f64, min: f64, max: f64) -> f64 {
    clamp_scale(scale * factor, min, max)
}

/// Resting position after a fling, or `None` when both axes are below the
/// velocity threshold.
///
/// An axis whose velocity was filtered out keeps its current coordinate.
pub fn fling_target(ctx: &GestureContext, velocity_x: f64, velocity_y: f64) -> Option<Point> {
    let vx = filter_velocity(velocity_x, ctx.min_fling_velocity);
    let vy = filter_velocity(velocity_y, ctx.min_fling_velocity);
    if vx == 0.0 && vy == 0.0 {
        return None;
    }

    let max_x = ctx.bitmap.width * ctx.scale;
    let max_y = ctx.bitmap.height * ctx.scale;

    let x = if vx == 0.0 {
        ctx.position.x
    } else {
        let travel = ctx.physics.distance(vx * ctx.fling_velocity_scale);
        clamp_saturating(ctx.position.x + travel, -max_x, max_x)
    };
    let y = if vy == 0.0 {
        ctx.position.y
    } else {
        let travel = ctx.physics.distance(vy * ctx.fling_velocity_scale);
        clamp_saturating(ctx.position.y + travel, -max_y, max_y)
    };

    log::trace!("fling ({vx:.0}, {vy:.0}) settles at ({x:.1}, {y:.1})");
    Some(Point::new(x, y))
}

/// Toggle between the minimum scale and half the maximum scale.
///
/// Zooming in centers the bitmap point under the tap. Zooming out returns to
/// the origin.
pub fn double_tap_target(ctx: &GestureContext, tap: Point) -> ZoomTarget {
    let at_minimum = (ctx.scale - ctx.minimum_scale).abs() <= SCALE_EPSILON;

    if at_minimum {
        let to_scale = clamp_scale(ctx.maximum_scale / 2.0, ctx.minimum_scale, ctx.maximum_scale);
        let bitmap_point = map_to_bitmap(ctx, tap);
        ZoomTarget {
            from: ctx.position,
            to: -(bitmap_point * to_scale),
            from_scale: ctx.scale,
            to_scale,
        }
    } else {
        ZoomTarget {
            from: ctx.position,
            to: Point::ZERO,
            from_scale: ctx.scale,
            to_scale: ctx.minimum_scale,
        }
    }
}

/// Bitmap-space offset (from the bitmap center, unscaled) under `tap`.
fn map_to_bitmap(ctx: &GestureContext, tap: Point) -> Point {
    if ctx.scale <= 0.0 {
        return Point::ZERO;
    }
    (tap - ctx.display_center - ctx.position) * (1.0 / ctx.scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> GestureContext {
        GestureContext {
            position: Point::ZERO,
            scale: 0.5,
            minimum_scale: 0.5,
            maximum_scale: 10.0,
            display_center: Point::new(250.0, 250.0),
            bitmap: Size::new(2000.0, 1000.0),
            min_fling_velocity: 2500.0,
            fling_velocity_scale: 0.5,
            physics: FlingPhysics::default(),
        }
    }

    #[test]
    fn test_scroll_inverts_distance() {
        let p = propose(
            GestureEvent::Scroll {
                distance_x: 10.0,
                distance_y: -4.0,
                pointer_count: 1,
            },
            &ctx(),
        );
        assert_eq!(p, Proposal::Pan(Point::new(-10.0, 4.0)));
    }

    #[test]
    fn test_multi_pointer_scroll_ignored() {
        let p = propose(
            GestureEvent::Scroll {
                distance_x: 10.0,
                distance_y: 10.0,
                pointer_count: 2,
            },
            &ctx(),
        );
        assert_eq!(p, Proposal::None);
    }

    #[test]
    fn test_pinch_clamps() {
        assert_eq!(pinch_scale(1.0, 2.0, 0.5, 10.0), 2.0);
        assert_eq!(pinch_scale(8.0, 2.0, 0.5, 10.0), 10.0);
        assert_eq!(pinch_scale(0.6, 0.5, 0.5, 10.0), 0.5);
    }

    #[test]
    fn test_invalid_pinch_factor_ignored() {
        assert_eq!(propose(GestureEvent::Scale { factor: 0.0 }, &ctx()), Proposal::None);
        assert_eq!(
            propose(GestureEvent::Scale { factor: f64::NAN }, &ctx()),
            Proposal::None
        );
    }

    #[test]
    fn test_slow_fling_is_noop() {
        let p = propose(
            GestureEvent::Fling {
                velocity_x: 1000.0,
                velocity_y: -2000.0,
            },
            &ctx(),
        );
        assert_eq!(p, Proposal::None);
    }

    #[test]
    fn test_fling_filters_slow_axis() {
        let c = ctx();
        let target = fling_target(&c, 1000.0, 3000.0).unwrap();
        assert_eq!(target.x, c.position.x);
        assert!(target.y > 0.0);
    }

    #[test]
    fn test_fling_target_bounded_by_scaled_bitmap() {
        let c = ctx();
        let target = fling_target(&c, -1.0e9, 0.0).unwrap();
        assert_eq!(target.x, -1000.0);
    }

    #[test]
    fn test_double_tap_center_at_minimum() {
        let c = ctx();
        let target = double_tap_target(&c, c.display_center);
        assert_eq!(target.to_scale, 5.0);
        assert_eq!(target.to, Point::ZERO);
        assert_eq!(target.from_scale, 0.5);
    }

    #[test]
    fn test_double_tap_off_center_centers_tapped_point() {
        let c = ctx();
        // 50 display units right of center at scale 0.5 = 100 bitmap pixels
        let target = double_tap_target(&c, Point::new(300.0, 250.0));
        assert_eq!(target.to, Point::new(-500.0, 0.0));
    }

    #[test]
    fn test_double_tap_zoomed_in_returns_to_minimum() {
        let mut c = ctx();
        c.scale = 3.0;
        c.position = Point::new(40.0, -20.0);
        let target = double_tap_target(&c, Point::new(10.0, 10.0));
        assert_eq!(target.from, Point::new(40.0, -20.0));
        assert_eq!(target.to, Point::ZERO);
        assert_eq!(target.to_scale, 0.5);
    }

    #[test]
    fn test_double_tap_target_respects_minimum() {
        let mut c = ctx();
        c.minimum_scale = 8.0;
        c.scale = 8.0;
        let target = double_tap_target(&c, c.display_center);
        assert_eq!(target.to_scale, 8.0);
    }
}
