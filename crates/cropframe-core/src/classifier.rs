//! Hit testing of a pointer-down location against the crop frame handles.
//!
//! Every handle is a circle of radius `handle_radius + handle_padding`
//! centered on a corner or on an edge midpoint. Corners are tested before
//! edges because their circles overlap near short frame sides.

use crate::geometry::{Point, Rect};

/// Logical region touched at the start of a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TouchArea {
    /// Frame body or anywhere outside a handle: pan/zoom the image.
    #[default]
    Other,
    LeftTop,
    RightTop,
    LeftBottom,
    RightBottom,
    Left,
    Right,
    Top,
    Bottom,
}

impl TouchArea {
    /// True for the eight frame handles.
    pub fn is_handle(self) -> bool {
        self != TouchArea::Other
    }

    pub fn is_corner(self) -> bool {
        matches!(
            self,
            TouchArea::LeftTop | TouchArea::RightTop | TouchArea::LeftBottom | TouchArea::RightBottom
        )
    }
}

/// Centers of the handle hit circles in priority order.
fn handle_centers(frame: &Rect) -> [(TouchArea, Point); 8] {
    let mid = frame.center();
    [
        (TouchArea::LeftTop, Point::new(frame.left, frame.top)),
        (TouchArea::RightTop, Point::new(frame.right, frame.top)),
        (TouchArea::LeftBottom, Point::new(frame.left, frame.bottom)),
        (TouchArea::RightBottom, Point::new(frame.right, frame.bottom)),
        (TouchArea::Left, Point::new(frame.left, mid.y)),
        (TouchArea::Right, Point::new(frame.right, mid.y)),
        (TouchArea::Top, Point::new(mid.x, frame.top)),
        (TouchArea::Bottom, Point::new(mid.x, frame.bottom)),
    ]
}

#[inline]
fn within(p: Point, center: Point, radius: f64) -> bool {
    let dx = p.x - center.x;
    let dy = p.y - center.y;
    dx * dx + dy * dy <= radius * radius
}

/// Classify a touch at `(x, y)` against `frame`.
pub fn classify(x: f64, y: f64, frame: &Rect, radius: f64) -> TouchArea {
    let p = Point::new(x, y);
    let area = handle_centers(frame)
        .into_iter()
        .find(|(_, center)| within(p, *center, radius))
        .map_or(TouchArea::Other, |(area, _)| area);
    log::trace!("classified touch at ({x:.1}, {y:.1}) as {area:?}");
    area
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: a point inside both a corner circle and an edge circle
        /// classifies as the corner.
        #[test]
        fn prop_corner_priority(
            w in 20.0f64..200.0,
            h in 20.0f64..200.0,
            x in -60.0f64..260.0,
            y in -60.0f64..260.0,
        ) {
            let frame = Rect::new(0.0, 0.0, w, h);
            let p = Point::new(x, y);
            let centers = handle_centers(&frame);
            let in_corner = centers[..4].iter().any(|(_, c)| within(p, *c, 40.0));
            let in_edge = centers[4..].iter().any(|(_, c)| within(p, *c, 40.0));

            if in_corner && in_edge {
                prop_assert!(classify(x, y, &frame, 40.0).is_corner());
            }
        }
    }
}
