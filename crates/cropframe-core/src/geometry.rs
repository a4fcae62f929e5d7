//! Plain 2D value types used throughout the crop surface.
//!
//! # Coordinate System
//!
//! - Display coordinates: origin at the top-left of the available area,
//!   x grows to the right, y grows downward
//! - Bitmap coordinates: origin at the top-left pixel of the source image

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/// A 2D point or vector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// The origin `(0, 0)`.
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Overwrite both coordinates.
    pub fn set(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Point {
    type Output = Point;

    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

/// Width and height pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle stored as edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Rectangle of the given size whose top-left corner is `origin`.
    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(
            origin.x,
            origin.y,
            origin.x + size.width,
            origin.y + size.height,
        )
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }

    /// Inclusive containment test.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }
}

/// 2D affine transform restricted to uniform scale + translation.
///
/// Maps `p` to `(p.x * scale + tx, p.y * scale + ty)`. The `post_*` methods
/// append an operation after the existing ones, so
/// `m.post_translate(..).post_scale(..)` translates first, then scales.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    pub scale: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix {
    pub const IDENTITY: Matrix = Matrix {
        scale: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    pub fn post_translate(&mut self, dx: f64, dy: f64) -> &mut Self {
        self.tx += dx;
        self.ty += dy;
        self
    }

    pub fn post_scale(&mut self, s: f64) -> &mut Self {
        self.scale *= s;
        self.tx *= s;
        self.ty *= s;
        self
    }

    pub fn map_point(&self, p: Point) -> Point {
        Point::new(p.x * self.scale + self.tx, p.y * self.scale + self.ty)
    }

    /// Inverse transform, or `None` for a degenerate (zero) scale.
    pub fn invert(&self) -> Option<Matrix> {
        if self.scale == 0.0 || !self.scale.is_finite() {
            return None;
        }
        let inv = 1.0 / self.scale;
        Some(Matrix {
            scale: inv,
            tx: -self.tx * inv,
            ty: -self.ty * inv,
        })
    }

    /// Coefficients in canvas `setTransform(a, b, c, d, e, f)` order.
    pub fn to_array(&self) -> [f64; 6] {
        [self.scale, 0.0, 0.0, self.scale, self.tx, self.ty]
    }
}
