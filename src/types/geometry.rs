//! Planar geometry shared by the tracking and collision code
//!
//! Everything here is in field coordinates (pixels), `f64` only.

use ::core::ops::{Add, Mul, Sub};

/// A point (or displacement) in the playing field.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// z-component of the 3D cross product.
    #[inline]
    pub fn cross(self, other: Self) -> f64 {
        self.x * other.y - self.y * other.x
    }

    #[inline]
    pub fn norm(self) -> f64 {
        self.x.hypot(self.y)
    }

    #[inline]
    pub fn distance(self, other: Self) -> f64 {
        (self - other).norm()
    }
}

impl Add for Point2 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point2 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point2 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl From<(f64, f64)> for Point2 {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// A directed line segment from `start` to `end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point2,
    pub end: Point2,
}

impl Segment {
    #[inline]
    pub const fn new(start: Point2, end: Point2) -> Self {
        Self { start, end }
    }

    /// `end - start`
    #[inline]
    pub fn direction(&self) -> Point2 {
        self.end - self.start
    }

    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.start == self.end
    }
}

/// Width and height of an object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub width: f64,
    pub height: f64,
}

impl Extent {
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// The larger of the two dimensions.
    #[inline]
    pub fn max_dimension(&self) -> f64 {
        self.width.max(self.height)
    }
}

/// Axis-aligned rectangle `(x, y, w, h)` with `(x, y)` the minimum corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Rectangle of the given extent centred on `center`.
    pub fn centered(center: Point2, extent: Extent) -> Self {
        Self {
            x: center.x - extent.width / 2.0,
            y: center.y - extent.height / 2.0,
            width: extent.width,
            height: extent.height,
        }
    }

    /// Edge interval along x, `(min, max)` for non-negative widths.
    #[inline]
    pub fn x_interval(&self) -> (f64, f64) {
        (self.x, self.x + self.width)
    }

    /// Edge interval along y.
    #[inline]
    pub fn y_interval(&self) -> (f64, f64) {
        (self.y, self.y + self.height)
    }

    #[inline]
    pub fn as_tuple(&self) -> (f64, f64, f64, f64) {
        (self.x, self.y, self.width, self.height)
    }
}

/// Playing field spanning `[0, width] x [0, height]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldBounds {
    pub width: f64,
    pub height: f64,
}

impl FieldBounds {
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when `rect` lies entirely outside the field on either axis.
    pub fn excludes(&self, rect: &Rect) -> bool {
        let (x_min, x_max) = rect.x_interval();
        let (y_min, y_max) = rect.y_interval();
        x_max < 0.0 || x_min > self.width || y_max < 0.0 || y_min > self.height
    }
}
