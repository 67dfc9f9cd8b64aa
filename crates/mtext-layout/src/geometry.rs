//! Geometry primitives for the local layout frame.
//!
//! All coordinates are in drawing units. The layout frame has its origin at
//! the top-left corner of the first line, `x` growing to the right and `y`
//! growing upwards (the usual CAD convention), so lines flowing from top to
//! bottom have negative baselines.

use serde::{Deserialize, Serialize};

/// A point (or vector) in the layout frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// The origin.
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    /// Create a point from its coordinates.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Translate this point by `(dx, dy)`.
    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// An axis-aligned bounding box.
///
/// An empty box (no points added yet) has `min > max`; unioning anything
/// into it yields the other operand.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Lower-left corner.
    pub min: Point,
    /// Upper-right corner.
    pub max: Point,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl BoundingBox {
    /// The empty box, identity element of [`BoundingBox::union`].
    pub const EMPTY: Self = Self {
        min: Point {
            x: f64::INFINITY,
            y: f64::INFINITY,
        },
        max: Point {
            x: f64::NEG_INFINITY,
            y: f64::NEG_INFINITY,
        },
    };

    /// Box spanning two corners given in any order.
    #[must_use]
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            min: Point::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Smallest box containing every point of `points`.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point>) -> Self {
        points
            .into_iter()
            .fold(Self::EMPTY, |acc, point| acc.including(*point))
    }

    /// Whether no point has been added to this box.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// Width of the box (zero when empty).
    #[must_use]
    pub fn width(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max.x - self.min.x
        }
    }

    /// Height of the box (zero when empty).
    #[must_use]
    pub fn height(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max.y - self.min.y
        }
    }

    /// Grow the box so it contains `point`.
    #[must_use]
    pub fn including(self, point: Point) -> Self {
        Self {
            min: Point::new(self.min.x.min(point.x), self.min.y.min(point.y)),
            max: Point::new(self.max.x.max(point.x), self.max.y.max(point.y)),
        }
    }

    /// Smallest box containing both operands.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        if other.is_empty() {
            return self;
        }
        if self.is_empty() {
            return other;
        }
        self.including(other.min).including(other.max)
    }

    /// Translate the box by `(dx, dy)`. Empty boxes stay empty.
    #[must_use]
    pub fn translated(self, dx: f64, dy: f64) -> Self {
        if self.is_empty() {
            return self;
        }
        Self {
            min: self.min.offset(dx, dy),
            max: self.max.offset(dx, dy),
        }
    }

    /// Axis-aligned box around this box after applying `transform`.
    #[must_use]
    pub fn transformed(self, transform: &Transform) -> Self {
        if self.is_empty() {
            return self;
        }
        let corners = [
            self.min,
            Point::new(self.max.x, self.min.y),
            self.max,
            Point::new(self.min.x, self.max.y),
        ];
        corners
            .iter()
            .fold(Self::EMPTY, |acc, corner| acc.including(transform.apply(*corner)))
    }
}

/// A glyph outline made of contours.
///
/// For filled fonts every contour is a closed polygon; for stroke fonts every
/// contour is an open polyline. The font kind, not the outline, decides how a
/// renderer treats it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    /// The contours, each an ordered list of points.
    pub contours: Vec<Vec<Point>>,
}

impl Outline {
    /// Create an outline from its contours.
    #[must_use]
    pub const fn new(contours: Vec<Vec<Point>>) -> Self {
        Self { contours }
    }

    /// Whether the outline has no points at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contours.iter().all(Vec::is_empty)
    }

    /// Iterate over every point of every contour.
    pub fn points(&self) -> impl Iterator<Item = &Point> {
        self.contours.iter().flatten()
    }

    /// Bounding box of the outline.
    #[must_use]
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::from_points(self.points())
    }

    /// Apply `f` to every point in place.
    pub fn map_points(&mut self, mut f: impl FnMut(Point) -> Point) {
        for point in self.contours.iter_mut().flatten() {
            *point = f(*point);
        }
    }

    /// Translate every point by `(dx, dy)`.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.map_points(|point| point.offset(dx, dy));
    }

    /// Append the contours of `other` to this outline.
    pub fn extend(&mut self, other: Self) {
        self.contours.extend(other.contours);
    }
}

/// A 2D affine transform `p' = [a c; b d] p + [tx; ty]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Row 1, column 1.
    pub a: f64,
    /// Row 2, column 1.
    pub b: f64,
    /// Row 1, column 2.
    pub c: f64,
    /// Row 2, column 2.
    pub d: f64,
    /// Horizontal translation.
    pub tx: f64,
    /// Vertical translation.
    pub ty: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    /// Pure translation.
    #[must_use]
    pub const fn translation(tx: f64, ty: f64) -> Self {
        Self {
            tx,
            ty,
            ..Self::IDENTITY
        }
    }

    /// Counter-clockwise rotation by `angle` radians about the origin.
    #[must_use]
    pub fn rotation(angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            tx: 0.0,
            ty: 0.0,
        }
    }

    /// Transform applying `self` first, then `next`.
    #[must_use]
    pub fn then(&self, next: &Self) -> Self {
        Self {
            a: next.a * self.a + next.c * self.b,
            b: next.b * self.a + next.d * self.b,
            c: next.a * self.c + next.c * self.d,
            d: next.b * self.c + next.d * self.d,
            tx: next.a * self.tx + next.c * self.ty + next.tx,
            ty: next.b * self.tx + next.d * self.ty + next.ty,
        }
    }

    /// Apply the transform to a point.
    #[must_use]
    pub fn apply(&self, point: Point) -> Point {
        Point {
            x: self.a * point.x + self.c * point.y + self.tx,
            y: self.b * point.x + self.d * point.y + self.ty,
        }
    }
}
