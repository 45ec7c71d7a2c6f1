//! Canvas-space geometry: points, vectors and axis-aligned bounds.

use std::ops::Sub;

use serde::{Deserialize, Serialize};

/// A position in canvas pixel space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X position (pixels from left).
    pub x: f32,
    /// Y position (pixels from top).
    pub y: f32,
}

impl Point {
    /// Create a point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Return this point shifted by a vector.
    #[must_use]
    pub fn offset(self, by: Vector) -> Self {
        Self::new(self.x + by.dx, self.y + by.dy)
    }
}

impl Sub for Point {
    type Output = Vector;

    fn sub(self, rhs: Self) -> Vector {
        Vector::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A signed displacement in canvas space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    /// Horizontal component.
    pub dx: f32,
    /// Vertical component.
    pub dy: f32,
}

impl Vector {
    /// The zero vector.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Create a vector.
    #[must_use]
    pub const fn new(dx: f32, dy: f32) -> Self {
        Self { dx, dy }
    }

    /// Euclidean norm.
    #[must_use]
    pub fn length(self) -> f32 {
        self.dx.hypot(self.dy)
    }
}

/// An axis-aligned rectangle with non-negative width and height.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width, never negative.
    pub width: f32,
    /// Height, never negative.
    pub height: f32,
}

impl Bounds {
    /// Build normalized bounds from an anchor and a signed extent.
    ///
    /// A drag up and to the left yields a negative extent; the resulting box
    /// still covers the same area.
    #[must_use]
    pub fn from_extent(origin: Point, extent: Vector) -> Self {
        Self {
            x: origin.x.min(origin.x + extent.dx),
            y: origin.y.min(origin.y + extent.dy),
            width: extent.dx.abs(),
            height: extent.dy.abs(),
        }
    }

    /// Replace a zero width or height with `min`.
    #[must_use]
    pub fn with_min_extent(mut self, min: f32) -> Self {
        if self.width < f32::EPSILON {
            self.width = min;
        }
        if self.height < f32::EPSILON {
            self.height = min;
        }
        self
    }

    /// Grow the box by `margin` on every side.
    #[must_use]
    pub fn expand(self, margin: f32) -> Self {
        Self {
            x: self.x - margin,
            y: self.y - margin,
            width: self.width + margin * 2.0,
            height: self.height + margin * 2.0,
        }
    }

    /// Inclusive containment test.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }
}
