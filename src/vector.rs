/// Integer 2D vectors and axis-aligned boxes.
///
/// Pixel space: x grows to the right, y grows downward.

use std::ops::{Neg, Sub};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Vector2i {
    pub x: i32,
    pub y: i32,
}

impl Vector2i {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn dot(self, other: Vector2i) -> i32 {
        self.x * other.x + self.y * other.y
    }

    /// Counter-clockwise perpendicular, `(-y, x)`.
    pub fn perp(self) -> Vector2i {
        Vector2i::new(-self.y, self.x)
    }
}

impl Neg for Vector2i {
    type Output = Vector2i;

    fn neg(self) -> Vector2i {
        Vector2i::new(-self.x, -self.y)
    }
}

impl Sub for Vector2i {
    type Output = Vector2i;

    fn sub(self, rhs: Vector2i) -> Vector2i {
        Vector2i::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Axis-aligned box: top-left corner plus size.  Serves both as a draw
/// placement and as a collision shape.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// The same box moved by `offset`.
    pub fn offset(self, offset: Vector2i) -> Rect {
        Rect {
            x: self.x + offset.x,
            y: self.y + offset.y,
            ..self
        }
    }

    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }
}
