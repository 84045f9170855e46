/// Box-vs-box overlap test using GJK over the Minkowski difference.
///
/// Only strict interior overlap counts as a hit: boxes that merely share an
/// edge or a corner do not collide, and a box with zero width or height never
/// collides with anything.

use std::ops::{Neg, Sub};

use crate::vector::{Rect, Vector2i};

/// Lattice scale used to hand GJK the open interior of each box.
const LATTICE: i64 = 4;

/// Upper bound on refinement steps.  Box differences settle in a handful.
const MAX_ITERATIONS: u32 = 64;

/// Corner of `rect` farthest along `d`.  Zero components pick the far side.
pub fn support(rect: &Rect, d: Vector2i) -> Vector2i {
    let mut point = Vector2i::new(rect.x, rect.y);
    if d.x >= 0 {
        point.x += rect.w;
    }
    if d.y >= 0 {
        point.y += rect.h;
    }
    point
}

/// `true` iff the interiors of `a` and `b` intersect.
pub fn collides(a: &Rect, b: &Rect) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    gjk(&Lattice::interior(a), &Lattice::interior(b))
}

/// Lattice point.  Wide enough that dot products between boxes anywhere in
/// `i32` pixel space stay in range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Point {
    x: i64,
    y: i64,
}

impl Point {
    fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    fn dot(self, other: Point) -> i64 {
        self.x * other.x + self.y * other.y
    }

    fn perp(self) -> Point {
        Point::new(-self.y, self.x)
    }
}

impl Neg for Point {
    type Output = Point;

    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Box on the collision lattice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Lattice {
    x: i64,
    y: i64,
    w: i64,
    h: i64,
}

impl Lattice {
    /// `rect` scaled onto the lattice and inset by one unit on every side.
    /// Touching boxes end up two units apart; overlapping ones overlap by at
    /// least two.
    fn interior(rect: &Rect) -> Self {
        Lattice {
            x: i64::from(rect.x) * LATTICE + 1,
            y: i64::from(rect.y) * LATTICE + 1,
            w: i64::from(rect.w) * LATTICE - 2,
            h: i64::from(rect.h) * LATTICE - 2,
        }
    }

    /// Same rule as [`support`].
    fn support(&self, d: Point) -> Point {
        let mut point = Point::new(self.x, self.y);
        if d.x >= 0 {
            point.x += self.w;
        }
        if d.y >= 0 {
            point.y += self.h;
        }
        point
    }
}

/// Plain GJK: grow a triangle of Minkowski-difference points until it either
/// encloses the origin or a support point fails to pass it.
fn gjk(a: &Lattice, b: &Lattice) -> bool {
    let mut simplex = [Point::default(); 3];

    let mut d = Point::new(1, 0);
    let p = a.support(d);
    d.x = -1;
    let q = b.support(d);
    simplex[0] = p - q;

    d = simplex[0];
    let q = b.support(d);
    d = -d;
    let p = a.support(d);
    simplex[1] = p - q;

    if d.dot(simplex[1]) <= 0 {
        return false;
    }

    d = -simplex[1];

    for _ in 0..MAX_ITERATIONS {
        let p = a.support(d);
        let q = b.support(-d);
        simplex[2] = p - q;

        if d.dot(simplex[2]) <= 0 {
            return false;
        }

        match refine(&mut simplex) {
            Some(next) => d = next,
            None => return true,
        }
    }

    log::warn!("gjk gave up after {MAX_ITERATIONS} iterations: {a:?} vs {b:?}");
    false
}

/// Check the triangle `[c, b, a]` (newest point last) against the origin.
///
/// Returns `None` when the origin is enclosed.  Otherwise drops the vertex
/// opposite the edge the origin lies beyond and returns that edge's outward
/// normal as the next search direction.
fn refine(tri: &mut [Point; 3]) -> Option<Point> {
    let ao = -tri[2];

    let ab = tri[1] - tri[2];
    let mut d = ab.perp();
    if d.dot(tri[0]) > 0 {
        d = -d;
    }
    if d.dot(ao) > 0 {
        tri[1] = tri[2];
        return Some(d);
    }

    let ac = tri[0] - tri[2];
    let mut d = ac.perp();
    if d.dot(tri[1]) > 0 {
        d = -d;
    }
    if d.dot(ao) > 0 {
        tri[0] = tri[2];
        return Some(d);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn support_picks_corner_by_direction_sign() {
        let r = Rect::new(10, 20, 5, 7);
        assert_eq!(support(&r, Vector2i::new(1, 1)), Vector2i::new(15, 27));
        assert_eq!(support(&r, Vector2i::new(-1, -1)), Vector2i::new(10, 20));
        assert_eq!(support(&r, Vector2i::new(0, -3)), Vector2i::new(15, 20));
        assert_eq!(support(&r, Vector2i::new(-2, 0)), Vector2i::new(10, 27));
    }

    #[test]
    fn interior_is_inset_on_lattice() {
        assert_eq!(
            Lattice::interior(&Rect::new(1, 2, 3, 4)),
            Lattice { x: 5, y: 9, w: 10, h: 14 }
        );
    }

    #[test]
    fn raw_gjk_reports_overlap_and_separation() {
        let lattice = |x, y| Lattice { x, y, w: 10, h: 10 };
        assert!(gjk(&lattice(0, 0), &lattice(5, 5)));
        assert!(!gjk(&lattice(0, 0), &lattice(20, 0)));
    }
}
