//! Axis-aligned bounding boxes
//!
//! Pure functions for the broad overlap test and the minimum translation
//! needed to pull two overlapping boxes apart. Touching edges do not count
//! as an overlap, so a box moved by [`minimum_translation`] no longer
//! intersects the box it was separated from.

use crate::foundation::math::Vec2;

/// An axis-aligned rectangle, `min` is the top-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Smallest corner on both axes
    pub min: Vec2,
    /// Largest corner on both axes
    pub max: Vec2,
}

impl Aabb {
    /// Build a box from any two opposite corners
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        Self {
            min: Vec2::new(a.x.min(b.x), a.y.min(b.y)),
            max: Vec2::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Build a box from a corner and a (possibly negative) size
    pub fn from_position_size(position: Vec2, size: Vec2) -> Self {
        Self::from_corners(position, position + size)
    }

    /// Grow the box by half of `margin` on every side
    #[must_use]
    pub fn inflated(&self, margin: Vec2) -> Self {
        let half = margin / 2.0;
        Self::from_corners(self.min - half, self.max + half)
    }

    /// Move the box without changing its size
    #[must_use]
    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Width and height
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Overlap test, see [`is_intersecting`]
    pub fn intersects(&self, other: &Self) -> bool {
        is_intersecting(self, other)
    }
}

/// Whether two boxes share a region of non-zero area
pub fn is_intersecting(a: &Aabb, b: &Aabb) -> bool {
    a.max.x > b.min.x && a.min.x < b.max.x && a.max.y > b.min.y && a.min.y < b.max.y
}

/// Smallest axis-aligned displacement of `a` that separates it from `b`
///
/// Returns zero when the boxes do not overlap. Only one component of the
/// result is non-zero: the axis with the shallower penetration wins, and
/// the sign pushes `a` away from `b`.
pub fn minimum_translation(a: &Aabb, b: &Aabb) -> Vec2 {
    let left = b.min.x - a.max.x;
    let right = b.max.x - a.min.x;
    let top = b.min.y - a.max.y;
    let bottom = b.max.y - a.min.y;

    if left > 0.0 || right < 0.0 || top > 0.0 || bottom < 0.0 {
        return Vec2::zeros();
    }

    let x = if left.abs() < right { left } else { right };
    let y = if top.abs() < bottom { top } else { bottom };

    if x.abs() < y.abs() {
        Vec2::new(x, 0.0)
    } else {
        Vec2::new(0.0, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Aabb {
        Aabb::from_position_size(Vec2::new(x, y), Vec2::new(w, h))
    }

    #[test]
    fn test_negative_size_is_normalized() {
        let aabb = rect(10.0, 10.0, -4.0, -6.0);
        assert!(aabb.min.x <= aabb.max.x);
        assert!(aabb.min.y <= aabb.max.y);
        assert_relative_eq!(aabb.min, Vec2::new(6.0, 4.0));
    }

    #[test]
    fn test_intersection_is_symmetric() {
        let cases = [
            (rect(0.0, 0.0, 10.0, 10.0), rect(5.0, 5.0, 10.0, 10.0)),
            (rect(0.0, 0.0, 10.0, 10.0), rect(10.0, 0.0, 10.0, 10.0)),
            (rect(0.0, 0.0, 10.0, 10.0), rect(2.0, 2.0, 2.0, 2.0)),
            (rect(0.0, 0.0, 1.0, 1.0), rect(50.0, 50.0, 1.0, 1.0)),
        ];
        for (a, b) in cases {
            assert_eq!(is_intersecting(&a, &b), is_intersecting(&b, &a));
        }
    }

    #[test]
    fn test_touching_edges_do_not_intersect() {
        assert!(!rect(0.0, 0.0, 10.0, 10.0).intersects(&rect(10.0, 0.0, 5.0, 5.0)));
        assert!(rect(0.0, 0.0, 10.0, 10.0).intersects(&rect(9.5, 0.0, 5.0, 5.0)));
    }

    #[test]
    fn test_minimum_translation_picks_shallow_axis() {
        // `a` pokes 2 units into `b` from the left, 8 units vertically
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(8.0, 2.0, 10.0, 10.0);
        let mtd = minimum_translation(&a, &b);
        assert_relative_eq!(mtd, Vec2::new(-2.0, 0.0));
    }

    #[test]
    fn test_minimum_translation_pushes_down_when_below() {
        let a = rect(0.0, 9.0, 10.0, 10.0);
        let b = rect(0.0, 0.0, 10.0, 10.0);
        let mtd = minimum_translation(&a, &b);
        assert_relative_eq!(mtd, Vec2::new(0.0, 1.0));
    }

    #[test]
    fn test_minimum_translation_separates() {
        let b = rect(0.0, 0.0, 20.0, 20.0);
        let probes = [
            rect(-5.0, 3.0, 8.0, 8.0),
            rect(15.0, 15.0, 8.0, 8.0),
            rect(6.0, -4.0, 8.0, 8.0),
            rect(6.0, 6.0, 8.0, 8.0),
            rect(1.0, 18.5, 3.0, 3.0),
        ];
        for a in probes {
            assert!(a.intersects(&b));
            let moved = a.translated(minimum_translation(&a, &b));
            assert!(!moved.intersects(&b), "{a:?} still overlaps after correction");
        }
    }

    #[test]
    fn test_no_translation_without_overlap() {
        let mtd = minimum_translation(&rect(0.0, 0.0, 1.0, 1.0), &rect(5.0, 5.0, 1.0, 1.0));
        assert_relative_eq!(mtd, Vec2::zeros());
    }

    #[test]
    fn test_inflate_grows_symmetrically() {
        let inflated = rect(10.0, 10.0, 10.0, 10.0).inflated(Vec2::new(4.0, 2.0));
        assert_relative_eq!(inflated.min, Vec2::new(8.0, 9.0));
        assert_relative_eq!(inflated.max, Vec2::new(22.0, 21.0));
    }
}
