//! Axis-aligned rectangle with intersection, containment and tiling
//!
//! # Examples
//!
//! ```
//! use stitch_core::geometry::{Location, RectangleSize, Region};
//!
//! let mut viewport = Region::new(0, 0, 800, 600);
//! let element = Region::from_parts(Location::new(700, 500), RectangleSize::new(300, 300));
//!
//! viewport.intersect(&element);
//! assert_eq!(viewport, Region::new(700, 500, 100, 100));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Location, RectangleSize, tiling};
use crate::error::StitchResult;

/// A rectangle given by its top/left corner and its size
///
/// `Region` is a `Copy` value. The two mutating operations,
/// [`offset`](Region::offset) and [`intersect`](Region::intersect), change
/// the receiver in place; [`translated`](Region::translated) and
/// [`intersection`](Region::intersection) are their pure counterparts.
///
/// The all-zero region [`Region::EMPTY`] means "no region": it is what a
/// failed intersection produces, and what callers pass to request the
/// entire content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region {
    /// X coordinate of the left edge
    pub left: i32,
    /// Y coordinate of the top edge
    pub top: i32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Region {
    /// The canonical empty region `(0, 0, 0, 0)`
    pub const EMPTY: Region = Region {
        left: 0,
        top: 0,
        width: 0,
        height: 0,
    };

    /// Creates a region from explicit coordinates
    pub const fn new(left: i32, top: i32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Creates a region from its top/left corner and size
    pub const fn from_parts(location: Location, size: RectangleSize) -> Self {
        Self::new(location.x, location.y, size.width, size.height)
    }

    /// Returns true iff this is the canonical empty region
    pub fn is_empty(&self) -> bool {
        *self == Region::EMPTY
    }

    /// Returns true if both width and height are non-zero
    pub fn has_area(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// The top/left corner
    pub fn location(&self) -> Location {
        Location::new(self.left, self.top)
    }

    /// Moves the top/left corner, keeping the size
    pub fn set_location(&mut self, location: Location) {
        self.left = location.x;
        self.top = location.y;
    }

    /// The width and height
    pub fn size(&self) -> RectangleSize {
        RectangleSize::new(self.width, self.height)
    }

    /// X coordinate just past the right edge
    pub fn right(&self) -> i64 {
        self.left as i64 + self.width as i64
    }

    /// Y coordinate just past the bottom edge
    pub fn bottom(&self) -> i64 {
        self.top as i64 + self.height as i64
    }

    /// Offset of the region's center relative to its top/left corner
    pub fn middle_offset(&self) -> Location {
        Location::new((self.width / 2) as i32, (self.height / 2) as i32)
    }

    /// Translates the region in place
    pub fn offset(&mut self, dx: i32, dy: i32) {
        self.left += dx;
        self.top += dy;
    }

    /// Returns a copy translated by `(dx, dy)`
    pub fn translated(mut self, dx: i32, dy: i32) -> Self {
        self.offset(dx, dy);
        self
    }

    /// Returns true if `other` lies entirely inside this region
    ///
    /// Shared edges count as inside. The canonical empty region is only
    /// contained by the canonical empty region.
    pub fn contains(&self, other: &Region) -> bool {
        if other.is_empty() {
            return self.is_empty();
        }

        self.top <= other.top
            && self.left <= other.left
            && self.bottom() >= other.bottom()
            && self.right() >= other.right()
    }

    /// Returns true if `location` lies inside this region, edges included
    pub fn contains_location(&self, location: Location) -> bool {
        let (x, y) = (location.x as i64, location.y as i64);
        x >= self.left as i64 && x <= self.right() && y >= self.top as i64 && y <= self.bottom()
    }

    /// Returns true if the two regions overlap or touch at an edge
    pub fn is_intersected(&self, other: &Region) -> bool {
        let (left, top) = (self.left as i64, self.top as i64);
        let (right, bottom) = (self.right(), self.bottom());
        let (other_left, other_top) = (other.left as i64, other.top as i64);
        let (other_right, other_bottom) = (other.right(), other.bottom());

        ((left <= other_left && other_left <= right) || (other_left <= left && left <= other_right))
            && ((top <= other_top && other_top <= bottom)
                || (other_top <= top && top <= other_bottom))
    }

    /// Replaces this region with its intersection with `other`
    ///
    /// If the regions don't intersect, this becomes [`Region::EMPTY`].
    /// Regions that only touch produce a zero-width or zero-height region on
    /// the shared edge.
    pub fn intersect(&mut self, other: &Region) {
        if !self.is_intersected(other) {
            *self = Region::EMPTY;
            return;
        }

        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        self.left = left;
        self.top = top;
        self.width = (right - left as i64) as u32;
        self.height = (bottom - top as i64) as u32;
    }

    /// Returns the intersection of the two regions
    pub fn intersection(mut self, other: &Region) -> Self {
        self.intersect(other);
        self
    }

    /// Returns the sub-regions composing this region
    ///
    /// With `fixed_size == false` sub-regions may be smaller than `tile_size`
    /// at the right/bottom edges and never overlap. With `fixed_size == true`
    /// every sub-region has the same size and trailing ones overlap their
    /// neighbours. See [`tiling`](super::tiling).
    pub fn sub_regions(
        &self,
        tile_size: RectangleSize,
        fixed_size: bool,
    ) -> StitchResult<Vec<Region>> {
        if fixed_size {
            tiling::sub_regions_with_fixed_size(self, tile_size)
        } else {
            tiling::sub_regions_with_varying_size(self, tile_size)
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}) {}x{}", self.left, self.top, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_structural() {
        assert!(Region::EMPTY.is_empty());
        assert!(Region::default().is_empty());
        assert!(Region::new(0, 0, 0, 0).is_empty());
        assert!(!Region::new(1, 0, 0, 0).is_empty());
        assert!(!Region::new(0, 0, 0, 5).is_empty());
    }

    #[test]
    fn test_from_parts_roundtrip() {
        let region = Region::from_parts(Location::new(3, 4), RectangleSize::new(5, 6));
        assert_eq!(region, Region::new(3, 4, 5, 6));
        assert_eq!(region.location(), Location::new(3, 4));
        assert_eq!(region.size(), RectangleSize::new(5, 6));
        assert_eq!(region.right(), 8);
        assert_eq!(region.bottom(), 10);
    }

    #[test]
    fn test_offset_in_place() {
        let mut region = Region::new(10, 10, 20, 30);
        region.offset(-15, 5);
        assert_eq!(region, Region::new(-5, 15, 20, 30));

        let moved = region.translated(5, -15);
        assert_eq!(moved, Region::new(0, 0, 20, 30));
        assert_eq!(region, Region::new(-5, 15, 20, 30));
    }

    #[test]
    fn test_set_location_keeps_size() {
        let mut region = Region::new(1, 2, 3, 4);
        region.set_location(Location::new(9, 8));
        assert_eq!(region, Region::new(9, 8, 3, 4));
    }

    #[test]
    fn test_contains_self_and_inner() {
        let outer = Region::new(0, 0, 100, 100);
        assert!(outer.contains(&outer));
        assert!(outer.contains(&Region::new(10, 10, 90, 90)));
        assert!(!outer.contains(&Region::new(10, 10, 91, 90)));
        assert!(!outer.contains(&Region::new(-1, 0, 10, 10)));
    }

    #[test]
    fn test_contains_canonical_empty() {
        assert!(Region::EMPTY.contains(&Region::EMPTY));
        assert!(!Region::new(0, 0, 10, 10).contains(&Region::EMPTY));
        assert!(!Region::new(-5, -5, 10, 10).contains(&Region::EMPTY));
    }

    #[test]
    fn test_contains_location_inclusive() {
        let region = Region::new(0, 0, 10, 10);
        assert!(region.contains_location(Location::new(0, 0)));
        assert!(region.contains_location(Location::new(10, 10)));
        assert!(!region.contains_location(Location::new(11, 5)));
    }

    #[test]
    fn test_is_intersected_touching_edges() {
        let a = Region::new(0, 0, 10, 10);
        let b = Region::new(10, 0, 10, 10);
        assert!(a.is_intersected(&b));
        assert!(b.is_intersected(&a));

        let corner = Region::new(10, 10, 5, 5);
        assert!(a.is_intersected(&corner));

        let apart = Region::new(11, 0, 10, 10);
        assert!(!a.is_intersected(&apart));
    }

    #[test]
    fn test_intersect_overlap() {
        let mut a = Region::new(0, 0, 100, 100);
        a.intersect(&Region::new(50, 60, 100, 100));
        assert_eq!(a, Region::new(50, 60, 50, 40));
    }

    #[test]
    fn test_intersect_no_overlap_becomes_empty() {
        let mut a = Region::new(0, 0, 10, 10);
        a.intersect(&Region::new(20, 20, 5, 5));
        assert!(a.is_empty());
    }

    #[test]
    fn test_intersect_touching_has_no_area() {
        let a = Region::new(0, 0, 10, 10).intersection(&Region::new(10, 0, 10, 10));
        assert_eq!(a, Region::new(10, 0, 0, 10));
        assert!(!a.is_empty());
        assert!(!a.has_area());
    }

    #[test]
    fn test_intersect_is_commutative() {
        let cases = [
            (Region::new(0, 0, 100, 100), Region::new(50, 50, 100, 100)),
            (Region::new(-20, 5, 40, 10), Region::new(0, 0, 10, 100)),
            (Region::new(0, 0, 10, 10), Region::new(30, 30, 1, 1)),
            (Region::new(0, 0, 10, 10), Region::new(10, 10, 10, 10)),
        ];

        for (a, b) in cases {
            assert_eq!(a.intersection(&b), b.intersection(&a), "{} vs {}", a, b);
        }
    }

    #[test]
    fn test_intersect_with_contained_region() {
        let outer = Region::new(0, 0, 100, 100);
        let inner = Region::new(10, 20, 30, 40);
        assert_eq!(outer.intersection(&inner), inner);
    }

    #[test]
    fn test_middle_offset() {
        assert_eq!(Region::new(5, 5, 11, 20).middle_offset(), Location::new(5, 10));
    }

    #[test]
    fn test_display() {
        assert_eq!(Region::new(1, 2, 3, 4).to_string(), "(1, 2) 3x4");
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_value(Region::new(1, 2, 3, 4)).unwrap();
        assert_eq!(json["left"], 1);
        assert_eq!(json["top"], 2);
        assert_eq!(json["width"], 3);
        assert_eq!(json["height"], 4);
    }

    #[test]
    fn test_sub_regions_dispatches_on_policy() {
        let container = Region::new(0, 0, 25, 10);
        let tile = RectangleSize::new(10, 10);

        let varying = container.sub_regions(tile, false).unwrap();
        assert_eq!(varying.last(), Some(&Region::new(20, 0, 5, 10)));

        let fixed = container.sub_regions(tile, true).unwrap();
        assert_eq!(fixed.last(), Some(&Region::new(15, 0, 10, 10)));
    }
}
