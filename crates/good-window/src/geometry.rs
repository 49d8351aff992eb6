//! Integer geometry and pixel-ratio conversions.
//!
//! Platform notifications report physical pixels; margins, masks and the
//! chrome constants are expressed in logical pixels. [`PixelRatio`] converts
//! between the two. All rectangles are integer and use *closed* containment:
//! a point on the last row or column of a rectangle is inside it.

use serde::{Deserialize, Serialize};

/// A point in integer pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: i32,
    /// Vertical coordinate.
    pub y: i32,
}

impl Point {
    /// Create a new point.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Offset the point by `(dx, dy)`.
    pub const fn translated(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// A size in integer pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Size {
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl Size {
    /// Create a new size.
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// A size with a non-positive dimension covers no pixels.
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

/// An axis-aligned integer rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl Rect {
    /// Create a new rectangle.
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from its origin and size.
    pub const fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    /// Create a rectangle from inclusive corner coordinates.
    pub const fn from_corners(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self::new(left, top, right - left + 1, bottom - top + 1)
    }

    /// Top-left corner.
    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Dimensions.
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Left edge (inclusive).
    pub const fn left(&self) -> i32 {
        self.x
    }

    /// Top edge (inclusive).
    pub const fn top(&self) -> i32 {
        self.y
    }

    /// Right edge (inclusive).
    pub const fn right(&self) -> i32 {
        self.x + self.width - 1
    }

    /// Bottom edge (inclusive).
    pub const fn bottom(&self) -> i32 {
        self.y + self.height - 1
    }

    /// A rectangle with a non-positive dimension covers no pixels.
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Center point (rounded toward the top-left).
    pub const fn center(&self) -> Point {
        Point::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Closed containment test.
    pub const fn contains(&self, point: Point) -> bool {
        !self.is_empty()
            && point.x >= self.left()
            && point.x <= self.right()
            && point.y >= self.top()
            && point.y <= self.bottom()
    }

    /// True when `other` lies entirely inside this rectangle.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        !other.is_empty() && self.contains(other.origin()) && self.contains(Point::new(other.right(), other.bottom()))
    }

    /// True when the two rectangles share at least one pixel.
    pub fn intersects(&self, other: &Rect) -> bool {
        !self.intersected(other).is_empty()
    }

    /// Grow or shrink each edge independently.
    ///
    /// Negative `dx1`/`dy1` move the left/top edges outwards, positive
    /// `dx2`/`dy2` move the right/bottom edges outwards.
    pub const fn adjusted(&self, dx1: i32, dy1: i32, dx2: i32, dy2: i32) -> Self {
        Self::new(
            self.x + dx1,
            self.y + dy1,
            self.width - dx1 + dx2,
            self.height - dy1 + dy2,
        )
    }

    /// Offset the rectangle by `(dx, dy)`.
    pub const fn translated(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Move the rectangle so that its top-left corner is `origin`.
    pub const fn moved_to(&self, origin: Point) -> Self {
        Self::new(origin.x, origin.y, self.width, self.height)
    }

    /// Move the rectangle so that its center is `center`, keeping its size.
    pub const fn centered_on(&self, center: Point) -> Self {
        Self::new(
            center.x - self.width / 2,
            center.y - self.height / 2,
            self.width,
            self.height,
        )
    }

    /// Intersection of two rectangles (empty when disjoint).
    pub fn intersected(&self, other: &Rect) -> Rect {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = (self.x + self.width).min(other.x + other.width);
        let bottom = (self.y + self.height).min(other.y + other.height);
        if right <= left || bottom <= top {
            Rect::default()
        } else {
            Rect::new(left, top, right - left, bottom - top)
        }
    }

    /// Bounding rectangle of both rectangles; empty inputs are ignored.
    pub fn united(&self, other: &Rect) -> Rect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let left = self.x.min(other.x);
        let top = self.y.min(other.y);
        let right = (self.x + self.width).max(other.x + other.width);
        let bottom = (self.y + self.height).max(other.y + other.height);
        Rect::new(left, top, right - left, bottom - top)
    }
}

/// Logical margins reserved for the custom title bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Margins {
    /// Height of the title bar band.
    pub title_bar_height: i32,
    /// Width of the window icon / system-menu zone at the left of the title bar.
    pub icon_width: i32,
    /// Width of the left widget zone of the title bar.
    pub left_margin: i32,
    /// Width of the right widget zone of the title bar.
    pub right_margin: i32,
}

impl Margins {
    /// Create a new margin set, clamping negative values to zero.
    pub fn new(title_bar_height: i32, icon_width: i32, left_margin: i32, right_margin: i32) -> Self {
        Self {
            title_bar_height: title_bar_height.max(0),
            icon_width: icon_width.max(0),
            left_margin: left_margin.max(0),
            right_margin: right_margin.max(0),
        }
    }
}

/// A set of rectangles with closed containment.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Region {
    rects: Vec<Rect>,
}

impl Region {
    /// An empty region.
    pub fn new() -> Self {
        Self::default()
    }

    /// A region made of a single rectangle.
    pub fn from_rect(rect: Rect) -> Self {
        Self::from_rects([rect])
    }

    /// A region made of several rectangles; empty rectangles are dropped.
    pub fn from_rects(rects: impl IntoIterator<Item = Rect>) -> Self {
        Self {
            rects: rects.into_iter().filter(|r| !r.is_empty()).collect(),
        }
    }

    /// Add a rectangle to the region.
    pub fn add(&mut self, rect: Rect) {
        if !rect.is_empty() {
            self.rects.push(rect);
        }
    }

    /// True when the region covers no pixel.
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// The rectangles making up the region.
    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    /// Closed containment test against every rectangle.
    pub fn contains(&self, point: Point) -> bool {
        self.rects.iter().any(|r| r.contains(point))
    }

    /// Bounding rectangle of the whole region.
    pub fn bounding_rect(&self) -> Rect {
        self.rects
            .iter()
            .fold(Rect::default(), |acc, r| acc.united(r))
    }
}

impl From<Rect> for Region {
    fn from(rect: Rect) -> Self {
        Self::from_rect(rect)
    }
}

/// Device pixel ratio of the monitor a window is on.
///
/// `1.0` is a standard-density display, `2.0` a 200% HiDPI display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelRatio(f64);

impl Default for PixelRatio {
    fn default() -> Self {
        Self(1.0)
    }
}

impl PixelRatio {
    /// Create a pixel ratio; non-finite or non-positive values fall back to 1.0.
    pub fn new(ratio: f64) -> Self {
        if ratio.is_finite() && ratio > 0.0 {
            Self(ratio)
        } else {
            Self(1.0)
        }
    }

    /// Raw scale factor.
    pub fn get(self) -> f64 {
        self.0
    }

    /// Convert a logical length to physical pixels.
    pub fn to_physical(self, logical: i32) -> i32 {
        (logical as f64 * self.0).round() as i32
    }

    /// Convert a physical length to logical pixels.
    pub fn to_logical(self, physical: i32) -> i32 {
        (physical as f64 / self.0).round() as i32
    }

    /// Convert a logical point to physical pixels.
    pub fn point_to_physical(self, p: Point) -> Point {
        Point::new(self.to_physical(p.x), self.to_physical(p.y))
    }

    /// Convert a physical point to logical pixels.
    pub fn point_to_logical(self, p: Point) -> Point {
        Point::new(self.to_logical(p.x), self.to_logical(p.y))
    }

    /// Convert a logical rectangle to physical pixels.
    pub fn rect_to_physical(self, r: Rect) -> Rect {
        Rect::new(
            self.to_physical(r.x),
            self.to_physical(r.y),
            self.to_physical(r.width),
            self.to_physical(r.height),
        )
    }

    /// Convert a physical rectangle to logical pixels.
    pub fn rect_to_logical(self, r: Rect) -> Rect {
        Rect::new(
            self.to_logical(r.x),
            self.to_logical(r.y),
            self.to_logical(r.width),
            self.to_logical(r.height),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_closed_containment() {
        let rect = Rect::new(770, 0, 30, 30);
        assert!(rect.contains(Point::new(770, 0)));
        assert!(rect.contains(Point::new(799, 29)));
        assert!(!rect.contains(Point::new(800, 29)));
        assert!(!rect.contains(Point::new(769, 0)));
        assert!(!Rect::new(0, 0, 0, 10).contains(Point::new(0, 0)));
    }

    #[test]
    fn test_rect_edges() {
        let rect = Rect::new(0, 0, 800, 600);
        assert_eq!(rect.right(), 799);
        assert_eq!(rect.bottom(), 599);
        assert_eq!(Rect::from_corners(0, 0, 799, 599), rect);
        assert_eq!(rect.center(), Point::new(400, 300));
    }

    #[test]
    fn test_rect_adjusted() {
        let rect = Rect::new(100, 100, 200, 100);
        assert_eq!(rect.adjusted(-10, -10, 10, 10), Rect::new(90, 90, 220, 120));
    }

    #[test]
    fn test_rect_intersection_and_union() {
        let a = Rect::new(0, 0, 100, 100);
        let b = Rect::new(50, 50, 100, 100);
        assert_eq!(a.intersected(&b), Rect::new(50, 50, 50, 50));
        assert_eq!(a.united(&b), Rect::new(0, 0, 150, 150));

        let c = Rect::new(200, 200, 10, 10);
        assert!(a.intersected(&c).is_empty());
        assert!(!a.intersects(&c));
        assert_eq!(Rect::default().united(&c), c);
    }

    #[test]
    fn test_rect_centered_on() {
        let rect = Rect::new(0, 0, 200, 100).centered_on(Point::new(500, 500));
        assert_eq!(rect, Rect::new(400, 450, 200, 100));
    }

    #[test]
    fn test_region() {
        let mut region = Region::from_rect(Rect::new(0, 0, 10, 10));
        region.add(Rect::new(20, 0, 10, 10));
        region.add(Rect::new(0, 0, 0, 0));
        assert_eq!(region.rects().len(), 2);
        assert!(region.contains(Point::new(25, 5)));
        assert!(!region.contains(Point::new(15, 5)));
        assert_eq!(region.bounding_rect(), Rect::new(0, 0, 30, 10));
    }

    #[test]
    fn test_pixel_ratio_conversions() {
        let ratio = PixelRatio::new(1.5);
        assert_eq!(ratio.to_physical(10), 15);
        assert_eq!(ratio.to_logical(15), 10);
        assert_eq!(
            ratio.rect_to_physical(Rect::new(0, 0, 100, 30)),
            Rect::new(0, 0, 150, 45)
        );
        assert_eq!(PixelRatio::new(0.0).get(), 1.0);
        assert_eq!(PixelRatio::new(f64::NAN).get(), 1.0);
    }

    #[test]
    fn test_margins_clamp() {
        let margins = Margins::new(-1, 20, -5, 100);
        assert_eq!(margins.title_bar_height, 0);
        assert_eq!(margins.left_margin, 0);
        assert_eq!(margins.icon_width, 20);
    }
}
