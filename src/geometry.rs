//! Screen-space geometry shared by the input core and its hosts
//!
//! All coordinates are integer screen pixels with the origin at the top-left.

/// A point in screen space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// Create a new point
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Component-wise difference `self - other`
    pub fn delta_from(self, other: Point) -> (i32, i32) {
        (self.x - other.x, self.y - other.y)
    }

    /// Largest per-axis distance to another point
    pub fn chebyshev_distance(self, other: Point) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }
}

/// Axis-aligned rectangle
///
/// `right()` and `bottom()` are the last pixel column/row that still belongs
/// to the rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// Create a new rectangle
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Last pixel column inside the rectangle
    pub fn right(&self) -> i32 {
        self.x + self.width - 1
    }

    /// Last pixel row inside the rectangle
    pub fn bottom(&self) -> i32 {
        self.y + self.height - 1
    }

    /// Check if a point is inside this rectangle
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    /// Rectangle moved by an offset
    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Get the center point of the rectangle
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2, self.y + self.height / 2)
    }
}
