use std::ops::{Add, Neg, Sub};

use serde::{Deserialize, Serialize};

/// A pixel position or extent in screen space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Point {
    type Output = Point;

    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

/// Axis-aligned rectangle, inclusive of its left/top edge and exclusive of
/// its right/bottom edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rectangle {
    pub origin: Point,
    pub size: Point,
}

impl Rectangle {
    pub const fn new(origin: Point, size: Point) -> Self {
        Self { origin, size }
    }

    pub const fn from_xywh(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Point::new(width, height),
        }
    }

    pub fn left(&self) -> i32 {
        self.origin.x
    }

    pub fn top(&self) -> i32 {
        self.origin.y
    }

    pub fn right(&self) -> i32 {
        self.origin.x + self.size.x
    }

    pub fn bottom(&self) -> i32 {
        self.origin.y + self.size.y
    }

    pub fn is_empty(&self) -> bool {
        self.size.x <= 0 || self.size.y <= 0
    }

    pub fn contains(&self, pos: Point) -> bool {
        !self.is_empty()
            && pos.x >= self.left()
            && pos.x < self.right()
            && pos.y >= self.top()
            && pos.y < self.bottom()
    }

    /// Returns the same rectangle moved by `offset`.
    pub fn translate(&self, offset: Point) -> Rectangle {
        Rectangle::new(self.origin + offset, self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_half_open() {
        let rect = Rectangle::from_xywh(10, 10, 20, 5);
        assert!(rect.contains(Point::new(10, 10)));
        assert!(rect.contains(Point::new(29, 14)));
        assert!(!rect.contains(Point::new(30, 10)));
        assert!(!rect.contains(Point::new(10, 15)));
    }

    #[test]
    fn empty_rect_contains_nothing() {
        let rect = Rectangle::from_xywh(0, 0, 0, 10);
        assert!(!rect.contains(Point::ORIGIN));
    }

    #[test]
    fn translate_moves_origin_only() {
        let rect = Rectangle::from_xywh(1, 2, 3, 4).translate(Point::new(10, 20));
        assert_eq!(rect, Rectangle::from_xywh(11, 22, 3, 4));
    }
}
