//! Plain geometric value types shared by the board, the sprite tree and renderers.

use std::ops::Add;

use serde::{Deserialize, Serialize};

/// Location expressed as a pair of coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point<T> {
    /// Horizontal coordinate.
    pub x: T,
    /// Vertical coordinate, growing downwards.
    pub y: T,
}

impl<T> Point<T> {
    /// Creates a point from its coordinates.
    #[must_use]
    pub const fn new(x: T, y: T) -> Self {
        Self { x, y }
    }
}

impl<T: Add<Output = T>> Point<T> {
    /// Returns the point displaced by the provided direction.
    #[must_use]
    pub fn offset(self, direction: Direction<T>) -> Self {
        Self {
            x: self.x + direction.dx,
            y: self.y + direction.dy,
        }
    }
}

impl Point<u32> {
    /// Computes the Manhattan distance between two board positions.
    #[must_use]
    pub fn manhattan_distance(self, other: Point<u32>) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Steps towards `direction`, returning `None` when the step would leave
    /// the non-negative quadrant.
    #[must_use]
    pub fn checked_step(self, direction: Direction<i32>) -> Option<Point<u32>> {
        let x = self.x.checked_add_signed(direction.dx)?;
        let y = self.y.checked_add_signed(direction.dy)?;
        Some(Point::new(x, y))
    }
}

/// Board coordinate of a single tile.
pub type BoardPos = Point<u32>;

/// Displacement between two points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Direction<T> {
    /// Horizontal displacement.
    pub dx: T,
    /// Vertical displacement.
    pub dy: T,
}

impl<T> Direction<T> {
    /// Creates a displacement from its components.
    #[must_use]
    pub const fn new(dx: T, dy: T) -> Self {
        Self { dx, dy }
    }
}

impl Direction<i32> {
    /// One step towards decreasing rows.
    pub const UP: Self = Self::new(0, -1);
    /// One step towards increasing rows.
    pub const DOWN: Self = Self::new(0, 1);
    /// One step towards decreasing columns.
    pub const LEFT: Self = Self::new(-1, 0);
    /// One step towards increasing columns.
    pub const RIGHT: Self = Self::new(1, 0);
}

/// Axis-aligned rectangle anchored at its upper-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rectangle<T> {
    /// Column of the upper-left corner.
    pub x: T,
    /// Row of the upper-left corner.
    pub y: T,
    /// Horizontal extent.
    pub width: T,
    /// Vertical extent.
    pub height: T,
}

impl<T> Rectangle<T> {
    /// Creates a rectangle from its corner and extent.
    #[must_use]
    pub const fn new(x: T, y: T, width: T, height: T) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

impl<T: Copy + PartialOrd + Add<Output = T>> Rectangle<T> {
    /// Reports whether the point lies inside the half-open rectangle.
    #[must_use]
    pub fn contains(&self, point: Point<T>) -> bool {
        point.x >= self.x
            && point.y >= self.y
            && point.x < self.x + self.width
            && point.y < self.y + self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_applies_displacement() {
        let moved = Point::new(3, 4).offset(Direction::LEFT);
        assert_eq!(moved, Point::new(2, 4));
    }

    #[test]
    fn checked_step_refuses_negative_coordinates() {
        assert_eq!(Point::new(0_u32, 2).checked_step(Direction::LEFT), None);
        assert_eq!(
            Point::new(0_u32, 2).checked_step(Direction::DOWN),
            Some(Point::new(0, 3))
        );
    }

    #[test]
    fn rectangle_contains_is_half_open() {
        let rect = Rectangle::new(1, 1, 2, 2);
        assert!(rect.contains(Point::new(1, 1)));
        assert!(rect.contains(Point::new(2, 2)));
        assert!(!rect.contains(Point::new(3, 2)));
        assert!(!rect.contains(Point::new(0, 1)));
    }

    #[test]
    fn manhattan_distance_is_symmetric() {
        let a = Point::new(1_u32, 5);
        let b = Point::new(4_u32, 1);
        assert_eq!(a.manhattan_distance(b), 7);
        assert_eq!(b.manhattan_distance(a), 7);
    }
}
