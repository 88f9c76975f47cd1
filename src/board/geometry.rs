// Copyright (c) Handball Connect Team
// SPDX-License-Identifier: Apache-2.0

//! Arrow geometry for rendering movement and pass arrows.

use std::f32::consts::PI;

/// Half-angle between the shaft and each arrowhead wing.
const ARROW_WING_ANGLE: f32 = PI / 6.0;

/// Default wing length in view units.
pub const DEFAULT_ARROW_LENGTH: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// The two wing points of an arrowhead at the end of a shaft.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowHead {
    pub left: Point,
    pub right: Point,
}

/// Compute the arrowhead for a shaft from `start` to `end`: each wing sits
/// `length` away from `end`, rotated 30 degrees off the reverse direction.
pub fn arrow_head(start: Point, end: Point, length: f32) -> ArrowHead {
    let angle = (end.y - start.y).atan2(end.x - start.x);
    let wing = |offset: f32| {
        Point::new(
            end.x - length * (angle + offset).cos(),
            end.y - length * (angle + offset).sin(),
        )
    };
    ArrowHead {
        left: wing(-ARROW_WING_ANGLE),
        right: wing(ARROW_WING_ANGLE),
    }
}

/// The closed triangle path for the arrowhead: tip first, then both wings.
pub fn arrow_path(start: Point, end: Point, length: f32) -> [Point; 3] {
    let head = arrow_head(start, end, length);
    [end, head.left, head.right]
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn horizontal_arrow_wings_are_symmetric_about_the_shaft() {
        let end = Point::new(100.0, 0.0);
        let head = arrow_head(Point::new(0.0, 0.0), end, DEFAULT_ARROW_LENGTH);

        // Mirror images across y = 0.
        assert!((head.left.x - head.right.x).abs() < EPS);
        assert!((head.left.y + head.right.y).abs() < EPS);

        // Each wing point is exactly the configured length from the tip.
        assert!((head.left.distance(end) - DEFAULT_ARROW_LENGTH).abs() < EPS);
        assert!((head.right.distance(end) - DEFAULT_ARROW_LENGTH).abs() < EPS);

        // Wings trail behind the tip.
        assert!(head.left.x < end.x);
        assert!(head.right.x < end.x);
    }

    #[test]
    fn wing_length_holds_for_arbitrary_directions() {
        let start = Point::new(13.0, -7.5);
        let end = Point::new(-42.0, 88.0);
        let head = arrow_head(start, end, 12.5);
        assert!((head.left.distance(end) - 12.5).abs() < EPS);
        assert!((head.right.distance(end) - 12.5).abs() < EPS);
    }

    #[test]
    fn wings_open_at_thirty_degrees() {
        let start = Point::new(0.0, 0.0);
        let end = Point::new(100.0, 0.0);
        let head = arrow_head(start, end, DEFAULT_ARROW_LENGTH);
        // Expected wing offset from the tip at 30 degrees off the shaft.
        let expected_dx = DEFAULT_ARROW_LENGTH * (PI / 6.0).cos();
        let expected_dy = DEFAULT_ARROW_LENGTH * (PI / 6.0).sin();
        assert!((end.x - head.left.x - expected_dx).abs() < EPS);
        assert!((head.left.y.abs() - expected_dy).abs() < EPS);
    }

    #[test]
    fn path_starts_at_the_tip() {
        let start = Point::new(0.0, 0.0);
        let end = Point::new(10.0, 10.0);
        let path = arrow_path(start, end, 5.0);
        assert_eq!(path[0], end);
    }
}
