//! Common types and utilities for the pursuit robot

use nalgebra::Point2;

/// A 2D pose: position plus heading in radians.
///
/// The motion engine keeps `heading` normalized to `[0, 2π)` at all
/// observable times.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    pub heading: f64,
}

impl Pose {
    /// Create a new pose
    pub fn new(x: f64, y: f64, heading: f64) -> Self {
        Pose { x, y, heading }
    }

    /// The position component as a point
    pub fn point(&self) -> Point2<f64> {
        Point2::new(self.x, self.y)
    }
}

/// Chase target on the pixel grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub x: i32,
    pub y: i32,
}

impl Target {
    /// Create a new target
    pub fn new(x: i32, y: i32) -> Self {
        Target { x, y }
    }

    /// The target as a point in continuous coordinates
    pub fn point(&self) -> Point2<f64> {
        Point2::new(self.x as f64, self.y as f64)
    }
}

/// Normalize an angle into `[0, 2π)`.
pub fn normalized_radians(angle: f64) -> f64 {
    let two_pi = 2.0 * std::f64::consts::PI;
    let mut angle = angle;
    while angle < 0.0 {
        angle += two_pi;
    }
    while angle >= two_pi {
        angle -= two_pi;
    }
    angle
}

/// Limit a value to the range `[min, max]`.
pub fn apply_limits(value: f64, min: f64, max: f64) -> f64 {
    if value < min {
        return min;
    }
    if value > max {
        return max;
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn normalized_radians_maps_into_range() {
        assert_eq!(normalized_radians(0.0), 0.0);
        assert!((normalized_radians(-PI / 2.0) - 3.0 * PI / 2.0).abs() < 1e-12);
        assert!(normalized_radians(2.0 * PI) < 1e-12);
        assert!((normalized_radians(7.0 * PI) - PI).abs() < 1e-9);
        assert!((normalized_radians(-0.1) - (2.0 * PI - 0.1)).abs() < 1e-12);
    }

    #[test]
    fn normalized_radians_leaves_in_range_values_alone() {
        for i in 0..64 {
            let angle = i as f64 * 0.098;
            if angle < 2.0 * PI {
                assert_eq!(normalized_radians(angle), angle);
            }
        }
    }

    #[test]
    fn apply_limits_clamps_both_ends() {
        assert_eq!(apply_limits(0.5, 0.0, 0.1), 0.1);
        assert_eq!(apply_limits(-0.5, 0.0, 0.1), 0.0);
        assert_eq!(apply_limits(0.05, 0.0, 0.1), 0.05);
        assert_eq!(apply_limits(-0.002, -0.001, 0.001), -0.001);
    }

    #[test]
    fn target_point_converts_to_continuous_coordinates() {
        let target = Target::new(150, 100);
        assert_eq!(target.point(), Point2::new(150.0, 100.0));
    }
}
