//! Quadratic Bezier helpers for corner rounding

use crate::common::types::Point3;

/// A quadratic Bezier segment
#[derive(Debug, Clone, Copy)]
pub struct QuadraticBezier {
    pub start: Point3,
    pub control: Point3,
    pub end: Point3,
}

impl QuadraticBezier {
    pub fn new(start: Point3, control: Point3, end: Point3) -> Self {
        QuadraticBezier {
            start,
            control,
            end,
        }
    }

    /// Evaluate the curve at `t` in [0, 1]
    pub fn point_at(&self, t: f64) -> Point3 {
        let u = 1.0 - t;
        self.start * (u * u) + self.control * (2.0 * u * t) + self.end * (t * t)
    }

    /// `count` evenly spaced points, both endpoints included
    pub fn sample(&self, count: usize) -> Vec<Point3> {
        match count {
            0 => Vec::new(),
            1 => vec![self.start],
            _ => {
                let last = (count - 1) as f64;
                (0..count).map(|i| self.point_at(i as f64 / last)).collect()
            }
        }
    }
}
