//! Centripetal Catmull-Rom curve through a set of control points

use crate::common::types::Point3;
use crate::common::EngineError;

/// Knot spacings below this are treated as degenerate
const MIN_KNOT_SPACING: f64 = 1e-4;

/// Open centripetal Catmull-Rom spline.
///
/// The curve parameter in [0, 1] is spread uniformly over the segments, so
/// every segment takes the same share regardless of its length. An
/// [`ArcLengthTable`] maps distance along the curve back to the parameter.
#[derive(Debug, Clone)]
pub struct CatmullRomCurve {
    points: Vec<Point3>,
}

/// Cubic Hermite coefficients of one segment
struct Segment {
    c0: Point3,
    c1: Point3,
    c2: Point3,
    c3: Point3,
}

impl Segment {
    fn position(&self, w: f64) -> Point3 {
        self.c0 + self.c1 * w + self.c2 * (w * w) + self.c3 * (w * w * w)
    }

    fn derivative(&self, w: f64) -> Point3 {
        self.c1 + self.c2 * (2.0 * w) + self.c3 * (3.0 * w * w)
    }
}

impl CatmullRomCurve {
    pub fn new(points: Vec<Point3>) -> Result<Self, EngineError> {
        if points.len() < 2 {
            return Err(EngineError::InsufficientWaypoints {
                found: points.len(),
            });
        }
        Ok(CatmullRomCurve { points })
    }

    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    /// Position at `t`, clamped to [0, 1]
    pub fn point_at(&self, t: f64) -> Point3 {
        let (index, w) = self.locate(t);
        self.segment(index).position(w)
    }

    /// Unnormalised derivative at `t`, clamped to [0, 1].
    /// Falls back to the segment chord where the derivative vanishes.
    pub fn tangent_at(&self, t: f64) -> Point3 {
        let (index, w) = self.locate(t);
        let derivative = self.segment(index).derivative(w);
        if derivative.norm_squared() > f64::EPSILON {
            derivative
        } else {
            self.points[index + 1] - self.points[index]
        }
    }


    /// Segment index and local weight for a curve parameter
    fn locate(&self, t: f64) -> (usize, f64) {
        let t = t.clamp(0.0, 1.0);
        let last_segment = self.points.len() - 2;
        let p = (self.points.len() - 1) as f64 * t;
        let index = p.floor() as usize;
        if index > last_segment {
            (last_segment, 1.0)
        } else {
            (index, p - index as f64)
        }
    }

    fn segment(&self, index: usize) -> Segment {
        let n = self.points.len();
        let p1 = self.points[index];
        let p2 = self.points[index + 1];
        // Phantom points mirror the neighbour at the open ends
        let p0 = if index > 0 {
            self.points[index - 1]
        } else {
            p1 * 2.0 - p2
        };
        let p3 = if index + 2 < n {
            self.points[index + 2]
        } else {
            p2 * 2.0 - p1
        };

        let mut dt0 = (p1 - p0).norm_squared().powf(0.25);
        let mut dt1 = (p2 - p1).norm_squared().powf(0.25);
        let mut dt2 = (p3 - p2).norm_squared().powf(0.25);
        if dt1 < MIN_KNOT_SPACING {
            dt1 = 1.0;
        }
        if dt0 < MIN_KNOT_SPACING {
            dt0 = dt1;
        }
        if dt2 < MIN_KNOT_SPACING {
            dt2 = dt1;
        }

        let t1 = ((p1 - p0) / dt0 - (p2 - p0) / (dt0 + dt1) + (p2 - p1) / dt1) * dt1;
        let t2 = ((p2 - p1) / dt1 - (p3 - p1) / (dt1 + dt2) + (p3 - p2) / dt2) * dt1;

        Segment {
            c0: p1,
            c1: t1,
            c2: p1 * -3.0 + p2 * 3.0 - t1 * 2.0 - t2,
            c3: p1 * 2.0 - p2 * 2.0 + t1 + t2,
        }
    }
}

/// Cumulative chord lengths at evenly spaced curve parameters.
///
/// Inverting the table turns a travelled fraction of the arc into the curve
/// parameter that reaches it, so equal progress steps cover equal distance.
#[derive(Debug, Clone)]
pub struct ArcLengthTable {
    lengths: Vec<f64>,
}

impl ArcLengthTable {
    pub fn new(curve: &CatmullRomCurve, divisions: usize) -> Self {
        let divisions = divisions.max(1);
        let mut lengths = Vec::with_capacity(divisions + 1);
        let mut last = curve.point_at(0.0);
        let mut total = 0.0;
        lengths.push(total);
        for i in 1..=divisions {
            let current = curve.point_at(i as f64 / divisions as f64);
            total += (current - last).norm();
            lengths.push(total);
            last = current;
        }
        ArcLengthTable { lengths }
    }

    /// Approximate length of the whole curve
    pub fn total(&self) -> f64 {
        self.lengths.last().copied().unwrap_or(0.0)
    }

    /// Curve parameter at which `fraction` of the arc length has been covered
    pub fn parameter_at(&self, fraction: f64) -> f64 {
        let fraction = fraction.clamp(0.0, 1.0);
        let divisions = self.lengths.len() - 1;
        let total = self.total();
        if total <= f64::EPSILON {
            return fraction;
        }

        let target = fraction * total;
        let upper = self.lengths.partition_point(|&l| l < target).clamp(1, divisions);
        let lower = upper - 1;
        let span = self.lengths[upper] - self.lengths[lower];
        let w = if span > 0.0 {
            (target - self.lengths[lower]) / span
        } else {
            0.0
        };
        (lower as f64 + w) / divisions as f64
    }
}
