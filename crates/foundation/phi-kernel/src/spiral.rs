//! GoldenSpiral - Logarithmic spiral geometry and the spiral distance metric
//!
//! r(θ) = a·φ^(2θ/π): the radius grows by φ every quarter turn.
//! Written as r = a·e^(bθ) the growth rate is b = ln φ / (π/2).

use crate::constants::{LN_PHI, PHI, SPIRAL_GROWTH};
use crate::coord::Coordinate;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// Ratio of arc length (measured from the centre) to radius: √(1+b²)/b
fn arc_factor() -> f64 {
    (1.0 + SPIRAL_GROWTH * SPIRAL_GROWTH).sqrt() / SPIRAL_GROWTH
}

/// A sample on the spiral in polar form
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpiralPoint {
    pub radius: f64,
    /// Angle in radians (not normalized; the spiral keeps winding)
    pub angle: f64,
}

impl SpiralPoint {
    /// Convert to planar Cartesian (x, y)
    pub fn to_cartesian(&self) -> (f64, f64) {
        (self.radius * self.angle.cos(), self.radius * self.angle.sin())
    }
}

/// Golden spiral with scale factor `a`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoldenSpiral {
    scale: f64,
}

impl GoldenSpiral {
    /// Unit spiral (a = 1)
    pub fn new() -> Self {
        Self { scale: 1.0 }
    }

    /// Spiral with scale `a`, which must be finite and positive
    pub fn with_scale(scale: f64) -> Result<Self> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(Error::DomainError(format!(
                "spiral scale must be finite and positive, got {}",
                scale
            )));
        }
        Ok(Self { scale })
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// r(θ) = a·φ^(2θ/π); tends to 0 as θ → -∞
    pub fn radius_at_angle(&self, theta: f64) -> f64 {
        self.scale * PHI.powf(2.0 * theta / PI)
    }

    /// Inverse of `radius_at_angle`
    pub fn angle_at_radius(&self, radius: f64) -> Result<f64> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(Error::DomainError(format!(
                "radius must be finite and positive, got {}",
                radius
            )));
        }
        Ok(FRAC_PI_2 * (radius / self.scale).ln() / LN_PHI)
    }

    /// Arc length from the spiral centre to angle θ: L(θ) = r(θ)·√(1+b²)/b
    pub fn arc_length(&self, theta: f64) -> f64 {
        self.radius_at_angle(theta) * arc_factor()
    }

    /// Arc length along the spiral between two angles
    pub fn arc_length_between(&self, theta_a: f64, theta_b: f64) -> f64 {
        (self.arc_length(theta_b) - self.arc_length(theta_a)).abs()
    }

    /// Separation of two planar points
    ///
    /// Radial part: spiral arc between the two radii, k·|r₁ - r₂|.
    /// Angular part: circular arc at the mean radius over the wrapped
    /// angle difference. The two are combined as a Euclidean 2-vector.
    ///
    /// Finite whenever both planar radii and the result fit in an `f64`.
    pub fn plane_separation(&self, a: (f64, f64), b: (f64, f64)) -> f64 {
        let (r1, alpha1) = to_polar(a);
        let (r2, alpha2) = to_polar(b);

        let radial = arc_factor() * (r1 - r2).abs();
        let angular = (0.5 * r1 + 0.5 * r2) * angle_diff(alpha1, alpha2);

        radial.hypot(angular)
    }

    /// Spiral distance between two 4D points
    ///
    /// Plane A = (axis₁, axis₂), plane B = (axis₃, axis₄). The planar
    /// separations are combined as a Euclidean 2-vector. Symmetric,
    /// non-negative, and zero only when both planar projections coincide.
    pub fn distance_4d(&self, p1: &Coordinate, p2: &Coordinate) -> f64 {
        let [x1, y1, z1, w1] = p1.components();
        let [x2, y2, z2, w2] = p2.components();

        let plane_a = self.plane_separation((x1, y1), (x2, y2));
        let plane_b = self.plane_separation((z1, w1), (z2, w2));

        plane_a.hypot(plane_b)
    }

    /// `num_points` samples evenly spaced in angle from `start_angle` to
    /// `end_angle`, both ends included
    pub fn spiral_path_points(
        &self,
        start_angle: f64,
        end_angle: f64,
        num_points: usize,
    ) -> Result<Vec<SpiralPoint>> {
        if num_points < 2 {
            return Err(Error::DomainError(format!(
                "a spiral path needs at least 2 points, got {}",
                num_points
            )));
        }
        if !start_angle.is_finite() || !end_angle.is_finite() {
            return Err(Error::DomainError(format!(
                "path angles must be finite, got {} and {}",
                start_angle, end_angle
            )));
        }

        let step = (end_angle - start_angle) / (num_points - 1) as f64;
        let points = (0..num_points)
            .map(|i| {
                let angle = if i == num_points - 1 {
                    end_angle
                } else {
                    start_angle + step * i as f64
                };
                SpiralPoint {
                    radius: self.radius_at_angle(angle),
                    angle,
                }
            })
            .collect();

        Ok(points)
    }
}

impl Default for GoldenSpiral {
    fn default() -> Self {
        Self::new()
    }
}

fn to_polar((x, y): (f64, f64)) -> (f64, f64) {
    (x.hypot(y), y.atan2(x))
}

/// Shortest angular difference in [0, π] for angles in [-π, π]
fn angle_diff(a: f64, b: f64) -> f64 {
    let diff = (a - b).abs();
    if diff > PI {
        TAU - diff
    } else {
        diff
    }
}
