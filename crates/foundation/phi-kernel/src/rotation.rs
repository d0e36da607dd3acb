//! GoldenAngleRotator - Rotation by multiples of the golden angle
//!
//! Successive multiples of the golden angle never repeat modulo 2π, so
//! placing point k at k·(golden angle) spreads any prefix of points evenly
//! around a circle (the phyllotaxis arrangement of seeds in a sunflower).

use crate::constants::GOLDEN_ANGLE;
use crate::coord::Coordinate;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the six coordinate planes of 4D space
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plane {
    #[default]
    XY,
    XZ,
    XW,
    YZ,
    YW,
    ZW,
}

impl Plane {
    pub const ALL: [Plane; 6] = [
        Plane::XY,
        Plane::XZ,
        Plane::XW,
        Plane::YZ,
        Plane::YW,
        Plane::ZW,
    ];

    /// Zero-based axis indices spanning this plane, lower index first
    pub fn axes(&self) -> (usize, usize) {
        match self {
            Self::XY => (0, 1),
            Self::XZ => (0, 2),
            Self::XW => (0, 3),
            Self::YZ => (1, 2),
            Self::YW => (1, 3),
            Self::ZW => (2, 3),
        }
    }

    /// Plane spanned by two zero-based axis indices, in either order
    pub fn from_axes(a: usize, b: usize) -> Result<Self> {
        let pair = (a.min(b), a.max(b));
        Self::ALL
            .into_iter()
            .find(|plane| plane.axes() == pair)
            .ok_or_else(|| {
                Error::InvalidArgument(format!("axes ({}, {}) do not name a plane", a, b))
            })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::XY => "xy",
            Self::XZ => "xz",
            Self::XW => "xw",
            Self::YZ => "yz",
            Self::YW => "yw",
            Self::ZW => "zw",
        }
    }
}

impl fmt::Display for Plane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Plane {
    type Err = Error;

    /// Accepts axis letters ("xy", "WZ") or one-based axis digits ("12", "34")
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidArgument(format!("unknown plane '{}'", s));

        let mut chars = s.trim().chars();
        let (first, second) = match (chars.next(), chars.next(), chars.next()) {
            (Some(a), Some(b), None) => (a, b),
            _ => return Err(invalid()),
        };

        let axis = |c: char| match c.to_ascii_lowercase() {
            'x' | '1' => Some(0),
            'y' | '2' => Some(1),
            'z' | '3' => Some(2),
            'w' | '4' => Some(3),
            _ => None,
        };

        match (axis(first), axis(second)) {
            (Some(a), Some(b)) => Self::from_axes(a, b).map_err(|_| invalid()),
            _ => Err(invalid()),
        }
    }
}

/// Rotates points by whole multiples of the golden angle
#[derive(Debug, Clone, Copy)]
pub struct GoldenAngleRotator {
    angle: f64,
}

impl GoldenAngleRotator {
    pub fn new() -> Self {
        Self {
            angle: GOLDEN_ANGLE,
        }
    }

    /// The rotation step in radians
    pub fn golden_angle(&self) -> f64 {
        self.angle
    }

    /// Rotate (x, y) by `steps`·(golden angle); negative steps turn clockwise
    pub fn rotate_2d(&self, x: f64, y: f64, steps: i64) -> (f64, f64) {
        let (sin, cos) = (steps as f64 * self.angle).sin_cos();
        (x * cos - y * sin, x * sin + y * cos)
    }

    /// Rotate within one coordinate plane, leaving the other two axes untouched
    ///
    /// Fails with `InvalidValue` only if components near `f64::MAX` overflow.
    pub fn rotate_4d(&self, coord: &Coordinate, steps: i64, plane: Plane) -> Result<Coordinate> {
        let (i, j) = plane.axes();
        let mut axes = coord.components();
        let (a, b) = self.rotate_2d(axes[i], axes[j], steps);
        axes[i] = a;
        axes[j] = b;
        Coordinate::from_array(axes)
    }

    /// `count` points on a circle of `radius` around `center` in the (axis₁, axis₂) plane
    ///
    /// Point k sits at angle k·(golden angle).
    pub fn generate_optimal_distribution(
        &self,
        center: &Coordinate,
        radius: f64,
        count: usize,
    ) -> Result<Vec<Coordinate>> {
        self.generate_distribution_in_plane(center, radius, count, Plane::XY)
    }

    /// Golden-angle distribution in an arbitrary coordinate plane
    pub fn generate_distribution_in_plane(
        &self,
        center: &Coordinate,
        radius: f64,
        count: usize,
        plane: Plane,
    ) -> Result<Vec<Coordinate>> {
        if count < 1 {
            return Err(Error::DomainError("distribution needs at least one point".into()));
        }
        if !radius.is_finite() || radius < 0.0 {
            return Err(Error::DomainError(format!(
                "radius must be finite and non-negative, got {}",
                radius
            )));
        }

        let (i, j) = plane.axes();
        let base = center.components();

        (0..count)
            .map(|k| {
                let (dx, dy) = self.rotate_2d(radius, 0.0, k as i64);
                let mut axes = base;
                axes[i] += dx;
                axes[j] += dy;
                Coordinate::from_array(axes)
            })
            .collect()
    }
}

impl Default for GoldenAngleRotator {
    fn default() -> Self {
        Self::new()
    }
}
