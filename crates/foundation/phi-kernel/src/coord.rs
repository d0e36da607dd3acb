//! Coordinate - Validated point in 4-dimensional space

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A point in 4D space
///
/// The four axes carry no meaning inside the kernel; they are four
/// independent finite reals. Immutable once constructed: every
/// transformation returns a new `Coordinate`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 4]", into = "[f64; 4]")]
pub struct Coordinate {
    axes: [f64; 4],
}

impl Coordinate {
    /// Create a coordinate, rejecting NaN and infinite components
    pub fn new(x: f64, y: f64, z: f64, w: f64) -> Result<Self> {
        Self::from_array([x, y, z, w])
    }

    /// Create from an array of four components
    pub fn from_array(axes: [f64; 4]) -> Result<Self> {
        if let Some(i) = axes.iter().position(|v| !v.is_finite()) {
            return Err(Error::InvalidValue(format!(
                "axis {} is not finite: {}",
                i + 1,
                axes[i]
            )));
        }
        Ok(Self { axes })
    }

    /// Create from a slice, which must hold exactly four components
    pub fn from_slice(values: &[f64]) -> Result<Self> {
        let axes: [f64; 4] = values.try_into().map_err(|_| {
            Error::InvalidArgument(format!("expected 4 components, got {}", values.len()))
        })?;
        Self::from_array(axes)
    }

    /// The origin (0, 0, 0, 0)
    pub fn origin() -> Self {
        Self { axes: [0.0; 4] }
    }

    /// For fixed geometry whose components are finite by construction
    pub(crate) fn from_finite(axes: [f64; 4]) -> Self {
        Self { axes }
    }

    pub fn x(&self) -> f64 {
        self.axes[0]
    }

    pub fn y(&self) -> f64 {
        self.axes[1]
    }

    pub fn z(&self) -> f64 {
        self.axes[2]
    }

    pub fn w(&self) -> f64 {
        self.axes[3]
    }

    /// Component by zero-based axis index
    pub fn axis(&self, index: usize) -> Option<f64> {
        self.axes.get(index).copied()
    }

    /// All four components in axis order
    pub fn components(&self) -> [f64; 4] {
        self.axes
    }

    /// Euclidean norm sqrt(Σ axisᵢ²)
    pub fn magnitude(&self) -> f64 {
        self.axes.iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    /// Components as an owned vector, for generic vector math
    pub fn to_vector(&self) -> Vec<f64> {
        self.axes.to_vec()
    }

    /// Plain Euclidean distance to another coordinate
    pub fn euclidean_distance(&self, other: &Self) -> f64 {
        self.axes
            .iter()
            .zip(other.axes.iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f64>()
            .sqrt()
    }
}

impl Default for Coordinate {
    fn default() -> Self {
        Self::origin()
    }
}

impl TryFrom<[f64; 4]> for Coordinate {
    type Error = Error;

    fn try_from(axes: [f64; 4]) -> Result<Self> {
        Self::from_array(axes)
    }
}

impl From<Coordinate> for [f64; 4] {
    fn from(coord: Coordinate) -> Self {
        coord.axes
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [x, y, z, w] = self.axes;
        write!(f, "({}, {}, {}, {})", x, y, z, w)
    }
}
