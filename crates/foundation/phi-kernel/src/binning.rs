//! PhiExponentialBinner - Exponential bins with boundaries at powers of φ
//!
//! Bin i is the half-open interval [φⁱ, φⁱ⁺¹). Boundaries are computed on
//! demand, never stored.

use crate::constants::{LN_PHI, PHI};
use crate::{Error, Result};

/// Default upper bound on the number of bins a range query may return
pub const DEFAULT_MAX_BINS: u32 = 512;

/// φ raised to an integer bin boundary
fn phi_pow(exponent: f64) -> f64 {
    PHI.powf(exponent)
}

/// Maps positive reals to φ-exponential bin indices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhiExponentialBinner {
    max_bins: u32,
}

impl PhiExponentialBinner {
    pub fn new(max_bins: u32) -> Self {
        Self { max_bins }
    }

    pub fn max_bins(&self) -> u32 {
        self.max_bins
    }

    /// Bin index ⌊log_φ(value)⌋; negative for values below 1
    ///
    /// The logarithm estimate is corrected against `get_bin_range`, so a
    /// value sitting exactly on a computed boundary φᵏ lands in bin k.
    pub fn get_bin(&self, value: f64) -> Result<i32> {
        if !value.is_finite() || value <= 0.0 {
            return Err(Error::DomainError(format!(
                "bin value must be finite and positive, got {}",
                value
            )));
        }

        let mut index = (value.ln() / LN_PHI).floor() as i32;
        while phi_pow(index as f64 + 1.0) <= value {
            index += 1;
        }
        while phi_pow(index as f64) > value {
            index -= 1;
        }
        Ok(index)
    }

    /// (φⁱᵈˣ, φⁱᵈˣ⁺¹): lower bound inclusive, upper exclusive
    pub fn get_bin_range(&self, index: i32) -> (f64, f64) {
        let lower = phi_pow(index as f64);
        let upper = phi_pow(index as f64 + 1.0);
        (lower, upper)
    }

    /// Geometric mean of the bin bounds, φ^(idx + 1/2)
    pub fn get_bin_center(&self, index: i32) -> f64 {
        phi_pow(index as f64 + 0.5)
    }

    /// Ordered bin indices whose ranges overlap [min_value, max_value]
    pub fn bins_in_range(&self, min_value: f64, max_value: f64) -> Result<Vec<i32>> {
        if !min_value.is_finite()
            || min_value <= 0.0
            || !max_value.is_finite()
            || min_value > max_value
        {
            return Err(Error::DomainError(format!(
                "invalid bin range [{}, {}]",
                min_value, max_value
            )));
        }

        let first = self.get_bin(min_value)?;
        let last = self.get_bin(max_value)?;

        let count = i64::from(last) - i64::from(first) + 1;
        if count > i64::from(self.max_bins) {
            return Err(Error::DomainError(format!(
                "range [{}, {}] spans {} bins, limit is {}",
                min_value, max_value, count, self.max_bins
            )));
        }

        Ok((first..=last).collect())
    }
}

impl Default for PhiExponentialBinner {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_BINS)
    }
}
