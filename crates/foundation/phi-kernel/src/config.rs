//! KernelConfig - Tunables for building a `GoldenKernel`

use crate::binning::DEFAULT_MAX_BINS;
use crate::constants::MAX_FIBONACCI_INDEX;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Kernel configuration
///
/// Every field has a default, so partial config files are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    /// Spiral scale `a` in r(θ) = a·φ^(2θ/π) (default: 1.0)
    pub spiral_scale: f64,

    /// Maximum bins a single range query may return (default: 512)
    pub max_bins: u32,

    /// Fibonacci terms cached eagerly at startup (default: 32)
    pub fibonacci_prefetch: usize,
}

impl KernelConfig {
    /// Check every field against its valid domain
    pub fn validate(&self) -> Result<()> {
        if !self.spiral_scale.is_finite() || self.spiral_scale <= 0.0 {
            return Err(Error::DomainError(format!(
                "spiral_scale must be finite and positive, got {}",
                self.spiral_scale
            )));
        }
        if self.max_bins == 0 {
            return Err(Error::DomainError("max_bins must be at least 1".into()));
        }
        if self.fibonacci_prefetch > MAX_FIBONACCI_INDEX + 1 {
            return Err(Error::DomainError(format!(
                "fibonacci_prefetch {} exceeds {} representable terms",
                self.fibonacci_prefetch,
                MAX_FIBONACCI_INDEX + 1
            )));
        }
        Ok(())
    }
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            spiral_scale: 1.0,
            max_bins: DEFAULT_MAX_BINS,
            fibonacci_prefetch: 32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = KernelConfig::default();
        assert_eq!(config.spiral_scale, 1.0);
        assert_eq!(config.max_bins, 512);
        assert_eq!(config.fibonacci_prefetch, 32);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let bad_scale = KernelConfig {
            spiral_scale: 0.0,
            ..Default::default()
        };
        assert!(bad_scale.validate().is_err());

        let bad_bins = KernelConfig {
            max_bins: 0,
            ..Default::default()
        };
        assert!(bad_bins.validate().is_err());

        let bad_prefetch = KernelConfig {
            fibonacci_prefetch: 500,
            ..Default::default()
        };
        assert!(matches!(bad_prefetch.validate(), Err(Error::DomainError(_))));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: KernelConfig = serde_json::from_str(r#"{"spiral_scale": 2.0}"#).unwrap();
        assert_eq!(config.spiral_scale, 2.0);
        assert_eq!(config.max_bins, 512);
    }
}
