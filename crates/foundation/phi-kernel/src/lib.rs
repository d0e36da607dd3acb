//! # phi-kernel
//!
//! Golden-ratio geometry kernel.
//!
//! Pure numeric building blocks over 4-dimensional points:
//! - `Coordinate`: validated 4-tuple of reals
//! - `FibonacciSequence`: cached exact Fibonacci terms with inverse lookup
//! - `GoldenSpiral`: logarithmic spiral r(θ) = a·φ^(2θ/π) and the spiral distance metric
//! - `GoldenAngleRotator`: golden-angle rotations and phyllotaxis sampling
//! - `PhiExponentialBinner`: exponential bins with boundaries at powers of φ
//! - `DodecahedralAnchors`: 12 fixed reference points with pentagonal clusters
//!
//! ```text
//! Coordinate ──► GoldenSpiral::distance_4d ──► DodecahedralAnchors
//!     │
//!     └────────► GoldenAngleRotator
//!
//! FibonacciSequence, PhiExponentialBinner  (standalone numeric utilities)
//! ```
//!
//! Nothing here performs I/O. Every component is safe to share across threads.

pub mod anchors;
pub mod binning;
pub mod config;
pub mod constants;
pub mod coord;
pub mod fibonacci;
pub mod rotation;
pub mod spiral;

pub use anchors::{AnchorMatch, DodecahedralAnchors, ANCHOR_COUNT, CLUSTER_NEIGHBORS};
pub use binning::PhiExponentialBinner;
pub use config::KernelConfig;
pub use constants::{GOLDEN_ANGLE, GOLDEN_ANGLE_DEGREES, PHI};
pub use coord::Coordinate;
pub use fibonacci::FibonacciSequence;
pub use rotation::{GoldenAngleRotator, Plane};
pub use spiral::{GoldenSpiral, SpiralPoint};

/// Result type for kernel operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by kernel operations
///
/// All are synchronous and final: the kernel never retries or clamps.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Argument outside the mathematically valid domain
    #[error("Domain error: {0}")]
    DomainError(String),

    /// Structurally invalid selector (e.g. unknown rotation plane)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Non-finite coordinate component
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// Lookup target does not exist
    #[error("Not found: {0}")]
    NotFound(String),
}

/// One instance of every kernel component, built from a `KernelConfig`.
///
/// Callers that only need a single component can construct it directly;
/// this is the convenience entry point for the query layer and the CLI.
#[derive(Debug)]
pub struct GoldenKernel {
    pub fibonacci: FibonacciSequence,
    pub spiral: GoldenSpiral,
    pub rotator: GoldenAngleRotator,
    pub binner: PhiExponentialBinner,
    pub anchors: DodecahedralAnchors,
}

impl GoldenKernel {
    /// Build every component from a validated configuration
    pub fn from_config(config: &KernelConfig) -> Result<Self> {
        config.validate()?;

        let spiral = GoldenSpiral::with_scale(config.spiral_scale)?;
        let anchors = DodecahedralAnchors::with_spiral(spiral);

        tracing::debug!(
            scale = config.spiral_scale,
            max_bins = config.max_bins,
            prefetch = config.fibonacci_prefetch,
            "golden kernel initialized"
        );

        Ok(Self {
            fibonacci: FibonacciSequence::with_prefetch(config.fibonacci_prefetch)?,
            spiral,
            rotator: GoldenAngleRotator::new(),
            binner: PhiExponentialBinner::new(config.max_bins),
            anchors,
        })
    }
}

impl Default for GoldenKernel {
    fn default() -> Self {
        Self {
            fibonacci: FibonacciSequence::new(),
            spiral: GoldenSpiral::new(),
            rotator: GoldenAngleRotator::new(),
            binner: PhiExponentialBinner::default(),
            anchors: DodecahedralAnchors::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_from_default_config() {
        let kernel = GoldenKernel::from_config(&KernelConfig::default()).unwrap();
        assert_eq!(kernel.spiral.scale(), 1.0);
        assert_eq!(kernel.binner.max_bins(), 512);
        assert!(kernel.fibonacci.cached_len() >= 32);
        assert_eq!(kernel.anchors.len(), ANCHOR_COUNT);
    }

    #[test]
    fn test_kernel_rejects_bad_scale() {
        let config = KernelConfig {
            spiral_scale: -1.0,
            ..KernelConfig::default()
        };
        assert!(matches!(
            GoldenKernel::from_config(&config),
            Err(Error::DomainError(_))
        ));
    }

    #[test]
    fn test_end_to_end_nearest_anchor() {
        let kernel = GoldenKernel::default();
        let point = Coordinate::new(0.5, 0.5, 0.5, 0.5).unwrap();

        let first = kernel.anchors.nearest_anchor(&point);
        let again = DodecahedralAnchors::new().nearest_anchor(&point);

        assert_eq!(first.id, 3);
        assert!((first.distance - 0.793_602_060_426_653_2).abs() < 1e-9);
        assert_eq!(first, again);
    }

    #[test]
    fn test_end_to_end_pipeline() {
        let kernel = GoldenKernel::default();

        // Fibonacci sizes the sample, the rotator spreads it, anchors classify it,
        // the binner buckets the distances.
        let count = kernel.fibonacci.get(6).unwrap() as usize;
        assert_eq!(count, 8);

        let center = Coordinate::origin();
        let points = kernel
            .rotator
            .generate_optimal_distribution(&center, 1.0, count)
            .unwrap();
        assert_eq!(points.len(), 8);

        for point in &points {
            let hit = kernel.anchors.nearest_anchor(point);
            assert!((1..=12).contains(&hit.id));
            assert!(hit.distance > 0.0);
            let bin = kernel.binner.get_bin(hit.distance).unwrap();
            let (lower, upper) = kernel.binner.get_bin_range(bin);
            assert!(lower <= hit.distance && hit.distance < upper);
        }
    }

    #[test]
    fn test_error_display() {
        let err = Error::NotFound("anchor 13".to_string());
        assert_eq!(err.to_string(), "Not found: anchor 13");
    }
}
