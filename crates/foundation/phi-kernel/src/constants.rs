//! Golden-ratio constants shared by every component

use std::f64::consts::{PI, TAU};

/// Golden ratio φ = (1 + √5) / 2
pub const PHI: f64 = 1.618_033_988_749_895;

/// 1/φ = φ - 1
pub const PHI_INV: f64 = PHI - 1.0;

/// √5 = 2φ - 1
pub const SQRT_5: f64 = 2.236_067_977_499_79;

/// ln φ
pub const LN_PHI: f64 = 0.481_211_825_059_603_47;

/// Golden angle in radians: (2 - φ)·2π = 2π/φ²
pub const GOLDEN_ANGLE: f64 = (2.0 - PHI) * TAU;

/// Golden angle in degrees: (2 - φ)·360°
pub const GOLDEN_ANGLE_DEGREES: f64 = (2.0 - PHI) * 360.0;

/// Growth rate b of the golden spiral r = a·e^(bθ), so that r grows by φ every quarter turn
pub const SPIRAL_GROWTH: f64 = LN_PHI / (PI / 2.0);

/// Highest Fibonacci index whose value fits in a `u128`
pub const MAX_FIBONACCI_INDEX: usize = 186;

/// Highest index for which Binet's formula in `f64` still rounds to the exact term
pub const BINET_EXACT_LIMIT: usize = 70;
