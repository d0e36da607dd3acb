//! FibonacciSequence - Exact Fibonacci terms with a shared growable cache
//!
//! The cache only ever grows. Readers take a shared lock; the write lock is
//! held only while new terms are appended.

use crate::constants::{BINET_EXACT_LIMIT, MAX_FIBONACCI_INDEX, PHI, SQRT_5};
use crate::{Error, Result};
use std::sync::{PoisonError, RwLock};

/// Fibonacci sequence F(0)=0, F(1)=1, F(n)=F(n-1)+F(n-2)
///
/// Terms are exact `u128` values up to `MAX_FIBONACCI_INDEX`.
/// The instance is `Sync`: share it by reference (or `Arc`) across threads.
#[derive(Debug)]
pub struct FibonacciSequence {
    cache: RwLock<Vec<u128>>,
}

impl FibonacciSequence {
    /// Create a sequence holding only F(0) and F(1)
    pub fn new() -> Self {
        Self {
            cache: RwLock::new(vec![0, 1]),
        }
    }

    /// Create a sequence with the first `terms` values cached eagerly
    pub fn with_prefetch(terms: usize) -> Result<Self> {
        if terms > MAX_FIBONACCI_INDEX + 1 {
            return Err(Error::DomainError(format!(
                "cannot prefetch {} terms, at most {} are representable",
                terms,
                MAX_FIBONACCI_INDEX + 1
            )));
        }
        let seq = Self::new();
        if terms > 0 {
            seq.ensure(terms - 1);
        }
        Ok(seq)
    }

    /// The n-th Fibonacci number
    pub fn get(&self, n: i64) -> Result<u128> {
        let index = Self::checked_index(n)?;
        self.ensure(index);
        Ok(self.read_cache()[index])
    }

    /// F(start)..=F(end) in order
    pub fn get_range(&self, start: i64, end: i64) -> Result<Vec<u128>> {
        if start > end {
            return Err(Error::DomainError(format!(
                "range start {} is after end {}",
                start, end
            )));
        }
        let first = Self::checked_index(start)?;
        let last = Self::checked_index(end)?;
        self.ensure(last);
        Ok(self.read_cache()[first..=last].to_vec())
    }

    /// Binet approximation round(φⁿ/√5)
    ///
    /// Does not touch the cache. Exact for n ≤ `BINET_EXACT_LIMIT` (70);
    /// beyond that the rounding error of `f64` exceeds 1 and the result
    /// only approximates F(n).
    pub fn approximate_with_phi(&self, n: i64) -> Result<u128> {
        let index = Self::checked_index(n)?;
        if index > BINET_EXACT_LIMIT {
            tracing::trace!(n, "binet approximation beyond exact range");
        }
        Ok((PHI.powf(index as f64) / SQRT_5).round() as u128)
    }

    /// Index n such that F(n) == target
    ///
    /// Estimates n from the inverse Binet formula and checks the five
    /// indices around the estimate. For target 1 the lowest index (1)
    /// is returned.
    pub fn find_index_for_value(&self, target: i128) -> Result<usize> {
        if target < 0 {
            return Err(Error::DomainError(format!(
                "negative value {} is never a Fibonacci number",
                target
            )));
        }

        let wanted = target as u128;
        let estimate = ((target as f64 * SQRT_5 + 0.5).ln() / PHI.ln()).round() as i64;
        let low = (estimate - 2).max(0) as usize;
        let high = ((estimate + 2).max(0) as usize).min(MAX_FIBONACCI_INDEX);

        if low <= high {
            self.ensure(high);
            let cache = self.read_cache();
            if let Some(index) = (low..=high).find(|&i| cache[i] == wanted) {
                return Ok(index);
            }
        }

        Err(Error::NotFound(format!("{} is not a Fibonacci number", target)))
    }

    /// Whether `value` appears in the sequence
    pub fn is_fibonacci(&self, value: i128) -> bool {
        self.find_index_for_value(value).is_ok()
    }

    /// Number of terms currently cached
    pub fn cached_len(&self) -> usize {
        self.read_cache().len()
    }

    fn checked_index(n: i64) -> Result<usize> {
        if n < 0 {
            return Err(Error::DomainError(format!(
                "Fibonacci index must be non-negative, got {}",
                n
            )));
        }
        let index = n as usize;
        if index > MAX_FIBONACCI_INDEX {
            return Err(Error::DomainError(format!(
                "Fibonacci index {} exceeds the representable maximum {}",
                n, MAX_FIBONACCI_INDEX
            )));
        }
        Ok(index)
    }

    /// Extend the cache so that `index` is present
    fn ensure(&self, index: usize) {
        if index < self.read_cache().len() {
            return;
        }

        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        // Another writer may have extended it while we waited
        let from = cache.len();
        while cache.len() <= index {
            let len = cache.len();
            let next = cache[len - 1] + cache[len - 2];
            cache.push(next);
        }
        if cache.len() > from {
            tracing::debug!(from, to = cache.len() - 1, "extended Fibonacci cache");
        }
    }

    fn read_cache(&self) -> std::sync::RwLockReadGuard<'_, Vec<u128>> {
        // Appends are whole pushes, so a poisoned cache is still consistent
        self.cache.read().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for FibonacciSequence {
    fn default() -> Self {
        Self::new()
    }
}
