//! xorshift64* random number generator
//!
//! This is a fast, high-quality PRNG that is deterministic and suitable
//! for simulation purposes.
//!
//! # Algorithm
//!
//! xorshift64* is a variant of xorshift that passes TestU01's BigCrush
//! statistical tests. It uses 64-bit state and produces 64-bit output.
//!
//! # Determinism
//!
//! Same seed → same sequence of random numbers. This is CRITICAL for:
//! - Debugging (reproduce an exact negotiation or lending episode)
//! - Testing (verify behavior)
//! - Research (compare policies on identical randomness)
//!
//! # Distributions
//!
//! Continuous draws used by the environments are built on top of
//! [`RngManager::next_f64`]:
//! - uniform on `[low, high)`
//! - normal via Box-Muller
//! - log-normal as `exp(normal)`
//! - gamma via Marsaglia-Tsang (with the `shape < 1` boost)
//! - beta as `X / (X + Y)` for independent gammas

use serde::{Deserialize, Serialize};

/// Deterministic random number generator using xorshift64*
///
/// # Example
/// ```
/// use credit_negotiation_core::RngManager;
///
/// let mut rng = RngManager::new(12345);
/// let value = rng.next();
/// let range_value = rng.range(0, 100); // [0, 100)
/// assert!((0..100).contains(&range_value));
/// # let _ = value;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngManager {
    /// Internal state (64-bit)
    state: u64,
}

impl RngManager {
    /// Create a new RNG with given seed
    ///
    /// # Arguments
    /// * `seed` - Initial seed value (u64)
    pub fn new(seed: u64) -> Self {
        // Ensure seed is never zero (xorshift requirement)
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u64 value
    ///
    /// This advances the internal state and returns a random value.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> u64 {
        // xorshift64* algorithm
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    /// Generate random value in range [min, max)
    ///
    /// # Panics
    /// Panics if min >= max
    pub fn range(&mut self, min: i64, max: i64) -> i64 {
        assert!(min < max, "min must be less than max");

        let value = self.next();
        let range_size = (max - min) as u64;
        min + (value % range_size) as i64
    }

    /// Pick an index uniformly from `0..len`
    ///
    /// # Panics
    /// Panics if `len == 0`
    pub fn index(&mut self, len: usize) -> usize {
        self.range(0, len as i64) as usize
    }

    /// Get current RNG state (for checkpointing/replay)
    ///
    /// `RngManager::new(rng.get_state())` continues the exact same sequence.
    pub fn get_state(&self) -> u64 {
        self.state
    }

    /// Generate random f64 in range [0.0, 1.0)
    ///
    /// # Example
    /// ```
    /// use credit_negotiation_core::RngManager;
    ///
    /// let mut rng = RngManager::new(12345);
    /// let probability = rng.next_f64();
    /// assert!(probability >= 0.0 && probability < 1.0);
    /// ```
    pub fn next_f64(&mut self) -> f64 {
        let value = self.next();
        // Convert to [0.0, 1.0) by dividing by 2^53
        (value >> 11) as f64 * (1.0 / ((1u64 << 53) as f64))
    }

    /// Uniform draw on `[low, high)`
    pub fn uniform(&mut self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.next_f64()
    }

    /// Bernoulli trial: true with probability `p`
    ///
    /// `p <= 0` never fires, `p >= 1` always fires.
    pub fn bernoulli(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Standard normal sample via Box-Muller transform
    pub fn standard_normal(&mut self) -> f64 {
        // 1 - u keeps the log argument in (0, 1]
        let u1 = 1.0 - self.next_f64();
        let u2 = self.next_f64();
        (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
    }

    /// Normal sample with the given mean and standard deviation
    pub fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        mean + std_dev * self.standard_normal()
    }

    /// Log-normal sample, parameterized by the underlying normal
    pub fn lognormal(&mut self, mean: f64, std_dev: f64) -> f64 {
        self.normal(mean, std_dev).exp()
    }

    /// Gamma(shape, 1) sample (Marsaglia-Tsang)
    ///
    /// # Panics
    /// Panics if `shape <= 0`
    pub fn gamma(&mut self, shape: f64) -> f64 {
        assert!(shape > 0.0, "gamma shape must be positive");

        if shape < 1.0 {
            let u = 1.0 - self.next_f64();
            return self.gamma(shape + 1.0) * u.powf(1.0 / shape);
        }

        let d = shape - 1.0 / 3.0;
        let c = 1.0 / (9.0 * d).sqrt();
        loop {
            let x = self.standard_normal();
            let v = 1.0 + c * x;
            if v <= 0.0 {
                continue;
            }
            let v = v * v * v;
            let u = 1.0 - self.next_f64();
            if u.ln() < 0.5 * x * x + d - d * v + d * v.ln() {
                return d * v;
            }
        }
    }

    /// Beta(alpha, beta) sample in `[0, 1]`
    pub fn beta(&mut self, alpha: f64, beta: f64) -> f64 {
        let x = self.gamma(alpha);
        let y = self.gamma(beta);
        if x + y <= 0.0 {
            return 0.5;
        }
        x / (x + y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_seed_converted_to_nonzero() {
        let rng = RngManager::new(0);
        assert_ne!(rng.get_state(), 0, "Zero seed should be converted to 1");
    }

    #[test]
    #[should_panic(expected = "min must be less than max")]
    fn test_range_invalid_bounds() {
        let mut rng = RngManager::new(12345);
        rng.range(100, 50);
    }

    #[test]
    fn test_next_f64_in_range() {
        let mut rng = RngManager::new(12345);

        for _ in 0..1000 {
            let val = rng.next_f64();
            assert!(
                (0.0..1.0).contains(&val),
                "next_f64() produced value {} outside [0.0, 1.0)",
                val
            );
        }
    }

    #[test]
    fn test_uniform_respects_bounds() {
        let mut rng = RngManager::new(7);
        for _ in 0..1000 {
            let val = rng.uniform(0.7, 0.95);
            assert!((0.7..0.95).contains(&val));
        }
    }

    #[test]
    fn test_normal_moments() {
        let mut rng = RngManager::new(2024);
        let n = 20_000;
        let samples: Vec<f64> = (0..n).map(|_| rng.normal(1.0, 0.5)).collect();
        let mean = samples.iter().sum::<f64>() / n as f64;
        let var = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;

        assert!((mean - 1.0).abs() < 0.02, "mean {}", mean);
        assert!((var.sqrt() - 0.5).abs() < 0.02, "std {}", var.sqrt());
    }

    #[test]
    fn test_zero_std_normal_is_mean() {
        let mut rng = RngManager::new(3);
        for _ in 0..10 {
            assert_eq!(rng.normal(1.0, 0.0), 1.0);
        }
    }

    #[test]
    fn test_beta_mean() {
        // Beta(2, 10) has mean 2 / 12
        let mut rng = RngManager::new(11);
        let n = 20_000;
        let mean = (0..n).map(|_| rng.beta(2.0, 10.0)).sum::<f64>() / n as f64;
        assert!((mean - 2.0 / 12.0).abs() < 0.01, "mean {}", mean);
    }

    #[test]
    fn test_gamma_small_shape_positive() {
        let mut rng = RngManager::new(5);
        for _ in 0..1000 {
            assert!(rng.gamma(0.5) >= 0.0);
        }
    }

    #[test]
    fn test_bernoulli_extremes() {
        let mut rng = RngManager::new(9);
        for _ in 0..100 {
            assert!(!rng.bernoulli(0.0));
            assert!(rng.bernoulli(1.0));
        }
    }
}
