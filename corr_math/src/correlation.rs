//! Pearson correlation
//!
//! Contains the pairwise correlation coefficient used by every component of
//! the analytics engine:
//! - `pearson` for one-shot computation with a zero fallback
//! - `try_pearson` when the caller needs to know why no value was produced
//! - `RollingPearson` for a trailing fixed-size window fed point by point

use crate::statistics::mean;
use crate::{MathError, Result};
use std::collections::VecDeque;

/// Minimum number of paired samples before a correlation is computed
pub const MIN_SAMPLES: usize = 5;

/// Compute the Pearson correlation coefficient of two equal-length sequences.
///
/// Fails with `LengthMismatch`, `InsufficientData` (fewer than
/// [`MIN_SAMPLES`] pairs) or `ZeroVariance` (either sequence is constant).
/// The result is clamped to `[-1, 1]` to absorb floating point overshoot.
pub fn try_pearson(x: &[f64], y: &[f64]) -> Result<f64> {
    if x.len() != y.len() {
        return Err(MathError::LengthMismatch {
            left: x.len(),
            right: y.len(),
        });
    }
    if x.len() < MIN_SAMPLES {
        return Err(MathError::InsufficientData(format!(
            "Correlation needs at least {} samples, have {}.",
            MIN_SAMPLES,
            x.len()
        )));
    }

    let mean_x = mean(x)?;
    let mean_y = mean(y)?;

    let (cross, sum_sq_x, sum_sq_y) =
        x.iter()
            .zip(y)
            .fold((0.0, 0.0, 0.0), |(cross, sx, sy), (&xi, &yi)| {
                let dx = xi - mean_x;
                let dy = yi - mean_y;
                (cross + dx * dy, sx + dx * dx, sy + dy * dy)
            });

    let denominator = (sum_sq_x * sum_sq_y).sqrt();
    if denominator < f64::EPSILON || !denominator.is_finite() {
        return Err(MathError::ZeroVariance);
    }

    Ok((cross / denominator).clamp(-1.0, 1.0))
}

/// Compute the Pearson correlation coefficient, returning `0.0` whenever
/// no meaningful value exists (too few samples, constant input, or
/// mismatched lengths).
///
/// # Examples
///
/// ```
/// use corr_math::pearson;
///
/// let x = [1.0, 2.0, 3.0, 4.0, 5.0];
/// let y = [7.0, 9.0, 11.0, 13.0, 15.0];
/// assert!((pearson(&x, &y) - 1.0).abs() < 1e-12);
///
/// // Not enough data is "no signal", not an error
/// assert_eq!(pearson(&[1.0, 2.0], &[2.0, 1.0]), 0.0);
/// ```
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    try_pearson(x, y).unwrap_or(0.0)
}

/// Trailing-window Pearson correlation fed one pair at a time
#[derive(Debug, Clone)]
pub struct RollingPearson {
    window: usize,
    xs: VecDeque<f64>,
    ys: VecDeque<f64>,
}

impl RollingPearson {
    /// Create a new rolling correlation over the given window size
    pub fn new(window: usize) -> Result<Self> {
        if window < MIN_SAMPLES {
            return Err(MathError::InvalidInput(format!(
                "Window must hold at least {} samples, got {}",
                MIN_SAMPLES, window
            )));
        }

        Ok(Self {
            window,
            xs: VecDeque::with_capacity(window),
            ys: VecDeque::with_capacity(window),
        })
    }

    /// Push a new pair of observations, evicting the oldest once full
    pub fn update(&mut self, x: f64, y: f64) {
        self.xs.push_back(x);
        self.ys.push_back(y);

        if self.xs.len() > self.window {
            self.xs.pop_front();
            self.ys.pop_front();
        }
    }

    /// Whether the window holds `window` observations
    pub fn is_full(&self) -> bool {
        self.xs.len() == self.window
    }

    /// Number of observations currently held
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    /// True when no observation has been pushed since creation or reset
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// Correlation over the current window contents
    pub fn try_value(&self) -> Result<f64> {
        if !self.is_full() {
            return Err(MathError::InsufficientData(format!(
                "Rolling window not yet full. Need {} values, have {}.",
                self.window,
                self.xs.len()
            )));
        }

        let xs: Vec<f64> = self.xs.iter().copied().collect();
        let ys: Vec<f64> = self.ys.iter().copied().collect();
        try_pearson(&xs, &ys)
    }

    /// Correlation over the current window contents, `0.0` when undefined
    pub fn value(&self) -> f64 {
        self.try_value().unwrap_or(0.0)
    }

    /// Get the window size
    pub fn window(&self) -> usize {
        self.window
    }

    /// Reset the accumulator, clearing all values
    pub fn reset(&mut self) {
        self.xs.clear();
        self.ys.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statistics::sample_variance;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rand_distr::{Distribution, StandardNormal};
    use rstest::rstest;

    #[test]
    fn test_perfect_positive_linear() {
        let x: Vec<f64> = (0..60).map(|i| 100.0 + i as f64 * 1.5).collect();
        let y: Vec<f64> = x.iter().map(|v| 2.0 * v + 5.0).collect();
        assert_relative_eq!(pearson(&x, &y), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_perfect_negative_linear() {
        let x: Vec<f64> = (0..20).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| -3.0 * v + 40.0).collect();
        assert_relative_eq!(pearson(&x, &y), -1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_known_value() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 4.0, 5.0, 4.0, 5.0];
        // cov = 6, sxx = 10, syy = 6
        assert_relative_eq!(pearson(&x, &y), 6.0 / 60_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_matches_covariance_over_deviations() {
        let x = [8500.0, 8620.0, 8480.0, 8710.0, 8690.0, 8800.0, 8760.0];
        let y = [11000.0, 11150.0, 10980.0, 11120.0, 11300.0, 11280.0, 11400.0];
        let n = x.len() as f64;

        let (mx, my) = (mean(&x).unwrap(), mean(&y).unwrap());
        let covariance =
            x.iter().zip(&y).map(|(a, b)| (a - mx) * (b - my)).sum::<f64>() / (n - 1.0);
        let sd_x = sample_variance(&x).unwrap().sqrt();
        let sd_y = sample_variance(&y).unwrap().sqrt();

        assert_relative_eq!(
            try_pearson(&x, &y).unwrap(),
            covariance / (sd_x * sd_y),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_symmetry() {
        let x = [3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0];
        let y = [2.0, 7.0, 1.0, 8.0, 2.0, 8.0, 1.0, 8.0];
        assert_relative_eq!(pearson(&x, &y), pearson(&y, &x), epsilon = 1e-15);
    }

    #[rstest]
    #[case(vec![], vec![])]
    #[case(vec![1.0], vec![2.0])]
    #[case(vec![1.0, 2.0, 3.0, 4.0], vec![4.0, 3.0, 2.0, 1.0])]
    fn test_too_few_samples_is_zero(#[case] x: Vec<f64>, #[case] y: Vec<f64>) {
        assert_eq!(pearson(&x, &y), 0.0);
        assert!(matches!(
            try_pearson(&x, &y),
            Err(MathError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_zero_variance_is_zero() {
        let x = [8500.0; 30];
        let y: Vec<f64> = (0..30).map(|i| 500.0 + i as f64).collect();
        assert_eq!(pearson(&x, &y), 0.0);
        assert_eq!(pearson(&y, &x), 0.0);
        assert_eq!(try_pearson(&x, &y), Err(MathError::ZeroVariance));
    }

    #[test]
    fn test_length_mismatch() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let y = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(
            try_pearson(&x, &y),
            Err(MathError::LengthMismatch { left: 6, right: 5 })
        );
        assert_eq!(pearson(&x, &y), 0.0);
    }

    #[test]
    fn test_independent_noise_is_weak() {
        let mut rng = StdRng::seed_from_u64(7);
        let x: Vec<f64> = (0..400).map(|_| StandardNormal.sample(&mut rng)).collect();
        let y: Vec<f64> = (0..400).map(|_| StandardNormal.sample(&mut rng)).collect();
        assert!(pearson(&x, &y).abs() < 0.3);
    }

    #[test]
    fn test_rolling_matches_slice() {
        let x: Vec<f64> = (0..50).map(|i| (i as f64 * 0.7).sin() * 10.0 + 100.0).collect();
        let y: Vec<f64> = (0..50).map(|i| (i as f64 * 0.3).cos() * 4.0 + 50.0).collect();

        let mut rolling = RollingPearson::new(10).unwrap();
        for i in 0..x.len() {
            rolling.update(x[i], y[i]);
            if i + 1 >= 10 {
                let expected = pearson(&x[i + 1 - 10..=i], &y[i + 1 - 10..=i]);
                assert_relative_eq!(rolling.value(), expected, epsilon = 1e-12);
            }
        }
        assert_eq!(rolling.len(), 10);
    }

    #[test]
    fn test_rolling_not_full() {
        let mut rolling = RollingPearson::new(6).unwrap();
        for i in 0..5 {
            rolling.update(i as f64, i as f64);
        }
        assert!(!rolling.is_full());
        assert_eq!(rolling.value(), 0.0);
        assert!(rolling.try_value().is_err());

        rolling.reset();
        assert!(rolling.is_empty());
    }

    #[test]
    fn test_rolling_invalid_window() {
        assert!(RollingPearson::new(4).is_err());
        assert!(RollingPearson::new(MIN_SAMPLES).is_ok());
    }
}
