//! Trailing averages
//!
//! The spread signal rules compare the latest spread against its trailing
//! 30- and 90-observation means. `TrailingMean` keeps a running sum over a
//! fixed window; `trailing_average` applies one to the tail of a slice.

use crate::{MathError, Result};
use std::collections::VecDeque;

/// Mean over the most recent `window` observations
#[derive(Debug, Clone)]
pub struct TrailingMean {
    window: usize,
    values: VecDeque<f64>,
    sum: f64,
}

impl TrailingMean {
    pub fn new(window: usize) -> Result<Self> {
        if window == 0 {
            return Err(MathError::InvalidInput(
                "Averaging window must hold at least one observation".to_string(),
            ));
        }

        Ok(Self {
            window,
            values: VecDeque::with_capacity(window),
            sum: 0.0,
        })
    }

    /// Push an observation and return the mean once the window is full
    pub fn push(&mut self, value: f64) -> Option<f64> {
        self.values.push_back(value);
        self.sum += value;
        if self.values.len() > self.window {
            if let Some(evicted) = self.values.pop_front() {
                self.sum -= evicted;
            }
        }
        self.mean()
    }

    /// Mean of the window, `None` until `window` observations were pushed
    pub fn mean(&self) -> Option<f64> {
        self.is_full().then(|| self.sum / self.window as f64)
    }

    pub fn is_full(&self) -> bool {
        self.values.len() == self.window
    }

    pub fn window(&self) -> usize {
        self.window
    }
}

/// Mean of the last `period` values of a slice.
///
/// Fails with `InsufficientData` when the slice is shorter than `period`.
pub fn trailing_average(values: &[f64], period: usize) -> Result<f64> {
    let mut mean = TrailingMean::new(period)?;
    let tail = &values[values.len().saturating_sub(period)..];

    tail.iter()
        .fold(None, |_, &v| mean.push(v))
        .ok_or_else(|| {
            MathError::InsufficientData(format!(
                "Trailing average over {} observations, have {}.",
                period,
                values.len()
            ))
        })
}
