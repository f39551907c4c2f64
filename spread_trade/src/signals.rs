//! Rule-based purchasing signals on a spread series
//!
//! Each rule compares the latest spread with its trailing short and long
//! averages. Rules are independent; every rule that qualifies fires, in rule
//! order. When none fires a single neutral signal is returned.

use crate::spread::SpreadSeries;
use crate::SignalAction;
use corr_math::trailing_average;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One fired rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadSignal {
    pub action: SignalAction,
    pub message: String,
    /// Confidence in [0, 1]
    pub strength: f64,
}

impl SpreadSignal {
    fn new(action: SignalAction, message: &str, strength: f64) -> Self {
        Self {
            action,
            message: message.to_string(),
            strength,
        }
    }

    /// The fallback when no rule fires
    pub fn neutral() -> Self {
        Self::new(SignalAction::Neutral, "No actionable spread signal", 0.0)
    }
}

/// Thresholds of the spread rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpreadRules {
    /// Observations in the short trailing average
    pub short_window: usize,
    /// Observations in the long trailing average
    pub long_window: usize,
    /// Fractional discount below the short average that counts as cheap
    pub discount: f64,
    /// Fractional premium above the long average that counts as stretched
    pub stretch: f64,
}

impl Default for SpreadRules {
    fn default() -> Self {
        Self {
            short_window: 30,
            long_window: 90,
            discount: 0.05,
            stretch: 0.10,
        }
    }
}

impl SpreadRules {
    /// Evaluate every rule against the latest spread.
    ///
    /// A series shorter than the long window, or invalid windows, yield only
    /// the neutral signal.
    pub fn evaluate(&self, series: &SpreadSeries) -> Vec<SpreadSignal> {
        let spreads = series.spreads();
        let (Some(&current), Ok(short_avg), Ok(long_avg)) = (
            spreads.last(),
            trailing_average(&spreads, self.short_window),
            trailing_average(&spreads, self.long_window),
        ) else {
            debug!(
                observations = spreads.len(),
                long_window = self.long_window,
                "not enough spread history, returning neutral signal"
            );
            return vec![SpreadSignal::neutral()];
        };

        let mut signals = Vec::new();

        if current < short_avg * (1.0 - self.discount) {
            signals.push(SpreadSignal::new(
                SignalAction::Buy,
                "Spread trading well below its 30-day average",
                0.6,
            ));
        }
        if current < long_avg {
            signals.push(SpreadSignal::new(
                SignalAction::Buy,
                "Spread below its 90-day average",
                0.5,
            ));
        }
        if short_avg < long_avg {
            signals.push(SpreadSignal::new(
                SignalAction::Buy,
                "30-day spread average under 90-day average: input cost easing",
                0.4,
            ));
        }
        if current > long_avg * (1.0 + self.stretch) {
            signals.push(SpreadSignal::new(
                SignalAction::Hold,
                "Spread stretched above its 90-day average: defer purchases",
                0.7,
            ));
        }

        if signals.is_empty() {
            signals.push(SpreadSignal::neutral());
        }

        debug!(
            current,
            short_avg,
            long_avg,
            fired = signals.len(),
            "evaluated spread rules"
        );

        signals
    }
}
