//! Ranked natural-language insights derived from the correlation matrix

use crate::commodity::{COCOA_BUTTER, PALM_OIL};
use crate::error::{EngineError, Result};
use crate::matrix::{CorrelationPair, Trend};
use crate::rolling::KeyPair;
use corr_math::round_to;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

/// Unordered commodity pair, so that (A, B) and (B, A) compare equal
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairKey {
    low: String,
    high: String,
}

impl PairKey {
    pub fn new(a: &str, b: &str) -> Self {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        Self {
            low: low.to_string(),
            high: high.to_string(),
        }
    }

    pub fn members(&self) -> (&str, &str) {
        (&self.low, &self.high)
    }
}

impl From<&CorrelationPair> for PairKey {
    fn from(pair: &CorrelationPair) -> Self {
        PairKey::new(&pair.x, &pair.y)
    }
}

impl From<&KeyPair> for PairKey {
    fn from(pair: &KeyPair) -> Self {
        PairKey::new(&pair.first, &pair.second)
    }
}

/// Category of an insight card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Strongest,
    Weakest,
    Divergence,
    Opportunity,
}

impl fmt::Display for InsightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsightKind::Strongest => write!(f, "strongest"),
            InsightKind::Weakest => write!(f, "weakest"),
            InsightKind::Divergence => write!(f, "divergence"),
            InsightKind::Opportunity => write!(f, "opportunity"),
        }
    }
}

/// A short insight card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationInsight {
    pub kind: InsightKind,
    pub title: String,
    pub description: String,
    pub first: String,
    pub second: String,
    /// Correlation, or correlation change for divergence insights
    pub value: f64,
}

impl CorrelationInsight {
    /// Unordered pair this insight talks about
    pub fn pair_key(&self) -> PairKey {
        PairKey::new(&self.first, &self.second)
    }
}

/// Insight ranking configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightConfig {
    /// The weakest pair is reported only when |r| is below this
    pub weakest_ceiling: f64,
    /// Pair whose decoupling signals a substitution opportunity
    pub opportunity_pair: KeyPair,
    /// Opportunity is reported when the pair's correlation is below this
    pub opportunity_threshold: f64,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            weakest_ceiling: 0.2,
            opportunity_pair: KeyPair::new(COCOA_BUTTER, PALM_OIL),
            opportunity_threshold: 0.5,
        }
    }
}

impl InsightConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.weakest_ceiling) {
            return Err(EngineError::InvalidParameter(format!(
                "Weakest ceiling must be within [0, 1], got {}",
                self.weakest_ceiling
            )));
        }
        if !(-1.0..=1.0).contains(&self.opportunity_threshold) {
            return Err(EngineError::InvalidParameter(format!(
                "Opportunity threshold must be within [-1, 1], got {}",
                self.opportunity_threshold
            )));
        }
        if self.opportunity_pair.first == self.opportunity_pair.second {
            return Err(EngineError::InvalidParameter(
                "Opportunity pair must name two different commodities".to_string(),
            ));
        }
        Ok(())
    }
}

/// Off-diagonal pairs with symmetric duplicates removed, first occurrence kept
pub fn distinct_pairs(pairs: &[CorrelationPair]) -> Vec<&CorrelationPair> {
    let mut seen = HashSet::new();
    pairs
        .iter()
        .filter(|p| !p.is_self_pair())
        .filter(|p| seen.insert(PairKey::from(*p)))
        .collect()
}

/// Select and phrase the strongest, weakest, most diverging and opportunity
/// pairs. Returns an empty list when there is no off-diagonal pair.
pub fn rank_insights(pairs: &[CorrelationPair], config: &InsightConfig) -> Vec<CorrelationInsight> {
    let mut ranked = distinct_pairs(pairs);
    ranked.sort_by(|a, b| b.value.abs().total_cmp(&a.value.abs()));

    let mut insights = Vec::new();

    let Some(strongest) = ranked.first() else {
        debug!("no off-diagonal pairs, skipping insights");
        return insights;
    };
    insights.push(strongest_insight(strongest));

    if let Some(weakest) = ranked.last() {
        if weakest.value.abs() < config.weakest_ceiling {
            insights.push(weakest_insight(weakest));
        }
    }

    let diverging = ranked
        .iter()
        .filter(|p| p.trend == Trend::Falling)
        .min_by(|a, b| a.delta().total_cmp(&b.delta()));
    if let Some(pair) = diverging {
        insights.push(divergence_insight(pair));
    }

    let target = PairKey::from(&config.opportunity_pair);
    let opportunity = ranked.iter().find(|p| PairKey::from(**p) == target);
    if let Some(pair) = opportunity {
        if pair.value < config.opportunity_threshold {
            insights.push(opportunity_insight(&config.opportunity_pair, pair.value));
        }
    }

    debug!(
        distinct_pairs = ranked.len(),
        insights = insights.len(),
        "ranked correlation insights"
    );

    insights
}

fn strongest_insight(pair: &CorrelationPair) -> CorrelationInsight {
    let description = if pair.value >= 0.0 {
        format!(
            "{} and {} move together most closely (r = {:.2}). \
             Price moves in one are a reliable guide to the other.",
            pair.x, pair.y, pair.value
        )
    } else {
        format!(
            "{} and {} move most strongly in opposite directions (r = {:.2}). \
             One tends to fall when the other rises.",
            pair.x, pair.y, pair.value
        )
    };

    CorrelationInsight {
        kind: InsightKind::Strongest,
        title: "Strongest relationship".to_string(),
        description,
        first: pair.x.clone(),
        second: pair.y.clone(),
        value: pair.value,
    }
}

fn weakest_insight(pair: &CorrelationPair) -> CorrelationInsight {
    CorrelationInsight {
        kind: InsightKind::Weakest,
        title: "Most independent pair".to_string(),
        description: format!(
            "{} and {} show almost no linear relationship (r = {:.2}). \
             Sourcing both spreads price risk.",
            pair.x, pair.y, pair.value
        ),
        first: pair.x.clone(),
        second: pair.y.clone(),
        value: pair.value,
    }
}

fn divergence_insight(pair: &CorrelationPair) -> CorrelationInsight {
    let delta = round_to(pair.delta(), 3);
    CorrelationInsight {
        kind: InsightKind::Divergence,
        title: "Relationship weakening".to_string(),
        description: format!(
            "The correlation between {} and {} fell from {:.2} to {:.2} ({:+.2}). \
             Hedges that rely on them moving together deserve review.",
            pair.x, pair.y, pair.previous, pair.value, delta
        ),
        first: pair.x.clone(),
        second: pair.y.clone(),
        value: delta,
    }
}

fn opportunity_insight(pair: &KeyPair, value: f64) -> CorrelationInsight {
    CorrelationInsight {
        kind: InsightKind::Opportunity,
        title: "Substitution opportunity".to_string(),
        description: format!(
            "{} and {} are only loosely linked right now (r = {:.2}). \
             A widening price gap favours switching formulations toward the cheaper input.",
            pair.first, pair.second, value
        ),
        first: pair.first.clone(),
        second: pair.second.clone(),
        value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::{MatrixConfig, Significance};
    use pretty_assertions::assert_eq;

    fn cell(x: &str, y: &str, value: f64, previous: f64) -> CorrelationPair {
        let config = MatrixConfig::default();
        if x == y {
            return CorrelationPair {
                x: x.to_string(),
                y: y.to_string(),
                value: 1.0,
                significance: Significance::Strong,
                trend: Trend::Stable,
                previous: 1.0,
            };
        }
        CorrelationPair {
            x: x.to_string(),
            y: y.to_string(),
            value,
            significance: config.significance(value),
            trend: config.trend(value, previous),
            previous,
        }
    }

    /// Full symmetric matrix from upper-triangle (x, y, value, previous) cells
    fn matrix(names: &[&str], cells: &[(&str, &str, f64, f64)]) -> Vec<CorrelationPair> {
        let mut out = Vec::new();
        for x in names {
            for y in names {
                let found = cells
                    .iter()
                    .find(|c| (c.0 == *x && c.1 == *y) || (c.0 == *y && c.1 == *x));
                match found {
                    Some(c) => out.push(cell(x, y, c.2, c.3)),
                    None => out.push(cell(x, y, 1.0, 1.0)),
                }
            }
        }
        out
    }

    #[test]
    fn test_pair_key_unordered() {
        assert_eq!(PairKey::new("Sugar", "Cocoa"), PairKey::new("Cocoa", "Sugar"));
        assert_eq!(PairKey::new("Sugar", "Cocoa").members(), ("Cocoa", "Sugar"));
        // names containing a separator character do not collide
        assert_ne!(PairKey::new("A|B", "C"), PairKey::new("A", "B|C"));
    }

    #[test]
    fn test_single_commodity_is_empty() {
        let pairs = matrix(&["Cocoa"], &[]);
        assert!(rank_insights(&pairs, &InsightConfig::default()).is_empty());
        assert!(rank_insights(&[], &InsightConfig::default()).is_empty());
    }

    #[test]
    fn test_full_ranking() {
        let pairs = matrix(
            &["Cocoa", "Cocoa Butter", "Palm Oil", "Sugar"],
            &[
                ("Cocoa", "Cocoa Butter", 0.91, 0.88),
                ("Cocoa", "Palm Oil", 0.45, 0.62),
                ("Cocoa", "Sugar", -0.35, -0.33),
                ("Cocoa Butter", "Palm Oil", 0.31, 0.52),
                ("Cocoa Butter", "Sugar", 0.05, 0.1),
                ("Palm Oil", "Sugar", 0.6, 0.58),
            ],
        );

        let insights = rank_insights(&pairs, &InsightConfig::default());
        let kinds: Vec<_> = insights.iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![
                InsightKind::Strongest,
                InsightKind::Weakest,
                InsightKind::Divergence,
                InsightKind::Opportunity,
            ]
        );

        assert_eq!(insights[0].pair_key(), PairKey::new("Cocoa", "Cocoa Butter"));
        assert_eq!(insights[0].value, 0.91);
        assert!(insights[0].description.contains("0.91"));

        assert_eq!(insights[1].pair_key(), PairKey::new("Cocoa Butter", "Sugar"));

        // Cocoa Butter / Palm Oil fell by 0.21, more than Cocoa / Palm Oil's 0.17
        assert_eq!(insights[2].pair_key(), PairKey::new("Cocoa Butter", "Palm Oil"));
        assert_eq!(insights[2].value, -0.21);
        assert!(insights[2].description.contains("0.52"));
        assert!(insights[2].description.contains("-0.21"));

        assert_eq!(insights[3].first, "Cocoa Butter");
        assert_eq!(insights[3].second, "Palm Oil");
        assert_eq!(insights[3].value, 0.31);
    }

    #[test]
    fn test_negative_strongest_by_magnitude() {
        let pairs = matrix(
            &["Cocoa", "Sugar", "Wheat"],
            &[
                ("Cocoa", "Sugar", -0.85, -0.84),
                ("Cocoa", "Wheat", 0.6, 0.6),
                ("Sugar", "Wheat", 0.3, 0.3),
            ],
        );
        let insights = rank_insights(&pairs, &InsightConfig::default());
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].value, -0.85);
        assert!(insights[0].description.contains("opposite"));
    }

    #[test]
    fn test_symmetric_duplicates_collapse() {
        let pairs = matrix(
            &["Cocoa", "Sugar", "Wheat"],
            &[
                ("Cocoa", "Sugar", 0.95, 0.9),
                ("Cocoa", "Wheat", 0.5, 0.5),
                ("Sugar", "Wheat", 0.45, 0.45),
            ],
        );
        assert_eq!(distinct_pairs(&pairs).len(), 3);

        let insights = rank_insights(&pairs, &InsightConfig::default());
        let strongest: Vec<_> = insights
            .iter()
            .filter(|i| i.kind == InsightKind::Strongest)
            .collect();
        assert_eq!(strongest.len(), 1);
        assert_eq!(
            insights
                .iter()
                .filter(|i| i.pair_key() == PairKey::new("Cocoa", "Sugar"))
                .count(),
            1
        );
    }

    #[test]
    fn test_weakest_requires_negligible_value() {
        let pairs = matrix(
            &["Cocoa", "Sugar", "Wheat"],
            &[
                ("Cocoa", "Sugar", 0.95, 0.95),
                ("Cocoa", "Wheat", 0.8, 0.8),
                ("Sugar", "Wheat", 0.75, 0.75),
            ],
        );
        let insights = rank_insights(&pairs, &InsightConfig::default());
        assert!(insights.iter().all(|i| i.kind != InsightKind::Weakest));
    }

    #[test]
    fn test_single_negligible_pair_is_strongest_and_weakest() {
        let pairs = matrix(&["Cocoa", "Sugar"], &[("Cocoa", "Sugar", 0.05, 0.04)]);
        let insights = rank_insights(&pairs, &InsightConfig::default());

        let kinds: Vec<_> = insights.iter().map(|i| i.kind).collect();
        assert_eq!(kinds, vec![InsightKind::Strongest, InsightKind::Weakest]);
        assert!(insights
            .iter()
            .all(|i| i.pair_key() == PairKey::new("Cocoa", "Sugar")));
        assert_eq!(insights[1].value, 0.05);
    }

    #[test]
    fn test_opportunity_not_reported_when_coupled() {
        let pairs = matrix(
            &["Cocoa Butter", "Palm Oil"],
            &[("Cocoa Butter", "Palm Oil", 0.72, 0.7)],
        );
        let insights = rank_insights(&pairs, &InsightConfig::default());
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].kind, InsightKind::Strongest);
    }

    #[test]
    fn test_config_validation() {
        assert!(InsightConfig::default().validate().is_ok());
        let config = InsightConfig {
            opportunity_pair: KeyPair::new("Cocoa", "Cocoa"),
            ..InsightConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
