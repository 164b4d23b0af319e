//! Delivery Outcomes
//!
//! What a single ball can produce, the weighted distribution outcomes are
//! drawn from, and the [`BallSource`] seam that supplies them to the engine.

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::rng::DeterministicRng;
use crate::game::config::ConfigError;

/// Most runs a single delivery may score.
pub const MAX_RUNS_PER_BALL: u8 = 6;

/// Result of one delivery.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BallOutcome {
    /// Batter scores this many runs (0 is a dot ball)
    Runs(u8),
    /// Striker is dismissed, no runs scored
    Wicket,
}

impl BallOutcome {
    /// A ball with no runs and no wicket.
    pub const DOT: BallOutcome = BallOutcome::Runs(0);

    /// Runs added to the total (0 for a wicket).
    #[inline]
    pub fn runs(self) -> u8 {
        match self {
            BallOutcome::Runs(runs) => runs,
            BallOutcome::Wicket => 0,
        }
    }

    /// Is this a dismissal?
    #[inline]
    pub fn is_wicket(self) -> bool {
        matches!(self, BallOutcome::Wicket)
    }

    /// Odd runs leave the batters at opposite ends.
    #[inline]
    pub fn rotates_strike(self) -> bool {
        matches!(self, BallOutcome::Runs(runs) if runs % 2 == 1)
    }

    /// Stable byte encoding for record digests.
    pub fn code(self) -> u8 {
        match self {
            BallOutcome::Runs(runs) => runs,
            BallOutcome::Wicket => u8::MAX,
        }
    }
}

impl fmt::Display for BallOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BallOutcome::Runs(runs) => write!(f, "{runs}"),
            BallOutcome::Wicket => f.write_str("W"),
        }
    }
}

impl FromStr for BallOutcome {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "W" | "w" | "wicket" => Ok(BallOutcome::Wicket),
            other => match other.parse::<u8>() {
                Ok(runs) if runs <= MAX_RUNS_PER_BALL => Ok(BallOutcome::Runs(runs)),
                Ok(runs) => Err(ConfigError::InvalidRuns(runs)),
                Err(_) => Err(ConfigError::UnknownOutcome(other.to_string())),
            },
        }
    }
}

/// One entry of an outcome distribution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightedOutcome {
    /// The outcome
    pub outcome: BallOutcome,
    /// Relative likelihood
    pub weight: u32,
}

/// Weighted set of outcomes a delivery is drawn from.
///
/// Probability of an entry is its weight over the total weight. Its
/// cardinality is explicit: the default holds exactly seven equally likely
/// symbols, six run values and a wicket.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutcomeDistribution {
    entries: Vec<WeightedOutcome>,
}

impl Default for OutcomeDistribution {
    fn default() -> Self {
        Self::uniform(&[
            BallOutcome::Runs(0),
            BallOutcome::Runs(1),
            BallOutcome::Runs(2),
            BallOutcome::Runs(3),
            BallOutcome::Runs(4),
            BallOutcome::Runs(6),
            BallOutcome::Wicket,
        ])
    }
}

impl OutcomeDistribution {
    /// Every outcome equally likely.
    pub fn uniform(outcomes: &[BallOutcome]) -> Self {
        Self::from_entries(
            outcomes
                .iter()
                .map(|&outcome| WeightedOutcome { outcome, weight: 1 })
                .collect(),
        )
    }

    /// Build from explicit entries. Not validated until [`Self::validate`].
    pub fn from_entries(entries: Vec<WeightedOutcome>) -> Self {
        Self { entries }
    }

    /// Entries in draw order.
    pub fn entries(&self) -> &[WeightedOutcome] {
        &self.entries
    }

    /// Number of entries.
    pub fn cardinality(&self) -> usize {
        self.entries.len()
    }

    /// Sum of all weights.
    pub fn total_weight(&self) -> u64 {
        self.entries.iter().map(|e| e.weight as u64).sum()
    }

    /// Check the distribution can be sampled.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.entries.is_empty() {
            return Err(ConfigError::EmptyDistribution);
        }
        if let Some(bad) = self
            .entries
            .iter()
            .find(|e| e.outcome.runs() > MAX_RUNS_PER_BALL)
        {
            return Err(ConfigError::InvalidRuns(bad.outcome.runs()));
        }
        let total = self.total_weight();
        if total == 0 || total > u32::MAX as u64 {
            return Err(ConfigError::InvalidWeights(total));
        }
        Ok(())
    }

    /// Draw one outcome.
    ///
    /// Consumes exactly one value from the generator.
    pub fn sample(&self, rng: &mut DeterministicRng) -> BallOutcome {
        let mut roll = rng.next_int(self.total_weight() as u32);
        for entry in &self.entries {
            if roll < entry.weight {
                return entry.outcome;
            }
            roll -= entry.weight;
        }
        // Only reachable for an unvalidated zero-weight table
        BallOutcome::DOT
    }
}

// =============================================================================
// BALL SOURCES
// =============================================================================

/// Supplies the outcome of each delivery to an innings.
pub trait BallSource {
    /// Next outcome, or `None` once the source has nothing left to give.
    fn next_outcome(&mut self, distribution: &OutcomeDistribution) -> Option<BallOutcome>;
}

impl BallSource for DeterministicRng {
    fn next_outcome(&mut self, distribution: &OutcomeDistribution) -> Option<BallOutcome> {
        Some(distribution.sample(self))
    }
}

/// A fixed, pre-recorded sequence of outcomes.
///
/// Ignores the distribution. Used to replay a known innings and to drive
/// the engine through exact scenarios.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScriptedBalls {
    outcomes: VecDeque<BallOutcome>,
}

impl ScriptedBalls {
    /// Create from outcomes in bowling order.
    pub fn new(outcomes: impl IntoIterator<Item = BallOutcome>) -> Self {
        Self {
            outcomes: outcomes.into_iter().collect(),
        }
    }

    /// Parse a comma or whitespace separated script such as `"4,1,0,W"`.
    pub fn parse(script: &str) -> Result<Self, ConfigError> {
        script
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|token| !token.is_empty())
            .map(str::parse::<BallOutcome>)
            .collect::<Result<VecDeque<_>, _>>()
            .map(|outcomes| Self { outcomes })
    }

    /// Outcomes not yet delivered.
    pub fn remaining(&self) -> usize {
        self.outcomes.len()
    }
}

impl BallSource for ScriptedBalls {
    fn next_outcome(&mut self, _distribution: &OutcomeDistribution) -> Option<BallOutcome> {
        self.outcomes.pop_front()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_distribution_has_no_five() {
        let dist = OutcomeDistribution::default();
        assert_eq!(dist.cardinality(), 7);
        assert_eq!(dist.total_weight(), 7);
        assert!(dist.entries().iter().all(|e| e.outcome != BallOutcome::Runs(5)));
        assert!(dist.entries().iter().any(|e| e.outcome.is_wicket()));
        assert_eq!(dist.validate(), Ok(()));
    }

    #[test]
    fn test_sample_covers_every_symbol() {
        let dist = OutcomeDistribution::default();
        let mut rng = DeterministicRng::new(2024);
        let mut seen = std::collections::BTreeSet::new();

        for _ in 0..2000 {
            seen.insert(dist.sample(&mut rng).code());
        }

        assert_eq!(seen.len(), 7);
        assert!(!seen.contains(&5));
    }

    #[test]
    fn test_sample_respects_weights() {
        let dist = OutcomeDistribution::from_entries(vec![
            WeightedOutcome { outcome: BallOutcome::Runs(6), weight: 0 },
            WeightedOutcome { outcome: BallOutcome::Runs(1), weight: 3 },
        ]);
        let mut rng = DeterministicRng::new(9);

        for _ in 0..500 {
            assert_eq!(dist.sample(&mut rng), BallOutcome::Runs(1));
        }
    }

    #[test]
    fn test_validate_rejects_bad_tables() {
        assert_eq!(
            OutcomeDistribution::from_entries(Vec::new()).validate(),
            Err(ConfigError::EmptyDistribution)
        );
        assert_eq!(
            OutcomeDistribution::uniform(&[BallOutcome::Runs(7)]).validate(),
            Err(ConfigError::InvalidRuns(7))
        );
        let overflow = OutcomeDistribution::from_entries(vec![
            WeightedOutcome { outcome: BallOutcome::DOT, weight: u32::MAX },
            WeightedOutcome { outcome: BallOutcome::Wicket, weight: 1 },
        ]);
        assert_eq!(
            overflow.validate(),
            Err(ConfigError::InvalidWeights(u32::MAX as u64 + 1))
        );
    }

    #[test]
    fn test_strike_rotation_rule() {
        assert!(BallOutcome::Runs(1).rotates_strike());
        assert!(BallOutcome::Runs(3).rotates_strike());
        assert!(!BallOutcome::Runs(0).rotates_strike());
        assert!(!BallOutcome::Runs(4).rotates_strike());
        assert!(!BallOutcome::Wicket.rotates_strike());
    }

    #[test]
    fn test_parse_script() {
        let mut script = ScriptedBalls::parse("4, 1 0,W 6").unwrap();
        assert_eq!(script.remaining(), 5);

        let dist = OutcomeDistribution::default();
        let drawn: Vec<_> = std::iter::from_fn(|| script.next_outcome(&dist)).collect();
        assert_eq!(
            drawn,
            vec![
                BallOutcome::Runs(4),
                BallOutcome::Runs(1),
                BallOutcome::DOT,
                BallOutcome::Wicket,
                BallOutcome::Runs(6),
            ]
        );
        assert_eq!(script.remaining(), 0);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(ScriptedBalls::parse("4,9"), Err(ConfigError::InvalidRuns(9)));
        assert_eq!(
            ScriptedBalls::parse("4,x"),
            Err(ConfigError::UnknownOutcome("x".to_string()))
        );
    }

    #[test]
    fn test_outcome_json_shape() {
        let json = serde_json::to_string(&OutcomeDistribution::uniform(&[
            BallOutcome::Runs(4),
            BallOutcome::Wicket,
        ]))
        .unwrap();
        assert_eq!(
            json,
            r#"[{"outcome":{"runs":4},"weight":1},{"outcome":"wicket","weight":1}]"#
        );
    }
}
