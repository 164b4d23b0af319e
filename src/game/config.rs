//! Match Configuration
//!
//! Limits and the outcome distribution every innings of a match runs under,
//! plus the configuration errors raised before the first ball is bowled.

use serde::{Deserialize, Serialize};

use crate::game::outcome::OutcomeDistribution;
use crate::{DEFAULT_BALLS_PER_OVER, DEFAULT_MAX_OVERS, DEFAULT_MAX_WICKETS, DEFAULT_SQUAD_SIZE};

/// Most deliveries one innings may be scheduled for.
pub const MAX_INNINGS_BALLS: u32 = 6_000;

/// Configuration for match simulation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Players fielded per side (length of batting and bowling orders)
    pub squad_size: usize,
    /// Wickets that close an innings
    pub max_wickets: u32,
    /// Completed overs that close an innings
    pub max_overs: u32,
    /// Deliveries per over
    pub balls_per_over: u32,
    /// Outcome drawn for every delivery
    pub outcomes: OutcomeDistribution,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            squad_size: DEFAULT_SQUAD_SIZE,
            max_wickets: DEFAULT_MAX_WICKETS,
            max_overs: DEFAULT_MAX_OVERS,
            balls_per_over: DEFAULT_BALLS_PER_OVER,
            outcomes: OutcomeDistribution::default(),
        }
    }
}

impl MatchConfig {
    /// Most deliveries an innings can last.
    pub fn max_balls(&self) -> u32 {
        self.max_overs.saturating_mul(self.balls_per_over)
    }

    /// Check the limits are playable.
    ///
    /// A side needs two batters at the crease, can lose at most one fewer
    /// wicket than it has batters, and must have a second bowler whenever
    /// more than one over is scheduled.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.squad_size < 2 {
            return Err(ConfigError::InvalidLimit {
                field: "squad_size",
                value: self.squad_size as u64,
                reason: "two batters must be at the crease",
            });
        }
        if self.max_overs == 0 {
            return Err(ConfigError::InvalidLimit {
                field: "max_overs",
                value: 0,
                reason: "an innings needs at least one over",
            });
        }
        if self.balls_per_over == 0 {
            return Err(ConfigError::InvalidLimit {
                field: "balls_per_over",
                value: 0,
                reason: "an over needs at least one ball",
            });
        }
        match self.max_overs.checked_mul(self.balls_per_over) {
            Some(balls) if balls <= MAX_INNINGS_BALLS => {}
            _ => {
                return Err(ConfigError::InvalidLimit {
                    field: "max_overs",
                    value: self.max_overs as u64 * self.balls_per_over as u64,
                    reason: "max_overs * balls_per_over is over the 6000 ball innings ceiling",
                });
            }
        }
        if self.max_wickets == 0 || self.max_wickets as usize >= self.squad_size {
            return Err(ConfigError::InvalidLimit {
                field: "max_wickets",
                value: self.max_wickets as u64,
                reason: "must be between 1 and squad_size - 1",
            });
        }
        self.outcomes.validate()
    }
}

/// Configuration errors. Always raised before any ball is played.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A limit is out of range.
    #[error("invalid {field} = {value}: {reason}")]
    InvalidLimit {
        /// Offending field.
        field: &'static str,
        /// Value supplied.
        value: u64,
        /// Constraint it breaks.
        reason: &'static str,
    },

    /// A named player is not in the lineup it was looked up in.
    #[error("player '{player}' is not in the {team} lineup")]
    UnknownPlayer {
        /// Team whose lineup was searched.
        team: String,
        /// Name that was not found.
        player: String,
    },

    /// Striker and non-striker name the same batter.
    #[error("'{0}' cannot be both striker and non-striker")]
    SameBatterBothEnds(String),

    /// A fielded side has the wrong number of players.
    #[error("{team} fields {found} players, expected {expected}")]
    SquadSizeMismatch {
        /// Team name.
        team: String,
        /// Configured squad size.
        expected: usize,
        /// Players actually fielded.
        found: usize,
    },

    /// Two players in one team share a name.
    #[error("{team} has more than one player named '{player}'")]
    DuplicatePlayer {
        /// Team name.
        team: String,
        /// Repeated name.
        player: String,
    },

    /// Two teams share a name.
    #[error("more than one team named '{0}'")]
    DuplicateTeam(String),

    /// A fielded side lacks bowlers for the rotation.
    #[error("{team} fields {found} bowlers, needs at least {needed}")]
    TooFewBowlers {
        /// Team name.
        team: String,
        /// Bowling-capable players fielded.
        found: usize,
        /// Minimum required.
        needed: usize,
    },

    /// A fielded side lacks batters.
    #[error("{team} fields {found} batters, needs at least {needed}")]
    TooFewBatters {
        /// Team name.
        team: String,
        /// Batting-capable players fielded.
        found: usize,
        /// Minimum required.
        needed: usize,
    },

    /// Outcome distribution has no entries.
    #[error("outcome distribution is empty")]
    EmptyDistribution,

    /// Outcome distribution weights sum to zero or overflow.
    #[error("outcome distribution total weight {0} is not in 1..=u32::MAX")]
    InvalidWeights(u64),

    /// An outcome scores more runs than a single delivery can.
    #[error("{0} runs is not a valid delivery outcome (max 6)")]
    InvalidRuns(u8),

    /// An outcome symbol could not be parsed.
    #[error("unrecognised outcome '{0}'")]
    UnknownOutcome(String),
}

// =============================================================================
// TESTS
// =============================================================================
