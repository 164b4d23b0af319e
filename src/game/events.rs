//! Ball Events
//!
//! Structured record of every delivery, emitted by the innings engine for
//! commentary and replay verification. The engine never reads them back.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::hash::RecordHasher;
use crate::game::outcome::BallOutcome;
use crate::game::player::PlayerId;

/// Running score of an innings, shown as `runs/wickets (overs.balls)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreLine {
    /// Runs scored
    pub runs: u32,
    /// Wickets lost
    pub wickets: u32,
    /// Completed overs
    pub overs: u32,
    /// Balls bowled in the over in progress
    pub balls: u32,
}

impl ScoreLine {
    /// Total deliveries bowled for a given over length.
    pub fn total_balls(&self, balls_per_over: u32) -> u32 {
        self.overs * balls_per_over + self.balls
    }
}

impl fmt::Display for ScoreLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} ({}.{})", self.runs, self.wickets, self.overs, self.balls)
    }
}

/// One delivery.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallEvent {
    /// 1-based delivery number within the innings
    pub ball_number: u32,
    /// 0-based over the ball belongs to
    pub over: u32,
    /// 1-based position of the ball within its over
    pub ball_in_over: u32,
    /// Batter who faced it
    pub striker: PlayerId,
    /// Bowler who bowled it
    pub bowler: PlayerId,
    /// What happened
    pub outcome: BallOutcome,
    /// Batter walking in after a wicket, if one was left
    pub incoming: Option<PlayerId>,
    /// Whether this ball finished an over
    pub end_of_over: bool,
    /// Score after the ball
    pub score: ScoreLine,
}

impl BallEvent {
    /// Hash this delivery for verification.
    pub fn hash_into(&self, hasher: &mut RecordHasher) {
        hasher.update_u32(self.ball_number);
        hasher.update_u32(self.striker.0);
        hasher.update_u32(self.bowler.0);
        hasher.update_u8(self.outcome.code());
        hasher.update_bool(self.incoming.is_some());
        if let Some(incoming) = self.incoming {
            hasher.update_u32(incoming.0);
        }
        hasher.update_u32(self.score.runs);
        hasher.update_u32(self.score.wickets);
    }
}
