//! Match Orchestrator
//!
//! Two innings back to back: the home side bats first, the away side second,
//! and the side with more runs wins. There is no chase, so the second innings
//! always runs to its own limits.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::hash::{compute_match_digest, RecordDigest};
use crate::game::config::{ConfigError, MatchConfig};
use crate::game::innings::{Innings, InningsError, InningsSetup, InningsSummary};
use crate::game::outcome::BallSource;
use crate::game::player::{PlayerArena, PlayerId};
use crate::game::team::{MatchResult, Team, TeamId};

/// A scheduled meeting of two teams.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    /// Position in the schedule
    pub index: u32,
    /// Bats first
    pub home: TeamId,
    /// Bats second
    pub away: TeamId,
    /// Ground, for display
    pub venue: String,
    /// Match day, for display
    pub date: NaiveDate,
    /// Seed the match was played with, folded into the match digest
    pub seed: u64,
}

/// Opening selections for both innings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSetup {
    /// Home batters and away bowler
    pub first: InningsSetup,
    /// Away batters and home bowler
    pub second: InningsSetup,
}

/// Match errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    /// Rejected before the first ball.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An innings could not be played out.
    #[error(transparent)]
    Innings(#[from] InningsError),

    /// Teams passed in do not match the fixture.
    #[error("fixture {fixture} expects teams {expected:?}, got {found:?}")]
    FixtureMismatch {
        /// Fixture index
        fixture: u32,
        /// Home and away ids of the fixture
        expected: (TeamId, TeamId),
        /// Ids of the teams passed in
        found: (TeamId, TeamId),
    },
}

/// Everything that happened in a finished match.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatchRecord {
    /// What was played
    pub fixture: Fixture,
    /// Home innings
    pub first: InningsSummary,
    /// Away innings
    pub second: InningsSummary,
    /// Result for the home side
    pub result: MatchResult,
    /// Player of the match
    pub standout: Option<PlayerId>,
    /// Credit each fielded player banked into their career
    pub credits: BTreeMap<PlayerId, u32>,
    /// Digest over both innings
    pub digest: RecordDigest,
}

impl MatchRecord {
    /// Winning side, `None` on a tie.
    pub fn winner(&self) -> Option<TeamId> {
        match self.result {
            MatchResult::Win => Some(self.fixture.home),
            MatchResult::Loss => Some(self.fixture.away),
            MatchResult::Tie | MatchResult::NoResult => None,
        }
    }

    /// Run difference between the two innings.
    pub fn margin(&self) -> u32 {
        self.first.score.runs.abs_diff(self.second.score.runs)
    }
}

/// Decide the home side's result from both totals.
pub fn decide_result(home_runs: u32, away_runs: u32) -> MatchResult {
    match home_runs.cmp(&away_runs) {
        std::cmp::Ordering::Greater => MatchResult::Win,
        std::cmp::Ordering::Less => MatchResult::Loss,
        std::cmp::Ordering::Equal => MatchResult::Tie,
    }
}

/// Play a full match.
///
/// Every check runs before the first ball, so a configuration error leaves
/// players and teams untouched. Team records and career figures only change
/// once both innings are complete. A match cut short leaves them as they
/// were; its balls stay only in each player's match figures.
pub fn play_match<S>(
    fixture: &Fixture,
    home: &mut Team,
    away: &mut Team,
    players: &mut PlayerArena,
    setup: &MatchSetup,
    config: &MatchConfig,
    source: &mut S,
) -> Result<MatchRecord, MatchError>
where
    S: BallSource + ?Sized,
{
    if (home.id, away.id) != (fixture.home, fixture.away) {
        return Err(MatchError::FixtureMismatch {
            fixture: fixture.index,
            expected: (fixture.home, fixture.away),
            found: (home.id, away.id),
        });
    }

    config.validate()?;
    home.validate_fielded(players, config)?;
    away.validate_fielded(players, config)?;

    let mut first = Innings::new(home, away, players, &setup.first, config)?;
    let mut second = Innings::new(away, home, players, &setup.second, config)?;

    let fielded: Vec<PlayerId> = home.fielded.iter().chain(&away.fielded).copied().collect();
    for &id in &fielded {
        players[id].begin_match();
    }

    info!(
        "Match {}: {} vs {} at {} on {}",
        fixture.index, home.name, away.name, fixture.venue, fixture.date
    );

    first.play_out(players, source)?;
    let first = first.finish(players)?;
    info!("{} {}", home.name, first.score);

    second.play_out(players, source)?;
    let second = second.finish(players)?;
    info!("{} {}", away.name, second.score);

    let result = decide_result(first.score.runs, second.score.runs);
    let standout = match_standout(players, first.standout, second.standout);

    let credits: BTreeMap<PlayerId, u32> = fielded
        .iter()
        .map(|&id| (id, players[id].close_match()))
        .collect();

    home.record.apply(result);
    away.record.apply(result.reversed());

    let digest = compute_match_digest(fixture.seed, |hasher| {
        hasher.update_u32(fixture.index);
        hasher.update_u32(fixture.home.0);
        hasher.update_u32(fixture.away.0);
        hasher.update_digest(&first.digest);
        hasher.update_digest(&second.digest);
        hasher.update_u8(result as u8);
    });

    info!(
        "Match {} result: {} {:?} (digest {})",
        fixture.index,
        home.name,
        result,
        hex::encode(&digest[..8])
    );

    Ok(MatchRecord {
        fixture: fixture.clone(),
        first,
        second,
        result,
        standout,
        credits,
        digest,
    })
}

/// First innings' pick stands unless the second's has strictly more credit.
fn match_standout(
    players: &PlayerArena,
    first: Option<PlayerId>,
    second: Option<PlayerId>,
) -> Option<PlayerId> {
    let credit = |id: PlayerId| players.get(id).map_or(0, |p| p.match_credits());
    match (first, second) {
        (Some(a), Some(b)) if credit(b) > credit(a) => Some(b),
        (Some(a), _) => Some(a),
        (None, b) => b,
    }
}

// =============================================================================
// TESTS
// =============================================================================
