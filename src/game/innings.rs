//! Innings Engine
//!
//! Ball-by-ball state machine for one side's batting effort. Every call to
//! [`Innings::bowl_ball`] plays exactly one delivery: draw an outcome,
//! credit batter and bowler, rotate strike and bowlers, and close the
//! innings once a wicket or over limit is hit.

use std::iter::FusedIterator;

use serde::{Deserialize, Serialize};
use tracing::debug;
#[cfg(feature = "debug-tracing")]
use tracing::trace;

use crate::core::hash::{RecordDigest, RecordHasher};
use crate::game::aggregate::best_by_credit;
use crate::game::config::{ConfigError, MatchConfig};
use crate::game::events::{BallEvent, ScoreLine};
use crate::game::outcome::{BallOutcome, BallSource};
use crate::game::player::{CreditScope, PlayerArena, PlayerId};
use crate::game::team::{Team, TeamId};

// =============================================================================
// SETUP & STATUS
// =============================================================================

/// Opening selections for an innings, by player name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InningsSetup {
    /// Batter facing the first ball
    pub striker: String,
    /// Batter at the other end
    pub non_striker: String,
    /// Bowler of the first over
    pub bowler: String,
}

impl InningsSetup {
    /// Create a setup from three names.
    pub fn new(
        striker: impl Into<String>,
        non_striker: impl Into<String>,
        bowler: impl Into<String>,
    ) -> Self {
        Self {
            striker: striker.into(),
            non_striker: non_striker.into(),
            bowler: bowler.into(),
        }
    }
}

/// Why an innings closed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum CompletionReason {
    /// Wicket limit reached
    WicketLimit = 0,
    /// Over limit reached
    OverLimit = 1,
    /// No batter left to replace a dismissed one
    BattersExhausted = 2,
}

/// Current phase of an innings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InningsPhase {
    /// Balls still to be bowled
    #[default]
    InProgress,
    /// Closed for good
    Complete(CompletionReason),
}

/// Innings errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InningsError {
    /// Stepped an innings that is already closed.
    #[error("innings is already complete")]
    Complete,

    /// Asked for a summary before the innings closed.
    #[error("innings is still in progress")]
    InProgress,

    /// The ball source had no outcome to give.
    #[error("ball source ran dry after {balls} balls")]
    OutcomesExhausted {
        /// Balls bowled before the source ran dry.
        balls: u32,
    },
}

// =============================================================================
// SCORECARD
// =============================================================================

/// One batting position's figures for this innings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatterLine {
    /// Batter
    pub player: PlayerId,
    /// Runs scored
    pub runs: u32,
    /// Balls faced
    pub balls: u32,
    /// Has come to the crease
    pub batted: bool,
    /// Was dismissed
    pub out: bool,
}

impl BatterLine {
    fn new(player: PlayerId) -> Self {
        Self {
            player,
            runs: 0,
            balls: 0,
            batted: false,
            out: false,
        }
    }
}

/// One bowling position's figures for this innings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BowlerLine {
    /// Bowler
    pub player: PlayerId,
    /// Balls bowled
    pub balls: u32,
    /// Runs conceded
    pub runs_conceded: u32,
    /// Wickets taken
    pub wickets: u32,
}

impl BowlerLine {
    fn new(player: PlayerId) -> Self {
        Self {
            player,
            balls: 0,
            runs_conceded: 0,
            wickets: 0,
        }
    }
}

// =============================================================================
// INNINGS
// =============================================================================

/// One side's batting effort.
///
/// Invariants held after every ball:
/// - `overs * balls_per_over + balls_in_over == balls_bowled`
/// - striker and non-striker are distinct positions in the batting order
/// - `wickets <= max_wickets`, `overs <= max_overs`
#[derive(Clone, Debug)]
pub struct Innings {
    batting_team: TeamId,
    bowling_team: TeamId,
    config: MatchConfig,

    batting: Vec<BatterLine>,
    bowling: Vec<BowlerLine>,

    striker: usize,
    non_striker: usize,
    bowler: usize,
    previous_bowler: Option<usize>,

    runs: u32,
    wickets: u32,
    overs: u32,
    balls_in_over: u32,
    balls_bowled: u32,

    phase: InningsPhase,
    deliveries: Vec<BallEvent>,
}

impl Innings {
    /// Set up an innings.
    ///
    /// Resolves the opening names against the fielded sides and checks the
    /// configuration. Nothing is bowled here, so any error leaves no trace.
    pub fn new(
        batting: &Team,
        bowling: &Team,
        players: &PlayerArena,
        setup: &InningsSetup,
        config: &MatchConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        for team in [batting, bowling] {
            if team.fielded.len() != config.squad_size {
                return Err(ConfigError::SquadSizeMismatch {
                    team: team.name.clone(),
                    expected: config.squad_size,
                    found: team.fielded.len(),
                });
            }
            if let Some(stranger) = team.fielded.iter().find(|&&id| !players.contains(id)) {
                return Err(ConfigError::UnknownPlayer {
                    team: team.name.clone(),
                    player: format!("#{}", stranger.0),
                });
            }
        }

        let position = |team: &Team, order: &[PlayerId], name: &str| {
            order
                .iter()
                .position(|&id| players[id].name == name)
                .ok_or_else(|| ConfigError::UnknownPlayer {
                    team: team.name.clone(),
                    player: name.to_string(),
                })
        };

        let striker = position(batting, batting.batting_order(), &setup.striker)?;
        let non_striker = position(batting, batting.batting_order(), &setup.non_striker)?;
        if striker == non_striker {
            return Err(ConfigError::SameBatterBothEnds(setup.striker.clone()));
        }
        let bowler = position(bowling, bowling.bowling_order(), &setup.bowler)?;

        let needed = if config.max_overs > 1 { 2 } else { 1 };
        let found = bowling
            .bowling_order()
            .iter()
            .filter(|&&id| players[id].can_bowl())
            .count();
        if found < needed {
            return Err(ConfigError::TooFewBowlers {
                team: bowling.name.clone(),
                found,
                needed,
            });
        }

        let mut batting_lines: Vec<BatterLine> = batting
            .batting_order()
            .iter()
            .map(|&id| BatterLine::new(id))
            .collect();
        batting_lines[striker].batted = true;
        batting_lines[non_striker].batted = true;

        Ok(Self {
            batting_team: batting.id,
            bowling_team: bowling.id,
            config: config.clone(),
            batting: batting_lines,
            bowling: bowling
                .bowling_order()
                .iter()
                .map(|&id| BowlerLine::new(id))
                .collect(),
            striker,
            non_striker,
            bowler,
            previous_bowler: None,
            runs: 0,
            wickets: 0,
            overs: 0,
            balls_in_over: 0,
            balls_bowled: 0,
            phase: InningsPhase::InProgress,
            deliveries: Vec::new(),
        })
    }

    /// Bowl one ball.
    ///
    /// Rejected without any change once the innings is complete, or when
    /// the source has no outcome left.
    pub fn bowl_ball<S>(
        &mut self,
        players: &mut PlayerArena,
        source: &mut S,
    ) -> Result<BallEvent, InningsError>
    where
        S: BallSource + ?Sized,
    {
        if self.is_complete() {
            return Err(InningsError::Complete);
        }

        let outcome = source
            .next_outcome(&self.config.outcomes)
            .ok_or(InningsError::OutcomesExhausted {
                balls: self.balls_bowled,
            })?;

        let striker_id = self.batting[self.striker].player;
        let bowler_id = self.bowling[self.bowler].player;

        // 1. Figures
        players[striker_id].record_ball_faced(outcome);
        players[bowler_id].record_ball_bowled(outcome);

        let batter = &mut self.batting[self.striker];
        batter.balls += 1;
        let bowler = &mut self.bowling[self.bowler];
        bowler.balls += 1;

        // 2. Wicket or runs
        let mut incoming = None;
        let mut batters_exhausted = false;
        match outcome {
            BallOutcome::Wicket => {
                self.wickets += 1;
                bowler.wickets += 1;
                self.batting[self.striker].out = true;
                incoming = self.replace_striker();
                batters_exhausted = incoming.is_none();
            }
            BallOutcome::Runs(runs) => {
                let runs = runs as u32;
                self.runs += runs;
                batter.runs += runs;
                bowler.runs_conceded += runs;
                if outcome.rotates_strike() {
                    std::mem::swap(&mut self.striker, &mut self.non_striker);
                }
            }
        }

        // 3. Over progression
        self.balls_bowled += 1;
        self.balls_in_over += 1;
        let over = self.overs;
        let ball_in_over = self.balls_in_over;
        let end_of_over = self.balls_in_over == self.config.balls_per_over;
        if end_of_over {
            self.overs += 1;
            self.balls_in_over = 0;
        }

        // 4. Completion, then the next over's bowler
        self.update_phase(batters_exhausted);
        if end_of_over && !self.is_complete() {
            self.rotate_bowler();
        }

        let event = BallEvent {
            ball_number: self.balls_bowled,
            over,
            ball_in_over,
            striker: striker_id,
            bowler: bowler_id,
            outcome,
            incoming,
            end_of_over,
            score: self.score(),
        };

        debug!(
            "Ball {} ({}.{}): {} -> {}",
            event.ball_number, over, ball_in_over, outcome, event.score
        );
        #[cfg(feature = "debug-tracing")]
        trace!(
            "striker={} non_striker={} bowler={} previous={:?}",
            self.striker, self.non_striker, self.bowler, self.previous_bowler
        );

        self.deliveries.push(event.clone());
        Ok(event)
    }

    /// Send in the next batter for the dismissed striker.
    ///
    /// Takes the first position not yet used, scanning on from one past the
    /// higher of the two current positions. The scan then wraps to the top of
    /// the order, which only matters when the openers were not the first two
    /// batters: those skipped top-order players still get to bat before the
    /// innings is forced closed. `None` when every batter has been in.
    fn replace_striker(&mut self) -> Option<PlayerId> {
        let len = self.batting.len();
        let start = self.striker.max(self.non_striker) + 1;
        let next = (start..len)
            .chain(0..start.min(len))
            .find(|&pos| !self.batting[pos].batted)?;

        self.batting[next].batted = true;
        self.striker = next;
        Some(self.batting[next].player)
    }

    /// Hand the ball to the next bowler in the order.
    ///
    /// Round robin, skipping whoever bowled the over just finished.
    fn rotate_bowler(&mut self) {
        let len = self.bowling.len();
        let finished = self.bowler;
        self.previous_bowler = Some(finished);
        self.bowler = (1..len)
            .map(|step| (finished + step) % len)
            .find(|&pos| Some(pos) != self.previous_bowler)
            .unwrap_or(finished);
    }

    fn update_phase(&mut self, batters_exhausted: bool) {
        let reason = if self.wickets >= self.config.max_wickets {
            Some(CompletionReason::WicketLimit)
        } else if batters_exhausted {
            Some(CompletionReason::BattersExhausted)
        } else if self.overs >= self.config.max_overs {
            Some(CompletionReason::OverLimit)
        } else {
            None
        };

        if let Some(reason) = reason {
            debug!("Innings closed at {} ({:?})", self.score(), reason);
            self.phase = InningsPhase::Complete(reason);
        }
    }

    /// Bowl until the innings closes.
    pub fn play_out<S>(
        &mut self,
        players: &mut PlayerArena,
        source: &mut S,
    ) -> Result<ScoreLine, InningsError>
    where
        S: BallSource + ?Sized,
    {
        while !self.is_complete() {
            self.bowl_ball(players, source)?;
        }
        Ok(self.score())
    }

    /// Lazily bowl the rest of the innings, one event per ball.
    ///
    /// Ends when the innings closes or the source runs dry.
    pub fn ball_by_ball<'a, S>(
        &'a mut self,
        players: &'a mut PlayerArena,
        source: &'a mut S,
    ) -> BallByBall<'a, S>
    where
        S: BallSource + ?Sized,
    {
        BallByBall {
            innings: self,
            players,
            source,
            stopped_by: None,
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Batting side.
    pub fn batting_team(&self) -> TeamId {
        self.batting_team
    }

    /// Bowling side.
    pub fn bowling_team(&self) -> TeamId {
        self.bowling_team
    }

    /// Current phase.
    pub fn phase(&self) -> InningsPhase {
        self.phase
    }

    /// Has the innings closed?
    #[inline]
    pub fn is_complete(&self) -> bool {
        matches!(self.phase, InningsPhase::Complete(_))
    }

    /// Why the innings closed, if it has.
    pub fn completion(&self) -> Option<CompletionReason> {
        match self.phase {
            InningsPhase::Complete(reason) => Some(reason),
            InningsPhase::InProgress => None,
        }
    }

    /// Current score.
    pub fn score(&self) -> ScoreLine {
        ScoreLine {
            runs: self.runs,
            wickets: self.wickets,
            overs: self.overs,
            balls: self.balls_in_over,
        }
    }

    /// Total deliveries bowled.
    pub fn balls_bowled(&self) -> u32 {
        self.balls_bowled
    }

    /// Batter on strike.
    pub fn striker(&self) -> PlayerId {
        self.batting[self.striker].player
    }

    /// Batter at the other end.
    pub fn non_striker(&self) -> PlayerId {
        self.batting[self.non_striker].player
    }

    /// Bowler of the current over.
    pub fn current_bowler(&self) -> PlayerId {
        self.bowling[self.bowler].player
    }

    /// Bowler of the previous over.
    pub fn previous_bowler(&self) -> Option<PlayerId> {
        self.previous_bowler.map(|pos| self.bowling[pos].player)
    }

    /// Batting scorecard in batting order.
    pub fn batters(&self) -> &[BatterLine] {
        &self.batting
    }

    /// Bowling scorecard in bowling order.
    pub fn bowlers(&self) -> &[BowlerLine] {
        &self.bowling
    }

    /// Every delivery so far.
    pub fn deliveries(&self) -> &[BallEvent] {
        &self.deliveries
    }

    /// Runs credited to a batter in this innings.
    pub fn runs_of(&self, player: PlayerId) -> u32 {
        self.batting
            .iter()
            .filter(|line| line.player == player)
            .map(|line| line.runs)
            .sum()
    }

    /// Wickets credited to a bowler in this innings.
    pub fn wickets_of(&self, player: PlayerId) -> u32 {
        self.bowling
            .iter()
            .filter(|line| line.player == player)
            .map(|line| line.wickets)
            .sum()
    }

    /// Highest match credit among both orders, batting order scanned first.
    pub fn standout(&self, players: &PlayerArena) -> Option<PlayerId> {
        let batting = self.batting.iter().map(|line| line.player);
        let bowling = self.bowling.iter().map(|line| line.player);
        best_by_credit(players, batting.chain(bowling), CreditScope::Match)
    }

    /// Digest of every delivery and the final state.
    pub fn compute_digest(&self) -> RecordDigest {
        let mut hasher = RecordHasher::for_innings();
        hasher.update_u32(self.batting_team.0);
        hasher.update_u32(self.bowling_team.0);
        for event in &self.deliveries {
            event.hash_into(&mut hasher);
        }
        hasher.update_u32(self.runs);
        hasher.update_u32(self.wickets);
        hasher.update_u32(self.balls_bowled);
        hasher.update_u8(self.completion().map_or(u8::MAX, |reason| reason as u8));
        hasher.finalize()
    }

    /// Close the books on a finished innings.
    pub fn finish(self, players: &PlayerArena) -> Result<InningsSummary, InningsError> {
        let completion = self.completion().ok_or(InningsError::InProgress)?;
        Ok(InningsSummary {
            batting_team: self.batting_team,
            bowling_team: self.bowling_team,
            score: self.score(),
            completion,
            standout: self.standout(players),
            digest: self.compute_digest(),
            batters: self.batting,
            bowlers: self.bowling,
            deliveries: self.deliveries,
        })
    }
}

/// Lazy, finite ball-by-ball run of an innings.
///
/// Not restartable: it drives the innings it borrows. The first error ends
/// the run for good and is kept in [`BallByBall::stopped_by`], so a closed
/// innings can be told apart from a source that ran dry.
pub struct BallByBall<'a, S: ?Sized> {
    innings: &'a mut Innings,
    players: &'a mut PlayerArena,
    source: &'a mut S,
    stopped_by: Option<InningsError>,
}

impl<'a, S: ?Sized> BallByBall<'a, S> {
    /// Why the run ended, once it has.
    pub fn stopped_by(&self) -> Option<&InningsError> {
        self.stopped_by.as_ref()
    }
}

impl<'a, S> Iterator for BallByBall<'a, S>
where
    S: BallSource + ?Sized,
{
    type Item = BallEvent;

    fn next(&mut self) -> Option<Self::Item> {
        if self.stopped_by.is_some() {
            return None;
        }
        match self.innings.bowl_ball(self.players, self.source) {
            Ok(event) => Some(event),
            Err(err) => {
                self.stopped_by = Some(err);
                None
            }
        }
    }
}

impl<'a, S> FusedIterator for BallByBall<'a, S> where S: BallSource + ?Sized {}

/// Final figures of a closed innings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InningsSummary {
    /// Batting side
    pub batting_team: TeamId,
    /// Bowling side
    pub bowling_team: TeamId,
    /// Final score
    pub score: ScoreLine,
    /// Why it closed
    pub completion: CompletionReason,
    /// Highest match credit when it closed
    pub standout: Option<PlayerId>,
    /// Batting scorecard
    pub batters: Vec<BatterLine>,
    /// Bowling scorecard
    pub bowlers: Vec<BowlerLine>,
    /// Every delivery
    pub deliveries: Vec<BallEvent>,
    /// Digest of the innings
    pub digest: RecordDigest,
}

// =============================================================================
// TESTS
// =============================================================================
