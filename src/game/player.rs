//! Player Definitions
//!
//! Players live in a single [`PlayerArena`] and are referred to everywhere
//! else by [`PlayerId`]. Teams, lineups and innings scorecards hold ids only.

use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::game::outcome::BallOutcome;
use crate::RUNS_PER_CREDIT;

// =============================================================================
// PLAYER ID
// =============================================================================

/// Stable index of a player in its arena.
///
/// Ids are handed out in creation order, so iterating ids is iterating
/// players in the order they were registered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u32);

impl PlayerId {
    /// Position in the arena.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

// =============================================================================
// ROLE
// =============================================================================

/// What a player is picked for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Specialist batter
    Batter,
    /// Specialist bowler
    Bowler,
    /// Both
    AllRounder,
}

impl Role {
    /// Batters and all-rounders can bat.
    #[inline]
    pub fn can_bat(self) -> bool {
        matches!(self, Role::Batter | Role::AllRounder)
    }

    /// Bowlers and all-rounders can bowl.
    #[inline]
    pub fn can_bowl(self) -> bool {
        matches!(self, Role::Bowler | Role::AllRounder)
    }

    /// Credit earned for a run and wicket haul.
    ///
    /// Batting credit is one per [`RUNS_PER_CREDIT`] runs, bowling credit one
    /// per wicket. Each role only earns the credit of its own discipline.
    pub fn credit(self, runs: u32, wickets: u32) -> u32 {
        match self {
            Role::Batter => runs / RUNS_PER_CREDIT,
            Role::Bowler => wickets,
            Role::AllRounder => runs / RUNS_PER_CREDIT + wickets,
        }
    }
}

/// Which credit total a ranking looks at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CreditScope {
    /// Credit earned in the current match
    Match,
    /// Credit accumulated over every closed match
    Career,
}

// =============================================================================
// STATS
// =============================================================================

/// Batting figures.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattingStats {
    /// Runs scored
    pub runs: u32,
    /// Deliveries faced
    pub balls_faced: u32,
    /// Boundaries worth four
    pub fours: u32,
    /// Boundaries worth six
    pub sixes: u32,
    /// Times dismissed
    pub dismissals: u32,
}

impl BattingStats {
    fn record(&mut self, outcome: BallOutcome) {
        self.balls_faced += 1;
        match outcome {
            BallOutcome::Wicket => self.dismissals += 1,
            BallOutcome::Runs(runs) => {
                self.runs += runs as u32;
                match runs {
                    4 => self.fours += 1,
                    6 => self.sixes += 1,
                    _ => {}
                }
            }
        }
    }

    fn absorb(&mut self, other: &BattingStats) {
        self.runs += other.runs;
        self.balls_faced += other.balls_faced;
        self.fours += other.fours;
        self.sixes += other.sixes;
        self.dismissals += other.dismissals;
    }

    /// Runs per hundred balls.
    pub fn strike_rate(&self) -> f64 {
        if self.balls_faced == 0 {
            return 0.0;
        }
        self.runs as f64 * 100.0 / self.balls_faced as f64
    }
}

/// Bowling figures.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BowlingStats {
    /// Deliveries bowled
    pub balls_bowled: u32,
    /// Runs conceded
    pub runs_conceded: u32,
    /// Wickets taken
    pub wickets: u32,
}

impl BowlingStats {
    fn record(&mut self, outcome: BallOutcome) {
        self.balls_bowled += 1;
        match outcome {
            BallOutcome::Wicket => self.wickets += 1,
            BallOutcome::Runs(runs) => self.runs_conceded += runs as u32,
        }
    }

    fn absorb(&mut self, other: &BowlingStats) {
        self.balls_bowled += other.balls_bowled;
        self.runs_conceded += other.runs_conceded;
        self.wickets += other.wickets;
    }

    /// Runs conceded per over of `balls_per_over` deliveries.
    pub fn economy(&self, balls_per_over: u32) -> f64 {
        if self.balls_bowled == 0 {
            return 0.0;
        }
        self.runs_conceded as f64 * balls_per_over as f64 / self.balls_bowled as f64
    }

    /// Runs conceded per wicket.
    pub fn average(&self) -> f64 {
        if self.wickets == 0 {
            return 0.0;
        }
        self.runs_conceded as f64 / self.wickets as f64
    }
}

/// Batting and bowling figures over one scope.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatLine {
    /// Batting figures
    pub batting: BattingStats,
    /// Bowling figures
    pub bowling: BowlingStats,
}

impl StatLine {
    fn absorb(&mut self, other: &StatLine) {
        self.batting.absorb(&other.batting);
        self.bowling.absorb(&other.bowling);
    }
}

// =============================================================================
// PLAYER
// =============================================================================

/// A player and their running totals.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Player {
    /// Arena id
    pub id: PlayerId,
    /// Name, unique within the player's team
    pub name: String,
    /// Age in years
    pub age: u8,
    /// Role, decides which contributions earn credit
    pub role: Role,
    /// Figures for the match in progress (reset at match start)
    pub this_match: StatLine,
    /// Figures over every match played
    pub career: StatLine,
    /// Sum of the credit of every closed match
    pub career_credits: u32,
    /// Matches closed
    pub matches_played: u32,
}

impl Player {
    /// Create a player with no figures.
    pub fn new(id: PlayerId, name: impl Into<String>, age: u8, role: Role) -> Self {
        Self {
            id,
            name: name.into(),
            age,
            role,
            this_match: StatLine::default(),
            career: StatLine::default(),
            career_credits: 0,
            matches_played: 0,
        }
    }

    /// Can this player bat?
    #[inline]
    pub fn can_bat(&self) -> bool {
        self.role.can_bat()
    }

    /// Can this player bowl?
    #[inline]
    pub fn can_bowl(&self) -> bool {
        self.role.can_bowl()
    }

    /// Record a delivery this player faced. Career figures follow at
    /// [`Player::close_match`].
    pub fn record_ball_faced(&mut self, outcome: BallOutcome) {
        self.this_match.batting.record(outcome);
    }

    /// Record a delivery this player bowled.
    pub fn record_ball_bowled(&mut self, outcome: BallOutcome) {
        self.this_match.bowling.record(outcome);
    }

    /// Credit earned so far in the current match.
    pub fn match_credits(&self) -> u32 {
        self.role
            .credit(self.this_match.batting.runs, self.this_match.bowling.wickets)
    }

    /// Credit in the given scope.
    pub fn credits(&self, scope: CreditScope) -> u32 {
        match scope {
            CreditScope::Match => self.match_credits(),
            CreditScope::Career => self.career_credits,
        }
    }

    /// Clear match figures before a new match.
    pub fn begin_match(&mut self) {
        self.this_match = StatLine::default();
    }

    /// Bank the match figures and credit into the career totals. Returns the
    /// credit banked.
    ///
    /// Must run exactly once per match. A match that never closes leaves the
    /// career untouched.
    pub fn close_match(&mut self) -> u32 {
        let credit = self.match_credits();
        self.career.absorb(&self.this_match);
        self.career_credits += credit;
        self.matches_played += 1;
        credit
    }
}

// =============================================================================
// PLAYER ARENA
// =============================================================================

/// Owner of every player in a tournament.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PlayerArena {
    players: Vec<Player>,
}

impl PlayerArena {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a player and return its id.
    pub fn add(&mut self, name: impl Into<String>, age: u8, role: Role) -> PlayerId {
        let id = PlayerId(self.players.len() as u32);
        self.players.push(Player::new(id, name, age, role));
        id
    }

    /// Get a player by id.
    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id.index())
    }

    /// Get a player mutably by id.
    pub fn get_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.get_mut(id.index())
    }

    /// Is this id from this arena?
    pub fn contains(&self, id: PlayerId) -> bool {
        id.index() < self.players.len()
    }

    /// Find a player by name among the given ids.
    pub fn find_in(&self, ids: &[PlayerId], name: &str) -> Option<PlayerId> {
        ids.iter()
            .copied()
            .find(|&id| self.get(id).is_some_and(|p| p.name == name))
    }

    /// Display name of a player, `"?"` for a foreign id.
    pub fn name(&self, id: PlayerId) -> &str {
        self.get(id).map(|p| p.name.as_str()).unwrap_or("?")
    }

    /// All players in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.iter()
    }

    /// All ids in order.
    pub fn ids(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.players.iter().map(|p| p.id)
    }

    /// Number of players.
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// No players registered?
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

impl Index<PlayerId> for PlayerArena {
    type Output = Player;

    fn index(&self, id: PlayerId) -> &Player {
        &self.players[id.index()]
    }
}

impl IndexMut<PlayerId> for PlayerArena {
    fn index_mut(&mut self, id: PlayerId) -> &mut Player {
        &mut self.players[id.index()]
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_capabilities() {
        assert!(Role::Batter.can_bat() && !Role::Batter.can_bowl());
        assert!(!Role::Bowler.can_bat() && Role::Bowler.can_bowl());
        assert!(Role::AllRounder.can_bat() && Role::AllRounder.can_bowl());
    }

    #[test]
    fn test_role_credit() {
        assert_eq!(Role::Batter.credit(45, 3), 2);
        assert_eq!(Role::Bowler.credit(45, 3), 3);
        assert_eq!(Role::AllRounder.credit(45, 3), 5);
        assert_eq!(Role::Batter.credit(19, 0), 0);
        assert_eq!(Role::Batter.credit(20, 0), 1);
    }

    #[test]
    fn test_batting_record() {
        let mut arena = PlayerArena::new();
        let id = arena.add("Rohit", 30, Role::Batter);

        for outcome in [BallOutcome::Runs(4), BallOutcome::Runs(6), BallOutcome::DOT, BallOutcome::Wicket] {
            arena[id].record_ball_faced(outcome);
        }

        let batting = arena[id].this_match.batting;
        assert_eq!(batting.runs, 10);
        assert_eq!(batting.balls_faced, 4);
        assert_eq!(batting.fours, 1);
        assert_eq!(batting.sixes, 1);
        assert_eq!(batting.dismissals, 1);
        assert_eq!(batting.strike_rate(), 250.0);
        assert_eq!(arena[id].career.batting, BattingStats::default());

        arena[id].close_match();
        assert_eq!(arena[id].career.batting, batting);
    }

    #[test]
    fn test_bowling_record() {
        let mut stats = BowlingStats::default();
        assert_eq!(stats.economy(6), 0.0);
        assert_eq!(stats.average(), 0.0);

        for outcome in [BallOutcome::Runs(1), BallOutcome::Wicket, BallOutcome::Runs(2)] {
            stats.record(outcome);
        }

        assert_eq!(stats.balls_bowled, 3);
        assert_eq!(stats.runs_conceded, 3);
        assert_eq!(stats.wickets, 1);
        assert_eq!(stats.economy(6), 6.0);
        assert_eq!(stats.average(), 3.0);
    }

    #[test]
    fn test_close_match_banks_credit_once() {
        let mut arena = PlayerArena::new();
        let id = arena.add("Hardik", 28, Role::AllRounder);

        arena[id].begin_match();
        for _ in 0..4 {
            arena[id].record_ball_faced(BallOutcome::Runs(6));
        }
        arena[id].record_ball_bowled(BallOutcome::Wicket);
        assert_eq!(arena[id].match_credits(), 2);

        assert_eq!(arena[id].close_match(), 2);
        assert_eq!(arena[id].career_credits, 2);

        // Next match starts from zero but the career total stays
        arena[id].begin_match();
        assert_eq!(arena[id].credits(CreditScope::Match), 0);
        assert_eq!(arena[id].credits(CreditScope::Career), 2);
        assert_eq!(arena[id].career.batting.runs, 24);
        assert_eq!(arena[id].career.bowling.wickets, 1);
    }

    #[test]
    fn test_unclosed_match_leaves_career_alone() {
        let mut arena = PlayerArena::new();
        let id = arena.add("Jadeja", 35, Role::AllRounder);

        arena[id].begin_match();
        arena[id].record_ball_faced(BallOutcome::Runs(4));
        arena[id].record_ball_bowled(BallOutcome::Wicket);

        // Abandoned: the next match starts without closing this one
        arena[id].begin_match();
        assert_eq!(arena[id].career, StatLine::default());
        assert_eq!(arena[id].career_credits, 0);
        assert_eq!(arena[id].matches_played, 0);
    }

    #[test]
    fn test_match_credit_counts_whole_match() {
        let mut arena = PlayerArena::new();
        let id = arena.add("Virat", 33, Role::Batter);

        // 20 runs in singles and twos still earn one credit
        for _ in 0..10 {
            arena[id].record_ball_faced(BallOutcome::Runs(2));
        }
        assert_eq!(arena[id].match_credits(), 1);
    }

    #[test]
    fn test_arena_lookup() {
        let mut arena = PlayerArena::new();
        let a = arena.add("A", 20, Role::Batter);
        let b = arena.add("B", 21, Role::Bowler);
        let c = arena.add("A", 22, Role::Bowler);

        assert_eq!(arena.len(), 3);
        assert_eq!(arena.find_in(&[a, b], "B"), Some(b));
        assert_eq!(arena.find_in(&[b, c], "A"), Some(c));
        assert_eq!(arena.find_in(&[b], "A"), None);
        assert_eq!(arena.name(PlayerId(99)), "?");
        assert!(!arena.contains(PlayerId(3)));
        assert_eq!(arena.ids().collect::<Vec<_>>(), vec![a, b, c]);
    }
}
