//! Teams and Season Records

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::game::config::{ConfigError, MatchConfig};
use crate::game::player::{PlayerArena, PlayerId};
use crate::{POINTS_FOR_TIE, POINTS_FOR_WIN};

/// Fewest batting-capable and bowling-capable players a side may field.
pub const MIN_SPECIALISTS: usize = 2;

/// Index of a team in its tournament.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(pub u32);

/// Result of a match from one side's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchResult {
    /// This side scored more
    Win,
    /// The other side scored more
    Loss,
    /// Scores level
    Tie,
    /// Abandoned. Never produced by the simulator.
    NoResult,
}

impl MatchResult {
    /// The same result seen from the other side.
    pub fn reversed(self) -> Self {
        match self {
            MatchResult::Win => MatchResult::Loss,
            MatchResult::Loss => MatchResult::Win,
            other => other,
        }
    }

    /// Table points this result is worth.
    pub fn points(self) -> u32 {
        match self {
            MatchResult::Win => POINTS_FOR_WIN,
            MatchResult::Tie => POINTS_FOR_TIE,
            MatchResult::Loss | MatchResult::NoResult => 0,
        }
    }
}

/// Season counters.
///
/// `points == 2 * won + tied` holds because [`TeamRecord::apply`] is the
/// only mutator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRecord {
    points: u32,
    played: u32,
    won: u32,
    lost: u32,
    tied: u32,
}

impl TeamRecord {
    /// Count one finished match.
    pub fn apply(&mut self, result: MatchResult) {
        self.played += 1;
        match result {
            MatchResult::Win => self.won += 1,
            MatchResult::Loss => self.lost += 1,
            MatchResult::Tie => self.tied += 1,
            MatchResult::NoResult => {}
        }
        self.points += result.points();
    }

    /// Table points.
    pub fn points(&self) -> u32 {
        self.points
    }

    /// Matches played.
    pub fn played(&self) -> u32 {
        self.played
    }

    /// Matches won.
    pub fn won(&self) -> u32 {
        self.won
    }

    /// Matches lost.
    pub fn lost(&self) -> u32 {
        self.lost
    }

    /// Matches tied.
    pub fn tied(&self) -> u32 {
        self.tied
    }

    /// Percentage of matches won, 0 before the first match.
    pub fn win_percentage(&self) -> f64 {
        if self.played == 0 {
            return 0.0;
        }
        self.won as f64 * 100.0 / self.played as f64
    }
}

/// A team and the players it can call on.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Team {
    /// Tournament index
    pub id: TeamId,
    /// Team name
    pub name: String,
    /// Home ground, used as the venue of home fixtures
    pub home: String,
    /// Every registered player, in registration order
    pub roster: Vec<PlayerId>,
    /// Players taking the field; doubles as batting and bowling order
    pub fielded: Vec<PlayerId>,
    /// Season counters
    pub record: TeamRecord,
}

impl Team {
    /// Create a team with an empty roster.
    pub fn new(id: TeamId, name: impl Into<String>, home: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            home: home.into(),
            roster: Vec::new(),
            fielded: Vec::new(),
            record: TeamRecord::default(),
        }
    }

    /// Add a player to the roster.
    pub fn add_player(&mut self, id: PlayerId) {
        self.roster.push(id);
    }

    /// Field the first `squad_size` roster players.
    pub fn select_fielded(&mut self, squad_size: usize) {
        self.fielded = self.roster.iter().copied().take(squad_size).collect();
    }

    /// Batting order of the fielded side.
    pub fn batting_order(&self) -> &[PlayerId] {
        &self.fielded
    }

    /// Bowling order of the fielded side.
    pub fn bowling_order(&self) -> &[PlayerId] {
        &self.fielded
    }

    /// Look up a fielded player by name.
    pub fn find_fielded(&self, players: &PlayerArena, name: &str) -> Option<PlayerId> {
        players.find_in(&self.fielded, name)
    }

    /// Check the roster has no repeated names.
    pub fn validate_roster(&self, players: &PlayerArena) -> Result<(), ConfigError> {
        let mut seen = BTreeSet::new();
        for &id in &self.roster {
            let name = players.name(id);
            if !seen.insert(name) {
                return Err(ConfigError::DuplicatePlayer {
                    team: self.name.clone(),
                    player: name.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Check the fielded side can play a match under `config`.
    pub fn validate_fielded(
        &self,
        players: &PlayerArena,
        config: &MatchConfig,
    ) -> Result<(), ConfigError> {
        self.validate_roster(players)?;

        if self.fielded.len() != config.squad_size {
            return Err(ConfigError::SquadSizeMismatch {
                team: self.name.clone(),
                expected: config.squad_size,
                found: self.fielded.len(),
            });
        }

        let bowlers = self
            .fielded
            .iter()
            .filter(|&&id| players.get(id).is_some_and(|p| p.can_bowl()))
            .count();
        if bowlers < MIN_SPECIALISTS {
            return Err(ConfigError::TooFewBowlers {
                team: self.name.clone(),
                found: bowlers,
                needed: MIN_SPECIALISTS,
            });
        }

        let batters = self
            .fielded
            .iter()
            .filter(|&&id| players.get(id).is_some_and(|p| p.can_bat()))
            .count();
        if batters < MIN_SPECIALISTS {
            return Err(ConfigError::TooFewBatters {
                team: self.name.clone(),
                found: batters,
                needed: MIN_SPECIALISTS,
            });
        }

        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::player::Role;

    fn team_with(players: &mut PlayerArena, roles: &[Role]) -> Team {
        let mut team = Team::new(TeamId(0), "Mumbai Indians", "Mumbai");
        for (i, role) in roles.iter().enumerate() {
            team.add_player(players.add(format!("P{i}"), 25, *role));
        }
        team.select_fielded(roles.len());
        team
    }

    #[test]
    fn test_points_from_results() {
        let mut record = TeamRecord::default();
        for result in [MatchResult::Win, MatchResult::Tie, MatchResult::Loss, MatchResult::Win] {
            record.apply(result);
        }

        assert_eq!(record.played(), 4);
        assert_eq!(record.won(), 2);
        assert_eq!(record.tied(), 1);
        assert_eq!(record.lost(), 1);
        assert_eq!(record.points(), 5);
        assert_eq!(record.win_percentage(), 50.0);
    }

    #[test]
    fn test_no_result_counts_as_played() {
        let mut record = TeamRecord::default();
        record.apply(MatchResult::NoResult);
        assert_eq!(record.played(), 1);
        assert_eq!(record.points(), 0);
    }

    #[test]
    fn test_result_reversal() {
        assert_eq!(MatchResult::Win.reversed(), MatchResult::Loss);
        assert_eq!(MatchResult::Loss.reversed(), MatchResult::Win);
        assert_eq!(MatchResult::Tie.reversed(), MatchResult::Tie);
    }

    #[test]
    fn test_select_fielded_takes_roster_order() {
        let mut players = PlayerArena::new();
        let mut team = team_with(&mut players, &[Role::Batter; 7]);
        team.select_fielded(5);
        assert_eq!(team.fielded, team.roster[..5]);
        assert_eq!(team.find_fielded(&players, "P4"), Some(team.roster[4]));
        assert_eq!(team.find_fielded(&players, "P6"), None);
    }

    #[test]
    fn test_validate_fielded() {
        let config = MatchConfig::default();
        let mut players = PlayerArena::new();

        let good = team_with(
            &mut players,
            &[Role::Batter, Role::Batter, Role::AllRounder, Role::Bowler, Role::Bowler],
        );
        assert_eq!(good.validate_fielded(&players, &config), Ok(()));

        let no_bowlers = team_with(&mut players, &[Role::Batter; 5]);
        assert!(matches!(
            no_bowlers.validate_fielded(&players, &config),
            Err(ConfigError::TooFewBowlers { found: 0, .. })
        ));

        let one_batter = team_with(
            &mut players,
            &[Role::AllRounder, Role::Bowler, Role::Bowler, Role::Bowler, Role::Bowler],
        );
        assert!(matches!(
            one_batter.validate_fielded(&players, &config),
            Err(ConfigError::TooFewBatters { found: 1, .. })
        ));

        let short = team_with(&mut players, &[Role::AllRounder; 4]);
        assert!(matches!(
            short.validate_fielded(&players, &config),
            Err(ConfigError::SquadSizeMismatch { expected: 5, found: 4, .. })
        ));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut players = PlayerArena::new();
        let mut team = Team::new(TeamId(1), "Chennai Super Kings", "Chennai");
        team.add_player(players.add("Dhoni", 40, Role::Batter));
        team.add_player(players.add("Dhoni", 41, Role::Bowler));

        assert_eq!(
            team.validate_roster(&players),
            Err(ConfigError::DuplicatePlayer {
                team: "Chennai Super Kings".to_string(),
                player: "Dhoni".to_string(),
            })
        );
    }
}
