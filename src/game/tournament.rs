//! Tournament Layer
//!
//! Round-robin league: every pair of teams meets once, the earlier team in
//! the roster batting first. Each fixture is played with its own seeded
//! generator, so a tournament is fully described by its config.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::hash::{RecordDigest, RecordHasher};
use crate::core::rng::{derive_match_seed, DeterministicRng};
use crate::game::aggregate::{best_by_credit, rank_teams};
use crate::game::config::{ConfigError, MatchConfig};
use crate::game::innings::InningsSetup;
use crate::game::match_play::{play_match, Fixture, MatchError, MatchRecord, MatchSetup};
use crate::game::player::{CreditScope, PlayerArena, PlayerId, Role};
use crate::game::team::{Team, TeamId};

// =============================================================================
// CONFIGURATION
// =============================================================================

/// A player entry in a tournament file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Name, unique within the team
    pub name: String,
    /// Age in years
    pub age: u8,
    /// Batter, Bowler or AllRounder
    pub role: Role,
}

/// A team entry in a tournament file.
///
/// Openers left out default to the top two of the batting order and the
/// first of the bowling order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamConfig {
    /// Team name
    pub name: String,
    /// Home ground
    pub home: String,
    /// Roster in batting order
    pub players: Vec<PlayerConfig>,
    /// Opening striker
    #[serde(default)]
    pub striker: Option<String>,
    /// Opening non-striker
    #[serde(default)]
    pub non_striker: Option<String>,
    /// Bowler of the first over when this team fields
    #[serde(default)]
    pub opening_bowler: Option<String>,
}

/// A whole tournament, as loaded from JSON.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentConfig {
    /// Tournament name
    pub name: String,
    /// Seed every fixture seed is derived from
    #[serde(default)]
    pub seed: u64,
    /// Date of the first fixture
    pub start_date: NaiveDate,
    /// Limits for every match
    #[serde(default, rename = "match")]
    pub match_config: MatchConfig,
    /// Teams in roster order
    pub teams: Vec<TeamConfig>,
}

impl TournamentConfig {
    /// Parse a tournament from JSON.
    pub fn from_json(json: &str) -> Result<Self, TournamentError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, TournamentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Built-in four-team league.
    pub fn demo(seed: u64) -> Self {
        let team = |name: &str, home: &str, players: [(&str, u8, Role); 5]| TeamConfig {
            name: name.to_string(),
            home: home.to_string(),
            players: players
                .iter()
                .map(|&(name, age, role)| PlayerConfig {
                    name: name.to_string(),
                    age,
                    role,
                })
                .collect(),
            striker: None,
            non_striker: None,
            opening_bowler: None,
        };

        Self {
            name: "Mini Premier League".to_string(),
            seed,
            start_date: NaiveDate::from_ymd_opt(2024, 3, 22).unwrap_or(NaiveDate::MIN),
            match_config: MatchConfig::default(),
            teams: vec![
                team(
                    "Mumbai Indians",
                    "Mumbai",
                    [
                        ("Rohit", 36, Role::Batter),
                        ("Ishan", 25, Role::Batter),
                        ("Hardik", 30, Role::AllRounder),
                        ("Bumrah", 30, Role::Bowler),
                        ("Chawla", 35, Role::Bowler),
                    ],
                ),
                team(
                    "Chennai Super Kings",
                    "Chennai",
                    [
                        ("Ruturaj", 27, Role::Batter),
                        ("Conway", 32, Role::Batter),
                        ("Jadeja", 35, Role::AllRounder),
                        ("Deepak", 31, Role::Bowler),
                        ("Theekshana", 23, Role::Bowler),
                    ],
                ),
                team(
                    "Royal Challengers",
                    "Bangalore",
                    [
                        ("Virat", 35, Role::Batter),
                        ("Faf", 39, Role::Batter),
                        ("Maxwell", 35, Role::AllRounder),
                        ("Siraj", 30, Role::Bowler),
                        ("Karn", 36, Role::Bowler),
                    ],
                ),
                team(
                    "Kolkata Knight Riders",
                    "Kolkata",
                    [
                        ("Shreyas", 29, Role::Batter),
                        ("Rinku", 26, Role::Batter),
                        ("Russell", 35, Role::AllRounder),
                        ("Starc", 34, Role::Bowler),
                        ("Narine", 35, Role::Bowler),
                    ],
                ),
            ],
        }
    }
}

/// Tournament errors.
#[derive(Debug, thiserror::Error)]
pub enum TournamentError {
    /// Bad rosters or limits.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A fixture could not be played.
    #[error("fixture failed: {0}")]
    Match(#[from] MatchError),

    /// Tournament file could not be read as JSON.
    #[error("invalid tournament file: {0}")]
    Json(#[from] serde_json::Error),

    /// The schedule runs past the last representable date.
    #[error("fixture {0} falls outside the calendar")]
    DateOverflow(u32),
}

// =============================================================================
// TOURNAMENT
// =============================================================================

/// Opening names a team plays with.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Openers {
    striker: String,
    non_striker: String,
    bowler: String,
}

/// A league in progress.
#[derive(Clone, Debug)]
pub struct Tournament {
    name: String,
    seed: u64,
    config: MatchConfig,
    players: PlayerArena,
    teams: Vec<Team>,
    openers: Vec<Openers>,
    fixtures: Vec<Fixture>,
    results: Vec<MatchRecord>,
}

impl Tournament {
    /// Build rosters and the schedule.
    ///
    /// Every team is checked for a playable side before any fixture is
    /// drawn up, so a bad roster fails here rather than mid-tournament.
    pub fn from_config(config: &TournamentConfig) -> Result<Self, TournamentError> {
        config.match_config.validate()?;

        let mut players = PlayerArena::new();
        let mut teams: Vec<Team> = Vec::with_capacity(config.teams.len());
        let mut openers = Vec::with_capacity(config.teams.len());

        for (index, entry) in config.teams.iter().enumerate() {
            if teams.iter().any(|t| t.name == entry.name) {
                return Err(ConfigError::DuplicateTeam(entry.name.clone()).into());
            }

            let mut team = Team::new(TeamId(index as u32), &entry.name, &entry.home);
            for player in &entry.players {
                team.add_player(players.add(&player.name, player.age, player.role));
            }
            team.select_fielded(config.match_config.squad_size);
            team.validate_fielded(&players, &config.match_config)?;

            openers.push(resolve_openers(&team, &players, entry)?);
            teams.push(team);
        }

        let mut fixtures = Vec::new();
        for home in 0..teams.len() {
            for away in home + 1..teams.len() {
                let index = fixtures.len() as u32;
                let date = config
                    .start_date
                    .checked_add_days(Days::new(u64::from(index)))
                    .ok_or(TournamentError::DateOverflow(index))?;
                fixtures.push(Fixture {
                    index,
                    home: teams[home].id,
                    away: teams[away].id,
                    venue: teams[home].home.clone(),
                    date,
                    seed: derive_match_seed(
                        config.seed,
                        index,
                        [teams[home].name.as_str(), teams[away].name.as_str()],
                    ),
                });
            }
        }

        info!(
            "Tournament '{}': {} teams, {} fixtures, seed {}",
            config.name,
            teams.len(),
            fixtures.len(),
            config.seed
        );

        Ok(Self {
            name: config.name.clone(),
            seed: config.seed,
            config: config.match_config.clone(),
            players,
            teams,
            openers,
            fixtures,
            results: Vec::new(),
        })
    }

    /// Play the next scheduled fixture. `None` once every fixture is done.
    pub fn play_next(&mut self) -> Result<Option<&MatchRecord>, TournamentError> {
        let Some(fixture) = self.fixtures.get(self.results.len()).cloned() else {
            return Ok(None);
        };

        let home = fixture.home.0 as usize;
        let away = fixture.away.0 as usize;
        let setup = MatchSetup {
            first: self.innings_setup(home, away),
            second: self.innings_setup(away, home),
        };
        let mut rng = DeterministicRng::for_fixture(
            self.seed,
            fixture.index,
            [self.teams[home].name.as_str(), self.teams[away].name.as_str()],
        );

        let (home_team, away_team) = pair_mut(&mut self.teams, home, away);
        let record = play_match(
            &fixture,
            home_team,
            away_team,
            &mut self.players,
            &setup,
            &self.config,
            &mut rng,
        )?;

        self.results.push(record);
        Ok(self.results.last())
    }

    /// Play every remaining fixture.
    pub fn play_all(&mut self) -> Result<&[MatchRecord], TournamentError> {
        while self.play_next()?.is_some() {}
        if self.teams.len() < 2 {
            warn!("Tournament '{}' has no fixtures to play", self.name);
        }
        Ok(&self.results)
    }

    fn innings_setup(&self, batting: usize, bowling: usize) -> InningsSetup {
        InningsSetup::new(
            &self.openers[batting].striker,
            &self.openers[batting].non_striker,
            &self.openers[bowling].bowler,
        )
    }

    // -------------------------------------------------------------------------
    // Standings
    // -------------------------------------------------------------------------

    /// Teams by points, highest first; ties keep roster order.
    pub fn points_table(&self) -> Vec<&Team> {
        rank_teams(&self.teams)
    }

    /// Top of the points table. `None` without teams.
    pub fn champion(&self) -> Option<&Team> {
        self.points_table().into_iter().next()
    }

    /// Player with the most career credit across every team.
    pub fn player_of_tournament(&self) -> Option<PlayerId> {
        best_by_credit(&self.players, self.players.ids(), CreditScope::Career)
    }

    /// Digest over every match played so far.
    pub fn digest(&self) -> RecordDigest {
        let mut hasher = RecordHasher::new(b"MINI_CRICKET_TOURNAMENT_V1");
        hasher.update_str(&self.name);
        hasher.update_u64(self.seed);
        hasher.update_u32(self.results.len() as u32);
        for record in &self.results {
            hasher.update_digest(&record.digest);
        }
        hasher.finalize()
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Tournament name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Limits every match runs under.
    pub fn match_config(&self) -> &MatchConfig {
        &self.config
    }

    /// Every player.
    pub fn players(&self) -> &PlayerArena {
        &self.players
    }

    /// Teams in roster order.
    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    /// Team by id.
    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.get(id.0 as usize)
    }

    /// Full schedule.
    pub fn fixtures(&self) -> &[Fixture] {
        &self.fixtures
    }

    /// Finished matches, in schedule order.
    pub fn results(&self) -> &[MatchRecord] {
        &self.results
    }

    /// Has every fixture been played?
    pub fn is_complete(&self) -> bool {
        self.results.len() == self.fixtures.len()
    }
}

/// Resolve a team's openers, falling back to the top of its orders.
fn resolve_openers(
    team: &Team,
    players: &PlayerArena,
    entry: &TeamConfig,
) -> Result<Openers, ConfigError> {
    let pick = |chosen: &Option<String>, fallback: usize| -> Result<String, ConfigError> {
        match chosen {
            Some(name) => team
                .find_fielded(players, name)
                .map(|_| name.clone())
                .ok_or_else(|| ConfigError::UnknownPlayer {
                    team: team.name.clone(),
                    player: name.clone(),
                }),
            None => Ok(players.name(team.fielded[fallback]).to_string()),
        }
    };

    let openers = Openers {
        striker: pick(&entry.striker, 0)?,
        non_striker: pick(&entry.non_striker, 1)?,
        bowler: pick(&entry.opening_bowler, 0)?,
    };
    if openers.striker == openers.non_striker {
        return Err(ConfigError::SameBatterBothEnds(openers.striker));
    }
    Ok(openers)
}

/// Borrow two distinct teams mutably. `first` must come before `second`.
fn pair_mut(teams: &mut [Team], first: usize, second: usize) -> (&mut Team, &mut Team) {
    let (left, right) = teams.split_at_mut(second);
    (&mut left[first], &mut right[0])
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::team::MatchResult;

    const LEAGUE_JSON: &str = r#"{
        "name": "Test League",
        "seed": 99,
        "start_date": "2024-04-01",
        "match": { "max_overs": 3 },
        "teams": [
            {
                "name": "North",
                "home": "Leeds",
                "striker": "N2",
                "non_striker": "N0",
                "opening_bowler": "N4",
                "players": [
                    { "name": "N0", "age": 21, "role": "Batter" },
                    { "name": "N1", "age": 22, "role": "Batter" },
                    { "name": "N2", "age": 23, "role": "AllRounder" },
                    { "name": "N3", "age": 24, "role": "Bowler" },
                    { "name": "N4", "age": 25, "role": "Bowler" },
                    { "name": "N5", "age": 26, "role": "Bowler" }
                ]
            },
            {
                "name": "South",
                "home": "Brighton",
                "players": [
                    { "name": "S0", "age": 31, "role": "AllRounder" },
                    { "name": "S1", "age": 32, "role": "AllRounder" },
                    { "name": "S2", "age": 33, "role": "AllRounder" },
                    { "name": "S3", "age": 34, "role": "AllRounder" },
                    { "name": "S4", "age": 35, "role": "AllRounder" }
                ]
            }
        ]
    }"#;

    #[test]
    fn test_demo_schedule() {
        let tournament = Tournament::from_config(&TournamentConfig::demo(1)).unwrap();

        let pairs: Vec<(u32, u32)> = tournament
            .fixtures()
            .iter()
            .map(|f| (f.home.0, f.away.0))
            .collect();
        assert_eq!(pairs, vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]);

        let first = &tournament.fixtures()[0];
        let last = &tournament.fixtures()[5];
        assert_eq!(first.venue, "Mumbai");
        assert_eq!(last.venue, "Bangalore");
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2024, 3, 22).unwrap());
        assert_eq!(last.date, NaiveDate::from_ymd_opt(2024, 3, 27).unwrap());
        assert_eq!(
            first.seed,
            derive_match_seed(1, 0, ["Mumbai Indians", "Chennai Super Kings"])
        );
    }

    #[test]
    fn test_demo_tournament_plays_out() {
        let mut tournament = Tournament::from_config(&TournamentConfig::demo(42)).unwrap();

        let results = tournament.play_all().unwrap();
        assert_eq!(results.len(), 6);
        assert!(tournament.is_complete());
        assert!(tournament.play_next().unwrap().is_none());

        // Every match hands out two points between the sides
        let total: u32 = tournament.teams().iter().map(|t| t.record.points()).sum();
        assert_eq!(total, 12);
        assert!(tournament.teams().iter().all(|t| t.record.played() == 3));

        let table = tournament.points_table();
        assert!(table.windows(2).all(|w| w[0].record.points() >= w[1].record.points()));
        assert_eq!(tournament.champion().map(|t| t.id), Some(table[0].id));

        let best = tournament.player_of_tournament().unwrap();
        let top = tournament.players().iter().map(|p| p.career_credits).max().unwrap();
        assert_eq!(tournament.players()[best].career_credits, top);
        assert!(tournament.players().iter().all(|p| p.matches_played == 3));
    }

    #[test]
    fn test_same_seed_same_tournament() {
        let run = |seed: u64| {
            let mut tournament = Tournament::from_config(&TournamentConfig::demo(seed)).unwrap();
            tournament.play_all().unwrap();
            let results: Vec<MatchResult> = tournament.results().iter().map(|r| r.result).collect();
            (tournament.digest(), results)
        };

        assert_eq!(run(7), run(7));
        assert_ne!(run(7).0, run(8).0);
    }

    #[test]
    fn test_json_config() {
        let config = TournamentConfig::from_json(LEAGUE_JSON).unwrap();
        assert_eq!(config.match_config.max_overs, 3);
        assert_eq!(config.match_config.max_wickets, 2);

        let mut tournament = Tournament::from_config(&config).unwrap();
        assert_eq!(tournament.fixtures().len(), 1);
        // Sixth North player stays on the bench
        assert_eq!(tournament.teams()[0].fielded.len(), 5);

        let record = tournament.play_next().unwrap().unwrap().clone();
        let players = tournament.players();
        assert_eq!(players.name(record.first.deliveries[0].striker), "N2");
        assert_eq!(players.name(record.first.deliveries[0].bowler), "S0");
        assert_eq!(players.name(record.second.deliveries[0].striker), "S0");
        assert_eq!(players.name(record.second.deliveries[0].bowler), "N4");

        let again = TournamentConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(again, config);
    }

    #[test]
    fn test_sample_file_plays() {
        let config =
            TournamentConfig::from_json(include_str!("../../demos/tournament.json")).unwrap();
        assert_eq!(config.match_config.outcomes.cardinality(), 7);
        assert_eq!(config.match_config.outcomes.total_weight(), 13);

        let mut tournament = Tournament::from_config(&config).unwrap();
        assert_eq!(tournament.play_all().unwrap().len(), 3);
        assert!(tournament.champion().is_some());
    }

    #[test]
    fn test_bad_configs_rejected() {
        let mut config = TournamentConfig::demo(0);
        config.teams[1].name = "Mumbai Indians".to_string();
        assert!(matches!(
            Tournament::from_config(&config),
            Err(TournamentError::Config(ConfigError::DuplicateTeam(_)))
        ));

        let mut config = TournamentConfig::demo(0);
        config.teams[2].opening_bowler = Some("Kohli".to_string());
        assert!(matches!(
            Tournament::from_config(&config),
            Err(TournamentError::Config(ConfigError::UnknownPlayer { .. }))
        ));

        let mut config = TournamentConfig::demo(0);
        config.teams[0].players.truncate(4);
        assert!(matches!(
            Tournament::from_config(&config),
            Err(TournamentError::Config(ConfigError::SquadSizeMismatch { .. }))
        ));

        assert!(matches!(
            TournamentConfig::from_json("{ \"name\": 3 }"),
            Err(TournamentError::Json(_))
        ));

        let huge = LEAGUE_JSON.replace(r#""max_overs": 3"#, r#""max_overs": 4294967295"#);
        let config = TournamentConfig::from_json(&huge).unwrap();
        assert!(matches!(
            Tournament::from_config(&config),
            Err(TournamentError::Config(ConfigError::InvalidLimit { field: "max_overs", .. }))
        ));
    }

    #[test]
    fn test_empty_tournament() {
        let mut config = TournamentConfig::demo(0);
        config.teams.clear();
        let mut tournament = Tournament::from_config(&config).unwrap();

        assert!(tournament.play_all().unwrap().is_empty());
        assert!(tournament.champion().is_none());
        assert!(tournament.player_of_tournament().is_none());
    }
}
