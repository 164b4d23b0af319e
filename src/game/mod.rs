//! Game Logic Module
//!
//! All simulation code. Deterministic given a seed or a scripted ball source.
//!
//! ## Module Structure
//!
//! - `config`: Match limits, outcome distribution, configuration errors
//! - `outcome`: Ball outcomes and the sources that produce them
//! - `player`: Players, roles, credits and the player arena
//! - `team`: Teams, fielded sides and season records
//! - `events`: Ball events for commentary and replay verification
//! - `innings`: Ball-by-ball innings engine
//! - `match_play`: Two-innings match orchestration
//! - `aggregate`: Best-player and team rankings
//! - `tournament`: Round-robin league
//! - `commentary`: Text rendering

pub mod aggregate;
pub mod commentary;
pub mod config;
pub mod events;
pub mod innings;
pub mod match_play;
pub mod outcome;
pub mod player;
pub mod team;
pub mod tournament;

// Re-export key types
pub use config::{ConfigError, MatchConfig};
pub use events::{BallEvent, ScoreLine};
pub use innings::{CompletionReason, Innings, InningsError, InningsPhase, InningsSetup, InningsSummary};
pub use match_play::{play_match, Fixture, MatchError, MatchRecord, MatchSetup};
pub use outcome::{BallOutcome, BallSource, OutcomeDistribution, ScriptedBalls};
pub use player::{CreditScope, Player, PlayerArena, PlayerId, Role};
pub use team::{MatchResult, Team, TeamId};
pub use tournament::{Tournament, TournamentConfig, TournamentError};
