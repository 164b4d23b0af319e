//! # Mini Cricket
//!
//! Deterministic ball-by-ball simulation of a miniature cricket league.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       MINI CRICKET                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── rng.rs      - Xorshift128+ PRNG, fixture seeds          │
//! │  └── hash.rs     - Record digests for replay checks          │
//! │                                                              │
//! │  game/           - Simulation (deterministic)                │
//! │  ├── config.rs   - Match limits and outcome distribution     │
//! │  ├── outcome.rs  - Ball outcomes and ball sources            │
//! │  ├── player.rs   - Players, credits, player arena            │
//! │  ├── team.rs     - Teams and season records                  │
//! │  ├── innings.rs  - Ball-by-ball innings engine               │
//! │  ├── match_play.rs - Two-innings matches                     │
//! │  ├── aggregate.rs  - Rankings                                │
//! │  ├── tournament.rs - Round-robin league                      │
//! │  └── commentary.rs - Text output                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! - No HashMap (BTreeMap where a map is needed)
//! - No system time in the simulation; fixture dates come from config
//! - All randomness from one seeded Xorshift128+ per match
//!
//! The same tournament config always produces the same match digests.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;

// Re-export commonly used types
pub use core::rng::DeterministicRng;
pub use game::innings::{Innings, InningsSetup};
pub use game::player::{PlayerArena, PlayerId};
pub use game::tournament::{Tournament, TournamentConfig};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Players fielded per side
pub const DEFAULT_SQUAD_SIZE: usize = 5;

/// Wickets that close an innings
pub const DEFAULT_MAX_WICKETS: u32 = 2;

/// Overs that close an innings
pub const DEFAULT_MAX_OVERS: u32 = 2;

/// Deliveries per over
pub const DEFAULT_BALLS_PER_OVER: u32 = 6;

/// Runs a batter needs for one credit
pub const RUNS_PER_CREDIT: u32 = 20;

/// Table points for a win
pub const POINTS_FOR_WIN: u32 = 2;

/// Table points for a tie
pub const POINTS_FOR_TIE: u32 = 1;
