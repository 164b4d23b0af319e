//! Mini Cricket
//!
//! Runs a round-robin tournament from a JSON file (or the built-in league),
//! then replays it from the same config to verify every match digest.
//!
//! Usage: `mini-cricket [tournament.json]`

use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use mini_cricket::{
    game::{commentary, MatchRecord},
    Tournament, TournamentConfig, VERSION,
};

/// Seed of the built-in league.
const DEMO_SEED: u64 = 2024;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    info!("Mini Cricket v{}", VERSION);

    let config = match std::env::args().nth(1) {
        Some(path) => load_config(Path::new(&path))?,
        None => {
            info!("No tournament file given, playing the built-in league");
            TournamentConfig::demo(DEMO_SEED)
        }
    };

    let tournament = run(&config)?;
    verify_replay(&config, &tournament)
}

fn load_config(path: &Path) -> Result<TournamentConfig> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading tournament file {}", path.display()))?;
    TournamentConfig::from_json(&json)
        .with_context(|| format!("parsing tournament file {}", path.display()))
}

/// Play every fixture, logging commentary as it goes.
fn run(config: &TournamentConfig) -> Result<Tournament> {
    let mut tournament = Tournament::from_config(config).context("building tournament")?;

    info!("=== {} ===", tournament.name());
    for team in tournament.teams() {
        let names: Vec<&str> = team
            .fielded
            .iter()
            .map(|&id| tournament.players().name(id))
            .collect();
        info!("{} ({}): {}", team.name, team.home, names.join(", "));
    }

    let mut round = 0;
    while let Some(record) = tournament.play_next().context("playing fixture")? {
        round += 1;
        let record = record.clone();
        info!("=== ROUND {} ===", round);
        log_match(&tournament, &record);
    }

    info!("=== FINAL PLAYER STATISTICS ===");
    for line in commentary::player_stats_table(tournament.players()) {
        info!("{}", line);
    }

    info!("=== FINAL POINTS TABLE ===");
    for line in commentary::points_table_lines(&tournament.points_table()) {
        info!("{}", line);
    }

    info!("=== TOURNAMENT AWARDS ===");
    if let Some(champion) = tournament.champion() {
        info!("Champion: {}", champion.name);
    }
    if let Some(best) = tournament.player_of_tournament() {
        let player = &tournament.players()[best];
        info!(
            "Player of the Tournament: {} ({} credits)",
            player.name, player.career_credits
        );
    }

    Ok(tournament)
}

fn log_match(tournament: &Tournament, record: &MatchRecord) {
    let players = tournament.players();
    let (Some(home), Some(away)) = (
        tournament.team(record.fixture.home),
        tournament.team(record.fixture.away),
    ) else {
        return;
    };

    for (summary, batting) in [(&record.first, home), (&record.second, away)] {
        info!("--- {} batting ---", batting.name);
        for event in &summary.deliveries {
            info!("{}", commentary::ball_line(event, players));
        }
        info!("{}", commentary::innings_line(summary, batting));
    }

    for line in commentary::match_summary(record, home, away, players) {
        info!("{}", line);
    }
}

/// Replay the whole tournament and compare digests match by match.
fn verify_replay(config: &TournamentConfig, original: &Tournament) -> Result<()> {
    info!("=== Verifying Determinism ===");
    let mut replay = Tournament::from_config(config).context("rebuilding tournament")?;
    replay.play_all().context("replaying tournament")?;

    for (played, replayed) in original.results().iter().zip(replay.results()) {
        if played.digest != replayed.digest {
            error!(
                "Fixture {} differs: {} vs {}",
                played.fixture.index,
                hex::encode(played.digest),
                hex::encode(replayed.digest)
            );
        }
    }

    let digest = original.digest();
    let replay_digest = replay.digest();
    info!("Tournament Hash: {}", hex::encode(digest));
    info!("Replay Hash:     {}", hex::encode(replay_digest));

    if digest != replay_digest {
        bail!("determinism failure: replayed tournament does not match");
    }
    info!("DETERMINISM VERIFIED: Hashes match!");
    Ok(())
}
