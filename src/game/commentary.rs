//! Commentary
//!
//! Plain-text rendering of ball events, innings, matches and standings.
//! Nothing here feeds back into the simulation.

use crate::game::events::BallEvent;
use crate::game::innings::{CompletionReason, InningsSummary};
use crate::game::match_play::MatchRecord;
use crate::game::outcome::BallOutcome;
use crate::game::player::PlayerArena;
use crate::game::team::{MatchResult, Team};

/// One line per delivery.
pub fn ball_line(event: &BallEvent, players: &PlayerArena) -> String {
    let striker = players.name(event.striker);
    let call = match event.outcome {
        BallOutcome::Wicket => {
            let bowler = players.name(event.bowler);
            match event.incoming {
                Some(next) => format!(
                    "WICKET! {striker} is out! Bowled by {bowler}. {} walks in",
                    players.name(next)
                ),
                None => format!("WICKET! {striker} is out! Bowled by {bowler}"),
            }
        }
        BallOutcome::Runs(0) => format!("Dot ball. {striker} defends"),
        BallOutcome::Runs(1) => format!("Single. {striker} takes a quick run"),
        BallOutcome::Runs(2) => format!("Two runs. {striker} pushes for a couple"),
        BallOutcome::Runs(3) => format!("Three runs. {striker} runs hard for three"),
        BallOutcome::Runs(4) => format!("FOUR! {striker} hits a boundary!"),
        BallOutcome::Runs(6) => format!("SIX! {striker} hits it out of the park!"),
        BallOutcome::Runs(runs) => format!("{runs} runs to {striker}"),
    };
    format!("Ball {}: {call} | Score: {}", event.ball_number, event.score)
}

/// Closing line of an innings.
pub fn innings_line(summary: &InningsSummary, batting: &Team) -> String {
    let why = match summary.completion {
        CompletionReason::WicketLimit => "all wickets down",
        CompletionReason::OverLimit => "overs complete",
        CompletionReason::BattersExhausted => "no batters left",
    };
    format!("{} scored {} ({why})", batting.name, summary.score)
}

/// Match summary block.
pub fn match_summary(
    record: &MatchRecord,
    home: &Team,
    away: &Team,
    players: &PlayerArena,
) -> Vec<String> {
    let result = match record.result {
        MatchResult::Win => format!("{} won by {} runs", home.name, record.margin()),
        MatchResult::Loss => format!("{} won by {} runs", away.name, record.margin()),
        MatchResult::Tie => "Match tied!".to_string(),
        MatchResult::NoResult => "No result".to_string(),
    };
    let standout = record
        .standout
        .map_or("-", |id| players.name(id))
        .to_string();

    vec![
        format!(
            "{} vs {} | Venue: {} | Date: {}",
            home.name, away.name, record.fixture.venue, record.fixture.date
        ),
        format!("{}: {}", home.name, record.first.score),
        format!("{}: {}", away.name, record.second.score),
        format!("Result: {result}"),
        format!("Player of the Match: {standout}"),
    ]
}

/// Career figures for every player, header first.
pub fn player_stats_table(players: &PlayerArena) -> Vec<String> {
    let mut lines = vec![format!(
        "{:<20}{:>8}{:>8}{:>8}{:>8}{:>9}",
        "Name", "Runs", "Balls", "SR", "Wkts", "Credits"
    )];
    lines.extend(players.iter().map(|p| {
        format!(
            "{:<20}{:>8}{:>8}{:>8.1}{:>8}{:>9}",
            p.name,
            p.career.batting.runs,
            p.career.batting.balls_faced,
            p.career.batting.strike_rate(),
            p.career.bowling.wickets,
            p.career_credits
        )
    }));
    lines
}

/// Ranked points table.
pub fn points_table_lines(table: &[&Team]) -> Vec<String> {
    table
        .iter()
        .enumerate()
        .map(|(rank, team)| {
            let record = &team.record;
            format!(
                "{}. {:<25} P{} W{} L{} T{} - {} points",
                rank + 1,
                team.name,
                record.played(),
                record.won(),
                record.lost(),
                record.tied(),
                record.points()
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::events::ScoreLine;
    use crate::game::player::{PlayerId, Role};
    use crate::game::team::TeamId;

    fn event(outcome: BallOutcome, incoming: Option<PlayerId>) -> BallEvent {
        BallEvent {
            ball_number: 5,
            over: 0,
            ball_in_over: 5,
            striker: PlayerId(0),
            bowler: PlayerId(1),
            outcome,
            incoming,
            end_of_over: false,
            score: ScoreLine { runs: 11, wickets: 1, overs: 0, balls: 5 },
        }
    }

    #[test]
    fn test_ball_lines() {
        let mut players = PlayerArena::new();
        players.add("Ishan", 25, Role::Batter);
        players.add("Deepak", 31, Role::Bowler);
        let hardik = players.add("Hardik", 30, Role::AllRounder);

        assert_eq!(
            ball_line(&event(BallOutcome::Wicket, Some(hardik)), &players),
            "Ball 5: WICKET! Ishan is out! Bowled by Deepak. Hardik walks in | Score: 11/1 (0.5)"
        );
        assert_eq!(
            ball_line(&event(BallOutcome::Runs(6), None), &players),
            "Ball 5: SIX! Ishan hits it out of the park! | Score: 11/1 (0.5)"
        );
        assert!(ball_line(&event(BallOutcome::DOT, None), &players).contains("Dot ball"));
    }

    #[test]
    fn test_points_table_lines() {
        let mut team = Team::new(TeamId(0), "Chennai Super Kings", "Chennai");
        team.record.apply(MatchResult::Win);
        team.record.apply(MatchResult::Tie);

        let lines = points_table_lines(&[&team]);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("1. Chennai Super Kings"));
        assert!(lines[0].ends_with("P2 W1 L0 T1 - 3 points"));
    }

    #[test]
    fn test_player_stats_header() {
        let mut players = PlayerArena::new();
        players.add("Rohit", 36, Role::Batter);
        let lines = player_stats_table(&players);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Name"));
        assert!(lines[1].starts_with("Rohit"));
    }
}
