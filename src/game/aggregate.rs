//! Aggregation Helpers
//!
//! Pure rankings over explicit player and team collections, shared by the
//! innings, match and tournament layers.

use crate::game::player::{CreditScope, PlayerArena, PlayerId};
use crate::game::team::Team;

/// Player with the most credit among `ids`.
///
/// Linear scan with strict `>`, so the first player seen wins a tie. Ids
/// not in the arena are skipped. `None` only when no id is valid.
pub fn best_by_credit<I>(players: &PlayerArena, ids: I, scope: CreditScope) -> Option<PlayerId>
where
    I: IntoIterator<Item = PlayerId>,
{
    let mut best: Option<(PlayerId, u32)> = None;
    for id in ids {
        let Some(player) = players.get(id) else {
            continue;
        };
        let credits = player.credits(scope);
        if best.map_or(true, |(_, top)| credits > top) {
            best = Some((id, credits));
        }
    }
    best.map(|(id, _)| id)
}

/// Teams ordered by points, highest first.
///
/// Stable: teams level on points keep their input order.
pub fn rank_teams(teams: &[Team]) -> Vec<&Team> {
    let mut table: Vec<&Team> = teams.iter().collect();
    table.sort_by(|a, b| b.record.points().cmp(&a.record.points()));
    table
}
