use std::cmp::Ordering;

use crate::db::models::Match;

/// Rank started matches for display.
///
/// Unstarted matches are dropped. Highest total score first; among equal
/// totals the most recently started match wins. Matches that tie on both
/// keys fall back to fixture identity so the output never depends on the
/// order the store returned them in.
pub fn rank(games: Vec<Match>) -> Vec<Match> {
    let mut started: Vec<Match> = games.into_iter().filter(Match::is_started).collect();
    started.sort_by(compare_for_board);
    started
}

fn compare_for_board(a: &Match, b: &Match) -> Ordering {
    b.total_score()
        .cmp(&a.total_score())
        .then_with(|| b.started_at.cmp(&a.started_at))
        .then_with(|| a.id().cmp(&b.id()))
}
