//! Standings ledger: per-registration records from decided matches, and ranking.

use crate::models::{MatchStatus, PointsConfig, RegistrationId, Standing, Tournament};

/// Apply a decided result: winner gets a win, loser a loss, each with their goals.
pub fn record_result(
    winner: &mut Standing,
    loser: &mut Standing,
    goals_winner: u32,
    goals_loser: u32,
    points: &PointsConfig,
) {
    winner.record_win(goals_winner, goals_loser, points);
    loser.record_loss(goals_loser, goals_winner, points);
}

/// Apply a drawn result to both sides.
pub fn record_draw(
    a: &mut Standing,
    b: &mut Standing,
    goals_a: u32,
    goals_b: u32,
    points: &PointsConfig,
) {
    a.record_draw(goals_a, goals_b, points);
    b.record_draw(goals_b, goals_a, points);
}

/// Sort by leaderboard order and write 1-indexed positions back.
pub fn rank_standings(standings: &mut [Standing]) {
    standings.sort_by(|a, b| a.compare_by_points(b));
    for (i, s) in standings.iter_mut().enumerate() {
        s.position = Some(i as u32 + 1);
    }
}

/// Index of the standing for `registration_id`, creating it on first reference.
fn standing_index(tournament: &mut Tournament, registration_id: RegistrationId) -> usize {
    if let Some(i) = tournament
        .standings
        .iter()
        .position(|s| s.registration_id == registration_id)
    {
        return i;
    }
    let name = tournament
        .display_name(registration_id)
        .unwrap_or_else(|| registration_id.to_string());
    tournament.standings.push(Standing::new(registration_id, name));
    tournament.standings.len() - 1
}

/// Record the match at `match_index` into the ledger. Only played (completed) matches
/// with both teams and a score count; anything else is skipped and returns false.
pub(crate) fn apply_match(tournament: &mut Tournament, match_index: usize) -> bool {
    let m = &tournament.matches[match_index];
    let (Some(team_1), Some(team_2), Some(score)) = (m.team_1, m.team_2, m.score) else {
        log::warn!("Match {} has no teams or score, skipping standings update", m.id);
        return false;
    };
    if m.status != MatchStatus::Completed || team_1 == team_2 {
        log::debug!("Match {} is not completed, skipping standings update", m.id);
        return false;
    }
    let winner = m.winner;
    let points = tournament.settings.points;

    let i1 = standing_index(tournament, team_1);
    let i2 = standing_index(tournament, team_2);
    let (s1, s2) = pair_mut(&mut tournament.standings, i1, i2);
    match winner {
        Some(w) if w == team_1 => {
            record_result(s1, s2, score.team_1_goals, score.team_2_goals, &points)
        }
        Some(_) => record_result(s2, s1, score.team_2_goals, score.team_1_goals, &points),
        None => record_draw(s1, s2, score.team_1_goals, score.team_2_goals, &points),
    }
    true
}

/// Reset every standing and replay all completed matches in bracket order, then re-rank.
pub fn recompute_standings(tournament: &mut Tournament) {
    for s in tournament.standings.iter_mut() {
        s.reset();
    }
    let mut order: Vec<usize> = (0..tournament.matches.len()).collect();
    order.sort_by_key(|&i| (tournament.matches[i].round, tournament.matches[i].match_number));
    let mut replayed = 0;
    for i in order {
        if tournament.matches[i].status == MatchStatus::Completed && apply_match(tournament, i) {
            replayed += 1;
        }
    }
    rank_standings(&mut tournament.standings);
    log::info!(
        "Recomputed standings for tournament {} from {} match(es)",
        tournament.id,
        replayed
    );
}

/// Two distinct mutable elements of one slice; `a != b`.
fn pair_mut<T>(items: &mut [T], a: usize, b: usize) -> (&mut T, &mut T) {
    if a < b {
        let (left, right) = items.split_at_mut(b);
        (&mut left[a], &mut right[0])
    } else {
        let (left, right) = items.split_at_mut(a);
        (&mut right[0], &mut left[b])
    }
}
