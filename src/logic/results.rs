//! Match results: complete / walkover / start / cancel, with standings and advancement.
//!
//! Every operation validates before its first mutation, so a rejected call leaves the
//! tournament untouched. Callers serialize operations per tournament.

use crate::logic::{lifecycle, standings};
use crate::models::{
    MatchId, MatchScore, MatchStatus, RegistrationId, Team, Tournament, TournamentError,
    TournamentStatus,
};
use serde::{Deserialize, Serialize};

/// Resolved game result for one match, as reported by scoring.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameResult {
    /// None for a draw.
    pub winner: Option<Team>,
    pub team_1_goals: u32,
    pub team_2_goals: u32,
}

impl GameResult {
    pub fn won_by(winner: Team, team_1_goals: u32, team_2_goals: u32) -> Self {
        Self {
            winner: Some(winner),
            team_1_goals,
            team_2_goals,
        }
    }

    pub fn draw(team_1_goals: u32, team_2_goals: u32) -> Self {
        Self {
            winner: None,
            team_1_goals,
            team_2_goals,
        }
    }
}

/// What a result changed.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub match_id: MatchId,
    pub winner: Option<RegistrationId>,
    /// Matches that received an entrant or were settled as a consequence.
    pub updated_matches: Vec<MatchId>,
    pub tournament_completed: bool,
}

fn ensure_in_progress(tournament: &Tournament) -> Result<(), TournamentError> {
    if tournament.status != TournamentStatus::InProgress {
        return Err(TournamentError::InvalidState);
    }
    Ok(())
}

/// Withdrawn or disqualified entrants cannot be credited with a win.
fn ensure_active_winner(
    tournament: &Tournament,
    match_id: MatchId,
    winner: RegistrationId,
) -> Result<(), TournamentError> {
    if !tournament
        .registration(winner)
        .map_or(false, |r| r.is_active())
    {
        return Err(TournamentError::InvalidResult {
            match_id,
            reason: "winner is no longer an active registration",
        });
    }
    Ok(())
}

/// Record a played result, update standings and ranking, advance the winner and
/// complete the tournament if the final is decided. Draws are rejected.
pub fn complete_match(
    tournament: &mut Tournament,
    match_id: MatchId,
    result: GameResult,
) -> Result<MatchOutcome, TournamentError> {
    ensure_in_progress(tournament)?;
    let idx = tournament.match_index(match_id)?;
    let m = &tournament.matches[idx];
    if !matches!(m.status, MatchStatus::Ready | MatchStatus::InProgress) {
        return Err(TournamentError::InvalidTransition {
            match_id,
            from: m.status,
            action: "complete",
        });
    }
    let side = result.winner.ok_or(TournamentError::InvalidResult {
        match_id,
        reason: "a draw cannot decide an elimination match",
    })?;
    let winner = m.team(side).ok_or(TournamentError::InvalidResult {
        match_id,
        reason: "winning side has no team",
    })?;
    ensure_active_winner(tournament, match_id, winner)?;

    log::info!("Completing match {} ({})", match_id, m.display_name());
    tournament.matches[idx].complete(
        winner,
        MatchScore {
            team_1_goals: result.team_1_goals,
            team_2_goals: result.team_2_goals,
        },
    )?;

    if standings::apply_match(tournament, idx) {
        standings::rank_standings(&mut tournament.standings);
    }

    let updated_matches = auto_advance(tournament, match_id);
    let tournament_completed = finish_if_complete(tournament);

    Ok(MatchOutcome {
        match_id,
        winner: Some(winner),
        updated_matches,
        tournament_completed,
    })
}

/// Decide a match without play (forfeit). Standings are not touched; the winner
/// advances under the same `auto_advancement` rule as a played result.
pub fn record_walkover(
    tournament: &mut Tournament,
    match_id: MatchId,
    winner: RegistrationId,
) -> Result<MatchOutcome, TournamentError> {
    ensure_in_progress(tournament)?;
    let idx = tournament.match_index(match_id)?;
    if tournament.registration(winner).is_none() {
        return Err(TournamentError::RegistrationNotFound(winner));
    }
    ensure_active_winner(tournament, match_id, winner)?;

    log::info!(
        "Recording walkover for match {} with winner {}",
        match_id,
        winner
    );
    tournament.matches[idx].walkover(winner)?;

    let updated_matches = auto_advance(tournament, match_id);
    let tournament_completed = finish_if_complete(tournament);

    Ok(MatchOutcome {
        match_id,
        winner: Some(winner),
        updated_matches,
        tournament_completed,
    })
}

/// Mark a ready match as being played.
pub fn start_match(tournament: &mut Tournament, match_id: MatchId) -> Result<(), TournamentError> {
    ensure_in_progress(tournament)?;
    let idx = tournament.match_index(match_id)?;
    tournament.matches[idx].start()
}

/// Cancel a match. Nobody advances out of it; a successor left with a single entrant
/// and no other incoming match is then settled as a walkover.
pub fn cancel_match(
    tournament: &mut Tournament,
    match_id: MatchId,
) -> Result<Vec<MatchId>, TournamentError> {
    ensure_in_progress(tournament)?;
    let idx = tournament.match_index(match_id)?;
    tournament.matches[idx].cancel()?;
    log::info!("Cancelled match {}", match_id);

    let format = tournament.format;
    let settled = format.resolve_byes(&mut tournament.matches, &tournament.registrations);
    finish_if_complete(tournament);
    Ok(settled)
}

/// Explicitly push a decided match's winner forward (used when auto-advancement is off).
/// Safe to repeat.
pub fn advance_match_winner(
    tournament: &mut Tournament,
    match_id: MatchId,
) -> Result<Vec<MatchId>, TournamentError> {
    ensure_in_progress(tournament)?;
    tournament.match_index(match_id)?;
    let updated = advance(tournament, match_id);
    finish_if_complete(tournament);
    Ok(updated)
}

fn auto_advance(tournament: &mut Tournament, match_id: MatchId) -> Vec<MatchId> {
    if tournament.settings.auto_advancement {
        advance(tournament, match_id)
    } else {
        Vec::new()
    }
}

fn advance(tournament: &mut Tournament, match_id: MatchId) -> Vec<MatchId> {
    let format = tournament.format;
    format.advance_winner(
        &mut tournament.matches,
        &tournament.registrations,
        match_id,
    )
}

fn finish_if_complete(tournament: &mut Tournament) -> bool {
    tournament.status == TournamentStatus::InProgress
        && tournament.format.is_complete(&tournament.matches)
        && lifecycle::complete_tournament(tournament).is_ok()
}
