//! Tournament status transitions: registration window, start (bracket generation), completion, cancellation.

use crate::models::{Tournament, TournamentError, TournamentStatus};
use chrono::Utc;
use rand::Rng;

/// Draft -> RegistrationOpen.
pub fn open_registration(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if tournament.status != TournamentStatus::Draft {
        return Err(TournamentError::InvalidState);
    }
    log::info!("Opening registration for tournament {}", tournament.id);
    tournament.status = TournamentStatus::RegistrationOpen;
    Ok(())
}

/// RegistrationOpen -> RegistrationClosed.
pub fn close_registration(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if tournament.status != TournamentStatus::RegistrationOpen {
        return Err(TournamentError::InvalidState);
    }
    log::info!("Closing registration for tournament {}", tournament.id);
    tournament.status = TournamentStatus::RegistrationClosed;
    Ok(())
}

/// Start the tournament: generate the bracket from the active registrations and go InProgress.
pub fn start_tournament(tournament: &mut Tournament) -> Result<(), TournamentError> {
    start_tournament_with_rng(tournament, &mut rand::thread_rng())
}

/// Same as `start_tournament`, with the RNG used for unseeded placement.
pub fn start_tournament_with_rng<R: Rng + ?Sized>(
    tournament: &mut Tournament,
    rng: &mut R,
) -> Result<(), TournamentError> {
    if tournament.status != TournamentStatus::RegistrationClosed {
        return Err(TournamentError::InvalidState);
    }
    let active = tournament.active_registrations();
    let required = tournament.format.minimum_participants();
    if !tournament.format.is_valid_participant_count(active.len()) {
        return Err(TournamentError::InsufficientParticipants {
            required,
            available: active.len(),
        });
    }

    log::info!("Generating bracket for tournament {}", tournament.id);
    let matches = tournament.format.generate_bracket_with_rng(&active, rng)?;
    log::info!(
        "Generated {} matches for tournament {}",
        matches.len(),
        tournament.id
    );

    tournament.matches = matches;
    tournament.standings.clear();
    tournament.status = TournamentStatus::InProgress;
    tournament.start_date = Some(Utc::now());
    Ok(())
}

/// InProgress -> Completed.
pub fn complete_tournament(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if tournament.status != TournamentStatus::InProgress {
        return Err(TournamentError::InvalidState);
    }
    tournament.status = TournamentStatus::Completed;
    tournament.end_date = Some(Utc::now());
    log::info!("Tournament {} completed", tournament.id);
    Ok(())
}

/// Cancel from any state except Completed (cancelling twice is rejected too).
pub fn cancel_tournament(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if matches!(
        tournament.status,
        TournamentStatus::Completed | TournamentStatus::Cancelled
    ) {
        return Err(TournamentError::InvalidState);
    }
    log::info!("Cancelling tournament {}", tournament.id);
    tournament.status = TournamentStatus::Cancelled;
    Ok(())
}
