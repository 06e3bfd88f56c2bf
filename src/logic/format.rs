//! Per-format bracket rules. Adding a format means adding a `TournamentFormat` variant
//! and a match arm here.

use crate::logic::bracket;
use crate::models::{MatchId, Registration, TournamentError, TournamentFormat, TournamentMatch};
use rand::Rng;

impl TournamentFormat {
    pub fn minimum_participants(self) -> usize {
        match self {
            TournamentFormat::SingleElimination => bracket::MINIMUM_PARTICIPANTS,
        }
    }

    pub fn is_valid_participant_count(self, participants: usize) -> bool {
        participants >= self.minimum_participants()
    }

    /// Initial bracket, shuffled with the thread RNG when nobody is seeded.
    pub fn generate_bracket(
        self,
        registrations: &[Registration],
    ) -> Result<Vec<TournamentMatch>, TournamentError> {
        self.generate_bracket_with_rng(registrations, &mut rand::thread_rng())
    }

    pub fn generate_bracket_with_rng<R: Rng + ?Sized>(
        self,
        registrations: &[Registration],
        rng: &mut R,
    ) -> Result<Vec<TournamentMatch>, TournamentError> {
        match self {
            TournamentFormat::SingleElimination => bracket::generate_bracket(registrations, rng),
        }
    }

    /// Move the winner of `match_id` forward. Returns the matches that changed.
    pub fn advance_winner(
        self,
        matches: &mut [TournamentMatch],
        registrations: &[Registration],
        match_id: MatchId,
    ) -> Vec<MatchId> {
        match self {
            TournamentFormat::SingleElimination => {
                bracket::advance_winner(matches, registrations, match_id)
            }
        }
    }

    /// Settle matches that can no longer receive an opponent.
    pub fn resolve_byes(
        self,
        matches: &mut [TournamentMatch],
        registrations: &[Registration],
    ) -> Vec<MatchId> {
        match self {
            TournamentFormat::SingleElimination => bracket::resolve_byes(matches, registrations),
        }
    }

    pub fn is_complete(self, matches: &[TournamentMatch]) -> bool {
        match self {
            TournamentFormat::SingleElimination => bracket::is_complete(matches),
        }
    }
}
