//! Foosball tournament engine: library with models and bracket/standings logic.

pub mod logic;
pub mod models;

pub use logic::{
    advance_match_winner, advance_winner, cancel_match, cancel_tournament, close_registration,
    complete_match, complete_tournament, generate_bracket, is_complete, open_registration,
    rank_standings, recompute_standings, record_draw, record_result, record_walkover,
    resolve_byes, start_match, start_tournament, start_tournament_with_rng, GameResult,
    MatchOutcome,
};
pub use models::{
    BracketType, BracketView, Entrant, LeaderboardView, MatchId, MatchScore, MatchStatus,
    PointsConfig, Registration, RegistrationId, RegistrationStatus, Standing, Team, Tournament,
    TournamentError, TournamentFormat, TournamentId, TournamentMatch, TournamentSettings,
    TournamentStatus, TournamentSummary,
};
