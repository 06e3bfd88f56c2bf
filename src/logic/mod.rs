//! Tournament business logic: bracket generation, advancement, standings, lifecycle, results.

mod bracket;
mod format;
mod lifecycle;
mod results;
mod standings;

pub use bracket::{
    advance_winner, generate_bracket, is_complete, order_registrations, resolve_byes, round_count,
    MINIMUM_PARTICIPANTS,
};
pub use lifecycle::{
    cancel_tournament, close_registration, complete_tournament, open_registration,
    start_tournament, start_tournament_with_rng,
};
pub use results::{
    advance_match_winner, cancel_match, complete_match, record_walkover, start_match, GameResult,
    MatchOutcome,
};
pub use standings::{rank_standings, recompute_standings, record_draw, record_result};
