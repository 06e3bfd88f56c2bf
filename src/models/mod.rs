//! Data structures for the tournament engine: registrations, matches, standings, tournament aggregate.

mod registration;
mod standing;
mod tournament;
mod tournament_match;
mod views;

pub use registration::{Entrant, Registration, RegistrationId, RegistrationStatus};
pub use standing::Standing;
pub use tournament::{
    PointsConfig, Tournament, TournamentError, TournamentFormat, TournamentId, TournamentSettings,
    TournamentStatus,
};
pub use tournament_match::{BracketType, MatchId, MatchScore, MatchStatus, Team, TournamentMatch};
pub use views::{BracketView, LeaderboardView, TournamentSummary};
