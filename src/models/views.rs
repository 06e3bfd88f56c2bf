//! Read-only projections for display: bracket, leaderboard, tournament summary.

use crate::models::registration::RegistrationId;
use crate::models::tournament::{Tournament, TournamentFormat, TournamentId, TournamentStatus};
use crate::models::tournament_match::{BracketType, MatchId, MatchStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One bracket match with names resolved.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BracketView {
    pub match_id: MatchId,
    pub round: u32,
    pub match_number: u32,
    pub bracket_type: BracketType,
    pub team_1_name: Option<String>,
    pub team_2_name: Option<String>,
    pub winner_name: Option<String>,
    pub status: MatchStatus,
    pub completed_at: Option<DateTime<Utc>>,
    pub next_match_id: Option<MatchId>,
    pub consolation_match_id: Option<MatchId>,
}

/// One leaderboard row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardView {
    pub position: Option<u32>,
    pub registration_id: RegistrationId,
    pub display_name: String,
    pub points: i32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub games_played: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i32,
    pub win_percentage: f64,
    pub points_per_game: f64,
    pub goals_per_game: f64,
}

/// Short listing entry for a tournament.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TournamentSummary {
    pub id: TournamentId,
    pub name: String,
    pub format: TournamentFormat,
    pub status: TournamentStatus,
    pub participants: usize,
    pub matches_total: usize,
    pub matches_decided: usize,
    pub champion: Option<String>,
}

impl Tournament {
    /// Bracket ordered by round, then match number.
    pub fn bracket_view(&self) -> Vec<BracketView> {
        let name = |id: Option<RegistrationId>| id.and_then(|id| self.display_name(id));
        let mut views: Vec<BracketView> = self
            .matches
            .iter()
            .map(|m| BracketView {
                match_id: m.id,
                round: m.round,
                match_number: m.match_number,
                bracket_type: m.bracket_type,
                team_1_name: name(m.team_1),
                team_2_name: name(m.team_2),
                winner_name: name(m.winner),
                status: m.status,
                completed_at: m.completed_at,
                next_match_id: m.next_match,
                consolation_match_id: m.consolation_match,
            })
            .collect();
        views.sort_by_key(|v| (v.round, v.match_number));
        views
    }

    /// "A vs B" for a match, TBD for empty slots.
    pub fn match_description(&self, match_id: MatchId) -> Option<String> {
        let m = self.find_match(match_id)?;
        let name = |id: Option<RegistrationId>| {
            id.and_then(|id| self.display_name(id))
                .unwrap_or_else(|| "TBD".to_string())
        };
        Some(format!("{} vs {}", name(m.team_1), name(m.team_2)))
    }

    /// Standings in ranked order (as last recomputed).
    pub fn leaderboard(&self) -> Vec<LeaderboardView> {
        let mut rows: Vec<LeaderboardView> = self
            .standings
            .iter()
            .map(|s| LeaderboardView {
                position: s.position,
                registration_id: s.registration_id,
                display_name: s.display_name.clone(),
                points: s.points,
                wins: s.wins,
                losses: s.losses,
                draws: s.draws,
                games_played: s.games_played,
                goals_for: s.goals_for,
                goals_against: s.goals_against,
                goal_difference: s.goal_difference,
                win_percentage: s.win_percentage(),
                points_per_game: s.points_per_game(),
                goals_per_game: s.goals_per_game(),
            })
            .collect();
        rows.sort_by_key(|r| r.position.unwrap_or(u32::MAX));
        rows
    }

    /// Leaderboard as CSV with a header row.
    pub fn leaderboard_csv(&self) -> Result<String, csv::Error> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for row in self.leaderboard() {
            writer.serialize(row)?;
        }
        let bytes = writer.into_inner().map_err(|e| e.into_error())?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    pub fn summary(&self) -> TournamentSummary {
        TournamentSummary {
            id: self.id,
            name: self.name.clone(),
            format: self.format,
            status: self.status,
            participants: self.registrations.iter().filter(|r| r.is_active()).count(),
            matches_total: self.matches.len(),
            matches_decided: self
                .matches
                .iter()
                .filter(|m| m.status.is_decided())
                .count(),
            champion: self.champion().map(|r| r.display_name()),
        }
    }
}
