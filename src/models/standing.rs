//! Standing: one registration's accumulated record within a tournament.

use crate::models::registration::RegistrationId;
use crate::models::tournament::PointsConfig;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Cumulative win/loss/draw/goal record. Counters only grow, except via `reset`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub registration_id: RegistrationId,
    /// Copied from the registration; final ranking tie-break.
    pub display_name: String,
    /// 1-indexed rank, written back after every recompute.
    pub position: Option<u32>,
    pub points: i32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub games_played: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i32,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Standing {
    pub fn new(registration_id: RegistrationId, display_name: impl Into<String>) -> Self {
        Self {
            registration_id,
            display_name: display_name.into(),
            position: None,
            points: 0,
            wins: 0,
            losses: 0,
            draws: 0,
            games_played: 0,
            goals_for: 0,
            goals_against: 0,
            goal_difference: 0,
            updated_at: None,
        }
    }

    /// Zero every counter (position is kept until the next ranking).
    pub fn reset(&mut self) {
        self.points = 0;
        self.wins = 0;
        self.losses = 0;
        self.draws = 0;
        self.games_played = 0;
        self.goals_for = 0;
        self.goals_against = 0;
        self.goal_difference = 0;
    }

    pub fn record_win(&mut self, goals_for: u32, goals_against: u32, points: &PointsConfig) {
        self.wins += 1;
        self.record_game(goals_for, goals_against, points.points_for_win);
    }

    pub fn record_loss(&mut self, goals_for: u32, goals_against: u32, points: &PointsConfig) {
        self.losses += 1;
        self.record_game(goals_for, goals_against, points.points_for_loss);
    }

    pub fn record_draw(&mut self, goals_for: u32, goals_against: u32, points: &PointsConfig) {
        self.draws += 1;
        self.record_game(goals_for, goals_against, points.points_for_draw);
    }

    fn record_game(&mut self, goals_for: u32, goals_against: u32, points: i32) {
        self.games_played += 1;
        self.goals_for += goals_for;
        self.goals_against += goals_against;
        self.goal_difference = self.goals_for as i32 - self.goals_against as i32;
        self.points += points;
        self.updated_at = Some(Utc::now());
    }

    pub fn win_percentage(&self) -> f64 {
        if self.games_played == 0 {
            0.0
        } else {
            self.wins as f64 / self.games_played as f64 * 100.0
        }
    }

    pub fn points_per_game(&self) -> f64 {
        if self.games_played == 0 {
            0.0
        } else {
            self.points as f64 / self.games_played as f64
        }
    }

    pub fn goals_per_game(&self) -> f64 {
        if self.games_played == 0 {
            0.0
        } else {
            self.goals_for as f64 / self.games_played as f64
        }
    }

    /// Coarse form label from the win percentage.
    pub fn form(&self) -> &'static str {
        if self.games_played == 0 {
            return "N/A";
        }
        match self.win_percentage() {
            p if p >= 75.0 => "Excellent",
            p if p >= 50.0 => "Good",
            p if p >= 25.0 => "Fair",
            _ => "Poor",
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "P:{} W:{} L:{} D:{} GF:{} GA:{} GD:{} Pts:{}",
            self.games_played,
            self.wins,
            self.losses,
            self.draws,
            self.goals_for,
            self.goals_against,
            self.goal_difference,
            self.points
        )
    }

    /// Leaderboard order: points, goal difference, goals for (all descending),
    /// then fewer games played, then display name.
    pub fn compare_by_points(&self, other: &Standing) -> Ordering {
        other
            .points
            .cmp(&self.points)
            .then_with(|| other.goal_difference.cmp(&self.goal_difference))
            .then_with(|| other.goals_for.cmp(&self.goals_for))
            .then_with(|| self.games_played.cmp(&other.games_played))
            .then_with(|| self.display_name.cmp(&other.display_name))
    }

    /// Wins, goal difference, goals for (all descending).
    pub fn compare_by_wins(&self, other: &Standing) -> Ordering {
        other
            .wins
            .cmp(&self.wins)
            .then_with(|| other.goal_difference.cmp(&self.goal_difference))
            .then_with(|| other.goals_for.cmp(&self.goals_for))
    }
}
