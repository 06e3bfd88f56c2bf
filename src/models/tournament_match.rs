//! Bracket match, its slots (Team) and its lifecycle (MatchStatus).

use crate::models::registration::RegistrationId;
use crate::models::tournament::TournamentError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Bracket position inside a match: team 1 or team 2.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    #[default]
    One,
    Two,
}

/// Match lifecycle. Completed, Walkover and Cancelled are terminal and never regress.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    /// Opponent pair not decided yet.
    #[default]
    Pending,
    /// Both slots filled with active registrations.
    Ready,
    InProgress,
    Completed,
    /// Decided without play (forfeit or bye).
    Walkover,
    Cancelled,
}

impl MatchStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            MatchStatus::Completed | MatchStatus::Walkover | MatchStatus::Cancelled
        )
    }

    /// Terminal with a winner.
    pub fn is_decided(self) -> bool {
        matches!(self, MatchStatus::Completed | MatchStatus::Walkover)
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MatchStatus::Pending => "pending",
            MatchStatus::Ready => "ready",
            MatchStatus::InProgress => "in progress",
            MatchStatus::Completed => "completed",
            MatchStatus::Walkover => "walkover",
            MatchStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// Which bracket a match belongs to. Single elimination only uses Main.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketType {
    #[default]
    Main,
    Losers,
    Consolation,
    Playoff,
}

impl BracketType {
    pub fn label(self) -> &'static str {
        match self {
            BracketType::Main => "main",
            BracketType::Losers => "losers",
            BracketType::Consolation => "consolation",
            BracketType::Playoff => "playoff",
        }
    }
}

/// Goals scored by each slot in a played match.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchScore {
    pub team_1_goals: u32,
    pub team_2_goals: u32,
}

/// A single bracket match. Cross-references (teams, winner, next match) are ids.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TournamentMatch {
    pub id: MatchId,
    /// 1-indexed from the first round.
    pub round: u32,
    /// 1-indexed, unique within the round.
    pub match_number: u32,
    pub bracket_type: BracketType,
    pub team_1: Option<RegistrationId>,
    pub team_2: Option<RegistrationId>,
    /// Always team_1 or team_2 once set.
    pub winner: Option<RegistrationId>,
    pub status: MatchStatus,
    /// Set only for matches decided by play.
    pub score: Option<MatchScore>,
    /// Match the winner advances into; None for the final.
    pub next_match: Option<MatchId>,
    /// Reserved for formats with a consolation bracket.
    pub consolation_match: Option<MatchId>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl TournamentMatch {
    pub fn new(round: u32, match_number: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            round,
            match_number,
            bracket_type: BracketType::Main,
            team_1: None,
            team_2: None,
            winner: None,
            status: MatchStatus::Pending,
            score: None,
            next_match: None,
            consolation_match: None,
            completed_at: None,
        }
    }

    pub fn team(&self, slot: Team) -> Option<RegistrationId> {
        match slot {
            Team::One => self.team_1,
            Team::Two => self.team_2,
        }
    }

    /// Which slot `registration` occupies, if any.
    pub fn slot_of(&self, registration: RegistrationId) -> Option<Team> {
        if self.team_1 == Some(registration) {
            Some(Team::One)
        } else if self.team_2 == Some(registration) {
            Some(Team::Two)
        } else {
            None
        }
    }

    pub fn contains(&self, registration: RegistrationId) -> bool {
        self.slot_of(registration).is_some()
    }

    pub fn first_open_slot(&self) -> Option<Team> {
        if self.team_1.is_none() {
            Some(Team::One)
        } else if self.team_2.is_none() {
            Some(Team::Two)
        } else {
            None
        }
    }

    /// Exactly one slot is filled.
    pub fn has_bye(&self) -> bool {
        self.team_1.is_none() != self.team_2.is_none()
    }

    /// The sole entrant of a bye match.
    pub fn bye_winner(&self) -> Option<RegistrationId> {
        if self.has_bye() {
            self.team_1.or(self.team_2)
        } else {
            None
        }
    }

    /// The other side of a decided match.
    pub fn loser(&self) -> Option<RegistrationId> {
        if !self.status.is_decided() {
            return None;
        }
        let winner = self.winner?;
        match self.slot_of(winner)? {
            Team::One => self.team_2,
            Team::Two => self.team_1,
        }
    }

    /// Both slots filled and both entrants still active.
    pub fn is_ready(&self, is_active: impl Fn(RegistrationId) -> bool) -> bool {
        match (self.team_1, self.team_2) {
            (Some(a), Some(b)) => is_active(a) && is_active(b),
            _ => false,
        }
    }

    /// Recompute pending/ready. Only touches matches that have not started.
    pub fn refresh_status(&mut self, is_active: impl Fn(RegistrationId) -> bool) {
        if !matches!(self.status, MatchStatus::Pending | MatchStatus::Ready) {
            return;
        }
        self.status = if self.is_ready(is_active) {
            MatchStatus::Ready
        } else {
            MatchStatus::Pending
        };
    }

    /// Fill a slot and recompute status. No-op on terminal matches.
    pub fn assign_slot(
        &mut self,
        slot: Team,
        registration: RegistrationId,
        is_active: impl Fn(RegistrationId) -> bool,
    ) {
        if self.status.is_terminal() {
            return;
        }
        match slot {
            Team::One => self.team_1 = Some(registration),
            Team::Two => self.team_2 = Some(registration),
        }
        self.refresh_status(is_active);
    }

    /// Ready -> InProgress.
    pub fn start(&mut self) -> Result<(), TournamentError> {
        if self.status != MatchStatus::Ready {
            return Err(self.invalid_transition("start"));
        }
        self.status = MatchStatus::InProgress;
        Ok(())
    }

    /// Record a played result. Allowed from Ready or InProgress; winner must be in the match.
    pub fn complete(
        &mut self,
        winner: RegistrationId,
        score: MatchScore,
    ) -> Result<(), TournamentError> {
        if !matches!(self.status, MatchStatus::Ready | MatchStatus::InProgress) {
            return Err(self.invalid_transition("complete"));
        }
        if !self.contains(winner) {
            return Err(TournamentError::InvalidResult {
                match_id: self.id,
                reason: "winner is not one of the match's teams",
            });
        }
        self.winner = Some(winner);
        self.score = Some(score);
        self.status = MatchStatus::Completed;
        self.completed_at = Some(Utc::now());
        Ok(())
    }

    /// Decide without play (forfeit, or the sole entrant of a bye).
    pub fn walkover(&mut self, winner: RegistrationId) -> Result<(), TournamentError> {
        if self.status.is_terminal() {
            return Err(self.invalid_transition("walkover"));
        }
        if !self.contains(winner) {
            return Err(TournamentError::InvalidResult {
                match_id: self.id,
                reason: "walkover winner is not one of the match's teams",
            });
        }
        self.winner = Some(winner);
        self.status = MatchStatus::Walkover;
        self.completed_at = Some(Utc::now());
        Ok(())
    }

    pub fn cancel(&mut self) -> Result<(), TournamentError> {
        if self.status.is_terminal() {
            return Err(self.invalid_transition("cancel"));
        }
        self.status = MatchStatus::Cancelled;
        Ok(())
    }

    /// "Round 2, Match 1", with the bracket type for non-main brackets.
    pub fn display_name(&self) -> String {
        match self.bracket_type {
            BracketType::Main => format!("Round {}, Match {}", self.round, self.match_number),
            other => format!(
                "Round {}, Match {} ({})",
                self.round,
                self.match_number,
                other.label()
            ),
        }
    }

    fn invalid_transition(&self, action: &'static str) -> TournamentError {
        TournamentError::InvalidTransition {
            match_id: self.id,
            from: self.status,
            action,
        }
    }
}
