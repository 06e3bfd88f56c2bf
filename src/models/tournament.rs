//! Tournament aggregate root, its settings, and the error taxonomy.

use crate::models::registration::{Registration, RegistrationId};
use crate::models::standing::Standing;
use crate::models::tournament_match::{MatchId, MatchStatus, TournamentMatch};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// Fewer active registrations than the format needs.
    InsufficientParticipants { required: usize, available: usize },
    /// Match operation not allowed from the match's current status.
    InvalidTransition {
        match_id: MatchId,
        from: MatchStatus,
        action: &'static str,
    },
    /// Result rejected before any mutation (winner not in match, draw in elimination, ...).
    InvalidResult {
        match_id: MatchId,
        reason: &'static str,
    },
    TournamentNotFound(TournamentId),
    MatchNotFound(MatchId),
    RegistrationNotFound(RegistrationId),
    /// Tournament is not in a state that allows this action.
    InvalidState,
    /// A player of the new registration is already entered.
    DuplicateRegistration,
    /// max_participants reached.
    TournamentFull { max: usize },
    /// The registration itself is malformed (e.g. a blank player name).
    InvalidRegistration { reason: &'static str },
}

impl TournamentError {
    /// Referenced tournament/match/registration does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            TournamentError::TournamentNotFound(_)
                | TournamentError::MatchNotFound(_)
                | TournamentError::RegistrationNotFound(_)
        )
    }
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::InsufficientParticipants { required, available } => write!(
                f,
                "Need at least {} active participants (have {})",
                required, available
            ),
            TournamentError::InvalidTransition { from, action, .. } => {
                write!(f, "Cannot {} a match that is {}", action, from)
            }
            TournamentError::InvalidResult { reason, .. } => write!(f, "Invalid result: {}", reason),
            TournamentError::TournamentNotFound(_) => write!(f, "Tournament not found"),
            TournamentError::MatchNotFound(_) => write!(f, "Match not found"),
            TournamentError::RegistrationNotFound(_) => write!(f, "Registration not found"),
            TournamentError::InvalidState => write!(f, "Invalid state for this action"),
            TournamentError::DuplicateRegistration => {
                write!(f, "A player in this registration is already registered")
            }
            TournamentError::TournamentFull { max } => {
                write!(f, "Tournament is full ({} participants)", max)
            }
            TournamentError::InvalidRegistration { reason } => {
                write!(f, "Invalid registration: {}", reason)
            }
        }
    }
}

impl std::error::Error for TournamentError {}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Tournament phase.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    /// Created, settings editable, not yet accepting entries.
    #[default]
    Draft,
    RegistrationOpen,
    /// Entries frozen; ready to start.
    RegistrationClosed,
    /// Bracket generated, results being recorded.
    InProgress,
    Completed,
    Cancelled,
}

/// Bracket format. Closed set; each variant supplies generate/advance/complete rules.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentFormat {
    #[default]
    SingleElimination,
}

/// Standings points per result.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointsConfig {
    pub points_for_win: i32,
    pub points_for_draw: i32,
    pub points_for_loss: i32,
}

impl Default for PointsConfig {
    fn default() -> Self {
        Self {
            points_for_win: 3,
            points_for_draw: 1,
            points_for_loss: 0,
        }
    }
}

/// Tournament-level settings.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TournamentSettings {
    #[serde(flatten)]
    pub points: PointsConfig,
    /// Whether drawn games may be recorded at all. Elimination matches never accept draws.
    pub allow_draws: bool,
    /// Advance winners into their next match as soon as a result or walkover is
    /// recorded. When off, winners move on through `advance_match_winner`.
    pub auto_advancement: bool,
}

impl Default for TournamentSettings {
    fn default() -> Self {
        Self {
            points: PointsConfig::default(),
            allow_draws: true,
            auto_advancement: true,
        }
    }
}

/// Full tournament state: registrations, bracket matches and standings, all cross-referenced by id.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub description: Option<String>,
    pub format: TournamentFormat,
    pub status: TournamentStatus,
    pub max_participants: Option<usize>,
    pub settings: TournamentSettings,
    /// In registration order.
    pub registrations: Vec<Registration>,
    /// Ordered by (round, match number) once generated.
    pub matches: Vec<TournamentMatch>,
    /// Created lazily on the first completed match of each registration.
    pub standings: Vec<Standing>,
    pub created_at: DateTime<Utc>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl Tournament {
    /// Create a new tournament in Draft state with no registrations.
    pub fn new(name: impl Into<String>, format: TournamentFormat) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: None,
            format,
            status: TournamentStatus::Draft,
            max_participants: None,
            settings: TournamentSettings::default(),
            registrations: Vec::new(),
            matches: Vec::new(),
            standings: Vec::new(),
            created_at: Utc::now(),
            start_date: None,
            end_date: None,
        }
    }

    /// Create a tournament with its entries already collected. Registration is closed, ready to start.
    pub fn with_registrations(
        name: impl Into<String>,
        format: TournamentFormat,
        registrations: Vec<Registration>,
    ) -> Self {
        Self {
            registrations,
            status: TournamentStatus::RegistrationClosed,
            ..Self::new(name, format)
        }
    }

    pub fn registration(&self, id: RegistrationId) -> Option<&Registration> {
        self.registrations.iter().find(|r| r.id == id)
    }

    pub fn registration_mut(&mut self, id: RegistrationId) -> Option<&mut Registration> {
        self.registrations.iter_mut().find(|r| r.id == id)
    }

    /// Active registrations in registration order.
    pub fn active_registrations(&self) -> Vec<Registration> {
        self.registrations
            .iter()
            .filter(|r| r.is_active())
            .cloned()
            .collect()
    }

    pub fn display_name(&self, id: RegistrationId) -> Option<String> {
        self.registration(id).map(Registration::display_name)
    }

    pub fn find_match(&self, id: MatchId) -> Option<&TournamentMatch> {
        self.matches.iter().find(|m| m.id == id)
    }

    pub fn match_index(&self, id: MatchId) -> Result<usize, TournamentError> {
        self.matches
            .iter()
            .position(|m| m.id == id)
            .ok_or(TournamentError::MatchNotFound(id))
    }

    pub fn matches_in_round(&self, round: u32) -> Vec<&TournamentMatch> {
        self.matches.iter().filter(|m| m.round == round).collect()
    }

    /// The single match of the highest round.
    pub fn final_match(&self) -> Option<&TournamentMatch> {
        self.matches.iter().max_by_key(|m| (m.round, m.match_number))
    }

    /// Winner of the final, once the tournament is completed.
    pub fn champion(&self) -> Option<&Registration> {
        if self.status != TournamentStatus::Completed {
            return None;
        }
        self.final_match()
            .and_then(|m| m.winner)
            .and_then(|id| self.registration(id))
    }

    pub fn standing(&self, registration_id: RegistrationId) -> Option<&Standing> {
        self.standings
            .iter()
            .find(|s| s.registration_id == registration_id)
    }

    pub fn can_register(&self) -> bool {
        self.status == TournamentStatus::RegistrationOpen
            && self
                .max_participants
                .map_or(true, |max| self.registrations.len() < max)
    }

    /// Add a registration (registration must be open). Player names must be unique across active entries.
    pub fn register(&mut self, registration: Registration) -> Result<RegistrationId, TournamentError> {
        if self.status != TournamentStatus::RegistrationOpen {
            return Err(TournamentError::InvalidState);
        }
        if let Some(max) = self.max_participants {
            if self.registrations.len() >= max {
                return Err(TournamentError::TournamentFull { max });
            }
        }
        let players = registration.entrant.players();
        if players.iter().any(|p| p.is_empty()) {
            return Err(TournamentError::InvalidRegistration {
                reason: "player names must not be blank",
            });
        }
        let is_duplicate = self
            .registrations
            .iter()
            .filter(|r| r.is_active())
            .any(|r| players.iter().any(|p| r.contains_player(p)));
        if is_duplicate {
            return Err(TournamentError::DuplicateRegistration);
        }
        let id = registration.id;
        self.registrations.push(registration);
        Ok(id)
    }

    /// Withdraw a registration (not allowed once the tournament has started).
    pub fn withdraw(&mut self, registration_id: RegistrationId) -> Result<(), TournamentError> {
        if matches!(
            self.status,
            TournamentStatus::InProgress | TournamentStatus::Completed | TournamentStatus::Cancelled
        ) {
            return Err(TournamentError::InvalidState);
        }
        self.registration_mut(registration_id)
            .ok_or(TournamentError::RegistrationNotFound(registration_id))?
            .withdraw();
        Ok(())
    }

    /// Disqualify a registration. Any match of theirs that was ready falls back to pending.
    pub fn disqualify(&mut self, registration_id: RegistrationId) -> Result<(), TournamentError> {
        if matches!(
            self.status,
            TournamentStatus::Completed | TournamentStatus::Cancelled
        ) {
            return Err(TournamentError::InvalidState);
        }
        self.registration_mut(registration_id)
            .ok_or(TournamentError::RegistrationNotFound(registration_id))?
            .disqualify();
        let registrations = &self.registrations;
        for m in self.matches.iter_mut().filter(|m| m.contains(registration_id)) {
            m.refresh_status(|id| registrations.iter().any(|r| r.id == id && r.is_active()));
        }
        Ok(())
    }

    /// Replace settings (Draft or RegistrationOpen only).
    pub fn update_settings(&mut self, settings: TournamentSettings) -> Result<(), TournamentError> {
        if !matches!(
            self.status,
            TournamentStatus::Draft | TournamentStatus::RegistrationOpen
        ) {
            return Err(TournamentError::InvalidState);
        }
        self.settings = settings;
        Ok(())
    }
}
