//! Registration: an entrant (single player or pair) placed into a tournament.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a registration (used in matches, standings and lookups).
pub type RegistrationId = Uuid;

/// Whether a registration can still be placed into / play in the bracket.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    #[default]
    Active,
    Withdrawn,
    Disqualified,
}

/// Who is behind a registration: one player, or two players playing as a team.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Entrant {
    Single {
        player: String,
    },
    Pair {
        player: String,
        partner: String,
        /// Optional explicit team name; blank names fall back to "player & partner".
        #[serde(default)]
        team_name: Option<String>,
    },
}

impl Entrant {
    /// Player names in this entrant (one or two).
    pub fn players(&self) -> Vec<&str> {
        match self {
            Entrant::Single { player } => vec![player.as_str()],
            Entrant::Pair {
                player, partner, ..
            } => vec![player.as_str(), partner.as_str()],
        }
    }
}

/// An entrant in one tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    pub id: RegistrationId,
    pub entrant: Entrant,
    /// Rank hint for bracket placement; lower is stronger. None = unseeded.
    pub seed: Option<u32>,
    pub status: RegistrationStatus,
    pub registered_at: DateTime<Utc>,
}

impl Registration {
    fn new(entrant: Entrant) -> Self {
        Self {
            id: Uuid::new_v4(),
            entrant,
            seed: None,
            status: RegistrationStatus::Active,
            registered_at: Utc::now(),
        }
    }

    /// Register a single player.
    pub fn single(player: impl Into<String>) -> Self {
        Self::new(Entrant::Single {
            player: player.into().trim().to_string(),
        })
    }

    /// Register a pair, optionally under a team name.
    pub fn pair(
        player: impl Into<String>,
        partner: impl Into<String>,
        team_name: Option<String>,
    ) -> Self {
        Self::new(Entrant::Pair {
            player: player.into().trim().to_string(),
            partner: partner.into().trim().to_string(),
            team_name,
        })
    }

    /// Builder: set the seed.
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn is_team(&self) -> bool {
        matches!(self.entrant, Entrant::Pair { .. })
    }

    pub fn is_active(&self) -> bool {
        self.status == RegistrationStatus::Active
    }

    pub fn withdraw(&mut self) {
        self.status = RegistrationStatus::Withdrawn;
    }

    pub fn disqualify(&mut self) {
        self.status = RegistrationStatus::Disqualified;
    }

    pub fn reactivate(&mut self) {
        self.status = RegistrationStatus::Active;
    }

    /// Name shown in brackets and leaderboards.
    pub fn display_name(&self) -> String {
        match &self.entrant {
            Entrant::Single { player } => player.clone(),
            Entrant::Pair {
                player,
                partner,
                team_name,
            } => match team_name.as_deref().map(str::trim) {
                Some(name) if !name.is_empty() => name.to_string(),
                _ => format!("{} & {}", player, partner),
            },
        }
    }

    /// True if `name` plays in this registration (case-insensitive).
    pub fn contains_player(&self, name: &str) -> bool {
        self.entrant
            .players()
            .iter()
            .any(|p| p.eq_ignore_ascii_case(name.trim()))
    }

    /// Two registrations can meet if both are active, distinct, and share no player.
    pub fn can_play_against(&self, opponent: &Registration) -> bool {
        if !self.is_active() || !opponent.is_active() || self.id == opponent.id {
            return false;
        }
        !opponent
            .entrant
            .players()
            .iter()
            .any(|p| self.contains_player(p))
    }
}
