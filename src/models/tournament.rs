//! Tournament, its type/format/status, and the errors of tournament operations.

use crate::models::game::MatchId;
use crate::models::player::{PlayerId, RoomId};
use crate::store::StoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Coarse classification of a [`TournamentError`], used to pick the HTTP status.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Persistence,
}

/// Errors that can occur during tournament operations.
#[derive(Debug, Error)]
pub enum TournamentError {
    #[error("Need at least 2 competitors (selected {selected})")]
    NotEnoughCompetitors { selected: usize },
    #[error("2v2 needs an even number of at least 4 players (selected {selected})")]
    InvalidTeamSelection { selected: usize },
    #[error("Player {0} was selected more than once")]
    DuplicatePlayer(PlayerId),
    #[error("Matches per pairing must be at least 1")]
    InvalidMultiplicity,
    #[error("Name must not be empty")]
    EmptyName,
    #[error("A player with this name already exists in the room")]
    DuplicatePlayerName,
    #[error("\"{0}\" is reserved and cannot be used as a player name")]
    ReservedName(String),
    #[error("Score must be a non-negative integer (got {0})")]
    InvalidScore(i64),
    #[error("Knockout matches cannot end in a draw")]
    DrawNotAllowed,
    #[error("Matches against BYE are resolved automatically")]
    ByeMatch(MatchId),
    #[error("Round {round} is not complete yet")]
    RoundIncomplete { round: u32 },
    #[error("Finals need at least 2 ranked competitors (found {found})")]
    NotEnoughStandings { found: usize },
    #[error("Finals are only created for round-robin tournaments")]
    NotRoundRobin,
    #[error("Match {0} not found or already completed")]
    MatchNotFound(MatchId),
    #[error("Tournament {0} not found")]
    TournamentNotFound(TournamentId),
    #[error("Player {0} not found")]
    PlayerNotFound(PlayerId),
    #[error("Room {0} not found")]
    RoomNotFound(RoomId),
    #[error("Round {round} already has matches")]
    RoundAlreadyAdvanced { round: u32 },
    #[error("Tournament {0} is already completed")]
    AlreadyCompleted(TournamentId),
    #[error(transparent)]
    Persistence(StoreError),
}

impl TournamentError {
    pub fn kind(&self) -> ErrorKind {
        use TournamentError::*;
        match self {
            NotEnoughCompetitors { .. }
            | InvalidTeamSelection { .. }
            | DuplicatePlayer(_)
            | InvalidMultiplicity
            | EmptyName
            | DuplicatePlayerName
            | ReservedName(_)
            | InvalidScore(_)
            | DrawNotAllowed
            | ByeMatch(_)
            | RoundIncomplete { .. }
            | NotEnoughStandings { .. }
            | NotRoundRobin => ErrorKind::Validation,
            MatchNotFound(_) | TournamentNotFound(_) | PlayerNotFound(_) | RoomNotFound(_) => {
                ErrorKind::NotFound
            }
            RoundAlreadyAdvanced { .. } | AlreadyCompleted(_) => ErrorKind::Conflict,
            Persistence(_) => ErrorKind::Persistence,
        }
    }
}

impl From<StoreError> for TournamentError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateMatch { round, .. } => TournamentError::RoundAlreadyAdvanced { round },
            other => TournamentError::Persistence(other),
        }
    }
}

/// 1v1 or 2v2 (the `type` column).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum TournamentKind {
    #[default]
    #[serde(rename = "1v1")]
    OneVOne,
    #[serde(rename = "2v2")]
    TwoVTwo,
}

/// How the initial schedule is built and how rounds progress.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentFormat {
    /// Everyone plays everyone in round 0, then the top two meet in a final.
    #[default]
    RoundRobin,
    /// Single elimination from round 1, odd counts padded with BYE.
    Knockout,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    /// Created; no result recorded yet.
    #[default]
    Pending,
    /// At least one result recorded.
    Active,
    /// The final has been played.
    Completed,
}

/// A tournament row. Matches are stored separately and reference it by id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TournamentKind,
    pub format: TournamentFormat,
    pub room_id: RoomId,
    pub status: TournamentStatus,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    /// Create the final automatically once the round-robin stage completes.
    #[serde(default)]
    pub auto_advance: bool,
    /// Round-robin multiplicity (matches per pairing).
    pub matches_per_player: Option<u32>,
}

impl Tournament {
    pub fn new(
        name: impl Into<String>,
        kind: TournamentKind,
        format: TournamentFormat,
        room_id: RoomId,
        created_by: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
            format,
            room_id,
            status: TournamentStatus::Pending,
            created_by: created_by.into(),
            created_at: Utc::now(),
            auto_advance: false,
            matches_per_player: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == TournamentStatus::Completed
    }

    /// Rounds that are single elimination: every knockout round, and the final after a round robin.
    pub fn is_knockout_round(&self, round: u32) -> bool {
        match self.format {
            TournamentFormat::Knockout => true,
            TournamentFormat::RoundRobin => round > 0,
        }
    }
}
