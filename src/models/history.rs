//! Game history (`games` rows): every played game, inside or outside a tournament.

use crate::models::game::GameMatch;
use crate::models::player::{PlayerId, RoomId};
use crate::models::tournament::{TournamentId, TournamentKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type GameRecordId = Uuid;

/// Denormalized history entry used by the history and leaderboard views.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub id: GameRecordId,
    pub team1: String,
    pub team2: String,
    pub score1: u32,
    pub score2: u32,
    /// Winning team name, or "Draw".
    pub winner: String,
    #[serde(rename = "type")]
    pub kind: TournamentKind,
    pub team1_player1: Option<PlayerId>,
    pub team1_player2: Option<PlayerId>,
    pub team2_player1: Option<PlayerId>,
    pub team2_player2: Option<PlayerId>,
    pub room_id: RoomId,
    pub tournament_id: Option<TournamentId>,
    pub created_by: String,
    pub updated_by: String,
    pub created_at: DateTime<Utc>,
}

impl GameRecord {
    /// History entry for a completed tournament match.
    pub fn from_match(
        game: &GameMatch,
        kind: TournamentKind,
        room_id: RoomId,
        acting_user: &str,
    ) -> Option<Self> {
        Some(Self {
            id: Uuid::new_v4(),
            team1: game.team1.clone(),
            team2: game.team2.clone(),
            score1: game.score1?,
            score2: game.score2?,
            winner: game.winner_name()?,
            kind,
            team1_player1: game.team1_player1,
            team1_player2: game.team1_player2,
            team2_player1: game.team2_player1,
            team2_player2: game.team2_player2,
            room_id,
            tournament_id: Some(game.tournament_id),
            created_by: acting_user.to_string(),
            updated_by: acting_user.to_string(),
            created_at: Utc::now(),
        })
    }
}
