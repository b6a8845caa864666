//! Storage abstraction for rooms, players, tournaments, matches and game history.
//!
//! The tournament logic only talks to [`Store`]; the web binary picks the
//! in-memory store or the JSON snapshot store from configuration.

mod json_file;
mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use crate::models::{
    GameMatch, GameRecord, MatchId, Player, PlayerId, Room, RoomId, Tournament, TournamentId,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Conditional insert failed: (tournament, round, match_number) is already taken.
    #[error("Match {match_number} of round {round} already exists in tournament {tournament_id}")]
    DuplicateMatch {
        tournament_id: TournamentId,
        round: u32,
        match_number: u32,
    },
    #[error("No {table} row with id {id}")]
    MissingRow { table: &'static str, id: uuid::Uuid },
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Storage snapshot is malformed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Durable store consumed by the tournament logic.
pub trait Store {
    fn insert_room(&mut self, room: Room) -> Result<(), StoreError>;

    fn room(&self, id: RoomId) -> Result<Option<Room>, StoreError>;

    fn insert_player(&mut self, player: Player) -> Result<(), StoreError>;

    fn player(&self, id: PlayerId) -> Result<Option<Player>, StoreError>;

    fn players_in_room(&self, room_id: RoomId) -> Result<Vec<Player>, StoreError>;

    fn insert_tournament(&mut self, tournament: Tournament) -> Result<(), StoreError>;

    fn tournament(&self, id: TournamentId) -> Result<Option<Tournament>, StoreError>;

    fn update_tournament(&mut self, tournament: &Tournament) -> Result<(), StoreError>;

    /// Remove a tournament and all of its matches. Returns false if it did not exist.
    fn delete_tournament(&mut self, id: TournamentId) -> Result<bool, StoreError>;

    /// Insert a batch of matches atomically.
    ///
    /// Fails with [`StoreError::DuplicateMatch`] and inserts nothing if any
    /// (tournament_id, round, match_number) is already present.
    fn insert_matches(&mut self, matches: &[GameMatch]) -> Result<(), StoreError>;

    fn game_match(&self, id: MatchId) -> Result<Option<GameMatch>, StoreError>;

    /// All matches of a tournament ordered by round, then match number.
    fn matches(&self, tournament_id: TournamentId) -> Result<Vec<GameMatch>, StoreError>;

    fn update_match(&mut self, game: &GameMatch) -> Result<(), StoreError>;

    fn insert_game(&mut self, record: GameRecord) -> Result<(), StoreError>;

    /// History of a room, oldest first.
    fn games_in_room(&self, room_id: RoomId) -> Result<Vec<GameRecord>, StoreError>;
}
