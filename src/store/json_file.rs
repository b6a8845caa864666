//! Store that keeps everything in memory and rewrites a JSON snapshot after each change.

use super::{MemoryStore, Store, StoreError};
use crate::models::{
    GameMatch, GameRecord, MatchId, Player, PlayerId, Room, RoomId, Tournament, TournamentId,
};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl JsonFileStore {
    /// Open the snapshot at `path`, starting empty if the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let inner = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            serde_json::from_str(&contents)?
        } else {
            MemoryStore::new()
        };
        log::info!("Using JSON store at {}", path.display());
        Ok(Self { path, inner })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the snapshot to a sibling temp file, then rename it over the old one.
    fn flush(&self, snapshot: &MemoryStore) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(snapshot)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Apply a change to a copy, persist the copy, and only then make it current.
    /// A failed write leaves the in-memory state as it was on disk.
    fn commit<T>(
        &mut self,
        change: impl FnOnce(&mut MemoryStore) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut next = self.inner.clone();
        let out = change(&mut next)?;
        self.flush(&next)?;
        self.inner = next;
        Ok(out)
    }
}

impl Store for JsonFileStore {
    fn insert_room(&mut self, room: Room) -> Result<(), StoreError> {
        self.commit(|store| store.insert_room(room))
    }

    fn room(&self, id: RoomId) -> Result<Option<Room>, StoreError> {
        self.inner.room(id)
    }

    fn insert_player(&mut self, player: Player) -> Result<(), StoreError> {
        self.commit(|store| store.insert_player(player))
    }

    fn player(&self, id: PlayerId) -> Result<Option<Player>, StoreError> {
        self.inner.player(id)
    }

    fn players_in_room(&self, room_id: RoomId) -> Result<Vec<Player>, StoreError> {
        self.inner.players_in_room(room_id)
    }

    fn insert_tournament(&mut self, tournament: Tournament) -> Result<(), StoreError> {
        self.commit(|store| store.insert_tournament(tournament))
    }

    fn tournament(&self, id: TournamentId) -> Result<Option<Tournament>, StoreError> {
        self.inner.tournament(id)
    }

    fn update_tournament(&mut self, tournament: &Tournament) -> Result<(), StoreError> {
        self.commit(|store| store.update_tournament(tournament))
    }

    fn delete_tournament(&mut self, id: TournamentId) -> Result<bool, StoreError> {
        if self.inner.tournament(id)?.is_none() {
            return Ok(false);
        }
        self.commit(|store| store.delete_tournament(id))
    }

    fn insert_matches(&mut self, matches: &[GameMatch]) -> Result<(), StoreError> {
        self.commit(|store| store.insert_matches(matches))
    }

    fn game_match(&self, id: MatchId) -> Result<Option<GameMatch>, StoreError> {
        self.inner.game_match(id)
    }

    fn matches(&self, tournament_id: TournamentId) -> Result<Vec<GameMatch>, StoreError> {
        self.inner.matches(tournament_id)
    }

    fn update_match(&mut self, game: &GameMatch) -> Result<(), StoreError> {
        self.commit(|store| store.update_match(game))
    }

    fn insert_game(&mut self, record: GameRecord) -> Result<(), StoreError> {
        self.commit(|store| store.insert_game(record))
    }

    fn games_in_room(&self, room_id: RoomId) -> Result<Vec<GameRecord>, StoreError> {
        self.inner.games_in_room(room_id)
    }
}
