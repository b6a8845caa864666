//! In-memory store, also the snapshot format of the JSON store.

use super::{Store, StoreError};
use crate::models::{
    GameMatch, GameRecord, MatchId, Player, PlayerId, Room, RoomId, Tournament, TournamentId,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MemoryStore {
    rooms: Vec<Room>,
    players: Vec<Player>,
    tournaments: Vec<Tournament>,
    tournament_matches: Vec<GameMatch>,
    games: Vec<GameRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn insert_room(&mut self, room: Room) -> Result<(), StoreError> {
        self.rooms.push(room);
        Ok(())
    }

    fn room(&self, id: RoomId) -> Result<Option<Room>, StoreError> {
        Ok(self.rooms.iter().find(|r| r.id == id).cloned())
    }

    fn insert_player(&mut self, player: Player) -> Result<(), StoreError> {
        self.players.push(player);
        Ok(())
    }

    fn player(&self, id: PlayerId) -> Result<Option<Player>, StoreError> {
        Ok(self.players.iter().find(|p| p.id == id).cloned())
    }

    fn players_in_room(&self, room_id: RoomId) -> Result<Vec<Player>, StoreError> {
        Ok(self
            .players
            .iter()
            .filter(|p| p.room_id == room_id)
            .cloned()
            .collect())
    }

    fn insert_tournament(&mut self, tournament: Tournament) -> Result<(), StoreError> {
        self.tournaments.push(tournament);
        Ok(())
    }

    fn tournament(&self, id: TournamentId) -> Result<Option<Tournament>, StoreError> {
        Ok(self.tournaments.iter().find(|t| t.id == id).cloned())
    }

    fn update_tournament(&mut self, tournament: &Tournament) -> Result<(), StoreError> {
        let row = self
            .tournaments
            .iter_mut()
            .find(|t| t.id == tournament.id)
            .ok_or(StoreError::MissingRow {
                table: "tournaments",
                id: tournament.id,
            })?;
        *row = tournament.clone();
        Ok(())
    }

    fn delete_tournament(&mut self, id: TournamentId) -> Result<bool, StoreError> {
        let before = self.tournaments.len();
        self.tournaments.retain(|t| t.id != id);
        if self.tournaments.len() == before {
            return Ok(false);
        }
        self.tournament_matches.retain(|m| m.tournament_id != id);
        Ok(true)
    }

    fn insert_matches(&mut self, matches: &[GameMatch]) -> Result<(), StoreError> {
        let mut taken: HashSet<(TournamentId, u32, u32)> = self
            .tournament_matches
            .iter()
            .map(|m| (m.tournament_id, m.round, m.match_number))
            .collect();
        for m in matches {
            if !taken.insert((m.tournament_id, m.round, m.match_number)) {
                return Err(StoreError::DuplicateMatch {
                    tournament_id: m.tournament_id,
                    round: m.round,
                    match_number: m.match_number,
                });
            }
        }
        self.tournament_matches.extend_from_slice(matches);
        Ok(())
    }

    fn game_match(&self, id: MatchId) -> Result<Option<GameMatch>, StoreError> {
        Ok(self.tournament_matches.iter().find(|m| m.id == id).cloned())
    }

    fn matches(&self, tournament_id: TournamentId) -> Result<Vec<GameMatch>, StoreError> {
        let mut matches: Vec<GameMatch> = self
            .tournament_matches
            .iter()
            .filter(|m| m.tournament_id == tournament_id)
            .cloned()
            .collect();
        matches.sort_by_key(|m| (m.round, m.match_number));
        Ok(matches)
    }

    fn update_match(&mut self, game: &GameMatch) -> Result<(), StoreError> {
        let row = self
            .tournament_matches
            .iter_mut()
            .find(|m| m.id == game.id)
            .ok_or(StoreError::MissingRow {
                table: "tournament_matches",
                id: game.id,
            })?;
        *row = game.clone();
        Ok(())
    }

    fn insert_game(&mut self, record: GameRecord) -> Result<(), StoreError> {
        self.games.push(record);
        Ok(())
    }

    fn games_in_room(&self, room_id: RoomId) -> Result<Vec<GameRecord>, StoreError> {
        let mut games: Vec<GameRecord> = self
            .games
            .iter()
            .filter(|g| g.room_id == room_id)
            .cloned()
            .collect();
        games.sort_by_key(|g| g.created_at);
        Ok(games)
    }
}
