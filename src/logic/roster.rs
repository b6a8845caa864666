//! Rooms and players: the roster the tournaments are built from.

use crate::models::{Player, PlayerId, Room, RoomId, TournamentError, BYE};
use crate::store::Store;

pub fn create_room<S: Store + ?Sized>(store: &mut S, name: &str) -> Result<Room, TournamentError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(TournamentError::EmptyName);
    }
    let room = Room::new(name);
    store.insert_room(room.clone())?;
    Ok(room)
}

/// Add a player to a room. Names are unique per room (case-insensitive) and
/// may not collide with the BYE sentinel.
pub fn add_player<S: Store + ?Sized>(
    store: &mut S,
    room_id: RoomId,
    name: &str,
) -> Result<Player, TournamentError> {
    store
        .room(room_id)?
        .ok_or(TournamentError::RoomNotFound(room_id))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(TournamentError::EmptyName);
    }
    if name.eq_ignore_ascii_case(BYE) {
        return Err(TournamentError::ReservedName(name.to_string()));
    }
    let is_duplicate = store
        .players_in_room(room_id)?
        .iter()
        .any(|p| p.name.eq_ignore_ascii_case(name));
    if is_duplicate {
        return Err(TournamentError::DuplicatePlayerName);
    }
    let player = Player::new(name, room_id);
    store.insert_player(player.clone())?;
    Ok(player)
}

pub fn list_players<S: Store + ?Sized>(
    store: &S,
    room_id: RoomId,
) -> Result<Vec<Player>, TournamentError> {
    store
        .room(room_id)?
        .ok_or(TournamentError::RoomNotFound(room_id))?;
    Ok(store.players_in_room(room_id)?)
}

/// Look up the selected players, in selection order, rejecting unknown, foreign or repeated ids.
pub(crate) fn resolve_players<S: Store + ?Sized>(
    store: &S,
    room_id: RoomId,
    ids: &[PlayerId],
) -> Result<Vec<Player>, TournamentError> {
    let mut players: Vec<Player> = Vec::with_capacity(ids.len());
    for &id in ids {
        if players.iter().any(|p| p.id == id) {
            return Err(TournamentError::DuplicatePlayer(id));
        }
        let player = store
            .player(id)?
            .filter(|p| p.room_id == room_id)
            .ok_or(TournamentError::PlayerNotFound(id))?;
        players.push(player);
    }
    Ok(players)
}
