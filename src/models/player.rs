//! Rooms, players and the competitors built from them.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player.
pub type PlayerId = Uuid;

/// Unique identifier for a room.
pub type RoomId = Uuid;

/// Reserved competitor name meaning "no opponent".
pub const BYE: &str = "BYE";

/// A room groups the players that play against each other.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
}

impl Room {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}

/// A player of a room.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub room_id: RoomId,
}

impl Player {
    pub fn new(name: impl Into<String>, room_id: RoomId) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            room_id,
        }
    }
}

/// One side of a match: a single player (1v1), a pair of players (2v2) or the BYE sentinel.
///
/// The name is derived from the players and is what matches store; the ids are kept
/// alongside so later rounds can carry the player references forward.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Competitor {
    pub name: String,
    pub player1: Option<PlayerId>,
    pub player2: Option<PlayerId>,
}

impl Competitor {
    pub fn single(player: &Player) -> Self {
        Self {
            name: player.name.clone(),
            player1: Some(player.id),
            player2: None,
        }
    }

    /// A 2v2 team. Names are sorted so "A & B" and "B & A" are the same team.
    pub fn pair(a: &Player, b: &Player) -> Self {
        let (first, second) = if a.name <= b.name { (a, b) } else { (b, a) };
        Self {
            name: team_name(&first.name, &second.name),
            player1: Some(first.id),
            player2: Some(second.id),
        }
    }

    pub fn bye() -> Self {
        Self {
            name: BYE.to_string(),
            player1: None,
            player2: None,
        }
    }

    /// A competitor known only by name (player references could not be resolved).
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            player1: None,
            player2: None,
        }
    }

    pub fn is_bye(&self) -> bool {
        is_bye(&self.name)
    }
}

pub fn is_bye(name: &str) -> bool {
    name == BYE
}

/// Canonical 2v2 team name: both names sorted lexicographically, joined with " & ".
pub fn team_name(a: &str, b: &str) -> String {
    if a <= b {
        format!("{a} & {b}")
    } else {
        format!("{b} & {a}")
    }
}
