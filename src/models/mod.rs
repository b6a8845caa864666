//! Data structures: rooms, players, tournaments, matches and game history.

mod game;
mod history;
mod player;
mod tournament;

pub use game::{GameMatch, MatchId, MatchStatus, Outcome, Team, WALKOVER_SCORE};
pub use history::{GameRecord, GameRecordId};
pub use player::{is_bye, team_name, Competitor, Player, PlayerId, Room, RoomId, BYE};
pub use tournament::{
    ErrorKind, Tournament, TournamentError, TournamentFormat, TournamentId, TournamentKind,
    TournamentStatus,
};
