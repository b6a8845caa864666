//! Match tracker web app: library with models, storage and tournament progression logic.

pub mod config;
pub mod logic;
pub mod models;
pub mod store;

pub use config::{Config, ConfigError};
pub use logic::{
    add_player, advance_round, advance_tournament, calculate_standings, create_finals_match,
    create_room, create_tournament, delete_tournament, get_standings, list_players,
    pair_winners, rank_standings, record_casual_game, record_match_result, resolve_match_result,
    resolve_walkovers, room_leaderboard, shuffle_into_teams, MatchRecorded, NewGame,
    NewTournament, RoundAdvance, Standing, TournamentCreated,
};
pub use models::{
    Competitor, ErrorKind, GameMatch, GameRecord, MatchId, MatchStatus, Outcome, Player,
    PlayerId, Room, RoomId, Team, Tournament, TournamentError, TournamentFormat, TournamentId,
    TournamentKind, TournamentStatus, BYE,
};
pub use store::{JsonFileStore, MemoryStore, Store, StoreError};
