//! Tournament business logic: setup, results, walkovers, round advancement, finals, standings.

mod advancement;
mod finals;
mod results;
mod roster;
mod setup;
mod standings;
mod walkover;

pub use advancement::{advance_round, advance_tournament, pair_winners, Pairing, RoundAdvance};
pub use finals::create_finals_match;
pub use results::{
    record_casual_game, record_match_result, resolve_match_result, validate_score, MatchRecorded,
    NewGame,
};
pub use roster::{add_player, create_room, list_players};
pub use setup::{
    create_tournament, delete_tournament, knockout_matches, round_robin_matches,
    shuffle_into_teams, validate_team_selection, NewTournament, TournamentCreated,
    FIRST_KNOCKOUT_ROUND,
};
pub use standings::{
    calculate_standings, get_standings, rank_standings, room_leaderboard, ScoredGame, Standing,
    POINTS_DRAW, POINTS_WIN,
};
pub use walkover::{apply_walkover, resolve_walkovers};
