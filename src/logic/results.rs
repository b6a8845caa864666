//! Reported scores: tournament match results and casual games.

use crate::logic::advancement::{advance_chain, RoundAdvance};
use crate::logic::roster::resolve_players;
use crate::models::{
    Competitor, GameMatch, GameRecord, MatchId, Outcome, Player, PlayerId, RoomId, Team,
    Tournament, TournamentError, TournamentKind, TournamentStatus,
};
use crate::store::Store;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Scores arrive as raw integers; anything negative or beyond `u32` is rejected.
pub fn validate_score(raw: i64) -> Result<u32, TournamentError> {
    u32::try_from(raw).map_err(|_| TournamentError::InvalidScore(raw))
}

/// Outcome of [`record_match_result`]: the saved match and what advancement did afterwards.
#[derive(Clone, Debug, Serialize)]
pub struct MatchRecorded {
    #[serde(rename = "match")]
    pub game: GameMatch,
    pub tournament: Tournament,
    pub advances: Vec<RoundAdvance>,
}

/// Apply a reported score to one pending match and record it in the history.
///
/// Does not advance the tournament; see [`record_match_result`].
pub fn resolve_match_result<S: Store + ?Sized>(
    store: &mut S,
    match_id: MatchId,
    score1: i64,
    score2: i64,
    acting_user: &str,
) -> Result<GameMatch, TournamentError> {
    let score1 = validate_score(score1)?;
    let score2 = validate_score(score2)?;

    let mut game = store
        .game_match(match_id)?
        .filter(|m| !m.is_completed())
        .ok_or(TournamentError::MatchNotFound(match_id))?;
    if game.has_bye() {
        return Err(TournamentError::ByeMatch(match_id));
    }
    let mut tournament = store
        .tournament(game.tournament_id)?
        .ok_or(TournamentError::TournamentNotFound(game.tournament_id))?;
    if Outcome::from_scores(score1, score2) == Outcome::Draw
        && tournament.is_knockout_round(game.round)
    {
        return Err(TournamentError::DrawNotAllowed);
    }

    game.complete(score1, score2);
    store.update_match(&game)?;
    if tournament.status == TournamentStatus::Pending {
        tournament.status = TournamentStatus::Active;
        store.update_tournament(&tournament)?;
    }

    let record = GameRecord::from_match(&game, tournament.kind, tournament.room_id, acting_user);
    if let Some(record) = record {
        store.insert_game(record)?;
    }
    log::info!(
        "Tournament {} round {} match {}: {} {}-{} {}",
        tournament.id,
        game.round,
        game.match_number,
        game.team1,
        score1,
        score2,
        game.team2
    );
    Ok(game)
}

/// Record a result, then advance the tournament as far as it will go.
pub fn record_match_result<S: Store + ?Sized>(
    store: &mut S,
    match_id: MatchId,
    score1: i64,
    score2: i64,
    acting_user: &str,
) -> Result<MatchRecorded, TournamentError> {
    let game = resolve_match_result(store, match_id, score1, score2, acting_user)?;
    let advances = advance_chain(store, game.tournament_id, game.round)?;
    let tournament = store
        .tournament(game.tournament_id)?
        .ok_or(TournamentError::TournamentNotFound(game.tournament_id))?;
    Ok(MatchRecorded {
        game,
        tournament,
        advances,
    })
}

/// A game played outside any tournament.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewGame {
    #[serde(rename = "type")]
    pub kind: TournamentKind,
    pub team1: Vec<PlayerId>,
    pub team2: Vec<PlayerId>,
    pub score1: i64,
    pub score2: i64,
}

fn side(players: &[Player]) -> Option<Competitor> {
    match players {
        [a] => Some(Competitor::single(a)),
        [a, b] => Some(Competitor::pair(a, b)),
        _ => None,
    }
}

/// Record a casual game straight into the room's history.
pub fn record_casual_game<S: Store + ?Sized>(
    store: &mut S,
    room_id: RoomId,
    game: NewGame,
    acting_user: &str,
) -> Result<GameRecord, TournamentError> {
    let score1 = validate_score(game.score1)?;
    let score2 = validate_score(game.score2)?;
    store
        .room(room_id)?
        .ok_or(TournamentError::RoomNotFound(room_id))?;

    let per_side = match game.kind {
        TournamentKind::OneVOne => 1,
        TournamentKind::TwoVTwo => 2,
    };
    let selected = game.team1.len() + game.team2.len();
    let wrong_size = || match game.kind {
        TournamentKind::OneVOne => TournamentError::NotEnoughCompetitors { selected },
        TournamentKind::TwoVTwo => TournamentError::InvalidTeamSelection { selected },
    };
    if game.team1.len() != per_side || game.team2.len() != per_side {
        return Err(wrong_size());
    }
    let everyone: Vec<PlayerId> = game.team1.iter().chain(&game.team2).copied().collect();
    let players = resolve_players(store, room_id, &everyone)?;
    let (first, second) = players.split_at(per_side);
    let team1 = side(first).ok_or_else(wrong_size)?;
    let team2 = side(second).ok_or_else(wrong_size)?;

    let winner = match Outcome::from_scores(score1, score2) {
        Outcome::Winner(Team::One) => team1.name.clone(),
        Outcome::Winner(Team::Two) => team2.name.clone(),
        Outcome::Draw => "Draw".to_string(),
    };
    let record = GameRecord {
        id: Uuid::new_v4(),
        team1: team1.name,
        team2: team2.name,
        score1,
        score2,
        winner,
        kind: game.kind,
        team1_player1: team1.player1,
        team1_player2: team1.player2,
        team2_player1: team2.player1,
        team2_player2: team2.player2,
        room_id,
        tournament_id: None,
        created_by: acting_user.to_string(),
        updated_by: acting_user.to_string(),
        created_at: Utc::now(),
    };
    store.insert_game(record.clone())?;
    log::info!(
        "Room {}: {} {}-{} {}",
        room_id,
        record.team1,
        score1,
        score2,
        record.team2
    );
    Ok(record)
}
