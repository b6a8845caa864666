//! Single binary web server: JSON API over rooms, game history and tournaments.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT.
//! Set DATA_FILE to keep everything in a JSON snapshot instead of memory only.

use actix_web::{
    delete, get, post,
    web::{Data, Json, Path, Query},
    App, HttpResponse, HttpServer, Responder,
};
use chrono::{DateTime, Utc};
use match_tracker_web::{
    add_player, advance_tournament, create_finals_match, create_room, create_tournament,
    delete_tournament, get_standings, list_players, record_casual_game, record_match_result,
    room_leaderboard, shuffle_into_teams, Config, ErrorKind, GameMatch, JsonFileStore, MatchId,
    MemoryStore, NewGame, NewTournament, PlayerId, RoomId, Store, Tournament, TournamentError,
    TournamentFormat, TournamentId, TournamentKind,
};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

/// Shared store. One lock per request, so a whole advancement chain runs without interleaving.
type AppState = Data<Mutex<Box<dyn Store + Send>>>;

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct NameBody {
    name: String,
}

#[derive(Deserialize)]
struct RecordGameBody {
    #[serde(flatten)]
    game: NewGame,
    acting_user: String,
}

#[derive(Deserialize)]
struct LeaderboardQuery {
    since: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    name: String,
    #[serde(rename = "type", default)]
    kind: TournamentKind,
    #[serde(default)]
    format: TournamentFormat,
    room_id: RoomId,
    player_ids: Vec<PlayerId>,
    matches_per_player: Option<u32>,
    #[serde(default)]
    auto_advance: bool,
    /// 2v2 only: shuffle the selection into random teams (default) or keep the given pairs.
    #[serde(default = "default_random_teams")]
    random_teams: bool,
    created_by: String,
}

fn default_random_teams() -> bool {
    true
}

#[derive(Deserialize)]
struct MatchResultBody {
    score1: Option<i64>,
    score2: Option<i64>,
    acting_user: String,
}

#[derive(Serialize)]
struct TournamentView {
    tournament: Tournament,
    matches: Vec<GameMatch>,
}

/// Path segment: room id (e.g. /api/rooms/{id})
#[derive(Deserialize)]
struct RoomPath {
    id: RoomId,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segment: match id (e.g. /api/matches/{id})
#[derive(Deserialize)]
struct MatchPath {
    id: MatchId,
}

fn tournament_view(store: &dyn Store, id: TournamentId) -> Result<TournamentView, TournamentError> {
    let tournament = store
        .tournament(id)?
        .ok_or(TournamentError::TournamentNotFound(id))?;
    let matches = store.matches(id)?;
    Ok(TournamentView {
        tournament,
        matches,
    })
}

fn error_response(e: TournamentError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e.kind() {
        ErrorKind::Validation => HttpResponse::BadRequest().json(body),
        ErrorKind::NotFound => HttpResponse::NotFound().json(body),
        ErrorKind::Conflict => HttpResponse::Conflict().json(body),
        ErrorKind::Persistence => {
            log::error!("Storage failure: {}", e);
            HttpResponse::InternalServerError().json(body)
        }
    }
}

fn respond<T: Serialize>(result: Result<T, TournamentError>) -> HttpResponse {
    match result {
        Ok(value) => HttpResponse::Ok().json(value),
        Err(e) => error_response(e),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "match-tracker-web",
    })
}

#[post("/api/rooms")]
async fn api_create_room(state: AppState, body: Json<NameBody>) -> HttpResponse {
    let mut g = state.lock().await;
    respond(create_room(&mut **g, &body.name))
}

#[post("/api/rooms/{id}/players")]
async fn api_add_player(state: AppState, path: Path<RoomPath>, body: Json<NameBody>) -> HttpResponse {
    let mut g = state.lock().await;
    respond(add_player(&mut **g, path.id, &body.name))
}

#[get("/api/rooms/{id}/players")]
async fn api_list_players(state: AppState, path: Path<RoomPath>) -> HttpResponse {
    let g = state.lock().await;
    respond(list_players(&**g, path.id))
}

/// Record a casual (non-tournament) game in the room's history.
#[post("/api/rooms/{id}/games")]
async fn api_record_game(
    state: AppState,
    path: Path<RoomPath>,
    body: Json<RecordGameBody>,
) -> HttpResponse {
    let body = body.into_inner();
    let mut g = state.lock().await;
    respond(record_casual_game(&mut **g, path.id, body.game, &body.acting_user))
}

/// Room leaderboard over the game history, optionally since an RFC 3339 instant.
#[get("/api/rooms/{id}/leaderboard")]
async fn api_leaderboard(
    state: AppState,
    path: Path<RoomPath>,
    query: Query<LeaderboardQuery>,
) -> HttpResponse {
    let g = state.lock().await;
    respond(room_leaderboard(&**g, path.id, query.since))
}

/// Create a tournament and its initial matches.
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Json<CreateTournamentBody>) -> HttpResponse {
    let body = body.into_inner();
    let mut players = body.player_ids;
    if body.kind == TournamentKind::TwoVTwo && body.random_teams {
        if let Err(e) = shuffle_into_teams(&mut players, &mut rand::thread_rng()) {
            return error_response(e);
        }
    }
    let request = NewTournament {
        name: body.name,
        kind: body.kind,
        format: body.format,
        room_id: body.room_id,
        players,
        matches_per_player: body.matches_per_player,
        auto_advance: body.auto_advance,
        created_by: body.created_by,
    };
    let mut g = state.lock().await;
    respond(create_tournament(&mut **g, request))
}

#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let g = state.lock().await;
    respond(tournament_view(&**g, path.id))
}

/// Delete a tournament and its matches.
#[delete("/api/tournaments/{id}")]
async fn api_delete_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = state.lock().await;
    match delete_tournament(&mut **g, path.id) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => error_response(e),
    }
}

#[get("/api/tournaments/{id}/standings")]
async fn api_standings(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let g = state.lock().await;
    respond(get_standings(&**g, path.id))
}

/// Create the final after the round-robin stage.
#[post("/api/tournaments/{id}/finals")]
async fn api_create_finals(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = state.lock().await;
    respond(create_finals_match(&mut **g, path.id))
}

/// Re-attempt round generation (e.g. after a failed write).
#[post("/api/tournaments/{id}/advance")]
async fn api_advance(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = state.lock().await;
    respond(advance_tournament(&mut **g, path.id))
}

/// Report a score for a pending match; advances the tournament when the round is done.
#[post("/api/matches/{id}/result")]
async fn api_record_result(
    state: AppState,
    path: Path<MatchPath>,
    body: Json<MatchResultBody>,
) -> HttpResponse {
    let (Some(score1), Some(score2)) = (body.score1, body.score2) else {
        return HttpResponse::BadRequest()
            .json(serde_json::json!({ "error": "Both scores are required" }));
    };
    let mut g = state.lock().await;
    respond(record_match_result(&mut **g, path.id, score1, score2, &body.acting_user))
}

fn open_store(config: &Config) -> std::io::Result<Box<dyn Store + Send>> {
    match &config.data_file {
        Some(path) => {
            let store = JsonFileStore::open(path)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
            Ok(Box::new(store))
        }
        None => {
            log::info!("Using in-memory store (set DATA_FILE to persist)");
            Ok(Box::new(MemoryStore::new()))
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
    let state: AppState = Data::new(Mutex::new(open_store(&config)?));

    let bind = (config.host.as_str(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_create_room)
            .service(api_add_player)
            .service(api_list_players)
            .service(api_record_game)
            .service(api_leaderboard)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_delete_tournament)
            .service(api_standings)
            .service(api_create_finals)
            .service(api_advance)
            .service(api_record_result)
    })
    .bind(bind)?
    .run()
    .await
}
