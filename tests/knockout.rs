//! Integration tests for knockout tournaments: byes, round advancement and completion.

use match_tracker_web::{
    advance_round, advance_tournament, create_tournament, record_match_result, GameMatch,
    GameRecord, MatchId, MatchStatus, MemoryStore, NewTournament, Player, PlayerId, Room,
    RoomId, RoundAdvance, Store, StoreError, Tournament, TournamentError, TournamentFormat,
    TournamentId, TournamentKind, TournamentStatus, BYE,
};
use std::io;

fn room_with_players(store: &mut MemoryStore, names: &[&str]) -> (RoomId, Vec<PlayerId>) {
    let room = match_tracker_web::create_room(store, "Office").unwrap();
    let ids = names
        .iter()
        .map(|n| match_tracker_web::add_player(store, room.id, n).unwrap().id)
        .collect();
    (room.id, ids)
}

fn knockout(store: &mut MemoryStore, names: &[&str]) -> TournamentId {
    let (room_id, players) = room_with_players(store, names);
    create_tournament(
        store,
        NewTournament {
            name: "Friday Cup".to_string(),
            kind: TournamentKind::OneVOne,
            format: TournamentFormat::Knockout,
            room_id,
            players,
            matches_per_player: None,
            auto_advance: false,
            created_by: "host".to_string(),
        },
    )
    .unwrap()
    .tournament
    .id
}

fn round(store: &MemoryStore, id: TournamentId, round: u32) -> Vec<GameMatch> {
    store
        .matches(id)
        .unwrap()
        .into_iter()
        .filter(|m| m.round == round)
        .collect()
}

fn pairs(matches: &[GameMatch]) -> Vec<(u32, &str, &str)> {
    matches
        .iter()
        .map(|m| (m.match_number, m.team1.as_str(), m.team2.as_str()))
        .collect()
}

/// Let team1 win every pending match of a round by `margin` goals.
fn play_round(store: &mut MemoryStore, id: TournamentId, r: u32, margins: &[i64]) {
    let pending: Vec<GameMatch> = round(store, id, r)
        .into_iter()
        .filter(|m| m.status == MatchStatus::Pending)
        .collect();
    for (m, margin) in pending.iter().zip(margins.iter().cycle()) {
        record_match_result(store, m.id, *margin, 0, "host").unwrap();
    }
}

#[test]
fn four_players_play_through_to_a_champion() {
    let mut store = MemoryStore::new();
    let id = knockout(&mut store, &["P1", "P2", "P3", "P4"]);

    let first = round(&store, id, 1);
    assert_eq!(pairs(&first), [(1, "P1", "P2"), (2, "P3", "P4")]);
    assert_eq!(store.tournament(id).unwrap().unwrap().status, TournamentStatus::Pending);

    let recorded = record_match_result(&mut store, first[0].id, 2, 1, "host").unwrap();
    assert_eq!(recorded.tournament.status, TournamentStatus::Active);
    assert_eq!(recorded.advances, [RoundAdvance::Incomplete { round: 1 }]);
    assert!(round(&store, id, 2).is_empty());

    record_match_result(&mut store, first[1].id, 3, 0, "host").unwrap();
    let second = round(&store, id, 2);
    assert_eq!(pairs(&second), [(1, "P1", "P3")]);
    assert_eq!(second[0].status, MatchStatus::Pending);
    assert!(second[0].team1_player1.is_some());

    let recorded = record_match_result(&mut store, second[0].id, 1, 0, "host").unwrap();
    assert_eq!(recorded.tournament.status, TournamentStatus::Completed);
    assert_eq!(
        recorded.advances,
        [RoundAdvance::TournamentCompleted {
            champion: Some("P1".to_string())
        }]
    );
    assert_eq!(store.matches(id).unwrap().len(), 3);
}

#[test]
fn odd_roster_gets_an_immediate_walkover() {
    let mut store = MemoryStore::new();
    let id = knockout(&mut store, &["A", "B", "C"]);

    let first = round(&store, id, 1);
    assert_eq!(pairs(&first), [(1, "A", "B"), (2, "C", BYE)]);
    let walkover = &first[1];
    assert_eq!(walkover.status, MatchStatus::Completed);
    assert_eq!((walkover.score1, walkover.score2), (Some(3), Some(0)));
    assert_eq!(walkover.winner_name().as_deref(), Some("C"));

    record_match_result(&mut store, first[0].id, 0, 2, "host").unwrap();
    assert_eq!(pairs(&round(&store, id, 2)), [(1, "B", "C")]);
}

#[test]
fn five_winners_first_gets_a_bye_and_bye_completes_itself() {
    let mut store = MemoryStore::new();
    let names: Vec<String> = (1..=10).map(|i| format!("P{i:02}")).collect();
    let names: Vec<&str> = names.iter().map(String::as_str).collect();
    let id = knockout(&mut store, &names);

    play_round(&mut store, id, 1, &[1]);
    let second = round(&store, id, 2);
    assert_eq!(
        pairs(&second),
        [(1, "P01", BYE), (2, "P03", "P05"), (3, "P07", "P09")]
    );
    assert_eq!(second[0].status, MatchStatus::Completed);
    assert_eq!(second[0].winner_name().as_deref(), Some("P01"));
    assert!(second[1..].iter().all(|m| m.status == MatchStatus::Pending));
}

#[test]
fn three_winners_most_dominant_gets_the_bye() {
    let mut store = MemoryStore::new();
    let id = knockout(&mut store, &["A", "a", "B", "b", "C", "c"]);

    play_round(&mut store, id, 1, &[3, 1, 2]);
    let second = round(&store, id, 2);
    assert_eq!(pairs(&second), [(1, "A", BYE), (2, "B", "C")]);
    assert_eq!(second[0].status, MatchStatus::Completed);

    record_match_result(&mut store, second[1].id, 0, 1, "host").unwrap();
    assert_eq!(pairs(&round(&store, id, 3)), [(1, "A", "C")]);
}

#[test]
fn advancing_twice_does_not_duplicate_the_next_round() {
    let mut store = MemoryStore::new();
    let id = knockout(&mut store, &["P1", "P2", "P3", "P4"]);
    play_round(&mut store, id, 1, &[1]);
    assert_eq!(round(&store, id, 2).len(), 1);

    let again = advance_round(&mut store, id, 1);
    assert!(matches!(
        again,
        Err(TournamentError::RoundAlreadyAdvanced { round: 2 })
    ));
    assert_eq!(round(&store, id, 2).len(), 1);
    assert_eq!(store.matches(id).unwrap().len(), 3);
}

#[test]
fn manual_advance_is_a_no_op_while_the_round_is_open() {
    let mut store = MemoryStore::new();
    let id = knockout(&mut store, &["P1", "P2", "P3", "P4"]);
    let steps = advance_tournament(&mut store, id).unwrap();
    assert_eq!(steps, [RoundAdvance::Incomplete { round: 1 }]);
    assert_eq!(store.matches(id).unwrap().len(), 2);
}

#[test]
fn knockout_matches_cannot_be_drawn() {
    let mut store = MemoryStore::new();
    let id = knockout(&mut store, &["P1", "P2"]);
    let only = round(&store, id, 1).remove(0);
    assert!(matches!(
        record_match_result(&mut store, only.id, 2, 2, "host"),
        Err(TournamentError::DrawNotAllowed)
    ));
    assert_eq!(
        store.game_match(only.id).unwrap().unwrap().status,
        MatchStatus::Pending
    );
}

#[test]
fn completed_matches_cannot_be_resubmitted() {
    let mut store = MemoryStore::new();
    let id = knockout(&mut store, &["P1", "P2", "P3", "P4"]);
    let first = round(&store, id, 1).remove(0);
    record_match_result(&mut store, first.id, 1, 0, "host").unwrap();
    assert!(matches!(
        record_match_result(&mut store, first.id, 0, 1, "host"),
        Err(TournamentError::MatchNotFound(_))
    ));
}

/// Memory store whose next write of a walkover can be made to fail.
#[derive(Default)]
struct FlakyStore {
    inner: MemoryStore,
    fail_next_walkover: bool,
}

impl Store for FlakyStore {
    fn insert_room(&mut self, room: Room) -> Result<(), StoreError> {
        self.inner.insert_room(room)
    }
    fn room(&self, id: RoomId) -> Result<Option<Room>, StoreError> {
        self.inner.room(id)
    }
    fn insert_player(&mut self, player: Player) -> Result<(), StoreError> {
        self.inner.insert_player(player)
    }
    fn player(&self, id: PlayerId) -> Result<Option<Player>, StoreError> {
        self.inner.player(id)
    }
    fn players_in_room(&self, room_id: RoomId) -> Result<Vec<Player>, StoreError> {
        self.inner.players_in_room(room_id)
    }
    fn insert_tournament(&mut self, tournament: Tournament) -> Result<(), StoreError> {
        self.inner.insert_tournament(tournament)
    }
    fn tournament(&self, id: TournamentId) -> Result<Option<Tournament>, StoreError> {
        self.inner.tournament(id)
    }
    fn update_tournament(&mut self, tournament: &Tournament) -> Result<(), StoreError> {
        self.inner.update_tournament(tournament)
    }
    fn delete_tournament(&mut self, id: TournamentId) -> Result<bool, StoreError> {
        self.inner.delete_tournament(id)
    }
    fn insert_matches(&mut self, matches: &[GameMatch]) -> Result<(), StoreError> {
        self.inner.insert_matches(matches)
    }
    fn game_match(&self, id: MatchId) -> Result<Option<GameMatch>, StoreError> {
        self.inner.game_match(id)
    }
    fn matches(&self, tournament_id: TournamentId) -> Result<Vec<GameMatch>, StoreError> {
        self.inner.matches(tournament_id)
    }
    fn update_match(&mut self, game: &GameMatch) -> Result<(), StoreError> {
        if game.has_bye() && std::mem::take(&mut self.fail_next_walkover) {
            return Err(io::Error::new(io::ErrorKind::Other, "net down").into());
        }
        self.inner.update_match(game)
    }
    fn insert_game(&mut self, record: GameRecord) -> Result<(), StoreError> {
        self.inner.insert_game(record)
    }
    fn games_in_room(&self, room_id: RoomId) -> Result<Vec<GameRecord>, StoreError> {
        self.inner.games_in_room(room_id)
    }
}

#[test]
fn lost_walkover_write_is_repaired_on_the_next_attempt() {
    let mut store = FlakyStore::default();
    let id = knockout(&mut store.inner, &["A", "a", "C", "c", "E", "e"]);
    let first = round(&store.inner, id, 1);
    record_match_result(&mut store.inner, first[0].id, 3, 0, "host").unwrap();
    record_match_result(&mut store.inner, first[1].id, 1, 0, "host").unwrap();

    store.fail_next_walkover = true;
    let failed = record_match_result(&mut store, first[2].id, 2, 0, "host");
    assert!(matches!(failed, Err(TournamentError::Persistence(_))));
    let stuck = round(&store.inner, id, 2);
    assert_eq!(pairs(&stuck), [(1, "A", BYE), (2, "C", "E")]);
    assert_eq!(stuck[0].status, MatchStatus::Pending);

    let steps = advance_tournament(&mut store, id).unwrap();
    assert_eq!(steps, [RoundAdvance::Incomplete { round: 2 }]);
    let repaired = round(&store.inner, id, 2);
    assert_eq!(repaired[0].status, MatchStatus::Completed);
    assert_eq!(repaired[0].winner_name().as_deref(), Some("A"));

    record_match_result(&mut store, repaired[1].id, 2, 0, "host").unwrap();
    assert_eq!(pairs(&round(&store.inner, id, 3)), [(1, "A", "C")]);
}
