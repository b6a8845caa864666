//! Standings: per-competitor aggregates, always recomputed from the full game list.

use crate::models::{is_bye, GameMatch, GameRecord, RoomId, TournamentError, TournamentId};
use crate::store::Store;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

/// Points for a strict win.
pub const POINTS_WIN: u32 = 3;
/// Points for each side of a draw.
pub const POINTS_DRAW: u32 = 1;

/// Anything with two named sides and, once played, a score.
pub trait ScoredGame {
    fn sides(&self) -> (&str, &str);

    /// Final score, or None while the game has not been played.
    fn final_score(&self) -> Option<(u32, u32)>;
}

impl ScoredGame for GameMatch {
    fn sides(&self) -> (&str, &str) {
        (&self.team1, &self.team2)
    }

    fn final_score(&self) -> Option<(u32, u32)> {
        if !self.is_completed() {
            return None;
        }
        Some((self.score1?, self.score2?))
    }
}

impl ScoredGame for GameRecord {
    fn sides(&self) -> (&str, &str) {
        (&self.team1, &self.team2)
    }

    fn final_score(&self) -> Option<(u32, u32)> {
        Some((self.score1, self.score2))
    }
}

/// Derived performance summary of one competitor.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Standing {
    pub name: String,
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i64,
    pub points: u32,
    /// (wins + 0.5 * draws) / played * 100, or 0 before the first game.
    pub win_percentage: f64,
}

impl Standing {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    fn record(&mut self, scored: u32, conceded: u32) {
        self.played += 1;
        self.goals_for += scored;
        self.goals_against += conceded;
        match scored.cmp(&conceded) {
            std::cmp::Ordering::Greater => {
                self.wins += 1;
                self.points += POINTS_WIN;
            }
            std::cmp::Ordering::Equal => {
                self.draws += 1;
                self.points += POINTS_DRAW;
            }
            std::cmp::Ordering::Less => self.losses += 1,
        }
    }

    fn finish(&mut self) {
        self.goal_difference = i64::from(self.goals_for) - i64::from(self.goals_against);
        self.win_percentage = if self.played == 0 {
            0.0
        } else {
            (f64::from(self.wins) + 0.5 * f64::from(self.draws)) / f64::from(self.played) * 100.0
        };
    }
}

/// Aggregate every competitor seen in `games` (BYE excluded), in order of first appearance.
///
/// Only played games count. A walkover counts as the 3-0 it was recorded as for the
/// advancing side; the BYE side has no standing.
pub fn calculate_standings<G: ScoredGame>(games: &[G]) -> Vec<Standing> {
    let mut standings: Vec<Standing> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    let mut slot = |name: &str, standings: &mut Vec<Standing>| -> Option<usize> {
        if is_bye(name) {
            return None;
        }
        let i = *index.entry(name.to_string()).or_insert_with(|| {
            standings.push(Standing::new(name));
            standings.len() - 1
        });
        Some(i)
    };

    for game in games {
        let (team1, team2) = game.sides();
        let first = slot(team1, &mut standings);
        let second = slot(team2, &mut standings);
        let Some((score1, score2)) = game.final_score() else {
            continue;
        };
        if let Some(i) = first {
            standings[i].record(score1, score2);
        }
        if let Some(i) = second {
            standings[i].record(score2, score1);
        }
    }

    for s in &mut standings {
        s.finish();
    }
    standings
}

/// Order by points, then goal difference, both descending. Ties keep their input order.
pub fn rank_standings(mut standings: Vec<Standing>) -> Vec<Standing> {
    standings.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then(b.goal_difference.cmp(&a.goal_difference))
    });
    standings
}

/// Ranked standings of a tournament, from all of its matches.
pub fn get_standings<S: Store + ?Sized>(
    store: &S,
    tournament_id: TournamentId,
) -> Result<Vec<Standing>, TournamentError> {
    store
        .tournament(tournament_id)?
        .ok_or(TournamentError::TournamentNotFound(tournament_id))?;
    let matches = store.matches(tournament_id)?;
    Ok(rank_standings(calculate_standings(&matches)))
}

/// Ranked leaderboard of a room's game history, optionally only games created at or after `since`.
pub fn room_leaderboard<S: Store + ?Sized>(
    store: &S,
    room_id: RoomId,
    since: Option<DateTime<Utc>>,
) -> Result<Vec<Standing>, TournamentError> {
    store
        .room(room_id)?
        .ok_or(TournamentError::RoomNotFound(room_id))?;
    let games: Vec<GameRecord> = store
        .games_in_room(room_id)?
        .into_iter()
        .filter(|g| since.map_or(true, |t| g.created_at >= t))
        .collect();
    Ok(rank_standings(calculate_standings(&games)))
}
