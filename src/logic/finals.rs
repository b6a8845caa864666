//! Final after the round-robin stage: the top two of the standings meet once.

use crate::logic::standings::{calculate_standings, rank_standings};
use crate::models::{
    Competitor, GameMatch, Team, TournamentError, TournamentFormat, TournamentId,
};
use crate::store::Store;

/// Player references of a competitor, taken from the first match it appeared in.
fn find_competitor(matches: &[GameMatch], name: &str) -> Option<Competitor> {
    matches.iter().find_map(|m| {
        if m.team1 == name {
            Some(m.competitor(Team::One))
        } else if m.team2 == name {
            Some(m.competitor(Team::Two))
        } else {
            None
        }
    })
}

/// Create the decisive match between the two best competitors of the round-robin stage.
///
/// The stage must be complete, the tournament still open and no later round may exist. Ranking is by points,
/// then goal difference. The new match goes into the round after the highest
/// existing one, as match 1.
pub fn create_finals_match<S: Store + ?Sized>(
    store: &mut S,
    tournament_id: TournamentId,
) -> Result<GameMatch, TournamentError> {
    let tournament = store
        .tournament(tournament_id)?
        .ok_or(TournamentError::TournamentNotFound(tournament_id))?;
    if tournament.format != TournamentFormat::RoundRobin {
        return Err(TournamentError::NotRoundRobin);
    }
    if tournament.is_completed() {
        return Err(TournamentError::AlreadyCompleted(tournament_id));
    }

    let matches = store.matches(tournament_id)?;
    let max_round = matches.iter().map(|m| m.round).max().unwrap_or(0);
    if max_round > 0 {
        return Err(TournamentError::RoundAlreadyAdvanced { round: max_round });
    }
    if matches.is_empty() || matches.iter().any(|m| !m.is_completed()) {
        return Err(TournamentError::RoundIncomplete { round: 0 });
    }

    let ranked = rank_standings(calculate_standings(&matches));
    let [first, second, ..] = ranked.as_slice() else {
        return Err(TournamentError::NotEnoughStandings {
            found: ranked.len(),
        });
    };

    let finalists: Vec<Competitor> = [first, second]
        .iter()
        .map(|s| {
            find_competitor(&matches, &s.name).unwrap_or_else(|| {
                log::warn!("No player references found for finalist {}", s.name);
                Competitor::named(s.name.clone())
            })
        })
        .collect();

    let game = GameMatch::new(
        tournament_id,
        max_round + 1,
        1,
        &finalists[0],
        &finalists[1],
    );
    store.insert_matches(std::slice::from_ref(&game))?;
    log::info!(
        "Tournament {}: final {} vs {} ({} vs {} points)",
        tournament_id,
        game.team1,
        game.team2,
        first.points,
        second.points
    );
    Ok(game)
}
