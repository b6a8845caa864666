//! Walkovers: matches against BYE complete themselves without a reported score.

use crate::models::{GameMatch, MatchId, Team, TournamentError, WALKOVER_SCORE};
use crate::store::Store;

/// Complete a pending match that has exactly one BYE side: 3-0 for the other side.
///
/// Returns false (and leaves the match alone) for regular matches, double-BYE
/// matches and matches that are already completed.
pub fn apply_walkover(game: &mut GameMatch) -> bool {
    if game.is_completed() {
        return false;
    }
    match game.walkover_side() {
        Some(Team::One) => game.complete(WALKOVER_SCORE, 0),
        Some(Team::Two) => game.complete(0, WALKOVER_SCORE),
        None => return false,
    }
    true
}

/// Apply walkovers to a batch of newly created matches and persist the completed ones.
///
/// Does not generate later rounds. Returns the ids of the matches it completed.
pub fn resolve_walkovers<S: Store + ?Sized>(
    store: &mut S,
    matches: &mut [GameMatch],
) -> Result<Vec<MatchId>, TournamentError> {
    let mut completed = Vec::new();
    for game in matches.iter_mut() {
        if apply_walkover(game) {
            store.update_match(game)?;
            log::debug!(
                "Walkover in round {} match {}: {} advances",
                game.round,
                game.match_number,
                game.winner_name().unwrap_or_default()
            );
            completed.push(game.id);
        } else if !game.is_completed() && game.walkover_side().is_none() && game.has_bye() {
            log::warn!(
                "Round {} match {} of tournament {} has BYE on both sides; left pending",
                game.round,
                game.match_number,
                game.tournament_id
            );
        }
    }
    Ok(completed)
}
