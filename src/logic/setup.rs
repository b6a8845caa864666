//! Tournament setup: validate the selection, build the initial schedule and persist it.

use crate::logic::advancement::{advance_chain, RoundAdvance};
use crate::logic::roster::resolve_players;
use crate::logic::walkover::resolve_walkovers;
use crate::models::{
    Competitor, GameMatch, PlayerId, RoomId, Tournament, TournamentError, TournamentFormat,
    TournamentId, TournamentKind,
};
use crate::store::Store;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// First knockout round; round 0 is the round-robin stage.
pub const FIRST_KNOCKOUT_ROUND: u32 = 1;

/// Everything needed to create a tournament.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewTournament {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TournamentKind,
    #[serde(default)]
    pub format: TournamentFormat,
    pub room_id: RoomId,
    /// Selected players in order. For 2v2, consecutive players form a team.
    pub players: Vec<PlayerId>,
    /// Matches per pairing in the round-robin stage (default 1).
    #[serde(default)]
    pub matches_per_player: Option<u32>,
    #[serde(default)]
    pub auto_advance: bool,
    pub created_by: String,
}

/// A freshly created tournament with its initial matches (walkovers already resolved).
#[derive(Clone, Debug, Serialize)]
pub struct TournamentCreated {
    pub tournament: Tournament,
    pub matches: Vec<GameMatch>,
    pub advances: Vec<RoundAdvance>,
}

/// Check a 2v2 selection: an even number of at least 4 players.
pub fn validate_team_selection(selected: usize) -> Result<(), TournamentError> {
    if selected < 4 || selected % 2 != 0 {
        return Err(TournamentError::InvalidTeamSelection { selected });
    }
    Ok(())
}

/// Random 2v2 teams: shuffle the selection so consecutive players form the teams.
pub fn shuffle_into_teams<R: Rng + ?Sized>(
    players: &mut [PlayerId],
    rng: &mut R,
) -> Result<(), TournamentError> {
    validate_team_selection(players.len())?;
    players.shuffle(rng);
    Ok(())
}

/// Every unordered pair (i, j), i < j in selection order, `multiplicity` times, all in round 0.
pub fn round_robin_matches(
    tournament_id: TournamentId,
    competitors: &[Competitor],
    multiplicity: u32,
) -> Vec<GameMatch> {
    let mut matches = Vec::new();
    let mut match_number = 1;
    for (i, a) in competitors.iter().enumerate() {
        for b in &competitors[i + 1..] {
            for _ in 0..multiplicity {
                matches.push(GameMatch::new(tournament_id, 0, match_number, a, b));
                match_number += 1;
            }
        }
    }
    matches
}

/// First knockout round: consecutive competitors meet; an odd one out faces BYE.
pub fn knockout_matches(tournament_id: TournamentId, competitors: &[Competitor]) -> Vec<GameMatch> {
    let bye = Competitor::bye();
    competitors
        .chunks(2)
        .zip(1..)
        .map(|(pair, match_number)| {
            let opponent = pair.get(1).unwrap_or(&bye);
            GameMatch::new(
                tournament_id,
                FIRST_KNOCKOUT_ROUND,
                match_number,
                &pair[0],
                opponent,
            )
        })
        .collect()
}

/// Create a tournament and its initial matches.
///
/// Nothing is persisted unless the whole selection is valid. Knockout byes are
/// completed right away.
pub fn create_tournament<S: Store + ?Sized>(
    store: &mut S,
    request: NewTournament,
) -> Result<TournamentCreated, TournamentError> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(TournamentError::EmptyName);
    }
    let multiplicity = request.matches_per_player.unwrap_or(1);
    if multiplicity == 0 {
        return Err(TournamentError::InvalidMultiplicity);
    }
    store
        .room(request.room_id)?
        .ok_or(TournamentError::RoomNotFound(request.room_id))?;

    let players = resolve_players(store, request.room_id, &request.players)?;
    let competitors: Vec<Competitor> = match request.kind {
        TournamentKind::OneVOne => players.iter().map(Competitor::single).collect(),
        TournamentKind::TwoVTwo => {
            validate_team_selection(players.len())?;
            players
                .chunks_exact(2)
                .map(|team| Competitor::pair(&team[0], &team[1]))
                .collect()
        }
    };
    if competitors.len() < 2 {
        return Err(TournamentError::NotEnoughCompetitors {
            selected: competitors.len(),
        });
    }

    let mut tournament = Tournament::new(
        name,
        request.kind,
        request.format,
        request.room_id,
        request.created_by,
    );
    tournament.auto_advance = request.auto_advance;
    let mut matches = match request.format {
        TournamentFormat::RoundRobin => {
            tournament.matches_per_player = Some(multiplicity);
            round_robin_matches(tournament.id, &competitors, multiplicity)
        }
        TournamentFormat::Knockout => knockout_matches(tournament.id, &competitors),
    };

    let tournament_id = tournament.id;
    store.insert_tournament(tournament)?;
    store.insert_matches(&matches)?;
    log::info!(
        "Created tournament {} ({:?}, {:?}) with {} competitors and {} matches",
        tournament_id,
        request.kind,
        request.format,
        competitors.len(),
        matches.len()
    );

    let walkovers = resolve_walkovers(store, &mut matches)?;
    let advances = if walkovers.is_empty() {
        Vec::new()
    } else {
        advance_chain(store, tournament_id, FIRST_KNOCKOUT_ROUND)?
    };

    let tournament = store
        .tournament(tournament_id)?
        .ok_or(TournamentError::TournamentNotFound(tournament_id))?;
    Ok(TournamentCreated {
        tournament,
        matches: store.matches(tournament_id)?,
        advances,
    })
}

/// Delete a tournament together with its matches.
pub fn delete_tournament<S: Store + ?Sized>(
    store: &mut S,
    tournament_id: TournamentId,
) -> Result<(), TournamentError> {
    if !store.delete_tournament(tournament_id)? {
        return Err(TournamentError::TournamentNotFound(tournament_id));
    }
    log::info!("Deleted tournament {}", tournament_id);
    Ok(())
}
