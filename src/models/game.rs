//! Tournament matches (`tournament_matches` rows) and the score outcome of a match.

use crate::models::player::{is_bye, Competitor, PlayerId};
use crate::models::tournament::TournamentId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Score given to the advancing side of a walkover.
pub const WALKOVER_SCORE: u32 = 3;

/// Which side of a match.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    #[default]
    One,
    Two,
}

impl Team {
    pub fn other(self) -> Self {
        match self {
            Team::One => Team::Two,
            Team::Two => Team::One,
        }
    }
}

/// Result of a played match.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Winner(Team),
    Draw,
}

impl Outcome {
    /// Winner rule: higher score wins, equal scores draw.
    pub fn from_scores(score1: u32, score2: u32) -> Self {
        match score1.cmp(&score2) {
            std::cmp::Ordering::Greater => Outcome::Winner(Team::One),
            std::cmp::Ordering::Less => Outcome::Winner(Team::Two),
            std::cmp::Ordering::Equal => Outcome::Draw,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Pending,
    Completed,
}

/// A single tournament match. Field names follow the `tournament_matches` table.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    pub id: MatchId,
    pub tournament_id: TournamentId,
    pub round: u32,
    /// 1-based, unique within a round.
    pub match_number: u32,
    pub team1: String,
    pub team2: String,
    pub team1_player1: Option<PlayerId>,
    pub team1_player2: Option<PlayerId>,
    pub team2_player1: Option<PlayerId>,
    pub team2_player2: Option<PlayerId>,
    /// None if not yet played.
    pub score1: Option<u32>,
    pub score2: Option<u32>,
    pub winner: Option<Outcome>,
    pub status: MatchStatus,
}

impl GameMatch {
    pub fn new(
        tournament_id: TournamentId,
        round: u32,
        match_number: u32,
        team1: &Competitor,
        team2: &Competitor,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tournament_id,
            round,
            match_number,
            team1: team1.name.clone(),
            team2: team2.name.clone(),
            team1_player1: team1.player1,
            team1_player2: team1.player2,
            team2_player1: team2.player1,
            team2_player2: team2.player2,
            score1: None,
            score2: None,
            winner: None,
            status: MatchStatus::Pending,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == MatchStatus::Completed
    }

    pub fn has_bye(&self) -> bool {
        is_bye(&self.team1) || is_bye(&self.team2)
    }

    /// The side facing a BYE, when exactly one side is BYE.
    pub fn walkover_side(&self) -> Option<Team> {
        match (is_bye(&self.team1), is_bye(&self.team2)) {
            (false, true) => Some(Team::One),
            (true, false) => Some(Team::Two),
            _ => None,
        }
    }

    pub fn competitor(&self, team: Team) -> Competitor {
        match team {
            Team::One => Competitor {
                name: self.team1.clone(),
                player1: self.team1_player1,
                player2: self.team1_player2,
            },
            Team::Two => Competitor {
                name: self.team2.clone(),
                player1: self.team2_player1,
                player2: self.team2_player2,
            },
        }
    }

    /// The winning side, if the match is completed and not drawn.
    pub fn winning_competitor(&self) -> Option<Competitor> {
        match self.winner? {
            Outcome::Winner(team) => Some(self.competitor(team)),
            Outcome::Draw => None,
        }
    }

    /// Winner as stored in history: the team name or "Draw".
    pub fn winner_name(&self) -> Option<String> {
        self.winner.map(|w| match w {
            Outcome::Winner(Team::One) => self.team1.clone(),
            Outcome::Winner(Team::Two) => self.team2.clone(),
            Outcome::Draw => "Draw".to_string(),
        })
    }

    /// Set scores and winner and mark the match completed.
    pub fn complete(&mut self, score1: u32, score2: u32) {
        self.score1 = Some(score1);
        self.score2 = Some(score2);
        self.winner = Some(Outcome::from_scores(score1, score2));
        self.status = MatchStatus::Completed;
    }

    pub fn score_differential(&self) -> u32 {
        match (self.score1, self.score2) {
            (Some(a), Some(b)) => a.abs_diff(b),
            _ => 0,
        }
    }

    pub fn total_goals(&self) -> u32 {
        self.score1.unwrap_or(0) + self.score2.unwrap_or(0)
    }
}
