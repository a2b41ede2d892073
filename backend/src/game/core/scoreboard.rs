use serde::{Deserialize, Serialize};

/// One resolved word of a round
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundResult {
    pub word: String,
    pub guessed: bool,
}

impl RoundResult {
    pub fn new(word: impl Into<String>, guessed: bool) -> Self {
        Self {
            word: word.into(),
            guessed,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamScore {
    pub team: String,
    pub score: i32,
}

/// +1 per guessed word, -1 per skipped word when the penalty is on
pub fn round_delta(results: &[RoundResult], skip_penalty: bool) -> i32 {
    results
        .iter()
        .map(|r| match (r.guessed, skip_penalty) {
            (true, _) => 1,
            (false, true) => -1,
            (false, false) => 0,
        })
        .sum()
}

pub fn apply_round_results(score: i32, results: &[RoundResult], skip_penalty: bool) -> i32 {
    score + round_delta(results, skip_penalty)
}

/// Per-team scores, kept in team order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoreBoard {
    entries: Vec<TeamScore>,
}

impl ScoreBoard {
    pub fn new(teams: &[String]) -> Self {
        Self {
            entries: teams
                .iter()
                .map(|team| TeamScore {
                    team: team.clone(),
                    score: 0,
                })
                .collect(),
        }
    }

    pub fn entries(&self) -> &[TeamScore] {
        &self.entries
    }

    pub fn score(&self, team: &str) -> Option<i32> {
        self.entries.iter().find(|e| e.team == team).map(|e| e.score)
    }

    pub fn score_at(&self, index: usize) -> Option<i32> {
        self.entries.get(index).map(|e| e.score)
    }

    /// Apply a whole round to one team. Returns the new score.
    pub fn apply_round_results(
        &mut self,
        team_index: usize,
        results: &[RoundResult],
        skip_penalty: bool,
    ) -> Option<i32> {
        let entry = self.entries.get_mut(team_index)?;
        entry.score = apply_round_results(entry.score, results, skip_penalty);
        Some(entry.score)
    }

    /// Every team at or above the target
    pub fn evaluate_win(&self, target: u32) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| i64::from(e.score) >= i64::from(target))
            .map(|e| e.team.clone())
            .collect()
    }

    /// Every team holding the top score
    pub fn evaluate_exhaustion_win(&self) -> Vec<String> {
        let Some(best) = self.entries.iter().map(|e| e.score).max() else {
            return Vec::new();
        };
        self.entries
            .iter()
            .filter(|e| e.score == best)
            .map(|e| e.team.clone())
            .collect()
    }

    /// True when the board lists exactly these teams, in this order
    pub fn matches_teams(&self, teams: &[String]) -> bool {
        self.entries.len() == teams.len()
            && self.entries.iter().zip(teams).all(|(e, t)| &e.team == t)
    }
}
