// Messages exchanged between the app loop and the TUI.

use hangman_core::{GameRound, RoundStatus, ScoreEntry};
use serde::{Deserialize, Serialize};

/// Tabs of the main panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TabId {
    Game,
    Scores,
}

/// Commands sent from the TUI to the app loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    /// Play a character in the active round.
    Guess(char),
    /// Abandon the active round (if any) and start a new one.
    NewRound,
    /// Delete the player's score history.
    ClearHistory,
    Quit,
}

/// Outcome of a single guess, as shown to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessResult {
    Hit(char),
    Miss(char),
    Rejected(char),
}

/// What the TUI needs to draw the active round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSnapshot {
    pub pattern: String,
    pub guessed_letters: Vec<char>,
    pub error_count: u32,
    pub max_errors: u32,
    pub status: RoundStatus,
    pub score: u32,
    /// The secret word, only once the round is over.
    pub secret_word: Option<String>,
}

impl RoundSnapshot {
    pub fn from_round(round: &GameRound) -> Self {
        RoundSnapshot {
            pattern: round.revealed_pattern().to_string(),
            guessed_letters: round.guessed_letters().to_vec(),
            error_count: round.error_count(),
            max_errors: round.max_errors(),
            status: round.status(),
            score: round.compute_score(),
            secret_word: round.is_over().then(|| round.secret_word().to_string()),
        }
    }

    pub fn is_over(&self) -> bool {
        self.status != RoundStatus::InProgress
    }

    /// Letters played that are not in the pattern.
    pub fn missed_letters(&self) -> Vec<char> {
        self.guessed_letters
            .iter()
            .copied()
            .filter(|c| !self.pattern.contains(*c))
            .collect()
    }
}

/// Score listing plus summary figures for the scores tab.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreboardView {
    pub player: String,
    /// Every recorded round for the player, oldest first.
    pub entries: Vec<ScoreEntry>,
    /// Points scored since the app started.
    pub session_total: u32,
    pub best_score: Option<u32>,
    /// The history database could not be read; `entries` holds this
    /// session's rounds only.
    pub history_unavailable: bool,
}

/// Updates pushed from the app loop to the TUI.
#[derive(Debug, Clone, PartialEq)]
pub enum UiUpdate {
    Round(Box<RoundSnapshot>),
    GuessResult(GuessResult),
    Scoreboard(Box<ScoreboardView>),
    Error(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_hides_word_until_over() {
        let mut round = GameRound::with_word("gato", 1).unwrap();
        round.apply_guess("a").unwrap();
        let snap = RoundSnapshot::from_round(&round);
        assert_eq!(snap.pattern, "_A__");
        assert_eq!(snap.secret_word, None);
        assert!(!snap.is_over());

        round.apply_guess("z").unwrap();
        let snap = RoundSnapshot::from_round(&round);
        assert_eq!(snap.status, RoundStatus::Lost);
        assert_eq!(snap.secret_word.as_deref(), Some("GATO"));
        assert_eq!(snap.score, 0);
    }

    #[test]
    fn missed_letters_excludes_hits() {
        let mut round = GameRound::with_word("gato", 5).unwrap();
        for letter in ["a", "z", "g", "x"] {
            round.apply_guess(letter).unwrap();
        }
        let snap = RoundSnapshot::from_round(&round);
        assert_eq!(snap.missed_letters(), vec!['Z', 'X']);
    }
}
