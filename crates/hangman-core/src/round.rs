// Game round state: word masking, guess application, end conditions, scoring.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::words::{WordSource, WordSourceError};

/// Character standing in for an undiscovered position of the secret word.
pub const PLACEHOLDER: char = '_';

/// Vowels counted by the cluster bonus.
const VOWELS: [char; 5] = ['A', 'E', 'I', 'O', 'U'];

/// Rounds with at most this many errors earn the error bonus.
const ERROR_BONUS_THRESHOLD: u32 = 3;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum RoundError {
    #[error("word source returned an empty word")]
    InvalidWord,

    #[error("max_errors must be greater than 0")]
    InvalidMaxErrors,

    #[error("invalid guess {0:?}: expected a single letter not played before")]
    InvalidGuess(String),

    #[error("the round is already over")]
    RoundAlreadyOver,

    #[error("inconsistent round state: {0}")]
    InvalidState(String),

    #[error(transparent)]
    WordSource(#[from] WordSourceError),
}

// ---------------------------------------------------------------------------
// RoundStatus
// ---------------------------------------------------------------------------

/// Where a round stands. Derived from the round state, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundStatus {
    InProgress,
    Won,
    Lost,
}

// ---------------------------------------------------------------------------
// GameRound
// ---------------------------------------------------------------------------

/// All state for one play-through, from word selection to win or loss.
///
/// Deserialization replays the recorded guesses, so a stored round that could
/// not have been reached by play is rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RoundRecord")]
pub struct GameRound {
    /// Uppercase secret word, fixed at creation.
    secret_word: String,
    /// Secret word with undiscovered positions replaced by `PLACEHOLDER`.
    revealed_pattern: String,
    /// Every letter played so far, uppercase, in play order.
    guessed_letters: Vec<char>,
    /// Number of guesses that matched no position.
    error_count: u32,
    /// The round is lost once `error_count` reaches this value.
    max_errors: u32,
}

impl GameRound {
    /// Start a round with a word fetched from `source`.
    ///
    /// The word is trimmed and uppercased; every character (letter or not) is
    /// masked in the initial pattern.
    pub fn create(source: &dyn WordSource, max_errors: u32) -> Result<Self, RoundError> {
        let word = source.fetch_random_word()?;
        Self::with_word(&word, max_errors)
    }

    /// Start a round with a known word. `create` goes through here after the
    /// fetch.
    pub fn with_word(word: &str, max_errors: u32) -> Result<Self, RoundError> {
        if max_errors == 0 {
            return Err(RoundError::InvalidMaxErrors);
        }
        let secret_word = word.trim().to_uppercase();
        if secret_word.is_empty() {
            return Err(RoundError::InvalidWord);
        }
        let revealed_pattern = secret_word.chars().map(|_| PLACEHOLDER).collect();

        Ok(GameRound {
            secret_word,
            revealed_pattern,
            guessed_letters: Vec::new(),
            error_count: 0,
            max_errors,
        })
    }

    pub fn secret_word(&self) -> &str {
        &self.secret_word
    }

    pub fn revealed_pattern(&self) -> &str {
        &self.revealed_pattern
    }

    pub fn guessed_letters(&self) -> &[char] {
        &self.guessed_letters
    }

    pub fn error_count(&self) -> u32 {
        self.error_count
    }

    pub fn max_errors(&self) -> u32 {
        self.max_errors
    }

    /// Misses left before the round is lost.
    pub fn remaining_errors(&self) -> u32 {
        self.max_errors.saturating_sub(self.error_count)
    }

    /// Whether `letter` can be played: exactly one ASCII letter, case-insensitive,
    /// not played before in this round.
    pub fn is_letter_valid(&self, letter: &str) -> bool {
        match single_ascii_letter(letter) {
            Some(c) => !self.guessed_letters.contains(&c),
            None => false,
        }
    }

    /// Play a letter and return the resulting pattern.
    ///
    /// A letter matching no position costs one error and leaves the pattern
    /// unchanged; otherwise every matching position is revealed. The letter
    /// is recorded either way.
    pub fn apply_guess(&mut self, letter: &str) -> Result<&str, RoundError> {
        if self.is_over() {
            return Err(RoundError::RoundAlreadyOver);
        }
        if !self.is_letter_valid(letter) {
            return Err(RoundError::InvalidGuess(letter.to_string()));
        }
        let guess = letter.to_ascii_uppercase();
        let Some(guess) = guess.chars().next() else {
            return Err(RoundError::InvalidGuess(letter.to_string()));
        };

        let candidate: String = self
            .secret_word
            .chars()
            .zip(self.revealed_pattern.chars())
            .map(|(secret, shown)| if secret == guess { secret } else { shown })
            .collect();

        if candidate == self.revealed_pattern {
            self.error_count += 1;
        } else {
            self.revealed_pattern = candidate;
        }
        self.guessed_letters.push(guess);

        Ok(&self.revealed_pattern)
    }

    /// True once no placeholder is left in the pattern.
    pub fn is_word_revealed(&self) -> bool {
        !self.revealed_pattern.contains(PLACEHOLDER)
    }

    /// True once the word is revealed or the error limit is reached.
    pub fn is_over(&self) -> bool {
        self.is_word_revealed() || self.error_count == self.max_errors
    }

    pub fn status(&self) -> RoundStatus {
        if self.is_word_revealed() {
            RoundStatus::Won
        } else if self.error_count == self.max_errors {
            RoundStatus::Lost
        } else {
            RoundStatus::InProgress
        }
    }

    /// Score of the round. Unrevealed rounds score 0.
    ///
    /// A revealed word scores 1, plus 1 per vowel cluster, plus 1 if the word
    /// has 3 to 5 letters, plus 1 if it took at most 3 errors.
    pub fn compute_score(&self) -> u32 {
        if !self.is_word_revealed() {
            return 0;
        }
        let len = self.secret_word.chars().count();
        let length_bonus = u32::from((3..=5).contains(&len));
        let error_bonus = u32::from(self.error_count <= ERROR_BONUS_THRESHOLD);

        1 + count_vowel_clusters(&self.secret_word) + length_bonus + error_bonus
    }
}

/// Unchecked field-for-field form of a stored round.
#[derive(Deserialize)]
struct RoundRecord {
    secret_word: String,
    revealed_pattern: String,
    guessed_letters: Vec<char>,
    error_count: u32,
    max_errors: u32,
}

impl TryFrom<RoundRecord> for GameRound {
    type Error = RoundError;

    fn try_from(record: RoundRecord) -> Result<Self, Self::Error> {
        let normalized = record.secret_word.trim().to_uppercase();
        if normalized.is_empty() || normalized != record.secret_word {
            return Err(RoundError::InvalidWord);
        }
        let mut round = GameRound::with_word(&record.secret_word, record.max_errors)?;
        for letter in &record.guessed_letters {
            round
                .apply_guess(&letter.to_string())
                .map_err(|e| RoundError::InvalidState(format!("guess {letter:?}: {e}")))?;
        }

        if round.guessed_letters != record.guessed_letters {
            return Err(RoundError::InvalidState(
                "guessed letters must be uppercase".into(),
            ));
        }
        if round.revealed_pattern != record.revealed_pattern {
            return Err(RoundError::InvalidState(format!(
                "pattern {:?} does not follow from the guesses (expected {:?})",
                record.revealed_pattern, round.revealed_pattern
            )));
        }
        if round.error_count != record.error_count {
            return Err(RoundError::InvalidState(format!(
                "error count {} does not follow from the guesses (expected {})",
                record.error_count, round.error_count
            )));
        }
        Ok(round)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Uppercase form of `input` if it is exactly one ASCII letter.
fn single_ascii_letter(input: &str) -> Option<char> {
    let mut chars = input.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => Some(c.to_ascii_uppercase()),
        _ => None,
    }
}

/// Count maximal runs of two or more consecutive vowels in an uppercase word.
pub fn count_vowel_clusters(word: &str) -> u32 {
    let mut clusters = 0;
    let mut run = 0;
    for c in word.chars() {
        if VOWELS.contains(&c) {
            run += 1;
            if run == 2 {
                clusters += 1;
            }
        } else {
            run = 0;
        }
    }
    clusters
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
