// Player session: the active round plus the rounds finished so far.
//
// Runs the per-guess flow: reject invalid letters without touching the round,
// apply valid ones, and archive the round once it is over.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::round::{GameRound, RoundError, RoundStatus};
use crate::words::WordSource;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no round in progress")]
    NoActiveRound,

    #[error(transparent)]
    Round(#[from] RoundError),
}

/// A round that ended, as kept for the score listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinishedRound {
    pub player: String,
    pub secret_word: String,
    pub error_count: u32,
    pub max_errors: u32,
    pub guessed_letters: Vec<char>,
    pub score: u32,
    pub won: bool,
    pub finished_at: DateTime<Utc>,
}

impl FinishedRound {
    fn from_round(player: &str, round: &GameRound) -> Self {
        FinishedRound {
            player: player.to_string(),
            secret_word: round.secret_word().to_string(),
            error_count: round.error_count(),
            max_errors: round.max_errors(),
            guessed_letters: round.guessed_letters().to_vec(),
            score: round.compute_score(),
            won: round.status() == RoundStatus::Won,
            finished_at: Utc::now(),
        }
    }

    pub fn score_entry(&self) -> ScoreEntry {
        ScoreEntry {
            secret_word: self.secret_word.clone(),
            error_count: self.error_count,
            score: self.score,
        }
    }
}

/// One row of the score listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub secret_word: String,
    pub error_count: u32,
    pub score: u32,
}

/// What happened to a submitted letter.
#[derive(Debug, Clone, PartialEq)]
pub enum GuessFeedback {
    /// Not a single letter, or already played. The round is unchanged.
    Rejected,
    /// The letter revealed at least one position.
    Hit { pattern: String },
    /// The letter matched nothing and cost an error.
    Miss { pattern: String, remaining_errors: u32 },
    /// The guess ended the round, which is now archived.
    Finished(Box<FinishedRound>),
}

/// State owned by one player between requests.
#[derive(Debug, Clone)]
pub struct PlayerSession {
    player: String,
    active: Option<GameRound>,
    finished: Vec<FinishedRound>,
}

impl PlayerSession {
    pub fn new(player: impl Into<String>) -> Self {
        PlayerSession {
            player: player.into(),
            active: None,
            finished: Vec::new(),
        }
    }

    pub fn player(&self) -> &str {
        &self.player
    }

    /// Replace the active round with a new one. An unfinished round is
    /// discarded without being archived.
    pub fn start_round(
        &mut self,
        source: &dyn WordSource,
        max_errors: u32,
    ) -> Result<&GameRound, RoundError> {
        let round = GameRound::create(source, max_errors)?;
        if let Some(previous) = &self.active {
            if !previous.is_over() {
                debug!("Abandoning unfinished round for {}", self.player);
            }
        }
        info!(
            "New round for {}: {} letters, {} errors allowed",
            self.player,
            round.secret_word().chars().count(),
            max_errors
        );
        Ok(&*self.active.insert(round))
    }

    /// Play a letter in the active round.
    pub fn submit_guess(&mut self, letter: &str) -> Result<GuessFeedback, SessionError> {
        let round = self.active.as_mut().ok_or(SessionError::NoActiveRound)?;
        if round.is_over() {
            return Err(RoundError::RoundAlreadyOver.into());
        }

        let letter = letter.trim();
        if !round.is_letter_valid(letter) {
            debug!("Rejected guess {:?}", letter);
            return Ok(GuessFeedback::Rejected);
        }

        let errors_before = round.error_count();
        let pattern = round.apply_guess(letter)?.to_string();

        if round.is_over() {
            let record = FinishedRound::from_round(&self.player, round);
            info!(
                "Round finished for {}: {:?}, {} errors, score {}",
                self.player,
                round.status(),
                record.error_count,
                record.score
            );
            self.finished.push(record.clone());
            return Ok(GuessFeedback::Finished(Box::new(record)));
        }

        if round.error_count() > errors_before {
            Ok(GuessFeedback::Miss {
                pattern,
                remaining_errors: round.remaining_errors(),
            })
        } else {
            Ok(GuessFeedback::Hit { pattern })
        }
    }

    pub fn active_round(&self) -> Option<&GameRound> {
        self.active.as_ref()
    }

    pub fn finished_rounds(&self) -> &[FinishedRound] {
        &self.finished
    }

    /// Score listing for the rounds finished in this session, in play order.
    pub fn scoreboard(&self) -> Vec<ScoreEntry> {
        self.finished.iter().map(FinishedRound::score_entry).collect()
    }

    pub fn total_score(&self) -> u32 {
        self.finished.iter().map(|r| r.score).sum()
    }

    /// Forget the finished rounds. The active round is kept.
    pub fn clear_finished(&mut self) -> usize {
        let cleared = self.finished.len();
        self.finished.clear();
        cleared
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::words::FixedWordSource;

    fn session_with(word: &str, max_errors: u32) -> PlayerSession {
        let mut session = PlayerSession::new("ana");
        session
            .start_round(&FixedWordSource::new(word), max_errors)
            .unwrap();
        session
    }

    #[test]
    fn guess_without_round_fails() {
        let mut session = PlayerSession::new("ana");
        let err = session.submit_guess("a").unwrap_err();
        assert!(matches!(err, SessionError::NoActiveRound));
    }

    #[test]
    fn hit_and_miss_feedback() {
        let mut session = session_with("gato", 5);
        assert_eq!(
            session.submit_guess("a").unwrap(),
            GuessFeedback::Hit {
                pattern: "_A__".into()
            }
        );
        assert_eq!(
            session.submit_guess("z").unwrap(),
            GuessFeedback::Miss {
                pattern: "_A__".into(),
                remaining_errors: 4
            }
        );
    }

    #[test]
    fn invalid_letters_are_rejected_without_changes() {
        let mut session = session_with("gato", 5);
        session.submit_guess("g").unwrap();

        assert_eq!(session.submit_guess("G").unwrap(), GuessFeedback::Rejected);
        assert_eq!(session.submit_guess("12").unwrap(), GuessFeedback::Rejected);
        assert_eq!(session.submit_guess("").unwrap(), GuessFeedback::Rejected);

        let round = session.active_round().unwrap();
        assert_eq!(round.guessed_letters(), &['G']);
        assert_eq!(round.error_count(), 0);
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let mut session = session_with("gato", 5);
        assert!(matches!(
            session.submit_guess(" t ").unwrap(),
            GuessFeedback::Hit { .. }
        ));
    }

    #[test]
    fn winning_guess_archives_the_round() {
        let mut session = session_with("gato", 5);
        for letter in ["a", "z", "g", "t"] {
            session.submit_guess(letter).unwrap();
        }
        let feedback = session.submit_guess("o").unwrap();
        let GuessFeedback::Finished(record) = feedback else {
            panic!("expected Finished, got {feedback:?}");
        };
        assert!(record.won);
        assert_eq!(record.secret_word, "GATO");
        assert_eq!(record.error_count, 1);
        assert_eq!(record.score, 3);
        assert_eq!(record.player, "ana");

        assert_eq!(
            session.scoreboard(),
            vec![ScoreEntry {
                secret_word: "GATO".into(),
                error_count: 1,
                score: 3
            }]
        );
    }

    #[test]
    fn guess_after_finish_is_an_error() {
        let mut session = session_with("si", 1);
        assert!(matches!(
            session.submit_guess("x").unwrap(),
            GuessFeedback::Finished(_)
        ));
        let err = session.submit_guess("s").unwrap_err();
        assert!(matches!(
            err,
            SessionError::Round(RoundError::RoundAlreadyOver)
        ));
        assert_eq!(session.finished_rounds().len(), 1);
    }

    #[test]
    fn abandoned_round_is_not_archived() {
        let mut session = session_with("gato", 5);
        session.submit_guess("a").unwrap();
        session
            .start_round(&FixedWordSource::new("sol"), 5)
            .unwrap();
        assert!(session.finished_rounds().is_empty());
        assert_eq!(session.active_round().unwrap().secret_word(), "SOL");
    }

    #[test]
    fn failed_start_keeps_previous_round() {
        let mut session = session_with("gato", 5);
        let err = session
            .start_round(&FixedWordSource::new(""), 5)
            .unwrap_err();
        assert!(matches!(err, RoundError::InvalidWord));
        assert_eq!(session.active_round().unwrap().secret_word(), "GATO");
    }

    #[test]
    fn total_score_sums_finished_rounds() {
        let mut session = session_with("sol", 5);
        for letter in ["s", "o", "l"] {
            session.submit_guess(letter).unwrap();
        }
        session.start_round(&FixedWordSource::new("si"), 1).unwrap();
        session.submit_guess("x").unwrap();

        // SOL: base + length + error bonus; SI lost.
        assert_eq!(session.total_score(), 3);
        assert_eq!(session.scoreboard().len(), 2);
        assert_eq!(session.scoreboard()[1].score, 0);
    }

    #[test]
    fn clear_finished_keeps_active_round() {
        let mut session = session_with("si", 1);
        session.submit_guess("x").unwrap();
        session
            .start_round(&FixedWordSource::new("gato"), 5)
            .unwrap();
        session.submit_guess("a").unwrap();

        assert_eq!(session.clear_finished(), 1);
        assert!(session.scoreboard().is_empty());
        assert_eq!(session.total_score(), 0);
        assert_eq!(session.active_round().unwrap().revealed_pattern(), "_A__");
    }
}
