// Library root: the game round engine plus the word source, session,
// configuration and score history built around it.

pub mod config;
pub mod db;
pub mod round;
pub mod session;
pub mod words;

pub use round::{GameRound, RoundError, RoundStatus, PLACEHOLDER};
pub use session::{FinishedRound, GuessFeedback, PlayerSession, ScoreEntry, SessionError};
pub use words::{FileWordSource, FixedWordSource, WordSource, WordSourceError};
