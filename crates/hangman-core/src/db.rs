// SQLite persistence layer for the score history.

use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use crate::session::{FinishedRound, ScoreEntry};

/// SQLite-backed store of finished rounds.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) a SQLite database at `path` and ensure all tables
    /// exist. Pass `":memory:"` for an ephemeral in-memory database (useful
    /// for tests).
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {path}"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )
        .context("failed to set database pragmas")?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS finished_rounds (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                player          TEXT NOT NULL,
                secret_word     TEXT NOT NULL,
                error_count     INTEGER NOT NULL,
                max_errors      INTEGER NOT NULL,
                guessed_letters TEXT NOT NULL,
                score           INTEGER NOT NULL,
                won             INTEGER NOT NULL,
                finished_at     TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_finished_rounds_player
                ON finished_rounds(player);
            ",
        )
        .context("failed to create database schema")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Acquire the database connection.
    ///
    /// Panics if the mutex is poisoned (another thread panicked while
    /// holding the lock).
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("database mutex poisoned")
    }

    /// Append a finished round and return its row id.
    pub fn record_round(&self, round: &FinishedRound) -> Result<i64> {
        let conn = self.conn();
        let letters: Vec<String> = round.guessed_letters.iter().map(char::to_string).collect();
        let letters_json =
            serde_json::to_string(&letters).context("failed to serialize guessed letters")?;
        conn.execute(
            "INSERT INTO finished_rounds
                (player, secret_word, error_count, max_errors, guessed_letters, score, won, finished_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                round.player,
                round.secret_word,
                round.error_count,
                round.max_errors,
                letters_json,
                round.score,
                round.won,
                round.finished_at.to_rfc3339(),
            ],
        )
        .context("failed to record finished round")?;
        Ok(conn.last_insert_rowid())
    }

    /// Load every finished round for `player`, oldest first.
    pub fn load_rounds(&self, player: &str) -> Result<Vec<FinishedRound>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(
                "SELECT player, secret_word, error_count, max_errors, guessed_letters, score, won, finished_at
                 FROM finished_rounds WHERE player = ?1 ORDER BY id",
            )
            .context("failed to prepare load_rounds query")?;

        let rows = stmt
            .query_map(params![player], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, u32>(2)?,
                    row.get::<_, u32>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, u32>(5)?,
                    row.get::<_, bool>(6)?,
                    row.get::<_, String>(7)?,
                ))
            })
            .context("failed to query finished rounds")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to map finished round rows")?;

        rows.into_iter()
            .map(
                |(player, secret_word, error_count, max_errors, letters_json, score, won, finished_at)| {
                    let letters: Vec<String> = serde_json::from_str(&letters_json)
                        .context("failed to deserialize guessed letters")?;
                    let finished_at = DateTime::parse_from_rfc3339(&finished_at)
                        .with_context(|| format!("invalid finished_at timestamp {finished_at:?}"))?
                        .with_timezone(&Utc);
                    Ok(FinishedRound {
                        player,
                        secret_word,
                        error_count,
                        max_errors,
                        guessed_letters: letters.iter().filter_map(|s| s.chars().next()).collect(),
                        score,
                        won,
                        finished_at,
                    })
                },
            )
            .collect()
    }

    /// Score listing for `player`, oldest first.
    pub fn load_scoreboard(&self, player: &str) -> Result<Vec<ScoreEntry>> {
        Ok(self
            .load_rounds(player)?
            .iter()
            .map(FinishedRound::score_entry)
            .collect())
    }

    /// Number of finished rounds recorded for `player`.
    pub fn round_count(&self, player: &str) -> Result<usize> {
        let conn = self.conn();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM finished_rounds WHERE player = ?1",
                params![player],
                |row| row.get(0),
            )
            .context("failed to count finished rounds")?;
        Ok(count as usize)
    }

    /// Highest score recorded for `player`, or `None` with no history.
    pub fn best_score(&self, player: &str) -> Result<Option<u32>> {
        let conn = self.conn();
        let best: Option<u32> = conn
            .query_row(
                "SELECT MAX(score) FROM finished_rounds WHERE player = ?1",
                params![player],
                |row| row.get(0),
            )
            .context("failed to query best score")?;
        Ok(best)
    }

    /// Delete the history of `player`. Other players are untouched.
    pub fn clear_history(&self, player: &str) -> Result<usize> {
        let mut conn = self.conn();
        let tx = conn.transaction().context("failed to begin transaction")?;
        let deleted = tx
            .execute(
                "DELETE FROM finished_rounds WHERE player = ?1",
                params![player],
            )
            .context("failed to delete finished rounds")?;
        tx.commit().context("failed to commit clear_history")?;
        Ok(deleted)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn test_db() -> Database {
        Database::open(":memory:").expect("in-memory database should open")
    }

    fn sample_round(player: &str, word: &str, score: u32) -> FinishedRound {
        FinishedRound {
            player: player.to_string(),
            secret_word: word.to_string(),
            error_count: 1,
            max_errors: 5,
            guessed_letters: vec!['A', 'Z', 'G', 'T', 'O'],
            score,
            won: score > 0,
            finished_at: Utc.with_ymd_and_hms(2026, 3, 1, 12, 30, 0).unwrap(),
        }
    }

    #[test]
    fn open_creates_tables() {
        let db = test_db();
        let conn = db.conn();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'finished_rounds'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn record_and_load_round_trip() {
        let db = test_db();
        let round = sample_round("ana", "GATO", 3);
        db.record_round(&round).unwrap();

        let loaded = db.load_rounds("ana").unwrap();
        assert_eq!(loaded, vec![round]);
    }

    #[test]
    fn load_rounds_returns_empty_vec_without_history() {
        let db = test_db();
        assert!(db.load_rounds("nobody").unwrap().is_empty());
    }

    #[test]
    fn rounds_load_in_finish_order() {
        let db = test_db();
        db.record_round(&sample_round("ana", "GATO", 3)).unwrap();
        db.record_round(&sample_round("ana", "SI", 0)).unwrap();
        db.record_round(&sample_round("ana", "SOL", 3)).unwrap();

        let words: Vec<String> = db
            .load_scoreboard("ana")
            .unwrap()
            .into_iter()
            .map(|e| e.secret_word)
            .collect();
        assert_eq!(words, vec!["GATO", "SI", "SOL"]);
    }

    #[test]
    fn history_is_scoped_to_player() {
        let db = test_db();
        db.record_round(&sample_round("ana", "GATO", 3)).unwrap();
        db.record_round(&sample_round("luis", "SOL", 3)).unwrap();

        assert_eq!(db.round_count("ana").unwrap(), 1);
        assert_eq!(db.round_count("luis").unwrap(), 1);
        assert_eq!(db.load_rounds("luis").unwrap()[0].secret_word, "SOL");
    }

    #[test]
    fn best_score_none_then_max() {
        let db = test_db();
        assert_eq!(db.best_score("ana").unwrap(), None);

        db.record_round(&sample_round("ana", "GATO", 3)).unwrap();
        db.record_round(&sample_round("ana", "AEROPUERTO", 4)).unwrap();
        db.record_round(&sample_round("ana", "SI", 0)).unwrap();
        assert_eq!(db.best_score("ana").unwrap(), Some(4));
    }

    #[test]
    fn clear_history_only_touches_one_player() {
        let db = test_db();
        db.record_round(&sample_round("ana", "GATO", 3)).unwrap();
        db.record_round(&sample_round("ana", "SI", 0)).unwrap();
        db.record_round(&sample_round("luis", "SOL", 3)).unwrap();

        assert_eq!(db.clear_history("ana").unwrap(), 2);
        assert_eq!(db.round_count("ana").unwrap(), 0);
        assert_eq!(db.round_count("luis").unwrap(), 1);
    }

    #[test]
    fn guessed_letters_are_stored_as_json() {
        let db = test_db();
        db.record_round(&sample_round("ana", "GATO", 3)).unwrap();

        let conn = db.conn();
        let stored: String = conn
            .query_row("SELECT guessed_letters FROM finished_rounds", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(stored, r#"["A","Z","G","T","O"]"#);
    }
}
