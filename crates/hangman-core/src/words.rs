// Word sources: where a round gets its secret word.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use thiserror::Error;
use tracing::{debug, info, warn};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum WordSourceError {
    #[error("failed to read word list {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("word list {path} contains no playable words")]
    Empty { path: PathBuf },

    #[error("word source unavailable: {0}")]
    Unavailable(String),
}

// ---------------------------------------------------------------------------
// WordSource trait
// ---------------------------------------------------------------------------

/// Supplies the secret word for a new round.
pub trait WordSource: Send + Sync {
    fn fetch_random_word(&self) -> Result<String, WordSourceError>;
}

// ---------------------------------------------------------------------------
// FileWordSource
// ---------------------------------------------------------------------------

/// Word list loaded from a newline-separated text file.
///
/// Blank lines and `#` comments are ignored. Entries with characters outside
/// `A-Z`/`a-z` are skipped because a guess can never reveal them.
#[derive(Debug)]
pub struct FileWordSource {
    words: Vec<String>,
    rng: Mutex<StdRng>,
}

impl FileWordSource {
    /// Load the list at `path`, picking words with OS entropy.
    pub fn load(path: &Path) -> Result<Self, WordSourceError> {
        let words = read_word_list(path)?;
        Ok(Self::from_words(words, StdRng::from_os_rng()))
    }

    /// Load the list at `path` with a fixed seed, for reproducible picks.
    pub fn load_with_seed(path: &Path, seed: u64) -> Result<Self, WordSourceError> {
        let words = read_word_list(path)?;
        Ok(Self::from_words(words, StdRng::seed_from_u64(seed)))
    }

    #[cfg(test)]
    fn from_lines(text: &str, seed: u64) -> Result<Self, WordSourceError> {
        let words = parse_word_list(text);
        if words.is_empty() {
            return Err(WordSourceError::Empty {
                path: PathBuf::from("<memory>"),
            });
        }
        Ok(Self::from_words(words, StdRng::seed_from_u64(seed)))
    }

    fn from_words(words: Vec<String>, rng: StdRng) -> Self {
        FileWordSource {
            words,
            rng: Mutex::new(rng),
        }
    }

    /// Number of playable words in the list.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    #[cfg(test)]
    fn words(&self) -> &[String] {
        &self.words
    }
}

impl WordSource for FileWordSource {
    fn fetch_random_word(&self) -> Result<String, WordSourceError> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|e| WordSourceError::Unavailable(format!("word RNG lock poisoned: {e}")))?;
        let word = self
            .words
            .choose(&mut *rng)
            .cloned()
            .ok_or_else(|| WordSourceError::Unavailable("word list is empty".into()))?;
        debug!("Picked a word with {} characters", word.chars().count());
        Ok(word)
    }
}

// ---------------------------------------------------------------------------
// FixedWordSource
// ---------------------------------------------------------------------------

/// Always returns the same word.
#[derive(Debug, Clone)]
pub struct FixedWordSource {
    word: String,
}

impl FixedWordSource {
    pub fn new(word: impl Into<String>) -> Self {
        FixedWordSource { word: word.into() }
    }
}

impl WordSource for FixedWordSource {
    fn fetch_random_word(&self) -> Result<String, WordSourceError> {
        Ok(self.word.clone())
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

fn read_word_list(path: &Path) -> Result<Vec<String>, WordSourceError> {
    let text = std::fs::read_to_string(path).map_err(|e| WordSourceError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let words = parse_word_list(&text);
    if words.is_empty() {
        return Err(WordSourceError::Empty {
            path: path.to_path_buf(),
        });
    }
    info!("Loaded {} words from {}", words.len(), path.display());
    Ok(words)
}

fn parse_word_list(text: &str) -> Vec<String> {
    let mut words = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        let entry = line.trim();
        if entry.is_empty() || entry.starts_with('#') {
            continue;
        }
        if !entry.chars().all(|c| c.is_ascii_alphabetic()) {
            warn!(
                "Skipping word list entry on line {}: only A-Z letters are playable",
                line_no + 1
            );
            continue;
        }
        words.push(entry.to_string());
    }
    words
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn parse_skips_blanks_comments_and_unplayable_entries() {
        let words = parse_word_list("# animals\ngato\n\n  perro  \nniño\nbien-estar\nCASA\n");
        assert_eq!(words, vec!["gato", "perro", "CASA"]);
    }

    #[test]
    fn from_lines_rejects_empty_list() {
        let err = FileWordSource::from_lines("# nothing here\n\n", 1).unwrap_err();
        assert!(matches!(err, WordSourceError::Empty { .. }));
    }

    #[test]
    fn fetch_returns_a_listed_word() {
        let source = FileWordSource::from_lines("gato\nperro\nraton\n", 7).unwrap();
        assert_eq!(source.len(), 3);
        for _ in 0..20 {
            let word = source.fetch_random_word().unwrap();
            assert!(source.words().contains(&word));
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let a = FileWordSource::from_lines("uno\ndos\ntres\ncuatro\ncinco\n", 42).unwrap();
        let b = FileWordSource::from_lines("uno\ndos\ntres\ncuatro\ncinco\n", 42).unwrap();
        let seq_a: Vec<String> = (0..10).map(|_| a.fetch_random_word().unwrap()).collect();
        let seq_b: Vec<String> = (0..10).map(|_| b.fetch_random_word().unwrap()).collect();
        assert_eq!(seq_a, seq_b);
    }

    #[test]
    fn load_reads_file() {
        let tmp = std::env::temp_dir().join("hangman_words_test_load");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();
        let path = tmp.join("words.txt");
        fs::write(&path, "sol\nluna\n").unwrap();

        let source = FileWordSource::load_with_seed(&path, 3).unwrap();
        assert_eq!(source.words(), &["sol".to_string(), "luna".to_string()]);

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("hangman_words_test_missing/words.txt");
        let err = FileWordSource::load(&path).unwrap_err();
        match err {
            WordSourceError::Io { path: p, .. } => assert!(p.ends_with("words.txt")),
            other => panic!("expected Io, got: {other}"),
        }
    }

    #[test]
    fn fixed_source_repeats_its_word() {
        let source = FixedWordSource::new("gato");
        assert_eq!(source.fetch_random_word().unwrap(), "gato");
        assert_eq!(source.fetch_random_word().unwrap(), "gato");
    }
}
