// Configuration loading and parsing (hangman.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Name of the config file inside `config/` and `defaults/`.
pub const CONFIG_FILE: &str = "hangman.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub game: GameConfig,
    pub player: PlayerConfig,
    /// Word list path, resolved against the base directory.
    pub words_path: PathBuf,
    /// Fixed seed for word picks; `None` draws from OS entropy.
    pub words_seed: Option<u64>,
    /// History database path. `None` means the platform data directory.
    pub db_path: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// hangman.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire hangman.toml file.
#[derive(Debug, Clone, Deserialize)]
struct HangmanFile {
    game: GameConfig,
    player: PlayerConfig,
    words: WordsSection,
    #[serde(default)]
    database: DatabaseSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GameConfig {
    /// Misses allowed before a round is lost.
    pub max_errors: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerConfig {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
struct WordsSection {
    path: String,
    #[serde(default)]
    seed: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct DatabaseSection {
    #[serde(default)]
    path: String,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/hangman.toml` relative to the
/// given `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy defaults.
/// Prefer `load_config()` which handles default initialization automatically.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let file: HangmanFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    validate(&file)?;

    let words_path = base_dir.join(file.words.path.trim());
    let db_path = match file.database.path.trim() {
        "" => None,
        ":memory:" => Some(PathBuf::from(":memory:")),
        p => Some(base_dir.join(p)),
    };

    Ok(Config {
        game: file.game,
        player: PlayerConfig {
            name: file.player.name.trim().to_string(),
        },
        words_path,
        words_seed: file.words.seed,
        db_path,
    })
}

/// Copy each file of `defaults/` that is missing from `config/`, so a fresh
/// checkout starts with a playable config and word list. `.example` files
/// stay behind. Returns the paths written, in name order.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.is_dir() {
        if config_dir.is_dir() {
            return Ok(Vec::new());
        }
        return Err(ConfigError::DefaultsCopyError {
            message: format!(
                "{} has no defaults/ to copy from and no config/ of its own",
                base_dir.display()
            ),
        });
    }

    let io_error = |path: &Path, e: std::io::Error| ConfigError::DefaultsCopyError {
        message: format!("{}: {e}", path.display()),
    };

    std::fs::create_dir_all(&config_dir).map_err(|e| io_error(&config_dir, e))?;

    let mut sources: Vec<PathBuf> = std::fs::read_dir(&defaults_dir)
        .map_err(|e| io_error(&defaults_dir, e))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .filter(|path| !matches!(path.extension(), Some(ext) if ext == "example"))
        .collect();
    sources.sort();

    let mut copied = Vec::new();
    for source in sources {
        let Some(name) = source.file_name() else {
            continue;
        };
        let target = config_dir.join(name);
        if target.exists() {
            continue;
        }
        std::fs::copy(&source, &target).map_err(|e| io_error(&target, e))?;
        info!("Created {} from defaults", target.display());
        copied.push(target);
    }

    Ok(copied)
}

/// Convenience wrapper: loads config relative to the current working directory.
/// Ensures default config files are copied before loading.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

/// Where the history database lives: the configured path, or `history.db`
/// in the platform data directory.
pub fn resolve_db_path(config: &Config) -> Result<PathBuf, ConfigError> {
    if let Some(path) = &config.db_path {
        return Ok(path.clone());
    }
    let dirs = directories::ProjectDirs::from("", "", "hangman").ok_or_else(|| {
        ConfigError::ValidationError {
            field: "database.path".into(),
            message: "empty and no platform data directory is available".into(),
        }
    })?;
    let data_dir = dirs.data_dir();
    std::fs::create_dir_all(data_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create {}: {e}", data_dir.display()),
    })?;
    Ok(data_dir.join("history.db"))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(file: &HangmanFile) -> Result<(), ConfigError> {
    if file.game.max_errors == 0 {
        return Err(ConfigError::ValidationError {
            field: "game.max_errors".into(),
            message: "must be greater than 0".into(),
        });
    }

    if file.player.name.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "player.name".into(),
            message: "must not be empty".into(),
        });
    }

    if file.words.path.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "words.path".into(),
            message: "must not be empty".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
