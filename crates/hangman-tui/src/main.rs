// Hangman entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config
// 3. Open the score history database
// 4. Load the word list
// 5. Create mpsc channels
// 6. Spawn app logic task
// 7. Run the TUI until the player quits
// 8. Cleanup on exit

use hangman_core::config;
use hangman_core::db::Database;
use hangman_core::FileWordSource;
use hangman_tui::app;
use hangman_tui::tui;

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;
    info!("Hangman starting up");

    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: player={}, max_errors={}",
        config.player.name, config.game.max_errors
    );

    let db_path = config::resolve_db_path(&config).context("failed to resolve database path")?;
    let db_path = db_path.to_string_lossy().into_owned();
    let db = Database::open(&db_path).context("failed to open database")?;
    let recorded = db
        .round_count(&config.player.name)
        .context("failed to read score history")?;
    info!(
        "Database opened at {} ({} rounds on record for {})",
        db_path, recorded, config.player.name
    );

    let words = match config.words_seed {
        Some(seed) => FileWordSource::load_with_seed(&config.words_path, seed),
        None => FileWordSource::load(&config.words_path),
    }
    .with_context(|| format!("failed to load word list {}", config.words_path.display()))?;
    info!(
        "Loaded {} words from {}",
        words.len(),
        config.words_path.display()
    );

    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (ui_tx, ui_rx) = mpsc::channel(64);

    let app_state = app::AppState::new(config, Box::new(words), db);

    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(cmd_rx, ui_tx, app_state).await {
            error!("Application loop error: {:#}", e);
        }
    });

    // Returns once the player quits or the app loop goes away.
    if let Err(e) = tui::run(ui_rx, cmd_tx).await {
        error!("TUI error: {:#}", e);
    }

    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), async {
        let _ = app_handle.await;
    })
    .await;

    info!("Hangman shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file (not the terminal, which is used by the TUI).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("hangman.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("hangman_tui=info,hangman_core=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
