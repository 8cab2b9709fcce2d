// Application state and orchestration logic.
//
// The event loop that turns user commands from the TUI into session
// operations, persists finished rounds, and pushes UI updates back to the
// TUI render loop.

use anyhow::Context;
use hangman_core::config::Config;
use hangman_core::db::Database;
use hangman_core::{
    FinishedRound, GuessFeedback, PlayerSession, RoundError, ScoreEntry, SessionError, WordSource,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::protocol::{GuessResult, RoundSnapshot, ScoreboardView, UiUpdate, UserCommand};

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// The complete application state.
pub struct AppState {
    pub config: Config,
    pub session: PlayerSession,
    pub word_source: Box<dyn WordSource>,
    pub db: Database,
    /// Finished rounds the history database refused, oldest first.
    /// Retried on the next write.
    unsaved: Vec<FinishedRound>,
}

impl AppState {
    pub fn new(config: Config, word_source: Box<dyn WordSource>, db: Database) -> Self {
        let session = PlayerSession::new(config.player.name.clone());
        AppState {
            config,
            session,
            word_source,
            db,
            unsaved: Vec::new(),
        }
    }

    /// Start a new round with the configured error limit.
    pub fn start_round(&mut self) -> Result<RoundSnapshot, RoundError> {
        let round = self
            .session
            .start_round(self.word_source.as_ref(), self.config.game.max_errors)?;
        Ok(RoundSnapshot::from_round(round))
    }

    /// Play `letter` in the active round. Finished rounds are written to the
    /// history database; a failed write is logged and does not fail the guess.
    pub fn play_letter(&mut self, letter: char) -> Result<GuessResult, SessionError> {
        let letter_upper = letter.to_ascii_uppercase();
        let feedback = self.session.submit_guess(&letter.to_string())?;
        let result = match feedback {
            GuessFeedback::Rejected => GuessResult::Rejected(letter_upper),
            GuessFeedback::Hit { .. } => GuessResult::Hit(letter_upper),
            GuessFeedback::Miss { .. } => GuessResult::Miss(letter_upper),
            GuessFeedback::Finished(record) => {
                let won = record.won;
                self.persist(*record);
                if won {
                    GuessResult::Hit(letter_upper)
                } else {
                    GuessResult::Miss(letter_upper)
                }
            }
        };
        Ok(result)
    }

    /// Write `record` to the history, after any rounds still waiting from
    /// earlier failed writes. Rounds that fail stay queued in order.
    fn persist(&mut self, record: FinishedRound) {
        self.unsaved.push(record);
        let pending = std::mem::take(&mut self.unsaved);
        for round in pending {
            if !self.unsaved.is_empty() {
                self.unsaved.push(round);
                continue;
            }
            if let Err(e) = self.db.record_round(&round) {
                warn!(
                    "Failed to persist finished round {} to DB: {:#}",
                    round.secret_word, e
                );
                self.unsaved.push(round);
            }
        }
        if !self.unsaved.is_empty() {
            debug!("{} finished rounds waiting for the DB", self.unsaved.len());
        }
    }

    /// Finished rounds of this session not yet in the history database.
    pub fn unsaved_rounds(&self) -> &[FinishedRound] {
        &self.unsaved
    }

    /// Snapshot of the active round, if any.
    pub fn build_snapshot(&self) -> Option<RoundSnapshot> {
        self.session.active_round().map(RoundSnapshot::from_round)
    }

    /// Score listing with session totals.
    ///
    /// Recorded history plus the session rounds the database has not taken
    /// yet. When the history cannot be read the listing falls back to this
    /// session's rounds and is flagged `history_unavailable`.
    pub fn build_scoreboard(&self) -> ScoreboardView {
        let player = self.session.player();
        let (entries, best_score, history_unavailable) = match self.load_history(player) {
            Ok((entries, best)) => (entries, best, false),
            Err(e) => {
                warn!("Failed to load score history: {:#}", e);
                let entries = self.session.scoreboard();
                let best = entries.iter().map(|entry| entry.score).max();
                (entries, best, true)
            }
        };
        ScoreboardView {
            player: player.to_string(),
            entries,
            session_total: self.session.total_score(),
            best_score,
            history_unavailable,
        }
    }

    fn load_history(&self, player: &str) -> anyhow::Result<(Vec<ScoreEntry>, Option<u32>)> {
        let mut entries = self
            .db
            .load_scoreboard(player)
            .context("failed to load scoreboard")?;
        let mut best = self.db.best_score(player).context("failed to load best score")?;
        for round in &self.unsaved {
            entries.push(round.score_entry());
            best = best.max(Some(round.score));
        }
        Ok((entries, best))
    }

    /// Delete the player's recorded history and this session's finished
    /// rounds. Returns the number of rows removed from the database.
    pub fn clear_history(&mut self) -> anyhow::Result<usize> {
        let deleted = self
            .db
            .clear_history(self.session.player())
            .context("failed to clear score history")?;
        let forgotten = self.session.clear_finished();
        self.unsaved.clear();
        info!(
            "Cleared score history for {} ({} recorded, {} this session)",
            self.session.player(),
            deleted,
            forgotten
        );
        Ok(deleted)
    }
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

/// Run the main application event loop.
///
/// Starts a first round, then processes user commands until `Quit`, until
/// the command channel closes, or until the TUI drops its update receiver.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");

    send_new_round(&mut state, &ui_tx).await;
    send_scoreboard(&state, &ui_tx).await;

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Quit) => {
                        info!("Quit command received, shutting down");
                        break;
                    }
                    Some(cmd) => {
                        handle_user_command(&mut state, cmd, &ui_tx).await;
                    }
                    None => {
                        info!("Command channel closed, shutting down");
                        break;
                    }
                }
            }

            _ = ui_tx.closed() => {
                info!("UI channel closed, shutting down");
                break;
            }
        }
    }

    info!(
        "Application event loop exiting after {} finished rounds",
        state.session.finished_rounds().len()
    );
    Ok(())
}

/// Handle a user command from the TUI.
async fn handle_user_command(
    state: &mut AppState,
    cmd: UserCommand,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    match cmd {
        UserCommand::Guess(letter) => match state.play_letter(letter) {
            Ok(result) => {
                debug!("Guess {:?} -> {:?}", letter, result);
                let _ = ui_tx.send(UiUpdate::GuessResult(result)).await;
                if let Some(snapshot) = state.build_snapshot() {
                    let finished = snapshot.is_over();
                    let _ = ui_tx.send(UiUpdate::Round(Box::new(snapshot))).await;
                    if finished {
                        send_scoreboard(state, ui_tx).await;
                    }
                }
            }
            Err(SessionError::Round(RoundError::RoundAlreadyOver)) => {
                // Keys typed after the last guess; the outcome stays on screen.
                debug!("Guess {:?} ignored, the round is over", letter);
            }
            Err(e) => {
                warn!("Guess {:?} not applied: {}", letter, e);
                let _ = ui_tx.send(UiUpdate::Error(e.to_string())).await;
            }
        },
        UserCommand::NewRound => {
            send_new_round(state, ui_tx).await;
        }
        UserCommand::ClearHistory => match state.clear_history() {
            Ok(_) => send_scoreboard(state, ui_tx).await,
            Err(e) => {
                warn!("{:#}", e);
                let _ = ui_tx
                    .send(UiUpdate::Error("Could not clear score history".into()))
                    .await;
            }
        },
        UserCommand::Quit => {
            // Handled in the main loop
        }
    }
}

async fn send_new_round(state: &mut AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    match state.start_round() {
        Ok(snapshot) => {
            let _ = ui_tx.send(UiUpdate::Round(Box::new(snapshot))).await;
        }
        Err(e) => {
            warn!("Failed to start a new round: {}", e);
            let _ = ui_tx
                .send(UiUpdate::Error(format!("Could not start a round: {e}")))
                .await;
        }
    }
}

async fn send_scoreboard(state: &AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    let view = state.build_scoreboard();
    let _ = ui_tx.send(UiUpdate::Scoreboard(Box::new(view))).await;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
