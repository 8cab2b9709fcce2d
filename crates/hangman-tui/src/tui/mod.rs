// TUI dashboard: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` that mirrors what the app loop reports about the
// active round and the score history. The app loop pushes `UiUpdate` messages
// over an mpsc channel; the TUI applies them to `ViewState` and re-renders at
// ~30 fps.

pub mod input;
pub mod layout;
pub mod widgets;

use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use hangman_core::RoundStatus;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::protocol::{GuessResult, RoundSnapshot, ScoreboardView, TabId, UiUpdate, UserCommand};

use layout::{build_layout, AppLayout};
use widgets::confirm::Prompt;

// ---------------------------------------------------------------------------
// Notice
// ---------------------------------------------------------------------------

/// Severity of the message shown in the notice panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Good,
    Bad,
    Error,
}

/// One line of feedback for the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn new(kind: NoticeKind, text: impl Into<String>) -> Self {
        Notice {
            kind,
            text: text.into(),
        }
    }

    pub fn color(&self) -> Color {
        match self.kind {
            NoticeKind::Info => Color::White,
            NoticeKind::Good => Color::Green,
            NoticeKind::Bad => Color::Yellow,
            NoticeKind::Error => Color::Red,
        }
    }
}

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// TUI-local state that mirrors the application state for rendering.
///
/// Updated incrementally via `UiUpdate` messages from the app loop.
/// The `render_frame` function reads this struct to draw the dashboard.
pub struct ViewState {
    /// Active (or just finished) round, once the app has started one.
    pub round: Option<RoundSnapshot>,
    /// Feedback for the last action.
    pub notice: Option<Notice>,
    /// Score history for the player.
    pub scoreboard: ScoreboardView,
    /// Which tab is active in the main panel.
    pub active_tab: TabId,
    /// Whether the quit confirmation dialog is open.
    pub confirm_quit: bool,
    /// Whether the clear-history confirmation dialog is open.
    pub confirm_clear: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            round: None,
            notice: None,
            scoreboard: ScoreboardView::default(),
            active_tab: TabId::Game,
            confirm_quit: false,
            confirm_clear: false,
        }
    }
}

impl ViewState {
    /// Whether letter keys should be sent as guesses.
    pub fn accepts_guesses(&self) -> bool {
        self.active_tab == TabId::Game
            && self.round.as_ref().is_some_and(|round| !round.is_over())
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

/// Apply a single UiUpdate to the ViewState.
pub fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::Round(snapshot) => {
            if let Some(notice) = round_notice(&snapshot) {
                state.notice = Some(notice);
            }
            state.round = Some(*snapshot);
        }
        UiUpdate::GuessResult(result) => {
            state.notice = Some(guess_notice(result));
        }
        UiUpdate::Scoreboard(view) => {
            state.scoreboard = *view;
        }
        UiUpdate::Error(message) => {
            state.notice = Some(Notice::new(NoticeKind::Error, message));
        }
    }
}

/// Notice for a round snapshot: a fresh round or a finished one.
fn round_notice(snapshot: &RoundSnapshot) -> Option<Notice> {
    let word = snapshot.secret_word.as_deref().unwrap_or("");
    match snapshot.status {
        RoundStatus::Won => Some(Notice::new(
            NoticeKind::Good,
            format!(
                "You win! The word was {word}. Score: {}. Press Enter to play again.",
                snapshot.score
            ),
        )),
        RoundStatus::Lost => Some(Notice::new(
            NoticeKind::Bad,
            format!("You lose. The word was {word}. Press Enter to play again."),
        )),
        RoundStatus::InProgress if snapshot.guessed_letters.is_empty() => Some(Notice::new(
            NoticeKind::Info,
            format!(
                "New word with {} letters. Type a letter to guess.",
                snapshot.pattern.chars().count()
            ),
        )),
        RoundStatus::InProgress => None,
    }
}

fn guess_notice(result: GuessResult) -> Notice {
    match result {
        GuessResult::Hit(c) => Notice::new(NoticeKind::Good, format!("{c} is in the word.")),
        GuessResult::Miss(c) => Notice::new(NoticeKind::Bad, format!("{c} is not in the word.")),
        GuessResult::Rejected(c) if c.is_ascii_alphabetic() => Notice::new(
            NoticeKind::Info,
            format!("You already tried {c}. Pick another letter."),
        ),
        GuessResult::Rejected(c) => Notice::new(
            NoticeKind::Info,
            format!("{c:?} is not a letter. Guesses must be A-Z."),
        ),
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete dashboard frame.
pub fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area());

    widgets::status_bar::render(frame, layout.status_bar, state);
    render_main_panel(frame, &layout, state);
    render_notice(frame, &layout, state);
    render_help_bar(frame, &layout, state);

    if state.confirm_quit {
        widgets::confirm::render(frame, frame.area(), Prompt::Quit);
    } else if state.confirm_clear {
        widgets::confirm::render(frame, frame.area(), Prompt::ClearHistory);
    }
}

fn render_main_panel(frame: &mut Frame, layout: &AppLayout, state: &ViewState) {
    match state.active_tab {
        TabId::Game => {
            widgets::gallows::render(frame, layout.gallows, state);
            widgets::word_panel::render(frame, layout.word_panel, state);
        }
        TabId::Scores => {
            widgets::scoreboard::render(frame, layout.main_panel, state);
        }
    }
}

fn render_notice(frame: &mut Frame, layout: &AppLayout, state: &ViewState) {
    let line = match &state.notice {
        Some(notice) => Line::from(Span::styled(
            notice.text.clone(),
            Style::default().fg(notice.color()),
        )),
        None => Line::from(""),
    };
    let paragraph = Paragraph::new(line)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Messages"));
    frame.render_widget(paragraph, layout.notice);
}

fn render_help_bar(frame: &mut Frame, layout: &AppLayout, state: &ViewState) {
    let text = if state.accepts_guesses() {
        " A-Z:Guess | Ctrl+N:New word | Tab/1-2:Tabs | Esc:Quit"
    } else if state.active_tab == TabId::Scores {
        " Enter:New word | C:Clear history | Tab/1-2:Tabs | Esc:Quit"
    } else {
        " Enter:New word | Tab/1-2:Tabs | Esc:Quit"
    };
    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        text,
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::DIM),
    )]))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, layout.help_bar);
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// This is the main entry point for the terminal UI. It:
/// 1. Initializes the terminal (enters raw mode, enables alternate screen).
/// 2. Installs a panic hook to restore the terminal on crash.
/// 3. Runs an async select loop: UI updates, keyboard input, render ticks.
/// 4. Restores the terminal on exit.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));

    let mut view_state = ViewState::default();
    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let result = loop {
        tokio::select! {
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => apply_ui_update(&mut view_state, ui_update),
                    None => {
                        debug!("UI channel closed, leaving TUI loop");
                        break Ok(());
                    }
                }
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            let quit = cmd == UserCommand::Quit;
                            if cmd_tx.send(cmd).await.is_err() {
                                warn!("App loop is gone, leaving TUI loop");
                                break Ok(());
                            }
                            if quit {
                                break Ok(());
                            }
                        }
                    }
                    Some(Ok(_)) => {
                        // Mouse and resize events: the next tick redraws
                    }
                    Some(Err(e)) => {
                        break Err(anyhow::Error::new(e).context("terminal input error"));
                    }
                    None => break Ok(()),
                }
            }

            _ = render_tick.tick() => {
                if let Err(e) = terminal.draw(|frame| render_frame(frame, &view_state)) {
                    break Err(anyhow::Error::new(e).context("failed to draw frame"));
                }
            }
        }
    };

    ratatui::restore();
    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use hangman_core::{GameRound, ScoreEntry};

    fn snapshot_of(word: &str, max_errors: u32, guesses: &[&str]) -> RoundSnapshot {
        let mut round = GameRound::with_word(word, max_errors).unwrap();
        for guess in guesses {
            round.apply_guess(guess).unwrap();
        }
        RoundSnapshot::from_round(&round)
    }

    fn buffer_text(terminal: &ratatui::Terminal<ratatui::backend::TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn view_state_default_is_sensible() {
        let state = ViewState::default();
        assert!(state.round.is_none());
        assert!(state.notice.is_none());
        assert!(state.scoreboard.entries.is_empty());
        assert_eq!(state.active_tab, TabId::Game);
        assert!(!state.confirm_quit);
        assert!(!state.accepts_guesses());
    }

    #[test]
    fn new_round_sets_info_notice() {
        let mut state = ViewState::default();
        apply_ui_update(
            &mut state,
            UiUpdate::Round(Box::new(snapshot_of("gato", 5, &[]))),
        );
        assert!(state.accepts_guesses());
        let notice = state.notice.unwrap();
        assert_eq!(notice.kind, NoticeKind::Info);
        assert!(notice.text.contains("4 letters"));
    }

    #[test]
    fn guess_result_then_round_keeps_guess_notice() {
        let mut state = ViewState::default();
        apply_ui_update(
            &mut state,
            UiUpdate::GuessResult(GuessResult::Miss('Z')),
        );
        apply_ui_update(
            &mut state,
            UiUpdate::Round(Box::new(snapshot_of("gato", 5, &["z"]))),
        );
        let notice = state.notice.unwrap();
        assert_eq!(notice.kind, NoticeKind::Bad);
        assert_eq!(notice.text, "Z is not in the word.");
    }

    #[test]
    fn finished_round_overrides_guess_notice() {
        let mut state = ViewState::default();
        apply_ui_update(&mut state, UiUpdate::GuessResult(GuessResult::Hit('O')));
        apply_ui_update(
            &mut state,
            UiUpdate::Round(Box::new(snapshot_of("gato", 5, &["g", "a", "t", "o"]))),
        );
        let notice = state.notice.as_ref().unwrap();
        assert_eq!(notice.kind, NoticeKind::Good);
        assert!(notice.text.contains("GATO"));
        assert!(notice.text.contains("Score: 3"));
        assert!(!state.accepts_guesses());
    }

    #[test]
    fn lost_round_reveals_word() {
        let mut state = ViewState::default();
        apply_ui_update(
            &mut state,
            UiUpdate::Round(Box::new(snapshot_of("si", 1, &["x"]))),
        );
        let notice = state.notice.unwrap();
        assert_eq!(notice.kind, NoticeKind::Bad);
        assert!(notice.text.contains("SI"));
    }

    #[test]
    fn rejected_guess_notices() {
        assert!(guess_notice(GuessResult::Rejected('A'))
            .text
            .contains("already tried A"));
        assert!(guess_notice(GuessResult::Rejected('7'))
            .text
            .contains("not a letter"));
    }

    #[test]
    fn error_and_scoreboard_updates() {
        let mut state = ViewState::default();
        apply_ui_update(&mut state, UiUpdate::Error("boom".into()));
        assert_eq!(state.notice.as_ref().unwrap().kind, NoticeKind::Error);

        let view = ScoreboardView {
            player: "ana".into(),
            entries: vec![ScoreEntry {
                secret_word: "GATO".into(),
                error_count: 1,
                score: 3,
            }],
            session_total: 3,
            best_score: Some(3),
            history_unavailable: false,
        };
        apply_ui_update(&mut state, UiUpdate::Scoreboard(Box::new(view.clone())));
        assert_eq!(state.scoreboard, view);
    }

    #[test]
    fn render_frame_game_tab() {
        let backend = ratatui::backend::TestBackend::new(100, 30);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut state = ViewState::default();
        apply_ui_update(
            &mut state,
            UiUpdate::Round(Box::new(snapshot_of("gato", 5, &["a"]))),
        );
        terminal.draw(|frame| render_frame(frame, &state)).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("_ A _ _"));
        assert!(text.contains("A-Z:Guess"));
    }

    #[test]
    fn render_frame_scores_tab_with_quit_dialog() {
        let backend = ratatui::backend::TestBackend::new(100, 30);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = ViewState {
            active_tab: TabId::Scores,
            confirm_quit: true,
            ..ViewState::default()
        };
        terminal.draw(|frame| render_frame(frame, &state)).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("Really quit?"));
        assert!(text.contains("Enter:New word"));
    }

    #[test]
    fn render_frame_scores_tab_with_clear_dialog() {
        let backend = ratatui::backend::TestBackend::new(100, 30);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = ViewState {
            active_tab: TabId::Scores,
            confirm_clear: true,
            ..ViewState::default()
        };
        terminal.draw(|frame| render_frame(frame, &state)).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("Delete every recorded round?"));
        assert!(text.contains("C:Clear history"));
    }

    #[test]
    fn render_frame_tiny_terminal_does_not_panic() {
        let backend = ratatui::backend::TestBackend::new(20, 5);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = ViewState::default();
        terminal.draw(|frame| render_frame(frame, &state)).unwrap();
    }
}
