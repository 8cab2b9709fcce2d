// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages sent to the
// app loop, or into local ViewState mutations (tab switching, the quit
// and clear-history dialogs).

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::ViewState;
use crate::protocol::{TabId, UserCommand};

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to the
/// app loop (a guess, a new round, quit). Returns `None` when the key press
/// was handled locally or ignored.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Only process key press events. On Windows, crossterm emits both
    // Press and Release events for each physical keypress.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    if key_event.modifiers.contains(KeyModifiers::CONTROL) {
        return match key_event.code {
            KeyCode::Char('c') => Some(UserCommand::Quit),
            KeyCode::Char('n') if !view_state.confirm_quit && !view_state.confirm_clear => {
                Some(UserCommand::NewRound)
            }
            _ => None,
        };
    }

    // Quit confirmation mode: only y/q confirm, n/Esc cancel, everything else blocked
    if view_state.confirm_quit {
        return handle_confirm_quit(key_event, view_state);
    }

    if view_state.confirm_clear {
        return handle_confirm_clear(key_event, view_state);
    }

    match key_event.code {
        KeyCode::Esc => {
            view_state.confirm_quit = true;
            None
        }
        KeyCode::Tab => {
            view_state.active_tab = next_tab(view_state.active_tab);
            None
        }
        KeyCode::Char('1') => {
            view_state.active_tab = TabId::Game;
            None
        }
        KeyCode::Char('2') => {
            view_state.active_tab = TabId::Scores;
            None
        }
        KeyCode::Enter => {
            let round_running = view_state
                .round
                .as_ref()
                .is_some_and(|round| !round.is_over());
            if round_running {
                None
            } else {
                view_state.active_tab = TabId::Game;
                Some(UserCommand::NewRound)
            }
        }
        KeyCode::Char('c') if view_state.active_tab == TabId::Scores => {
            view_state.confirm_clear = true;
            None
        }
        // Non-letters are forwarded too so the player hears why they were refused
        KeyCode::Char(c) if view_state.accepts_guesses() => Some(UserCommand::Guess(c)),
        _ => None,
    }
}

/// Handle key events while in quit confirmation mode.
///
/// - `y` or `q` confirms quit (sends UserCommand::Quit)
/// - `n` or `Esc` cancels (returns to normal mode)
/// - All other keys are blocked (no-op)
fn handle_confirm_quit(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Char('q') | KeyCode::Char('Q') => {
            Some(UserCommand::Quit)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            view_state.confirm_quit = false;
            None
        }
        _ => None,
    }
}

/// Handle key events while asking whether to clear the score history.
/// `y` confirms, `n` or `Esc` cancel, everything else is blocked.
fn handle_confirm_clear(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            view_state.confirm_clear = false;
            Some(UserCommand::ClearHistory)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            view_state.confirm_clear = false;
            None
        }
        _ => None,
    }
}

fn next_tab(tab: TabId) -> TabId {
    match tab {
        TabId::Game => TabId::Scores,
        TabId::Scores => TabId::Game,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
