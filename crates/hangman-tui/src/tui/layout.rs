// Screen layout: panel arrangement and sizing.
//
// +--------------------------------------------------+
// | Status Bar (1 row)                                |
// +-------------------+------------------------------+
// | Gallows (40%)     | Word Panel (60%)             |
// |                   |                              |
// +-------------------+------------------------------+
// | Messages (3 rows)                                 |
// +--------------------------------------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+
//
// The scores tab uses the whole middle section (`main_panel`).

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Resolved screen areas for each dashboard zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    /// Top row: player, error counter, tab indicator.
    pub status_bar: Rect,
    /// Middle section; the union of `gallows` and `word_panel`.
    pub main_panel: Rect,
    pub gallows: Rect,
    /// Masked word, guessed letters, score.
    pub word_panel: Rect,
    /// Feedback for the last guess.
    pub notice: Rect,
    /// Bottom row: keyboard shortcut hints.
    pub help_bar: Rect,
}

/// Build the dashboard layout from the available terminal area.
pub fn build_layout(area: Rect) -> AppLayout {
    // Vertical: status(1) | middle(fill) | notice(3) | help(1)
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Min(8),    // gallows + word panel
            Constraint::Length(3), // notice
            Constraint::Length(1), // help bar
        ])
        .split(area);

    let status_bar = vertical[0];
    let main_panel = vertical[1];
    let notice = vertical[2];
    let help_bar = vertical[3];

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(main_panel);

    AppLayout {
        status_bar,
        main_panel,
        gallows: horizontal[0],
        word_panel: horizontal[1],
        notice,
        help_bar,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
