// Scoreboard widget: every finished round for the player, newest first.
//
// Each row: "{n}  {word}  {errors}  {score}". Lost rounds are dimmed.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Row, Table};
use ratatui::Frame;

use crate::protocol::ScoreboardView;
use crate::tui::ViewState;

/// Render the scoreboard into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let board = &state.scoreboard;

    let header = Row::new(vec![
        Cell::from("#"),
        Cell::from("Word"),
        Cell::from("Errors"),
        Cell::from("Score"),
    ])
    .style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = if board.entries.is_empty() {
        vec![Row::new(vec![Cell::from(""), Cell::from("No rounds played yet")])
            .style(Style::default().fg(Color::DarkGray))]
    } else {
        board
            .entries
            .iter()
            .enumerate()
            .rev()
            .map(|(i, entry)| {
                let style = if entry.score > 0 {
                    Style::default().fg(Color::White)
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                Row::new(vec![
                    Cell::from(format!("{}", i + 1)),
                    Cell::from(entry.secret_word.clone()),
                    Cell::from(format!("{}", entry.error_count)),
                    Cell::from(format!("{}", entry.score)),
                ])
                .style(style)
            })
            .collect()
    };

    let widths = [
        Constraint::Length(5),
        Constraint::Min(16),
        Constraint::Length(8),
        Constraint::Length(7),
    ];

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title(board)),
    );
    frame.render_widget(table, area);
}

/// Panel title with the summary figures.
pub fn title(board: &ScoreboardView) -> String {
    let best = board
        .best_score
        .map(|b| b.to_string())
        .unwrap_or_else(|| "-".to_string());
    let mut title = format!(
        "Scores ({} rounds, best {}, this session {})",
        board.entries.len(),
        best,
        board.session_total
    );
    if board.history_unavailable {
        title.push_str(" [history unavailable]");
    }
    title
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use hangman_core::ScoreEntry;

    fn entry(word: &str, errors: u32, score: u32) -> ScoreEntry {
        ScoreEntry {
            secret_word: word.to_string(),
            error_count: errors,
            score,
        }
    }

    fn draw(state: &ViewState) -> String {
        let backend = ratatui::backend::TestBackend::new(80, 12);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), state))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn title_without_history() {
        assert_eq!(
            title(&ScoreboardView::default()),
            "Scores (0 rounds, best -, this session 0)"
        );
    }

    #[test]
    fn title_with_history() {
        let board = ScoreboardView {
            player: "ana".into(),
            entries: vec![entry("GATO", 1, 3), entry("SI", 5, 0)],
            session_total: 3,
            best_score: Some(3),
            history_unavailable: false,
        };
        assert_eq!(title(&board), "Scores (2 rounds, best 3, this session 3)");
    }

    #[test]
    fn title_flags_session_only_listing() {
        let board = ScoreboardView {
            player: "ana".into(),
            entries: vec![entry("SOL", 0, 3)],
            session_total: 3,
            best_score: Some(3),
            history_unavailable: true,
        };
        assert_eq!(
            title(&board),
            "Scores (1 rounds, best 3, this session 3) [history unavailable]"
        );
    }

    #[test]
    fn render_empty_board() {
        let text = draw(&ViewState::default());
        assert!(text.contains("No rounds played yet"));
    }

    #[test]
    fn render_lists_newest_first() {
        let state = ViewState {
            scoreboard: ScoreboardView {
                player: "ana".into(),
                entries: vec![entry("GATO", 1, 3), entry("AEROPUERTO", 0, 4)],
                session_total: 7,
                best_score: Some(4),
                history_unavailable: false,
            },
            ..ViewState::default()
        };
        let text = draw(&state);
        let newest = text.find("AEROPUERTO").unwrap();
        let oldest = text.find("GATO").unwrap();
        assert!(newest < oldest);
    }
}
