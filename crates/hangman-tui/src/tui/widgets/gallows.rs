// Gallows widget: ASCII drawing that grows with each wrong guess.
//
// The figure has six parts (head, body, two arms, two legs). The number of
// parts drawn is scaled so the figure is complete exactly when the round's
// error limit is reached.

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::tui::ViewState;

/// Number of body parts in the complete figure.
pub const FIGURE_PARTS: u32 = 6;

/// Render the gallows into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let (stage, color) = match &state.round {
        Some(round) => {
            let stage = stage_for(round.error_count, round.max_errors);
            let color = if stage >= FIGURE_PARTS {
                Color::Red
            } else {
                Color::White
            };
            (stage, color)
        }
        None => (0, Color::DarkGray),
    };

    let lines: Vec<Line> = figure_lines(stage).into_iter().map(Line::from).collect();
    let paragraph = Paragraph::new(lines)
        .style(Style::default().fg(color))
        .block(Block::default().borders(Borders::ALL).title("Gallows"));
    frame.render_widget(paragraph, area);
}

/// Number of figure parts to draw after `errors` of `max_errors` misses.
pub fn stage_for(errors: u32, max_errors: u32) -> u32 {
    if max_errors == 0 {
        return 0;
    }
    // Widened so large limits cannot overflow.
    let scaled = (u64::from(errors) * u64::from(FIGURE_PARTS)).div_ceil(u64::from(max_errors));
    scaled.min(u64::from(FIGURE_PARTS)) as u32
}

/// The drawing with the first `stage` parts filled in.
pub fn figure_lines(stage: u32) -> Vec<String> {
    let part = |n: u32, symbol: char| if stage >= n { symbol } else { ' ' };
    vec![
        "  +---+".to_string(),
        "  |   |".to_string(),
        format!("  {}   |", part(1, 'O')),
        format!(" {}{}{}  |", part(3, '/'), part(2, '|'), part(4, '\\')),
        format!(" {} {}  |", part(5, '/'), part(6, '\\')),
        "      |".to_string(),
        "=========".to_string(),
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
