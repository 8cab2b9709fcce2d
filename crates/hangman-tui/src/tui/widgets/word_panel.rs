// Word panel widget: masked word, error counter, guessed letters.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use hangman_core::RoundStatus;

use crate::protocol::RoundSnapshot;
use crate::tui::ViewState;

/// Render the word panel into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let block = Block::default().borders(Borders::ALL).title("Word");

    let Some(round) = &state.round else {
        let paragraph = Paragraph::new("  Waiting for a word...")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    };

    let pattern_style = match round.status {
        RoundStatus::InProgress => Style::default().fg(Color::White),
        RoundStatus::Won => Style::default().fg(Color::Green),
        RoundStatus::Lost => Style::default().fg(Color::Red),
    }
    .add_modifier(Modifier::BOLD);

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}", spaced(&round.pattern)),
            pattern_style,
        )),
        Line::from(""),
        Line::from(format!(
            "  Errors: {}/{} ({} left)",
            round.error_count,
            round.max_errors,
            round.max_errors.saturating_sub(round.error_count)
        )),
        Line::from(format!("  Guessed: {}", letter_list(&round.guessed_letters))),
        Line::from(Span::styled(
            format!("  Misses:  {}", letter_list(&round.missed_letters())),
            Style::default().fg(Color::Yellow),
        )),
    ];

    if round.is_over() {
        lines.push(Line::from(""));
        lines.push(Line::from(outcome_line(round)));
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Letters separated by single spaces: `_A__` becomes `_ A _ _`.
pub fn spaced(pattern: &str) -> String {
    pattern
        .chars()
        .map(String::from)
        .collect::<Vec<_>>()
        .join(" ")
}

fn letter_list(letters: &[char]) -> String {
    if letters.is_empty() {
        "-".to_string()
    } else {
        spaced(&letters.iter().collect::<String>())
    }
}

fn outcome_line(round: &RoundSnapshot) -> String {
    let word = round.secret_word.as_deref().unwrap_or("?");
    match round.status {
        RoundStatus::Won => format!("  Solved {word} for {} points", round.score),
        _ => format!("  The word was {word}"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
