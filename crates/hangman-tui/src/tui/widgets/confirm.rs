// Confirmation overlay widget.
//
// Centered modal shown on top of the dashboard while
// `ViewState::confirm_quit` or `ViewState::confirm_clear` is set.

use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

const DIALOG_WIDTH: u16 = 40;
const DIALOG_HEIGHT: u16 = 5;

/// What the dialog asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    Quit,
    ClearHistory,
}

impl Prompt {
    fn title(self) -> &'static str {
        match self {
            Prompt::Quit => " Quit ",
            Prompt::ClearHistory => " Clear history ",
        }
    }

    fn question(self) -> &'static str {
        match self {
            Prompt::Quit => " Really quit? (",
            Prompt::ClearHistory => " Delete every recorded round? (",
        }
    }

    fn note(self) -> &'static str {
        match self {
            Prompt::Quit => " The current word is discarded.",
            Prompt::ClearHistory => " This cannot be undone.",
        }
    }
}

/// Render the confirmation overlay for `prompt` centered on `area`.
pub fn render(frame: &mut Frame, area: Rect, prompt: Prompt) {
    let dialog_area = centered_rect(DIALOG_WIDTH, DIALOG_HEIGHT, area);
    frame.render_widget(Clear, dialog_area);

    let key = |k: &'static str, color: Color| {
        Span::styled(k, Style::default().fg(color).add_modifier(Modifier::BOLD))
    };

    let lines = vec![
        Line::from(vec![
            Span::raw(prompt.question()),
            key("y", Color::Green),
            Span::raw("/"),
            key("n", Color::Red),
            Span::raw(")"),
        ]),
        Line::from(Span::styled(
            prompt.note(),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(Span::styled(
            prompt.title(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, dialog_area);
}

/// A `width` x `height` rectangle centered in `area`, clamped to fit.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    cell
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
