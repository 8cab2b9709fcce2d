// Status bar widget: player, round progress, tab indicator.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use hangman_core::RoundStatus;

use crate::protocol::TabId;
use crate::tui::ViewState;

/// Render the status bar into the given area.
///
/// Layout: [player] [round state] [total] [tab bar]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut spans = Vec::new();

    let player = if state.scoreboard.player.is_empty() {
        "-"
    } else {
        state.scoreboard.player.as_str()
    };
    spans.push(Span::styled(
        format!(" Hangman | {player}"),
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    ));

    spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
    let (label, color) = round_indicator(state);
    spans.push(Span::styled(label, Style::default().fg(color)));

    spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
    spans.push(Span::styled(
        format!("Session: {} pts", state.scoreboard.session_total),
        Style::default().fg(Color::White),
    ));

    spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
    spans.extend(tab_spans(state.active_tab));

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// Short description of the active round and its color.
pub fn round_indicator(state: &ViewState) -> (String, Color) {
    match &state.round {
        None => ("No round".to_string(), Color::DarkGray),
        Some(round) => match round.status {
            RoundStatus::InProgress => (
                format!("Errors {}/{}", round.error_count, round.max_errors),
                Color::Yellow,
            ),
            RoundStatus::Won => ("Won".to_string(), Color::Green),
            RoundStatus::Lost => ("Lost".to_string(), Color::Red),
        },
    }
}

/// Build tab indicator spans with the active tab highlighted.
/// E.g. "[1:Game] [2:Scores]"
pub fn tab_spans(active: TabId) -> Vec<Span<'static>> {
    let tabs = [(TabId::Game, "1:Game"), (TabId::Scores, "2:Scores")];

    let mut spans = Vec::new();
    for (tab_id, label) in tabs {
        let style = if tab_id == active {
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        spans.push(Span::styled(format!("[{}]", label), style));
        spans.push(Span::raw(" "));
    }
    spans
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
