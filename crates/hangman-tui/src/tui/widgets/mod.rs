// TUI widget modules for each dashboard panel.

pub mod gallows;
pub mod confirm;
pub mod scoreboard;
pub mod status_bar;
pub mod word_panel;
