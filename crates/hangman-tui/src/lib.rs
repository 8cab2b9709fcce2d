// Terminal front end for the hangman game.

pub mod app;
pub mod protocol;
pub mod tui;
