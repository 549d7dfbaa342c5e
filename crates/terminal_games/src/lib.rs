//! Games that run inside the portfolio terminal.
//!
//! Each game implements [`terminal_shell_contract::GameHandler`] and redraws the whole surface
//! on every frame. Games start paused; a click or tap starts them, and their own step timers
//! decide how far state advances between the shell's fixed-rate ticks.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod layout;
pub mod snake;
pub mod tetris;

pub use layout::Playfield;
pub use snake::SnakeGame;
pub use tetris::TetrisGame;
