//! Terminal shell core for the portfolio site.
//!
//! The crate is runtime-agnostic apart from logging: it owns the command registry and
//! dispatcher, the inline markup parser and clickable-run bookkeeping, an ANSI screen buffer
//! used as the render surface, the line editor, embedded game sessions, and pointer/touch
//! hit-testing. [`TerminalShell`] ties these together and reports host work as
//! [`ShellEffect`] values, so a view layer only forwards events and renders
//! [`TerminalShell::render_lines`].

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod art;
pub mod banner;
pub mod clickable;
pub mod config;
pub mod game;
pub mod input;
pub mod link_policy;
pub mod markup;
pub mod pointer;
pub mod registry;
pub mod render;
pub mod screen;
pub mod shell;
pub mod surface;

pub use clickable::{ClickTarget, ClickableRegistry, RunId};
pub use config::{BrandConfig, ShellConfig, ShellConfigError};
pub use game::{
    GameKeyOutcome, GameSessionId, GameSessionManager, ManualTickScheduler, TickHandle,
    TickScheduler,
};
pub use link_policy::{LinkDenial, LinkPolicy};
pub use markup::{strip_ansi, MarkupParser};
pub use pointer::{CellPosition, TouchSample};
pub use registry::{
    CommandHandler, CommandInvocation, CommandOutcome, CommandRegistrationToken,
    CommandRegistry, CommandRegistryHandle,
};
pub use render::{RenderedLine, RenderedSegment, RunState};
pub use screen::{CellStyle, ScreenBuffer};
pub use shell::{CommandTicket, ShellEffect, TerminalShell};
pub use surface::ResizeOutcome;
