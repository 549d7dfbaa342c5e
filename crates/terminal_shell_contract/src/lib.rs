//! Shared contracts between the terminal shell core, the portfolio command set, embedded games,
//! and the browser host.
//!
//! This crate is intentionally runtime-agnostic. It defines the command result and action types,
//! the read-only context snapshot handed to each command, the game handler contract, and the
//! render surface trait without depending on Leptos or browser APIs.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

mod game;
mod project;
mod surface;

use serde::{Deserialize, Serialize};

pub use game::{GameHandle, GameHandler, KeyInput};
pub use project::{
    parse_projects_index, MediaItem, MediaKind, MediaSource, Project, ProjectCategory,
    ViewerState,
};
pub use surface::{DeviceClass, SurfaceMetrics, TerminalSurface, MOBILE_BREAKPOINT_PX};

/// Visibility policy for registered commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommandVisibility {
    /// Command is listed in help and completion.
    Public,
    /// Command is callable but omitted from normal listings.
    Hidden,
}

/// Grouping used when `help` lays out the command list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommandGroup {
    /// Project navigation and content commands.
    Navigation,
    /// Decorative system-information commands.
    System,
    /// Embedded game launchers.
    Games,
}

/// Immutable registration metadata for one command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandDescriptor {
    /// Unique lowercase command name.
    pub name: String,
    /// Alternate names that dispatch to the same handler, such as `ls`.
    pub aliases: Vec<String>,
    /// One-line description shown by `help`.
    pub description: String,
    /// Optional usage string.
    pub usage: Option<String>,
    /// Help grouping.
    pub group: CommandGroup,
    /// Visibility policy.
    pub visibility: CommandVisibility,
}

impl CommandDescriptor {
    /// Creates a public descriptor with no aliases or usage text.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        group: CommandGroup,
    ) -> Self {
        Self {
            name: name.into().to_lowercase(),
            aliases: Vec::new(),
            description: description.into(),
            usage: None,
            group,
            visibility: CommandVisibility::Public,
        }
    }

    /// Adds an alias.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into().to_lowercase());
        self
    }

    /// Sets the usage string.
    pub fn with_usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = Some(usage.into());
        self
    }

    /// Hides the command from help and completion.
    pub fn hidden(mut self) -> Self {
        self.visibility = CommandVisibility::Hidden;
        self
    }
}

/// Overlay panels the host can show above the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverlayKind {
    /// Contact information.
    Contact,
    /// Legal notice (Impressum).
    Imprint,
}

impl OverlayKind {
    /// Stable lowercase label used in command output.
    pub fn label(self) -> &'static str {
        match self {
            Self::Contact => "contact",
            Self::Imprint => "imprint",
        }
    }
}

/// Read-only snapshot passed to each command invocation.
///
/// The host builds it fresh for every dispatch; handlers never mutate it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandContext {
    /// Projects currently known to the site.
    pub projects: Vec<Project>,
    /// Media viewer state, when a viewer is open.
    pub current_viewer: Option<ViewerState>,
    /// Overlay currently shown by the host, if any.
    pub current_overlay: Option<OverlayKind>,
    /// Render surface dimensions at dispatch time.
    pub surface: SurfaceMetrics,
    /// Whether limited history mode is currently enabled.
    pub limited_history: bool,
}

/// Instruction attached to a command result.
///
/// The shell consumes [`CommandAction::Clear`], [`CommandAction::SetLimitedHistory`], and
/// [`CommandAction::StartGame`] itself; every other variant is forwarded to the host.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandAction {
    /// Open the media viewer on a project.
    OpenViewer {
        /// Project identifier.
        project_id: String,
        /// Optional zero-based media index.
        media_index: Option<usize>,
    },
    /// Close the media viewer.
    CloseViewer,
    /// Show an overlay panel.
    ShowOverlay {
        /// Overlay to show.
        overlay: OverlayKind,
    },
    /// Close the current overlay panel.
    CloseOverlay,
    /// Wipe the terminal and its clickable state.
    Clear,
    /// Switch limited history mode on or off.
    SetLimitedHistory {
        /// New mode.
        enabled: bool,
    },
    /// Hand the render surface to an embedded game.
    StartGame {
        /// Stable game identifier such as `snake`.
        game_id: String,
        /// Handler that owns input and rendering while the session is active.
        handler: GameHandle,
    },
}

impl CommandAction {
    /// Returns whether the host application (rather than the shell) applies this action.
    pub fn is_host_action(&self) -> bool {
        matches!(
            self,
            Self::OpenViewer { .. } | Self::CloseViewer | Self::ShowOverlay { .. } | Self::CloseOverlay
        )
    }
}

/// Outcome of one command invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandResult {
    /// Raw output text, possibly containing inline markup tokens.
    pub output: String,
    /// Whether the output describes a recoverable user error.
    pub is_error: bool,
    /// Optional instruction for the shell or host.
    pub action: Option<CommandAction>,
}

impl CommandResult {
    /// Empty result that renders nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Plain informational output.
    pub fn text(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            ..Self::default()
        }
    }

    /// Recoverable user-facing error output.
    pub fn error(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            is_error: true,
            action: None,
        }
    }

    /// Attaches an action.
    pub fn with_action(mut self, action: CommandAction) -> Self {
        self.action = Some(action);
        self
    }
}
