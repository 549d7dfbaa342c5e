//! Shell orchestrator tying input, dispatch, markup, clickables, the surface, and game
//! sessions together.
//!
//! The shell never touches the host directly. Anything the host must do is queued as a
//! [`ShellEffect`] and drained with [`TerminalShell::take_effects`].

use std::{collections::VecDeque, fmt, rc::Rc, time::Duration};

use futures::future::LocalBoxFuture;
use leptos::logging::warn;
use terminal_shell_contract::{
    CommandAction, CommandContext, CommandResult, GameHandle, KeyInput, OverlayKind, Project,
    SurfaceMetrics, ViewerState,
};

use crate::{
    banner::welcome_lines,
    clickable::{ClickTarget, ClickableRegistry},
    config::{ShellConfig, ShellConfigError},
    game::{GameKeyOutcome, GameSessionId, GameSessionManager, TickScheduler},
    input::{InputEffect, InputState},
    markup::MarkupParser,
    pointer::{CellPosition, PointerBridge, PointerOutcome, TouchSample},
    registry::{CommandOutcome, CommandRegistry},
    render::{render_lines, RenderedLine},
    screen::ScreenBuffer,
    surface::{ResizeOutcome, SurfaceAdapter},
};

/// Identifies an asynchronous command awaiting completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CommandTicket(pub u64);

/// Work the host must perform on the shell's behalf.
pub enum ShellEffect {
    /// Apply a viewer or overlay action.
    Host(CommandAction),
    /// A game session started or ended.
    GameStateChanged {
        /// Whether a session is now active.
        active: bool,
        /// Game that started or ended.
        game_id: Option<String>,
    },
    /// Open a vetted external URL.
    OpenExternalUrl(String),
    /// Drive `future` and pass its result to [`TerminalShell::complete_pending`].
    AwaitCommand {
        /// Ticket to hand back.
        ticket: CommandTicket,
        /// Pending command result.
        future: LocalBoxFuture<'static, CommandResult>,
    },
}

impl fmt::Debug for ShellEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Host(action) => f.debug_tuple("Host").field(action).finish(),
            Self::GameStateChanged { active, game_id } => f
                .debug_struct("GameStateChanged")
                .field("active", active)
                .field("game_id", game_id)
                .finish(),
            Self::OpenExternalUrl(url) => f.debug_tuple("OpenExternalUrl").field(url).finish(),
            Self::AwaitCommand { ticket, .. } => f
                .debug_struct("AwaitCommand")
                .field("ticket", ticket)
                .finish_non_exhaustive(),
        }
    }
}

struct PendingCommand {
    ticket: CommandTicket,
    line: String,
}

/// One terminal shell instance.
pub struct TerminalShell {
    config: ShellConfig,
    registry: CommandRegistry,
    parser: MarkupParser,
    clickables: ClickableRegistry,
    surface: SurfaceAdapter,
    input: InputState,
    games: GameSessionManager,
    pointer: PointerBridge,
    projects: Vec<Project>,
    viewer: Option<ViewerState>,
    overlay: Option<OverlayKind>,
    pending: Option<PendingCommand>,
    queue: VecDeque<String>,
    next_ticket: u64,
    effects: Vec<ShellEffect>,
    welcomed: bool,
    pristine: bool,
}

impl fmt::Debug for TerminalShell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TerminalShell")
            .field("registry", &self.registry)
            .field("games", &self.games)
            .field("pending", &self.pending.as_ref().map(|pending| pending.ticket))
            .field("queued", &self.queue.len())
            .finish_non_exhaustive()
    }
}

impl TerminalShell {
    /// Builds a shell over `registry`, scheduling game ticks through `scheduler`.
    ///
    /// Nothing is drawn until the first non-zero [`TerminalShell::resize`].
    pub fn new(
        config: ShellConfig,
        registry: CommandRegistry,
        scheduler: Rc<dyn TickScheduler>,
    ) -> Result<Self, ShellConfigError> {
        config.validate()?;
        let parser = MarkupParser::new()?;
        let mut clickables = ClickableRegistry::new();
        for command in &config.persistent_commands {
            clickables.add_persistent(command, command);
        }
        let games = GameSessionManager::new(
            scheduler,
            Duration::from_millis(config.frame_interval_ms),
        );
        let surface = SurfaceAdapter::new(config.prompt.clone(), config.scrollback);
        Ok(Self {
            config,
            registry,
            parser,
            clickables,
            surface,
            input: InputState::new(),
            games,
            pointer: PointerBridge::new(),
            projects: Vec::new(),
            viewer: None,
            overlay: None,
            pending: None,
            queue: VecDeque::new(),
            next_ticket: 0,
            effects: Vec::new(),
            welcomed: false,
            pristine: false,
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    /// Command registry.
    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Screen contents.
    pub fn screen(&self) -> &ScreenBuffer {
        self.surface.screen()
    }

    /// Clickable bindings.
    pub fn clickables(&self) -> &ClickableRegistry {
        &self.clickables
    }

    /// Input buffer and history.
    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Returns whether a game session owns the surface.
    pub fn is_game_active(&self) -> bool {
        self.games.is_active()
    }

    /// Active game identifier.
    pub fn active_game_id(&self) -> Option<&str> {
        self.games.active_game_id()
    }

    /// Returns whether an asynchronous command is in flight.
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Returns whether limited history mode is on.
    pub fn limited_history(&self) -> bool {
        self.surface.limited_history()
    }

    /// Replaces the host state commands can read.
    pub fn update_context(
        &mut self,
        projects: Vec<Project>,
        viewer: Option<ViewerState>,
        overlay: Option<OverlayKind>,
    ) {
        self.projects = projects;
        self.viewer = viewer;
        self.overlay = overlay;
    }

    /// Replaces the project list.
    pub fn set_projects(&mut self, projects: Vec<Project>) {
        self.projects = projects;
    }

    /// Records the host's viewer state.
    pub fn set_viewer(&mut self, viewer: Option<ViewerState>) {
        self.viewer = viewer;
    }

    /// Records the host's overlay state.
    pub fn set_overlay(&mut self, overlay: Option<OverlayKind>) {
        self.overlay = overlay;
    }

    fn context(&self) -> CommandContext {
        CommandContext {
            projects: self.projects.clone(),
            current_viewer: self.viewer.clone(),
            current_overlay: self.overlay,
            surface: self.surface.metrics(),
            limited_history: self.surface.limited_history(),
        }
    }

    /// Applies a new surface measurement.
    ///
    /// The first measured size draws the welcome banner. Later size changes redraw the banner
    /// at the new width as long as nothing but the banner has been shown.
    pub fn resize(&mut self, metrics: SurfaceMetrics) -> ResizeOutcome {
        let outcome = self.surface.resize(metrics);
        match outcome {
            ResizeOutcome::BecameReady => {
                let deferred = self.surface.take_deferred();
                if !self.welcomed {
                    self.show_welcome();
                }
                self.surface.replay(deferred);
            }
            ResizeOutcome::Resized
                if self.pristine && !self.games.is_active() && self.pending.is_none() =>
            {
                self.show_welcome()
            }
            _ => {}
        }
        outcome
    }

    fn show_welcome(&mut self) {
        self.surface.reset();
        self.clickables.clear_all();
        for line in welcome_lines(&self.config, self.surface.metrics()) {
            let styled = self.parser.parse(&line, &mut self.clickables);
            self.surface.write_line(&styled);
        }
        self.surface.mark_banner_end();
        self.surface.write_prompt(self.input.buffer());
        self.welcomed = true;
        self.pristine = true;
    }

    /// Routes one key press.
    pub fn handle_key(&mut self, key: &KeyInput, now_ms: u64) {
        match self.games.handle_key(key) {
            GameKeyOutcome::ExitRequested => {
                self.exit_game();
                return;
            }
            GameKeyOutcome::Forwarded => return,
            GameKeyOutcome::Inactive => {}
        }

        let registry = &self.registry;
        let effect = self
            .input
            .handle_key(key, |prefix| registry.complete(prefix));
        if effect == InputEffect::None {
            return;
        }
        self.pristine = false;

        if let InputEffect::Submit(line) = effect {
            self.submit(line, now_ms);
            return;
        }
        // Keystrokes typed while a command is in flight only reach the buffer; the prompt
        // redraw after completion shows them.
        if self.pending.is_some() {
            return;
        }
        match effect {
            InputEffect::Echo(text) => self.surface.write_raw(&text),
            InputEffect::EraseLast => self.surface.write_raw("\x08 \x08"),
            InputEffect::RedrawLine(buffer) => self.surface.write_prompt(&buffer),
            InputEffect::ShowCompletions(names) => {
                self.surface.write_raw("\r\n");
                self.surface.write_line(&names.join("  "));
                self.surface.write_prompt(self.input.buffer());
            }
            InputEffect::EmptySubmit => {
                self.surface.write_raw("\r\n");
                self.surface.write_prompt("");
            }
            InputEffect::Cancel => {
                self.surface.write_raw("^C\r\n");
                self.surface.write_prompt("");
            }
            InputEffect::ClearScreen => {
                self.surface.clear_visible();
                self.prune_runs();
                self.surface.write_prompt(self.input.buffer());
            }
            InputEffect::None | InputEffect::Submit(_) => {}
        }
    }

    /// Runs `text` exactly as if it had been typed followed by Enter.
    ///
    /// An active game session is ended first.
    pub fn inject_command(&mut self, text: &str, now_ms: u64) {
        if self.games.is_active() {
            self.exit_game();
        }
        let line = text.trim();
        if line.is_empty() {
            return;
        }
        self.pristine = false;
        self.input.record_submission(line);
        if self.pending.is_none() {
            self.surface.write_prompt(line);
        }
        self.submit(line.to_string(), now_ms);
    }

    fn submit(&mut self, line: String, now_ms: u64) {
        if self.pending.is_some() {
            if self.queue.len() >= self.config.max_queued_commands {
                warn!("command queue full; dropping `{line}`");
            } else {
                self.queue.push_back(line);
            }
            return;
        }
        self.dispatch(line, now_ms);
    }

    fn dispatch(&mut self, line: String, now_ms: u64) {
        match self.registry.execute(&line, self.context()) {
            CommandOutcome::Ready(result) => self.finish(&line, result, now_ms),
            CommandOutcome::Pending(future) => {
                self.next_ticket = self.next_ticket.wrapping_add(1);
                let ticket = CommandTicket(self.next_ticket);
                self.pending = Some(PendingCommand { ticket, line });
                self.effects.push(ShellEffect::AwaitCommand { ticket, future });
            }
        }
    }

    /// Delivers the result of an asynchronous command, then runs queued submissions in order.
    pub fn complete_pending(&mut self, ticket: CommandTicket, result: CommandResult, now_ms: u64) {
        if self.pending.as_ref().map(|pending| pending.ticket) != Some(ticket) {
            warn!("ignoring result for stale command ticket {}", ticket.0);
            return;
        }
        let Some(pending) = self.pending.take() else {
            return;
        };
        self.finish(&pending.line, result, now_ms);

        while self.pending.is_none() && !self.games.is_active() {
            let Some(line) = self.queue.pop_front() else {
                break;
            };
            self.surface.write_prompt(&line);
            self.dispatch(line, now_ms);
        }
    }

    fn finish(&mut self, line: &str, result: CommandResult, now_ms: u64) {
        if matches!(result.action, Some(CommandAction::Clear)) {
            self.surface.reset();
            self.clickables.clear_all();
            self.surface.write_prompt(self.input.buffer());
            return;
        }

        // Supersede earlier runs before anything new is registered.
        self.clickables.disable_stale_runs();
        self.clickables.clear_active();
        self.surface.begin_output(line);

        if !result.output.is_empty() {
            for raw in result.output.split('\n') {
                let styled = self.parser.parse(raw, &mut self.clickables);
                self.surface.write_line(&styled);
            }
            if !result.output.trim().is_empty() {
                self.surface.write_line("");
            }
        }

        self.prune_runs();

        match result.action {
            Some(CommandAction::StartGame { game_id, handler }) => {
                self.start_game(&game_id, handler, now_ms);
                return;
            }
            Some(CommandAction::SetLimitedHistory { enabled }) => {
                self.surface.set_limited_history(enabled);
            }
            Some(action) if action.is_host_action() => {
                self.effects.push(ShellEffect::Host(action));
            }
            Some(_) | None => {}
        }
        self.surface.write_prompt(self.input.buffer());
    }

    // Runs only exist on screen; once their cells scroll out or are erased they can never be
    // clicked again.
    fn prune_runs(&mut self) {
        if self.surface.is_ready() {
            let on_screen = self.surface.screen().run_ids();
            self.clickables.retain_runs(&on_screen);
        }
    }

    fn start_game(&mut self, game_id: &str, handler: GameHandle, now_ms: u64) {
        self.queue.clear();
        self.input.clear_buffer();
        self.games
            .start(game_id, handler, self.surface.screen_mut(), now_ms);
        self.effects.push(ShellEffect::GameStateChanged {
            active: true,
            game_id: Some(game_id.to_string()),
        });
    }

    /// Ends the active game session and restores the banner and prompt.
    pub fn exit_game(&mut self) {
        let Some(game_id) = self.games.exit() else {
            return;
        };
        self.show_welcome();
        self.effects.push(ShellEffect::GameStateChanged {
            active: false,
            game_id: Some(game_id),
        });
    }

    /// Renders a game frame for `session`.
    pub fn tick(&mut self, session: GameSessionId, now_ms: u64) -> bool {
        self.games.tick(session, self.surface.screen_mut(), now_ms)
    }

    /// Resolves a pointer press on a cell.
    pub fn pointer_down(&mut self, cell: CellPosition, now_ms: u64) {
        let outcome = self.pointer.pointer_down(
            cell,
            self.surface.screen(),
            &self.clickables,
            self.games.is_active(),
        );
        self.apply_pointer(outcome, now_ms);
    }

    /// Records the start of a touch.
    pub fn touch_start(&mut self, sample: TouchSample) {
        self.pointer.touch_start(sample);
    }

    /// Resolves the end of a touch.
    pub fn touch_end(&mut self, sample: TouchSample, now_ms: u64) {
        let outcome = self.pointer.touch_end(
            sample,
            self.surface.screen(),
            &self.clickables,
            self.games.is_active(),
        );
        self.apply_pointer(outcome, now_ms);
    }

    /// Abandons the current touch.
    pub fn touch_cancel(&mut self) {
        self.pointer.touch_cancel();
    }

    fn apply_pointer(&mut self, outcome: PointerOutcome, now_ms: u64) {
        match outcome {
            PointerOutcome::Activate(ClickTarget::Command(command)) => {
                self.inject_command(&command, now_ms);
            }
            PointerOutcome::Activate(ClickTarget::Link(url)) => {
                match self.parser.policy().check(&url) {
                    Ok(()) => self.effects.push(ShellEffect::OpenExternalUrl(url)),
                    Err(denial) => warn!("refusing to open {url}: {denial:?}"),
                }
            }
            PointerOutcome::GameClick => {
                self.games.handle_click();
            }
            PointerOutcome::Ignored => {}
        }
    }

    /// Drains queued host effects.
    pub fn take_effects(&mut self) -> Vec<ShellEffect> {
        std::mem::take(&mut self.effects)
    }

    /// Styled lines for the view layer. The cursor is shown only outside game sessions.
    pub fn render_lines(&self) -> Vec<RenderedLine> {
        let cursor = (!self.games.is_active()).then(|| self.surface.screen().cursor());
        render_lines(self.surface.screen(), &self.clickables, cursor)
    }
}
