//! Glue between the shell and the reactive view.
//!
//! Every DOM event goes through [`TerminalDriver::update`]: the shell is borrowed once, the
//! rendered lines are refreshed, and queued effects are applied only after the borrow ends so
//! host callbacks may freely re-enter the driver.

use std::{cell::RefCell, rc::Rc};

use leptos::{
    logging::warn, spawn_local, Callable, Callback, ReadSignal, RwSignal, SignalGetUntracked,
    SignalSet,
};
use platform_host::{next_monotonic_timestamp_ms, ExternalUrlService};
use terminal_shell::{RenderedLine, ShellEffect, TerminalShell};
use terminal_shell_contract::CommandAction;

/// Shared handle to one mounted shell.
#[derive(Clone)]
pub struct TerminalDriver {
    shell: Rc<RefCell<TerminalShell>>,
    lines: RwSignal<Vec<RenderedLine>>,
    game: RwSignal<Option<String>>,
    external_url: Rc<dyn ExternalUrlService>,
    on_host_action: Callback<CommandAction>,
}

impl TerminalDriver {
    /// Wraps `shell`. Host actions are reported through `on_host_action`.
    pub fn new(
        shell: TerminalShell,
        external_url: Rc<dyn ExternalUrlService>,
        on_host_action: Callback<CommandAction>,
    ) -> Self {
        Self {
            shell: Rc::new(RefCell::new(shell)),
            lines: RwSignal::new(Vec::new()),
            game: RwSignal::new(None),
            external_url,
            on_host_action,
        }
    }

    /// Rendered screen lines.
    pub fn lines(&self) -> ReadSignal<Vec<RenderedLine>> {
        self.lines.read_only()
    }

    /// Id of the running game, if any.
    pub fn game(&self) -> ReadSignal<Option<String>> {
        self.game.read_only()
    }

    /// Whether a game session currently owns the keyboard.
    pub fn game_active(&self) -> bool {
        self.game.get_untracked().is_some()
    }

    /// Runs `f` against the shell with a fresh monotonic timestamp, then repaints and applies
    /// whatever effects the shell queued.
    ///
    /// Re-entrant calls (a host callback dispatching straight back into the shell) are dropped
    /// with a warning instead of panicking on the borrow.
    pub fn update<R>(&self, f: impl FnOnce(&mut TerminalShell, u64) -> R) -> Option<R> {
        let (result, lines, effects) = {
            let Ok(mut shell) = self.shell.try_borrow_mut() else {
                warn!("terminal shell is busy; event dropped");
                return None;
            };
            let result = f(&mut shell, next_monotonic_timestamp_ms());
            (result, shell.render_lines(), shell.take_effects())
        };
        self.lines.set(lines);
        for effect in effects {
            self.apply(effect);
        }
        Some(result)
    }

    fn apply(&self, effect: ShellEffect) {
        match effect {
            ShellEffect::Host(action) => self.on_host_action.call(action),
            ShellEffect::GameStateChanged { active, game_id } => {
                self.game.set(if active { game_id } else { None });
            }
            ShellEffect::OpenExternalUrl(url) => {
                let service = Rc::clone(&self.external_url);
                spawn_local(async move {
                    if let Err(err) = service.open_url(&url).await {
                        warn!("open external url failed for `{url}`: {err}");
                    }
                });
            }
            ShellEffect::AwaitCommand { ticket, future } => {
                let driver = self.clone();
                spawn_local(async move {
                    let result = future.await;
                    driver.update(|shell, now_ms| shell.complete_pending(ticket, result, now_ms));
                });
            }
        }
    }
}
