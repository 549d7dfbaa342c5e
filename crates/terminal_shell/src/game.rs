//! Game session lifecycle and tick scheduling.
//!
//! A session is idle or active. Starting a session clears the surface, renders the first
//! frame, and schedules a periodic tick through the host's [`TickScheduler`]. The tick handle is
//! owned by the session and cancelled whenever the session ends, including replacement by a new
//! session and drop of the manager.

use std::{cell::RefCell, rc::Rc, time::Duration};

use terminal_shell_contract::{GameHandle, KeyInput, TerminalSurface};

/// Identifies one game session so ticks scheduled for an older session can be discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GameSessionId(pub u64);

/// Cancellable periodic task.
pub trait TickHandle {
    /// Stops further ticks. Must be idempotent.
    fn cancel(&mut self);
}

/// Host capability for periodic game ticks.
///
/// Implementations call back into the shell's `tick` with the session id every `interval`
/// until the returned handle is cancelled.
pub trait TickScheduler {
    /// Starts ticking for `session`.
    fn schedule(&self, interval: Duration, session: GameSessionId) -> Box<dyn TickHandle>;
}

/// How the manager treated a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameKeyOutcome {
    /// No session is active; the key belongs to the line editor.
    Inactive,
    /// `Escape` was pressed; the caller must end the session.
    ExitRequested,
    /// The key went to the game handler.
    Forwarded,
}

struct ActiveSession {
    id: GameSessionId,
    game_id: String,
    handler: GameHandle,
    ticker: Box<dyn TickHandle>,
}

impl Drop for ActiveSession {
    fn drop(&mut self) {
        self.ticker.cancel();
    }
}

/// Owns at most one active game session.
pub struct GameSessionManager {
    scheduler: Rc<dyn TickScheduler>,
    interval: Duration,
    next_id: u64,
    active: Option<ActiveSession>,
}

impl std::fmt::Debug for GameSessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSessionManager")
            .field("interval", &self.interval)
            .field("active_game", &self.active_game_id())
            .finish()
    }
}

impl GameSessionManager {
    /// Creates an idle manager ticking every `interval`.
    pub fn new(scheduler: Rc<dyn TickScheduler>, interval: Duration) -> Self {
        Self {
            scheduler,
            interval,
            next_id: 0,
            active: None,
        }
    }

    /// Returns whether a session is active.
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Identifier of the active game, such as `snake`.
    pub fn active_game_id(&self) -> Option<&str> {
        self.active.as_ref().map(|session| session.game_id.as_str())
    }

    /// Identifier of the active session.
    pub fn active_session(&self) -> Option<GameSessionId> {
        self.active.as_ref().map(|session| session.id)
    }

    /// Starts a session, ending any previous one first.
    pub fn start(
        &mut self,
        game_id: &str,
        handler: GameHandle,
        surface: &mut dyn TerminalSurface,
        now_ms: u64,
    ) -> GameSessionId {
        self.exit();
        self.next_id = self.next_id.wrapping_add(1);
        let id = GameSessionId(self.next_id);

        surface.reset();
        handler.with(|game| game.render(surface, now_ms));
        let ticker = self.scheduler.schedule(self.interval, id);
        self.active = Some(ActiveSession {
            id,
            game_id: game_id.to_string(),
            handler,
            ticker,
        });
        id
    }

    /// Ends the active session and returns its game id.
    ///
    /// The tick handle is cancelled before the handler's `on_exit` runs.
    pub fn exit(&mut self) -> Option<String> {
        let mut session = self.active.take()?;
        session.ticker.cancel();
        session.handler.with(|game| game.on_exit());
        Some(session.game_id.clone())
    }

    /// Routes a key press.
    pub fn handle_key(&mut self, key: &KeyInput) -> GameKeyOutcome {
        let Some(session) = &self.active else {
            return GameKeyOutcome::Inactive;
        };
        if key.is("Escape") {
            return GameKeyOutcome::ExitRequested;
        }
        session.handler.with(|game| game.on_key(key));
        GameKeyOutcome::Forwarded
    }

    /// Routes a pointer or tap that missed every clickable run. Returns whether it was consumed.
    pub fn handle_click(&mut self) -> bool {
        let Some(session) = &self.active else {
            return false;
        };
        session.handler.with(|game| {
            if game.accepts_clicks() {
                game.on_click();
                true
            } else {
                false
            }
        })
    }

    /// Renders one frame for `session`. Ticks for any other session are ignored.
    pub fn tick(
        &mut self,
        session: GameSessionId,
        surface: &mut dyn TerminalSurface,
        now_ms: u64,
    ) -> bool {
        match &self.active {
            Some(active) if active.id == session => {
                active.handler.with(|game| game.render(surface, now_ms));
                true
            }
            _ => false,
        }
    }
}

#[derive(Debug, Default)]
struct ManualState {
    scheduled: Vec<(GameSessionId, Duration, Rc<RefCell<bool>>)>,
}

/// Scheduler that never fires on its own; the caller drives ticks.
///
/// Used by tests and by hosts without a timer source.
#[derive(Debug, Clone, Default)]
pub struct ManualTickScheduler {
    state: Rc<RefCell<ManualState>>,
}

struct ManualTickHandle {
    cancelled: Rc<RefCell<bool>>,
}

impl TickHandle for ManualTickHandle {
    fn cancel(&mut self) {
        *self.cancelled.borrow_mut() = true;
    }
}

impl ManualTickScheduler {
    /// Creates an empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sessions whose tick handle is still live.
    pub fn live_sessions(&self) -> Vec<GameSessionId> {
        self.state
            .borrow()
            .scheduled
            .iter()
            .filter(|(_, _, cancelled)| !*cancelled.borrow())
            .map(|(session, _, _)| *session)
            .collect()
    }

    /// Number of schedules requested so far.
    pub fn schedule_count(&self) -> usize {
        self.state.borrow().scheduled.len()
    }

    /// Interval of the most recent schedule.
    pub fn last_interval(&self) -> Option<Duration> {
        self.state
            .borrow()
            .scheduled
            .last()
            .map(|(_, interval, _)| *interval)
    }
}

impl TickScheduler for ManualTickScheduler {
    fn schedule(&self, interval: Duration, session: GameSessionId) -> Box<dyn TickHandle> {
        let cancelled = Rc::new(RefCell::new(false));
        self.state
            .borrow_mut()
            .scheduled
            .push((session, interval, cancelled.clone()));
        Box::new(ManualTickHandle { cancelled })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::screen::ScreenBuffer;
    use pretty_assertions::assert_eq;
    use terminal_shell_contract::{GameHandler, SurfaceMetrics};

    /// Game handler that records every call.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingGame {
        pub(crate) calls: Rc<RefCell<Vec<String>>>,
        pub(crate) clicks: bool,
    }

    impl GameHandler for RecordingGame {
        fn on_key(&mut self, key: &KeyInput) {
            self.calls.borrow_mut().push(format!("key:{}", key.key));
        }

        fn on_exit(&mut self) {
            self.calls.borrow_mut().push("exit".to_string());
        }

        fn accepts_clicks(&self) -> bool {
            self.clicks
        }

        fn on_click(&mut self) {
            self.calls.borrow_mut().push("click".to_string());
        }

        fn render(&mut self, surface: &mut dyn TerminalSurface, now_ms: u64) {
            self.calls.borrow_mut().push(format!("render:{now_ms}"));
            surface.write("\x1b[H");
            surface.writeln(&format!("frame {now_ms}"));
        }
    }

    fn setup() -> (GameSessionManager, ManualTickScheduler, ScreenBuffer) {
        let scheduler = ManualTickScheduler::new();
        let manager = GameSessionManager::new(Rc::new(scheduler.clone()), Duration::from_millis(66));
        let mut screen = ScreenBuffer::new(100);
        screen.set_metrics(SurfaceMetrics::new(40, 12));
        (manager, scheduler, screen)
    }

    #[test]
    fn start_clears_surface_renders_and_schedules() {
        let (mut manager, scheduler, mut screen) = setup();
        screen.writeln("shell output");
        let game = RecordingGame::default();
        let calls = game.calls.clone();

        let session = manager.start("snake", GameHandle::new(game), &mut screen, 5);

        assert_eq!(manager.active_game_id(), Some("snake"));
        assert_eq!(calls.borrow().as_slice(), ["render:5".to_string()]);
        assert_eq!(screen.line_text(0), "frame 5");
        assert_eq!(scheduler.live_sessions(), vec![session]);
        assert_eq!(scheduler.last_interval(), Some(Duration::from_millis(66)));
    }

    #[test]
    fn escape_requests_exit_and_exit_cancels_ticks() {
        let (mut manager, scheduler, mut screen) = setup();
        let game = RecordingGame::default();
        let calls = game.calls.clone();
        let session = manager.start("tetris", GameHandle::new(game), &mut screen, 0);

        assert_eq!(
            manager.handle_key(&KeyInput::plain("ArrowLeft")),
            GameKeyOutcome::Forwarded
        );
        assert_eq!(
            manager.handle_key(&KeyInput::plain("Escape")),
            GameKeyOutcome::ExitRequested
        );
        assert_eq!(manager.exit(), Some("tetris".to_string()));

        assert!(scheduler.live_sessions().is_empty());
        assert!(!manager.tick(session, &mut screen, 100));
        assert_eq!(
            calls.borrow().as_slice(),
            ["render:0", "key:ArrowLeft", "exit"].map(String::from)
        );
        assert_eq!(
            manager.handle_key(&KeyInput::plain("a")),
            GameKeyOutcome::Inactive
        );
    }

    #[test]
    fn replacing_a_session_cancels_the_previous_ticker() {
        let (mut manager, scheduler, mut screen) = setup();
        let first = manager.start("snake", GameHandle::new(RecordingGame::default()), &mut screen, 0);
        let second = manager.start("tetris", GameHandle::new(RecordingGame::default()), &mut screen, 0);

        assert_eq!(scheduler.schedule_count(), 2);
        assert_eq!(scheduler.live_sessions(), vec![second]);
        assert!(!manager.tick(first, &mut screen, 10));
        assert!(manager.tick(second, &mut screen, 10));
    }

    #[test]
    fn dropping_the_manager_cancels_ticks() {
        let (mut manager, scheduler, mut screen) = setup();
        manager.start("snake", GameHandle::new(RecordingGame::default()), &mut screen, 0);
        drop(manager);
        assert!(scheduler.live_sessions().is_empty());
    }

    #[test]
    fn clicks_reach_only_games_that_accept_them() {
        let (mut manager, _scheduler, mut screen) = setup();
        assert!(!manager.handle_click());
        manager.start("snake", GameHandle::new(RecordingGame::default()), &mut screen, 0);
        assert!(!manager.handle_click());

        let game = RecordingGame {
            clicks: true,
            ..RecordingGame::default()
        };
        let calls = game.calls.clone();
        manager.start("snake", GameHandle::new(game), &mut screen, 0);
        assert!(manager.handle_click());
        assert_eq!(calls.borrow().last().map(String::as_str), Some("click"));
    }
}
