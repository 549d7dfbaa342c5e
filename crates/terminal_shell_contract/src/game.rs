//! Embedded game contract.

use std::{cell::RefCell, fmt, rc::Rc};

use serde::{Deserialize, Serialize};

use crate::TerminalSurface;

/// Keyboard input in DOM `KeyboardEvent.key` vocabulary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyInput {
    /// Key name such as `Enter`, `ArrowUp`, `a`, or `" "`.
    pub key: String,
    /// Control modifier.
    pub ctrl: bool,
    /// Alt modifier.
    pub alt: bool,
    /// Meta modifier.
    pub meta: bool,
    /// Shift modifier.
    pub shift: bool,
}

impl KeyInput {
    /// Unmodified key press.
    pub fn plain(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    /// Key press with Control held.
    pub fn ctrl(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ctrl: true,
            ..Self::default()
        }
    }

    /// Returns the printable character for a single-character key with no command modifiers.
    ///
    /// Shift is allowed since it is already folded into the key text.
    pub fn printable(&self) -> Option<char> {
        if self.ctrl || self.alt || self.meta {
            return None;
        }
        let mut chars = self.key.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) if !ch.is_control() => Some(ch),
            _ => None,
        }
    }

    /// Returns whether the key name matches, ignoring ASCII case.
    pub fn is(&self, key: &str) -> bool {
        self.key.eq_ignore_ascii_case(key)
    }
}

/// Capability every embedded game implements.
///
/// `render` is called for the first frame and on every tick. Handlers initialize lazily on the
/// first `render` call and must tolerate `render` arriving before any key.
pub trait GameHandler {
    /// Receives a key press while the session is active. `Escape` never reaches the handler.
    fn on_key(&mut self, key: &KeyInput);

    /// Releases game resources when the session ends.
    fn on_exit(&mut self);

    /// Returns whether [`GameHandler::on_click`] does anything.
    fn accepts_clicks(&self) -> bool {
        false
    }

    /// Receives a pointer or tap that did not land on a clickable run.
    fn on_click(&mut self) {}

    /// Draws one frame, advancing internal state if its own step interval has elapsed.
    fn render(&mut self, surface: &mut dyn TerminalSurface, now_ms: u64);
}

/// Shared handle to a game handler carried by a start-game action.
#[derive(Clone)]
pub struct GameHandle(Rc<RefCell<dyn GameHandler>>);

impl GameHandle {
    /// Wraps a handler.
    pub fn new(handler: impl GameHandler + 'static) -> Self {
        Self(Rc::new(RefCell::new(handler)))
    }

    /// Runs `f` with mutable access to the handler.
    pub fn with<R>(&self, f: impl FnOnce(&mut dyn GameHandler) -> R) -> R {
        let mut handler = self.0.borrow_mut();
        f(&mut *handler)
    }
}

impl fmt::Debug for GameHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameHandle")
            .field("ptr", &Rc::as_ptr(&self.0).cast::<()>())
            .finish()
    }
}

impl PartialEq for GameHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}
