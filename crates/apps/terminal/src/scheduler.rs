//! Game tick scheduling on browser intervals.

use std::time::Duration;

use leptos::{
    leptos_dom::helpers::IntervalHandle, logging::warn, set_interval_with_handle, Callable, Callback,
};
use terminal_shell::{GameSessionId, TickHandle, TickScheduler};

/// Schedules game ticks with `setInterval` and reports each one through a callback.
#[derive(Clone, Copy)]
pub struct IntervalTickScheduler {
    on_tick: Callback<GameSessionId>,
}

impl IntervalTickScheduler {
    /// Creates a scheduler that calls `on_tick` with the session id on every interval.
    pub fn new(on_tick: Callback<GameSessionId>) -> Self {
        Self { on_tick }
    }
}

struct IntervalTick(Option<IntervalHandle>);

impl TickHandle for IntervalTick {
    fn cancel(&mut self) {
        if let Some(handle) = self.0.take() {
            handle.clear();
        }
    }
}

impl Drop for IntervalTick {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl TickScheduler for IntervalTickScheduler {
    fn schedule(&self, interval: Duration, session: GameSessionId) -> Box<dyn TickHandle> {
        let on_tick = self.on_tick;
        match set_interval_with_handle(move || on_tick.call(session), interval) {
            Ok(handle) => Box::new(IntervalTick(Some(handle))),
            Err(err) => {
                warn!("game tick interval failed to start: {err:?}");
                Box::new(IntervalTick(None))
            }
        }
    }
}
