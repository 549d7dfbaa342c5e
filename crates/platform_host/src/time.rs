//! Time helpers shared by the terminal host and its adapters.

use std::cell::Cell;
#[cfg(not(target_arch = "wasm32"))]
use std::time::{SystemTime, UNIX_EPOCH};

thread_local! {
    static LAST_FRAME_TIMESTAMP_MS: Cell<u64> = const { Cell::new(0) };
}

/// Returns the current unix timestamp in milliseconds.
pub fn unix_time_ms_now() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now().max(0.0) as u64
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

/// Returns a timestamp for game frames and key events that never goes backwards.
///
/// Consecutive calls may return the same value; game step timers compare elapsed time, so a
/// clock adjustment only ever stalls a frame instead of replaying one.
pub fn next_monotonic_timestamp_ms() -> u64 {
    let now = unix_time_ms_now();
    LAST_FRAME_TIMESTAMP_MS.with(|last| {
        let next = now.max(last.get());
        last.set(next);
        next
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monotonic_timestamps_do_not_decrease() {
        let first = next_monotonic_timestamp_ms();
        let second = next_monotonic_timestamp_ms();
        assert!(second >= first);
        assert!(first > 0);
    }
}
