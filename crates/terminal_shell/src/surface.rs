//! Render surface adapter: prompt drawing, readiness gating, and limited history mode.

use leptos::logging::warn;
use terminal_shell_contract::{SurfaceMetrics, TerminalSurface};

use crate::screen::ScreenBuffer;

/// What a call to [`SurfaceAdapter::resize`] changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeOutcome {
    /// First non-zero measurement; deferred writes can now be replayed.
    BecameReady,
    /// Dimensions changed on an already-measured surface.
    Resized,
    /// Same dimensions as before.
    Unchanged,
    /// Measurement is still zero; output stays deferred.
    StillUnmeasured,
}

/// Wraps the screen buffer with the line-oriented operations the shell needs.
///
/// Writes issued before the surface has been measured are queued and replayed once a
/// non-zero size arrives, so nothing is ever laid out against a zero-width grid.
#[derive(Debug)]
pub struct SurfaceAdapter {
    screen: ScreenBuffer,
    prompt: String,
    // Absolute line index (see `ScreenBuffer::dropped_lines`) just past the banner.
    banner_end: usize,
    limited_history: bool,
    deferred: Vec<String>,
    ready: bool,
}

impl SurfaceAdapter {
    /// Creates an unmeasured adapter.
    pub fn new(prompt: impl Into<String>, scrollback: usize) -> Self {
        Self {
            screen: ScreenBuffer::new(scrollback),
            prompt: prompt.into(),
            banner_end: 0,
            limited_history: false,
            deferred: Vec::new(),
            ready: false,
        }
    }

    /// Underlying screen buffer.
    pub fn screen(&self) -> &ScreenBuffer {
        &self.screen
    }

    /// Underlying screen buffer, mutably. Used by game sessions that draw directly.
    pub fn screen_mut(&mut self) -> &mut ScreenBuffer {
        &mut self.screen
    }

    /// Returns whether the surface has been measured at least once.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Current dimensions.
    pub fn metrics(&self) -> SurfaceMetrics {
        self.screen.metrics()
    }

    /// Prompt text.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Applies a new measurement.
    ///
    /// Deferred writes stay queued after [`ResizeOutcome::BecameReady`] until the caller takes
    /// and replays them.
    pub fn resize(&mut self, metrics: SurfaceMetrics) -> ResizeOutcome {
        let previous = self.screen.metrics();
        self.screen.set_metrics(metrics);
        if !metrics.is_measured() {
            return ResizeOutcome::StillUnmeasured;
        }
        if !self.ready {
            self.ready = true;
            return ResizeOutcome::BecameReady;
        }
        if previous == metrics {
            ResizeOutcome::Unchanged
        } else {
            ResizeOutcome::Resized
        }
    }

    /// Writes raw text, deferring it while the surface is unmeasured.
    pub fn write_raw(&mut self, text: &str) {
        if self.ready {
            self.screen.write(text);
        } else {
            if self.deferred.is_empty() {
                warn!("terminal surface not measured yet; deferring output");
            }
            self.deferred.push(text.to_string());
        }
    }

    /// Removes the writes queued while the surface was unmeasured.
    pub fn take_deferred(&mut self) -> Vec<String> {
        std::mem::take(&mut self.deferred)
    }

    /// Writes previously deferred chunks in order.
    pub fn replay(&mut self, chunks: Vec<String>) {
        for chunk in chunks {
            self.write_raw(&chunk);
        }
    }

    /// Writes one line followed by CRLF.
    pub fn write_line(&mut self, text: &str) {
        self.write_raw(text);
        self.write_raw("\r\n");
    }

    /// Redraws the prompt on the current line, replacing any partial content.
    pub fn write_prompt(&mut self, buffer: &str) {
        let line = format!("\x1b[2K\r{}{buffer}", self.prompt);
        self.write_raw(&line);
    }

    /// Clears everything, including scrollback and the banner marker.
    pub fn reset(&mut self) {
        self.deferred.clear();
        self.screen.reset();
        self.banner_end = 0;
    }

    /// Clears the visible surface for `Ctrl+L`. The banner goes with it, so limited history
    /// mode afterwards erases everything above the current interaction.
    pub fn clear_visible(&mut self) {
        self.screen.clear();
    }

    /// Records that every line above the cursor belongs to the banner.
    pub fn mark_banner_end(&mut self) {
        self.banner_end = self.screen.dropped_lines() + self.screen.cursor().row;
    }

    /// Number of banner lines still retained at the top of the buffer.
    pub fn banner_lines(&self) -> usize {
        self.banner_end
            .saturating_sub(self.screen.dropped_lines())
            .min(self.screen.line_count())
    }

    /// Returns whether limited history mode is on.
    pub fn limited_history(&self) -> bool {
        self.limited_history
    }

    /// Switches limited history mode.
    pub fn set_limited_history(&mut self, enabled: bool) {
        self.limited_history = enabled;
    }

    /// Prepares the surface for a command's output.
    ///
    /// In limited history mode every line below the banner is erased and the submitted line is
    /// echoed again, leaving only the banner and the current interaction visible. Otherwise the
    /// cursor simply moves past the echoed input line.
    pub fn begin_output(&mut self, echo: &str) {
        if self.limited_history && self.ready {
            self.screen.erase_from(self.banner_lines());
            let line = format!("{}{echo}\r\n", self.prompt);
            self.screen.write(&line);
        } else {
            self.write_raw("\r\n");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ready_adapter() -> SurfaceAdapter {
        let mut adapter = SurfaceAdapter::new("$ ", 200);
        adapter.resize(SurfaceMetrics::new(40, 10));
        adapter
    }

    #[test]
    fn writes_before_measurement_are_deferred_then_replayed() {
        let mut adapter = SurfaceAdapter::new("$ ", 200);
        adapter.write_line("hello");
        assert_eq!(adapter.screen().line_count(), 1);
        assert_eq!(adapter.screen().line_text(0), "");

        assert_eq!(
            adapter.resize(SurfaceMetrics::default()),
            ResizeOutcome::StillUnmeasured
        );
        assert_eq!(
            adapter.resize(SurfaceMetrics::new(40, 10)),
            ResizeOutcome::BecameReady
        );
        let deferred = adapter.take_deferred();
        assert_eq!(deferred, vec!["hello".to_string(), "\r\n".to_string()]);
        adapter.replay(deferred);
        assert_eq!(adapter.screen().line_text(0), "hello");
        assert!(adapter.take_deferred().is_empty());
        assert_eq!(
            adapter.resize(SurfaceMetrics::new(40, 10)),
            ResizeOutcome::Unchanged
        );
        assert_eq!(
            adapter.resize(SurfaceMetrics::new(60, 10)),
            ResizeOutcome::Resized
        );
    }

    #[test]
    fn prompt_redraw_replaces_partial_line() {
        let mut adapter = ready_adapter();
        adapter.write_prompt("hel");
        adapter.write_prompt("help");
        assert_eq!(adapter.screen().text_lines(), vec!["$ help"]);
    }

    #[test]
    fn limited_history_keeps_banner_and_current_interaction() {
        let mut adapter = ready_adapter();
        adapter.write_line("BANNER");
        adapter.mark_banner_end();
        adapter.write_prompt("one");
        adapter.begin_output("one");
        adapter.write_line("first output");
        adapter.write_prompt("two");

        adapter.set_limited_history(true);
        adapter.begin_output("two");
        adapter.write_line("second output");

        assert_eq!(
            adapter.screen().text_lines(),
            vec!["BANNER", "$ two", "second output", ""]
        );
    }

    #[test]
    fn limited_history_after_clear_keeps_only_current_interaction() {
        let mut adapter = ready_adapter();
        adapter.write_line("BANNER");
        adapter.mark_banner_end();
        adapter.set_limited_history(true);
        adapter.clear_visible();
        assert_eq!(adapter.banner_lines(), 0);

        for _ in 0..3 {
            adapter.write_prompt("plain");
            adapter.begin_output("plain");
            adapter.write_line("nothing clickable");
        }
        adapter.write_prompt("");
        assert_eq!(
            adapter.screen().text_lines(),
            vec!["$ plain", "nothing clickable", "$"]
        );
    }

    #[test]
    fn banner_marker_follows_scrollback_trimming() {
        let mut adapter = SurfaceAdapter::new("$ ", 6);
        adapter.resize(SurfaceMetrics::new(40, 10));
        adapter.write_line("BANNER 1");
        adapter.write_line("BANNER 2");
        adapter.mark_banner_end();
        adapter.write_line("old one");
        adapter.write_line("old two");
        adapter.write_line("old three");
        assert_eq!(adapter.banner_lines(), 2);
        adapter.write_line("old four");
        assert_eq!(adapter.banner_lines(), 1);
        adapter.write_line("old five");
        assert_eq!(adapter.banner_lines(), 0);

        adapter.set_limited_history(true);
        adapter.write_prompt("plain");
        adapter.begin_output("plain");
        adapter.write_line("nothing clickable");
        assert_eq!(
            adapter.screen().text_lines(),
            vec!["$ plain", "nothing clickable", ""]
        );
    }

    #[test]
    fn reset_drops_banner_marker() {
        let mut adapter = ready_adapter();
        adapter.write_line("BANNER");
        adapter.mark_banner_end();
        assert_eq!(adapter.banner_lines(), 1);
        adapter.reset();
        assert_eq!(adapter.banner_lines(), 0);
        assert_eq!(adapter.screen().line_count(), 1);
    }
}
