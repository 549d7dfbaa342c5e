//! Pointer and touch hit-testing against clickable runs.
//!
//! Hits are resolved against the structured run ids stamped on screen cells, so a run is found
//! from any of its cells without reconstructing text from the rendered layout.

use crate::{
    clickable::{ClickTarget, ClickableRegistry},
    screen::ScreenBuffer,
};

/// Longest touch, in milliseconds, still treated as a tap.
pub const TAP_MAX_DURATION_MS: u64 = 300;
/// Largest finger travel, in CSS pixels, still treated as a tap.
pub const TAP_MAX_MOVEMENT_PX: f64 = 10.0;

/// Cell coordinates in absolute buffer lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellPosition {
    /// Buffer line index.
    pub row: usize,
    /// Column index.
    pub col: usize,
}

impl CellPosition {
    /// Position outside every line. Used for presses on blank screen area, which never hit a
    /// run but still count as a game click.
    pub const BLANK: Self = Self {
        row: usize::MAX,
        col: usize::MAX,
    };

    /// Creates a position.
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Touch sample reported by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchSample {
    /// Cell under the finger.
    pub cell: CellPosition,
    /// Client x in CSS pixels.
    pub x: f64,
    /// Client y in CSS pixels.
    pub y: f64,
    /// Event timestamp in milliseconds.
    pub time_ms: u64,
}

/// Resolution of a pointer or tap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerOutcome {
    /// An interactive run was hit.
    Activate(ClickTarget),
    /// No run was hit while a game is running; treat as the game's click.
    GameClick,
    /// Nothing to do.
    Ignored,
}

/// Tracks the in-progress touch and resolves hits.
#[derive(Debug, Default)]
pub struct PointerBridge {
    touch: Option<TouchSample>,
}

impl PointerBridge {
    /// Creates an idle bridge.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves a pointer press.
    pub fn pointer_down(
        &self,
        cell: CellPosition,
        screen: &ScreenBuffer,
        registry: &ClickableRegistry,
        game_active: bool,
    ) -> PointerOutcome {
        if let Some(target) = hit_test(cell, screen, registry) {
            return PointerOutcome::Activate(target);
        }
        if game_active {
            PointerOutcome::GameClick
        } else {
            PointerOutcome::Ignored
        }
    }

    /// Records the start of a touch.
    pub fn touch_start(&mut self, sample: TouchSample) {
        self.touch = Some(sample);
    }

    /// Abandons the current touch.
    pub fn touch_cancel(&mut self) {
        self.touch = None;
    }

    /// Resolves the end of a touch. Long presses and drags are scroll gestures and are ignored.
    pub fn touch_end(
        &mut self,
        end: TouchSample,
        screen: &ScreenBuffer,
        registry: &ClickableRegistry,
        game_active: bool,
    ) -> PointerOutcome {
        let Some(start) = self.touch.take() else {
            return PointerOutcome::Ignored;
        };
        let duration = end.time_ms.saturating_sub(start.time_ms);
        let movement = (end.x - start.x).hypot(end.y - start.y);
        if duration >= TAP_MAX_DURATION_MS || movement >= TAP_MAX_MOVEMENT_PX {
            return PointerOutcome::Ignored;
        }
        self.pointer_down(start.cell, screen, registry, game_active)
    }
}

/// Finds the interactive run covering `cell`.
pub fn hit_test(
    cell: CellPosition,
    screen: &ScreenBuffer,
    registry: &ClickableRegistry,
) -> Option<ClickTarget> {
    let run = screen.run_at(cell.row, cell.col)?;
    if !registry.is_interactive(run) {
        return None;
    }
    registry.resolve(run)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::MarkupParser;
    use pretty_assertions::assert_eq;
    use terminal_shell_contract::{SurfaceMetrics, TerminalSurface};

    fn rendered(line: &str) -> (ScreenBuffer, ClickableRegistry) {
        let mut registry = ClickableRegistry::new();
        let parser = MarkupParser::new().expect("static patterns compile");
        let styled = parser.parse(line, &mut registry);
        let mut screen = ScreenBuffer::new(100);
        screen.set_metrics(SurfaceMetrics::new(60, 10));
        screen.writeln(&styled);
        (screen, registry)
    }

    fn touch(col: usize, x: f64, time_ms: u64) -> TouchSample {
        TouchSample {
            cell: CellPosition::new(0, col),
            x,
            y: 0.0,
            time_ms,
        }
    }

    #[test]
    fn any_cell_of_a_run_resolves_the_whole_binding() {
        let (screen, registry) = rendered("  [cmd:Koi Pond|open koi]");
        let bridge = PointerBridge::new();
        for col in 2..10 {
            assert_eq!(
                bridge.pointer_down(CellPosition::new(0, col), &screen, &registry, false),
                PointerOutcome::Activate(ClickTarget::Command("open koi".to_string()))
            );
        }
        assert_eq!(
            bridge.pointer_down(CellPosition::new(0, 1), &screen, &registry, false),
            PointerOutcome::Ignored
        );
    }

    #[test]
    fn disabled_runs_do_not_activate() {
        let (screen, mut registry) = rendered("[cmd:alpha]");
        registry.disable_stale_runs();
        registry.clear_active();
        let bridge = PointerBridge::new();
        assert_eq!(
            bridge.pointer_down(CellPosition::new(0, 0), &screen, &registry, false),
            PointerOutcome::Ignored
        );
    }

    #[test]
    fn misses_during_a_game_become_game_clicks() {
        let (screen, registry) = rendered("nothing here");
        let bridge = PointerBridge::new();
        assert_eq!(
            bridge.pointer_down(CellPosition::new(0, 3), &screen, &registry, true),
            PointerOutcome::GameClick
        );
    }

    #[test]
    fn taps_activate_but_drags_and_long_presses_do_not() {
        let (screen, registry) = rendered("[link:https://example.com|site]");
        let mut bridge = PointerBridge::new();

        bridge.touch_start(touch(1, 100.0, 1_000));
        assert_eq!(
            bridge.touch_end(touch(1, 104.0, 1_120), &screen, &registry, false),
            PointerOutcome::Activate(ClickTarget::Link("https://example.com".to_string()))
        );

        bridge.touch_start(touch(1, 100.0, 1_000));
        assert_eq!(
            bridge.touch_end(touch(1, 140.0, 1_100), &screen, &registry, false),
            PointerOutcome::Ignored
        );

        bridge.touch_start(touch(1, 100.0, 1_000));
        assert_eq!(
            bridge.touch_end(touch(1, 100.0, 1_400), &screen, &registry, false),
            PointerOutcome::Ignored
        );

        assert_eq!(
            bridge.touch_end(touch(1, 100.0, 1_500), &screen, &registry, false),
            PointerOutcome::Ignored
        );
    }
}
