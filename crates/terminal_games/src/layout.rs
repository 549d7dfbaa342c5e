//! Responsive playfield sizing and frame drawing shared by the games.

use nu_ansi_term::Color;
use terminal_shell_contract::{DeviceClass, SurfaceMetrics};

/// Narrowest playfield any layout produces, in cells.
pub const MIN_PLAYFIELD_WIDTH: usize = 4;

/// Playfield size in game cells. Each cell is drawn two columns wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Playfield {
    /// Cells per row.
    pub width: usize,
    /// Rows.
    pub height: usize,
}

fn clamp(value: usize, min: usize, max: usize) -> usize {
    value.max(min).min(max)
}

/// Sizes a playfield for the surface and device class.
///
/// Mobile layouts reserve room for on-screen controls: beside the field in landscape, below it
/// in portrait. Desktop layouts cap the width at `max_width`.
pub fn playfield(metrics: SurfaceMetrics, max_width: usize) -> Playfield {
    let cols = usize::from(metrics.cols);
    let rows = usize::from(metrics.rows);
    let (width, height) = match metrics.device_class() {
        DeviceClass::MobileLandscape => (
            cols.saturating_sub(2) * 6 / 20,
            clamp(rows * 8 / 10, 10, 20),
        ),
        DeviceClass::MobilePortrait => (cols.saturating_sub(2) / 2, clamp(rows * 4 / 10, 10, 15)),
        DeviceClass::Desktop => (
            clamp(cols.saturating_sub(4) / 2, 10, max_width.max(10)),
            clamp(rows.saturating_sub(5), 10, 20),
        ),
    };
    Playfield {
        width: width.max(MIN_PLAYFIELD_WIDTH),
        height,
    }
}

/// Orientation used to decide when a running game must restart.
pub fn is_landscape(metrics: SurfaceMetrics) -> bool {
    metrics.viewport_width_px > metrics.viewport_height_px
}

/// Horizontal border line for a field `width` cells wide.
pub fn border(width: usize) -> String {
    Color::DarkGray
        .paint(format!("+{}+", "-".repeat(width * 2)))
        .to_string()
}

/// Wraps one rendered row in the side borders.
pub fn bordered_row(cells: &str) -> String {
    let edge = Color::DarkGray.paint("|");
    format!("{edge}{cells}{edge}")
}

/// One filled two-column cell.
pub fn block(color: Color) -> String {
    color.paint("##").to_string()
}

/// Status lines shared by every game.
pub fn status_lines(
    game_over: bool,
    paused: bool,
    score: u32,
    running_hint: &str,
    paused_hint: &str,
) -> Vec<String> {
    if game_over {
        vec![
            Color::Red.bold().paint("GAME OVER!").to_string(),
            format!("Final Score: {}", Color::Yellow.bold().paint(score.to_string())),
            "Click/Tap to play again. Press ESC to exit.".to_string(),
        ]
    } else if paused {
        vec![
            format!(
                "{} - Click/Tap to start or resume",
                Color::Yellow.bold().paint("PAUSED")
            ),
            paused_hint.to_string(),
        ]
    } else {
        vec![running_hint.to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn desktop_width_is_capped() {
        assert_eq!(
            playfield(SurfaceMetrics::new(120, 40), 30),
            Playfield {
                width: 30,
                height: 20
            }
        );
        assert_eq!(
            playfield(SurfaceMetrics::new(120, 40), 10),
            Playfield {
                width: 10,
                height: 20
            }
        );
        assert_eq!(
            playfield(SurfaceMetrics::new(20, 12), 30),
            Playfield {
                width: 10,
                height: 10
            }
        );
    }

    #[test]
    fn mobile_layouts_leave_room_for_controls() {
        let portrait = SurfaceMetrics::new(42, 60).with_viewport(390, 844);
        assert_eq!(
            playfield(portrait, 30),
            Playfield {
                width: 20,
                height: 15
            }
        );
        let landscape = SurfaceMetrics::new(92, 20).with_viewport(700, 390);
        assert_eq!(
            playfield(landscape, 30),
            Playfield {
                width: 27,
                height: 16
            }
        );
        assert!(is_landscape(landscape));
        assert!(!is_landscape(portrait));
    }

    #[test]
    fn tiny_surfaces_keep_a_minimum_width() {
        let metrics = SurfaceMetrics::new(4, 4).with_viewport(300, 600);
        assert_eq!(playfield(metrics, 30).width, MIN_PLAYFIELD_WIDTH);
    }
}
