//! Welcome banner.

use nu_ansi_term::Color;
use terminal_shell_contract::SurfaceMetrics;

use crate::{art::render_block_art, config::BrandConfig, ShellConfig};

/// Narrowest column count the banner art is laid out for.
pub const BANNER_MIN_COLS: u16 = 20;
/// Column count assumed on desktop when the surface reports fewer than [`BANNER_MIN_COLS`].
pub const FALLBACK_COLS_DESKTOP: u16 = 80;
/// Column count assumed on mobile when the surface reports fewer than [`BANNER_MIN_COLS`].
pub const FALLBACK_COLS_MOBILE: u16 = 40;

/// Welcome line printed under the brand block.
pub const WELCOME_MESSAGE: &str = "Welcome! Click the highlighted commands below, or type your own.";

/// Columns the banner art may use for a surface.
pub fn banner_columns(metrics: SurfaceMetrics) -> u16 {
    if metrics.cols >= BANNER_MIN_COLS {
        metrics.cols
    } else if metrics.device_class().is_mobile() {
        FALLBACK_COLS_MOBILE
    } else {
        FALLBACK_COLS_DESKTOP
    }
}

/// Brand art, tagline, and subtitle, one entry per line.
pub fn brand_block(brand: &BrandConfig, cols: u16) -> Vec<String> {
    let mut lines = render_block_art(&brand.name, Color::Cyan, Some(usize::from(cols)))
        .split('\n')
        .map(str::to_string)
        .collect::<Vec<_>>();
    lines.push(Color::Yellow.paint(format!("  {}", brand.tagline)).to_string());
    lines.push(Color::DarkGray.paint(format!("  {}", brand.subtitle)).to_string());
    lines
}

/// Every banner line, still carrying markup tokens, ending with the blank line before the
/// first prompt.
pub fn welcome_lines(config: &ShellConfig, metrics: SurfaceMetrics) -> Vec<String> {
    let mut lines = brand_block(&config.brand, banner_columns(metrics));
    lines.push(String::new());
    lines.push(WELCOME_MESSAGE.to_string());
    lines.push(String::new());
    lines.extend(config.welcome_hint.iter().cloned());
    lines.push(String::new());
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::strip_ansi;
    use pretty_assertions::assert_eq;

    #[test]
    fn narrow_surfaces_fall_back_by_device() {
        assert_eq!(banner_columns(SurfaceMetrics::new(120, 30)), 120);
        assert_eq!(banner_columns(SurfaceMetrics::new(10, 30)), FALLBACK_COLS_DESKTOP);
        assert_eq!(
            banner_columns(SurfaceMetrics::new(10, 30).with_viewport(390, 844)),
            FALLBACK_COLS_MOBILE
        );
    }

    #[test]
    fn welcome_layout() {
        let config = ShellConfig::default();
        let lines = welcome_lines(&config, SurfaceMetrics::new(120, 30))
            .iter()
            .map(|line| strip_ansi(line))
            .collect::<Vec<_>>();
        assert_eq!(lines.len(), 5 + 2 + 3 + 3 + 1);
        assert_eq!(lines[5], "  Creative Developer & Digital Artist");
        assert_eq!(lines[8], WELCOME_MESSAGE);
        assert_eq!(lines[10], "→ [cmd:open] to browse projects");
        assert_eq!(lines.last().map(String::as_str), Some(""));
    }

    #[test]
    fn art_wraps_on_narrow_surfaces() {
        let brand = BrandConfig::default();
        let wide = brand_block(&brand, 120);
        let narrow = brand_block(&brand, 30);
        assert_eq!(wide.len(), 7);
        assert!(narrow.len() > wide.len());
    }
}
