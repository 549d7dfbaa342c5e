//! Render surface contract shared by the shell core and embedded games.

use serde::{Deserialize, Serialize};

/// Viewport width below which the layout treats the device as mobile.
pub const MOBILE_BREAKPOINT_PX: u32 = 768;

/// Device classes used for responsive layout decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeviceClass {
    /// Wide viewport.
    Desktop,
    /// Narrow viewport held upright.
    MobilePortrait,
    /// Narrow viewport held sideways.
    MobileLandscape,
}

impl DeviceClass {
    /// Returns whether this is either mobile orientation.
    pub fn is_mobile(self) -> bool {
        !matches!(self, Self::Desktop)
    }
}

/// Measured size of the render surface.
///
/// A zero column or row count means the surface has not been laid out yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceMetrics {
    /// Character columns.
    pub cols: u16,
    /// Character rows.
    pub rows: u16,
    /// Browser viewport width in CSS pixels.
    pub viewport_width_px: u32,
    /// Browser viewport height in CSS pixels.
    pub viewport_height_px: u32,
}

impl SurfaceMetrics {
    /// Creates metrics for a desktop-sized viewport.
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            cols,
            rows,
            viewport_width_px: 1280,
            viewport_height_px: 800,
        }
    }

    /// Overrides the viewport size.
    pub fn with_viewport(mut self, width_px: u32, height_px: u32) -> Self {
        self.viewport_width_px = width_px;
        self.viewport_height_px = height_px;
        self
    }

    /// Returns whether the surface has non-zero character dimensions.
    pub fn is_measured(&self) -> bool {
        self.cols > 0 && self.rows > 0
    }

    /// Classifies the viewport.
    pub fn device_class(&self) -> DeviceClass {
        if self.viewport_width_px >= MOBILE_BREAKPOINT_PX {
            DeviceClass::Desktop
        } else if self.viewport_width_px > self.viewport_height_px {
            DeviceClass::MobileLandscape
        } else {
            DeviceClass::MobilePortrait
        }
    }
}

/// Character-cell output surface.
///
/// Text written through [`TerminalSurface::write`] may contain ANSI escape sequences.
pub trait TerminalSurface {
    /// Current dimensions.
    fn metrics(&self) -> SurfaceMetrics;

    /// Writes raw text at the cursor.
    fn write(&mut self, text: &str);

    /// Writes text followed by a carriage return and line feed.
    fn writeln(&mut self, text: &str) {
        self.write(text);
        self.write("\r\n");
    }

    /// Clears all content and homes the cursor, keeping styles and configuration.
    fn clear(&mut self);

    /// Clears all content and resets cursor, pen style, and any link tagging.
    fn reset(&mut self);

    /// Number of lines currently held, including scrollback.
    fn line_count(&self) -> usize;

    /// Drops every line from `line` onward and leaves the cursor at the start of `line`.
    fn erase_from(&mut self, line: usize);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_class_uses_breakpoint_and_orientation() {
        assert_eq!(SurfaceMetrics::new(80, 24).device_class(), DeviceClass::Desktop);
        assert_eq!(
            SurfaceMetrics::new(40, 30).with_viewport(390, 844).device_class(),
            DeviceClass::MobilePortrait
        );
        assert_eq!(
            SurfaceMetrics::new(90, 20).with_viewport(700, 390).device_class(),
            DeviceClass::MobileLandscape
        );
    }

    #[test]
    fn zero_sized_surface_is_unmeasured() {
        assert!(!SurfaceMetrics::default().is_measured());
        assert!(!SurfaceMetrics::new(80, 0).is_measured());
        assert!(SurfaceMetrics::new(1, 1).is_measured());
    }
}
