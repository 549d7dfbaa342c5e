//! Surface measurement.
//!
//! The terminal container and a one-glyph probe are measured in CSS pixels; the character grid
//! is whatever number of whole probe cells fits the container.

use terminal_shell_contract::SurfaceMetrics;

/// Raw pixel measurements taken from the page.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LayoutSample {
    /// Inner width of the terminal container.
    pub width_px: f64,
    /// Inner height of the terminal container.
    pub height_px: f64,
    /// Width of one probe glyph.
    pub cell_width_px: f64,
    /// Line height of the probe glyph.
    pub cell_height_px: f64,
    /// Browser viewport width.
    pub viewport_width_px: f64,
    /// Browser viewport height.
    pub viewport_height_px: f64,
}

fn whole_cells(extent: f64, cell: f64) -> u16 {
    if !(extent.is_finite() && cell.is_finite()) || cell <= 0.0 || extent <= 0.0 {
        return 0;
    }
    (extent / cell).floor().min(f64::from(u16::MAX)) as u16
}

/// Grid size for `sample`, or `None` while the container has no usable size yet.
pub fn metrics_from_layout(sample: LayoutSample) -> Option<SurfaceMetrics> {
    let cols = whole_cells(sample.width_px, sample.cell_width_px);
    let rows = whole_cells(sample.height_px, sample.cell_height_px);
    if cols == 0 || rows == 0 {
        return None;
    }
    Some(SurfaceMetrics::new(cols, rows).with_viewport(
        sample.viewport_width_px.max(0.0) as u32,
        sample.viewport_height_px.max(0.0) as u32,
    ))
}

/// Measures the container and probe elements.
pub fn sample_layout(
    container: &web_sys::HtmlElement,
    probe: &web_sys::HtmlElement,
) -> Option<LayoutSample> {
    #[cfg(target_arch = "wasm32")]
    {
        let window = web_sys::window()?;
        let cell = probe.get_bounding_client_rect();
        let viewport_width_px = window.inner_width().ok()?.as_f64()?;
        let viewport_height_px = window.inner_height().ok()?.as_f64()?;
        Some(LayoutSample {
            width_px: f64::from(container.client_width()),
            height_px: f64::from(container.client_height()),
            cell_width_px: cell.width(),
            cell_height_px: cell.height(),
            viewport_width_px,
            viewport_height_px,
        })
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = (container, probe);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample(width_px: f64, height_px: f64) -> LayoutSample {
        LayoutSample {
            width_px,
            height_px,
            cell_width_px: 8.0,
            cell_height_px: 17.0,
            viewport_width_px: 390.0,
            viewport_height_px: 844.0,
        }
    }

    #[test]
    fn whole_cells_fit_the_container() {
        let metrics = metrics_from_layout(sample(640.0, 340.0)).expect("measured");
        assert_eq!((metrics.cols, metrics.rows), (80, 20));
        assert_eq!(metrics.viewport_width_px, 390);
        assert!(metrics.device_class().is_mobile());
    }

    #[test]
    fn collapsed_containers_are_unmeasured() {
        assert_eq!(metrics_from_layout(sample(0.0, 340.0)), None);
        assert_eq!(metrics_from_layout(sample(640.0, 10.0)), None);
        assert_eq!(
            metrics_from_layout(LayoutSample {
                cell_width_px: 0.0,
                ..sample(640.0, 340.0)
            }),
            None
        );
    }
}
