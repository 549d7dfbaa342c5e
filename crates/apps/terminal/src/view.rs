use leptos::{ev, *};
use platform_host::unix_time_ms_now;
use terminal_shell::{CellPosition, RenderedLine, RenderedSegment, RunState, TouchSample};

use crate::driver::TerminalDriver;

/// CSS classes for one segment. Colors map to `term-fg-<palette index>`.
pub(crate) fn segment_class(segment: &RenderedSegment) -> String {
    let mut classes = vec!["terminal-seg".to_string()];
    if let Some(fg) = segment.style.fg {
        classes.push(format!("term-fg-{fg}"));
    }
    if segment.style.bold {
        classes.push("term-bold".to_string());
    }
    if segment.style.dim {
        classes.push("term-dim".to_string());
    }
    if segment.style.underline {
        classes.push("term-underline".to_string());
    }
    match segment.state {
        RunState::Plain => {}
        RunState::Active => classes.push("terminal-run terminal-run-active".to_string()),
        RunState::Disabled => classes.push("terminal-run terminal-run-disabled".to_string()),
    }
    if segment.cursor {
        classes.push("terminal-cursor".to_string());
    }
    classes.join(" ")
}

fn touch_sample(cell: CellPosition, touch: Option<web_sys::Touch>) -> Option<TouchSample> {
    let touch = touch?;
    Some(TouchSample {
        cell,
        x: f64::from(touch.client_x()),
        y: f64::from(touch.client_y()),
        time_ms: unix_time_ms_now(),
    })
}

pub(crate) fn pointer_down(driver: &TerminalDriver, cell: CellPosition, ev: &ev::PointerEvent) {
    // Touches resolve as taps on touchend.
    if ev.pointer_type() == "touch" {
        return;
    }
    driver.update(|shell, now_ms| shell.pointer_down(cell, now_ms));
}

pub(crate) fn touch_start(driver: &TerminalDriver, cell: CellPosition, ev: &ev::TouchEvent) {
    if let Some(sample) = touch_sample(cell, ev.touches().get(0)) {
        driver.update(|shell, _| shell.touch_start(sample));
    }
}

pub(crate) fn touch_end(driver: &TerminalDriver, cell: CellPosition, ev: &ev::TouchEvent) {
    match touch_sample(cell, ev.changed_touches().get(0)) {
        Some(sample) => {
            driver.update(|shell, now_ms| shell.touch_end(sample, now_ms));
        }
        None => touch_cancel(driver),
    }
}

pub(crate) fn touch_cancel(driver: &TerminalDriver) {
    driver.update(|shell, _| shell.touch_cancel());
}

/// Segments handle their own presses; the screen only sees presses on blank area.
#[component]
fn TerminalSegment(segment: RenderedSegment, row: usize, driver: TerminalDriver) -> impl IntoView {
    let cell = CellPosition::new(row, segment.col);
    let class = segment_class(&segment);
    let on_pointer = driver.clone();
    let on_touch_start = driver.clone();
    let on_touch_end = driver.clone();
    let on_touch_cancel = driver;

    view! {
        <span
            class=class
            on:pointerdown=move |ev: ev::PointerEvent| {
                ev.stop_propagation();
                pointer_down(&on_pointer, cell, &ev);
            }
            on:touchstart=move |ev: ev::TouchEvent| {
                ev.stop_propagation();
                touch_start(&on_touch_start, cell, &ev);
            }
            on:touchend=move |ev: ev::TouchEvent| {
                ev.stop_propagation();
                touch_end(&on_touch_end, cell, &ev);
            }
            on:touchcancel=move |ev: ev::TouchEvent| {
                ev.stop_propagation();
                touch_cancel(&on_touch_cancel);
            }
        >
            {segment.text}
        </span>
    }
}

#[component]
pub(crate) fn TerminalLine(line: RenderedLine, driver: TerminalDriver) -> impl IntoView {
    let row = line.row;
    if line.segments.is_empty() {
        return view! { <div class="terminal-line">"\u{00a0}"</div> };
    }
    view! {
        <div class="terminal-line">
            {line
                .segments
                .into_iter()
                .map(|segment| {
                    view! { <TerminalSegment segment=segment row=row driver=driver.clone()/> }
                })
                .collect_view()}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use terminal_shell::{CellStyle, RunId};

    fn segment(style: CellStyle, state: RunState, cursor: bool) -> RenderedSegment {
        RenderedSegment {
            text: "help".to_string(),
            col: 2,
            style,
            run: (state != RunState::Plain).then_some(RunId(1)),
            state,
            cursor,
        }
    }

    #[test]
    fn plain_text_only_gets_the_base_class() {
        assert_eq!(
            segment_class(&segment(CellStyle::default(), RunState::Plain, false)),
            "terminal-seg"
        );
    }

    #[test]
    fn styles_and_run_state_become_classes() {
        let style = CellStyle {
            fg: Some(6),
            bold: true,
            underline: true,
            ..CellStyle::default()
        };
        assert_eq!(
            segment_class(&segment(style, RunState::Active, false)),
            "terminal-seg term-fg-6 term-bold term-underline terminal-run terminal-run-active"
        );

        let style = CellStyle {
            dim: true,
            ..CellStyle::default()
        };
        assert_eq!(
            segment_class(&segment(style, RunState::Disabled, true)),
            "terminal-seg term-dim terminal-run terminal-run-disabled terminal-cursor"
        );
    }
}
