//! Portfolio terminal UI component.
//!
//! [`TerminalApp`] mounts a [`TerminalShell`] into the page: it measures the character grid,
//! routes keyboard, pointer and touch events into the shell, drives game ticks from browser
//! intervals, and reports host actions (viewer and overlay changes) back to the embedding site.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

mod controls;
pub mod driver;
pub mod keys;
pub mod measure;
pub mod scheduler;
mod view;

use std::rc::Rc;

use leptos::{ev::KeyboardEvent, logging::warn, *};
use platform_host::ExternalUrlService;
use terminal_shell::{CellPosition, CommandRegistry, GameSessionId, ShellConfig, TerminalShell};
use terminal_shell_contract::{CommandAction, KeyInput, OverlayKind, Project, ViewerState};

use crate::{
    controls::{GameControls, HintBar},
    driver::TerminalDriver,
    keys::{game_captures, key_input, prompt_consumes},
    measure::{metrics_from_layout, sample_layout},
    scheduler::IntervalTickScheduler,
    view::TerminalLine,
};

/// Animation frames to wait for the container to get a size before giving up until the next
/// window resize.
const MAX_MEASURE_ATTEMPTS: u32 = 120;

fn input_from_event(ev: &KeyboardEvent) -> Option<KeyInput> {
    key_input(
        &ev.key(),
        ev.ctrl_key(),
        ev.alt_key(),
        ev.meta_key(),
        ev.shift_key(),
    )
}

fn measure_until_ready(measure: Rc<dyn Fn() -> bool>, attempts_left: u32) {
    if attempts_left == 0 {
        return;
    }
    request_animation_frame(move || {
        if !measure() {
            measure_until_ready(measure, attempts_left - 1);
        }
    });
}

/// Interactive terminal surface.
///
/// `projects`, `viewer` and `overlay` mirror host state into every command context.
/// `on_escape` runs when the hint bar's escape button is pressed after any game has been
/// stopped; the host decides what else to close.
#[component]
pub fn TerminalApp(
    /// Shell configuration; an invalid config renders an error line instead of a terminal.
    config: ShellConfig,
    /// Registered commands.
    registry: CommandRegistry,
    /// Opens links clicked in terminal output.
    external_url: Rc<dyn ExternalUrlService>,
    /// Projects known to the site.
    #[prop(into)]
    projects: Signal<Vec<Project>>,
    /// Current media viewer state.
    #[prop(into)]
    viewer: Signal<Option<ViewerState>>,
    /// Current overlay.
    #[prop(into)]
    overlay: Signal<Option<OverlayKind>>,
    /// Receives viewer and overlay actions.
    on_host_action: Callback<CommandAction>,
    /// Escape request from the hint bar.
    on_escape: Callback<()>,
    /// Receives the running game id whenever a game starts or stops.
    #[prop(optional)]
    on_game_change: Option<Callback<Option<String>>>,
) -> impl IntoView {
    let driver_slot = store_value(None::<TerminalDriver>);
    let scheduler = IntervalTickScheduler::new(Callback::new(move |session: GameSessionId| {
        driver_slot.with_value(|driver| {
            if let Some(driver) = driver {
                driver.update(|shell, now_ms| shell.tick(session, now_ms));
            }
        });
    }));

    let shell = match TerminalShell::new(config, registry, Rc::new(scheduler)) {
        Ok(shell) => shell,
        Err(err) => {
            warn!("terminal shell configuration rejected: {err}");
            return view! {
                <div class="terminal-shell terminal-shell-error" role="alert">
                    {format!("Terminal unavailable: {err}")}
                </div>
            }
            .into_view();
        }
    };
    let driver = TerminalDriver::new(shell, external_url, on_host_action);
    driver_slot.set_value(Some(driver.clone()));

    create_effect({
        let driver = driver.clone();
        move |_| {
            let (projects, viewer, overlay) = (projects.get(), viewer.get(), overlay.get());
            driver.update(|shell, _| shell.update_context(projects, viewer, overlay));
        }
    });

    let game = driver.game();
    if let Some(on_game_change) = on_game_change {
        create_effect(move |_| on_game_change.call(game.get()));
    }

    let container_ref = create_node_ref::<html::Div>();
    let probe_ref = create_node_ref::<html::Span>();
    let measure: Rc<dyn Fn() -> bool> = Rc::new({
        let driver = driver.clone();
        move || {
            let (Some(container), Some(probe)) =
                (container_ref.get_untracked(), probe_ref.get_untracked())
            else {
                return false;
            };
            let Some(metrics) = sample_layout(&container, &probe).and_then(metrics_from_layout)
            else {
                return false;
            };
            driver.update(|shell, _| {
                shell.resize(metrics);
            });
            true
        }
    });

    container_ref.on_load({
        let measure = Rc::clone(&measure);
        move |container| {
            if let Err(err) = container.focus() {
                warn!("terminal focus failed: {err:?}");
            }
            measure_until_ready(measure, MAX_MEASURE_ATTEMPTS);
        }
    });

    let resize_listener = window_event_listener(ev::resize, {
        let measure = Rc::clone(&measure);
        move |_| {
            measure();
        }
    });
    on_cleanup(move || resize_listener.remove());

    // Games own the keyboard at window level so arrows and space never scroll the page.
    let game_key_listener = window_event_listener(ev::keydown, {
        let driver = driver.clone();
        move |ev| {
            if !driver.game_active() || ev.default_prevented() {
                return;
            }
            let Some(input) = input_from_event(&ev) else {
                return;
            };
            if game_captures(&input.key) {
                ev.prevent_default();
            }
            driver.update(|shell, now_ms| shell.handle_key(&input, now_ms));
        }
    });
    on_cleanup(move || game_key_listener.remove());

    let on_prompt_key = {
        let driver = driver.clone();
        move |ev: KeyboardEvent| {
            if driver.game_active() {
                return;
            }
            let Some(input) = input_from_event(&ev) else {
                return;
            };
            if input.meta || input.alt {
                return;
            }
            if prompt_consumes(&input) {
                ev.prevent_default();
            }
            driver.update(|shell, now_ms| shell.handle_key(&input, now_ms));
        }
    };

    let lines = driver.lines();
    let lines_driver = driver.clone();
    let blank_pointer = driver.clone();
    let blank_touch_start = driver.clone();
    let blank_touch_end = driver.clone();
    let blank_touch_cancel = driver.clone();
    let escape_visible = Signal::derive(move || {
        viewer.get().is_some() || overlay.get().is_some() || game.get().is_some()
    });

    view! {
        <div class="terminal-shell">
            <div
                class="terminal-screen"
                class:terminal-game-active=move || game.get().is_some()
                tabindex="0"
                role="log"
                aria-live="polite"
                node_ref=container_ref
                on:keydown=on_prompt_key
                on:pointerdown=move |ev: ev::PointerEvent| {
                    if blank_pointer.game_active() {
                        view::pointer_down(&blank_pointer, CellPosition::BLANK, &ev);
                    }
                }
                on:touchstart=move |ev: ev::TouchEvent| {
                    if blank_touch_start.game_active() {
                        view::touch_start(&blank_touch_start, CellPosition::BLANK, &ev);
                    }
                }
                on:touchend=move |ev: ev::TouchEvent| {
                    if blank_touch_end.game_active() {
                        view::touch_end(&blank_touch_end, CellPosition::BLANK, &ev);
                    }
                }
                on:touchcancel=move |_| {
                    if blank_touch_cancel.game_active() {
                        view::touch_cancel(&blank_touch_cancel);
                    }
                }
            >
                <span class="terminal-probe" aria-hidden="true" node_ref=probe_ref>"M"</span>
                {move || {
                    lines
                        .get()
                        .into_iter()
                        .map(|line| view! { <TerminalLine line=line driver=lines_driver.clone()/> })
                        .collect_view()
                }}
            </div>
            <GameControls driver=driver.clone()/>
            <HintBar driver=driver escape_visible=escape_visible on_escape=on_escape/>
        </div>
    }
    .into_view()
}
