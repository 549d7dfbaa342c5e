//! On-screen controls around the terminal: touch game pad and the hint bar.

use leptos::{ev, *};
use terminal_shell_contract::KeyInput;

use crate::driver::TerminalDriver;

/// One touch control button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ControlButton {
    pub key: &'static str,
    pub glyph: &'static str,
    pub label: &'static str,
    pub class: &'static str,
}

const fn button(
    key: &'static str,
    glyph: &'static str,
    label: &'static str,
    class: &'static str,
) -> ControlButton {
    ControlButton {
        key,
        glyph,
        label,
        class,
    }
}

const DIRECTION_BUTTONS: [ControlButton; 4] = [
    button("ArrowUp", "↑", "Up", "mobile-control-up"),
    button("ArrowLeft", "←", "Left", "mobile-control-left"),
    button("ArrowDown", "↓", "Down", "mobile-control-down"),
    button("ArrowRight", "→", "Right", "mobile-control-right"),
];

const ROTATE_BUTTON: ControlButton = button(" ", "↻", "Rotate", "mobile-control-rotate");

/// Commands offered by the hint bar, as `(label, command)`.
pub(crate) const HINT_COMMANDS: [(&str, &str); 3] =
    [("help", "help"), ("contact", "contact"), ("imprint", "imprint")];

/// Buttons shown for `game_id`. Tetris adds a rotate button.
pub(crate) fn control_buttons(game_id: &str) -> Vec<ControlButton> {
    let mut buttons = DIRECTION_BUTTONS.to_vec();
    if game_id == "tetris" {
        buttons.push(ROTATE_BUTTON);
    }
    buttons
}

fn is_touch_device() -> bool {
    #[cfg(target_arch = "wasm32")]
    {
        web_sys::window().is_some_and(|window| window.navigator().max_touch_points() > 0)
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        false
    }
}

/// Direction pad shown on touch devices while a game runs.
#[component]
pub(crate) fn GameControls(driver: TerminalDriver) -> impl IntoView {
    let touch = is_touch_device();
    let game = driver.game();

    move || {
        let game_id = game.get().filter(|_| touch)?;
        let buttons = control_buttons(&game_id)
            .into_iter()
            .map(|control| {
                let driver = driver.clone();
                view! {
                    <button
                        type="button"
                        class=format!("mobile-control-btn {}", control.class)
                        aria-label=control.label
                        on:pointerdown=move |ev: ev::PointerEvent| {
                            ev.prevent_default();
                            driver.update(|shell, now_ms| {
                                shell.handle_key(&KeyInput::plain(control.key), now_ms)
                            });
                        }
                    >
                        {control.glyph}
                    </button>
                }
            })
            .collect_view();
        Some(view! {
            <div class="mobile-game-controls" role="group" aria-label="Game controls">
                {buttons}
            </div>
        })
    }
}

/// Quick command buttons, plus an escape button while something sits over the prompt.
#[component]
pub(crate) fn HintBar(
    driver: TerminalDriver,
    #[prop(into)] escape_visible: Signal<bool>,
    on_escape: Callback<()>,
) -> impl IntoView {
    let escape_driver = driver.clone();
    let hints = HINT_COMMANDS
        .into_iter()
        .map(|(label, command)| {
            let driver = driver.clone();
            view! {
                <button
                    type="button"
                    class="hint-bar-btn"
                    on:click=move |_| {
                        driver.update(|shell, now_ms| shell.inject_command(command, now_ms));
                    }
                >
                    {label}
                </button>
            }
        })
        .collect_view();

    view! {
        <div class="hint-bar">
            {hints}
            <Show when=move || escape_visible.get() fallback=|| ()>
                {
                    let driver = escape_driver.clone();
                    view! {
                        <button
                            type="button"
                            class="hint-bar-btn hint-bar-escape"
                            aria-label="Close"
                            on:click=move |_| {
                                driver.update(|shell, _| shell.exit_game());
                                on_escape.call(());
                            }
                        >
                            "ESC"
                        </button>
                    }
                }
            </Show>
        </div>
    }
}
