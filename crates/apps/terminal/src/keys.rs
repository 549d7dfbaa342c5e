//! DOM keyboard event translation.

use terminal_shell_contract::KeyInput;

const MODIFIER_KEYS: [&str; 8] = [
    "Shift",
    "Control",
    "Alt",
    "AltGraph",
    "Meta",
    "CapsLock",
    "Dead",
    "Unidentified",
];

// Escape is left to the page so it can close the viewer or an overlay.
const EDITOR_KEYS: [&str; 7] = [
    "Enter",
    "Backspace",
    "Tab",
    "ArrowUp",
    "ArrowDown",
    "ArrowLeft",
    "ArrowRight",
];

/// Keys a running game captures at window level so the page does not scroll.
pub const GAME_CAPTURE_KEYS: [&str; 6] =
    ["ArrowUp", "ArrowDown", "ArrowLeft", "ArrowRight", " ", "Escape"];

/// Converts a `KeyboardEvent`'s key and modifier flags, skipping bare modifier presses.
pub fn key_input(key: &str, ctrl: bool, alt: bool, meta: bool, shift: bool) -> Option<KeyInput> {
    if key.is_empty() || MODIFIER_KEYS.contains(&key) {
        return None;
    }
    Some(KeyInput {
        key: key.to_string(),
        ctrl,
        alt,
        meta,
        shift,
    })
}

/// Whether the terminal consumes `input` while the prompt has focus, so the browser must not
/// act on it too. Browser shortcuts using Meta or Alt always pass through.
pub fn prompt_consumes(input: &KeyInput) -> bool {
    if input.meta || input.alt {
        return false;
    }
    if input.ctrl {
        return input.is("l");
    }
    input.printable().is_some() || EDITOR_KEYS.contains(&input.key.as_str())
}

/// Whether a running game swallows `key`.
pub fn game_captures(key: &str) -> bool {
    GAME_CAPTURE_KEYS.contains(&key)
}
