//! Line editing and history recall.

use terminal_shell_contract::KeyInput;

/// Screen-level consequence of one keystroke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEffect {
    /// Nothing to draw.
    None,
    /// Echo text at the cursor.
    Echo(String),
    /// Erase the last echoed character.
    EraseLast,
    /// Redraw the prompt line with this buffer.
    RedrawLine(String),
    /// Print the candidate names, then redraw the prompt with the unchanged buffer.
    ShowCompletions(Vec<String>),
    /// Dispatch this trimmed, non-empty line.
    Submit(String),
    /// Enter on an empty buffer: move to a fresh prompt.
    EmptySubmit,
    /// `Ctrl+C`: print `^C` and a fresh prompt.
    Cancel,
    /// `Ctrl+L`: clear the visible surface and redraw the prompt.
    ClearScreen,
}

/// Buffer, history, and recall cursor for the normal line-editing mode.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InputState {
    buffer: String,
    history: Vec<String>,
    cursor: usize,
}

impl InputState {
    /// Creates an empty input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current line buffer.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Submitted lines, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Recall cursor in `0..=history.len()`.
    pub fn history_cursor(&self) -> usize {
        self.cursor
    }

    /// Appends a line to history and parks the recall cursor one past the end.
    pub fn record_submission(&mut self, line: &str) {
        self.history.push(line.to_string());
        self.cursor = self.history.len();
        self.buffer.clear();
    }

    /// Discards the buffer.
    pub fn clear_buffer(&mut self) {
        self.buffer.clear();
    }

    /// Applies one keystroke.
    ///
    /// `complete` returns the registered command names starting with a prefix.
    pub fn handle_key(
        &mut self,
        key: &KeyInput,
        complete: impl FnOnce(&str) -> Vec<String>,
    ) -> InputEffect {
        if key.ctrl && !key.alt && !key.meta {
            if key.is("c") {
                self.buffer.clear();
                return InputEffect::Cancel;
            }
            if key.is("l") {
                return InputEffect::ClearScreen;
            }
            return InputEffect::None;
        }

        match key.key.as_str() {
            "Enter" => {
                let line = self.buffer.trim().to_string();
                if line.is_empty() {
                    self.buffer.clear();
                    return InputEffect::EmptySubmit;
                }
                self.record_submission(&line);
                InputEffect::Submit(line)
            }
            "Backspace" => match self.buffer.pop() {
                Some(_) => InputEffect::EraseLast,
                None => InputEffect::None,
            },
            "Tab" => {
                if self.buffer.is_empty() {
                    return InputEffect::None;
                }
                let mut matches = complete(&self.buffer);
                match matches.len() {
                    0 => InputEffect::None,
                    1 => {
                        let name = matches.remove(0);
                        let suffix = name
                            .get(self.buffer.len()..)
                            .unwrap_or_default()
                            .to_string();
                        if suffix.is_empty() {
                            return InputEffect::None;
                        }
                        self.buffer.push_str(&suffix);
                        InputEffect::Echo(suffix)
                    }
                    _ => InputEffect::ShowCompletions(matches),
                }
            }
            "ArrowUp" => {
                if self.history.is_empty() {
                    return InputEffect::None;
                }
                self.cursor = self.cursor.saturating_sub(1);
                self.buffer = self.history[self.cursor].clone();
                InputEffect::RedrawLine(self.buffer.clone())
            }
            "ArrowDown" => {
                if self.history.is_empty() {
                    return InputEffect::None;
                }
                if self.cursor + 1 < self.history.len() {
                    self.cursor += 1;
                    self.buffer = self.history[self.cursor].clone();
                } else {
                    self.cursor = self.history.len();
                    self.buffer.clear();
                }
                InputEffect::RedrawLine(self.buffer.clone())
            }
            _ => match key.printable() {
                Some(ch) => {
                    self.buffer.push(ch);
                    InputEffect::Echo(ch.to_string())
                }
                None => InputEffect::None,
            },
        }
    }
}
