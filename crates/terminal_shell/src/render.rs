//! Conversion of the screen buffer into styled line segments for a view layer.

use crate::{
    clickable::{ClickableRegistry, RunId},
    screen::{Cell, CellStyle, Cursor, ScreenBuffer},
};

/// Interactivity of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunState {
    /// Plain text.
    Plain,
    /// Clickable run whose binding is live.
    Active,
    /// Clickable run superseded by newer output.
    Disabled,
}

/// Contiguous cells sharing style and run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedSegment {
    /// Text of the cells.
    pub text: String,
    /// Column of the first cell.
    pub col: usize,
    /// Shared pen attributes.
    pub style: CellStyle,
    /// Run covering the cells.
    pub run: Option<RunId>,
    /// Interactivity at render time.
    pub state: RunState,
    /// Whether the text cursor sits on this segment.
    pub cursor: bool,
}

/// One buffer line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    /// Buffer line index.
    pub row: usize,
    /// Segments left to right.
    pub segments: Vec<RenderedSegment>,
}

fn run_state(run: Option<RunId>, registry: &ClickableRegistry) -> RunState {
    match run {
        None => RunState::Plain,
        Some(run) if registry.is_interactive(run) => RunState::Active,
        Some(_) => RunState::Disabled,
    }
}

fn push_cell(
    segments: &mut Vec<RenderedSegment>,
    col: usize,
    cell: &Cell,
    state: RunState,
    cursor: bool,
) {
    if let Some(last) = segments.last_mut() {
        if !cursor && !last.cursor && last.style == cell.style && last.run == cell.run {
            if !cell.spacer {
                last.text.push(cell.ch);
            }
            return;
        }
    }
    segments.push(RenderedSegment {
        text: cell.ch.to_string(),
        col,
        style: cell.style,
        run: cell.run,
        state,
        cursor,
    });
}

/// Builds segments for every line. `cursor` marks the cell to highlight, if any.
pub fn render_lines(
    screen: &ScreenBuffer,
    registry: &ClickableRegistry,
    cursor: Option<Cursor>,
) -> Vec<RenderedLine> {
    screen
        .lines()
        .iter()
        .enumerate()
        .map(|(row, cells)| {
            let cursor_col = cursor.filter(|cursor| cursor.row == row).map(|cursor| cursor.col);
            let mut segments = Vec::new();
            for (col, cell) in cells.iter().enumerate() {
                let at_cursor = cursor_col == Some(col);
                push_cell(
                    &mut segments,
                    col,
                    cell,
                    run_state(cell.run, registry),
                    at_cursor,
                );
            }
            if let Some(col) = cursor_col.filter(|col| *col >= cells.len()) {
                if col > cells.len() {
                    segments.push(RenderedSegment {
                        text: " ".repeat(col - cells.len()),
                        col: cells.len(),
                        style: CellStyle::default(),
                        run: None,
                        state: RunState::Plain,
                        cursor: false,
                    });
                }
                segments.push(RenderedSegment {
                    text: " ".to_string(),
                    col,
                    style: CellStyle::default(),
                    run: None,
                    state: RunState::Plain,
                    cursor: true,
                });
            }
            RenderedLine { row, segments }
        })
        .collect()
}
