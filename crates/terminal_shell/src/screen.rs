//! ANSI-interpreting cell grid used as the shell's render surface.
//!
//! Bytes written to the buffer run through a [`vte::Parser`]; a [`Grid`] implements
//! [`vte::Perform`] and applies printable text, C0 controls, the CSI subset the shell and games
//! emit, and OSC 8 tags that stamp clickable run ids onto cells.
//!
//! | sequence | effect |
//! |---|---|
//! | printable | write at cursor, wrap at `cols` |
//! | `CR` `LF` `BS` `HT` | cursor control |
//! | `CSI n A/B/C/D` | cursor movement |
//! | `CSI r;c H` | position relative to the visible page |
//! | `CSI n K` | erase in line |
//! | `CSI n J` | erase display (mode 2/3 drops scrollback too) |
//! | `CSI ... m` | SGR: reset, bold, dim, underline, 30-37, 39, 90-97 |
//! | `OSC 8 ;; run:<id>` | start/stop tagging cells with a run id |

use std::collections::BTreeSet;

use terminal_shell_contract::{SurfaceMetrics, TerminalSurface};
use unicode_width::UnicodeWidthChar;
use vte::{Params, Parser, Perform};

use crate::clickable::RunId;

const TAB_STOP: usize = 8;

/// Pen attributes for one cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CellStyle {
    /// ANSI palette index (0-15), `None` for the default foreground.
    pub fg: Option<u8>,
    /// Bold weight.
    pub bold: bool,
    /// Faint intensity.
    pub dim: bool,
    /// Underline.
    pub underline: bool,
}

/// One character cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Character shown in the cell.
    pub ch: char,
    /// Pen attributes.
    pub style: CellStyle,
    /// Clickable run covering this cell.
    pub run: Option<RunId>,
    /// Second column of a double-width character.
    pub spacer: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            style: CellStyle::default(),
            run: None,
            spacer: false,
        }
    }
}

/// Cursor position in absolute buffer coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    /// Line index, counted from the oldest retained line.
    pub row: usize,
    /// Column index.
    pub col: usize,
}

/// Grid state mutated by the ANSI parser.
#[derive(Debug)]
pub struct Grid {
    lines: Vec<Vec<Cell>>,
    cursor: Cursor,
    pen: CellStyle,
    link: Option<RunId>,
    metrics: SurfaceMetrics,
    scrollback: usize,
    dropped: usize,
}

impl Grid {
    fn new(scrollback: usize) -> Self {
        Self {
            lines: vec![Vec::new()],
            cursor: Cursor::default(),
            pen: CellStyle::default(),
            link: None,
            metrics: SurfaceMetrics::default(),
            scrollback: scrollback.max(1),
            dropped: 0,
        }
    }

    fn cols(&self) -> Option<usize> {
        match self.metrics.cols {
            0 => None,
            cols => Some(usize::from(cols)),
        }
    }

    fn page_top(&self) -> usize {
        self.lines
            .len()
            .saturating_sub(usize::from(self.metrics.rows).max(1))
    }

    fn ensure_row(&mut self, row: usize) {
        while self.lines.len() <= row {
            self.lines.push(Vec::new());
        }
    }

    fn line_feed(&mut self) {
        self.cursor.row += 1;
        self.ensure_row(self.cursor.row);
        self.trim_scrollback();
    }

    fn trim_scrollback(&mut self) {
        if self.lines.len() <= self.scrollback {
            return;
        }
        let overflow = self.lines.len() - self.scrollback;
        self.lines.drain(0..overflow);
        self.dropped = self.dropped.wrapping_add(overflow);
        self.cursor.row = self.cursor.row.saturating_sub(overflow);
    }

    fn drop_all(&mut self) {
        self.dropped = self.dropped.wrapping_add(self.lines.len());
        self.lines.clear();
        self.lines.push(Vec::new());
        self.cursor = Cursor::default();
    }

    fn put(&mut self, ch: char, width: usize) {
        if let Some(cols) = self.cols() {
            if self.cursor.col + width > cols {
                self.cursor.col = 0;
                self.line_feed();
            }
        }
        let Cursor { row, col } = self.cursor;
        self.ensure_row(row);
        let line = &mut self.lines[row];
        if line.len() < col + width {
            line.resize(col + width, Cell::default());
        }
        line[col] = Cell {
            ch,
            style: self.pen,
            run: self.link,
            spacer: false,
        };
        if width == 2 {
            line[col + 1] = Cell {
                ch: ' ',
                style: self.pen,
                run: self.link,
                spacer: true,
            };
        }
        self.cursor.col += width;
    }

    fn erase_in_line(&mut self, mode: u16) {
        let Cursor { row, col } = self.cursor;
        self.ensure_row(row);
        let line = &mut self.lines[row];
        match mode {
            0 => line.truncate(col),
            1 => {
                let end = (col + 1).min(line.len());
                line[..end].fill(Cell::default());
            }
            _ => line.clear(),
        }
    }

    fn erase_in_display(&mut self, mode: u16) {
        match mode {
            0 => {
                self.erase_in_line(0);
                self.lines.truncate(self.cursor.row + 1);
            }
            1 => {
                let page_top = self.page_top();
                for row in page_top..self.cursor.row {
                    self.lines[row].clear();
                }
                self.erase_in_line(1);
            }
            _ => self.drop_all(),
        }
    }

    fn apply_sgr(&mut self, params: &Params) {
        if params.is_empty() {
            self.pen = CellStyle::default();
            return;
        }
        for param in params.iter() {
            let code = param.first().copied().unwrap_or(0);
            match code {
                0 => self.pen = CellStyle::default(),
                1 => self.pen.bold = true,
                2 => self.pen.dim = true,
                4 => self.pen.underline = true,
                22 => {
                    self.pen.bold = false;
                    self.pen.dim = false;
                }
                24 => self.pen.underline = false,
                30..=37 => self.pen.fg = Some((code - 30) as u8),
                39 => self.pen.fg = None,
                90..=97 => self.pen.fg = Some((code - 90) as u8 + 8),
                _ => {}
            }
        }
    }
}

fn first_param(params: &Params, default: u16) -> u16 {
    params
        .iter()
        .next()
        .and_then(|param| param.first().copied())
        .filter(|value| *value != 0)
        .unwrap_or(default)
}

impl Perform for Grid {
    fn print(&mut self, ch: char) {
        match ch.width() {
            Some(0) | None => {}
            Some(width) => self.put(ch, width.min(2)),
        }
    }

    fn execute(&mut self, byte: u8) {
        match byte {
            b'\n' | 0x0b | 0x0c => self.line_feed(),
            b'\r' => self.cursor.col = 0,
            0x08 => self.cursor.col = self.cursor.col.saturating_sub(1),
            b'\t' => {
                let next = (self.cursor.col / TAB_STOP + 1) * TAB_STOP;
                self.cursor.col = match self.cols() {
                    Some(cols) => next.min(cols.saturating_sub(1)),
                    None => next,
                };
            }
            _ => {}
        }
    }

    fn csi_dispatch(&mut self, params: &Params, intermediates: &[u8], _ignore: bool, action: char) {
        if !intermediates.is_empty() {
            return;
        }
        match action {
            'A' => {
                let count = usize::from(first_param(params, 1));
                let floor = self.page_top();
                self.cursor.row = self.cursor.row.saturating_sub(count).max(floor);
            }
            'B' => {
                self.cursor.row += usize::from(first_param(params, 1));
                self.ensure_row(self.cursor.row);
                self.trim_scrollback();
            }
            'C' => {
                let count = usize::from(first_param(params, 1));
                self.cursor.col += count;
                if let Some(cols) = self.cols() {
                    self.cursor.col = self.cursor.col.min(cols.saturating_sub(1));
                }
            }
            'D' => {
                let count = usize::from(first_param(params, 1));
                self.cursor.col = self.cursor.col.saturating_sub(count);
            }
            'H' | 'f' => {
                let mut values = params.iter().map(|param| param.first().copied().unwrap_or(0));
                let row = usize::from(values.next().unwrap_or(1).max(1)) - 1;
                let col = usize::from(values.next().unwrap_or(1).max(1)) - 1;
                self.cursor.row = self.page_top() + row;
                self.cursor.col = col;
                self.ensure_row(self.cursor.row);
            }
            'J' => self.erase_in_display(first_param(params, 0)),
            'K' => self.erase_in_line(first_param(params, 0)),
            'm' => self.apply_sgr(params),
            _ => {}
        }
    }

    fn osc_dispatch(&mut self, params: &[&[u8]], _bell_terminated: bool) {
        if params.first() != Some(&&b"8"[..]) {
            return;
        }
        let target = params.get(2).copied().unwrap_or_default();
        self.link = std::str::from_utf8(target)
            .ok()
            .and_then(|uri| uri.strip_prefix("run:"))
            .and_then(|id| id.parse().ok())
            .map(RunId);
    }
}

/// Screen buffer implementing [`TerminalSurface`].
pub struct ScreenBuffer {
    parser: Parser,
    grid: Grid,
}

impl std::fmt::Debug for ScreenBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScreenBuffer").field("grid", &self.grid).finish()
    }
}

impl ScreenBuffer {
    /// Creates an unmeasured buffer retaining at most `scrollback` lines.
    pub fn new(scrollback: usize) -> Self {
        Self {
            parser: Parser::new(),
            grid: Grid::new(scrollback),
        }
    }

    /// Applies new dimensions. Existing lines are kept as-is.
    pub fn set_metrics(&mut self, metrics: SurfaceMetrics) {
        self.grid.metrics = metrics;
    }

    /// All retained lines, oldest first.
    pub fn lines(&self) -> &[Vec<Cell>] {
        &self.grid.lines
    }

    /// Cell at a position, if that position holds written content.
    pub fn cell_at(&self, row: usize, col: usize) -> Option<&Cell> {
        self.grid.lines.get(row).and_then(|line| line.get(col))
    }

    /// Run id at a position.
    pub fn run_at(&self, row: usize, col: usize) -> Option<RunId> {
        self.cell_at(row, col).and_then(|cell| cell.run)
    }

    /// Cursor position.
    pub fn cursor(&self) -> Cursor {
        self.grid.cursor
    }

    /// Plain text of one line with trailing blanks removed.
    pub fn line_text(&self, row: usize) -> String {
        self.grid
            .lines
            .get(row)
            .map(|line| {
                line.iter()
                    .filter(|cell| !cell.spacer)
                    .map(|cell| cell.ch)
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })
            .unwrap_or_default()
    }

    /// Total number of lines removed from the top, by scrollback trimming or full clears,
    /// since the buffer was created. Absolute line `n` sits at row `n - dropped_lines()`.
    pub fn dropped_lines(&self) -> usize {
        self.grid.dropped
    }

    /// Run ids stamped on any retained cell.
    pub fn run_ids(&self) -> BTreeSet<RunId> {
        self.grid
            .lines
            .iter()
            .flatten()
            .filter_map(|cell| cell.run)
            .collect()
    }

    /// Plain text of every line.
    pub fn text_lines(&self) -> Vec<String> {
        (0..self.grid.lines.len())
            .map(|row| self.line_text(row))
            .collect()
    }
}

impl TerminalSurface for ScreenBuffer {
    fn metrics(&self) -> SurfaceMetrics {
        self.grid.metrics
    }

    fn write(&mut self, text: &str) {
        self.parser.advance(&mut self.grid, text.as_bytes());
    }

    fn clear(&mut self) {
        self.grid.drop_all();
        self.grid.link = None;
    }

    fn reset(&mut self) {
        self.parser = Parser::new();
        self.clear();
        self.grid.pen = CellStyle::default();
    }

    fn line_count(&self) -> usize {
        self.grid.lines.len()
    }

    fn erase_from(&mut self, line: usize) {
        self.grid.lines.truncate(line);
        self.grid.lines.push(Vec::new());
        self.grid.cursor = Cursor {
            row: self.grid.lines.len() - 1,
            col: 0,
        };
        self.grid.link = None;
    }
}
