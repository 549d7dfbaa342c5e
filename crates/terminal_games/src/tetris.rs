//! Tetris.
//!
//! Seven tetrominoes fall into a board sized by [`crate::layout::playfield`]. Full rows clear for
//! `lines * 100 * level` points and every ten cleared lines raise the level, shortening the fall
//! interval down to [`MIN_FALL_MS`].

use nu_ansi_term::Color;
use rand::{rngs::SmallRng, Rng, SeedableRng};
use terminal_shell_contract::{GameHandler, KeyInput, SurfaceMetrics, TerminalSurface};

use crate::layout::{self, Playfield};

/// Fall interval at level one, in milliseconds.
pub const BASE_FALL_MS: u64 = 800;
/// Fastest fall interval.
pub const MIN_FALL_MS: u64 = 200;
const FALL_STEP_PER_LEVEL_MS: u64 = 50;
const LINES_PER_LEVEL: u32 = 10;
const DESKTOP_MAX_WIDTH: usize = 10;
const RUNNING_HINT: &str =
    "Controls: <- -> v (move), ^/Space (rotate), Click/Tap or P (pause), ESC (exit)";
const PAUSED_HINT: &str = "Controls: <- -> v (move), ^/Space (rotate), P (pause), ESC (exit)";

/// The seven tetromino kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tetromino {
    /// Four in a row.
    I,
    /// Square.
    O,
    /// T shape.
    T,
    /// S shape.
    S,
    /// Z shape.
    Z,
    /// J shape.
    J,
    /// L shape.
    L,
}

impl Tetromino {
    /// Every kind, in draw order.
    pub const ALL: [Self; 7] = [
        Self::I,
        Self::O,
        Self::T,
        Self::S,
        Self::Z,
        Self::J,
        Self::L,
    ];

    /// Spawn orientation as rows of filled flags.
    pub fn shape(self) -> Shape {
        let rows: &[&[u8]] = match self {
            Self::I => &[&[1, 1, 1, 1]],
            Self::O => &[&[1, 1], &[1, 1]],
            Self::T => &[&[0, 1, 0], &[1, 1, 1]],
            Self::S => &[&[0, 1, 1], &[1, 1, 0]],
            Self::Z => &[&[1, 1, 0], &[0, 1, 1]],
            Self::J => &[&[1, 0, 0], &[1, 1, 1]],
            Self::L => &[&[0, 0, 1], &[1, 1, 1]],
        };
        Shape(
            rows.iter()
                .map(|row| row.iter().map(|cell| *cell == 1).collect())
                .collect(),
        )
    }

    /// Color used while the piece is falling and in the preview.
    pub fn color(self) -> Color {
        match self {
            Self::I => Color::Cyan,
            Self::O => Color::Yellow,
            Self::T => Color::Purple,
            Self::S => Color::Green,
            Self::Z => Color::Red,
            Self::J => Color::Blue,
            Self::L => Color::White,
        }
    }
}

/// Rectangular piece mask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape(Vec<Vec<bool>>);

impl Shape {
    /// Width in cells.
    pub fn width(&self) -> usize {
        self.0.first().map_or(0, Vec::len)
    }

    /// Height in cells.
    pub fn height(&self) -> usize {
        self.0.len()
    }

    /// Clockwise quarter turn.
    pub fn rotated(&self) -> Self {
        let rows = self.height();
        Shape(
            (0..self.width())
                .map(|x| (0..rows).map(|y| self.0[rows - 1 - y][x]).collect())
                .collect(),
        )
    }

    /// Offsets of the filled cells.
    fn filled(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.0.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, filled)| **filled)
                .map(move |(x, _)| (x as i32, y as i32))
        })
    }
}

#[derive(Debug, Clone)]
struct ActivePiece {
    kind: Tetromino,
    shape: Shape,
    x: i32,
    y: i32,
}

impl ActivePiece {
    fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape
            .filled()
            .map(move |(dx, dy)| (self.x + dx, self.y + dy))
    }
}

#[derive(Debug)]
struct Board {
    metrics: SurfaceMetrics,
    field: Playfield,
    landscape: bool,
    locked: Vec<Vec<bool>>,
    piece: ActivePiece,
    next: Tetromino,
    score: u32,
    level: u32,
    lines: u32,
    game_over: bool,
    paused: bool,
    last_fall_ms: u64,
}

impl Board {
    fn new(metrics: SurfaceMetrics, rng: &mut SmallRng, now_ms: u64) -> Self {
        let field = layout::playfield(metrics, DESKTOP_MAX_WIDTH);
        let first = random_piece(rng);
        let mut board = Self {
            metrics,
            field,
            landscape: layout::is_landscape(metrics),
            locked: vec![vec![false; field.width]; field.height],
            piece: ActivePiece {
                kind: first,
                shape: first.shape(),
                x: 0,
                y: 0,
            },
            next: first,
            score: 0,
            level: 1,
            lines: 0,
            game_over: false,
            paused: true,
            last_fall_ms: now_ms,
        };
        board.spawn(rng);
        board
    }

    fn fall_interval_ms(&self) -> u64 {
        BASE_FALL_MS
            .saturating_sub(u64::from(self.level - 1) * FALL_STEP_PER_LEVEL_MS)
            .max(MIN_FALL_MS)
    }

    /// Promotes the preview piece. Spawning into locked cells ends the game.
    fn spawn(&mut self, rng: &mut SmallRng) {
        let kind = self.next;
        let shape = kind.shape();
        let x = (self.field.width / 2) as i32 - (shape.width() / 2) as i32;
        self.piece = ActivePiece {
            kind,
            shape,
            x,
            y: 0,
        };
        self.next = random_piece(rng);
        if self.collides(&self.piece.shape, self.piece.x, self.piece.y) {
            self.game_over = true;
        }
    }

    /// Cells above the board do not collide, so pieces may rotate partly off the top.
    fn collides(&self, shape: &Shape, x: i32, y: i32) -> bool {
        shape.filled().any(|(dx, dy)| {
            let (cx, cy) = (x + dx, y + dy);
            if cx < 0 || cx >= self.field.width as i32 || cy >= self.field.height as i32 {
                return true;
            }
            cy >= 0 && self.locked[cy as usize][cx as usize]
        })
    }

    fn try_move(&mut self, dx: i32, dy: i32) -> bool {
        let (x, y) = (self.piece.x + dx, self.piece.y + dy);
        if self.collides(&self.piece.shape, x, y) {
            return false;
        }
        self.piece.x = x;
        self.piece.y = y;
        true
    }

    fn rotate(&mut self) {
        let rotated = self.piece.shape.rotated();
        if !self.collides(&rotated, self.piece.x, self.piece.y) {
            self.piece.shape = rotated;
        }
    }

    fn lock(&mut self, rng: &mut SmallRng) {
        let cells = self.piece.cells().collect::<Vec<_>>();
        for (x, y) in cells {
            if y >= 0 {
                self.locked[y as usize][x as usize] = true;
            }
        }
        self.clear_lines();
        self.spawn(rng);
    }

    fn clear_lines(&mut self) {
        let before = self.locked.len();
        self.locked.retain(|row| !row.iter().all(|cell| *cell));
        let cleared = before - self.locked.len();
        if cleared == 0 {
            return;
        }
        let width = self.field.width;
        for _ in 0..cleared {
            self.locked.insert(0, vec![false; width]);
        }
        let cleared = cleared as u32;
        self.lines += cleared;
        self.score += cleared * 100 * self.level;
        self.level = self.lines / LINES_PER_LEVEL + 1;
    }

    fn advance(&mut self, rng: &mut SmallRng, now_ms: u64) {
        if self.game_over || self.paused {
            return;
        }
        if now_ms.saturating_sub(self.last_fall_ms) < self.fall_interval_ms() {
            return;
        }
        if !self.try_move(0, 1) {
            self.lock(rng);
        }
        self.last_fall_ms = now_ms;
    }

    fn on_key(&mut self, key: &KeyInput) {
        if self.game_over {
            return;
        }
        if key.is("p") {
            self.paused = !self.paused;
            return;
        }
        if self.paused {
            return;
        }
        match key.key.as_str() {
            "ArrowLeft" => {
                self.try_move(-1, 0);
            }
            "ArrowRight" => {
                self.try_move(1, 0);
            }
            "ArrowDown" => {
                self.try_move(0, 1);
            }
            "ArrowUp" | " " => self.rotate(),
            _ => {}
        }
    }

    fn draw(&self, surface: &mut dyn TerminalSurface) {
        let mut display = self
            .locked
            .iter()
            .map(|row| {
                row.iter()
                    .map(|filled| {
                        if *filled {
                            layout::block(Color::White)
                        } else {
                            "  ".to_string()
                        }
                    })
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();
        for (x, y) in self.piece.cells() {
            if x >= 0 && y >= 0 {
                if let Some(cell) = display
                    .get_mut(y as usize)
                    .and_then(|row| row.get_mut(x as usize))
                {
                    *cell = layout::block(self.piece.kind.color());
                }
            }
        }

        surface.write("\x1b[2J\x1b[H");
        surface.writeln(&format!(
            "{}  Score: {}  Level: {}  Lines: {}",
            Color::Purple.bold().paint("TETRIS"),
            Color::Yellow.bold().paint(self.score.to_string()),
            Color::Cyan.bold().paint(self.level.to_string()),
            Color::Green.bold().paint(self.lines.to_string())
        ));
        surface.writeln("");
        surface.writeln(&layout::border(self.field.width));
        for row in &display {
            surface.writeln(&layout::bordered_row(&row.concat()));
        }
        surface.writeln(&layout::border(self.field.width));

        surface.writeln("");
        let preview = self.next.shape();
        for (index, row) in preview.0.iter().enumerate() {
            let label = if index == 0 { "Next: " } else { "      " };
            let cells = row
                .iter()
                .map(|filled| {
                    if *filled {
                        layout::block(self.next.color())
                    } else {
                        "  ".to_string()
                    }
                })
                .collect::<String>();
            surface.writeln(&format!("{label}{cells}"));
        }

        surface.writeln("");
        for line in layout::status_lines(
            self.game_over,
            self.paused,
            self.score,
            RUNNING_HINT,
            PAUSED_HINT,
        ) {
            surface.writeln(&line);
        }
    }
}

fn random_piece(rng: &mut SmallRng) -> Tetromino {
    Tetromino::ALL[rng.gen_range(0..Tetromino::ALL.len())]
}

/// Tetris game handler.
#[derive(Debug, Default)]
pub struct TetrisGame {
    seed: Option<u64>,
    rng: Option<SmallRng>,
    board: Option<Board>,
}

impl TetrisGame {
    /// Creates a game whose piece sequence is seeded from the first frame's timestamp.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a game with a deterministic piece sequence.
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Current score.
    pub fn score(&self) -> u32 {
        self.board.as_ref().map_or(0, |board| board.score)
    }

    /// Current level, starting at one.
    pub fn level(&self) -> u32 {
        self.board.as_ref().map_or(1, |board| board.level)
    }

    /// Total cleared lines.
    pub fn lines(&self) -> u32 {
        self.board.as_ref().map_or(0, |board| board.lines)
    }

    /// Returns whether a new piece could not spawn.
    pub fn is_game_over(&self) -> bool {
        self.board.as_ref().is_some_and(|board| board.game_over)
    }

    /// Returns whether the board is paused. A fresh board is paused.
    pub fn is_paused(&self) -> bool {
        self.board.as_ref().map_or(true, |board| board.paused)
    }

    /// Board size, once the first frame has been drawn.
    pub fn playfield(&self) -> Option<Playfield> {
        self.board.as_ref().map(|board| board.field)
    }

    fn restart(&mut self, metrics: SurfaceMetrics, now_ms: u64) {
        let seed = self.seed.unwrap_or(now_ms);
        let rng = self
            .rng
            .get_or_insert_with(|| SmallRng::seed_from_u64(seed));
        self.board = Some(Board::new(metrics, rng, now_ms));
    }

    fn needs_layout(&self, metrics: SurfaceMetrics) -> bool {
        match &self.board {
            None => true,
            Some(board) => {
                board.landscape != layout::is_landscape(metrics)
                    || board.field != layout::playfield(metrics, DESKTOP_MAX_WIDTH)
            }
        }
    }
}

impl GameHandler for TetrisGame {
    fn on_key(&mut self, key: &KeyInput) {
        if let Some(board) = self.board.as_mut() {
            board.on_key(key);
        }
    }

    fn on_exit(&mut self) {
        self.board = None;
    }

    fn accepts_clicks(&self) -> bool {
        true
    }

    fn on_click(&mut self) {
        let Some(board) = self.board.as_mut() else {
            return;
        };
        if board.game_over {
            let (metrics, now_ms) = (board.metrics, board.last_fall_ms);
            self.restart(metrics, now_ms);
        } else {
            board.paused = !board.paused;
        }
    }

    fn render(&mut self, surface: &mut dyn TerminalSurface, now_ms: u64) {
        let metrics = surface.metrics();
        if self.needs_layout(metrics) {
            self.restart(metrics, now_ms);
        }
        let (Some(board), Some(rng)) = (self.board.as_mut(), self.rng.as_mut()) else {
            return;
        };
        board.advance(rng, now_ms);
        board.draw(surface);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use terminal_shell::ScreenBuffer;

    fn started(seed: u64) -> (TetrisGame, ScreenBuffer) {
        let mut game = TetrisGame::seeded(seed);
        let mut screen = ScreenBuffer::new(200);
        screen.set_metrics(SurfaceMetrics::new(80, 40));
        game.render(&mut screen, 0);
        (game, screen)
    }

    fn board(game: &mut TetrisGame) -> &mut Board {
        game.board.as_mut().expect("board initialized by first render")
    }

    #[test]
    fn rotation_turns_clockwise() {
        let rotated = Tetromino::J.shape().rotated();
        assert_eq!(
            rotated,
            Shape(vec![
                vec![true, true],
                vec![true, false],
                vec![true, false]
            ])
        );
        let line = Tetromino::I.shape().rotated();
        assert_eq!((line.width(), line.height()), (1, 4));
    }

    #[test]
    fn first_frame_shows_header_and_preview() {
        let (game, screen) = started(9);
        assert!(game.is_paused());
        assert_eq!(
            game.playfield(),
            Some(Playfield {
                width: 10,
                height: 20
            })
        );
        let text = screen.text_lines();
        assert_eq!(text[0], "TETRIS  Score: 0  Level: 1  Lines: 0");
        assert!(text.iter().any(|line| line.starts_with("Next: ")));
        assert!(text.iter().any(|line| line == PAUSED_HINT));
    }

    #[test]
    fn keys_wait_for_unpause_and_p_toggles() {
        let (mut game, _screen) = started(4);
        let x = board(&mut game).piece.x;
        game.on_key(&KeyInput::plain("ArrowLeft"));
        assert_eq!(board(&mut game).piece.x, x);

        game.on_key(&KeyInput::plain("P"));
        assert!(!game.is_paused());
        game.on_key(&KeyInput::plain("ArrowLeft"));
        assert_eq!(board(&mut game).piece.x, x - 1);
        game.on_key(&KeyInput::plain("p"));
        assert!(game.is_paused());
    }

    #[test]
    fn pieces_fall_on_the_level_interval() {
        let (mut game, mut screen) = started(4);
        game.on_click();
        game.render(&mut screen, 799);
        assert_eq!(board(&mut game).piece.y, 0);
        game.render(&mut screen, 800);
        assert_eq!(board(&mut game).piece.y, 1);
    }

    #[test]
    fn clearing_lines_scores_and_levels_up() {
        let (mut game, mut screen) = started(2);
        game.on_click();
        {
            let board = board(&mut game);
            board.lines = 9;
            let width = board.field.width;
            for y in 18..20 {
                board.locked[y] = (0..width).map(|x| x >= 2).collect();
            }
            board.piece = ActivePiece {
                kind: Tetromino::O,
                shape: Tetromino::O.shape(),
                x: 0,
                y: 16,
            };
        }
        game.render(&mut screen, 800);
        game.render(&mut screen, 1600);
        assert_eq!(board(&mut game).piece.y, 18);
        game.render(&mut screen, 2400);

        assert_eq!(game.lines(), 11);
        assert_eq!(game.score(), 200);
        assert_eq!(game.level(), 2);
        assert_eq!(board(&mut game).fall_interval_ms(), 750);
        assert!(board(&mut game)
            .locked
            .iter()
            .all(|row| row.iter().all(|cell| !cell)));
    }

    #[test]
    fn blocked_spawn_ends_the_game_and_click_restarts() {
        let (mut game, mut screen) = started(6);
        {
            let board = board(&mut game);
            let width = board.field.width;
            for row in board.locked.iter_mut().take(4) {
                *row = (0..width).map(|x| x + 1 < width).collect();
            }
            board.piece = ActivePiece {
                kind: Tetromino::O,
                shape: Tetromino::O.shape(),
                x: 0,
                y: 18,
            };
            board.paused = false;
        }
        game.render(&mut screen, 800);
        assert!(game.is_game_over());
        assert!(screen.text_lines().iter().any(|line| line == "GAME OVER!"));

        game.on_key(&KeyInput::plain("p"));
        assert!(game.is_game_over());
        game.on_click();
        assert!(!game.is_game_over());
        assert_eq!(game.score(), 0);
    }
}
