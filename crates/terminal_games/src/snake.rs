//! Snake.
//!
//! The board starts paused with a three-segment snake in the middle heading right. Clicks or
//! taps toggle pause and restart after a game over. The snake advances one cell per
//! [`SNAKE_STEP_MS`] regardless of how often the session ticks.

use std::collections::VecDeque;

use nu_ansi_term::Color;
use rand::{rngs::SmallRng, Rng, SeedableRng};
use terminal_shell_contract::{GameHandler, KeyInput, SurfaceMetrics, TerminalSurface};

use crate::layout::{self, Playfield};

/// Milliseconds between snake moves.
pub const SNAKE_STEP_MS: u64 = 150;

const DESKTOP_MAX_WIDTH: usize = 30;
const FOOD_ATTEMPTS: usize = 100;
const RUNNING_HINT: &str = "Use arrow keys to move. Click/Tap to pause. Press ESC to exit.";
const PAUSED_HINT: &str = "Use arrow keys to move. Press ESC to exit.";

/// Board coordinate. Signed so a step past the left or top wall is representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    /// Column in cells.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl Point {
    fn offset(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Heading of the snake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards row zero.
    Up,
    /// Away from row zero.
    Down,
    /// Towards column zero.
    Left,
    /// Away from column zero.
    Right,
}

impl Direction {
    fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    fn is_vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }

    fn from_key(key: &KeyInput) -> Option<Self> {
        match key.key.as_str() {
            "ArrowUp" => Some(Self::Up),
            "ArrowDown" => Some(Self::Down),
            "ArrowLeft" => Some(Self::Left),
            "ArrowRight" => Some(Self::Right),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct Board {
    metrics: SurfaceMetrics,
    field: Playfield,
    landscape: bool,
    snake: VecDeque<Point>,
    heading: Direction,
    queued: Direction,
    food: Point,
    score: u32,
    game_over: bool,
    paused: bool,
    last_step_ms: u64,
}

impl Board {
    fn new(metrics: SurfaceMetrics, rng: &mut SmallRng, now_ms: u64) -> Self {
        let field = layout::playfield(metrics, DESKTOP_MAX_WIDTH);
        let start = Point {
            x: (field.width / 2) as i32,
            y: (field.height / 2) as i32,
        };
        let snake = (0..3)
            .map(|offset| Point {
                x: start.x - offset,
                y: start.y,
            })
            .collect();
        let mut board = Self {
            metrics,
            field,
            landscape: layout::is_landscape(metrics),
            snake,
            heading: Direction::Right,
            queued: Direction::Right,
            food: start,
            score: 0,
            game_over: false,
            paused: true,
            last_step_ms: now_ms,
        };
        board.spawn_food(rng);
        board
    }

    fn contains(&self, point: Point) -> bool {
        point.x >= 0
            && point.y >= 0
            && (point.x as usize) < self.field.width
            && (point.y as usize) < self.field.height
    }

    fn occupies(&self, point: Point) -> bool {
        self.snake.iter().any(|segment| *segment == point)
    }

    /// Picks a random free cell, giving up after a bounded number of attempts on a crowded board.
    fn spawn_food(&mut self, rng: &mut SmallRng) {
        for _ in 0..FOOD_ATTEMPTS {
            self.food = Point {
                x: rng.gen_range(0..self.field.width) as i32,
                y: rng.gen_range(0..self.field.height) as i32,
            };
            if !self.occupies(self.food) {
                break;
            }
        }
    }

    fn steer(&mut self, direction: Direction) {
        if direction.is_vertical() != self.heading.is_vertical() {
            self.queued = direction;
        }
    }

    fn advance(&mut self, rng: &mut SmallRng, now_ms: u64) {
        if self.game_over || self.paused {
            return;
        }
        if now_ms.saturating_sub(self.last_step_ms) < SNAKE_STEP_MS {
            return;
        }
        self.last_step_ms = now_ms;
        self.heading = self.queued;

        let Some(head) = self.snake.front().copied() else {
            return;
        };
        let next = head.offset(self.heading);
        if !self.contains(next) || self.occupies(next) {
            self.game_over = true;
            return;
        }
        self.snake.push_front(next);
        if next == self.food {
            self.score += 1;
            self.spawn_food(rng);
        } else {
            self.snake.pop_back();
        }
    }

    fn cell(&self, point: Point) -> String {
        match self.snake.iter().position(|segment| *segment == point) {
            Some(0) => layout::block(Color::Green),
            Some(_) => layout::block(Color::LightGreen),
            None if point == self.food => layout::block(Color::Red),
            None => "  ".to_string(),
        }
    }

    fn draw(&self, surface: &mut dyn TerminalSurface) {
        surface.write("\x1b[2J\x1b[H");
        surface.writeln(&format!(
            "{}  Score: {}",
            Color::Green.bold().paint("SNAKE"),
            Color::Yellow.bold().paint(self.score.to_string())
        ));
        surface.writeln(&layout::border(self.field.width));
        for y in 0..self.field.height {
            let row = (0..self.field.width)
                .map(|x| {
                    self.cell(Point {
                        x: x as i32,
                        y: y as i32,
                    })
                })
                .collect::<String>();
            surface.writeln(&layout::bordered_row(&row));
        }
        surface.writeln(&layout::border(self.field.width));
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

/// Snake game handler.
#[derive(Debug)]
pub struct SnakeGame {
    seed: Option<u64>,
    rng: Option<SmallRng>,
    board: Option<Board>,
}

impl Default for SnakeGame {
    fn default() -> Self {
        Self::new()
    }
}

impl SnakeGame {
    /// Creates a game whose food placement is seeded from the first frame's timestamp.
    pub fn new() -> Self {
        Self {
            seed: None,
            rng: None,
            board: None,
        }
    }

    /// Creates a game with deterministic food placement.
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            rng: None,
            board: None,
        }
    }

    /// Current score, or zero before the first frame.
    pub fn score(&self) -> u32 {
        self.board.as_ref().map_or(0, |board| board.score)
    }

    /// Returns whether the snake has crashed.
    pub fn is_game_over(&self) -> bool {
        self.board.as_ref().is_some_and(|board| board.game_over)
    }

    /// Returns whether the board is paused. A fresh board is paused.
    pub fn is_paused(&self) -> bool {
        self.board.as_ref().map_or(true, |board| board.paused)
    }

    /// Segments from head to tail.
    pub fn snake(&self) -> Vec<Point> {
        self.board
            .as_ref()
            .map(|board| board.snake.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Current food position.
    pub fn food(&self) -> Option<Point> {
        self.board.as_ref().map(|board| board.food)
    }

    /// Playfield in use, once the first frame has been drawn.
    pub fn playfield(&self) -> Option<Playfield> {
        self.board.as_ref().map(|board| board.field)
    }

    /// Builds a fresh board, keeping the generator so restarts do not repeat the last layout.
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

impl GameHandler for SnakeGame {
    fn on_key(&mut self, key: &KeyInput) {
        let Some(board) = self.board.as_mut() else {
            return;
        };
        if board.game_over {
            return;
        }
        if let Some(direction) = Direction::from_key(key) {
            board.steer(direction);
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
            let (metrics, now_ms) = (board.metrics, board.last_step_ms);
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

    fn surface() -> ScreenBuffer {
        let mut screen = ScreenBuffer::new(200);
        screen.set_metrics(SurfaceMetrics::new(80, 30));
        screen
    }

    fn started(seed: u64) -> (SnakeGame, ScreenBuffer) {
        let mut game = SnakeGame::seeded(seed);
        let mut screen = surface();
        game.render(&mut screen, 0);
        (game, screen)
    }

    #[test]
    fn first_frame_is_paused_and_centered() {
        let (game, screen) = started(7);
        assert!(game.is_paused());
        assert_eq!(
            game.playfield(),
            Some(Playfield {
                width: 30,
                height: 20
            })
        );
        assert_eq!(
            game.snake(),
            vec![
                Point { x: 15, y: 10 },
                Point { x: 14, y: 10 },
                Point { x: 13, y: 10 }
            ]
        );
        let text = screen.text_lines();
        assert_eq!(text[0], "SNAKE  Score: 0");
        assert!(text
            .iter()
            .any(|line| line == "PAUSED - Click/Tap to start or resume"));
        assert!(!game.snake().contains(&game.food().expect("food placed")));
    }

    #[test]
    fn moves_only_once_per_step_interval() {
        let (mut game, mut screen) = started(7);
        game.on_click();
        game.render(&mut screen, 66);
        assert_eq!(game.snake()[0], Point { x: 15, y: 10 });
        game.render(&mut screen, 150);
        assert_eq!(game.snake()[0], Point { x: 16, y: 10 });
        game.render(&mut screen, 200);
        assert_eq!(game.snake()[0], Point { x: 16, y: 10 });
    }

    #[test]
    fn reversal_is_ignored_and_turns_apply_on_next_step() {
        let (mut game, mut screen) = started(3);
        game.on_click();
        game.on_key(&KeyInput::plain("ArrowLeft"));
        game.render(&mut screen, 150);
        assert_eq!(game.snake()[0], Point { x: 16, y: 10 });

        game.on_key(&KeyInput::plain("ArrowUp"));
        game.render(&mut screen, 300);
        assert_eq!(game.snake()[0], Point { x: 16, y: 9 });
    }

    #[test]
    fn hitting_the_wall_ends_the_game_and_click_restarts() {
        let (mut game, mut screen) = started(11);
        game.on_click();
        let mut now = 0;
        while !game.is_game_over() && now < 150 * 40 {
            now += 150;
            game.render(&mut screen, now);
        }
        assert!(game.is_game_over());
        assert!(screen.text_lines().iter().any(|line| line == "GAME OVER!"));

        game.on_click();
        assert!(!game.is_game_over());
        assert!(game.is_paused());
        assert_eq!(game.snake().len(), 3);
    }

    #[test]
    fn orientation_change_restarts_the_board() {
        let mut game = SnakeGame::seeded(5);
        let mut screen = ScreenBuffer::new(200);
        screen.set_metrics(SurfaceMetrics::new(42, 60).with_viewport(390, 844));
        game.render(&mut screen, 0);
        game.on_click();
        game.render(&mut screen, 150);
        assert!(!game.is_paused());

        screen.set_metrics(SurfaceMetrics::new(92, 20).with_viewport(700, 390));
        game.render(&mut screen, 300);
        assert!(game.is_paused());
        assert_eq!(
            game.playfield(),
            Some(Playfield {
                width: 27,
                height: 16
            })
        );
    }

    #[test]
    fn keys_are_ignored_after_game_over() {
        let (mut game, _screen) = started(1);
        if let Some(board) = game.board.as_mut() {
            board.game_over = true;
        }
        game.on_key(&KeyInput::plain("ArrowUp"));
        assert_eq!(
            game.board.as_ref().map(|board| board.queued),
            Some(Direction::Right)
        );
    }
}
