//! Core game state and logic
//!
//! A session moves through `NotStarted -> Running <-> Paused -> GameOver`.
//! Gravity is driven by timestamps passed to [`Game::update_at`], so the
//! frame rate of the caller never changes how fast pieces fall.

use crate::board::{Board, Cell};
use crate::generator::PieceGenerator;
use crate::piece::Piece;
use crate::placement::{self, RotateOutcome};
use crate::score::Score;
use std::fmt;
use std::time::{Duration, Instant};

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    NotStarted,
    Running,
    Paused,
    GameOver,
}

/// The six discrete controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveLeft,
    MoveRight,
    SoftDrop,
    Rotate,
    HardDrop,
    TogglePause,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Down,
}

impl Direction {
    fn offset(self) -> (i32, i32) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
        }
    }
}

/// Host hook receiving a score
pub type ScoreCallback = Box<dyn FnMut(u64)>;

/// Read-only view for rendering
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Board rows top to bottom with the falling piece drawn in
    pub cells: Vec<Vec<Cell>>,
    pub current_piece: Option<Piece>,
    pub next_piece: Option<Piece>,
    pub score: u64,
    pub level: u32,
    pub lines: u32,
    pub state: GameState,
    pub game_over: bool,
    pub paused: bool,
}

/// The main game struct
pub struct Game {
    /// Fused cells
    pub board: Board,
    /// Current falling piece
    pub current_piece: Option<Piece>,
    /// Piece on deck
    pub next_piece: Option<Piece>,
    generator: PieceGenerator,
    /// Score tracking
    pub score: Score,
    /// Current game state
    pub state: GameState,
    /// Reference point for the next forced drop
    last_drop: Instant,
    paused_at: Option<Instant>,
    /// Outcome of the most recent rotation attempt
    pub last_rotation: Option<RotateOutcome>,
    on_game_over: Option<ScoreCallback>,
    on_score_change: Option<ScoreCallback>,
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("state", &self.state)
            .field("score", &self.score)
            .field("current_piece", &self.current_piece)
            .field("next_piece", &self.next_piece)
            .finish_non_exhaustive()
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Create an unstarted session with an entropy-seeded generator
    pub fn new() -> Self {
        Self::with_generator(PieceGenerator::new())
    }

    /// Create an unstarted session with a reproducible piece sequence
    pub fn with_seed(seed: u64) -> Self {
        Self::with_generator(PieceGenerator::with_seed(seed))
    }

    pub fn with_generator(generator: PieceGenerator) -> Self {
        Self {
            board: Board::default(),
            current_piece: None,
            next_piece: None,
            generator,
            score: Score::new(),
            state: GameState::NotStarted,
            last_drop: Instant::now(),
            paused_at: None,
            last_rotation: None,
            on_game_over: None,
            on_score_change: None,
        }
    }

    /// Called once with the final score when the session ends
    pub fn on_game_over(mut self, callback: impl FnMut(u64) + 'static) -> Self {
        self.on_game_over = Some(Box::new(callback));
        self
    }

    /// Called with the new total whenever a line clear changes the score
    pub fn on_score_change(mut self, callback: impl FnMut(u64) + 'static) -> Self {
        self.on_score_change = Some(Box::new(callback));
        self
    }

    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    /// Begin a session if none is in progress
    pub fn start_at(&mut self, now: Instant) {
        if matches!(self.state, GameState::NotStarted | GameState::GameOver) {
            self.restart_at(now);
        }
    }

    pub fn restart(&mut self) {
        self.restart_at(Instant::now());
    }

    /// Replace the whole session with a fresh running one
    pub fn restart_at(&mut self, now: Instant) {
        let width = self.board.width();
        let height = self.board.height();

        self.board = Board::new(width, height);
        self.score = Score::new();
        self.current_piece = Some(self.generator.random_piece(width));
        self.next_piece = Some(self.generator.random_piece(width));
        self.state = GameState::Running;
        self.last_drop = now;
        self.paused_at = None;
        self.last_rotation = None;

        tracing::info!(
            current = ?self.current_piece.as_ref().map(|p| p.piece_type),
            next = ?self.next_piece.as_ref().map(|p| p.piece_type),
            "session started"
        );
    }

    /// Time between forced downward moves
    pub fn drop_interval(&self) -> Duration {
        self.score.drop_interval()
    }

    pub fn is_running(&self) -> bool {
        self.state == GameState::Running
    }

    /// Process a control using the current time
    pub fn process_action(&mut self, action: Action) {
        self.process_action_at(action, Instant::now());
    }

    pub fn process_action_at(&mut self, action: Action, now: Instant) {
        match action {
            Action::MoveLeft => {
                self.move_left();
            }
            Action::MoveRight => {
                self.move_right();
            }
            Action::SoftDrop => {
                self.soft_drop();
            }
            Action::Rotate => {
                self.rotate();
            }
            Action::HardDrop => self.hard_drop(),
            Action::TogglePause => self.toggle_pause_at(now),
        }
    }

    /// Advance gravity (call every frame)
    pub fn update(&mut self) {
        self.update_at(Instant::now());
    }

    /// Apply at most one forced drop if the interval has elapsed by `now`
    pub fn update_at(&mut self, now: Instant) {
        if self.state != GameState::Running {
            return;
        }

        if now.saturating_duration_since(self.last_drop) > self.drop_interval() {
            self.move_piece(Direction::Down);
            self.last_drop = now;
        }
    }

    pub fn toggle_pause(&mut self) {
        self.toggle_pause_at(Instant::now());
    }

    /// Pausing freezes the drop timer; resuming picks it up where it left off
    pub fn toggle_pause_at(&mut self, now: Instant) {
        match self.state {
            GameState::Running => {
                self.state = GameState::Paused;
                self.paused_at = Some(now);
                tracing::debug!("paused");
            }
            GameState::Paused => {
                if let Some(paused_at) = self.paused_at.take() {
                    self.last_drop += now.saturating_duration_since(paused_at);
                }
                self.state = GameState::Running;
                tracing::debug!("resumed");
            }
            GameState::NotStarted | GameState::GameOver => {}
        }
    }

    pub fn move_left(&mut self) -> bool {
        self.move_piece(Direction::Left)
    }

    pub fn move_right(&mut self) -> bool {
        self.move_piece(Direction::Right)
    }

    pub fn soft_drop(&mut self) -> bool {
        self.move_piece(Direction::Down)
    }

    /// Move the current piece one cell. A blocked downward move fuses it.
    pub fn move_piece(&mut self, direction: Direction) -> bool {
        if self.state != GameState::Running {
            return false;
        }
        let Some(piece) = &mut self.current_piece else {
            return false;
        };

        let (dx, dy) = direction.offset();
        if placement::try_shift(piece, &self.board, dx, dy) {
            return true;
        }

        if direction == Direction::Down {
            self.fuse_and_advance();
        }
        false
    }

    /// Rotate clockwise with wall kicks
    pub fn rotate(&mut self) -> RotateOutcome {
        if self.state != GameState::Running {
            return RotateOutcome::Blocked;
        }
        let Some(piece) = &mut self.current_piece else {
            return RotateOutcome::Blocked;
        };

        let outcome = placement::try_rotate(piece, &self.board);
        self.last_rotation = Some(outcome);
        outcome
    }

    /// Drop straight to the landing row and fuse immediately
    pub fn hard_drop(&mut self) {
        if self.state != GameState::Running {
            return;
        }
        let Some(piece) = &mut self.current_piece else {
            return;
        };

        piece.position.y = placement::landing_row(piece, &self.board);
        self.fuse_and_advance();
    }

    fn fuse_and_advance(&mut self) {
        let Some(piece) = self.current_piece.take() else {
            return;
        };

        self.board.fuse(&piece);
        tracing::debug!(
            piece = ?piece.piece_type,
            x = piece.position.x,
            y = piece.position.y,
            "fused piece"
        );

        if piece.position.y <= 0 {
            self.state = GameState::GameOver;
            tracing::info!(
                score = self.score.points,
                lines = self.score.lines,
                level = self.score.level,
                "game over"
            );
            if let Some(callback) = &mut self.on_game_over {
                callback(self.score.points);
            }
            return;
        }

        let cleared = self.board.sweep_completed_rows();
        if cleared > 0 {
            let previous_level = self.score.level;
            let award = self.score.add_clear(cleared);
            tracing::debug!(cleared, award, total = self.score.points, "lines cleared");

            if self.score.level != previous_level {
                tracing::info!(
                    level = self.score.level,
                    interval_ms = self.drop_interval().as_millis() as u64,
                    "level up"
                );
            }
            if let Some(callback) = &mut self.on_score_change {
                callback(self.score.points);
            }
        }

        self.current_piece = self.next_piece.take();
        self.next_piece = Some(self.generator.random_piece(self.board.width()));
        self.last_rotation = None;
    }

    /// Board with the falling piece overlaid; never mutates the session
    pub fn snapshot(&self) -> Snapshot {
        let mut cells = self.board.rows().to_vec();
        if let Some(piece) = &self.current_piece {
            for (x, y) in piece.block_positions() {
                if self.board.in_bounds(y, x) {
                    cells[y as usize][x as usize] = Cell::Filled(piece.color);
                }
            }
        }

        Snapshot {
            cells,
            current_piece: self.current_piece.clone(),
            next_piece: self.next_piece.clone(),
            score: self.score.points,
            level: self.score.level,
            lines: self.score.lines,
            state: self.state,
            game_over: self.state == GameState::GameOver,
            paused: self.state == GameState::Paused,
        }
    }
}
