use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::{
    config::{self, GridConfig},
    grid::{self, Grid},
    piece::{Piece, PieceProvider, RandomPieceProvider},
    scoring,
};

// ============================================================================
// Types
// ============================================================================

/// Column/row offset of a piece's bounding box. `y` may be negative while a
/// piece is entering from above.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i16,
    pub y: i16,
}

impl Position {
    pub fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStatus {
    Idle,
    Playing,
    Paused,
    GameOver,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum GameEvent {
    Started,
    Paused,
    Resumed,
    PieceMoved,
    PieceRotated,
    PieceLocked,
    LinesCleared(u32),
    LevelUp(u32),
    GameOver,
    Reset,
    Resized { width: usize, height: usize },
}

// ============================================================================
// Game
// ============================================================================

/// The rules engine. Owns the field, the pieces and the counters; every
/// command is a synchronous state transition.
pub struct Game {
    status: GameStatus,
    score: u32,
    level: u32,
    lines_cleared: u32,
    grid: Grid,
    current_piece: Option<Piece>,
    current_position: Position,
    ghost_position: Position,
    next_piece: Option<Piece>,
    config: GridConfig,
    piece_provider: Box<dyn PieceProvider>,
    events: Vec<GameEvent>,
}

impl Game {
    pub fn new() -> Self {
        Self::with_provider(Box::new(RandomPieceProvider::new()))
    }

    pub fn with_provider(provider: Box<dyn PieceProvider>) -> Self {
        Self::with_config(GridConfig::default(), provider)
    }

    pub fn with_config(config: GridConfig, provider: Box<dyn PieceProvider>) -> Self {
        let config = GridConfig::clamped(config.width, config.height);
        Self {
            status: GameStatus::Idle,
            score: 0,
            level: 1,
            lines_cleared: 0,
            grid: Grid::new(config.width, config.height),
            current_piece: None,
            current_position: Position::default(),
            ghost_position: Position::default(),
            next_piece: None,
            config,
            piece_provider: provider,
            events: Vec::new(),
        }
    }

    /// A game already in progress on a prepared grid, with `piece` active at
    /// `position`. The next piece is drawn from `provider`.
    ///
    /// The grid is used as given. The configured dimensions are the grid's
    /// clamped into range, so the next `start` may build a different grid.
    pub fn with_grid(
        grid: Grid,
        piece: Piece,
        position: Position,
        provider: Box<dyn PieceProvider>,
    ) -> Self {
        let config = GridConfig::clamped(grid.width(), grid.height());
        let mut game = Self {
            status: GameStatus::Playing,
            score: 0,
            level: 1,
            lines_cleared: 0,
            grid,
            current_piece: Some(piece),
            current_position: position,
            ghost_position: position,
            next_piece: None,
            config,
            piece_provider: provider,
            events: Vec::new(),
        };
        game.next_piece = Some(game.draw_piece());
        game.update_ghost();
        game
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines_cleared(&self) -> u32 {
        self.lines_cleared
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn current_piece(&self) -> Option<&Piece> {
        self.current_piece.as_ref()
    }

    pub fn current_position(&self) -> Position {
        self.current_position
    }

    pub fn ghost_position(&self) -> Position {
        self.ghost_position
    }

    pub fn next_piece(&self) -> Option<&Piece> {
        self.next_piece.as_ref()
    }

    pub fn config(&self) -> GridConfig {
        self.config
    }

    pub fn is_game_over(&self) -> bool {
        self.status == GameStatus::GameOver
    }

    /// Takes and clears all pending events
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // ------------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------------

    /// Starts a fresh game from any status.
    pub fn start(&mut self) {
        self.score = 0;
        self.level = 1;
        self.lines_cleared = 0;
        self.grid = Grid::new(self.config.width, self.config.height);
        self.status = GameStatus::Playing;
        self.next_piece = Some(self.draw_piece());
        self.events.push(GameEvent::Started);
        info!(
            width = self.config.width,
            height = self.config.height,
            "game started"
        );
        self.spawn_next_piece();
    }

    pub fn pause(&mut self) {
        if self.status == GameStatus::Playing {
            self.status = GameStatus::Paused;
            self.events.push(GameEvent::Paused);
        }
    }

    pub fn resume(&mut self) {
        if self.status == GameStatus::Paused {
            self.status = GameStatus::Playing;
            self.events.push(GameEvent::Resumed);
        }
    }

    /// Back to `Idle` on a default-sized grid.
    pub fn reset(&mut self) {
        self.config = GridConfig::default();
        self.reset_to_idle();
        self.events.push(GameEvent::Reset);
        info!("game reset");
    }

    pub fn set_width(&mut self, width: usize) {
        self.resize(config::clamp_width(width), self.config.height);
    }

    pub fn set_height(&mut self, height: usize) {
        self.resize(self.config.width, config::clamp_height(height));
    }

    fn resize(&mut self, width: usize, height: usize) {
        self.config = GridConfig { width, height };
        self.reset_to_idle();
        self.events.push(GameEvent::Resized { width, height });
        info!(width, height, "grid resized");
    }

    fn reset_to_idle(&mut self) {
        self.status = GameStatus::Idle;
        self.score = 0;
        self.level = 1;
        self.lines_cleared = 0;
        self.grid = Grid::new(self.config.width, self.config.height);
        self.current_piece = None;
        self.next_piece = None;
        self.current_position = Position::default();
        self.ghost_position = Position::default();
    }

    // ------------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------------

    pub fn move_left(&mut self) -> bool {
        self.shift(-1)
    }

    pub fn move_right(&mut self) -> bool {
        self.shift(1)
    }

    fn shift(&mut self, dx: i16) -> bool {
        let Some(piece) = self.active_piece() else {
            return false;
        };
        let x = self.current_position.x + dx;
        if !self
            .grid
            .is_valid_position(piece.shape(), x, self.current_position.y)
        {
            return false;
        }
        self.current_position.x = x;
        self.update_ghost();
        self.events.push(GameEvent::PieceMoved);
        trace!(x, y = self.current_position.y, "piece moved");
        true
    }

    /// Moves the piece one row down, or locks it when it cannot descend.
    /// Returns `true` only if the piece moved.
    pub fn move_down(&mut self) -> bool {
        let Some(piece) = self.active_piece() else {
            return false;
        };
        let y = self.current_position.y + 1;
        if self
            .grid
            .is_valid_position(piece.shape(), self.current_position.x, y)
        {
            self.current_position.y = y;
            self.update_ghost();
            self.events.push(GameEvent::PieceMoved);
            trace!(x = self.current_position.x, y, "piece moved");
            true
        } else {
            self.lock_piece();
            false
        }
    }

    /// Gravity step; same rules as [`Game::move_down`].
    pub fn tick(&mut self) {
        self.move_down();
    }

    /// Clockwise rotation in place. Rejected outright on collision.
    pub fn rotate(&mut self) -> bool {
        let Some(piece) = self.active_piece() else {
            return false;
        };
        let rotated = piece.rotated_shape();
        let Position { x, y } = self.current_position;
        if !self.grid.is_valid_position(&rotated, x, y) {
            return false;
        }
        if let Some(piece) = self.current_piece.as_mut() {
            piece.set_shape(rotated);
        }
        self.update_ghost();
        self.events.push(GameEvent::PieceRotated);
        true
    }

    /// Hard drop: falls as far as possible, scoring per row, then locks.
    pub fn hard_drop(&mut self) {
        let Some(piece) = self.active_piece() else {
            return;
        };
        let Position { x, y } = self.current_position;
        let landing = grid::ghost_y(&self.grid, piece.shape(), x, y);
        let rows = (landing - y).max(0) as u32;
        self.current_position.y = landing;
        self.score += rows * scoring::HARD_DROP_POINTS_PER_ROW;
        self.lock_piece();
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    /// The current piece, if commands are accepted right now.
    fn active_piece(&self) -> Option<&Piece> {
        if self.status != GameStatus::Playing {
            return None;
        }
        self.current_piece.as_ref()
    }

    fn draw_piece(&mut self) -> Piece {
        Piece::new(self.piece_provider.next_piece())
    }

    fn lock_piece(&mut self) {
        let Some(piece) = self.current_piece.as_ref() else {
            return;
        };
        let Position { x, y } = self.current_position;
        self.grid.place(piece.shape(), x, y);
        self.events.push(GameEvent::PieceLocked);
        debug!(kind = ?piece.kind(), x, y, "piece locked");

        let lines = self.grid.clear_full_lines();
        if lines > 0 {
            self.lines_cleared += lines;
            self.score += scoring::score(lines, self.level);
            self.events.push(GameEvent::LinesCleared(lines));
            debug!(lines, total = self.lines_cleared, "lines cleared");

            let level = scoring::level_for_lines(self.lines_cleared);
            if level != self.level {
                self.level = level;
                self.events.push(GameEvent::LevelUp(level));
            }
        }

        self.spawn_next_piece();
    }

    fn spawn_next_piece(&mut self) {
        let piece = match self.next_piece.take() {
            Some(piece) => piece,
            None => self.draw_piece(),
        };
        self.next_piece = Some(self.draw_piece());

        let x = (self.config.width / 2) as i16 - (piece.width() / 2) as i16;
        self.current_position = Position::new(x, 0);

        if !self.grid.is_valid_position(piece.shape(), x, 0) {
            self.status = GameStatus::GameOver;
            self.events.push(GameEvent::GameOver);
            info!(score = self.score, lines = self.lines_cleared, "game over");
        }

        self.current_piece = Some(piece);
        self.update_ghost();
    }

    fn update_ghost(&mut self) {
        if let Some(piece) = self.current_piece.as_ref() {
            let Position { x, y } = self.current_position;
            self.ghost_position = Position::new(x, grid::ghost_y(&self.grid, piece.shape(), x, y));
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Test Helpers
// ============================================================================

pub mod test_helpers {
    use super::*;
    use crate::piece::{PieceType, SequencePieceProvider};

    pub fn empty_grid() -> Grid {
        Grid::new(config::DEFAULT_GRID_WIDTH, config::DEFAULT_GRID_HEIGHT)
    }

    pub fn fill_row(grid: &mut Grid, y: usize) {
        for x in 0..grid.width() {
            grid.set_cell(x, y, grid::FILLED);
        }
    }

    pub fn fill_row_with_gap(grid: &mut Grid, y: usize, gap_x: usize) {
        for x in 0..grid.width() {
            if x != gap_x {
                grid.set_cell(x, y, grid::FILLED);
            }
        }
    }

    pub fn sequence(pieces: &[PieceType]) -> Box<dyn PieceProvider> {
        Box::new(SequencePieceProvider::new(pieces.to_vec()))
    }

    /// A game with `kind` active at `(x, y)` on `grid`; every later piece is
    /// a square.
    pub fn game_with(grid: Grid, kind: PieceType, x: i16, y: i16) -> Game {
        Game::with_grid(
            grid,
            Piece::new(kind),
            Position::new(x, y),
            sequence(&[PieceType::Square]),
        )
    }
}
