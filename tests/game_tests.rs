//! Tests for the game engine
//!
//! Test categories:
//! - Lifecycle and status transitions
//! - Resizing
//! - Piece movement and collision
//! - Rotation
//! - Locking, hard drop and line clearing through the engine
//! - Leveling
//! - Game over detection
//! - Ghost position

use blockfall::{
    config::GridConfig,
    game::test_helpers::*,
    grid::{Grid, FILLED},
    piece::{rotate, Piece, PieceType},
    Game, GameEvent, GameStatus, Position,
};

fn filled(game: &Game, cells: &[(usize, usize)]) -> bool {
    cells.iter().all(|&(x, y)| game.grid().cell(x, y) == FILLED)
}

// ============================================================================
// Lifecycle Tests
// ============================================================================

mod lifecycle {
    use super::*;

    #[test]
    fn new_game_is_idle_and_empty() {
        let game = Game::new();

        assert_eq!(game.status(), GameStatus::Idle);
        assert_eq!(game.score(), 0);
        assert_eq!(game.level(), 1);
        assert_eq!(game.lines_cleared(), 0);
        assert!(game.current_piece().is_none());
        assert!(game.next_piece().is_none());
        assert_eq!(game.grid().width(), 10);
        assert_eq!(game.grid().height(), 20);
        assert_eq!(game.grid().filled_count(), 0);
    }

    #[test]
    fn start_begins_playing_with_two_pieces() {
        let mut game = Game::with_provider(sequence(&[PieceType::TShape, PieceType::Square]));
        game.start();

        assert_eq!(game.status(), GameStatus::Playing);
        assert_eq!(game.score(), 0);
        assert_eq!(game.level(), 1);
        assert_eq!(game.lines_cleared(), 0);
        assert_eq!(game.current_piece().map(Piece::kind), Some(PieceType::TShape));
        assert_eq!(game.next_piece().map(Piece::kind), Some(PieceType::Square));
        assert_eq!(game.current_position(), Position::new(4, 0));
        assert_eq!(game.ghost_position(), Position::new(4, 18));
        assert!(game.take_events().contains(&GameEvent::Started));
    }

    #[test]
    fn start_with_random_pieces_yields_both_pieces() {
        let mut game = Game::new();
        game.start();

        assert_eq!(game.status(), GameStatus::Playing);
        assert!(game.current_piece().is_some());
        assert!(game.next_piece().is_some());
    }

    #[test]
    fn start_resets_a_running_game() {
        let mut game = Game::with_provider(sequence(&[PieceType::Square]));
        game.start();
        game.hard_drop();
        assert!(game.score() > 0);
        assert_eq!(game.grid().filled_count(), 4);

        game.start();

        assert_eq!(game.status(), GameStatus::Playing);
        assert_eq!(game.score(), 0);
        assert_eq!(game.grid().filled_count(), 0);
    }

    #[test]
    fn pause_and_resume() {
        let mut game = Game::with_provider(sequence(&[PieceType::Square]));
        game.start();

        game.pause();
        assert_eq!(game.status(), GameStatus::Paused);
        game.pause();
        assert_eq!(game.status(), GameStatus::Paused);

        game.resume();
        assert_eq!(game.status(), GameStatus::Playing);
        game.resume();
        assert_eq!(game.status(), GameStatus::Playing);
    }

    #[test]
    fn pause_is_ignored_when_idle() {
        let mut game = Game::new();
        game.pause();
        assert_eq!(game.status(), GameStatus::Idle);
        assert!(game.take_events().is_empty());
    }

    #[test]
    fn commands_are_ignored_while_paused() {
        let mut game = Game::with_provider(sequence(&[PieceType::TShape]));
        game.start();
        game.pause();
        let before = game.snapshot();

        assert!(!game.move_left());
        assert!(!game.move_right());
        assert!(!game.move_down());
        assert!(!game.rotate());
        game.tick();
        game.hard_drop();

        assert_eq!(game.snapshot(), before);
    }

    #[test]
    fn commands_are_ignored_when_idle() {
        let mut game = Game::new();
        let before = game.snapshot();

        assert!(!game.move_left());
        assert!(!game.move_down());
        assert!(!game.rotate());
        game.hard_drop();
        game.tick();

        assert_eq!(game.snapshot(), before);
        assert!(game.take_events().is_empty());
    }

    #[test]
    fn reset_returns_to_idle() {
        let mut game = Game::with_provider(sequence(&[PieceType::Square]));
        game.set_width(15);
        game.set_height(30);
        game.start();
        game.hard_drop();
        game.take_events();

        game.reset();

        assert_eq!(game.status(), GameStatus::Idle);
        assert_eq!(game.score(), 0);
        assert!(game.current_piece().is_none());
        assert!(game.next_piece().is_none());
        assert_eq!(game.grid().filled_count(), 0);
        assert_eq!((game.grid().width(), game.grid().height()), (10, 20));
        assert_eq!(game.config(), GridConfig::default());
        assert_eq!(game.take_events(), vec![GameEvent::Reset]);
    }

    #[test]
    fn start_after_reset_uses_default_dimensions() {
        let mut game = Game::with_provider(sequence(&[PieceType::Square]));
        game.set_width(6);
        game.reset();
        game.start();

        assert_eq!(game.grid().width(), 10);
        assert_eq!(game.current_position(), Position::new(4, 0));
    }

    #[test]
    fn prepared_grid_config_is_clamped() {
        let grid = Grid::from_cells(vec![vec![0; 3]; 3]);
        let mut game = Game::with_grid(
            grid,
            Piece::new(PieceType::Square),
            Position::new(0, 0),
            sequence(&[PieceType::Square]),
        );

        assert_eq!(game.grid().width(), 3);
        assert_eq!(game.config(), GridConfig { width: 4, height: 4 });

        game.start();
        assert_eq!((game.grid().width(), game.grid().height()), (4, 4));
    }
}

// ============================================================================
// Resize Tests
// ============================================================================

mod resize {
    use super::*;

    #[test]
    fn width_is_clamped() {
        let mut game = Game::new();

        game.set_width(2);
        assert_eq!(game.grid().width(), 4);

        game.set_width(50);
        assert_eq!(game.grid().width(), 30);
    }

    #[test]
    fn height_is_clamped() {
        let mut game = Game::new();

        game.set_height(2);
        assert_eq!(game.grid().height(), 4);

        game.set_height(50);
        assert_eq!(game.grid().height(), 40);
    }

    #[test]
    fn resize_while_idle_stays_idle() {
        let mut game = Game::new();
        game.set_width(12);

        assert_eq!(game.status(), GameStatus::Idle);
        assert_eq!(game.config(), GridConfig { width: 12, height: 20 });
        assert_eq!(
            game.take_events(),
            vec![GameEvent::Resized {
                width: 12,
                height: 20
            }]
        );
    }

    #[test]
    fn resize_during_play_resets_everything() {
        let mut game = Game::with_provider(sequence(&[PieceType::Square]));
        game.start();
        game.hard_drop();
        assert!(game.score() > 0);

        game.set_height(25);

        assert_eq!(game.status(), GameStatus::Idle);
        assert_eq!(game.score(), 0);
        assert_eq!(game.level(), 1);
        assert_eq!(game.lines_cleared(), 0);
        assert!(game.current_piece().is_none());
        assert!(game.next_piece().is_none());
        assert_eq!(game.grid().width(), 10);
        assert_eq!(game.grid().height(), 25);
        assert_eq!(game.grid().filled_count(), 0);
    }

    #[test]
    fn start_uses_new_dimensions() {
        let mut game = Game::with_provider(sequence(&[PieceType::Square]));
        game.set_width(6);
        game.start();

        assert_eq!(game.grid().width(), 6);
        assert_eq!(game.current_position(), Position::new(2, 0));
    }

    #[test]
    fn spawn_is_centered_by_piece_width() {
        let mut game = Game::with_provider(sequence(&[PieceType::Line]));
        game.start();
        assert_eq!(game.current_position(), Position::new(3, 0));
    }
}

// ============================================================================
// Piece Movement Tests
// ============================================================================

mod piece_movement {
    use super::*;

    #[test]
    fn piece_moves_left() {
        let mut game = game_with(empty_grid(), PieceType::Square, 4, 0);

        assert!(game.move_left());
        assert_eq!(game.current_position(), Position::new(3, 0));
    }

    #[test]
    fn piece_moves_right() {
        let mut game = game_with(empty_grid(), PieceType::Square, 4, 0);

        assert!(game.move_right());
        assert_eq!(game.current_position(), Position::new(5, 0));
    }

    #[test]
    fn piece_moves_down() {
        let mut game = game_with(empty_grid(), PieceType::Square, 4, 0);

        assert!(game.move_down());
        assert_eq!(game.current_position(), Position::new(4, 1));
    }

    #[test]
    fn piece_cannot_move_through_left_wall() {
        let mut game = game_with(empty_grid(), PieceType::Square, 0, 5);

        assert!(!game.move_left());
        assert_eq!(game.current_position().x, 0);
    }

    #[test]
    fn piece_cannot_move_through_right_wall() {
        // Square is 2 wide, so max x is width - 2
        let mut game = game_with(empty_grid(), PieceType::Square, 8, 5);

        assert!(!game.move_right());
        assert_eq!(game.current_position().x, 8);
    }

    #[test]
    fn piece_cannot_move_into_filled_cell() {
        let mut grid = empty_grid();
        grid.set_cell(6, 5, FILLED);
        let mut game = game_with(grid, PieceType::Square, 4, 5);

        assert!(!game.move_right());
        assert_eq!(game.current_position().x, 4);
    }

    #[test]
    fn empty_shape_columns_may_leave_the_grid() {
        let mut game = game_with(empty_grid(), PieceType::Line, 0, 5);
        // Vertical line occupies only column 2 of its matrix.
        assert!(game.rotate());

        assert!(game.move_left());
        assert!(game.move_left());
        assert_eq!(game.current_position().x, -2);
        assert!(!game.move_left());
    }

    #[test]
    fn moves_emit_events() {
        let mut game = game_with(empty_grid(), PieceType::Square, 4, 0);

        game.move_left();
        game.move_down();

        assert_eq!(
            game.take_events(),
            vec![GameEvent::PieceMoved, GameEvent::PieceMoved]
        );
    }

    #[test]
    fn failed_move_emits_nothing() {
        let mut game = game_with(empty_grid(), PieceType::Square, 0, 0);

        game.move_left();

        assert!(game.take_events().is_empty());
    }
}

// ============================================================================
// Rotation Tests
// ============================================================================

mod rotation {
    use super::*;

    #[test]
    fn piece_rotates_clockwise() {
        let mut game = game_with(empty_grid(), PieceType::TShape, 4, 5);

        assert!(game.rotate());
        assert_eq!(
            game.current_piece().map(|piece| piece.shape().clone()),
            Some(vec![vec![0, 1, 0], vec![0, 1, 1], vec![0, 1, 0]])
        );
        assert_eq!(game.current_position(), Position::new(4, 5));
        assert!(game.take_events().contains(&GameEvent::PieceRotated));
    }

    #[test]
    fn square_rotation_keeps_shape() {
        let mut game = game_with(empty_grid(), PieceType::Square, 4, 5);

        assert!(game.rotate());
        assert_eq!(
            game.current_piece().map(|piece| piece.shape().clone()),
            Some(PieceType::Square.template())
        );
    }

    #[test]
    fn rotation_against_wall_is_rejected_without_kick() {
        let mut game = game_with(empty_grid(), PieceType::Line, 0, 5);
        assert!(game.rotate());
        game.move_left();
        game.move_left();
        let shape = game.current_piece().map(|piece| piece.shape().clone());

        // Horizontal again would stick out past the left wall.
        assert!(!game.rotate());
        assert_eq!(game.current_piece().map(|piece| piece.shape().clone()), shape);
        assert_eq!(game.current_position(), Position::new(-2, 5));
    }

    #[test]
    fn rotation_into_filled_cell_is_rejected() {
        let mut grid = empty_grid();
        grid.set_cell(5, 7, FILLED);
        let mut game = game_with(grid, PieceType::TShape, 4, 5);

        assert!(!game.rotate());
        assert_eq!(
            game.current_piece().map(|piece| piece.shape().clone()),
            Some(PieceType::TShape.template())
        );
    }

    #[test]
    fn rotating_a_piece_leaves_the_catalog_alone() {
        let mut game = game_with(empty_grid(), PieceType::TShape, 4, 5);
        game.rotate();

        assert_eq!(Piece::new(PieceType::TShape).shape(), &PieceType::TShape.template());
        assert_eq!(
            game.current_piece().map(|piece| piece.shape().clone()),
            Some(rotate(&PieceType::TShape.template()))
        );
    }
}

// ============================================================================
// Locking Tests
// ============================================================================

mod locking {
    use super::*;

    #[test]
    fn tick_moves_piece_down() {
        let mut game = game_with(empty_grid(), PieceType::Square, 4, 0);

        game.tick();

        assert_eq!(game.current_position(), Position::new(4, 1));
    }

    #[test]
    fn move_down_locks_at_bottom() {
        let mut game = Game::with_grid(
            empty_grid(),
            Piece::new(PieceType::Square),
            Position::new(4, 18),
            sequence(&[PieceType::TShape]),
        );

        assert!(!game.move_down());

        assert!(filled(&game, &[(4, 18), (5, 18), (4, 19), (5, 19)]));
        assert_eq!(game.grid().filled_count(), 4);
        assert_eq!(game.current_piece().map(Piece::kind), Some(PieceType::TShape));
        assert_eq!(game.current_position(), Position::new(4, 0));
        assert!(game.take_events().contains(&GameEvent::PieceLocked));
    }

    #[test]
    fn tick_locks_on_stack() {
        let mut grid = empty_grid();
        grid.set_cell(4, 10, FILLED);
        let mut game = game_with(grid, PieceType::Square, 4, 8);

        game.tick();

        assert!(filled(&game, &[(4, 8), (5, 8), (4, 9), (5, 9)]));
        assert_eq!(game.current_position(), Position::new(4, 0));
    }

    #[test]
    fn next_piece_becomes_current() {
        let mut game = Game::with_provider(sequence(&[
            PieceType::Square,
            PieceType::LShape,
            PieceType::JShape,
        ]));
        game.start();

        game.hard_drop();

        assert_eq!(game.current_piece().map(Piece::kind), Some(PieceType::LShape));
        assert_eq!(game.next_piece().map(Piece::kind), Some(PieceType::JShape));
    }
}

// ============================================================================
// Hard Drop Tests
// ============================================================================

mod hard_drop {
    use super::*;

    #[test]
    fn square_from_top_lands_on_floor() {
        let mut game = game_with(empty_grid(), PieceType::Square, 0, 0);

        game.hard_drop();

        assert_eq!(game.score(), 36);
        assert!(filled(&game, &[(0, 18), (1, 18), (0, 19), (1, 19)]));
        assert_eq!(game.grid().filled_count(), 4);
        assert_eq!(game.current_position(), Position::new(4, 0));
    }

    #[test]
    fn drop_lands_where_ghost_pointed() {
        let mut game = game_with(empty_grid(), PieceType::TShape, 4, 0);
        assert_eq!(game.ghost_position(), Position::new(4, 18));

        game.hard_drop();

        assert!(filled(&game, &[(5, 18), (4, 19), (5, 19), (6, 19)]));
    }

    #[test]
    fn drop_scores_rows_and_lines() {
        let mut grid = empty_grid();
        for y in [18, 19] {
            for x in 2..10 {
                grid.set_cell(x, y, FILLED);
            }
        }
        let mut game = game_with(grid, PieceType::Square, 0, 0);

        game.hard_drop();

        assert_eq!(game.score(), 18 * 2 + 300);
        assert_eq!(game.lines_cleared(), 2);
        assert_eq!(game.grid().filled_count(), 0);
        let events = game.take_events();
        assert!(events.contains(&GameEvent::LinesCleared(2)));
    }

    #[test]
    fn drop_without_room_only_locks() {
        let mut game = game_with(empty_grid(), PieceType::Square, 0, 18);

        game.hard_drop();

        assert_eq!(game.score(), 0);
        assert!(filled(&game, &[(0, 18), (1, 19)]));
    }
}

// ============================================================================
// Line Clearing Tests
// ============================================================================

mod line_clearing {
    use super::*;

    #[test]
    fn single_line_with_horizontal_line() {
        let mut grid = empty_grid();
        for x in 4..10 {
            grid.set_cell(x, 19, FILLED);
        }
        let mut game = game_with(grid, PieceType::Line, 0, 0);

        game.hard_drop();

        assert_eq!(game.lines_cleared(), 1);
        assert_eq!(game.score(), 18 * 2 + 100);
        assert_eq!(game.grid().filled_count(), 0);
    }

    #[test]
    fn tetris_with_vertical_line() {
        let mut grid = empty_grid();
        for y in 16..20 {
            fill_row_with_gap(&mut grid, y, 0);
        }
        let mut game = game_with(grid, PieceType::Line, 0, 0);
        assert!(game.rotate());
        assert!(game.move_left());
        assert!(game.move_left());

        game.hard_drop();

        assert_eq!(game.lines_cleared(), 4);
        assert_eq!(game.score(), 16 * 2 + 800);
        assert_eq!(game.level(), 1);
        assert_eq!(game.grid().filled_count(), 0);
    }

    #[test]
    fn rows_above_cleared_line_fall_down() {
        let mut grid = empty_grid();
        for x in 2..10 {
            grid.set_cell(x, 19, FILLED);
        }
        grid.set_cell(9, 18, FILLED);
        let mut game = game_with(grid, PieceType::Square, 0, 0);

        game.hard_drop();

        // Row 19 clears and what the square left on row 18 shifts down.
        assert_eq!(game.lines_cleared(), 1);
        assert_eq!(game.score(), 18 * 2 + 100);
        assert!(filled(&game, &[(0, 19), (1, 19), (9, 19)]));
        assert_eq!(game.grid().filled_count(), 3);
    }
}

// ============================================================================
// Leveling Tests
// ============================================================================

mod leveling {
    use super::*;

    /// On a 4×4 grid two squares side by side clear two rows.
    fn clear_two_rows(game: &mut Game) {
        assert!(game.move_left());
        game.hard_drop();
        assert!(game.move_right());
        game.hard_drop();
    }

    #[test]
    fn level_rises_every_ten_lines() {
        let mut game = Game::with_config(
            GridConfig {
                width: 4,
                height: 4,
            },
            sequence(&[PieceType::Square]),
        );
        game.start();

        for _ in 0..5 {
            clear_two_rows(&mut game);
        }

        assert_eq!(game.lines_cleared(), 10);
        assert_eq!(game.level(), 2);
        assert_eq!(game.score(), 5 * (2 * 4 + 300));
        assert!(game.take_events().contains(&GameEvent::LevelUp(2)));

        clear_two_rows(&mut game);
        assert_eq!(game.score(), 5 * (2 * 4 + 300) + 2 * 4 + 300 * 2);
        assert_eq!(game.status(), GameStatus::Playing);
    }
}

// ============================================================================
// Game Over Tests
// ============================================================================

mod game_over {
    use super::*;

    fn tower_grid() -> Grid {
        let mut grid = empty_grid();
        for y in 1..20 {
            for x in 3..7 {
                grid.set_cell(x, y, FILLED);
            }
        }
        grid
    }

    #[test]
    fn game_over_when_spawn_blocked() {
        let mut game = game_with(tower_grid(), PieceType::Square, 0, 0);

        game.hard_drop();

        assert_eq!(game.status(), GameStatus::GameOver);
        assert!(game.is_game_over());
        assert!(game.current_piece().is_some());
        assert!(game.take_events().contains(&GameEvent::GameOver));
    }

    #[test]
    fn no_moves_after_game_over() {
        let mut game = game_with(tower_grid(), PieceType::Square, 0, 0);
        game.hard_drop();
        let before = game.snapshot();

        assert!(!game.move_left());
        assert!(!game.rotate());
        game.tick();
        game.hard_drop();
        game.pause();

        assert_eq!(game.snapshot(), before);
    }

    #[test]
    fn start_after_game_over_plays_again() {
        let mut game = game_with(tower_grid(), PieceType::Square, 0, 0);
        game.hard_drop();

        game.start();

        assert_eq!(game.status(), GameStatus::Playing);
        assert_eq!(game.score(), 0);
        assert_eq!(game.grid().filled_count(), 0);
    }
}

// ============================================================================
// Ghost Tests
// ============================================================================

mod ghost {
    use super::*;

    #[test]
    fn ghost_follows_horizontal_moves() {
        let mut grid = empty_grid();
        for y in 10..20 {
            grid.set_cell(0, y, FILLED);
        }
        let mut game = game_with(grid, PieceType::Square, 2, 0);
        assert_eq!(game.ghost_position(), Position::new(2, 18));

        game.move_left();
        assert_eq!(game.ghost_position(), Position::new(1, 18));

        game.move_left();
        assert_eq!(game.ghost_position(), Position::new(0, 8));
    }

    #[test]
    fn ghost_follows_rotation() {
        let mut game = game_with(empty_grid(), PieceType::Line, 3, 0);
        assert_eq!(game.ghost_position(), Position::new(3, 18));

        game.rotate();

        assert_eq!(game.ghost_position(), Position::new(3, 16));
    }

    #[test]
    fn ghost_is_recomputed_after_spawn() {
        let mut game = game_with(empty_grid(), PieceType::Square, 0, 0);

        game.hard_drop();

        assert_eq!(game.ghost_position(), Position::new(4, 18));
    }
}
