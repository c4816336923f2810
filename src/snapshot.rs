use serde::{Deserialize, Serialize};

use crate::{
    game::{Game, GameStatus, Position},
    grid::{self, EMPTY},
    piece::{Piece, PieceType, Shape},
};

/// Read-only copy of a piece, detached from the engine.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct PieceSnapshot {
    #[serde(rename = "type")]
    pub kind: PieceType,
    pub shape: Shape,
    pub color: String,
}

impl From<&Piece> for PieceSnapshot {
    fn from(piece: &Piece) -> Self {
        Self {
            kind: piece.kind(),
            shape: piece.shape().clone(),
            color: piece.color().to_owned(),
        }
    }
}

/// Everything a renderer needs to paint one frame. Owns all of its data, so
/// holding on to it never observes later engine mutations.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub status: GameStatus,
    pub score: u32,
    pub level: u32,
    pub lines_cleared: u32,
    pub grid: Vec<Vec<u8>>,
    pub current_piece: Option<PieceSnapshot>,
    pub current_position: Position,
    pub ghost_position: Position,
    pub next_piece: Option<PieceSnapshot>,
    pub grid_width: usize,
    pub grid_height: usize,
}

impl Game {
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            status: self.status(),
            score: self.score(),
            level: self.level(),
            lines_cleared: self.lines_cleared(),
            grid: self.grid().to_cells(),
            current_piece: self.current_piece().map(PieceSnapshot::from),
            current_position: self.current_position(),
            ghost_position: self.ghost_position(),
            next_piece: self.next_piece().map(PieceSnapshot::from),
            grid_width: self.grid().width(),
            grid_height: self.grid().height(),
        }
    }
}

// ============================================================================
// Board view
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CellView {
    Empty,
    Locked,
    Ghost(PieceType),
    Active(PieceType),
}

impl GameSnapshot {
    /// The grid with the ghost and the active piece drawn over the locked
    /// cells. The active piece wins where the two overlap.
    pub fn board_view(&self) -> Vec<Vec<CellView>> {
        let mut view: Vec<Vec<CellView>> = self
            .grid
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&cell| {
                        if cell == EMPTY {
                            CellView::Empty
                        } else {
                            CellView::Locked
                        }
                    })
                    .collect()
            })
            .collect();

        if let Some(piece) = &self.current_piece {
            if self.status != GameStatus::GameOver {
                overlay(&mut view, &piece.shape, self.ghost_position, |cell| {
                    if *cell == CellView::Empty {
                        *cell = CellView::Ghost(piece.kind);
                    }
                });
            }
            overlay(&mut view, &piece.shape, self.current_position, |cell| {
                *cell = CellView::Active(piece.kind);
            });
        }

        view
    }
}

fn overlay(
    view: &mut [Vec<CellView>],
    shape: &Shape,
    at: Position,
    mut paint: impl FnMut(&mut CellView),
) {
    for (row, col) in grid::occupied_cells(shape) {
        let x = at.x as i32 + col as i32;
        let y = at.y as i32 + row as i32;
        if x < 0 || y < 0 {
            continue;
        }
        if let Some(cell) = view
            .get_mut(y as usize)
            .and_then(|cells| cells.get_mut(x as usize))
        {
            paint(cell);
        }
    }
}
