use crate::piece::Shape;

pub const EMPTY: u8 = 0;
pub const FILLED: u8 = 1;

/// Occupancy matrix of the playing field.
///
/// Dimensions are fixed for the lifetime of a value; only cell contents change.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Vec<u8>>,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: empty_rows(width, height),
        }
    }

    /// Builds a grid from explicit rows. Nonzero cells count as occupied.
    ///
    /// # Panics
    ///
    /// Panics if the rows are empty or not all of the same length.
    pub fn from_cells(cells: Vec<Vec<u8>>) -> Self {
        let height = cells.len();
        let width = cells.first().map_or(0, Vec::len);
        assert!(height > 0 && width > 0, "grid must have at least one cell");
        assert!(
            cells.iter().all(|row| row.len() == width),
            "grid rows must have equal length"
        );
        Self {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cell(&self, x: usize, y: usize) -> u8 {
        self.cells[y][x]
    }

    pub fn set_cell(&mut self, x: usize, y: usize, value: u8) {
        self.cells[y][x] = value;
    }

    pub fn rows(&self) -> &[Vec<u8>] {
        &self.cells
    }

    /// Deep copy of the cell matrix.
    pub fn to_cells(&self) -> Vec<Vec<u8>> {
        self.cells.clone()
    }

    pub fn is_valid_position(&self, shape: &Shape, x: i16, y: i16) -> bool {
        occupied_cells(shape).all(|(row, col)| {
            let gx = x as i32 + col as i32;
            let gy = y as i32 + row as i32;
            if gx < 0 || gx >= self.width as i32 || gy >= self.height as i32 {
                return false;
            }
            // Cells above the top edge only have to respect the side walls.
            gy < 0 || self.cells[gy as usize][gx as usize] == EMPTY
        })
    }

    /// Writes the occupied cells of `shape` into the grid. Cells that fall
    /// outside the grid are dropped.
    pub fn place(&mut self, shape: &Shape, x: i16, y: i16) {
        for (row, col) in occupied_cells(shape) {
            let gx = x as i32 + col as i32;
            let gy = y as i32 + row as i32;
            if gx >= 0 && gy >= 0 && (gx as usize) < self.width && (gy as usize) < self.height {
                self.cells[gy as usize][gx as usize] = FILLED;
            }
        }
    }

    /// Removes every full row, shifting the rows above down, and returns how
    /// many were removed.
    pub fn clear_full_lines(&mut self) -> u32 {
        let mut cleared = 0;
        let mut y = self.height;

        while y > 0 {
            if self.is_row_full(y - 1) {
                self.cells.remove(y - 1);
                self.cells.insert(0, vec![EMPTY; self.width]);
                cleared += 1;
                // The row above has shifted into y - 1; look at it again.
            } else {
                y -= 1;
            }
        }

        cleared
    }

    pub fn reset(&mut self) {
        self.cells = empty_rows(self.width, self.height);
    }

    pub fn is_row_full(&self, y: usize) -> bool {
        self.cells[y].iter().all(|&cell| cell != EMPTY)
    }

    pub fn filled_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|&&cell| cell != EMPTY)
            .count()
    }
}

fn empty_rows(width: usize, height: usize) -> Vec<Vec<u8>> {
    (0..height).map(|_| vec![EMPTY; width]).collect()
}

/// `(row, col)` of every occupied cell of `shape`.
pub fn occupied_cells(shape: &Shape) -> impl Iterator<Item = (usize, usize)> + '_ {
    shape.iter().enumerate().flat_map(|(row, cells)| {
        cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| **cell != EMPTY)
            .map(move |(col, _)| (row, col))
    })
}

/// Row the shape would come to rest on if dropped straight down from `y`.
pub fn ghost_y(grid: &Grid, shape: &Shape, x: i16, y: i16) -> i16 {
    if occupied_cells(shape).next().is_none() {
        return y;
    }
    let mut ghost = y;
    while grid.is_valid_position(shape, x, ghost + 1) {
        ghost += 1;
    }
    ghost
}
