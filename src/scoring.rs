pub const LINES_PER_LEVEL: u32 = 10;

pub const SCORE_SINGLE: u32 = 100;
pub const SCORE_DOUBLE: u32 = 300;
pub const SCORE_TRIPLE: u32 = 500;
pub const SCORE_TETRIS: u32 = 800;

/// Points awarded per row a piece travels during a hard drop.
pub const HARD_DROP_POINTS_PER_ROW: u32 = 2;

/// Points for clearing `lines` rows in a single lock at `level`.
///
/// A single lock never clears more than four rows, anything else scores 0.
pub fn score(lines: u32, level: u32) -> u32 {
    let base = match lines {
        1 => SCORE_SINGLE,
        2 => SCORE_DOUBLE,
        3 => SCORE_TRIPLE,
        4 => SCORE_TETRIS,
        _ => 0,
    };
    base * level
}

pub fn level_for_lines(lines_cleared: u32) -> u32 {
    lines_cleared / LINES_PER_LEVEL + 1
}
