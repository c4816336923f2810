use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Square occupancy matrix, row-major. Nonzero means occupied.
pub type Shape = Vec<Vec<u8>>;

// ============================================================================
// Catalog
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PieceType {
    Line,
    Square,
    TShape,
    SShape,
    ZShape,
    JShape,
    LShape,
}

impl PieceType {
    pub const ALL: [PieceType; 7] = [
        PieceType::Line,
        PieceType::Square,
        PieceType::TShape,
        PieceType::SShape,
        PieceType::ZShape,
        PieceType::JShape,
        PieceType::LShape,
    ];

    /// Spawn orientation of this type. Every call returns a fresh matrix.
    pub fn template(self) -> Shape {
        match self {
            PieceType::Line => vec![
                vec![0, 0, 0, 0],
                vec![1, 1, 1, 1],
                vec![0, 0, 0, 0],
                vec![0, 0, 0, 0],
            ],
            PieceType::Square => vec![vec![1, 1], vec![1, 1]],
            PieceType::TShape => vec![vec![0, 1, 0], vec![1, 1, 1], vec![0, 0, 0]],
            PieceType::SShape => vec![vec![0, 1, 1], vec![1, 1, 0], vec![0, 0, 0]],
            PieceType::ZShape => vec![vec![1, 1, 0], vec![0, 1, 1], vec![0, 0, 0]],
            PieceType::JShape => vec![vec![1, 0, 0], vec![1, 1, 1], vec![0, 0, 0]],
            PieceType::LShape => vec![vec![0, 0, 1], vec![1, 1, 1], vec![0, 0, 0]],
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            PieceType::Line => "#00f0f0",
            PieceType::Square => "#f0f000",
            PieceType::TShape => "#a000f0",
            PieceType::SShape => "#00f000",
            PieceType::ZShape => "#f00000",
            PieceType::JShape => "#0000f0",
            PieceType::LShape => "#f0a000",
        }
    }

    /// Single-letter name (I, O, T, S, Z, J, L).
    pub fn letter(self) -> char {
        match self {
            PieceType::Line => 'I',
            PieceType::Square => 'O',
            PieceType::TShape => 'T',
            PieceType::SShape => 'S',
            PieceType::ZShape => 'Z',
            PieceType::JShape => 'J',
            PieceType::LShape => 'L',
        }
    }
}

// ============================================================================
// Piece
// ============================================================================

/// A piece instance. Owns its shape; rotating it never touches the catalog.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Piece {
    kind: PieceType,
    shape: Shape,
}

impl Piece {
    pub fn new(kind: PieceType) -> Self {
        Self {
            kind,
            shape: kind.template(),
        }
    }

    pub fn kind(&self) -> PieceType {
        self.kind
    }

    pub fn color(&self) -> &'static str {
        self.kind.color()
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Side length of the shape matrix.
    pub fn width(&self) -> usize {
        self.shape.len()
    }

    /// The shape this piece would have after a clockwise turn.
    pub fn rotated_shape(&self) -> Shape {
        rotate(&self.shape)
    }

    pub fn set_shape(&mut self, shape: Shape) {
        self.shape = shape;
    }
}

// ============================================================================
// Rotation
// ============================================================================

/// Rotates an N×N matrix 90° clockwise: `out[j][n-1-i] = in[i][j]`.
pub fn rotate(shape: &Shape) -> Shape {
    let n = shape.len();
    let mut rotated = vec![vec![0; n]; n];
    for (i, row) in shape.iter().enumerate() {
        for (j, &cell) in row.iter().enumerate().take(n) {
            rotated[j][n - 1 - i] = cell;
        }
    }
    rotated
}

// ============================================================================
// Piece Provider Trait
// ============================================================================

pub trait PieceProvider {
    fn next_piece(&mut self) -> PieceType;
}

/// Uniform choice over the seven types.
pub struct RandomPieceProvider {
    rng: StdRng,
}

impl RandomPieceProvider {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPieceProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceProvider for RandomPieceProvider {
    fn next_piece(&mut self) -> PieceType {
        PieceType::ALL[self.rng.gen_range(0..PieceType::ALL.len())]
    }
}

/// Cycles through a fixed list of types.
pub struct SequencePieceProvider {
    pieces: Vec<PieceType>,
    index: usize,
}

impl SequencePieceProvider {
    /// # Panics
    ///
    /// Panics if `pieces` is empty.
    pub fn new(pieces: Vec<PieceType>) -> Self {
        assert!(!pieces.is_empty(), "piece sequence must not be empty");
        Self { pieces, index: 0 }
    }
}

impl PieceProvider for SequencePieceProvider {
    fn next_piece(&mut self) -> PieceType {
        let piece = self.pieces[self.index % self.pieces.len()];
        self.index += 1;
        piece
    }
}
