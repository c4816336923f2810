pub mod command;
pub mod config;
pub mod game;
pub mod grid;
pub mod piece;
pub mod scoring;
pub mod session;
pub mod snapshot;

pub use command::{Command, ParseCommandError};
pub use config::{GridConfig, SessionConfig};
pub use game::{Game, GameEvent, GameStatus, Position};
pub use grid::Grid;
pub use piece::{Piece, PieceProvider, PieceType, Shape};
pub use snapshot::GameSnapshot;
