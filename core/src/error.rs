use thiserror::Error;

use crate::{CellCount, CellIndex, Coord};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Rows must be within {min}..={max}, got {value}")]
    RowsOutOfRange { value: Coord, min: Coord, max: Coord },
    #[error("Columns must be within {min}..={max}, got {value}")]
    ColsOutOfRange { value: Coord, min: Coord, max: Coord },
    #[error("Mines must be within {min}..={max}, got {value}")]
    MinesOutOfRange {
        value: CellCount,
        min: CellCount,
        max: CellCount,
    },
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid game configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Invalid cell index {index}, board has {total} cells")]
    InvalidIndex { index: CellIndex, total: usize },
    #[error("Mine layout does not fit the declared board size")]
    InvalidLayout,
}

pub type Result<T> = core::result::Result<T, GameError>;
