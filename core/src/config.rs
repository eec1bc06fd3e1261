use serde::{Deserialize, Serialize};

use crate::*;

/// Dimensions and mine count of one game, passed to [`Session::start`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub rows: Coord,
    pub cols: Coord,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(rows: Coord, cols: Coord, mines: CellCount) -> Self {
        Self { rows, cols, mines }
    }

    /// Builds a config checked against the default [`BoardBounds`].
    pub fn new(rows: Coord, cols: Coord, mines: CellCount) -> Result<Self> {
        let config = Self::new_unchecked(rows, cols, mines);
        BoardBounds::default().validate(&config)?;
        Ok(config)
    }

    pub const fn size(&self) -> Coord2 {
        (self.rows, self.cols)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.rows, self.cols)
    }
}

/// Allowed board dimensions. The mine ceiling is always half the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardBounds {
    pub min_rows: Coord,
    pub max_rows: Coord,
    pub min_cols: Coord,
    pub max_cols: Coord,
    pub min_mines: CellCount,
}

impl BoardBounds {
    pub const MIN_SIDE: Coord = 8;
    pub const MAX_SIDE: Coord = 50;

    /// Largest mine count accepted for a `rows` x `cols` board.
    pub const fn max_mines(rows: Coord, cols: Coord) -> CellCount {
        mult(rows, cols) / 2
    }

    pub fn validate(&self, config: &GameConfig) -> core::result::Result<(), ConfigError> {
        if !(self.min_rows..=self.max_rows).contains(&config.rows) {
            return Err(ConfigError::RowsOutOfRange {
                value: config.rows,
                min: self.min_rows,
                max: self.max_rows,
            });
        }
        if !(self.min_cols..=self.max_cols).contains(&config.cols) {
            return Err(ConfigError::ColsOutOfRange {
                value: config.cols,
                min: self.min_cols,
                max: self.max_cols,
            });
        }

        // zero mines is never a game, whatever the configured floor says
        let min = self.min_mines.max(1);
        let max = Self::max_mines(config.rows, config.cols);
        if !(min..=max).contains(&config.mines) {
            return Err(ConfigError::MinesOutOfRange {
                value: config.mines,
                min,
                max,
            });
        }
        Ok(())
    }
}

impl Default for BoardBounds {
    fn default() -> Self {
        Self {
            min_rows: Self::MIN_SIDE,
            max_rows: Self::MAX_SIDE,
            min_cols: Self::MIN_SIDE,
            max_cols: Self::MAX_SIDE,
            min_mines: 1,
        }
    }
}

/// Session-wide rules that do not change between games.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rules {
    pub bounds: BoardBounds,
    /// The game times out on the tick that pushes the clock past this.
    pub time_limit_secs: u32,
    /// Whether a flag cycles through a question mark before clearing.
    pub question_marks: bool,
}

impl Rules {
    pub const DEFAULT_TIME_LIMIT: u32 = 999;
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            bounds: BoardBounds::default(),
            time_limit_secs: Self::DEFAULT_TIME_LIMIT,
            question_marks: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_smallest_and_largest_boards() {
        assert!(GameConfig::new(8, 8, 10).is_ok());
        assert!(GameConfig::new(50, 50, 1250).is_ok());
        assert!(GameConfig::new(8, 8, 32).is_ok());
    }

    #[test]
    fn rejects_dimensions_out_of_range() {
        assert_eq!(
            GameConfig::new(7, 8, 10),
            Err(GameError::Config(ConfigError::RowsOutOfRange {
                value: 7,
                min: 8,
                max: 50
            }))
        );
        assert!(matches!(
            GameConfig::new(8, 51, 10),
            Err(GameError::Config(ConfigError::ColsOutOfRange { .. }))
        ));
    }

    #[test]
    fn rejects_mines_out_of_range() {
        assert!(matches!(
            GameConfig::new(8, 8, 0),
            Err(GameError::Config(ConfigError::MinesOutOfRange { .. }))
        ));
        assert_eq!(
            GameConfig::new(8, 9, 37),
            Err(GameError::Config(ConfigError::MinesOutOfRange {
                value: 37,
                min: 1,
                max: 36
            }))
        );
    }

    #[test]
    fn custom_bounds_apply() {
        let bounds = BoardBounds {
            min_rows: 2,
            min_cols: 2,
            min_mines: 3,
            ..Default::default()
        };
        assert!(bounds.validate(&GameConfig::new_unchecked(2, 3, 3)).is_ok());
        assert!(bounds.validate(&GameConfig::new_unchecked(2, 3, 2)).is_err());
    }
}
