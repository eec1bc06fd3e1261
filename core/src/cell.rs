use serde::{Deserialize, Serialize};

/// What a cell hides. Fixed once the layout is generated.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellValue {
    Empty,
    Adjacent(u8),
    Mine,
}

impl CellValue {
    pub const fn from_count(count: u8) -> Self {
        match count {
            0 => Self::Empty,
            n => Self::Adjacent(n),
        }
    }

    pub const fn is_mine(self) -> bool {
        matches!(self, Self::Mine)
    }

    /// Number shown when revealed, `None` for mines.
    pub const fn count(self) -> Option<u8> {
        match self {
            Self::Empty => Some(0),
            Self::Adjacent(n) => Some(n),
            Self::Mine => None,
        }
    }
}

impl Default for CellValue {
    fn default() -> Self {
        Self::Empty
    }
}

/// Player-visible state of a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    Covered,
    Revealed,
    Flagged,
    Questioned,
}

impl CellState {
    pub const fn is_unrevealed(self) -> bool {
        !matches!(self, Self::Revealed)
    }
}

impl Default for CellState {
    fn default() -> Self {
        Self::Covered
    }
}

/// End-of-game annotation, set only once the game is over.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Marker {
    None,
    /// The mine the player clicked.
    Detonated,
    /// Flag placed over a cell that has no mine.
    IncorrectFlag,
}

impl Default for Marker {
    fn default() -> Self {
        Self::None
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub value: CellValue,
    pub state: CellState,
    pub marker: Marker,
}

impl Cell {
    pub const fn new(value: CellValue) -> Self {
        Self {
            value,
            state: CellState::Covered,
            marker: Marker::None,
        }
    }

    pub const fn is_mine(&self) -> bool {
        self.value.is_mine()
    }

    pub fn view(&self) -> CellView {
        use CellState::*;

        match (self.state, self.marker, self.value) {
            (Revealed, Marker::Detonated, _) => CellView::Detonated,
            (Revealed, _, CellValue::Mine) => CellView::Mine,
            (Revealed, _, value) => CellView::Open(value.count().unwrap_or_default()),
            (Flagged, Marker::IncorrectFlag, _) => CellView::IncorrectFlag,
            (Flagged, _, _) => CellView::Flagged,
            (Questioned, _, _) => CellView::Questioned,
            (Covered, _, _) => CellView::Covered,
        }
    }
}

/// Everything a renderer needs to draw a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    Covered,
    Flagged,
    Questioned,
    Open(u8),
    Detonated,
    Mine,
    IncorrectFlag,
}
