use alloc::vec;
use alloc::vec::Vec;
use core::ops::{Index, IndexMut};

use ndarray::Array2;
use serde::Serialize;

use crate::*;

/// Mine layout plus per-cell state, stored row-major.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Board {
    size: Coord2,
    cells: Array2<Cell>,
    mine_count: CellCount,
}

impl Board {
    /// Builds a board from a mine mask, running the adjacency counting pass.
    pub(crate) fn from_mine_mask(size: Coord2, mine_mask: &[bool]) -> Self {
        let (rows, cols) = size;
        debug_assert_eq!(mine_mask.len(), usize::from(mult(rows, cols)));

        let mut values: Vec<CellValue> = mine_mask
            .iter()
            .map(|&is_mine| {
                if is_mine {
                    CellValue::Mine
                } else {
                    CellValue::Empty
                }
            })
            .collect();

        let mut mine_count: CellCount = 0;
        for index in 0..values.len() {
            if !values[index].is_mine() {
                continue;
            }
            mine_count += 1;
            for neighbor in NeighborIter::new(to_coords(index, cols), size) {
                values[neighbor] = match values[neighbor] {
                    CellValue::Mine => CellValue::Mine,
                    CellValue::Empty => CellValue::Adjacent(1),
                    CellValue::Adjacent(n) => CellValue::Adjacent(n + 1),
                };
            }
        }

        let cells = Array2::from_shape_fn(size.to_nd_index(), |(row, col)| {
            Cell::new(values[row * usize::from(cols) + col])
        });

        Self {
            size,
            cells,
            mine_count,
        }
    }

    /// Builds a fixed layout. Duplicate indices count once.
    pub fn from_mine_indices(rows: Coord, cols: Coord, mines: &[CellIndex]) -> Result<Self> {
        let total = usize::from(mult(rows, cols));
        let mut mine_mask = vec![false; total];

        for &index in mines {
            if index >= total {
                return Err(GameError::InvalidLayout);
            }
            mine_mask[index] = true;
        }

        Ok(Self::from_mine_mask((rows, cols), &mine_mask))
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig::new_unchecked(self.size.0, self.size.1, self.mine_count)
    }

    pub fn size(&self) -> Coord2 {
        self.size
    }

    pub fn rows(&self) -> Coord {
        self.size.0
    }

    pub fn cols(&self) -> Coord {
        self.size.1
    }

    pub fn total_cells(&self) -> usize {
        self.cells.len()
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn safe_cell_count(&self) -> usize {
        self.total_cells() - usize::from(self.mine_count)
    }

    pub fn validate_index(&self, index: CellIndex) -> Result<CellIndex> {
        let total = self.total_cells();
        if index < total {
            Ok(index)
        } else {
            Err(GameError::InvalidIndex { index, total })
        }
    }

    pub fn get(&self, index: CellIndex) -> Option<&Cell> {
        self.validate_index(index).ok().map(|index| &self[index])
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Puts every cell back to covered and unmarked, keeping the layout.
    pub(crate) fn reset_states(&mut self) {
        for cell in self.cells.iter_mut() {
            cell.state = CellState::Covered;
            cell.marker = Marker::None;
        }
    }

    pub(crate) fn cells_mut(&mut self) -> impl Iterator<Item = &mut Cell> {
        self.cells.iter_mut()
    }

    pub fn neighbors(&self, index: CellIndex) -> NeighborIter {
        NeighborIter::new(to_coords(index, self.size.1), self.size)
    }

    /// Counts mines around `index` straight from the layout.
    pub fn adjacent_mine_count(&self, index: CellIndex) -> u8 {
        let count = self.neighbors(index).filter(|&pos| self[pos].is_mine()).count();
        // at most 8 neighbors
        count as u8
    }

    pub fn mine_indices(&self) -> impl Iterator<Item = CellIndex> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_mine())
            .map(|(index, _)| index)
    }

    fn nd_index(&self, index: CellIndex) -> [usize; 2] {
        to_coords(index, self.size.1).to_nd_index()
    }
}

impl Index<CellIndex> for Board {
    type Output = Cell;

    fn index(&self, index: CellIndex) -> &Self::Output {
        &self.cells[self.nd_index(index)]
    }
}

impl IndexMut<CellIndex> for Board {
    fn index_mut(&mut self, index: CellIndex) -> &mut Self::Output {
        let nd_index = self.nd_index(index);
        &mut self.cells[nd_index]
    }
}
