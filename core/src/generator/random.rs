use alloc::vec;
use alloc::vec::Vec;

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::*;

/// Uniformly random layout: shuffle every index, the first `mines` of the
/// permutation become mines.
#[derive(Clone, Debug)]
pub struct RandomLayoutGenerator<R = SmallRng> {
    rng: R,
}

impl<R: Rng> RandomLayoutGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomLayoutGenerator<SmallRng> {
    /// Deterministic generator, the same seed always yields the same layouts.
    pub fn seeded(seed: u64) -> Self {
        Self::new(SmallRng::seed_from_u64(seed))
    }

    pub fn from_os_rng() -> Self {
        Self::new(SmallRng::from_os_rng())
    }
}

impl<R: Rng> LayoutGenerator for RandomLayoutGenerator<R> {
    fn generate(&mut self, config: GameConfig, excluded: Option<CellIndex>) -> Board {
        let total_cells = usize::from(config.total_cells());
        let mut mines = usize::from(config.mines);

        if mines > total_cells {
            log::warn!(
                "Board already full, generated anyway, requested {} but only fits {}",
                mines,
                total_cells
            );
            mines = total_cells;
        }

        let excluded = excluded.filter(|&index| {
            let in_bounds = index < total_cells;
            if !in_bounds {
                log::warn!("Ignoring out of bounds exclusion {}", index);
            }
            in_bounds
        });

        let mut order: Vec<CellIndex> = (0..total_cells).collect();
        order.shuffle(&mut self.rng);

        // move the excluded cell past the mine prefix
        if let Some(excluded) = excluded {
            if let Some(pos) = order[..mines].iter().position(|&index| index == excluded) {
                if mines < total_cells {
                    order.swap(pos, total_cells - 1);
                } else {
                    log::warn!("Cannot keep cell {} safe, no free cell left", excluded);
                }
            }
        }

        let mut mine_mask = vec![false; total_cells];
        for &index in &order[..mines] {
            mine_mask[index] = true;
        }

        let board = Board::from_mine_mask(config.size(), &mine_mask);

        // double check mine count
        if board.mine_count() != config.mines {
            log::warn!(
                "Generated board count mismatch, actual: {}, requested: {}",
                board.mine_count(),
                config.mines
            );
        }
        log::debug!(
            "Generated {}x{} board with {} mines, excluded: {:?}",
            config.rows,
            config.cols,
            board.mine_count(),
            excluded
        );
        board
    }
}
