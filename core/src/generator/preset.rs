use alloc::collections::VecDeque;

use super::*;

/// Replays fixed layouts in order, handing over to `fallback` once they run
/// out or when a preset cannot honor the request.
#[derive(Clone, Debug)]
pub struct PresetLayoutGenerator<G> {
    presets: VecDeque<Board>,
    fallback: G,
}

impl<G: LayoutGenerator> PresetLayoutGenerator<G> {
    pub fn new(presets: impl IntoIterator<Item = Board>, fallback: G) -> Self {
        Self {
            presets: presets.into_iter().collect(),
            fallback,
        }
    }

    pub fn remaining(&self) -> usize {
        self.presets.len()
    }
}

impl<G: LayoutGenerator> LayoutGenerator for PresetLayoutGenerator<G> {
    fn generate(&mut self, config: GameConfig, excluded: Option<CellIndex>) -> Board {
        while let Some(board) = self.presets.pop_front() {
            if board.game_config() != config {
                log::warn!(
                    "Skipping preset {:?}, requested {:?}",
                    board.game_config(),
                    config
                );
                continue;
            }
            if excluded.is_some_and(|index| board.get(index).is_some_and(Cell::is_mine)) {
                log::debug!("Preset has a mine at {:?}, using fallback", excluded);
                break;
            }
            return board;
        }
        self.fallback.generate(config, excluded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replays_then_falls_back() {
        let config = GameConfig::new(8, 8, 1).unwrap();
        let preset = Board::from_mine_indices(8, 8, &[5]).unwrap();
        let mut generator =
            PresetLayoutGenerator::new([preset.clone()], RandomLayoutGenerator::seeded(1));

        assert_eq!(generator.generate(config, None), preset);
        assert_eq!(generator.remaining(), 0);
        assert_eq!(generator.generate(config, None).mine_count(), 1);
    }

    #[test]
    fn preset_mining_the_excluded_cell_is_dropped() {
        let config = GameConfig::new(8, 8, 1).unwrap();
        let preset = Board::from_mine_indices(8, 8, &[5]).unwrap();
        let mut generator = PresetLayoutGenerator::new([preset], RandomLayoutGenerator::seeded(1));

        let board = generator.generate(config, Some(5));
        assert!(!board[5].is_mine());
        assert_eq!(board.mine_count(), 1);
    }
}
