use crate::*;
pub use preset::*;
pub use random::*;

mod preset;
mod random;

/// Produces mine layouts for a session.
pub trait LayoutGenerator {
    /// Lays out exactly `config.mines` mines, never placing one at `excluded`.
    fn generate(&mut self, config: GameConfig, excluded: Option<CellIndex>) -> Board;
}

impl<G: LayoutGenerator + ?Sized> LayoutGenerator for &mut G {
    fn generate(&mut self, config: GameConfig, excluded: Option<CellIndex>) -> Board {
        (**self).generate(config, excluded)
    }
}
