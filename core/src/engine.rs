use alloc::collections::VecDeque;
use alloc::vec;
use alloc::vec::Vec;
use core::ops::BitOr;

use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - NotStarted -> Running
/// - Running -> Won
/// - Running -> Lost
/// - Running -> TimedOut
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    NotStarted,
    Running,
    Won,
    Lost,
    TimedOut,
}

impl Phase {
    pub const fn is_initial(self) -> bool {
        matches!(self, Self::NotStarted)
    }

    /// The game has ended and no moves are accepted anymore.
    pub const fn is_final(self) -> bool {
        matches!(self, Self::Won | Self::Lost | Self::TimedOut)
    }

    pub const fn result(self) -> Option<GameResult> {
        match self {
            Self::Won => Some(GameResult::Won),
            Self::Lost => Some(GameResult::Lost),
            Self::TimedOut => Some(GameResult::TimedOut),
            Self::NotStarted | Self::Running => None,
        }
    }
}

impl Default for Phase {
    fn default() -> Self {
        Self::NotStarted
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    Won,
    Lost,
    TimedOut,
}

impl From<GameResult> for Phase {
    fn from(result: GameResult) -> Self {
        match result {
            GameResult::Won => Self::Won,
            GameResult::Lost => Self::Lost,
            GameResult::TimedOut => Self::TimedOut,
        }
    }
}

/// End-of-game payload for the presentation layer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub result: GameResult,
    pub rows: Coord,
    pub cols: Coord,
    pub mines: CellCount,
    pub elapsed_secs: u32,
}

/// One game, from the first click to a terminal phase.
#[derive(Clone, Debug)]
pub struct Session<G = RandomLayoutGenerator, T = ()> {
    rules: Rules,
    config: GameConfig,
    board: Board,
    generator: G,
    ticker: T,
    phase: Phase,
    first_reveal_done: bool,
    flagged_count: CellCount,
    elapsed_secs: u32,
    ticking: bool,
    detonated: Option<CellIndex>,
}

impl Session {
    /// Session with default rules, laid out from OS entropy.
    pub fn new(config: GameConfig) -> Result<Self> {
        Self::start(
            config,
            Rules::default(),
            RandomLayoutGenerator::from_os_rng(),
            (),
        )
    }

    pub fn seeded(config: GameConfig, seed: u64) -> Result<Self> {
        Self::start(
            config,
            Rules::default(),
            RandomLayoutGenerator::seeded(seed),
            (),
        )
    }
}

impl<G: LayoutGenerator, T: TickSource> Session<G, T> {
    pub fn start(config: GameConfig, rules: Rules, mut generator: G, ticker: T) -> Result<Self> {
        rules.bounds.validate(&config)?;
        let mut board = generator.generate(config, None);
        board.reset_states();
        log::debug!("Started {}x{} game with {} mines", config.rows, config.cols, config.mines);

        Ok(Self {
            rules,
            config,
            board,
            generator,
            ticker,
            phase: Phase::NotStarted,
            first_reveal_done: false,
            flagged_count: 0,
            elapsed_secs: 0,
            ticking: false,
            detonated: None,
        })
    }

    /// Discards the current game and starts a fresh one with `config`.
    pub fn restart(&mut self, config: GameConfig) -> Result<()> {
        self.rules.bounds.validate(&config)?;
        self.stop_timer();

        self.board = self.generator.generate(config, None);
        self.board.reset_states();
        self.config = config;
        self.phase = Phase::NotStarted;
        self.first_reveal_done = false;
        self.flagged_count = 0;
        self.elapsed_secs = 0;
        self.detonated = None;
        log::debug!("Restarted as {}x{} game with {} mines", config.rows, config.cols, config.mines);
        Ok(())
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase.is_final()
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn cell(&self, index: CellIndex) -> Result<Cell> {
        let index = self.board.validate_index(index)?;
        Ok(self.board[index])
    }

    /// Render-ready view of every cell, row-major.
    pub fn cell_views(&self) -> impl Iterator<Item = CellView> + '_ {
        self.board.cells().map(Cell::view)
    }

    pub fn first_reveal_done(&self) -> bool {
        self.first_reveal_done
    }

    pub fn flag_count(&self) -> CellCount {
        self.flagged_count
    }

    /// How many mines have not been flagged yet, negative when over-flagged.
    pub fn mines_left(&self) -> isize {
        (self.board.mine_count() as isize) - (self.flagged_count as isize)
    }

    /// Display counter, never below zero.
    pub fn mines_remaining(&self) -> CellCount {
        self.board.mine_count().saturating_sub(self.flagged_count)
    }

    /// Seconds on the clock, capped at the time limit.
    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs.min(self.rules.time_limit_secs)
    }

    pub fn is_ticking(&self) -> bool {
        self.ticking
    }

    /// The mine that ended the game, if one did.
    pub fn detonated(&self) -> Option<CellIndex> {
        self.detonated
    }

    pub fn summary(&self) -> Option<GameSummary> {
        self.phase.result().map(|result| GameSummary {
            result,
            rows: self.config.rows,
            cols: self.config.cols,
            mines: self.board.mine_count(),
            elapsed_secs: self.elapsed_secs(),
        })
    }

    pub fn ticker(&self) -> &T {
        &self.ticker
    }

    pub fn reveal(&mut self, index: CellIndex) -> Result<RevealOutcome> {
        let index = self.board.validate_index(index)?;
        Ok(self.reveal_cell(index))
    }

    pub fn toggle_flag(&mut self, index: CellIndex) -> Result<MarkOutcome> {
        use CellState::*;

        let index = self.board.validate_index(index)?;
        if self.phase.is_final() {
            return Ok(MarkOutcome::NoChange);
        }

        let next = match self.board[index].state {
            Covered => {
                self.flagged_count += 1;
                Flagged
            }
            Flagged => {
                self.flagged_count -= 1;
                if self.rules.question_marks {
                    Questioned
                } else {
                    Covered
                }
            }
            Questioned => Covered,
            Revealed => return Ok(MarkOutcome::NoChange),
        };
        self.board[index].state = next;
        log::trace!("Marked cell {} as {:?}", index, next);

        self.mark_started();
        Ok(self.mark_outcome())
    }

    /// Whether [`Self::chord_reveal`] at `index` would open anything.
    pub fn can_chord_reveal(&self, index: CellIndex) -> bool {
        if self.phase.is_final() {
            return false;
        }
        match self.board.get(index) {
            Some(Cell {
                state: CellState::Revealed,
                value: CellValue::Adjacent(count),
                ..
            }) => *count == self.count_flagged_neighbors(index),
            _ => false,
        }
    }

    /// Opens every covered neighbor of a number whose flags are all placed.
    pub fn chord_reveal(&mut self, index: CellIndex) -> Result<RevealOutcome> {
        let index = self.board.validate_index(index)?;
        if !self.can_chord_reveal(index) {
            return Ok(RevealOutcome::NoChange);
        }

        let targets: Vec<_> = self
            .board
            .neighbors(index)
            .filter(|&pos| self.board[pos].state == CellState::Covered)
            .collect();
        log::debug!("Chord at {} opens {:?}", index, targets);

        Ok(targets
            .into_iter()
            .map(|pos| self.reveal_cell(pos))
            .fold(RevealOutcome::NoChange, BitOr::bitor))
    }

    /// Flags every unrevealed neighbor of a number that can only be mines.
    pub fn chord_flag(&mut self, index: CellIndex) -> Result<MarkOutcome> {
        let index = self.board.validate_index(index)?;
        if self.phase.is_final() {
            return Ok(MarkOutcome::NoChange);
        }

        let cell = self.board[index];
        let CellValue::Adjacent(count) = cell.value else {
            return Ok(MarkOutcome::NoChange);
        };
        if cell.state != CellState::Revealed || count != self.count_unrevealed_neighbors(index) {
            return Ok(MarkOutcome::NoChange);
        }

        let mut updated = false;
        for pos in self.board.neighbors(index) {
            if matches!(
                self.board[pos].state,
                CellState::Covered | CellState::Questioned
            ) {
                self.board[pos].state = CellState::Flagged;
                self.flagged_count += 1;
                updated = true;
            }
        }

        Ok(if updated {
            self.mark_outcome()
        } else {
            MarkOutcome::NoChange
        })
    }

    /// Advances the clock by one second.
    pub fn tick(&mut self) -> TickOutcome {
        if self.phase != Phase::Running {
            return TickOutcome::Ignored;
        }

        self.elapsed_secs += 1;
        if self.elapsed_secs > self.rules.time_limit_secs {
            self.end_game(GameResult::TimedOut);
            TickOutcome::TimedOut
        } else {
            TickOutcome::Ticked
        }
    }

    fn reveal_cell(&mut self, index: CellIndex) -> RevealOutcome {
        if self.phase.is_final() || self.board[index].state != CellState::Covered {
            return RevealOutcome::NoChange;
        }

        if !self.first_reveal_done {
            self.first_reveal_done = true;
            if self.board[index].is_mine() {
                self.regenerate_excluding(index);
            }
        }
        self.mark_started();

        if self.board[index].is_mine() {
            let cell = &mut self.board[index];
            cell.state = CellState::Revealed;
            cell.marker = Marker::Detonated;
            self.detonated = Some(index);
            log::debug!("Hit mine at {}", index);
            self.end_game(GameResult::Lost);
            return RevealOutcome::HitMine;
        }

        self.flood_reveal(index);

        if self.is_solved() {
            self.end_game(GameResult::Won);
            RevealOutcome::Won
        } else {
            RevealOutcome::Revealed
        }
    }

    /// Reveals `start`, and when it is empty the whole connected zero region
    /// plus the numbers on its border.
    fn flood_reveal(&mut self, start: CellIndex) {
        let mut queued = vec![false; self.board.total_cells()];
        let mut to_visit = VecDeque::from([start]);
        queued[start] = true;

        while let Some(index) = to_visit.pop_front() {
            let cell = &mut self.board[index];

            // skip marked or already opened cells
            if cell.state != CellState::Covered {
                log::trace!("Skipping cell {}", index);
                continue;
            }
            cell.state = CellState::Revealed;
            let value = cell.value;
            log::trace!("Opened cell {}, value: {:?}", index, value);

            if value == CellValue::Empty {
                for pos in self.board.neighbors(index) {
                    if !queued[pos] && self.board[pos].state == CellState::Covered {
                        queued[pos] = true;
                        to_visit.push_back(pos);
                    }
                }
            }
        }
    }

    fn regenerate_excluding(&mut self, index: CellIndex) {
        log::debug!("First reveal at {} hit a mine, regenerating", index);
        let mut board = self.generator.generate(self.config, Some(index));
        board.reset_states();

        // marks placed before the first reveal survive the new layout
        for (cell, old) in board.cells_mut().zip(self.board.cells()) {
            cell.state = old.state;
        }
        if board[index].is_mine() {
            log::warn!("Regenerated board still has a mine at {}", index);
        }
        self.board = board;
    }

    /// Every mine flagged and every other cell open.
    fn is_solved(&self) -> bool {
        self.board.cells().all(|cell| match cell.value {
            CellValue::Mine => cell.state == CellState::Flagged,
            _ => cell.state == CellState::Revealed,
        })
    }

    fn mark_outcome(&mut self) -> MarkOutcome {
        if self.is_solved() {
            self.end_game(GameResult::Won);
            MarkOutcome::Won
        } else {
            MarkOutcome::Changed
        }
    }

    fn mark_started(&mut self) {
        if self.phase.is_initial() {
            log::debug!("Game started");
            self.phase = Phase::Running;
            self.ticking = true;
            self.ticker.start_ticking();
        }
    }

    fn stop_timer(&mut self) {
        if self.ticking {
            self.ticking = false;
            self.ticker.stop_ticking();
        }
    }

    fn end_game(&mut self, result: GameResult) {
        if self.phase.is_final() {
            return;
        }

        self.phase = result.into();
        self.stop_timer();
        log::debug!("Game ended: {:?} after {}s", result, self.elapsed_secs);
        if result != GameResult::Won {
            self.reveal_all();
        }
    }

    /// Exposes mines the player missed and marks wrong flags.
    fn reveal_all(&mut self) {
        for cell in self.board.cells_mut() {
            match (cell.is_mine(), cell.state) {
                (true, CellState::Covered | CellState::Questioned) => {
                    cell.state = CellState::Revealed;
                }
                (false, CellState::Flagged) => {
                    cell.marker = Marker::IncorrectFlag;
                }
                _ => {}
            }
        }
    }

    fn count_flagged_neighbors(&self, index: CellIndex) -> u8 {
        let count = self
            .board
            .neighbors(index)
            .filter(|&pos| self.board[pos].state == CellState::Flagged)
            .count();
        count as u8
    }

    fn count_unrevealed_neighbors(&self, index: CellIndex) -> u8 {
        let count = self
            .board
            .neighbors(index)
            .filter(|&pos| self.board[pos].state.is_unrevealed())
            .count();
        count as u8
    }
}
