use std::collections::{BTreeSet, VecDeque};

use proptest::prelude::*;
use proptest::sample::Index;
use sweeper_core::*;

fn config_strategy() -> impl Strategy<Value = GameConfig> {
    (8u8..=50, 8u8..=50)
        .prop_flat_map(|(rows, cols)| {
            (
                Just(rows),
                Just(cols),
                1..=BoardBounds::max_mines(rows, cols),
            )
        })
        .prop_map(|(rows, cols, mines)| GameConfig::new_unchecked(rows, cols, mines))
}

/// Neighbor mine tally from plain row/col arithmetic.
fn count_mines_around(board: &Board, index: usize) -> u8 {
    let cols = board.cols() as isize;
    let rows = board.rows() as isize;
    let (row, col) = (index as isize / cols, index as isize % cols);
    let mut count = 0;
    for d_row in -1..=1 {
        for d_col in -1..=1 {
            let (r, c) = (row + d_row, col + d_col);
            if (d_row, d_col) == (0, 0) || r < 0 || c < 0 || r >= rows || c >= cols {
                continue;
            }
            if board[(r * cols + c) as usize].is_mine() {
                count += 1;
            }
        }
    }
    count
}

/// Cells a flood from `start` should open, found by a separate BFS.
fn expected_region(board: &Board, start: usize) -> BTreeSet<usize> {
    let mut region = BTreeSet::from([start]);
    let mut to_visit = VecDeque::from([start]);
    while let Some(index) = to_visit.pop_front() {
        if board[index].value != CellValue::Empty {
            continue;
        }
        for pos in board.neighbors(index) {
            if region.insert(pos) {
                to_visit.push_back(pos);
            }
        }
    }
    region
}

fn session_on(board: Board) -> Session<PresetLayoutGenerator<RandomLayoutGenerator>> {
    let config = board.game_config();
    let generator = PresetLayoutGenerator::new([board], RandomLayoutGenerator::seeded(0));
    Session::start(config, Rules::default(), generator, ()).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn generate_places_exact_mine_count(config in config_strategy(), seed in any::<u64>()) {
        let board = RandomLayoutGenerator::seeded(seed).generate(config, None);

        let mines = board.cells().filter(|cell| cell.is_mine()).count();
        prop_assert_eq!(mines, usize::from(config.mines));
        prop_assert_eq!(board.mine_count(), config.mines);
        prop_assert_eq!(board.total_cells() - mines, board.safe_cell_count());
    }

    #[test]
    fn adjacency_counts_match_neighbors(config in config_strategy(), seed in any::<u64>()) {
        let board = RandomLayoutGenerator::seeded(seed).generate(config, None);

        for index in 0..board.total_cells() {
            let cell = board[index];
            if cell.is_mine() {
                continue;
            }
            prop_assert_eq!(cell.value, CellValue::from_count(count_mines_around(&board, index)));
        }
    }

    #[test]
    fn excluded_index_is_never_a_mine(
        config in config_strategy(),
        seed in any::<u64>(),
        excluded in any::<Index>(),
    ) {
        let excluded = excluded.index(usize::from(config.total_cells()));
        let board = RandomLayoutGenerator::seeded(seed).generate(config, Some(excluded));

        prop_assert!(!board[excluded].is_mine());
        prop_assert_eq!(board.mine_count(), config.mines);
    }

    #[test]
    fn flood_fill_opens_exactly_the_region(config in config_strategy(), seed in any::<u64>()) {
        let board = RandomLayoutGenerator::seeded(seed).generate(config, None);
        let start = board.cells().position(|cell| cell.value == CellValue::Empty);
        prop_assume!(start.is_some());
        let start = start.unwrap();

        let expected = expected_region(&board, start);
        let mut session = session_on(board);
        session.reveal(start).unwrap();

        let revealed: BTreeSet<usize> = session
            .board()
            .cells()
            .enumerate()
            .filter(|(_, cell)| cell.state == CellState::Revealed)
            .map(|(index, _)| index)
            .collect();
        prop_assert_eq!(revealed, expected);
    }

    #[test]
    fn win_needs_every_mine_flagged_and_every_safe_cell_open(
        config in config_strategy(),
        seed in any::<u64>(),
        skip in any::<Index>(),
    ) {
        let board = RandomLayoutGenerator::seeded(seed).generate(config, None);
        let safe: Vec<usize> = (0..board.total_cells())
            .filter(|&index| !board[index].is_mine())
            .collect();
        let mines: Vec<usize> = board.mine_indices().collect();
        let skip = safe[skip.index(safe.len())];
        let mut session = session_on(board);

        // a question mark keeps the flood out of the skipped cell
        session.toggle_flag(skip).unwrap();
        session.toggle_flag(skip).unwrap();
        for &mine in &mines {
            session.toggle_flag(mine).unwrap();
        }
        for &index in &safe {
            if index != skip {
                session.reveal(index).unwrap();
            }
        }
        prop_assert_eq!(session.phase(), Phase::Running);

        session.toggle_flag(skip).unwrap();
        prop_assert_eq!(session.phase(), Phase::Running);
        prop_assert_eq!(session.reveal(skip).unwrap(), RevealOutcome::Won);
        prop_assert_eq!(session.phase(), Phase::Won);
    }

    #[test]
    fn loss_exposes_mines_and_wrong_flags(
        config in config_strategy(),
        seed in any::<u64>(),
        picks in prop::collection::vec(any::<Index>(), 0..20),
    ) {
        let board = RandomLayoutGenerator::seeded(seed).generate(config, None);
        let mines: Vec<usize> = board.mine_indices().collect();
        let first_safe = (0..board.total_cells())
            .find(|&index| !board[index].is_mine())
            .unwrap();
        let target = mines[0];
        let mut session = session_on(board);

        session.reveal(first_safe).unwrap();
        for pick in picks {
            let index = pick.index(session.board().total_cells());
            if index != target && session.board()[index].state == CellState::Covered {
                session.toggle_flag(index).unwrap();
            }
        }

        prop_assert_eq!(session.reveal(target).unwrap(), RevealOutcome::HitMine);
        prop_assert_eq!(session.phase(), Phase::Lost);
        prop_assert_eq!(session.detonated(), Some(target));

        for cell in session.board().cells() {
            match (cell.is_mine(), cell.state) {
                (true, CellState::Revealed) | (true, CellState::Flagged) => {}
                (true, state) => {
                    prop_assert!(false, "mine left {:?}", state);
                }
                (false, CellState::Flagged) => {
                    prop_assert_eq!(cell.marker, Marker::IncorrectFlag);
                }
                (false, _) => {
                    prop_assert_ne!(cell.marker, Marker::IncorrectFlag);
                }
            }
        }
        let detonated = session
            .cell_views()
            .filter(|view| *view == CellView::Detonated)
            .count();
        prop_assert_eq!(detonated, 1);
    }
}
