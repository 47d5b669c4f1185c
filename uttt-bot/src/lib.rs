//! Move selection for the Ultimate Tic-Tac-Toe bot.
//!
//! The bot always plays [`BOT_MARK`] (O). Two strategies are available:
//! a uniform-random pick over the legal moves ([`Difficulty::Easy`]) and a
//! fixed-depth minimax with alpha-beta pruning ([`Difficulty::Hard`]).
//!
//! Selection never touches the caller's board: the search simulates on
//! private clones and only reports the chosen move. Applying it is the
//! caller's job, through the same `apply_move` path human moves take.

pub mod eval;
mod search;

use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use uttt_core::{Mark, Move, OuterBoard};

/// The mark the bot plays.
pub const BOT_MARK: Mark = Mark::O;

/// How hard the bot tries.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Difficulty {
    /// Uniform-random choice over the legal moves.
    Easy,
    /// Depth-limited minimax with alpha-beta pruning.
    Hard,
}

/// Pick a move for the bot, or `None` when no legal move exists.
///
/// For [`Difficulty::Hard`] the board is expected to have O to move; the
/// search maximizes for O and minimizes for X from there.
pub fn choose_move<R: Rng + ?Sized>(
    board: &OuterBoard,
    difficulty: Difficulty,
    rng: &mut R,
) -> Option<Move> {
    let chosen = match difficulty {
        Difficulty::Easy => board.legal_moves().choose(rng).copied(),
        Difficulty::Hard => search::best_move(board),
    };
    debug!(?difficulty, ?chosen, "bot move selected");
    chosen
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use uttt_core::{BoardStatus, CellState, Pos};

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn test_easy_picks_a_legal_move() {
        let board = OuterBoard::new();
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mov = choose_move(&board, Difficulty::Easy, &mut rng).unwrap();
            assert!(board.is_legal(mov));
        }
    }

    #[test]
    fn test_easy_single_legal_move_is_forced() {
        // Active sub-board with exactly one open cell and no completed line.
        let mut board = OuterBoard::new();
        let pattern = [
            (0, 0, Mark::X),
            (0, 1, Mark::X),
            (0, 2, Mark::O),
            (1, 0, Mark::O),
            (1, 1, Mark::O),
            (1, 2, Mark::X),
            (2, 0, Mark::X),
            (2, 1, Mark::O),
        ];
        let sub = board.sub_board_mut(Pos::new(1, 0));
        for (r, c, mark) in pattern {
            sub.set_cell(Pos::new(r, c), CellState::Marked(mark));
        }
        board.set_active_sub_board(Some(Pos::new(1, 0)));
        board.set_current_player(BOT_MARK);

        let forced = Move::new(Pos::new(1, 0), Pos::new(2, 2));
        assert_eq!(board.legal_moves(), vec![forced]);
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            assert_eq!(choose_move(&board, Difficulty::Easy, &mut rng), Some(forced));
        }
    }

    #[test]
    fn test_no_move_on_finished_game() {
        let mut board = OuterBoard::new();
        for col in 0..2 {
            board
                .sub_board_mut(Pos::new(0, col))
                .set_status(BoardStatus::Won(Mark::X));
        }
        let sub = board.sub_board_mut(Pos::new(0, 2));
        sub.set_cell(Pos::new(0, 0), CellState::Marked(Mark::X));
        sub.set_cell(Pos::new(0, 1), CellState::Marked(Mark::X));
        board.apply_move(Move::new(Pos::new(0, 2), Pos::new(0, 2))).unwrap();
        assert_eq!(board.status(), BoardStatus::Won(Mark::X));

        assert_eq!(choose_move(&board, Difficulty::Easy, &mut rng()), None);
        assert_eq!(choose_move(&board, Difficulty::Hard, &mut rng()), None);
    }
}
