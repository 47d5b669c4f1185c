//! Fixed-depth minimax with alpha-beta pruning, maximizing for O.

use tracing::trace;
use uttt_core::{Move, OuterBoard};

use crate::eval;

/// Search depth in plies.
pub const SEARCH_DEPTH: u32 = 3;

/// Find the best move for O, searching [`SEARCH_DEPTH`] plies.
///
/// Moves are tried in `legal_moves` enumeration order and the first move
/// scoring strictly higher than everything seen before is kept, so ties
/// resolve to the earliest move in row-major order. Every candidate is
/// simulated on a private clone; the caller's board is never modified.
pub fn best_move(board: &OuterBoard) -> Option<Move> {
    let mut alpha = i32::MIN;
    let beta = i32::MAX;
    let mut best: Option<(Move, i32)> = None;

    for mov in board.legal_moves() {
        let mut child = board.clone();
        let applied = child.apply_move(mov);
        debug_assert!(applied.is_ok());

        let value = minimax(&child, SEARCH_DEPTH - 1, alpha, beta, false);
        trace!(?mov, value, "root candidate");
        if best.map_or(true, |(_, bv)| value > bv) {
            best = Some((mov, value));
        }
        alpha = alpha.max(value);
    }

    best.map(|(mov, _)| mov)
}

/// Minimax over clones of the board. `maximizing` is true when O is to move.
fn minimax(board: &OuterBoard, depth: u32, mut alpha: i32, mut beta: i32, maximizing: bool) -> i32 {
    if depth == 0 || !board.status().is_in_progress() {
        return eval::score(board);
    }

    if maximizing {
        let mut best = i32::MIN;
        for mov in board.legal_moves() {
            let mut child = board.clone();
            let applied = child.apply_move(mov);
            debug_assert!(applied.is_ok());

            best = best.max(minimax(&child, depth - 1, alpha, beta, false));
            alpha = alpha.max(best);
            if beta <= alpha {
                break;
            }
        }
        best
    } else {
        let mut best = i32::MAX;
        for mov in board.legal_moves() {
            let mut child = board.clone();
            let applied = child.apply_move(mov);
            debug_assert!(applied.is_ok());

            best = best.min(minimax(&child, depth - 1, alpha, beta, true));
            beta = beta.min(best);
            if beta <= alpha {
                break;
            }
        }
        best
    }
}
