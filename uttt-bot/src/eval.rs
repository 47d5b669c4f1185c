//! Static evaluation of a board from the bot's (O's) point of view.

use uttt_core::{BoardStatus, Mark, OuterBoard, Pos};

/// Score for a decided game.
pub const OUTER_WIN: i32 = 1000;
/// Score per won sub-board.
pub const SUB_WIN: i32 = 100;
/// Extra for the bot holding the center sub-board.
pub const CENTER_BONUS: i32 = 30;
/// Extra for the bot holding a corner sub-board.
pub const CORNER_BONUS: i32 = 20;

/// Evaluate a position: positive favors O, negative favors X.
///
/// A decided game dominates everything at ±[`OUTER_WIN`] (draws are 0).
/// Otherwise each won sub-board counts ±[`SUB_WIN`], and O-won sub-boards
/// collect the positional bonuses on top. The bonuses apply to O only; X-won
/// center and corner sub-boards score plain ±[`SUB_WIN`].
pub fn score(board: &OuterBoard) -> i32 {
    match board.status() {
        BoardStatus::Won(Mark::O) => OUTER_WIN,
        BoardStatus::Won(Mark::X) => -OUTER_WIN,
        BoardStatus::Draw => 0,
        BoardStatus::InProgress => {
            let mut total = 0;
            for pos in Pos::all() {
                match board.sub_board(pos).status().winner() {
                    Some(Mark::O) => {
                        total += SUB_WIN;
                        if pos.is_center() {
                            total += CENTER_BONUS;
                        } else if pos.is_corner() {
                            total += CORNER_BONUS;
                        }
                    }
                    Some(Mark::X) => total -= SUB_WIN,
                    None => {}
                }
            }
            total
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uttt_core::{CellState, Move};

    #[test]
    fn test_empty_board_is_neutral() {
        assert_eq!(score(&OuterBoard::new()), 0);
    }

    #[test]
    fn test_decided_games_dominate() {
        // O completes the middle row of sub-boards with a real move.
        let mut board = OuterBoard::new();
        board
            .sub_board_mut(Pos::new(1, 0))
            .set_status(BoardStatus::Won(Mark::O));
        board
            .sub_board_mut(Pos::new(1, 1))
            .set_status(BoardStatus::Won(Mark::O));
        let sub = board.sub_board_mut(Pos::new(1, 2));
        sub.set_cell(Pos::new(0, 0), CellState::Marked(Mark::O));
        sub.set_cell(Pos::new(0, 1), CellState::Marked(Mark::O));
        board.set_current_player(Mark::O);
        board
            .apply_move(Move::new(Pos::new(1, 2), Pos::new(0, 2)))
            .unwrap();
        assert_eq!(board.status(), BoardStatus::Won(Mark::O));
        assert_eq!(score(&board), OUTER_WIN);

        // Same for X, via the main diagonal.
        let mut board = OuterBoard::new();
        board
            .sub_board_mut(Pos::new(0, 0))
            .set_status(BoardStatus::Won(Mark::X));
        board
            .sub_board_mut(Pos::new(1, 1))
            .set_status(BoardStatus::Won(Mark::X));
        let sub = board.sub_board_mut(Pos::new(2, 2));
        sub.set_cell(Pos::new(1, 0), CellState::Marked(Mark::X));
        sub.set_cell(Pos::new(1, 1), CellState::Marked(Mark::X));
        board
            .apply_move(Move::new(Pos::new(2, 2), Pos::new(1, 2)))
            .unwrap();
        assert_eq!(board.status(), BoardStatus::Won(Mark::X));
        assert_eq!(score(&board), -OUTER_WIN);
    }

    #[test]
    fn test_sub_board_material() {
        let mut board = OuterBoard::new();
        board
            .sub_board_mut(Pos::new(0, 1))
            .set_status(BoardStatus::Won(Mark::O));
        assert_eq!(score(&board), SUB_WIN);

        board
            .sub_board_mut(Pos::new(1, 0))
            .set_status(BoardStatus::Won(Mark::X));
        assert_eq!(score(&board), 0);

        board
            .sub_board_mut(Pos::new(2, 1))
            .set_status(BoardStatus::Won(Mark::X));
        assert_eq!(score(&board), -SUB_WIN);
    }

    #[test]
    fn test_positional_bonuses_for_o() {
        let mut board = OuterBoard::new();
        board
            .sub_board_mut(Pos::new(1, 1))
            .set_status(BoardStatus::Won(Mark::O));
        assert_eq!(score(&board), SUB_WIN + CENTER_BONUS);

        let mut board = OuterBoard::new();
        board
            .sub_board_mut(Pos::new(2, 0))
            .set_status(BoardStatus::Won(Mark::O));
        assert_eq!(score(&board), SUB_WIN + CORNER_BONUS);

        // Edge sub-boards get no bonus.
        let mut board = OuterBoard::new();
        board
            .sub_board_mut(Pos::new(0, 1))
            .set_status(BoardStatus::Won(Mark::O));
        assert_eq!(score(&board), SUB_WIN);
    }

    #[test]
    fn test_bonuses_are_o_only() {
        // Known asymmetry: X gets no center/corner bonus (or penalty).
        let mut board = OuterBoard::new();
        board
            .sub_board_mut(Pos::new(1, 1))
            .set_status(BoardStatus::Won(Mark::X));
        assert_eq!(score(&board), -SUB_WIN);

        let mut board = OuterBoard::new();
        board
            .sub_board_mut(Pos::new(0, 0))
            .set_status(BoardStatus::Won(Mark::X));
        assert_eq!(score(&board), -SUB_WIN);
    }

    #[test]
    fn test_drawn_sub_boards_score_nothing() {
        let mut board = OuterBoard::new();
        board
            .sub_board_mut(Pos::new(1, 1))
            .set_status(BoardStatus::Draw);
        assert_eq!(score(&board), 0);
    }
}
