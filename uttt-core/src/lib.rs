//! Ultimate Tic-Tac-Toe game rules.
//!
//! # Board Structure
//!
//! The outer board is a 3x3 grid of sub-boards, each itself a 3x3 grid of
//! cells. Winning a sub-board claims the matching cell of the outer board.
//! The cell a player marks determines which sub-board the opponent must play
//! in next: a move into cell (r,c) sends the opponent to sub-board (r,c). If
//! that sub-board is already won or drawn, the opponent may play in any
//! sub-board still in progress.
//!
//! ```text
//! Positions (row-major, used for both sub-boards and cells):
//!   (0,0) (0,1) (0,2)
//!   (1,0) (1,1) (1,2)
//!   (2,0) (2,1) (2,2)
//! ```
//!
//! All mutation goes through [`OuterBoard::apply_move`], which enforces the
//! legality rules and keeps the derived state (sub-board statuses, outer
//! status, active sub-board, player to move) consistent. A rejected move
//! leaves the board untouched.
//!
//! The board is a plain value: cloning it yields a fully independent copy,
//! which is what the search in `uttt-bot` relies on for speculative moves.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A player's mark.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    /// Get the other player's mark.
    #[inline]
    pub fn opposite(self) -> Mark {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

/// A position on a 3x3 grid, addressing either a sub-board within the outer
/// board or a cell within a sub-board.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Pos {
    pub row: u8,
    pub col: u8,
}

impl Pos {
    /// Create a position from row and column (0-2 each).
    #[inline]
    pub fn new(row: u8, col: u8) -> Pos {
        debug_assert!(row < 3 && col < 3);
        Pos { row, col }
    }

    /// Iterate over all 9 positions in row-major order.
    pub fn all() -> impl Iterator<Item = Pos> {
        (0..3).flat_map(|row| (0..3).map(move |col| Pos { row, col }))
    }

    /// Whether this is the center position (1,1).
    #[inline]
    pub fn is_center(self) -> bool {
        self.row == 1 && self.col == 1
    }

    /// Whether this is one of the four corner positions.
    #[inline]
    pub fn is_corner(self) -> bool {
        self.row != 1 && self.col != 1
    }
}

/// The state of a single cell within a sub-board.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum CellState {
    Empty,
    Marked(Mark),
}

impl CellState {
    /// Whether the cell holds no mark.
    #[inline]
    pub fn is_empty(self) -> bool {
        self == CellState::Empty
    }

    /// The mark in the cell, if any.
    #[inline]
    pub fn mark(self) -> Option<Mark> {
        match self {
            CellState::Empty => None,
            CellState::Marked(mark) => Some(mark),
        }
    }
}

/// The status of a board, at both sub-board and whole-game granularity.
///
/// Once a board leaves `InProgress` it never goes back: won and drawn boards
/// are terminal.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum BoardStatus {
    InProgress,
    Won(Mark),
    Draw,
}

impl BoardStatus {
    /// Whether the board is still being played.
    #[inline]
    pub fn is_in_progress(self) -> bool {
        self == BoardStatus::InProgress
    }

    /// The winning mark, if the board has been won.
    #[inline]
    pub fn winner(self) -> Option<Mark> {
        match self {
            BoardStatus::Won(mark) => Some(mark),
            _ => None,
        }
    }
}

/// A move: a target sub-board and a cell within it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Move {
    /// Which sub-board to play in.
    pub sub: Pos,
    /// Which cell of that sub-board to mark.
    pub cell: Pos,
}

impl Move {
    /// Create a move from sub-board and cell coordinates.
    #[inline]
    pub fn new(sub: Pos, cell: Pos) -> Move {
        Move { sub, cell }
    }
}

/// Why a move was rejected.
///
/// Rejection is always a pure no-op: the board is left exactly as it was.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Error)]
pub enum IllegalMove {
    /// The game has already been won or drawn.
    #[error("the game is already over")]
    GameOver,
    /// A different sub-board is the mandatory target for this move.
    #[error("a different sub-board is active")]
    WrongSubBoard,
    /// The target sub-board has already been won or drawn.
    #[error("the target sub-board is already decided")]
    SubBoardClosed,
    /// The target cell already holds a mark.
    #[error("the target cell is occupied")]
    CellOccupied,
}

// ============================================================================
// Line evaluation
// ============================================================================

/// The 8 winning lines of a 3x3 grid, in scan order: rows top to bottom,
/// columns left to right, then the two diagonals.
pub const LINES: [[Pos; 3]; 8] = [
    [Pos { row: 0, col: 0 }, Pos { row: 0, col: 1 }, Pos { row: 0, col: 2 }], // Row 0
    [Pos { row: 1, col: 0 }, Pos { row: 1, col: 1 }, Pos { row: 1, col: 2 }], // Row 1
    [Pos { row: 2, col: 0 }, Pos { row: 2, col: 1 }, Pos { row: 2, col: 2 }], // Row 2
    [Pos { row: 0, col: 0 }, Pos { row: 1, col: 0 }, Pos { row: 2, col: 0 }], // Col 0
    [Pos { row: 0, col: 1 }, Pos { row: 1, col: 1 }, Pos { row: 2, col: 1 }], // Col 1
    [Pos { row: 0, col: 2 }, Pos { row: 1, col: 2 }, Pos { row: 2, col: 2 }], // Col 2
    [Pos { row: 0, col: 0 }, Pos { row: 1, col: 1 }, Pos { row: 2, col: 2 }], // Main diagonal
    [Pos { row: 0, col: 2 }, Pos { row: 1, col: 1 }, Pos { row: 2, col: 0 }], // Anti-diagonal
];

/// Find a line of three equal marks on a 3x3 grid.
///
/// `mark_at` maps each position to the mark counted for it (a cell's mark, or
/// the winner of a sub-board). Lines are scanned in [`LINES`] order and the
/// first complete triple wins; in a legal game at most one winner exists, so
/// the order only matters for deterministic testing.
pub fn evaluate_lines<F>(mark_at: F) -> Option<Mark>
where
    F: Fn(Pos) -> Option<Mark>,
{
    for line in &LINES {
        if let Some(mark) = mark_at(line[0]) {
            if mark_at(line[1]) == Some(mark) && mark_at(line[2]) == Some(mark) {
                return Some(mark);
            }
        }
    }
    None
}

// ============================================================================
// Sub-board
// ============================================================================

/// One 3x3 cell grid within the outer board.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct SubBoard {
    cells: [[CellState; 3]; 3],
    status: BoardStatus,
}

impl Default for SubBoard {
    fn default() -> Self {
        SubBoard::new()
    }
}

impl SubBoard {
    /// Create an empty, in-progress sub-board.
    pub fn new() -> SubBoard {
        SubBoard {
            cells: [[CellState::Empty; 3]; 3],
            status: BoardStatus::InProgress,
        }
    }

    /// Get the state of a cell.
    #[inline]
    pub fn cell(&self, pos: Pos) -> CellState {
        self.cells[pos.row as usize][pos.col as usize]
    }

    /// Get the sub-board's status.
    #[inline]
    pub fn status(&self) -> BoardStatus {
        self.status
    }

    /// Whether every cell holds a mark.
    pub fn is_full(&self) -> bool {
        Pos::all().all(|pos| !self.cell(pos).is_empty())
    }

    /// Find a line of three equal marks among this sub-board's cells.
    pub fn line_winner(&self) -> Option<Mark> {
        evaluate_lines(|pos| self.cell(pos).mark())
    }

    /// Set a cell directly, without validation.
    ///
    /// Low-level position setup; normal play goes through
    /// [`OuterBoard::apply_move`], which keeps the derived state consistent.
    pub fn set_cell(&mut self, pos: Pos, state: CellState) {
        self.cells[pos.row as usize][pos.col as usize] = state;
    }

    /// Set the status directly, without validation.
    ///
    /// Low-level position setup, same caveat as [`SubBoard::set_cell`].
    pub fn set_status(&mut self, status: BoardStatus) {
        self.status = status;
    }

    /// Recompute the status from the cells: a line of three equal marks wins,
    /// a full grid with no line is a draw, anything else stays in progress.
    /// Terminal statuses are never downgraded.
    fn update_status(&mut self) {
        if !self.status.is_in_progress() {
            return;
        }
        if let Some(mark) = self.line_winner() {
            self.status = BoardStatus::Won(mark);
        } else if self.is_full() {
            self.status = BoardStatus::Draw;
        }
    }
}

// ============================================================================
// Outer board
// ============================================================================

/// The full game state: nine sub-boards plus turn and targeting information.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct OuterBoard {
    boards: [[SubBoard; 3]; 3],
    /// The sub-board the next move must target. `None` means any sub-board
    /// still in progress is playable (game start, or the previous move sent
    /// the player to a decided sub-board). When `Some`, the named sub-board
    /// is always in progress.
    active_sub_board: Option<Pos>,
    current_player: Mark,
    status: BoardStatus,
}

impl Default for OuterBoard {
    fn default() -> Self {
        OuterBoard::new()
    }
}

impl OuterBoard {
    /// Create an empty board with X to move and no sub-board restriction.
    pub fn new() -> OuterBoard {
        OuterBoard {
            boards: Default::default(),
            active_sub_board: None,
            current_player: Mark::X,
            status: BoardStatus::InProgress,
        }
    }

    /// Get a sub-board by its position on the outer grid.
    #[inline]
    pub fn sub_board(&self, pos: Pos) -> &SubBoard {
        &self.boards[pos.row as usize][pos.col as usize]
    }

    /// Mutable access to a sub-board, without validation.
    ///
    /// Low-level position setup; normal play goes through
    /// [`OuterBoard::apply_move`].
    pub fn sub_board_mut(&mut self, pos: Pos) -> &mut SubBoard {
        &mut self.boards[pos.row as usize][pos.col as usize]
    }

    /// The sub-board the next move must target, if restricted.
    #[inline]
    pub fn active_sub_board(&self) -> Option<Pos> {
        self.active_sub_board
    }

    /// Set the active sub-board directly, without validation.
    pub fn set_active_sub_board(&mut self, pos: Option<Pos>) {
        self.active_sub_board = pos;
    }

    /// The player whose turn it is.
    #[inline]
    pub fn current_player(&self) -> Mark {
        self.current_player
    }

    /// Set the player to move. Used when resolving who moves first; only
    /// meaningful before any move has been made.
    pub fn set_current_player(&mut self, mark: Mark) {
        self.current_player = mark;
    }

    /// The status of the game as a whole.
    #[inline]
    pub fn status(&self) -> BoardStatus {
        self.status
    }

    /// Check a move against the rules, reporting why it would be rejected.
    pub fn check_move(&self, mov: Move) -> Result<(), IllegalMove> {
        if !self.status.is_in_progress() {
            return Err(IllegalMove::GameOver);
        }
        if let Some(active) = self.active_sub_board {
            if active != mov.sub {
                return Err(IllegalMove::WrongSubBoard);
            }
        }
        let sub = self.sub_board(mov.sub);
        if !sub.status.is_in_progress() {
            return Err(IllegalMove::SubBoardClosed);
        }
        if !sub.cell(mov.cell).is_empty() {
            return Err(IllegalMove::CellOccupied);
        }
        Ok(())
    }

    /// Whether the move would be accepted by [`OuterBoard::apply_move`].
    #[inline]
    pub fn is_legal(&self, mov: Move) -> bool {
        self.check_move(mov).is_ok()
    }

    /// Apply a move for the current player.
    ///
    /// On success this marks the cell, recomputes the target sub-board's
    /// status, recomputes the outer status (won sub-boards count as marks on
    /// the outer grid; drawn and in-progress sub-boards break lines but do
    /// not end the game), and, if the game continues, retargets the active
    /// sub-board to the cell just played (or clears it when that sub-board is
    /// decided) and passes the turn. A game-ending move clears the active
    /// sub-board instead, so the pointer never names a decided sub-board.
    ///
    /// On rejection the board is left untouched.
    pub fn apply_move(&mut self, mov: Move) -> Result<(), IllegalMove> {
        self.check_move(mov)?;
        let mark = self.current_player;

        let sub = self.sub_board_mut(mov.sub);
        sub.set_cell(mov.cell, CellState::Marked(mark));
        sub.update_status();

        if let Some(winner) = evaluate_lines(|pos| self.sub_board(pos).status.winner()) {
            self.status = BoardStatus::Won(winner);
        } else if Pos::all().all(|pos| !self.sub_board(pos).status.is_in_progress()) {
            self.status = BoardStatus::Draw;
        }

        if self.status.is_in_progress() {
            self.active_sub_board = if self.sub_board(mov.cell).status.is_in_progress() {
                Some(mov.cell)
            } else {
                None
            };
            self.current_player = mark.opposite();
        } else {
            // The active pointer must never name a decided sub-board; the
            // finishing move usually just decided its own target.
            self.active_sub_board = None;
        }
        Ok(())
    }

    /// Enumerate every legal move: sub-boards in row-major order, cells in
    /// row-major order within each. Empty iff the game is over.
    pub fn legal_moves(&self) -> Vec<Move> {
        let mut moves = Vec::with_capacity(81);
        if !self.status.is_in_progress() {
            return moves;
        }
        match self.active_sub_board {
            Some(sub) => self.collect_moves(sub, &mut moves),
            None => {
                for sub in Pos::all() {
                    if self.sub_board(sub).status.is_in_progress() {
                        self.collect_moves(sub, &mut moves);
                    }
                }
            }
        }
        moves
    }

    fn collect_moves(&self, sub: Pos, moves: &mut Vec<Move>) {
        let board = self.sub_board(sub);
        for cell in Pos::all() {
            if board.cell(cell).is_empty() {
                moves.push(Move { sub, cell });
            }
        }
    }
}
