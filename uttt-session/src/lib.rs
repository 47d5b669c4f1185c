//! Session controller for Ultimate Tic-Tac-Toe.
//!
//! Orchestrates the game engine and the bot behind a single surface meant
//! for an external UI layer: the UI calls [`GameSession::start_new_game`] and
//! [`GameSession::make_move`], renders from [`GameSession::snapshot`] (or a
//! [`GameSession::subscribe`] watch channel), and drives the bot's deferred
//! turn on its own single-threaded runtime:
//!
//! ```text
//! if session.bot_turn_pending() {
//!     session.bot_turn().await; // sleeps ~0.5s, re-checks, then moves
//! }
//! ```
//!
//! All mutation happens on one logical thread of control. The bot's move is
//! never applied inline with the human move that triggered it: it runs after
//! a short pacing delay, and re-validates the session phase on wake so a
//! `start_new_game` issued mid-delay voids the stale turn. Human input while
//! the bot "thinks" is rejected by the phase guard here, not by the UI.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info};

use uttt_bot::{choose_move, Difficulty, BOT_MARK};
use uttt_core::{BoardStatus, Mark, Move, OuterBoard};

/// Pacing delay before the bot's deferred move is played.
pub const BOT_MOVE_DELAY: Duration = Duration::from_millis(500);

/// Who is playing.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub enum GameMode {
    /// Human (X) against the bot (O).
    SinglePlayer,
    /// Two humans sharing the board.
    TwoPlayers,
}

/// How the first player is decided when a game starts.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub enum FirstMoveRule {
    /// The named mark moves first.
    Direct(Mark),
    /// A coin flip decides.
    Random,
}

/// Where the session is in its lifecycle.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub enum Phase {
    /// No game has been started yet.
    NotStarted,
    /// Waiting for a human move.
    AwaitingHumanMove,
    /// A bot move is pending; human input is rejected.
    AwaitingBotMove,
    /// The game ended; see the result fields of the snapshot.
    Finished,
}

/// An immutable view of the session for rendering.
#[derive(Clone, Debug, Serialize)]
pub struct Snapshot {
    pub board: OuterBoard,
    pub current_player: Mark,
    pub phase: Phase,
    /// The winner, once the game is won.
    pub winning_mark: Option<Mark>,
    /// Set when the game ended in a draw.
    pub is_draw: bool,
    /// Set when the UI should present the outcome screen.
    pub show_result: bool,
}

/// The session controller: one board, one bot, one state machine.
pub struct GameSession {
    board: OuterBoard,
    mode: GameMode,
    difficulty: Difficulty,
    phase: Phase,
    winning_mark: Option<Mark>,
    is_draw: bool,
    show_result: bool,
    rng: StdRng,
    changes: watch::Sender<Snapshot>,
}

impl Default for GameSession {
    fn default() -> Self {
        GameSession::new()
    }
}

impl GameSession {
    /// Create an idle session. Nothing happens until
    /// [`GameSession::start_new_game`].
    pub fn new() -> GameSession {
        GameSession::with_rng(StdRng::from_os_rng())
    }

    /// Create a session with a caller-supplied RNG, for deterministic play.
    pub fn with_rng(rng: StdRng) -> GameSession {
        let board = OuterBoard::new();
        let initial = Snapshot {
            board: board.clone(),
            current_player: board.current_player(),
            phase: Phase::NotStarted,
            winning_mark: None,
            is_draw: false,
            show_result: false,
        };
        GameSession {
            board,
            mode: GameMode::TwoPlayers,
            difficulty: Difficulty::Easy,
            phase: Phase::NotStarted,
            winning_mark: None,
            is_draw: false,
            show_result: false,
            rng,
            changes: watch::channel(initial).0,
        }
    }

    /// Start a fresh game, discarding any board in progress.
    ///
    /// The first player comes from `first_move_rule`, either directly or by
    /// coin flip. In single-player mode with O moving first the session
    /// enters [`Phase::AwaitingBotMove`] and the caller should drive
    /// [`GameSession::bot_turn`].
    pub fn start_new_game(
        &mut self,
        mode: GameMode,
        first_move_rule: FirstMoveRule,
        difficulty: Difficulty,
    ) {
        self.board = OuterBoard::new();
        self.mode = mode;
        self.difficulty = difficulty;
        self.winning_mark = None;
        self.is_draw = false;
        self.show_result = false;

        let first = match first_move_rule {
            FirstMoveRule::Direct(mark) => mark,
            FirstMoveRule::Random => {
                if self.rng.random_bool(0.5) {
                    Mark::X
                } else {
                    Mark::O
                }
            }
        };
        self.board.set_current_player(first);

        self.phase = if mode == GameMode::SinglePlayer && first == BOT_MARK {
            Phase::AwaitingBotMove
        } else {
            Phase::AwaitingHumanMove
        };
        info!(?mode, ?difficulty, ?first, "new game started");
        self.publish();
    }

    /// Attempt a human move.
    ///
    /// Silently ignored (the session is left untouched) unless a human move
    /// is awaited, the mover is not the bot's mark, and the move is legal.
    pub fn make_move(&mut self, mov: Move) {
        if self.phase != Phase::AwaitingHumanMove {
            debug!(?mov, phase = ?self.phase, "move ignored: not awaiting human input");
            return;
        }
        if self.mode == GameMode::SinglePlayer && self.board.current_player() == BOT_MARK {
            debug!(?mov, "move ignored: it is the bot's turn");
            return;
        }
        let mover = self.board.current_player();
        match self.board.apply_move(mov) {
            Ok(()) => {
                debug!(?mov, player = ?mover, "human move applied");
                self.finish_turn();
            }
            Err(reason) => debug!(?mov, %reason, "move rejected"),
        }
    }

    /// Whether a bot move is pending; when true the caller should await
    /// [`GameSession::bot_turn`].
    pub fn bot_turn_pending(&self) -> bool {
        self.phase == Phase::AwaitingBotMove
    }

    /// Play the bot's deferred turn: wait out the pacing delay, then move.
    ///
    /// The phase is re-validated after the delay, so a `start_new_game`
    /// issued in between turns this into a no-op rather than a move on the
    /// wrong board.
    pub async fn bot_turn(&mut self) {
        tokio::time::sleep(BOT_MOVE_DELAY).await;
        if self.phase != Phase::AwaitingBotMove {
            debug!(phase = ?self.phase, "deferred bot turn voided");
            return;
        }
        self.run_bot_turn();
    }

    /// The bot picks and applies a move, if one is due.
    fn run_bot_turn(&mut self) {
        if self.phase != Phase::AwaitingBotMove || !self.board.status().is_in_progress() {
            return;
        }
        // No legal move only happens on a decided board, which the guard
        // above already excludes.
        if let Some(mov) = choose_move(&self.board, self.difficulty, &mut self.rng) {
            if self.board.apply_move(mov).is_ok() {
                debug!(?mov, "bot move applied");
                self.finish_turn();
            }
        }
    }

    /// Advance the state machine after an accepted move.
    fn finish_turn(&mut self) {
        match self.board.status() {
            BoardStatus::InProgress => {
                self.phase = if self.mode == GameMode::SinglePlayer
                    && self.board.current_player() == BOT_MARK
                {
                    Phase::AwaitingBotMove
                } else {
                    Phase::AwaitingHumanMove
                };
            }
            BoardStatus::Won(mark) => {
                self.winning_mark = Some(mark);
                self.show_result = true;
                self.phase = Phase::Finished;
                info!(winner = ?mark, "game won");
            }
            BoardStatus::Draw => {
                self.is_draw = true;
                self.show_result = true;
                self.phase = Phase::Finished;
                info!("game drawn");
            }
        }
        self.publish();
    }

    /// The current state, copied out for rendering.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board.clone(),
            current_player: self.board.current_player(),
            phase: self.phase,
            winning_mark: self.winning_mark,
            is_draw: self.is_draw,
            show_result: self.show_result,
        }
    }

    /// Subscribe to state changes; a fresh snapshot is published after every
    /// accepted transition.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.changes.subscribe()
    }

    fn publish(&mut self) {
        self.changes.send_replace(self.snapshot());
    }

    /// The board as currently played.
    pub fn board(&self) -> &OuterBoard {
        &self.board
    }

    /// Where the session is in its lifecycle.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The player whose turn it is.
    pub fn current_player(&self) -> Mark {
        self.board.current_player()
    }

    /// The winner, once the game is won.
    pub fn winning_mark(&self) -> Option<Mark> {
        self.winning_mark
    }

    /// Whether the game ended in a draw.
    pub fn is_draw(&self) -> bool {
        self.is_draw
    }

    /// Whether the UI should present the outcome screen.
    pub fn show_result(&self) -> bool {
        self.show_result
    }
}
