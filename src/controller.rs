//! Game controller: the client-side state machine.
//!
//! The controller owns the board, mode, turn and status. Moves are committed
//! locally and then judged by a [`GameRulesService`]. The client never decides
//! on its own that a game is over. In player-vs-computer mode the controller
//! schedules the computer's reply on a tokio task after a short delay.
//!
//! State lives behind a mutex that is never held across an `.await`, and every
//! update replaces the snapshot fields wholesale.

use crate::config::{ClientConfig, StaleTurnPolicy};
use crate::games::tictactoe::{Board, GameMode, GameStatus, Mark, Position, Turn, WinningLine};
use crate::rules_client::GameRulesService;
use derive_more::Display;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

/// Coarse state of a game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Phase {
    /// No mode selected.
    Menu,
    /// Moves are accepted.
    Ongoing,
    /// The rules service reported a winner.
    Won,
    /// The rules service reported a tie.
    Tied,
}

/// Read-only view of the controller state for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GameSnapshot {
    board: Board,
    mode: Option<GameMode>,
    current_player: Turn,
    status: GameStatus,
    checking: bool,
}

impl GameSnapshot {
    /// Current board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Selected mode, `None` while in the menu.
    pub fn mode(&self) -> Option<GameMode> {
        self.mode
    }

    /// Whose turn it is.
    pub fn current_player(&self) -> Turn {
        self.current_player
    }

    /// Game status as last reported by the rules service.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Winning mark, only set when won.
    pub fn winner(&self) -> Option<Mark> {
        self.status.winner()
    }

    /// Winning line, only set when won.
    pub fn winning_line(&self) -> Option<WinningLine> {
        self.status.winning_line()
    }

    /// State machine position derived from mode and status.
    pub fn phase(&self) -> Phase {
        match (self.mode, self.status) {
            (None, _) => Phase::Menu,
            (Some(_), GameStatus::Ongoing) => Phase::Ongoing,
            (Some(_), GameStatus::Won { .. }) => Phase::Won,
            (Some(_), GameStatus::Tied) => Phase::Tied,
        }
    }

    /// True while the last placed mark waits for its state check.
    pub fn is_checking(&self) -> bool {
        self.checking
    }

    /// True when a human may click a cell right now.
    pub fn accepts_input(&self) -> bool {
        self.mode.is_some()
            && self.status.is_ongoing()
            && !self.checking
            && !(self.mode == Some(GameMode::PlayerVsComputer)
                && self.current_player == Turn::Second)
    }
}

/// Why a move attempt was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum RejectReason {
    /// Coordinates outside `0..=2`.
    #[display("coordinates off the board")]
    OffBoard,
    /// Target cell already holds a mark.
    #[display("cell is occupied")]
    Occupied,
    /// Game already won or tied.
    #[display("game is over")]
    GameOver,
    /// No mode selected.
    #[display("no game mode selected")]
    NoMode,
    /// Player-vs-computer and it is the computer's turn.
    #[display("computer's turn")]
    ComputerTurn,
    /// The previous move has not been judged yet.
    #[display("previous move still being checked")]
    AwaitingCheck,
}

/// Result of [`GameController::attempt_move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Nothing changed.
    Rejected(RejectReason),
    /// Mark placed, game continues with the other player.
    Continued,
    /// Mark placed and the game ended.
    Finished(GameStatus),
    /// Mark placed and the computer's reply is scheduled.
    ComputerScheduled,
    /// Mark placed, but the state check result was not applied because
    /// the session was reset first.
    Superseded,
}

#[derive(Debug, Default)]
struct Session {
    snapshot: GameSnapshot,
    generation: u64,
}

impl Session {
    fn check_move(&self, pos: Position) -> Result<GameMode, RejectReason> {
        let snapshot = &self.snapshot;
        let Some(mode) = snapshot.mode else {
            return Err(RejectReason::NoMode);
        };
        if !snapshot.status.is_ongoing() {
            return Err(RejectReason::GameOver);
        }
        if !snapshot.board.is_empty(pos) {
            return Err(RejectReason::Occupied);
        }
        if mode == GameMode::PlayerVsComputer && snapshot.current_player == Turn::Second {
            return Err(RejectReason::ComputerTurn);
        }
        if snapshot.checking {
            return Err(RejectReason::AwaitingCheck);
        }
        Ok(mode)
    }

    fn reset(&mut self) {
        self.generation += 1;
        self.snapshot = GameSnapshot {
            mode: self.snapshot.mode,
            ..GameSnapshot::default()
        };
    }
}

struct Shared<S> {
    service: S,
    session: Mutex<Session>,
    pending_computer_turn: Mutex<Option<JoinHandle<()>>>,
    computer_delay: Duration,
    policy: StaleTurnPolicy,
}

impl<S> Shared<S> {
    fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn pending(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.pending_computer_turn
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// True when work started under `generation` must be dropped.
    fn is_stale(&self, session: &Session, generation: u64) -> bool {
        self.policy == StaleTurnPolicy::Guarded && session.generation != generation
    }
}

impl<S: GameRulesService> Shared<S> {
    /// Asks the rules service about `board`; any failure counts as ongoing.
    async fn judge(&self, board: &Board) -> GameStatus {
        match self.service.check_game_state(board).await {
            Ok(report) => report.into(),
            Err(e) => {
                warn!(error = %e, "Game state check failed, treating game as ongoing");
                GameStatus::Ongoing
            }
        }
    }
}

impl<S: GameRulesService + 'static> Shared<S> {
    /// Judges a committed human move and advances the turn.
    async fn finish_move(
        self: Arc<Self>,
        board: Board,
        mover: Turn,
        mode: GameMode,
        generation: u64,
    ) -> MoveOutcome {
        let status = self.judge(&board).await;

        let mut session = self.session();
        if self.is_stale(&session, generation) {
            debug!("Session was reset during state check, dropping result");
            return MoveOutcome::Superseded;
        }
        if session.generation == generation {
            session.snapshot.checking = false;
        }
        session.snapshot.status = status;
        if !status.is_ongoing() {
            info!(?status, "Game over");
            return MoveOutcome::Finished(status);
        }

        let next = mover.next();
        session.snapshot.current_player = next;
        if mode == GameMode::PlayerVsComputer && next == Turn::Second {
            drop(session);
            self.schedule_computer_turn(board, generation);
            return MoveOutcome::ComputerScheduled;
        }
        MoveOutcome::Continued
    }

    fn schedule_computer_turn(self: &Arc<Self>, board: Board, generation: u64) {
        debug!(delay = ?self.computer_delay, "Scheduling computer turn");
        let shared = Arc::clone(self);
        let handle = tokio::spawn(async move {
            run_computer_turn(shared, board, generation).await;
        });
        if let Some(previous) = self.pending().replace(handle)
            && self.policy == StaleTurnPolicy::Guarded
        {
            previous.abort();
        }
    }
}

/// Owns one game session and drives it against a rules service.
///
/// Cloning yields another handle onto the same session.
pub struct GameController<S> {
    shared: Arc<Shared<S>>,
}

impl<S> Clone for GameController<S> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<S> std::fmt::Debug for GameController<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameController")
            .field("session", &*self.shared.session())
            .field("computer_delay", &self.shared.computer_delay)
            .field("policy", &self.shared.policy)
            .finish()
    }
}

impl<S: GameRulesService + 'static> GameController<S> {
    /// Creates a controller in the menu state.
    #[instrument(skip(service))]
    pub fn new(service: S, computer_delay: Duration, policy: StaleTurnPolicy) -> Self {
        info!("Creating game controller");
        Self {
            shared: Arc::new(Shared {
                service,
                session: Mutex::new(Session::default()),
                pending_computer_turn: Mutex::new(None),
                computer_delay,
                policy,
            }),
        }
    }

    /// Creates a controller using the delay and policy from `config`.
    pub fn from_config(service: S, config: &ClientConfig) -> Self {
        Self::new(service, config.computer_delay(), *config.stale_turn_policy())
    }

    /// Returns a copy of the current state.
    pub fn snapshot(&self) -> GameSnapshot {
        self.shared.session().snapshot
    }

    /// The rules service in use.
    pub fn service(&self) -> &S {
        &self.shared.service
    }

    /// Selects `mode` and starts a fresh game.
    #[instrument(skip(self))]
    pub fn start(&self, mode: GameMode) {
        {
            let mut session = self.shared.session();
            session.snapshot.mode = Some(mode);
            session.reset();
            info!(generation = session.generation, "Game started");
        }
        self.cancel_pending();
    }

    /// Clears the board and status, keeping the mode.
    #[instrument(skip(self))]
    pub fn reset(&self) {
        {
            let mut session = self.shared.session();
            session.reset();
            info!(generation = session.generation, "Game reset");
        }
        self.cancel_pending();
    }

    /// Clears the mode and resets, returning to the menu.
    #[instrument(skip(self))]
    pub fn back_to_menu(&self) {
        {
            let mut session = self.shared.session();
            session.snapshot.mode = None;
            session.reset();
            info!(generation = session.generation, "Returned to menu");
        }
        self.cancel_pending();
    }

    /// Waits for a scheduled computer turn, if any, to finish.
    pub async fn settle(&self) {
        let handle = self.shared.pending().take();
        if let Some(handle) = handle
            && let Err(e) = handle.await
            && !e.is_cancelled()
        {
            warn!(error = %e, "Computer turn task failed");
        }
    }

    /// Attempts to place the current player's mark at (`row`, `col`).
    ///
    /// Violated preconditions leave every field unchanged and yield
    /// [`MoveOutcome::Rejected`]. An accepted move is judged on its own task,
    /// so dropping the returned future does not abandon the turn halfway.
    #[instrument(skip(self))]
    pub async fn attempt_move(&self, row: usize, col: usize) -> MoveOutcome {
        let Some(pos) = Position::from_coords(row, col) else {
            debug!("Move rejected: coordinates off the board");
            return MoveOutcome::Rejected(RejectReason::OffBoard);
        };

        let (board, mover, mode, generation) = {
            let mut session = self.shared.session();
            let mode = match session.check_move(pos) {
                Ok(mode) => mode,
                Err(reason) => {
                    debug!(%reason, "Move rejected");
                    return MoveOutcome::Rejected(reason);
                }
            };
            let mover = session.snapshot.current_player;
            let board = session.snapshot.board.with_mark(pos, mover.mark());
            session.snapshot.board = board;
            session.snapshot.checking = true;
            (board, mover, mode, session.generation)
        };
        info!(%pos, mark = %mover.mark(), "Mark placed");

        let shared = Arc::clone(&self.shared);
        let judged =
            tokio::spawn(async move { shared.finish_move(board, mover, mode, generation).await });
        match judged.await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(error = %e, "State check task failed");
                let mut session = self.shared.session();
                if session.generation == generation {
                    session.snapshot.checking = false;
                }
                MoveOutcome::Superseded
            }
        }
    }

    fn cancel_pending(&self) {
        if self.shared.policy != StaleTurnPolicy::Guarded {
            return;
        }
        if let Some(handle) = self.shared.pending().take() {
            debug!("Cancelling scheduled computer turn");
            handle.abort();
        }
    }
}

/// Plays O on `board` after the configured delay.
///
/// The turn always hands play back to the first player, even when the
/// computer's move ends the game. A failed move request aborts the turn and
/// leaves the board as the human left it.
#[instrument(skip(shared, board))]
async fn run_computer_turn<S: GameRulesService>(
    shared: Arc<Shared<S>>,
    board: Board,
    generation: u64,
) {
    tokio::time::sleep(shared.computer_delay).await;

    if shared.is_stale(&shared.session(), generation) {
        debug!("Session was reset before computer turn fired");
        return;
    }

    let pos = match shared.service.compute_move(&board).await {
        Ok(pos) => pos,
        Err(e) => {
            warn!(error = %e, "Computer move request failed, abandoning turn");
            return;
        }
    };
    if !board.is_empty(pos) {
        warn!(%pos, "Computer chose an occupied cell, abandoning turn");
        return;
    }

    let next_board = board.with_mark(pos, Turn::Second.mark());
    {
        let mut session = shared.session();
        if shared.is_stale(&session, generation) {
            debug!("Session was reset while computer was choosing");
            return;
        }
        session.snapshot.board = next_board;
        if session.generation == generation {
            session.snapshot.checking = true;
        }
    }
    info!(%pos, "Computer placed mark");

    let status = shared.judge(&next_board).await;

    let mut session = shared.session();
    if shared.is_stale(&session, generation) {
        debug!("Session was reset during computer state check");
        return;
    }
    if session.generation == generation {
        session.snapshot.checking = false;
    }
    session.snapshot.status = status;
    session.snapshot.current_player = Turn::First;
}
