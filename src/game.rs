use std::time::{Duration, Instant};

use log::{debug, info};

use crate::error::{GameError, MoveError};
use crate::permutation::{Cell, Permutation, CELLS};
use crate::puzzle::{Board, Direction, Slide};

/// Source of the current time. Games read it at start, on every elapsed-time
/// query and at the solved transition.
pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Idle,
    InProgress,
    Solved,
}

/// An accepted move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    pub slide: Slide,
    pub moves: u32,
    pub solved: bool,
}

pub struct Game<C: Clock = SystemClock> {
    board: Board,
    initial: Permutation,
    state: GameState,
    moves: u32,
    started: Option<Instant>,
    finished: Option<Duration>,
    clock: C,
}

impl Game<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for Game<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> Game<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            board: Board::new(),
            initial: Permutation::solved(),
            state: GameState::Idle,
            moves: 0,
            started: None,
            finished: None,
            clock,
        }
    }

    /// Replaces the board with `permutation` and starts the timer.
    ///
    /// A running game is only discarded when `force_restart` is set; the
    /// caller decides whether to ask the player first.
    pub fn start(&mut self, permutation: Permutation, force_restart: bool) -> Result<(), GameError> {
        if self.state == GameState::InProgress && !force_restart {
            return Err(GameError::GameInProgress);
        }

        self.board = Board::from_permutation(&permutation);
        self.initial = permutation;
        self.state = GameState::InProgress;
        self.moves = 0;
        self.started = Some(self.clock.now());
        self.finished = None;

        info!("new game started from {}", permutation);
        Ok(())
    }

    pub fn attempt_move(&mut self, row: isize, column: isize) -> Result<MoveOutcome, MoveError> {
        if self.state != GameState::InProgress {
            return Err(MoveError::NotInProgress);
        }

        let slide = self.board.slide(row, column)?;
        self.moves += 1;
        debug!(
            "move {}: tile {} from {:?} to {:?}",
            self.moves, slide.tile, slide.from, slide.to
        );

        let solved = self.board.is_solved();
        if solved {
            let elapsed = self.elapsed();
            self.finished = Some(elapsed);
            self.state = GameState::Solved;
            info!(
                "solved in {} moves and {}s",
                self.moves,
                elapsed.as_secs()
            );
        }

        Ok(MoveOutcome {
            slide,
            moves: self.moves,
            solved,
        })
    }

    pub fn attempt_directional_move(&mut self, direction: Direction) -> Result<MoveOutcome, MoveError> {
        let (row, column) = self.board.target(direction);
        self.attempt_move(row, column)
    }

    pub fn is_solved(&self) -> bool {
        self.board.is_solved()
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn elapsed(&self) -> Duration {
        match (self.finished, self.started) {
            (Some(finished), _) => finished,
            (None, Some(started)) => self.clock.now().saturating_duration_since(started),
            (None, None) => Duration::ZERO,
        }
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed().as_secs()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn blank(&self) -> (usize, usize) {
        self.board.blank()
    }

    pub fn cells(&self) -> [Cell; CELLS] {
        self.board.cells()
    }

    /// The permutation this game started from.
    pub fn initial(&self) -> &Permutation {
        &self.initial
    }
}
