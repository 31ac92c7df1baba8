use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::MoveError;
use crate::game::{Clock, Game, GameState, MoveOutcome, SystemClock};
use crate::permutation::{self, Cell, Permutation, SIDE};
use crate::puzzle::Direction;
use crate::scores::{ScoreRecord, ScoreStore, Scoreboard};

/// Everything a front end needs to draw the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardView {
    pub grid: [[Cell; SIDE]; SIDE],
    pub moves: u32,
    pub elapsed_secs: u64,
    pub state: GameState,
}

/// The presentation side of the game: drawing, the solved notice and the
/// restart prompt.
pub trait Frontend {
    fn render(&mut self, view: &BoardView);

    /// Periodic redraw while the board is unchanged, e.g. for the timer.
    fn tick(&mut self, view: &BoardView) {
        self.render(view);
    }

    /// `rank` is the 0-based place on the score list, if the result made it.
    fn solved(&mut self, record: &ScoreRecord, rank: Option<usize>);

    /// Asked before a running game is thrown away.
    fn confirm_restart(&mut self) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewGame {
    Shuffle,
    /// Start position of the score at this 0-based rank.
    Replay(usize),
    /// A caller-supplied start position.
    Position(Permutation),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveRequest {
    At { row: isize, column: isize },
    Toward(Direction),
}

pub struct Controller<F: Frontend, C: Clock = SystemClock> {
    game: Game<C>,
    frontend: F,
    rng: StdRng,
    scores: Option<ScoreStore>,
    replay: bool,
}

impl<F: Frontend> Controller<F> {
    pub fn new(frontend: F) -> Self {
        Self::with_game(Game::new(), frontend)
    }
}

impl<F: Frontend, C: Clock> Controller<F, C> {
    pub fn with_game(game: Game<C>, frontend: F) -> Self {
        Self {
            game,
            frontend,
            rng: StdRng::from_entropy(),
            scores: None,
            replay: false,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Records solved games in `store`. With `replay` each record also
    /// carries its start position, and stored games can be replayed.
    pub fn with_scores(mut self, store: ScoreStore, replay: bool) -> Self {
        self.scores = Some(store);
        self.replay = replay;
        self
    }

    pub fn replay_enabled(&self) -> bool {
        self.replay && self.scores.is_some()
    }

    /// Starts a new game. Returns `false` if the player kept the running one.
    pub fn request_new_game(&mut self, force_restart: bool, source: NewGame) -> bool {
        if self.game.state() == GameState::InProgress
            && !force_restart
            && !self.frontend.confirm_restart()
        {
            return false;
        }

        let permutation = match source {
            NewGame::Shuffle => permutation::shuffle_with(&mut self.rng),
            NewGame::Replay(rank) => match self.stored_start(rank) {
                Some(p) => p,
                None => {
                    warn!("no replayable game at rank {}, shuffling instead", rank + 1);
                    permutation::shuffle_with(&mut self.rng)
                }
            },
            NewGame::Position(p) if p.is_solvable() => p,
            NewGame::Position(p) => {
                warn!("start position {} is not solvable, shuffling instead", p);
                permutation::shuffle_with(&mut self.rng)
            }
        };

        if let Err(e) = self.game.start(permutation, true) {
            warn!("could not start game: {}", e);
            return false;
        }
        self.refresh();
        true
    }

    pub fn request_move(&mut self, request: MoveRequest) -> Result<MoveOutcome, MoveError> {
        let outcome = match request {
            MoveRequest::At { row, column } => self.game.attempt_move(row, column),
            MoveRequest::Toward(direction) => self.game.attempt_directional_move(direction),
        }?;

        self.refresh();
        if outcome.solved {
            self.finish();
        }
        Ok(outcome)
    }

    /// Full redraw without changing anything.
    pub fn refresh(&mut self) {
        let view = self.view();
        self.frontend.render(&view);
    }

    /// Lets the front end update the clock.
    pub fn tick(&mut self) {
        let view = self.view();
        self.frontend.tick(&view);
    }

    pub fn view(&self) -> BoardView {
        BoardView {
            grid: *self.game.board().rows(),
            moves: self.game.moves(),
            elapsed_secs: self.game.elapsed_secs(),
            state: self.game.state(),
        }
    }

    /// The stored score list, or `None` when score keeping is off or the
    /// file cannot be read.
    pub fn scoreboard(&self) -> Option<Scoreboard> {
        let store = self.scores.as_ref()?;
        match store.load() {
            Ok(board) => Some(board),
            Err(e) => {
                warn!("{}", e);
                None
            }
        }
    }

    pub fn game(&self) -> &Game<C> {
        &self.game
    }

    pub fn frontend(&self) -> &F {
        &self.frontend
    }

    pub fn frontend_mut(&mut self) -> &mut F {
        &mut self.frontend
    }

    fn stored_start(&self, rank: usize) -> Option<Permutation> {
        if !self.replay_enabled() {
            warn!("replay is disabled");
            return None;
        }
        let board = self.scoreboard()?;
        let initial = board.get(rank)?.initial?;
        initial.is_solvable().then_some(initial)
    }

    fn finish(&mut self) {
        let initial = self.replay.then(|| *self.game.initial());
        let record = ScoreRecord::new(self.game.elapsed_secs(), self.game.moves(), initial);

        let rank = match &self.scores {
            Some(store) => store.record(record.clone()).unwrap_or_else(|e| {
                warn!("score not saved: {}", e);
                None
            }),
            None => None,
        };
        if let Some(rank) = rank {
            info!("new score at place {}", rank + 1);
        }
        self.frontend.solved(&record, rank);
    }
}
