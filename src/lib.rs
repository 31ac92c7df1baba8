//! The 15-puzzle: a solvable-shuffle engine, the game state machine around
//! it, a best-times list and a terminal front end.
//!
//! ```
//! use fifteen::game::Game;
//! use fifteen::permutation::{self, Permutation};
//!
//! let start = permutation::shuffle();
//! assert!(permutation::is_solvable(&start));
//!
//! let mut game = Game::new();
//! game.start(Permutation::solved(), false).unwrap();
//! game.attempt_move(3, 2).unwrap();
//! assert!(!game.is_solved());
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod game;
pub mod permutation;
pub mod puzzle;
pub mod scores;
pub mod terminal;

pub use controller::{BoardView, Controller, Frontend, MoveRequest, NewGame};
pub use error::{ConfigError, GameError, MoveError, PermutationError, ScoreError};
pub use game::{Game, GameState, MoveOutcome};
pub use permutation::{is_solvable, shuffle, Cell, Permutation};
pub use puzzle::{Board, Direction};
pub use scores::{ScoreRecord, ScoreStore, Scoreboard};
