use std::path::PathBuf;

use thiserror::Error;

/// Why a move request left the board untouched.
///
/// None of these are fatal; a front end can drop them silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("position ({row}, {column}) is outside the board")]
    OutOfBounds { row: isize, column: isize },
    #[error("tile at ({row}, {column}) is not next to the blank")]
    IllegalMove { row: usize, column: usize },
    #[error("no game is in progress")]
    NotInProgress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("a game is already in progress")]
    GameInProgress,
}

/// A sequence that is not a permutation of the 15 tiles and the blank.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PermutationError {
    #[error("expected 16 cells but got {0}")]
    WrongLength(usize),
    #[error("invalid label {0:?}, expected 1..=15 or -1 for the blank")]
    InvalidLabel(String),
    #[error("label {0} appears more than once")]
    DuplicateLabel(u8),
    #[error("expected exactly one blank but got {0}")]
    BlankCount(usize),
}

#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("malformed score record {record:?}: {reason}")]
    Parse { record: String, reason: String },
    #[error("cannot access score file {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {}", .path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
