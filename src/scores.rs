//! Best-times list and its text file.
//!
//! The file holds records separated by `;`. Each record is
//! `elapsedSeconds|moveCount`, optionally followed by
//! `|fingerprint|l1,l2,...,l16` with the start permutation for replay.

use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::{debug, warn};

use crate::error::ScoreError;
use crate::permutation::Permutation;

pub const DEFAULT_CAPACITY: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreRecord {
    pub elapsed_secs: u64,
    pub moves: u32,
    pub initial: Option<Permutation>,
}

impl ScoreRecord {
    pub fn new(elapsed_secs: u64, moves: u32, initial: Option<Permutation>) -> Self {
        Self {
            elapsed_secs,
            moves,
            initial,
        }
    }

    fn key(&self) -> (u64, u32) {
        (self.elapsed_secs, self.moves)
    }
}

impl fmt::Display for ScoreRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.elapsed_secs, self.moves)?;
        if let Some(initial) = &self.initial {
            write!(f, "|{:x}|{}", initial.fingerprint(), initial)?;
        }
        Ok(())
    }
}

impl FromStr for ScoreRecord {
    type Err = ScoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = |reason: &str| ScoreError::Parse {
            record: s.to_string(),
            reason: reason.to_string(),
        };

        let fields: Vec<&str> = s.trim().split('|').collect();
        if fields.len() < 2 {
            return Err(malformed("expected at least time and move count"));
        }

        let elapsed_secs = fields[0]
            .trim()
            .parse()
            .map_err(|_| malformed("time is not a number"))?;
        let moves = fields[1]
            .trim()
            .parse()
            .map_err(|_| malformed("move count is not a number"))?;

        let initial = match fields.get(2..) {
            Some([hash, labels]) => {
                let hash = u64::from_str_radix(hash.trim(), 16)
                    .map_err(|_| malformed("fingerprint is not hexadecimal"))?;
                replayable(labels, hash)
            }
            Some([]) | None => None,
            Some(_) => return Err(malformed("unexpected number of fields")),
        };

        Ok(Self {
            elapsed_secs,
            moves,
            initial,
        })
    }
}

/// The stored start position, if it is intact and solvable.
fn replayable(labels: &str, hash: u64) -> Option<Permutation> {
    let permutation = match labels.parse::<Permutation>() {
        Ok(p) => p,
        Err(e) => {
            warn!("dropping stored start position {:?}: {}", labels, e);
            return None;
        }
    };
    if permutation.fingerprint() != hash {
        warn!("dropping stored start position {:?}: fingerprint mismatch", labels);
        return None;
    }
    if !permutation.is_solvable() {
        warn!("dropping stored start position {:?}: not solvable", labels);
        return None;
    }
    Some(permutation)
}

/// Records sorted by time then moves, never longer than `capacity`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scoreboard {
    capacity: usize,
    records: Vec<ScoreRecord>,
}

impl Scoreboard {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            records: Vec::with_capacity(capacity),
        }
    }

    pub fn parse(text: &str, capacity: usize) -> Result<Self, ScoreError> {
        let mut records = text
            .split(';')
            .filter(|r| !r.trim().is_empty())
            .map(str::parse::<ScoreRecord>)
            .collect::<Result<Vec<_>, _>>()?;

        records.sort_by_key(ScoreRecord::key);
        records.truncate(capacity);
        Ok(Self { capacity, records })
    }

    /// Adds `record` after any equal ones and returns its 0-based rank, or
    /// `None` when it did not make the list.
    pub fn insert(&mut self, record: ScoreRecord) -> Option<usize> {
        let key = record.key();
        let rank = self.records.partition_point(|r| r.key() <= key);
        if rank >= self.capacity {
            return None;
        }
        self.records.insert(rank, record);
        self.records.truncate(self.capacity);
        Some(rank)
    }

    pub fn records(&self) -> &[ScoreRecord] {
        &self.records
    }

    pub fn get(&self, rank: usize) -> Option<&ScoreRecord> {
        self.records.get(rank)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for Scoreboard {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl fmt::Display for Scoreboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, record) in self.records.iter().enumerate() {
            if i > 0 {
                f.write_str(";")?;
            }
            write!(f, "{}", record)?;
        }
        Ok(())
    }
}

/// A scoreboard kept in a text file.
#[derive(Debug, Clone)]
pub struct ScoreStore {
    path: PathBuf,
    capacity: usize,
}

impl ScoreStore {
    pub fn new(path: impl Into<PathBuf>, capacity: usize) -> Self {
        Self {
            path: path.into(),
            capacity,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file reads as an empty board.
    pub fn load(&self) -> Result<Scoreboard, ScoreError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Scoreboard::parse(&text, self.capacity),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Scoreboard::new(self.capacity)),
            Err(source) => Err(ScoreError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    pub fn save(&self, board: &Scoreboard) -> Result<(), ScoreError> {
        fs::write(&self.path, board.to_string()).map_err(|source| ScoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        debug!("wrote {} score records to {}", board.len(), self.path.display());
        Ok(())
    }

    /// Loads, inserts and saves in one step.
    pub fn record(&self, record: ScoreRecord) -> Result<Option<usize>, ScoreError> {
        let mut board = self.load()?;
        let rank = board.insert(record);
        if rank.is_some() {
            self.save(&board)?;
        }
        Ok(rank)
    }
}
