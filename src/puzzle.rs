use std::fmt;

use crate::error::MoveError;
use crate::permutation::{Cell, Permutation, CELLS, SIDE};

/// Which way a tile slides into the blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Left,
    Down,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Left, Direction::Down, Direction::Right];

    /// Offset from the blank to the tile that moves. `Left` pulls the tile to
    /// the right of the blank leftward, and so on.
    pub fn as_offset(&self) -> (isize, isize) {
        match self {
            Direction::Up => (1, 0),
            Direction::Left => (0, 1),
            Direction::Down => (-1, 0),
            Direction::Right => (0, -1),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Direction::Up => "Up",
            Direction::Left => "Left",
            Direction::Down => "Down",
            Direction::Right => "Right",
        };
        write!(f, "{}", s)
    }
}

/// A tile that moved: it left `from` and now sits where the blank was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slide {
    pub tile: Cell,
    pub from: (usize, usize),
    pub to: (usize, usize),
}

/// The live 4x4 grid with its blank position cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    grid: [[Cell; SIDE]; SIDE],
    blank_row: usize,
    blank_column: usize,
}

impl Board {
    pub fn new() -> Self {
        Self::from_permutation(&Permutation::solved())
    }

    pub fn from_permutation(permutation: &Permutation) -> Self {
        let mut grid = [[Cell::Blank; SIDE]; SIDE];
        for (index, &cell) in permutation.cells().iter().enumerate() {
            grid[index / SIDE][index % SIDE] = cell;
        }
        let blank = permutation.blank_index();

        Self {
            grid,
            blank_row: blank / SIDE,
            blank_column: blank % SIDE,
        }
    }

    pub fn blank(&self) -> (usize, usize) {
        (self.blank_row, self.blank_column)
    }

    pub fn rows(&self) -> &[[Cell; SIDE]; SIDE] {
        &self.grid
    }

    /// Row-major snapshot.
    pub fn cells(&self) -> [Cell; CELLS] {
        let mut out = [Cell::Blank; CELLS];
        for (i, row) in self.grid.iter().enumerate() {
            out[i * SIDE..(i + 1) * SIDE].copy_from_slice(row);
        }
        out
    }

    /// Coordinates of the tile a directional move would pull into the blank.
    /// May lie off the board.
    pub fn target(&self, direction: Direction) -> (isize, isize) {
        let (dr, dc) = direction.as_offset();
        (self.blank_row as isize + dr, self.blank_column as isize + dc)
    }

    /// Slides the tile at (`row`, `column`) into the blank if they are
    /// orthogonal neighbours. The board is untouched on error.
    pub fn slide(&mut self, row: isize, column: isize) -> Result<Slide, MoveError> {
        if !(0..SIDE as isize).contains(&row) || !(0..SIDE as isize).contains(&column) {
            return Err(MoveError::OutOfBounds { row, column });
        }
        let (row, column) = (row as usize, column as usize);

        let distance = row.abs_diff(self.blank_row) + column.abs_diff(self.blank_column);
        if distance != 1 {
            return Err(MoveError::IllegalMove { row, column });
        }

        let tile = self.grid[row][column];
        let to = self.blank();
        self.grid[self.blank_row][self.blank_column] = tile;
        self.grid[row][column] = Cell::Blank;
        self.blank_row = row;
        self.blank_column = column;

        Ok(Slide {
            tile,
            from: (row, column),
            to,
        })
    }

    pub fn is_solved(&self) -> bool {
        self.cells() == *Permutation::solved().cells()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.grid {
            for &cell in row {
                write!(f, "{:>2} ", cell.to_string())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
