use std::fmt;
use std::str::FromStr;

use log::debug;
use rand::seq::SliceRandom;
use rand::{thread_rng, Rng};

use crate::error::PermutationError;

pub const SIDE: usize = 4;
pub const CELLS: usize = SIDE * SIDE;

/// Cells where `row + column` is even. The solved blank sits on one of them.
pub const MARKED: [usize; 8] = [0, 2, 5, 7, 8, 10, 13, 15];

/// A single board cell. `Blank` orders after every tile, so sorting a
/// permutation yields the solved layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Cell {
    Tile(u8),
    Blank,
}

impl Cell {
    pub fn is_blank(self) -> bool {
        matches!(self, Cell::Blank)
    }

    /// Numeric label used in the persisted text form. The blank is `-1`.
    pub fn label(self) -> i8 {
        match self {
            Cell::Tile(n) => n as i8,
            Cell::Blank => -1,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Tile(n) => write!(f, "{}", n),
            Cell::Blank => Ok(()),
        }
    }
}

impl FromStr for Cell {
    type Err = PermutationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s == "-1" {
            return Ok(Cell::Blank);
        }
        match s.parse::<u8>() {
            Ok(n) if (1..CELLS as u8).contains(&n) => Ok(Cell::Tile(n)),
            _ => Err(PermutationError::InvalidLabel(s.to_string())),
        }
    }
}

/// A row-major arrangement of the 15 tiles and the blank.
///
/// Only the validating constructors build one, so every value holds each
/// tile exactly once and a single blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Permutation([Cell; CELLS]);

impl Permutation {
    /// `[1, 2, ..., 15, blank]`
    pub fn solved() -> Self {
        let mut cells = [Cell::Blank; CELLS];
        for (i, cell) in cells.iter_mut().take(CELLS - 1).enumerate() {
            *cell = Cell::Tile(i as u8 + 1);
        }
        Self(cells)
    }

    pub fn from_cells(cells: &[Cell]) -> Result<Self, PermutationError> {
        if cells.len() != CELLS {
            return Err(PermutationError::WrongLength(cells.len()));
        }

        let mut seen = [false; CELLS];
        let mut blanks = 0;
        for &cell in cells {
            match cell {
                Cell::Blank => blanks += 1,
                Cell::Tile(n) if n == 0 || n as usize >= CELLS => {
                    return Err(PermutationError::InvalidLabel(n.to_string()));
                }
                Cell::Tile(n) => {
                    if seen[n as usize] {
                        return Err(PermutationError::DuplicateLabel(n));
                    }
                    seen[n as usize] = true;
                }
            }
        }
        if blanks != 1 {
            return Err(PermutationError::BlankCount(blanks));
        }

        let mut out = [Cell::Blank; CELLS];
        out.copy_from_slice(cells);
        Ok(Self(out))
    }

    /// Builds a permutation from numeric labels, `-1` standing for the blank.
    pub fn from_labels(labels: &[i8]) -> Result<Self, PermutationError> {
        let cells = labels
            .iter()
            .map(|&label| match label {
                -1 => Ok(Cell::Blank),
                n if n > 0 => Ok(Cell::Tile(n as u8)),
                n => Err(PermutationError::InvalidLabel(n.to_string())),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_cells(&cells)
    }

    pub fn cells(&self) -> &[Cell; CELLS] {
        &self.0
    }

    pub fn blank_index(&self) -> usize {
        // from_cells guarantees a blank
        self.0.iter().position(|c| c.is_blank()).unwrap_or(CELLS - 1)
    }

    pub fn inversions(&self) -> usize {
        count_inversions(&self.0)
    }

    /// Inversion count modulo 2.
    pub fn parity(&self) -> usize {
        self.inversions() % 2
    }

    pub fn is_solvable(&self) -> bool {
        satisfies_rule(&self.0)
    }

    pub fn is_solved(&self) -> bool {
        *self == Self::solved()
    }

    /// FNV-1a over the labels. Stable across builds and platforms, unlike
    /// the std hasher.
    pub fn fingerprint(&self) -> u64 {
        const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
        const PRIME: u64 = 0x0000_0100_0000_01b3;

        self.0.iter().fold(OFFSET, |hash, cell| {
            (hash ^ u64::from(cell.label() as u8)).wrapping_mul(PRIME)
        })
    }
}

impl Default for Permutation {
    fn default() -> Self {
        Self::solved()
    }
}

impl fmt::Display for Permutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, cell) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", cell.label())?;
        }
        Ok(())
    }
}

impl FromStr for Permutation {
    type Err = PermutationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cells = s
            .split(',')
            .map(str::parse::<Cell>)
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_cells(&cells)
    }
}

pub fn is_marked(index: usize) -> bool {
    MARKED.contains(&index)
}

/// Whether `permutation` can be reached from the solved layout by legal
/// slides.
pub fn is_solvable(permutation: &Permutation) -> bool {
    permutation.is_solvable()
}

/// A uniformly random solvable permutation from the thread-local RNG.
pub fn shuffle() -> Permutation {
    shuffle_with(&mut thread_rng())
}

/// Fisher-Yates over the solved layout, then one transposition of two tiles
/// if the result landed in the unsolvable half.
pub fn shuffle_with<R: Rng + ?Sized>(rng: &mut R) -> Permutation {
    let mut cells = Permutation::solved().0;
    cells.shuffle(rng);
    make_solvable(&mut cells);
    Permutation(cells)
}

fn make_solvable(cells: &mut [Cell; CELLS]) {
    if satisfies_rule(cells) {
        return;
    }

    // Swapping the blank would also move it to an unmarked neighbour and
    // leave the rule violated, so only tiles are transposed.
    let blank = cells.iter().position(|c| c.is_blank()).unwrap_or(CELLS - 1);
    let (a, b) = if blank < CELLS - 2 {
        (CELLS - 2, CELLS - 1)
    } else {
        (0, 1)
    };
    debug!("shuffle landed on an unsolvable layout, swapping cells {} and {}", a, b);
    cells.swap(a, b);
}

fn satisfies_rule(cells: &[Cell]) -> bool {
    let even = count_inversions(cells) % 2 == 0;
    let on_marked = cells
        .iter()
        .position(|c| c.is_blank())
        .map_or(false, is_marked);

    even == on_marked
}

fn count_inversions(cells: &[Cell]) -> usize {
    cells
        .iter()
        .enumerate()
        .map(|(i, &val)| cells[i + 1..].iter().filter(|&&next| next < val).count())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn labels(p: &Permutation) -> Vec<i8> {
        p.cells().iter().map(|c| c.label()).collect()
    }

    fn assert_well_formed(p: &Permutation) {
        let mut sorted = *p.cells();
        sorted.sort();
        assert_eq!(sorted, *Permutation::solved().cells());
    }

    #[test]
    fn solved_layout_is_solvable() {
        let solved = Permutation::solved();
        assert_eq!(solved.inversions(), 0);
        assert_eq!(solved.blank_index(), 15);
        assert!(solved.is_solvable());
        assert!(solved.is_solved());
    }

    #[test]
    fn any_tile_transposition_is_unsolvable() {
        let solved = *Permutation::solved().cells();
        for i in 0..CELLS - 1 {
            for j in i + 1..CELLS - 1 {
                let mut cells = solved;
                cells.swap(i, j);
                let p = Permutation::from_cells(&cells).unwrap();
                assert_eq!(p.parity(), 1);
                assert!(!is_solvable(&p), "swap of {} and {} reported solvable", i, j);
            }
        }
    }

    #[test]
    fn swapped_first_pair_is_unsolvable() {
        let p = Permutation::from_labels(&[2, 1, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, -1])
            .unwrap();
        assert!(!is_solvable(&p));
    }

    #[test]
    fn blank_slide_keeps_solvability() {
        // one legal move from solved: blank up into 11's cell
        let p = Permutation::from_labels(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, -1, 13, 14, 15, 12])
            .unwrap();
        assert_eq!(p.parity(), 1);
        assert!(!is_marked(p.blank_index()));
        assert!(p.is_solvable());
    }

    #[test]
    fn marked_cells_form_a_checkerboard() {
        for index in 0..CELLS {
            let (row, column) = (index / SIDE, index % SIDE);
            assert_eq!(is_marked(index), (row + column) % 2 == 0);
        }
    }

    #[test]
    fn correction_swaps_last_pair_when_blank_is_elsewhere() {
        // blank on marked cell 0 with 15 inversions
        let mut cells = *Permutation::from_labels(&[
            -1, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15,
        ])
        .unwrap()
        .cells();
        assert!(!satisfies_rule(&cells));
        make_solvable(&mut cells);
        assert!(satisfies_rule(&cells));
        assert!(cells[0].is_blank());
        assert_eq!(cells[14], Cell::Tile(15));
        assert_eq!(cells[15], Cell::Tile(14));
    }

    #[test]
    fn correction_never_moves_a_trailing_blank() {
        // blank on cell 14 and an odd tile parity
        let mut cells = *Permutation::from_labels(&[
            2, 1, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, -1, 15,
        ])
        .unwrap()
        .cells();
        assert!(!satisfies_rule(&cells));
        make_solvable(&mut cells);
        assert!(cells[14].is_blank());
        assert!(satisfies_rule(&cells));
        assert_eq!(cells[0], Cell::Tile(1));

        let mut cells = *Permutation::from_labels(&[
            2, 1, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, -1,
        ])
        .unwrap()
        .cells();
        make_solvable(&mut cells);
        assert!(cells[15].is_blank());
        assert!(Permutation::from_cells(&cells).unwrap().is_solved());
    }

    #[test]
    fn seeded_shuffle_is_reproducible() {
        let a = shuffle_with(&mut StdRng::seed_from_u64(7));
        let b = shuffle_with(&mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn shuffle_is_slice_shuffle_plus_correction() {
        for seed in 0..64 {
            let mut expected = Permutation::solved().0;
            expected.shuffle(&mut StdRng::seed_from_u64(seed));
            make_solvable(&mut expected);

            let p = shuffle_with(&mut StdRng::seed_from_u64(seed));
            assert_eq!(*p.cells(), expected);
        }
    }

    #[test]
    fn thread_rng_shuffle_is_solvable() {
        for _ in 0..500 {
            let p = shuffle();
            assert_well_formed(&p);
            assert!(p.is_solvable());
        }
    }

    #[test]
    fn rejects_malformed_sequences() {
        assert_eq!(
            Permutation::from_labels(&[1, 2, 3]),
            Err(PermutationError::WrongLength(3))
        );
        assert_eq!(
            Permutation::from_labels(&[1, 1, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, -1]),
            Err(PermutationError::DuplicateLabel(1))
        );
        assert_eq!(
            Permutation::from_labels(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16]),
            Err(PermutationError::InvalidLabel("16".to_string()))
        );
        assert_eq!(
            Permutation::from_labels(&[-1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, -1]),
            Err(PermutationError::BlankCount(2))
        );
        assert!("1,2,x".parse::<Permutation>().is_err());
    }

    #[test]
    fn text_form_uses_minus_one_for_blank() {
        let text = Permutation::solved().to_string();
        assert_eq!(text, "1,2,3,4,5,6,7,8,9,10,11,12,13,14,15,-1");
        assert_eq!(text.parse::<Permutation>().unwrap(), Permutation::solved());

        let with_empty: Permutation = "1,2,3,4,5,6,7,8,9,10,11,12,13,14,15,".parse().unwrap();
        assert!(with_empty.is_solved());
    }

    #[test]
    fn fingerprint_tracks_order() {
        let solved = Permutation::solved();
        let swapped = Permutation::from_labels(&[2, 1, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, -1])
            .unwrap();
        assert_eq!(solved.fingerprint(), Permutation::solved().fingerprint());
        assert_ne!(solved.fingerprint(), swapped.fingerprint());
    }

    proptest! {
        #[test]
        fn shuffle_is_well_formed_and_solvable(seed in any::<u64>()) {
            let p = shuffle_with(&mut StdRng::seed_from_u64(seed));
            assert_well_formed(&p);
            prop_assert!(is_solvable(&p));
            prop_assert_ne!(
                labels(&p),
                vec![2, 1, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, -1]
            );
        }
    }
}
