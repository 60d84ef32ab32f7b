//! Board representation and operations for the N-puzzle.
//!
//! A board is an N×N grid of distinct tile values `0..N²`, stored as a flat
//! row-major vector where 0 marks the blank. Boards are immutable values with
//! structural equality and hashing, so the search strategies can key their
//! discovered-sets and parent maps on them directly.

use std::fmt;

use rand::Rng;

/// Largest supported board edge. Keeps every tile value within `u16`.
pub const MAX_SIZE: usize = 256;

/// Error returned when a tile vector does not describe a legal board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    /// The edge length is zero or exceeds [`MAX_SIZE`].
    SizeOutOfRange { size: usize },
    /// The tile vector does not contain exactly N² values.
    WrongLength { expected: usize, found: usize },
    /// A value lies outside `0..N²`.
    TileOutOfRange(u16),
    /// A value appears more than once.
    DuplicateTile(u16),
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SizeOutOfRange { size } => {
                write!(f, "board size {size} is outside 1..={MAX_SIZE}")
            }
            Self::WrongLength { expected, found } => {
                write!(f, "expected {expected} tiles, found {found}")
            }
            Self::TileOutOfRange(tile) => write!(f, "tile value {tile} is out of range"),
            Self::DuplicateTile(tile) => write!(f, "tile value {tile} appears more than once"),
        }
    }
}

impl std::error::Error for BoardError {}

/// An immutable N×N sliding-puzzle board.
///
/// The blank cell's index is cached alongside the tiles; it is derived from
/// them, so structural equality over all three fields stays consistent.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Board {
    size: usize,
    tiles: Vec<u16>,
    blank: usize,
}

impl Board {
    /// Builds the canonical solved board for the given edge length:
    /// tiles `1..N²` in row-major order with the blank in the last cell.
    pub fn goal(size: usize) -> Self {
        assert!(
            size >= 1 && size <= MAX_SIZE,
            "board size must be within 1..={MAX_SIZE}"
        );
        let cells = size * size;
        let mut tiles: Vec<u16> = (1..cells).map(|value| value as u16).collect();
        tiles.push(0);
        Self {
            size,
            tiles,
            blank: cells - 1,
        }
    }

    /// Builds a board from a flat row-major tile vector.
    ///
    /// The values must be a permutation of `0..size²`; anything else is
    /// rejected so the search never sees a malformed state.
    pub fn from_tiles(size: usize, tiles: Vec<u16>) -> Result<Self, BoardError> {
        if size == 0 || size > MAX_SIZE {
            return Err(BoardError::SizeOutOfRange { size });
        }
        let cells = size * size;
        if tiles.len() != cells {
            return Err(BoardError::WrongLength {
                expected: cells,
                found: tiles.len(),
            });
        }

        let mut seen = vec![false; cells];
        let mut blank = 0;
        for (index, &value) in tiles.iter().enumerate() {
            let value_index = value as usize;
            if value_index >= cells {
                return Err(BoardError::TileOutOfRange(value));
            }
            if seen[value_index] {
                return Err(BoardError::DuplicateTile(value));
            }
            seen[value_index] = true;
            if value == 0 {
                blank = index;
            }
        }
        // N² distinct values below N² cover the full range, so the blank is set

        Ok(Self { size, tiles, blank })
    }

    /// Edge length of the board.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Row-major tile values, 0 for the blank.
    #[inline]
    pub fn tiles(&self) -> &[u16] {
        &self.tiles
    }

    /// (row, col) of the blank cell.
    #[inline]
    pub fn blank_position(&self) -> (usize, usize) {
        (self.blank / self.size, self.blank % self.size)
    }

    /// True iff the board equals the canonical solved configuration.
    pub fn is_goal(&self) -> bool {
        let cells = self.size * self.size;
        self.tiles[..cells - 1]
            .iter()
            .enumerate()
            .all(|(index, &value)| value as usize == index + 1)
            && self.tiles[cells - 1] == 0
    }

    /// Decides solvability in closed form via the inversion-parity test.
    ///
    /// Odd N: solvable iff the inversion count is even. Even N: with the
    /// blank's row counted from the bottom (1-indexed), solvable iff that
    /// row is even and inversions are odd, or the row is odd and inversions
    /// are even.
    pub fn is_solvable(&self) -> bool {
        let inversions = self.count_inversions();
        if self.size % 2 == 1 {
            inversions % 2 == 0
        } else {
            let hole_row_from_bottom = self.size - self.blank / self.size;
            if hole_row_from_bottom % 2 == 0 {
                inversions % 2 == 1
            } else {
                inversions % 2 == 0
            }
        }
    }

    /// Counts pairs of tiles out of their goal relative order in the
    /// row-major flattening, blank excluded.
    fn count_inversions(&self) -> usize {
        let flat: Vec<u16> = self
            .tiles
            .iter()
            .copied()
            .filter(|&value| value != 0)
            .collect();
        flat.iter()
            .enumerate()
            .map(|(index, &value)| {
                flat[index + 1..]
                    .iter()
                    .filter(|&&later| later < value)
                    .count()
            })
            .sum()
    }

    /// Enumerates all legal moves as (tile slid into the blank, successor).
    ///
    /// The order is fixed (cell below the blank, above, right, left) because
    /// it determines which of several equally short solutions the searches
    /// return. Corners yield 2 entries, edges 3, interior cells 4.
    pub fn neighbors(&self) -> Vec<(u16, Board)> {
        let row = self.blank / self.size;
        let col = self.blank % self.size;
        let mut successors = Vec::with_capacity(4);

        if row + 1 < self.size {
            successors.push(self.swapped_with(self.blank + self.size));
        }
        if row > 0 {
            successors.push(self.swapped_with(self.blank - self.size));
        }
        if col + 1 < self.size {
            successors.push(self.swapped_with(self.blank + 1));
        }
        if col > 0 {
            successors.push(self.swapped_with(self.blank - 1));
        }

        successors
    }

    /// Produces the successor with the blank swapped into `cell`.
    fn swapped_with(&self, cell: usize) -> (u16, Board) {
        let tile = self.tiles[cell];
        let mut tiles = self.tiles.clone();
        tiles.swap(self.blank, cell);
        (
            tile,
            Board {
                size: self.size,
                tiles,
                blank: cell,
            },
        )
    }

    /// Slides the named tile into the blank, if it is orthogonally adjacent.
    ///
    /// Used to replay a returned solution move by move.
    pub fn slide(&self, tile: u16) -> Option<Board> {
        self.neighbors()
            .into_iter()
            .find(|(moved, _)| *moved == tile)
            .map(|(_, successor)| successor)
    }

    /// Sum of Manhattan distances of every non-blank tile to its goal cell.
    ///
    /// Admissible and consistent, which the best-first strategy relies on
    /// for optimality.
    pub fn manhattan_distance(&self) -> u32 {
        let mut distance = 0;
        for (index, &value) in self.tiles.iter().enumerate() {
            if value == 0 {
                continue;
            }
            let row = index / self.size;
            let col = index % self.size;
            let goal_row = (value as usize - 1) / self.size;
            let goal_col = (value as usize - 1) % self.size;
            distance += row.abs_diff(goal_row) as u32 + col.abs_diff(goal_col) as u32;
        }
        distance
    }

    /// Walks `moves` random legal moves from this board, never immediately
    /// undoing the previous move.
    ///
    /// Legal moves preserve solvability, so scrambling the goal board always
    /// yields a solvable instance.
    pub fn scramble<R: Rng>(&self, moves: usize, rng: &mut R) -> Board {
        let mut current = self.clone();
        // cell the blank occupied before the last move; stepping back there
        // would cancel it
        let mut previous_blank = usize::MAX;

        for _ in 0..moves {
            let mut choices: Vec<(u16, Board)> = current
                .neighbors()
                .into_iter()
                .filter(|(_, successor)| successor.blank != previous_blank)
                .collect();
            if choices.is_empty() {
                break;
            }
            let pick = rng.gen_range(0..choices.len());
            previous_blank = current.blank;
            current = choices.swap_remove(pick).1;
        }

        current
    }
}

impl fmt::Display for Board {
    /// Renders the grid with aligned columns and `.` for the blank, one row
    /// per line. The output parses back through the loader.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = (self.size * self.size - 1).to_string().len();
        for row in self.tiles.chunks(self.size) {
            for (col, &value) in row.iter().enumerate() {
                if col > 0 {
                    write!(f, " ")?;
                }
                if value == 0 {
                    write!(f, "{:>width$}", ".")?;
                } else {
                    write!(f, "{value:>width$}")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({}x{}, {:?})", self.size, self.size, self.tiles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn board_3x3(tiles: [u16; 9]) -> Board {
        Board::from_tiles(3, tiles.to_vec()).unwrap()
    }

    #[test]
    fn test_goal_is_goal() {
        for size in 1..=5 {
            assert!(Board::goal(size).is_goal(), "goal({size}) must be solved");
        }
    }

    #[test]
    fn test_is_goal_matches_exact_grid() {
        assert!(board_3x3([1, 2, 3, 4, 5, 6, 7, 8, 0]).is_goal());
        assert!(!board_3x3([1, 2, 3, 4, 5, 6, 7, 0, 8]).is_goal());
        assert!(!board_3x3([0, 1, 2, 3, 4, 5, 6, 7, 8]).is_goal());
    }

    #[test]
    fn test_from_tiles_rejects_bad_input() {
        assert_eq!(
            Board::from_tiles(0, vec![]),
            Err(BoardError::SizeOutOfRange { size: 0 })
        );
        assert_eq!(
            Board::from_tiles(2, vec![1, 2, 3]),
            Err(BoardError::WrongLength {
                expected: 4,
                found: 3
            })
        );
        assert_eq!(
            Board::from_tiles(2, vec![0, 1, 2, 4]),
            Err(BoardError::TileOutOfRange(4))
        );
        assert_eq!(
            Board::from_tiles(2, vec![0, 1, 1, 2]),
            Err(BoardError::DuplicateTile(1))
        );
    }

    #[test]
    fn test_neighbor_count_by_blank_position() {
        // corner, edge, interior
        assert_eq!(board_3x3([0, 1, 2, 3, 4, 5, 6, 7, 8]).neighbors().len(), 2);
        assert_eq!(board_3x3([1, 0, 2, 3, 4, 5, 6, 7, 8]).neighbors().len(), 3);
        assert_eq!(board_3x3([1, 2, 3, 4, 0, 5, 6, 7, 8]).neighbors().len(), 4);
        // every 2x2 blank position is a corner
        for blank in 0..4 {
            let mut tiles = vec![1, 2, 3, 0];
            tiles.swap(blank, 3);
            let board = Board::from_tiles(2, tiles).unwrap();
            assert_eq!(board.neighbors().len(), 2);
        }
    }

    #[test]
    fn test_neighbor_order_is_below_above_right_left() {
        let board = board_3x3([1, 2, 3, 4, 0, 5, 6, 7, 8]);
        let moved: Vec<u16> = board.neighbors().into_iter().map(|(tile, _)| tile).collect();
        assert_eq!(moved, vec![7, 2, 5, 4]);
    }

    #[test]
    fn test_neighbors_differ_in_exactly_two_adjacent_cells() {
        let board = board_3x3([1, 2, 3, 4, 0, 5, 6, 7, 8]);
        for (tile, successor) in board.neighbors() {
            let changed: Vec<usize> = (0..9)
                .filter(|&index| board.tiles()[index] != successor.tiles()[index])
                .collect();
            assert_eq!(changed.len(), 2, "a move must touch exactly two cells");
            let delta = changed[1] - changed[0];
            assert!(delta == 1 || delta == 3, "the two cells must be adjacent");
            // the tile slid into the old blank cell
            assert!(changed.contains(&4));
            assert_eq!(successor.tiles()[4], tile);
        }
    }

    #[test]
    fn test_slide_only_accepts_adjacent_tiles() {
        let goal = Board::goal(3);
        assert!(goal.slide(6).is_some());
        assert!(goal.slide(8).is_some());
        assert!(goal.slide(1).is_none());
        assert!(goal.slide(5).is_none());
    }

    #[test]
    fn test_slide_then_slide_back_restores_the_board() {
        let goal = Board::goal(3);
        let moved = goal.slide(6).unwrap();
        assert_ne!(moved, goal);
        assert_eq!(moved.slide(6).unwrap(), goal);
    }

    #[test]
    fn test_solvable_odd_size() {
        assert!(Board::goal(3).is_solvable());
        // swapping two adjacent tiles flips the inversion parity
        assert!(!board_3x3([2, 1, 3, 4, 5, 6, 7, 8, 0]).is_solvable());
    }

    #[test]
    fn test_solvable_even_size() {
        assert!(Board::goal(4).is_solvable());
        // the classic unsolvable 15-puzzle: 14 and 15 exchanged
        let mut tiles: Vec<u16> = (1..16).collect();
        tiles.push(0);
        tiles.swap(13, 14);
        let board = Board::from_tiles(4, tiles).unwrap();
        assert!(!board.is_solvable());
    }

    #[test]
    fn test_random_walks_stay_solvable_and_adjacent_swaps_break_parity() {
        let mut rng = StdRng::seed_from_u64(7);
        for walk_length in [2, 10, 40, 41] {
            let scrambled = Board::goal(3).scramble(walk_length, &mut rng);
            assert!(scrambled.is_solvable(), "legal moves preserve solvability");

            // swap the first horizontally adjacent non-blank pair
            let mut tiles = scrambled.tiles().to_vec();
            let pair = (0..tiles.len() - 1)
                .find(|&index| {
                    index % 3 != 2 && tiles[index] != 0 && tiles[index + 1] != 0
                })
                .unwrap();
            tiles.swap(pair, pair + 1);
            let swapped = Board::from_tiles(3, tiles).unwrap();
            assert!(!swapped.is_solvable(), "one swap flips the parity");
        }
    }

    #[test]
    fn test_manhattan_distance() {
        assert_eq!(Board::goal(3).manhattan_distance(), 0);
        assert_eq!(board_3x3([1, 2, 3, 4, 5, 0, 7, 8, 6]).manhattan_distance(), 1);
        assert_eq!(board_3x3([0, 1, 3, 4, 2, 5, 7, 8, 6]).manhattan_distance(), 4);
    }

    #[test]
    fn test_display_renders_aligned_grid() {
        assert_eq!(Board::goal(3).to_string(), "1 2 3\n4 5 6\n7 8 .\n");
        // two-digit tiles pad single digits
        let four = Board::goal(4).to_string();
        assert!(four.starts_with(" 1  2  3  4\n"));
        assert!(four.ends_with("13 14 15  .\n"));
    }

    #[test]
    fn test_scramble_is_deterministic_per_seed() {
        let first = Board::goal(3).scramble(25, &mut StdRng::seed_from_u64(11));
        let second = Board::goal(3).scramble(25, &mut StdRng::seed_from_u64(11));
        assert_eq!(first, second);
    }
}
