//! N-Puzzle Solver Library
//!
//! Provides the board model and the four search strategies for the sliding
//! tile puzzle: breadth-first, depth-first, bidirectional breadth-first, and
//! A* over the Manhattan-distance heuristic.

pub mod board;
pub mod loader;
pub mod solver;

pub use board::{Board, BoardError, MAX_SIZE};
pub use loader::{load_board, parse_board, ParseError};
pub use solver::{solve, SolveError, Strategy};
