//! N-Puzzle Solver
//!
//! Solves sliding tile puzzles read from a text file: an edge length N
//! followed by N rows of tile values with `*` (or `.`) marking the blank.
//! Four search strategies are available; the solution is printed as the
//! ordered list of tiles to slide into the blank.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rand::thread_rng;

use npuzzle::{load_board, solve, Board, SolveError, Strategy, MAX_SIZE};

/// Solves N-puzzle boards with a choice of search strategies.
#[derive(Parser)]
#[command(name = "npuzzle")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Board file to solve with the default strategy.
    path: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Solve a board file and print the tile moves.
    Solve {
        /// Path to the board file.
        #[arg(long)]
        path: PathBuf,

        /// Search strategy to run.
        #[arg(long, value_enum, default_value_t = Strategy::AStar)]
        strategy: Strategy,

        /// Stop after expanding this many states.
        #[arg(long)]
        max_nodes: Option<usize>,

        /// Print the board after every replayed move.
        #[arg(long)]
        trace: bool,
    },
    /// Report whether a board file is solvable, without searching.
    Check {
        /// Path to the board file.
        #[arg(long)]
        path: PathBuf,
    },
    /// Generate a random solvable board in the input format.
    Generate {
        /// Edge length of the board.
        #[arg(long, default_value_t = 3)]
        size: usize,

        /// Number of random moves to walk away from the goal.
        #[arg(long, default_value_t = 64)]
        scrambles: usize,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let code = match cli.command {
        Some(Command::Solve {
            path,
            strategy,
            max_nodes,
            trace,
        }) => run_solve(&path, strategy, max_nodes, trace),
        Some(Command::Check { path }) => run_check(&path),
        Some(Command::Generate { size, scrambles }) => run_generate(size, scrambles),
        None => match cli.path {
            Some(path) => run_solve(&path, Strategy::AStar, None, false),
            None => {
                eprintln!("No board file given. Use --help for more information.");
                2
            }
        },
    };

    if code != 0 {
        std::process::exit(code);
    }
}

/// Loads a board, runs the chosen strategy, and reports the solution.
fn run_solve(path: &PathBuf, strategy: Strategy, max_nodes: Option<usize>, trace: bool) -> i32 {
    let board = match load_board(path) {
        Ok(board) => board,
        Err(e) => {
            eprintln!("Failed to load {}: {}", path.display(), e);
            return 2;
        }
    };

    print!("Initial board:\n{board}");

    match solve(&board, strategy, max_nodes) {
        Ok(moves) if moves.is_empty() => {
            println!("Board is already solved.");
            0
        }
        Ok(moves) => {
            println!(
                "Solved in {} moves ({strategy}): {}",
                moves.len(),
                format_moves(&moves)
            );
            if !replay(&board, &moves, trace) {
                eprintln!("Internal error: the returned moves do not reach the goal.");
                return 1;
            }
            println!("Verified: {} moves reach the goal.", moves.len());
            0
        }
        Err(SolveError::Unsolvable) => {
            println!("Board is unsolvable.");
            1
        }
        Err(e) => {
            eprintln!("Search failed: {e}");
            1
        }
    }
}

/// Loads a board and reports its solvability.
fn run_check(path: &PathBuf) -> i32 {
    let board = match load_board(path) {
        Ok(board) => board,
        Err(e) => {
            eprintln!("Failed to load {}: {}", path.display(), e);
            return 2;
        }
    };

    if board.is_solvable() {
        println!("solvable");
        0
    } else {
        println!("unsolvable");
        1
    }
}

/// Prints a freshly scrambled board in the loader's input format.
fn run_generate(size: usize, scrambles: usize) -> i32 {
    if size < 1 || size > MAX_SIZE {
        eprintln!("Board size must be within 1..={MAX_SIZE}.");
        return 2;
    }

    let mut rng = thread_rng();
    let board = Board::goal(size).scramble(scrambles, &mut rng);
    print!("{size}\n{board}");
    0
}

/// Applies the moves to the starting board, printing each step when `trace`
/// is set, and confirms the final board is the goal.
fn replay(start: &Board, moves: &[u16], trace: bool) -> bool {
    let mut current = start.clone();
    for &tile in moves {
        match current.slide(tile) {
            Some(next) => {
                if trace {
                    println!("slide {tile}:\n{next}");
                }
                current = next;
            }
            None => return false,
        }
    }
    current.is_goal()
}

/// Renders a move list as space-separated tile values.
fn format_moves(moves: &[u16]) -> String {
    moves
        .iter()
        .map(u16::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use npuzzle::parse_board;

    #[test]
    fn test_solution_report_snapshot() {
        let board = parse_board("3\n1 2 3\n4 5 .\n7 8 6\n").unwrap();
        let moves = solve(&board, Strategy::Bfs, None).unwrap();

        let mut output = format!("Initial board:\n{board}");
        output.push_str(&format!(
            "Solved in {} moves: {}\n",
            moves.len(),
            format_moves(&moves)
        ));

        insta::assert_snapshot!(output, @r"
        Initial board:
        1 2 3
        4 5 .
        7 8 6
        Solved in 1 moves: 6
        ");
    }

    #[test]
    fn test_replay_detects_bogus_moves() {
        let board = parse_board("3\n1 2 3\n4 5 .\n7 8 6\n").unwrap();
        assert!(replay(&board, &[6], false));
        assert!(!replay(&board, &[1], false), "1 is not adjacent to the blank");
        assert!(!replay(&board, &[5], false), "sliding 5 does not solve it");
        assert!(!replay(&board, &[], false), "no moves leaves it unsolved");
    }

    #[test]
    fn test_format_moves() {
        assert_eq!(format_moves(&[]), "");
        assert_eq!(format_moves(&[6]), "6");
        assert_eq!(format_moves(&[1, 2, 5, 6]), "1 2 5 6");
    }
}
