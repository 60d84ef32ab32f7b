//! The four search strategies over the board state graph.
//!
//! Breadth-first and depth-first share one driver parameterized by frontier
//! discipline. Bidirectional search expands from the initial board and the
//! goal simultaneously and joins the two half-paths at the first board both
//! sides have discovered. Best-first is A* over the Manhattan-distance
//! heuristic. Every strategy gates on the solvability check before touching
//! the frontier, and every strategy returns the solution as the ordered list
//! of tile values slid into the blank.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};
use std::fmt;

use clap::ValueEnum;
use log::{debug, warn};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::board::Board;

/// Selects which search algorithm drives the exploration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Strategy {
    /// Breadth-first search; returns a shortest solution.
    Bfs,
    /// Depth-first search; terminates but the solution may be long.
    Dfs,
    /// Two breadth-first frontiers meeting in the middle; near-shortest.
    Bidirectional,
    /// A* on the Manhattan-distance heuristic; returns a shortest solution.
    AStar,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bfs => "bfs",
            Self::Dfs => "dfs",
            Self::Bidirectional => "bidirectional",
            Self::AStar => "a-star",
        };
        f.write_str(name)
    }
}

/// Reasons a search returns without a solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveError {
    /// The inversion-parity check excludes any solution; nothing was explored.
    Unsolvable,
    /// The frontier emptied on a board claimed solvable. The move generator
    /// or discovered-set bookkeeping broke an invariant.
    FrontierExhausted,
    /// The optional node budget ran out before a solution was found.
    LimitReached { explored: usize },
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsolvable => write!(f, "board is unsolvable (inversion parity)"),
            Self::FrontierExhausted => write!(
                f,
                "search frontier exhausted on a solvable board (internal invariant violation)"
            ),
            Self::LimitReached { explored } => {
                write!(f, "node budget reached after expanding {explored} states")
            }
        }
    }
}

impl std::error::Error for SolveError {}

/// Solves the board with the chosen strategy.
///
/// Returns the tile values to slide, in order, to reach the goal; an empty
/// list means the board is already solved. `limit` optionally bounds the
/// number of expanded states, which keeps depth-first search from wandering
/// the full state graph of a large board.
pub fn solve(
    board: &Board,
    strategy: Strategy,
    limit: Option<usize>,
) -> Result<Vec<u16>, SolveError> {
    if !board.is_solvable() {
        return Err(SolveError::Unsolvable);
    }

    match strategy {
        Strategy::Bfs => graph_search(board, Discipline::Fifo, limit),
        Strategy::Dfs => graph_search(board, Discipline::Lifo, limit),
        Strategy::Bidirectional => bidirectional(board, limit),
        Strategy::AStar => a_star(board, limit),
    }
}

/// Frontier discipline for the shared breadth/depth-first driver.
#[derive(Clone, Copy)]
enum Discipline {
    Fifo,
    Lifo,
}

/// Breadth-first or depth-first search with a discovered-set and a parent
/// map for path reconstruction.
///
/// Neighbors are marked discovered when enqueued, so no board enters the
/// frontier twice and depth-first search cannot loop.
fn graph_search(
    start: &Board,
    discipline: Discipline,
    limit: Option<usize>,
) -> Result<Vec<u16>, SolveError> {
    let mut frontier = VecDeque::new();
    let mut discovered = FxHashSet::default();
    let mut parents: FxHashMap<Board, (u16, Board)> = FxHashMap::default();
    let mut expanded = 0usize;

    frontier.push_back(start.clone());
    discovered.insert(start.clone());

    loop {
        let current = match discipline {
            Discipline::Fifo => frontier.pop_front(),
            Discipline::Lifo => frontier.pop_back(),
        };
        let Some(current) = current else {
            warn!("frontier exhausted after {expanded} expansions on a solvable board");
            return Err(SolveError::FrontierExhausted);
        };

        if current.is_goal() {
            let path = backtrack(&parents, &current);
            debug!("expanded {expanded} states, path length {}", path.len());
            return Ok(path);
        }

        expanded += 1;
        if let Some(max) = limit {
            if expanded > max {
                return Err(SolveError::LimitReached { explored: expanded });
            }
        }

        for (tile, successor) in current.neighbors() {
            if discovered.insert(successor.clone()) {
                parents.insert(successor.clone(), (tile, current.clone()));
                frontier.push_back(successor);
            }
        }
    }
}

/// Walks parent links from the goal back to the root and returns the moves
/// in root-to-goal order. The root has no parent entry.
fn backtrack(parents: &FxHashMap<Board, (u16, Board)>, goal: &Board) -> Vec<u16> {
    let mut path = Vec::new();
    let mut current = goal;
    while let Some((tile, parent)) = parents.get(current) {
        path.push(*tile);
        current = parent;
    }
    path.reverse();
    path
}

/// Bidirectional breadth-first search.
///
/// Each side keeps its own frontier, discovered-set, and a map from board to
/// the moves accumulated from its root. One node is taken per side per
/// iteration; the discovered-set intersection is checked between the forward
/// and backward half-steps. Because each side advances before the check, the
/// meeting board is not guaranteed to sit on a shortest path; the result is
/// correct but possibly non-minimal.
fn bidirectional(start: &Board, limit: Option<usize>) -> Result<Vec<u16>, SolveError> {
    let goal = Board::goal(start.size());

    let mut frontier_fwd = VecDeque::from([start.clone()]);
    let mut frontier_bwd = VecDeque::from([goal.clone()]);
    let mut discovered_fwd = FxHashSet::default();
    let mut discovered_bwd = FxHashSet::default();
    let mut paths_fwd: FxHashMap<Board, Vec<u16>> = FxHashMap::default();
    let mut paths_bwd: FxHashMap<Board, Vec<u16>> = FxHashMap::default();
    let mut expanded = 0usize;

    paths_fwd.insert(start.clone(), Vec::new());
    paths_bwd.insert(goal, Vec::new());

    loop {
        let (Some(current_fwd), Some(current_bwd)) =
            (frontier_fwd.pop_front(), frontier_bwd.pop_front())
        else {
            warn!("a frontier exhausted after {expanded} expansions on a solvable board");
            return Err(SolveError::FrontierExhausted);
        };
        discovered_fwd.insert(current_fwd.clone());
        discovered_bwd.insert(current_bwd.clone());
        expanded += 2;

        expand_side(
            &current_fwd,
            &mut frontier_fwd,
            &mut discovered_fwd,
            &mut paths_fwd,
        );

        if let Some(meeting) = intersect(&discovered_fwd, &discovered_bwd) {
            let mut path = paths_fwd[&meeting].clone();
            path.extend(paths_bwd[&meeting].iter().rev().copied());
            debug!(
                "frontiers met after {expanded} expansions, path length {}",
                path.len()
            );
            return Ok(path);
        }

        expand_side(
            &current_bwd,
            &mut frontier_bwd,
            &mut discovered_bwd,
            &mut paths_bwd,
        );

        if let Some(max) = limit {
            if expanded > max {
                return Err(SolveError::LimitReached { explored: expanded });
            }
        }
    }
}

/// Enqueues the undiscovered neighbors of `current` and extends their
/// root-relative move lists.
fn expand_side(
    current: &Board,
    frontier: &mut VecDeque<Board>,
    discovered: &mut FxHashSet<Board>,
    paths: &mut FxHashMap<Board, Vec<u16>>,
) {
    for (tile, successor) in current.neighbors() {
        if discovered.insert(successor.clone()) {
            let mut path = paths[current].clone();
            path.push(tile);
            paths.insert(successor.clone(), path);
            frontier.push_back(successor);
        }
    }
}

/// Picks one board discovered by both sides, if any.
fn intersect(left: &FxHashSet<Board>, right: &FxHashSet<Board>) -> Option<Board> {
    let (smaller, larger) = if left.len() <= right.len() {
        (left, right)
    } else {
        (right, left)
    };
    smaller
        .iter()
        .find(|board| larger.contains(*board))
        .cloned()
}

/// One open-list entry in A*.
///
/// Ordering is reversed so `BinaryHeap` pops the smallest f first; ties
/// resolve toward the earlier insertion.
#[derive(Clone, PartialEq, Eq)]
struct SearchNode {
    f: u32,
    seq: u64,
    g: u32,
    board: Board,
}

impl Ord for SearchNode {
    fn cmp(&self, other: &Self) -> Ordering {
        other.f.cmp(&self.f).then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for SearchNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A* over the Manhattan-distance heuristic.
///
/// Parent bookkeeping is a single map from board to (tile moved, parent
/// board, cost so far). A neighbor is pushed when first seen or re-seen with
/// a strictly smaller cost, and a closed set skips settled boards, so with
/// the consistent heuristic the first goal popped carries a shortest path.
fn a_star(start: &Board, limit: Option<usize>) -> Result<Vec<u16>, SolveError> {
    let mut open = BinaryHeap::new();
    let mut parents: FxHashMap<Board, (u16, Board, u32)> = FxHashMap::default();
    let mut closed = FxHashSet::default();
    let mut sequence = 0u64;
    let mut expanded = 0usize;

    open.push(SearchNode {
        f: start.manhattan_distance(),
        seq: sequence,
        g: 0,
        board: start.clone(),
    });

    while let Some(SearchNode { g, board, .. }) = open.pop() {
        if !closed.insert(board.clone()) {
            continue;
        }

        if board.is_goal() {
            let path = reconstruct(&parents, &board);
            debug!("expanded {expanded} states, path length {}", path.len());
            return Ok(path);
        }

        expanded += 1;
        if let Some(max) = limit {
            if expanded > max {
                return Err(SolveError::LimitReached { explored: expanded });
            }
        }

        for (tile, successor) in board.neighbors() {
            if closed.contains(&successor) {
                continue;
            }
            let tentative = g + 1;
            let improves = parents
                .get(&successor)
                .map_or(true, |&(_, _, known)| tentative < known);
            if improves {
                sequence += 1;
                let estimate = tentative + successor.manhattan_distance();
                parents.insert(successor.clone(), (tile, board.clone(), tentative));
                open.push(SearchNode {
                    f: estimate,
                    seq: sequence,
                    g: tentative,
                    board: successor,
                });
            }
        }
    }

    warn!("open list exhausted after {expanded} expansions on a solvable board");
    Err(SolveError::FrontierExhausted)
}

/// Walks the A* parent map from the goal back to the root.
fn reconstruct(parents: &FxHashMap<Board, (u16, Board, u32)>, goal: &Board) -> Vec<u16> {
    let mut path = Vec::new();
    let mut current = goal;
    while let Some((tile, parent, _)) = parents.get(current) {
        path.push(*tile);
        current = parent;
    }
    path.reverse();
    path
}
