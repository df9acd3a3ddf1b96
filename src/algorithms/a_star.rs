//! A* search over a [`Grid`] with Euclidean step cost and heuristic.
//!
//! All search state lives in the [`AStar`] value rather than in the grid, so
//! the grid is only borrowed immutably and independent searchers may run
//! over the same grid concurrently.

use crate::algorithms::common::PathfindingAlgorithm;
use crate::error::PathError;
use crate::grid::{Grid, Position};
use log::{debug, trace};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

const NO_PARENT: usize = usize::MAX;

/// Search scores for one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scores {
    /// Cost from the start cell.
    pub g: f64,
    /// Straight-line distance to the goal.
    pub h: f64,
    /// `g + h`, the expansion priority.
    pub f: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeState {
    Unvisited,
    Open,
    Closed,
}

/// Open-queue entry. Lowest `f` pops first; equal `f` pops in insertion order.
#[derive(Debug, Clone, Copy)]
struct OpenEntry {
    f: f64,
    seq: u64,
    idx: usize,
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so BinaryHeap (max-heap) pops the smallest key.
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

/// Successful search result.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    /// Start to goal, both inclusive.
    pub path: Vec<Position>,
    /// Summed Euclidean step cost along `path`.
    pub cost: f64,
    pub nodes_expanded: usize,
}

/// Reusable A* searcher. Buffers are kept between calls and reset at the
/// start of every search.
#[derive(Default)]
pub struct AStar {
    scores: Vec<Scores>,
    came_from: Vec<usize>,
    state: Vec<NodeState>,
    open: BinaryHeap<OpenEntry>,
    nodes_expanded: usize,
    searched: bool,
}

impl AStar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scores of every cell (row-major) from the last search, successful or
    /// not. `None` when the last call was rejected for an invalid endpoint.
    pub fn scores(&self) -> Option<&[Scores]> {
        self.searched.then_some(self.scores.as_slice())
    }

    pub fn search(
        &mut self,
        grid: &Grid,
        start: Position,
        goal: Position,
    ) -> Result<SearchOutcome, PathError> {
        trace!("[AStar] search: start={} goal={}", start, goal);
        self.searched = false;
        self.nodes_expanded = 0;

        let start_idx = grid
            .index(start)
            .ok_or(PathError::InvalidEndpoint { pos: start })?;
        let goal_idx = grid
            .index(goal)
            .ok_or(PathError::InvalidEndpoint { pos: goal })?;

        self.reset(grid, start_idx, goal);

        let mut seq: u64 = 0;
        self.state[start_idx] = NodeState::Open;
        self.open.push(OpenEntry {
            f: self.scores[start_idx].f,
            seq,
            idx: start_idx,
        });

        while let Some(entry) = self.open.pop() {
            let ci = entry.idx;

            // Superseded by a cheaper entry that has already been expanded.
            if self.state[ci] != NodeState::Open {
                continue;
            }

            if ci == goal_idx {
                let path = self.reconstruct_path(grid, goal_idx);
                let cost = self.scores[goal_idx].g;
                trace!(
                    "[AStar] SUCCESS: path length={} cells, cost={:.2}, nodes_expanded={}",
                    path.len(),
                    cost,
                    self.nodes_expanded
                );
                return Ok(SearchOutcome {
                    path,
                    cost,
                    nodes_expanded: self.nodes_expanded,
                });
            }

            self.state[ci] = NodeState::Closed;
            self.nodes_expanded += 1;

            let current = &grid.cells()[ci];
            let current_g = self.scores[ci].g;

            for neighbor in grid.neighbors(current) {
                let Some(ni) = grid.index(neighbor.pos()) else {
                    continue;
                };
                if self.state[ni] == NodeState::Closed {
                    continue;
                }

                let tentative_g = current_g + current.distance_to(neighbor);
                if self.state[ni] != NodeState::Open || tentative_g < self.scores[ni].g {
                    self.came_from[ni] = ci;
                    let f = tentative_g + self.scores[ni].h;
                    self.scores[ni].g = tentative_g;
                    self.scores[ni].f = f;
                    self.state[ni] = NodeState::Open;

                    seq += 1;
                    self.open.push(OpenEntry { f, seq, idx: ni });
                }
            }
        }

        debug!(
            "[AStar] FAILED: no path from {} to {} after expanding {} nodes",
            start, goal, self.nodes_expanded
        );
        Err(PathError::NoPathFound { start, end: goal })
    }

    fn reset(&mut self, grid: &Grid, start_idx: usize, goal: Position) {
        let len = grid.cells().len();

        self.scores.clear();
        self.scores.extend(grid.cells().iter().map(|cell| Scores {
            g: f64::INFINITY,
            h: cell.pos().distance(&goal),
            f: f64::INFINITY,
        }));
        self.came_from.clear();
        self.came_from.resize(len, NO_PARENT);
        self.state.clear();
        self.state.resize(len, NodeState::Unvisited);
        self.open.clear();
        self.nodes_expanded = 0;
        self.searched = true;

        let start = &mut self.scores[start_idx];
        start.g = 0.0;
        start.f = start.h;
    }

    fn reconstruct_path(&self, grid: &Grid, goal_idx: usize) -> Vec<Position> {
        let mut path = Vec::new();
        let mut ci = goal_idx;

        while ci != NO_PARENT {
            path.push(grid.cells()[ci].pos());
            ci = self.came_from[ci];
        }
        path.reverse();
        path
    }
}

impl PathfindingAlgorithm for AStar {
    fn name(&self) -> &'static str {
        "a_star"
    }

    fn find_path(
        &mut self,
        grid: &Grid,
        start: Position,
        goal: Position,
    ) -> Result<Vec<Position>, PathError> {
        self.search(grid, start, goal).map(|outcome| outcome.path)
    }

    fn nodes_expanded(&self) -> Option<usize> {
        self.searched.then_some(self.nodes_expanded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_f_pops_in_insertion_order() {
        let mut heap = BinaryHeap::new();
        for (f, seq, idx) in [(2.0, 3, 30), (1.0, 2, 20), (1.0, 1, 10), (2.0, 0, 0)] {
            heap.push(OpenEntry { f, seq, idx });
        }

        let order: Vec<usize> = std::iter::from_fn(|| heap.pop().map(|e| e.idx)).collect();
        assert_eq!(order, vec![10, 20, 0, 30]);
    }

    #[test]
    fn straight_corridor() {
        let grid = Grid::new(5, 1);
        let outcome = AStar::new()
            .search(&grid, Position::new(0, 0), Position::new(4, 0))
            .unwrap();
        assert_eq!(outcome.path, (0..5).map(|x| Position::new(x, 0)).collect::<Vec<_>>());
        assert_eq!(outcome.cost, 4.0);
        assert_eq!(outcome.nodes_expanded, 4);
    }

    #[test]
    fn tie_break_prefers_first_inserted() {
        // From (0,0) the right neighbor is queued before the down neighbor
        // and both have equal f, so the path runs along the top row first.
        let grid = Grid::new(2, 2);
        let outcome = AStar::new()
            .search(&grid, Position::new(0, 0), Position::new(1, 1))
            .unwrap();
        assert_eq!(
            outcome.path,
            vec![Position::new(0, 0), Position::new(1, 0), Position::new(1, 1)]
        );
    }

    #[test]
    fn scores_reset_between_searches() {
        let mut grid = Grid::new(6, 6);
        grid.set_barrier(Position::new(2, 2)).unwrap();
        let mut searcher = AStar::new();

        searcher
            .search(&grid, Position::new(0, 0), Position::new(5, 5))
            .unwrap();
        let second = searcher
            .search(&grid, Position::new(5, 0), Position::new(0, 5))
            .unwrap();
        let fresh = AStar::new()
            .search(&grid, Position::new(5, 0), Position::new(0, 5))
            .unwrap();

        assert_eq!(second, fresh);
        let scores = searcher.scores().unwrap();
        assert_eq!(scores[grid.index(Position::new(5, 0)).unwrap()].g, 0.0);
    }

    #[test]
    fn heuristic_is_distance_to_goal() {
        let grid = Grid::new(4, 4);
        let mut searcher = AStar::new();
        searcher
            .search(&grid, Position::new(0, 0), Position::new(3, 0))
            .unwrap();

        let scores = searcher.scores().unwrap();
        let far = scores[grid.index(Position::new(3, 3)).unwrap()];
        assert_eq!(far.h, 3.0);
        assert_eq!(scores[0].f, 3.0);
    }

    #[test]
    fn invalid_endpoint_skips_search() {
        let grid = Grid::new(3, 3);
        let mut searcher = AStar::new();
        let err = searcher
            .search(&grid, Position::new(3, 0), Position::new(0, 0))
            .unwrap_err();
        assert_eq!(
            err,
            PathError::InvalidEndpoint {
                pos: Position::new(3, 0)
            }
        );
        assert!(searcher.scores().is_none());
    }

    #[test]
    fn invalid_endpoint_clears_previous_results() {
        let grid = Grid::new(5, 5);
        let mut searcher = AStar::new();
        searcher
            .search(&grid, Position::new(0, 0), Position::new(4, 4))
            .unwrap();
        assert!(searcher.scores().is_some());

        let err = searcher
            .find_path(&grid, Position::new(9, 9), Position::new(0, 0))
            .unwrap_err();
        assert_eq!(
            err,
            PathError::InvalidEndpoint {
                pos: Position::new(9, 9)
            }
        );
        assert!(searcher.scores().is_none());
        assert_eq!(searcher.nodes_expanded(), None);
    }
}
