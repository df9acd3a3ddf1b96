use crate::algorithms::common::PathfindingAlgorithm;
use crate::error::PathError;
use crate::grid::{Grid, Position};
use pathfinding::prelude::astar;

/// Unit-cost A* built on the `pathfinding` crate.
///
/// Every axis step costs exactly 1, so its path cost matches the Euclidean
/// cost of [`crate::algorithms::a_star::AStar`]. Used to cross-check the
/// main search.
#[derive(Default)]
pub struct UnitCostAStar;

impl UnitCostAStar {
    pub fn new() -> Self {
        UnitCostAStar
    }
}

impl PathfindingAlgorithm for UnitCostAStar {
    fn name(&self) -> &'static str {
        "reference"
    }

    fn find_path(
        &mut self,
        grid: &Grid,
        start: Position,
        goal: Position,
    ) -> Result<Vec<Position>, PathError> {
        if !grid.contains(start) {
            return Err(PathError::InvalidEndpoint { pos: start });
        }
        if !grid.contains(goal) {
            return Err(PathError::InvalidEndpoint { pos: goal });
        }

        let result = astar(
            &start,
            |p| {
                grid.get_cell(*p)
                    .map(|cell| {
                        grid.neighbors(cell)
                            .into_iter()
                            .map(|n| (n.pos(), 1u32))
                            .collect::<Vec<_>>()
                    })
                    .unwrap_or_default()
            },
            // Manhattan distance never overestimates on a 4-connected grid.
            |p| p.manhattan(&goal),
            |p| *p == goal,
        );

        result
            .map(|(path, _)| path)
            .ok_or(PathError::NoPathFound { start, end: goal })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detours_around_wall() {
        let mut grid = Grid::new(3, 3);
        grid.set_barrier(Position::new(1, 0)).unwrap();
        grid.set_barrier(Position::new(1, 1)).unwrap();

        let path = UnitCostAStar::new()
            .find_path(&grid, Position::new(0, 0), Position::new(2, 0))
            .unwrap();
        assert_eq!(path.len(), 7);
        assert_eq!(path.first(), Some(&Position::new(0, 0)));
        assert_eq!(path.last(), Some(&Position::new(2, 0)));
    }

    #[test]
    fn rejects_outside_endpoints() {
        let grid = Grid::new(2, 2);
        let err = UnitCostAStar::new()
            .find_path(&grid, Position::new(0, 0), Position::new(0, -1))
            .unwrap_err();
        assert_eq!(
            err,
            PathError::InvalidEndpoint {
                pos: Position::new(0, -1)
            }
        );
    }
}
