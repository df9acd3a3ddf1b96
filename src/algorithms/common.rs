use crate::error::PathError;
use crate::grid::{Grid, Position};

pub trait PathfindingAlgorithm {
    /// Short name used in reports and on the command line.
    fn name(&self) -> &'static str;

    fn find_path(
        &mut self,
        grid: &Grid,
        start: Position,
        goal: Position,
    ) -> Result<Vec<Position>, PathError>;

    /// Nodes expanded by the last call, when the algorithm tracks it.
    fn nodes_expanded(&self) -> Option<usize> {
        None
    }
}
