use crate::grid::Position;
use std::fmt;

/// Summed Euclidean step distance along `path`.
pub fn path_cost(path: &[Position]) -> f64 {
    path.windows(2).map(|w| w[0].distance(&w[1])).sum()
}

/// True when every step moves to a 4-connected neighbor.
pub fn is_contiguous(path: &[Position]) -> bool {
    path.windows(2).all(|w| w[0].manhattan(&w[1]) == 1)
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchStats {
    pub algorithm: &'static str,
    pub path_cells: usize,
    pub path_cost: f64,
    pub nodes_expanded: Option<usize>,
    pub straight_line: f64,
}

impl SearchStats {
    pub fn new(
        algorithm: &'static str,
        path: &[Position],
        nodes_expanded: Option<usize>,
    ) -> Self {
        let straight_line = match (path.first(), path.last()) {
            (Some(a), Some(b)) => a.distance(b),
            _ => 0.0,
        };

        SearchStats {
            algorithm,
            path_cells: path.len(),
            path_cost: path_cost(path),
            nodes_expanded,
            straight_line,
        }
    }

    /// Path cost relative to the straight-line distance between the endpoints.
    pub fn detour_ratio(&self) -> f64 {
        if self.straight_line > 0.0 {
            self.path_cost / self.straight_line
        } else {
            1.0
        }
    }
}

impl fmt::Display for SearchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Algorithm: {}", self.algorithm)?;
        writeln!(f, "Path Cells: {}", self.path_cells)?;
        writeln!(f, "Path Cost: {:.3}", self.path_cost)?;
        writeln!(f, "Straight Line: {:.3}", self.straight_line)?;
        writeln!(f, "Detour Ratio: {:.3}", self.detour_ratio())?;
        if let Some(expanded) = self.nodes_expanded {
            writeln!(f, "Nodes Expanded: {}", expanded)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cost_of_staircase() {
        let path = [
            Position::new(0, 0),
            Position::new(1, 0),
            Position::new(1, 1),
            Position::new(2, 1),
        ];
        assert_eq!(path_cost(&path), 3.0);
        assert!(is_contiguous(&path));
        assert!(!is_contiguous(&[Position::new(0, 0), Position::new(1, 1)]));
    }

    #[test]
    fn single_cell_stats() {
        let stats = SearchStats::new("a_star", &[Position::new(0, 0)], Some(0));
        assert_eq!(stats.path_cells, 1);
        assert_eq!(stats.path_cost, 0.0);
        assert_eq!(stats.detour_ratio(), 1.0);
        assert!(stats.to_string().contains("Nodes Expanded: 0"));
    }
}
