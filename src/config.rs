use crate::algorithms::a_star::AStar;
use crate::algorithms::common::PathfindingAlgorithm;
use crate::algorithms::reference::UnitCostAStar;
use crate::grid::Position;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    /// Euclidean A* over the grid
    #[value(name = "a_star")]
    AStar,
    /// Unit-cost A* from the `pathfinding` crate
    Reference,
    /// Run both and compare
    All,
}

impl Algorithm {
    pub fn build(self) -> Vec<Box<dyn PathfindingAlgorithm>> {
        match self {
            Algorithm::AStar => vec![Box::new(AStar::new())],
            Algorithm::Reference => vec![Box::new(UnitCostAStar::new())],
            Algorithm::All => vec![Box::new(AStar::new()), Box::new(UnitCostAStar::new())],
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    #[arg(long, default_value_t = 20)]
    pub width: usize,

    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Start cell as `x,y`
    #[arg(long, default_value = "2,1", allow_hyphen_values = true)]
    pub start: Position,

    /// Goal cell as `x,y`
    #[arg(long, default_value = "15,17", allow_hyphen_values = true)]
    pub end: Position,

    /// Barrier cell as `x,y`; repeatable
    #[arg(long = "barrier", allow_hyphen_values = true)]
    pub barriers: Vec<Position>,

    /// Number of random barriers to scatter around the endpoints
    #[arg(long, default_value_t = 0)]
    pub random_barriers: usize,

    /// Seed for random barriers and batch scenarios
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, value_enum, default_value_t = Algorithm::AStar)]
    pub algorithm: Algorithm,

    /// Print the g score of every cell after the search
    #[arg(long, default_value_t = false)]
    pub show_scores: bool,

    /// Cross-check A* against the reference search on random scenarios
    #[arg(long, default_value_t = false)]
    pub batch: bool,

    #[arg(long, default_value_t = 20)]
    pub num_simulations: usize,

    #[arg(long, default_value_t = 0)]
    pub min_barriers: usize,

    #[arg(long, default_value_t = 100)]
    pub max_barriers: usize,

    #[arg(long, default_value_t = 10)]
    pub barrier_step: usize,

    /// CSV file for batch results
    #[arg(long)]
    pub output_file: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_positions_and_barriers() {
        let config = Config::try_parse_from([
            "grid_astar",
            "--width",
            "5",
            "--start",
            "0,0",
            "--end",
            "4,4",
            "--barrier",
            "1,1",
            "--barrier",
            "2,2",
            "--algorithm",
            "all",
        ])
        .unwrap();

        assert_eq!(config.width, 5);
        assert_eq!(config.height, 20);
        assert_eq!(config.end, Position::new(4, 4));
        assert_eq!(config.barriers, vec![Position::new(1, 1), Position::new(2, 2)]);
        assert_eq!(config.algorithm, Algorithm::All);
        assert_eq!(config.algorithm.build().len(), 2);
    }

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["grid_astar"]).unwrap();
        assert_eq!(config.start, Position::new(2, 1));
        assert_eq!(config.end, Position::new(15, 17));
        assert_eq!(config.algorithm, Algorithm::AStar);
        assert!(config.barriers.is_empty());
    }

    #[test]
    fn rejects_malformed_position() {
        assert!(Config::try_parse_from(["grid_astar", "--start", "3"]).is_err());
    }
}
