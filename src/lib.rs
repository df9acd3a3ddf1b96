//! Shortest paths on a 2D grid with barrier cells, using A* with Euclidean
//! step cost and heuristic over 4-connected moves.

pub mod algorithms;
pub mod batch;
pub mod config;
pub mod error;
pub mod grid;
pub mod scenario;
pub mod statistics;

pub use error::{PathError, RunError};
pub use grid::{Cell, Grid, Position};
