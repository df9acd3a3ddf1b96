use crate::grid::Position;
use thiserror::Error;

/// Errors returned by grid mutation and path search.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("position {pos} is outside the {width}x{height} grid")]
    OutOfBounds {
        pos: Position,
        width: usize,
        height: usize,
    },

    #[error("endpoint {pos} does not resolve to a grid cell")]
    InvalidEndpoint { pos: Position },

    #[error("no path from {start} to {end}")]
    NoPathFound { start: Position, end: Position },
}

/// Error parsing a position from its `x,y` text form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid position {input:?}, expected `x,y`")]
pub struct ParsePositionError {
    pub input: String,
}

/// Errors raised by scenario generation, batch runs and the CLI.
#[derive(Error, Debug)]
pub enum RunError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Path(#[from] PathError),

    #[error("{0} scenarios disagreed with the reference search")]
    Disagreement(usize),
}
