use crate::algorithms::a_star::AStar;
use crate::error::{ParsePositionError, PathError};
use log::debug;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Integer grid coordinate. Signed so that neighbor offsets and
/// out-of-range queries can be expressed directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    /// Euclidean distance between two coordinates.
    pub fn distance(&self, other: &Position) -> f64 {
        let dx = f64::from(self.x) - f64::from(other.x);
        let dy = f64::from(self.y) - f64::from(other.y);
        (dx * dx + dy * dy).sqrt()
    }

    pub fn manhattan(&self, other: &Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    fn offset(&self, dx: i32, dy: i32) -> Option<Position> {
        Some(Position {
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
        })
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl FromStr for Position {
    type Err = ParsePositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParsePositionError {
            input: s.to_string(),
        };
        let (x, y) = s.split_once(',').ok_or_else(err)?;
        let x = x.trim().parse().map_err(|_| err())?;
        let y = y.trim().parse().map_err(|_| err())?;
        Ok(Position { x, y })
    }
}

/// One grid square.
///
/// `g` is the cost from the start cell, `h` the estimated distance to the
/// goal and `f = g + h`. All three are rewritten by [`Grid::find_path`].
/// Equality and hashing only look at `pos`.
#[derive(Debug, Clone, Copy)]
pub struct Cell {
    pos: Position,
    pub barrier: bool,
    pub g: f64,
    pub h: f64,
    pub f: f64,
}

impl Cell {
    fn new(pos: Position) -> Self {
        Cell {
            pos,
            barrier: false,
            g: 0.0,
            h: 0.0,
            f: 0.0,
        }
    }

    pub fn pos(&self) -> Position {
        self.pos
    }

    pub fn distance_to(&self, other: &Cell) -> f64 {
        self.pos.distance(&other.pos)
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.pos == other.pos
    }
}

impl Eq for Cell {}

impl Hash for Cell {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.pos.hash(state);
    }
}

/// Left, right, up, down. Neighbor order follows this list.
const NEIGHBOR_OFFSETS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Dense row-major grid of cells, indexed by `y * width + x`.
#[derive(Debug, Clone)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        let mut cells = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                cells.push(Cell::new(Position::new(x as i32, y as i32)));
            }
        }

        Grid {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Row-major index of `pos`, or `None` when it lies outside the grid.
    pub fn index(&self, pos: Position) -> Option<usize> {
        if pos.x < 0 || pos.y < 0 {
            return None;
        }
        let (x, y) = (pos.x as usize, pos.y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y * self.width + x)
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.index(pos).is_some()
    }

    pub fn get_cell(&self, pos: Position) -> Option<&Cell> {
        self.index(pos).map(|i| &self.cells[i])
    }

    pub fn is_barrier(&self, pos: Position) -> bool {
        self.get_cell(pos).is_some_and(|c| c.barrier)
    }

    /// Marks the cell at `pos` as impassable. Marking twice is a no-op.
    pub fn set_barrier(&mut self, pos: Position) -> Result<(), PathError> {
        let i = self.index(pos).ok_or(PathError::OutOfBounds {
            pos,
            width: self.width,
            height: self.height,
        })?;
        self.cells[i].barrier = true;
        debug!("barrier set at {}", pos);
        Ok(())
    }

    /// Applies every barrier in order, stopping at the first one outside the grid.
    pub fn set_barriers<I>(&mut self, barriers: I) -> Result<(), PathError>
    where
        I: IntoIterator<Item = Position>,
    {
        for pos in barriers {
            self.set_barrier(pos)?;
        }
        Ok(())
    }

    /// In-bounds, non-barrier cells adjacent to `cell`, ordered left, right, up, down.
    pub fn neighbors(&self, cell: &Cell) -> Vec<&Cell> {
        NEIGHBOR_OFFSETS
            .iter()
            .filter_map(|&(dx, dy)| cell.pos.offset(dx, dy))
            .filter_map(|p| self.get_cell(p))
            .filter(|c| !c.barrier)
            .collect()
    }

    /// Shortest path from `start` to `end`, both inclusive.
    ///
    /// The search scores are written back into every cell of the grid, on
    /// success and on [`PathError::NoPathFound`] alike, so `g`/`h`/`f` can
    /// be inspected afterwards (see [`Grid::score_table`]). An invalid
    /// endpoint leaves the cells untouched.
    pub fn find_path(&mut self, start: Position, end: Position) -> Result<Vec<Cell>, PathError> {
        let mut searcher = AStar::new();
        let result = searcher.search(self, start, end);

        if let Some(scores) = searcher.scores() {
            for (cell, score) in self.cells.iter_mut().zip(scores) {
                cell.g = score.g;
                cell.h = score.h;
                cell.f = score.f;
            }
        }

        let outcome = result?;
        Ok(outcome
            .path
            .iter()
            .filter_map(|&p| self.get_cell(p).copied())
            .collect())
    }

    /// Applies `barriers` to the grid (they stay set) and then searches.
    pub fn find_path_with_barriers(
        &mut self,
        start: Position,
        end: Position,
        barriers: &[Position],
    ) -> Result<Vec<Cell>, PathError> {
        self.set_barriers(barriers.iter().copied())?;
        self.find_path(start, end)
    }

    /// Runs a search from `start` to `end` and returns the resulting
    /// [`Grid::score_table`], also when no path exists. `None` when an
    /// endpoint lies outside the grid.
    pub fn score_report(&mut self, start: Position, end: Position) -> Option<String> {
        match self.find_path(start, end) {
            Err(PathError::InvalidEndpoint { .. }) => None,
            _ => Some(self.score_table()),
        }
    }

    /// Text dump of the `g` scores left by the last search.
    ///
    /// `#` marks a barrier, `-` a cell the search never reached.
    pub fn score_table(&self) -> String {
        if self.width == 0 {
            return String::new();
        }

        let mut out = String::new();
        for row in self.cells.chunks(self.width) {
            let line: Vec<String> = row
                .iter()
                .map(|c| {
                    if c.barrier {
                        "#".to_string()
                    } else if c.g.is_finite() {
                        format!("{}", c.g.ceil() as i64)
                    } else {
                        "-".to_string()
                    }
                })
                .collect();
            out.push_str(&line.join(" "));
            out.push('\n');
        }
        out
    }
}
