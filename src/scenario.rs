use crate::error::RunError;
use crate::grid::{Grid, Position};
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashSet;

/// A reproducible search problem: grid size, endpoints and barrier cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    pub width: usize,
    pub height: usize,
    pub start: Position,
    pub end: Position,
    pub barriers: Vec<Position>,
    pub seed: u64,
}

impl Scenario {
    /// Random start in the top-left quadrant, random end in the bottom-right
    /// quadrant, and up to `num_barriers` barriers elsewhere.
    pub fn generate(
        width: usize,
        height: usize,
        num_barriers: usize,
        seed: u64,
    ) -> Result<Self, RunError> {
        check_dimensions(width, height)?;
        let mut rng = StdRng::seed_from_u64(seed);

        let start = Position::new(
            rng.gen_range(0..(width / 2).max(1)) as i32,
            rng.gen_range(0..(height / 2).max(1)) as i32,
        );
        let end = Position::new(
            rng.gen_range(width / 2..width) as i32,
            rng.gen_range(height / 2..height) as i32,
        );

        let barriers = place_barriers(&mut rng, width, height, start, end, num_barriers);
        Ok(Scenario {
            width,
            height,
            start,
            end,
            barriers,
            seed,
        })
    }

    /// Random barriers around fixed endpoints. Endpoints outside the grid
    /// are kept as given; the search reports them.
    pub fn with_endpoints(
        width: usize,
        height: usize,
        start: Position,
        end: Position,
        num_barriers: usize,
        seed: u64,
    ) -> Result<Self, RunError> {
        check_dimensions(width, height)?;
        let mut rng = StdRng::seed_from_u64(seed);
        let barriers = place_barriers(&mut rng, width, height, start, end, num_barriers);

        Ok(Scenario {
            width,
            height,
            start,
            end,
            barriers,
            seed,
        })
    }

    pub fn build_grid(&self) -> Result<Grid, RunError> {
        let mut grid = Grid::new(self.width, self.height);
        grid.set_barriers(self.barriers.iter().copied())?;
        Ok(grid)
    }
}

fn check_dimensions(width: usize, height: usize) -> Result<(), RunError> {
    if width == 0 || height == 0 {
        return Err(RunError::InvalidConfig(format!(
            "grid must be at least 1x1, got {}x{}",
            width, height
        )));
    }
    if i32::try_from(width).is_err() || i32::try_from(height).is_err() {
        return Err(RunError::InvalidConfig(format!(
            "grid {}x{} exceeds the coordinate range",
            width, height
        )));
    }
    Ok(())
}

fn place_barriers(
    rng: &mut StdRng,
    width: usize,
    height: usize,
    start: Position,
    end: Position,
    num_barriers: usize,
) -> Vec<Position> {
    let num_barriers = num_barriers.min(width.saturating_mul(height));
    let max_attempts = num_barriers.saturating_mul(3);
    let mut placed = FxHashSet::default();
    let mut barriers = Vec::with_capacity(num_barriers);
    let mut attempts = 0;

    while barriers.len() < num_barriers && attempts < max_attempts {
        let pos = Position::new(
            rng.gen_range(0..width) as i32,
            rng.gen_range(0..height) as i32,
        );
        if pos != start && pos != end && placed.insert(pos) {
            barriers.push(pos);
        }
        attempts += 1;
    }

    debug!(
        "placed {}/{} barriers in {} attempts",
        barriers.len(),
        num_barriers,
        attempts
    );
    barriers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_scenario() {
        let a = Scenario::generate(16, 12, 40, 7).unwrap();
        let b = Scenario::generate(16, 12, 40, 7).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn endpoints_in_opposite_quadrants() {
        for seed in 0..50 {
            let s = Scenario::generate(10, 8, 20, seed).unwrap();
            assert!(s.start.x < 5 && s.start.y < 4);
            assert!(s.end.x >= 5 && s.end.y >= 4);
        }
    }

    #[test]
    fn barriers_avoid_endpoints_and_repeat() {
        let s = Scenario::generate(6, 6, 30, 3).unwrap();
        let unique: FxHashSet<Position> = s.barriers.iter().copied().collect();
        assert_eq!(unique.len(), s.barriers.len());
        assert!(!unique.contains(&s.start));
        assert!(!unique.contains(&s.end));
        assert!(s.barriers.len() <= 34);

        let grid = s.build_grid().unwrap();
        assert!(s.barriers.iter().all(|&p| grid.is_barrier(p)));
    }

    #[test]
    fn rejects_empty_grid() {
        assert!(matches!(
            Scenario::generate(0, 5, 1, 0),
            Err(RunError::InvalidConfig(_))
        ));
    }

    #[test]
    fn single_cell_grid() {
        let s = Scenario::generate(1, 1, 5, 9).unwrap();
        assert_eq!(s.start, Position::new(0, 0));
        assert_eq!(s.end, Position::new(0, 0));
        assert!(s.barriers.is_empty());
    }

    #[test]
    fn huge_barrier_count_is_clamped() {
        let s = Scenario::with_endpoints(
            4,
            3,
            Position::new(0, 0),
            Position::new(3, 2),
            usize::MAX,
            5,
        )
        .unwrap();
        assert!(s.barriers.len() <= 10);
        assert!(!s.barriers.contains(&Position::new(0, 0)));
        assert!(!s.barriers.contains(&Position::new(3, 2)));
    }
}
