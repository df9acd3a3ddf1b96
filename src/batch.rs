use crate::algorithms::a_star::AStar;
use crate::algorithms::common::PathfindingAlgorithm;
use crate::algorithms::reference::UnitCostAStar;
use crate::config::Config;
use crate::error::{PathError, RunError};
use crate::grid::{Grid, Position};
use crate::scenario::Scenario;
use crate::statistics::{is_contiguous, path_cost};
use log::{info, warn};
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, Instant};

const COST_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub width: usize,
    pub height: usize,
    pub min_barriers: usize,
    pub max_barriers: usize,
    pub barrier_step: usize,
    pub num_simulations: usize,
    pub seed: Option<u64>,
    pub output_file: Option<PathBuf>,
    pub quiet: bool,
}

impl From<&Config> for BatchConfig {
    fn from(config: &Config) -> Self {
        BatchConfig {
            width: config.width,
            height: config.height,
            min_barriers: config.min_barriers,
            max_barriers: config.max_barriers,
            barrier_step: config.barrier_step,
            num_simulations: config.num_simulations,
            seed: config.seed,
            output_file: config.output_file.clone(),
            quiet: config.quiet,
        }
    }
}

/// Outcome of one scenario run through both searches.
#[derive(Debug, Clone)]
pub struct BatchResult {
    pub simulation_id: usize,
    pub seed: u64,
    pub num_barriers: usize,
    pub found: bool,
    /// Both searches failed, or both found a valid path of equal cost.
    pub agrees: bool,
    pub path_cells: usize,
    pub path_cost: f64,
    pub nodes_expanded: usize,
    pub a_star_time: Duration,
    pub reference_time: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchSummary {
    pub total: usize,
    pub found: usize,
    pub disagreements: usize,
    pub average_nodes_expanded: f64,
    pub average_a_star_time: Duration,
    pub average_reference_time: Duration,
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let found_rate = if self.total > 0 {
            (self.found as f64 / self.total as f64) * 100.0
        } else {
            0.0
        };

        writeln!(f, "Scenarios: {}", self.total)?;
        writeln!(f, "Paths found: {} ({:.1}%)", self.found, found_rate)?;
        writeln!(f, "Disagreements: {}", self.disagreements)?;
        writeln!(f, "Average nodes expanded: {:.1}", self.average_nodes_expanded)?;
        writeln!(f, "Average A* time: {:.2?}", self.average_a_star_time)?;
        writeln!(f, "Average reference time: {:.2?}", self.average_reference_time)?;
        Ok(())
    }
}

/// Runs A* and the reference search over many random scenarios and checks
/// that they agree on reachability and path cost.
pub struct BatchRunner {
    config: BatchConfig,
    results: Vec<BatchResult>,
    flushed: usize,
    flush_every: usize,
    start_time: Instant,
}

impl BatchRunner {
    pub fn new(config: BatchConfig) -> Self {
        BatchRunner {
            config,
            results: Vec::new(),
            flushed: 0,
            flush_every: 100,
            start_time: Instant::now(),
        }
    }

    pub fn with_flush_every(mut self, flush_every: usize) -> Self {
        self.flush_every = flush_every.max(1);
        self
    }

    pub fn results(&self) -> &[BatchResult] {
        &self.results
    }

    pub fn run(&mut self) -> Result<BatchSummary, RunError> {
        if self.config.min_barriers > self.config.max_barriers {
            return Err(RunError::InvalidConfig(format!(
                "min barriers {} exceeds max barriers {}",
                self.config.min_barriers, self.config.max_barriers
            )));
        }

        let base_seed = self.config.seed.unwrap_or_else(rand::random);
        self.start_time = Instant::now();
        self.initialize_csv_file()?;

        info!(
            "batch started: grid {}x{}, barriers {}..={} step {}, {} simulations each, seed {}",
            self.config.width,
            self.config.height,
            self.config.min_barriers,
            self.config.max_barriers,
            self.config.barrier_step,
            self.config.num_simulations,
            base_seed
        );

        let mut simulation_id = 0;
        let step = self.config.barrier_step.max(1);
        for num_barriers in (self.config.min_barriers..=self.config.max_barriers).step_by(step) {
            for _ in 0..self.config.num_simulations {
                let seed = base_seed.wrapping_add(simulation_id as u64);
                let scenario =
                    Scenario::generate(self.config.width, self.config.height, num_barriers, seed)?;
                let result = run_scenario(&scenario, simulation_id)?;

                if !result.agrees {
                    warn!(
                        "simulation {} (seed {}): A* and reference disagree from {} to {}",
                        simulation_id, seed, scenario.start, scenario.end
                    );
                }
                self.results.push(result);
                simulation_id += 1;

                if self.results.len() - self.flushed >= self.flush_every {
                    self.flush_results_to_csv()?;
                }
            }

            if !self.config.quiet {
                info!(
                    "{} barriers done ({} scenarios so far, {:.1}s)",
                    num_barriers,
                    self.results.len(),
                    self.start_time.elapsed().as_secs_f64()
                );
            }
        }

        self.flush_results_to_csv()?;
        Ok(self.summary())
    }

    pub fn summary(&self) -> BatchSummary {
        let total = self.results.len();
        let found = self.results.iter().filter(|r| r.found).count();
        let disagreements = self.results.iter().filter(|r| !r.agrees).count();

        let (average_nodes_expanded, average_a_star_time, average_reference_time) = if total > 0 {
            let n = total as u32;
            (
                self.results.iter().map(|r| r.nodes_expanded as f64).sum::<f64>() / total as f64,
                self.results.iter().map(|r| r.a_star_time).sum::<Duration>() / n,
                self.results.iter().map(|r| r.reference_time).sum::<Duration>() / n,
            )
        } else {
            (0.0, Duration::ZERO, Duration::ZERO)
        };

        BatchSummary {
            total,
            found,
            disagreements,
            average_nodes_expanded,
            average_a_star_time,
            average_reference_time,
        }
    }

    fn initialize_csv_file(&self) -> Result<(), RunError> {
        let Some(path) = &self.config.output_file else {
            return Ok(());
        };

        let mut file = File::create(path)?;
        writeln!(
            file,
            "simulation_id,seed,num_barriers,found,agrees,path_cells,path_cost,nodes_expanded,a_star_time_ns,reference_time_ns"
        )?;
        info!("initialized CSV file {}", path.display());
        Ok(())
    }

    fn flush_results_to_csv(&mut self) -> Result<(), RunError> {
        let pending = &self.results[self.flushed..];
        if pending.is_empty() {
            return Ok(());
        }
        let Some(path) = &self.config.output_file else {
            self.flushed = self.results.len();
            return Ok(());
        };

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        for r in pending {
            writeln!(
                file,
                "{},{},{},{},{},{},{:.6},{},{},{}",
                r.simulation_id,
                r.seed,
                r.num_barriers,
                r.found,
                r.agrees,
                r.path_cells,
                r.path_cost,
                r.nodes_expanded,
                r.a_star_time.as_nanos(),
                r.reference_time.as_nanos()
            )?;
        }

        self.flushed = self.results.len();
        info!("flushed results to CSV (total: {})", self.flushed);
        Ok(())
    }
}

/// Runs both searches on `scenario` and compares them.
pub fn run_scenario(scenario: &Scenario, simulation_id: usize) -> Result<BatchResult, RunError> {
    let grid = scenario.build_grid()?;
    let (start, end) = (scenario.start, scenario.end);

    let mut a_star = AStar::new();
    let started = Instant::now();
    let outcome = a_star.search(&grid, start, end);
    let a_star_time = started.elapsed();

    let mut reference = UnitCostAStar::new();
    let started = Instant::now();
    let expected = reference.find_path(&grid, start, end);
    let reference_time = started.elapsed();

    let (found, agrees, path_cells, cost, nodes_expanded) = match (outcome, expected) {
        (Ok(outcome), Ok(expected)) => {
            let expected_cost = path_cost(&expected);
            let agrees = is_valid_path(&grid, &outcome.path, start, end)
                && (outcome.cost - expected_cost).abs() < COST_EPSILON;
            (true, agrees, outcome.path.len(), outcome.cost, outcome.nodes_expanded)
        }
        (Err(PathError::NoPathFound { .. }), Err(PathError::NoPathFound { .. })) => {
            (false, true, 0, 0.0, a_star.nodes_expanded().unwrap_or(0))
        }
        (Err(e @ PathError::InvalidEndpoint { .. }), _)
        | (_, Err(e @ PathError::InvalidEndpoint { .. })) => return Err(e.into()),
        (outcome, _) => {
            let found = outcome.is_ok();
            (found, false, 0, 0.0, a_star.nodes_expanded().unwrap_or(0))
        }
    };

    Ok(BatchResult {
        simulation_id,
        seed: scenario.seed,
        num_barriers: scenario.barriers.len(),
        found,
        agrees,
        path_cells,
        path_cost: cost,
        nodes_expanded,
        a_star_time,
        reference_time,
    })
}

fn is_valid_path(grid: &Grid, path: &[Position], start: Position, end: Position) -> bool {
    path.first() == Some(&start)
        && path.last() == Some(&end)
        && is_contiguous(path)
        && path.iter().all(|&p| grid.contains(p) && !grid.is_barrier(p))
}
