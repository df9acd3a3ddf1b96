use clap::Parser;
use log::{info, warn};

use grid_astar::batch::{BatchConfig, BatchRunner};
use grid_astar::config::Config;
use grid_astar::scenario::Scenario;
use grid_astar::statistics::SearchStats;
use grid_astar::{Grid, RunError};
use std::time::Instant;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::parse();

    let result = if config.batch {
        run_batch(&config)
    } else {
        run_single(&config)
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run_batch(config: &Config) -> Result<(), RunError> {
    let mut runner = BatchRunner::new(BatchConfig::from(config));
    let summary = runner.run()?;

    println!("\n=== BATCH SUMMARY ===");
    println!("{}", summary);
    if let Some(path) = &config.output_file {
        println!("Results saved to: {}", path.display());
    }

    if summary.disagreements > 0 {
        return Err(RunError::Disagreement(summary.disagreements));
    }
    Ok(())
}

fn run_single(config: &Config) -> Result<(), RunError> {
    let mut grid = Grid::new(config.width, config.height);
    grid.set_barriers(config.barriers.iter().copied())?;

    if config.random_barriers > 0 {
        let seed = config.seed.unwrap_or_else(rand::random);
        let scenario = Scenario::with_endpoints(
            config.width,
            config.height,
            config.start,
            config.end,
            config.random_barriers,
            seed,
        )?;
        info!(
            "placed {} random barriers (seed {})",
            scenario.barriers.len(),
            seed
        );
        grid.set_barriers(scenario.barriers.iter().copied())?;
    }

    if !config.quiet {
        println!("Grid size: {}x{}", grid.width(), grid.height());
        println!(
            "Barriers: {}",
            grid.cells().iter().filter(|c| c.barrier).count()
        );
        println!("Start: {}, End: {}", config.start, config.end);
        println!();
    }

    let mut costs = Vec::new();
    let mut failure = None;
    for mut algorithm in config.algorithm.build() {
        let started = Instant::now();
        let path = match algorithm.find_path(&grid, config.start, config.end) {
            Ok(path) => path,
            Err(e) => {
                failure = Some(e);
                break;
            }
        };
        let elapsed = started.elapsed();

        let stats = SearchStats::new(algorithm.name(), &path, algorithm.nodes_expanded());
        println!("{}", stats);
        println!("Search time: {:.2?}", elapsed);
        if !config.quiet {
            let steps: Vec<String> = path.iter().map(|p| p.to_string()).collect();
            println!("Path: {}", steps.join(" -> "));
        }
        println!();

        costs.push((algorithm.name(), stats.path_cost));
    }

    if let Some((first_name, first_cost)) = costs.first() {
        for (name, cost) in &costs[1..] {
            if (cost - first_cost).abs() > 1e-9 {
                warn!(
                    "{} cost {:.3} differs from {} cost {:.3}",
                    name, cost, first_name, first_cost
                );
            }
        }
    }

    // Printed before any search error so an unreachable goal still shows
    // how far the search got.
    if config.show_scores {
        if let Some(table) = grid.score_report(config.start, config.end) {
            println!("=== G SCORES ===");
            print!("{}", table);
        }
    }

    match failure {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}
