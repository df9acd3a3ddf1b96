use grid_astar::algorithms::a_star::{AStar, SearchOutcome};
use grid_astar::scenario::Scenario;
use grid_astar::{Grid, PathError, Position};
use std::thread;

fn queries() -> Vec<(Position, Position)> {
    vec![
        (Position::new(0, 0), Position::new(19, 19)),
        (Position::new(19, 0), Position::new(0, 19)),
        (Position::new(3, 10), Position::new(17, 2)),
        (Position::new(10, 10), Position::new(10, 10)),
        (Position::new(0, 19), Position::new(19, 0)),
        (Position::new(5, 5), Position::new(14, 16)),
    ]
}

fn run_all(grid: &Grid) -> Vec<Result<SearchOutcome, PathError>> {
    let mut searcher = AStar::new();
    queries()
        .into_iter()
        .map(|(start, end)| searcher.search(grid, start, end))
        .collect()
}

#[test]
fn parallel_searches_match_sequential() {
    let mut scenario = Scenario::generate(20, 20, 80, 11).unwrap();
    scenario
        .barriers
        .retain(|p| queries().iter().all(|(s, e)| p != s && p != e));
    let grid = scenario.build_grid().unwrap();

    let sequential = run_all(&grid);

    let parallel: Vec<Result<SearchOutcome, PathError>> = thread::scope(|scope| {
        let handles: Vec<_> = queries()
            .into_iter()
            .map(|(start, end)| {
                let grid = &grid;
                scope.spawn(move || AStar::new().search(grid, start, end))
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("search thread panicked"))
            .collect()
    });

    assert_eq!(parallel, sequential);
}
