//! Property tests for the search engine
//!
//! Covers geometry, frontier bookkeeping, determinism, termination and
//! restart behaviour on the reference board and on seeded random boards.

use std::collections::VecDeque;

use hexpath_core::{
    BoardConfig, Cell, Grid, HexPathError, Layout, Mark, NodeState, Rejection, SearchStatus,
    Session, StepReport, Topology,
};
use rustc_hash::FxHashSet;

// ============================================================================
// TEST FIXTURES
// ============================================================================

const TOPOLOGIES: [Topology; 2] = [Topology::Rhombus, Topology::OffsetRows];

/// Seeded random boards for both topologies
fn random_boards() -> Vec<BoardConfig> {
    let mut boards = Vec::new();
    for seed in 0..24u64 {
        let mut config = BoardConfig::random(8, 8, 0.3, seed);
        config.topology = TOPOLOGIES[seed as usize % 2];
        boards.push(config);
    }
    boards
}

/// Step a session until it stops, collecting every report
fn run_to_end(session: &mut Session) -> Vec<StepReport> {
    let mut reports = Vec::new();
    let limit = session.grid().len() + 1;
    for _ in 0..limit {
        let report = session.step().expect("step while running");
        let done = report.status.is_terminal();
        reports.push(report);
        if done {
            break;
        }
    }
    reports
}

/// Breadth-first distances from `from` over non-wall cells
fn bfs_distances(session: &Session, from: Cell) -> Vec<(Cell, u32)> {
    let grid = session.grid();
    let mut seen = FxHashSet::default();
    let mut queue = VecDeque::new();
    let mut out = Vec::new();

    let start = grid.id_of(from).unwrap();
    seen.insert(start);
    queue.push_back((start, 0));

    while let Some((id, dist)) = queue.pop_front() {
        out.push((grid[id].cell(), dist));
        for next in grid.neighbors_of(id) {
            if !grid[next].is_wall() && seen.insert(next) {
                queue.push_back((next, dist + 1));
            }
        }
    }
    out
}

fn assert_sets_consistent(session: &Session) {
    let open: FxHashSet<Cell> = session.open_cells().into_iter().collect();
    let closed: FxHashSet<Cell> = session.closed_cells().into_iter().collect();

    assert!(open.is_disjoint(&closed), "open and closed overlap");

    for node in session.grid().nodes() {
        let cell = node.cell();
        match node.mark() {
            Mark::Open => assert!(open.contains(&cell), "{} marked open", cell),
            Mark::Closed => assert!(closed.contains(&cell), "{} marked closed", cell),
            Mark::Unvisited => {
                assert!(!open.contains(&cell) && !closed.contains(&cell));
                assert_eq!(node.costs(), None, "{} has costs but was never visited", cell);
            }
        }
        if node.is_wall() {
            assert_eq!(node.mark(), Mark::Unvisited, "wall {} entered the search", cell);
        }
    }
}

// ============================================================================
// GEOMETRY
// ============================================================================

#[test]
fn test_coordinate_round_trip() {
    for topology in TOPOLOGIES {
        let mut config = BoardConfig::default();
        config.topology = topology;
        let layout = config.layout();
        for row in 0..8 {
            for col in 0..8 {
                let cell = Cell::new(col, row);
                let (x, y) = layout.to_layout(cell);
                assert_eq!(layout.to_grid(x, y), cell);
            }
        }
    }
}

#[test]
fn test_neighbor_symmetry() {
    for topology in TOPOLOGIES {
        let layout = Layout { topology, ..Layout::default() };
        let grid = Grid::generate(8, 8, layout).unwrap();
        for cell in grid.cells() {
            let a = grid.id_of(cell).unwrap();
            let neighbors: Vec<_> = grid.neighbors_of(a).collect();
            assert!(neighbors.len() <= 6);
            for b in neighbors {
                assert!(
                    grid.neighbors_of(b).any(|back| back == a),
                    "{:?}: {} -> {} is one-way",
                    topology,
                    cell,
                    grid[b].cell()
                );
            }
        }
    }
}

// ============================================================================
// FRONTIER BOOKKEEPING
// ============================================================================

#[test]
fn test_explored_count_tracks_opened_nodes() {
    for config in random_boards() {
        let mut session = Session::new(&config).unwrap();
        let mut explored = session.explored();
        for report in run_to_end(&mut session) {
            assert!(report.explored >= explored);
            assert_eq!(report.explored - explored, report.opened.len());
            explored = report.explored;
        }
    }
}

#[test]
fn test_open_and_closed_stay_disjoint() {
    for config in random_boards() {
        let mut session = Session::new(&config).unwrap();
        assert_sets_consistent(&session);
        while !session.status().is_terminal() {
            session.step().unwrap();
            assert_sets_consistent(&session);
        }
    }
}

// ============================================================================
// DETERMINISM
// ============================================================================

#[test]
fn test_repeated_runs_are_identical() {
    for config in random_boards() {
        let mut session = Session::new(&config).unwrap();
        let first = run_to_end(&mut session);
        let first_path = session.path().cloned();
        let first_closed = session.closed_cells();

        session.restart();
        let second = run_to_end(&mut session);

        assert_eq!(first, second);
        assert_eq!(first_path, session.path().cloned());
        assert_eq!(first_closed, session.closed_cells());

        let mut fresh = Session::new(&config).unwrap();
        assert_eq!(first, run_to_end(&mut fresh));
    }
}

// ============================================================================
// TERMINATION
// ============================================================================

#[test]
fn test_open_board_finds_target() {
    let mut session = Session::new(&BoardConfig::default()).unwrap();
    let reports = run_to_end(&mut session);

    assert!(reports.len() <= 64);
    assert_eq!(session.status(), SearchStatus::Found);

    let path = session.path().unwrap();
    assert_eq!(path.first(), Some(Cell::new(0, 0)));
    assert_eq!(path.last(), Some(Cell::new(7, 7)));
    assert_eq!(path.cost as usize, path.len() - 1);
    assert_eq!(path.cost, 14);

    for cell in &path.cells[1..] {
        assert!(session.node(*cell).unwrap().is_on_path());
    }
    assert_eq!(session.node(Cell::new(0, 0)).unwrap().state(), NodeState::Start);
}

#[test]
fn test_found_paths_are_shortest() {
    for config in random_boards() {
        let mut session = Session::new(&config).unwrap();
        run_to_end(&mut session);

        let reachable = bfs_distances(&session, config.start);
        let end_distance = reachable.iter().find(|(c, _)| *c == config.end).map(|&(_, d)| d);

        match session.status() {
            SearchStatus::Found => {
                let path = session.path().unwrap();
                assert_eq!(Some(path.cost), end_distance);

                let grid = session.grid();
                for pair in path.cells.windows(2) {
                    let a = grid.id_of(pair[0]).unwrap();
                    let b = grid.id_of(pair[1]).unwrap();
                    assert!(grid.neighbors_of(a).any(|n| n == b));
                }
            }
            SearchStatus::Exhausted => assert_eq!(end_distance, None),
            SearchStatus::Running => panic!("search did not finish"),
        }
    }
}

#[test]
fn test_enclosed_end_exhausts() {
    let mut config = BoardConfig::default();
    // (7, 7) only touches these two cells on a rhombus board
    config.walls = vec![Cell::new(7, 6), Cell::new(6, 7)];
    let mut session = Session::new(&config).unwrap();

    let reports = run_to_end(&mut session);
    let last = reports.last().unwrap();

    assert_eq!(last.status, SearchStatus::Exhausted);
    assert!(session.open_cells().is_empty());
    assert!(session.path().is_none());

    let reachable = bfs_distances(&session, config.start).len();
    assert_eq!(session.explored(), reachable - 1);
    assert_eq!(session.explored(), 64 - 2 - 1 - 1);

    assert_eq!(
        session.step(),
        Err(HexPathError::InvalidOperation(Rejection::SearchFinished(
            SearchStatus::Exhausted
        )))
    );
}

// ============================================================================
// RESTART
// ============================================================================

#[test]
fn test_restart_is_idempotent() {
    let mut config = BoardConfig::default();
    config.walls = vec![Cell::new(3, 3), Cell::new(4, 2)];
    let mut session = Session::new(&config).unwrap();
    run_to_end(&mut session);

    session.restart();
    let once = session.snapshot();
    session.restart();
    let twice = session.snapshot();

    assert_eq!(once, twice);
    assert_eq!(once.explored, 0);
    assert_eq!(once.status, SearchStatus::Running);
    assert_eq!(session.open_cells(), vec![Cell::new(0, 0)]);
    assert!(session.closed_cells().is_empty());

    for cell in &once.cells {
        if cell.cell == config.start {
            assert_eq!(cell.g_cost, Some(0));
            continue;
        }
        assert_eq!(cell.g_cost, None);
        assert_eq!(cell.parent, None);
        assert!(!matches!(cell.state, NodeState::Open | NodeState::Closed));
    }

    assert_eq!(once, Session::new(&config).unwrap().snapshot());
}

#[test]
fn test_independent_sessions_in_parallel() {
    let handles: Vec<_> = random_boards()
        .into_iter()
        .map(|config| {
            std::thread::spawn(move || {
                let mut session = Session::new(&config).unwrap();
                run_to_end(&mut session);
                (config, session.status(), session.explored())
            })
        })
        .collect();

    for handle in handles {
        let (config, status, explored) = handle.join().unwrap();
        let mut session = Session::new(&config).unwrap();
        run_to_end(&mut session);
        assert_eq!(session.status(), status);
        assert_eq!(session.explored(), explored);
    }
}
