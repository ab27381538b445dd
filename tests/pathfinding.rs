use glam::IVec2;
use maze_chase::path::{Mark, Route, SearchStrategy};
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

mod common;

use common::{path_grid, tile_grid, ROOMS};

const STRATEGIES: [SearchStrategy; 2] = [SearchStrategy::Arena, SearchStrategy::Library];

#[test]
fn test_find_to_self_is_empty_for_every_walkable_cell() {
    for strategy in STRATEGIES {
        let tiles = tile_grid(ROOMS);
        let mut paths = path_grid(ROOMS, strategy);
        for cell in tiles.cells().filter(|&c| !tiles.is_wall(c)) {
            let route = paths.find(cell, cell);
            assert_that(&route).is_some().matches(|r| r.is_empty());
        }
    }
}

#[test]
fn test_sealed_chamber_is_unreachable() {
    for strategy in STRATEGIES {
        let mut paths = path_grid(ROOMS, strategy);
        assert_that(&paths.find(IVec2::new(1, 1), IVec2::new(5, 5))).is_none();
        assert_that(&paths.find(IVec2::new(6, 5), IVec2::new(1, 1))).is_none();
    }
}

#[test]
fn test_out_of_bounds_endpoints_are_unreachable() {
    let mut paths = path_grid(ROOMS, SearchStrategy::Arena);
    assert_that(&paths.find(IVec2::new(1, 1), IVec2::new(-1, 1))).is_none();
    assert_that(&paths.find(IVec2::new(20, 20), IVec2::new(1, 1))).is_none();
}

#[test]
fn test_replayed_routes_stay_off_walls_and_arrive() {
    for strategy in STRATEGIES {
        let tiles = tile_grid(ROOMS);
        let mut paths = path_grid(ROOMS, strategy);
        let open: Vec<IVec2> = tiles.cells().filter(|&c| !tiles.is_wall(c)).collect();

        for &start in &open {
            for &end in &open {
                let Some(route) = paths.find(start, end) else {
                    continue;
                };
                for cell in route.cells_from(start) {
                    assert!(!tiles.is_wall(cell), "{strategy}: {start} -> {end} crosses wall at {cell}");
                }
                assert_eq!(route.destination(start), end);
            }
        }
    }
}

#[test]
fn test_strategies_agree_on_route_length() {
    let tiles = tile_grid(ROOMS);
    let mut arena = path_grid(ROOMS, SearchStrategy::Arena);
    let mut library = path_grid(ROOMS, SearchStrategy::Library);
    let open: Vec<IVec2> = tiles.cells().filter(|&c| !tiles.is_wall(c)).collect();

    for &start in &open {
        for &end in &open {
            let a = arena.find(start, end).map(|r| r.len());
            let b = library.find(start, end).map(|r| r.len());
            assert_eq!(a, b, "{start} -> {end}");
        }
    }
}

#[test]
fn test_route_around_the_wall() {
    let mut paths = path_grid(ROOMS, SearchStrategy::Arena);
    let route = paths.find(IVec2::new(1, 1), IVec2::new(5, 1)).unwrap();

    // Across the top, down the middle column, through the gap in row 3 and back up.
    assert_eq!(route.len(), 8);
    assert_eq!(route.destination(IVec2::new(1, 1)), IVec2::new(5, 1));
}

#[test]
fn test_search_marks_start_end_and_route() {
    let mut paths = path_grid(ROOMS, SearchStrategy::Arena);
    let route = paths.find(IVec2::new(1, 1), IVec2::new(3, 3)).unwrap();

    assert_eq!(paths.mark(IVec2::new(1, 1)), Mark::Start);
    assert_eq!(paths.mark(IVec2::new(3, 3)), Mark::End);
    let middle: Vec<IVec2> = route.cells_from(IVec2::new(1, 1)).collect();
    assert_eq!(paths.mark(middle[0]), Mark::Route);

    // A fresh search clears the old marks.
    paths.find(IVec2::new(5, 1), IVec2::new(6, 1)).unwrap();
    assert_eq!(paths.mark(IVec2::new(1, 1)), Mark::None);
}

#[test]
fn test_route_text_round_trips() {
    let route: Route = "RRDDL".parse().unwrap();
    assert_eq!(route.len(), 5);
    assert_eq!(route.to_string(), "RRDDL");
    assert_that(&"RX".parse::<Route>()).is_err();
}
