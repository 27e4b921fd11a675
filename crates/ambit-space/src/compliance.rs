//! Grid neighbourhood compliance helpers.
//!
//! Invariants every grid shape must satisfy, reused by the test modules
//! of the grid backends.

use crate::grid::{GridShape, Neighbourhood};
use ambit_core::Point;
use indexmap::IndexSet;

/// Every enumerated point is in bounds, whatever the edge behavior.
pub fn assert_neighbourhood_in_bounds(grid: &GridShape, r: u32) {
    for pos in grid.points() {
        for kind in [Neighbourhood::Moore, Neighbourhood::VonNeumann] {
            for q in grid.neighbourhood(pos, r, kind, true) {
                assert!(
                    !grid.out_of_bounds(q),
                    "neighbourhood of {pos} (r={r}, {kind:?}) yielded out-of-bounds {q}"
                );
            }
        }
    }
}

/// The von Neumann neighbourhood is a subset of the Moore neighbourhood.
pub fn assert_von_neumann_within_moore(grid: &GridShape, r: u32) {
    for pos in grid.points() {
        let moore: IndexSet<Point> = grid
            .neighbourhood(pos, r, Neighbourhood::Moore, true)
            .into_iter()
            .collect();
        for q in grid.neighbourhood(pos, r, Neighbourhood::VonNeumann, true) {
            assert!(
                moore.contains(&q),
                "{q} in von Neumann but not Moore neighbourhood of {pos}"
            );
        }
    }
}

/// `center` adds exactly the queried cell and nothing else.
pub fn assert_center_flag_adds_only_center(grid: &GridShape, r: u32) {
    for pos in grid.points() {
        let with = grid.neighbourhood(pos, r, Neighbourhood::Moore, true);
        let without = grid.neighbourhood(pos, r, Neighbourhood::Moore, false);
        assert_eq!(with.len(), without.len() + 1, "center flag at {pos}");
        assert!(with.contains(&pos));
    }
}

/// `q in N(p)` implies `p in N(q)` for radius 1 (no repeats at this size).
pub fn assert_neighbourhood_symmetric(grid: &GridShape) {
    for pos in grid.points() {
        for q in grid.neighbourhood(pos, 1, Neighbourhood::Moore, false) {
            let back = grid.neighbourhood(q, 1, Neighbourhood::Moore, false);
            assert!(
                back.contains(&pos),
                "neighbour symmetry violated: {q} in N({pos}) but {pos} not in N({q})"
            );
        }
    }
}

/// Run the full compliance suite.
pub fn run_grid_compliance(grid: &GridShape) {
    for r in 0..3 {
        assert_neighbourhood_in_bounds(grid, r);
        assert_von_neumann_within_moore(grid, r);
        assert_center_flag_adds_only_center(grid, r);
    }
    assert_neighbourhood_symmetric(grid);
}
