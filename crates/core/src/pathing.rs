//! Multi-source shortest-path scan over an integer cost grid.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::grid::Grid;
use crate::types::{CARDINAL_OFFSETS, COMPASS_OFFSETS, Pos};

/// Distance of a cell no source has reached.
pub const PATHING_UNREACHED: i32 = 30_000;
/// Cost of a cell that can never be entered but does not block diagonals.
pub const PATHING_FORBIDDEN: i32 = -1;
/// Cost of solid terrain: never entered, and diagonal steps may not cut its corners.
pub const PATHING_OBSTRUCTION: i32 = -2;

/// Relaxes `distance` in place. Every cell already below
/// [`PATHING_UNREACHED`] is a source; a cell can be entered only when its
/// cost is positive.
pub fn dijkstra_scan(distance: &mut Grid, cost: &Grid, use_diagonals: bool) {
    assert_eq!(
        (distance.width(), distance.height()),
        (cost.width(), cost.height()),
        "distance and cost grids differ in size"
    );

    let mut frontier = BinaryHeap::new();
    for pos in distance.positions() {
        let value = distance[pos];
        if value < PATHING_UNREACHED {
            frontier.push(Reverse((value, pos)));
        }
    }

    let steps: &[(i32, i32)] = if use_diagonals { &COMPASS_OFFSETS } else { &CARDINAL_OFFSETS };
    while let Some(Reverse((value, pos))) = frontier.pop() {
        if value > distance[pos] {
            continue;
        }
        for &(dx, dy) in steps {
            let next = pos.offset(dx, dy);
            let Some(step_cost) = cost.get(next) else {
                continue;
            };
            if step_cost <= 0 {
                continue;
            }
            if dx != 0 && dy != 0 && cuts_obstructed_corner(cost, pos, dx, dy) {
                continue;
            }
            let candidate = value + step_cost;
            if candidate < distance[next] {
                distance[next] = candidate;
                frontier.push(Reverse((candidate, next)));
            }
        }
    }
}

fn cuts_obstructed_corner(cost: &Grid, from: Pos, dx: i32, dy: i32) -> bool {
    [from.offset(dx, 0), from.offset(0, dy)]
        .into_iter()
        .any(|corner| cost.get(corner) == Some(PATHING_OBSTRUCTION))
}
