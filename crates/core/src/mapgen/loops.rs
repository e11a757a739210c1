//! Secondary doorways wherever a wall separates two floor cells that are
//! otherwise far apart.

use crate::grid::{DOOR, FLOOR, GRANITE, Grid, RESERVED};
use crate::pathing::{PATHING_FORBIDDEN, PATHING_OBSTRUCTION, PATHING_UNREACHED, dijkstra_scan};
use crate::rng::LevelRng;
use crate::types::Pos;

/// Horizontal axis first, then vertical.
const DOORWAY_AXES: [(i32, i32); 2] = [(1, 0), (0, 1)];

/// Traversal costs for the carved grid: granite obstructs, reserved cells are
/// forbidden, everything carved costs one step.
pub fn pathing_costs(grid: &Grid) -> Grid {
    let mut costs = grid.clone();
    costs.find_replace(GRANITE, GRANITE, PATHING_OBSTRUCTION);
    costs.find_replace(FLOOR, PATHING_UNREACHED, 1);
    costs.find_replace(RESERVED, RESERVED, PATHING_FORBIDDEN);
    costs
}

/// Visits granite cells in shuffled order and turns one into a doorway when
/// it has floor on both sides along an axis and the walk between those two
/// floor cells is longer than `minimum_pathing_distance`. Returns how many
/// doorways were opened.
pub fn add_loops(grid: &mut Grid, minimum_pathing_distance: i32, rng: &mut LevelRng) -> usize {
    let mut order: Vec<usize> = (0..grid.cell_count()).collect();
    rng.shuffle(&mut order);

    let mut costs = pathing_costs(grid);
    let mut distance = Grid::new(grid.width(), grid.height());
    let mut opened = 0;

    for index in order {
        let pos = grid.pos_at_column_major(index);
        if grid[pos] != GRANITE {
            continue;
        }
        for (dx, dy) in DOORWAY_AXES {
            let near = pos.offset(dx, dy);
            let far = pos.offset(-dx, -dy);
            if grid.get(near) != Some(FLOOR) || grid.get(far) != Some(FLOOR) {
                continue;
            }
            if detour_length(&mut distance, &costs, near, far) > minimum_pathing_distance {
                grid[pos] = DOOR;
                costs[pos] = 1;
                opened += 1;
                break;
            }
        }
    }
    log::debug!("loop pass opened {opened} doorways (threshold {minimum_pathing_distance})");
    opened
}

fn detour_length(distance: &mut Grid, costs: &Grid, from: Pos, to: Pos) -> i32 {
    distance.fill(PATHING_UNREACHED);
    distance[from] = 0;
    dijkstra_scan(distance, costs, false);
    distance[to]
}
