//! Loop flags: which open cells sit on a genuine cycle rather than in a
//! hallway or a dead-end pocket.

use crate::grid::Grid;
use crate::map::{CellFlags, PermanentMap};
use crate::types::{COMPASS_OFFSETS, Pos};

/// Marks every open cell as in a loop, then relaxes each cell in
/// column-major order. A cleared cell queues its eight neighbors for an
/// immediate recheck, depth first in compass order, until nothing changes.
pub fn detect_loops(map: &mut PermanentMap) {
    for pos in map.positions() {
        let open = !map[pos].blocks_pathing();
        map[pos].flags.set(CellFlags::IN_LOOP, open);
    }
    for pos in map.positions() {
        relax_from(map, pos);
    }
}

fn relax_from(map: &mut PermanentMap, start: Pos) {
    let mut pending = vec![start];
    while let Some(pos) = pending.pop() {
        if !sheds_loop_flag(map, pos) {
            continue;
        }
        map[pos].flags.remove(CellFlags::IN_LOOP);
        for &(dx, dy) in COMPASS_OFFSETS.iter().rev() {
            let neighbor = pos.offset(dx, dy);
            if map.in_bounds(neighbor) {
                pending.push(neighbor);
            }
        }
    }
}

/// A loop cell whose loop-flagged neighbors form exactly one string of at
/// most four cells, walking clockwise from its first non-loop neighbor.
fn sheds_loop_flag(map: &PermanentMap, pos: Pos) -> bool {
    if !map[pos].is_in_loop() {
        return false;
    }
    let neighbor_in_loop = |dir: usize| {
        let (dx, dy) = COMPASS_OFFSETS[dir % COMPASS_OFFSETS.len()];
        map.cell(pos.offset(dx, dy)).is_some_and(|cell| cell.is_in_loop())
    };
    let Some(start) = (0..COMPASS_OFFSETS.len()).find(|&dir| !neighbor_in_loop(dir)) else {
        return false;
    };

    let mut strings = 0;
    let mut run = 0;
    let mut longest = 0;
    for dir in start..start + COMPASS_OFFSETS.len() {
        if neighbor_in_loop(dir) {
            run += 1;
            if run == 1 {
                if strings > 0 {
                    return false;
                }
                strings += 1;
            }
        } else {
            longest = longest.max(run);
            run = 0;
        }
    }
    longest = longest.max(run);
    strings == 1 && longest <= 4
}

/// Demotes loop cells that do not border any enclosed non-loop pocket.
/// Non-loop cells reachable 8-connected from `(0, 0)` are the outside; a
/// loop cell survives only next to an in-bounds non-loop cell the flood did
/// not reach. Returns how many cells were demoted.
pub fn audit_loops(map: &mut PermanentMap) -> usize {
    let mut flooded = Grid::new(map.width(), map.height());
    let origin = Pos::new(0, 0);
    if map.cell(origin).is_some_and(|cell| !cell.is_in_loop()) {
        flooded[origin] = 1;
        let mut stack = vec![origin];
        while let Some(pos) = stack.pop() {
            for &(dx, dy) in &COMPASS_OFFSETS {
                let next = pos.offset(dx, dy);
                if flooded.get(next) == Some(0) && !map[next].is_in_loop() {
                    flooded[next] = 1;
                    stack.push(next);
                }
            }
        }
    }

    let mut demoted = 0;
    for pos in map.positions() {
        if !map[pos].is_in_loop() {
            continue;
        }
        let encloses_pocket = COMPASS_OFFSETS.iter().any(|&(dx, dy)| {
            let next = pos.offset(dx, dy);
            flooded.get(next) == Some(0) && !map[next].is_in_loop()
        });
        if !encloses_pocket {
            flooded[pos] = 1;
            map[pos].flags.remove(CellFlags::IN_LOOP);
            demoted += 1;
        }
    }
    demoted
}
