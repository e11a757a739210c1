//! Chokepoints and the weighted map of the regions they cut off.

use crate::grid::Grid;
use crate::map::{CellFlags, PermanentCell, PermanentMap};
use crate::types::{COMPASS_OFFSETS, Direction, Pos};

/// Weight-map value for cells no chokepoint cuts off.
pub const CHOKE_MAP_UNSET: i32 = 30_000;
/// Upper bound on any region weight.
pub const CHOKE_MAP_CAP: i32 = 10_000;

const MACHINE_PRESENCE_WEIGHT: i32 = 5_000;
const AREA_MACHINE_WEIGHT: i32 = 10_000;
/// Regions smaller than this never mark a gate.
const MIN_GATED_REGION: i32 = 4;

/// Flags interior, open, non-loop cells whose compass ring switches between
/// open and blocked more than twice and that are pinched between blocked
/// cells on one axis. Clears all earlier chokepoint and gate flags first.
/// Returns the number of chokepoints.
pub fn detect_chokepoints(map: &mut PermanentMap) -> usize {
    map.clear_flags(CellFlags::IS_CHOKEPOINT | CellFlags::IS_GATE_SITE);

    let (width, height) = (map.width() as i32, map.height() as i32);
    let mut found = Vec::new();
    for x in 1..width - 1 {
        for y in 1..height - 1 {
            let pos = Pos::new(x, y);
            if map.blocks_pathing(pos) || map[pos].is_in_loop() {
                continue;
            }
            if is_pinched(map, pos) {
                found.push(pos);
            }
        }
    }
    for &pos in &found {
        map[pos].flags.insert(CellFlags::IS_CHOKEPOINT);
    }
    found.len()
}

fn is_pinched(map: &PermanentMap, pos: Pos) -> bool {
    let open = |(dx, dy): (i32, i32)| !map.blocks_pathing(pos.offset(dx, dy));
    let mut transitions = 0;
    for dir in 0..COMPASS_OFFSETS.len() {
        let previous = COMPASS_OFFSETS[(dir + COMPASS_OFFSETS.len() - 1) % COMPASS_OFFSETS.len()];
        if open(COMPASS_OFFSETS[dir]) != open(previous) {
            transitions += 1;
            if transitions > 2 {
                return (!open((-1, 0)) && !open((1, 0))) || (!open((0, -1)) && !open((0, 1)));
            }
        }
    }
    false
}

/// For each chokepoint, the region each open side would be cut off into
/// when the chokepoint is blocked. Every cell keeps the smallest such region
/// weight it belongs to; the chokepoint that produced a cell's current
/// minimum is marked as a gate site. Room-machine cells are walls for this
/// pass.
pub fn compute_choke_map(map: &mut PermanentMap) -> Grid {
    let (width, height) = (map.width(), map.height());
    let mut choke_map = Grid::filled(width, height, CHOKE_MAP_UNSET);
    let mut passable = Grid::new(width, height);
    for pos in map.positions() {
        let cell = &map[pos];
        let open = !cell.blocks_pathing() && !cell.flags.contains(CellFlags::IS_IN_ROOM_MACHINE);
        passable[pos] = i32::from(open);
    }

    for pos in map.positions() {
        if passable[pos] == 0 || !map[pos].is_chokepoint() {
            continue;
        }
        for direction in Direction::ALL {
            let side = pos.step(direction);
            if passable.get(side) != Some(1) || map[side].is_chokepoint() {
                continue;
            }
            passable[pos] = 0;
            let (weight, region) = weigh_region(map, &passable, side);
            passable[pos] = 1;
            if weight < MIN_GATED_REGION {
                continue;
            }
            for cell in region {
                if weight < choke_map[cell] {
                    choke_map[cell] = weight;
                    map[cell].flags.remove(CellFlags::IS_GATE_SITE);
                }
            }
            if weight < choke_map[pos] {
                choke_map[pos] = weight;
                map[pos].flags.insert(CellFlags::IS_GATE_SITE);
            }
        }
    }
    choke_map
}

fn cell_weight(cell: &PermanentCell) -> i32 {
    if cell.flags.contains(CellFlags::IS_IN_AREA_MACHINE) {
        AREA_MACHINE_WEIGHT
    } else if cell.flags.contains(CellFlags::HAS_MACHINE_PRESENCE) {
        MACHINE_PRESENCE_WEIGHT
    } else {
        1
    }
}

/// 4-connected region of passable cells around `start`, with its capped weight.
fn weigh_region(map: &PermanentMap, passable: &Grid, start: Pos) -> (i32, Vec<Pos>) {
    let mut seen = Grid::new(passable.width(), passable.height());
    seen[start] = 1;
    let mut region = vec![start];
    let mut stack = vec![start];
    let mut weight = 0;
    while let Some(pos) = stack.pop() {
        weight = (weight + cell_weight(&map[pos])).min(CHOKE_MAP_CAP);
        for direction in Direction::ALL {
            let next = pos.step(direction);
            if passable.get(next) == Some(1) && seen[next] == 0 {
                seen[next] = 1;
                region.push(next);
                stack.push(next);
            }
        }
    }
    (weight, region)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::loops::{audit_loops, detect_loops};
    use crate::analysis::test_support::*;
    use crate::map::Terrain;

    fn analyzed(mut map: PermanentMap) -> PermanentMap {
        detect_loops(&mut map);
        audit_loops(&mut map);
        detect_chokepoints(&mut map);
        map
    }

    fn reachable(map: &PermanentMap, start: Pos, blocked: Pos) -> usize {
        let mut seen = vec![start];
        let mut stack = vec![start];
        while let Some(pos) = stack.pop() {
            for direction in Direction::ALL {
                let next = pos.step(direction);
                if next != blocked && !map.blocks_pathing(next) && !seen.contains(&next) {
                    seen.push(next);
                    stack.push(next);
                }
            }
        }
        seen.len()
    }

    #[test]
    fn every_corridor_cell_of_a_dumbbell_is_a_chokepoint() {
        let map = analyzed(dumbbell_fixture());
        let chokepoints = flagged(&map, |pos| map[pos].is_chokepoint());
        let corridor: Vec<Pos> = (7..=15).map(|x| Pos::new(x, 4)).collect();
        assert_eq!(chokepoints, corridor);
    }

    #[test]
    fn blocking_a_chokepoint_cuts_the_map() {
        let map = analyzed(dumbbell_fixture());
        let open_cells = map.positions().filter(|&pos| !map.blocks_pathing(pos)).count();
        for pos in flagged(&map, |pos| map[pos].is_chokepoint()) {
            let cut = Direction::ALL
                .into_iter()
                .map(|direction| pos.step(direction))
                .filter(|&side| !map.blocks_pathing(side))
                .any(|side| reachable(&map, side, pos) < open_cells - 1);
            assert!(cut, "{pos:?} does not separate anything");
        }
    }

    #[test]
    fn dead_end_tips_are_not_chokepoints() {
        let map = analyzed(dead_end_fixture());
        let chokepoints = flagged(&map, |pos| map[pos].is_chokepoint());
        assert_eq!(chokepoints.len(), 10);
        assert!(!map[Pos::new(2, 3)].is_chokepoint());
        assert!(!map[Pos::new(13, 3)].is_chokepoint());
    }

    #[test]
    fn loops_are_never_chokepoints() {
        let map = analyzed(thin_ring_fixture());
        assert_eq!(map.count_flag(CellFlags::IS_CHOKEPOINT), 0);
    }

    #[test]
    fn weight_map_records_the_smaller_side_and_marks_both_gates() {
        let mut map = analyzed(dumbbell_fixture());
        let weights = compute_choke_map(&mut map);

        assert_eq!(weights[Pos::new(4, 4)], 25);
        assert_eq!(weights[Pos::new(19, 4)], 36);
        assert_eq!(weights[Pos::new(7, 4)], 25);
        assert_eq!(weights[Pos::new(15, 4)], 36);
        for x in 8..=14 {
            assert_eq!(weights[Pos::new(x, 4)], CHOKE_MAP_UNSET, "corridor interior at x={x}");
        }
        assert_eq!(weights[Pos::new(0, 0)], CHOKE_MAP_UNSET);

        let gates = flagged(&map, |pos| map[pos].is_gate_site());
        assert_eq!(gates, vec![Pos::new(7, 4), Pos::new(15, 4)]);
        assert!(map.flags_are_consistent());
    }

    #[test]
    fn machine_cells_weigh_in_and_room_machines_wall_off() {
        let mut map = analyzed(dumbbell_fixture());
        map[Pos::new(19, 4)].flags.insert(CellFlags::HAS_MACHINE_PRESENCE);
        let weights = compute_choke_map(&mut map);
        assert_eq!(weights[Pos::new(18, 3)], 35 + MACHINE_PRESENCE_WEIGHT);

        let mut map = analyzed(dumbbell_fixture());
        map[Pos::new(19, 4)].flags.insert(CellFlags::IS_IN_AREA_MACHINE);
        map[Pos::new(20, 4)].flags.insert(CellFlags::IS_IN_AREA_MACHINE);
        let weights = compute_choke_map(&mut map);
        assert_eq!(weights[Pos::new(18, 3)], CHOKE_MAP_CAP);

        let mut map = analyzed(dumbbell_fixture());
        carve_flags(&mut map, 2, 2, 5, 5, CellFlags::IS_IN_ROOM_MACHINE);
        let weights = compute_choke_map(&mut map);
        assert_eq!(weights[Pos::new(4, 4)], CHOKE_MAP_UNSET);
        assert_eq!(weights[Pos::new(7, 4)], CHOKE_MAP_UNSET);
        assert!(!map[Pos::new(7, 4)].is_gate_site());
        assert!(map[Pos::new(15, 4)].is_gate_site());
    }

    #[test]
    fn tiny_pockets_never_become_gated_regions() {
        let mut map = PermanentMap::new(12, 7);
        carve(&mut map, 1, 1, 3, 1, Terrain::Floor);
        carve(&mut map, 4, 1, 6, 5, Terrain::Floor);
        let mut map = analyzed(map);
        assert!(map[Pos::new(3, 1)].is_chokepoint());
        let weights = compute_choke_map(&mut map);
        assert_eq!(weights[Pos::new(1, 1)], CHOKE_MAP_UNSET);
        assert_eq!(weights[Pos::new(6, 3)], 30);
    }

    fn carve_flags(map: &mut PermanentMap, x: i32, y: i32, width: i32, height: i32, flags: CellFlags) {
        for cx in x..x + width {
            for cy in y..y + height {
                map[Pos::new(cx, cy)].flags.insert(flags);
            }
        }
    }
}
