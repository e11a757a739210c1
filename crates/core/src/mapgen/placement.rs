//! Grafting hyperspace candidates onto the shared dungeon grid.

use serde::{Deserialize, Serialize};

use crate::config::LevelConfig;
use crate::grid::{DOOR, FLOOR, GRANITE, Grid};
use crate::rng::LevelRng;
use crate::types::{Direction, Pos};

use super::doors::direction_of_door_site;
use super::profile::{DungeonProfile, RoomKind};
use super::rooms::{design_random_room, design_room_candidate};

/// Attempts left at which candidates stop growing corridors.
const HALLWAY_ATTEMPT_RESERVE: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementBudget {
    pub max_rooms: usize,
    pub attempts: usize,
}

impl PlacementBudget {
    pub fn from_config(config: &LevelConfig) -> Self {
        Self { max_rooms: config.max_rooms, attempts: config.placement_attempts }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementReport {
    pub rooms_built: usize,
    pub attempts: usize,
    /// Candidates that came out of hyperspace without a usable door site.
    pub unusable_candidates: usize,
    /// Candidates no dungeon cell could admit.
    pub unplaced_candidates: usize,
    pub hallways_built: usize,
}

/// The dungeon grid after placement, with the room number of every copied
/// cell (`0` for granite and doors).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CarvedDungeon {
    pub grid: Grid,
    pub room_labels: Grid,
    pub first_room: RoomKind,
    pub placement: PlacementReport,
}

/// Whether every floor cell of `room`, shifted by `offset`, has only
/// unoccupied (`<= 0`) or off-grid cells in its 3×3 block on `dungeon`.
pub fn room_fits_at(dungeon: &Grid, room: &Grid, offset: (i32, i32)) -> bool {
    room.positions()
        .filter(|&pos| room[pos] != GRANITE)
        .all(|pos| block_is_clear(dungeon, pos.offset(offset.0, offset.1)))
}

fn block_is_clear(dungeon: &Grid, center: Pos) -> bool {
    (-1..=1).all(|dx| {
        (-1..=1).all(|dy| dungeon.get(center.offset(dx, dy)).is_none_or(|cell| cell <= GRANITE))
    })
}

/// Flood-copies the room region reachable from `seed` onto `dungeon`.
/// The translated seed is always stamped; the flood then follows 4-connected
/// room cells whose translation is on the grid and still granite. Returns
/// the dungeon cells written.
pub fn insert_room_at(dungeon: &mut Grid, room: &Grid, offset: (i32, i32), seed: Pos) -> Vec<Pos> {
    let (dx, dy) = offset;
    let mut written = Vec::new();
    let start = seed.offset(dx, dy);
    if !dungeon.set(start, FLOOR) {
        return written;
    }
    written.push(start);

    let mut stack = vec![seed];
    while let Some(room_pos) = stack.pop() {
        for direction in Direction::ALL {
            let next = room_pos.step(direction);
            if room.get(next).is_none_or(|cell| cell == GRANITE) {
                continue;
            }
            let target = next.offset(dx, dy);
            if dungeon.get(target) == Some(GRANITE) {
                dungeon[target] = FLOOR;
                written.push(target);
                stack.push(next);
            }
        }
    }
    written
}

/// Repeatedly designs candidates and grafts each onto the first dungeon door
/// site, in one shuffled cell order, where it fits. Stops at the room cap or
/// when the attempt budget runs out; building fewer rooms is normal.
pub fn attach_rooms(
    dungeon: &mut Grid,
    room_labels: &mut Grid,
    profile: &DungeonProfile,
    budget: PlacementBudget,
    config: &LevelConfig,
    rng: &mut LevelRng,
) -> PlacementReport {
    let mut scan_order: Vec<usize> = (0..dungeon.cell_count()).collect();
    rng.shuffle(&mut scan_order);

    let mut hyperspace = Grid::new(dungeon.width(), dungeon.height());
    let mut report = PlacementReport::default();
    let mut next_label = room_labels.values().iter().copied().max().unwrap_or(0) + 1;

    while report.rooms_built < budget.max_rooms && report.attempts < budget.attempts {
        hyperspace.fill(GRANITE);
        let attach_hallway = report.attempts + HALLWAY_ATTEMPT_RESERVE <= budget.attempts
            && rng.percent(profile.corridor_chance() as i32);
        report.attempts += 1;

        let Some(candidate) =
            design_room_candidate(&mut hyperspace, attach_hallway, profile, config, rng)
        else {
            report.unusable_candidates += 1;
            continue;
        };
        let footprint: Vec<Pos> =
            hyperspace.positions().filter(|&pos| hyperspace[pos] != GRANITE).collect();

        let placement = scan_order.iter().find_map(|&index| {
            let door = dungeon.pos_at_column_major(index);
            let facing = direction_of_door_site(dungeon, door)?;
            let site = candidate.door_sites.get(facing.opposite())?;
            let offset = (door.x - site.x, door.y - site.y);
            footprint
                .iter()
                .all(|&pos| block_is_clear(dungeon, pos.offset(offset.0, offset.1)))
                .then_some((door, site, offset))
        });
        let Some((door, site, offset)) = placement else {
            report.unplaced_candidates += 1;
            continue;
        };

        let written = insert_room_at(dungeon, &hyperspace, offset, site);
        dungeon[door] = DOOR;
        for &pos in &written {
            room_labels[pos] = next_label;
        }
        room_labels[door] = 0;
        log::trace!(
            "room {next_label} ({:?}, {} cells) joined through door at {door:?}",
            candidate.kind,
            written.len() - 1
        );
        next_label += 1;
        report.rooms_built += 1;
        if candidate.hallway.is_some() {
            report.hallways_built += 1;
        }
    }
    report
}

/// Copies the first room onto an empty dungeon, flooding from its first floor
/// cell in column-major order, then grows the level from it with the level
/// profile.
pub fn carve_dungeon(
    width: usize,
    height: usize,
    level_profile: &DungeonProfile,
    first_room_profile: &DungeonProfile,
    config: &LevelConfig,
    rng: &mut LevelRng,
) -> CarvedDungeon {
    let mut grid = Grid::new(width, height);
    let mut room_labels = Grid::new(width, height);

    let mut first = Grid::new(width, height);
    let first_room = design_random_room(&mut first, first_room_profile, rng);
    if let Some(seed) = first.positions().find(|&pos| first[pos] == FLOOR) {
        for pos in insert_room_at(&mut grid, &first, (0, 0), seed) {
            room_labels[pos] = 1;
        }
    }
    log::debug!("first room: {first_room:?} with {} cells", grid.count(FLOOR));

    let placement = attach_rooms(
        &mut grid,
        &mut room_labels,
        level_profile,
        PlacementBudget::from_config(config),
        config,
        rng,
    );
    CarvedDungeon { grid, room_labels, first_room, placement }
}
