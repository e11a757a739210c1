//! Weighted room-kind selection and candidate assembly in hyperspace.

use serde::{Deserialize, Serialize};

use crate::config::LevelConfig;
use crate::grid::Grid;
use crate::rng::LevelRng;
use crate::types::{Direction, DoorSites};

use super::doors::choose_random_door_sites;
use super::hallway::attach_hallway_to;
use super::profile::{DungeonProfile, MAX_PROFILE_WEIGHT, RoomKind};
use super::shapes::{
    design_cavern, design_chunky_room, design_circular_room, design_cross_room,
    design_entrance_room, design_small_room, design_symmetrical_cross_room,
};

const CAVERN_MIN_WIDTH: i32 = 50;
const CAVERN_MIN_HEIGHT: i32 = 20;

/// A footprint waiting in hyperspace, ready to be grafted onto the dungeon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomCandidate {
    pub kind: RoomKind,
    pub door_sites: DoorSites,
    pub hallway: Option<Direction>,
}

/// Draws a room kind from `profile` and designs it into `grid`.
pub fn design_random_room(grid: &mut Grid, profile: &DungeonProfile, rng: &mut LevelRng) -> RoomKind {
    let kind = pick_room_kind(profile, rng);
    let (width, height) = (grid.width() as i32, grid.height() as i32);
    match kind {
        RoomKind::Cross => design_cross_room(grid, rng),
        RoomKind::SymmetricalCross => design_symmetrical_cross_room(grid, rng),
        RoomKind::Small => design_small_room(grid, rng),
        RoomKind::Circular => design_circular_room(grid, rng),
        RoomKind::Chunky => design_chunky_room(grid, rng),
        RoomKind::Cave => match rng.range(0, 2) {
            0 => design_cavern(grid, 3, 12, 4, 8, rng),
            1 => design_cavern(grid, 3, 12, 15, height - 2, rng),
            _ => design_cavern(grid, 20, height - 2, 4, 8, rng),
        },
        RoomKind::Cavern => design_cavern(
            grid,
            CAVERN_MIN_WIDTH.min(width - 2),
            width - 2,
            CAVERN_MIN_HEIGHT.min(height - 2),
            height - 2,
            rng,
        ),
        RoomKind::Entrance => design_entrance_room(grid),
    }
    kind
}

/// Designs a room into the hyperspace grid, finds its door sites and, when
/// asked, grows a corridor from one of them. `None` means no door site
/// survived and the attempt is wasted.
pub fn design_room_candidate(
    hyperspace: &mut Grid,
    attach_hallway: bool,
    profile: &DungeonProfile,
    config: &LevelConfig,
    rng: &mut LevelRng,
) -> Option<RoomCandidate> {
    let kind = design_random_room(hyperspace, profile, rng);
    let mut door_sites = choose_random_door_sites(hyperspace, config.door_trace_length, rng);
    if door_sites.is_empty() {
        return None;
    }
    let hallway = if attach_hallway {
        attach_hallway_to(hyperspace, &mut door_sites, &config.corridors, rng)
    } else {
        None
    };
    if door_sites.is_empty() {
        return None;
    }
    Some(RoomCandidate { kind, door_sites, hallway })
}

fn pick_room_kind(profile: &DungeonProfile, rng: &mut LevelRng) -> RoomKind {
    let total = profile.total_weight();
    assert!(
        (1..=MAX_PROFILE_WEIGHT).contains(&total),
        "room profile weight total {total} is outside 1..={MAX_PROFILE_WEIGHT}"
    );
    let mut roll = rng.range(0, (total - 1) as i32) as u32;
    for kind in RoomKind::ALL {
        let weight = profile.weight(kind);
        if roll < weight {
            return kind;
        }
        roll -= weight;
    }
    RoomKind::Entrance
}
