//! Corridor extension of a room candidate.

use crate::config::CorridorConfig;
use crate::grid::{FLOOR, GRANITE, Grid};
use crate::rng::LevelRng;
use crate::types::{Direction, DoorSites, Pos};

/// Grows a corridor out of one of the candidate's door sites and replaces
/// `door_sites` with exits from the corridor's far end. Returns the corridor
/// direction, or `None` (after the shuffle draws) when no door site has room
/// for a maximum-length corridor.
pub fn attach_hallway_to(
    grid: &mut Grid,
    door_sites: &mut DoorSites,
    corridors: &CorridorConfig,
    rng: &mut LevelRng,
) -> Option<Direction> {
    let mut directions = Direction::ALL;
    rng.shuffle(&mut directions);

    let (direction, start) = directions.into_iter().find_map(|direction| {
        let site = door_sites.get(direction)?;
        let (dx, dy) = direction.offset();
        let farthest = site.offset(dx * corridors.horizontal_max, dy * corridors.vertical_max);
        grid.in_bounds(farthest).then_some((direction, site))
    })?;

    let (min_length, max_length) = corridors.length_range(direction.is_vertical());
    let length = rng.range(min_length, max_length);
    let mut cursor = start;
    for _ in 0..length {
        grid.set(cursor, FLOOR);
        cursor = cursor.step(direction);
    }
    let (dx, dy) = direction.offset();
    let terminus = Pos::new(
        (cursor.x - dx).clamp(0, grid.width() as i32 - 1),
        (cursor.y - dy).clamp(0, grid.height() as i32 - 1),
    );

    let oblique_exit = rng.percent(corridors.oblique_exit_percent);
    for exit in Direction::ALL {
        let site = terminus.step(exit);
        let usable = (exit == direction || oblique_exit) && grid.get(site) == Some(GRANITE);
        door_sites.set(exit, usable.then_some(site));
    }
    log::trace!("hallway of {length} cells heading {direction:?} ends at {terminus:?}");
    Some(direction)
}
