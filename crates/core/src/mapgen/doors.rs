//! Door-site detection on room footprints and on the growing dungeon.

use crate::grid::{FLOOR, GRANITE, Grid};
use crate::rng::LevelRng;
use crate::types::{Direction, DoorSites, Pos};

/// The single outward direction a door at `pos` would face: floor behind it,
/// granite in front. Cells with no such direction, or with more than one,
/// are not door sites.
pub fn direction_of_door_site(grid: &Grid, pos: Pos) -> Option<Direction> {
    if grid.get(pos) != Some(GRANITE) {
        return None;
    }
    let mut found = None;
    for direction in Direction::ALL {
        let outward = pos.step(direction);
        let inward = pos.step(direction.opposite());
        if grid.get(inward) == Some(FLOOR) && grid.get(outward) == Some(GRANITE) {
            if found.is_some() {
                return None;
            }
            found = Some(direction);
        }
    }
    found
}

/// Whether the `trace_length` cells beyond `site` in `direction` stay clear
/// of the footprint, stopping early at the grid edge.
pub fn outward_ray_is_clear(footprint: &Grid, site: Pos, direction: Direction, trace_length: i32) -> bool {
    let mut probe = site;
    for _ in 0..trace_length {
        probe = probe.step(direction);
        match footprint.get(probe) {
            None => break,
            Some(GRANITE) => {}
            Some(_) => return false,
        }
    }
    true
}

/// Every valid door site on `footprint`, bucketed by direction in
/// column-major order.
pub fn door_site_candidates(footprint: &Grid, trace_length: i32) -> [Vec<Pos>; 4] {
    let mut candidates: [Vec<Pos>; 4] = Default::default();
    for pos in footprint.positions() {
        let Some(direction) = direction_of_door_site(footprint, pos) else {
            continue;
        };
        if outward_ray_is_clear(footprint, pos, direction, trace_length) {
            candidates[direction.index()].push(pos);
        }
    }
    candidates
}

/// Picks one door site per direction, Up, Down, Left, Right in that order.
/// Each non-empty direction costs one draw.
pub fn choose_random_door_sites(footprint: &Grid, trace_length: i32, rng: &mut LevelRng) -> DoorSites {
    let candidates = door_site_candidates(footprint, trace_length);
    let mut sites = DoorSites::NONE;
    for direction in Direction::ALL {
        if let Some(&site) = rng.pick(&candidates[direction.index()]) {
            sites.set(direction, Some(site));
        }
    }
    sites
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::RESERVED;

    fn room_grid() -> Grid {
        let mut grid = Grid::new(30, 20);
        grid.draw_rectangle(10, 8, 6, 4, FLOOR);
        grid
    }

    #[test]
    fn wall_cells_beside_a_room_face_outward() {
        let grid = room_grid();
        assert_eq!(direction_of_door_site(&grid, Pos::new(12, 7)), Some(Direction::Up));
        assert_eq!(direction_of_door_site(&grid, Pos::new(12, 12)), Some(Direction::Down));
        assert_eq!(direction_of_door_site(&grid, Pos::new(9, 9)), Some(Direction::Left));
        assert_eq!(direction_of_door_site(&grid, Pos::new(16, 9)), Some(Direction::Right));
        assert_eq!(direction_of_door_site(&grid, Pos::new(9, 7)), None, "corner");
        assert_eq!(direction_of_door_site(&grid, Pos::new(12, 9)), None, "interior");
        assert_eq!(direction_of_door_site(&grid, Pos::new(12, 3)), None, "far away");
    }

    #[test]
    fn cells_between_two_rooms_are_ambiguous() {
        let mut grid = Grid::new(20, 10);
        grid.draw_rectangle(2, 2, 4, 4, FLOOR);
        grid.draw_rectangle(7, 2, 4, 4, FLOOR);
        assert_eq!(direction_of_door_site(&grid, Pos::new(6, 3)), None);

        let mut grid = Grid::new(20, 10);
        grid.draw_rectangle(2, 2, 4, 4, FLOOR);
        grid.draw_rectangle(6, 1, 1, 1, FLOOR);
        assert_eq!(direction_of_door_site(&grid, Pos::new(6, 2)), None, "floor on two axes");
    }

    #[test]
    fn reserved_cells_are_never_door_sites() {
        let mut grid = room_grid();
        grid[Pos::new(12, 7)] = RESERVED;
        assert_eq!(direction_of_door_site(&grid, Pos::new(12, 7)), None);
        assert_eq!(direction_of_door_site(&grid, Pos::new(12, 6)), None);
    }

    #[test]
    fn rays_that_reenter_the_footprint_are_rejected() {
        let mut grid = Grid::new(30, 20);
        grid.draw_rectangle(5, 5, 10, 2, FLOOR);
        grid.draw_rectangle(5, 9, 10, 2, FLOOR);
        grid.draw_rectangle(4, 5, 1, 6, FLOOR);

        let candidates = door_site_candidates(&grid, 10);
        assert!(!candidates[Direction::Down.index()].contains(&Pos::new(8, 7)));
        assert!(candidates[Direction::Down.index()].contains(&Pos::new(8, 11)));
        assert!(candidates[Direction::Up.index()].contains(&Pos::new(8, 4)));
        assert!(outward_ray_is_clear(&grid, Pos::new(8, 7), Direction::Down, 1));
    }

    #[test]
    fn door_picks_follow_the_shared_draw_rule() {
        let grid = room_grid();
        let candidates = door_site_candidates(&grid, 10);
        let mut rng = LevelRng::new(21);
        let sites = choose_random_door_sites(&grid, 10, &mut rng);

        let mut replay = LevelRng::new(21);
        for direction in Direction::ALL {
            let expected = replay.pick(&candidates[direction.index()]).copied();
            assert_eq!(sites.get(direction), expected, "{direction:?}");
        }
        assert_eq!(rng.position(), replay.position());
    }

    #[test]
    fn every_chosen_site_is_valid_and_empty_directions_cost_nothing() {
        let mut grid = Grid::new(30, 20);
        grid.draw_rectangle(0, 5, 10, 4, FLOOR);
        let mut rng = LevelRng::new(8);
        let sites = choose_random_door_sites(&grid, 10, &mut rng);
        assert_eq!(sites.get(Direction::Left), None);
        assert_eq!(rng.position(), 3);
        for (direction, site) in sites.iter() {
            assert_eq!(direction_of_door_site(&grid, site), Some(direction));
            assert!(outward_ray_is_clear(&grid, site, direction, 10));
        }
    }
}
