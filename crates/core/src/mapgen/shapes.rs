//! Room footprint generators. Each clears its grid and stamps floor cells
//! relative to the grid's own dimensions, drawing from the stream in a fixed
//! order.

use crate::grid::{BlobSpec, FLOOR, GRANITE, Grid};
use crate::rng::LevelRng;
use crate::types::Pos;

use super::placement::insert_room_at;

const CAVERN_BLOB_ROUNDS: usize = 5;
const CAVERN_SEED_PERCENT: i32 = 55;
const CAVERN_BIRTH: &str = "ffffffttt";
const CAVERN_SURVIVAL: &str = "ffffttttt";

fn dimensions(grid: &Grid) -> (i32, i32) {
    (grid.width() as i32, grid.height() as i32)
}

/// Cellular-automaton cave sized within the given bounds, centered on the grid.
///
/// The flood copy starts one column right and one row below the first blob
/// cell found in column-major order. That cell is stamped as floor even when
/// it lies outside the blob, and generated layouts depend on it.
pub fn design_cavern(
    grid: &mut Grid,
    min_width: i32,
    max_width: i32,
    min_height: i32,
    max_height: i32,
    rng: &mut LevelRng,
) {
    assert!(min_width <= max_width, "cavern width range {min_width}..={max_width} is inverted");
    assert!(min_height <= max_height, "cavern height range {min_height}..={max_height} is inverted");

    let (width, height) = dimensions(grid);
    let mut blob = Grid::new(grid.width(), grid.height());
    grid.fill(GRANITE);
    let bounds = blob.create_blob(
        &BlobSpec {
            rounds: CAVERN_BLOB_ROUNDS,
            min_width,
            min_height,
            max_width,
            max_height,
            seed_percent: CAVERN_SEED_PERCENT,
            birth: CAVERN_BIRTH,
            survival: CAVERN_SURVIVAL,
        },
        rng,
    );

    let dest_x = (width - bounds.width) / 2;
    let dest_y = (height - bounds.height) / 2;
    let Some(first) = blob.positions().find(|&pos| blob[pos] != GRANITE) else {
        return;
    };
    let seed = first.offset(1, 1);
    insert_room_at(grid, &blob, (dest_x - bounds.min_x, dest_y - bounds.min_y), seed);
}

/// Fixed "T" at the bottom center: an 8×10 hall over a 20×5 foyer.
pub fn design_entrance_room(grid: &mut Grid) {
    let (width, height) = dimensions(grid);
    let (hall_width, hall_height) = (8, 10);
    let (foyer_width, foyer_height) = (20, 5);

    grid.fill(GRANITE);
    grid.draw_rectangle(
        width / 2 - hall_width / 2 - 1,
        height - hall_height - 2,
        hall_width,
        hall_height,
        FLOOR,
    );
    grid.draw_rectangle(
        width / 2 - foyer_width / 2 - 1,
        height - foyer_height - 2,
        foyer_width,
        foyer_height,
        FLOOR,
    );
}

pub fn design_cross_room(grid: &mut Grid, rng: &mut LevelRng) {
    let (width, height) = dimensions(grid);
    grid.fill(GRANITE);

    let room_width = rng.range(3, 12);
    let room_x = rng.range((width / 2 - (room_width - 1)).max(0), width / 2);
    let room_width2 = rng.range(4, 20);
    let jitter = rng.range(0, 2) + rng.range(0, 2);
    let room_x2 = room_x + room_width / 2 + jitter - 3 - room_width2 / 2;

    let room_height = rng.range(3, 7);
    let room_y = height / 2 - room_height;
    let room_height2 = rng.range(2, 5);
    let lift = rng.range(0, 2) + rng.range(0, 1);
    let room_y2 = height / 2 - room_height2 - lift;

    grid.draw_rectangle(room_x - 5, room_y + 5, room_width, room_height, FLOOR);
    grid.draw_rectangle(room_x2 - 5, room_y2 + 5, room_width2, room_height2, FLOOR);
}

/// Plus sign whose arms stay centered: an even major extent shortens the
/// crossing arm by one.
pub fn design_symmetrical_cross_room(grid: &mut Grid, rng: &mut LevelRng) {
    let (width, height) = dimensions(grid);
    grid.fill(GRANITE);

    let major_width = rng.range(4, 8);
    let major_height = rng.range(4, 5);
    let mut minor_width = rng.range(3, 4);
    if major_height % 2 == 0 {
        minor_width -= 1;
    }
    let minor_height = if major_width % 2 == 0 { 2 } else { 3 };

    grid.draw_rectangle(
        (width - major_width) / 2,
        (height - minor_height) / 2,
        major_width,
        minor_height,
        FLOOR,
    );
    grid.draw_rectangle(
        (width - minor_width) / 2,
        (height - major_height) / 2,
        minor_width,
        major_height,
        FLOOR,
    );
}

pub fn design_small_room(grid: &mut Grid, rng: &mut LevelRng) {
    let (width, height) = dimensions(grid);
    grid.fill(GRANITE);
    let room_width = rng.range(3, 6);
    let room_height = rng.range(2, 4);
    grid.draw_rectangle(
        (width - room_width) / 2,
        (height - room_height) / 2,
        room_width,
        room_height,
        FLOOR,
    );
}

/// Usually a small disc; rarely a large one, which may be hollowed into a ring.
pub fn design_circular_room(grid: &mut Grid, rng: &mut LevelRng) {
    let (width, height) = dimensions(grid);
    let center = Pos::new(width / 2, height / 2);
    grid.fill(GRANITE);

    let radius = if rng.percent(5) { rng.range(4, 10) } else { rng.range(2, 4) };
    grid.draw_circle(center, radius, FLOOR);
    if radius > 6 && rng.percent(50) {
        let hole = rng.range(3, radius - 3);
        grid.draw_circle(center, hole, GRANITE);
    }
}

/// Cluster of radius-2 discs, each centered on existing floor inside a
/// bounding box that grows with the shape.
pub fn design_chunky_room(grid: &mut Grid, rng: &mut LevelRng) {
    let (width, height) = dimensions(grid);
    let center = Pos::new(width / 2, height / 2);
    grid.fill(GRANITE);

    let chunk_count = rng.range(2, 8);
    grid.draw_circle(center, 2, FLOOR);
    let (mut min_x, mut max_x) = (center.x - 3, center.x + 3);
    let (mut min_y, mut max_y) = (center.y - 3, center.y + 3);

    let mut placed = 0;
    while placed < chunk_count {
        let x = rng.range(min_x, max_x);
        let y = rng.range(min_y, max_y);
        let pos = Pos::new(x, y);
        if grid.get(pos).is_some_and(|cell| cell != GRANITE) {
            grid.draw_circle(pos, 2, FLOOR);
            placed += 1;
            min_x = (x - 3).min(min_x).max(1);
            max_x = (x + 3).max(max_x).min(width - 2);
            min_y = (y - 3).min(min_y).max(1);
            max_y = (y + 3).max(max_y).min(height - 2);
        }
    }
}
