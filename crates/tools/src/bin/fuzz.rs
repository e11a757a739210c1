use anyhow::{Result, ensure};
use clap::Parser;
use levelgen::grid::{DOOR, FLOOR, Grid};
use levelgen::{Direction, GeneratedLevel, LevelGenerator, Pos};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 200)]
    levels: u32,
    /// Deepest depth to sample
    #[arg(short, long, default_value_t = 26)]
    max_depth: u32,
}

fn walkable(grid: &Grid, pos: Pos) -> bool {
    grid.get(pos).is_some_and(|cell| cell == FLOOR || cell == DOOR)
}

fn reachable_count(grid: &Grid, start: Pos) -> usize {
    let mut seen = Grid::new(grid.width(), grid.height());
    seen[start] = 1;
    let mut stack = vec![start];
    let mut count = 0;
    while let Some(pos) = stack.pop() {
        count += 1;
        for direction in Direction::ALL {
            let next = pos.step(direction);
            if walkable(grid, next) && seen[next] == 0 {
                seen[next] = 1;
                stack.push(next);
            }
        }
    }
    count
}

fn check_level(level: &GeneratedLevel) -> Result<()> {
    let grid = &level.grid;
    let walkable_cells: Vec<Pos> = grid.positions().filter(|&pos| walkable(grid, pos)).collect();
    ensure!(!walkable_cells.is_empty(), "Invariant failed: level has no floor");
    ensure!(
        reachable_count(grid, walkable_cells[0]) == walkable_cells.len(),
        "Invariant failed: level is not connected"
    );

    for pos in grid.positions().filter(|&pos| grid[pos] == DOOR) {
        let joins_floor = [(1, 0), (0, 1)].into_iter().any(|(dx, dy)| {
            grid.get(pos.offset(dx, dy)) == Some(FLOOR) && grid.get(pos.offset(-dx, -dy)) == Some(FLOOR)
        });
        ensure!(joins_floor, "Invariant failed: door at {pos:?} does not join two floor cells");
    }

    for pos in grid.positions() {
        let label = level.room_labels[pos];
        if label == 0 {
            continue;
        }
        let touches_other_room = (-1..=1).flat_map(|dx| (-1..=1).map(move |dy| (dx, dy))).any(|(dx, dy)| {
            level.room_labels.get(pos.offset(dx, dy)).is_some_and(|other| other > 0 && other != label)
        });
        ensure!(!touches_other_room, "Invariant failed: room {label} touches another room at {pos:?}");
    }

    ensure!(level.map.flags_are_consistent(), "Invariant failed: inconsistent analyzer flags");
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("Starting Fuzz harness on seed {} for {} levels...", args.seed, args.levels);
    let generator = LevelGenerator::default();
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);

    let mut total_rooms = 0;
    for index in 0..args.levels {
        let level_seed = rng.next_u64();
        let depth = 1 + rng.next_u32() % args.max_depth.max(1);
        let level = generator.generate(level_seed, depth);

        if let Err(error) = check_level(&level) {
            println!("{}", level.map.render_ascii(true));
            return Err(error.context(format!(
                "level {index} (seed {level_seed}, depth {depth}) failed its checks"
            )));
        }
        let replay = generator.generate(level_seed, depth);
        ensure!(
            replay.fingerprint() == level.fingerprint(),
            "Invariant failed: seed {level_seed} depth {depth} is not reproducible"
        );
        total_rooms += level.stats.placement.rooms_built + 1;
    }

    println!("Fuzzing completed successfully ({total_rooms} rooms across {} levels).", args.levels);
    Ok(())
}
