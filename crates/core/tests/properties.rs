use levelgen::grid::{DOOR, FLOOR, GRANITE};
use levelgen::mapgen::doors::{choose_random_door_sites, direction_of_door_site, outward_ray_is_clear};
use levelgen::mapgen::loops::{add_loops, pathing_costs};
use levelgen::mapgen::placement::carve_dungeon;
use levelgen::mapgen::profile::{first_room_profile, level_profile};
use levelgen::mapgen::rooms::design_random_room;
use levelgen::pathing::{PATHING_UNREACHED, dijkstra_scan};
use levelgen::{
    Direction, GeneratedLevel, Grid, LevelConfig, LevelGenerator, LevelRng, Pos, analyze_map,
};
use proptest::{
    arbitrary::any,
    test_runner::{Config as ProptestConfig, TestCaseError, TestRunner},
};

fn walkable(grid: &Grid, pos: Pos) -> bool {
    grid.get(pos).is_some_and(|cell| cell == FLOOR || cell == DOOR)
}

fn check_connected(level: &GeneratedLevel) -> Result<(), String> {
    let grid = &level.grid;
    let cells: Vec<Pos> = grid.positions().filter(|&pos| walkable(grid, pos)).collect();
    let Some(&start) = cells.first() else {
        return Err("Invariant failed: level has no floor".to_owned());
    };
    let mut seen = Grid::new(grid.width(), grid.height());
    seen[start] = 1;
    let mut stack = vec![start];
    let mut reached = 0;
    while let Some(pos) = stack.pop() {
        reached += 1;
        for direction in Direction::ALL {
            let next = pos.step(direction);
            if walkable(grid, next) && seen[next] == 0 {
                seen[next] = 1;
                stack.push(next);
            }
        }
    }
    if reached != cells.len() {
        return Err(format!("Invariant failed: reached {reached} of {} cells", cells.len()));
    }
    Ok(())
}

fn check_no_touch(labels: &Grid) -> Result<(), String> {
    for pos in labels.positions() {
        let label = labels[pos];
        if label == 0 {
            continue;
        }
        for dx in -1..=1 {
            for dy in -1..=1 {
                if let Some(other) = labels.get(pos.offset(dx, dy))
                    && other > 0
                    && other != label
                {
                    return Err(format!("Invariant failed: rooms {label} and {other} touch at {pos:?}"));
                }
            }
        }
    }
    Ok(())
}

fn check_doors_join_two_rooms(grid: &Grid, labels: &Grid) -> Result<(), String> {
    for pos in grid.positions().filter(|&pos| grid[pos] == DOOR) {
        let mut rooms: Vec<i32> = Direction::ALL
            .into_iter()
            .map(|direction| pos.step(direction))
            .filter(|&next| grid.get(next) == Some(FLOOR))
            .map(|next| labels[next])
            .collect();
        rooms.sort_unstable();
        rooms.dedup();
        if rooms.len() != 2 || rooms.contains(&0) {
            return Err(format!("Invariant failed: door at {pos:?} joins rooms {rooms:?}"));
        }
    }
    Ok(())
}

fn run_property(cases: u32, property: impl Fn(u64, u32) -> Result<(), String>) {
    let mut runner = TestRunner::new(ProptestConfig::with_cases(cases));
    runner
        .run(&(any::<u64>(), 1_u32..=26), |(seed, depth)| {
            property(seed, depth).map_err(TestCaseError::fail)?;
            Ok(())
        })
        .expect("generated levels should preserve invariants");
}

#[test]
fn test_generated_levels_are_connected_and_flag_consistent() {
    let generator = LevelGenerator::default();
    run_property(16, |seed, depth| {
        let level = generator.generate(seed, depth);
        check_connected(&level)?;
        check_no_touch(&level.room_labels)?;
        if !level.map.flags_are_consistent() {
            return Err(format!("Invariant failed: flags inconsistent for seed {seed}"));
        }
        Ok(())
    });
}

#[test]
fn test_placement_doors_join_exactly_two_rooms() {
    let config = LevelConfig::default();
    run_property(16, |seed, depth| {
        let mut rng = LevelRng::new(seed);
        let carved = carve_dungeon(
            config.width,
            config.height,
            &level_profile(depth, config.descent_depth),
            &first_room_profile(depth, config.descent_depth),
            &config,
            &mut rng,
        );
        check_no_touch(&carved.room_labels)?;
        check_doors_join_two_rooms(&carved.grid, &carved.room_labels)?;
        if carved.grid.count(DOOR) != carved.placement.rooms_built {
            return Err("Invariant failed: one door per placed room".to_owned());
        }
        Ok(())
    });
}

#[test]
fn test_chosen_door_sites_are_valid() {
    let config = LevelConfig::default();
    run_property(24, |seed, depth| {
        let mut rng = LevelRng::new(seed);
        let mut hyperspace = Grid::new(config.width, config.height);
        let kind = design_random_room(&mut hyperspace, &level_profile(depth, 26), &mut rng);
        let sites = choose_random_door_sites(&hyperspace, config.door_trace_length, &mut rng);
        for (direction, site) in sites.iter() {
            if direction_of_door_site(&hyperspace, site) != Some(direction) {
                return Err(format!("Invariant failed: {kind:?} site {site:?} does not face {direction:?}"));
            }
            if !outward_ray_is_clear(&hyperspace, site, direction, config.door_trace_length) {
                return Err(format!("Invariant failed: {kind:?} site {site:?} ray re-enters the room"));
            }
        }
        Ok(())
    });
}

#[test]
fn test_analysis_is_a_fixed_point() {
    let generator = LevelGenerator::default();
    run_property(8, |seed, depth| {
        let level = generator.generate(seed, depth);
        let mut map = level.map.clone();
        let analysis = analyze_map(&mut map, true);
        if map != level.map || analysis.choke_map != level.choke_map {
            return Err(format!("Invariant failed: re-analysis changed seed {seed} depth {depth}"));
        }
        Ok(())
    });
}

#[test]
fn test_loop_augmentation_leaves_no_long_detours() {
    let config = LevelConfig::default();
    run_property(8, |seed, depth| {
        let mut rng = LevelRng::new(seed);
        let carved = carve_dungeon(
            config.width,
            config.height,
            &level_profile(depth, config.descent_depth),
            &first_room_profile(depth, config.descent_depth),
            &config,
            &mut rng,
        );
        let mut grid = carved.grid;
        let threshold = 1 + (seed % 40) as i32;
        let before = grid.count(DOOR);
        let opened = add_loops(&mut grid, threshold, &mut rng);
        if grid.count(DOOR) != before + opened {
            return Err("Invariant failed: doorway count disagrees with the report".to_owned());
        }

        let costs = pathing_costs(&grid);
        let mut distance = Grid::new(grid.width(), grid.height());
        for pos in grid.positions().filter(|&pos| grid[pos] == GRANITE) {
            for (dx, dy) in [(1, 0), (0, 1)] {
                let (near, far) = (pos.offset(dx, dy), pos.offset(-dx, -dy));
                if grid.get(near) != Some(FLOOR) || grid.get(far) != Some(FLOOR) {
                    continue;
                }
                distance.fill(PATHING_UNREACHED);
                distance[near] = 0;
                dijkstra_scan(&mut distance, &costs, false);
                if distance[far] > threshold {
                    return Err(format!(
                        "Invariant failed: wall at {pos:?} still hides a detour of {}",
                        distance[far]
                    ));
                }
            }
        }
        Ok(())
    });
}
