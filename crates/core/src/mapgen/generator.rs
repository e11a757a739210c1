//! Level generation orchestration: carving, loop insertion, assembly and analysis.

use crate::analysis::analyze_map;
use crate::config::LevelConfig;
use crate::error::GenerationError;
use crate::grid::{DOOR, FLOOR};
use crate::map::{PermanentMap, Terrain};
use crate::rng::LevelRng;

use super::loops::add_loops;
use super::model::{GeneratedLevel, LevelStats};
use super::placement::carve_dungeon;
use super::profile::{DungeonProfile, first_room_profile, level_profile};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LevelGenerator {
    config: LevelConfig,
}

impl LevelGenerator {
    pub fn new(config: LevelConfig) -> Result<Self, GenerationError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    /// Generates the level for `depth` with the depth-adjusted catalog profiles.
    pub fn generate(&self, seed: u64, depth: u32) -> GeneratedLevel {
        let level = level_profile(depth, self.config.descent_depth);
        let first_room = first_room_profile(depth, self.config.descent_depth);
        self.generate_with_profiles(seed, depth, &level, &first_room)
    }

    /// Draws from one stream in a fixed order: first room, placement, loop
    /// insertion, secret doors. Analysis draws nothing.
    pub fn generate_with_profiles(
        &self,
        seed: u64,
        depth: u32,
        level: &DungeonProfile,
        first_room: &DungeonProfile,
    ) -> GeneratedLevel {
        let config = &self.config;
        let mut rng = LevelRng::with_stream(seed, config.rng_stream);

        let carved = carve_dungeon(config.width, config.height, level, first_room, config, &mut rng);
        log::debug!(
            "seed {seed} depth {depth}: {} rooms in {} attempts",
            carved.placement.rooms_built + 1,
            carved.placement.attempts
        );

        let mut grid = carved.grid;
        let loops_added = add_loops(&mut grid, config.loop_threshold, &mut rng);

        let mut map = PermanentMap::from_grid(&grid, config.secret_door_chance(depth), &mut rng);
        map.finish_walls(true);
        let analysis = analyze_map(&mut map, config.compute_choke_map);

        let stats = LevelStats {
            first_room: carved.first_room,
            placement: carved.placement,
            loops_added,
            floor_cells: grid.count(FLOOR),
            door_cells: grid.count(DOOR),
            secret_doors: map
                .cells()
                .iter()
                .filter(|cell| cell.visible_terrain() == Terrain::SecretDoor)
                .count(),
            loop_cells: analysis.loop_cells,
            chokepoints: analysis.chokepoints,
            gate_sites: analysis.gate_sites,
        };
        log::debug!("seed {seed} depth {depth}: {} random words drawn", rng.position());

        GeneratedLevel {
            seed,
            depth,
            grid,
            room_labels: carved.room_labels,
            map,
            choke_map: analysis.choke_map,
            stats,
        }
    }
}
