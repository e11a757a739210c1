//! Procedural level generation split into coherent submodules: room shapes,
//! door sites, hallways, placement, loop insertion and the pipeline that
//! strings them together.

pub mod doors;
pub mod hallway;
pub mod loops;
pub mod model;
pub mod placement;
pub mod profile;
pub mod rooms;
pub mod shapes;

mod generator;

pub use generator::LevelGenerator;
pub use model::{GeneratedLevel, LevelStats};
pub use placement::{CarvedDungeon, PlacementBudget, PlacementReport};
pub use profile::{DungeonProfile, ProfileId, RoomKind};

/// Generates one level with the default configuration.
pub fn generate_level(seed: u64, depth: u32) -> GeneratedLevel {
    LevelGenerator::default().generate(seed, depth)
}
